// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::Result;
use colored::Colorize;
use poison::{Announce, Config, PrefixAnnounce};
use std::io::Write;
use tabwriter::TabWriter;

fn prepend_column(a: &Announce) -> String {
    match a.prepend() {
        Some(path) => path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" "),
        None => "-".into(),
    }
}

fn poisoned_column(a: &Announce) -> String {
    if a.poisoned().is_empty() {
        return "-".into();
    }
    a.poisoned()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn write_table<'a, W: Write>(
    w: W,
    rows: impl Iterator<Item = (&'a str, &'a Announce)>,
) -> Result<()> {
    let mut tw = TabWriter::new(w);
    writeln!(
        &mut tw,
        "{}\t{}\t{}\t{}",
        "Mux".dimmed(),
        "Status".dimmed(),
        "Prepend".dimmed(),
        "Poisoned".dimmed(),
    )?;
    for (mux, a) in rows {
        writeln!(
            &mut tw,
            "{}\t{}\t{}\t{}",
            mux,
            a.status(),
            prepend_column(a),
            poisoned_column(a),
        )?;
    }
    tw.flush()?;
    Ok(())
}

/// Tabulate a single announcement, or every mux of a prefix announcement
/// when the text names muxes.
pub fn show<W: Write>(w: W, config: &Config, text: &str) -> Result<()> {
    if text.contains(':') {
        let pfx = config.parse_prefix_announce(text)?;
        write_table(w, pfx.iter())
    } else {
        let a = config.announce(text)?;
        write_table(w, std::iter::once(("-", &a)))
    }
}

pub fn canon<W: Write>(
    mut w: W,
    config: &Config,
    text: &str,
    json: bool,
) -> Result<()> {
    let pfx: PrefixAnnounce = config.parse_prefix_announce(text)?;
    if json {
        writeln!(w, "{}", serde_json::to_string_pretty(&pfx.to_mux_map())?)?;
    } else {
        writeln!(w, "{pfx}")?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_show_announce() {
        let cfg = Config::default();
        let out = output(|w| show(w, &cfg, "704 {36 35} 47065"));
        let row = out.lines().nth(1).unwrap();
        let cols: Vec<&str> = row.split_whitespace().collect();
        assert_eq!(
            cols,
            vec!["-", "poisoned", "704", "{35", "36}", "47065", "35,36,704"]
        );
    }

    #[test]
    fn test_show_prefix_announce() {
        let cfg = Config::default();
        let out =
            output(|w| show(w, &cfg, "wisc: withdrawn; gatech: 47065 47065"));
        let rows: Vec<Vec<&str>> = out
            .lines()
            .skip(1)
            .map(|l| l.split_whitespace().collect())
            .collect();
        assert_eq!(
            rows,
            vec![
                vec!["wisc", "withdrawn", "-", "-"],
                vec!["gatech", "prepended", "47065", "47065", "-"],
            ]
        );
    }

    #[test]
    fn test_show_rejects_bad_path() {
        let cfg = Config::default();
        let mut buf = Vec::new();
        assert!(show(&mut buf, &cfg, "704 3356").is_err());
    }

    #[test]
    fn test_canon() {
        let cfg = Config::default();
        let out = output(|w| canon(w, &cfg, " b:47065,47065 ;a: NOPREPEND", false));
        assert_eq!(out, "b: 47065 47065; a: noprepend\n");

        let out = output(|w| canon(w, &cfg, "b: 47065 47065; a: noprepend", true));
        let map: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            map,
            serde_json::json!({"a": "noprepend", "b": "47065 47065"})
        );
    }
}
