// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::log::adm_log;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use poison::{Config, PrefixAnnounce};
use slog::Logger;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DedupCommand {
    /// File with one prefix announcement per line. Reads stdin when absent.
    pub file: Option<PathBuf>,

    /// Abort on the first malformed line instead of skipping it.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    New,
    Duplicate,
    Ignored,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub unique: usize,
    pub duplicate: usize,
    pub malformed: usize,
}

/// Collects distinct prefix announcements in first-seen order.
pub struct Deduplicator {
    log: Logger,
    config: Config,
    seen: HashSet<PrefixAnnounce>,
    unique: Vec<PrefixAnnounce>,
    stats: Stats,
}

impl Deduplicator {
    pub fn new(config: Config, log: Logger) -> Self {
        Self {
            log,
            config,
            seen: HashSet::new(),
            unique: Vec::new(),
            stats: Stats::default(),
        }
    }

    /// Take one input line. Blank lines and `#` comments are ignored.
    pub fn ingest(
        &mut self,
        lineno: usize,
        line: &str,
    ) -> Result<Outcome, poison::Error> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Outcome::Ignored);
        }

        let pfx = match self.config.parse_prefix_announce(line) {
            Ok(pfx) => pfx,
            Err(e) => {
                self.stats.malformed += 1;
                return Err(e);
            }
        };

        if !self.seen.insert(pfx.clone()) {
            adm_log!(self, debug, "duplicate prefix announce";
                "line" => lineno,
                "announce" => pfx.to_string()
            );
            self.stats.duplicate += 1;
            return Ok(Outcome::Duplicate);
        }

        self.unique.push(pfx);
        self.stats.unique += 1;
        Ok(Outcome::New)
    }

    pub fn unique(&self) -> &[PrefixAnnounce] {
        &self.unique
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn read<R: BufRead>(&mut self, input: R, strict: bool) -> Result<()> {
        for (i, line) in input.lines().enumerate() {
            let line = line.context("read input")?;
            let lineno = i + 1;
            if let Err(e) = self.ingest(lineno, &line) {
                if strict {
                    return Err(anyhow!("line {lineno}: {e}"));
                }
                adm_log!(self, warn, "skipping malformed line";
                    "line" => lineno,
                    "error" => e.to_string()
                );
            }
        }
        Ok(())
    }
}

pub fn run(command: DedupCommand, config: Config, log: Logger) -> Result<()> {
    let mut dedup = Deduplicator::new(config, log);
    match &command.file {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("open {}", path.display()))?;
            dedup.read(BufReader::new(file), command.strict)?;
        }
        None => dedup.read(std::io::stdin().lock(), command.strict)?,
    }

    let mut out = std::io::stdout().lock();
    for pfx in dedup.unique() {
        writeln!(out, "{pfx}")?;
    }
    out.flush()?;

    let stats = dedup.stats();
    adm_log!(dedup, info, "deduplicated prefix announcements";
        "unique" => stats.unique,
        "duplicate" => stats.duplicate,
        "malformed" => stats.malformed
    );
    Ok(())
}
