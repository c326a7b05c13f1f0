// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use poison::Config;
use std::path::{Path, PathBuf};

mod dedup;
mod inspect;
mod log;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None, infer_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file.
    #[arg(short, long, env = "POISONADM_CONFIG")]
    config: Option<PathBuf>,

    /// AS number terminating every prepend path. Overrides the
    /// configuration file.
    #[arg(long, env = "POISONADM_HOME_ASN")]
    home_asn: Option<u32>,

    /// Write bunyan formatted logs to this file instead of the terminal.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the status, prepend path and poisoned ASes of an announcement
    /// (e.g. `704 {34 35} 47065`) or of every mux in a prefix announcement
    /// (e.g. `wisc: noprepend; gatech: withdrawn`).
    Show {
        announce: String,
    },

    /// Print the canonical form of a prefix announcement.
    Canon {
        prefix_announce: String,

        /// Print a JSON object mapping mux names to announcements.
        #[arg(long)]
        json: bool,
    },

    /// Print the distinct prefix announcements of a list, one per line.
    Dedup(dedup::DedupCommand),
}

fn load_config(path: Option<&Path>, home_asn: Option<u32>) -> Result<Config> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parse config {}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(asn) = home_asn {
        config.home_asn = asn;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log = log::init_logger(cli.log_file.as_deref())?;
    let config = load_config(cli.config.as_deref(), cli.home_asn)?;
    slog::debug!(log, "configuration loaded"; "home_asn" => config.home_asn);

    match cli.command {
        Commands::Show { announce } => {
            inspect::show(std::io::stdout().lock(), &config, &announce)?
        }
        Commands::Canon {
            prefix_announce,
            json,
        } => inspect::canon(
            std::io::stdout().lock(),
            &config,
            &prefix_announce,
            json,
        )?,
        Commands::Dedup(command) => dedup::run(command, config, log)?,
    }
    Ok(())
}
