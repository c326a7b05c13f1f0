// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::{Context, Result};
use slog::{Drain, Logger};
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const COMPONENT_POISONADM: &str = "poisonadm";
pub const MOD_DEDUP: &str = "dedup";

/// Log to the terminal, filtered through `RUST_LOG`, or as bunyan records
/// to `log_file` when one is given.
pub fn init_logger(log_file: Option<&Path>) -> Result<Logger> {
    match log_file {
        Some(path) => {
            let file = File::create(path).with_context(|| {
                format!("create log file {}", path.display())
            })?;
            Ok(build_bunyan_logger(file))
        }
        None => Ok(build_term_logger()),
    }
}

fn build_term_logger() -> Logger {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_envlogger::new(drain).fuse();
    let drain = slog_async::Async::new(drain)
        .chan_size(0x2000)
        .build()
        .fuse();
    slog::Logger::root(drain, slog::o!())
}

pub fn build_bunyan_logger<W: Write + Send + 'static>(w: W) -> Logger {
    let drain = slog_bunyan::new(w).build().fuse();
    let drain = slog_async::Async::new(drain)
        .chan_size(0x8000)
        .build()
        .fuse();
    slog::Logger::root(drain, slog::o!())
}

macro_rules! adm_log {
    ($self:expr, $level:ident, $msg:expr; $($key:expr => $value:expr),*) => {
        slog::$level!($self.log,
            $msg;
            "component" => crate::log::COMPONENT_POISONADM,
            "module" => crate::log::MOD_DEDUP,
            $($key => $value),*
        )
    };
    ($self:expr, $level:ident, $msg:expr) => {
        slog::$level!($self.log,
            $msg;
            "component" => crate::log::COMPONENT_POISONADM,
            "module" => crate::log::MOD_DEDUP,
        )
    };
}

pub(crate) use adm_log;
