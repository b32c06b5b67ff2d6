//! Tracing subscriber setup for the `stv` binary.
//!
//! The viewer owns the terminal, so log lines are written to a file in the
//! data directory rather than stderr.
//!
//! Filter priority: `STV_LOG`, then `RUST_LOG`, then the CLI verbosity.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::error::{AppError, AppResult};

pub const LOG_FILE_NAME: &str = "stv.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Normal,
    Verbose,
}

impl Verbosity {
    pub const fn from_flag(verbose: bool) -> Self {
        if verbose { Self::Verbose } else { Self::Normal }
    }

    pub const fn default_level(self) -> Level {
        match self {
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
        }
    }
}

/// Installs the global subscriber. Call once, before the terminal session starts.
pub fn init_file_subscriber(data_dir: &Path, verbosity: Verbosity) -> AppResult<()> {
    fs::create_dir_all(data_dir).map_err(|source| {
        AppError::io_with_context(
            source,
            format!("failed to create data dir: {}", data_dir.display()),
        )
    })?;
    let path = data_dir.join(LOG_FILE_NAME);
    let file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| {
            AppError::io_with_context(source, format!("failed to open log: {}", path.display()))
        })?;

    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(build_env_filter(verbosity))
        .with(fmt_layer)
        .try_init()
        .map_err(|err| AppError::unsupported(format!("tracing already initialized: {err}")))
}

fn build_env_filter(verbosity: Verbosity) -> EnvFilter {
    if let Ok(directives) = std::env::var("STV_LOG")
        && let Ok(filter) = EnvFilter::try_new(&directives)
    {
        return filter;
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    EnvFilter::new(verbosity.default_level().as_str().to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::Verbosity;

    #[test]
    fn verbosity_maps_flag_to_level() {
        assert_eq!(Verbosity::from_flag(false).default_level(), Level::WARN);
        assert_eq!(Verbosity::from_flag(true).default_level(), Level::DEBUG);
    }
}
