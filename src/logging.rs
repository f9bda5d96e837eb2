//! Log output for ytshelf.
//!
//! Events go to stdout and, when a log file is configured, are appended to
//! that file so earlier runs stay readable after a restart. An empty
//! `logging.file` means console only.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::fmt::writer::{MakeWriter, MakeWriterExt};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{Result, ShelfError};

/// Dependencies that are chatty at info (sqlx logs every statement).
const QUIET_TARGETS: [&str; 3] = ["sqlx=warn", "hyper=warn", "reqwest=warn"];

fn parse_level(level: &str) -> Level {
    match level.trim().to_ascii_lowercase().as_str() {
        "warning" => Level::WARN,
        other => other.parse().unwrap_or(Level::INFO),
    }
}

/// Level from the config, then `RUST_LOG` on top, then the quiet targets.
fn build_filter(level: &str) -> EnvFilter {
    QUIET_TARGETS.iter().fold(
        EnvFilter::from_default_env().add_directive(parse_level(level).into()),
        |filter, target| match target.parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        },
    )
}

/// Open the log file for appending, creating it and its directory.
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(file)
}

fn install<W>(writer: W, ansi: bool, level: &str) -> Result<()>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi)
                .with_target(true),
        )
        .with(build_filter(level))
        .try_init()
        .map_err(|e| ShelfError::Config(format!("logging already initialized: {e}")))
}

/// Install the global subscriber described by `config`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if config.file.trim().is_empty() {
        return install(std::io::stdout, true, &config.level);
    }

    let file = Arc::new(open_log_file(Path::new(&config.file))?);
    install(std::io::stdout.and(file), false, &config.level)
}

/// Console-only fallback for when the log file cannot be opened.
pub fn init_console_only(level: &str) {
    if let Err(e) = install(std::io::stdout, true, level) {
        eprintln!("{e}");
    }
}
