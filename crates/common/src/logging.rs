//! Logging and tracing initialization.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::PeeperResult;

/// Initialize the tracing subscriber with the given configuration.
///
/// `RUST_LOG` overrides the configured level. When `config.file` is set,
/// log lines are appended there without ANSI colouring; otherwise they go
/// to stderr so stdout stays free for command output.
pub fn init_logging(config: &LoggingConfig) -> PeeperResult<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match &config.file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            install(config.json, false, env_filter, Mutex::new(file));
        }
        None => install(config.json, true, env_filter, std::io::stderr),
    }
    Ok(())
}

/// Initialize logging with defaults (useful for tests and quick scripts).
pub fn init_default_logging() {
    // Defaults never name a file, so this cannot fail on I/O.
    init_logging(&LoggingConfig::default()).ok();
}

/// Level filter to use when a `--verbose` flag is given.
pub fn effective_level(config: &LoggingConfig, verbose: bool) -> String {
    if verbose {
        "peeper=debug,info".to_string()
    } else {
        config.level.clone()
    }
}

fn install<W>(json: bool, ansi: bool, filter: EnvFilter, writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(writer);

    // A second initialization (tests, embedding hosts) keeps the first subscriber.
    if json {
        tracing::subscriber::set_global_default(builder.json().finish()).ok();
    } else {
        let subscriber = builder
            .with_ansi(ansi)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}
