//! Logging setup and the advisory channel.
//!
//! Diagnostics go through `tracing`. Advisory messages (such as the local
//! override warning) are routed by execution context: interactive sessions
//! see them on the console, services get them in the error log.

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Where the process is running, which decides how advisories are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    /// A person at a terminal.
    Interactive,
    /// A background service or request handler.
    Service,
}

impl ExecutionContext {
    /// Interactive when stdin is a terminal and no remote peer is set.
    pub fn detect() -> Self {
        if std::env::var_os("REMOTE_ADDR").is_none() && std::io::stdin().is_terminal() {
            ExecutionContext::Interactive
        } else {
            ExecutionContext::Service
        }
    }
}

/// Emit an advisory message. Never fails and never blocks loading.
pub fn advise(context: ExecutionContext, message: &str) {
    match context {
        ExecutionContext::Interactive => eprintln!("{}", message),
        ExecutionContext::Service => tracing::error!("{}", message),
    }
}

/// Logging output destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Off,
    Stdout,
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// Parse the `--log` option: 0/off, 1/stdout, 2/stderr, or a filename.
    pub fn parse(value: &str) -> Self {
        match value {
            "0" | "off" => LogTarget::Off,
            "1" | "stdout" => LogTarget::Stdout,
            "2" | "stderr" => LogTarget::Stderr,
            filename => LogTarget::File(PathBuf::from(filename)),
        }
    }
}

/// Install the global tracing subscriber.
pub fn init_tracing(target: &LogTarget, verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    match target {
        LogTarget::Off => {}
        LogTarget::Stdout => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogTarget::Stderr => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}
