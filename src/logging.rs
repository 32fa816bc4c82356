// Diagnostic logging to stderr
// The filter is derived from command-line verbosity only; no environment variables are read.

use crate::errors::{ProvisionError, Result};
use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: OnceLock<()> = OnceLock::new();

/// Map `-q` / `-v` counts onto a tracing level
pub fn level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

pub fn init(verbose: u8, quiet: bool) -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let filter = EnvFilter::new(format!("jenkins_provision={}", level_for(verbose, quiet)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .try_init()
        .map_err(|e| ProvisionError::ConfigError(format!("Failed to initialize logging: {}", e)))?;

    let _ = INIT.set(());
    Ok(())
}
