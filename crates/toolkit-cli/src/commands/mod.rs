//! Command implementations.
//!
//! Each command builds a serializable report from the [`Engine`] and prints
//! it in the requested output format. The report builders are public so
//! they can be tested without capturing stdout.

pub mod call;
pub mod demo;
pub mod discover;
pub mod list;
pub mod register;
pub mod select;

use crate::formatters::format_output;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use toolkit_engine::Engine;
use toolkit_engine_core::cli::{ExitCode, OutputFormat};
use toolkit_engine_core::{EngineConfig, Error};

/// Opens the engine rooted at `home`, or at the configured home directory.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the home directory
/// cannot be created.
pub fn open_engine(home: Option<PathBuf>) -> Result<Engine> {
    let config = match home {
        Some(home) => EngineConfig::from_home(home),
        None => EngineConfig::load(),
    }
    .context("failed to load configuration")?;

    tracing::debug!("Using home directory {}", config.home_dir.display());
    Ok(Engine::new(config)?)
}

/// Exit code for a failed command.
///
/// Engine errors keep their semantic code even under added context.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    err.downcast_ref::<Error>()
        .map_or(ExitCode::ERROR, ExitCode::for_error)
}

fn emit<T: Serialize>(report: &T, output_format: OutputFormat) -> Result<ExitCode> {
    println!("{}", format_output(report, output_format)?);
    Ok(ExitCode::SUCCESS)
}
