//! Error types for hosttools

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors from the real-time launcher
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("No target executable given")]
    EmptyRequest,

    #[error("Failed to execute {}: {source}", program.to_string_lossy())]
    Exec {
        program: OsString,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the ELF section relocator
#[derive(Error, Debug)]
pub enum RelocateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid ELF: {0}")]
    InvalidElf(String),

    #[error("Failed to run {}: {source}", tool.display())]
    Spawn {
        tool: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Moving section {section} failed: {status}")]
    ToolFailed { section: String, status: ExitStatus },
}
