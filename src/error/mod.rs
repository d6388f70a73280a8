//! Error types and handling for ime-repair
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`fs`]: Log directory and file errors
//! - [`store`]: Registry store errors
//! - [`system`]: Service, process and privilege errors
//! - [`config`]: Configuration errors
//!
//! Only command-level failures (bad configuration, refusing a live run) are
//! returned to `main`. The discovery and cleanup engines catch everything at
//! the narrowest scope and report it through the sink instead.

pub mod config;
pub mod fs;
pub mod store;
pub mod system;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for ime-repair operations
#[derive(Error, Diagnostic, Debug)]
pub enum RepairError {
    // Log directory / file errors
    #[error("IME log directory not found: {path}")]
    #[diagnostic(
        code(ime_repair::fs::directory_not_found),
        help("Check that the Intune Management Extension is installed, or pass --log-dir")
    )]
    DirectoryNotFound { path: String },

    #[error("Cannot read log file {path}: {reason}")]
    #[diagnostic(code(ime_repair::fs::access_denied))]
    FileAccessDenied { path: String, reason: String },

    // Store errors
    #[error("Registry key not found: {path}")]
    #[diagnostic(code(ime_repair::store::path_not_found))]
    StorePathNotFound { path: String },

    #[error("Failed to modify registry at {path}: {reason}")]
    #[diagnostic(code(ime_repair::store::mutation_failed))]
    StoreMutationFailed { path: String, reason: String },

    #[error("Failed to read registry at {path}: {reason}")]
    #[diagnostic(code(ime_repair::store::read_failed))]
    StoreReadFailed { path: String, reason: String },

    #[error("Registry store is not available: {reason}")]
    #[diagnostic(
        code(ime_repair::store::unavailable),
        help("Registry cleanup only runs on Windows")
    )]
    StoreUnavailable { reason: String },

    // System errors
    #[error("Service '{service}' did not reach state {state} within {timeout_secs}s")]
    #[diagnostic(code(ime_repair::system::service_timeout))]
    ServiceTimeout {
        service: String,
        state: String,
        timeout_secs: u64,
    },

    #[error("Service control failed for '{service}': {reason}")]
    #[diagnostic(code(ime_repair::system::service_failed))]
    ServiceControlFailed { service: String, reason: String },

    #[error("Process control failed for '{target}': {reason}")]
    #[diagnostic(code(ime_repair::system::process_failed))]
    ProcessControlFailed { target: String, reason: String },

    #[error("This operation must be run as Administrator")]
    #[diagnostic(
        code(ime_repair::system::not_elevated),
        help(
            "Modifying the registry and restarting services requires an elevated prompt. Re-run without --live for a dry run."
        )
    )]
    NotElevated,

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(code(ime_repair::config::not_found))]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(ime_repair::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(ime_repair::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(ime_repair::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    // CLI errors
    #[error("Unknown shell: {shell}")]
    #[diagnostic(
        code(ime_repair::cli::unsupported_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnsupportedShell { shell: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(ime_repair::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for RepairError {
    fn from(err: std::io::Error) -> Self {
        RepairError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for RepairError {
    fn from(err: serde_yaml::Error) -> Self {
        RepairError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for RepairError {
    fn from(err: serde_json::Error) -> Self {
        RepairError::IoError {
            message: format!("JSON serialization failed: {err}"),
        }
    }
}

impl From<inquire::InquireError> for RepairError {
    fn from(err: inquire::InquireError) -> Self {
        RepairError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, RepairError>;
