//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use compose2chart_convert::ConvertError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Invalid chart options
    #[error("{message}")]
    #[diagnostic(code(compose2chart::cli::input))]
    Input {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The compose file cannot be turned into a chart
    #[error("{message}")]
    #[diagnostic(code(compose2chart::cli::document))]
    Document {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("{message}")]
    #[diagnostic(code(compose2chart::cli::io))]
    Io { message: String },

    /// Anything else
    #[error("{message}")]
    #[diagnostic(code(compose2chart::cli::error))]
    Other { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Input { .. } => exit_codes::INPUT_ERROR,
            CliError::Document { .. } => exit_codes::DOCUMENT_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }

    fn input(message: String, help: &str) -> Self {
        Self::Input {
            message,
            help: Some(help.to_string()),
        }
    }

    fn document(message: String, help: Option<&str>) -> Self {
        Self::Document {
            message,
            help: help.map(str::to_string),
        }
    }
}

impl From<ConvertError> for CliError {
    fn from(err: ConvertError) -> Self {
        let message = err.to_string();
        match err {
            ConvertError::ReadCompose { .. } | ConvertError::Io { .. } => CliError::Io { message },
            ConvertError::ParseCompose(_) | ConvertError::InvalidDocument { .. } => {
                CliError::document(message, Some("pass a compose file with --file"))
            }
            ConvertError::MissingServices | ConvertError::InvalidServices { .. } => {
                CliError::document(
                    message,
                    Some("declare your services under a top-level 'services:' mapping"),
                )
            }
            ConvertError::DuplicateServiceName { .. } => CliError::document(
                message,
                Some("rename one of the services so their names stay distinct"),
            ),
            ConvertError::InvalidChartName(_) => {
                CliError::input(message, "use e.g. --name my-chart")
            }
            ConvertError::InvalidChartVersion { .. } => {
                CliError::input(message, "chart versions must be SemVer 2, e.g. --version 0.1.0")
            }
            ConvertError::Render(_) => CliError::Other { message },
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
