//! Error and warning types for the converter
//!
//! Fatal problems (unreadable input, structurally broken documents, I/O
//! failures) are [`ConvertError`]s and abort the conversion. Everything that
//! only affects a single port or service is reported as a
//! [`ConversionWarning`] and the conversion carries on.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::ports::PortParseError;

/// Converter error
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read compose file {}: {source}", .path.display())]
    ReadCompose {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse compose file: {0}")]
    ParseCompose(#[source] serde_yaml::Error),

    #[error("invalid compose document: {message}")]
    InvalidDocument { message: String },

    #[error("compose file missing services")]
    MissingServices,

    #[error("'services' must be a mapping, found {found}")]
    InvalidServices { found: String },

    #[error("services '{first}' and '{second}' both map to the resource name '{name}'")]
    DuplicateServiceName {
        name: String,
        first: String,
        second: String,
    },

    #[error(
        "invalid chart name '{0}': must be lowercase alphanumerics and '-', at most 63 characters"
    )]
    InvalidChartName(String),

    #[error("invalid chart version '{version}': {source}")]
    InvalidChartVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("failed to render manifest: {0}")]
    Render(#[from] serde_yaml::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;

// =============================================================================
// WARNING SYSTEM
// =============================================================================

/// Warning severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WarningSeverity {
    /// Part of a service was dropped (a port, a field)
    Warning,
    /// The whole service was dropped
    Error,
}

/// Warning category for grouping related warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCategory {
    /// A port specification was skipped
    Port,
    /// A service field had an unexpected shape
    Definition,
    /// A service entry was not a mapping
    Service,
}

/// Non-fatal problem found while converting a service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionWarning {
    pub severity: WarningSeverity,
    pub category: WarningCategory,
    /// Service key as declared in the compose file
    pub service: String,
    /// The offending input, when there is one
    pub input: Option<String>,
    pub message: String,
}

impl ConversionWarning {
    /// A port specification that failed to parse
    pub fn port(service: &str, error: &PortParseError) -> Self {
        Self {
            severity: WarningSeverity::Warning,
            category: WarningCategory::Port,
            service: service.to_string(),
            input: Some(error.spec().to_string()),
            message: error.to_string(),
        }
    }

    /// A `ports` entry that is not in the short string syntax
    pub fn unsupported_port(service: &str, found: &str) -> Self {
        Self {
            severity: WarningSeverity::Warning,
            category: WarningCategory::Port,
            service: service.to_string(),
            input: None,
            message: format!("unsupported port entry: expected a string or number, found {found}"),
        }
    }

    /// A service field with the wrong type
    pub fn definition(service: &str, message: &str) -> Self {
        Self {
            severity: WarningSeverity::Warning,
            category: WarningCategory::Definition,
            service: service.to_string(),
            input: None,
            message: message.to_string(),
        }
    }

    /// A service entry that could not be read at all
    pub fn malformed_service(service: &str, reason: &str) -> Self {
        Self {
            severity: WarningSeverity::Error,
            category: WarningCategory::Service,
            service: service.to_string(),
            input: None,
            message: format!("service skipped: {reason}"),
        }
    }
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "service '{}': {}", self.service, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_warning() {
        let error = PortParseError::InvalidPort {
            spec: "abc".to_string(),
        };
        let warning = ConversionWarning::port("web", &error);

        assert_eq!(warning.category, WarningCategory::Port);
        assert_eq!(warning.input.as_deref(), Some("abc"));
        assert_eq!(warning.to_string(), "service 'web': invalid port: abc");
    }

    #[test]
    fn test_malformed_service_is_error() {
        let warning =
            ConversionWarning::malformed_service("db", "expected a mapping, found a list");
        assert_eq!(warning.severity, WarningSeverity::Error);
        assert!(warning.to_string().contains("service skipped"));
    }

    #[test]
    fn test_error_messages() {
        let err = ConvertError::DuplicateServiceName {
            name: "web-1".to_string(),
            first: "web-1".to_string(),
            second: "web_1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "services 'web-1' and 'web_1' both map to the resource name 'web-1'"
        );
        assert_eq!(
            ConvertError::MissingServices.to_string(),
            "compose file missing services"
        );
    }
}
