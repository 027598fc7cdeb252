//! Error types shared by every report generator
//!
//! Three failure classes are kept apart on purpose: an unsupported
//! `(report, format)` pair, a broken plugin package, and caller errors naming
//! an identifier that does not exist. Soft template resolution failures never
//! reach this type; see [`crate::schema::templates::TemplateError`].

use std::path::PathBuf;
use thiserror::Error;

use crate::format::{OutputFormat, ReportKind};

/// Convenience alias used throughout the crate
pub type DocResult<T> = Result<T, DocError>;

#[derive(Debug, Error)]
pub enum DocError {
    /// No renderer is bound for this report in the requested format
    #[error("{format} output format not supported for {report}")]
    UnsupportedFormat {
        report: ReportKind,
        format: OutputFormat,
    },

    /// A plugin package is broken (e.g. a module contributes no plugin types)
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Couldn't find toolchain: '{name}'{}. To see available toolchains, use `recipedoc toolchains`", suggestion_hint(.suggestion))]
    UnknownToolchain {
        name: String,
        suggestion: Option<String>,
    },

    /// A commonly-used parameter list names something the base schema lacks
    #[error("Unknown recipe parameter '{parameter}' listed as common for plugin '{plugin}'")]
    UnknownParameter { plugin: String, parameter: String },

    /// A recipe was read but lacks something every recipe must have
    #[error("Invalid recipe {}: {message}", .path.display())]
    Recipe { path: PathBuf, message: String },

    /// A recipe uses syntax the recipe parser does not understand
    #[error("Failed to parse recipe {}: {message}", .path.display())]
    RecipeSyntax { path: PathBuf, message: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{}'?)", s),
        None => String::new(),
    }
}

impl DocError {
    pub fn unsupported(report: ReportKind, format: OutputFormat) -> Self {
        Self::UnsupportedFormat { report, format }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, Self::UnsupportedFormat { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_names_report_and_format() {
        let err = DocError::unsupported(ReportKind::LicenseCatalog, OutputFormat::Json);
        let msg = err.to_string();
        assert!(msg.contains("json"));
        assert!(msg.contains("license_catalog"));
        assert!(err.is_unsupported_format());
    }

    #[test]
    fn test_unknown_toolchain_points_to_listing() {
        let err = DocError::UnknownToolchain {
            name: "fosss".to_string(),
            suggestion: Some("foss".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("'fosss'"));
        assert!(msg.contains("did you mean 'foss'"));
        assert!(msg.contains("recipedoc toolchains"));
    }

    #[test]
    fn test_unknown_toolchain_without_suggestion() {
        let err = DocError::UnknownToolchain {
            name: "zzz".to_string(),
            suggestion: None,
        };
        assert!(!err.to_string().contains("did you mean"));
    }
}
