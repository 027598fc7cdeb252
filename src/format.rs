//! Output formats and report identifiers
//!
//! Both sets are closed: every report is addressed by a [`ReportKind`] and
//! every format by an [`OutputFormat`]. The dispatcher in
//! [`crate::render::dispatch`] maps the pair to a renderer function.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text
    Txt,
    /// MarkDown
    Md,
    /// reStructuredText
    Rst,
    /// JSON listing (only a few reports support it)
    Json,
}

impl OutputFormat {
    pub fn all() -> &'static [OutputFormat] {
        &[
            OutputFormat::Txt,
            OutputFormat::Md,
            OutputFormat::Rst,
            OutputFormat::Json,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Txt => "txt",
            OutputFormat::Md => "md",
            OutputFormat::Rst => "rst",
            OutputFormat::Json => "json",
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Txt
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "txt" => Ok(OutputFormat::Txt),
            "md" => Ok(OutputFormat::Md),
            "rst" => Ok(OutputFormat::Rst),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Invalid output format '{}'. Valid formats: txt, md, rst, json",
                s
            )),
        }
    }
}

/// Amount of information rendered by the hierarchy and software reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailLevel {
    #[default]
    Simple,
    Detailed,
}

impl DetailLevel {
    pub fn from_flag(detailed: bool) -> Self {
        if detailed {
            DetailLevel::Detailed
        } else {
            DetailLevel::Simple
        }
    }

    pub fn is_detailed(&self) -> bool {
        matches!(self, DetailLevel::Detailed)
    }
}

/// Logical reports this crate can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    ParameterCatalog,
    TemplateCatalog,
    LicenseCatalog,
    ConstantCatalog,
    ConfigFileConstants,
    PluginHierarchy,
    PluginOverview,
    SoftwareCatalog,
    ToolchainCatalog,
    ToolchainOptions,
}

impl ReportKind {
    pub fn all() -> &'static [ReportKind] {
        &[
            ReportKind::ParameterCatalog,
            ReportKind::TemplateCatalog,
            ReportKind::LicenseCatalog,
            ReportKind::ConstantCatalog,
            ReportKind::ConfigFileConstants,
            ReportKind::PluginHierarchy,
            ReportKind::PluginOverview,
            ReportKind::SoftwareCatalog,
            ReportKind::ToolchainCatalog,
            ReportKind::ToolchainOptions,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReportKind::ParameterCatalog => "parameter_catalog",
            ReportKind::TemplateCatalog => "template_catalog",
            ReportKind::LicenseCatalog => "license_catalog",
            ReportKind::ConstantCatalog => "constant_catalog",
            ReportKind::ConfigFileConstants => "config_file_constants",
            ReportKind::PluginHierarchy => "plugin_hierarchy",
            ReportKind::PluginOverview => "plugin_overview",
            ReportKind::SoftwareCatalog => "software_catalog",
            ReportKind::ToolchainCatalog => "toolchain_catalog",
            ReportKind::ToolchainOptions => "toolchain_options",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_round_trips_through_str() {
        for format in OutputFormat::all() {
            assert_eq!(format.as_str().parse::<OutputFormat>().unwrap(), *format);
        }
    }

    #[test]
    fn test_format_parse_is_case_insensitive() {
        assert_eq!("RST".parse::<OutputFormat>().unwrap(), OutputFormat::Rst);
    }

    #[test]
    fn test_invalid_format_lists_valid_ones() {
        let err = "html".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("txt, md, rst, json"));
    }

    #[test]
    fn test_report_names_are_unique() {
        let mut names: Vec<_> = ReportKind::all().iter().map(|r| r.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ReportKind::all().len());
    }
}
