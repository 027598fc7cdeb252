//! recipedoc - documentation and catalog generator for build recipe ecosystems
//!
//! This library renders reference documentation for a plugin-based build
//! framework: the recipe parameters it accepts, the template placeholders and
//! constants usable in recipes, the plugin class hierarchy, the available
//! toolchains and the software that recipes exist for. Every report can be
//! rendered as plain text, Markdown or reStructuredText, and some as JSON.
//!
//! # Core Concepts
//!
//! - **Registries**: read-only descriptions of parameters, templates,
//!   constants, plugins and toolchains, built once and queried by every report
//! - **Catalogs**: format-neutral report models assembled from the registries
//! - **Renderers**: one function per `(report, format)` pair; pairs without
//!   a renderer fail with [`DocError::UnsupportedFormat`]
//!
//! # Example Usage
//!
//! ```no_run
//! use recipedoc::{DocGenerator, OutputFormat};
//!
//! let generator = DocGenerator::with_defaults();
//! let markdown = generator.parameter_catalog(Some("ConfigureMake"), OutputFormat::Md)?;
//! println!("{}", markdown);
//! # Ok::<(), recipedoc::DocError>(())
//! ```
//!
//! # Project Structure
//!
//! - [`docs`]: report builders and renderers
//! - [`render`]: table primitives and per-report renderer tables
//! - [`schema`], [`plugins`], [`toolchains`]: the registries
//! - [`recipes`]: recipe discovery, parsing and installed-module lookup

pub mod cli;
pub mod config;
pub mod docs;
pub mod error;
pub mod format;
pub mod plugins;
pub mod progress;
pub mod recipes;
pub mod render;
pub mod schema;
pub mod toolchains;
pub mod util;
pub mod version;

pub use config::{ConfigError, DocsConfig};
pub use docs::{DocGenerator, OverviewOptions, SoftwareOptions};
pub use error::{DocError, DocResult};
pub use format::{DetailLevel, OutputFormat, ReportKind};
pub use plugins::{PluginDescriptor, PluginRegistry};
pub use progress::{BarHandler, NoOpHandler, ProgressEvent, ProgressHandler};
pub use recipes::{FileRecipeSource, ModuleOracle, ModulePathOracle, RecipeSource, StaticModules};
pub use render::is_supported;
pub use schema::{ParameterSchema, TemplateRegistry};
pub use toolchains::ToolchainRegistry;
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};
pub use version::LooseVersion;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_recipedoc() {
        assert_eq!(NAME, "recipedoc");
    }
}
