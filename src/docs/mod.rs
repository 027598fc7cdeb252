//! Report generators
//!
//! Every report is built in two stages: a format-neutral catalog is
//! assembled from the registries, then handed to the renderer bound for the
//! requested format. The format is checked before anything is built, so an
//! unsupported pair fails without touching the registries or the filesystem.

pub mod constants;
pub mod hierarchy;
pub mod overview;
pub mod params;
pub mod software;
pub mod templates;
pub mod toolchains;

pub use overview::OverviewOptions;
pub use software::SoftwareOptions;

use crate::error::DocResult;
use crate::format::{DetailLevel, OutputFormat};
use crate::plugins::PluginRegistry;
use crate::progress::ProgressHandler;
use crate::recipes::{ModuleOracle, RecipeSource};
use crate::schema::{
    ConfigFileConstants, ConstantRegistry, LicenseRegistry, ParameterSchema, TemplateRegistry,
};
use crate::toolchains::ToolchainRegistry;

/// Read-only registries every report is generated from
pub struct DocGenerator {
    pub schema: ParameterSchema,
    pub templates: TemplateRegistry,
    pub licenses: LicenseRegistry,
    pub constants: ConstantRegistry,
    pub plugins: PluginRegistry,
    pub toolchains: ToolchainRegistry,
}

impl Default for DocGenerator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl DocGenerator {
    pub fn with_defaults() -> Self {
        Self {
            schema: ParameterSchema::with_defaults(),
            templates: TemplateRegistry::with_defaults(),
            licenses: LicenseRegistry::with_defaults(),
            constants: ConstantRegistry::with_defaults(),
            plugins: PluginRegistry::with_defaults(),
            toolchains: ToolchainRegistry::with_defaults(),
        }
    }

    /// Recipe parameters, including the extra parameters of `plugin` when it
    /// names a known plugin
    pub fn parameter_catalog(&self, plugin: Option<&str>, format: OutputFormat) -> DocResult<String> {
        params::RENDERERS.ensure_supported(format)?;
        let catalog = params::build(&self.schema, &self.plugins, plugin);
        params::RENDERERS.render(format, &catalog)
    }

    pub fn template_catalog(&self, format: OutputFormat) -> DocResult<String> {
        templates::RENDERERS.ensure_supported(format)?;
        templates::RENDERERS.render(format, &templates::build(&self.templates))
    }

    pub fn license_catalog(&self, format: OutputFormat) -> DocResult<String> {
        constants::LICENSE_RENDERERS.ensure_supported(format)?;
        constants::LICENSE_RENDERERS.render(format, &constants::build_licenses(&self.licenses))
    }

    pub fn constant_catalog(&self, format: OutputFormat) -> DocResult<String> {
        constants::CONSTANT_RENDERERS.ensure_supported(format)?;
        constants::CONSTANT_RENDERERS.render(format, &constants::build_constants(&self.constants))
    }

    pub fn config_file_constants(
        &self,
        constants: &ConfigFileConstants,
        format: OutputFormat,
    ) -> DocResult<String> {
        constants::CONFIG_FILE_RENDERERS.ensure_supported(format)?;
        constants::CONFIG_FILE_RENDERERS.render(format, &constants::build_config_file(constants))
    }

    pub fn plugin_hierarchy(&self, detail: DetailLevel, format: OutputFormat) -> DocResult<String> {
        hierarchy::RENDERERS.ensure_supported(format)?;
        let tree = hierarchy::build(&self.plugins, &self.plugins, detail);
        hierarchy::RENDERERS.render(format, &tree)
    }

    pub fn plugin_overview(&self, options: &OverviewOptions, format: OutputFormat) -> DocResult<String> {
        overview::RENDERERS.ensure_supported(format)?;
        let overview = overview::build(&self.plugins, &self.schema, options)?;
        overview::RENDERERS.render(format, &overview)
    }

    pub fn software_catalog(
        &self,
        source: &dyn RecipeSource,
        oracle: &dyn ModuleOracle,
        options: SoftwareOptions,
        progress: &dyn ProgressHandler,
        format: OutputFormat,
    ) -> DocResult<String> {
        software::RENDERERS.ensure_supported(format)?;
        let catalog = software::build(source, oracle, &self.templates, options, progress)?;
        software::RENDERERS.render(format, &catalog)
    }

    pub fn toolchain_catalog(&self, format: OutputFormat) -> DocResult<String> {
        toolchains::CATALOG_RENDERERS.ensure_supported(format)?;
        toolchains::CATALOG_RENDERERS.render(format, &toolchains::build_catalog(&self.toolchains))
    }

    /// Options of the toolchain named `name`; unknown names fail with a
    /// suggestion of the closest known toolchain
    pub fn toolchain_options(&self, name: &str, format: OutputFormat) -> DocResult<String> {
        toolchains::OPTION_RENDERERS.ensure_supported(format)?;
        let toolchain = self.toolchains.search(name)?;
        toolchains::OPTION_RENDERERS.render(format, &toolchains::build_options(toolchain.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocError;
    use crate::progress::NoOpHandler;
    use crate::recipes::StaticModules;
    use std::cell::Cell;
    use std::path::{Path, PathBuf};

    /// Recipe source that counts how often it is asked for recipes
    struct CountingSource {
        calls: Cell<usize>,
    }

    impl RecipeSource for CountingSource {
        fn find_matching(&self, _: &str, _: &str) -> DocResult<Vec<PathBuf>> {
            self.calls.set(self.calls.get() + 1);
            Ok(Vec::new())
        }

        fn shallow_parse(&self, path: &Path) -> DocResult<crate::recipes::RecipeRecord> {
            Ok(crate::recipes::RecipeRecord::new(path, Vec::new()))
        }

        fn full_parse(&self, path: &Path) -> DocResult<crate::recipes::RecipeRecord> {
            self.shallow_parse(path)
        }
    }

    #[test]
    fn test_format_support_is_per_report() {
        let generator = DocGenerator::with_defaults();
        let source = CountingSource { calls: Cell::new(0) };
        let oracle = StaticModules::default();

        let result = generator.software_catalog(
            &source,
            &oracle,
            SoftwareOptions::default(),
            &NoOpHandler,
            OutputFormat::Json,
        );
        assert!(result.is_ok());
        assert_eq!(source.calls.get(), 1);

        let err = generator
            .plugin_overview(&OverviewOptions::with_defaults(), OutputFormat::Txt)
            .unwrap_err();
        assert!(err.is_unsupported_format());
    }

    #[test]
    fn test_unknown_toolchain_checked_after_format() {
        let generator = DocGenerator::with_defaults();
        assert!(generator
            .toolchain_options("nope", OutputFormat::Json)
            .unwrap_err()
            .is_unsupported_format());
        assert!(matches!(
            generator.toolchain_options("fos", OutputFormat::Txt),
            Err(DocError::UnknownToolchain { .. })
        ));
    }

    #[test]
    fn test_every_report_renders_text_with_defaults() {
        let generator = DocGenerator::with_defaults();
        let reports = [
            generator.parameter_catalog(Some("ConfigureMake"), OutputFormat::Txt),
            generator.template_catalog(OutputFormat::Txt),
            generator.license_catalog(OutputFormat::Txt),
            generator.constant_catalog(OutputFormat::Txt),
            generator.plugin_hierarchy(DetailLevel::Detailed, OutputFormat::Txt),
            generator.plugin_overview(&OverviewOptions::with_defaults(), OutputFormat::Md),
            generator.toolchain_catalog(OutputFormat::Txt),
            generator.toolchain_options("foss", OutputFormat::Txt),
        ];
        for report in reports {
            assert!(!report.unwrap().is_empty());
        }
    }
}
