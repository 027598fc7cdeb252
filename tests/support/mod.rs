//! Shared helpers for integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use recipedoc::docs::{OverviewOptions, SoftwareOptions};
use recipedoc::{
    DocGenerator, DocResult, FileRecipeSource, NoOpHandler, OutputFormat, ReportKind,
    StaticModules,
};
use recipedoc::format::DetailLevel;
use recipedoc::schema::ConfigFileConstants;

/// Writes a recipe file below `dir`, creating parent directories
pub fn write_recipe(dir: &Path, rel: &str, content: &str) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create recipe directory");
    }
    fs::write(&path, content).expect("Failed to write recipe");
    path
}

fn recipe(name: &str, version: &str, toolchain: &str) -> String {
    format!(
        "name = '{}'\nversion = '{}'\nhomepage = 'https://example.org/{}'\n\
         description = \"\"\"{} does\n  useful things\"\"\"\ntoolchain = {}\n",
        name,
        version,
        name.to_lowercase(),
        name,
        toolchain
    )
}

/// Recipe text for a package built with the system toolchain
pub fn system_recipe(name: &str, version: &str) -> String {
    recipe(name, version, "SYSTEM")
}

/// Recipe text for a package built with a named toolchain
pub fn toolchain_recipe(name: &str, version: &str, tc_name: &str, tc_version: &str) -> String {
    let toolchain = format!("{{'name': '{}', 'version': '{}'}}", tc_name, tc_version);
    recipe(name, version, &toolchain)
}

/// Generates `report` with default registries and empty collaborators
pub fn generate(generator: &DocGenerator, report: ReportKind, format: OutputFormat) -> DocResult<String> {
    match report {
        ReportKind::ParameterCatalog => generator.parameter_catalog(Some("ConfigureMake"), format),
        ReportKind::TemplateCatalog => generator.template_catalog(format),
        ReportKind::LicenseCatalog => generator.license_catalog(format),
        ReportKind::ConstantCatalog => generator.constant_catalog(format),
        ReportKind::ConfigFileConstants => {
            let mut constants = ConfigFileConstants::new();
            constants.add("DEFAULT", "HOME", "/home/user", "Current user's home directory");
            constants.add("MAIN", "DEFAULT_PREFIX", "/opt/eb", "Default installation prefix");
            generator.config_file_constants(&constants, format)
        }
        ReportKind::PluginHierarchy => generator.plugin_hierarchy(DetailLevel::Simple, format),
        ReportKind::PluginOverview => {
            generator.plugin_overview(&OverviewOptions::with_defaults(), format)
        }
        ReportKind::SoftwareCatalog => generator.software_catalog(
            &FileRecipeSource::new(Vec::new()),
            &StaticModules::default(),
            SoftwareOptions::default(),
            &NoOpHandler,
            format,
        ),
        ReportKind::ToolchainCatalog => generator.toolchain_catalog(format),
        ReportKind::ToolchainOptions => generator.toolchain_options("foss", format),
    }
}
