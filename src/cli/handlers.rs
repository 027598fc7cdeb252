//! Subcommand handlers
//!
//! Each handler produces a report and returns the process exit code.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use super::commands::{CliArgs, Commands, SoftwareArgs};
use crate::config::DocsConfig;
use crate::docs::{DocGenerator, OverviewOptions, SoftwareOptions};
use crate::error::DocError;
use crate::format::{DetailLevel, OutputFormat};
use crate::progress::BarHandler;
use crate::recipes::{FileRecipeSource, ModulePathOracle};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
/// The report exists but cannot be rendered in the requested format
pub const EXIT_UNSUPPORTED_FORMAT: i32 = 2;

/// Runs the selected subcommand and writes its report
pub fn handle_command(args: &CliArgs, config: &DocsConfig) -> i32 {
    let format = OutputFormat::from(args.format);
    let generator = DocGenerator::with_defaults();

    let report = match generate(&generator, args, config, format) {
        Ok(report) => report,
        Err(e) => return report_error(&e),
    };

    match write_report(&report, args.output.as_deref()) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            EXIT_FAILURE
        }
    }
}

fn generate(
    generator: &DocGenerator,
    args: &CliArgs,
    config: &DocsConfig,
    format: OutputFormat,
) -> Result<String, DocError> {
    match &args.command {
        Commands::Params(params) => generator.parameter_catalog(params.plugin.as_deref(), format),
        Commands::Templates => generator.template_catalog(format),
        Commands::Licenses => generator.license_catalog(format),
        Commands::Constants => generator.constant_catalog(format),
        Commands::ConfigConstants => {
            generator.config_file_constants(&config.config_file_constants(), format)
        }
        Commands::Hierarchy(hierarchy) => {
            generator.plugin_hierarchy(DetailLevel::from_flag(hierarchy.detailed), format)
        }
        Commands::Overview(overview) => {
            let mut options = OverviewOptions::with_defaults();
            if let Some(dir) = overview.examples_dir.as_ref().or(config.examples_dir.as_ref()) {
                options = options.with_examples_dir(dir);
            }
            generator.plugin_overview(&options, format)
        }
        Commands::Software(software) => {
            handle_software(generator, software, config, args.quiet, format)
        }
        Commands::Toolchains => generator.toolchain_catalog(format),
        Commands::ToolchainOptions(tc) => generator.toolchain_options(&tc.name, format),
    }
}

fn handle_software(
    generator: &DocGenerator,
    args: &SoftwareArgs,
    config: &DocsConfig,
    quiet: bool,
    format: OutputFormat,
) -> Result<String, DocError> {
    let robot_paths = if args.robot_paths.is_empty() {
        config.robot_paths.clone()
    } else {
        args.robot_paths.clone()
    };
    info!(paths = ?robot_paths, "Listing software from recipe search paths");

    let source = FileRecipeSource::new(robot_paths);
    let oracle = ModulePathOracle::new(config.module_paths.clone());
    let progress = BarHandler::new(config.silent || quiet);
    let options = SoftwareOptions {
        detail: DetailLevel::from_flag(args.detailed),
        only_installed: args.only_installed,
    };

    generator.software_catalog(&source, &oracle, options, &progress, format)
}

fn report_error(e: &DocError) -> i32 {
    error!("{}", e);
    eprintln!("Error: {}", e);
    if e.is_unsupported_format() {
        EXIT_UNSUPPORTED_FORMAT
    } else {
        EXIT_FAILURE
    }
}

/// Writes to `output` when given, stdout otherwise
pub fn write_report(report: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, format!("{}\n", report))
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            debug!(path = %path.display(), "Report written");
        }
        None => println!("{}", report),
    }
    Ok(())
}
