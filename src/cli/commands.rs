use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::format::OutputFormat;

/// Documentation and catalog generator for build recipe ecosystems
#[derive(Parser, Debug)]
#[command(
    name = "recipedoc",
    about = "Documentation and catalog generator for build recipe ecosystems",
    version,
    author,
    long_about = "recipedoc renders reference documentation for recipe parameters, \
                  template placeholders, constants, plugins, toolchains and available \
                  software, in plain text, Markdown, reStructuredText or JSON."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'f',
        long,
        global = true,
        value_enum,
        default_value = "txt",
        help = "Output format"
    )]
    pub format: FormatArg,

    #[arg(
        short = 'o',
        long,
        global = true,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress progress and non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "List available recipe parameters",
        long_about = "Lists the recipe parameters grouped by category. With --plugin, the \
                      extra parameters of that plugin are included and marked with '*'.\n\n\
                      Examples:\n  \
                      recipedoc params\n  \
                      recipedoc params --plugin ConfigureMake --format md"
    )]
    Params(ParamsArgs),

    #[command(about = "List template placeholders usable in recipes")]
    Templates,

    #[command(about = "List known licenses")]
    Licenses,

    #[command(about = "List constants usable in recipes")]
    Constants,

    #[command(
        name = "config-constants",
        about = "List constants usable in configuration files"
    )]
    ConfigConstants,

    #[command(
        about = "Show the plugin class hierarchy",
        long_about = "Shows every plugin below its capability root.\n\n\
                      Examples:\n  \
                      recipedoc hierarchy\n  \
                      recipedoc hierarchy --detailed --format rst"
    )]
    Hierarchy(HierarchyArgs),

    #[command(
        about = "Generate the generic plugin overview (md or rst)",
        long_about = "Generates one section per generic plugin, with its extra parameters, \
                      commonly used parameters, customised steps and an example recipe.\n\n\
                      Examples:\n  \
                      recipedoc overview --format md\n  \
                      recipedoc overview --format rst --examples-dir ./examples"
    )]
    Overview(OverviewArgs),

    #[command(
        about = "List software that recipes are available for",
        long_about = "Scans the recipe search paths and lists every software package. \
                      With --only-installed, only software with an installed module is \
                      kept.\n\n\
                      Examples:\n  \
                      recipedoc software\n  \
                      recipedoc software --detailed --format json\n  \
                      recipedoc software --robot-paths ./easyconfigs --only-installed"
    )]
    Software(SoftwareArgs),

    #[command(about = "List known toolchains and their components")]
    Toolchains,

    #[command(
        name = "toolchain-options",
        about = "List the options of a toolchain"
    )]
    ToolchainOptions(ToolchainOptionsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ParamsArgs {
    #[arg(short = 'p', long, value_name = "PLUGIN", help = "Include the extra parameters of this plugin")]
    pub plugin: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct HierarchyArgs {
    #[arg(long, help = "Show module and source location of every plugin")]
    pub detailed: bool,
}

#[derive(Args, Debug, Clone)]
pub struct OverviewArgs {
    #[arg(
        long,
        value_name = "DIR",
        help = "Directory with <Plugin>.eb example recipes (default: $RECIPEDOC_EXAMPLES_DIR)"
    )]
    pub examples_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SoftwareArgs {
    #[arg(long, help = "List every version with its toolchains")]
    pub detailed: bool,

    #[arg(long, help = "Only list software with an installed module")]
    pub only_installed: bool,

    #[arg(
        long,
        value_name = "PATH",
        value_delimiter = ',',
        help = "Recipe search paths (default: $RECIPEDOC_ROBOT_PATHS)"
    )]
    pub robot_paths: Vec<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ToolchainOptionsArgs {
    #[arg(value_name = "TOOLCHAIN", help = "Toolchain name")]
    pub name: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Txt,
    Md,
    Rst,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Txt => OutputFormat::Txt,
            FormatArg::Md => OutputFormat::Md,
            FormatArg::Rst => OutputFormat::Rst,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_format_is_txt() {
        let args = CliArgs::parse_from(["recipedoc", "licenses"]);
        assert_eq!(args.format, FormatArg::Txt);
        assert!(args.output.is_none());
        assert!(matches!(args.command, Commands::Licenses));
    }

    #[test]
    fn test_params_with_plugin() {
        let args = CliArgs::parse_from(["recipedoc", "params", "--plugin", "CMakeMake", "-f", "md"]);
        assert_eq!(args.format, FormatArg::Md);
        match args.command {
            Commands::Params(params) => assert_eq!(params.plugin.as_deref(), Some("CMakeMake")),
            _ => panic!("Expected Params command"),
        }
    }

    #[test]
    fn test_software_options() {
        let args = CliArgs::parse_from([
            "recipedoc",
            "software",
            "--detailed",
            "--only-installed",
            "--robot-paths",
            "/a,/b",
            "--format",
            "json",
        ]);
        assert_eq!(OutputFormat::from(args.format), OutputFormat::Json);
        match args.command {
            Commands::Software(software) => {
                assert!(software.detailed);
                assert!(software.only_installed);
                assert_eq!(
                    software.robot_paths,
                    vec![PathBuf::from("/a"), PathBuf::from("/b")]
                );
            }
            _ => panic!("Expected Software command"),
        }
    }

    #[test]
    fn test_toolchain_options_name() {
        let args = CliArgs::parse_from(["recipedoc", "toolchain-options", "foss"]);
        match args.command {
            Commands::ToolchainOptions(tc) => assert_eq!(tc.name, "foss"),
            _ => panic!("Expected ToolchainOptions command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::parse_from(["recipedoc", "hierarchy", "--detailed", "-q", "-o", "out.txt"]);
        assert!(args.quiet);
        assert_eq!(args.output, Some(PathBuf::from("out.txt")));
        match args.command {
            Commands::Hierarchy(h) => assert!(h.detailed),
            _ => panic!("Expected Hierarchy command"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(CliArgs::try_parse_from(["recipedoc", "-q", "-v", "templates"]).is_err());
    }

    #[test]
    fn test_invalid_format_rejected() {
        assert!(CliArgs::try_parse_from(["recipedoc", "--format", "yaml", "templates"]).is_err());
    }
}
