use recipedoc::cli::{handle_command, CliArgs};
use recipedoc::util::logging::{self, LoggingConfig};
use recipedoc::{DocsConfig, VERSION};

use clap::Parser;
use std::env;
use tracing::debug;

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("recipedoc v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match load_config() {
        Ok(config) => handle_command(&args, &config),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

fn load_config() -> anyhow::Result<DocsConfig> {
    let config = DocsConfig::from_env()?;
    config.validate()?;
    debug!("{}", config);
    Ok(config)
}

fn init_logging_from_args(args: &CliArgs) {
    let env_level = env::var("RECIPEDOC_LOG_LEVEL").ok();
    let level = args.log_level.as_deref().or(env_level.as_deref());
    let config = LoggingConfig::from_flags(level, args.verbose, args.quiet).json(logging::json_from_env());
    logging::init_logging(config);
}
