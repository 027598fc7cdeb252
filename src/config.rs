//! Configuration management for recipedoc
//!
//! Settings are loaded from environment variables with sensible defaults.
//! They decide where recipes and installed modules are looked up, where the
//! plugin overview finds its example recipes, and how chatty the tool is.
//!
//! # Environment Variables
//!
//! - `RECIPEDOC_ROBOT_PATHS`: recipe search roots, separated like `PATH` - default: `~/.local/easybuild/easyconfigs`
//! - `MODULEPATH`: module search roots for the installed-module filter - default: none
//! - `RECIPEDOC_EXAMPLES_DIR`: directory holding `<Plugin>.eb` example recipes - default: none
//! - `RECIPEDOC_PREFIX`: installation prefix documented as `DEFAULT_PREFIX` - default: `~/.local/easybuild`
//! - `RECIPEDOC_SILENT`: hide progress output (true|false) - default: "false"
//! - `RECIPEDOC_LOG_LEVEL`: logging level - default: "warn"
//!
//! # Example
//!
//! ```no_run
//! use recipedoc::DocsConfig;
//!
//! let config = DocsConfig::default();
//! config.validate().expect("invalid configuration");
//! println!("{}", config);
//! ```

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::schema::constants::DEFAULT_SECTION;
use crate::schema::ConfigFileConstants;

/// Matches the level the binary's subscriber falls back to
pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const DEFAULT_SILENT: bool = false;

/// Section of the configuration file holding general options
const MAIN_SECTION: &str = "MAIN";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),
}

/// Runtime configuration of the documentation generator
#[derive(Debug, Clone)]
pub struct DocsConfig {
    /// Roots searched for recipe files
    pub robot_paths: Vec<PathBuf>,
    /// Roots scanned for installed module files
    pub module_paths: Vec<PathBuf>,
    /// Directory with example recipes for the plugin overview
    pub examples_dir: Option<PathBuf>,
    /// Installation prefix
    pub prefix: PathBuf,
    pub silent: bool,
    pub log_level: String,
}

fn user_home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

fn default_prefix() -> PathBuf {
    user_home().join(".local").join("easybuild")
}

fn path_list(var: &str) -> Option<Vec<PathBuf>> {
    env::var_os(var).map(|value| {
        env::split_paths(&value)
            .filter(|p| !p.as_os_str().is_empty())
            .collect()
    })
}

fn silent_from_env() -> Result<bool, ConfigError> {
    match env::var("RECIPEDOC_SILENT") {
        Ok(value) => value.parse::<bool>().map_err(|_| {
            ConfigError::ParseError(format!(
                "RECIPEDOC_SILENT must be 'true' or 'false', got '{}'",
                value
            ))
        }),
        Err(_) => Ok(DEFAULT_SILENT),
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        let prefix = env::var("RECIPEDOC_PREFIX")
            .ok()
            .map(PathBuf::from)
            .unwrap_or_else(default_prefix);

        let robot_paths = path_list("RECIPEDOC_ROBOT_PATHS")
            .unwrap_or_else(|| vec![prefix.join("easyconfigs")]);

        let module_paths = path_list("MODULEPATH").unwrap_or_default();

        let examples_dir = env::var("RECIPEDOC_EXAMPLES_DIR")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let silent = silent_from_env().unwrap_or(DEFAULT_SILENT);

        let log_level = env::var("RECIPEDOC_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            robot_paths,
            module_paths,
            examples_dir,
            prefix,
            silent,
            log_level,
        }
    }
}

fn require_dir(kind: &str, path: &Path) -> Result<(), ConfigError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ConfigError::ValidationFailed(format!(
            "{} does not exist or is not a directory: {}",
            kind,
            path.display()
        )))
    }
}

impl DocsConfig {
    /// Configuration from the environment, rejecting values that do not parse
    ///
    /// [`Default`] falls back to the default for such values instead.
    pub fn from_env() -> Result<Self, ConfigError> {
        let silent = silent_from_env()?;
        Ok(Self {
            silent,
            ..Self::default()
        })
    }

    /// Validates the configuration
    ///
    /// Checks that the log level is known and that the example directory
    /// exists when one is set. Missing recipe and module roots are skipped
    /// with a warning at scan time instead.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any validation fails
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        if let Some(dir) = &self.examples_dir {
            require_dir("Examples directory", dir)?;
        }

        Ok(())
    }

    /// Like [`validate`](Self::validate), but also requires every recipe
    /// search root to exist
    pub fn validate_robot_paths(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.robot_paths.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "No recipe search paths configured".to_string(),
            ));
        }
        for path in &self.robot_paths {
            require_dir("Recipe search path", path)?;
        }
        Ok(())
    }

    /// Constants usable in configuration files, with the values they take
    /// under this configuration
    pub fn config_file_constants(&self) -> ConfigFileConstants {
        let joined = |paths: &[PathBuf]| {
            paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(":")
        };
        let user = env::var("USER").unwrap_or_default();

        let mut constants = ConfigFileConstants::new();
        constants.add(
            DEFAULT_SECTION,
            "DEFAULT_REPOSITORYPATH",
            &self.prefix.join("ebfiles_repo").display().to_string(),
            "Default repository path",
        );
        constants.add(
            DEFAULT_SECTION,
            "DEFAULT_ROBOT_PATHS",
            &joined(&self.robot_paths),
            "List of default robot paths (':'-separated)",
        );
        constants.add(
            DEFAULT_SECTION,
            "HOME",
            &user_home().display().to_string(),
            "Current user's home directory, expanded '~'",
        );
        constants.add(DEFAULT_SECTION, "USER", &user, "Current username, translated uid from password file");
        constants.add(
            MAIN_SECTION,
            "DEFAULT_PREFIX",
            &self.prefix.display().to_string(),
            "Default installation prefix",
        );
        constants
    }
}

impl fmt::Display for DocsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Recipedoc Configuration:")?;
        for path in &self.robot_paths {
            writeln!(f, "  Robot Path: {}", path.display())?;
        }
        for path in &self.module_paths {
            writeln!(f, "  Module Path: {}", path.display())?;
        }
        if let Some(ref dir) = self.examples_dir {
            writeln!(f, "  Examples Dir: {}", dir.display())?;
        }
        writeln!(f, "  Prefix: {}", self.prefix.display())?;
        writeln!(f, "  Silent: {}", self.silent)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
