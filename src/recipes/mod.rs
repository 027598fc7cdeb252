//! Recipe files and installed modules
//!
//! Recipes are read through [`RecipeSource`] and installed modules are
//! queried through [`ModuleOracle`], so catalogs can be built against the
//! filesystem or against in-memory fixtures.

pub mod modules;
pub mod parser;
pub mod resolver;

pub use modules::{ModulePathOracle, StaticModules};
pub use parser::{parse_recipe, RecipeParseError};
pub use resolver::{find_matching_recipes, FileRecipeSource};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::DocResult;
use crate::schema::ParamValue;
use crate::toolchains::SYSTEM_TOOLCHAIN_NAME;

/// File extension of recipe files
pub const RECIPE_EXTENSION: &str = "eb";

/// Parsed recipe parameters, in file order
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeRecord {
    pub path: PathBuf,
    pub params: Vec<(String, ParamValue)>,
    /// Only known after a full parse
    pub module_name: Option<String>,
}

impl RecipeRecord {
    pub fn new(path: impl Into<PathBuf>, params: Vec<(String, ParamValue)>) -> Self {
        Self {
            path: path.into(),
            params,
            module_name: None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// String value of `key`, or an empty string when unset or not a string
    pub fn get_str(&self, key: &str) -> &str {
        self.get(key).and_then(|v| v.as_str()).unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.get_str("name")
    }

    pub fn version(&self) -> &str {
        self.get_str("version")
    }

    /// Toolchain name and version; recipes without one use the system toolchain
    pub fn toolchain(&self) -> (&str, &str) {
        match self.get("toolchain") {
            Some(tc) => (
                tc.get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or(SYSTEM_TOOLCHAIN_NAME),
                tc.get("version").and_then(|v| v.as_str()).unwrap_or_default(),
            ),
            None => (SYSTEM_TOOLCHAIN_NAME, ""),
        }
    }

    /// (name, version) of runtime and build dependencies
    pub fn dependencies(&self) -> Vec<(String, String)> {
        ["dependencies", "builddependencies"]
            .iter()
            .filter_map(|key| self.get(key))
            .flat_map(|deps| deps.items().iter())
            .filter_map(|dep| {
                let items = dep.items();
                match (items.first()?.as_str(), items.get(1)?.as_str()) {
                    (Some(name), Some(version)) => Some((name.to_string(), version.to_string())),
                    _ => None,
                }
            })
            .collect()
    }
}

pub trait RecipeSource {
    /// Recipe files whose name and version match the given wildcard patterns
    fn find_matching(&self, name_pattern: &str, version_pattern: &str) -> DocResult<Vec<PathBuf>>;

    /// Cheap parse that only reads the parameters
    fn shallow_parse(&self, path: &Path) -> DocResult<RecipeRecord>;

    /// Parse that also resolves the name of the module the recipe installs
    fn full_parse(&self, path: &Path) -> DocResult<RecipeRecord>;
}

pub trait ModuleOracle {
    fn available_modules(&self) -> DocResult<HashSet<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> RecipeRecord {
        RecipeRecord::new(
            "Foo-1.0.eb",
            vec![
                ("name".to_string(), ParamValue::str("Foo")),
                ("version".to_string(), ParamValue::str("1.0")),
                (
                    "toolchain".to_string(),
                    ParamValue::Dict(vec![
                        ("name".to_string(), ParamValue::str("foss")),
                        ("version".to_string(), ParamValue::str("2023a")),
                    ]),
                ),
                (
                    "dependencies".to_string(),
                    ParamValue::List(vec![
                        ParamValue::Tuple(vec![ParamValue::str("Python"), ParamValue::str("3.11.3")]),
                        ParamValue::Tuple(vec![ParamValue::str("broken")]),
                    ]),
                ),
                (
                    "builddependencies".to_string(),
                    ParamValue::List(vec![ParamValue::Tuple(vec![
                        ParamValue::str("CMake"),
                        ParamValue::str("3.26.3"),
                    ])]),
                ),
            ],
        )
    }

    #[test]
    fn test_accessors() {
        let r = record();
        assert_eq!(r.name(), "Foo");
        assert_eq!(r.version(), "1.0");
        assert_eq!(r.get_str("homepage"), "");
        assert_eq!(r.toolchain(), ("foss", "2023a"));
    }

    #[test]
    fn test_missing_toolchain_is_system() {
        let r = RecipeRecord::new("x.eb", vec![]);
        assert_eq!(r.toolchain(), (SYSTEM_TOOLCHAIN_NAME, ""));
    }

    #[test]
    fn test_dependencies_skip_malformed_entries() {
        assert_eq!(
            record().dependencies(),
            vec![
                ("Python".to_string(), "3.11.3".to_string()),
                ("CMake".to_string(), "3.26.3".to_string()),
            ]
        );
    }
}
