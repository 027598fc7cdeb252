use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use regex::Regex;
use tracing::{debug, warn};

use super::{parse_recipe, RecipeRecord, RecipeSource, RECIPE_EXTENSION};
use crate::error::{DocError, DocResult};
use crate::schema::{try_resolve, ConstantRegistry, ParamValue, TemplateRegistry};
use crate::toolchains::is_system_toolchain;

/// Turns a `*`/`?` wildcard pattern into an escaped regex fragment
fn wildcard_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    for c in pattern.chars() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }
    out
}

/// Recipe files named `<name>-<version>*.eb` below any of `search_paths`.
///
/// Both patterns accept `*` and `?` wildcards. Missing search paths are
/// skipped. The result is sorted and free of duplicates.
pub fn find_matching_recipes(
    name_pattern: &str,
    version_pattern: &str,
    search_paths: &[PathBuf],
) -> DocResult<Vec<PathBuf>> {
    let pattern = format!(
        "^{}-{}.*\\.{}$",
        wildcard_to_regex(name_pattern),
        wildcard_to_regex(version_pattern),
        RECIPE_EXTENSION
    );
    let regex = Regex::new(&pattern)
        .map_err(|e| DocError::Configuration(format!("Invalid recipe pattern '{}': {}", pattern, e)))?;

    let mut found = Vec::new();
    for root in search_paths {
        if !root.is_dir() {
            warn!(path = %root.display(), "Recipe search path does not exist, skipping");
            continue;
        }
        for result in WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(false)
            .parents(false)
            .build()
        {
            let entry = match result {
                Ok(e) => e,
                Err(err) => {
                    warn!(error = %err, "Failed to read directory entry");
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
                if regex.is_match(file_name) {
                    found.push(path.to_path_buf());
                }
            }
        }
    }

    found.sort();
    found.dedup();
    debug!(count = found.len(), pattern = %pattern, "matched recipe files");
    Ok(found)
}

/// Recipe source reading `.eb` files below a list of search paths
#[derive(Debug, Clone)]
pub struct FileRecipeSource {
    search_paths: Vec<PathBuf>,
    constants: ConstantRegistry,
    templates: TemplateRegistry,
}

impl FileRecipeSource {
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self::with_registries(
            search_paths,
            &ConstantRegistry::with_defaults(),
            TemplateRegistry::with_defaults(),
        )
    }

    /// Template constants are usable as bare identifiers, like recipe constants
    pub fn with_registries(
        search_paths: Vec<PathBuf>,
        constants: &ConstantRegistry,
        templates: TemplateRegistry,
    ) -> Self {
        let mut constants = constants.clone();
        for (name, value, description) in &templates.constants {
            if constants.get(name).is_none() {
                constants.register(name, ParamValue::str(value.as_str()), description);
            }
        }
        Self {
            search_paths,
            constants,
            templates,
        }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    fn read(&self, path: &Path) -> DocResult<RecipeRecord> {
        let text = fs::read_to_string(path).map_err(|e| DocError::io(path, e))?;
        let params = parse_recipe(&text, &self.constants).map_err(|e| DocError::RecipeSyntax {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(RecipeRecord::new(path, params))
    }

    /// Module name the recipe installs:
    /// `name/<versionprefix><version>-<tc name>-<tc version><versionsuffix>`,
    /// without the toolchain part for the system toolchain
    fn module_name(&self, recipe: &RecipeRecord) -> String {
        let bindings = self.templates.bindings_for(recipe);
        let resolve = |key: &str| {
            let raw = recipe.get_str(key);
            try_resolve(raw, &bindings).unwrap_or_else(|_| raw.to_string())
        };

        let (tc_name, tc_version) = recipe.toolchain();
        let toolchain = if is_system_toolchain(tc_name) {
            String::new()
        } else {
            format!("-{}-{}", tc_name, tc_version)
        };
        format!(
            "{}/{}{}{}{}",
            recipe.name(),
            resolve("versionprefix"),
            recipe.version(),
            toolchain,
            resolve("versionsuffix")
        )
    }
}

impl RecipeSource for FileRecipeSource {
    fn find_matching(&self, name_pattern: &str, version_pattern: &str) -> DocResult<Vec<PathBuf>> {
        find_matching_recipes(name_pattern, version_pattern, &self.search_paths)
    }

    fn shallow_parse(&self, path: &Path) -> DocResult<RecipeRecord> {
        self.read(path)
    }

    fn full_parse(&self, path: &Path) -> DocResult<RecipeRecord> {
        let mut recipe = self.read(path)?;
        for key in ["name", "version"] {
            if recipe.get(key).and_then(|v| v.as_str()).is_none() {
                return Err(DocError::Recipe {
                    path: path.to_path_buf(),
                    message: format!("mandatory parameter '{}' is missing", key),
                });
            }
        }
        recipe.module_name = Some(self.module_name(&recipe));
        Ok(recipe)
    }
}
