use std::collections::HashSet;
use std::path::PathBuf;

use ignore::WalkBuilder;
use tracing::{debug, warn};

use super::ModuleOracle;
use crate::error::DocResult;

/// Suffix of Lmod module files, stripped from module names
const LUA_SUFFIX: &str = ".lua";

/// Finds installed modules by scanning module roots: every file at
/// `<root>/<name>/<version>[.lua]` is the module `name/version`.
#[derive(Debug, Clone, Default)]
pub struct ModulePathOracle {
    roots: Vec<PathBuf>,
}

impl ModulePathOracle {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }
}

impl ModuleOracle for ModulePathOracle {
    fn available_modules(&self) -> DocResult<HashSet<String>> {
        let mut modules = HashSet::new();
        for root in &self.roots {
            if !root.is_dir() {
                warn!(path = %root.display(), "Module path does not exist, skipping");
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
                if !entry.path().is_file() {
                    continue;
                }
                let Ok(relative) = entry.path().strip_prefix(root) else {
                    continue;
                };
                let name = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                if !name.contains('/') {
                    continue;
                }
                let name = name.strip_suffix(LUA_SUFFIX).unwrap_or(&name).to_string();
                modules.insert(name);
            }
        }
        debug!(count = modules.len(), "available modules");
        Ok(modules)
    }
}

/// Fixed set of module names
#[derive(Debug, Clone, Default)]
pub struct StaticModules(pub HashSet<String>);

impl StaticModules {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }
}

impl ModuleOracle for StaticModules {
    fn available_modules(&self) -> DocResult<HashSet<String>> {
        Ok(self.0.clone())
    }
}
