use std::collections::HashMap;
use tracing::debug;

use super::PluginDescriptor;
use crate::error::{DocError, DocResult};

/// Maps a declaring module to a human-readable source location
pub trait SourceLocations {
    fn module_location(&self, module: &str) -> Option<String>;
}

impl SourceLocations for HashMap<String, String> {
    fn module_location(&self, module: &str) -> Option<String> {
        self.get(module).cloned()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    roots: Vec<String>,
    plugins: Vec<PluginDescriptor>,
    /// Modules that are expected to contribute at least one plugin
    modules: Vec<String>,
    locations: HashMap<String, String>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        super::defaults::default_registry()
    }

    /// Registers a capability root; roots are walked in registration order
    pub fn register_root(&mut self, root: PluginDescriptor) {
        self.roots.push(root.name.clone());
        self.register(root);
    }

    pub fn register(&mut self, plugin: PluginDescriptor) {
        debug!(plugin = %plugin.name, module = %plugin.module, "registering plugin");
        match self.plugins.iter_mut().find(|p| p.name == plugin.name) {
            Some(existing) => *existing = plugin,
            None => self.plugins.push(plugin),
        }
    }

    /// Declares that `module` ships plugins
    pub fn declare_module(&mut self, module: &str) {
        if !self.modules.iter().any(|m| m == module) {
            self.modules.push(module.to_string());
        }
    }

    pub fn set_location(&mut self, module: &str, location: &str) {
        self.locations
            .insert(module.to_string(), location.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&PluginDescriptor> {
        self.plugins.iter().find(|p| p.name == name)
    }

    pub fn roots(&self) -> Vec<&PluginDescriptor> {
        self.roots.iter().filter_map(|r| self.get(r)).collect()
    }

    pub fn all(&self) -> &[PluginDescriptor] {
        &self.plugins
    }

    /// Direct implementers of `name`, sorted case-insensitively
    pub fn children(&self, name: &str) -> Vec<&PluginDescriptor> {
        let mut children: Vec<&PluginDescriptor> = self
            .plugins
            .iter()
            .filter(|p| p.derives_from(name))
            .collect();
        children.sort_by_key(|p| p.name.to_lowercase());
        children
    }

    /// Whether `name` transitively derives from `ancestor` (or is it)
    pub fn is_subtype_of(&self, name: &str, ancestor: &str) -> bool {
        let mut pending = vec![name];
        let mut seen: Vec<&str> = Vec::new();
        while let Some(current) = pending.pop() {
            if current == ancestor {
                return true;
            }
            if seen.contains(&current) {
                continue;
            }
            seen.push(current);
            if let Some(plugin) = self.get(current) {
                pending.extend(plugin.bases.iter().filter_map(|b| match b {
                    super::BaseRef::Plugin(base) => Some(base.as_str()),
                    super::BaseRef::External(_) => None,
                }));
            }
        }
        false
    }

    /// Every plugin deriving from `root` that is declared in a module under
    /// `package`, sorted by name.
    ///
    /// A declared module that contributes nothing means the package is broken
    /// and is reported as a configuration error.
    pub fn plugins_in_package(
        &self,
        package: &str,
        root: &str,
    ) -> DocResult<Vec<&PluginDescriptor>> {
        let prefix = format!("{}.", package);
        let mut found: Vec<&PluginDescriptor> = Vec::new();

        for module in self
            .modules
            .iter()
            .filter(|m| *m == package || m.starts_with(&prefix))
        {
            let contributed: Vec<&PluginDescriptor> = self
                .plugins
                .iter()
                .filter(|p| &p.module == module && self.is_subtype_of(&p.name, root))
                .collect();
            if contributed.is_empty() {
                return Err(DocError::Configuration(format!(
                    "No plugins found in module: {}",
                    module
                )));
            }
            found.extend(contributed);
        }

        found.sort_by(|a, b| a.name.cmp(&b.name));
        found.dedup_by(|a, b| a.name == b.name);
        Ok(found)
    }
}

impl SourceLocations for PluginRegistry {
    fn module_location(&self, module: &str) -> Option<String> {
        self.locations.module_location(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> PluginRegistry {
        let mut registry = PluginRegistry::new();
        registry.register_root(PluginDescriptor::new("Root", "framework.root"));
        registry.register(PluginDescriptor::new("beta", "pkg.beta").with_base("Root"));
        registry.register(PluginDescriptor::new("Alpha", "pkg.alpha").with_base("Root"));
        registry.register(PluginDescriptor::new("Gamma", "pkg.alpha").with_base("Alpha"));
        registry.declare_module("pkg.alpha");
        registry.declare_module("pkg.beta");
        registry
    }

    #[test]
    fn test_children_sorted_case_insensitively() {
        let registry = registry();
        let names: Vec<_> = registry
            .children("Root")
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Alpha", "beta"]);
    }

    #[test]
    fn test_is_subtype_is_transitive() {
        let registry = registry();
        assert!(registry.is_subtype_of("Gamma", "Root"));
        assert!(registry.is_subtype_of("Root", "Root"));
        assert!(!registry.is_subtype_of("Alpha", "Gamma"));
    }

    #[test]
    fn test_plugins_in_package() {
        let registry = registry();
        let names: Vec<_> = registry
            .plugins_in_package("pkg", "Root")
            .unwrap()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Alpha", "Gamma", "beta"]);
    }

    #[test]
    fn test_empty_module_is_configuration_error() {
        let mut registry = registry();
        registry.declare_module("pkg.empty");
        let err = registry.plugins_in_package("pkg", "Root").unwrap_err();
        match err {
            DocError::Configuration(msg) => assert!(msg.contains("pkg.empty")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_unrelated_package_is_empty() {
        let registry = registry();
        assert!(registry.plugins_in_package("other", "Root").unwrap().is_empty());
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = registry();
        registry.register(PluginDescriptor::new("Alpha", "pkg.alpha").with_doc("new"));
        assert_eq!(registry.get("Alpha").unwrap().doc.as_deref(), Some("new"));
        assert_eq!(registry.all().len(), 4);
    }

    #[test]
    fn test_locations() {
        let mut registry = registry();
        registry.set_location("pkg.alpha", "/src/pkg/alpha.py");
        assert_eq!(
            registry.module_location("pkg.alpha").as_deref(),
            Some("/src/pkg/alpha.py")
        );
        assert!(registry.module_location("pkg.beta").is_none());
    }
}
