//! Plugin registry
//!
//! Plugins implement build-step capabilities. Every plugin is registered
//! explicitly with its declaring module, an ordered list of base references
//! and the extra recipe parameters it understands. Parent/child edges are
//! derived from the base lists on demand, so the hierarchy is recomputed on
//! every query instead of being stored.

pub mod defaults;
pub mod registry;

pub use registry::{PluginRegistry, SourceLocations};

use crate::schema::ParameterDescriptor;

/// Capability root for build-step plugins
pub const EASYBLOCK_ROOT: &str = "EasyBlock";

/// Capability root for extension plugins
pub const EXTENSION_ROOT: &str = "Extension";

/// Reference to a base of a plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseRef {
    /// Another registered plugin (or capability root)
    Plugin(String),
    /// A type outside the registry; rendered but never walked
    External(String),
}

impl BaseRef {
    pub fn name(&self) -> &str {
        match self {
            BaseRef::Plugin(name) | BaseRef::External(name) => name,
        }
    }
}

/// A build step a plugin customises, with its documentation (if any)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepHook {
    pub name: String,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PluginDescriptor {
    pub name: String,
    pub module: String,
    pub bases: Vec<BaseRef>,
    pub doc: Option<String>,
    pub extra_params: Vec<ParameterDescriptor>,
    /// Steps defined by this plugin itself, not inherited ones
    pub steps: Vec<StepHook>,
}

impl PluginDescriptor {
    pub fn new(name: &str, module: &str) -> Self {
        Self {
            name: name.to_string(),
            module: module.to_string(),
            bases: Vec::new(),
            doc: None,
            extra_params: Vec::new(),
            steps: Vec::new(),
        }
    }

    pub fn with_base(mut self, base: &str) -> Self {
        self.bases.push(BaseRef::Plugin(base.to_string()));
        self
    }

    pub fn with_external_base(mut self, base: &str) -> Self {
        self.bases.push(BaseRef::External(base.to_string()));
        self
    }

    pub fn with_doc(mut self, doc: &str) -> Self {
        self.doc = Some(doc.to_string());
        self
    }

    pub fn with_extra(mut self, param: ParameterDescriptor) -> Self {
        self.extra_params.push(param);
        self
    }

    pub fn with_step(mut self, name: &str, doc: Option<&str>) -> Self {
        self.steps.push(StepHook {
            name: name.to_string(),
            doc: doc.map(str::to_string),
        });
        self
    }

    /// Extra recipe parameters declared by this plugin
    pub fn declared_extra_parameters(&self) -> &[ParameterDescriptor] {
        &self.extra_params
    }

    pub fn derives_from(&self, name: &str) -> bool {
        self.bases
            .iter()
            .any(|b| matches!(b, BaseRef::Plugin(base) if base == name))
    }

    /// Own definition of step `name`, if this plugin defines it
    pub fn own_step(&self, name: &str) -> Option<&StepHook> {
        self.steps.iter().find(|s| s.name == name)
    }
}
