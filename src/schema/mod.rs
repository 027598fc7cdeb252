//! Read-only registries describing what a recipe may contain
//!
//! - [`params`]: recipe parameters grouped by category
//! - [`templates`]: template placeholder namespaces and resolution
//! - [`constants`]: licenses, recipe constants and config-file constants
//! - [`value`]: literal values shared by all of the above

pub mod constants;
pub mod params;
pub mod templates;
pub mod value;

pub use constants::{
    ConfigFileConstant, ConfigFileConstants, ConstantRegistry, License, LicenseRegistry,
    RecipeConstant, DEFAULT_SECTION,
};
pub use params::{Category, ParameterDescriptor, ParameterSchema};
pub use templates::{
    try_resolve, NamespaceKind, TemplateBindings, TemplateEntry, TemplateError,
    TemplateNamespace, TemplateRegistry,
};
pub use value::{quote_str, ParamValue};
