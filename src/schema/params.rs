//! Recipe parameter schema
//!
//! The base schema lists every parameter a recipe may set, with its default
//! value, description and category. Plugins declare extra parameters that get
//! merged on top of a copy of the base schema when documenting that plugin.

use std::collections::HashMap;

use super::value::ParamValue;

/// Parameter category, in documentation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Hidden,
    Mandatory,
    Custom,
    Toolchain,
    Build,
    FileManagement,
    Dependencies,
    License,
    Extensions,
    Modules,
    Other,
}

impl Category {
    /// All categories in their fixed display order
    pub fn sorted() -> &'static [Category] {
        &[
            Category::Hidden,
            Category::Mandatory,
            Category::Custom,
            Category::Toolchain,
            Category::Build,
            Category::FileManagement,
            Category::Dependencies,
            Category::License,
            Category::Extensions,
            Category::Modules,
            Category::Other,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Hidden => "hidden",
            Category::Mandatory => "mandatory",
            Category::Custom => "plugin-specific",
            Category::Toolchain => "toolchain",
            Category::Build => "build",
            Category::FileManagement => "file-management",
            Category::Dependencies => "dependencies",
            Category::License => "license",
            Category::Extensions => "extensions",
            Category::Modules => "modules",
            Category::Other => "other",
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, Category::Hidden)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub default: ParamValue,
    pub description: String,
    pub category: Category,
    pub alternative_name: Option<String>,
    pub plugin_specific: bool,
}

impl ParameterDescriptor {
    pub fn new(
        name: &str,
        default: ParamValue,
        description: &str,
        category: Category,
    ) -> Self {
        Self {
            name: name.to_string(),
            default,
            description: description.to_string(),
            category,
            alternative_name: None,
            plugin_specific: false,
        }
    }

    /// Extra parameter declared by a plugin, always in the custom category
    /// unless stated otherwise.
    pub fn extra(name: &str, default: ParamValue, description: &str) -> Self {
        Self {
            plugin_specific: true,
            ..Self::new(name, default, description, Category::Custom)
        }
    }

    pub fn hidden(&self) -> bool {
        self.category.is_hidden()
    }
}

/// Base recipe parameter schema
#[derive(Debug, Clone, Default)]
pub struct ParameterSchema {
    params: Vec<ParameterDescriptor>,
    /// alternative name -> canonical name
    alternatives: Vec<(String, String)>,
}

impl ParameterSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut schema = Self::new();
        for (name, default, description, category) in default_parameters() {
            schema.insert(ParameterDescriptor::new(name, default, description, category));
        }
        for (alternative, canonical) in ALTERNATIVE_PARAMETERS {
            schema.add_alternative(alternative, canonical);
        }
        schema
    }

    /// Inserts a parameter, replacing any existing one with the same name
    pub fn insert(&mut self, param: ParameterDescriptor) {
        match self.params.iter_mut().find(|p| p.name == param.name) {
            Some(existing) => *existing = param,
            None => self.params.push(param),
        }
    }

    pub fn add_alternative(&mut self, alternative: &str, canonical: &str) {
        self.alternatives
            .push((alternative.to_string(), canonical.to_string()));
    }

    pub fn get(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn params(&self) -> &[ParameterDescriptor] {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Reverse mapping: canonical name -> alternative name
    pub fn alternative_names(&self) -> HashMap<String, String> {
        self.alternatives
            .iter()
            .map(|(alt, canonical)| (canonical.clone(), alt.clone()))
            .collect()
    }

    /// Copy of this schema with a plugin's extra parameters merged in.
    ///
    /// `self` is left untouched; every merged-in parameter is flagged as
    /// plugin specific, also when it overrides a base parameter.
    pub fn merged_with(&self, extra: &[ParameterDescriptor]) -> ParameterSchema {
        let mut merged = self.clone();
        for param in extra {
            merged.insert(ParameterDescriptor {
                plugin_specific: true,
                ..param.clone()
            });
        }
        let reverse = merged.alternative_names();
        for param in &mut merged.params {
            param.alternative_name = reverse.get(&param.name).cloned();
        }
        merged
    }
}

const ALTERNATIVE_PARAMETERS: &[(&str, &str)] = &[
    ("build_deps", "builddependencies"),
    ("deps", "dependencies"),
    ("env_mod_class", "moduleclass"),
    ("env_mod_extra_paths", "modextrapaths"),
    ("env_mod_extra_vars", "modextravars"),
    ("env_mod_load_msg", "modloadmsg"),
    ("post_install_cmds", "postinstallcmds"),
];

fn default_parameters() -> Vec<(&'static str, ParamValue, &'static str, Category)> {
    use Category::*;
    use ParamValue as V;

    vec![
        ("parsed_by_generator", V::Bool(false), "Internal flag set when a recipe was produced by a generator", Hidden),
        ("internal_stage", V::str(""), "Internal marker for the stage currently being processed", Hidden),
        ("name", V::None, "Name of software", Mandatory),
        ("version", V::None, "Version of software", Mandatory),
        ("toolchain", V::None, "Name and version of toolchain", Mandatory),
        ("description", V::None, "A short description of the software", Mandatory),
        ("homepage", V::None, "The homepage of the software", Mandatory),
        ("toolchainopts", V::None, "Extra options for compilers", Toolchain),
        ("onlytcmod", V::Bool(false), "Boolean/string to indicate if the toolchain should only load the environment with module (True) or also set all other variables (False) like compiler CC etc", Toolchain),
        ("easyblock", V::None, "Plugin to use for building; if set to None, a plugin is selected based on the software name", Build),
        ("versionsuffix", V::str(""), "Additional suffix for software version (placed after toolchain name)", Build),
        ("versionprefix", V::str(""), "Additional prefix for software version (placed before version and toolchain name)", Build),
        ("configopts", V::str(""), "Extra options passed to configure (default already has --prefix)", Build),
        ("buildopts", V::str(""), "Extra options passed to make step (default already has -j X)", Build),
        ("installopts", V::str(""), "Extra options for installation", Build),
        ("preconfigopts", V::str(""), "Extra options pre-passed to configure.", Build),
        ("prebuildopts", V::str(""), "Extra options pre-passed to build command.", Build),
        ("preinstallopts", V::str(""), "Extra prefix options for installation.", Build),
        ("postinstallcmds", V::List(vec![]), "Commands to run after the install step.", Build),
        ("parallel", V::None, "Degree of parallelism for e.g. make (default: based on the number of cores and restrictions in ulimit)", Build),
        ("runtest", V::None, "Indicates if a test should be run after make; should specify argument after make (for e.g.,\"test\" for make test)", Build),
        ("sanity_check_paths", V::Dict(vec![]), "List of files and directories to check (format: {'files':<list>, 'dirs':<list>})", Build),
        ("sanity_check_commands", V::List(vec![]), "format: [(name, options)] e.g. [('gzip','-h')]. Using a non-tuple is equivalent to (name, '-h')", Build),
        ("start_dir", V::None, "Path to start the make in. If the path is absolute, use that path. If not, this is added to the guessed path.", Build),
        ("unpack_options", V::str(""), "Extra options for unpacking source", Build),
        ("buildininstalldir", V::Bool(false), "Boolean to build (True) or not build (False) in the installation directory", FileManagement),
        ("keeppreviousinstall", V::Bool(false), "Boolean to keep the previous installation with identical name. Experts only!", FileManagement),
        ("keepsymlinks", V::Bool(true), "Boolean to determine whether symlinks are to be kept during copying or if the content of the files pointed to should be copied", FileManagement),
        ("sources", V::List(vec![]), "List of source files", FileManagement),
        ("source_urls", V::List(vec![]), "List of URLs for source files", FileManagement),
        ("patches", V::List(vec![]), "List of patches to apply", FileManagement),
        ("checksums", V::List(vec![]), "Checksums for sources and patches", FileManagement),
        ("dependencies", V::List(vec![]), "List of dependencies", Dependencies),
        ("builddependencies", V::List(vec![]), "List of build dependencies", Dependencies),
        ("hiddendependencies", V::List(vec![]), "List of dependencies available as hidden modules", Dependencies),
        ("osdependencies", V::List(vec![]), "OS dependencies that should be present on the system", Dependencies),
        ("software_license", V::None, "Software license", License),
        ("license_file", V::None, "License file for software", License),
        ("group", V::None, "Name of the user group for which the software should be available; format: string or 2-tuple with group name + custom error for users outside group", License),
        ("exts_list", V::List(vec![]), "List with extensions added to the base installation", Extensions),
        ("exts_defaultclass", V::None, "List of module for and name of the default extension class", Extensions),
        ("exts_filter", V::None, "Extension filter details: template for cmd and input to cmd (templates for ext_name, ext_version and src).", Extensions),
        ("moduleclass", V::str("base"), "Module class to be used for this software", Modules),
        ("modextrapaths", V::Dict(vec![]), "Extra paths to be prepended in module file", Modules),
        ("modextravars", V::Dict(vec![]), "Extra environment variables to be added to module file", Modules),
        ("modloadmsg", V::Dict(vec![]), "Message that should be printed when generated module is loaded", Modules),
        ("whatis", V::None, "List of brief (one line) description entries for the software", Modules),
        ("buildstats", V::None, "A list of dicts with build statistics", Other),
        ("deprecated", V::Bool(false), "String specifying reason why this recipe is deprecated and will be archived in the next major release", Other),
    ]
}
