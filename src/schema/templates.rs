//! Template placeholders
//!
//! Recipes may embed `%(name)s` placeholders that are resolved against a
//! per-recipe binding map. The placeholders come from seven namespaces whose
//! order reflects the order in which values are filled in at build time, so a
//! later namespace wins when names collide.

use std::collections::HashMap;
use thiserror::Error;

use super::value::ParamValue;
use crate::recipes::RecipeRecord;

/// Template resolution failures that are safe to recover from
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("no value for template '{0}'")]
    MissingKey(String),

    #[error("template '{key}' needs a {expected} value")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("malformed template string at offset {offset}: {reason}")]
    Malformed { offset: usize, reason: &'static str },
}

pub type TemplateBindings = HashMap<String, ParamValue>;

/// Resolves `%(name)s`-style placeholders in `template`.
///
/// Supported conversions are `s` (plain), `r` (literal form) and `d`/`i`
/// (integer); `%%` yields a literal percent sign.
pub fn try_resolve(template: &str, bindings: &TemplateBindings) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, '%')) => out.push('%'),
            Some((_, '(')) => {
                let mut key = String::new();
                let mut closed = false;
                for (_, k) in chars.by_ref() {
                    if k == ')' {
                        closed = true;
                        break;
                    }
                    key.push(k);
                }
                if !closed {
                    return Err(TemplateError::Malformed {
                        offset,
                        reason: "unterminated template name",
                    });
                }
                let value = bindings
                    .get(&key)
                    .ok_or_else(|| TemplateError::MissingKey(key.clone()))?;
                match chars.next() {
                    Some((_, 's')) => out.push_str(&value.to_string()),
                    Some((_, 'r')) => out.push_str(&value.repr()),
                    Some((_, 'd')) | Some((_, 'i')) => {
                        let number = value.as_int().ok_or(TemplateError::TypeMismatch {
                            key,
                            expected: "integer",
                        })?;
                        out.push_str(&number.to_string());
                    }
                    Some(_) => {
                        return Err(TemplateError::Malformed {
                            offset,
                            reason: "unsupported conversion character",
                        })
                    }
                    None => {
                        return Err(TemplateError::Malformed {
                            offset,
                            reason: "incomplete format",
                        })
                    }
                }
            }
            Some((_, 's')) | Some((_, 'd')) | Some((_, 'r')) => {
                return Err(TemplateError::TypeMismatch {
                    key: String::new(),
                    expected: "mapping key",
                })
            }
            Some(_) => {
                return Err(TemplateError::Malformed {
                    offset,
                    reason: "unsupported format character",
                })
            }
            None => {
                return Err(TemplateError::Malformed {
                    offset,
                    reason: "incomplete format",
                })
            }
        }
    }

    Ok(out)
}

/// Returns true when `s` contains something that looks like a placeholder
pub fn has_placeholder(s: &str) -> bool {
    s.contains("%(")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceKind {
    Static,
    VersionDerived,
    ConfigDerived,
    LowercaseDerived,
    RuntimeDerived,
    Dynamic,
    Constant,
}

impl NamespaceKind {
    pub fn title(&self) -> &'static str {
        match self {
            NamespaceKind::Static => "Template names/values derived from recipe instance",
            NamespaceKind::VersionDerived => "Template names/values for (short) software versions",
            NamespaceKind::ConfigDerived => "Template names/values as set in recipe",
            NamespaceKind::LowercaseDerived => "Lowercase values of template values",
            NamespaceKind::RuntimeDerived => "Template values set outside plugin run step",
            NamespaceKind::Dynamic => "Template values which are defined dynamically",
            NamespaceKind::Constant => "Template constants that can be used in recipes",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    pub placeholder: String,
    pub description: String,
    /// Only set for template constants
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateNamespace {
    pub kind: NamespaceKind,
    pub entries: Vec<TemplateEntry>,
}

/// Role for which major/short/full version placeholders are generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftwareVersionRole {
    pub software: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    pub instance: Vec<(String, String)>,
    pub software_versions: Vec<SoftwareVersionRole>,
    pub config: Vec<String>,
    pub lower: Vec<String>,
    pub runtime: Vec<(String, String)>,
    pub dynamic: Vec<(String, String)>,
    /// (name, value, description)
    pub constants: Vec<(String, String, String)>,
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

fn placeholder(name: &str) -> String {
    format!("%({})s", name)
}

/// Name of the lowercase variant of a template value
pub fn lower_template_name(name: &str) -> String {
    format!("{}lower", name)
}

impl TemplateRegistry {
    pub fn with_defaults() -> Self {
        Self {
            instance: pairs(&[
                ("module_name", "Module name"),
                ("nameletter", "First letter of software name"),
                ("toolchain_name", "Toolchain name"),
                ("toolchain_version", "Toolchain version"),
                ("version_major_minor", "Major.Minor version"),
                ("version_major", "Major version"),
                ("version_minor", "Minor version"),
            ]),
            software_versions: [
                ("CUDA", "cuda"),
                ("Java", "java"),
                ("Perl", "perl"),
                ("Python", "py"),
                ("R", "r"),
            ]
            .iter()
            .map(|(software, prefix)| SoftwareVersionRole {
                software: software.to_string(),
                prefix: prefix.to_string(),
            })
            .collect(),
            config: [
                "bitbucket_account",
                "github_account",
                "name",
                "parallel",
                "version",
                "versionsuffix",
                "versionprefix",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            lower: vec!["name".to_string(), "nameletter".to_string()],
            runtime: pairs(&[
                ("builddir", "Build directory"),
                ("installdir", "Installation directory"),
                ("start_dir", "Directory in which the build process begins"),
            ]),
            dynamic: pairs(&[
                ("arch", "System architecture (e.g. x86_64, aarch64, ppc64le, ...)"),
                ("sysroot", "Location root directory of system, prefix for standard paths like /usr/lib and /usr/include"),
                ("mpi_cmd_prefix", "Prefix command for running MPI programs (with default number of ranks)"),
                ("cuda_compute_capabilities", "Comma-separated list of CUDA compute capabilities"),
                ("software_commit", "Git commit id to use for the software as specified on the command line"),
            ]),
            constants: [
                ("GITHUB_SOURCE", "https://github.com/%(github_account)s/%(name)s/archive", "GitHub source URL"),
                ("GITHUB_RELEASE", "https://github.com/%(github_account)s/%(name)s/releases/download/v%(version)s", "GitHub release URL"),
                ("PYPI_SOURCE", "https://pypi.python.org/packages/source/%(nameletter)s/%(name)s", "PyPI source URL"),
                ("SOURCEFORGE_SOURCE", "https://download.sourceforge.net/%(namelower)s", "SourceForge source URL"),
                ("SOURCE_TAR_GZ", "%(name)s-%(version)s.tar.gz", "Source .tar.gz bundle"),
                ("SOURCELOWER_TAR_GZ", "%(namelower)s-%(version)s.tar.gz", "Source .tar.gz bundle with lowercase name"),
                ("SOURCE_ZIP", "%(name)s-%(version)s.zip", "Source .zip bundle"),
                ("SHLIB_EXT", "so", "Extension for shared libraries"),
            ]
            .iter()
            .map(|(n, v, d)| (n.to_string(), v.to_string(), d.to_string()))
            .collect(),
        }
    }

    /// All namespaces, in resolution order
    pub fn namespaces(&self) -> Vec<TemplateNamespace> {
        let described = |kind, items: &[(String, String)]| TemplateNamespace {
            kind,
            entries: items
                .iter()
                .map(|(name, doc)| TemplateEntry {
                    placeholder: placeholder(name),
                    description: doc.clone(),
                    value: None,
                })
                .collect(),
        };

        let mut versions = Vec::with_capacity(self.software_versions.len() * 3);
        for role in &self.software_versions {
            versions.extend(version_entries(role));
        }

        vec![
            described(NamespaceKind::Static, &self.instance),
            TemplateNamespace {
                kind: NamespaceKind::VersionDerived,
                entries: versions,
            },
            TemplateNamespace {
                kind: NamespaceKind::ConfigDerived,
                entries: self
                    .config
                    .iter()
                    .map(|name| TemplateEntry {
                        placeholder: placeholder(name),
                        description: String::new(),
                        value: None,
                    })
                    .collect(),
            },
            TemplateNamespace {
                kind: NamespaceKind::LowercaseDerived,
                entries: self
                    .lower
                    .iter()
                    .map(|name| TemplateEntry {
                        placeholder: placeholder(&lower_template_name(name)),
                        description: format!("lower case of value of {}", name),
                        value: None,
                    })
                    .collect(),
            },
            described(NamespaceKind::RuntimeDerived, &self.runtime),
            described(NamespaceKind::Dynamic, &self.dynamic),
            TemplateNamespace {
                kind: NamespaceKind::Constant,
                entries: self
                    .constants
                    .iter()
                    .map(|(name, value, doc)| TemplateEntry {
                        placeholder: name.clone(),
                        description: doc.clone(),
                        value: Some(value.clone()),
                    })
                    .collect(),
            },
        ]
    }

    /// Template values available for resolving placeholders in `recipe`
    pub fn bindings_for(&self, recipe: &RecipeRecord) -> TemplateBindings {
        let mut bindings = TemplateBindings::new();

        for name in &self.config {
            if let Some(value) = recipe.get(name) {
                bindings.insert(name.clone(), value.clone());
            }
        }

        let (tc_name, tc_version) = recipe.toolchain();
        bindings.insert("toolchain_name".to_string(), ParamValue::str(tc_name));
        bindings.insert("toolchain_version".to_string(), ParamValue::str(tc_version));

        let name = recipe.name();
        if let Some(letter) = name.chars().next() {
            bindings.insert("nameletter".to_string(), ParamValue::str(letter.to_string()));
        }

        let version = recipe.version();
        let mut parts = version.split('.');
        if let Some(major) = parts.next().filter(|p| !p.is_empty()) {
            bindings.insert("version_major".to_string(), ParamValue::str(major));
            if let Some(minor) = parts.next() {
                bindings.insert("version_minor".to_string(), ParamValue::str(minor));
                bindings.insert(
                    "version_major_minor".to_string(),
                    ParamValue::str(format!("{}.{}", major, minor)),
                );
            }
        }

        for (dep_name, dep_version) in recipe.dependencies() {
            if let Some(role) = self
                .software_versions
                .iter()
                .find(|role| role.software == dep_name)
            {
                let mut parts = dep_version.split('.');
                let major = parts.next().unwrap_or_default().to_string();
                let short = match parts.next() {
                    Some(minor) => format!("{}.{}", major, minor),
                    None => major.clone(),
                };
                bindings.insert(format!("{}majver", role.prefix), ParamValue::str(major));
                bindings.insert(format!("{}shortver", role.prefix), ParamValue::str(short));
                bindings.insert(format!("{}ver", role.prefix), ParamValue::str(dep_version));
            }
        }

        for name in &self.lower {
            if let Some(value) = bindings.get(name).and_then(|v| v.as_str()) {
                let lowered = ParamValue::str(value.to_lowercase());
                bindings.insert(lower_template_name(name), lowered);
            }
        }

        for (name, value, _) in &self.constants {
            bindings
                .entry(name.clone())
                .or_insert_with(|| ParamValue::str(value.as_str()));
        }

        if let Some(module_name) = &recipe.module_name {
            bindings.insert("module_name".to_string(), ParamValue::str(module_name.as_str()));
        }

        bindings
    }
}

fn version_entries(role: &SoftwareVersionRole) -> [TemplateEntry; 3] {
    let entry = |suffix: &str, description: String| TemplateEntry {
        placeholder: placeholder(&format!("{}{}", role.prefix, suffix)),
        description,
        value: None,
    };
    [
        entry("majver", format!("major version for {}", role.software)),
        entry(
            "shortver",
            format!("short version for {} (<major>.<minor>)", role.software),
        ),
        entry("ver", format!("full version for {}", role.software)),
    ]
}
