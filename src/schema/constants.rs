//! Enumerated constants: licenses, recipe constants and configuration-file
//! constants.

use super::value::ParamValue;

#[derive(Debug, Clone, PartialEq)]
pub struct License {
    pub name: String,
    pub description: String,
    pub version: Option<Vec<u32>>,
}

impl License {
    fn new(name: &str, description: &str, version: Option<&[u32]>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            version: version.map(|v| v.to_vec()),
        }
    }

    pub fn version_string(&self) -> Option<String> {
        self.version.as_ref().map(|v| {
            v.iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(".")
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct LicenseRegistry {
    licenses: Vec<License>,
}

impl LicenseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for license in [
            License::new("LicenseGPLv2", "GNU General Public License v2", Some(&[2])),
            License::new("LicenseGPLv3", "GNU General Public License v3", Some(&[3])),
            License::new("LicenseLGPLv2.1", "GNU Lesser General Public License v2.1", Some(&[2, 1])),
            License::new("LicenseLGPLv3", "GNU Lesser General Public License v3", Some(&[3])),
            License::new("LicenseBSD", "BSD license", None),
            License::new("LicenseMIT", "MIT license", None),
            License::new("LicenseApache2", "Apache License v2", Some(&[2])),
            License::new("LicenseVeryRestrictive", "Default license: strictly private", None),
            License::new("LicenseUnknown", "", None),
        ] {
            registry.register(license);
        }
        registry
    }

    pub fn register(&mut self, license: License) {
        self.licenses.push(license);
    }

    /// All licenses, sorted by name
    pub fn sorted(&self) -> Vec<&License> {
        let mut licenses: Vec<&License> = self.licenses.iter().collect();
        licenses.sort_by(|a, b| a.name.cmp(&b.name));
        licenses
    }
}

/// Named constant usable in recipe files
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeConstant {
    pub name: String,
    pub value: ParamValue,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConstantRegistry {
    constants: Vec<RecipeConstant>,
}

impl ConstantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let system = ParamValue::Dict(vec![
            ("name".to_string(), ParamValue::str("system")),
            ("version".to_string(), ParamValue::str("system")),
        ]);
        let mut registry = Self::new();
        registry.register("EXTERNAL_MODULE", ParamValue::str("EXTERNAL_MODULE"), "External module marker");
        registry.register("HOME", ParamValue::str("$HOME"), "Home directory ($HOME)");
        registry.register("OS_TYPE", ParamValue::str(std::env::consts::OS), "System type (e.g. 'linux' or 'macos')");
        registry.register("OS_PKG_IBVERBS_DEV", ParamValue::Tuple(vec![
            ParamValue::str("libibverbs-dev"),
            ParamValue::str("libibverbs-devel"),
            ParamValue::str("rdma-core-devel"),
        ]), "OS packages providing ibverbs/infiniband development support");
        registry.register("OS_PKG_OPENSSL_DEV", ParamValue::Tuple(vec![
            ParamValue::str("openssl-devel"),
            ParamValue::str("libssl-dev"),
            ParamValue::str("libopenssl-devel"),
        ]), "OS packages providing openSSL development support");
        registry.register("SYSTEM", system, "System toolchain");
        registry.register("TRUE", ParamValue::Bool(true), "Boolean True");
        registry.register("FALSE", ParamValue::Bool(false), "Boolean False");
        registry
    }

    pub fn register(&mut self, name: &str, value: ParamValue, description: &str) {
        self.constants.push(RecipeConstant {
            name: name.to_string(),
            value,
            description: description.to_string(),
        });
    }

    pub fn get(&self, name: &str) -> Option<&RecipeConstant> {
        self.constants.iter().find(|c| c.name == name)
    }

    pub fn sorted(&self) -> Vec<&RecipeConstant> {
        let mut constants: Vec<&RecipeConstant> = self.constants.iter().collect();
        constants.sort_by(|a, b| a.name.cmp(&b.name));
        constants
    }
}

/// Name of the section whose constants are available everywhere
pub const DEFAULT_SECTION: &str = "DEFAULT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFileConstant {
    pub name: String,
    pub value: String,
    pub help: String,
}

/// Constants usable in configuration files, grouped by section in
/// declaration order.
#[derive(Debug, Clone, Default)]
pub struct ConfigFileConstants {
    sections: Vec<(String, Vec<ConfigFileConstant>)>,
}

impl ConfigFileConstants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, section: &str, name: &str, value: &str, help: &str) {
        let constant = ConfigFileConstant {
            name: name.to_string(),
            value: value.to_string(),
            help: help.to_string(),
        };
        match self.sections.iter_mut().find(|(s, _)| s == section) {
            Some((_, constants)) => constants.push(constant),
            None => self.sections.push((section.to_string(), vec![constant])),
        }
    }

    pub fn sections(&self) -> &[(String, Vec<ConfigFileConstant>)] {
        &self.sections
    }
}
