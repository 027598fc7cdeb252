//! License, recipe-constant and configuration-file constant listings

use crate::error::DocResult;
use crate::format::ReportKind;
use crate::render::{
    literal, md_title_and_table, rst_heading, rst_title_and_table, titles, RendererTable,
    INDENT_4SPACES,
};
use crate::schema::{
    ConfigFileConstant, ConfigFileConstants, ConstantRegistry, License, LicenseRegistry,
    RecipeConstant, DEFAULT_SECTION,
};

const LICENSE_TITLE: &str = "License constants that can be used in recipes";
const CONSTANT_TITLE: &str = "Constants that can be used in recipes";
const CONFIG_FILE_TITLE: &str = "Constants available (only) in configuration files";

#[derive(Debug, Clone, PartialEq)]
pub struct LicenseCatalog {
    pub licenses: Vec<License>,
}

pub fn build_licenses(registry: &LicenseRegistry) -> LicenseCatalog {
    LicenseCatalog {
        licenses: registry.sorted().into_iter().cloned().collect(),
    }
}

fn licenses_txt(catalog: &LicenseCatalog) -> DocResult<String> {
    let mut doc = vec![LICENSE_TITLE.to_string()];
    for license in &catalog.licenses {
        let mut line = format!("{}{}: {}", INDENT_4SPACES, license.name, license.description);
        if let Some(version) = license.version_string() {
            line.push_str(&format!(" (version: {})", version));
        }
        doc.push(line);
    }
    Ok(doc.join("\n"))
}

fn license_columns(catalog: &LicenseCatalog) -> (Vec<String>, Vec<Vec<String>>) {
    let columns = vec![
        catalog.licenses.iter().map(|l| literal(&l.name)).collect(),
        catalog.licenses.iter().map(|l| l.description.clone()).collect(),
        catalog
            .licenses
            .iter()
            .map(|l| l.version_string().map(|v| literal(&v)).unwrap_or_default())
            .collect(),
    ];
    (
        titles(&["License name", "License description", "Version"]),
        columns,
    )
}

fn licenses_md(catalog: &LicenseCatalog) -> DocResult<String> {
    let (titles, columns) = license_columns(catalog);
    Ok(md_title_and_table(Some(LICENSE_TITLE), &titles, &columns, 1).join("\n"))
}

fn licenses_rst(catalog: &LicenseCatalog) -> DocResult<String> {
    let (titles, columns) = license_columns(catalog);
    Ok(rst_title_and_table(Some(LICENSE_TITLE), &titles, &columns).join("\n"))
}

pub const LICENSE_RENDERERS: RendererTable<LicenseCatalog> = RendererTable {
    report: ReportKind::LicenseCatalog,
    txt: Some(licenses_txt),
    md: Some(licenses_md),
    rst: Some(licenses_rst),
    json: None,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantCatalog {
    pub constants: Vec<RecipeConstant>,
}

pub fn build_constants(registry: &ConstantRegistry) -> ConstantCatalog {
    ConstantCatalog {
        constants: registry.sorted().into_iter().cloned().collect(),
    }
}

fn constants_txt(catalog: &ConstantCatalog) -> DocResult<String> {
    let mut doc = vec![CONSTANT_TITLE.to_string()];
    doc.extend(catalog.constants.iter().map(|c| {
        format!(
            "{}{}: {} ({})",
            INDENT_4SPACES, c.name, c.value, c.description
        )
    }));
    Ok(doc.join("\n"))
}

fn constant_columns(catalog: &ConstantCatalog) -> (Vec<String>, Vec<Vec<String>>) {
    let columns = vec![
        catalog.constants.iter().map(|c| literal(&c.name)).collect(),
        catalog
            .constants
            .iter()
            .map(|c| literal(&c.value.to_string()))
            .collect(),
        catalog.constants.iter().map(|c| c.description.clone()).collect(),
    ];
    (
        titles(&["Constant name", "Constant value", "Description"]),
        columns,
    )
}

fn constants_md(catalog: &ConstantCatalog) -> DocResult<String> {
    let (titles, columns) = constant_columns(catalog);
    Ok(md_title_and_table(Some(CONSTANT_TITLE), &titles, &columns, 1).join("\n"))
}

fn constants_rst(catalog: &ConstantCatalog) -> DocResult<String> {
    let (titles, columns) = constant_columns(catalog);
    Ok(rst_title_and_table(Some(CONSTANT_TITLE), &titles, &columns).join("\n"))
}

pub const CONSTANT_RENDERERS: RendererTable<ConstantCatalog> = RendererTable {
    report: ReportKind::ConstantCatalog,
    txt: Some(constants_txt),
    md: Some(constants_md),
    rst: Some(constants_rst),
    json: None,
};

/// Configuration-file constants grouped by section; constants within a
/// section are sorted by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFileCatalog {
    pub sections: Vec<(String, Vec<ConfigFileConstant>)>,
}

pub fn build_config_file(constants: &ConfigFileConstants) -> ConfigFileCatalog {
    let sections = constants
        .sections()
        .iter()
        .map(|(section, items)| {
            let mut items = items.clone();
            items.sort_by(|a, b| a.name.cmp(&b.name));
            (section.clone(), items)
        })
        .collect();
    ConfigFileCatalog { sections }
}

fn is_default(section: &str) -> bool {
    section == DEFAULT_SECTION
}

fn config_file_columns(items: &[ConfigFileConstant]) -> (Vec<String>, Vec<Vec<String>>) {
    let columns = vec![
        items.iter().map(|c| literal(&c.name)).collect(),
        items.iter().map(|c| c.help.clone()).collect(),
        items.iter().map(|c| literal(&c.value)).collect(),
    ];
    (
        titles(&["Constant name", "Constant help", "Constant value"]),
        columns,
    )
}

fn config_file_txt(catalog: &ConfigFileCatalog) -> DocResult<String> {
    let mut doc = vec![
        format!("{}:", CONFIG_FILE_TITLE),
        "syntax: %(CONSTANT_NAME)s".to_string(),
    ];
    for (section, items) in &catalog.sections {
        doc.push(String::new());
        if !is_default(section) {
            doc.push(format!("only in '{}' section:", section));
        }
        for constant in items {
            doc.push(format!(
                "* {}: {} [value: {}]",
                constant.name, constant.help, constant.value
            ));
        }
    }
    Ok(doc.join("\n"))
}

fn config_file_md(catalog: &ConfigFileCatalog) -> DocResult<String> {
    let mut doc = vec![format!("# {}", CONFIG_FILE_TITLE), String::new()];
    for (section, items) in &catalog.sections {
        if !is_default(section) {
            doc.push(format!("## Only in '{}' section:", section));
            doc.push(String::new());
        }
        let (titles, columns) = config_file_columns(items);
        doc.extend(md_title_and_table(None, &titles, &columns, 2));
        doc.push(String::new());
    }
    Ok(doc.join("\n"))
}

fn config_file_rst(catalog: &ConfigFileCatalog) -> DocResult<String> {
    let mut doc: Vec<String> = rst_heading(CONFIG_FILE_TITLE, '-').into();
    for (section, items) in &catalog.sections {
        doc.push(String::new());
        let title = format!("Only in '{}' section:", section);
        let (titles, columns) = config_file_columns(items);
        let heading = (!is_default(section)).then_some(title.as_str());
        doc.extend(rst_title_and_table(heading, &titles, &columns));
    }
    Ok(doc.join("\n"))
}

pub const CONFIG_FILE_RENDERERS: RendererTable<ConfigFileCatalog> = RendererTable {
    report: ReportKind::ConfigFileConstants,
    txt: Some(config_file_txt),
    md: Some(config_file_md),
    rst: Some(config_file_rst),
    json: None,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormat;
    use crate::schema::ParamValue;

    #[test]
    fn test_license_txt_shows_version_only_when_known() {
        let catalog = build_licenses(&LicenseRegistry::with_defaults());
        let text = LICENSE_RENDERERS.render(OutputFormat::Txt, &catalog).unwrap();
        assert!(text.contains("    LicenseGPLv2: GNU General Public License v2 (version: 2)"));
        assert!(text.contains("    LicenseMIT: MIT license\n"));
        assert!(text.contains("(version: 2.1)"));
    }

    #[test]
    fn test_license_table_leaves_missing_version_empty() {
        let catalog = build_licenses(&LicenseRegistry::with_defaults());
        let text = LICENSE_RENDERERS.render(OutputFormat::Md, &catalog).unwrap();
        assert!(text.starts_with("# License constants that can be used in recipes\n\n"));
        assert!(text.contains("``2.1``"));
        let mit = text.lines().find(|l| l.contains("LicenseMIT")).unwrap();
        assert!(!mit.contains("``None``"));
    }

    #[test]
    fn test_constant_txt_uses_plain_values() {
        let mut registry = ConstantRegistry::new();
        registry.register("TRUE", ParamValue::Bool(true), "Boolean True");
        registry.register("HOME", ParamValue::str("$HOME"), "Home directory ($HOME)");
        let text = CONSTANT_RENDERERS
            .render(OutputFormat::Txt, &build_constants(&registry))
            .unwrap();
        assert_eq!(
            text,
            "Constants that can be used in recipes\n    HOME: $HOME (Home directory ($HOME))\n    TRUE: True (Boolean True)"
        );
    }

    fn config_constants() -> ConfigFileConstants {
        let mut constants = ConfigFileConstants::new();
        constants.add(DEFAULT_SECTION, "USER", "alice", "Current username");
        constants.add(DEFAULT_SECTION, "HOME", "/home/alice", "Current user's home directory");
        constants.add("MAIN", "DEFAULT_PREFIX", "/home/alice/.local/recipedoc", "Default prefix");
        constants
    }

    #[test]
    fn test_config_file_txt_sections() {
        let catalog = build_config_file(&config_constants());
        let text = CONFIG_FILE_RENDERERS.render(OutputFormat::Txt, &catalog).unwrap();
        let expected = "\
Constants available (only) in configuration files:
syntax: %(CONSTANT_NAME)s

* HOME: Current user's home directory [value: /home/alice]
* USER: Current username [value: alice]

only in 'MAIN' section:
* DEFAULT_PREFIX: Default prefix [value: /home/alice/.local/recipedoc]";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_config_file_structured_formats_title_only_named_sections() {
        let catalog = build_config_file(&config_constants());
        let md = CONFIG_FILE_RENDERERS.render(OutputFormat::Md, &catalog).unwrap();
        assert!(md.contains("## Only in 'MAIN' section:"));
        assert!(!md.contains("'DEFAULT'"));

        let rst = CONFIG_FILE_RENDERERS.render(OutputFormat::Rst, &catalog).unwrap();
        assert!(rst.starts_with("Constants available (only) in configuration files\n---"));
        assert!(rst.contains("Only in 'MAIN' section:\n-----"));
        assert!(!rst.contains("'DEFAULT'"));
    }

    #[test]
    fn test_json_unsupported_for_all_listings() {
        let licenses = build_licenses(&LicenseRegistry::with_defaults());
        assert!(!LICENSE_RENDERERS.supports(OutputFormat::Json));
        assert!(LICENSE_RENDERERS.render(OutputFormat::Json, &licenses).is_err());
        assert!(!CONSTANT_RENDERERS.supports(OutputFormat::Json));
        assert!(!CONFIG_FILE_RENDERERS.supports(OutputFormat::Json));
    }
}
