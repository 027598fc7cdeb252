//! Recipe parameter catalog

use tracing::debug;

use crate::error::DocResult;
use crate::format::ReportKind;
use crate::plugins::PluginRegistry;
use crate::render::{literal, md_title_and_table, rst_title_and_table, titles, RendererTable};
use crate::schema::{Category, ParamValue, ParameterSchema};

/// Appended to the names of plugin-specific parameters
pub const PLUGIN_MARKER: &str = "*";

const BASE_TITLE: &str = "Available recipe parameters";

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRow {
    /// Name as displayed, including the plugin marker when applicable
    pub name: String,
    pub description: String,
    pub default: ParamValue,
    pub alternative: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGroup {
    pub category: Category,
    pub rows: Vec<ParameterRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterCatalog {
    pub title: String,
    pub groups: Vec<ParameterGroup>,
}

/// Groups the base schema, plus the extra parameters of `plugin` when it is
/// a known plugin, by category. Hidden categories and empty groups are left
/// out; rows are sorted by displayed name.
pub fn build(schema: &ParameterSchema, plugins: &PluginRegistry, plugin: Option<&str>) -> ParameterCatalog {
    let found = plugin.and_then(|name| {
        let found = plugins.get(name);
        if found.is_none() {
            debug!(plugin = name, "unknown plugin, listing base parameters only");
        }
        found
    });
    let extra = found.map(|p| p.declared_extra_parameters()).unwrap_or_default();
    let merged = schema.merged_with(extra);

    let mut title = BASE_TITLE.to_string();
    if let (Some(plugin), false) = (found, extra.is_empty()) {
        title.push_str(&format!(
            " ({} indicates specific to the {} plugin)",
            PLUGIN_MARKER, plugin.name
        ));
    }

    let groups = Category::sorted()
        .iter()
        .filter(|category| !category.is_hidden())
        .filter_map(|category| {
            let mut rows: Vec<ParameterRow> = merged
                .params()
                .iter()
                .filter(|p| p.category == *category)
                .map(|p| {
                    // alternatives map base names only, never the marked name
                    let (name, alternative) = if p.plugin_specific {
                        (format!("{}{}", p.name, PLUGIN_MARKER), None)
                    } else {
                        (p.name.clone(), p.alternative_name.clone())
                    };
                    ParameterRow {
                        name,
                        description: p.description.clone(),
                        default: p.default.clone(),
                        alternative,
                    }
                })
                .collect();
            if rows.is_empty() {
                return None;
            }
            rows.sort_by(|a, b| a.name.cmp(&b.name));
            Some(ParameterGroup {
                category: *category,
                rows,
            })
        })
        .collect();

    ParameterCatalog { title, groups }
}

fn capitalized(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn render_txt(catalog: &ParameterCatalog) -> DocResult<String> {
    let mut doc = vec![format!("{}:", catalog.title), String::new()];

    for group in &catalog.groups {
        let heading = group.category.label().to_uppercase();
        let rule = "-".repeat(heading.len());
        doc.push(heading);
        doc.push(rule);

        let width = group.rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
        for row in &group.rows {
            let mut line = format!(
                "{:<width$}   {} [default: {}]",
                row.name,
                row.description,
                row.default.quoted(),
                width = width
            );
            if let Some(alternative) = &row.alternative {
                line.push_str(&format!(" {{alternative: {}}}", alternative));
            }
            doc.push(line);
        }
        doc.push(String::new());
    }

    Ok(doc.join("\n"))
}

fn table_titles() -> Vec<String> {
    titles(&[
        "**Parameter name**",
        "**Description**",
        "**Default value**",
        "**Alternative name**",
    ])
}

fn render_md(catalog: &ParameterCatalog) -> DocResult<String> {
    let mut doc = vec![format!("# {}", catalog.title), String::new()];

    for group in &catalog.groups {
        let title = format!("{} parameters", capitalized(group.category.label()));
        let columns = vec![
            group.rows.iter().map(|r| format!("`{}`", r.name)).collect(),
            group
                .rows
                .iter()
                .map(|r| r.description.replace('<', "&lt;").replace('>', "&gt;"))
                .collect(),
            group
                .rows
                .iter()
                .map(|r| format!("`{}`", r.default.quoted()))
                .collect(),
            group
                .rows
                .iter()
                .map(|r| r.alternative.as_deref().map(|a| format!("`{}`", a)).unwrap_or_default())
                .collect(),
        ];
        doc.extend(md_title_and_table(Some(&title), &table_titles(), &columns, 2));
        doc.push(String::new());
    }

    Ok(doc.join("\n"))
}

fn render_rst(catalog: &ParameterCatalog) -> DocResult<String> {
    let mut doc = vec![
        catalog.title.clone(),
        "=".repeat(catalog.title.chars().count()),
        String::new(),
    ];

    for group in &catalog.groups {
        let title = format!("{} parameters", group.category.label());
        let columns = vec![
            group.rows.iter().map(|r| literal(&r.name)).collect(),
            group.rows.iter().map(|r| r.description.clone()).collect(),
            group.rows.iter().map(|r| r.default.quoted()).collect(),
            group
                .rows
                .iter()
                .map(|r| r.alternative.as_deref().map(literal).unwrap_or_default())
                .collect(),
        ];
        doc.extend(rst_title_and_table(Some(&title), &table_titles(), &columns));
        doc.push(String::new());
    }

    Ok(doc.join("\n"))
}

pub const RENDERERS: RendererTable<ParameterCatalog> = RendererTable {
    report: ReportKind::ParameterCatalog,
    txt: Some(render_txt),
    md: Some(render_md),
    rst: Some(render_rst),
    json: None,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormat;
    use crate::plugins::PluginDescriptor;
    use crate::schema::ParameterDescriptor;

    fn registry() -> PluginRegistry {
        let mut registry = PluginRegistry::new();
        registry.register_root(PluginDescriptor::new("Root", "framework.root"));
        registry.register(
            PluginDescriptor::new("CMakeLike", "plugins.cmakelike")
                .with_base("Root")
                .with_extra(ParameterDescriptor::extra(
                    "separate_build_dir",
                    ParamValue::Bool(true),
                    "Build in a separate directory",
                )),
        );
        registry
    }

    #[test]
    fn test_unknown_plugin_uses_base_schema() {
        let schema = ParameterSchema::with_defaults();
        let catalog = build(&schema, &registry(), Some("NoSuchPlugin"));
        assert_eq!(catalog.title, BASE_TITLE);
        assert!(catalog
            .groups
            .iter()
            .flat_map(|g| &g.rows)
            .all(|r| !r.name.ends_with(PLUGIN_MARKER)));
    }

    #[test]
    fn test_plugin_parameters_are_marked() {
        let schema = ParameterSchema::with_defaults();
        let catalog = build(&schema, &registry(), Some("CMakeLike"));
        assert!(catalog.title.contains("specific to the CMakeLike plugin"));
        let custom = catalog
            .groups
            .iter()
            .find(|g| g.category == Category::Custom)
            .unwrap();
        assert_eq!(custom.rows[0].name, "separate_build_dir*");
    }

    #[test]
    fn test_plugin_parameter_shadowing_base_has_no_alternative() {
        let mut plugins = registry();
        plugins.register(
            PluginDescriptor::new("Bundle", "plugins.bundle")
                .with_base("Root")
                .with_extra(ParameterDescriptor::extra(
                    "dependencies",
                    ParamValue::List(Vec::new()),
                    "Components of the bundle",
                )),
        );
        let catalog = build(&ParameterSchema::with_defaults(), &plugins, Some("Bundle"));
        let rows: Vec<&ParameterRow> = catalog.groups.iter().flat_map(|g| &g.rows).collect();
        let marked = rows.iter().find(|r| r.name == "dependencies*").unwrap();
        assert_eq!(marked.alternative, None);

        let text = RENDERERS.render(OutputFormat::Txt, &catalog).unwrap();
        assert!(!text.contains("{alternative: deps}"));
    }

    #[test]
    fn test_hidden_category_is_skipped() {
        let catalog = build(&ParameterSchema::with_defaults(), &registry(), None);
        assert!(catalog.groups.iter().all(|g| g.category != Category::Hidden));
        assert!(catalog.groups.iter().all(|g| !g.rows.is_empty()));
    }

    #[test]
    fn test_rows_sorted_by_name() {
        let catalog = build(&ParameterSchema::with_defaults(), &registry(), None);
        for group in &catalog.groups {
            let names: Vec<_> = group.rows.iter().map(|r| r.name.clone()).collect();
            let mut sorted = names.clone();
            sorted.sort();
            assert_eq!(names, sorted);
        }
    }

    #[test]
    fn test_txt_layout() {
        let catalog = build(&ParameterSchema::with_defaults(), &registry(), None);
        let text = RENDERERS.render(OutputFormat::Txt, &catalog).unwrap();
        assert!(text.starts_with("Available recipe parameters:\n\nMANDATORY\n---------\n"));
        assert!(text.contains("{alternative: deps}"));
        assert!(text.contains("[default: 'base']"));
    }

    #[test]
    fn test_md_escapes_angle_brackets() {
        let catalog = build(&ParameterSchema::with_defaults(), &registry(), None);
        let text = RENDERERS.render(OutputFormat::Md, &catalog).unwrap();
        assert!(text.contains("## Mandatory parameters"));
        assert!(text.contains("&lt;list&gt;"));
    }

    #[test]
    fn test_json_not_supported() {
        let catalog = build(&ParameterSchema::with_defaults(), &registry(), None);
        assert!(RENDERERS
            .render(OutputFormat::Json, &catalog)
            .unwrap_err()
            .is_unsupported_format());
    }
}
