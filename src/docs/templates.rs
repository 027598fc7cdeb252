//! Template placeholder catalog

use crate::error::DocResult;
use crate::format::ReportKind;
use crate::render::{
    literal, md_title_and_table, rst_heading, rst_title_and_table, titles, RendererTable,
    INDENT_4SPACES,
};
use crate::schema::{NamespaceKind, TemplateNamespace, TemplateRegistry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCatalog {
    pub namespaces: Vec<TemplateNamespace>,
}

pub fn build(templates: &TemplateRegistry) -> TemplateCatalog {
    TemplateCatalog {
        namespaces: templates.namespaces(),
    }
}

fn render_txt(catalog: &TemplateCatalog) -> DocResult<String> {
    let mut sections = Vec::with_capacity(catalog.namespaces.len());

    for namespace in &catalog.namespaces {
        let mut doc = vec![namespace.kind.title().to_string()];
        for entry in &namespace.entries {
            let line = match (namespace.kind, &entry.value) {
                (NamespaceKind::Constant, Some(value)) => format!(
                    "{}{}: {} ({})",
                    INDENT_4SPACES, entry.placeholder, entry.description, value
                ),
                _ if entry.description.is_empty() => {
                    format!("{}{}", INDENT_4SPACES, entry.placeholder)
                }
                _ => format!("{}{}: {}", INDENT_4SPACES, entry.placeholder, entry.description),
            };
            doc.push(line);
        }
        sections.push(doc.join("\n"));
    }

    Ok(sections.join("\n\n"))
}

/// Table columns of a namespace; MarkDown needs the version hint wrapped
fn columns(namespace: &TemplateNamespace, md: bool) -> Vec<Vec<String>> {
    let names = namespace
        .entries
        .iter()
        .map(|e| literal(&e.placeholder))
        .collect();
    let descriptions = namespace
        .entries
        .iter()
        .map(|e| {
            if md {
                e.description.replace("(<major>.<minor>)", "(``<major>.<minor>``)")
            } else {
                e.description.clone()
            }
        })
        .collect();

    match namespace.kind {
        NamespaceKind::Constant => vec![
            names,
            descriptions,
            namespace
                .entries
                .iter()
                .map(|e| literal(e.value.as_deref().unwrap_or_default()))
                .collect(),
        ],
        _ => vec![names, descriptions],
    }
}

fn table_titles(kind: NamespaceKind) -> Vec<String> {
    match kind {
        NamespaceKind::Constant => titles(&["Constant", "Template description", "Template value"]),
        _ => titles(&["Template name", "Template value"]),
    }
}

fn bullets(namespace: &TemplateNamespace) -> impl Iterator<Item = String> + '_ {
    namespace
        .entries
        .iter()
        .map(|e| format!("* {}", literal(&e.placeholder)))
}

fn render_md(catalog: &TemplateCatalog) -> DocResult<String> {
    let mut doc = Vec::new();

    for namespace in &catalog.namespaces {
        let title = namespace.kind.title();
        if namespace.kind == NamespaceKind::ConfigDerived {
            doc.push(format!("## {}", title));
            doc.push(String::new());
            doc.extend(bullets(namespace));
        } else {
            doc.extend(md_title_and_table(
                Some(title),
                &table_titles(namespace.kind),
                &columns(namespace, true),
                2,
            ));
        }
        doc.push(String::new());
    }

    Ok(doc.join("\n"))
}

fn render_rst(catalog: &TemplateCatalog) -> DocResult<String> {
    let mut doc = Vec::new();

    for namespace in &catalog.namespaces {
        let title = namespace.kind.title();
        if namespace.kind == NamespaceKind::ConfigDerived {
            doc.extend(rst_heading(title, '-'));
            doc.push(String::new());
            doc.extend(bullets(namespace));
            doc.push(String::new());
        } else {
            doc.extend(rst_title_and_table(
                Some(title),
                &table_titles(namespace.kind),
                &columns(namespace, false),
            ));
        }
    }

    Ok(doc.join("\n"))
}

pub const RENDERERS: RendererTable<TemplateCatalog> = RendererTable {
    report: ReportKind::TemplateCatalog,
    txt: Some(render_txt),
    md: Some(render_md),
    rst: Some(render_rst),
    json: None,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormat;

    fn catalog() -> TemplateCatalog {
        build(&TemplateRegistry::with_defaults())
    }

    #[test]
    fn test_namespaces_in_resolution_order() {
        let kinds: Vec<_> = catalog().namespaces.iter().map(|n| n.kind).collect();
        assert_eq!(kinds.first(), Some(&NamespaceKind::Static));
        assert_eq!(kinds.last(), Some(&NamespaceKind::Constant));
        assert_eq!(kinds.len(), 7);
    }

    #[test]
    fn test_txt_entries() {
        let text = RENDERERS.render(OutputFormat::Txt, &catalog()).unwrap();
        assert!(text.starts_with("Template names/values derived from recipe instance\n"));
        assert!(text.contains("    %(pyshortver)s: short version for Python (<major>.<minor>)"));
        assert!(text.contains("\n    %(versionsuffix)s\n"));
        assert!(text.contains("    SHLIB_EXT: Extension for shared libraries (so)"));
        assert!(text.contains("\n\nLowercase values of template values\n"));
    }

    #[test]
    fn test_md_wraps_version_placeholder() {
        let text = RENDERERS.render(OutputFormat::Md, &catalog()).unwrap();
        assert!(text.contains("## Template names/values as set in recipe\n\n* ``%(bitbucket_account)s``"));
        assert!(text.contains("(``<major>.<minor>``)"));
    }

    #[test]
    fn test_rst_constant_table() {
        let text = RENDERERS.render(OutputFormat::Rst, &catalog()).unwrap();
        assert!(text.contains("Template constants that can be used in recipes\n-----"));
        assert!(text.contains("Template description"));
        assert!(text.contains("``SOURCE_TAR_GZ``"));
    }
}
