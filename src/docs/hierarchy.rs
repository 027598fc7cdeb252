//! Plugin hierarchy tree
//!
//! Every capability root is rendered as a tree of its implementers. A plugin
//! with several bases shows up under each of them.

use crate::error::DocResult;
use crate::format::{DetailLevel, ReportKind};
use crate::plugins::{PluginDescriptor, PluginRegistry, SourceLocations};
use crate::render::{RendererTable, INDENT_2SPACES};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyNode {
    pub name: String,
    pub module: String,
    pub location: Option<String>,
    pub children: Vec<HierarchyNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginHierarchy {
    pub detail: DetailLevel,
    pub roots: Vec<HierarchyNode>,
}

pub fn build(
    registry: &PluginRegistry,
    locations: &dyn SourceLocations,
    detail: DetailLevel,
) -> PluginHierarchy {
    let roots = registry
        .roots()
        .into_iter()
        .map(|root| node(registry, locations, root, &mut Vec::new()))
        .collect();
    PluginHierarchy { detail, roots }
}

/// `path` holds the names from the root down to `plugin`, so a cyclic base
/// list cannot recurse forever
fn node<'a>(
    registry: &'a PluginRegistry,
    locations: &dyn SourceLocations,
    plugin: &'a PluginDescriptor,
    path: &mut Vec<&'a str>,
) -> HierarchyNode {
    path.push(&plugin.name);
    let mut children = Vec::new();
    for child in registry.children(&plugin.name) {
        if !path.contains(&child.name.as_str()) {
            children.push(node(registry, locations, child, path));
        }
    }
    path.pop();

    HierarchyNode {
        name: plugin.name.clone(),
        module: plugin.module.clone(),
        location: locations.module_location(&plugin.module),
        children,
    }
}

/// Per-format tree markup
struct TreeMarkup {
    root_prefix: &'static str,
    bold_root: bool,
    zero_indent: &'static str,
    indent: &'static str,
    sep: &'static str,
    /// Emitted around each non-empty child block
    newline: Option<&'static str>,
}

const MD_MARKUP: TreeMarkup = TreeMarkup {
    root_prefix: "- ",
    bold_root: true,
    zero_indent: INDENT_2SPACES,
    indent: INDENT_2SPACES,
    sep: "- ",
    newline: None,
};

const RST_MARKUP: TreeMarkup = TreeMarkup {
    root_prefix: "* ",
    bold_root: true,
    zero_indent: INDENT_2SPACES,
    indent: INDENT_2SPACES,
    sep: "* ",
    newline: Some(""),
};

const TXT_MARKUP: TreeMarkup = TreeMarkup {
    root_prefix: "",
    bold_root: false,
    zero_indent: "",
    indent: "|   ",
    sep: "|-- ",
    newline: None,
};

fn details(node: &HierarchyNode) -> String {
    match &node.location {
        Some(location) => format!(" ({} @ {})", node.module, location),
        None => format!(" ({})", node.module),
    }
}

fn render_children(
    markup: &TreeMarkup,
    detail: DetailLevel,
    children: &[HierarchyNode],
    depth: usize,
    doc: &mut Vec<String>,
) {
    if children.is_empty() {
        return;
    }
    if let Some(newline) = markup.newline {
        doc.push(newline.to_string());
    }
    for child in children {
        let mut line = format!(
            "{}{}{}{}",
            markup.zero_indent,
            markup.indent.repeat(depth),
            markup.sep,
            child.name
        );
        if detail.is_detailed() {
            line.push_str(&details(child));
        }
        doc.push(line);
        render_children(markup, detail, &child.children, depth + 1, doc);
    }
    if let Some(newline) = markup.newline {
        doc.push(newline.to_string());
    }
}

fn render(markup: &TreeMarkup, hierarchy: &PluginHierarchy) -> DocResult<String> {
    let mut doc = Vec::new();
    for root in &hierarchy.roots {
        let name = if markup.bold_root {
            format!("**{}**", root.name)
        } else {
            root.name.clone()
        };
        let mut line = format!("{}{}", markup.root_prefix, name);
        if hierarchy.detail.is_detailed() {
            line.push_str(&details(root));
        }
        doc.push(line);
        render_children(markup, hierarchy.detail, &root.children, 0, &mut doc);
    }
    Ok(doc.join("\n"))
}

fn render_txt(hierarchy: &PluginHierarchy) -> DocResult<String> {
    render(&TXT_MARKUP, hierarchy)
}

fn render_md(hierarchy: &PluginHierarchy) -> DocResult<String> {
    render(&MD_MARKUP, hierarchy)
}

fn render_rst(hierarchy: &PluginHierarchy) -> DocResult<String> {
    render(&RST_MARKUP, hierarchy)
}

pub const RENDERERS: RendererTable<PluginHierarchy> = RendererTable {
    report: ReportKind::PluginHierarchy,
    txt: Some(render_txt),
    md: Some(render_md),
    rst: Some(render_rst),
    json: None,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormat;
    use std::collections::HashMap;

    fn registry() -> PluginRegistry {
        let mut registry = PluginRegistry::new();
        registry.register_root(PluginDescriptor::new("EasyBlock", "framework.easyblock"));
        registry.register_root(PluginDescriptor::new("Extension", "framework.extension"));
        registry.register(PluginDescriptor::new("Binary", "generic.binary").with_base("EasyBlock"));
        registry.register(
            PluginDescriptor::new("PackedBinary", "generic.packedbinary")
                .with_base("Binary")
                .with_base("EasyBlock"),
        );
        registry.register(PluginDescriptor::new("configuremake", "generic.configuremake").with_base("EasyBlock"));
        registry
    }

    fn hierarchy(detail: DetailLevel) -> PluginHierarchy {
        let registry = registry();
        build(&registry, &registry, detail)
    }

    #[test]
    fn test_multiple_bases_appear_under_each() {
        let text = RENDERERS
            .render(OutputFormat::Txt, &hierarchy(DetailLevel::Simple))
            .unwrap();
        let expected = "\
EasyBlock
|-- Binary
|   |-- PackedBinary
|-- configuremake
|-- PackedBinary
Extension";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_root_without_children_is_single_line() {
        for format in [OutputFormat::Txt, OutputFormat::Md, OutputFormat::Rst] {
            let text = RENDERERS.render(format, &hierarchy(DetailLevel::Simple)).unwrap();
            assert!(text.ends_with("Extension") || text.ends_with("Extension**"), "{}", format);
        }
    }

    #[test]
    fn test_md_markup() {
        let text = RENDERERS
            .render(OutputFormat::Md, &hierarchy(DetailLevel::Simple))
            .unwrap();
        assert!(text.starts_with("- **EasyBlock**\n  - Binary\n    - PackedBinary\n"));
    }

    #[test]
    fn test_rst_blank_lines_around_child_blocks() {
        let text = RENDERERS
            .render(OutputFormat::Rst, &hierarchy(DetailLevel::Simple))
            .unwrap();
        assert!(text.starts_with("* **EasyBlock**\n\n  * Binary\n\n    * PackedBinary\n\n"));
        assert!(text.ends_with("\n\n* **Extension**"));
    }

    #[test]
    fn test_detailed_shows_module_and_location() {
        let mut locations = HashMap::new();
        locations.insert("generic.binary".to_string(), "generic/binary.py".to_string());
        let hierarchy = build(&registry(), &locations, DetailLevel::Detailed);
        let text = RENDERERS.render(OutputFormat::Txt, &hierarchy).unwrap();
        assert!(text.starts_with("EasyBlock (framework.easyblock)\n"));
        assert!(text.contains("|-- Binary (generic.binary @ generic/binary.py)"));
    }

    #[test]
    fn test_cyclic_bases_terminate() {
        let mut registry = registry();
        registry.register(
            PluginDescriptor::new("Binary", "generic.binary")
                .with_base("EasyBlock")
                .with_base("PackedBinary"),
        );
        let hierarchy = build(&registry, &registry, DetailLevel::Simple);
        assert!(!hierarchy.roots.is_empty());
    }

    #[test]
    fn test_json_unsupported() {
        assert!(!RENDERERS.supports(OutputFormat::Json));
    }
}
