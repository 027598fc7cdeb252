//! Overview of the plugins in a package
//!
//! One section per plugin: lineage, description, extra parameters, commonly
//! used base parameters, customised steps and an example recipe. Every part
//! except the heading is optional and simply left out when there is nothing
//! to show.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{DocError, DocResult};
use crate::format::ReportKind;
use crate::plugins::defaults::GENERIC_PACKAGE;
use crate::plugins::{BaseRef, PluginDescriptor, PluginRegistry, EASYBLOCK_ROOT};
use crate::render::{
    literal, md_title_and_table, rst_heading, rst_title_and_table, titles, RendererTable,
    INDENT_4SPACES,
};
use crate::recipes::RECIPE_EXTENSION;
use crate::schema::ParameterSchema;

const TITLE: &str = "Overview of generic plugins";

/// What to document and where to find the extra material
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewOptions {
    /// Package whose plugins are documented
    pub package: String,
    /// Directory holding `<Plugin>.eb` example recipes
    pub examples_dir: Option<PathBuf>,
    /// Base parameters worth highlighting, per plugin name
    pub common_params: Vec<(String, Vec<String>)>,
    /// Steps whose plugin-specific documentation is shown
    pub step_hooks: Vec<String>,
}

impl OverviewOptions {
    pub fn with_defaults() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            package: GENERIC_PACKAGE.to_string(),
            examples_dir: None,
            common_params: vec![
                (
                    "ConfigureMake".to_string(),
                    strings(&["configopts", "buildopts", "installopts"]),
                ),
                (
                    "CMakeMake".to_string(),
                    strings(&["configopts", "buildopts", "installopts"]),
                ),
                (
                    "PythonPackage".to_string(),
                    strings(&["buildopts", "installopts"]),
                ),
            ],
            step_hooks: strings(&["build_step", "configure_step", "test_step"]),
        }
    }

    pub fn with_examples_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.examples_dir = Some(dir.into());
        self
    }
}

impl Default for OverviewOptions {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseLink {
    pub name: String,
    /// The base is itself documented in this overview
    pub linked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraParamRow {
    pub name: String,
    pub description: String,
    pub default: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSection {
    pub name: String,
    pub bases: Vec<BaseLink>,
    pub doc: Option<String>,
    pub extra: Vec<ExtraParamRow>,
    /// (parameter name, base schema description)
    pub common: Vec<(String, String)>,
    /// (step name, step documentation)
    pub steps: Vec<(String, String)>,
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginOverview {
    pub sections: Vec<PluginSection>,
}

pub fn build(
    registry: &PluginRegistry,
    schema: &ParameterSchema,
    options: &OverviewOptions,
) -> DocResult<PluginOverview> {
    let plugins = registry.plugins_in_package(&options.package, EASYBLOCK_ROOT)?;
    let known: HashSet<&str> = plugins.iter().map(|p| p.name.as_str()).collect();

    let sections = plugins
        .iter()
        .map(|plugin| describe_plugin(plugin, schema, options, &known))
        .collect::<DocResult<Vec<_>>>()?;
    debug!(package = %options.package, count = sections.len(), "documented plugins");

    Ok(PluginOverview { sections })
}

fn describe_plugin(
    plugin: &PluginDescriptor,
    schema: &ParameterSchema,
    options: &OverviewOptions,
    known: &HashSet<&str>,
) -> DocResult<PluginSection> {
    let bases = plugin
        .bases
        .iter()
        .map(|base| BaseLink {
            name: base.name().to_string(),
            linked: matches!(base, BaseRef::Plugin(name) if known.contains(name.as_str())),
        })
        .collect();

    let mut extra: Vec<ExtraParamRow> = plugin
        .declared_extra_parameters()
        .iter()
        .map(|p| ExtraParamRow {
            name: p.name.clone(),
            description: p.description.clone(),
            default: p.default.quoted(),
        })
        .collect();
    extra.sort_by(|a, b| a.name.cmp(&b.name));

    let mut common = Vec::new();
    if let Some((_, params)) = options.common_params.iter().find(|(name, _)| *name == plugin.name) {
        for param in params {
            let descriptor = schema.get(param).ok_or_else(|| DocError::UnknownParameter {
                plugin: plugin.name.clone(),
                parameter: param.clone(),
            })?;
            common.push((param.clone(), descriptor.description.clone()));
        }
    }

    let steps = options
        .step_hooks
        .iter()
        .filter_map(|hook| {
            let doc = plugin.own_step(hook)?.doc.as_deref()?.trim();
            (!doc.is_empty()).then(|| (hook.clone(), doc.to_string()))
        })
        .collect();

    let example = match &options.examples_dir {
        Some(dir) => {
            let path = dir.join(format!("{}.{}", plugin.name, RECIPE_EXTENSION));
            if path.is_file() {
                Some(fs::read_to_string(&path).map_err(|e| DocError::io(&path, e))?)
            } else {
                None
            }
        }
        None => None,
    };

    Ok(PluginSection {
        name: plugin.name.clone(),
        bases,
        doc: plugin.doc.clone(),
        extra,
        common,
        steps,
        example,
    })
}

fn extra_title(name: &str) -> String {
    format!("Extra recipe parameters specific to ``{}`` plugin", name)
}

fn common_title(name: &str) -> String {
    format!("Commonly used recipe parameters with ``{}`` plugin", name)
}

fn steps_title(name: &str) -> String {
    format!("Customised steps in ``{}`` plugin", name)
}

fn example_title(name: &str) -> String {
    format!("Example recipe for ``{}`` plugin", name)
}

fn extra_table(section: &PluginSection) -> (Vec<String>, Vec<Vec<String>>) {
    (
        titles(&["recipe parameter", "description", "default value"]),
        vec![
            section.extra.iter().map(|r| literal(&r.name)).collect(),
            section.extra.iter().map(|r| r.description.clone()).collect(),
            section.extra.iter().map(|r| literal(&r.default)).collect(),
        ],
    )
}

fn common_table(section: &PluginSection) -> (Vec<String>, Vec<Vec<String>>) {
    (
        titles(&["recipe parameter", "description"]),
        vec![
            section.common.iter().map(|(name, _)| literal(name)).collect(),
            section.common.iter().map(|(_, desc)| desc.clone()).collect(),
        ],
    )
}

fn render_md(overview: &PluginOverview) -> DocResult<String> {
    let links: Vec<String> = overview
        .sections
        .iter()
        .map(|s| format!("[{}](#{})", s.name, s.name.to_lowercase()))
        .collect();
    let mut doc = vec![
        format!("# {}", TITLE),
        String::new(),
        links.join(" - "),
        String::new(),
    ];

    for section in &overview.sections {
        doc.push(format!("## ``{}``", section.name));
        doc.push(String::new());

        if !section.bases.is_empty() {
            let bases: Vec<String> = section
                .bases
                .iter()
                .map(|b| {
                    if b.linked {
                        format!("[``{}``](#{})", b.name, b.name.to_lowercase())
                    } else {
                        literal(&b.name)
                    }
                })
                .collect();
            doc.push(format!("(derives from {})", bases.join(", ")));
            doc.push(String::new());
        }

        if let Some(text) = &section.doc {
            doc.extend(text.lines().map(|l| l.trim_start().to_string()));
            doc.push(String::new());
        }

        if !section.extra.is_empty() {
            let (titles, columns) = extra_table(section);
            doc.extend(md_title_and_table(Some(&extra_title(&section.name)), &titles, &columns, 3));
            doc.push(String::new());
        }

        if !section.common.is_empty() {
            let (titles, columns) = common_table(section);
            doc.extend(md_title_and_table(Some(&common_title(&section.name)), &titles, &columns, 3));
            doc.push(String::new());
        }

        if !section.steps.is_empty() {
            doc.push(format!("### {}", steps_title(&section.name)));
            doc.push(String::new());
            for (step, step_doc) in &section.steps {
                doc.push(format!("* ``{}`` - {}", step, step_doc));
                doc.push(String::new());
            }
        }

        if let Some(example) = &section.example {
            doc.push(format!("### {}", example_title(&section.name)));
            doc.push(String::new());
            doc.push("```python".to_string());
            doc.push(example.trim_end().to_string());
            doc.push("```".to_string());
            doc.push(String::new());
        }
    }

    Ok(doc.join("\n"))
}

fn render_rst(overview: &PluginOverview) -> DocResult<String> {
    let rule = "=".repeat(TITLE.len());
    let toc: Vec<String> = overview
        .sections
        .iter()
        .map(|s| format!(":ref:`{}`", s.name))
        .collect();
    let mut doc = vec![
        format!(
            "*(this page was generated automatically using* ``{} overview`` *)*",
            crate::NAME
        ),
        String::new(),
        rule.clone(),
        TITLE.to_string(),
        rule,
        String::new(),
        toc.join(" - "),
        String::new(),
    ];

    for section in &overview.sections {
        let heading = literal(&section.name);
        doc.push(format!(".. _{}:", section.name));
        doc.push(String::new());
        doc.extend(rst_heading(&heading, '='));
        doc.push(String::new());

        if !section.bases.is_empty() {
            let bases: Vec<String> = section
                .bases
                .iter()
                .map(|b| {
                    if b.linked {
                        format!(":ref:`{}`", b.name)
                    } else {
                        b.name.clone()
                    }
                })
                .collect();
            doc.push(format!("(derives from {})", bases.join(", ")));
            doc.push(String::new());
        }

        if let Some(text) = &section.doc {
            doc.push(text.trim().to_string());
            doc.push(String::new());
        }

        if !section.extra.is_empty() {
            let (titles, columns) = extra_table(section);
            doc.extend(rst_title_and_table(Some(&extra_title(&section.name)), &titles, &columns));
        }

        if !section.common.is_empty() {
            let (titles, columns) = common_table(section);
            doc.extend(rst_title_and_table(Some(&common_title(&section.name)), &titles, &columns));
            doc.push(String::new());
        }

        if !section.steps.is_empty() {
            doc.extend(rst_heading(&steps_title(&section.name), '-'));
            for (step, step_doc) in &section.steps {
                doc.push(format!("* ``{}`` - {}", step, step_doc));
            }
            doc.push(String::new());
        }

        if let Some(example) = &section.example {
            doc.extend(rst_heading(&example_title(&section.name), '-'));
            doc.push(String::new());
            doc.push(".. code::".to_string());
            doc.push(String::new());
            for line in example.lines() {
                if line.is_empty() {
                    doc.push(String::new());
                } else {
                    doc.push(format!("{}{}", INDENT_4SPACES, line));
                }
            }
            doc.push(String::new());
        }
    }

    Ok(doc.join("\n"))
}

pub const RENDERERS: RendererTable<PluginOverview> = RendererTable {
    report: ReportKind::PluginOverview,
    txt: None,
    md: Some(render_md),
    rst: Some(render_rst),
    json: None,
};
