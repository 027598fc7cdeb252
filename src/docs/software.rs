//! Software catalog
//!
//! Scans every recipe, groups the entries by software name and renders a
//! listing of names or, in detailed mode, a per-name version table.

use std::collections::HashMap;
use std::time::Instant;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;
use tracing::{debug, warn};

use crate::error::{DocError, DocResult};
use crate::format::{DetailLevel, ReportKind};
use crate::progress::{ProgressEvent, ProgressHandler};
use crate::recipes::{ModuleOracle, RecipeRecord, RecipeSource};
use crate::render::{literal, md_table, nub, rst_table, RendererTable};
use crate::schema::templates::has_placeholder;
use crate::schema::{try_resolve, TemplateRegistry};
use crate::toolchains::{is_system_toolchain, SYSTEM_TOOLCHAIN_NAME};
use crate::version::LooseVersion;

const TITLE: &str = "List of supported software";

/// One recipe, reduced to what the catalog shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoftwareEntry {
    pub name: String,
    pub version: String,
    pub versionsuffix: String,
    pub toolchain: String,
    pub description: String,
    pub homepage: String,
    /// Installed module name; only known when filtering on installed modules
    #[serde(rename = "mod_name", skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
}

/// Row of a version table: one version/suffix pair and every toolchain
/// providing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRow {
    pub version: String,
    pub versionsuffix: String,
    pub toolchains: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftwarePackage {
    pub name: String,
    /// In scan order
    pub entries: Vec<SoftwareEntry>,
}

impl SoftwarePackage {
    /// Description of the last scanned entry
    pub fn description(&self) -> &str {
        self.entries.last().map(|e| e.description.as_str()).unwrap_or_default()
    }

    pub fn homepage(&self) -> &str {
        self.entries.last().map(|e| e.homepage.as_str()).unwrap_or_default()
    }

    pub fn has_versionsuffix(&self) -> bool {
        self.entries.iter().any(|e| !e.versionsuffix.is_empty())
    }

    /// Unique version/suffix pairs, ordered by loose version then suffix
    pub fn versions(&self) -> Vec<VersionRow> {
        let pairs = nub(
            self.entries
                .iter()
                .map(|e| (e.version.clone(), e.versionsuffix.clone())),
        );
        let mut rows: Vec<VersionRow> = pairs
            .into_iter()
            .map(|(version, versionsuffix)| {
                let mut toolchains: Vec<String> = self
                    .entries
                    .iter()
                    .filter(|e| e.version == version && e.versionsuffix == versionsuffix)
                    .map(|e| e.toolchain.clone())
                    .collect();
                toolchains.sort();
                toolchains.dedup();
                VersionRow {
                    version,
                    versionsuffix,
                    toolchains,
                }
            })
            .collect();
        rows.sort_by(|a, b| {
            LooseVersion::new(&a.version)
                .cmp(&LooseVersion::new(&b.version))
                .then_with(|| a.versionsuffix.cmp(&b.versionsuffix))
        });
        rows
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftwareCatalog {
    pub detail: DetailLevel,
    /// Sorted case-insensitively by name
    pub packages: Vec<SoftwarePackage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SoftwareOptions {
    pub detail: DetailLevel,
    pub only_installed: bool,
}

/// Toolchain column label of a recipe
fn toolchain_label(recipe: &RecipeRecord) -> String {
    let (name, version) = recipe.toolchain();
    if is_system_toolchain(name) {
        SYSTEM_TOOLCHAIN_NAME.to_string()
    } else {
        format!("{}/{}", name, version)
    }
}

fn entry_for(recipe: &RecipeRecord, templates: &TemplateRegistry) -> SoftwareEntry {
    let bindings = templates.bindings_for(recipe);
    let resolve = |key: &str| {
        let raw = recipe.get_str(key);
        if !has_placeholder(raw) {
            return raw.to_string();
        }
        match try_resolve(raw, &bindings) {
            Ok(resolved) => resolved,
            Err(err) => {
                debug!(
                    recipe = %recipe.path.display(),
                    key,
                    error = %err,
                    "Ignoring failure to resolve templates"
                );
                raw.to_string()
            }
        }
    };

    SoftwareEntry {
        name: recipe.name().to_string(),
        version: resolve("version"),
        versionsuffix: resolve("versionsuffix"),
        toolchain: toolchain_label(recipe),
        description: resolve("description"),
        homepage: resolve("homepage"),
        module_name: recipe.module_name.clone(),
    }
}

/// Scans every recipe known to `source` and groups the entries by name.
///
/// Only a filter on installed modules needs the full parse, since that is
/// what resolves the module name; otherwise the cheaper shallow parse is used.
/// Recipes the parser cannot read are logged and left out of the catalog.
pub fn build(
    source: &dyn RecipeSource,
    oracle: &dyn ModuleOracle,
    templates: &TemplateRegistry,
    options: SoftwareOptions,
    progress: &dyn ProgressHandler,
) -> DocResult<SoftwareCatalog> {
    let started = Instant::now();
    let paths = source.find_matching("*", "*")?;
    let total = paths.len();
    progress.on_progress(&ProgressEvent::ScanStarted { total });

    let mut groups: HashMap<String, Vec<SoftwareEntry>> = HashMap::new();
    let mut scanned = 0;
    for (index, path) in paths.iter().enumerate() {
        let parsed = if options.only_installed {
            source.full_parse(path)
        } else {
            source.shallow_parse(path)
        };
        match parsed {
            Ok(recipe) => {
                if recipe.name().is_empty() {
                    return Err(DocError::Recipe {
                        path: path.clone(),
                        message: "mandatory parameter 'name' is missing".to_string(),
                    });
                }
                let entry = entry_for(&recipe, templates);
                groups.entry(entry.name.clone()).or_default().push(entry);
                scanned += 1;
            }
            Err(DocError::RecipeSyntax { message, .. }) => {
                warn!(path = %path.display(), error = %message, "Skipping unparseable recipe");
            }
            Err(err) => return Err(err),
        }
        progress.on_progress(&ProgressEvent::RecipeProcessed {
            path: path.clone(),
            index: index + 1,
            total,
        });
    }

    let mut packages: Vec<SoftwarePackage> = groups
        .into_iter()
        .map(|(name, entries)| SoftwarePackage { name, entries })
        .collect();
    packages.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    progress.on_progress(&ProgressEvent::ScanComplete {
        packages: packages.len(),
        entries: scanned,
        scan_time: started.elapsed(),
    });

    if options.only_installed {
        let available = oracle.available_modules()?;
        for package in &mut packages {
            package.entries.retain(|e| {
                e.module_name
                    .as_ref()
                    .map_or(false, |module| available.contains(module))
            });
        }
        packages.retain(|p| !p.entries.is_empty());
        progress.on_progress(&ProgressEvent::InstalledFiltered {
            packages: packages.len(),
            entries: packages.iter().map(|p| p.entries.len()).sum(),
        });
    }

    Ok(SoftwareCatalog {
        detail: options.detail,
        packages,
    })
}

/// Lowercase first character of `name`, used for per-letter sections
fn letter_of(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_lowercase().collect())
        .unwrap_or_default()
}

/// Letters `a`..`z` that start at least one package name
fn used_letters(catalog: &SoftwareCatalog) -> Vec<char> {
    ('a'..='z')
        .filter(|c| {
            catalog
                .packages
                .iter()
                .any(|p| letter_of(&p.name) == c.to_string())
        })
        .collect()
}

/// Packages grouped by first letter, in catalog order
fn by_letter(catalog: &SoftwareCatalog) -> Vec<(String, Vec<&SoftwarePackage>)> {
    let mut groups: Vec<(String, Vec<&SoftwarePackage>)> = Vec::new();
    for package in &catalog.packages {
        let letter = letter_of(&package.name);
        match groups.last_mut() {
            Some((current, members)) if *current == letter => members.push(package),
            _ => groups.push((letter, vec![package])),
        }
    }
    groups
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn summary(catalog: &SoftwareCatalog) -> String {
    format!(
        "{} supports {} different software packages (incl. toolchains, bundles):",
        crate::NAME,
        catalog.packages.len()
    )
}

fn version_table(package: &SoftwarePackage) -> (Vec<String>, Vec<Vec<String>>) {
    let rows = package.versions();
    let mut table_titles = vec!["version".to_string()];
    let mut columns = vec![rows.iter().map(|r| literal(&r.version)).collect::<Vec<_>>()];
    if package.has_versionsuffix() {
        table_titles.push("versionsuffix".to_string());
        columns.push(
            rows.iter()
                .map(|r| {
                    if r.versionsuffix.is_empty() {
                        String::new()
                    } else {
                        literal(&r.versionsuffix)
                    }
                })
                .collect(),
        );
    }
    table_titles.push("toolchain".to_string());
    columns.push(
        rows.iter()
            .map(|r| {
                r.toolchains
                    .iter()
                    .map(|tc| literal(tc))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .collect(),
    );
    (table_titles, columns)
}

fn render_txt(catalog: &SoftwareCatalog) -> DocResult<String> {
    let mut doc = vec![String::new()];
    for package in &catalog.packages {
        doc.push(format!("* {}", package.name));
        if !catalog.detail.is_detailed() {
            continue;
        }
        doc.push(String::new());
        doc.push(one_line(package.description()));
        doc.push(String::new());
        doc.push(format!("homepage: {}", package.homepage()));
        doc.push(String::new());
        for row in package.versions() {
            let mut line = format!("  * {} v{}", package.name, row.version);
            if !row.versionsuffix.is_empty() {
                line.push_str(&format!(" (versionsuffix: '{}')", row.versionsuffix));
            }
            line.push_str(&format!(": {}", row.toolchains.join(", ")));
            doc.push(line);
        }
        doc.push(String::new());
    }
    Ok(doc.join("\n"))
}

fn render_md(catalog: &SoftwareCatalog) -> DocResult<String> {
    let letter_links: Vec<String> = used_letters(catalog)
        .iter()
        .map(|c| format!("[{}](#{})", c, c))
        .collect();
    let mut doc = vec![
        format!("# {}", TITLE),
        String::new(),
        summary(catalog),
        String::new(),
        letter_links.join(" - "),
        String::new(),
    ];

    for (letter, packages) in by_letter(catalog) {
        doc.push(String::new());
        doc.push(format!("## {}", letter.to_uppercase()));
        doc.push(String::new());

        if catalog.detail.is_detailed() {
            let links: Vec<String> = packages
                .iter()
                .map(|p| format!("[{}](#{})", p.name, p.name.to_lowercase()))
                .collect();
            doc.push(String::new());
            doc.push(links.join(" - "));
            doc.push(String::new());
        }

        for package in packages {
            if !catalog.detail.is_detailed() {
                doc.push(format!("* {}", package.name));
                continue;
            }
            doc.push(String::new());
            doc.push(format!("### {}", package.name));
            doc.push(String::new());
            doc.push(one_line(package.description()));
            doc.push(String::new());
            doc.push(format!("*homepage*: <{}>", package.homepage()));
            doc.push(String::new());
            let (titles, columns) = version_table(package);
            doc.extend(md_table(&titles, &columns));
        }
    }

    Ok(doc.join("\n"))
}

/// reST label of a package; the code point sum keeps labels of names that
/// differ only in case apart
fn rst_label(name: &str) -> String {
    let sum: u32 = name.chars().map(|c| c as u32).sum();
    format!("list_software_{}_{}", name, sum)
}

fn render_rst(catalog: &SoftwareCatalog) -> DocResult<String> {
    let letter_refs: Vec<String> = used_letters(catalog)
        .iter()
        .map(|c| format!(":ref:`list_software_letter_{}`", c))
        .collect();
    let mut doc = vec![
        TITLE.to_string(),
        "=".repeat(TITLE.len()),
        String::new(),
        summary(catalog),
        String::new(),
        letter_refs.join(" - "),
        String::new(),
    ];

    for (letter, packages) in by_letter(catalog) {
        doc.push(String::new());
        doc.push(format!(".. _list_software_letter_{}:", letter));
        doc.push(String::new());
        doc.push(format!("*{}*", letter.to_uppercase()));
        doc.push("---".to_string());
        doc.push(String::new());

        if catalog.detail.is_detailed() {
            let refs: Vec<String> = packages
                .iter()
                .map(|p| format!(":ref:`{}`", rst_label(&p.name)))
                .collect();
            doc.push(String::new());
            doc.push(refs.join(" - "));
            doc.push(String::new());
        }

        for package in packages {
            if !catalog.detail.is_detailed() {
                doc.push(format!("* {}", package.name));
                continue;
            }
            let heading = format!("*{}*", package.name);
            doc.push(String::new());
            doc.push(format!(".. _{}:", rst_label(&package.name)));
            doc.push(String::new());
            let underline = "+".repeat(heading.chars().count());
            doc.push(heading);
            doc.push(underline);
            doc.push(String::new());
            doc.push(one_line(package.description()));
            doc.push(String::new());
            doc.push(format!("*homepage*: {}", package.homepage()));
            doc.push(String::new());
            let (titles, columns) = version_table(package);
            doc.extend(rst_table(&titles, &columns));
        }
    }

    Ok(doc.join("\n"))
}

/// JSON view of an entry: description collapsed onto one line
fn json_entry(entry: &SoftwareEntry) -> SoftwareEntry {
    SoftwareEntry {
        description: one_line(&entry.description),
        ..entry.clone()
    }
}

#[derive(Serialize)]
struct NameOnly<'a> {
    name: &'a str,
}

fn to_json<T: Serialize>(value: &T) -> DocResult<String> {
    // round-trip through Value so object keys come out sorted
    let value = serde_json::to_value(value)
        .map_err(|e| DocError::Configuration(format!("Failed to serialize software entry: {}", e)))?;
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .map_err(|e| DocError::Configuration(format!("Failed to serialize software entry: {}", e)))?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn render_json(catalog: &SoftwareCatalog) -> DocResult<String> {
    let mut objects = Vec::new();
    for package in &catalog.packages {
        if catalog.detail.is_detailed() {
            for entry in &package.entries {
                objects.push(to_json(&json_entry(entry))?);
            }
        } else {
            objects.push(to_json(&NameOnly {
                name: &package.name,
            })?);
        }
    }

    if objects.is_empty() {
        return Ok("[]".to_string());
    }
    Ok(format!("[\n{}\n]", objects.join(",\n")))
}

pub const RENDERERS: RendererTable<SoftwareCatalog> = RendererTable {
    report: ReportKind::SoftwareCatalog,
    txt: Some(render_txt),
    md: Some(render_md),
    rst: Some(render_rst),
    json: Some(render_json),
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormat;

    fn entry(name: &str, version: &str, suffix: &str, toolchain: &str) -> SoftwareEntry {
        SoftwareEntry {
            name: name.to_string(),
            version: version.to_string(),
            versionsuffix: suffix.to_string(),
            toolchain: toolchain.to_string(),
            description: format!("{} is\n  a tool", name),
            homepage: format!("https://{}.org", name.to_lowercase()),
            module_name: None,
        }
    }

    fn catalog(detail: DetailLevel) -> SoftwareCatalog {
        SoftwareCatalog {
            detail,
            packages: vec![
                SoftwarePackage {
                    name: "bzip2".to_string(),
                    entries: vec![entry("bzip2", "1.0.8", "", "GCCcore/12.3.0")],
                },
                SoftwarePackage {
                    name: "Foo".to_string(),
                    entries: vec![
                        entry("Foo", "10.0", "", "foss/2023a"),
                        entry("Foo", "2.0", "-Python-3.11", "foss/2023a"),
                        entry("Foo", "2.0", "", "system"),
                        entry("Foo", "2.0", "", "foss/2023a"),
                    ],
                },
            ],
        }
    }

    #[test]
    fn test_versions_sorted_loosely_with_merged_toolchains() {
        let catalog = catalog(DetailLevel::Detailed);
        let rows = catalog.packages[1].versions();
        let keys: Vec<_> = rows
            .iter()
            .map(|r| (r.version.as_str(), r.versionsuffix.as_str()))
            .collect();
        assert_eq!(keys, vec![("2.0", ""), ("2.0", "-Python-3.11"), ("10.0", "")]);
        assert_eq!(rows[0].toolchains, vec!["foss/2023a", "system"]);
    }

    #[test]
    fn test_simple_txt_lists_names() {
        let text = RENDERERS
            .render(OutputFormat::Txt, &catalog(DetailLevel::Simple))
            .unwrap();
        assert_eq!(text, "\n* bzip2\n* Foo");
    }

    #[test]
    fn test_detailed_txt() {
        let text = RENDERERS
            .render(OutputFormat::Txt, &catalog(DetailLevel::Detailed))
            .unwrap();
        assert!(text.contains("\nFoo is a tool\n\nhomepage: https://foo.org\n"));
        assert!(text.contains("  * Foo v2.0: foss/2023a, system"));
        assert!(text.contains("  * Foo v2.0 (versionsuffix: '-Python-3.11'): foss/2023a"));
    }

    #[test]
    fn test_versionsuffix_column_only_when_needed() {
        let catalog = catalog(DetailLevel::Detailed);
        let (bzip2_titles, _) = version_table(&catalog.packages[0]);
        assert_eq!(bzip2_titles, vec!["version", "toolchain"]);
        let (foo_titles, _) = version_table(&catalog.packages[1]);
        assert_eq!(foo_titles, vec!["version", "versionsuffix", "toolchain"]);
    }

    #[test]
    fn test_md_letters_and_sections() {
        let text = RENDERERS
            .render(OutputFormat::Md, &catalog(DetailLevel::Detailed))
            .unwrap();
        assert!(text.starts_with("# List of supported software\n\nrecipedoc supports 2 different"));
        assert!(text.contains("[b](#b) - [f](#f)"));
        assert!(text.contains("## F\n"));
        assert!(text.contains("### Foo\n\nFoo is a tool\n\n*homepage*: <https://foo.org>"));
        assert!(text.contains("``foss/2023a``, ``system``"));
    }

    #[test]
    fn test_rst_labels() {
        let text = RENDERERS
            .render(OutputFormat::Rst, &catalog(DetailLevel::Detailed))
            .unwrap();
        assert!(text.contains(".. _list_software_letter_f:\n\n*F*\n---"));
        assert!(text.contains(":ref:`list_software_Foo_292`"));
        assert!(text.contains(".. _list_software_Foo_292:\n\n*Foo*\n+++++\n"));
    }

    #[test]
    fn test_rst_multiline_description_is_one_paragraph() {
        let text = RENDERERS
            .render(OutputFormat::Rst, &catalog(DetailLevel::Detailed))
            .unwrap();
        assert!(text.contains("*Foo*\n+++++\n\nFoo is a tool\n\n*homepage*: https://foo.org\n"));
        assert!(!text.contains("\n  a tool"));
    }

    #[test]
    fn test_json_simple_and_detailed() {
        let simple = RENDERERS
            .render(OutputFormat::Json, &catalog(DetailLevel::Simple))
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&simple).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[1]["name"], "Foo");

        let detailed = RENDERERS
            .render(OutputFormat::Json, &catalog(DetailLevel::Detailed))
            .unwrap();
        assert!(detailed.contains("\n    \"description\": \"bzip2 is a tool\",\n    \"homepage\""));
        let parsed: serde_json::Value = serde_json::from_str(&detailed).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 5);
        assert!(parsed[0].get("mod_name").is_none());
    }

    #[test]
    fn test_json_empty_catalog() {
        let empty = SoftwareCatalog {
            detail: DetailLevel::Simple,
            packages: vec![],
        };
        assert_eq!(RENDERERS.render(OutputFormat::Json, &empty).unwrap(), "[]");
    }
}
