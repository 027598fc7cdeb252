//! Toolchain catalog and per-toolchain option listing

use crate::error::DocResult;
use crate::format::ReportKind;
use crate::render::{
    literal, md_title_and_table, rst_title_and_table, titles, RendererTable, INDENT_4SPACES,
};
use crate::toolchains::{Toolchain, ToolchainDefinition, ToolchainOption, ToolchainRegistry};

const CATALOG_TITLE: &str = "List of known toolchains";

/// Marks a component a toolchain does not have
const NONE_TEXT: &str = "*(none)*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainCatalog {
    /// (name, components), sorted case-insensitively by name
    pub toolchains: Vec<(String, ToolchainDefinition)>,
}

pub fn build_catalog(registry: &ToolchainRegistry) -> ToolchainCatalog {
    ToolchainCatalog {
        toolchains: registry
            .instantiate_all()
            .iter()
            .map(|tc| (tc.name().to_string(), tc.definition()))
            .collect(),
    }
}

fn joined_or_none(modules: &[String]) -> String {
    if modules.is_empty() {
        NONE_TEXT.to_string()
    } else {
        modules.join(", ")
    }
}

/// Cray toolchains pull their MPI and math libraries from the Cray
/// programming environment instead of separate modules
fn is_cray(name: &str) -> bool {
    name.to_lowercase().contains("cray")
}

fn catalog_table(catalog: &ToolchainCatalog) -> (Vec<String>, Vec<Vec<String>>) {
    let mut columns: Vec<Vec<String>> = vec![Vec::new(); 5];
    for (name, definition) in &catalog.toolchains {
        columns[0].push(format!("**{}**", name));
        if is_cray(name) {
            columns[1].push(definition.compilers().join(", "));
            columns[2].push("cray-mpich".to_string());
            columns[3].push("cray-libsci".to_string());
            columns[4].push(NONE_TEXT.to_string());
        } else {
            columns[1].push(joined_or_none(definition.compilers()));
            columns[2].push(joined_or_none(definition.mpi()));
            columns[3].push(joined_or_none(&definition.linalg()));
            columns[4].push(joined_or_none(definition.fft()));
        }
    }
    (
        titles(&["Name", "Compiler(s)", "MPI", "Linear algebra", "FFT"]),
        columns,
    )
}

fn catalog_txt(catalog: &ToolchainCatalog) -> DocResult<String> {
    let mut toolchains: Vec<&(String, ToolchainDefinition)> = catalog.toolchains.iter().collect();
    toolchains.sort_by(|a, b| a.0.cmp(&b.0));

    let mut doc = vec![format!(
        "{} (toolchain name: module[, module, ...]):",
        CATALOG_TITLE
    )];
    for (name, definition) in toolchains {
        doc.push(format!("\t{}: {}", name, definition.all_modules().join(", ")));
    }
    Ok(doc.join("\n"))
}

fn catalog_md(catalog: &ToolchainCatalog) -> DocResult<String> {
    let (titles, columns) = catalog_table(catalog);
    Ok(md_title_and_table(Some(CATALOG_TITLE), &titles, &columns, 1).join("\n"))
}

fn catalog_rst(catalog: &ToolchainCatalog) -> DocResult<String> {
    let (titles, columns) = catalog_table(catalog);
    Ok(rst_title_and_table(Some(CATALOG_TITLE), &titles, &columns).join("\n"))
}

pub const CATALOG_RENDERERS: RendererTable<ToolchainCatalog> = RendererTable {
    report: ReportKind::ToolchainCatalog,
    txt: Some(catalog_txt),
    md: Some(catalog_md),
    rst: Some(catalog_rst),
    json: None,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ToolchainOptions {
    pub name: String,
    pub options: Vec<ToolchainOption>,
}

pub fn build_options(toolchain: &dyn Toolchain) -> ToolchainOptions {
    ToolchainOptions {
        name: toolchain.name().to_string(),
        options: toolchain.options(),
    }
}

fn options_title(options: &ToolchainOptions) -> String {
    format!("Available options for {} toolchain", options.name)
}

fn options_table(options: &ToolchainOptions) -> (Vec<String>, Vec<Vec<String>>) {
    (
        titles(&["option", "description", "default"]),
        vec![
            options.options.iter().map(|o| literal(&o.name)).collect(),
            options.options.iter().map(|o| o.description.clone()).collect(),
            options
                .options
                .iter()
                .map(|o| literal(&o.default.to_string()))
                .collect(),
        ],
    )
}

fn options_txt(options: &ToolchainOptions) -> DocResult<String> {
    let mut doc = vec![format!("{}:", options_title(options))];
    doc.extend(options.options.iter().map(|o| {
        format!(
            "{}{}: {} (default: {})",
            INDENT_4SPACES, o.name, o.description, o.default
        )
    }));
    Ok(doc.join("\n"))
}

fn options_md(options: &ToolchainOptions) -> DocResult<String> {
    let (titles, columns) = options_table(options);
    Ok(md_title_and_table(Some(&options_title(options)), &titles, &columns, 2).join("\n"))
}

fn options_rst(options: &ToolchainOptions) -> DocResult<String> {
    let (titles, columns) = options_table(options);
    Ok(rst_title_and_table(Some(&options_title(options)), &titles, &columns).join("\n"))
}

pub const OPTION_RENDERERS: RendererTable<ToolchainOptions> = RendererTable {
    report: ReportKind::ToolchainOptions,
    txt: Some(options_txt),
    md: Some(options_md),
    rst: Some(options_rst),
    json: None,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormat;

    fn catalog() -> ToolchainCatalog {
        build_catalog(&ToolchainRegistry::with_defaults())
    }

    fn row<'a>(text: &'a str, name: &str) -> &'a str {
        text.lines()
            .find(|l| l.contains(&format!("**{}**", name)))
            .unwrap()
    }

    #[test]
    fn test_md_table_marks_missing_components() {
        let text = CATALOG_RENDERERS.render(OutputFormat::Md, &catalog()).unwrap();
        assert!(text.starts_with("# List of known toolchains\n\n"));
        let gcc = row(&text, "GCC");
        assert_eq!(gcc.matches(NONE_TEXT).count(), 3);
        let foss = row(&text, "foss");
        assert!(!foss.contains(NONE_TEXT));
        assert!(foss.contains("OpenBLAS, ScaLAPACK"));
    }

    #[test]
    fn test_cray_toolchains_use_programming_environment() {
        let text = CATALOG_RENDERERS.render(OutputFormat::Rst, &catalog()).unwrap();
        let cray = row(&text, "CrayGNU");
        assert!(cray.contains("cray-mpich"));
        assert!(cray.contains("cray-libsci"));
        assert!(cray.contains(NONE_TEXT));
    }

    #[test]
    fn test_txt_lists_sorted_modules() {
        let text = CATALOG_RENDERERS.render(OutputFormat::Txt, &catalog()).unwrap();
        assert!(text.starts_with(
            "List of known toolchains (toolchain name: module[, module, ...]):\n\tCrayGNU: "
        ));
        assert!(text.contains("\tfoss: FFTW, GCC, OpenBLAS, OpenMPI, ScaLAPACK"));
        assert!(text.ends_with("\tsystem: "));
    }

    #[test]
    fn test_options_listing() {
        let registry = ToolchainRegistry::with_defaults();
        let gmvapich2 = registry.search("gmvapich2").unwrap();
        let options = build_options(gmvapich2.as_ref());

        let text = OPTION_RENDERERS.render(OutputFormat::Txt, &options).unwrap();
        assert!(text.starts_with("Available options for gmvapich2 toolchain:\n"));
        assert!(text.contains("    usempi: "));
        assert!(text.contains("    mpich-mt: "));

        let md = OPTION_RENDERERS.render(OutputFormat::Md, &options).unwrap();
        assert!(md.starts_with("## Available options for gmvapich2 toolchain\n"));
        assert!(md.contains("``False``"));
    }
}
