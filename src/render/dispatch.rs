//! Format dispatch
//!
//! Each report declares one [`RendererTable`]: a fixed slot per output format
//! holding either a renderer function or nothing. Looking up an empty slot is
//! an [`DocError::UnsupportedFormat`] error, raised before any text is built.

use crate::error::{DocError, DocResult};
use crate::format::{OutputFormat, ReportKind};

/// Renders a format-neutral catalog `A` into text
pub type RenderFn<A> = fn(&A) -> DocResult<String>;

pub struct RendererTable<A: 'static> {
    pub report: ReportKind,
    pub txt: Option<RenderFn<A>>,
    pub md: Option<RenderFn<A>>,
    pub rst: Option<RenderFn<A>>,
    pub json: Option<RenderFn<A>>,
}

impl<A> RendererTable<A> {
    pub fn lookup(&self, format: OutputFormat) -> Option<RenderFn<A>> {
        match format {
            OutputFormat::Txt => self.txt,
            OutputFormat::Md => self.md,
            OutputFormat::Rst => self.rst,
            OutputFormat::Json => self.json,
        }
    }

    pub fn supports(&self, format: OutputFormat) -> bool {
        self.lookup(format).is_some()
    }

    /// Fails early, without building anything, when `format` has no renderer
    pub fn ensure_supported(&self, format: OutputFormat) -> DocResult<()> {
        if self.supports(format) {
            Ok(())
        } else {
            Err(DocError::unsupported(self.report, format))
        }
    }

    pub fn render(&self, format: OutputFormat, catalog: &A) -> DocResult<String> {
        let renderer = self
            .lookup(format)
            .ok_or_else(|| DocError::unsupported(self.report, format))?;
        tracing::debug!(report = %self.report, format = %format, "rendering report");
        renderer(catalog)
    }
}

/// Whether `report` can be rendered in `format`
pub fn is_supported(report: ReportKind, format: OutputFormat) -> bool {
    use crate::docs::*;

    match report {
        ReportKind::ParameterCatalog => params::RENDERERS.supports(format),
        ReportKind::TemplateCatalog => templates::RENDERERS.supports(format),
        ReportKind::LicenseCatalog => constants::LICENSE_RENDERERS.supports(format),
        ReportKind::ConstantCatalog => constants::CONSTANT_RENDERERS.supports(format),
        ReportKind::ConfigFileConstants => constants::CONFIG_FILE_RENDERERS.supports(format),
        ReportKind::PluginHierarchy => hierarchy::RENDERERS.supports(format),
        ReportKind::PluginOverview => overview::RENDERERS.supports(format),
        ReportKind::SoftwareCatalog => software::RENDERERS.supports(format),
        ReportKind::ToolchainCatalog => toolchains::CATALOG_RENDERERS.supports(format),
        ReportKind::ToolchainOptions => toolchains::OPTION_RENDERERS.supports(format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shout(s: &String) -> DocResult<String> {
        Ok(s.to_uppercase())
    }

    const TABLE: RendererTable<String> = RendererTable {
        report: ReportKind::LicenseCatalog,
        txt: Some(shout),
        md: None,
        rst: None,
        json: None,
    };

    #[test]
    fn test_render_calls_bound_renderer() {
        assert_eq!(
            TABLE.render(OutputFormat::Txt, &"hi".to_string()).unwrap(),
            "HI"
        );
    }

    #[test]
    fn test_empty_slot_is_unsupported() {
        let err = TABLE
            .render(OutputFormat::Md, &"hi".to_string())
            .unwrap_err();
        match err {
            DocError::UnsupportedFormat { report, format } => {
                assert_eq!(report, ReportKind::LicenseCatalog);
                assert_eq!(format, OutputFormat::Md);
            }
            other => panic!("Expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_json_is_unsupported_for_most_reports() {
        for report in ReportKind::all() {
            if *report != ReportKind::SoftwareCatalog {
                assert!(!is_supported(*report, OutputFormat::Json), "{}", report);
            }
        }
        assert!(is_supported(ReportKind::SoftwareCatalog, OutputFormat::Json));
    }
}
