//! Plugin hierarchy and overview integration tests

use std::fs;

use recipedoc::docs::OverviewOptions;
use recipedoc::format::DetailLevel;
use recipedoc::plugins::defaults::GENERIC_PACKAGE;
use recipedoc::plugins::{EASYBLOCK_ROOT, EXTENSION_ROOT};
use recipedoc::{DocError, DocGenerator, OutputFormat, PluginDescriptor, PluginRegistry};
use tempfile::TempDir;

fn generator_with(registry: PluginRegistry) -> DocGenerator {
    DocGenerator {
        plugins: registry,
        ..DocGenerator::with_defaults()
    }
}

fn small_registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry.register_root(PluginDescriptor::new(EASYBLOCK_ROOT, "framework.easyblock"));
    registry.register_root(PluginDescriptor::new(EXTENSION_ROOT, "framework.extension"));
    registry.register(
        PluginDescriptor::new("MakeCp", &format!("{}.makecp", GENERIC_PACKAGE))
            .with_base(EASYBLOCK_ROOT)
            .with_doc("Build with make, install by copying")
            .with_step("build_step", Some("Run make"))
            .with_step("install_step", Some("Copy files")),
    );
    registry.declare_module(&format!("{}.makecp", GENERIC_PACKAGE));
    registry
}

#[test]
fn test_hierarchy_leaf_root_is_single_line() {
    let generator = generator_with(small_registry());
    for format in [OutputFormat::Txt, OutputFormat::Md, OutputFormat::Rst] {
        let text = generator.plugin_hierarchy(DetailLevel::Simple, format).unwrap();
        let last = text.lines().last().unwrap();
        assert!(last.contains(EXTENSION_ROOT), "{}: {}", format, text);
        assert!(!text.contains(&format!("{}\n|--", EXTENSION_ROOT)));
    }
}

#[test]
fn test_hierarchy_with_defaults_contains_generic_plugins() {
    let text = DocGenerator::with_defaults()
        .plugin_hierarchy(DetailLevel::Detailed, OutputFormat::Txt)
        .unwrap();
    assert!(text.starts_with("EasyBlock (framework.easyblock @ framework/easyblock.py)\n"));
    assert!(text.contains("|-- ConfigureMake (easyblocks.generic.configuremake"));
}

#[test]
fn test_overview_reads_example_recipes() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("MakeCp.eb"),
        "name = 'Example'\nversion = '1.0'\n\nfiles_to_copy = ['bin']\n",
    )
    .unwrap();
    let mut options = OverviewOptions::with_defaults().with_examples_dir(dir.path());
    options.common_params.clear();

    let generator = generator_with(small_registry());
    let md = generator.plugin_overview(&options, OutputFormat::Md).unwrap();
    assert!(md.contains("## ``MakeCp``"));
    assert!(md.contains("### Customised steps in ``MakeCp`` plugin"));
    assert!(md.contains("* ``build_step`` - Run make"));
    assert!(!md.contains("install_step"));
    assert!(md.contains("```python\nname = 'Example'\nversion = '1.0'\n\nfiles_to_copy = ['bin']\n```"));

    let rst = generator.plugin_overview(&options, OutputFormat::Rst).unwrap();
    assert!(rst.contains(".. code::\n\n    name = 'Example'\n    version = '1.0'\n\n    files_to_copy"));
}

#[test]
fn test_overview_without_example_dir_has_no_example() {
    let mut options = OverviewOptions::with_defaults();
    options.common_params.clear();
    let md = generator_with(small_registry())
        .plugin_overview(&options, OutputFormat::Md)
        .unwrap();
    assert!(!md.contains("Example recipe"));
}

#[test]
fn test_module_without_plugins_is_configuration_error() {
    let mut registry = small_registry();
    registry.declare_module(&format!("{}.empty", GENERIC_PACKAGE));

    let err = generator_with(registry)
        .plugin_overview(&OverviewOptions::with_defaults(), OutputFormat::Md)
        .unwrap_err();
    match err {
        DocError::Configuration(message) => assert!(message.contains("easyblocks.generic.empty")),
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_unknown_common_parameter() {
    let mut options = OverviewOptions::with_defaults();
    options.common_params = vec![("MakeCp".to_string(), vec!["not_a_parameter".to_string()])];

    let err = generator_with(small_registry())
        .plugin_overview(&options, OutputFormat::Rst)
        .unwrap_err();
    assert!(matches!(
        err,
        DocError::UnknownParameter { ref plugin, ref parameter }
            if plugin == "MakeCp" && parameter == "not_a_parameter"
    ));
}

#[test]
fn test_parameter_catalog_hides_hidden_category() {
    let generator = DocGenerator::with_defaults();
    for format in [OutputFormat::Txt, OutputFormat::Md, OutputFormat::Rst] {
        let text = generator.parameter_catalog(None, format).unwrap();
        assert!(!text.contains("parsed_by_generator"), "{}", format);
        assert!(!text.to_uppercase().contains("HIDDEN PARAMETERS"), "{}", format);
    }
}

#[test]
fn test_parameter_catalog_marks_plugin_extras() {
    let text = DocGenerator::with_defaults()
        .parameter_catalog(Some("ConfigureMake"), OutputFormat::Txt)
        .unwrap();
    assert!(text.contains("(* indicates specific to the ConfigureMake plugin)"));
    assert!(text.contains("configure_cmd*"));
}
