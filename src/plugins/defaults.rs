//! Built-in capability roots and generic plugins

use super::{PluginDescriptor, PluginRegistry, EASYBLOCK_ROOT, EXTENSION_ROOT};
use crate::schema::{Category, ParamValue, ParameterDescriptor};

/// Package holding the generic plugins
pub const GENERIC_PACKAGE: &str = "easyblocks.generic";

fn extra(name: &str, default: ParamValue, description: &str) -> ParameterDescriptor {
    ParameterDescriptor::extra(name, default, description)
}

fn generic(name: &str) -> PluginDescriptor {
    PluginDescriptor::new(name, &format!("{}.{}", GENERIC_PACKAGE, name.to_lowercase()))
}

pub(super) fn default_registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();

    registry.register_root(
        PluginDescriptor::new(EASYBLOCK_ROOT, "framework.easyblock")
            .with_doc("Generic support for building and installing software, base class for actual plugins."),
    );
    registry.register_root(
        PluginDescriptor::new(EXTENSION_ROOT, "framework.extension")
            .with_doc("Support for installing extensions."),
    );
    registry.set_location("framework.easyblock", "framework/easyblock.py");
    registry.set_location("framework.extension", "framework/extension.py");

    let plugins = vec![
        generic("ConfigureMake")
            .with_base(EASYBLOCK_ROOT)
            .with_doc("Support for building and installing applications with configure/make/make install")
            .with_extra(extra("build_cmd", ParamValue::str("make"), "Build command to use"))
            .with_extra(extra("configure_cmd", ParamValue::str("./configure"), "Configure command to use"))
            .with_extra(extra("configure_cmd_prefix", ParamValue::str(""), "Prefix to be glued before ./configure"))
            .with_extra(extra("install_cmd", ParamValue::str("make install"), "Build command to use"))
            .with_extra(extra("prefix_opt", ParamValue::None, "Prefix command line option for configure script ('--prefix=' if None)"))
            .with_extra(extra("tar_config_opts", ParamValue::Bool(false), "Override tar settings as determined by configure."))
            .with_extra(extra("test_cmd", ParamValue::None, "Test command to use ('runtest' value is appended, default: 'make')"))
            .with_step("configure_step", Some("Configure step\n- typically ./configure --prefix=/install/path style"))
            .with_step("build_step", Some("Start the actual build\n- typical: make -j X"))
            .with_step("test_step", Some("Test the compilation\n- default: None"))
            .with_step("install_step", Some("Create the installation in correct location\n- typical: make install"))
            .with_step("fetch_step", None),
        generic("CMakeMake")
            .with_base("ConfigureMake")
            .with_doc("Support for configuring build with CMake instead of traditional configure script")
            .with_extra(extra("abs_path_compilers", ParamValue::Bool(false), "Specify compilers via absolute file path (not via command names)"))
            .with_extra(extra("build_shared_libs", ParamValue::None, "Value for BUILD_SHARED_LIBS flag (None to not set)"))
            .with_extra(extra("configure_cmd", ParamValue::str("cmake"), "Configure command to use"))
            .with_extra(extra("generator", ParamValue::None, "Build file generator to use. None to use CMakes default"))
            .with_extra(extra("separate_build_dir", ParamValue::Bool(true), "Perform build in a separate directory"))
            .with_extra(extra("srcdir", ParamValue::None, "Source directory location to provide to cmake command"))
            .with_step("configure_step", Some("Configure build using cmake"))
            .with_step("test_step", Some("CMake specific test setup")),
        generic("MakeCp")
            .with_base("ConfigureMake")
            .with_doc("Software with no configure and no make install step.")
            .with_extra(ParameterDescriptor {
                plugin_specific: true,
                ..ParameterDescriptor::new(
                    "files_to_copy",
                    ParamValue::None,
                    "List of files or dirs to copy",
                    Category::Mandatory,
                )
            })
            .with_extra(extra("with_configure", ParamValue::Bool(false), "Run configure script before building"))
            .with_step("configure_step", Some("Configure build if required"))
            .with_step("install_step", Some("Install by copying specified files and directories.")),
        generic("CmdCp")
            .with_base("MakeCp")
            .with_doc("Software with no configure, no make, and no make install step.\nJust run the specified command for all sources, and copy specified files to the install dir")
            .with_extra(extra("cmds_map", ParamValue::List(vec![]), "List of regex/template command (tuple) pairs to run for each source"))
            .with_step("build_step", Some("Build by running the command with the inputfiles")),
        generic("Tarball")
            .with_base(EASYBLOCK_ROOT)
            .with_doc("Precompiled software supplied as a tarball:\n- will unpack binary and copy it to the install dir")
            .with_extra(extra("install_type", ParamValue::None, "Defaults to extract tarball into clean directory"))
            .with_extra(extra("preinstall_cmd", ParamValue::None, "Command to execute before installation"))
            .with_step("configure_step", Some("Dummy configure method"))
            .with_step("build_step", Some("Dummy build method: nothing to build"))
            .with_step("install_step", Some("Install by copying from specified source directory")),
        generic("Binary")
            .with_base(EASYBLOCK_ROOT)
            .with_doc("Support for installing software that comes in binary form.\nJust copy the sources to the install dir, or use the specified install command.")
            .with_extra(extra("extract_sources", ParamValue::Bool(false), "Whether or not to extract sources"))
            .with_extra(extra("install_cmd", ParamValue::None, "Install command to be used."))
            .with_extra(extra("prepend_to_path", ParamValue::str_list(&[""]), "Prepend the given directories (relative to install-dir) to the environment variable PATH in the module file."))
            .with_step("extract_step", Some("Move all source files to the build directory"))
            .with_step("install_step", Some("Copy all files in build directory to the install directory"))
            .with_step("build_step", None),
        generic("PackedBinary")
            .with_base("Binary")
            .with_base(EASYBLOCK_ROOT)
            .with_doc("Support for installing packed binary software.\nJust unpack the sources in the install dir")
            .with_step("install_step", Some("Copy all unpacked source directories to install directory, one-by-one.")),
        generic("Bundle")
            .with_base(EASYBLOCK_ROOT)
            .with_doc("Bundle of modules: only generate module files, nothing to build/install")
            .with_extra(extra("altroot", ParamValue::None, "Software name of dependency to use to define $EBROOT for this bundle"))
            .with_extra(extra("altversion", ParamValue::None, "Software name of dependency to use to define $EBVERSION for this bundle"))
            .with_extra(extra("components", ParamValue::List(vec![]), "List of components to install: tuples w/ name, version and easyblock to use"))
            .with_extra(extra("default_component_specs", ParamValue::Dict(vec![]), "Default specs to use for every component"))
            .with_extra(extra("sanity_check_all_components", ParamValue::Bool(false), "Enable sanity checks for all components"))
            .with_step("configure_step", Some("Collect altroot/altversion info."))
            .with_step("build_step", Some("Do nothing.")),
        generic("SystemCompiler")
            .with_base("Bundle")
            .with_external_base("SystemDetectionMixin")
            .with_doc("Support for generating a module file for the system compiler with specified name.")
            .with_extra(extra("generate_standalone_module", ParamValue::Bool(false), "Whether or not to generate a standalone module file"))
            .with_step("prepare_step", Some("Do compiler appropriate prepare step, determine system compiler version and prefix.")),
        generic("ExtensionEasyBlock")
            .with_base(EASYBLOCK_ROOT)
            .with_base(EXTENSION_ROOT)
            .with_doc("Install an extension as a separate module, or as an extension.")
            .with_extra(extra("options", ParamValue::Dict(vec![]), "Dictionary with extension options."))
            .with_step("run", Some("Common operations for extensions: unpacking sources, patching, ..."))
            .with_step("sanity_check_step", Some("Sanity check for extensions")),
        generic("PythonPackage")
            .with_base("ExtensionEasyBlock")
            .with_doc("Builds and installs a Python package, and provides a dedicated module file.")
            .with_extra(extra("download_dep_fail", ParamValue::None, "Fail if downloaded dependencies are detected"))
            .with_extra(extra("pip_ignore_installed", ParamValue::Bool(true), "Let pip ignore installed Python packages (i.e. don't remove them)"))
            .with_extra(extra("req_py_majver", ParamValue::None, "Required major Python version"))
            .with_extra(extra("sanity_pip_check", ParamValue::Bool(true), "Run 'python -m pip check' to ensure all required Python packages are installed"))
            .with_extra(extra("use_pip", ParamValue::Bool(true), "Install using 'pip install'"))
            .with_step("configure_step", Some("Configure Python package build/install."))
            .with_step("build_step", Some("Build Python package using setup.py"))
            .with_step("test_step", Some("Test the built Python package."))
            .with_step("install_step", Some("Install Python package to a custom path using setup.py")),
        generic("PythonBundle")
            .with_base("Bundle")
            .with_doc("Bundle of modules: only generate module files, nothing to build/install")
            .with_step("prepare_step", Some("Prepare for installing bundle of Python packages.")),
        generic("RPackage")
            .with_base("ExtensionEasyBlock")
            .with_doc("Install an R package as a separate module, or as an extension.")
            .with_extra(extra("exts_subdir", ParamValue::str(""), "Subdirectory where R extensions should be installed info"))
            .with_extra(extra("unpack_sources", ParamValue::None, "Unpack sources before installation"))
            .with_step("configure_step", Some("No configuration for installing R packages.")),
    ];

    for plugin in plugins {
        registry.declare_module(&plugin.module);
        if plugin.name != "SystemCompiler" && plugin.name != "CmdCp" {
            let location = format!("{}.py", plugin.module.replace('.', "/"));
            registry.set_location(&plugin.module, &location);
        }
        registry.register(plugin);
    }

    registry
}
