//! Toolchain registry
//!
//! A toolchain bundles a compiler with optional MPI, linear algebra and FFT
//! components. Each registered toolchain is built from a placeholder version
//! only so its component modules and option tables can be read.

pub mod components;
pub mod registry;

pub use components::{CompilerFamily, FftFamily, LinalgFamily, MpiFamily};
pub use registry::ToolchainRegistry;

use crate::render::nub;
use crate::schema::ParamValue;

/// Name of the reserved toolchain for recipes built with the system compiler
pub const SYSTEM_TOOLCHAIN_NAME: &str = "system";

/// Legacy spelling still accepted in recipes
const DUMMY_TOOLCHAIN_NAME: &str = "dummy";

/// Whether `name` refers to the system toolchain
pub fn is_system_toolchain(name: &str) -> bool {
    name == SYSTEM_TOOLCHAIN_NAME || name == DUMMY_TOOLCHAIN_NAME
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentKind {
    Compiler,
    Mpi,
    Blas,
    Lapack,
    Scalapack,
    Fft,
}

impl ComponentKind {
    pub fn key(&self) -> &'static str {
        match self {
            ComponentKind::Compiler => "COMPILER",
            ComponentKind::Mpi => "MPI",
            ComponentKind::Blas => "BLAS",
            ComponentKind::Lapack => "LAPACK",
            ComponentKind::Scalapack => "SCALAPACK",
            ComponentKind::Fft => "FFT",
        }
    }
}

/// Option understood by a toolchain, with its default and description
#[derive(Debug, Clone, PartialEq)]
pub struct ToolchainOption {
    pub name: String,
    pub default: ParamValue,
    pub description: String,
}

impl ToolchainOption {
    pub fn new(name: &str, default: impl Into<ParamValue>, description: &str) -> Self {
        Self {
            name: name.to_string(),
            default: default.into(),
            description: description.to_string(),
        }
    }
}

/// Component modules making up a toolchain, keyed by component kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainDefinition {
    components: Vec<(ComponentKind, Vec<String>)>,
}

impl ToolchainDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: ComponentKind, modules: &[&str]) {
        let modules: Vec<String> = modules.iter().map(|m| m.to_string()).collect();
        match self.components.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, existing)) => existing.extend(modules),
            None => self.components.push((kind, modules)),
        }
    }

    pub fn get(&self, kind: ComponentKind) -> &[String] {
        self.components
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, modules)| modules.as_slice())
            .unwrap_or_default()
    }

    pub fn compilers(&self) -> &[String] {
        self.get(ComponentKind::Compiler)
    }

    pub fn mpi(&self) -> &[String] {
        self.get(ComponentKind::Mpi)
    }

    /// BLAS, LAPACK and ScaLAPACK modules merged, first occurrence wins
    pub fn linalg(&self) -> Vec<String> {
        nub(
            [ComponentKind::Blas, ComponentKind::Lapack, ComponentKind::Scalapack]
                .iter()
                .flat_map(|kind| self.get(*kind).iter().cloned()),
        )
    }

    pub fn fft(&self) -> &[String] {
        self.get(ComponentKind::Fft)
    }

    /// Every component module, sorted and deduplicated
    pub fn all_modules(&self) -> Vec<String> {
        let mut modules: Vec<String> = self
            .components
            .iter()
            .flat_map(|(_, modules)| modules.iter().cloned())
            .collect();
        modules.sort();
        modules.dedup();
        modules
    }
}

pub trait Toolchain {
    fn name(&self) -> &str;

    fn version(&self) -> &str;

    fn definition(&self) -> ToolchainDefinition;

    fn compiler_shared_opts(&self) -> Vec<ToolchainOption> {
        Vec::new()
    }

    fn compiler_unique_opts(&self) -> Vec<ToolchainOption> {
        Vec::new()
    }

    fn mpi_shared_opts(&self) -> Vec<ToolchainOption> {
        Vec::new()
    }

    fn mpi_unique_opts(&self) -> Vec<ToolchainOption> {
        Vec::new()
    }

    /// All option tables merged, later tables overriding earlier ones,
    /// sorted by option name
    fn options(&self) -> Vec<ToolchainOption> {
        let mut merged: Vec<ToolchainOption> = Vec::new();
        let tables = [
            self.compiler_shared_opts(),
            self.compiler_unique_opts(),
            self.mpi_shared_opts(),
            self.mpi_unique_opts(),
        ];
        for option in tables.into_iter().flatten() {
            match merged.iter_mut().find(|o| o.name == option.name) {
                Some(existing) => *existing = option,
                None => merged.push(option),
            }
        }
        merged.sort_by(|a, b| a.name.cmp(&b.name));
        merged
    }
}

/// A toolchain assembled from component families
#[derive(Debug, Clone)]
pub struct ComposedToolchain {
    name: String,
    version: String,
    compiler: Option<&'static CompilerFamily>,
    mpi: Option<&'static MpiFamily>,
    linalg: Option<&'static LinalgFamily>,
    fft: Option<&'static FftFamily>,
}

impl ComposedToolchain {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            compiler: None,
            mpi: None,
            linalg: None,
            fft: None,
        }
    }

    pub fn with_compiler(mut self, compiler: &'static CompilerFamily) -> Self {
        self.compiler = Some(compiler);
        self
    }

    pub fn with_mpi(mut self, mpi: &'static MpiFamily) -> Self {
        self.mpi = Some(mpi);
        self
    }

    pub fn with_linalg(mut self, linalg: &'static LinalgFamily) -> Self {
        self.linalg = Some(linalg);
        self
    }

    pub fn with_fft(mut self, fft: &'static FftFamily) -> Self {
        self.fft = Some(fft);
        self
    }
}

impl Toolchain for ComposedToolchain {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn definition(&self) -> ToolchainDefinition {
        let mut definition = ToolchainDefinition::new();
        if let Some(compiler) = self.compiler {
            definition.add(ComponentKind::Compiler, compiler.modules);
        }
        if let Some(mpi) = self.mpi {
            definition.add(ComponentKind::Mpi, mpi.modules);
        }
        if let Some(linalg) = self.linalg {
            definition.add(ComponentKind::Blas, linalg.blas);
            definition.add(ComponentKind::Lapack, linalg.lapack);
            if !linalg.scalapack.is_empty() {
                definition.add(ComponentKind::Scalapack, linalg.scalapack);
            }
        }
        if let Some(fft) = self.fft {
            definition.add(ComponentKind::Fft, fft.modules);
        }
        definition
    }

    fn compiler_shared_opts(&self) -> Vec<ToolchainOption> {
        match self.compiler {
            Some(_) => components::compiler_shared_opts(),
            None => Vec::new(),
        }
    }

    fn compiler_unique_opts(&self) -> Vec<ToolchainOption> {
        self.compiler
            .map(|compiler| (compiler.unique_opts)())
            .unwrap_or_default()
    }

    fn mpi_shared_opts(&self) -> Vec<ToolchainOption> {
        match self.mpi {
            Some(_) => components::mpi_shared_opts(),
            None => Vec::new(),
        }
    }

    fn mpi_unique_opts(&self) -> Vec<ToolchainOption> {
        self.mpi.map(|mpi| mpi.unique_options()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use components::{FFTW, GCC, OPENBLAS_SCALAPACK, OPENMPI};

    fn foss() -> ComposedToolchain {
        ComposedToolchain::new("foss", "2023a")
            .with_compiler(&GCC)
            .with_mpi(&OPENMPI)
            .with_linalg(&OPENBLAS_SCALAPACK)
            .with_fft(&FFTW)
    }

    #[test]
    fn test_definition_components() {
        let definition = foss().definition();
        assert_eq!(definition.compilers(), ["GCC".to_string()]);
        assert_eq!(definition.mpi(), ["OpenMPI".to_string()]);
        assert_eq!(definition.linalg(), vec!["OpenBLAS", "ScaLAPACK"]);
        assert_eq!(definition.fft(), ["FFTW".to_string()]);
    }

    #[test]
    fn test_all_modules_sorted_and_unique() {
        let modules = foss().definition().all_modules();
        assert_eq!(modules, vec!["FFTW", "GCC", "OpenBLAS", "OpenMPI", "ScaLAPACK"]);
    }

    #[test]
    fn test_options_sorted_and_merged() {
        let options = foss().options();
        let names: Vec<_> = options.iter().map(|o| o.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(names.contains(&"usempi"));
        assert!(names.contains(&"opt"));
    }

    #[test]
    fn test_bare_toolchain_has_no_options() {
        let tc = ComposedToolchain::new(SYSTEM_TOOLCHAIN_NAME, "1.2.3");
        assert!(tc.options().is_empty());
        assert!(tc.definition().all_modules().is_empty());
    }

    #[test]
    fn test_system_toolchain_names() {
        assert!(is_system_toolchain("system"));
        assert!(is_system_toolchain("dummy"));
        assert!(!is_system_toolchain("GCC"));
    }
}
