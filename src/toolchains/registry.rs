use tracing::debug;

use super::components::*;
use super::{ComposedToolchain, Toolchain, SYSTEM_TOOLCHAIN_NAME};
use crate::error::{DocError, DocResult};

/// Builds a toolchain instance for the given version
pub type ToolchainFactory = fn(&str) -> Box<dyn Toolchain>;

/// Version used when a toolchain is only built to read its static tables
pub const PLACEHOLDER_VERSION: &str = "1.2.3";

/// Minimum Jaro-Winkler similarity for a name to be suggested
const SUGGESTION_THRESHOLD: f64 = 0.8;

pub struct ToolchainRegistry {
    factories: Vec<(String, ToolchainFactory)>,
}

impl Default for ToolchainRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolchainRegistry {
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(SYSTEM_TOOLCHAIN_NAME, |v| {
            Box::new(ComposedToolchain::new(SYSTEM_TOOLCHAIN_NAME, v))
        });
        registry.register("GCC", |v| {
            Box::new(ComposedToolchain::new("GCC", v).with_compiler(&GCC))
        });
        registry.register("GCCcore", |v| {
            Box::new(ComposedToolchain::new("GCCcore", v).with_compiler(&GCCCORE))
        });
        registry.register("gompi", |v| {
            Box::new(
                ComposedToolchain::new("gompi", v)
                    .with_compiler(&GCC)
                    .with_mpi(&OPENMPI),
            )
        });
        registry.register("gmvapich2", |v| {
            Box::new(
                ComposedToolchain::new("gmvapich2", v)
                    .with_compiler(&GCC)
                    .with_mpi(&MVAPICH2),
            )
        });
        registry.register("foss", |v| {
            Box::new(
                ComposedToolchain::new("foss", v)
                    .with_compiler(&GCC)
                    .with_mpi(&OPENMPI)
                    .with_linalg(&OPENBLAS_SCALAPACK)
                    .with_fft(&FFTW),
            )
        });
        registry.register("intel-compilers", |v| {
            Box::new(ComposedToolchain::new("intel-compilers", v).with_compiler(&INTEL_COMPILERS))
        });
        registry.register("iimpi", |v| {
            Box::new(
                ComposedToolchain::new("iimpi", v)
                    .with_compiler(&INTEL_COMPILERS)
                    .with_mpi(&INTEL_MPI),
            )
        });
        registry.register("intel", |v| {
            Box::new(
                ComposedToolchain::new("intel", v)
                    .with_compiler(&INTEL_COMPILERS)
                    .with_mpi(&INTEL_MPI)
                    .with_linalg(&IMKL)
                    .with_fft(&IMKL_FFTW),
            )
        });
        registry.register("CrayGNU", |v| {
            Box::new(
                ComposedToolchain::new("CrayGNU", v)
                    .with_compiler(&CRAYPE_GNU)
                    .with_mpi(&CRAY_MPICH)
                    .with_linalg(&CRAY_LIBSCI),
            )
        });

        registry
    }

    /// Registers a toolchain, replacing an earlier one with the same name
    pub fn register(&mut self, name: &str, factory: ToolchainFactory) {
        match self.factories.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = factory,
            None => self.factories.push((name.to_string(), factory)),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.iter().map(|(n, _)| n.as_str()).collect();
        names.sort_by_key(|n| n.to_lowercase());
        names
    }

    /// Every registered toolchain, built with a placeholder version, sorted
    /// case-insensitively by name
    pub fn instantiate_all(&self) -> Vec<Box<dyn Toolchain>> {
        let mut toolchains: Vec<Box<dyn Toolchain>> = self
            .factories
            .iter()
            .map(|(_, factory)| factory(PLACEHOLDER_VERSION))
            .collect();
        toolchains.sort_by_key(|tc| tc.name().to_lowercase());
        toolchains
    }

    /// Looks up a toolchain by exact name
    pub fn search(&self, name: &str) -> DocResult<Box<dyn Toolchain>> {
        match self.factories.iter().find(|(n, _)| n == name) {
            Some((_, factory)) => Ok(factory(PLACEHOLDER_VERSION)),
            None => {
                let suggestion = self.suggest(name);
                debug!(toolchain = name, suggestion = ?suggestion, "unknown toolchain");
                Err(DocError::UnknownToolchain {
                    name: name.to_string(),
                    suggestion,
                })
            }
        }
    }

    fn suggest(&self, name: &str) -> Option<String> {
        let wanted = name.to_lowercase();
        self.factories
            .iter()
            .map(|(n, _)| (n, strsim::jaro_winkler(&wanted, &n.to_lowercase())))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(n, _)| n.clone())
    }
}
