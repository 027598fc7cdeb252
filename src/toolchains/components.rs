//! Compiler, MPI, linear algebra and FFT families

use super::ToolchainOption;
use crate::schema::ParamValue;

#[derive(Debug, Clone)]
pub struct CompilerFamily {
    pub family: &'static str,
    pub modules: &'static [&'static str],
    pub unique_opts: fn() -> Vec<ToolchainOption>,
}

#[derive(Debug, Clone)]
pub struct MpiFamily {
    pub family: &'static str,
    pub modules: &'static [&'static str],
    pub library_name: &'static str,
    /// Compiler wrapper option that prints the underlying link command
    pub link_info_option: &'static str,
    /// Family this one derives its options from
    pub base: Option<&'static MpiFamily>,
    pub unique_opts: fn() -> Vec<ToolchainOption>,
}

impl MpiFamily {
    /// Options of the base family (if any) overridden by this family's own
    pub fn unique_options(&self) -> Vec<ToolchainOption> {
        let mut options = self.base.map(|b| b.unique_options()).unwrap_or_default();
        for option in (self.unique_opts)() {
            match options.iter_mut().find(|o| o.name == option.name) {
                Some(existing) => *existing = option,
                None => options.push(option),
            }
        }
        options
    }

    pub fn derives_from(&self, family: &str) -> bool {
        let mut current = self.base;
        while let Some(base) = current {
            if base.family == family {
                return true;
            }
            current = base.base;
        }
        false
    }
}

#[derive(Debug, Clone)]
pub struct LinalgFamily {
    pub blas: &'static [&'static str],
    pub lapack: &'static [&'static str],
    pub scalapack: &'static [&'static str],
}

#[derive(Debug, Clone)]
pub struct FftFamily {
    pub modules: &'static [&'static str],
}

fn no_opts() -> Vec<ToolchainOption> {
    Vec::new()
}

pub fn compiler_shared_opts() -> Vec<ToolchainOption> {
    vec![
        ToolchainOption::new("32bit", false, "Compile 32bit target"),
        ToolchainOption::new("cciscxx", false, "Use CC as CXX"),
        ToolchainOption::new("cstd", ParamValue::None, "Specify C standard"),
        ToolchainOption::new("debug", false, "Enable debug"),
        ToolchainOption::new("defaultopt", false, "Default compiler optimizations"),
        ToolchainOption::new("defaultprec", false, "Default precision"),
        ToolchainOption::new("extra_cflags", ParamValue::None, "Specify extra CFLAGS options."),
        ToolchainOption::new("extra_cxxflags", ParamValue::None, "Specify extra CXXFLAGS options."),
        ToolchainOption::new("extra_fflags", ParamValue::None, "Specify extra FFLAGS options."),
        ToolchainOption::new("i8", false, "Integers are 8 byte integers"),
        ToolchainOption::new("ieee", false, "Adhere to IEEE-754 rules"),
        ToolchainOption::new("loose", false, "Loose precision"),
        ToolchainOption::new("lowopt", false, "Low compiler optimizations"),
        ToolchainOption::new("noopt", false, "Disable compiler optimizations"),
        ToolchainOption::new("openmp", false, "Enable OpenMP"),
        ToolchainOption::new("opt", false, "High compiler optimizations"),
        ToolchainOption::new("optarch", true, "Enable architecture optimizations"),
        ToolchainOption::new("packed-linker-options", false, "Pack the linker options as comma separated list"),
        ToolchainOption::new("pic", false, "Use PIC"),
        ToolchainOption::new("precise", false, "High precision"),
        ToolchainOption::new("r8", false, "Real is 8 byte real"),
        ToolchainOption::new("rpath", true, "Use RPATH wrappers when --rpath is enabled in EasyBuild configuration"),
        ToolchainOption::new("shared", false, "Build shared library"),
        ToolchainOption::new("static", false, "Build static library"),
        ToolchainOption::new("strict", false, "Strict (highest) precision"),
        ToolchainOption::new("unroll", false, "Unroll loops"),
        ToolchainOption::new("verbose", false, "Verbose output"),
        ToolchainOption::new("veryloose", false, "Very loose precision"),
        ToolchainOption::new("vectorize", ParamValue::None, "Enable compiler auto-vectorization, default except for noopt and lowopt"),
    ]
}

pub fn mpi_shared_opts() -> Vec<ToolchainOption> {
    vec![
        ToolchainOption::new("usempi", false, "Use MPI compiler as default compiler"),
    ]
}

fn gcc_opts() -> Vec<ToolchainOption> {
    vec![
        ToolchainOption::new("f2c", false, "Generate code compatible with f2c and f77"),
        ToolchainOption::new("loop", false, "Automatic loop parallellisation"),
        ToolchainOption::new("lto", false, "Enable Link Time Optimization"),
    ]
}

fn intel_opts() -> Vec<ToolchainOption> {
    vec![
        ToolchainOption::new("error-unknown-option", false, "Error instead of warning for unknown options"),
        ToolchainOption::new("intel-static", false, "Link Intel provided libraries statically"),
        ToolchainOption::new("no-icc", false, "Don't set Intel specific macros"),
        ToolchainOption::new("oneapi", ParamValue::None, "Use oneAPI compilers icx/icpx/ifx instead of classic compilers"),
        ToolchainOption::new("oneapi_c_cxx", ParamValue::None, "Use oneAPI C/C++ compilers icx/icpx instead of classic Intel C/C++ compilers"),
        ToolchainOption::new("oneapi_fortran", false, "Use oneAPI Fortran compiler ifx instead of classic Intel Fortran compiler"),
    ]
}

fn craype_opts() -> Vec<ToolchainOption> {
    vec![
        ToolchainOption::new("dynamic", true, "Generate dynamically linked executable"),
        ToolchainOption::new("mpich-mt", false, "Directs the driver to link in an alternate version of the Cray-MPICH library"),
    ]
}

fn openmpi_opts() -> Vec<ToolchainOption> {
    vec![ToolchainOption::new("usempi", false, "Use MPI compiler as default compiler")]
}

fn mpich2_opts() -> Vec<ToolchainOption> {
    vec![ToolchainOption::new("mpich-mt", false, "Link against the multi-threaded MPICH library")]
}

fn mvapich2_opts() -> Vec<ToolchainOption> {
    vec![ToolchainOption::new("ch3", ParamValue::None, "Use the ch3 device")]
}

fn impi_opts() -> Vec<ToolchainOption> {
    vec![ToolchainOption::new("impi-mt", false, "Link against the multi-threaded Intel MPI library")]
}

pub static GCC: CompilerFamily = CompilerFamily {
    family: "GCC",
    modules: &["GCC"],
    unique_opts: gcc_opts,
};

pub static GCCCORE: CompilerFamily = CompilerFamily {
    family: "GCC",
    modules: &["GCCcore"],
    unique_opts: gcc_opts,
};

pub static INTEL_COMPILERS: CompilerFamily = CompilerFamily {
    family: "Intel",
    modules: &["intel-compilers"],
    unique_opts: intel_opts,
};

pub static CRAYPE_GNU: CompilerFamily = CompilerFamily {
    family: "CrayPE",
    modules: &["PrgEnv-gnu"],
    unique_opts: craype_opts,
};

pub static OPENMPI: MpiFamily = MpiFamily {
    family: "OpenMPI",
    modules: &["OpenMPI"],
    library_name: "mpi",
    link_info_option: "-showme:link",
    base: None,
    unique_opts: openmpi_opts,
};

pub static MPICH2: MpiFamily = MpiFamily {
    family: "MPICH2",
    modules: &["MPICH2"],
    library_name: "mpich",
    link_info_option: "-show",
    base: None,
    unique_opts: mpich2_opts,
};

pub static MVAPICH2: MpiFamily = MpiFamily {
    family: "MVAPICH2",
    modules: &["MVAPICH2"],
    library_name: "mpich",
    link_info_option: "-link_info",
    base: Some(&MPICH2),
    unique_opts: mvapich2_opts,
};

pub static INTEL_MPI: MpiFamily = MpiFamily {
    family: "IntelMPI",
    modules: &["impi"],
    library_name: "mpi",
    link_info_option: "-show",
    base: None,
    unique_opts: impi_opts,
};

pub static CRAY_MPICH: MpiFamily = MpiFamily {
    family: "CrayMPICH",
    modules: &["cray-mpich"],
    library_name: "mpich",
    link_info_option: "-show",
    base: Some(&MPICH2),
    unique_opts: no_opts,
};

pub static OPENBLAS_SCALAPACK: LinalgFamily = LinalgFamily {
    blas: &["OpenBLAS"],
    lapack: &["OpenBLAS"],
    scalapack: &["ScaLAPACK"],
};

pub static IMKL: LinalgFamily = LinalgFamily {
    blas: &["imkl"],
    lapack: &["imkl"],
    scalapack: &["imkl"],
};

pub static CRAY_LIBSCI: LinalgFamily = LinalgFamily {
    blas: &["cray-libsci"],
    lapack: &["cray-libsci"],
    scalapack: &[],
};

pub static FFTW: FftFamily = FftFamily { modules: &["FFTW"] };

pub static IMKL_FFTW: FftFamily = FftFamily { modules: &["imkl"] };

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mvapich2_derives_from_mpich2() {
        assert!(MVAPICH2.derives_from("MPICH2"));
        assert!(!MPICH2.derives_from("MVAPICH2"));
        assert_eq!(MVAPICH2.modules, ["MVAPICH2"]);
        assert_eq!(MVAPICH2.library_name, "mpich");
        assert_eq!(MVAPICH2.link_info_option, "-link_info");
    }

    #[test]
    fn test_mvapich2_inherits_base_options() {
        let names: Vec<_> = MVAPICH2
            .unique_options()
            .into_iter()
            .map(|o| o.name)
            .collect();
        assert_eq!(names, vec!["mpich-mt", "ch3"]);
    }

    #[test]
    fn test_shared_opts_have_descriptions() {
        assert!(compiler_shared_opts()
            .iter()
            .all(|o| !o.description.is_empty()));
    }
}
