//! Toolchain configuration derived from the environment and CLI options.
//!
//! [`GlobalConfig`] is read once per invocation and never mutated. Every
//! environment variable is optional; absent variables fall back to the
//! defaults below. Flag and file-list variables are split on whitespace.

use camino::Utf8PathBuf;
use miette::Diagnostic;
use mockable::Env;
use std::env::VarError;
use thiserror::Error;
use toolchain_env::{
    CC_ENV, CFLAGS_ENV, CXX_ENV, CXXFLAGS_ENV, FC_ENV, FCFLAGS_ENV, LIB_ENV, OBJ_ENV, SRC_ENV,
};

/// Fortran compiler used when `FC` is unset.
pub const DEFAULT_FC: &str = "gfortran -ffree-line-length-none";
/// C compiler used when `CC` is unset.
pub const DEFAULT_CC: &str = "gcc";
/// C++ compiler used when `CXX` is unset.
pub const DEFAULT_CXX: &str = "g++";
/// Optimisation flags used when a language's flag variable is unset.
pub const DEFAULT_OPT_FLAGS: &str = "-O2";

/// Errors arising from malformed configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An extra source file has an extension no compiler rule accepts.
    #[error("unrecognised file type for extra source `{path}`")]
    #[diagnostic(
        code(irpninja::config::unrecognised_file_type),
        help("extra sources must end in .f, .f90, .c, .cxx or .cpp")
    )]
    UnrecognisedFileType {
        /// The offending source path.
        path: Utf8PathBuf,
    },
    /// Two edges would produce the same output path.
    #[error("`{path}` would be produced by both {first} and {second}")]
    #[diagnostic(
        code(irpninja::config::duplicate_output),
        help("extra sources outside the project root keep only their file name; rename one of them")
    )]
    DuplicateOutput {
        /// The contested output path.
        path: Utf8PathBuf,
        /// Producer of the first edge.
        first: String,
        /// Producer of the second edge.
        second: String,
    },
    /// An environment variable is set but is not valid Unicode.
    #[error("environment variable `{name}` is not valid Unicode")]
    #[diagnostic(code(irpninja::config::invalid_env_var))]
    InvalidEnvVar {
        /// Variable name.
        name: &'static str,
    },
}

/// Feature switches and include directories supplied by the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Compile the assertion stack support unit.
    pub assertions: bool,
    /// Compile the shared-memory lock support unit.
    pub locking: bool,
    /// Compile the profiling instrumentation units.
    pub profiling: bool,
    /// Extra include directories, relative to the scratch directory.
    pub include_dirs: Vec<Utf8PathBuf>,
}

/// Compiler invocations and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Fortran compiler invocation.
    pub fc: String,
    /// C compiler invocation.
    pub cc: String,
    /// C++ compiler invocation.
    pub cxx: String,
    /// Fortran compile flags, space separated.
    pub fcflags: String,
    /// C compile flags, space separated.
    pub cflags: String,
    /// C++ compile flags, space separated.
    pub cxxflags: String,
    /// Link libraries, space separated.
    pub lib: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            fc: DEFAULT_FC.to_owned(),
            cc: DEFAULT_CC.to_owned(),
            cxx: DEFAULT_CXX.to_owned(),
            fcflags: DEFAULT_OPT_FLAGS.to_owned(),
            cflags: DEFAULT_OPT_FLAGS.to_owned(),
            cxxflags: DEFAULT_OPT_FLAGS.to_owned(),
            lib: String::new(),
        }
    }
}

/// Read-only configuration snapshot for one graph build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalConfig {
    /// Compiler invocations and flags.
    pub toolchain: Toolchain,
    /// Extra source files from `SRC`, relative to the project root.
    pub extra_sources: Vec<Utf8PathBuf>,
    /// Extra object files from `OBJ`, relative to the project root.
    pub extra_objects: Vec<Utf8PathBuf>,
    /// CLI-controlled feature switches.
    pub options: BuildOptions,
}

impl GlobalConfig {
    /// Read the toolchain variables from `env`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if a variable holds non-Unicode
    /// data. Absent variables are never an error.
    pub fn from_env<E: Env + ?Sized>(env: &E, options: BuildOptions) -> Result<Self, ConfigError> {
        let defaults = Toolchain::default();
        let toolchain = Toolchain {
            fc: lookup(env, FC_ENV)?.unwrap_or(defaults.fc),
            cc: lookup(env, CC_ENV)?.unwrap_or(defaults.cc),
            cxx: lookup(env, CXX_ENV)?.unwrap_or(defaults.cxx),
            fcflags: lookup_words(env, FCFLAGS_ENV)?.unwrap_or(defaults.fcflags),
            cflags: lookup_words(env, CFLAGS_ENV)?.unwrap_or(defaults.cflags),
            cxxflags: lookup_words(env, CXXFLAGS_ENV)?.unwrap_or(defaults.cxxflags),
            lib: lookup_words(env, LIB_ENV)?.unwrap_or(defaults.lib),
        };
        Ok(Self {
            toolchain,
            extra_sources: lookup_paths(env, SRC_ENV)?,
            extra_objects: lookup_paths(env, OBJ_ENV)?,
            options,
        })
    }
}

fn lookup<E: Env + ?Sized>(env: &E, name: &'static str) -> Result<Option<String>, ConfigError> {
    match env.raw(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::InvalidEnvVar { name }),
    }
}

/// Collapse a whitespace-separated variable to single-space form.
fn lookup_words<E: Env + ?Sized>(
    env: &E,
    name: &'static str,
) -> Result<Option<String>, ConfigError> {
    Ok(lookup(env, name)?.map(|value| value.split_whitespace().collect::<Vec<_>>().join(" ")))
}

fn lookup_paths<E: Env + ?Sized>(
    env: &E,
    name: &'static str,
) -> Result<Vec<Utf8PathBuf>, ConfigError> {
    Ok(lookup(env, name)?
        .map(|value| value.split_whitespace().map(Utf8PathBuf::from).collect())
        .unwrap_or_default())
}
