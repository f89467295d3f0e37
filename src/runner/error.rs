//! Error types for the runner module.

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// I/O errors raised while locating inputs or writing the generated files.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// A path supplied on the command line is not valid UTF-8.
    #[error("path {path} is not valid UTF-8")]
    #[diagnostic(code(irpninja::runner::non_utf8_path))]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },
    /// The project root could not be resolved.
    #[error("failed to resolve project root {path}")]
    #[diagnostic(code(irpninja::runner::resolve_root))]
    ResolveRoot {
        /// Directory that was attempted.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A directory could not be opened or created.
    #[error("failed to open directory {path}")]
    #[diagnostic(code(irpninja::runner::open_dir))]
    OpenDir {
        /// Directory that was attempted.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A generated file could not be written.
    #[error("failed to write {path}")]
    #[diagnostic(code(irpninja::runner::write))]
    Write {
        /// Destination that was attempted.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}
