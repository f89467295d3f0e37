//! CLI execution logic.
//!
//! This module keeps `main` minimal by providing a single entry point. All
//! inputs are read and the whole graph is derived before anything is
//! written, so a failed invocation leaves previous output untouched. The
//! build description is written first, then the wrapper makefile.

mod error;

pub use error::RunnerError;

use crate::cli::Cli;
use crate::config::GlobalConfig;
use crate::ir::{BuildGraph, GraphError};
use crate::modules::ModuleTable;
use crate::paths::{BuildPaths, NINJA_FILE, Placement, SCRATCH_DIR, WRAPPER_FILE};
use crate::{makefile, ninja_gen};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use mockable::DefaultEnv;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Wrapper around generated Ninja manifest text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NinjaContent(String);
impl NinjaContent {
    /// Store the provided Ninja manifest string.
    #[must_use]
    pub const fn new(content: String) -> Self {
        Self(content)
    }
    /// Borrow the underlying manifest text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Both generated files, rendered but not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    /// Text of the Ninja build description.
    pub ninja: NinjaContent,
    /// Text of the wrapper makefile.
    pub makefile: String,
}

/// Execute the parsed [`Cli`].
///
/// # Errors
///
/// Returns an error if the module table cannot be loaded, the configuration
/// or table is invalid, or the output files cannot be written.
pub fn run(cli: &Cli) -> Result<()> {
    if !cli.should_run() {
        info!("init-only invocation; no build graph written");
        return Ok(());
    }
    let paths = BuildPaths::new(resolve_root(cli.directory.as_deref())?);
    let modules_path = paths.dress(utf8_path(&cli.modules)?, Placement::ProjectRoot);
    let table = ModuleTable::from_path(&modules_path)
        .with_context(|| format!("loading module table at {modules_path}"))?;
    debug!(modules = table.len(), path = %modules_path, "loaded module table");

    let config = GlobalConfig::from_env(&DefaultEnv::new(), cli.build_options())
        .context("reading toolchain configuration")?;
    let files = generate(&table, &config, &paths).context("building graph")?;
    write_outputs(&paths, &files)?;
    Ok(())
}

/// Render both output files without touching the filesystem.
///
/// # Errors
///
/// Returns [`GraphError`] when the table or configuration is invalid.
pub fn generate(
    table: &ModuleTable,
    config: &GlobalConfig,
    paths: &BuildPaths,
) -> Result<GeneratedFiles, GraphError> {
    let graph = BuildGraph::from_modules(table, config, paths)?;
    debug!(
        groups = graph.groups.len(),
        executables = graph.executables.len(),
        "generated build graph"
    );
    Ok(GeneratedFiles {
        ninja: NinjaContent::new(ninja_gen::generate(&graph)),
        makefile: makefile::generate(&graph.executables),
    })
}

/// Write the build description into the scratch directory, creating it if
/// needed, then the wrapper makefile into the project root. Existing files
/// are replaced.
///
/// # Errors
///
/// Returns [`RunnerError`] naming the path that could not be opened or
/// written.
pub fn write_outputs(paths: &BuildPaths, files: &GeneratedFiles) -> Result<(), RunnerError> {
    let root = Dir::open_ambient_dir(paths.root(), ambient_authority()).map_err(|source| {
        RunnerError::OpenDir {
            path: paths.root().to_owned(),
            source,
        }
    })?;
    let scratch_err = |source| RunnerError::OpenDir {
        path: paths.scratch().to_owned(),
        source,
    };
    root.create_dir_all(SCRATCH_DIR).map_err(scratch_err)?;
    let scratch = root.open_dir(SCRATCH_DIR).map_err(scratch_err)?;

    write_file(&scratch, NINJA_FILE, files.ninja.as_str()).map_err(|source| {
        RunnerError::Write {
            path: paths.ninja_file(),
            source,
        }
    })?;
    info!("Wrote Ninja file to {}", paths.ninja_file());
    write_file(&root, WRAPPER_FILE, &files.makefile).map_err(|source| RunnerError::Write {
        path: paths.wrapper_file(),
        source,
    })?;
    info!("Wrote wrapper makefile to {}", paths.wrapper_file());
    Ok(())
}

fn write_file(dir: &Dir, name: &str, content: &str) -> std::io::Result<()> {
    let mut file = dir.create(name)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    file.sync_all()
}

/// Resolve the project root: `directory` when given, otherwise the current
/// working directory.
fn resolve_root(directory: Option<&Path>) -> Result<Utf8PathBuf, RunnerError> {
    let resolved = match directory {
        Some(dir) => std::fs::canonicalize(dir).map_err(|source| RunnerError::ResolveRoot {
            path: dir.display().to_string(),
            source,
        })?,
        None => std::env::current_dir().map_err(|source| RunnerError::ResolveRoot {
            path: ".".to_owned(),
            source,
        })?,
    };
    Utf8PathBuf::from_path_buf(resolved).map_err(|path| RunnerError::NonUtf8Path {
        path: path.display().to_string(),
    })
}

fn utf8_path(path: &Path) -> Result<&Utf8Path, RunnerError> {
    Utf8Path::from_path(path).ok_or_else(|| RunnerError::NonUtf8Path {
        path: path.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::ModuleDescriptor;
    use rstest::rstest;

    #[rstest]
    fn write_outputs_creates_scratch_and_replaces_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 tempdir");
        let paths = BuildPaths::new(root);
        std::fs::create_dir_all(paths.scratch()).expect("scratch");
        std::fs::write(paths.ninja_file(), "stale content that is longer than the new one\n")
            .expect("seed");

        let files = GeneratedFiles {
            ninja: NinjaContent::new("rule x\n".to_owned()),
            makefile: "all:\n".to_owned(),
        };
        write_outputs(&paths, &files).expect("write");
        assert_eq!(
            std::fs::read_to_string(paths.ninja_file()).expect("read ninja"),
            "rule x\n"
        );
        assert_eq!(
            std::fs::read_to_string(paths.wrapper_file()).expect("read make"),
            "all:\n"
        );
    }

    #[rstest]
    fn generate_rejects_bad_extension_without_output() {
        let table: ModuleTable = [ModuleDescriptor::target("p", "p")].into_iter().collect();
        let config = GlobalConfig {
            extra_sources: vec![Utf8PathBuf::from("util.xyz")],
            ..GlobalConfig::default()
        };
        let err = generate(&table, &config, &BuildPaths::new("/p")).expect_err("bad extension");
        assert!(matches!(
            err,
            GraphError::Config(crate::config::ConfigError::UnrecognisedFileType { .. })
        ));
    }
}
