//! Module-table fixtures and scratch projects.

use camino::{Utf8Path, Utf8PathBuf};
use irpninja::modules::{ModuleDescriptor, ModuleTable};
use std::fs;
use tempfile::TempDir;

/// Fixed project root used by graph and snapshot tests.
pub const PROJECT_ROOT: &str = "/work/project";

/// Library unit `A` (file `a`) and target `B` (file `b`) needing it.
pub fn library_and_target() -> ModuleTable {
    [
        ModuleDescriptor::library("A", "a"),
        ModuleDescriptor::target("B", "b").needs(["A"]),
    ]
    .into_iter()
    .collect()
}

/// Two libraries and two targets with overlapping needs.
///
/// `core` is needed by everything, `io` needs `core`, `solver` needs both and
/// `report` needs only `core`.
pub fn two_targets() -> ModuleTable {
    [
        ModuleDescriptor::library("core", "core"),
        ModuleDescriptor::library("io", "io").needs(["core"]),
        ModuleDescriptor::target("solver", "solver").needs(["core", "io"]),
        ModuleDescriptor::target("report", "report").needs(["core"]),
    ]
    .into_iter()
    .collect()
}

/// Temporary project directory holding a module table.
#[derive(Debug)]
pub struct ProjectDir {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl ProjectDir {
    /// Create an empty project directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created or its path is not
    /// UTF-8.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir");
        Self { _dir: dir, root }
    }

    /// Create a project directory with `table` written to the default
    /// module-table location.
    ///
    /// # Panics
    ///
    /// Panics if the table cannot be serialised or written.
    pub fn with_table(table: &ModuleTable) -> Self {
        let project = Self::new();
        project.write_table(irpninja::cli::DEFAULT_MODULES_FILE, table);
        project
    }

    /// Write `table` as JSON to `name` under the project root.
    ///
    /// # Panics
    ///
    /// Panics if the table cannot be serialised or written.
    pub fn write_table(&self, name: &str, table: &ModuleTable) {
        let text = serde_json::to_string_pretty(table).expect("serialise table");
        fs::write(self.root.join(name), text).expect("write module table");
    }

    /// Root of the project.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

impl Default for ProjectDir {
    fn default() -> Self {
        Self::new()
    }
}
