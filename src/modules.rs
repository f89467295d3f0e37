//! Module table supplied by the dependency analyser.
//!
//! The table is a JSON object mapping a module key to its descriptor. Key
//! order is preserved and governs the order of the generated edges.
//!
//! ```json
//! {
//!   "a": { "name": "a", "filename": "a" },
//!   "prog": { "name": "prog", "filename": "prog", "is_main": true,
//!             "needed_modules": ["a"] }
//! }
//! ```
//!
//! Needed-module lists are trusted as supplied: they must already be
//! transitively complete. [`ModuleTable::validate`] only checks that every
//! name resolves and that names and file names are unique.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::{IndexMap, IndexSet};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use thiserror::Error;

/// One compilation unit known to the toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDescriptor {
    /// Module identifier as declared in source.
    pub name: String,
    /// Base name used to derive artefact names.
    pub filename: String,
    /// Whether this unit links into an executable.
    #[serde(default)]
    pub is_main: bool,
    /// Names of the modules this unit uses.
    #[serde(default)]
    pub needed_modules: IndexSet<String>,
    /// Files outside the scratch directory that must exist before compiling.
    #[serde(default)]
    pub includes: Vec<Utf8PathBuf>,
}

impl ModuleDescriptor {
    /// A library unit named `name` with artefacts derived from `filename`.
    #[must_use]
    pub fn library(name: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
            is_main: false,
            needed_modules: IndexSet::new(),
            includes: Vec::new(),
        }
    }

    /// A unit that links into an executable.
    #[must_use]
    pub fn target(name: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            is_main: true,
            ..Self::library(name, filename)
        }
    }

    /// Add needed module names.
    #[must_use]
    pub fn needs<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.needed_modules.extend(modules.into_iter().map(Into::into));
        self
    }

    /// Add include files.
    #[must_use]
    pub fn with_includes<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        self.includes.extend(files.into_iter().map(Into::into));
        self
    }
}

/// Errors raised while loading or validating the module table.
#[derive(Debug, Error, Diagnostic)]
pub enum ModuleTableError {
    /// The table file could not be read.
    #[error("failed to read module table {path}")]
    #[diagnostic(code(irpninja::modules::read))]
    Read {
        /// Path that was attempted.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The table is not valid JSON or does not match the descriptor schema.
    #[error("failed to parse module table {name}")]
    #[diagnostic(code(irpninja::modules::parse))]
    Parse {
        /// Path or label of the offending document.
        name: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// Two entries declare the same module name.
    #[error("module `{name}` is declared by both `{first}` and `{second}`")]
    #[diagnostic(code(irpninja::modules::duplicate_name))]
    DuplicateName {
        /// Repeated module name.
        name: String,
        /// Key of the first entry.
        first: String,
        /// Key of the repeated entry.
        second: String,
    },
    /// Two entries derive artefacts from the same file name.
    #[error("file name `{filename}` is shared by modules `{first}` and `{second}`")]
    #[diagnostic(
        code(irpninja::modules::duplicate_filename),
        help("artefact names are derived from the file name and must be unique")
    )]
    DuplicateFilename {
        /// Repeated file name.
        filename: String,
        /// Key of the first entry.
        first: String,
        /// Key of the repeated entry.
        second: String,
    },
    /// A needed-module name is absent from the table.
    #[error("module `{module}` needs `{dependency}`, which is not in the module table")]
    #[diagnostic(code(irpninja::modules::unknown_dependency))]
    UnknownDependency {
        /// Module declaring the dependency.
        module: String,
        /// Name that failed to resolve.
        dependency: String,
    },
}

/// Ordered mapping from module key to [`ModuleDescriptor`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleTable {
    entries: IndexMap<String, ModuleDescriptor>,
}

impl ModuleTable {
    /// Parse a table from JSON text. `name` labels the document in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleTableError::Parse`] when the text is not a valid table.
    pub fn from_json(name: &str, text: &str) -> Result<Self, ModuleTableError> {
        serde_json::from_str(text).map_err(|source| ModuleTableError::Parse {
            name: name.to_owned(),
            source,
        })
    }

    /// Load a table from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleTableError::Read`] or [`ModuleTableError::Parse`].
    pub fn from_path(path: &Utf8Path) -> Result<Self, ModuleTableError> {
        let text = fs::read_to_string(path).map_err(|source| ModuleTableError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(path.as_str(), &text)
    }

    /// Insert `module` under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, module: ModuleDescriptor) {
        self.entries.insert(key.into(), module);
    }

    /// Remove the entry under `key`, keeping the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<ModuleDescriptor> {
        self.entries.shift_remove(key)
    }

    /// Look up a module by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ModuleDescriptor> {
        self.entries.get(key)
    }

    /// Iterate descriptors in table order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.entries.values()
    }

    /// Iterate `(key, descriptor)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModuleDescriptor)> {
        self.entries.iter().map(|(k, m)| (k.as_str(), m))
    }

    /// Number of modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no modules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check the documented invariants of the table.
    ///
    /// # Errors
    ///
    /// Returns the first duplicate name, duplicate file name, or unresolved
    /// needed-module name found, in table order.
    pub fn validate(&self) -> Result<(), ModuleTableError> {
        let mut names: HashMap<&str, &str> = HashMap::new();
        let mut filenames: HashMap<&str, &str> = HashMap::new();
        for (key, module) in self.iter() {
            if let Some(first) = names.insert(&module.name, key) {
                return Err(ModuleTableError::DuplicateName {
                    name: module.name.clone(),
                    first: first.to_owned(),
                    second: key.to_owned(),
                });
            }
            if let Some(first) = filenames.insert(&module.filename, key) {
                return Err(ModuleTableError::DuplicateFilename {
                    filename: module.filename.clone(),
                    first: first.to_owned(),
                    second: key.to_owned(),
                });
            }
        }
        for module in self.modules() {
            if let Some(missing) = module
                .needed_modules
                .iter()
                .find(|dep| !names.contains_key(dep.as_str()))
            {
                return Err(ModuleTableError::UnknownDependency {
                    module: module.name.clone(),
                    dependency: missing.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Collect descriptors keyed by their module name.
impl FromIterator<ModuleDescriptor> for ModuleTable {
    fn from_iter<I: IntoIterator<Item = ModuleDescriptor>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|m| (m.name.clone(), m)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn parses_and_keeps_key_order() {
        let json = r#"{
            "zeta": { "name": "zeta", "filename": "z" },
            "alpha": { "name": "alpha", "filename": "a", "is_main": true,
                       "needed_modules": ["zeta"], "includes": ["inc/x.h"] }
        }"#;
        let table = ModuleTable::from_json("inline", json).expect("parse table");
        let keys: Vec<_> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["zeta", "alpha"]);
        let alpha = table.get("alpha").expect("alpha entry");
        assert!(alpha.is_main);
        assert!(alpha.needed_modules.contains("zeta"));
        assert_eq!(alpha.includes, [Utf8PathBuf::from("inc/x.h")]);
        assert!(table.validate().is_ok());
    }

    #[rstest]
    fn rejects_unknown_fields() {
        let json = r#"{ "a": { "name": "a", "filename": "a", "main": true } }"#;
        let err = ModuleTable::from_json("inline", json).expect_err("unknown field");
        assert!(matches!(err, ModuleTableError::Parse { .. }));
    }

    #[rstest]
    fn duplicate_filename_is_rejected() {
        let mut table = ModuleTable::default();
        table.insert("a", ModuleDescriptor::library("a", "shared"));
        table.insert("b", ModuleDescriptor::library("b", "shared"));
        let err = table.validate().expect_err("duplicate filename");
        assert!(matches!(
            err,
            ModuleTableError::DuplicateFilename { ref filename, ref first, ref second }
                if filename == "shared" && first == "a" && second == "b"
        ));
    }

    #[rstest]
    fn duplicate_name_is_rejected() {
        let mut table = ModuleTable::default();
        table.insert("k1", ModuleDescriptor::library("m", "m1"));
        table.insert("k2", ModuleDescriptor::library("m", "m2"));
        assert!(matches!(
            table.validate(),
            Err(ModuleTableError::DuplicateName { .. })
        ));
    }

    #[rstest]
    fn unknown_dependency_is_rejected() {
        let table: ModuleTable = [ModuleDescriptor::target("p", "p").needs(["ghost"])]
            .into_iter()
            .collect();
        let err = table.validate().expect_err("unknown dependency");
        assert_eq!(
            err.to_string(),
            "module `p` needs `ghost`, which is not in the module table"
        );
    }

    #[rstest]
    fn remove_keeps_remaining_order() {
        let mut table: ModuleTable = ["a", "b", "c"]
            .into_iter()
            .map(|n| ModuleDescriptor::library(n, n))
            .collect();
        assert!(table.remove("b").is_some());
        let names: Vec<_> = table.modules().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
    }
}
