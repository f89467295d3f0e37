//! Path resolution for generated artefacts.
//!
//! Every path written into the build graph is absolute and lexically
//! normalised. [`BuildPaths`] anchors them either at the project root or at
//! the build-scratch directory beneath it.
//!
//! # Examples
//!
//! ```
//! use irpninja::paths::{BuildPaths, Placement};
//!
//! let paths = BuildPaths::new("/work/proj");
//! assert_eq!(
//!     paths.dress("a.irp.o", Placement::Scratch).as_str(),
//!     "/work/proj/IRPF90_temp/a.irp.o",
//! );
//! assert_eq!(
//!     paths.dress("../lib/x.o", Placement::ProjectRoot).as_str(),
//!     "/work/lib/x.o",
//! );
//! ```

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Name of the build-scratch directory beneath the project root.
pub const SCRATCH_DIR: &str = "IRPF90_temp";
/// Name of the generated documentation directory beneath the project root.
pub const DOCS_DIR: &str = "IRPF90_man";
/// File name of the build description inside the scratch directory.
pub const NINJA_FILE: &str = "build.ninja";
/// File name of the wrapper makefile in the project root.
pub const WRAPPER_FILE: &str = "irpf90.make";
/// Entity index written by the code generator; removed by `veryclean`.
pub const ENTITIES_FILE: &str = "irpf90_entities";

/// Where a logical file name should be anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Relative to the invocation's working directory.
    ProjectRoot,
    /// Relative to the build-scratch directory.
    Scratch,
}

/// Project root and build-scratch locations for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPaths {
    root: Utf8PathBuf,
    scratch: Utf8PathBuf,
}

impl BuildPaths {
    /// Anchor generated paths at `root`.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        let anchored = normalise(&root.into());
        let scratch = anchored.join(SCRATCH_DIR);
        Self {
            root: anchored,
            scratch,
        }
    }

    /// The project root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// The build-scratch directory.
    #[must_use]
    pub fn scratch(&self) -> &Utf8Path {
        &self.scratch
    }

    /// Absolute path of the Ninja build description.
    #[must_use]
    pub fn ninja_file(&self) -> Utf8PathBuf {
        self.scratch.join(NINJA_FILE)
    }

    /// Absolute path of the wrapper makefile.
    #[must_use]
    pub fn wrapper_file(&self) -> Utf8PathBuf {
        self.root.join(WRAPPER_FILE)
    }

    /// Resolve `name` against the chosen anchor and normalise the result.
    #[must_use]
    pub fn dress(&self, name: impl AsRef<Utf8Path>, placement: Placement) -> Utf8PathBuf {
        let base = match placement {
            Placement::ProjectRoot => &self.root,
            Placement::Scratch => &self.scratch,
        };
        normalise(&base.join(name))
    }

    /// Object path for a free-standing source file.
    ///
    /// The extension is replaced by `.o` and the result always lands in the
    /// scratch directory: sources under the project root keep their relative
    /// layout, sources elsewhere keep only their file name.
    #[must_use]
    pub fn reroute_object(&self, source: &Utf8Path) -> Utf8PathBuf {
        let object = source.with_extension("o");
        if object.starts_with(&self.scratch) {
            return object;
        }
        match object.strip_prefix(&self.root) {
            Ok(relative) => self.dress(relative, Placement::Scratch),
            Err(_) => self.dress(object.file_name().unwrap_or(object.as_str()), Placement::Scratch),
        }
    }
}

/// Lexically normalise `path`: drop `.` segments and redundant separators
/// and fold `..` into its parent. `..` above the root is discarded.
#[must_use]
pub fn normalise(path: &Utf8Path) -> Utf8PathBuf {
    let mut parts: Vec<Utf8Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match parts.last() {
                Some(Utf8Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Utf8Component::RootDir | Utf8Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return Utf8PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Generated artefact paths for one module, derived from its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleArtifacts {
    /// Compiled implementation object, `<f>.irp.o`.
    pub object: Utf8PathBuf,
    /// Generated implementation source, `<f>.irp.F90`.
    pub source: Utf8PathBuf,
    /// Compiled module-interface object, `<f>.irp.module.o`.
    pub module_object: Utf8PathBuf,
    /// Generated module-interface source, `<f>.irp.module.F90`.
    pub module_source: Utf8PathBuf,
    /// Linked executable, `<f>` in the project root.
    pub executable: Utf8PathBuf,
}

impl ModuleArtifacts {
    /// Derive every artefact path for `filename`.
    #[must_use]
    pub fn new(paths: &BuildPaths, filename: &str) -> Self {
        Self {
            object: paths.dress(format!("{filename}.irp.o"), Placement::Scratch),
            source: paths.dress(format!("{filename}.irp.F90"), Placement::Scratch),
            module_object: Self::module_object_for(paths, filename),
            module_source: paths.dress(format!("{filename}.irp.module.F90"), Placement::Scratch),
            executable: paths.dress(filename, Placement::ProjectRoot),
        }
    }

    /// Module-interface object path for `filename` alone.
    #[must_use]
    pub fn module_object_for(paths: &BuildPaths, filename: &str) -> Utf8PathBuf {
        paths.dress(format!("{filename}.irp.module.o"), Placement::Scratch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/a/b/../c", "/a/c")]
    #[case("/a/./b//c", "/a/b/c")]
    #[case("/../a", "/a")]
    #[case("a/../../b", "../b")]
    #[case("./", ".")]
    fn normalise_folds_segments(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalise(Utf8Path::new(input)), Utf8PathBuf::from(expected));
    }

    #[rstest]
    fn dress_keeps_absolute_names() {
        let paths = BuildPaths::new("/p");
        assert_eq!(
            paths.dress("/opt/lib/x.o", Placement::Scratch),
            Utf8PathBuf::from("/opt/lib/x.o")
        );
    }

    #[rstest]
    #[case("/p/util.c", "/p/IRPF90_temp/util.o")]
    #[case("/p/src/deep/util.cpp", "/p/IRPF90_temp/src/deep/util.o")]
    #[case("/p/IRPF90_temp/rdtsc.c", "/p/IRPF90_temp/rdtsc.o")]
    #[case("/elsewhere/ext.f90", "/p/IRPF90_temp/ext.o")]
    fn reroute_object_lands_in_scratch(#[case] source: &str, #[case] expected: &str) {
        let paths = BuildPaths::new("/p");
        assert_eq!(
            paths.reroute_object(Utf8Path::new(source)),
            Utf8PathBuf::from(expected)
        );
    }

    #[rstest]
    fn module_artifacts_follow_naming_scheme() {
        let paths = BuildPaths::new("/p");
        let art = ModuleArtifacts::new(&paths, "prog");
        assert_eq!(art.object, "/p/IRPF90_temp/prog.irp.o");
        assert_eq!(art.source, "/p/IRPF90_temp/prog.irp.F90");
        assert_eq!(art.module_object, "/p/IRPF90_temp/prog.irp.module.o");
        assert_eq!(art.module_source, "/p/IRPF90_temp/prog.irp.module.F90");
        assert_eq!(art.executable, "/p/prog");
    }
}
