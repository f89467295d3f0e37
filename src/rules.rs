//! Compiler rule table.
//!
//! Five Ninja rules cover every edge the generator emits. Commands are
//! rendered once from the [`Toolchain`] and reused by every edge.

use std::fmt::{self, Display, Formatter};

use camino::Utf8Path;
use itertools::Itertools;

use crate::config::Toolchain;
use crate::paths::{BuildPaths, Placement};

/// Name of a build rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleName {
    /// Fortran compilation with the configured flags.
    CompileFortran,
    /// Fortran compilation of the touches aggregator, without flags.
    CompileTouches,
    /// C compilation.
    CompileC,
    /// C++ compilation.
    CompileCxx,
    /// Linking of an executable.
    Link,
}

impl RuleName {
    /// All rules in the order they are declared.
    pub const ALL: [Self; 5] = [
        Self::CompileFortran,
        Self::CompileTouches,
        Self::CompileC,
        Self::CompileCxx,
        Self::Link,
    ];

    /// Identifier used in the build description.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CompileFortran => "compile_fortran",
            Self::CompileTouches => "compile_touches",
            Self::CompileC => "compile_c",
            Self::CompileCxx => "compile_cxx",
            Self::Link => "link",
        }
    }

    /// Pick the compile rule for a source file by its extension.
    ///
    /// Matching is case-insensitive, so `.F90` and `.f90` are both Fortran.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use irpninja::rules::RuleName;
    ///
    /// assert_eq!(RuleName::for_source(Utf8Path::new("x.F90")), Some(RuleName::CompileFortran));
    /// assert_eq!(RuleName::for_source(Utf8Path::new("x.xyz")), None);
    /// ```
    #[must_use]
    pub fn for_source(path: &Utf8Path) -> Option<Self> {
        let ext = path.extension()?.to_ascii_lowercase();
        match ext.as_str() {
            "f" | "f90" => Some(Self::CompileFortran),
            "c" => Some(Self::CompileC),
            "cxx" | "cpp" => Some(Self::CompileCxx),
            _ => None,
        }
    }
}

impl Display for RuleName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named rule and its command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Rule identifier.
    pub name: RuleName,
    /// Command using Ninja's `$in` and `$out` placeholders.
    pub command: String,
}

/// The ordered set of rules declared at the top of the build description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Render every rule for `toolchain`.
    ///
    /// Each compiler receives `-I <scratch>` and one `-I` per entry of
    /// `include_dirs`, resolved against the scratch directory.
    #[must_use]
    pub fn new(
        toolchain: &Toolchain,
        paths: &BuildPaths,
        include_dirs: &[impl AsRef<Utf8Path>],
    ) -> Self {
        let includes = std::iter::once(paths.scratch().to_owned())
            .chain(
                include_dirs
                    .iter()
                    .map(|dir| paths.dress(dir, Placement::Scratch)),
            )
            .map(|dir| format!("-I {dir}"))
            .join(" ");
        let fc = join_parts(&[toolchain.fc.as_str(), includes.as_str()]);
        let cc = join_parts(&[toolchain.cc.as_str(), includes.as_str()]);
        let cxx = join_parts(&[toolchain.cxx.as_str(), includes.as_str()]);

        let rules = RuleName::ALL
            .into_iter()
            .map(|name| {
                let command = match name {
                    RuleName::CompileFortran => {
                        join_parts(&[fc.as_str(), toolchain.fcflags.as_str(), COMPILE_IO])
                    }
                    RuleName::CompileTouches => join_parts(&[fc.as_str(), COMPILE_IO]),
                    RuleName::CompileC => {
                        join_parts(&[cc.as_str(), toolchain.cflags.as_str(), COMPILE_IO])
                    }
                    RuleName::CompileCxx => {
                        join_parts(&[cxx.as_str(), toolchain.cxxflags.as_str(), COMPILE_IO])
                    }
                    RuleName::Link => {
                        join_parts(&[fc.as_str(), "$in", toolchain.lib.as_str(), "-o $out"])
                    }
                };
                Rule { name, command }
            })
            .collect();
        Self { rules }
    }

    /// Iterate rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Command template of `name`.
    #[must_use]
    pub fn command(&self, name: RuleName) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.name == name)
            .map(|rule| rule.command.as_str())
    }
}

const COMPILE_IO: &str = "-c $in -o $out";

/// Join the non-empty `parts` with single spaces.
fn join_parts(parts: &[&str]) -> String {
    parts.iter().filter(|part| !part.is_empty()).join(" ")
}
