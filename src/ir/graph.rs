//! Typed build graph.
//!
//! Edges are plain records; no Ninja syntax lives here. The serialiser in
//! [`crate::ninja_gen`] is the only place that renders them.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexSet;
use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

use crate::config::ConfigError;
use crate::modules::ModuleTableError;
use crate::rules::{RuleName, RuleTable};

/// One output artefact and the inputs that produce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEdge {
    /// Path of the produced artefact.
    pub output: Utf8PathBuf,
    /// Rule used to build it.
    pub rule: RuleName,
    /// Explicit inputs, bound to `$in`.
    pub inputs: Vec<Utf8PathBuf>,
    /// Implicit dependencies, which trigger rebuilds but are not on the
    /// command line.
    pub implicit: Vec<Utf8PathBuf>,
}

impl BuildEdge {
    /// Edge producing `output` from `inputs` with no implicit dependencies.
    #[must_use]
    pub const fn new(output: Utf8PathBuf, rule: RuleName, inputs: Vec<Utf8PathBuf>) -> Self {
        Self {
            output,
            rule,
            inputs,
            implicit: Vec::new(),
        }
    }

    /// Attach implicit dependencies, dropping repeats but keeping the first
    /// occurrence of each path in order.
    #[must_use]
    pub fn with_implicit<I>(mut self, implicit: I) -> Self
    where
        I: IntoIterator<Item = Utf8PathBuf>,
    {
        let mut unique: IndexSet<Utf8PathBuf> = self.implicit.drain(..).collect();
        unique.extend(implicit);
        self.implicit = unique.into_iter().collect();
        self
    }
}

/// What produced a group of edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKind {
    /// The synthetic touches aggregator.
    Touches,
    /// A library module, by module name.
    Library(String),
    /// A linked module, by module name.
    Target(String),
    /// A source file outside the module table.
    FreeStanding(Utf8PathBuf),
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Touches => f.write_str("the touches aggregator"),
            Self::Library(name) => write!(f, "library `{name}`"),
            Self::Target(name) => write!(f, "target `{name}`"),
            Self::FreeStanding(path) => write!(f, "source `{path}`"),
        }
    }
}

/// Edges emitted together for one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeGroup {
    /// Origin of the edges.
    pub kind: GroupKind,
    /// Edges in emission order.
    pub edges: Vec<BuildEdge>,
}

/// Complete build description for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildGraph {
    /// Rules declared before any edge.
    pub rules: RuleTable,
    /// Edge groups in emission order.
    pub groups: Vec<EdgeGroup>,
    /// File names of the linked executables, in table order.
    pub executables: Vec<String>,
}

impl BuildGraph {
    /// Iterate every edge in emission order.
    pub fn edges(&self) -> impl Iterator<Item = &BuildEdge> {
        self.groups.iter().flat_map(|group| group.edges.iter())
    }

    /// Iterate the link edges.
    pub fn link_edges(&self) -> impl Iterator<Item = &BuildEdge> {
        self.edges().filter(|edge| edge.rule == RuleName::Link)
    }

    /// The edge producing `output`, if any.
    #[must_use]
    pub fn edge_for(&self, output: &Utf8Path) -> Option<&BuildEdge> {
        self.edges().find(|edge| edge.output == output)
    }

    /// The edge group of kind `kind`, if any.
    #[must_use]
    pub fn group(&self, kind: &GroupKind) -> Option<&EdgeGroup> {
        self.groups.iter().find(|group| &group.kind == kind)
    }
}

/// Errors raised while constructing the build graph.
///
/// Every variant is detected before serialisation, so a failed invocation
/// never writes a partial build description.
#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    /// The global configuration is malformed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
    /// The module table violates a documented invariant.
    #[error(transparent)]
    #[diagnostic(transparent)]
    ModuleTable(#[from] ModuleTableError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn implicit_inputs_keep_first_occurrence_across_calls() {
        let edge = BuildEdge::new("x.o".into(), RuleName::CompileFortran, vec!["x.F90".into()])
            .with_implicit(["b.o", "a.o", "b.o"].map(Utf8PathBuf::from))
            .with_implicit(["c.o", "a.o"].map(Utf8PathBuf::from));
        assert_eq!(edge.implicit, ["b.o", "a.o", "c.o"].map(Utf8PathBuf::from));
    }

    #[rstest]
    #[case(GroupKind::Touches, "the touches aggregator")]
    #[case(GroupKind::Target("main".into()), "target `main`")]
    #[case(GroupKind::FreeStanding("/p/x.c".into()), "source `/p/x.c`")]
    fn group_kinds_name_their_producer(#[case] kind: GroupKind, #[case] expected: &str) {
        assert_eq!(kind.to_string(), expected);
    }
}
