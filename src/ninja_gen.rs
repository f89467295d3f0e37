//! Ninja file generator.
//!
//! This module converts a [`crate::ir::BuildGraph`] into the textual
//! representation expected by the Ninja build system. Rules come first in
//! declaration order, followed by every edge in emission order. The output is
//! a pure function of the graph, so identical inputs yield identical bytes.

use crate::ir::{BuildEdge, BuildGraph};
use crate::rules::Rule;
use camino::Utf8PathBuf;
use itertools::Itertools;
use std::fmt::{self, Display, Formatter};

/// Generate a Ninja build file as a string.
///
/// # Examples
///
/// ```
/// use irpninja::config::GlobalConfig;
/// use irpninja::ir::BuildGraph;
/// use irpninja::modules::ModuleTable;
/// use irpninja::ninja_gen::generate;
/// use irpninja::paths::BuildPaths;
///
/// let graph = BuildGraph::from_modules(
///     &ModuleTable::default(),
///     &GlobalConfig::default(),
///     &BuildPaths::new("/p"),
/// )
/// .expect("empty table");
/// let ninja = generate(&graph);
/// assert!(ninja.starts_with("rule compile_fortran\n"));
/// ```
#[must_use]
pub fn generate(graph: &BuildGraph) -> String {
    DisplayGraph(graph).to_string()
}

/// Escape a path for use in a Ninja `build` line.
///
/// Dollar signs, spaces, and colons are significant to the Ninja lexer and
/// are prefixed with `$`.
fn escape_path(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        if matches!(c, '$' | ' ' | ':') {
            escaped.push('$');
        }
        escaped.push(c);
    }
    escaped
}

/// Convert a slice of paths into a space-separated string.
fn join(paths: &[Utf8PathBuf]) -> String {
    paths.iter().map(|p| escape_path(p.as_str())).join(" ")
}

/// Wrapper struct to display a whole graph.
struct DisplayGraph<'a>(&'a BuildGraph);

impl Display for DisplayGraph<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for rule in self.0.rules.iter() {
            write!(f, "{}", DisplayRule(rule))?;
        }
        for edge in self.0.edges() {
            write!(f, "{}", DisplayEdge(edge))?;
        }
        Ok(())
    }
}

/// Wrapper struct to display a rule declaration.
struct DisplayRule<'a>(&'a Rule);

impl Display for DisplayRule<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "rule {}", self.0.name)?;
        writeln!(f, "  command = {}", self.0.command)?;
        writeln!(f)
    }
}

/// Wrapper struct to display a build edge.
struct DisplayEdge<'a>(&'a BuildEdge);

impl Display for DisplayEdge<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let edge = self.0;
        write!(f, "build {}: {}", escape_path(edge.output.as_str()), edge.rule)?;
        if !edge.inputs.is_empty() {
            write!(f, " {}", join(&edge.inputs))?;
        }
        if !edge.implicit.is_empty() {
            write!(f, " | {}", join(&edge.implicit))?;
        }
        writeln!(f)?;
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Toolchain;
    use crate::ir::{EdgeGroup, GroupKind};
    use crate::paths::BuildPaths;
    use crate::rules::{RuleName, RuleTable};
    use rstest::rstest;

    fn graph_with(edges: Vec<BuildEdge>) -> BuildGraph {
        BuildGraph {
            rules: RuleTable::new(&Toolchain::default(), &BuildPaths::new("/p"), &[] as &[&str]),
            groups: vec![EdgeGroup {
                kind: GroupKind::Touches,
                edges,
            }],
            executables: Vec::new(),
        }
    }

    #[rstest]
    fn edge_with_implicit_inputs() {
        let edge = BuildEdge::new("out.o".into(), RuleName::CompileC, vec!["in.c".into()])
            .with_implicit(["a.o", "b.o", "a.o"].map(Utf8PathBuf::from));
        let ninja = generate(&graph_with(vec![edge]));
        assert!(
            ninja.ends_with("build out.o: compile_c in.c | a.o b.o\n\n"),
            "unexpected output:\n{ninja}"
        );
    }

    #[rstest]
    fn edge_without_implicit_inputs_omits_separator() {
        let edge = BuildEdge::new("prog".into(), RuleName::Link, vec!["a.o".into(), "b.o".into()]);
        let ninja = generate(&graph_with(vec![edge]));
        assert!(ninja.ends_with("build prog: link a.o b.o\n\n"), "{ninja}");
    }

    #[rstest]
    fn rules_precede_edges() {
        let ninja = generate(&graph_with(Vec::new()));
        let expected_prefix = concat!(
            "rule compile_fortran\n",
            "  command = gfortran -ffree-line-length-none -I /p/IRPF90_temp -O2 -c $in -o $out\n\n",
            "rule compile_touches\n",
        );
        assert!(ninja.starts_with(expected_prefix), "{ninja}");
        assert_eq!(ninja.matches("rule ").count(), 5);
        assert!(!ninja.contains("build "));
    }

    #[rstest]
    #[case("/p/a b.o", "/p/a$ b.o")]
    #[case("c:/x$y", "c$:/x$$y")]
    #[case("/plain/path.o", "/plain/path.o")]
    fn paths_are_escaped(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(escape_path(raw), expected);
    }
}
