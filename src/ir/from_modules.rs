//! Module-table-to-graph conversion.
//!
//! Group order is fixed: the touches aggregator, library units, linked
//! targets, then free-standing sources. Within a group the module table
//! order is kept. Ninja schedules by dependency, so the order only affects
//! the text of the build description.

use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashMap;
use tracing::debug;

use crate::config::{ConfigError, GlobalConfig};
use crate::modules::{ModuleDescriptor, ModuleTable};
use crate::paths::{BuildPaths, ModuleArtifacts, Placement};
use crate::rules::{RuleName, RuleTable};

use super::classify::{Partition, classify};
use super::graph::{BuildEdge, BuildGraph, EdgeGroup, GraphError, GroupKind};

/// Base name of the synthetic touches aggregator unit.
pub const TOUCHES_UNIT: &str = "irp_touches";

/// Support unit compiled when assertions are enabled.
const ASSERT_UNIT: &str = "irp_stack";
/// Support unit compiled when locking is enabled.
const LOCKS_UNIT: &str = "irp_locks";
/// Support unit compiled when profiling is enabled.
const PROFILE_UNIT: &str = "irp_profile";
/// Plain C timer source compiled alongside the profiling unit.
const PROFILE_TIMER: &str = "rdtsc";

impl BuildGraph {
    /// Derive the complete build graph for `table` under `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ModuleTable`] when the table breaks an invariant
    /// and [`GraphError::Config`] when an extra source has an unrecognised
    /// extension or two edges would build the same output.
    pub fn from_modules(
        table: &ModuleTable,
        config: &GlobalConfig,
        paths: &BuildPaths,
    ) -> Result<Self, GraphError> {
        table.validate()?;
        let partition = classify(table);
        debug!(
            targets = partition.targets.len(),
            libraries = partition.libraries.len(),
            "classified module table"
        );

        let ctx = EdgeContext::new(table, config, paths, &partition);
        let mut groups = Vec::with_capacity(table.len() + ctx.common_sources.len() + 1);
        groups.push(ctx.touches_group(&partition));
        groups.extend(partition.libraries.iter().map(|m| ctx.library_group(m)));
        groups.extend(partition.targets.iter().map(|m| ctx.target_group(m)));
        for source in &ctx.common_sources {
            groups.push(ctx.free_standing_group(source)?);
        }
        ensure_unique_outputs(&groups)?;

        Ok(Self {
            rules: RuleTable::new(&config.toolchain, paths, &config.options.include_dirs),
            groups,
            executables: partition
                .targets
                .iter()
                .map(|m| m.filename.clone())
                .collect(),
        })
    }
}

/// Reject graphs in which two edges build the same path.
fn ensure_unique_outputs(groups: &[EdgeGroup]) -> Result<(), ConfigError> {
    let mut producers: HashMap<&Utf8Path, &GroupKind> = HashMap::new();
    for group in groups {
        for edge in &group.edges {
            if let Some(first) = producers.insert(edge.output.as_path(), &group.kind) {
                return Err(ConfigError::DuplicateOutput {
                    path: edge.output.clone(),
                    first: first.to_string(),
                    second: group.kind.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Shared inputs computed once per graph.
struct EdgeContext<'a> {
    table: &'a ModuleTable,
    paths: &'a BuildPaths,
    /// `OBJ` entries resolved into the project root.
    external_objects: Vec<Utf8PathBuf>,
    /// Object of the touches aggregator.
    touches_object: Utf8PathBuf,
    /// Objects linked into every executable besides the touches object:
    /// library objects, library interfaces, feature units, then `OBJ`.
    common_objects: Vec<Utf8PathBuf>,
    /// Sources compiled outside the module table.
    common_sources: Vec<Utf8PathBuf>,
}

impl<'a> EdgeContext<'a> {
    fn new(
        table: &'a ModuleTable,
        config: &GlobalConfig,
        paths: &'a BuildPaths,
        partition: &Partition<'_>,
    ) -> Self {
        let scratch = |name: String| paths.dress(name, Placement::Scratch);
        let external_objects: Vec<_> = config
            .extra_objects
            .iter()
            .map(|obj| paths.dress(obj, Placement::ProjectRoot))
            .collect();

        let mut common_objects: Vec<_> = partition
            .libraries
            .iter()
            .map(|m| scratch(format!("{}.irp.o", m.filename)))
            .collect();
        common_objects.extend(
            partition
                .libraries
                .iter()
                .map(|m| scratch(format!("{}.irp.module.o", m.filename))),
        );

        let mut common_sources = Vec::new();
        let options = &config.options;
        let units = [
            (options.assertions, ASSERT_UNIT),
            (options.locking, LOCKS_UNIT),
            (options.profiling, PROFILE_UNIT),
        ];
        for (_, unit) in units.iter().filter(|(enabled, _)| *enabled) {
            common_objects.push(scratch(format!("{unit}.irp.o")));
            common_sources.push(scratch(format!("{unit}.irp.F90")));
        }
        if options.profiling {
            common_objects.push(scratch(format!("{PROFILE_TIMER}.o")));
            common_sources.push(scratch(format!("{PROFILE_TIMER}.c")));
        }
        common_objects.extend(external_objects.iter().cloned());
        common_sources.extend(
            config
                .extra_sources
                .iter()
                .map(|src| paths.dress(src, Placement::ProjectRoot)),
        );

        Self {
            table,
            paths,
            external_objects,
            touches_object: scratch(format!("{TOUCHES_UNIT}.irp.o")),
            common_objects,
            common_sources,
        }
    }

    /// Module-interface objects of every needed module, in table order,
    /// followed by the unit's own.
    fn module_closure(&self, module: &ModuleDescriptor) -> Vec<Utf8PathBuf> {
        self.table
            .modules()
            .filter(|m| module.needed_modules.contains(&m.name))
            .map(|m| &m.filename)
            .chain(std::iter::once(&module.filename))
            .map(|filename| ModuleArtifacts::module_object_for(self.paths, filename))
            .collect()
    }

    /// The touches object followed by the common objects.
    fn linked_objects(&self) -> impl Iterator<Item = Utf8PathBuf> + '_ {
        std::iter::once(self.touches_object.clone()).chain(self.common_objects.iter().cloned())
    }

    fn includes(&self, module: &ModuleDescriptor) -> Vec<Utf8PathBuf> {
        module
            .includes
            .iter()
            .map(|inc| self.paths.dress(inc, Placement::ProjectRoot))
            .collect()
    }

    fn touches_group(&self, partition: &Partition<'_>) -> EdgeGroup {
        let source = self
            .paths
            .dress(format!("{TOUCHES_UNIT}.irp.F90"), Placement::Scratch);
        let interfaces = partition
            .libraries
            .iter()
            .map(|m| ModuleArtifacts::module_object_for(self.paths, &m.filename));
        let edge = BuildEdge::new(
            self.touches_object.clone(),
            RuleName::CompileTouches,
            vec![source],
        )
        .with_implicit(interfaces.chain(self.common_objects.iter().cloned()));
        EdgeGroup {
            kind: GroupKind::Touches,
            edges: vec![edge],
        }
    }

    fn library_group(&self, module: &ModuleDescriptor) -> EdgeGroup {
        let art = ModuleArtifacts::new(self.paths, &module.filename);
        let object = BuildEdge::new(art.object, RuleName::CompileFortran, vec![art.source])
            .with_implicit(
                self.module_closure(module)
                    .into_iter()
                    .chain(self.external_objects.iter().cloned()),
            );
        let interface = BuildEdge::new(
            art.module_object,
            RuleName::CompileFortran,
            vec![art.module_source],
        )
        .with_implicit(
            self.external_objects
                .iter()
                .cloned()
                .chain(self.includes(module)),
        );
        EdgeGroup {
            kind: GroupKind::Library(module.name.clone()),
            edges: vec![object, interface],
        }
    }

    fn target_group(&self, module: &ModuleDescriptor) -> EdgeGroup {
        let art = ModuleArtifacts::new(self.paths, &module.filename);
        let mut link_inputs = vec![art.object.clone(), art.module_object.clone()];
        link_inputs.extend(self.linked_objects());
        let link = BuildEdge::new(art.executable, RuleName::Link, link_inputs);
        let object = BuildEdge::new(art.object, RuleName::CompileFortran, vec![art.source])
            .with_implicit(
                self.module_closure(module)
                    .into_iter()
                    .chain(self.linked_objects())
                    .chain(self.includes(module)),
            );
        let interface = BuildEdge::new(
            art.module_object,
            RuleName::CompileFortran,
            vec![art.module_source],
        );
        EdgeGroup {
            kind: GroupKind::Target(module.name.clone()),
            edges: vec![link, object, interface],
        }
    }

    fn free_standing_group(&self, source: &Utf8Path) -> Result<EdgeGroup, ConfigError> {
        let rule = RuleName::for_source(source).ok_or_else(|| ConfigError::UnrecognisedFileType {
            path: source.to_owned(),
        })?;
        let edge = BuildEdge::new(
            self.paths.reroute_object(source),
            rule,
            vec![source.to_owned()],
        );
        Ok(EdgeGroup {
            kind: GroupKind::FreeStanding(source.to_owned()),
            edges: vec![edge],
        })
    }
}
