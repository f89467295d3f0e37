//! Intermediate Representation structures.
//!
//! This module derives the typed build graph from the module table and the
//! global configuration. The graph mirrors the conceptual model of Ninja
//! without embedding any Ninja-specific syntax.
//!
//! # Examples
//!
//! ```
//! use irpninja::config::GlobalConfig;
//! use irpninja::ir::BuildGraph;
//! use irpninja::modules::{ModuleDescriptor, ModuleTable};
//! use irpninja::paths::BuildPaths;
//!
//! let table: ModuleTable = [
//!     ModuleDescriptor::library("a", "a"),
//!     ModuleDescriptor::target("b", "b").needs(["a"]),
//! ]
//! .into_iter()
//! .collect();
//! let graph = BuildGraph::from_modules(&table, &GlobalConfig::default(), &BuildPaths::new("/p"))
//!     .expect("valid table");
//! assert_eq!(graph.link_edges().count(), 1);
//! ```

mod classify;
mod from_modules;
mod graph;

pub use classify::{Partition, classify};
pub use from_modules::TOUCHES_UNIT;
pub use graph::{BuildEdge, BuildGraph, EdgeGroup, GraphError, GroupKind};
