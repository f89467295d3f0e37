//! Split the module table into linked targets and library units.

use crate::modules::{ModuleDescriptor, ModuleTable};

/// Modules partitioned by whether they link into an executable.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Partition<'a> {
    /// Modules with `is_main` set, in table order.
    pub targets: Vec<&'a ModuleDescriptor>,
    /// All other modules, in table order.
    pub libraries: Vec<&'a ModuleDescriptor>,
}

/// Partition `table` into targets and libraries.
#[must_use]
pub fn classify(table: &ModuleTable) -> Partition<'_> {
    let (targets, libraries) = table.modules().partition(|module| module.is_main);
    Partition { targets, libraries }
}
