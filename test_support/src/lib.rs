//! Test utilities shared by the integration suites.
//!
//! Provides module-table fixtures, a mocked toolchain environment, and a
//! helper for running the built binary inside a scratch project.

pub mod env;
pub mod fixtures;
pub mod irpninja;

pub use fixtures::{ProjectDir, library_and_target};
