//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure. Flags are collected into an
//! explicit [`BuildOptions`] record before reaching the graph builder.

use camino::Utf8PathBuf;
use clap::Parser;
use std::path::PathBuf;

use crate::config::BuildOptions;

mod parsing;

use parsing::parse_include_dir;

/// Default location of the module table, relative to the project root.
pub const DEFAULT_MODULES_FILE: &str = "irpf90_modules.json";

/// Emit a Ninja build graph for an IRP Fortran project.
#[derive(Debug, Clone, Parser, PartialEq, Eq)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Module table produced by the dependency analyser.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_MODULES_FILE)]
    pub modules: PathBuf,

    /// Run as if started in this directory.
    ///
    /// Generated paths are anchored at this directory.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Activate assertions.
    #[arg(short, long = "assert")]
    pub assertions: bool,

    /// Activate OpenMP locking support.
    #[arg(short, long = "openmp")]
    pub openmp: bool,

    /// Activate profiling instrumentation.
    #[arg(short, long = "profile")]
    pub profile: bool,

    /// Extra include directory, relative to the build-scratch directory.
    #[arg(short = 'I', long = "include-dir", value_name = "DIR", value_parser = parse_include_dir)]
    pub include_dirs: Vec<Utf8PathBuf>,

    /// Initialise the current directory only; no build graph is written.
    #[arg(short, long)]
    pub init: bool,

    /// Enable verbose diagnostic logging.
    #[arg(short, long, alias = "debug")]
    pub verbose: bool,
}

impl Cli {
    /// Whether this invocation should emit a build graph.
    #[must_use]
    pub const fn should_run(&self) -> bool {
        !self.init
    }

    /// Collect the feature switches for the graph builder.
    #[must_use]
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            assertions: self.assertions,
            locking: self.openmp,
            profiling: self.profile,
            include_dirs: self.include_dirs.clone(),
        }
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            modules: PathBuf::from(DEFAULT_MODULES_FILE),
            directory: None,
            assertions: false,
            openmp: false,
            profile: false,
            include_dirs: Vec::new(),
            init: false,
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_match_default_impl() {
        let cli = Cli::try_parse_from(["irpninja"]).expect("parse");
        assert_eq!(cli, Cli::default());
        assert!(cli.should_run());
    }

    #[rstest]
    fn flags_map_to_build_options() {
        let cli = Cli::try_parse_from(["irpninja", "-a", "--openmp", "-p", "-I", "inc", "-I", "../x"])
            .expect("parse");
        assert_eq!(
            cli.build_options(),
            BuildOptions {
                assertions: true,
                locking: true,
                profiling: true,
                include_dirs: vec![Utf8PathBuf::from("inc"), Utf8PathBuf::from("../x")],
            }
        );
    }

    #[rstest]
    #[case(&["irpninja", "--init"])]
    #[case(&["irpninja", "-i", "-a"])]
    fn init_skips_the_run(#[case] args: &[&str]) {
        let cli = Cli::try_parse_from(args).expect("parse");
        assert!(!cli.should_run());
    }

    #[rstest]
    fn debug_is_an_alias_for_verbose() {
        let cli = Cli::try_parse_from(["irpninja", "--debug"]).expect("parse");
        assert!(cli.verbose);
    }

    #[rstest]
    fn empty_include_dir_is_rejected() {
        assert!(Cli::try_parse_from(["irpninja", "-I", " "]).is_err());
    }
}
