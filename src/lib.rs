//! Irpninja core library.
//!
//! This library turns the module table produced by the IRP Fortran
//! dependency analyser into a Ninja build description and a wrapper makefile.
//! [`ir::BuildGraph::from_modules`] derives the graph, [`ninja_gen`] and
//! [`makefile`] render it, and [`runner`] ties the pieces to the filesystem.

pub mod cli;
pub mod config;
pub mod ir;
pub mod makefile;
pub mod modules;
pub mod ninja_gen;
pub mod paths;
pub mod rules;
pub mod runner;
