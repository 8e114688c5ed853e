//! `tas-analysis` library crate.
//!
//! The binary (`tas`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the assembly and fitting code can be driven from other front-ends

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod report;
pub mod spectra;
pub mod stats;
