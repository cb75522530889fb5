//! Command-line interface for filesift
//!
//! Thin driver around [`crate::scan`]: resolves configuration, runs the
//! pipeline and prints accepted paths. Everything except the path list
//! goes to stderr so stdout can be piped.

pub mod commands;
pub mod output;

pub use commands::Cli;
pub use output::Output;
