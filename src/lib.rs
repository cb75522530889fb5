//! # filesift
//!
//! Concurrent file discovery and filtering. Given a set of roots, produce
//! the stream of files worth handing to an uploader: text, non-empty,
//! within the size limit and not excluded by `.gitignore` rules, the
//! built-in noise catalog or user exclusion names.
//!
//! The library lives in [`scan`]; [`config`] and [`cli`] drive it from the
//! `filesift` binary.

pub mod cli;
pub mod config;
pub mod scan;

pub use cli::{Cli, Output};
pub use config::FilesiftConfig;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
