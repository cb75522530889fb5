//! # File discovery and filtering
//!
//! Turns a list of roots into a lazy stream of file paths worth uploading:
//! text, within size bounds, and not excluded by ignore files, the built-in
//! noise catalog or user exclusion names.
//!
//! ## Module layout
//!
//! - [`ignore_rules`] - ignore-file discovery and rule scoping
//! - [`static_data`] - built-in exclusion catalogs
//! - [`matcher`] - exclusion sets compiled into per-root matchers
//! - [`filters`] - the filter chain (size, text, extension, noise, glob)
//! - [`pipeline`] - per-root discovery, filter worker pool, result stream
//! - [`context`] - cancellation and deadline token
//! - [`stats`] - counters and pipeline state
//! - [`config`] - scan options
//!
//! ## Example
//!
//! ```no_run
//! use filesift::scan::{Pipeline, ScanConfig, ScanContext};
//! use std::path::PathBuf;
//! use std::time::Duration;
//!
//! let pipeline = Pipeline::new(&ScanConfig::default())?;
//! let ctx = ScanContext::with_timeout(Duration::from_secs(5));
//! for path in pipeline.filter(&ctx, &[PathBuf::from(".")])? {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), filesift::scan::ScanError>(())
//! ```

pub mod config;
pub mod context;
pub mod errors;
pub mod filters;
pub mod ignore_rules;
pub mod matcher;
pub mod pipeline;
pub mod static_data;
pub mod stats;
pub mod types;

pub use config::ScanConfig;
pub use context::{ContextError, ScanContext};
pub use errors::{ScanError, ScanResult};
pub use filters::{FileFilter, FilterDecision, FilterKind, is_text_content};
pub use ignore_rules::IgnoreRuleSource;
pub use matcher::{GlobExclusionSet, MatcherSet, expand_exclude_names};
pub use pipeline::{AcceptedFiles, DiscoveryStream, FilterPipeline, Pipeline};
pub use stats::ScanStats;
pub use types::{Candidate, PipelineState};
