//! `filesift scan` - run the pipeline and print accepted paths

use anyhow::{Result, bail};
use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::Output;
use crate::config::{FilesiftConfig, ScanOverrides};
use crate::scan::{FilterKind, Pipeline, PipelineState, ScanContext, ScanStats};

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Files or directories to scan (default: current directory)
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Comma-separated file or directory names to exclude anywhere
    #[arg(long, value_name = "NAMES")]
    pub exclude: Option<String>,

    /// Ignore-file name to read rules from (repeatable)
    #[arg(long = "ignore-file", value_name = "NAME")]
    pub ignore_files: Vec<String>,

    /// Number of filter workers
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Largest file to accept, in bytes
    #[arg(long, value_name = "BYTES")]
    pub max_file_size: Option<u64>,

    /// Filters to apply, in order (repeatable or comma-separated)
    #[arg(long = "filter", value_enum, value_delimiter = ',')]
    pub filters: Vec<FilterKind>,

    /// Give up after this many seconds (0 disables the limit)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value = "plain")]
    pub format: OutputFormat,

    /// Follow symbolic links while walking
    #[arg(long)]
    pub follow_symlinks: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One path per line
    Plain,
    /// Paths plus statistics as one JSON document
    Json,
}

#[derive(Serialize)]
struct ScanReport {
    files: Vec<PathBuf>,
    stats: ScanStats,
    state: PipelineState,
    interrupted: Option<String>,
    duration_ms: u64,
}

impl ScanArgs {
    fn overrides(&self) -> Result<ScanOverrides> {
        let exclude = self.exclude.as_deref().map(parse_exclude).transpose()?;

        Ok(ScanOverrides {
            concurrency: self.concurrency,
            max_file_size: self.max_file_size,
            ignore_filenames: (!self.ignore_files.is_empty()).then(|| self.ignore_files.clone()),
            exclude,
            filters: (!self.filters.is_empty()).then(|| self.filters.clone()),
            follow_symlinks: self.follow_symlinks.then_some(true),
            timeout_secs: self.timeout,
        })
    }

    fn roots(&self) -> Vec<PathBuf> {
        if self.paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.paths.clone()
        }
    }
}

/// Split a comma-separated exclude list, dropping blank entries
fn parse_exclude(raw: &str) -> Result<Vec<String>> {
    if raw.trim().is_empty() {
        bail!("--exclude needs at least one name. Did you mean --exclude=subdirectory?");
    }
    Ok(raw
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect())
}

pub fn execute(args: ScanArgs, custom_config: Option<&Path>, output: &Output) -> Result<()> {
    let config = FilesiftConfig::load_with_custom_config(custom_config)?
        .with_overrides(&args.overrides()?)
        .scan_config()?;
    tracing::debug!("Scan configuration: {:?}", config);

    let pipeline = Pipeline::new(&config)?;
    let ctx = match config.timeout() {
        Some(timeout) => ScanContext::with_timeout(timeout),
        None => ScanContext::background(),
    };

    let start_time = Instant::now();
    let mut files = pipeline.filter(&ctx, &args.roots())?;

    let accepted = match args.format {
        OutputFormat::Plain => {
            let mut stdout = io::stdout().lock();
            let mut count = 0usize;
            for path in files.by_ref() {
                writeln!(stdout, "{}", path.display())?;
                count += 1;
            }
            stdout.flush()?;
            count
        }
        OutputFormat::Json => {
            let paths: Vec<PathBuf> = files.by_ref().collect();
            let count = paths.len();
            let report = ScanReport {
                files: paths,
                stats: files.stats(),
                state: files.state(),
                interrupted: files.interrupted().map(|reason| reason.to_string()),
                duration_ms: start_time.elapsed().as_millis() as u64,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            count
        }
    };

    let stats = files.stats();
    if let Some(reason) = files.interrupted() {
        output.warning(&format!(
            "Stopped early ({reason}); the list above may be incomplete"
        ));
    }
    if stats.roots_failed > 0 {
        output.warning(&format!(
            "{} of {} input paths could not be scanned",
            stats.roots_failed, stats.roots_requested
        ));
    }

    output.success(&format!(
        "{} files accepted in {:.2}s",
        accepted,
        start_time.elapsed().as_secs_f64()
    ));
    output.verbose_breakdown("discovered", stats.files_discovered);
    output.verbose_breakdown("excluded by rules", stats.files_excluded_by_rules);
    output.verbose_breakdown("filtered out", stats.files_filtered_out);
    output.verbose_breakdown("abandoned", stats.files_abandoned());

    Ok(())
}
