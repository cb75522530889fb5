use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod config;
pub mod scan;

#[derive(Parser)]
#[command(
    name = "filesift",
    version = env!("CARGO_PKG_VERSION"),
    about = "Find the text files worth scanning under a set of paths",
    long_about = "filesift walks the given files and directories, applies .gitignore rules, \
                  a built-in noise catalog and your exclusions, and prints every remaining \
                  file that is non-empty text within the size limit."
)]
pub struct Cli {
    /// Run as if started in <DIR> instead of current working directory
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the files that pass every filter
    Scan(scan::ScanArgs),
    /// Show the merged configuration
    Config(config::ConfigArgs),
}

impl Cli {
    pub fn run(self) -> Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)
                .with_context(|| format!("Cannot change directory to {}", dir.display()))?;
        }

        setup_logging(self.verbose, self.quiet);

        let output = super::Output::new(self.verbose > 0, self.quiet);
        match self.command {
            Commands::Scan(args) => scan::execute(args, self.config.as_deref(), &output),
            Commands::Config(args) => config::execute(args, self.config.as_deref()),
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    // Keep ignore/globset quiet unless everything is requested
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,ignore=warn,globset=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,ignore=warn,globset=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
