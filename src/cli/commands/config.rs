use anyhow::Result;
use clap::Args;
use std::path::Path;

use crate::config::FilesiftConfig;

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Print on one line instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

/// Print the effective merged configuration as JSON
pub fn execute(args: ConfigArgs, custom_config: Option<&Path>) -> Result<()> {
    let config = FilesiftConfig::load_with_custom_config(custom_config)?.get_full_config()?;
    let rendered = if args.compact {
        serde_json::to_string(&config)?
    } else {
        serde_json::to_string_pretty(&config)?
    };
    println!("{rendered}");
    Ok(())
}
