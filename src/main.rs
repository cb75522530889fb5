use anyhow::Result;
use clap::Parser;
use filesift::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
