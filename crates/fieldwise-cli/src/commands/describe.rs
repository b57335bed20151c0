//! Describe command
//!
//! Usage: fieldwise describe [--settings <FILE>]

use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DescribeArgs {
    /// Settings file (TOML, YAML or JSON)
    #[arg(short, long)]
    pub settings: Option<PathBuf>,
}

/// Execute describe command
pub fn execute(args: DescribeArgs) -> anyhow::Result<()> {
    let configuration = super::configuration(args.settings.as_deref())?;
    print!("{}", configuration.multi_line_description());
    Ok(())
}
