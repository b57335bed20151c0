//! Fieldwise CLI
//!
//! Recursive comparison of JSON, YAML and TOML documents.
//!
//! Exit codes: 0 when the documents are equal, 1 when differences were
//! found, 2 on any error.

use clap::{Parser, Subcommand};
use fieldwise_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "fieldwise")]
#[command(about = "Fieldwise - recursive field by field comparison of documents", long_about = None)]
struct Cli {
    /// Logging profile (development or production); logs go to stderr
    #[arg(long, global = true)]
    log_profile: Option<Profile>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare two documents field by field
    Diff(commands::diff::DiffArgs),
    /// Print the comparison configuration built from settings
    Describe(commands::describe::DescribeArgs),
}

fn main() {
    let cli = Cli::parse();
    if let Some(profile) = cli.log_profile {
        init(profile);
    }

    let result = match cli.command {
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Describe(args) => commands::describe::execute(args).map(|()| commands::Outcome::Equal),
    };

    match result {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}
