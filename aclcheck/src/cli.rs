use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "aclcheck")]
#[command(version = crate::version::version_long())]
#[command(about = "Check and format ACL policy files")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a policy file and report diagnostics, or print the decoded rules
    Check {
        /// Policy file to check ("-" reads stdin; defaults to the configured file)
        file: Option<PathBuf>,
        /// Print the decoded document and diagnostics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a policy file in canonical form
    Fmt {
        /// Policy file to format ("-" reads stdin; defaults to the configured file)
        file: Option<PathBuf>,
    },

    /// Show the accepted blocks and arguments at each nesting level
    Schema {
        /// Output as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },
}
