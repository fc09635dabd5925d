//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};

use super::commands::serve::ServeArgs;
use super::commands::submit::SubmitArgs;

#[derive(Parser, Debug)]
#[command(name = "issue-mirror")]
#[command(about = "Mirror newly opened GitHub issues into Notion databases", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the GitHub webhook server
    Serve(ServeArgs),

    /// Replay a saved webhook payload through the mirroring pipeline
    Submit(SubmitArgs),
}
