//! Command-line options.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Terminal mail client backed by Notion, Pinecone and an OpenAI chat model.
#[derive(Debug, Parser)]
#[command(name = "notemail", version, about)]
pub struct Cli {
    /// Extra notemail.json5 layer applied last; may be repeated
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Vec<PathBuf>,
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum CliCommand {
    /// Interactive menu (default)
    Menu,
    /// Natural-language assistant
    Chat,
    /// Embed every stored message into the vector index
    Reindex,
    /// Message counts per sender and recipient
    Stats,
    /// Check the database schema
    Doctor,
}

impl Cli {
    pub fn command(&self) -> CliCommand {
        self.command.unwrap_or(CliCommand::Menu)
    }
}
