//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`Command`] - The available subcommands

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Import, inspect, and manage chat export bundles.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatlens")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatlens import export.zip
    chatlens import export.zip --name \"family group\"
    chatlens list
    chatlens show \"family group\"
    chatlens delete \"family group\"")]
pub struct Args {
    /// Directory for conversation data (defaults to the platform data dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Sender names to mark as your own messages
    #[arg(long = "self", global = true, value_name = "NAME")]
    pub self_senders: Vec<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Import a chat export bundle (zip archive)
    Import {
        /// Path to the export bundle
        archive: PathBuf,

        /// Conversation name (defaults to the archive filename sans extension)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List stored conversations
    List,

    /// Show a conversation's messages and missing-media diagnostics
    Show {
        /// Conversation name
        name: String,
    },

    /// Delete a conversation and its stored media
    Delete {
        /// Conversation name
        name: String,
    },
}
