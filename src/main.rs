//! # chatlens CLI
//!
//! Command-line interface for the chatlens library.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use chatlens::cli::{Args, Command};
use chatlens::registry::ConversationRegistry;
use chatlens::session::Session;
use chatlens::store::{FsContentStore, JsonMetadataStore};
use chatlens::{Error, Result};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = <Args as ClapParser>::parse();

    let data_dir = args
        .data_dir
        .clone()
        .or_else(|| dirs::data_dir().map(|d| d.join("chatlens")))
        .unwrap_or_else(|| PathBuf::from(".chatlens"));

    let registry = ConversationRegistry::open(
        Box::new(JsonMetadataStore::new(data_dir.join("conversations.json"))),
        Box::new(FsContentStore::new(data_dir.join("media"))),
    );
    let mut session = Session::new(registry).with_self_senders(args.self_senders.clone());

    match args.command {
        Command::Import { archive, name } => {
            println!("📦 chatlens v{}", env!("CARGO_PKG_VERSION"));
            println!("📂 Importing: {}", archive.display());

            let bytes = fs::read(&archive)?;
            // Default to the archive filename sans extension.
            let stem = archive
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned());
            let summary = session
                .import_archive(&bytes, name.as_deref().or(stem.as_deref()))
                .map_err(|e| match e {
                    Error::Archive { source, path: None } => Error::archive(source, Some(archive)),
                    other => other,
                })?;

            println!();
            println!("✅ Imported '{}'", summary.name);
            println!("   Messages: {}", summary.message_count);
            println!("   Media:    {}", summary.media_count);
            if summary.missing.has_missing_media {
                println!(
                    "⚠️  {} message(s) reference media not present in the archive:",
                    summary.missing.missing_media_count
                );
                for reference in &summary.missing.missing_media_list {
                    println!("   - {}", reference);
                }
            }
        }

        Command::List => {
            let conversations = session.list();
            if conversations.is_empty() {
                println!("No conversations stored.");
            } else {
                println!("💬 Conversations:");
                for conversation in conversations {
                    let media_marker = if conversation.has_media { " 📎" } else { "" };
                    println!(
                        "   {} ({} messages){}",
                        conversation.name,
                        conversation.messages.len(),
                        media_marker
                    );
                }
            }
        }

        Command::Show { name } => {
            let Some((conversation, report)) = session.open(&name) else {
                eprintln!("❌ No conversation named '{}'", name);
                process::exit(1);
            };

            println!("💬 {}", conversation.name);
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            for message in &conversation.messages {
                let attachment = message
                    .media_reference()
                    .map(|r| format!(" [{}]", r))
                    .unwrap_or_default();
                println!(
                    "[{} {}] {}: {}{}",
                    message.date, message.time, message.sender, message.text, attachment
                );
            }

            if report.has_missing_media {
                println!();
                println!(
                    "⚠️  {} message(s) reference missing media:",
                    report.missing_media_count
                );
                for reference in &report.missing_media_list {
                    println!("   - {}", reference);
                }
            }
        }

        Command::Delete { name } => {
            if session.delete(&name) {
                println!("🗑️  Deleted '{}'", name);
            } else {
                eprintln!("❌ No conversation named '{}'", name);
                process::exit(1);
            }
        }
    }

    if session.registry().is_persistence_degraded() {
        eprintln!("⚠️  Storage was unavailable; changes may not survive this session.");
    }

    Ok(())
}
