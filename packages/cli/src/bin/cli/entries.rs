// ABOUTME: `scansheet entries` subcommands
// ABOUTME: Lists and adds entries straight against the database

use clap::Subcommand;
use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};

use scansheet_api::DbState;
use scansheet_core::truncate;
use scansheet_entries::EntryCreateInput;

#[derive(Subcommand)]
pub enum EntriesCommands {
    /// List entries and their codes
    List {
        /// Filter by name or code
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add a new entry
    Add {
        /// Entry name
        name: String,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },
}

pub async fn handle_entries_command(db: &DbState, command: EntriesCommands) -> anyhow::Result<()> {
    match command {
        EntriesCommands::List { search } => list_entries(db, search.as_deref()).await,
        EntriesCommands::Add { name, notes } => add_entry(db, name, notes).await,
    }
}

async fn list_entries(db: &DbState, search: Option<&str>) -> anyhow::Result<()> {
    let entries = db.entry_storage.list_entries(search).await?;

    if entries.is_empty() {
        println!("{}", "No entries found".yellow());
        println!("{}", "Use 'scansheet entries add <name>' to create one".dimmed());
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec!["ID", "Name", "Code", "Notes", "Created"]);

    for entry in &entries {
        table.add_row(vec![
            entry.id.clone(),
            truncate(&entry.name, 30),
            entry.code.clone(),
            truncate(entry.notes.as_deref().unwrap_or("-"), 30),
            entry.created_at.format("%Y-%m-%d").to_string(),
        ]);
    }

    println!("{}", table);
    println!("Total: {} entries", entries.len().to_string().cyan());

    Ok(())
}

async fn add_entry(db: &DbState, name: String, notes: Option<String>) -> anyhow::Result<()> {
    let entry = db
        .entry_storage
        .create_entry(EntryCreateInput { name, notes })
        .await?;

    println!(
        "{} Created {} with code {}",
        "✓".green(),
        entry.name.bold(),
        entry.code.cyan()
    );

    Ok(())
}
