// ABOUTME: `scansheet categories` subcommands

use clap::Subcommand;
use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};

use scansheet_api::DbState;
use scansheet_core::truncate;

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// List categories with their scan counts
    List,
}

pub async fn handle_categories_command(
    db: &DbState,
    command: CategoriesCommands,
) -> anyhow::Result<()> {
    match command {
        CategoriesCommands::List => list_categories(db).await,
    }
}

async fn list_categories(db: &DbState) -> anyhow::Result<()> {
    let categories = db.category_storage.list_categories().await?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec!["ID", "Name", "Description", "Scans"]);

    for category in &categories {
        table.add_row(vec![
            category.id.clone(),
            category.name.clone(),
            truncate(category.description.as_deref().unwrap_or("-"), 40),
            category.scan_count.to_string(),
        ]);
    }

    println!("{}", table);
    println!("Total: {} categories", categories.len().to_string().cyan());

    Ok(())
}
