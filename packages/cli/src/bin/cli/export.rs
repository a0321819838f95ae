// ABOUTME: `scansheet export` subcommands
// ABOUTME: Writes filtered attendance reports to a file or stdout

use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Subcommand;
use colored::*;

use scansheet_api::DbState;
use scansheet_core::parse_scan_date;
use scansheet_export::write_scans_csv;
use scansheet_scans::{ScanFilter, ScanOrder};

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export scans as CSV
    Csv {
        /// Only this day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// Only this category (name or ID)
        #[arg(short, long)]
        category: Option<String>,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub async fn handle_export_command(db: &DbState, command: ExportCommands) -> anyhow::Result<()> {
    match command {
        ExportCommands::Csv {
            date,
            category,
            output,
        } => export_csv(db, date, category, output).await,
    }
}

async fn export_csv(
    db: &DbState,
    date: Option<String>,
    category: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let date = date.map(|d| parse_scan_date(&d)).transpose()?;

    let category_id = match category {
        Some(category) => {
            let found = match db.category_storage.get_category_by_name(&category).await? {
                Some(found) => found,
                None => db
                    .category_storage
                    .get_category(&category)
                    .await
                    .map_err(|_| anyhow!("Category '{}' not found", category))?,
            };
            Some(found.id)
        }
        None => None,
    };

    let filter = ScanFilter {
        date,
        category_id,
        code: None,
    };
    let scans = db.scan_storage.list_scans(&filter, ScanOrder::Report).await?;
    let csv = write_scans_csv(&scans)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &csv)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} Exported {} scan(s) to {}",
                "✓".green(),
                scans.len().to_string().cyan(),
                path.display()
            );
        }
        None => std::io::stdout().write_all(&csv)?,
    }

    Ok(())
}
