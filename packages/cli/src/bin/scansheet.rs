use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use colored::*;

use scansheet_api::DbState;
use scansheet_cli::{init_tracing, run_server, Config};

mod cli;

use cli::categories::CategoriesCommands;
use cli::entries::EntriesCommands;
use cli::export::ExportCommands;

#[derive(Parser)]
#[command(name = "scansheet")]
#[command(about = "Scansheet - QR code attendance tracking")]
#[command(version)]
struct Cli {
    /// Database file (overrides SCANSHEET_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to bind (overrides SCANSHEET_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides SCANSHEET_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Manage entries
    #[command(subcommand)]
    Entries(EntriesCommands),
    /// Manage categories
    #[command(subcommand)]
    Categories(CategoriesCommands),
    /// Export attendance reports
    #[command(subcommand)]
    Export(ExportCommands),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Cli::parse();

    if let Err(e) = handle_command(args).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(args: Cli) -> anyhow::Result<()> {
    let env_config = Config::from_env()?;

    match args.command {
        Commands::Serve { host, port } => {
            let config = env_config.with_overrides(host, port, args.db)?;
            run_server(config).await
        }
        Commands::Entries(command) => {
            let db = open_database(env_config, args.db).await?;
            cli::entries::handle_entries_command(&db, command).await
        }
        Commands::Categories(command) => {
            let db = open_database(env_config, args.db).await?;
            cli::categories::handle_categories_command(&db, command).await
        }
        Commands::Export(command) => {
            let db = open_database(env_config, args.db).await?;
            cli::export::handle_export_command(&db, command).await
        }
    }
}

async fn open_database(config: Config, db: Option<PathBuf>) -> anyhow::Result<DbState> {
    let config = config.with_overrides(None, None, db)?;
    Ok(DbState::init(&config.pool_settings()).await?)
}
