// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, FavoritesCommands};
use commands::Services;
use recipe_finder::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Recipe Finder v{}", env!("CARGO_PKG_VERSION"));
        println!("Run 'recipe-finder --help' for usage information");
        return Ok(());
    };

    let config = AppConfig::load_or_default(cli.config.as_deref())?;
    let services = Services::from_config(config)?;

    match command {
        Commands::Search { query } => commands::cmd_search(&services, &query).await,
        Commands::Show { id } => commands::cmd_show(&services, &id).await,
        Commands::Random { count } => commands::cmd_random(&services, count).await,
        Commands::Categories => commands::cmd_categories(&services).await,
        Commands::Feed { category, pages } => {
            commands::cmd_feed(&services, category.as_deref(), pages).await
        }
        Commands::Favorites(FavoritesCommands::List) => {
            commands::cmd_favorites_list(&services).await
        }
        Commands::Favorites(FavoritesCommands::Save { id }) => {
            commands::cmd_favorites_set(&services, &id, true).await
        }
        Commands::Favorites(FavoritesCommands::Remove { id }) => {
            commands::cmd_favorites_set(&services, &id, false).await
        }
    }
}
