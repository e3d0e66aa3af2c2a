// src/cli.rs
//! CLI definitions for recipe-finder
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recipe-finder")]
#[command(version)]
#[command(about = "Browse recipes from TheMealDB and manage saved favorites", long_about = None)]
pub struct Cli {
    /// Path to the config file (default: <config dir>/recipe-finder/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search recipes by name, falling back to main ingredient
    Search {
        /// Search text; empty shows random suggestions
        #[arg(default_value = "")]
        query: String,
    },

    /// Show one recipe in full
    Show {
        /// Meal id (e.g., 52772)
        id: String,
    },

    /// Show random recipes
    Random {
        /// Number of recipes
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },

    /// List meal categories
    Categories,

    /// Show the home feed
    Feed {
        /// Only show recipes in this category
        #[arg(long)]
        category: Option<String>,

        /// Number of pages to load
        #[arg(short, long, default_value = "1")]
        pages: usize,
    },

    /// Manage saved recipes (requires [session] user_id)
    #[command(subcommand)]
    Favorites(FavoritesCommands),
}

#[derive(Subcommand)]
pub enum FavoritesCommands {
    /// List saved recipes
    List,

    /// Save a recipe
    Save {
        /// Meal id
        id: String,
    },

    /// Remove a saved recipe
    Remove {
        /// Meal id
        id: String,
    },
}
