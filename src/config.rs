// src/config.rs
//! Configuration file parsing
//!
//! Supports TOML configuration files with the following sections:
//! - [mealdb] - Meal API base URL and request timeout
//! - [favorites] - Favorites backend base URL and request timeout
//! - [feed] - Page sizes of the home feed
//! - [session] - Local user id for favorites commands

use crate::feed::{
    DEFAULT_DETAIL_BATCH_SIZE, DEFAULT_FEATURED_COUNT, DEFAULT_PAGE_SIZE,
    DEFAULT_RANDOM_BATCH_SIZE, FeedConfig,
};
use crate::mealdb::DEFAULT_BASE_URL;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default favorites backend, a locally running API
pub const DEFAULT_FAVORITES_URL: &str = "http://localhost:5001/api";

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub mealdb: MealDbSection,

    #[serde(default)]
    pub favorites: FavoritesSection,

    #[serde(default)]
    pub feed: FeedSection,

    #[serde(default)]
    pub session: SessionSection,
}

/// Meal API section
#[derive(Debug, Deserialize)]
pub struct MealDbSection {
    #[serde(default = "default_mealdb_url")]
    pub base_url: String,

    /// Request timeout (e.g., "30s", "1m")
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

impl Default for MealDbSection {
    fn default() -> Self {
        Self {
            base_url: default_mealdb_url(),
            timeout: default_timeout(),
        }
    }
}

fn default_mealdb_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> String {
    "30s".to_string()
}

/// Favorites backend section
#[derive(Debug, Deserialize)]
pub struct FavoritesSection {
    #[serde(default = "default_favorites_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout: String,
}

impl Default for FavoritesSection {
    fn default() -> Self {
        Self {
            base_url: default_favorites_url(),
            timeout: default_timeout(),
        }
    }
}

fn default_favorites_url() -> String {
    DEFAULT_FAVORITES_URL.to_string()
}

/// Home feed section
#[derive(Debug, Deserialize)]
pub struct FeedSection {
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_detail_batch_size")]
    pub detail_batch_size: usize,

    #[serde(default = "default_random_batch_size")]
    pub random_batch_size: usize,

    #[serde(default = "default_featured_count")]
    pub featured_count: usize,
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            detail_batch_size: DEFAULT_DETAIL_BATCH_SIZE,
            random_batch_size: DEFAULT_RANDOM_BATCH_SIZE,
            featured_count: DEFAULT_FEATURED_COUNT,
        }
    }
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_detail_batch_size() -> usize {
    DEFAULT_DETAIL_BATCH_SIZE
}

fn default_random_batch_size() -> usize {
    DEFAULT_RANDOM_BATCH_SIZE
}

fn default_featured_count() -> usize {
    DEFAULT_FEATURED_COUNT
}

/// Session section
#[derive(Debug, Default, Deserialize)]
pub struct SessionSection {
    /// Identity-provider user id used as the favorites key
    #[serde(default)]
    pub user_id: Option<String>,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or from the default location when `None`
    ///
    /// A missing file at the default location yields the defaults; an
    /// explicitly named file must exist.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match default_path() {
                Some(path) if path.exists() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.mealdb.base_url)
            .with_context(|| format!("Invalid mealdb.base_url: {}", self.mealdb.base_url))?;
        url::Url::parse(&self.favorites.base_url)
            .with_context(|| format!("Invalid favorites.base_url: {}", self.favorites.base_url))?;

        self.mealdb_timeout()?;
        self.favorites_timeout()?;

        let sizes = [
            ("feed.page_size", self.feed.page_size),
            ("feed.detail_batch_size", self.feed.detail_batch_size),
            ("feed.random_batch_size", self.feed.random_batch_size),
        ];
        for (name, value) in sizes {
            if value == 0 {
                anyhow::bail!("{} must be greater than 0", name);
            }
        }

        Ok(())
    }

    pub fn mealdb_timeout(&self) -> Result<Duration> {
        parse_duration(&self.mealdb.timeout).context("Invalid mealdb.timeout")
    }

    pub fn favorites_timeout(&self) -> Result<Duration> {
        parse_duration(&self.favorites.timeout).context("Invalid favorites.timeout")
    }

    /// Paging knobs for the feed controller
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            page_size: self.feed.page_size,
            detail_batch_size: self.feed.detail_batch_size,
            random_batch_size: self.feed.random_batch_size,
            featured_count: self.feed.featured_count,
        }
    }
}

/// `<config dir>/recipe-finder/config.toml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("recipe-finder").join("config.toml"))
}

/// Parse a human-readable duration string (e.g., "500ms", "30s", "2m")
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();

    if let Some(millis) = s.strip_suffix("ms") {
        let num: u64 = millis
            .trim()
            .parse()
            .with_context(|| format!("Invalid duration number: {}", millis))?;
        if num == 0 {
            anyhow::bail!("Duration must be greater than 0: {}", s);
        }
        return Ok(Duration::from_millis(num));
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('h') {
        (n, 60 * 60)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else {
        // Assume seconds
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid duration number: {}", num_str))?;

    if num == 0 {
        anyhow::bail!("Duration must be greater than 0: {}", s);
    }

    let secs = num
        .checked_mul(multiplier)
        .with_context(|| format!("Duration out of range: {}", s))?;

    Ok(Duration::from_secs(secs))
}
