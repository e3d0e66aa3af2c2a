// src/favorites/mod.rs
//! Saved recipes and account lifecycle
//!
//! The favorites backend owns the records; this module keeps a transient
//! copy for display. Saves carry a snapshot of the display fields so the
//! favorites grid renders without re-fetching recipe details.

mod backend;
mod controller;

pub use backend::{BACKEND_TIMEOUT, FavoritesBackend, HttpFavoritesBackend};
pub use controller::{FavoritesController, FavoritesState};

use crate::recipe::Recipe;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A saved recipe as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecipe {
    pub recipe_id: i64,
    pub user_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub cook_time: String,
    #[serde(default)]
    pub servings: Servings,
    /// Display id; set to `recipe_id` once loaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl FavoriteRecipe {
    /// Normalize a record for display: `id` mirrors `recipe_id`
    pub fn for_display(mut self) -> Self {
        self.id = Some(self.recipe_id);
        self.servings = self.servings.normalized();
        self
    }
}

/// Serving count, which the backend may hand back as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Servings {
    Count(i64),
    Text(String),
}

impl Servings {
    /// Numeric text becomes a count; anything else is kept verbatim
    pub fn normalized(self) -> Self {
        match self {
            Servings::Text(text) => match text.trim().parse() {
                Ok(count) => Servings::Count(count),
                Err(_) => Servings::Text(text),
            },
            count => count,
        }
    }
}

impl Default for Servings {
    fn default() -> Self {
        Servings::Text(String::new())
    }
}

impl fmt::Display for Servings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Servings::Count(count) => write!(f, "{count}"),
            Servings::Text(text) => f.write_str(text),
        }
    }
}

/// Body of a save request: the key plus a snapshot of display fields
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFavorite {
    pub user_id: String,
    pub recipe_id: i64,
    pub title: String,
    pub image: String,
    pub cook_time: String,
    pub servings: u32,
}

impl NewFavorite {
    /// Snapshot `recipe` for `user_id`
    pub fn snapshot(user_id: &str, recipe_id: i64, recipe: &Recipe) -> Self {
        Self {
            user_id: user_id.to_string(),
            recipe_id,
            title: recipe.title.clone(),
            image: recipe.image.clone(),
            cook_time: recipe.cook_time.clone(),
            servings: recipe.servings,
        }
    }
}
