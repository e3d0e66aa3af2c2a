// src/lib.rs

//! Recipe Finder
//!
//! Client core of a recipe-browsing app: fetches meals from a public meal
//! API, normalizes them into recipes, drives a categorized and paginated
//! home feed, and saves favorites for signed-in users against a small REST
//! backend.
//!
//! # Architecture
//!
//! - Service seams: `MealSource`, `FavoritesBackend`, `IdentityProvider`
//!   and `Surface` are traits, injected into the controllers
//! - Best-effort fetching: `MealApi` logs failures and reports them as
//!   `Fetched::Failed`; screens treat them as empty results
//! - Controllers: feed, favorites, detail and search own their view state
//!   behind a mutex and are shared by reference

pub mod config;
pub mod detail;
mod error;
pub mod favorites;
pub mod feed;
pub mod mealdb;
pub mod recipe;
pub mod search;
pub mod session;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::AppConfig;
pub use detail::{DetailState, RecipeDetail};
pub use error::{Error, Result};
pub use favorites::{
    FavoriteRecipe, FavoritesBackend, FavoritesController, FavoritesState, HttpFavoritesBackend,
    NewFavorite, Servings,
};
pub use feed::{FeedConfig, FeedController, FeedState};
pub use mealdb::{Fetched, HttpMealSource, MealApi, MealFilter, MealSource, RawCategory, RawMeal};
pub use recipe::{Category, Recipe, transform, transform_all};
pub use search::{SearchController, SearchState};
pub use session::{AuthGate, IdentityProvider, LocalSession, LogSurface, Surface};
