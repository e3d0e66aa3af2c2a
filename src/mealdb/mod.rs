// src/mealdb/mod.rs
//! Meal API client
//!
//! Two layers, mirroring how the rest of the crate separates transport
//! from policy:
//!
//! - [`MealSource`]: raw, fallible calls (`HttpMealSource` talks to
//!   TheMealDB; tests plug in scripted sources)
//! - [`MealApi`]: best-effort facade that logs failures and returns
//!   [`Fetched`] values, never errors
//!
//! # Example
//!
//! ```ignore
//! let source = HttpMealSource::new(DEFAULT_BASE_URL)?;
//! let api = MealApi::new(Arc::new(source));
//! let meals = api.search_by_name("arrabiata").await.into_value();
//! ```

mod api;
mod raw;
mod source;

pub use api::{Fetched, MealApi};
pub use raw::{INGREDIENT_SLOTS, RawCategory, RawMeal};
pub use source::{
    DEFAULT_BASE_URL, HTTP_TIMEOUT, HttpMealSource, MealFilter, MealSource, decode_categories,
    decode_meals,
};
