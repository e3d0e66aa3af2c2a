// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use recipe_finder::testing::{FakeIdentity, MemoryFavorites, RecordingSurface, ScriptedMealSource};
use recipe_finder::{AuthGate, MealApi};
use std::sync::Arc;

/// Every service seam backed by an in-memory fake.
///
/// Keep the `Arc`s around to inspect what the controllers did.
pub struct App {
    pub source: Arc<ScriptedMealSource>,
    pub favorites: Arc<MemoryFavorites>,
    pub identity: Arc<FakeIdentity>,
    pub surface: Arc<RecordingSurface>,
}

impl App {
    pub fn new(source: ScriptedMealSource, favorites: MemoryFavorites, identity: FakeIdentity) -> Self {
        Self {
            source: Arc::new(source),
            favorites: Arc::new(favorites),
            identity: Arc::new(identity),
            surface: Arc::new(RecordingSurface::default()),
        }
    }

    pub fn api(&self) -> MealApi {
        MealApi::new(self.source.clone())
    }

    pub fn gate(&self) -> AuthGate {
        AuthGate::new(self.identity.clone(), self.surface.clone())
    }
}

/// A meal catalog with a large and a small category.
///
/// - `Seafood`: 20 meals (`Seafood-1` ..= `Seafood-20`)
/// - `Dessert`: 3 meals
/// - `52772`: Teriyaki Chicken Casserole
pub fn catalog() -> ScriptedMealSource {
    ScriptedMealSource::new()
        .with_category_size("Seafood", 20)
        .with_category_size("Dessert", 3)
        .with_meal(recipe_finder::testing::meal("52772", "Teriyaki Chicken Casserole"))
}
