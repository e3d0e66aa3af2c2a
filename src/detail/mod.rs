// src/detail/mod.rs
//! Recipe detail view
//!
//! Loads a single recipe together with whether the signed-in user has it
//! saved, and toggles the saved state against the favorites backend. The
//! toggle is optimistic: the flag flips before the request and is reverted
//! if the backend rejects it.

use crate::error::{Error, Result};
use crate::favorites::{FavoritesBackend, NewFavorite};
use crate::mealdb::MealApi;
use crate::recipe::{Recipe, transform};
use crate::session::AuthGate;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

/// View state of the detail screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailState {
    pub recipe: Option<Recipe>,
    pub loading: bool,
    pub is_saved: bool,
    pub is_saving: bool,
}

/// Controller for one recipe detail screen
pub struct RecipeDetail {
    api: MealApi,
    backend: Arc<dyn FavoritesBackend>,
    gate: AuthGate,
    state: Mutex<DetailState>,
}

/// Favorites key of a meal id
pub fn parse_recipe_id(id: &str) -> Result<i64> {
    id.trim()
        .parse()
        .map_err(|_| Error::ParseError(format!("Recipe id '{}' is not numeric", id)))
}

impl RecipeDetail {
    pub fn new(api: MealApi, backend: Arc<dyn FavoritesBackend>, gate: AuthGate) -> Self {
        Self {
            api,
            backend,
            gate,
            state: Mutex::new(DetailState::default()),
        }
    }

    fn state_mut(&self) -> MutexGuard<'_, DetailState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current view state
    pub fn state(&self) -> DetailState {
        self.state_mut().clone()
    }

    /// Load the recipe and its saved state concurrently
    ///
    /// Returns `Error::NotFoundError` when the meal API has no such recipe
    /// (or could not be reached). Saved-state failures only log.
    pub async fn load(&self, recipe_id: &str) -> Result<Recipe> {
        self.state_mut().loading = true;

        let (meal, is_saved) = tokio::join!(self.api.get_by_id(recipe_id), self.saved_state(recipe_id));
        let recipe = transform(meal.into_value().as_ref());

        let mut state = self.state_mut();
        state.loading = false;
        state.is_saved = is_saved;
        state.recipe = recipe.clone();

        recipe.ok_or_else(|| Error::NotFoundError(format!("Recipe {} not found", recipe_id)))
    }

    async fn saved_state(&self, recipe_id: &str) -> bool {
        let Some(user_id) = self.gate.identity().current_user_id() else {
            return false;
        };
        let Ok(key) = parse_recipe_id(recipe_id) else {
            return false;
        };

        match self.backend.list(&user_id).await {
            Ok(favorites) => favorites.iter().any(|f| f.recipe_id == key),
            Err(e) => {
                warn!("Error checking if recipe is saved: {}", e);
                false
            }
        }
    }

    /// Save or unsave the loaded recipe
    ///
    /// Returns `Ok(false)` without side effects when no recipe is loaded, a
    /// toggle is already in flight, or the user is signed out (after the
    /// sign-in prompt). On backend failure the saved flag is restored and
    /// the user is alerted.
    pub async fn toggle_save(&self) -> Result<bool> {
        let (recipe, was_saved) = {
            let state = self.state_mut();
            match &state.recipe {
                Some(recipe) if !state.is_saving => (recipe.clone(), state.is_saved),
                _ => return Ok(false),
            }
        };

        if !self.gate.check() {
            return Ok(false);
        }
        let user_id = self
            .gate
            .identity()
            .current_user_id()
            .ok_or(Error::NotSignedIn)?;
        let recipe_id = parse_recipe_id(&recipe.id)?;

        {
            let mut state = self.state_mut();
            state.is_saved = !was_saved;
            state.is_saving = true;
        }

        let result = if was_saved {
            debug!("Removing recipe {} from favorites", recipe_id);
            self.backend.delete(&user_id, recipe_id).await
        } else {
            debug!("Saving recipe {} to favorites", recipe_id);
            let favorite = NewFavorite::snapshot(&user_id, recipe_id, &recipe);
            self.backend.create(&favorite).await
        };

        let mut state = self.state_mut();
        state.is_saving = false;
        match result {
            Ok(()) => {
                info!(
                    "Recipe {} {}",
                    recipe_id,
                    if was_saved { "removed from favorites" } else { "saved" }
                );
                Ok(true)
            }
            Err(e) => {
                state.is_saved = was_saved;
                drop(state);
                error!("Error toggling save: {}", e);
                self.gate
                    .surface()
                    .alert("Error", "Something went wrong. Please try again.");
                Err(e)
            }
        }
    }
}
