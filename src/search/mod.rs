// src/search/mod.rs
//! Recipe search
//!
//! Name search with a main-ingredient fallback. An empty query shows random
//! suggestions instead.

use crate::mealdb::MealApi;
use crate::recipe::{Recipe, transform_all};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Random suggestions shown for an empty query
pub const DEFAULT_SUGGESTION_COUNT: usize = 12;

/// Maximum results kept for a query
pub const DEFAULT_RESULT_LIMIT: usize = 12;

/// View state of the search screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<Recipe>,
    pub searching: bool,
}

pub struct SearchController {
    api: MealApi,
    suggestion_count: usize,
    result_limit: usize,
    state: Mutex<SearchState>,
}

impl SearchController {
    pub fn new(api: MealApi) -> Self {
        Self::with_limits(api, DEFAULT_SUGGESTION_COUNT, DEFAULT_RESULT_LIMIT)
    }

    pub fn with_limits(api: MealApi, suggestion_count: usize, result_limit: usize) -> Self {
        Self {
            api,
            suggestion_count,
            result_limit,
            state: Mutex::new(SearchState::default()),
        }
    }

    fn state_mut(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> SearchState {
        self.state_mut().clone()
    }

    /// Run a search and store its results
    pub async fn search(&self, query: &str) -> Vec<Recipe> {
        let query = query.trim();
        {
            let mut state = self.state_mut();
            state.query = query.to_string();
            state.searching = true;
        }

        let meals = if query.is_empty() {
            debug!("Empty query, loading {} suggestions", self.suggestion_count);
            self.api.get_random_batch(self.suggestion_count).await
        } else {
            let by_name = self.api.search_by_name(query).await.into_value();
            if by_name.is_empty() {
                debug!("No name matches for '{}', trying ingredient", query);
                self.api.filter_by_ingredient(query).await.into_value()
            } else {
                by_name
            }
        };

        let mut results = transform_all(&meals);
        results.truncate(self.result_limit);
        info!("Search '{}': {} results", query, results.len());

        let mut state = self.state_mut();
        state.results = results.clone();
        state.searching = false;
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedMealSource, meal, partial_meal};
    use std::sync::Arc;

    fn controller(source: ScriptedMealSource) -> (SearchController, Arc<ScriptedMealSource>) {
        let source = Arc::new(source);
        (SearchController::new(MealApi::new(source.clone())), source)
    }

    #[tokio::test]
    async fn test_empty_query_shows_suggestions() {
        let (search, source) = controller(ScriptedMealSource::new());

        let results = search.search("   ").await;
        assert_eq!(results.len(), DEFAULT_SUGGESTION_COUNT);
        assert_eq!(source.random_calls(), DEFAULT_SUGGESTION_COUNT);
        assert_eq!(search.state().query, "");
    }

    #[tokio::test]
    async fn test_name_match_skips_ingredient_filter() {
        let source = ScriptedMealSource::new()
            .with_search("chicken", vec![meal("1", "Chicken Pie")])
            .with_ingredient("chicken", vec![partial_meal("2", "Chicken Curry")]);
        let (search, source) = controller(source);

        let results = search.search("Chicken").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Chicken Pie");
        assert!(source.filters().is_empty());
    }

    #[tokio::test]
    async fn test_falls_back_to_ingredient() {
        let source = ScriptedMealSource::new()
            .with_ingredient("garlic", vec![partial_meal("2", "Garlic Bread")]);
        let (search, _) = controller(source);

        let results = search.search(" garlic ").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "2");
        assert!(results[0].ingredients.is_empty());
        assert!(!search.state().searching);
    }

    #[tokio::test]
    async fn test_results_are_capped() {
        let meals = (1..=20).map(|i| meal(&i.to_string(), &format!("Soup {i}"))).collect();
        let (search, _) = controller(ScriptedMealSource::new().with_search("soup", meals));

        assert_eq!(search.search("soup").await.len(), DEFAULT_RESULT_LIMIT);
    }
}
