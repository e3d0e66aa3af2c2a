// src/feed/mod.rs
//! Home feed controller
//!
//! Drives the categorized, paginated home feed. Without a selected
//! category the feed is an endless stream of random meals. Selecting a
//! category fetches every meal id in it once (the cursor set) and pages
//! through their details `page_size` at a time.

use crate::mealdb::{MealApi, RawMeal};
use crate::recipe::{Category, Recipe, transform, transform_all};
use futures::future::join_all;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Recipes per page
pub const DEFAULT_PAGE_SIZE: usize = 14;

/// Concurrent detail requests per sub-batch
pub const DEFAULT_DETAIL_BATCH_SIZE: usize = 5;

/// Random meals fetched per random-feed page
pub const DEFAULT_RANDOM_BATCH_SIZE: usize = 14;

/// Meals in the featured carousel
pub const DEFAULT_FEATURED_COUNT: usize = 5;

/// Paging knobs of the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig {
    pub page_size: usize,
    pub detail_batch_size: usize,
    pub random_batch_size: usize,
    pub featured_count: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            detail_batch_size: DEFAULT_DETAIL_BATCH_SIZE,
            random_batch_size: DEFAULT_RANDOM_BATCH_SIZE,
            featured_count: DEFAULT_FEATURED_COUNT,
        }
    }
}

/// View state of the home feed
#[derive(Debug, Clone, PartialEq)]
pub struct FeedState {
    pub selected_category: Option<String>,
    pub recipes: Vec<Recipe>,
    pub categories: Vec<Category>,
    pub featured: Vec<Recipe>,
    pub loading: bool,
    pub refreshing: bool,
    pub category_loading: bool,
    pub loading_more: bool,
    /// Every meal id of the selected category, in upstream order
    pub category_meal_ids: Vec<String>,
    pub has_more: bool,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            selected_category: None,
            recipes: Vec::new(),
            categories: Vec::new(),
            featured: Vec::new(),
            loading: false,
            refreshing: false,
            category_loading: false,
            loading_more: false,
            category_meal_ids: Vec::new(),
            has_more: true,
        }
    }
}

/// What the next `load_more` should fetch
enum NextPage {
    Category(Vec<String>, usize),
    Random,
}

/// Owns the home feed state
///
/// Methods take `&self` so one controller can be shared by concurrent
/// callers. The state lock is never held across an await.
pub struct FeedController {
    api: MealApi,
    config: FeedConfig,
    state: Mutex<FeedState>,
    /// Bumped whenever the feed contents are replaced; pages fetched
    /// under an older value are discarded
    generation: AtomicU64,
}

impl FeedController {
    pub fn new(api: MealApi, config: FeedConfig) -> Self {
        Self {
            api,
            config,
            state: Mutex::new(FeedState::default()),
            generation: AtomicU64::new(0),
        }
    }

    fn state_mut(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current view state
    pub fn state(&self) -> FeedState {
        self.state_mut().clone()
    }

    pub fn config(&self) -> FeedConfig {
        self.config
    }

    /// Fetch categories, a random page and the featured picks concurrently
    pub async fn load_initial(&self) {
        self.state_mut().loading = true;
        self.generation.fetch_add(1, Ordering::SeqCst);

        let featured_draws = join_all((0..self.config.featured_count).map(|_| self.api.get_random()));
        let (categories, random, featured) = tokio::join!(
            self.api.list_categories(),
            self.api.get_random_batch(self.config.page_size),
            featured_draws,
        );

        let categories = Category::enumerate(categories.into_value());
        let recipes = transform_all(&random);
        let featured: Vec<Recipe> = featured
            .into_iter()
            .filter_map(|draw| transform(draw.into_value().as_ref()))
            .collect();

        info!(
            "Loaded feed: {} categories, {} recipes, {} featured",
            categories.len(),
            recipes.len(),
            featured.len()
        );

        let mut state = self.state_mut();
        state.categories = categories;
        state.recipes = recipes;
        state.featured = featured;
        state.loading = false;
    }

    /// Toggle the category filter
    ///
    /// Selecting the active category clears the filter and reloads the
    /// random feed. Selecting another one replaces the feed with the first
    /// page of that category.
    pub async fn select_category(&self, name: &str) {
        let deselect = {
            let mut state = self.state_mut();
            state.category_loading = true;
            state.selected_category.as_deref() == Some(name)
        };
        self.generation.fetch_add(1, Ordering::SeqCst);

        if deselect {
            debug!("Clearing category filter '{}'", name);
            let random = self.api.get_random_batch(self.config.random_batch_size).await;

            let mut state = self.state_mut();
            state.selected_category = None;
            state.recipes = transform_all(&random);
            state.category_meal_ids.clear();
            state.has_more = true;
            state.category_loading = false;
            return;
        }

        self.state_mut().selected_category = Some(name.to_string());

        let ids: Vec<String> = self
            .api
            .filter_by_category(name)
            .await
            .into_value()
            .iter()
            .filter_map(RawMeal::meal_id)
            .map(str::to_string)
            .collect();

        let page_size = self.config.page_size;
        let first_page = &ids[..ids.len().min(page_size)];
        let details = self
            .api
            .get_many_by_id(first_page, self.config.detail_batch_size)
            .await;

        info!(
            "Category '{}': {} meals, showing {}",
            name,
            ids.len(),
            details.len()
        );

        let mut state = self.state_mut();
        state.has_more = ids.len() > page_size;
        state.category_meal_ids = ids;
        state.recipes = transform_all(&details);
        state.category_loading = false;
    }

    /// Append the next page; returns whether any work was performed
    ///
    /// Ignored while another page is loading, while the feed is being
    /// replaced, or when the feed is exhausted. A page that completes after
    /// the feed was replaced is dropped.
    pub async fn load_more(&self) -> bool {
        let generation = self.generation.load(Ordering::SeqCst);
        let next = {
            let mut state = self.state_mut();
            if state.loading_more
                || state.loading
                || state.refreshing
                || state.category_loading
                || !state.has_more
            {
                return false;
            }
            state.loading_more = true;

            if state.selected_category.is_some() && !state.category_meal_ids.is_empty() {
                let start = state.recipes.len().min(state.category_meal_ids.len());
                let end = (start + self.config.page_size).min(state.category_meal_ids.len());
                NextPage::Category(state.category_meal_ids[start..end].to_vec(), start)
            } else {
                NextPage::Random
            }
        };

        match next {
            NextPage::Category(slice, _) if slice.is_empty() => {
                let mut state = self.state_mut();
                state.has_more = false;
                state.loading_more = false;
            }
            NextPage::Category(slice, start) => {
                let details = self
                    .api
                    .get_many_by_id(&slice, self.config.detail_batch_size)
                    .await;
                debug!("Loaded {} more category recipes", details.len());

                let mut state = self.state_mut();
                if self.is_stale(generation) {
                    state.loading_more = false;
                    return false;
                }
                state.recipes.extend(transform_all(&details));
                state.has_more = state.category_meal_ids.len() > start + slice.len();
                state.loading_more = false;
            }
            NextPage::Random => {
                let random = self.api.get_random_batch(self.config.random_batch_size).await;
                debug!("Loaded {} more random recipes", random.len());

                let mut state = self.state_mut();
                if self.is_stale(generation) {
                    state.loading_more = false;
                    return false;
                }
                state.recipes.extend(transform_all(&random));
                state.loading_more = false;
            }
        }
        true
    }

    fn is_stale(&self, generation: u64) -> bool {
        let stale = self.generation.load(Ordering::SeqCst) != generation;
        if stale {
            debug!("Feed replaced while a page was loading, dropping it");
        }
        stale
    }

    /// Pull-to-refresh: drop the filter and reload everything
    pub async fn refresh(&self) {
        {
            let mut state = self.state_mut();
            state.refreshing = true;
            state.selected_category = None;
            state.category_meal_ids.clear();
            state.has_more = true;
        }

        self.load_initial().await;
        self.state_mut().refreshing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedMealSource, meal};
    use std::sync::Arc;

    fn controller(source: ScriptedMealSource) -> (FeedController, Arc<ScriptedMealSource>) {
        let source = Arc::new(source);
        let api = MealApi::new(source.clone());
        (FeedController::new(api, FeedConfig::default()), source)
    }

    #[tokio::test]
    async fn test_load_initial_fills_every_section() {
        let (feed, source) = controller(ScriptedMealSource::new().with_category_size("Beef", 3));

        feed.load_initial().await;

        let state = feed.state();
        assert_eq!(state.categories.len(), 1);
        assert_eq!(state.categories[0].id, 1);
        assert_eq!(state.recipes.len(), DEFAULT_PAGE_SIZE);
        assert_eq!(state.featured.len(), DEFAULT_FEATURED_COUNT);
        assert!(!state.loading);
        assert_eq!(source.random_calls(), DEFAULT_PAGE_SIZE + DEFAULT_FEATURED_COUNT);
    }

    #[tokio::test]
    async fn test_failed_featured_picks_are_dropped() {
        let source = ScriptedMealSource::new()
            .with_random_failure()
            .with_random_draw(None, 0);
        let (feed, _) = controller(source);

        feed.load_initial().await;
        let state = feed.state();
        assert_eq!(state.recipes.len() + state.featured.len(), DEFAULT_PAGE_SIZE + DEFAULT_FEATURED_COUNT - 2);
    }

    #[tokio::test]
    async fn test_category_pagination_runs_out() {
        let (feed, _) = controller(ScriptedMealSource::new().with_category_size("Beef", 20));

        feed.select_category("Beef").await;
        let state = feed.state();
        assert_eq!(state.recipes.len(), 14);
        assert_eq!(state.category_meal_ids.len(), 20);
        assert!(state.has_more);
        assert!(!state.category_loading);

        assert!(feed.load_more().await);
        let state = feed.state();
        assert_eq!(state.recipes.len(), 20);
        assert!(!state.has_more);
        assert_eq!(state.recipes[19].id, "Beef-20");

        assert!(!feed.load_more().await);
        assert_eq!(feed.state().recipes.len(), 20);
    }

    #[tokio::test]
    async fn test_small_category_has_no_more() {
        let (feed, _) = controller(ScriptedMealSource::new().with_category_size("Vegan", 14));

        feed.select_category("Vegan").await;
        let state = feed.state();
        assert_eq!(state.recipes.len(), 14);
        assert!(!state.has_more);
    }

    #[tokio::test]
    async fn test_selecting_same_category_toggles_off() {
        let (feed, _) = controller(ScriptedMealSource::new().with_category_size("Beef", 20));

        feed.select_category("Beef").await;
        feed.select_category("Beef").await;

        let state = feed.state();
        assert_eq!(state.selected_category, None);
        assert!(state.category_meal_ids.is_empty());
        assert!(state.has_more);
        assert_eq!(state.recipes.len(), DEFAULT_RANDOM_BATCH_SIZE);
        assert!(state.recipes.iter().all(|r| r.id.starts_with("random-")));
    }

    #[tokio::test]
    async fn test_switching_category_replaces_feed() {
        let source = ScriptedMealSource::new()
            .with_category_size("Beef", 20)
            .with_category_size("Dessert", 3);
        let (feed, _) = controller(source);

        feed.select_category("Beef").await;
        feed.select_category("Dessert").await;

        let state = feed.state();
        assert_eq!(state.selected_category.as_deref(), Some("Dessert"));
        assert_eq!(state.recipes.len(), 3);
        assert!(!state.has_more);
    }

    #[tokio::test]
    async fn test_random_feed_keeps_appending() {
        let (feed, _) = controller(ScriptedMealSource::new());
        feed.load_initial().await;

        assert!(feed.load_more().await);
        let state = feed.state();
        assert_eq!(state.recipes.len(), DEFAULT_PAGE_SIZE + DEFAULT_RANDOM_BATCH_SIZE);
        assert!(state.has_more);
    }

    #[tokio::test]
    async fn test_concurrent_load_more_runs_once() {
        // The first draw yields so the first page is still in flight.
        let source = ScriptedMealSource::new().with_random_draw(Some(meal("slow", "Slow")), 1);
        let (feed, source) = controller(source);

        let (first, second) = tokio::join!(feed.load_more(), feed.load_more());

        assert!(first);
        assert!(!second);
        assert_eq!(source.random_calls(), DEFAULT_RANDOM_BATCH_SIZE);
        assert!(!feed.state().loading_more);
    }

    #[tokio::test]
    async fn test_load_more_ignored_while_category_switches() {
        let source = ScriptedMealSource::new()
            .with_category_size("Beef", 30)
            .with_category_size("Dessert", 3);
        let (feed, _) = controller(source);
        feed.select_category("Beef").await;

        let ((), loaded) = tokio::join!(feed.select_category("Dessert"), feed.load_more());

        assert!(!loaded);
        let state = feed.state();
        assert_eq!(state.selected_category.as_deref(), Some("Dessert"));
        let ids: Vec<&str> = state.recipes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["Dessert-1", "Dessert-2", "Dessert-3"]);
        assert!(!state.has_more);
        assert!(!state.loading_more);
    }

    #[tokio::test]
    async fn test_page_in_flight_dropped_after_category_switch() {
        let source = ScriptedMealSource::new()
            .with_category_size("Beef", 30)
            .with_category_size("Dessert", 3);
        let (feed, _) = controller(source);
        feed.select_category("Beef").await;

        let (loaded, ()) = tokio::join!(feed.load_more(), feed.select_category("Dessert"));

        assert!(!loaded);
        let state = feed.state();
        assert_eq!(state.recipes.len(), 3);
        assert!(state.recipes.iter().all(|r| r.id.starts_with("Dessert-")));
        assert!(!state.has_more);
        assert!(!state.loading_more);
    }

    #[tokio::test]
    async fn test_refresh_clears_selection() {
        let (feed, _) = controller(ScriptedMealSource::new().with_category_size("Beef", 20));
        feed.select_category("Beef").await;
        feed.load_more().await;

        feed.refresh().await;

        let state = feed.state();
        assert_eq!(state.selected_category, None);
        assert!(state.category_meal_ids.is_empty());
        assert!(state.has_more);
        assert!(!state.refreshing);
        assert_eq!(state.recipes.len(), DEFAULT_PAGE_SIZE);
    }
}
