// src/testing.rs

//! In-memory fakes for the service seams
//!
//! Scripted implementations of [`MealSource`], [`FavoritesBackend`],
//! [`IdentityProvider`] and [`Surface`] that record how they were called.
//! Used by the unit tests, the integration tests, and by anyone embedding
//! the controllers without network access.

use crate::error::{Error, Result};
use crate::favorites::{FavoriteRecipe, FavoritesBackend, NewFavorite, Servings};
use crate::mealdb::{MealFilter, MealSource, RawCategory, RawMeal};
use crate::session::{IdentityProvider, Surface};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A complete meal record with two ingredients and two instruction lines
pub fn meal(id: &str, name: &str) -> RawMeal {
    let mut meal = RawMeal {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        thumbnail: Some(format!("https://www.themealdb.com/images/media/meals/{id}.jpg")),
        category: Some("Miscellaneous".to_string()),
        area: Some("British".to_string()),
        instructions: Some(format!("Prepare the {name}.\r\nServe warm.")),
        ..Default::default()
    };
    meal.extra.insert("strIngredient1".into(), Value::from("Butter"));
    meal.extra.insert("strMeasure1".into(), Value::from("25g"));
    meal.extra.insert("strIngredient2".into(), Value::from("Salt"));
    meal.extra.insert("strMeasure2".into(), Value::from(""));
    meal
}

/// The partial shape filter endpoints return
pub fn partial_meal(id: &str, name: &str) -> RawMeal {
    RawMeal {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        thumbnail: Some(format!("https://www.themealdb.com/images/media/meals/{id}.jpg")),
        ..Default::default()
    }
}

/// One scripted answer of the random endpoint
enum RandomDraw {
    /// Answer after yielding to the scheduler `yields` times
    Answer { meal: Option<RawMeal>, yields: usize },
    Failure,
}

/// Meal source answering from in-memory tables
///
/// Random draws come from a script first; once it is exhausted, fresh
/// meals `random-1`, `random-2`, ... are generated so the random feed
/// never runs dry.
#[derive(Default)]
pub struct ScriptedMealSource {
    meals: HashMap<String, RawMeal>,
    searches: HashMap<String, Vec<RawMeal>>,
    categories: Vec<RawCategory>,
    by_category: HashMap<String, Vec<RawMeal>>,
    by_ingredient: HashMap<String, Vec<RawMeal>>,
    failing_lookups: HashSet<String>,
    failing: AtomicBool,
    random_script: Mutex<VecDeque<RandomDraw>>,
    generated: AtomicUsize,
    random_calls: AtomicUsize,
    lookups: Mutex<Vec<String>>,
    lookups_in_flight: AtomicUsize,
    peak_lookups_in_flight: AtomicUsize,
    filters: Mutex<Vec<MealFilter>>,
}

impl ScriptedMealSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with a download error
    pub fn failing(self) -> Self {
        self.failing.store(true, Ordering::SeqCst);
        self
    }

    /// Toggle failure of every call after construction
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make a meal available to `lookup`
    pub fn with_meal(mut self, meal: RawMeal) -> Self {
        if let Some(id) = meal.meal_id() {
            self.meals.insert(id.to_string(), meal);
        }
        self
    }

    /// Answer `search(query)` with `meals` (case-insensitive)
    pub fn with_search(mut self, query: &str, meals: Vec<RawMeal>) -> Self {
        self.searches.insert(query.to_lowercase(), meals);
        self
    }

    /// Register a category whose filter answers with partial `meals`
    pub fn with_category(mut self, name: &str, meals: Vec<RawMeal>) -> Self {
        self.categories.push(RawCategory {
            id: Some((self.categories.len() + 1).to_string()),
            name: Some(name.to_string()),
            thumbnail: Some(format!(
                "https://www.themealdb.com/images/category/{}.png",
                name.to_lowercase()
            )),
            description: Some(format!("{name} dishes")),
        });
        self.by_category.insert(name.to_string(), meals);
        self
    }

    /// Register a category of `count` meals with ids `<name>-1..=<name>-count`,
    /// each also available to `lookup`
    pub fn with_category_size(mut self, name: &str, count: usize) -> Self {
        let mut partials = Vec::with_capacity(count);
        for i in 1..=count {
            let id = format!("{name}-{i}");
            let title = format!("{name} dish {i}");
            partials.push(partial_meal(&id, &title));
            self = self.with_meal(meal(&id, &title));
        }
        self.with_category(name, partials)
    }

    /// Answer the ingredient filter for `name` with partial `meals`
    pub fn with_ingredient(mut self, name: &str, meals: Vec<RawMeal>) -> Self {
        self.by_ingredient.insert(name.to_lowercase(), meals);
        self
    }

    /// `lookup(id)` fails
    pub fn with_failing_lookup(mut self, id: &str) -> Self {
        self.failing_lookups.insert(id.to_string());
        self
    }

    /// Queue a random answer, delivered after `yields` scheduler yields
    pub fn with_random_draw(self, meal: Option<RawMeal>, yields: usize) -> Self {
        locked(&self.random_script).push_back(RandomDraw::Answer { meal, yields });
        self
    }

    /// Queue a failing random call
    pub fn with_random_failure(self) -> Self {
        locked(&self.random_script).push_back(RandomDraw::Failure);
        self
    }

    /// Number of `random` calls so far
    pub fn random_calls(&self) -> usize {
        self.random_calls.load(Ordering::SeqCst)
    }

    /// Ids passed to `lookup`, in call order
    pub fn lookups(&self) -> Vec<String> {
        locked(&self.lookups).clone()
    }

    /// Highest number of `lookup` calls that were in flight together
    pub fn peak_lookups_in_flight(&self) -> usize {
        self.peak_lookups_in_flight.load(Ordering::SeqCst)
    }

    /// Filters requested so far
    pub fn filters(&self) -> Vec<MealFilter> {
        locked(&self.filters).clone()
    }

    fn check_failing(&self, what: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::DownloadError(format!("scripted failure: {what}")));
        }
        Ok(())
    }
}

#[async_trait]
impl MealSource for ScriptedMealSource {
    async fn search(&self, query: &str) -> Result<Vec<RawMeal>> {
        self.check_failing("search")?;
        Ok(self
            .searches
            .get(&query.to_lowercase())
            .cloned()
            .unwrap_or_default())
    }

    async fn lookup(&self, id: &str) -> Result<Vec<RawMeal>> {
        locked(&self.lookups).push(id.to_string());

        let in_flight = self.lookups_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_lookups_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.lookups_in_flight.fetch_sub(1, Ordering::SeqCst);

        self.check_failing("lookup")?;
        if self.failing_lookups.contains(id) {
            return Err(Error::DownloadError(format!("scripted lookup failure for {id}")));
        }
        Ok(self.meals.get(id).cloned().into_iter().collect())
    }

    async fn random(&self) -> Result<Vec<RawMeal>> {
        self.random_calls.fetch_add(1, Ordering::SeqCst);
        let draw = locked(&self.random_script).pop_front();
        self.check_failing("random")?;

        match draw {
            Some(RandomDraw::Answer { meal, yields }) => {
                for _ in 0..yields {
                    tokio::task::yield_now().await;
                }
                Ok(meal.into_iter().collect())
            }
            Some(RandomDraw::Failure) => {
                Err(Error::DownloadError("scripted random failure".to_string()))
            }
            None => {
                let n = self.generated.fetch_add(1, Ordering::SeqCst) + 1;
                let id = format!("random-{n}");
                Ok(vec![meal(&id, &format!("Random dish {n}"))])
            }
        }
    }

    async fn categories(&self) -> Result<Vec<RawCategory>> {
        self.check_failing("categories")?;
        Ok(self.categories.clone())
    }

    async fn filter(&self, filter: &MealFilter) -> Result<Vec<RawMeal>> {
        locked(&self.filters).push(filter.clone());
        self.check_failing("filter")?;

        let found = match filter {
            MealFilter::Category(name) => self.by_category.get(name),
            MealFilter::Ingredient(name) => self.by_ingredient.get(&name.to_lowercase()),
        };
        Ok(found.cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// A favorites row as the backend would return it
pub fn favorite(user_id: &str, recipe_id: i64, title: &str) -> FavoriteRecipe {
    FavoriteRecipe {
        recipe_id,
        user_id: user_id.to_string(),
        title: title.to_string(),
        image: format!("https://www.themealdb.com/images/media/meals/{recipe_id}.jpg"),
        cook_time: "30 minutes".to_string(),
        servings: Servings::Count(4),
        id: None,
    }
}

/// Favorites backend kept in memory
#[derive(Default)]
pub struct MemoryFavorites {
    rows: Mutex<Vec<FavoriteRecipe>>,
    created: Mutex<Vec<NewFavorite>>,
    deleted: Mutex<Vec<(String, i64)>>,
    purged: Mutex<Vec<String>>,
    list_calls: AtomicUsize,
    fail_list: AtomicBool,
    fail_create: AtomicBool,
    fail_delete: AtomicBool,
    fail_purge: AtomicBool,
}

impl MemoryFavorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_favorite(self, favorite: FavoriteRecipe) -> Self {
        locked(&self.rows).push(favorite);
        self
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    pub fn fail_purge(&self, fail: bool) {
        self.fail_purge.store(fail, Ordering::SeqCst);
    }

    /// Whether `user_id` currently has `recipe_id` saved
    pub fn contains(&self, user_id: &str, recipe_id: i64) -> bool {
        locked(&self.rows)
            .iter()
            .any(|row| row.user_id == user_id && row.recipe_id == recipe_id)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Accepted save requests
    pub fn created(&self) -> Vec<NewFavorite> {
        locked(&self.created).clone()
    }

    /// Accepted delete requests
    pub fn deleted(&self) -> Vec<(String, i64)> {
        locked(&self.deleted).clone()
    }

    /// Users whose data was purged
    pub fn purged_users(&self) -> Vec<String> {
        locked(&self.purged).clone()
    }

    fn check(flag: &AtomicBool, status: u16, message: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(Error::Backend {
                status: Some(status),
                message: message.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl FavoritesBackend for MemoryFavorites {
    async fn list(&self, user_id: &str) -> Result<Vec<FavoriteRecipe>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_list, 500, "Failed to fetch favorites")?;
        Ok(locked(&self.rows)
            .iter()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create(&self, favorite: &NewFavorite) -> Result<()> {
        Self::check(&self.fail_create, 500, "Failed to save recipe")?;
        locked(&self.created).push(favorite.clone());
        locked(&self.rows).push(FavoriteRecipe {
            recipe_id: favorite.recipe_id,
            user_id: favorite.user_id.clone(),
            title: favorite.title.clone(),
            image: favorite.image.clone(),
            cook_time: favorite.cook_time.clone(),
            servings: Servings::Count(i64::from(favorite.servings)),
            id: None,
        });
        Ok(())
    }

    async fn delete(&self, user_id: &str, recipe_id: i64) -> Result<()> {
        Self::check(&self.fail_delete, 500, "Failed to remove recipe")?;
        locked(&self.deleted).push((user_id.to_string(), recipe_id));
        locked(&self.rows).retain(|row| !(row.user_id == user_id && row.recipe_id == recipe_id));
        Ok(())
    }

    async fn purge_user(&self, user_id: &str) -> Result<()> {
        Self::check(&self.fail_purge, 500, "Failed to delete user data")?;
        locked(&self.purged).push(user_id.to_string());
        locked(&self.rows).retain(|row| row.user_id != user_id);
        Ok(())
    }
}

/// Identity provider with a scripted session
#[derive(Default)]
pub struct FakeIdentity {
    user_id: Mutex<Option<String>>,
    fail_deletion: bool,
    deletions: AtomicUsize,
    sign_outs: AtomicUsize,
}

impl FakeIdentity {
    pub fn signed_in(user_id: &str) -> Self {
        Self {
            user_id: Mutex::new(Some(user_id.to_string())),
            ..Default::default()
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    /// `delete_account` fails
    pub fn failing_deletion(mut self) -> Self {
        self.fail_deletion = true;
        self
    }

    /// Successful `delete_account` calls
    pub fn deletions(&self) -> usize {
        self.deletions.load(Ordering::SeqCst)
    }

    pub fn sign_outs(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    fn is_signed_in(&self) -> bool {
        locked(&self.user_id).is_some()
    }

    fn current_user_id(&self) -> Option<String> {
        locked(&self.user_id).clone()
    }

    async fn sign_out(&self) -> Result<()> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        *locked(&self.user_id) = None;
        Ok(())
    }

    async fn delete_account(&self) -> Result<()> {
        if self.fail_deletion {
            return Err(Error::Identity("scripted deletion failure".to_string()));
        }
        self.deletions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Surface that records prompts and alerts
#[derive(Default)]
pub struct RecordingSurface {
    sign_in_prompts: AtomicUsize,
    alerts: Mutex<Vec<(String, String)>>,
}

impl RecordingSurface {
    pub fn sign_in_prompts(&self) -> usize {
        self.sign_in_prompts.load(Ordering::SeqCst)
    }

    /// `(title, message)` of every alert shown
    pub fn alerts(&self) -> Vec<(String, String)> {
        locked(&self.alerts).clone()
    }
}

impl Surface for RecordingSurface {
    fn present_sign_in(&self) {
        self.sign_in_prompts.fetch_add(1, Ordering::SeqCst);
    }

    fn alert(&self, title: &str, message: &str) {
        locked(&self.alerts).push((title.to_string(), message.to_string()));
    }
}
