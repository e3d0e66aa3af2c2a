// src/mealdb/api.rs
//! Best-effort meal API facade
//!
//! Every call catches transport and decode failures, logs them, and reports
//! the outcome as a [`Fetched`] value. Callers that only care about the
//! displayable result use [`Fetched::into_value`], which collapses a failure
//! into the empty or absent value.

use super::raw::{RawCategory, RawMeal};
use super::source::{MealFilter, MealSource};
use crate::error::Result;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error};

/// Outcome of a best-effort fetch
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Fetched<T> {
    /// Upstream answered; the value may still be empty or absent
    Ok(T),
    /// Transport or decode failure (already logged)
    Failed,
}

impl<T> Fetched<T> {
    /// Whether the fetch failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Fetched::Failed)
    }

    /// The answered value, or `None` on failure
    pub fn ok(self) -> Option<T> {
        match self {
            Fetched::Ok(value) => Some(value),
            Fetched::Failed => None,
        }
    }

    fn from_result(result: Result<T>, context: std::fmt::Arguments<'_>) -> Self {
        match result {
            Ok(value) => Fetched::Ok(value),
            Err(e) => {
                error!("Error {}: {}", context, e);
                Fetched::Failed
            }
        }
    }
}

impl<T: Default> Fetched<T> {
    /// The answered value, with failures collapsed to `T::default()`
    pub fn into_value(self) -> T {
        self.ok().unwrap_or_default()
    }
}

/// Swallow-and-log wrapper around a [`MealSource`]
#[derive(Clone)]
pub struct MealApi {
    source: Arc<dyn MealSource>,
}

impl MealApi {
    /// Wrap a meal source
    pub fn new(source: Arc<dyn MealSource>) -> Self {
        Self { source }
    }

    /// Search meals by name
    pub async fn search_by_name(&self, query: &str) -> Fetched<Vec<RawMeal>> {
        Fetched::from_result(
            self.source.search(query).await,
            format_args!("searching meals by name '{}'", query),
        )
    }

    /// Full meal details by id (first match)
    pub async fn get_by_id(&self, id: &str) -> Fetched<Option<RawMeal>> {
        let result = self.source.lookup(id).await.map(first);
        Fetched::from_result(result, format_args!("getting meal by id {}", id))
    }

    /// One random meal
    pub async fn get_random(&self) -> Fetched<Option<RawMeal>> {
        let result = self.source.random().await.map(first);
        Fetched::from_result(result, format_args!("getting random meal"))
    }

    /// `count` random meals fetched concurrently
    ///
    /// Failed or empty draws are dropped, so the result may be shorter than
    /// `count`. Survivors keep the order in which their requests were issued.
    pub async fn get_random_batch(&self, count: usize) -> Vec<RawMeal> {
        let draws = join_all((0..count).map(|_| self.get_random())).await;
        let meals: Vec<RawMeal> = draws.into_iter().filter_map(Fetched::into_value).collect();

        debug!("Random batch: {}/{} meals from {}", meals.len(), count, self.source.name());
        meals
    }

    /// Full details for `ids`, at most `batch_size` requests in flight
    ///
    /// Sub-batches run sequentially; ids that fail or are unknown are
    /// dropped, the rest keep their position in `ids`.
    pub async fn get_many_by_id(&self, ids: &[String], batch_size: usize) -> Vec<RawMeal> {
        let mut meals = Vec::with_capacity(ids.len());

        for batch in ids.chunks(batch_size.max(1)) {
            let results = join_all(batch.iter().map(|id| self.get_by_id(id))).await;
            meals.extend(results.into_iter().filter_map(Fetched::into_value));
        }

        debug!("Fetched details for {}/{} meals", meals.len(), ids.len());
        meals
    }

    /// All meal categories
    pub async fn list_categories(&self) -> Fetched<Vec<RawCategory>> {
        Fetched::from_result(
            self.source.categories().await,
            format_args!("getting categories"),
        )
    }

    /// Partial records of meals in a category
    pub async fn filter_by_category(&self, category: &str) -> Fetched<Vec<RawMeal>> {
        let filter = MealFilter::Category(category.to_string());
        Fetched::from_result(
            self.source.filter(&filter).await,
            format_args!("filtering by category '{}'", category),
        )
    }

    /// Partial records of meals using a main ingredient
    pub async fn filter_by_ingredient(&self, ingredient: &str) -> Fetched<Vec<RawMeal>> {
        let filter = MealFilter::Ingredient(ingredient.to_string());
        Fetched::from_result(
            self.source.filter(&filter).await,
            format_args!("filtering by ingredient '{}'", ingredient),
        )
    }
}

fn first(meals: Vec<RawMeal>) -> Option<RawMeal> {
    meals.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedMealSource, meal};

    fn facade(source: ScriptedMealSource) -> (MealApi, Arc<ScriptedMealSource>) {
        let source = Arc::new(source);
        (MealApi::new(source.clone()), source)
    }

    #[tokio::test]
    async fn test_search_failure_is_distinguishable() {
        let (api, _) = facade(ScriptedMealSource::new().with_search("pie", vec![meal("1", "Apple Pie")]));

        let found = api.search_by_name("pie").await;
        assert_eq!(found.clone().into_value().len(), 1);
        assert!(!found.is_failed());

        let (api, _) = api_failing();
        let failed = api.search_by_name("pie").await;
        assert!(failed.is_failed());
        assert!(failed.into_value().is_empty());
    }

    fn api_failing() -> (MealApi, Arc<ScriptedMealSource>) {
        facade(ScriptedMealSource::new().failing())
    }

    #[tokio::test]
    async fn test_empty_answer_is_not_failure() {
        let (api, _) = facade(ScriptedMealSource::new());

        let result = api.search_by_name("zzz").await;
        assert_eq!(result, Fetched::Ok(Vec::new()));
    }

    #[tokio::test]
    async fn test_get_by_id_takes_first_match() {
        let (api, _) = facade(ScriptedMealSource::new().with_meal(meal("52772", "Teriyaki Chicken")));

        let found = api.get_by_id("52772").await.into_value();
        assert_eq!(found.unwrap().name.as_deref(), Some("Teriyaki Chicken"));

        assert_eq!(api.get_by_id("1").await, Fetched::Ok(None));
    }

    #[tokio::test]
    async fn test_random_batch_drops_failures_in_issue_order() {
        // Later draws finish first; output must still follow issue order.
        let source = ScriptedMealSource::new()
            .with_random_draw(Some(meal("a", "A")), 4)
            .with_random_failure()
            .with_random_draw(Some(meal("c", "C")), 2)
            .with_random_failure()
            .with_random_draw(Some(meal("e", "E")), 0);
        let (api, source) = facade(source);

        let batch = api.get_random_batch(5).await;
        let ids: Vec<_> = batch.iter().filter_map(RawMeal::meal_id).collect();

        assert_eq!(ids, vec!["a", "c", "e"]);
        assert_eq!(source.random_calls(), 5);
    }

    #[tokio::test]
    async fn test_random_batch_drops_empty_answers() {
        let source = ScriptedMealSource::new()
            .with_random_draw(None, 0)
            .with_random_draw(Some(meal("b", "B")), 0);
        let (api, _) = facade(source);

        let batch = api.get_random_batch(2).await;
        assert_eq!(batch.len(), 1);
    }

    #[tokio::test]
    async fn test_get_many_by_id_caps_concurrency() {
        let mut source = ScriptedMealSource::new();
        let ids: Vec<String> = (1..=12).map(|i| i.to_string()).collect();
        for id in &ids {
            source = source.with_meal(meal(id, &format!("Meal {id}")));
        }
        let source = source.with_failing_lookup("4");
        let (api, source) = facade(source);

        let meals = api.get_many_by_id(&ids, 5).await;

        assert_eq!(meals.len(), 11);
        assert_eq!(meals[3].meal_id(), Some("5"));
        assert_eq!(source.peak_lookups_in_flight(), 5);
        assert_eq!(source.lookups().len(), 12);
    }

    #[tokio::test]
    async fn test_filters_and_categories() {
        let source = ScriptedMealSource::new()
            .with_category("Seafood", vec![meal("52959", "Baked salmon")])
            .with_ingredient("garlic", vec![meal("1", "Garlic Bread"), meal("2", "Aioli")]);
        let (api, _) = facade(source);

        assert_eq!(api.filter_by_category("Seafood").await.into_value().len(), 1);
        assert_eq!(api.filter_by_ingredient("garlic").await.into_value().len(), 2);
        assert!(api.filter_by_category("Vegan").await.into_value().is_empty());

        let categories = api.list_categories().await.into_value();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name.as_deref(), Some("Seafood"));
    }
}
