// src/mealdb/source.rs
//! Meal source trait and the HTTP implementation
//!
//! A `MealSource` performs the raw, fallible calls against the meal API.
//! Errors are returned as-is; the swallow-and-log policy lives one layer up
//! in [`super::MealApi`].

use super::raw::{RawCategory, RawMeal};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default timeout for HTTP requests (30 seconds)
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Public base URL of TheMealDB's free JSON API
pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Filter endpoints offered by the meal API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MealFilter {
    /// Meals in a category (`filter.php?c=`)
    Category(String),
    /// Meals using a main ingredient (`filter.php?i=`)
    Ingredient(String),
}

impl MealFilter {
    fn query_pair(&self) -> (&'static str, &str) {
        match self {
            MealFilter::Category(name) => ("c", name),
            MealFilter::Ingredient(name) => ("i", name),
        }
    }
}

/// Trait for the raw meal API calls
#[async_trait]
pub trait MealSource: Send + Sync {
    /// Search meals by (partial) name
    async fn search(&self, query: &str) -> Result<Vec<RawMeal>>;

    /// Look up full meal details by id; upstream answers with zero or one record
    async fn lookup(&self, id: &str) -> Result<Vec<RawMeal>>;

    /// A single random meal (as a zero-or-one element list)
    async fn random(&self) -> Result<Vec<RawMeal>>;

    /// All meal categories
    async fn categories(&self) -> Result<Vec<RawCategory>>;

    /// Partial meal records matching a filter
    async fn filter(&self, filter: &MealFilter) -> Result<Vec<RawMeal>>;

    /// Human-readable name for this source (for logging)
    fn name(&self) -> &str;
}

#[derive(Deserialize)]
struct MealsEnvelope {
    #[serde(default)]
    meals: Option<Vec<RawMeal>>,
}

#[derive(Deserialize)]
struct CategoriesEnvelope {
    #[serde(default)]
    categories: Option<Vec<RawCategory>>,
}

/// Decode a `{ "meals": [...] | null }` body; null or missing means empty
pub fn decode_meals(body: &str) -> Result<Vec<RawMeal>> {
    let envelope: MealsEnvelope = serde_json::from_str(body)
        .map_err(|e| Error::ParseError(format!("Failed to parse meals response: {e}")))?;
    Ok(envelope.meals.unwrap_or_default())
}

/// Decode a `{ "categories": [...] | null }` body; null or missing means empty
pub fn decode_categories(body: &str) -> Result<Vec<RawCategory>> {
    let envelope: CategoriesEnvelope = serde_json::from_str(body)
        .map_err(|e| Error::ParseError(format!("Failed to parse categories response: {e}")))?;
    Ok(envelope.categories.unwrap_or_default())
}

/// HTTP meal source using reqwest
pub struct HttpMealSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMealSource {
    /// Create a source against `base_url` with the default timeout
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, HTTP_TIMEOUT)
    }

    /// Create with a custom request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        url::Url::parse(base_url)
            .map_err(|e| Error::InitError(format!("Invalid meal API URL '{}': {}", base_url, e)))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build an endpoint URL, percent-encoding the query value
    fn endpoint(&self, path: &str, query: Option<(&str, &str)>) -> String {
        match query {
            Some((key, value)) => format!(
                "{}/{}?{}={}",
                self.base_url,
                path,
                key,
                urlencoding::encode(value)
            ),
            None => format!("{}/{}", self.base_url, path),
        }
    }

    async fn get_body(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::DownloadError(format!("Failed to fetch {}: {e}", url)))?;

        if !response.status().is_success() {
            return Err(Error::DownloadError(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::DownloadError(format!("Failed to read response from {}: {e}", url)))
    }

    async fn get_meals(&self, url: &str) -> Result<Vec<RawMeal>> {
        decode_meals(&self.get_body(url).await?)
    }
}

#[async_trait]
impl MealSource for HttpMealSource {
    async fn search(&self, query: &str) -> Result<Vec<RawMeal>> {
        let url = self.endpoint("search.php", Some(("s", query)));
        self.get_meals(&url).await
    }

    async fn lookup(&self, id: &str) -> Result<Vec<RawMeal>> {
        let url = self.endpoint("lookup.php", Some(("i", id)));
        self.get_meals(&url).await
    }

    async fn random(&self) -> Result<Vec<RawMeal>> {
        let url = self.endpoint("random.php", None);
        self.get_meals(&url).await
    }

    async fn categories(&self) -> Result<Vec<RawCategory>> {
        let url = self.endpoint("categories.php", None);
        decode_categories(&self.get_body(&url).await?)
    }

    async fn filter(&self, filter: &MealFilter) -> Result<Vec<RawMeal>> {
        let url = self.endpoint("filter.php", Some(filter.query_pair()));
        self.get_meals(&url).await
    }

    fn name(&self) -> &str {
        "http"
    }
}
