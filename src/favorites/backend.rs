// src/favorites/backend.rs
//! Favorites backend trait and the REST implementation

use super::{FavoriteRecipe, NewFavorite};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Response;
use std::time::Duration;
use tracing::debug;

/// Default timeout for backend requests (30 seconds)
pub const BACKEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for the favorites REST collection
#[async_trait]
pub trait FavoritesBackend: Send + Sync {
    /// All favorites saved by `user_id`
    async fn list(&self, user_id: &str) -> Result<Vec<FavoriteRecipe>>;

    /// Save a recipe snapshot
    async fn create(&self, favorite: &NewFavorite) -> Result<()>;

    /// Remove a favorite by its `(user_id, recipe_id)` key
    async fn delete(&self, user_id: &str, recipe_id: i64) -> Result<()>;

    /// Purge everything stored for `user_id`
    async fn purge_user(&self, user_id: &str) -> Result<()>;
}

/// Favorites backend over HTTP
///
/// - `GET    /favorites/{userId}`
/// - `POST   /favorites`
/// - `DELETE /favorites/{userId}/{recipeId}`
/// - `DELETE /users/{userId}`
pub struct HttpFavoritesBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFavoritesBackend {
    /// Create a backend client with the default timeout
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, BACKEND_TIMEOUT)
    }

    /// Create with a custom request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        url::Url::parse(base_url).map_err(|e| {
            Error::InitError(format!("Invalid favorites API URL '{}': {}", base_url, e))
        })?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    /// Map transport errors and non-success statuses to `Error::Backend`
    fn check(
        result: std::result::Result<Response, reqwest::Error>,
        action: &str,
    ) -> Result<Response> {
        let response =
            result.map_err(|e| Error::backend(format!("Failed to {action}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Backend {
                status: Some(status.as_u16()),
                message: format!("Failed to {action}"),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl FavoritesBackend for HttpFavoritesBackend {
    async fn list(&self, user_id: &str) -> Result<Vec<FavoriteRecipe>> {
        let url = self.url(&["favorites", user_id]);
        debug!("GET {}", url);

        let response = Self::check(self.client.get(&url).send().await, "fetch favorites")?;
        response
            .json()
            .await
            .map_err(|e| Error::ParseError(format!("Failed to parse favorites: {e}")))
    }

    async fn create(&self, favorite: &NewFavorite) -> Result<()> {
        let url = self.url(&["favorites"]);
        debug!("POST {} (recipe {})", url, favorite.recipe_id);

        Self::check(
            self.client.post(&url).json(favorite).send().await,
            "save recipe",
        )?;
        Ok(())
    }

    async fn delete(&self, user_id: &str, recipe_id: i64) -> Result<()> {
        let recipe_id = recipe_id.to_string();
        let url = self.url(&["favorites", user_id, recipe_id.as_str()]);
        debug!("DELETE {}", url);

        Self::check(self.client.delete(&url).send().await, "remove recipe")?;
        Ok(())
    }

    async fn purge_user(&self, user_id: &str) -> Result<()> {
        let url = self.url(&["users", user_id]);
        debug!("DELETE {}", url);

        Self::check(self.client.delete(&url).send().await, "delete user data")?;
        Ok(())
    }
}
