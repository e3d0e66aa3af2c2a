// src/favorites/controller.rs
//! Favorites screen controller

use super::{FavoriteRecipe, FavoritesBackend};
use crate::error::{Error, Result};
use crate::session::AuthGate;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{error, info, warn};

/// View state of the favorites screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoritesState {
    pub favorites: Vec<FavoriteRecipe>,
    pub loading: bool,
    pub refreshing: bool,
}

/// Loads saved recipes and runs account-level actions
pub struct FavoritesController {
    backend: Arc<dyn FavoritesBackend>,
    gate: AuthGate,
    state: Mutex<FavoritesState>,
}

impl FavoritesController {
    pub fn new(backend: Arc<dyn FavoritesBackend>, gate: AuthGate) -> Self {
        Self {
            backend,
            gate,
            state: Mutex::new(FavoritesState::default()),
        }
    }

    fn state_mut(&self) -> MutexGuard<'_, FavoritesState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current view state
    pub fn state(&self) -> FavoritesState {
        self.state_mut().clone()
    }

    /// Current favorites list
    pub fn favorites(&self) -> Vec<FavoriteRecipe> {
        self.state_mut().favorites.clone()
    }

    /// Fetch the signed-in user's favorites and replace the list
    ///
    /// On failure the user is alerted and the previous list is kept.
    pub async fn load_favorites(&self) -> Result<()> {
        let user_id = self
            .gate
            .identity()
            .current_user_id()
            .ok_or(Error::NotSignedIn)?;

        self.state_mut().loading = true;
        let result = self.backend.list(&user_id).await;
        let mut state = self.state_mut();
        state.loading = false;

        match result {
            Ok(favorites) => {
                info!("Loaded {} favorites", favorites.len());
                state.favorites = favorites
                    .into_iter()
                    .map(FavoriteRecipe::for_display)
                    .collect();
                Ok(())
            }
            Err(e) => {
                drop(state);
                error!("Error loading favorites: {}", e);
                self.gate.surface().alert("Error", "Failed to load favorites");
                Err(e)
            }
        }
    }

    /// Pull-to-refresh: reload with the `refreshing` flag set
    pub async fn refresh(&self) -> Result<()> {
        self.state_mut().refreshing = true;
        let result = self.load_favorites().await;
        self.state_mut().refreshing = false;
        result
    }

    /// End the session and drop the local list
    pub async fn sign_out(&self) -> Result<()> {
        self.gate.identity().sign_out().await?;
        self.state_mut().favorites.clear();
        Ok(())
    }

    /// Delete the account: identity first, backend data best-effort, then sign out
    ///
    /// Only an identity-provider failure is reported to the user; nothing
    /// else is attempted in that case. Once the identity record is gone the
    /// user can never re-authenticate, so backend cleanup failures are only
    /// logged.
    pub async fn delete_account(&self) -> Result<()> {
        let identity = self.gate.identity();
        let user_id = identity.current_user_id().ok_or(Error::NotSignedIn)?;

        if let Err(e) = identity.delete_account().await {
            error!("Identity provider deletion failed: {}", e);
            self.gate.surface().alert(
                "Deletion Failed",
                "We could not delete your account. Please try again or contact support.",
            );
            return Err(e);
        }
        info!("Deleted identity record for {}", user_id);

        if let Err(e) = self.backend.purge_user(&user_id).await {
            warn!("Backend deletion failed, but identity record was removed: {}", e);
        }

        if let Err(e) = identity.sign_out().await {
            warn!("Sign out after account deletion failed: {}", e);
        }

        self.state_mut().favorites.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::Servings;
    use crate::session::IdentityProvider;
    use crate::testing::{FakeIdentity, MemoryFavorites, RecordingSurface, favorite};

    struct Harness {
        controller: FavoritesController,
        backend: Arc<MemoryFavorites>,
        identity: Arc<FakeIdentity>,
        surface: Arc<RecordingSurface>,
    }

    fn harness(identity: FakeIdentity, backend: MemoryFavorites) -> Harness {
        let backend = Arc::new(backend);
        let identity = Arc::new(identity);
        let surface = Arc::new(RecordingSurface::default());
        let gate = AuthGate::new(identity.clone(), surface.clone());
        Harness {
            controller: FavoritesController::new(backend.clone(), gate),
            backend,
            identity,
            surface,
        }
    }

    #[tokio::test]
    async fn test_load_maps_recipe_id_to_display_id() {
        let backend = MemoryFavorites::new()
            .with_favorite(favorite("user_1", 52772, "Teriyaki Chicken"))
            .with_favorite(favorite("user_1", 52959, "Baked Salmon"))
            .with_favorite(favorite("user_2", 1, "Someone else's"));
        let h = harness(FakeIdentity::signed_in("user_1"), backend);

        h.controller.load_favorites().await.unwrap();

        let favorites = h.controller.favorites();
        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites[0].id, Some(52772));
        assert_eq!(favorites[1].id, Some(52959));
        assert!(!h.controller.state().loading);
    }

    #[tokio::test]
    async fn test_load_failure_alerts_and_keeps_list() {
        let backend = MemoryFavorites::new().with_favorite(favorite("user_1", 52772, "Teriyaki"));
        let h = harness(FakeIdentity::signed_in("user_1"), backend);
        h.controller.load_favorites().await.unwrap();

        h.backend.fail_list(true);
        assert!(h.controller.refresh().await.is_err());

        assert_eq!(h.controller.favorites().len(), 1);
        assert_eq!(
            h.surface.alerts(),
            vec![("Error".to_string(), "Failed to load favorites".to_string())]
        );
        assert!(!h.controller.state().refreshing);
    }

    #[tokio::test]
    async fn test_load_requires_user() {
        let h = harness(FakeIdentity::signed_out(), MemoryFavorites::new());
        assert!(matches!(
            h.controller.load_favorites().await,
            Err(Error::NotSignedIn)
        ));
        assert_eq!(h.backend.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_text_servings_normalized_on_load() {
        let mut row = favorite("user_1", 3, "Soup");
        row.servings = Servings::Text("6".to_string());
        let h = harness(FakeIdentity::signed_in("user_1"), MemoryFavorites::new().with_favorite(row));

        h.controller.load_favorites().await.unwrap();
        assert_eq!(h.controller.favorites()[0].servings, Servings::Count(6));
    }

    #[tokio::test]
    async fn test_delete_account_purges_and_signs_out() {
        let backend = MemoryFavorites::new().with_favorite(favorite("user_1", 52772, "Teriyaki"));
        let h = harness(FakeIdentity::signed_in("user_1"), backend);
        h.controller.load_favorites().await.unwrap();

        h.controller.delete_account().await.unwrap();

        assert_eq!(h.identity.deletions(), 1);
        assert_eq!(h.backend.purged_users(), vec!["user_1".to_string()]);
        assert!(!h.identity.is_signed_in());
        assert!(h.controller.favorites().is_empty());
        assert!(h.surface.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_identity_failure_stops_deletion() {
        let h = harness(
            FakeIdentity::signed_in("user_1").failing_deletion(),
            MemoryFavorites::new(),
        );

        assert!(h.controller.delete_account().await.is_err());

        assert!(h.backend.purged_users().is_empty());
        assert!(h.identity.is_signed_in());
        assert_eq!(h.identity.sign_outs(), 0);
        assert_eq!(h.surface.alerts()[0].0, "Deletion Failed");
    }

    #[tokio::test]
    async fn test_backend_purge_failure_is_not_surfaced() {
        let backend = MemoryFavorites::new();
        backend.fail_purge(true);
        let h = harness(FakeIdentity::signed_in("user_1"), backend);

        h.controller.delete_account().await.unwrap();

        assert!(h.surface.alerts().is_empty());
        assert!(!h.identity.is_signed_in());
    }

    #[tokio::test]
    async fn test_sign_out_clears_list() {
        let backend = MemoryFavorites::new().with_favorite(favorite("user_1", 1, "Pie"));
        let h = harness(FakeIdentity::signed_in("user_1"), backend);
        h.controller.load_favorites().await.unwrap();

        h.controller.sign_out().await.unwrap();
        assert!(h.controller.favorites().is_empty());
        assert_eq!(h.identity.sign_outs(), 1);
    }
}
