// src/session/gate.rs
//! Auth gate for protected actions

use super::{IdentityProvider, Surface};
use std::sync::Arc;
use tracing::debug;

/// Intercepts protected actions for signed-out users
///
/// Instead of failing silently, a denied action presents the sign-in
/// prompt. Callers must treat the returned flag as the authorization
/// decision and skip the guarded action when it is `false`.
#[derive(Clone)]
pub struct AuthGate {
    identity: Arc<dyn IdentityProvider>,
    surface: Arc<dyn Surface>,
}

impl AuthGate {
    pub fn new(identity: Arc<dyn IdentityProvider>, surface: Arc<dyn Surface>) -> Self {
        Self { identity, surface }
    }

    /// Run `callback` if signed in; otherwise present the sign-in prompt
    ///
    /// Presents exactly one prompt per denied call and never runs the
    /// callback when denied.
    pub fn require_auth<F>(&self, callback: Option<F>) -> bool
    where
        F: FnOnce(),
    {
        if self.identity.is_signed_in() {
            if let Some(callback) = callback {
                callback();
            }
            return true;
        }

        debug!("Protected action requested without a session, prompting sign-in");
        self.surface.present_sign_in();
        false
    }

    /// Gate check with no callback
    pub fn check(&self) -> bool {
        self.require_auth(None::<fn()>)
    }

    /// The identity provider behind this gate
    pub fn identity(&self) -> &Arc<dyn IdentityProvider> {
        &self.identity
    }

    /// The presentation surface behind this gate
    pub fn surface(&self) -> &Arc<dyn Surface> {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeIdentity, RecordingSurface};
    use std::cell::Cell;

    fn gate(identity: FakeIdentity) -> (AuthGate, Arc<RecordingSurface>) {
        let surface = Arc::new(RecordingSurface::default());
        (AuthGate::new(Arc::new(identity), surface.clone()), surface)
    }

    #[test]
    fn test_signed_out_denies_and_prompts_once_per_call() {
        let (gate, surface) = gate(FakeIdentity::signed_out());
        let called = Cell::new(false);

        assert!(!gate.require_auth(Some(|| called.set(true))));
        assert!(!called.get());
        assert_eq!(surface.sign_in_prompts(), 1);

        assert!(!gate.check());
        assert_eq!(surface.sign_in_prompts(), 2);
    }

    #[test]
    fn test_signed_in_runs_callback() {
        let (gate, surface) = gate(FakeIdentity::signed_in("user_2abc"));
        let called = Cell::new(0);

        assert!(gate.require_auth(Some(|| called.set(called.get() + 1))));
        assert_eq!(called.get(), 1);
        assert!(gate.check());
        assert_eq!(surface.sign_in_prompts(), 0);
    }
}
