// src/session/mod.rs
//! Session boundary and the auth gate
//!
//! Identity (sign-in, sign-up, code verification, token storage) belongs
//! to an external provider. The core only sees it through
//! [`IdentityProvider`], and only presents UI through [`Surface`]. Both are
//! injected into the controllers; nothing here is process-global.

mod gate;
mod local;

pub use gate::AuthGate;
pub use local::{LocalSession, LogSurface};

use crate::error::Result;
use async_trait::async_trait;

/// What the core needs from the identity provider
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Whether a session is currently authenticated
    fn is_signed_in(&self) -> bool;

    /// The signed-in user's id
    fn current_user_id(&self) -> Option<String>;

    /// End the local session
    async fn sign_out(&self) -> Result<()>;

    /// Permanently delete the user's identity record
    async fn delete_account(&self) -> Result<()>;
}

/// Presentation side effects the core may trigger
pub trait Surface: Send + Sync {
    /// Show the sign-in / create-account prompt
    fn present_sign_in(&self);

    /// Show a blocking alert to the user
    fn alert(&self, title: &str, message: &str);
}
