// src/session/local.rs
//! In-process session and log-backed surface for the CLI

use super::{IdentityProvider, Surface};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::sync::{PoisonError, RwLock};
use tracing::{info, warn};

/// A session configured locally instead of issued by an identity provider
///
/// Used by the CLI, where the user id comes from the config file. The
/// identity record is not owned by this process, so it cannot be deleted.
#[derive(Debug, Default)]
pub struct LocalSession {
    user_id: RwLock<Option<String>>,
}

impl LocalSession {
    pub fn new(user_id: Option<String>) -> Self {
        Self {
            user_id: RwLock::new(user_id.filter(|id| !id.trim().is_empty())),
        }
    }
}

#[async_trait]
impl IdentityProvider for LocalSession {
    fn is_signed_in(&self) -> bool {
        self.current_user_id().is_some()
    }

    fn current_user_id(&self) -> Option<String> {
        self.user_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn sign_out(&self) -> Result<()> {
        *self.user_id.write().unwrap_or_else(PoisonError::into_inner) = None;
        info!("Signed out of local session");
        Ok(())
    }

    async fn delete_account(&self) -> Result<()> {
        Err(Error::Unsupported(
            "local sessions cannot delete identity records".to_string(),
        ))
    }
}

/// Surface that reports prompts and alerts through the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSurface;

impl Surface for LogSurface {
    fn present_sign_in(&self) {
        warn!("Sign in required: set [session] user_id in the config file");
    }

    fn alert(&self, title: &str, message: &str) {
        warn!("{}: {}", title, message);
    }
}
