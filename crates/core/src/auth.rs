//! Authorization gate for the generation service.
//!
//! The controller asks the gate at startup and before every generation
//! request, and forwards the user's explicit "select key" request to
//! [`AuthorizationGate::grant_access`].

use crate::config::api_key_from_env;
use futures::future::BoxFuture;

pub trait AuthorizationGate: Send + Sync {
    /// Whether the generation service is currently usable.
    fn has_access(&self) -> BoxFuture<'_, bool>;

    /// Lets the user provide or select access, e.g. by picking a key.
    fn grant_access(&self) -> BoxFuture<'_, ()>;
}

/// Grants access when a Gemini API key is available.
///
/// An explicit key always counts; otherwise `GEMINI_API_KEY` is consulted on
/// every check so a key exported after startup is picked up.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyGate {
    explicit_key: Option<String>,
}

impl ApiKeyGate {
    pub fn new(explicit_key: Option<String>) -> Self {
        Self {
            explicit_key: explicit_key.filter(|key| !key.trim().is_empty()),
        }
    }

    fn key_available(&self) -> bool {
        self.explicit_key.is_some() || api_key_from_env().is_some()
    }
}

impl AuthorizationGate for ApiKeyGate {
    fn has_access(&self) -> BoxFuture<'_, bool> {
        Box::pin(async move { self.key_available() })
    }

    fn grant_access(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            // Re-read .env so a key written there while running is visible
            if let Err(e) = dotenvy::dotenv() {
                tracing::debug!(event = "core.auth.dotenv_unavailable", error = %e);
            }
            tracing::info!(event = "core.auth.grant_requested", key_available = self.key_available());
        })
    }
}

/// A gate that is always open, for environments without a real gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAuthorized;

impl AuthorizationGate for AlwaysAuthorized {
    fn has_access(&self) -> BoxFuture<'_, bool> {
        Box::pin(async { true })
    }

    fn grant_access(&self) -> BoxFuture<'_, ()> {
        Box::pin(async {})
    }
}
