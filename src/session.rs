//! Session finalization: token caching and sign-in events

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};

use crate::error::{Result, SignInError};
use crate::provider::{AuthenticationResult, NewDeviceMetadata};

/// Completes a sign-in once the identity provider has issued tokens
#[async_trait]
pub trait SessionFinalizer: Send + Sync {
    async fn finalize(&self, username: &str, result: &AuthenticationResult) -> Result<()>;
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedTokens {
    pub username: String,
    pub access_token: String,
    pub id_token: Option<String>,
    pub refresh_token: Option<String>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub device_metadata: Option<NewDeviceMetadata>,
}

impl CachedTokens {
    /// Check if the access token is still valid
    pub fn is_valid(&self) -> bool {
        self.expires_at.map(|at| Utc::now() < at).unwrap_or(true)
    }
}

impl std::fmt::Debug for CachedTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedTokens")
            .field("username", &self.username)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn { username: String, at: DateTime<Utc> },
}

/// In-memory token cache that announces completed sign-ins
pub struct TokenCache {
    tokens: RwLock<HashMap<String, CachedTokens>>,
    events: broadcast::Sender<AuthEvent>,
}

impl TokenCache {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            tokens: RwLock::new(HashMap::new()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    pub async fn get(&self, username: &str) -> Option<CachedTokens> {
        self.tokens.read().await.get(username).cloned()
    }

    pub async fn clear(&self, username: &str) {
        self.tokens.write().await.remove(username);
    }

    /// Drop entries whose access token has expired
    pub async fn cleanup_expired(&self) {
        self.tokens.write().await.retain(|_, tokens| tokens.is_valid());
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionFinalizer for TokenCache {
    async fn finalize(&self, username: &str, result: &AuthenticationResult) -> Result<()> {
        let access_token = result
            .access_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or(SignInError::IncompleteAuthentication)?;

        let now = Utc::now();
        let tokens = CachedTokens {
            username: username.to_string(),
            access_token,
            id_token: result.id_token.clone(),
            refresh_token: result.refresh_token.clone(),
            issued_at: now,
            expires_at: result
                .expires_in
                .and_then(Duration::try_seconds)
                .and_then(|ttl| now.checked_add_signed(ttl)),
            device_metadata: result.new_device_metadata.clone(),
        };

        self.tokens.write().await.insert(username.to_string(), tokens);

        // No subscribers is fine
        let _ = self.events.send(AuthEvent::SignedIn {
            username: username.to_string(),
            at: now,
        });
        tracing::debug!(username, "Tokens cached");

        Ok(())
    }
}
