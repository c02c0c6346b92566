//! Authenticator abstraction

use async_trait::async_trait;

use super::types::{RawAssertionResult, RawCreationResult, RegistrationOptions, RetrievalOptions};
use crate::error::AuthenticatorError;

/// Local platform or roaming authenticator.
///
/// Both calls may wait on the user for as long as the options' `timeout`
/// allows; nothing here aborts them early. `Ok(None)` means the platform
/// resolved without producing a credential.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Create a new credential (registration)
    async fn create(
        &self,
        options: &RegistrationOptions,
    ) -> Result<Option<RawCreationResult>, AuthenticatorError>;

    /// Produce an assertion with an existing credential (authentication)
    async fn get(
        &self,
        options: &RetrievalOptions,
    ) -> Result<Option<RawAssertionResult>, AuthenticatorError>;

    /// Name for logs
    fn authenticator_type(&self) -> &'static str {
        "platform"
    }
}
