//! Create and Get: the two credential exchanges with the authenticator

use std::sync::Arc;

use super::authenticator::Authenticator;
use super::capability::CapabilityChecker;
use super::codec;
use super::types::{AssertionResultJson, CreationResultJson, RegistrationOptionsJson, RetrievalOptionsJson};
use crate::error::{AuthenticatorError, PasskeyError};

/// Runs passkey ceremonies against an injected authenticator.
///
/// Every call reaches the authenticator at most once. Challenges are
/// single-use, so retrying is left to the caller.
#[derive(Clone)]
pub struct PasskeyOperations {
    capability: Arc<dyn CapabilityChecker>,
    authenticator: Arc<dyn Authenticator>,
}

impl PasskeyOperations {
    pub fn new(
        capability: Arc<dyn CapabilityChecker>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            capability,
            authenticator,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.capability.is_supported()
    }

    /// Register a new passkey from JSON-encoded creation options
    pub async fn create(&self, options_json: &str) -> Result<CreationResultJson, PasskeyError> {
        if !self.capability.is_supported() {
            return Err(PasskeyError::NotSupported);
        }

        if options_json.trim().is_empty() {
            return Err(PasskeyError::InvalidCreationOptions(
                "no credential creation options were provided".into(),
            ));
        }
        let options: RegistrationOptionsJson = serde_json::from_str(options_json)
            .map_err(|e| PasskeyError::InvalidCreationOptions(e.to_string()))?;
        let options = codec::to_registration_options(options)?;

        tracing::debug!(
            authenticator = self.authenticator.authenticator_type(),
            rp = %options.rp.name,
            excluded = options.exclude_credentials.len(),
            "Requesting passkey creation"
        );

        let credential = self
            .authenticator
            .create(&options)
            .await
            .map_err(|e| {
                tracing::warn!("Passkey creation rejected: {}", e);
                PasskeyError::CreationFailed(e)
            })?
            .ok_or(PasskeyError::CreationFailed(AuthenticatorError::NoCredentialReturned))?;

        tracing::debug!(credential_id = %credential.id, "Passkey created");
        Ok(codec::from_creation_result(&credential))
    }

    /// Assert an existing passkey from JSON-encoded request options
    pub async fn get(&self, options_json: &str) -> Result<AssertionResultJson, PasskeyError> {
        if !self.capability.is_supported() {
            return Err(PasskeyError::NotSupported);
        }

        if options_json.trim().is_empty() {
            return Err(PasskeyError::InvalidRetrievalOptions(
                "no credential request options were provided".into(),
            ));
        }
        let options: RetrievalOptionsJson = serde_json::from_str(options_json)
            .map_err(|e| PasskeyError::InvalidRetrievalOptions(e.to_string()))?;
        let options = codec::to_retrieval_options(options)?;

        tracing::debug!(
            authenticator = self.authenticator.authenticator_type(),
            allowed = options.allow_credentials.len(),
            "Requesting passkey assertion"
        );

        let credential = self
            .authenticator
            .get(&options)
            .await
            .map_err(|e| {
                tracing::warn!("Passkey retrieval rejected: {}", e);
                PasskeyError::RetrievalFailed(e)
            })?
            .ok_or(PasskeyError::RetrievalFailed(AuthenticatorError::NoCredentialReturned))?;

        tracing::debug!(credential_id = %credential.id, "Passkey assertion produced");
        Ok(codec::from_assertion_result(&credential))
    }
}
