//! jau-passkey - passkey registration and sign-in client
//!
//! Bridges an identity provider's WebAuthn JSON and a local authenticator,
//! and answers the provider's WEB_AUTHN sign-in challenge.

#[macro_use]
mod macros;

pub mod config;
pub mod convert;
pub mod error;
pub mod passkey;
pub mod provider;
pub mod registration;
pub mod session;
pub mod sign_in;

pub use config::PasskeyConfig;
pub use error::{AuthenticatorError, Error, PasskeyError, ProviderError, Result, SignInError};
pub use passkey::{Authenticator, CapabilityChecker, ExecutionContext, PasskeyOperations};
pub use provider::{HttpIdentityProvider, IdentityProvider};
pub use registration::PasskeyRegistration;
pub use session::{AuthEvent, SessionFinalizer, TokenCache};
pub use sign_in::{ChallengeRouter, SignInOutcome, SignInProgress, WebAuthnChallengeStep};

use std::sync::Arc;

/// Collaborators shared by the registration and sign-in flows
#[derive(Clone)]
pub struct PasskeyContext {
    pub config: Arc<PasskeyConfig>,
    pub provider: Arc<dyn IdentityProvider>,
    pub operations: PasskeyOperations,
}

impl PasskeyContext {
    pub fn new(
        config: PasskeyConfig,
        provider: Arc<dyn IdentityProvider>,
        operations: PasskeyOperations,
    ) -> Self {
        Self {
            config: Arc::new(config),
            provider,
            operations,
        }
    }

    /// Context talking to the configured identity provider endpoint over HTTP
    pub fn from_config(
        config: PasskeyConfig,
        capability: Arc<dyn CapabilityChecker>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Result<Self> {
        let provider = HttpIdentityProvider::from_config(&config)?;
        tracing::debug!(endpoint = provider.endpoint(), "Identity provider configured");

        Ok(Self::new(
            config,
            Arc::new(provider),
            PasskeyOperations::new(capability, authenticator),
        ))
    }

    /// Router with the WEB_AUTHN step registered
    pub fn challenge_router(&self, finalizer: Arc<dyn SessionFinalizer>) -> ChallengeRouter {
        let mut router = ChallengeRouter::new();
        router.register(Arc::new(WebAuthnChallengeStep::new(self.clone(), finalizer)));
        router
    }
}
