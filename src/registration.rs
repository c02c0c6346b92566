//! Passkey registration for a signed-in user

use crate::error::{Error, PasskeyError, Result};
use crate::provider::{GetWebAuthnRegistrationOptionsRequest, VerifyWebAuthnRegistrationResultRequest};
use crate::PasskeyContext;

pub struct PasskeyRegistration {
    context: PasskeyContext,
}

impl PasskeyRegistration {
    pub fn new(context: PasskeyContext) -> Self {
        Self { context }
    }

    /// Create a passkey on the local authenticator and register it with the
    /// identity provider.
    ///
    /// Returns the provider-assigned credential id, when the provider sends one.
    pub async fn associate_credential(&self, access_token: &str) -> Result<Option<String>> {
        if access_token.is_empty() {
            return Err(Error::UserUnauthenticated);
        }

        let response = self
            .context
            .provider
            .get_web_authn_registration_options(GetWebAuthnRegistrationOptionsRequest {
                access_token: access_token.to_string(),
            })
            .await?;

        let options_json = response.creation_options_json().ok_or_else(|| {
            PasskeyError::InvalidCreationOptions(
                "the identity provider returned no credential creation options".into(),
            )
        })?;

        let credential = self.context.operations.create(&options_json).await?;

        let verified = self
            .context
            .provider
            .verify_web_authn_registration_result(VerifyWebAuthnRegistrationResultRequest {
                access_token: access_token.to_string(),
                credential: serde_json::to_string(&credential)?,
            })
            .await?;

        tracing::info!(
            credential_id = verified.credential_id.as_deref().unwrap_or("<unassigned>"),
            "Passkey registered"
        );
        Ok(verified.credential_id)
    }
}
