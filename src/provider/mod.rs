//! Identity provider API used by the passkey flows

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::error::ProviderError;
use crate::sign_in::ChallengeName;

pub mod http;

pub use http::HttpIdentityProvider;

/// Identity provider operations needed for passkey registration and sign-in.
///
/// Implementations perform a single request per call: no retries and no
/// client-imposed timeout.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn get_web_authn_registration_options(
        &self,
        input: GetWebAuthnRegistrationOptionsRequest,
    ) -> Result<GetWebAuthnRegistrationOptionsResponse, ProviderError>;

    async fn verify_web_authn_registration_result(
        &self,
        input: VerifyWebAuthnRegistrationResultRequest,
    ) -> Result<VerifyWebAuthnRegistrationResultResponse, ProviderError>;

    async fn respond_to_auth_challenge(
        &self,
        input: RespondToAuthChallengeRequest,
    ) -> Result<RespondToAuthChallengeResponse, ProviderError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetWebAuthnRegistrationOptionsRequest {
    pub access_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetWebAuthnRegistrationOptionsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_creation_options: Option<Value>,
}

impl GetWebAuthnRegistrationOptionsResponse {
    /// The creation options as JSON text.
    ///
    /// The provider sends either a JSON-encoded string or an inline object;
    /// `None` when the payload is missing, null or blank.
    pub fn creation_options_json(&self) -> Option<String> {
        match self.credential_creation_options.as_ref()? {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VerifyWebAuthnRegistrationResultRequest {
    pub access_token: String,
    /// JSON-encoded creation result
    pub credential: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VerifyWebAuthnRegistrationResultResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RespondToAuthChallengeRequest {
    pub challenge_name: ChallengeName,
    pub challenge_responses: BTreeMap<String, String>,
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_metadata: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RespondToAuthChallengeResponse {
    #[serde(default)]
    pub challenge_name: Option<ChallengeName>,
    #[serde(default)]
    pub session: Option<String>,
    #[serde(default)]
    pub challenge_parameters: HashMap<String, String>,
    #[serde(default)]
    pub authentication_result: Option<AuthenticationResult>,
}

/// Tokens issued on successful sign-in
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticationResult {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Seconds until the access token expires
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub new_device_metadata: Option<NewDeviceMetadata>,
}

// Tokens stay out of logs.
impl std::fmt::Debug for AuthenticationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationResult")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("id_token", &self.id_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .field("new_device_metadata", &self.new_device_metadata)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewDeviceMetadata {
    #[serde(default)]
    pub device_key: Option<String>,
    #[serde(default)]
    pub device_group_key: Option<String>,
}
