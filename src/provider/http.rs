//! Identity provider client speaking the AWS JSON 1.1 protocol over HTTP

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, CACHE_CONTROL, CONTENT_TYPE},
    Client, ClientBuilder, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use super::*;
use crate::config::PasskeyConfig;
use crate::error::{Error, ProviderError};

const SERVICE_TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
const AMZ_JSON_CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// JSON-over-HTTP identity provider client
pub struct HttpIdentityProvider {
    client: Client,
    endpoint: String,
}

impl HttpIdentityProvider {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ProviderError> {
        // Authenticator prompts can keep a sign-in open for minutes, so no
        // request timeout is configured here.
        let client = ClientBuilder::new().build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &PasskeyConfig) -> Result<Self, Error> {
        Ok(Self::new(config.endpoint()?)?)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_headers(&self, operation: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(AMZ_JSON_CONTENT_TYPE));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

        if let Ok(value) = HeaderValue::from_str(&format!("{}.{}", SERVICE_TARGET_PREFIX, operation)) {
            headers.insert("x-amz-target", value);
        }
        if let Ok(value) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
            headers.insert("amz-sdk-invocation-id", value);
        }

        headers
    }

    async fn call<I, O>(&self, operation: &str, input: &I) -> Result<O, ProviderError>
    where
        I: Serialize + Sync,
        O: DeserializeOwned,
    {
        tracing::debug!(operation, endpoint = %self.endpoint, "Calling identity provider");

        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.build_headers(operation))
            .body(serde_json::to_vec(input)?)
            .send()
            .await?;

        let status = response.status();
        let error_type = response
            .headers()
            .get("x-amzn-errortype")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?;

        if !status.is_success() {
            let err = parse_service_error(status, error_type.as_deref(), &body);
            tracing::warn!(operation, %status, "Identity provider returned an error: {}", err);
            return Err(err);
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_slice(b"{}")?);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn get_web_authn_registration_options(
        &self,
        input: GetWebAuthnRegistrationOptionsRequest,
    ) -> Result<GetWebAuthnRegistrationOptionsResponse, ProviderError> {
        self.call("GetWebAuthnRegistrationOptions", &input).await
    }

    async fn verify_web_authn_registration_result(
        &self,
        input: VerifyWebAuthnRegistrationResultRequest,
    ) -> Result<VerifyWebAuthnRegistrationResultResponse, ProviderError> {
        self.call("VerifyWebAuthnRegistrationResult", &input).await
    }

    async fn respond_to_auth_challenge(
        &self,
        input: RespondToAuthChallengeRequest,
    ) -> Result<RespondToAuthChallengeResponse, ProviderError> {
        self.call("RespondToAuthChallenge", &input).await
    }
}

#[derive(serde::Deserialize)]
struct ServiceErrorBody {
    #[serde(rename = "__type", alias = "code", default)]
    kind: Option<String>,
    #[serde(alias = "Message", default)]
    message: Option<String>,
}

/// Build a service error from the error header or the `__type` body member
pub(crate) fn parse_service_error(
    status: StatusCode,
    error_type: Option<&str>,
    body: &[u8],
) -> ProviderError {
    let parsed: Option<ServiceErrorBody> = serde_json::from_slice(body).ok();
    let (kind, message) = match parsed {
        Some(parsed) => (parsed.kind, parsed.message),
        None => (None, None),
    };

    let code = error_type
        .map(str::to_owned)
        .or(kind)
        .map(|raw| normalize_error_code(&raw))
        .filter(|code| !code.is_empty())
        .unwrap_or_else(|| "UnknownError".to_string());

    ProviderError::Service {
        code,
        message: message.unwrap_or_else(|| format!("request failed with status {}", status)),
    }
}

/// `aws.protocoltests#FooError:http://internal` -> `FooError`
fn normalize_error_code(raw: &str) -> String {
    let without_namespace = raw.rsplit('#').next().unwrap_or(raw);
    without_namespace
        .split(':')
        .next()
        .unwrap_or(without_namespace)
        .trim()
        .to_string()
}
