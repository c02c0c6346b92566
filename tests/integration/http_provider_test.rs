//! HTTP identity provider client against an in-process axum server

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use jau_passkey::provider::*;
use jau_passkey::sign_in::*;
use jau_passkey::{
    Error, PasskeyConfig, PasskeyContext, PasskeyOperations, PasskeyRegistration, ProviderError,
    TokenCache,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

#[macro_use]
#[path = "../common/mod.rs"]
mod common;

use common::{FakeAuthenticator, StaticCapability};

async fn handle(headers: HeaderMap, body: String) -> Response {
    let target = headers
        .get("x-amz-target")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if content_type != "application/x-amz-json-1.1" || !headers.contains_key("amz-sdk-invocation-id") {
        return (StatusCode::BAD_REQUEST, "bad headers").into_response();
    }

    let input: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    let not_authorized = || {
        (
            StatusCode::BAD_REQUEST,
            json!({
                "__type": "com.amazonaws.cognito#NotAuthorizedException",
                "message": "Invalid Access Token"
            })
            .to_string(),
        )
            .into_response()
    };

    match target.as_str() {
        "AWSCognitoIdentityProviderService.GetWebAuthnRegistrationOptions" => {
            if input["AccessToken"] != common::ACCESS_TOKEN {
                return not_authorized();
            }
            json!({ "CredentialCreationOptions": common::credential_creation_options() })
                .to_string()
                .into_response()
        }
        "AWSCognitoIdentityProviderService.VerifyWebAuthnRegistrationResult" => {
            if input["AccessToken"] != common::ACCESS_TOKEN {
                return not_authorized();
            }
            let credential: Value =
                serde_json::from_str(input["Credential"].as_str().unwrap_or_default())
                    .unwrap_or(Value::Null);
            json!({ "CredentialId": credential["id"] }).to_string().into_response()
        }
        "AWSCognitoIdentityProviderService.RespondToAuthChallenge" => {
            if input["ChallengeName"] != "WEB_AUTHN" || input["Session"] != "123456" {
                return (
                    StatusCode::BAD_REQUEST,
                    [("x-amzn-errortype", "InvalidParameterException:http://internal/")],
                    "{}",
                )
                    .into_response();
            }
            json!({
                "AuthenticationResult": {
                    "AccessToken": "issued-access-token",
                    "IdToken": "issued-id-token",
                    "RefreshToken": "issued-refresh-token",
                    "ExpiresIn": 3600,
                    "TokenType": "Bearer"
                },
                "ChallengeParameters": {}
            })
            .to_string()
            .into_response()
        }
        _ => (StatusCode::NOT_FOUND, "unknown operation").into_response(),
    }
}

/// Start a fake identity provider and return its endpoint
async fn spawn_provider() -> String {
    let app = Router::new().route("/", post(handle));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/", addr)
}

fn context(endpoint: &str) -> PasskeyContext {
    let config = PasskeyConfig::builder()
        .client_id(common::CLIENT_ID)
        .endpoint(endpoint)
        .build();
    let provider = HttpIdentityProvider::from_config(&config).unwrap();
    PasskeyContext::new(
        config,
        Arc::new(provider),
        PasskeyOperations::new(
            Arc::new(StaticCapability(true)),
            Arc::new(FakeAuthenticator::new()),
        ),
    )
}

#[tokio::test]
async fn test_registration_over_http() {
    let endpoint = spawn_provider().await;
    let flow = PasskeyRegistration::new(context(&endpoint));

    let credential_id = flow.associate_credential(common::ACCESS_TOKEN).await.unwrap();

    assert_eq!(credential_id.as_deref(), Some("Y3JlZC0x"));
}

#[tokio::test]
async fn test_service_error_is_parsed() {
    let endpoint = spawn_provider().await;
    let provider = HttpIdentityProvider::new(endpoint).unwrap();

    let result = provider
        .get_web_authn_registration_options(GetWebAuthnRegistrationOptionsRequest {
            access_token: "expired".into(),
        })
        .await;

    match result {
        Err(ProviderError::Service { code, message }) => {
            assert_eq!(code, "NotAuthorizedException");
            assert_eq!(message, "Invalid Access Token");
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[tokio::test]
async fn test_error_type_header_is_used() {
    let endpoint = spawn_provider().await;
    let provider = HttpIdentityProvider::new(endpoint).unwrap();

    let result = provider
        .respond_to_auth_challenge(RespondToAuthChallengeRequest {
            challenge_name: ChallengeName::SmsMfa,
            challenge_responses: BTreeMap::new(),
            client_id: common::CLIENT_ID.into(),
            session: None,
            client_metadata: None,
        })
        .await;

    assert_error_matches!(result, ProviderError::Service { .. });
    if let Err(ProviderError::Service { code, .. }) = result {
        assert_eq!(code, "InvalidParameterException");
    }
}

#[tokio::test]
async fn test_web_authn_sign_in_over_http() {
    let endpoint = spawn_provider().await;
    let cache = Arc::new(TokenCache::new());
    let router = context(&endpoint).challenge_router(cache.clone());

    let progress = SignInProgress::new("u1", ChallengeName::WebAuthn, "123456");
    let parameters = ChallengeParameters::from([(
        CREDENTIAL_REQUEST_OPTIONS.to_string(),
        common::credential_request_options(),
    )]);

    let outcome = router.handle(&progress, &parameters).await.unwrap();

    assert_eq!(outcome, SignInOutcome::Done);
    let tokens = cache.get("u1").await.unwrap();
    assert_eq!(tokens.refresh_token.as_deref(), Some("issued-refresh-token"));
}

#[tokio::test]
async fn test_rejected_session_surfaces_provider_error() {
    let endpoint = spawn_provider().await;
    let cache = Arc::new(TokenCache::new());
    let router = context(&endpoint).challenge_router(cache.clone());

    let progress = SignInProgress::new("u1", ChallengeName::WebAuthn, "stale-session");
    let parameters = ChallengeParameters::from([(
        CREDENTIAL_REQUEST_OPTIONS.to_string(),
        common::credential_request_options(),
    )]);

    let result = router.handle(&progress, &parameters).await;

    assert_error_matches!(result, Error::Provider(ProviderError::Service { .. }));
    assert!(cache.get("u1").await.is_none());
}
