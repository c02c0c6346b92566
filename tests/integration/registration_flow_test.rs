//! Integration tests for passkey registration against a recording provider

use jau_passkey::passkey::codec::from_creation_result;
use jau_passkey::provider::GetWebAuthnRegistrationOptionsResponse;
use jau_passkey::{AuthenticatorError, Error, PasskeyError, PasskeyRegistration, ProviderError};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[macro_use]
#[path = "../common/mod.rs"]
mod common;

use common::{FakeAuthenticator, RecordingProvider};

fn registration(
    supported: bool,
    authenticator: Arc<FakeAuthenticator>,
    provider: Arc<RecordingProvider>,
) -> PasskeyRegistration {
    PasskeyRegistration::new(common::test_context(supported, authenticator, provider))
}

#[tokio::test]
async fn test_registration_submits_serialized_credential() {
    let authenticator = Arc::new(FakeAuthenticator::new());
    let provider = Arc::new(RecordingProvider::new());
    let flow = registration(true, authenticator.clone(), provider.clone());

    let credential_id = flow.associate_credential(common::ACCESS_TOKEN).await.unwrap();
    assert_eq!(credential_id.as_deref(), Some("12345"));

    let options_requests = provider.options_requests.lock().unwrap().clone();
    assert_eq!(options_requests.len(), 1);
    assert_eq!(options_requests[0].access_token, common::ACCESS_TOKEN);

    let verify_requests = provider.verify_requests.lock().unwrap().clone();
    assert_eq!(verify_requests.len(), 1);
    assert_eq!(verify_requests[0].access_token, common::ACCESS_TOKEN);
    assert_eq!(
        verify_requests[0].credential,
        serde_json::to_string(&from_creation_result(&common::creation_result())).unwrap()
    );
    assert_eq!(authenticator.create_calls(), 1);
}

#[tokio::test]
async fn test_inline_options_object_is_accepted() {
    let authenticator = Arc::new(FakeAuthenticator::new());
    let provider = Arc::new(RecordingProvider::new());
    let inline: serde_json::Value =
        serde_json::from_str(&common::credential_creation_options()).unwrap();
    *provider.registration_options.lock().unwrap() = Some(GetWebAuthnRegistrationOptionsResponse {
        credential_creation_options: Some(inline),
    });

    let flow = registration(true, authenticator.clone(), provider);
    assert!(flow.associate_credential(common::ACCESS_TOKEN).await.is_ok());
    assert_eq!(authenticator.create_calls(), 1);
}

#[tokio::test]
async fn test_empty_options_fail_before_create() {
    let authenticator = Arc::new(FakeAuthenticator::new());
    let provider = Arc::new(RecordingProvider::new());
    *provider.registration_options.lock().unwrap() = Some(GetWebAuthnRegistrationOptionsResponse {
        credential_creation_options: None,
    });

    // Checked before the capability check inside Create
    let flow = registration(false, authenticator.clone(), provider.clone());
    let result = flow.associate_credential(common::ACCESS_TOKEN).await;

    assert_error_matches!(result, Error::Passkey(PasskeyError::InvalidCreationOptions(_)));
    assert_eq!(authenticator.create_calls(), 0);
    assert!(provider.verify_requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unsupported_environment() {
    let authenticator = Arc::new(FakeAuthenticator::new());
    let provider = Arc::new(RecordingProvider::new());
    let flow = registration(false, authenticator.clone(), provider.clone());

    let result = flow.associate_credential(common::ACCESS_TOKEN).await;

    assert_error_matches!(result, Error::Passkey(PasskeyError::NotSupported));
    assert_eq!(authenticator.create_calls(), 0);
    assert!(provider.verify_requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_cancelled_creation_is_not_verified() {
    let authenticator = Arc::new(FakeAuthenticator::with_results(
        Err(AuthenticatorError::Cancelled),
        Ok(None),
    ));
    let provider = Arc::new(RecordingProvider::new());
    let flow = registration(true, authenticator, provider.clone());

    let result = flow.associate_credential(common::ACCESS_TOKEN).await;

    assert_error_matches!(
        result,
        Error::Passkey(PasskeyError::CreationFailed(AuthenticatorError::Cancelled))
    );
    assert!(provider.verify_requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_provider_errors_propagate_unchanged() {
    let authenticator = Arc::new(FakeAuthenticator::new());
    let provider = Arc::new(RecordingProvider::new());
    *provider.fail_with.lock().unwrap() =
        Some(("WebAuthnNotEnabledException".into(), "WebAuthn is not enabled".into()));
    let flow = registration(true, authenticator.clone(), provider);

    let result = flow.associate_credential(common::ACCESS_TOKEN).await;

    match result {
        Err(Error::Provider(ProviderError::Service { code, .. })) => {
            assert_eq!(code, "WebAuthnNotEnabledException")
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(authenticator.create_calls(), 0);
}

#[tokio::test]
async fn test_requires_access_token() {
    let provider = Arc::new(RecordingProvider::new());
    let flow = registration(true, Arc::new(FakeAuthenticator::new()), provider.clone());

    assert_error_matches!(flow.associate_credential("").await, Error::UserUnauthenticated);
    assert_eq!(provider.call_count(), 0);
}
