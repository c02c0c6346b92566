//! Error taxonomy for passkey registration and sign-in

use crate::sign_in::ChallengeName;
use thiserror::Error;

/// Failures reported by the local authenticator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthenticatorError {
    #[error("the user cancelled the operation")]
    Cancelled,

    #[error("the operation timed out")]
    Timeout,

    #[error("a credential from the exclusion list is already registered on this authenticator")]
    InvalidState,

    #[error("no eligible authenticator is available")]
    NoEligibleAuthenticator,

    #[error("the authenticator returned no credential")]
    NoCredentialReturned,

    #[error("platform error: {0}")]
    Platform(String),
}

/// Passkey exchange errors
#[derive(Error, Debug)]
pub enum PasskeyError {
    #[error("passkeys are not supported in this environment")]
    NotSupported,

    #[error("invalid credential creation options: {0}")]
    InvalidCreationOptions(String),

    #[error("invalid credential request options: {0}")]
    InvalidRetrievalOptions(String),

    #[error("passkey registration failed: {0}")]
    CreationFailed(#[source] AuthenticatorError),

    #[error("passkey retrieval failed: {0}")]
    RetrievalFailed(#[source] AuthenticatorError),

    #[error("malformed base64url data: {0}")]
    MalformedEncoding(#[from] base64::DecodeError),
}

impl PasskeyError {
    /// Stable name of the error kind, suitable for host applications to match on
    pub fn code(&self) -> &'static str {
        match self {
            PasskeyError::NotSupported => "PasskeyNotSupported",
            PasskeyError::InvalidCreationOptions(_) => "InvalidCredentialCreationOptions",
            PasskeyError::InvalidRetrievalOptions(_) => "InvalidCredentialRequestOptions",
            PasskeyError::CreationFailed(_) => "PasskeyRegistrationFailed",
            PasskeyError::RetrievalFailed(_) => "PasskeyRetrievalFailed",
            PasskeyError::MalformedEncoding(_) => "MalformedEncoding",
        }
    }

    /// Whether the caller may reasonably ask the user to try again.
    /// This crate never retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PasskeyError::CreationFailed(_) | PasskeyError::RetrievalFailed(_)
        )
    }
}

/// Sign-in state machine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignInError {
    #[error("invalid sign-in session state: {0}")]
    InvalidSessionState(String),

    #[error("no handler registered for challenge {0}")]
    UnsupportedChallenge(ChallengeName),

    #[error("this sign-in attempt has already been used")]
    AttemptConsumed,

    #[error("the identity provider returned an authentication result without tokens")]
    IncompleteAuthentication,
}

impl SignInError {
    pub fn name(&self) -> &'static str {
        "SignInException"
    }
}

/// Identity provider errors
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{code}: {message}")]
    Service { code: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Passkey(#[from] PasskeyError),

    #[error(transparent)]
    SignIn(#[from] SignInError),

    #[error("Identity provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("User needs to be authenticated to call this API")]
    UserUnauthenticated,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
