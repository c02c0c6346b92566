//! Passkey option and result shapes.
//!
//! Every structure is generic over the representation of its binary fields:
//! `String` (base64url) for the identity provider's JSON, `Vec<u8>` for the
//! authenticator. The aliases at the bottom of the file name both forms.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CredentialType {
    #[default]
    #[serde(rename = "public-key")]
    PublicKey,
}

wire_enum! {
    pub enum AuthenticatorTransport {
        Ble => "ble",
        Hybrid => "hybrid",
        Internal => "internal",
        Nfc => "nfc",
        SmartCard => "smart-card",
        Usb => "usb",
    }
}

wire_enum! {
    /// Used for both `userVerification` and `residentKey`
    pub enum UserVerificationRequirement {
        Discouraged => "discouraged",
        Preferred => "preferred",
        Required => "required",
    }
}

wire_enum! {
    pub enum AuthenticatorAttachment {
        Platform => "platform",
        CrossPlatform => "cross-platform",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyCredentialDescriptor<T> {
    #[serde(rename = "type", default)]
    pub kind: CredentialType,
    pub id: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transports: Option<Vec<AuthenticatorTransport>>,
}

impl<T> PublicKeyCredentialDescriptor<T> {
    /// Convert the identifier, keeping type and transport hints
    pub fn try_map_id<U, E>(
        self,
        f: impl FnOnce(T) -> Result<U, E>,
    ) -> Result<PublicKeyCredentialDescriptor<U>, E> {
        Ok(PublicKeyCredentialDescriptor {
            kind: self.kind,
            id: f(self.id)?,
            transports: self.transports,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelyingParty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntity<T> {
    pub id: T,
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubKeyCredParam {
    /// COSE algorithm identifier (-7 = ES256, -257 = RS256)
    pub alg: i64,
    #[serde(rename = "type", default)]
    pub kind: CredentialType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_attachment: Option<AuthenticatorAttachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_resident_key: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resident_key: Option<UserVerificationRequirement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_verification: Option<UserVerificationRequirement>,
}

/// Parameters for creating a credential (`PublicKeyCredentialCreationOptions`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationOptions<T> {
    pub challenge: T,
    pub rp: RelyingParty,
    pub user: UserEntity<T>,
    pub pub_key_cred_params: Vec<PubKeyCredParam>,
    /// Milliseconds; enforced by the authenticator, never by this crate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub exclude_credentials: Vec<PublicKeyCredentialDescriptor<T>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_selection: Option<AuthenticatorSelection>,
    /// Members this crate does not interpret (`attestation`, `extensions`, `hints`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Parameters for asserting an existing credential (`PublicKeyCredentialRequestOptions`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions<T> {
    pub challenge: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rp_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub allow_credentials: Vec<PublicKeyCredentialDescriptor<T>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_verification: Option<UserVerificationRequirement>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationResponse<T> {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: T,
    pub attestation_object: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionResponse<T> {
    pub authenticator_data: T,
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: T,
    pub signature: T,
    /// Absent for non-discoverable credentials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_handle: Option<T>,
}

/// `PublicKeyCredential` carrying an attestation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationResult<T> {
    #[serde(rename = "type", default)]
    pub kind: CredentialType,
    pub id: String,
    pub raw_id: T,
    pub response: AttestationResponse<T>,
}

/// `PublicKeyCredential` carrying an assertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionResult<T> {
    #[serde(rename = "type", default)]
    pub kind: CredentialType,
    pub id: String,
    pub raw_id: T,
    pub response: AssertionResponse<T>,
}

pub type RegistrationOptionsJson = CreationOptions<String>;
pub type RegistrationOptions = CreationOptions<Vec<u8>>;
pub type RetrievalOptionsJson = RequestOptions<String>;
pub type RetrievalOptions = RequestOptions<Vec<u8>>;
pub type CreationResultJson = CreationResult<String>;
pub type RawCreationResult = CreationResult<Vec<u8>>;
pub type AssertionResultJson = AssertionResult<String>;
pub type RawAssertionResult = AssertionResult<Vec<u8>>;
