//! Sign-in challenge kinds and the progress record challenge steps read

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Challenge-name to value map delivered with each challenge
pub type ChallengeParameters = HashMap<String, String>;

/// Challenge parameter carrying JSON-encoded credential request options
pub const CREDENTIAL_REQUEST_OPTIONS: &str = "CREDENTIAL_REQUEST_OPTIONS";

wire_enum! {
    /// Challenge kinds the identity provider can issue during sign-in
    pub enum ChallengeName {
        WebAuthn => "WEB_AUTHN",
        SmsMfa => "SMS_MFA",
        SmsOtp => "SMS_OTP",
        EmailOtp => "EMAIL_OTP",
        SoftwareTokenMfa => "SOFTWARE_TOKEN_MFA",
        SelectMfaType => "SELECT_MFA_TYPE",
        MfaSetup => "MFA_SETUP",
        SelectChallenge => "SELECT_CHALLENGE",
        Password => "PASSWORD",
        PasswordSrp => "PASSWORD_SRP",
        PasswordVerifier => "PASSWORD_VERIFIER",
        CustomChallenge => "CUSTOM_CHALLENGE",
        DeviceSrpAuth => "DEVICE_SRP_AUTH",
        DevicePasswordVerifier => "DEVICE_PASSWORD_VERIFIER",
        AdminNoSrpAuth => "ADMIN_NO_SRP_AUTH",
        NewPasswordRequired => "NEW_PASSWORD_REQUIRED",
    }
}

/// The surrounding sign-in state machine's record of the current attempt.
/// Challenge steps read it; only the owner mutates or clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInProgress {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub challenge_name: Option<ChallengeName>,
    /// Provider session token for the in-flight exchange
    #[serde(default)]
    pub sign_in_session: Option<String>,
}

impl SignInProgress {
    pub fn new(
        username: impl Into<String>,
        challenge_name: ChallengeName,
        sign_in_session: impl Into<String>,
    ) -> Self {
        Self {
            username: Some(username.into()),
            challenge_name: Some(challenge_name),
            sign_in_session: Some(sign_in_session.into()),
        }
    }
}
