//! Sign-in challenge handling

pub mod challenge;
pub mod step;
pub mod web_authn;

pub use challenge::{ChallengeName, ChallengeParameters, SignInProgress, CREDENTIAL_REQUEST_OPTIONS};
pub use step::{ChallengeRouter, ChallengeStep, SignInOutcome};
pub use web_authn::{WebAuthnChallengeStep, WebAuthnSignInAttempt, WebAuthnStepState};
