//! WEB_AUTHN challenge: answer a sign-in challenge with a passkey assertion

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::challenge::{ChallengeName, ChallengeParameters, SignInProgress, CREDENTIAL_REQUEST_OPTIONS};
use super::step::{ChallengeStep, SignInOutcome};
use crate::error::{Result, SignInError};
use crate::provider::RespondToAuthChallengeRequest;
use crate::session::SessionFinalizer;
use crate::PasskeyContext;

/// Progress of a single WEB_AUTHN attempt. States only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebAuthnStepState {
    AwaitingOptions,
    OptionsExtracted,
    AuthenticatorInvoked,
    ResponseSubmitted,
    Complete,
    Error,
}

impl WebAuthnStepState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WebAuthnStepState::Complete | WebAuthnStepState::Error)
    }

    fn successor(&self) -> Option<WebAuthnStepState> {
        match self {
            WebAuthnStepState::AwaitingOptions => Some(WebAuthnStepState::OptionsExtracted),
            WebAuthnStepState::OptionsExtracted => Some(WebAuthnStepState::AuthenticatorInvoked),
            WebAuthnStepState::AuthenticatorInvoked => Some(WebAuthnStepState::ResponseSubmitted),
            WebAuthnStepState::ResponseSubmitted => Some(WebAuthnStepState::Complete),
            WebAuthnStepState::Complete | WebAuthnStepState::Error => None,
        }
    }

    pub fn can_transition_to(&self, next: WebAuthnStepState) -> bool {
        if self.is_terminal() {
            return false;
        }
        next == WebAuthnStepState::Error || self.successor() == Some(next)
    }
}

fn invalid_state(reason: &str) -> SignInError {
    SignInError::InvalidSessionState(reason.to_string())
}

/// One WEB_AUTHN attempt. Runs at most once.
pub struct WebAuthnSignInAttempt {
    context: PasskeyContext,
    finalizer: Arc<dyn SessionFinalizer>,
    state: WebAuthnStepState,
}

impl WebAuthnSignInAttempt {
    pub fn new(context: PasskeyContext, finalizer: Arc<dyn SessionFinalizer>) -> Self {
        Self {
            context,
            finalizer,
            state: WebAuthnStepState::AwaitingOptions,
        }
    }

    pub fn state(&self) -> WebAuthnStepState {
        self.state
    }

    pub async fn run(
        &mut self,
        progress: &SignInProgress,
        parameters: &ChallengeParameters,
    ) -> Result<SignInOutcome> {
        if self.state != WebAuthnStepState::AwaitingOptions {
            return Err(SignInError::AttemptConsumed.into());
        }

        match self.execute(progress, parameters).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                self.advance(WebAuthnStepState::Error);
                Err(err)
            }
        }
    }

    async fn execute(
        &mut self,
        progress: &SignInProgress,
        parameters: &ChallengeParameters,
    ) -> Result<SignInOutcome> {
        let username = progress
            .username
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| invalid_state("no username is associated with this sign-in"))?;

        if progress.challenge_name != Some(ChallengeName::WebAuthn) {
            return Err(invalid_state("the outstanding challenge is not WEB_AUTHN").into());
        }

        let options_json = parameters
            .get(CREDENTIAL_REQUEST_OPTIONS)
            .filter(|o| !o.trim().is_empty())
            .ok_or_else(|| invalid_state("challenge parameters carry no credential request options"))?;
        self.advance(WebAuthnStepState::OptionsExtracted);

        let credential = self.context.operations.get(options_json).await?;
        self.advance(WebAuthnStepState::AuthenticatorInvoked);

        let request = RespondToAuthChallengeRequest {
            challenge_name: ChallengeName::WebAuthn,
            challenge_responses: BTreeMap::from([
                ("USERNAME".to_string(), username.to_string()),
                ("CREDENTIAL".to_string(), serde_json::to_string(&credential)?),
            ]),
            client_id: self.context.config.client_id.clone(),
            session: progress.sign_in_session.clone(),
            client_metadata: None,
        };
        let response = self.context.provider.respond_to_auth_challenge(request).await?;
        self.advance(WebAuthnStepState::ResponseSubmitted);

        let outcome = match (response.authentication_result, response.challenge_name) {
            (Some(result), _) => {
                self.finalizer.finalize(username, &result).await?;
                tracing::info!(username, "Signed in with passkey");
                SignInOutcome::Done
            }
            (None, Some(next)) => {
                tracing::debug!(challenge = %next, "Provider issued a follow-up challenge");
                SignInOutcome::ContinueSignIn {
                    challenge_name: next,
                    challenge_parameters: response.challenge_parameters,
                    session: response.session,
                }
            }
            (None, None) => return Err(SignInError::IncompleteAuthentication.into()),
        };

        self.advance(WebAuthnStepState::Complete);
        Ok(outcome)
    }

    fn advance(&mut self, next: WebAuthnStepState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal WEB_AUTHN transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::trace!(from = ?self.state, to = ?next, "WEB_AUTHN step transition");
        self.state = next;
    }
}

/// [`ChallengeStep`] for WEB_AUTHN; every call runs a fresh attempt
#[derive(Clone)]
pub struct WebAuthnChallengeStep {
    context: PasskeyContext,
    finalizer: Arc<dyn SessionFinalizer>,
}

impl WebAuthnChallengeStep {
    pub fn new(context: PasskeyContext, finalizer: Arc<dyn SessionFinalizer>) -> Self {
        Self { context, finalizer }
    }
}

#[async_trait]
impl ChallengeStep for WebAuthnChallengeStep {
    fn challenge_name(&self) -> ChallengeName {
        ChallengeName::WebAuthn
    }

    async fn handle(
        &self,
        progress: &SignInProgress,
        parameters: &ChallengeParameters,
    ) -> Result<SignInOutcome> {
        WebAuthnSignInAttempt::new(self.context.clone(), self.finalizer.clone())
            .run(progress, parameters)
            .await
    }
}
