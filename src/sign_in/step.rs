//! Step contract shared by every challenge kind, and dispatch between steps

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use super::challenge::{ChallengeName, ChallengeParameters, SignInProgress};
use crate::error::{Result, SignInError};

/// What the sign-in state machine should do after a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    /// Tokens are cached and the signed-in event has been sent
    Done,
    /// The provider issued a further challenge
    ContinueSignIn {
        challenge_name: ChallengeName,
        challenge_parameters: ChallengeParameters,
        session: Option<String>,
    },
}

impl SignInOutcome {
    pub fn is_signed_in(&self) -> bool {
        matches!(self, SignInOutcome::Done)
    }
}

/// Handler for one challenge kind
#[async_trait]
pub trait ChallengeStep: Send + Sync {
    fn challenge_name(&self) -> ChallengeName;

    /// Answer the outstanding challenge.
    ///
    /// `progress` is read-only; a failed step must leave it exactly as it was.
    async fn handle(
        &self,
        progress: &SignInProgress,
        parameters: &ChallengeParameters,
    ) -> Result<SignInOutcome>;
}

/// Dispatches the outstanding challenge to the step registered for its kind
#[derive(Default, Clone)]
pub struct ChallengeRouter {
    steps: HashMap<ChallengeName, Arc<dyn ChallengeStep>>,
}

impl ChallengeRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a step, replacing any previous step for the same kind
    pub fn register(&mut self, step: Arc<dyn ChallengeStep>) -> &mut Self {
        self.steps.insert(step.challenge_name(), step);
        self
    }

    pub fn supports(&self, name: ChallengeName) -> bool {
        self.steps.contains_key(&name)
    }

    pub async fn handle(
        &self,
        progress: &SignInProgress,
        parameters: &ChallengeParameters,
    ) -> Result<SignInOutcome> {
        let name = progress.challenge_name.clone().ok_or_else(|| {
            SignInError::InvalidSessionState("no challenge is outstanding".into())
        })?;
        let step = self
            .steps
            .get(&name)
            .ok_or_else(|| SignInError::UnsupportedChallenge(name.clone()))?;

        tracing::debug!(challenge = %name, "Dispatching sign-in challenge");
        step.handle(progress, parameters).await
    }
}
