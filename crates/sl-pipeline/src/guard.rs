//! The intent guard: first stage of every turn.

use serde_json::{Value, json};
use sl_core::{GuardReply, GuardResult, ObservableContext};
use sl_oracle::Oracle;

use crate::policy::VetoPolicy;
use crate::stage::{Stage, consult};

/// Screens player actions for metagaming and clearly impossible acts.
///
/// The guard only ever sees the observable projection.
#[derive(Debug, Clone)]
pub struct IntentGuard {
    prompt: String,
    policy: VetoPolicy,
}

impl IntentGuard {
    /// A guard with the default veto policy.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            policy: VetoPolicy::default(),
        }
    }

    /// Replace the veto policy.
    pub fn with_policy(mut self, policy: VetoPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The veto policy in force.
    pub fn policy(&self) -> &VetoPolicy {
        &self.policy
    }

    /// Review an action. Never fails; an unusable oracle reply lets the
    /// action through.
    pub fn review(
        &self,
        oracle: &dyn Oracle,
        action: &str,
        observable: &ObservableContext,
    ) -> GuardResult {
        let payload = json!({
            "player_action": action,
            "observable_context": observable,
            "required_output": required_output(),
        });
        let reply: GuardReply = consult(oracle, Stage::Guard, &self.prompt, &payload);
        let verdict = self.policy.adjudicate(action, reply);
        tracing::debug!(
            stage = %Stage::Guard,
            allowed = verdict.allowed,
            category = %verdict.block_category,
            "guard verdict"
        );
        verdict
    }
}

fn required_output() -> Value {
    json!({
        "allowed": "bool",
        "block_category": "impossible|metagaming|none",
        "reason": "string",
        "risk_level": "low|medium|high",
    })
}
