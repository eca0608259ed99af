//! The world authority: judges plausibility against the full world.

use serde_json::{Value, json};
use sl_core::{ObservableContext, WorldResult};
use sl_oracle::Oracle;

use crate::stage::{Stage, consult};

/// Decides whether an action can happen in the world as it really is.
///
/// This is the only stage that sees hidden state. Anything it cannot make
/// sense of counts as implausible.
#[derive(Debug, Clone)]
pub struct WorldAuthority {
    prompt: String,
}

impl WorldAuthority {
    /// A world authority using `prompt` as its system prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }

    /// Validate an action the guard let through.
    pub fn validate(
        &self,
        oracle: &dyn Oracle,
        action: &str,
        observable: &ObservableContext,
        hidden: &Value,
        scenario: &Value,
    ) -> WorldResult {
        let payload = json!({
            "player_action": action,
            "observable_context": observable,
            "hidden_state": hidden,
            "scenario_context": scenario,
            "required_output": {
                "plausible": "bool",
                "reason": "string",
                "world_effects": {
                    "location_change": "string|null",
                    "npc_updates": "list",
                    "flag_updates": "dict[str,bool]",
                },
            },
        });
        let result: WorldResult = consult(oracle, Stage::World, &self.prompt, &payload);
        tracing::debug!(stage = %Stage::World, plausible = result.plausible, "world verdict");
        result
    }
}
