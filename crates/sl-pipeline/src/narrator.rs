//! The narrator: renders a resolved turn as prose.

use serde_json::json;
use sl_core::{GuardResult, ObservableContext, Outcome, RulesResult};
use sl_oracle::Oracle;

use crate::stage::{Stage, encode_payload};

/// Turns a ruling into player-facing prose.
///
/// The narrator is handed the post-turn projection, never hidden state, and
/// cannot change anything.
#[derive(Debug, Clone)]
pub struct Narrator {
    prompt: String,
}

impl Narrator {
    /// A narrator using `prompt` as its system prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }

    /// Narrate a resolved turn. Falls back to a plain summary of the ruling
    /// when the oracle is unreachable or says nothing.
    pub fn narrate(
        &self,
        oracle: &dyn Oracle,
        observable: &ObservableContext,
        action: &str,
        guard: &GuardResult,
        rules: &RulesResult,
    ) -> String {
        let payload = json!({
            "player_action": action,
            "observable_context": observable,
            "guard_result": guard,
            "rules_result": rules,
            "style_requirements": [
                "Second person, present tense.",
                "Reflect the outcome and any changes exactly as ruled.",
                "Do not reveal anything the character cannot observe.",
                "Do not decide what the player character does next.",
                "Two short paragraphs at most.",
            ],
        });
        match oracle.generate(&self.prompt, &encode_payload(&payload)) {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                tracing::warn!(stage = %Stage::Narrator, "empty narration, using fallback");
                fallback(rules)
            }
            Err(e) => {
                tracing::warn!(stage = %Stage::Narrator, error = %e, "oracle unavailable, using fallback");
                fallback(rules)
            }
        }
    }
}

/// Neutral narration built from the ruling alone.
pub fn fallback(rules: &RulesResult) -> String {
    let verdict = match rules.outcome {
        Outcome::Success => "You succeed",
        Outcome::PartialSuccess => "You partly succeed",
        Outcome::Failure => "You fail",
    };
    format!(
        "{verdict} (rolled {} against {}).",
        rules.roll, rules.difficulty
    )
}
