//! The rules resolver: one d20 roll, one ruling.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};
use sl_core::{ObservableContext, RulesResult, WorldResult};
use sl_oracle::Oracle;

use crate::stage::{Stage, consult};

/// Rolls the d20 locally and asks the oracle for a ruling against it.
///
/// The roll in the result is always the locally drawn one, whatever the
/// oracle claims.
#[derive(Debug, Clone)]
pub struct RulesResolver {
    prompt: String,
    rng: StdRng,
}

impl RulesResolver {
    /// A resolver drawing from `rng`.
    pub fn new(prompt: impl Into<String>, rng: StdRng) -> Self {
        Self {
            prompt: prompt.into(),
            rng,
        }
    }

    /// A resolver with a deterministic dice sequence.
    pub fn seeded(prompt: impl Into<String>, seed: u64) -> Self {
        Self::new(prompt, StdRng::seed_from_u64(seed))
    }

    /// Draw a d20.
    pub fn roll_d20(&mut self) -> u32 {
        self.rng.random_range(1..=20)
    }

    /// Rule on an action the world authority accepted.
    pub fn evaluate(
        &mut self,
        oracle: &dyn Oracle,
        action: &str,
        observable: &ObservableContext,
        world: &WorldResult,
        rules_context: &Value,
    ) -> RulesResult {
        let roll = self.roll_d20();
        let payload = json!({
            "player_action": action,
            "d20_roll": roll,
            "observable_context": observable,
            "world_validation": world,
            "rules_context": rules_context,
            "required_output": {
                "outcome": "success|partial_success|failure",
                "difficulty": "int",
                "mechanical_effects": {
                    "hp_delta": "int",
                    "xp_delta": "int",
                    "inventory_changes": "list[str] using +item or -item",
                    "new_flags": "dict[str,bool]",
                },
                "reasoning": "short rules-focused explanation",
            },
        });
        let mut result: RulesResult = consult(oracle, Stage::Rules, &self.prompt, &payload);
        result.roll = roll;
        tracing::debug!(
            stage = %Stage::Rules,
            roll,
            difficulty = result.difficulty,
            outcome = %result.outcome,
            "rules ruling"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sl_core::{GameState, Outcome, project};
    use sl_oracle::ScriptedOracle;

    fn evaluate(resolver: &mut RulesResolver, oracle: &ScriptedOracle) -> RulesResult {
        let state = GameState::default();
        resolver.evaluate(
            oracle,
            "pick the lock",
            &project(&state),
            &WorldResult::default(),
            &json!({"system": "d20"}),
        )
    }

    #[test]
    fn rolls_stay_in_range() {
        let mut resolver = RulesResolver::seeded("rules", 7);
        for _ in 0..500 {
            let roll = resolver.roll_d20();
            assert!((1..=20).contains(&roll));
        }
    }

    #[test]
    fn same_seed_same_dice() {
        let mut a = RulesResolver::seeded("rules", 42);
        let mut b = RulesResolver::seeded("rules", 42);
        let rolls_a: Vec<u32> = (0..10).map(|_| a.roll_d20()).collect();
        let rolls_b: Vec<u32> = (0..10).map(|_| b.roll_d20()).collect();
        assert_eq!(rolls_a, rolls_b);
    }

    #[test]
    fn local_roll_overrides_oracle_claim() {
        let oracle = ScriptedOracle::new().reply_json(json!({
            "outcome": "success",
            "difficulty": 10,
            "roll": 99,
            "d20_roll": 99,
            "mechanical_effects": {"xp_delta": 5},
        }));
        let mut resolver = RulesResolver::seeded("rules", 3);
        let result = evaluate(&mut resolver, &oracle);

        let sent = oracle.requests()[0].payload_json();
        assert_eq!(sent["d20_roll"], result.roll);
        assert!((1..=20).contains(&result.roll));
        assert_eq!(result.outcome, Outcome::Success);
        assert_eq!(result.difficulty, 10);
        assert_eq!(result.mechanical_effects.xp_delta, 5);
        assert_eq!(sent["rules_context"]["system"], "d20");
    }

    #[test]
    fn schema_names_every_outcome() {
        let oracle = ScriptedOracle::new().reply_json(json!({"outcome": "failure"}));
        let mut resolver = RulesResolver::seeded("rules", 3);
        evaluate(&mut resolver, &oracle);

        let sent = oracle.requests()[0].payload_json();
        let schema = sent["required_output"]["outcome"].as_str().unwrap();
        assert_eq!(schema, "success|partial_success|failure");
        let outcomes: Vec<Outcome> = schema.split('|').filter_map(Outcome::parse).collect();
        assert_eq!(
            outcomes,
            [Outcome::Success, Outcome::PartialSuccess, Outcome::Failure]
        );
    }

    #[test]
    fn malformed_reply_is_safe_failure_with_real_roll() {
        let oracle = ScriptedOracle::new().reply("not json at all");
        let mut resolver = RulesResolver::seeded("rules", 11);
        let result = evaluate(&mut resolver, &oracle);
        assert_eq!(result.outcome, Outcome::Failure);
        assert_eq!(result.difficulty, 12);
        assert!(result.mechanical_effects.is_empty());
        assert!((1..=20).contains(&result.roll));
        assert_eq!(result.reasoning, "Rules output invalid; defaulting to safe failure.");
    }

    #[test]
    fn unreachable_oracle_is_safe_failure() {
        let oracle = ScriptedOracle::new().fail();
        let mut resolver = RulesResolver::seeded("rules", 11);
        let result = evaluate(&mut resolver, &oracle);
        assert_eq!(result.outcome, Outcome::Failure);
        assert!((1..=20).contains(&result.roll));
    }
}
