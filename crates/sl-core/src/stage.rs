//! Typed results of the guard, world, and rules stages.
//!
//! Each result is always fully populated. The `Default` impls are the schema
//! defaults used when an oracle reply omits a field; the fail-safe values used
//! for unparseable replies live in [`crate::normalize`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Why the guard vetoed an action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockCategory {
    /// The action is physically impossible.
    Impossible,
    /// The action uses out-of-character knowledge.
    Metagaming,
    /// No veto category.
    #[default]
    None,
}

impl BlockCategory {
    /// Parse a category name. Unknown names yield `None` (the Rust option).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "impossible" => Some(Self::Impossible),
            "metagaming" => Some(Self::Metagaming),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

impl fmt::Display for BlockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Impossible => write!(f, "impossible"),
            Self::Metagaming => write!(f, "metagaming"),
            Self::None => write!(f, "none"),
        }
    }
}

/// How risky the guard considers an action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Routine.
    #[default]
    Low,
    /// Noticeably risky.
    Medium,
    /// Dangerous.
    High,
}

impl RiskLevel {
    /// Parse a risk level name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// The intent guard's verdict on an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardResult {
    /// Whether the action may proceed.
    pub allowed: bool,
    /// Why the action was blocked, if it was.
    pub block_category: BlockCategory,
    /// Human-readable explanation.
    pub reason: String,
    /// Assessed risk.
    pub risk_level: RiskLevel,
}

impl Default for GuardResult {
    fn default() -> Self {
        Self {
            allowed: true,
            block_category: BlockCategory::None,
            reason: "Action accepted.".to_string(),
            risk_level: RiskLevel::Low,
        }
    }
}

impl GuardResult {
    /// An allowed verdict with the given reason.
    pub fn allow(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            ..Self::default()
        }
    }

    /// A veto in the given category.
    pub fn block(
        category: BlockCategory,
        reason: impl Into<String>,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            allowed: false,
            block_category: category,
            reason: reason.into(),
            risk_level,
        }
    }
}

/// World changes proposed by the world authority.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldEffects {
    /// New player location, if the action moves the player.
    pub location_change: Option<String>,
    /// NPC record updates, in the order proposed.
    pub npc_updates: Vec<Value>,
    /// Flag changes, applied after the rules stage's flags.
    pub flag_updates: BTreeMap<String, bool>,
}

impl WorldEffects {
    /// Whether the effects change nothing.
    pub fn is_empty(&self) -> bool {
        self.location_change.is_none() && self.npc_updates.is_empty() && self.flag_updates.is_empty()
    }
}

/// The world authority's plausibility verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldResult {
    /// Whether the action is plausible in the world.
    pub plausible: bool,
    /// Human-readable explanation.
    pub reason: String,
    /// Proposed world changes.
    pub world_effects: WorldEffects,
}

impl Default for WorldResult {
    fn default() -> Self {
        Self {
            plausible: false,
            reason: "No reason provided.".to_string(),
            world_effects: WorldEffects::default(),
        }
    }
}

impl WorldResult {
    /// A plausible verdict with the given effects.
    pub fn plausible(reason: impl Into<String>, world_effects: WorldEffects) -> Self {
        Self {
            plausible: true,
            reason: reason.into(),
            world_effects,
        }
    }
}

/// Quality of a resolved action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The action fully succeeded.
    Success,
    /// The action succeeded at a cost.
    PartialSuccess,
    /// The action failed.
    #[default]
    Failure,
}

impl Outcome {
    /// Parse an outcome name. Accepts `partial success` and `partial-success`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "success" => Some(Self::Success),
            "partial_success" => Some(Self::PartialSuccess),
            "failure" => Some(Self::Failure),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::PartialSuccess => write!(f, "partial success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// Mechanical consequences of a resolved action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MechanicalEffects {
    /// Change in hit points.
    pub hp_delta: i64,
    /// Change in experience.
    pub xp_delta: i64,
    /// Signed item tokens: `+name` adds, `-name` removes one.
    pub inventory_changes: Vec<String>,
    /// Flags set by the rules stage.
    pub new_flags: BTreeMap<String, bool>,
}

impl MechanicalEffects {
    /// Whether the effects change nothing.
    pub fn is_empty(&self) -> bool {
        self.hp_delta == 0
            && self.xp_delta == 0
            && self.inventory_changes.is_empty()
            && self.new_flags.is_empty()
    }
}

/// The rules resolver's mechanical ruling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesResult {
    /// How well the action went.
    pub outcome: Outcome,
    /// Target number for the check.
    pub difficulty: i64,
    /// The locally drawn d20 (1-20).
    #[serde(alias = "d20_roll")]
    pub roll: u32,
    /// State changes to apply.
    pub mechanical_effects: MechanicalEffects,
    /// Short rules-focused explanation.
    pub reasoning: String,
}

impl Default for RulesResult {
    fn default() -> Self {
        Self {
            outcome: Outcome::Failure,
            difficulty: DEFAULT_DIFFICULTY,
            roll: 0,
            mechanical_effects: MechanicalEffects::default(),
            reasoning: String::new(),
        }
    }
}

/// Difficulty used when the rules oracle does not name one.
pub const DEFAULT_DIFFICULTY: i64 = 12;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_categories() {
        assert_eq!(BlockCategory::parse("Metagaming"), Some(BlockCategory::Metagaming));
        assert_eq!(BlockCategory::parse(" impossible "), Some(BlockCategory::Impossible));
        assert_eq!(BlockCategory::parse("none"), Some(BlockCategory::None));
        assert_eq!(BlockCategory::parse("rude"), None);
    }

    #[test]
    fn parse_outcomes() {
        assert_eq!(Outcome::parse("partial_success"), Some(Outcome::PartialSuccess));
        assert_eq!(Outcome::parse("Partial Success"), Some(Outcome::PartialSuccess));
        assert_eq!(Outcome::parse("SUCCESS"), Some(Outcome::Success));
        assert_eq!(Outcome::parse("crit"), None);
    }

    #[test]
    fn rules_result_accepts_legacy_roll_key() {
        let r: RulesResult = serde_json::from_value(json!({
            "outcome": "success",
            "difficulty": 10,
            "d20_roll": 17
        }))
        .unwrap();
        assert_eq!(r.roll, 17);
        assert_eq!(r.outcome, Outcome::Success);
        assert!(r.mechanical_effects.is_empty());
    }

    #[test]
    fn serialized_names_are_snake_case() {
        let v = serde_json::to_value(Outcome::PartialSuccess).unwrap();
        assert_eq!(v, "partial_success");
        let v = serde_json::to_value(GuardResult::default()).unwrap();
        assert_eq!(v["block_category"], "none");
        assert_eq!(v["risk_level"], "low");
    }

    #[test]
    fn display_names() {
        assert_eq!(Outcome::PartialSuccess.to_string(), "partial success");
        assert_eq!(RiskLevel::High.to_string(), "high");
        assert_eq!(BlockCategory::Metagaming.to_string(), "metagaming");
    }
}
