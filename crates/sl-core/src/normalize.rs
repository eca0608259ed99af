//! Default-filling decoders for oracle replies.
//!
//! Oracle replies are untrusted text. [`Normalize::normalize`] turns one into
//! a fully populated stage value: fields that are missing, null, or of the
//! wrong type take the stage's schema default, and text that is not a JSON
//! object yields the stage's fail-safe value. Decoding never fails.
//!
//! The fail-safe dispositions differ per stage:
//!
//! | Stage | Fail-safe |
//! |-------|-----------|
//! | guard | open: allowed, no category |
//! | world | closed: not plausible, no effects |
//! | rules | closed: failure, difficulty 12, no effects |

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::stage::{
    DEFAULT_DIFFICULTY, MechanicalEffects, Outcome, RiskLevel, RulesResult, WorldEffects,
    WorldResult,
};

/// A stage value that can be decoded from raw oracle text without failing.
pub trait Normalize: Sized {
    /// The value used when the reply cannot be parsed at all.
    fn fail_safe() -> Self;

    /// Build a value from a parsed reply, defaulting every missing field.
    fn from_fields(fields: &Fields) -> Self;

    /// Decode raw oracle text.
    fn normalize(raw: &str) -> Self {
        match Fields::parse(raw) {
            Some(fields) => Self::from_fields(&fields),
            None => Self::fail_safe(),
        }
    }
}

/// A parsed oracle reply object with lenient, defaulting accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Map<String, Value>);

impl Fields {
    /// Parse raw text. Returns `None` unless it is a JSON object.
    pub fn parse(raw: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(Value::Object(map)) => Some(Self(map)),
            _ => None,
        }
    }

    /// Wrap an already parsed object.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// A strict boolean. Only JSON booleans and the strings `"true"` and
    /// `"false"` count; anything else yields the default.
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => true,
                "false" => false,
                _ => default,
            },
            _ => default,
        }
    }

    /// A string. Numbers and booleans are rendered as text; other types
    /// fall back to the default.
    pub fn str_or(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
            _ => default.to_string(),
        }
    }

    /// An integer. Floats are truncated and numeric strings are parsed.
    pub fn int_or(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(default),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            Some(Value::Bool(b)) => i64::from(*b),
            _ => default,
        }
    }

    /// A non-empty string, or `None`.
    pub fn optional_str(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }

    /// A nested object. Missing or non-object values yield an empty one.
    pub fn object(&self, key: &str) -> Fields {
        match self.get(key) {
            Some(Value::Object(map)) => Fields(map.clone()),
            _ => Fields::default(),
        }
    }

    /// The object elements of an array, in order.
    pub fn records(&self, key: &str) -> Vec<Value> {
        match self.get(key) {
            Some(Value::Array(items)) => items.iter().filter(|v| v.is_object()).cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// The string elements of an array, in order.
    pub fn strings(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// A string-to-boolean map with truthiness-coerced values.
    pub fn flags(&self, key: &str) -> BTreeMap<String, bool> {
        match self.get(key) {
            Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), truthy(v))).collect(),
            _ => BTreeMap::new(),
        }
    }
}

/// JSON truthiness: null, `false`, zero, and empty strings, arrays, and
/// objects are false; everything else is true.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// The guard's reply before the veto policy is applied.
///
/// The category is kept as free text because unknown categories must reach
/// the policy, which softens them.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardReply {
    /// Whether the oracle allowed the action.
    pub allowed: bool,
    /// The oracle's block category, lowercased.
    pub block_category: String,
    /// The oracle's explanation.
    pub reason: String,
    /// The oracle's risk assessment.
    pub risk_level: RiskLevel,
}

impl Normalize for GuardReply {
    fn fail_safe() -> Self {
        Self {
            allowed: true,
            block_category: "none".to_string(),
            reason: "Guard output invalid; defaulting to permissive mode.".to_string(),
            risk_level: RiskLevel::Low,
        }
    }

    fn from_fields(fields: &Fields) -> Self {
        Self {
            allowed: fields.bool_or("allowed", true),
            block_category: fields.str_or("block_category", "none").trim().to_lowercase(),
            reason: fields.str_or("reason", "Action accepted."),
            risk_level: RiskLevel::parse(&fields.str_or("risk_level", "low")).unwrap_or_default(),
        }
    }
}

impl Normalize for WorldResult {
    fn fail_safe() -> Self {
        Self {
            plausible: false,
            reason: "validation output invalid".to_string(),
            world_effects: WorldEffects::default(),
        }
    }

    fn from_fields(fields: &Fields) -> Self {
        let effects = fields.object("world_effects");
        Self {
            plausible: fields.bool_or("plausible", false),
            reason: fields.str_or("reason", "No reason provided."),
            world_effects: WorldEffects {
                location_change: effects.optional_str("location_change"),
                npc_updates: effects.records("npc_updates"),
                flag_updates: effects.flags("flag_updates"),
            },
        }
    }
}

impl Normalize for RulesResult {
    fn fail_safe() -> Self {
        Self {
            reasoning: "Rules output invalid; defaulting to safe failure.".to_string(),
            ..Self::default()
        }
    }

    /// The roll is left at zero; the resolver overwrites it with its own draw.
    fn from_fields(fields: &Fields) -> Self {
        let effects = fields.object("mechanical_effects");
        Self {
            outcome: Outcome::parse(&fields.str_or("outcome", "failure")).unwrap_or_default(),
            difficulty: fields.int_or("difficulty", DEFAULT_DIFFICULTY),
            roll: 0,
            mechanical_effects: MechanicalEffects {
                hp_delta: effects.int_or("hp_delta", 0),
                xp_delta: effects.int_or("xp_delta", 0),
                inventory_changes: effects.strings("inventory_changes"),
                new_flags: effects.flags("new_flags"),
            },
            reasoning: fields.str_or("reasoning", ""),
        }
    }
}
