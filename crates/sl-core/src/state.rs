use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::log::TurnLogEntry;
use crate::normalize::truthy;

/// The single persistent game record.
///
/// Every section defaults when absent so partially written records still
/// load. Keys the pipeline does not know about are kept in `extra` and written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// The player character.
    #[serde(default)]
    pub character: Character,
    /// Player-visible world fields.
    #[serde(default)]
    pub world: WorldState,
    /// Scenario reference material and progression, passed through opaquely.
    #[serde(default = "empty_object")]
    pub scenario: Value,
    /// Rules reference material, passed through opaquely.
    #[serde(default = "empty_object")]
    pub rules: Value,
    /// World state the player must never see.
    #[serde(default = "empty_object")]
    pub hidden: Value,
    /// Boolean story flags. Values of any JSON type are coerced on load.
    #[serde(default, deserialize_with = "coerce_flags")]
    pub flags: BTreeMap<String, bool>,
    #[serde(default)]
    log: Vec<TurnLogEntry>,
    /// Unrecognised top-level keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Character::default(), WorldState::default())
    }
}

impl GameState {
    /// Create a state with the given character and world and empty sections.
    pub fn new(character: Character, world: WorldState) -> Self {
        Self {
            character,
            world,
            scenario: empty_object(),
            rules: empty_object(),
            hidden: empty_object(),
            flags: BTreeMap::new(),
            log: Vec::new(),
            extra: Map::new(),
        }
    }

    /// All recorded turns, oldest first.
    pub fn log(&self) -> &[TurnLogEntry] {
        &self.log
    }

    /// The last `n` recorded turns, oldest first.
    pub fn recent_turns(&self, n: usize) -> &[TurnLogEntry] {
        let start = self.log.len().saturating_sub(n);
        &self.log[start..]
    }

    /// Append a turn to the log. Entries cannot be changed once recorded.
    pub fn record_turn(&mut self, entry: TurnLogEntry) {
        self.log.push(entry);
    }
}

/// The player character sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    /// Character name.
    pub name: String,
    /// Character class.
    pub class: String,
    /// Character level.
    #[serde(deserialize_with = "lenient_level")]
    pub level: u32,
    /// Current hit points, kept within `0..=max_hp`.
    #[serde(deserialize_with = "lenient_int")]
    pub hp: i64,
    /// Maximum hit points.
    #[serde(deserialize_with = "lenient_int")]
    pub max_hp: i64,
    /// Named numeric attributes (strength, wits, ...).
    pub stats: BTreeMap<String, Number>,
    /// Carried items in pickup order. Duplicates are allowed.
    pub inventory: Vec<String>,
    /// Experience points, never negative.
    #[serde(deserialize_with = "lenient_int")]
    pub xp: i64,
    /// Unrecognised character keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            name: String::new(),
            class: String::new(),
            level: 1,
            hp: 0,
            max_hp: 0,
            stats: BTreeMap::new(),
            inventory: Vec::new(),
            xp: 0,
            extra: Map::new(),
        }
    }
}

impl Character {
    /// Create a level 1 character at full health.
    pub fn new(name: impl Into<String>, max_hp: i64) -> Self {
        Self {
            name: name.into(),
            hp: max_hp,
            max_hp,
            ..Self::default()
        }
    }
}

/// The world section of the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldState {
    /// Where the player currently is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_location: Option<String>,
    /// NPCs the player has met.
    pub known_npcs: Vec<Value>,
    /// Factions the player knows about.
    pub factions: Vec<Value>,
    /// Free-form description of what the player can currently see.
    pub visible_scene: Value,
    /// Unrecognised world keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for WorldState {
    fn default() -> Self {
        Self {
            current_location: None,
            known_npcs: Vec::new(),
            factions: Vec::new(),
            visible_scene: empty_object(),
            extra: Map::new(),
        }
    }
}

impl WorldState {
    /// Create a world section with the player at `location`.
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            current_location: Some(location.into()),
            ..Self::default()
        }
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn coerce_flags<'de, D>(deserializer: D) -> Result<BTreeMap<String, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Map<String, Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .map(|(key, value)| (key.clone(), truthy(value)))
        .collect())
}

/// Whole-number reading of a JSON number or numeric string. Floats are
/// truncated toward zero and out-of-range values saturate.
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}

fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(0);
    }
    coerce_int(&value)
        .ok_or_else(|| D::Error::custom(format!("expected a number, found {value}")))
}

fn lenient_level<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(1);
    }
    let level = coerce_int(&value)
        .ok_or_else(|| D::Error::custom(format!("expected a level, found {value}")))?;
    Ok(u32::try_from(level.max(0)).unwrap_or(u32::MAX))
}
