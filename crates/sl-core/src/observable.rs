//! The player-visible projection of the game state.
//!
//! [`project`] is the only way the pipeline builds context for the guard, the
//! rules stage, and the narrator. It copies named fields out of the record, so
//! anything not listed here (the `hidden` section, scenario material, unknown
//! keys, secret flags) cannot leak into it. Build a fresh projection whenever
//! the state changes; never keep one across a mutation.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Number, Value};

use crate::log::TurnLogEntry;
use crate::state::GameState;

/// Flags whose key starts with this prefix are never shown to the player.
pub const SECRET_FLAG_PREFIX: &str = "secret_";

/// Number of recent turns included in the projection.
pub const HISTORY_WINDOW: usize = 8;

/// What the player character can observe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservableContext {
    /// The character sheet.
    pub character: CharacterView,
    /// The visible parts of the world.
    pub world: WorldView,
    /// Non-secret flags.
    pub flags: BTreeMap<String, bool>,
    /// The most recent turns, oldest first.
    pub log: Vec<TurnLogEntry>,
}

/// Character sheet as seen by the player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterView {
    /// Character name.
    pub name: String,
    /// Character class.
    pub class: String,
    /// Character level.
    pub level: u32,
    /// Current hit points.
    pub hp: i64,
    /// Maximum hit points.
    pub max_hp: i64,
    /// Named attributes.
    pub stats: BTreeMap<String, Number>,
    /// Carried items.
    pub inventory: Vec<String>,
    /// Experience points.
    pub xp: i64,
}

/// World fields the player can see.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldView {
    /// Where the player is.
    pub current_location: Option<String>,
    /// NPCs the player has met.
    pub known_npcs: Vec<Value>,
    /// Factions the player knows about.
    pub factions: Vec<Value>,
    /// What the player can currently see.
    pub visible_scene: Value,
}

/// Derive the player-visible projection of `state`.
pub fn project(state: &GameState) -> ObservableContext {
    ObservableContext::from(state)
}

impl From<&GameState> for ObservableContext {
    fn from(state: &GameState) -> Self {
        let character = &state.character;
        let world = &state.world;

        ObservableContext {
            character: CharacterView {
                name: character.name.clone(),
                class: character.class.clone(),
                level: character.level,
                hp: character.hp,
                max_hp: character.max_hp,
                stats: character.stats.clone(),
                inventory: character.inventory.clone(),
                xp: character.xp,
            },
            world: WorldView {
                current_location: world.current_location.clone(),
                known_npcs: world.known_npcs.clone(),
                factions: world.factions.clone(),
                visible_scene: world.visible_scene.clone(),
            },
            flags: state
                .flags
                .iter()
                .filter(|(key, _)| !key.starts_with(SECRET_FLAG_PREFIX))
                .map(|(key, value)| (key.clone(), *value))
                .collect(),
            log: state.recent_turns(HISTORY_WINDOW).to_vec(),
        }
    }
}

impl ObservableContext {
    /// Render the projection as a JSON value for oracle payloads.
    pub fn to_value(&self) -> Value {
        // Every field is plain data with string keys, so encoding cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
