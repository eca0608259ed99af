//! Core types for Spielleiter: the persistent game record and everything that
//! touches it without talking to an oracle.
//!
//! This crate owns the [`GameState`] record, the typed stage results produced
//! by the turn pipeline, the default-filling decoders that turn untrusted
//! oracle text into those results, the player-visible [`ObservableContext`]
//! projection, the deterministic effect applicator, and the [`StateStore`]
//! that persists the record as a single JSON document.

/// Deterministic application of stage effects to the game state.
pub mod effects;
/// Error types used throughout the crate.
pub mod error;
/// Importing rules and scenario documents into the game state.
pub mod import;
/// The append-only turn log.
pub mod log;
/// Default-filling decoders for oracle replies.
pub mod normalize;
/// The player-visible projection of the game state.
pub mod observable;
/// Typed results of the guard, world, and rules stages.
pub mod stage;
/// The persistent game record.
pub mod state;
/// Loading, saving, and resetting the persisted record.
pub mod store;

pub use effects::{InventoryChange, apply_effects};
pub use error::{ImportError, ImportResult, StoreError, StoreResult};
pub use log::{TurnLogEntry, TurnOutcome};
pub use normalize::{Fields, GuardReply, Normalize, truthy};
pub use observable::{HISTORY_WINDOW, ObservableContext, SECRET_FLAG_PREFIX, project};
pub use stage::{
    BlockCategory, GuardResult, MechanicalEffects, Outcome, RiskLevel, RulesResult, WorldEffects,
    WorldResult,
};
pub use state::{Character, GameState, WorldState};
pub use store::StateStore;
