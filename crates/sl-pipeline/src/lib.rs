//! Turn-resolution pipeline for Spielleiter.
//!
//! A player action passes through an intent guard, a world authority that
//! can see hidden state, and a rules resolver that rolls a d20 and proposes
//! mechanical effects. Accepted effects are applied to the persisted game
//! state, the turn is logged, and a narrator renders the result. Any stage
//! may veto; every oracle failure degrades to a documented safe default.

pub mod config;
pub mod error;
pub mod game_master;
pub mod guard;
pub mod narrator;
pub mod policy;
pub mod prompts;
pub mod reset;
pub mod response;
pub mod rules;
pub mod stage;
pub mod world;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use game_master::GameMaster;
pub use guard::IntentGuard;
pub use narrator::Narrator;
pub use policy::VetoPolicy;
pub use prompts::PromptSet;
pub use reset::{RESET_ALIASES, RESET_CONFIRMATION, is_reset_command};
pub use response::{TurnResponse, TurnStatus};
pub use rules::RulesResolver;
pub use world::WorldAuthority;
