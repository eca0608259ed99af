use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stage::{GuardResult, RulesResult, WorldResult};

/// How a turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    /// The guard vetoed the action.
    Blocked,
    /// The world authority found the action implausible.
    Implausible,
    /// The action went through all stages and its effects were applied.
    Resolved,
}

impl std::fmt::Display for TurnOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blocked => write!(f, "blocked"),
            Self::Implausible => write!(f, "implausible"),
            Self::Resolved => write!(f, "resolved"),
        }
    }
}

/// One audited turn. Built once by the orchestrator and never changed after
/// it is recorded in the game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnLogEntry {
    /// The player's action text.
    pub action: String,
    /// The guard's verdict.
    pub guard: GuardResult,
    /// The world authority's verdict, if the guard let the action through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world: Option<WorldResult>,
    /// The rules ruling, if the action was resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<RulesResult>,
    /// How the turn ended.
    pub result: TurnOutcome,
    /// When the turn was recorded. Absent in older records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl TurnLogEntry {
    /// A turn stopped by the guard.
    pub fn blocked(action: impl Into<String>, guard: GuardResult) -> Self {
        Self {
            action: action.into(),
            guard,
            world: None,
            rules: None,
            result: TurnOutcome::Blocked,
            timestamp: Some(Utc::now()),
        }
    }

    /// A turn stopped by the world authority.
    pub fn implausible(action: impl Into<String>, guard: GuardResult, world: WorldResult) -> Self {
        Self {
            action: action.into(),
            guard,
            world: Some(world),
            rules: None,
            result: TurnOutcome::Implausible,
            timestamp: Some(Utc::now()),
        }
    }

    /// A turn that passed every stage.
    pub fn resolved(
        action: impl Into<String>,
        guard: GuardResult,
        world: WorldResult,
        rules: RulesResult,
    ) -> Self {
        Self {
            action: action.into(),
            guard,
            world: Some(world),
            rules: Some(rules),
            result: TurnOutcome::Resolved,
            timestamp: Some(Utc::now()),
        }
    }
}
