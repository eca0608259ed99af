//! What a turn hands back to the caller.

use std::fmt;

use serde::Serialize;
use sl_core::{GuardResult, ObservableContext, RulesResult, WorldResult};

/// How a turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    /// The action was blank. Nothing happened.
    Empty,
    /// A reset was requested without confirmation.
    ResetConfirmationRequired,
    /// The game was reset from the template.
    ResetDone,
    /// The intent guard vetoed the action.
    GuardVeto,
    /// The world authority judged the action implausible.
    WorldVeto,
    /// The action was ruled on and narrated.
    Resolved,
}

impl fmt::Display for TurnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::ResetConfirmationRequired => write!(f, "reset_confirmation_required"),
            Self::ResetDone => write!(f, "reset_done"),
            Self::GuardVeto => write!(f, "guard_veto"),
            Self::WorldVeto => write!(f, "world_veto"),
            Self::Resolved => write!(f, "resolved"),
        }
    }
}

/// The result of one call to [`GameMaster::handle_action`](crate::GameMaster::handle_action).
///
/// Never carries hidden state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnResponse {
    /// How the turn ended.
    pub status: TurnStatus,
    /// Player-facing text: narration, veto reason, or notice.
    pub message: String,
    /// The guard verdict, when the guard ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guard: Option<GuardResult>,
    /// The world verdict, when the world authority ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world: Option<WorldResult>,
    /// The ruling, when the rules resolver ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<RulesResult>,
    /// The projection after the turn, when state changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observable: Option<ObservableContext>,
}

impl TurnResponse {
    fn notice(status: TurnStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            guard: None,
            world: None,
            rules: None,
            observable: None,
        }
    }

    pub(crate) fn empty() -> Self {
        Self::notice(TurnStatus::Empty, "Nothing happens. Say what your character does.")
    }

    pub(crate) fn reset_confirmation_required() -> Self {
        Self::notice(
            TurnStatus::ResetConfirmationRequired,
            "Resetting discards all progress. Confirm to reset the game.",
        )
    }

    pub(crate) fn reset_done(observable: ObservableContext) -> Self {
        Self {
            observable: Some(observable),
            ..Self::notice(TurnStatus::ResetDone, "The game has been reset.")
        }
    }

    pub(crate) fn guard_veto(guard: GuardResult) -> Self {
        Self {
            message: guard.reason.clone(),
            guard: Some(guard),
            ..Self::notice(TurnStatus::GuardVeto, "")
        }
    }

    pub(crate) fn world_veto(guard: GuardResult, world: WorldResult) -> Self {
        Self {
            message: world.reason.clone(),
            guard: Some(guard),
            world: Some(world),
            ..Self::notice(TurnStatus::WorldVeto, "")
        }
    }

    pub(crate) fn resolved(
        narration: String,
        guard: GuardResult,
        world: WorldResult,
        rules: RulesResult,
        observable: ObservableContext,
    ) -> Self {
        Self {
            status: TurnStatus::Resolved,
            message: narration,
            guard: Some(guard),
            world: Some(world),
            rules: Some(rules),
            observable: Some(observable),
        }
    }

    /// Whether the turn changed the stored game state.
    pub fn changed_state(&self) -> bool {
        !matches!(
            self.status,
            TurnStatus::Empty | TurnStatus::ResetConfirmationRequired
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_value(TurnStatus::ResetConfirmationRequired).unwrap();
        assert_eq!(json, "reset_confirmation_required");
        assert_eq!(TurnStatus::GuardVeto.to_string(), "guard_veto");
    }

    #[test]
    fn absent_stages_are_omitted() {
        let json = serde_json::to_value(TurnResponse::empty()).unwrap();
        assert_eq!(json["status"], "empty");
        assert!(json.get("guard").is_none());
        assert!(json.get("observable").is_none());
    }

    #[test]
    fn veto_message_is_reason() {
        let response = TurnResponse::guard_veto(GuardResult::allow("nope"));
        assert_eq!(response.message, "nope");
        assert!(response.changed_state());
        assert!(!TurnResponse::empty().changed_state());
    }
}
