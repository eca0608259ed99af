//! The guard's veto policy.
//!
//! The guard oracle may veto anything, but only some vetoes stand. A
//! `metagaming` veto is always honored. An `impossible` veto stands only when
//! the action text itself names a clearly impossible act from a closed list;
//! every other veto is softened to an allow. Impossible-but-unlisted actions
//! still reach the world authority, which can reject them with full knowledge
//! of the world.

use sl_core::{BlockCategory, GuardReply, GuardResult, RiskLevel};

/// Phrases that mark an action as clearly impossible.
pub const IMPOSSIBLE_MARKERS: &[&str] = &[
    "teleport",
    "time travel",
    "phase through",
    "walk through wall",
    "become immortal",
    "become a god",
    "spawn item",
    "noclip",
    "fly to the moon",
];

/// Reason recorded when an `impossible` veto is softened.
pub const SOFTENED_IMPOSSIBLE: &str = "softened: not clearly impossible";

/// Reason recorded when a veto of any other category is softened.
pub const SOFTENED_OTHER: &str = "softened: unusual but still possible";

/// Decides which guard vetoes stand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VetoPolicy {
    markers: Vec<String>,
}

impl Default for VetoPolicy {
    fn default() -> Self {
        Self::new(IMPOSSIBLE_MARKERS.iter().copied())
    }
}

impl VetoPolicy {
    /// A policy with a custom marker list. Markers match case-insensitively.
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers
                .into_iter()
                .map(|m| m.into().to_lowercase())
                .collect(),
        }
    }

    /// The impossibility markers.
    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    /// Whether the action text names a clearly impossible act.
    pub fn is_clearly_impossible(&self, action: &str) -> bool {
        let lowered = action.to_lowercase();
        self.markers.iter().any(|m| lowered.contains(m.as_str()))
    }

    /// Turn the guard oracle's reply into a final verdict.
    pub fn adjudicate(&self, action: &str, reply: GuardReply) -> GuardResult {
        let category = BlockCategory::parse(&reply.block_category);

        if reply.allowed {
            return GuardResult {
                allowed: true,
                block_category: category.unwrap_or_default(),
                reason: reply.reason,
                risk_level: reply.risk_level,
            };
        }

        match category {
            Some(BlockCategory::Metagaming) => {
                GuardResult::block(BlockCategory::Metagaming, reply.reason, reply.risk_level)
            }
            Some(BlockCategory::Impossible) if self.is_clearly_impossible(action) => {
                GuardResult::block(BlockCategory::Impossible, reply.reason, reply.risk_level)
            }
            Some(BlockCategory::Impossible) => {
                tracing::info!(action = %action, "softening impossible veto");
                soften(SOFTENED_IMPOSSIBLE)
            }
            _ => {
                tracing::info!(action = %action, category = %reply.block_category, "softening veto");
                soften(SOFTENED_OTHER)
            }
        }
    }
}

fn soften(reason: &str) -> GuardResult {
    GuardResult {
        allowed: true,
        block_category: BlockCategory::None,
        reason: reason.to_string(),
        risk_level: RiskLevel::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn veto(category: &str) -> GuardReply {
        GuardReply {
            allowed: false,
            block_category: category.to_string(),
            reason: "The oracle objects.".to_string(),
            risk_level: RiskLevel::High,
        }
    }

    #[test]
    fn markers_match_case_insensitively() {
        let policy = VetoPolicy::default();
        assert!(policy.is_clearly_impossible("I NoClip into the vault"));
        assert!(policy.is_clearly_impossible("teleport behind the guard"));
        assert!(!policy.is_clearly_impossible("negotiate with the guard"));
    }

    #[test]
    fn impossible_with_marker_stands() {
        let verdict = VetoPolicy::default().adjudicate("noclip through the gate", veto("impossible"));
        assert!(!verdict.allowed);
        assert_eq!(verdict.block_category, BlockCategory::Impossible);
        assert_eq!(verdict.risk_level, RiskLevel::High);
    }

    #[test]
    fn metagaming_stands_without_marker() {
        let verdict = VetoPolicy::default().adjudicate(
            "I know from the module that the mayor is the traitor",
            veto("metagaming"),
        );
        assert!(!verdict.allowed);
        assert_eq!(verdict.block_category, BlockCategory::Metagaming);
    }

    #[test]
    fn metagaming_stands_with_marker() {
        let verdict = VetoPolicy::default().adjudicate("noclip to the GM screen", veto("metagaming"));
        assert!(!verdict.allowed);
        assert_eq!(verdict.block_category, BlockCategory::Metagaming);
    }

    #[test]
    fn impossible_without_marker_is_softened() {
        let verdict = VetoPolicy::default().adjudicate("negotiate with the guard", veto("impossible"));
        assert!(verdict.allowed);
        assert_eq!(verdict.block_category, BlockCategory::None);
        assert_eq!(verdict.reason, SOFTENED_IMPOSSIBLE);
        assert_eq!(verdict.risk_level, RiskLevel::Low);
    }

    #[test]
    fn other_vetoes_are_softened() {
        let policy = VetoPolicy::default();
        for category in ["rude", "none", ""] {
            let verdict = policy.adjudicate("insult the duke", veto(category));
            assert!(verdict.allowed, "category {category:?} should be softened");
            assert_eq!(verdict.reason, SOFTENED_OTHER);
        }
    }

    #[test]
    fn allowed_reply_passes_through() {
        let reply = GuardReply {
            allowed: true,
            block_category: "none".to_string(),
            reason: "Fine.".to_string(),
            risk_level: RiskLevel::Medium,
        };
        let verdict = VetoPolicy::default().adjudicate("climb the wall", reply);
        assert!(verdict.allowed);
        assert_eq!(verdict.reason, "Fine.");
        assert_eq!(verdict.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn custom_markers() {
        let policy = VetoPolicy::new(["Summon Meteor"]);
        assert_eq!(policy.markers(), ["summon meteor"]);
        assert!(!policy.adjudicate("summon meteor", veto("impossible")).allowed);
        assert!(policy.adjudicate("teleport", veto("impossible")).allowed);
    }
}
