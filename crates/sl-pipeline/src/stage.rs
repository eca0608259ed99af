//! Shared plumbing for oracle-backed stages.

use std::fmt;

use serde_json::Value;
use sl_core::{Fields, Normalize};
use sl_oracle::Oracle;

/// The oracle-backed pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The intent guard.
    Guard,
    /// The world authority.
    World,
    /// The rules resolver.
    Rules,
    /// The narrator.
    Narrator,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guard => write!(f, "guard"),
            Self::World => write!(f, "world"),
            Self::Rules => write!(f, "rules"),
            Self::Narrator => write!(f, "narrator"),
        }
    }
}

/// Encode a stage payload the way every stage sends it.
pub(crate) fn encode_payload(payload: &Value) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
}

/// Ask the oracle and decode the reply. Transport errors and malformed
/// replies both end in `T::fail_safe()`.
pub(crate) fn consult<T: Normalize>(
    oracle: &dyn Oracle,
    stage: Stage,
    prompt: &str,
    payload: &Value,
) -> T {
    match oracle.generate(prompt, &encode_payload(payload)) {
        Ok(raw) => {
            if Fields::parse(&raw).is_none() {
                tracing::warn!(%stage, reply_len = raw.len(), "malformed oracle reply, using fail-safe");
            }
            T::normalize(&raw)
        }
        Err(e) => {
            tracing::warn!(%stage, error = %e, "oracle unavailable, using fail-safe");
            T::fail_safe()
        }
    }
}
