//! An oracle that replays canned replies.
//!
//! Every call pops the next scripted reply and records the request, so tests
//! can assert both what a stage did with a reply and what it sent.

use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::Value;

use crate::Oracle;
use crate::error::{OracleError, OracleResult};

/// One recorded oracle request.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleRequest {
    /// The system prompt sent.
    pub system_prompt: String,
    /// The payload sent.
    pub payload: String,
}

impl OracleRequest {
    /// The payload parsed as JSON, or `Null` if it is not JSON.
    pub fn payload_json(&self) -> Value {
        serde_json::from_str(&self.payload).unwrap_or(Value::Null)
    }
}

/// Replays scripted replies in order. `None` entries simulate an
/// unreachable oracle.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    replies: RefCell<VecDeque<Option<String>>>,
    requests: RefCell<Vec<OracleRequest>>,
}

impl ScriptedOracle {
    /// An oracle with no replies queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply.
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.replies.borrow_mut().push_back(Some(text.into()));
        self
    }

    /// Queue a JSON reply.
    pub fn reply_json(self, value: Value) -> Self {
        self.reply(value.to_string())
    }

    /// Queue a transport failure.
    pub fn fail(self) -> Self {
        self.replies.borrow_mut().push_back(None);
        self
    }

    /// Replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.replies.borrow().len()
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<OracleRequest> {
        self.requests.borrow().clone()
    }
}

impl Oracle for ScriptedOracle {
    fn generate(&self, system_prompt: &str, payload: &str) -> OracleResult<String> {
        self.requests.borrow_mut().push(OracleRequest {
            system_prompt: system_prompt.to_string(),
            payload: payload.to_string(),
        });

        match self.replies.borrow_mut().pop_front() {
            Some(Some(text)) => Ok(text),
            Some(None) => Err(OracleError::Unavailable("scripted failure".to_string())),
            None => Err(OracleError::Unavailable("no scripted reply left".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn replays_in_order_and_records() {
        let oracle = ScriptedOracle::new()
            .reply("first")
            .reply_json(json!({"allowed": true}))
            .fail();
        assert_eq!(oracle.remaining(), 3);

        assert_eq!(oracle.generate("a", "{\"n\": 1}").unwrap(), "first");
        assert_eq!(oracle.generate("b", "2").unwrap(), r#"{"allowed":true}"#);
        assert!(oracle.generate("c", "3").is_err());
        assert!(matches!(
            oracle.generate("d", "4"),
            Err(OracleError::Unavailable(_))
        ));

        let requests = oracle.requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[0].system_prompt, "a");
        assert_eq!(requests[0].payload_json()["n"], 1);
        assert_eq!(oracle.remaining(), 0);
    }

    #[test]
    fn works_through_references() {
        fn ask(oracle: &dyn Oracle) -> String {
            oracle.generate("sys", "{}").unwrap()
        }
        let oracle = ScriptedOracle::new().reply("ok");
        assert_eq!(ask(&oracle), "ok");
    }
}
