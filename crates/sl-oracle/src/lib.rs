//! Oracle clients for Spielleiter.
//!
//! The turn pipeline treats text generation as an opaque, untrusted function
//! behind the [`Oracle`] trait. This crate provides the trait, an
//! [`OllamaClient`] that talks to a local Ollama server over blocking HTTP,
//! and a [`ScriptedOracle`] that replays canned replies for tests.

pub mod config;
pub mod error;
pub mod ollama;
pub mod scripted;

pub use config::OracleConfig;
pub use error::{OracleError, OracleResult};
pub use ollama::OllamaClient;
pub use scripted::{OracleRequest, ScriptedOracle};

/// A text-generation service.
///
/// Implementations may fail or return text that is not what was asked for;
/// callers must normalize whatever comes back.
pub trait Oracle {
    /// Generate a reply to `payload` under `system_prompt`.
    fn generate(&self, system_prompt: &str, payload: &str) -> OracleResult<String>;
}

impl<O: Oracle + ?Sized> Oracle for &O {
    fn generate(&self, system_prompt: &str, payload: &str) -> OracleResult<String> {
        (**self).generate(system_prompt, payload)
    }
}

impl<O: Oracle + ?Sized> Oracle for Box<O> {
    fn generate(&self, system_prompt: &str, payload: &str) -> OracleResult<String> {
        (**self).generate(system_prompt, payload)
    }
}
