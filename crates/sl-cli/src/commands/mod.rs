pub mod import;
pub mod init;
pub mod ping;
pub mod play;
pub mod reset;
pub mod show;
pub mod turn;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use sl_core::StateStore;
use sl_oracle::config::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use sl_oracle::{OllamaClient, OracleConfig};
use sl_pipeline::{GameMaster, PipelineConfig};

/// Where and how to reach the oracle.
#[derive(Args)]
pub struct OracleArgs {
    /// Base URL of the Ollama server
    #[arg(long, env = "SL_ORACLE_URL", default_value = DEFAULT_BASE_URL)]
    pub oracle_url: String,

    /// Model to generate with
    #[arg(long, env = "SL_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "120")]
    pub timeout: u64,
}

impl OracleArgs {
    pub fn client(&self) -> Result<OllamaClient, String> {
        let config = OracleConfig::default()
            .with_base_url(&self.oracle_url)
            .with_model(&self.model)
            .with_timeout(Duration::from_secs(self.timeout));
        OllamaClient::new(config).map_err(|e| format!("cannot set up oracle client: {e}"))
    }
}

/// Pipeline knobs shared by `play` and `turn`.
#[derive(Args)]
pub struct PipelineArgs {
    /// Directory with prompt overrides (missing files use built-in prompts)
    #[arg(long, env = "SL_PROMPTS", default_value = "prompts")]
    pub prompts: PathBuf,

    /// RNG seed for reproducible dice
    #[arg(long)]
    pub seed: Option<u64>,
}

impl PipelineArgs {
    fn config(&self) -> PipelineConfig {
        let config = PipelineConfig::default().with_prompts_dir(&self.prompts);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

pub fn open_store(state: &Path, template: Option<&Path>) -> StateStore {
    let store = StateStore::new(state);
    match template {
        Some(template) => store.with_template(template),
        None => store,
    }
}

fn game_master(
    store: StateStore,
    oracle: &OracleArgs,
    pipeline: &PipelineArgs,
) -> Result<GameMaster<OllamaClient>, String> {
    let client = oracle.client()?;
    GameMaster::new(store, client, &pipeline.config()).map_err(|e| e.to_string())
}
