//! Pipeline configuration.

use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::PipelineResult;
use crate::prompts::PromptSet;

/// Configuration for a [`GameMaster`](crate::GameMaster).
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Fixed dice seed. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Directory holding prompt overrides.
    pub prompts_dir: Option<PathBuf>,
}

impl PipelineConfig {
    /// Fix the dice seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load prompts from `dir`.
    pub fn with_prompts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.prompts_dir = Some(dir.into());
        self
    }

    /// The dice generator this configuration asks for.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// The prompts this configuration asks for.
    pub fn prompts(&self) -> PipelineResult<PromptSet> {
        match &self.prompts_dir {
            Some(dir) => PromptSet::from_dir(dir),
            None => Ok(PromptSet::default()),
        }
    }
}
