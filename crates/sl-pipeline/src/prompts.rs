//! System prompts for the four oracle-backed stages.
//!
//! Prompts are plain text files in a prompts directory. Any file that is
//! missing falls back to the built-in text, so a campaign only needs to ship
//! the prompts it wants to change.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};

/// File name of the guard prompt.
pub const GUARD_FILE: &str = "guard.txt";
/// File name of the world authority prompt.
pub const WORLD_FILE: &str = "world.txt";
/// File name of the rules resolver prompt.
pub const RULES_FILE: &str = "rules.txt";
/// File name of the narrator prompt.
pub const NARRATOR_FILE: &str = "narrator.txt";

const DEFAULT_GUARD: &str = "\
You are the intent guard of a tabletop role-playing game.
Judge only whether the player's action is something their character could attempt.
Block with category \"metagaming\" when the player uses knowledge the character cannot have,
addresses the game master or the system, or tries to edit the game state directly.
Block with category \"impossible\" only for acts that break the world's physics outright.
Unusual, risky, rude, or unwise actions are allowed.
Reply with a single JSON object and nothing else.";

const DEFAULT_WORLD: &str = "\
You are the world authority of a tabletop role-playing game.
You see hidden state the player does not. Decide whether the action is plausible
in the world as it really is, given the scenario. Propose only the world changes
that follow directly from the action: a new location, NPC updates, flag updates.
Never reveal hidden state in your reason.
Reply with a single JSON object and nothing else.";

const DEFAULT_RULES: &str = "\
You are the rules arbiter of a tabletop role-playing game.
The player rolled the given d20. Set a difficulty, compare, and rule the outcome as
success, partial_success, or failure. Propose mechanical effects: hp_delta, xp_delta,
inventory changes written as +item or -item, and new boolean flags.
Keep effects proportionate to the action.
Reply with a single JSON object and nothing else.";

const DEFAULT_NARRATOR: &str = "\
You are the narrator of a tabletop role-playing game.
Describe what happens as a result of the player's action, following the ruling exactly.
Use only what the character can observe. Reply with prose only.";

/// The four stage prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    /// Intent guard prompt.
    pub guard: String,
    /// World authority prompt.
    pub world: String,
    /// Rules resolver prompt.
    pub rules: String,
    /// Narrator prompt.
    pub narrator: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            guard: DEFAULT_GUARD.to_string(),
            world: DEFAULT_WORLD.to_string(),
            rules: DEFAULT_RULES.to_string(),
            narrator: DEFAULT_NARRATOR.to_string(),
        }
    }
}

impl PromptSet {
    /// Load prompts from `dir`, using the built-in text for missing files.
    pub fn from_dir(dir: &Path) -> PipelineResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            guard: read_or(dir, GUARD_FILE, defaults.guard)?,
            world: read_or(dir, WORLD_FILE, defaults.world)?,
            rules: read_or(dir, RULES_FILE, defaults.rules)?,
            narrator: read_or(dir, NARRATOR_FILE, defaults.narrator)?,
        })
    }

    /// Each prompt paired with its file name.
    pub fn files(&self) -> [(&'static str, &str); 4] {
        [
            (GUARD_FILE, self.guard.as_str()),
            (WORLD_FILE, self.world.as_str()),
            (RULES_FILE, self.rules.as_str()),
            (NARRATOR_FILE, self.narrator.as_str()),
        ]
    }
}

fn read_or(dir: &Path, name: &str, default: String) -> PipelineResult<String> {
    let path = dir.join(name);
    match fs::read_to_string(&path) {
        Ok(text) if !text.trim().is_empty() => Ok(text),
        Ok(_) => Ok(default),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "prompt file missing, using built-in");
            Ok(default)
        }
        Err(source) => Err(PipelineError::Prompt { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_populated() {
        let prompts = PromptSet::default();
        for (name, text) in prompts.files() {
            assert!(name.ends_with(".txt"));
            assert!(!text.is_empty());
        }
    }

    #[test]
    fn missing_dir_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prompts = PromptSet::from_dir(&dir.path().join("nope")).unwrap();
        assert_eq!(prompts, PromptSet::default());
    }

    #[test]
    fn files_override_individually() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(GUARD_FILE), "custom guard").unwrap();
        fs::write(dir.path().join(NARRATOR_FILE), "  \n").unwrap();

        let prompts = PromptSet::from_dir(dir.path()).unwrap();
        assert_eq!(prompts.guard, "custom guard");
        assert_eq!(prompts.narrator, PromptSet::default().narrator);
        assert_eq!(prompts.rules, PromptSet::default().rules);
    }

    #[test]
    fn unreadable_prompt_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(WORLD_FILE)).unwrap();
        let err = PromptSet::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::Prompt { .. }));
    }
}
