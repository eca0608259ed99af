//! Loading, saving, and resetting the persisted record.
//!
//! The store holds exactly one record at a fixed path, plus the path of the
//! template that seeds new games. Writes go to a sibling temporary file that
//! is synced and then renamed over the record, so a crash mid-write leaves the
//! previous record intact.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::observable::{ObservableContext, project};
use crate::state::GameState;

/// File name of the template looked up next to the record by default.
pub const TEMPLATE_FILE_NAME: &str = "game_state.template.json";

/// Persistent storage for the single game record.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
    template: PathBuf,
}

impl StateStore {
    /// A store for the record at `path`, seeded from the sibling
    /// `game_state.template.json`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let template = path.with_file_name(TEMPLATE_FILE_NAME);
        Self { path, template }
    }

    /// Use a different template file.
    pub fn with_template(mut self, template: impl Into<PathBuf>) -> Self {
        self.template = template.into();
        self
    }

    /// Path of the persisted record.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the seeding template.
    pub fn template(&self) -> &Path {
        &self.template
    }

    /// Whether a persisted record exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the persisted record, seeding it from the template on first use.
    pub fn load(&self) -> StoreResult<GameState> {
        if self.exists() {
            return read_json(&self.path);
        }

        if !self.template.is_file() {
            return Err(StoreError::NotFound {
                path: self.path.clone(),
            });
        }

        tracing::info!(template = %self.template.display(), "seeding new game from template");
        self.copy_template(&self.template)
    }

    /// Overwrite the persisted record, creating its directory if needed.
    pub fn save(&self, state: &GameState) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(state).map_err(StoreError::Encode)?;
        self.write_atomic(content)?;

        tracing::debug!(path = %self.path.display(), turns = state.log().len(), "game state saved");
        Ok(())
    }

    /// Replace the persisted record with the content of `template`.
    ///
    /// The template document is written as is; only the returned state is
    /// normalised.
    pub fn reset(&self, template: &Path) -> StoreResult<GameState> {
        if !template.is_file() {
            return Err(StoreError::NotFound {
                path: template.to_path_buf(),
            });
        }

        let state = self.copy_template(template)?;
        tracing::info!(template = %template.display(), "game state reset");
        Ok(state)
    }

    /// Derive the player-visible projection of `state`.
    pub fn project(state: &GameState) -> ObservableContext {
        project(state)
    }

    fn copy_template(&self, template: &Path) -> StoreResult<GameState> {
        let doc: Value = read_json(template)?;
        let state = serde_json::from_value(doc.clone()).map_err(|source| {
            StoreError::InvalidRecord {
                path: template.to_path_buf(),
                source,
            }
        })?;
        let content = serde_json::to_string_pretty(&doc).map_err(StoreError::Encode)?;
        self.write_atomic(content)?;
        Ok(state)
    }

    fn write_atomic(&self, mut content: String) -> StoreResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        content.push('\n');

        let tmp = self.path.with_extension("json.tmp");
        let io_err = |source| StoreError::Io {
            path: tmp.clone(),
            source,
        };
        let mut file = File::create(&tmp).map_err(io_err)?;
        file.write_all(content.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        drop(file);

        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<T> {
    let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| StoreError::InvalidRecord {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::TurnLogEntry;
    use crate::stage::GuardResult;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_template(dir: &Path) -> PathBuf {
        let path = dir.join(TEMPLATE_FILE_NAME);
        let doc = json!({
            "character": {"name": "Ilse", "class": "smuggler", "level": 1, "hp": 10, "max_hp": 10, "xp": 0, "inventory": []},
            "world": {"current_location": "Harbor"},
            "scenario": {"act": 1},
            "rules": {"system": "d20"},
            "hidden": {"traitor": "Mayor Voss"},
            "flags": {},
            "log": []
        });
        fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
        path
    }

    #[test]
    fn load_seeds_from_template() {
        let dir = TempDir::new().unwrap();
        let template = write_template(dir.path());
        let store = StateStore::new(dir.path().join("game_state.json"));
        assert_eq!(store.template(), template.as_path());
        assert!(!store.exists());

        let state = store.load().unwrap();
        assert_eq!(state.character.name, "Ilse");
        assert!(store.exists());
    }

    #[test]
    fn load_without_record_or_template_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("game_state.json"));
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn load_prefers_existing_record() {
        let dir = TempDir::new().unwrap();
        write_template(dir.path());
        let store = StateStore::new(dir.path().join("game_state.json"));

        let mut state = store.load().unwrap();
        state.character.xp = 40;
        store.save(&state).unwrap();

        assert_eq!(store.load().unwrap().character.xp, 40);
    }

    #[test]
    fn save_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("nested/memory/game_state.json"));
        store.save(&GameState::default()).unwrap();
        assert!(store.exists());
        assert!(!dir.path().join("nested/memory/game_state.json.tmp").exists());
    }

    #[test]
    fn save_round_trips_log() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("game_state.json"));
        let mut state = GameState::default();
        state.record_turn(TurnLogEntry::blocked("read the module", GuardResult::default()));
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn reset_overwrites_with_template() {
        let dir = TempDir::new().unwrap();
        let template = write_template(dir.path());
        let store = StateStore::new(dir.path().join("game_state.json"));

        let mut state = store.load().unwrap();
        state.character.hp = 1;
        state.record_turn(TurnLogEntry::blocked("cheat", GuardResult::default()));
        store.save(&state).unwrap();

        let fresh = store.reset(&template).unwrap();
        assert_eq!(fresh.character.hp, 10);
        assert!(fresh.log().is_empty());

        let written: Value = read_json(store.path()).unwrap();
        let expected: Value = read_json(&template).unwrap();
        assert_eq!(written, expected);
    }

    #[test]
    fn template_content_is_written_verbatim() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("sparse.template.json");
        let doc = json!({
            "character": {"name": "Ilse", "hp": 10.0, "max_hp": 10},
            "world": {"current_location": null},
            "flags": {"door_open": 1},
            "log": []
        });
        fs::write(&template, serde_json::to_string(&doc).unwrap()).unwrap();
        let store = StateStore::new(dir.path().join("game_state.json")).with_template(&template);

        let seeded = store.load().unwrap();
        assert!(seeded.flags["door_open"]);
        assert_eq!(seeded.character.hp, 10);
        assert_eq!(read_json::<Value>(store.path()).unwrap(), doc);

        let mut state = seeded;
        state.character.hp = 2;
        store.save(&state).unwrap();

        let fresh = store.reset(&template).unwrap();
        assert_eq!(fresh.world.current_location, None);
        assert_eq!(read_json::<Value>(store.path()).unwrap(), doc);
    }

    #[test]
    fn invalid_template_leaves_record_alone() {
        let dir = TempDir::new().unwrap();
        write_template(dir.path());
        let store = StateStore::new(dir.path().join("game_state.json"));
        store.load().unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let broken = dir.path().join("broken.json");
        fs::write(&broken, r#"{"character": {"inventory": 3}}"#).unwrap();
        let err = store.reset(&broken).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord { .. }));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn reset_with_missing_template_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("game_state.json"));
        let err = store.reset(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn invalid_record_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("game_state.json");
        fs::write(&path, "{not json").unwrap();
        let err = StateStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord { .. }));
    }
}
