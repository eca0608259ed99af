use std::fs;
use std::path::Path;

use serde_json::json;
use sl_core::store::TEMPLATE_FILE_NAME;
use sl_core::{Character, GameState, WorldState};
use sl_pipeline::PromptSet;

fn starter_state() -> GameState {
    let mut character = Character::new("Aldric", 12);
    character.class = "fighter".to_string();
    character.stats.insert("strength".to_string(), 14.into());
    character.stats.insert("dexterity".to_string(), 11.into());
    character.stats.insert("wits".to_string(), 10.into());
    character.inventory = vec![
        "longsword".to_string(),
        "rope".to_string(),
        "waterskin".to_string(),
    ];

    let mut world = WorldState::at("the ruined watchtower");
    world.visible_scene = json!({
        "description": "Rain drips through the broken roof. A cellar hatch lies half hidden under rubble.",
        "exits": ["north road", "cellar hatch"]
    });

    let mut state = GameState::new(character, world);
    state.scenario = json!({
        "title": "The Watchtower",
        "hook": "Smugglers have been seen near the old watchtower."
    });
    state.hidden = json!({
        "cellar": "The smugglers' cache is behind a loose stone in the cellar.",
        "smuggler_lookout": "hiding in the treeline to the north"
    });
    state.flags.insert("hatch_open".to_string(), false);
    state.flags.insert("secret_lookout_alerted".to_string(), false);
    state
}

pub fn run(dir: &Path) -> Result<(), String> {
    if dir.exists() {
        return Err(format!("directory '{}' already exists", dir.display()));
    }

    let memory = dir.join("memory");
    let prompts = dir.join("prompts");
    fs::create_dir_all(&memory).map_err(|e| format!("cannot create directory: {e}"))?;
    fs::create_dir_all(&prompts).map_err(|e| format!("cannot create directory: {e}"))?;

    let mut template = serde_json::to_string_pretty(&starter_state())
        .map_err(|e| format!("cannot encode template: {e}"))?;
    template.push('\n');
    fs::write(memory.join(TEMPLATE_FILE_NAME), template)
        .map_err(|e| format!("cannot write {TEMPLATE_FILE_NAME}: {e}"))?;

    for (name, text) in PromptSet::default().files() {
        fs::write(prompts.join(name), format!("{text}\n"))
            .map_err(|e| format!("cannot write {name}: {e}"))?;
    }

    println!("Created game in {}/", dir.display());
    println!("  memory/{TEMPLATE_FILE_NAME}  starting state");
    println!("  prompts/*.txt                  stage prompts");
    println!();
    println!("Get started:");
    println!("  cd {}", dir.display());
    println!("  sl show        # Look at your character");
    println!("  sl play        # Start playing (needs a running Ollama server)");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_state_is_playable() {
        let state = starter_state();
        assert_eq!(state.character.hp, state.character.max_hp);
        assert!(state.world.current_location.is_some());
        assert!(state.log().is_empty());
    }
}
