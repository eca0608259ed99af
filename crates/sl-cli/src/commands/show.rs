use comfy_table::{ContentArrangement, Table};
use serde_json::Value;
use sl_core::{ObservableContext, StateStore};

fn or_dash(text: String) -> String {
    if text.is_empty() { "-".to_string() } else { text }
}

fn scene_text(scene: &Value) -> String {
    match scene {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("description") {
            Some(Value::String(s)) => s.clone(),
            _ if map.is_empty() => String::new(),
            _ => scene.to_string(),
        },
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn print_tables(ctx: &ObservableContext) {
    let character = &ctx.character;

    let mut sheet = Table::new();
    sheet.set_content_arrangement(ContentArrangement::Dynamic);
    sheet.set_header(vec!["Character", ""]);
    sheet.add_row(vec!["Name".to_string(), or_dash(character.name.clone())]);
    sheet.add_row(vec!["Class".to_string(), or_dash(character.class.clone())]);
    sheet.add_row(vec!["Level".to_string(), character.level.to_string()]);
    sheet.add_row(vec![
        "HP".to_string(),
        format!("{}/{}", character.hp, character.max_hp),
    ]);
    sheet.add_row(vec!["XP".to_string(), character.xp.to_string()]);
    let stats = character
        .stats
        .iter()
        .map(|(name, value)| format!("{name} {value}"))
        .collect::<Vec<_>>()
        .join(", ");
    sheet.add_row(vec!["Stats".to_string(), or_dash(stats)]);
    sheet.add_row(vec![
        "Inventory".to_string(),
        or_dash(character.inventory.join(", ")),
    ]);
    println!("{sheet}");
    println!();

    let location = ctx.world.current_location.clone().unwrap_or_default();
    println!("  Location: {}", or_dash(location));
    let scene = scene_text(&ctx.world.visible_scene);
    if !scene.is_empty() {
        println!("  {scene}");
    }
    println!();

    if !ctx.flags.is_empty() {
        let mut flags = Table::new();
        flags.set_header(vec!["Flag", "Set"]);
        for (name, value) in &ctx.flags {
            flags.add_row(vec![name.clone(), value.to_string()]);
        }
        println!("{flags}");
        println!();
    }

    if ctx.log.is_empty() {
        println!("  No turns played yet.");
        return;
    }

    let mut turns = Table::new();
    turns.set_content_arrangement(ContentArrangement::Dynamic);
    turns.set_header(vec!["Action", "Result", "Roll"]);
    for entry in &ctx.log {
        let roll = entry
            .rules
            .as_ref()
            .map(|r| format!("{} vs {} ({})", r.roll, r.difficulty, r.outcome))
            .unwrap_or_else(|| "-".to_string());
        turns.add_row(vec![entry.action.clone(), entry.result.to_string(), roll]);
    }
    println!("{turns}");
    println!();
    println!("  last {} turns", ctx.log.len());
}

pub fn run(store: &StateStore, json: bool) -> Result<(), String> {
    let state = store.load().map_err(|e| e.to_string())?;
    let ctx = StateStore::project(&state);

    if json {
        let text = serde_json::to_string_pretty(&ctx.to_value()).map_err(|e| e.to_string())?;
        println!("{text}");
    } else {
        print_tables(&ctx);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scene_text_prefers_description() {
        assert_eq!(scene_text(&json!({"description": "A dark hall."})), "A dark hall.");
        assert_eq!(scene_text(&json!("Fog.")), "Fog.");
        assert_eq!(scene_text(&json!({})), "");
        assert_eq!(scene_text(&json!({"exits": 2})), r#"{"exits":2}"#);
    }
}
