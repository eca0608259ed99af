//! Deterministic application of stage effects to the game state.
//!
//! This is the only code that changes the character, the world location, or
//! the flags. It never calls an oracle and never fails: every input the
//! normalizer lets through has a defined effect, and anything unusable is
//! skipped.

use crate::stage::{RulesResult, WorldResult};
use crate::state::GameState;

/// A parsed inventory token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryChange {
    /// Append an item (`+name`).
    Add(String),
    /// Remove one occurrence of an item (`-name`).
    Remove(String),
}

impl InventoryChange {
    /// Parse a signed token. Tokens without a sign or without a name yield
    /// `None`.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim_start();
        let (add, name) = if let Some(rest) = token.strip_prefix('+') {
            (true, rest)
        } else if let Some(rest) = token.strip_prefix('-') {
            (false, rest)
        } else {
            return None;
        };

        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        Some(if add {
            Self::Add(name.to_string())
        } else {
            Self::Remove(name.to_string())
        })
    }

    /// Apply the change to an inventory.
    pub fn apply_to(&self, inventory: &mut Vec<String>) {
        match self {
            Self::Add(item) => inventory.push(item.clone()),
            Self::Remove(item) => {
                if let Some(pos) = inventory.iter().position(|i| i == item) {
                    inventory.remove(pos);
                }
            }
        }
    }
}

/// Merge a turn's rules and world results into the state.
///
/// Rules flags are written before world flag updates, so the world authority
/// wins when both set the same key in one turn.
pub fn apply_effects(state: &mut GameState, rules: &RulesResult, world: &WorldResult) {
    let effects = &rules.mechanical_effects;
    let character = &mut state.character;

    let ceiling = character.max_hp.max(0);
    character.hp = character
        .hp
        .saturating_add(effects.hp_delta)
        .clamp(0, ceiling);
    character.xp = character.xp.saturating_add(effects.xp_delta).max(0);

    for token in &effects.inventory_changes {
        match InventoryChange::parse(token) {
            Some(change) => change.apply_to(&mut character.inventory),
            None => tracing::debug!(token = %token, "ignoring unsigned inventory token"),
        }
    }

    for (key, value) in &effects.new_flags {
        state.flags.insert(key.clone(), *value);
    }

    let world_effects = &world.world_effects;
    if let Some(location) = world_effects
        .location_change
        .as_deref()
        .filter(|l| !l.is_empty())
    {
        state.world.current_location = Some(location.to_string());
    }

    for (key, value) in &world_effects.flag_updates {
        state.flags.insert(key.clone(), *value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{MechanicalEffects, WorldEffects};
    use crate::state::{Character, WorldState};
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn state(hp: i64, max_hp: i64, inventory: &[&str]) -> GameState {
        let mut character = Character::new("Ilse", max_hp);
        character.hp = hp;
        character.inventory = inventory.iter().map(|s| s.to_string()).collect();
        GameState::new(character, WorldState::at("Harbor"))
    }

    fn rules(effects: MechanicalEffects) -> RulesResult {
        RulesResult {
            mechanical_effects: effects,
            ..RulesResult::default()
        }
    }

    fn inventory_rules(tokens: &[&str]) -> RulesResult {
        rules(MechanicalEffects {
            inventory_changes: tokens.iter().map(|s| s.to_string()).collect(),
            ..MechanicalEffects::default()
        })
    }

    #[test]
    fn parse_tokens() {
        assert_eq!(InventoryChange::parse("+torch"), Some(InventoryChange::Add("torch".into())));
        assert_eq!(
            InventoryChange::parse("- rusty key "),
            Some(InventoryChange::Remove("rusty key".into()))
        );
        assert_eq!(InventoryChange::parse("torch"), None);
        assert_eq!(InventoryChange::parse("+"), None);
    }

    #[test]
    fn hp_is_clamped_both_ways() {
        let mut s = state(5, 10, &[]);
        apply_effects(
            &mut s,
            &rules(MechanicalEffects { hp_delta: 50, ..Default::default() }),
            &WorldResult::default(),
        );
        assert_eq!(s.character.hp, 10);

        apply_effects(
            &mut s,
            &rules(MechanicalEffects { hp_delta: -50, ..Default::default() }),
            &WorldResult::default(),
        );
        assert_eq!(s.character.hp, 0);
    }

    #[test]
    fn negative_max_hp_pins_hp_to_zero() {
        let mut s = state(4, -5, &[]);
        apply_effects(
            &mut s,
            &rules(MechanicalEffects { hp_delta: 3, ..Default::default() }),
            &WorldResult::default(),
        );
        assert_eq!(s.character.hp, 0);
    }

    #[test]
    fn xp_never_negative() {
        let mut s = state(10, 10, &[]);
        s.character.xp = 3;
        apply_effects(
            &mut s,
            &rules(MechanicalEffects { xp_delta: -10, ..Default::default() }),
            &WorldResult::default(),
        );
        assert_eq!(s.character.xp, 0);
    }

    #[test]
    fn adding_allows_duplicates() {
        let mut s = state(10, 10, &["torch"]);
        apply_effects(&mut s, &inventory_rules(&["+torch", "+rope"]), &WorldResult::default());
        assert_eq!(s.character.inventory, vec!["torch", "torch", "rope"]);
    }

    #[test]
    fn removing_takes_one_occurrence() {
        let mut s = state(10, 10, &["torch", "rope", "torch", "map"]);
        apply_effects(&mut s, &inventory_rules(&["-torch"]), &WorldResult::default());
        assert_eq!(s.character.inventory, vec!["rope", "torch", "map"]);
    }

    #[test]
    fn removing_absent_item_is_noop() {
        let mut s = state(10, 10, &["rope"]);
        apply_effects(&mut s, &inventory_rules(&["-lantern", "lantern"]), &WorldResult::default());
        assert_eq!(s.character.inventory, vec!["rope"]);
    }

    #[test]
    fn world_flags_override_rules_flags() {
        let mut s = state(10, 10, &[]);
        let rules = rules(MechanicalEffects {
            new_flags: BTreeMap::from([("gate_open".to_string(), true), ("alarm".to_string(), true)]),
            ..Default::default()
        });
        let world = WorldResult::plausible(
            "ok",
            WorldEffects {
                flag_updates: BTreeMap::from([("gate_open".to_string(), false)]),
                ..Default::default()
            },
        );
        apply_effects(&mut s, &rules, &world);
        assert!(!s.flags["gate_open"]);
        assert!(s.flags["alarm"]);
    }

    #[test]
    fn location_change_moves_player() {
        let mut s = state(10, 10, &[]);
        let world = WorldResult::plausible(
            "ok",
            WorldEffects {
                location_change: Some("Lighthouse".into()),
                ..Default::default()
            },
        );
        apply_effects(&mut s, &RulesResult::default(), &world);
        assert_eq!(s.world.current_location.as_deref(), Some("Lighthouse"));

        apply_effects(&mut s, &RulesResult::default(), &WorldResult::default());
        assert_eq!(s.world.current_location.as_deref(), Some("Lighthouse"));
    }

    proptest! {
        #[test]
        fn hp_stays_in_bounds(hp in 0i64..200, extra in 0i64..200, delta in any::<i64>()) {
            let max_hp = hp + extra;
            let mut s = state(hp, max_hp, &[]);
            apply_effects(
                &mut s,
                &rules(MechanicalEffects { hp_delta: delta, ..Default::default() }),
                &WorldResult::default(),
            );
            prop_assert!(s.character.hp >= 0);
            prop_assert!(s.character.hp <= max_hp);
        }

        #[test]
        fn hp_bounds_hold_for_any_record(
            hp in any::<i64>(),
            max_hp in any::<i64>(),
            delta in any::<i64>(),
        ) {
            let mut s = state(hp, max_hp, &[]);
            apply_effects(
                &mut s,
                &rules(MechanicalEffects { hp_delta: delta, ..Default::default() }),
                &WorldResult::default(),
            );
            prop_assert!(s.character.hp >= 0);
            prop_assert!(s.character.hp <= max_hp.max(0));
        }

        #[test]
        fn removal_takes_at_most_one(
            items in proptest::collection::vec("[a-c]", 0..10),
            target in "[a-d]",
        ) {
            let refs: Vec<&str> = items.iter().map(String::as_str).collect();
            let mut s = state(1, 1, &refs);
            let token = format!("-{target}");
            apply_effects(&mut s, &inventory_rules(&[&token]), &WorldResult::default());

            let mut expected = items.clone();
            if let Some(pos) = expected.iter().position(|i| *i == target) {
                expected.remove(pos);
            }
            prop_assert_eq!(&s.character.inventory, &expected);
        }
    }
}
