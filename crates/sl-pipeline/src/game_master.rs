//! The game master: runs one player action through the whole pipeline.
//!
//! Order of a turn:
//!
//! 1. blank actions and reset requests are handled without the oracle;
//! 2. the state is loaded and projected;
//! 3. the intent guard reviews the action against the projection;
//! 4. the world authority validates it against the full state;
//! 5. the rules resolver rolls and rules;
//! 6. effects are applied, the turn is logged, and the state is saved;
//! 7. the narrator renders the fresh projection.
//!
//! Vetoes at step 3 or 4 are logged and saved before returning. Only store
//! failures abort a turn.

use rand::rngs::StdRng;
use sl_core::{StateStore, TurnLogEntry, apply_effects, project};
use sl_oracle::Oracle;

use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::guard::IntentGuard;
use crate::narrator::Narrator;
use crate::prompts::PromptSet;
use crate::reset::is_reset_command;
use crate::response::TurnResponse;
use crate::rules::RulesResolver;
use crate::world::WorldAuthority;

/// Owns the store, the oracle, and the four stages.
pub struct GameMaster<O: Oracle> {
    store: StateStore,
    oracle: O,
    guard: IntentGuard,
    world: WorldAuthority,
    rules: RulesResolver,
    narrator: Narrator,
}

impl<O: Oracle> GameMaster<O> {
    /// Build a game master from a configuration.
    pub fn new(store: StateStore, oracle: O, config: &PipelineConfig) -> PipelineResult<Self> {
        let prompts = config.prompts()?;
        Ok(Self::with_prompts(store, oracle, prompts, config.rng()))
    }

    /// Build a game master from explicit prompts and dice.
    pub fn with_prompts(store: StateStore, oracle: O, prompts: PromptSet, rng: StdRng) -> Self {
        Self {
            store,
            oracle,
            guard: IntentGuard::new(prompts.guard),
            world: WorldAuthority::new(prompts.world),
            rules: RulesResolver::new(prompts.rules, rng),
            narrator: Narrator::new(prompts.narrator),
        }
    }

    /// Replace the intent guard.
    pub fn with_guard(mut self, guard: IntentGuard) -> Self {
        self.guard = guard;
        self
    }

    /// The state store.
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// The oracle.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Run one player action.
    ///
    /// Reset aliases only reset when `confirm_reset` is set; otherwise the
    /// state is left untouched and the caller is asked to confirm.
    pub fn handle_action(&mut self, action: &str, confirm_reset: bool) -> PipelineResult<TurnResponse> {
        let action = action.trim();
        if action.is_empty() {
            return Ok(TurnResponse::empty());
        }

        if is_reset_command(action) {
            if !confirm_reset {
                tracing::info!(action = %action, "reset requested, awaiting confirmation");
                return Ok(TurnResponse::reset_confirmation_required());
            }
            let state = self.store.reset(self.store.template())?;
            tracing::info!(path = %self.store.path().display(), "game reset");
            return Ok(TurnResponse::reset_done(project(&state)));
        }

        let mut state = self.store.load()?;
        let observable = project(&state);

        let guard = self.guard.review(&self.oracle, action, &observable);
        if !guard.allowed {
            state.record_turn(TurnLogEntry::blocked(action, guard.clone()));
            self.store.save(&state)?;
            tracing::info!(action = %action, category = %guard.block_category, "guard veto");
            return Ok(TurnResponse::guard_veto(guard));
        }

        let world = self.world.validate(
            &self.oracle,
            action,
            &observable,
            &state.hidden,
            &state.scenario,
        );
        if !world.plausible {
            state.record_turn(TurnLogEntry::implausible(action, guard.clone(), world.clone()));
            self.store.save(&state)?;
            tracing::info!(action = %action, "world veto");
            return Ok(TurnResponse::world_veto(guard, world));
        }

        let rules = self
            .rules
            .evaluate(&self.oracle, action, &observable, &world, &state.rules);
        apply_effects(&mut state, &rules, &world);
        state.record_turn(TurnLogEntry::resolved(
            action,
            guard.clone(),
            world.clone(),
            rules.clone(),
        ));
        self.store.save(&state)?;
        tracing::info!(
            action = %action,
            roll = rules.roll,
            outcome = %rules.outcome,
            "turn resolved"
        );

        let observable = project(&state);
        let narration = self
            .narrator
            .narrate(&self.oracle, &observable, action, &guard, &rules);
        Ok(TurnResponse::resolved(narration, guard, world, rules, observable))
    }
}
