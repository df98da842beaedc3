//! Tick systems, run by the engine in a fixed order:
//! growth, ai, movement, victory.

use rand_chacha::ChaCha8Rng;

use crate::config::{GameConfig, PlannerProfile};
use crate::entity::EntityId;
use crate::events::GameEvent;
use crate::state::SessionState;

pub mod ai;
pub mod growth;
pub mod movement;
pub mod victory;

/// Tick-scoped resources shared by the systems
pub struct TickContext<'a> {
    pub config: &'a GameConfig,
    pub profile: &'a PlannerProfile,
    pub rng: &'a mut ChaCha8Rng,
    pub events: Vec<GameEvent>,
}

impl<'a> TickContext<'a> {
    pub fn new(config: &'a GameConfig, profile: &'a PlannerProfile, rng: &'a mut ChaCha8Rng) -> Self {
        Self {
            config,
            profile,
            rng,
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

/// Deny an entity's current request: report it to the player, or record it
/// in a bot's memory for the next plan.
pub(crate) fn deny(state: &mut SessionState, ctx: &mut TickContext, id: EntityId, reason: String) {
    if id.is_player() {
        state.messages.push(format!("denied: {}", reason));
    } else if let Some(memory) = state.entity_mut(id).and_then(|e| e.memory_mut()) {
        memory.record_failure(reason.clone());
    }
    ctx.emit(GameEvent::denied(id, reason));
}
