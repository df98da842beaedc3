//! Movement: one queued step per entity per tick.

use tracing::{trace, warn};

use super::{deny, TickContext};
use crate::entity::{EntityId, EntityState, QueueStep};
use crate::events::{EventKind, EventPayload, GameEvent};
use crate::pathfinding::step_allowed;
use crate::state::SessionState;
use crate::world_index::WorldIndex;

/// Radius revealed around every entity after it moves
const SIGHT_RADIUS: i32 = 1;

pub fn run(state: &mut SessionState, index: &mut WorldIndex, ctx: &mut TickContext) {
    for id in state.entity_ids() {
        step(state, index, ctx, id);
    }
}

/// Drop the rest of the queue and go idle
fn cancel(state: &mut SessionState, id: EntityId) {
    if let Some(entity) = state.entity_mut(id) {
        entity.queue.clear();
        entity.state = EntityState::Idle;
    }
}

fn step(state: &mut SessionState, index: &mut WorldIndex, ctx: &mut TickContext, id: EntityId) {
    let Some(entity) = state.entity(id) else {
        return;
    };
    if !matches!(entity.state, EntityState::Idle | EntityState::Moving) {
        return;
    }
    let Some(QueueStep::Move(next)) = entity.head() else {
        return;
    };
    let from = entity.position;
    let rank = entity.rank;

    if index.occupied_by_other(next, id) {
        cancel(state, id);
        deny(state, ctx, id, format!("PATH BLOCKED at {}", next));
        return;
    }

    if !state.grid.in_bounds(next) || !from.is_adjacent(next) {
        warn!(%id, %from, to = %next, "queued step leaves the world or skips a hex");
        cancel(state, id);
        ctx.emit(
            GameEvent::new(EventKind::Error)
                .entity(id)
                .message(format!("INVALID STEP {} -> {}", from, next)),
        );
        return;
    }

    let Some(cost) = step_allowed(&state.grid, from, next, rank) else {
        cancel(state, id);
        deny(state, ctx, id, format!("TERRAIN CHANGED at {}", next));
        return;
    };

    let coins_per_move = ctx.config.coins_per_move;
    let Some(entity) = state.entity_mut(id) else {
        return;
    };
    if !entity.pay_for_step(cost, coins_per_move) {
        cancel(state, id);
        deny(state, ctx, id, "OUT OF MOVES".to_string());
        return;
    }

    entity.queue.pop_front();
    entity.position = next;
    let arrived = entity.queue.is_empty();
    entity.state = if arrived {
        EntityState::Idle
    } else {
        EntityState::Moving
    };
    trace!(%id, %from, to = %next, cost, "step");

    index.move_entity(id, next);
    state.grid_mut().reveal_around(next, SIGHT_RADIUS);

    if arrived {
        ctx.emit(
            GameEvent::new(EventKind::MoveComplete)
                .entity(id)
                .payload(EventPayload::Arrived { at: next }),
        );
    }
}
