//! Growth and economy
//!
//! Advances in-place growth for every entity that asks for it (player intent
//! flag or a grow marker at the head of the queue), pays out level-ups and
//! runs the periodic neglect decay.

use tracing::{debug, warn};

use super::{deny, TickContext};
use crate::board::Hex;
use crate::entity::{EntityId, EntityState, GrowthIntent};
use crate::events::{EventKind, EventPayload, GameEvent};
use crate::growth::{evaluate_at, growth_ticks, income};
use crate::state::SessionState;
use crate::world_index::WorldIndex;

pub fn run(state: &mut SessionState, index: &WorldIndex, ctx: &mut TickContext) {
    decay(state, index, ctx);
    for id in state.entity_ids() {
        grow(state, index, ctx, id);
    }
}

/// Neglected tiles lose a level every `decay_interval_ticks`
fn decay(state: &mut SessionState, index: &WorldIndex, ctx: &TickContext) {
    let interval = ctx.config.decay_interval_ticks;
    if interval == 0 || state.tick == 0 || state.tick % interval != 0 {
        return;
    }
    let neglected: Vec<Hex> = state
        .grid
        .tiles()
        .filter(|t| t.current_level >= 2 && !index.is_occupied(t.coord))
        .map(|t| t.coord)
        .collect();
    if neglected.is_empty() {
        return;
    }
    debug!(tick = state.tick, tiles = neglected.len(), "decay sweep");
    let grid = state.grid_mut();
    for hex in neglected {
        if let Some(tile) = grid.get_mut(hex) {
            tile.current_level -= 1;
            tile.progress = 0;
        }
    }
}

/// What the entity wants grown this tick, if anything
fn request(state: &SessionState, id: EntityId) -> Option<(Hex, GrowthIntent)> {
    let entity = state.entity(id)?;
    if let Some(marker) = entity.grow_marker() {
        return Some(marker);
    }
    if id.is_player() && state.player_intent.growing {
        return Some((entity.position, state.player_intent.intent));
    }
    None
}

/// Return to idle and forget the request
fn stop(state: &mut SessionState, id: EntityId) {
    if id.is_player() {
        state.player_intent.growing = false;
    }
    if let Some(entity) = state.entity_mut(id) {
        entity.drop_grow_marker();
        entity.state = EntityState::Idle;
    }
}

fn grow(state: &mut SessionState, index: &WorldIndex, ctx: &mut TickContext, id: EntityId) {
    let Some(entity) = state.entity(id) else {
        return;
    };
    if matches!(entity.state, EntityState::Locked | EntityState::Moving) {
        return;
    }
    let Some((at, intent)) = request(state, id) else {
        if entity.state == EntityState::Growing {
            // Intent withdrawn mid-growth
            stop(state, id);
        }
        return;
    };

    if at != entity.position {
        warn!(%id, %at, position = %entity.position, "grow marker away from entity");
        stop(state, id);
        ctx.emit(
            GameEvent::new(EventKind::Error)
                .entity(id)
                .message(format!("GROW TARGET {} IS NOT UNDER {}", at, id)),
        );
        return;
    }

    let queue_size = ctx.config.queue_size();
    if let Err(denial) = evaluate_at(&state.grid, index.occupied(), entity, at, queue_size) {
        debug!(%id, %at, reason = %denial, "growth denied");
        stop(state, id);
        deny(state, ctx, id, denial.to_string());
        return;
    }

    // Advance progress
    let ticks_per_level = ctx.config.growth_ticks_per_level;
    let (next, prev_max, complete) = {
        let grid = state.grid_mut();
        let Some(tile) = grid.get_mut(at) else {
            return;
        };
        tile.progress += 1;
        let next = tile.next_level();
        (next, tile.max_level, tile.progress >= growth_ticks(next, ticks_per_level))
    };
    if let Some(entity) = state.entity_mut(id) {
        entity.state = EntityState::Growing;
    }
    if !complete {
        return;
    }

    // Level up
    let raised = next > prev_max;
    if let Some(tile) = state.grid_mut().get_mut(at) {
        tile.current_level = next;
        tile.progress = 0;
        tile.owner = Some(id);
        if raised {
            tile.max_level = next;
        }
    }

    let payout = income(next, ctx.config.income_per_level);
    if let Some(entity) = state.entity_mut(id) {
        if raised {
            entity.rank = entity.rank.max(next);
        }
        entity.earn(payout);
        entity.moves += 1;
        if next == 1 {
            entity.push_recent_upgrade(at, queue_size);
        } else if raised {
            // A new tier spends the cycle
            entity.recent_upgrades.clear();
        }
    }

    let kind = if next == 1 && prev_max == 0 {
        EventKind::SectorAcquired
    } else {
        EventKind::LevelUp
    };
    debug!(%id, %at, level = next, income = payout, "level up");
    if id.is_player() {
        state.messages.push(format!("{} reached level {} (+{} coins)", at, next, payout));
    }
    ctx.emit(GameEvent::new(kind).entity(id).payload(EventPayload::Level {
        at,
        level: next,
        income: payout,
    }));

    // Finish a repair, or keep climbing while the rules allow
    let keep_going = next < prev_max
        || (intent == GrowthIntent::Upgrade
            && !raised
            && state.entity(id).is_some_and(|e| {
                evaluate_at(&state.grid, index.occupied(), e, at, queue_size).is_ok()
            }));
    if !keep_going {
        stop(state, id);
    }
}
