//! Bot decisions, rate limited on the logical clock.
//!
//! Bots are visited in a fresh random order each pass. Every idle bot plans
//! once; accepted MOVE destinations are reserved for the rest of the pass so
//! later bots look elsewhere.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashSet;
use tracing::debug;

use super::TickContext;
use crate::actions::{self, Action};
use crate::board::Hex;
use crate::entity::{EntityId, EntityState};
use crate::planner::{self, PlanContext};
use crate::state::SessionState;
use crate::world_index::WorldIndex;

/// Whether an AI pass is due at the current logical time
pub fn due(state: &SessionState, interval_ms: u64) -> bool {
    state
        .last_ai_ms
        .map_or(true, |last| state.now_ms.saturating_sub(last) >= interval_ms)
}

pub fn run(state: &mut SessionState, index: &WorldIndex, ctx: &mut TickContext) {
    if !due(state, ctx.config.ai_interval_ms) {
        return;
    }
    state.last_ai_ms = Some(state.now_ms);

    let mut order: Vec<EntityId> = state.bots.iter().map(|b| b.id).collect();
    order.shuffle(&mut *ctx.rng);

    let mut reserved = FxHashSet::default();
    for id in order {
        decide(state, index, ctx, &mut reserved, id);
    }
}

fn decide(
    state: &mut SessionState,
    index: &WorldIndex,
    ctx: &mut TickContext,
    reserved: &mut FxHashSet<Hex>,
    id: EntityId,
) {
    let passive = ctx.config.passive_income;
    match state.entity_mut(id) {
        Some(bot) if bot.state == EntityState::Idle => bot.earn(passive),
        _ => return,
    }

    let Some(bot) = state.bots.iter().find(|b| b.id == id).map(Arc::clone) else {
        return;
    };
    let mut memory = bot.memory().cloned().unwrap_or_default();
    let queue_size = ctx.config.queue_size();

    let plan = {
        let plan_ctx = PlanContext {
            grid: &state.grid,
            player: &state.player,
            win_condition: state.win_condition,
            index,
            state_version: state.version,
            profile: ctx.profile,
            queue_size,
            reserved: &*reserved,
            now_ms: state.now_ms,
            limits: &ctx.config.search,
            coins_per_move: ctx.config.coins_per_move,
            income_per_level: ctx.config.income_per_level,
        };
        planner::plan(&plan_ctx, &bot, &mut memory, &mut *ctx.rng)
    };
    // Release the snapshot so the write below does not copy the entity
    drop(bot);

    if let Some(slot) = state.entity_mut(id).and_then(|e| e.memory_mut()) {
        *slot = memory;
    }

    debug!(%id, action = plan.action.label(), trace = ?plan.trace, "bot decision");
    if ctx.rng.gen::<f32>() < ctx.config.activity_sample_rate {
        state.activity.push(format!(
            "{} {}: {}",
            id,
            plan.action.label(),
            plan.trace.join("; ")
        ));
    }

    match actions::apply(state, index, id, &plan.action, queue_size) {
        Ok(()) => {
            if let Action::Move { path, .. } = &plan.action {
                if let Some(&dest) = path.last() {
                    reserved.insert(dest);
                }
            }
        }
        Err(err) => debug!(%id, reason = %err, "bot action rejected"),
    }
}
