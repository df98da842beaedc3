//! Win/loss detection. The player is checked before any bot.

use tracing::info;

use super::TickContext;
use crate::entity::{EntityId, EntityState};
use crate::events::{EventKind, EventPayload, GameEvent, LeaderboardEntry};
use crate::state::{GameStatus, SessionState};

pub fn run(state: &mut SessionState, ctx: &mut TickContext) {
    if state.status != GameStatus::Playing {
        return;
    }
    let Some(win) = state.win_condition else {
        return;
    };

    let outcome = if win.met_by(&state.player) {
        Some((GameStatus::Victory, EntityId::PLAYER))
    } else {
        state
            .bots
            .iter()
            .find(|b| win.met_by(b))
            .map(|b| (GameStatus::Defeat, b.id))
    };
    let Some((status, winner)) = outcome else {
        return;
    };

    let score = state.entity(winner).map_or(0, |e| win.score(e));
    let entry = LeaderboardEntry {
        winner,
        outcome: status,
        condition: win.kind,
        score,
        ticks: state.tick,
        player_rank: state.player.rank,
        tiles_owned: state.grid.owned_by(EntityId::PLAYER),
    };

    state.status = status;
    for id in state.entity_ids() {
        if let Some(entity) = state.entity_mut(id) {
            entity.state = EntityState::Locked;
            entity.queue.clear();
        }
    }
    state.player_intent.growing = false;

    let (kind, message) = match status {
        GameStatus::Victory => (EventKind::Victory, "VICTORY".to_string()),
        _ => (EventKind::Defeat, format!("DEFEAT: {} reached {:?} {}", winner, win.kind, win.target)),
    };
    info!(%winner, ?status, score, tick = state.tick, "session over");
    state.messages.push(message.clone());

    ctx.emit(
        GameEvent::new(kind)
            .entity(winner)
            .message(message)
            .payload(EventPayload::Leaderboard(entry.clone())),
    );
    ctx.emit(GameEvent::new(EventKind::LeaderboardUpdate).payload(EventPayload::Leaderboard(entry)));
}
