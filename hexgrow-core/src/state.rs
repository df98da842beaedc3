//! Session state: the root aggregate a tick or action transforms
//!
//! The grid and every entity sit behind their own `Arc`. Cloning a
//! `SessionState` is therefore cheap, and mutation goes through
//! `Arc::make_mut`, which copies a part only while an older snapshot still
//! shares it.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::board::{ring, Hex};
use crate::config::GameConfig;
use crate::entity::{Entity, EntityId, GrowthIntent};
use crate::grid::Grid;

// ============================================================================
// WIN CONDITION
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinKind {
    /// Total coins earned over the session
    Wealth,
    /// Global rank
    Domination,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinCondition {
    pub kind: WinKind,
    pub target: u64,
    pub bot_count: usize,
}

impl WinCondition {
    pub fn new(kind: WinKind, target: u64, bot_count: usize) -> Self {
        Self {
            kind,
            target,
            bot_count,
        }
    }

    /// The entity's standing on this condition's axis
    pub fn score(&self, entity: &Entity) -> u64 {
        match self.kind {
            WinKind::Wealth => entity.total_coins_earned,
            WinKind::Domination => entity.rank as u64,
        }
    }

    pub fn met_by(&self, entity: &Entity) -> bool {
        self.score(entity) >= self.target
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Victory,
    Defeat,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::Playing
    }
}

/// Out-of-band growth request from the UI
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIntent {
    pub growing: bool,
    pub intent: GrowthIntent,
}

// ============================================================================
// LOGS
// ============================================================================

/// Append-only text log trimmed to its newest entries after each tick
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogBuffer {
    lines: VecDeque<String>,
}

impl LogBuffer {
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
    }

    pub fn truncate(&mut self, max_len: usize) {
        while self.lines.len() > max_len {
            self.lines.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }
}

/// One line of the final standings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub id: EntityId,
    pub coins_earned: u64,
    pub rank: u8,
    pub tiles_owned: usize,
    pub position: Hex,
}

// ============================================================================
// SESSION STATE
// ============================================================================

#[derive(Clone, Debug)]
pub struct SessionState {
    pub grid: Arc<Grid>,
    pub player: Arc<Entity>,
    pub bots: Vec<Arc<Entity>>,
    pub status: GameStatus,
    pub win_condition: Option<WinCondition>,
    /// Concurrency token: bumped on every committed tick and accepted action
    pub version: u64,
    pub tick: u64,
    /// Logical clock in milliseconds
    pub now_ms: u64,
    pub last_ai_ms: Option<u64>,
    pub player_intent: PlayerIntent,
    pub messages: LogBuffer,
    pub activity: LogBuffer,
}

impl SessionState {
    /// Fresh session: player at the origin, bots evenly spaced on a ring
    pub fn new(config: &GameConfig) -> Self {
        let mut grid = Grid::new(config.world_radius);

        let player = Entity::new_player(Hex::ORIGIN, config.starting_coins, config.starting_moves);
        grid.reveal_around(player.position, config.start_reveal_radius);

        let bots: Vec<Arc<Entity>> = start_positions(config.world_radius, config.bot_count)
            .into_iter()
            .enumerate()
            .map(|(i, pos)| {
                grid.reveal_around(pos, config.start_reveal_radius);
                let id = EntityId::bot(i as u16 + 1);
                Arc::new(Entity::new_bot(id, pos, config.starting_coins, config.starting_moves))
            })
            .collect();

        Self {
            grid: Arc::new(grid),
            player: Arc::new(player),
            bots,
            status: GameStatus::Playing,
            win_condition: config.win_condition,
            version: 0,
            tick: 0,
            now_ms: 0,
            last_ai_ms: None,
            player_intent: PlayerIntent::default(),
            messages: LogBuffer::default(),
            activity: LogBuffer::default(),
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Player first, then bots in id order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        std::iter::once(self.player.as_ref()).chain(self.bots.iter().map(|b| b.as_ref()))
    }

    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entities().map(|e| e.id).collect()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        if id.is_player() {
            return Some(self.player.as_ref());
        }
        self.bots.iter().find(|b| b.id == id).map(|b| b.as_ref())
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if id.is_player() {
            return Some(Arc::make_mut(&mut self.player));
        }
        self.bots
            .iter_mut()
            .find(|b| b.id == id)
            .map(Arc::make_mut)
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        Arc::make_mut(&mut self.grid)
    }

    /// Both logs trimmed to `max_len`
    pub fn truncate_logs(&mut self, max_len: usize) {
        self.messages.truncate(max_len);
        self.activity.truncate(max_len);
    }

    /// Standings ordered by the win condition's score, best first
    pub fn summary(&self) -> Vec<Standing> {
        let mut standings: Vec<(u64, Standing)> = self
            .entities()
            .map(|e| {
                let score = self.win_condition.map_or(e.total_coins_earned, |w| w.score(e));
                let standing = Standing {
                    id: e.id,
                    coins_earned: e.total_coins_earned,
                    rank: e.rank,
                    tiles_owned: self.grid.owned_by(e.id),
                    position: e.position,
                };
                (score, standing)
            })
            .collect();
        standings.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.id.cmp(&b.1.id)));
        standings.into_iter().map(|(_, s)| s).collect()
    }

    /// Check the structural invariants of every tile and entity
    pub fn check_invariants(&self, queue_size: usize) -> Result<(), String> {
        if let Some(bad) = self.grid.tiles().find(|t| !t.satisfies_invariants()) {
            return Err(format!(
                "tile {} out of range: current={} max={}",
                bad.coord, bad.current_level, bad.max_level
            ));
        }
        let mut seen = rustc_hash::FxHashSet::default();
        for e in self.entities() {
            if !seen.insert(e.position) {
                return Err(format!("two entities share {}", e.position));
            }
            if e.recent_upgrades.len() > queue_size {
                return Err(format!("{} cycle queue overflow", e.id));
            }
        }
        Ok(())
    }
}

/// Evenly spaced bot spawn points on a ring halfway to the world edge
fn start_positions(world_radius: i32, count: usize) -> Vec<Hex> {
    if count == 0 {
        return Vec::new();
    }
    let spots: Vec<Hex> = ring(Hex::ORIGIN, (world_radius / 2).max(1)).collect();
    (0..count)
        .map(|i| spots[(i * spots.len() / count) % spots.len()])
        .collect()
}
