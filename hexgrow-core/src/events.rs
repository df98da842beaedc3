//! Domain events emitted by a tick, for presentation-layer consumers.

use serde::{Deserialize, Serialize};

use crate::board::Hex;
use crate::entity::EntityId;
use crate::state::{GameStatus, WinKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    LevelUp,
    SectorAcquired,
    MoveComplete,
    ActionDenied,
    Error,
    Victory,
    Defeat,
    LeaderboardUpdate,
}

/// Record handed to whoever persists leaderboards
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub winner: EntityId,
    pub outcome: GameStatus,
    pub condition: WinKind,
    pub score: u64,
    pub ticks: u64,
    pub player_rank: u8,
    pub tiles_owned: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    Level { at: Hex, level: u8, income: u64 },
    Arrived { at: Hex },
    Leaderboard(LeaderboardEntry),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub kind: EventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<EventPayload>,
}

impl GameEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            entity_id: None,
            message: None,
            payload: None,
        }
    }

    pub fn entity(mut self, id: EntityId) -> Self {
        self.entity_id = Some(id);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn payload(mut self, payload: EventPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn denied(id: EntityId, reason: impl Into<String>) -> Self {
        Self::new(EventKind::ActionDenied).entity(id).message(reason)
    }
}
