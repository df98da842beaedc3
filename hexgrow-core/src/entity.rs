//! Entities (player and bots), their action queue and bot memory

use crate::board::Hex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

// ============================================================================
// IDENTITY
// ============================================================================

/// Entity identifier. The player is always id 0, bots are numbered from 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u16);

impl EntityId {
    pub const PLAYER: EntityId = EntityId(0);

    pub fn bot(n: u16) -> Self {
        EntityId(n)
    }

    pub fn is_player(self) -> bool {
        self == Self::PLAYER
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_player() {
            write!(f, "player")
        } else {
            write!(f, "bot-{}", self.0)
        }
    }
}

/// Entity FSM state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityState {
    Idle,
    Moving,
    Growing,
    Locked,
}

/// What a growth request is after
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthIntent {
    /// Restore a decayed tile, then stop
    Recover,
    /// Keep climbing while the rules allow
    #[default]
    Upgrade,
}

/// One entry of an entity's movement queue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueStep {
    Move(Hex),
    /// Grow-in-place marker
    Grow { at: Hex, intent: GrowthIntent },
}

// ============================================================================
// BOT MEMORY
// ============================================================================

/// Discriminant of a goal, used where the target is irrelevant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalTag {
    Expand,
    Growth,
    PrepareCycle,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum GoalKind {
    /// Walk to a virgin tile and claim it
    Expand { target: Hex },
    /// Raise an existing tile by a tier
    Growth { target: Hex },
    /// Transient: hunt cheap level-1 claims to refill the cycle queue.
    /// The target is picked on the next selection pass.
    PrepareCycle { target: Option<Hex> },
}

impl GoalKind {
    pub fn target(&self) -> Option<Hex> {
        match *self {
            GoalKind::Expand { target } | GoalKind::Growth { target } => Some(target),
            GoalKind::PrepareCycle { target } => target,
        }
    }

    pub fn tag(&self) -> GoalTag {
        match self {
            GoalKind::Expand { .. } => GoalTag::Expand,
            GoalKind::Growth { .. } => GoalTag::Growth,
            GoalKind::PrepareCycle { .. } => GoalTag::PrepareCycle,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub kind: GoalKind,
    pub priority: f32,
    /// Logical-clock deadline in milliseconds
    pub expires_at_ms: u64,
}

impl Goal {
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms
    }
}

/// Record of the last rejected action
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub reason: String,
    /// Goal that was being pursued when the action failed
    pub during: Option<GoalTag>,
    /// Target of that goal; skipped by the next selection pass
    pub target: Option<Hex>,
    /// Set once the planner has reacted to this failure
    pub acknowledged: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BotMemory {
    pub goal: Option<Goal>,
    pub failure: Option<Failure>,
}

impl BotMemory {
    pub fn last_action_failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn record_failure(&mut self, reason: impl Into<String>) {
        self.failure = Some(Failure {
            reason: reason.into(),
            during: self.goal.map(|g| g.kind.tag()),
            target: self.goal.and_then(|g| g.kind.target()),
            acknowledged: false,
        });
    }

    pub fn clear_failure(&mut self) {
        self.failure = None;
    }
}

// ============================================================================
// ENTITY
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Role {
    Player,
    Bot(BotMemory),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub role: Role,
    pub position: Hex,
    pub state: EntityState,
    pub coins: u64,
    pub total_coins_earned: u64,
    pub moves: u32,
    /// Global rank; never decreases
    pub rank: u8,
    /// Last level-1 acquisitions, oldest first
    pub recent_upgrades: VecDeque<Hex>,
    pub queue: VecDeque<QueueStep>,
}

impl Entity {
    pub fn new_player(position: Hex, coins: u64, moves: u32) -> Self {
        Self::new(EntityId::PLAYER, Role::Player, position, coins, moves)
    }

    pub fn new_bot(id: EntityId, position: Hex, coins: u64, moves: u32) -> Self {
        Self::new(id, Role::Bot(BotMemory::default()), position, coins, moves)
    }

    fn new(id: EntityId, role: Role, position: Hex, coins: u64, moves: u32) -> Self {
        Self {
            id,
            role,
            position,
            state: EntityState::Idle,
            coins,
            total_coins_earned: 0,
            moves,
            rank: 1,
            recent_upgrades: VecDeque::new(),
            queue: VecDeque::new(),
        }
    }

    pub fn is_bot(&self) -> bool {
        matches!(self.role, Role::Bot(_))
    }

    pub fn memory(&self) -> Option<&BotMemory> {
        match &self.role {
            Role::Bot(memory) => Some(memory),
            Role::Player => None,
        }
    }

    pub fn memory_mut(&mut self) -> Option<&mut BotMemory> {
        match &mut self.role {
            Role::Bot(memory) => Some(memory),
            Role::Player => None,
        }
    }

    pub fn head(&self) -> Option<QueueStep> {
        self.queue.front().copied()
    }

    /// Grow marker at the head of the queue, if any
    pub fn grow_marker(&self) -> Option<(Hex, GrowthIntent)> {
        match self.head() {
            Some(QueueStep::Grow { at, intent }) => Some((at, intent)),
            _ => None,
        }
    }

    pub fn drop_grow_marker(&mut self) {
        if self.grow_marker().is_some() {
            self.queue.pop_front();
        }
    }

    /// Record a level-1 acquisition, evicting the oldest past `cap`
    pub fn push_recent_upgrade(&mut self, hex: Hex, cap: usize) {
        self.recent_upgrades.push_back(hex);
        while self.recent_upgrades.len() > cap {
            self.recent_upgrades.pop_front();
        }
    }

    pub fn earn(&mut self, coins: u64) {
        self.coins += coins;
        self.total_coins_earned += coins;
    }

    /// Total terrain cost this entity can pay right now
    pub fn movement_budget(&self, coins_per_move: u64) -> u64 {
        let from_coins = if coins_per_move == 0 {
            0
        } else {
            self.coins / coins_per_move
        };
        self.moves as u64 + from_coins
    }

    /// Pay a step cost from moves first, then coins. Returns false and
    /// leaves resources untouched if it cannot be afforded.
    pub fn pay_for_step(&mut self, cost: u32, coins_per_move: u64) -> bool {
        if self.movement_budget(coins_per_move) < cost as u64 {
            return false;
        }
        let from_moves = cost.min(self.moves);
        self.moves -= from_moves;
        let remainder = (cost - from_moves) as u64;
        self.coins -= remainder * coins_per_move;
        true
    }
}
