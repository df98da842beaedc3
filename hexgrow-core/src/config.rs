//! Session configuration
//!
//! Everything tunable about a session lives here: world size, economy,
//! cadence, difficulty and the bot scoring weights derived from it.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::state::{WinCondition, WinKind};

/// Configuration errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("world radius must be at least {min}, got {got}")]
    WorldTooSmall { min: i32, got: i32 },

    #[error("too many bots for a world of radius {radius}: {bots}")]
    TooManyBots { radius: i32, bots: usize },

    #[error("tick length must be positive")]
    ZeroTick,

    #[error("activity sample rate must be within [0, 1], got {0}")]
    SampleRate(f32),

    #[error("win target must be positive")]
    ZeroTarget,
}

// ============================================================================
// DIFFICULTY
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Level-1 acquisitions required before any vertical growth
    pub fn queue_size(self) -> usize {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Normal => 3,
            Difficulty::Hard => 4,
        }
    }

    /// Bot scoring weights for this difficulty
    pub fn profile(self) -> PlannerProfile {
        let base = PlannerProfile::default();
        match self {
            Difficulty::Easy => PlannerProfile {
                distance_weight: 3.0,
                jitter: 4.0,
                rank_up_bonus: 10.0,
                ..base
            },
            Difficulty::Normal => base,
            Difficulty::Hard => PlannerProfile {
                distance_weight: 1.5,
                income_weight: 1.5,
                jitter: 0.25,
                rank_up_bonus: 30.0,
                ..base
            },
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {}", other)),
        }
    }
}

/// Heuristic weights and thresholds for the bot planner
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlannerProfile {
    /// Penalty per hex of distance
    pub distance_weight: f32,
    /// Multiplier on the income of the next level
    pub income_weight: f32,
    /// Bonus when the growth would set a new tier on the tile
    pub expansion_bonus: f32,
    /// Bonus when the growth would also raise the bot's rank
    pub rank_up_bonus: f32,
    /// Bonus for level-1 claims while the cycle queue needs refilling
    pub cycle_refill_bonus: f32,
    /// Score of candidates the rules would currently refuse
    pub ungrowable_penalty: f32,
    /// Best scores below this leave the bot without a goal
    pub reject_threshold: f32,
    /// Amplitude of the random tie-break
    pub jitter: f32,
    /// Candidate radius in normal operation
    pub search_radius: i32,
    /// Candidate radius right after a failed action
    pub recovery_radius: i32,
    pub goal_ttl_ms: u64,
    pub prepare_cycle_ttl_ms: u64,
    /// Moves that must be held before wandering
    pub min_move_reserve: u32,
}

impl Default for PlannerProfile {
    fn default() -> Self {
        Self {
            distance_weight: 2.0,
            income_weight: 1.0,
            expansion_bonus: 8.0,
            rank_up_bonus: 20.0,
            cycle_refill_bonus: 6.0,
            ungrowable_penalty: -1000.0,
            reject_threshold: -60.0,
            jitter: 1.0,
            search_radius: 12,
            recovery_radius: 5,
            goal_ttl_ms: 8_000,
            prepare_cycle_ttl_ms: 2_000,
            min_move_reserve: 1,
        }
    }
}

/// Safety caps for pathfinding
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    /// Give up when start and goal are further apart than this
    pub max_distance: i32,
    /// Give up after expanding this many nodes
    pub max_iterations: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_distance: 40,
            max_iterations: 4_000,
        }
    }
}

// ============================================================================
// GAME CONFIG
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
    pub difficulty: Difficulty,
    pub bot_count: usize,
    pub win_condition: Option<WinCondition>,
    pub world_radius: i32,
    /// Radius revealed around each entity at session start
    pub start_reveal_radius: i32,
    /// Default logical length of one tick
    pub tick_ms: u64,
    /// Minimum logical time between AI passes
    pub ai_interval_ms: u64,
    pub growth_ticks_per_level: u32,
    pub income_per_level: u64,
    pub starting_coins: u64,
    pub starting_moves: u32,
    /// Coins spent to cover one move of terrain cost
    pub coins_per_move: u64,
    /// Coins credited to each idle bot per AI pass
    pub passive_income: u64,
    /// Ticks between decay sweeps (0 disables decay)
    pub decay_interval_ticks: u64,
    pub max_log_len: usize,
    /// Fraction of bot decisions copied into the activity log
    pub activity_sample_rate: f32,
    pub search: SearchLimits,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            difficulty: Difficulty::Normal,
            bot_count: 3,
            win_condition: Some(WinCondition::new(WinKind::Wealth, 100, 3)),
            world_radius: 12,
            start_reveal_radius: 2,
            tick_ms: 100,
            ai_interval_ms: 300,
            growth_ticks_per_level: 3,
            income_per_level: 5,
            starting_coins: 0,
            starting_moves: 3,
            coins_per_move: 2,
            passive_income: 1,
            decay_interval_ticks: 600,
            max_log_len: 50,
            activity_sample_rate: 0.25,
            search: SearchLimits::default(),
        }
    }
}

impl GameConfig {
    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set bot count; the win condition's participant count follows
    pub fn with_bots(mut self, bot_count: usize) -> Self {
        self.bot_count = bot_count;
        if let Some(win) = self.win_condition.as_mut() {
            win.bot_count = bot_count;
        }
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_win_condition(mut self, kind: WinKind, target: u64) -> Self {
        self.win_condition = Some(WinCondition::new(kind, target, self.bot_count));
        self
    }

    pub fn queue_size(&self) -> usize {
        self.difficulty.queue_size()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world_radius < 2 {
            return Err(ConfigError::WorldTooSmall {
                min: 2,
                got: self.world_radius,
            });
        }
        // Bots stand on a ring of radius world_radius / 2
        let ring = (self.world_radius / 2).max(1) as usize;
        if self.bot_count > 6 * ring {
            return Err(ConfigError::TooManyBots {
                radius: self.world_radius,
                bots: self.bot_count,
            });
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        if !(0.0..=1.0).contains(&self.activity_sample_rate) {
            return Err(ConfigError::SampleRate(self.activity_sample_rate));
        }
        if matches!(self.win_condition, Some(w) if w.target == 0) {
            return Err(ConfigError::ZeroTarget);
        }
        Ok(())
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.queue_size(), 3);
    }

    #[test]
    fn test_difficulty_queue_sizes() {
        assert!(Difficulty::Easy.queue_size() < Difficulty::Normal.queue_size());
        assert!(Difficulty::Normal.queue_size() < Difficulty::Hard.queue_size());
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("brutal".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let tiny = GameConfig {
            world_radius: 1,
            ..Default::default()
        };
        assert!(matches!(tiny.validate(), Err(ConfigError::WorldTooSmall { .. })));

        let crowded = GameConfig::default().with_bots(100);
        assert!(matches!(crowded.validate(), Err(ConfigError::TooManyBots { .. })));

        let zero = GameConfig::default().with_win_condition(WinKind::Wealth, 0);
        assert_eq!(zero.validate(), Err(ConfigError::ZeroTarget));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "bot_count": 1, "difficulty": "Hard" }"#).unwrap();
        assert_eq!(config.bot_count, 1);
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.world_radius, GameConfig::default().world_radius);
    }

    #[test]
    fn test_with_bots_updates_win_condition() {
        let config = GameConfig::default().with_bots(5);
        assert_eq!(config.win_condition.map(|w| w.bot_count), Some(5));
    }
}
