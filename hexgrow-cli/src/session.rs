//! Shared session plumbing for the commands
//!
//! - Level 2: build_config()
//! - Level 3: play_session(), Autopilot
//! - Level 4: create_rng(), outcome labels

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashSet;

use hexgrow_core::planner::{self, PlanContext};
use hexgrow_core::{
    Action, BotMemory, Difficulty, Engine, EntityId, EntityState, EventKind, EventPayload,
    GameConfig, GameEvent, GameStatus, LeaderboardEntry, Standing, WinKind, WorldIndex,
};

// ============================================================================
// SESSION ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum WinArg {
    Wealth,
    Domination,
}

impl From<WinArg> for WinKind {
    fn from(arg: WinArg) -> Self {
        match arg {
            WinArg::Wealth => WinKind::Wealth,
            WinArg::Domination => WinKind::Domination,
        }
    }
}

/// Session settings shared by every command. Flags override the config file.
#[derive(Args, Clone, Debug)]
pub struct SessionArgs {
    /// Session config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of bots
    #[arg(long)]
    pub bots: Option<usize>,

    /// Bot difficulty (easy, normal, hard)
    #[arg(long)]
    pub difficulty: Option<Difficulty>,

    /// Win condition
    #[arg(long, value_enum)]
    pub win: Option<WinArg>,

    /// Win target (coins earned or rank)
    #[arg(long)]
    pub target: Option<u64>,

    /// World radius
    #[arg(long)]
    pub radius: Option<i32>,

    /// Drive the player with the bot planner
    #[arg(long)]
    pub autopilot: bool,

    /// Give up after this many ticks
    #[arg(long, default_value = "20000")]
    pub max_ticks: u64,
}

/// Outcome of one session
#[derive(Clone, Debug)]
pub struct SessionReport {
    pub seed: Option<u64>,
    pub status: GameStatus,
    pub ticks: u64,
    pub leaderboard: Option<LeaderboardEntry>,
    pub standings: Vec<Standing>,
    pub events: Vec<GameEvent>,
    pub denied: usize,
}

impl SessionReport {
    pub fn winner(&self) -> Option<EntityId> {
        self.leaderboard.as_ref().map(|entry| entry.winner)
    }
}

// ============================================================================
// LEVEL 2 - CONFIGURATION
// ============================================================================

/// Merge the config file (if any) with flag overrides and validate
pub fn build_config(args: &SessionArgs, seed: Option<u64>) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => GameConfig::default(),
    };

    if let Some(bots) = args.bots {
        config = config.with_bots(bots);
    }
    if let Some(difficulty) = args.difficulty {
        config = config.with_difficulty(difficulty);
    }
    if let Some(radius) = args.radius {
        config.world_radius = radius;
    }
    if args.win.is_some() || args.target.is_some() {
        let current = config.win_condition;
        let kind = args
            .win
            .map(WinKind::from)
            .or(current.map(|w| w.kind))
            .unwrap_or(WinKind::Wealth);
        let target = args.target.or(current.map(|w| w.target)).unwrap_or(100);
        config = config.with_win_condition(kind, target);
    }
    if let Some(seed) = seed.or(config.seed) {
        config = config.with_seed(seed);
    }

    config.validate().context("Invalid session config")?;
    Ok(config)
}

// ============================================================================
// LEVEL 3 - SESSION LOOP
// ============================================================================

/// Run one session until it ends or `max_ticks` pass
pub fn play_session(
    config: GameConfig,
    max_ticks: u64,
    autopilot: bool,
    record_events: bool,
) -> Result<SessionReport> {
    let seed = config.seed;
    let mut pilot = autopilot.then(|| Autopilot::new(seed));
    let mut engine = Engine::new(config).context("Failed to start session")?;

    let mut events = Vec::new();
    let mut leaderboard = None;
    let mut denied = 0;

    while !engine.is_over() && engine.state().tick < max_ticks {
        if let Some(pilot) = pilot.as_mut() {
            pilot.drive(&mut engine);
        }
        let outcome = engine.tick();
        for event in outcome.events {
            match (&event.kind, &event.payload) {
                (EventKind::LeaderboardUpdate, Some(EventPayload::Leaderboard(entry))) => {
                    leaderboard = Some(entry.clone());
                }
                (EventKind::ActionDenied, _) => denied += 1,
                _ => {}
            }
            if record_events {
                events.push(event);
            }
        }
    }

    let state = engine.state();
    Ok(SessionReport {
        seed,
        status: state.status,
        ticks: state.tick,
        leaderboard,
        standings: state.summary(),
        events,
        denied,
    })
}

/// Drives the player with the bot planner, submitting through the engine's
/// versioned action interface like any external client would.
pub struct Autopilot {
    memory: BotMemory,
    rng: ChaCha8Rng,
}

impl Autopilot {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            memory: BotMemory::default(),
            rng: create_rng(seed.map(|s| s.wrapping_add(1))),
        }
    }

    pub fn drive(&mut self, engine: &mut Engine) {
        let plan = {
            let state = engine.state();
            let player = &state.player;
            if player.state != EntityState::Idle || !player.queue.is_empty() {
                return;
            }

            let config = engine.config();
            let profile = config.difficulty.profile();
            let index = WorldIndex::build(state.entities());
            let reserved = FxHashSet::default();
            let ctx = PlanContext {
                grid: &state.grid,
                player,
                win_condition: state.win_condition,
                index: &index,
                state_version: state.version,
                profile: &profile,
                queue_size: config.queue_size(),
                reserved: &reserved,
                now_ms: state.now_ms,
                limits: &config.search,
                coins_per_move: config.coins_per_move,
                income_per_level: config.income_per_level,
            };
            planner::plan(&ctx, player, &mut self.memory, &mut self.rng)
        };
        tracing::debug!(action = plan.action.label(), trace = ?plan.trace, "autopilot");

        if matches!(plan.action, Action::Wait { .. }) {
            return;
        }
        match engine.apply_action(EntityId::PLAYER, plan.action) {
            Ok(()) => self.memory.clear_failure(),
            Err(err) => self.memory.record_failure(err.to_string()),
        }
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

pub fn status_label(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Playing => "UNFINISHED",
        GameStatus::Victory => "VICTORY",
        GameStatus::Defeat => "DEFEAT",
    }
}
