//! Session engine
//!
//! Owns the authoritative [`SessionState`] snapshot, the seeded random
//! source and the configuration. Each tick runs the systems in a fixed
//! order against a copy-on-write view of the current snapshot and commits
//! the result as the new snapshot.
//!
//! ```text
//! process_tick(delta_ms)
//!   now_ms += delta_ms
//!   growth   -> ai -> movement -> victory
//!   tick += 1, version += 1, trim logs
//! ```

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::actions::{self, Action, ActionError};
use crate::config::{ConfigError, GameConfig, PlannerProfile};
use crate::entity::{EntityId, GrowthIntent};
use crate::events::GameEvent;
use crate::state::{PlayerIntent, SessionState};
use crate::systems::{self, TickContext};
use crate::world_index::WorldIndex;

/// Result of one tick: the committed snapshot and what happened in it
#[derive(Clone, Debug)]
pub struct TickOutcome {
    pub state: Arc<SessionState>,
    pub events: Vec<GameEvent>,
}

pub struct Engine {
    config: GameConfig,
    profile: PlannerProfile,
    state: Arc<SessionState>,
    rng: ChaCha8Rng,
}

impl Engine {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let state = SessionState::new(&config);
        info!(
            seed = ?config.seed,
            bots = config.bot_count,
            radius = config.world_radius,
            difficulty = ?config.difficulty,
            "session created"
        );
        Ok(Self {
            profile: config.difficulty.profile(),
            config,
            state: Arc::new(state),
            rng,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The current committed snapshot
    pub fn state(&self) -> Arc<SessionState> {
        Arc::clone(&self.state)
    }

    pub fn is_over(&self) -> bool {
        self.state.status.is_terminal()
    }

    /// Advance the logical clock by `delta_ms` and run one tick
    pub fn process_tick(&mut self, delta_ms: u64) -> TickOutcome {
        if self.is_over() {
            return TickOutcome {
                state: self.state(),
                events: Vec::new(),
            };
        }

        let state = Arc::make_mut(&mut self.state);
        state.now_ms += delta_ms;

        let mut index = WorldIndex::build(state.entities());
        let mut ctx = TickContext::new(&self.config, &self.profile, &mut self.rng);

        systems::growth::run(state, &index, &mut ctx);
        systems::ai::run(state, &index, &mut ctx);
        systems::movement::run(state, &mut index, &mut ctx);
        systems::victory::run(state, &mut ctx);

        state.tick += 1;
        state.version += 1;
        state.truncate_logs(self.config.max_log_len);

        let events = ctx.events;
        debug!(tick = state.tick, events = events.len(), "tick committed");
        if state.status.is_terminal() {
            info!(tick = state.tick, status = ?state.status, "session finished");
        }

        TickOutcome {
            state: self.state(),
            events,
        }
    }

    /// One tick of the configured length
    pub fn tick(&mut self) -> TickOutcome {
        self.process_tick(self.config.tick_ms)
    }

    /// Validate and apply an external action. Accepted actions bump the
    /// state version; rejected ones leave it unchanged.
    pub fn apply_action(&mut self, actor: EntityId, action: Action) -> Result<(), ActionError> {
        let index = WorldIndex::build(self.state.entities());
        let queue_size = self.config.queue_size();

        // Stale or unknown requests never touch the snapshot
        actions::validate(&self.state, &index, actor, &action, queue_size).or_else(|err| {
            match err {
                ActionError::StaleState { .. } | ActionError::UnknownActor(_) => Err(err),
                _ => Ok(()),
            }
        })?;

        let state = Arc::make_mut(&mut self.state);
        actions::apply(state, &index, actor, &action, queue_size)?;
        state.version += 1;
        Ok(())
    }

    /// UI growth toggle; not version checked
    pub fn set_player_intent(&mut self, growing: bool, intent: GrowthIntent) {
        let state = Arc::make_mut(&mut self.state);
        state.player_intent = PlayerIntent { growing, intent };
    }
}
