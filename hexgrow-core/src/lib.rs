//! HEXGROW Core - Territorial growth simulation
//!
//! This crate provides the deterministic simulation engine for HEXGROW:
//! - Hex geometry (axial coordinates, rings, spirals)
//! - Tiered tiles and the growth rule ladder
//! - A* pathfinding over tiered terrain
//! - Spatial world index
//! - Utility-based bot planner with goal memory
//! - Action processing with optimistic version checks
//! - Tick systems and the session engine

pub mod board;
pub mod grid;
pub mod entity;
pub mod growth;
pub mod pathfinding;
pub mod world_index;
pub mod config;
pub mod state;
pub mod events;
pub mod actions;
pub mod planner;
pub mod systems;
pub mod engine;

// Re-exports for convenient access
pub use board::{Hex, DIRECTIONS};
pub use grid::{Grid, Tile, MAX_LEVEL};
pub use entity::{BotMemory, Entity, EntityId, EntityState, Goal, GoalKind, GrowthIntent, QueueStep};
pub use growth::{evaluate, GrowthDenial, GrowthPath};
pub use pathfinding::{find_path, path_cost};
pub use world_index::WorldIndex;
pub use config::{ConfigError, Difficulty, GameConfig, PlannerProfile, SearchLimits};
pub use state::{GameStatus, SessionState, Standing, WinCondition, WinKind};
pub use events::{EventKind, EventPayload, GameEvent, LeaderboardEntry};
pub use actions::{Action, ActionError};
pub use planner::{Plan, PlanContext};
pub use engine::{Engine, TickOutcome};
