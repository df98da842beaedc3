//! Action validation and application
//!
//! Every state change requested from outside a system, whether by the UI or
//! by the bot planner, flows through here. Validation failures are ordinary
//! values; a bot's failure is written to its memory to steer its next plan.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::Hex;
use crate::entity::{EntityId, EntityState, GrowthIntent, QueueStep};
use crate::growth::{evaluate_at, GrowthDenial};
use crate::state::SessionState;
use crate::world_index::WorldIndex;

/// A requested action. `version` is the state version the request was
/// computed against; when present it must match the session's.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Move { path: Vec<Hex>, version: Option<u64> },
    Upgrade { at: Hex, version: Option<u64> },
    Wait { version: Option<u64> },
}

impl Action {
    pub fn version(&self) -> Option<u64> {
        match self {
            Action::Move { version, .. }
            | Action::Upgrade { version, .. }
            | Action::Wait { version } => *version,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Action::Move { .. } => "MOVE",
            Action::Upgrade { .. } => "UPGRADE",
            Action::Wait { .. } => "WAIT",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("UNKNOWN ACTOR {0}")]
    UnknownActor(EntityId),

    #[error("STALE STATE (current version {current}, submitted {submitted})")]
    StaleState { current: u64, submitted: u64 },

    #[error("ACTOR LOCKED")]
    Locked,

    #[error("NOT ON TARGET ({0})")]
    NotOnTarget(Hex),

    #[error(transparent)]
    Growth(#[from] GrowthDenial),

    #[error("EMPTY PATH")]
    EmptyPath,

    #[error("INVALID PATH (step {0} is not adjacent)")]
    InvalidPath(usize),
}

impl ActionError {
    /// Failures that must leave the session untouched
    fn is_pure_rejection(&self) -> bool {
        matches!(self, ActionError::StaleState { .. } | ActionError::UnknownActor(_))
    }
}

/// Check an action against the current state without changing anything
pub fn validate(
    state: &SessionState,
    index: &WorldIndex,
    actor: EntityId,
    action: &Action,
    queue_size: usize,
) -> Result<(), ActionError> {
    let entity = state.entity(actor).ok_or(ActionError::UnknownActor(actor))?;

    if let Some(submitted) = action.version() {
        if submitted != state.version {
            return Err(ActionError::StaleState {
                current: state.version,
                submitted,
            });
        }
    }

    if entity.state == EntityState::Locked {
        return Err(ActionError::Locked);
    }

    match action {
        Action::Upgrade { at, .. } => {
            if *at != entity.position {
                return Err(ActionError::NotOnTarget(*at));
            }
            evaluate_at(&state.grid, index.occupied(), entity, *at, queue_size)?;
        }
        Action::Move { path, .. } => {
            if path.is_empty() {
                return Err(ActionError::EmptyPath);
            }
            let mut prev = entity.position;
            for (i, &step) in path.iter().enumerate() {
                if !prev.is_adjacent(step) {
                    return Err(ActionError::InvalidPath(i));
                }
                prev = step;
            }
        }
        Action::Wait { .. } => {}
    }

    Ok(())
}

/// Validate and, on success, install the action's effect on the actor
pub fn apply(
    state: &mut SessionState,
    index: &WorldIndex,
    actor: EntityId,
    action: &Action,
    queue_size: usize,
) -> Result<(), ActionError> {
    if let Err(err) = validate(state, index, actor, action, queue_size) {
        debug!(%actor, action = action.label(), reason = %err, "action rejected");
        if !err.is_pure_rejection() {
            if let Some(memory) = state.entity_mut(actor).and_then(|e| e.memory_mut()) {
                memory.record_failure(err.to_string());
            }
        }
        return Err(err);
    }

    let entity = state
        .entity_mut(actor)
        .ok_or(ActionError::UnknownActor(actor))?;

    match action {
        Action::Move { path, .. } => {
            if entity.state == EntityState::Growing {
                debug!(%actor, "growth interrupted by move");
            }
            entity.queue = path.iter().map(|&h| QueueStep::Move(h)).collect();
            entity.state = EntityState::Moving;
        }
        Action::Upgrade { at, .. } => {
            entity.queue.clear();
            entity.queue.push_back(QueueStep::Grow {
                at: *at,
                intent: GrowthIntent::Upgrade,
            });
            if entity.state == EntityState::Moving {
                entity.state = EntityState::Idle;
            }
        }
        // No-op; a wait keeps any recorded failure for the next plan
        Action::Wait { .. } => return Ok(()),
    }

    if let Some(memory) = entity.memory_mut() {
        memory.clear_failure();
    }
    // A move ends the player's growth request rather than pausing it
    if actor.is_player() && matches!(action, Action::Move { .. }) {
        state.player_intent.growing = false;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::grid::Tile;

    const QUEUE: usize = 3;

    fn session() -> SessionState {
        let mut state = SessionState::new(&GameConfig::default().with_bots(1));
        state.version = 7;
        state
    }

    #[test]
    fn test_stale_version_rejected_without_mutation() {
        let mut state = session();
        let index = WorldIndex::build(state.entities());
        let bot = EntityId::bot(1);
        let at = state.entity(bot).unwrap().position;
        let before = state.entity(bot).unwrap().clone();

        let err = apply(
            &mut state,
            &index,
            bot,
            &Action::Upgrade { at, version: Some(6) },
            QUEUE,
        )
        .unwrap_err();

        assert!(err.to_string().starts_with("STALE STATE"));
        assert_eq!(state.entity(bot).unwrap(), &before);
        assert_eq!(state.version, 7);
    }

    #[test]
    fn test_unversioned_and_current_version_accepted() {
        let mut state = session();
        let index = WorldIndex::build(state.entities());
        let at = state.player.position;
        assert!(apply(&mut state, &index, EntityId::PLAYER, &Action::Wait { version: None }, QUEUE).is_ok());
        assert!(apply(
            &mut state,
            &index,
            EntityId::PLAYER,
            &Action::Upgrade { at, version: Some(7) },
            QUEUE
        )
        .is_ok());
        assert_eq!(
            state.player.queue.front(),
            Some(&QueueStep::Grow {
                at,
                intent: GrowthIntent::Upgrade
            })
        );
    }

    #[test]
    fn test_unknown_and_locked_actor() {
        let mut state = session();
        let index = WorldIndex::build(state.entities());
        let wait = Action::Wait { version: None };
        assert_eq!(
            validate(&state, &index, EntityId::bot(9), &wait, QUEUE),
            Err(ActionError::UnknownActor(EntityId::bot(9)))
        );

        state.entity_mut(EntityId::bot(1)).unwrap().state = EntityState::Locked;
        assert_eq!(
            validate(&state, &index, EntityId::bot(1), &wait, QUEUE),
            Err(ActionError::Locked)
        );
    }

    #[test]
    fn test_move_requires_contiguous_path() {
        let mut state = session();
        let index = WorldIndex::build(state.entities());
        let empty = Action::Move { path: vec![], version: None };
        assert_eq!(
            apply(&mut state, &index, EntityId::PLAYER, &empty, QUEUE),
            Err(ActionError::EmptyPath)
        );
        let gap = Action::Move {
            path: vec![Hex::new(1, 0), Hex::new(3, 0)],
            version: None,
        };
        assert_eq!(
            apply(&mut state, &index, EntityId::PLAYER, &gap, QUEUE),
            Err(ActionError::InvalidPath(1))
        );
    }

    #[test]
    fn test_move_interrupts_growth_and_replaces_queue() {
        let mut state = session();
        let index = WorldIndex::build(state.entities());
        {
            let player = state.entity_mut(EntityId::PLAYER).unwrap();
            player.state = EntityState::Growing;
            player.queue.push_back(QueueStep::Grow {
                at: Hex::ORIGIN,
                intent: GrowthIntent::Upgrade,
            });
        }
        state.player_intent.growing = true;
        let path = vec![Hex::new(1, 0), Hex::new(2, 0)];
        apply(
            &mut state,
            &index,
            EntityId::PLAYER,
            &Action::Move { path: path.clone(), version: Some(7) },
            QUEUE,
        )
        .unwrap();
        assert_eq!(state.player.state, EntityState::Moving);
        assert!(!state.player_intent.growing);
        let queued: Vec<_> = state.player.queue.iter().copied().collect();
        assert_eq!(queued, path.into_iter().map(QueueStep::Move).collect::<Vec<_>>());
    }

    #[test]
    fn test_bot_failure_recorded_and_cleared() {
        let mut state = session();
        let bot = EntityId::bot(1);
        let at = state.entity(bot).unwrap().position;
        // A level-1 tile the bot cannot climb yet
        state.grid_mut().insert(Tile::with_levels(at, 1, 1));
        let index = WorldIndex::build(state.entities());

        let err = apply(&mut state, &index, bot, &Action::Upgrade { at, version: None }, QUEUE)
            .unwrap_err();
        assert!(matches!(err, ActionError::Growth(GrowthDenial::CycleIncomplete { .. })));
        let memory = state.entity(bot).unwrap().memory().unwrap();
        assert!(memory.failure.as_ref().unwrap().reason.contains("CYCLE INCOMPLETE"));

        // Waiting keeps the failure, a successful move clears it
        apply(&mut state, &index, bot, &Action::Wait { version: None }, QUEUE).unwrap();
        assert!(state.entity(bot).unwrap().memory().unwrap().last_action_failed());
        let step = at.neighbor(0);
        apply(&mut state, &index, bot, &Action::Move { path: vec![step], version: None }, QUEUE)
            .unwrap();
        assert!(!state.entity(bot).unwrap().memory().unwrap().last_action_failed());
    }
}
