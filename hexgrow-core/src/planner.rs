//! Utility-based bot planner
//!
//! One decision per bot per AI pass, in six steps:
//!
//! 1. Deadlock recovery after a failed action
//! 2. Opportunistic finish of in-flight growth
//! 3. Goal re-validation
//! 4. Goal selection by scoring nearby tiles
//! 5. Execution of the goal (UPGRADE in place, or MOVE toward it)
//! 6. Wander fallback
//!
//! The planner only proposes. The resulting action still has to pass the
//! action processor, which writes any failure back into the bot's memory.

use rand::Rng;
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::actions::Action;
use crate::board::Hex;
use crate::config::{PlannerProfile, SearchLimits};
use crate::entity::{BotMemory, Entity, Goal, GoalKind, GoalTag};
use crate::grid::{Grid, Tile};
use crate::growth::{evaluate, evaluate_at, income};
use crate::pathfinding::{find_path, path_cost, step_allowed};
use crate::state::{WinCondition, WinKind};
use crate::world_index::WorldIndex;

/// Income weight multiplier when the player is out-earning the bot
const CATCH_UP_INCOME: f32 = 1.5;

/// Rank-up bonus multiplier when the player out-ranks the bot
const CATCH_UP_RANK: f32 = 1.5;

// ============================================================================
// CONTEXT AND OUTPUT
// ============================================================================

/// Everything a bot may look at while deciding
pub struct PlanContext<'a> {
    pub grid: &'a Grid,
    pub player: &'a Entity,
    pub win_condition: Option<WinCondition>,
    pub index: &'a WorldIndex,
    pub state_version: u64,
    pub profile: &'a PlannerProfile,
    pub queue_size: usize,
    /// Targets already claimed by other bots this pass
    pub reserved: &'a FxHashSet<Hex>,
    pub now_ms: u64,
    pub limits: &'a SearchLimits,
    pub coins_per_move: u64,
    pub income_per_level: u64,
}

/// A proposed action and the reasoning that led to it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plan {
    pub action: Action,
    pub trace: Vec<String>,
}

impl Plan {
    fn new(action: Action, trace: Vec<String>) -> Self {
        Self { action, trace }
    }
}

// ============================================================================
// PLANNING
// ============================================================================

/// Decide one action for `bot`. `memory` is the bot's own memory, taken
/// out of the entity so the planner can update goals in place.
pub fn plan<R: Rng + ?Sized>(
    ctx: &PlanContext,
    bot: &Entity,
    memory: &mut BotMemory,
    rng: &mut R,
) -> Plan {
    let mut trace = Vec::new();
    let version = Some(ctx.state_version);
    let here = bot.position;

    // 1. Deadlock recovery, once per failure
    if let Some(failure) = memory.failure.as_mut().filter(|f| !f.acknowledged) {
        failure.acknowledged = true;
        let goal_tag = memory.goal.map(|g| g.kind.tag());
        if goal_tag == Some(GoalTag::Growth) || failure.during == Some(GoalTag::Growth) {
            trace.push(format!("growth stalled ({}), preparing cycle", failure.reason));
            memory.goal = Some(Goal {
                kind: GoalKind::PrepareCycle { target: None },
                priority: 0.0,
                expires_at_ms: ctx.now_ms + ctx.profile.prepare_cycle_ttl_ms,
            });
        } else if memory.goal.take().is_some() {
            trace.push(format!("dropping goal after failure ({})", failure.reason));
        }
    }

    // 2. Opportunistic finish
    if !memory.last_action_failed() {
        let in_flight = ctx.grid.get(here).is_some_and(Tile::in_progress);
        if in_flight
            && evaluate_at(ctx.grid, ctx.index.occupied(), bot, here, ctx.queue_size).is_ok()
        {
            trace.push(format!("finishing growth at {}", here));
            return Plan::new(Action::Upgrade { at: here, version }, trace);
        }
    }

    // 3. Goal re-validation
    if let Some(goal) = memory.goal {
        if let Some(reason) = invalid_goal_reason(ctx, bot, &goal) {
            trace.push(format!("discarding goal: {}", reason));
            memory.goal = None;
        }
    }

    // 4. Goal selection
    let unresolved = matches!(
        memory.goal,
        None | Some(Goal {
            kind: GoalKind::PrepareCycle { target: None },
            ..
        })
    );
    if unresolved {
        select_goal(ctx, bot, memory, rng, &mut trace);
    }

    // 5. Execution
    if let Some(target) = memory.goal.and_then(|g| g.kind.target()) {
        return execute(ctx, bot, memory, target, trace);
    }

    // 6. Fallback
    wander(ctx, bot, rng, trace)
}

/// Why an existing goal should be dropped, if it should
fn invalid_goal_reason(ctx: &PlanContext, bot: &Entity, goal: &Goal) -> Option<&'static str> {
    if goal.is_expired(ctx.now_ms) {
        return Some("expired");
    }
    let target = goal.kind.target()?;
    let Some(tile) = ctx.grid.get(target) else {
        return Some("target vanished");
    };
    match goal.kind {
        GoalKind::Growth { .. } => {
            if tile.max_level > bot.rank || tile.next_level().saturating_sub(1) > bot.rank {
                return Some("target exceeds rank");
            }
        }
        GoalKind::Expand { .. } => {
            if target == bot.position {
                return Some("already standing on target");
            }
            if ctx.index.occupied_by_other(target, bot.id) {
                return Some("target occupied");
            }
        }
        GoalKind::PrepareCycle { .. } => {
            if target == bot.position && tile.max_level >= 1 {
                return Some("target already claimed");
            }
            if ctx.index.occupied_by_other(target, bot.id) {
                return Some("target occupied");
            }
        }
    }
    None
}

/// Score nearby tiles and adopt the best as the new goal
fn select_goal<R: Rng + ?Sized>(
    ctx: &PlanContext,
    bot: &Entity,
    memory: &mut BotMemory,
    rng: &mut R,
    trace: &mut Vec<String>,
) {
    let preparing = memory.goal.map(|g| g.kind.tag()) == Some(GoalTag::PrepareCycle);
    let needs_cycle = preparing || bot.recent_upgrades.len() < ctx.queue_size;
    let radius = if memory.last_action_failed() {
        ctx.profile.recovery_radius
    } else {
        ctx.profile.search_radius
    };
    let avoid = memory.failure.as_ref().and_then(|f| f.target);
    let weights = tilted_weights(ctx, bot);
    let obstacles = ctx.index.obstacles_for(bot.id);

    let mut best: Option<(&Tile, f32)> = None;
    for tile in ctx.index.within_radius(ctx.grid, bot.position, radius) {
        if ctx.index.occupied_by_other(tile.coord, bot.id)
            || ctx.reserved.contains(&tile.coord)
            || Some(tile.coord) == avoid
        {
            continue;
        }
        if needs_cycle && tile.max_level > 1 {
            continue;
        }
        let score = score_candidate(ctx, bot, tile, &obstacles, &weights, needs_cycle, rng);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((tile, score));
        }
    }

    let Some((tile, score)) = best.filter(|&(_, s)| s >= weights.reject_threshold) else {
        trace.push("no candidate worth pursuing".to_string());
        if !preparing {
            memory.goal = None;
        }
        return;
    };

    let target = tile.coord;
    let goal = if preparing {
        Goal {
            kind: GoalKind::PrepareCycle {
                target: Some(target),
            },
            priority: score,
            // Keep the short deadline of the recovery goal
            expires_at_ms: memory.goal.map_or(ctx.now_ms, |g| g.expires_at_ms),
        }
    } else {
        let kind = if tile.next_level() == 1 {
            GoalKind::Expand { target }
        } else {
            GoalKind::Growth { target }
        };
        Goal {
            kind,
            priority: score,
            expires_at_ms: ctx.now_ms + ctx.profile.goal_ttl_ms,
        }
    };
    trace.push(format!(
        "selected {:?} at {} (score {:.1})",
        goal.kind.tag(),
        target,
        score
    ));
    memory.goal = Some(goal);
}

/// Profile weights adjusted for how the player is doing
fn tilted_weights(ctx: &PlanContext, bot: &Entity) -> PlannerProfile {
    let mut weights = *ctx.profile;
    match ctx.win_condition.map(|w| w.kind) {
        Some(WinKind::Wealth) if ctx.player.total_coins_earned > bot.total_coins_earned => {
            weights.income_weight *= CATCH_UP_INCOME;
        }
        Some(WinKind::Domination) if ctx.player.rank > bot.rank => {
            weights.rank_up_bonus *= CATCH_UP_RANK;
        }
        _ => {}
    }
    weights
}

fn score_candidate<R: Rng + ?Sized>(
    ctx: &PlanContext,
    bot: &Entity,
    tile: &Tile,
    obstacles: &[Hex],
    weights: &PlannerProfile,
    needs_cycle: bool,
    rng: &mut R,
) -> f32 {
    let distance = bot.position.distance_to(tile.coord) as f32;
    let jitter = (rng.gen::<f32>() - 0.5) * weights.jitter;
    let mut score = -distance * weights.distance_weight + jitter;

    // Judged as if the bot already stood on the tile, so its current
    // position no longer counts as occupied
    let reachable = tile.coord == bot.position || tile.max_level <= bot.rank;
    let neighbors = ctx.grid.existing_neighbors(tile.coord);
    let growable = reachable
        && evaluate(Some(tile), bot, &neighbors, obstacles, ctx.queue_size).is_ok();

    if !growable {
        return score + weights.ungrowable_penalty;
    }

    let next = tile.next_level();
    score += income(next, ctx.income_per_level) as f32 * weights.income_weight;
    if next > tile.max_level {
        score += weights.expansion_bonus;
        if next > bot.rank {
            score += weights.rank_up_bonus;
        }
    }
    if needs_cycle && next == 1 {
        score += weights.cycle_refill_bonus;
    }
    score
}

/// Turn the current goal into an action
fn execute(
    ctx: &PlanContext,
    bot: &Entity,
    memory: &mut BotMemory,
    target: Hex,
    mut trace: Vec<String>,
) -> Plan {
    let version = Some(ctx.state_version);

    if target == bot.position {
        return match evaluate_at(ctx.grid, ctx.index.occupied(), bot, target, ctx.queue_size) {
            Ok(_) => {
                trace.push(format!("upgrading {}", target));
                Plan::new(Action::Upgrade { at: target, version }, trace)
            }
            Err(denial) => {
                trace.push(format!("cannot grow {}: {}", target, denial));
                memory.record_failure(denial.to_string());
                memory.goal = None;
                Plan::new(Action::Wait { version }, trace)
            }
        };
    }

    let obstacles = ctx.index.obstacles_for(bot.id);
    match find_path(bot.position, target, ctx.grid, bot.rank, &obstacles, ctx.limits) {
        Some(path) if !path.is_empty() => {
            let cost = path_cost(ctx.grid, &path) as u64;
            let budget = bot.movement_budget(ctx.coins_per_move);
            if budget >= cost {
                trace.push(format!("moving to {} ({} steps, cost {})", target, path.len(), cost));
                Plan::new(Action::Move { path, version }, trace)
            } else {
                trace.push(format!("saving up for {} (cost {}, budget {})", target, cost, budget));
                Plan::new(Action::Wait { version }, trace)
            }
        }
        _ => {
            trace.push(format!("{} unreachable", target));
            memory.goal = None;
            Plan::new(Action::Wait { version }, trace)
        }
    }
}

/// Step onto a random free neighbor, if the move reserve allows
fn wander<R: Rng + ?Sized>(
    ctx: &PlanContext,
    bot: &Entity,
    rng: &mut R,
    mut trace: Vec<String>,
) -> Plan {
    let version = Some(ctx.state_version);
    if bot.moves < ctx.profile.min_move_reserve {
        trace.push("resting".to_string());
        return Plan::new(Action::Wait { version }, trace);
    }

    let options: Vec<Hex> = bot
        .position
        .neighbors()
        .into_iter()
        .filter(|&n| {
            !ctx.index.is_occupied(n)
                && !ctx.reserved.contains(&n)
                && step_allowed(ctx.grid, bot.position, n, bot.rank).is_some()
        })
        .collect();

    if options.is_empty() {
        trace.push("boxed in".to_string());
        return Plan::new(Action::Wait { version }, trace);
    }

    let step = options[rng.gen_range(0..options.len())];
    debug!(bot = %bot.id, %step, "wandering");
    trace.push(format!("wandering to {}", step));
    Plan::new(
        Action::Move {
            path: vec![step],
            version,
        },
        trace,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityId, Failure};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const QUEUE: usize = 3;

    struct Fixture {
        grid: Grid,
        player: Entity,
        bot: Entity,
        profile: PlannerProfile,
        limits: SearchLimits,
        reserved: FxHashSet<Hex>,
    }

    impl Fixture {
        /// Bot at the origin of a flat revealed world, player far away
        fn new() -> Self {
            let mut grid = Grid::new(10);
            grid.reveal_around(Hex::ORIGIN, 6);
            Self {
                grid,
                player: Entity::new_player(Hex::new(6, -6), 0, 0),
                bot: Entity::new_bot(EntityId::bot(1), Hex::ORIGIN, 0, 3),
                profile: PlannerProfile {
                    jitter: 0.0,
                    ..PlannerProfile::default()
                },
                limits: SearchLimits::default(),
                reserved: FxHashSet::default(),
            }
        }

        fn plan_with(&self, index: &WorldIndex, memory: &mut BotMemory, now_ms: u64) -> Plan {
            let ctx = PlanContext {
                grid: &self.grid,
                player: &self.player,
                win_condition: Some(WinCondition::new(WinKind::Wealth, 100, 1)),
                index,
                state_version: 4,
                profile: &self.profile,
                queue_size: QUEUE,
                reserved: &self.reserved,
                now_ms,
                limits: &self.limits,
                coins_per_move: 2,
                income_per_level: 5,
            };
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            plan(&ctx, &self.bot, memory, &mut rng)
        }

        fn run(&self, memory: &mut BotMemory) -> Plan {
            let index = WorldIndex::build([&self.player, &self.bot]);
            self.plan_with(&index, memory, 1_000)
        }
    }

    fn goal(kind: GoalKind, expires_at_ms: u64) -> Goal {
        Goal {
            kind,
            priority: 0.0,
            expires_at_ms,
        }
    }

    #[test]
    fn test_fresh_bot_claims_own_tile() {
        let fx = Fixture::new();
        let mut memory = BotMemory::default();
        let plan = fx.run(&mut memory);
        assert_eq!(
            plan.action,
            Action::Upgrade {
                at: Hex::ORIGIN,
                version: Some(4)
            }
        );
        assert_eq!(
            memory.goal.map(|g| g.kind),
            Some(GoalKind::Expand { target: Hex::ORIGIN })
        );
    }

    #[test]
    fn test_degenerate_expand_goal_is_replaced() {
        let mut fx = Fixture::new();
        fx.grid.insert(Tile::with_levels(Hex::ORIGIN, 1, 1));
        let mut memory = BotMemory {
            goal: Some(goal(GoalKind::Expand { target: Hex::ORIGIN }, 5_000)),
            failure: None,
        };
        let plan = fx.run(&mut memory);
        match plan.action {
            Action::Move { path, version } => {
                assert_eq!(path.len(), 1);
                assert_eq!(version, Some(4));
            }
            other => panic!("expected a move, got {:?}", other),
        }
        assert!(plan.trace.iter().any(|l| l.contains("already standing")));
        let target = memory.goal.and_then(|g| g.kind.target()).unwrap();
        assert_eq!(target.distance_to(Hex::ORIGIN), 1);
    }

    #[test]
    fn test_claimed_prepare_cycle_target_is_released() {
        let mut fx = Fixture::new();
        fx.grid.insert(Tile::with_levels(Hex::ORIGIN, 1, 1));
        fx.bot.push_recent_upgrade(Hex::ORIGIN, QUEUE);
        let mut memory = BotMemory {
            goal: Some(goal(
                GoalKind::PrepareCycle {
                    target: Some(Hex::ORIGIN),
                },
                5_000,
            )),
            failure: None,
        };

        let plan = fx.run(&mut memory);
        assert!(plan.trace.iter().any(|l| l.contains("already claimed")));
        assert!(memory.failure.is_none());
        match plan.action {
            Action::Move { path, .. } => assert_eq!(path.len(), 1),
            other => panic!("expected a move, got {:?}", other),
        }
        let target = memory.goal.and_then(|g| g.kind.target()).unwrap();
        assert_ne!(target, Hex::ORIGIN);
    }

    #[test]
    fn test_growth_failure_turns_into_prepare_cycle() {
        let mut fx = Fixture::new();
        fx.grid.insert(Tile::with_levels(Hex::ORIGIN, 1, 1));
        let mut memory = BotMemory {
            goal: Some(goal(GoalKind::Growth { target: Hex::ORIGIN }, 5_000)),
            failure: None,
        };
        memory.record_failure("CYCLE INCOMPLETE (0/3)");

        let plan = fx.run(&mut memory);
        let goal = memory.goal.unwrap();
        assert_eq!(goal.kind.tag(), GoalTag::PrepareCycle);
        assert_eq!(goal.expires_at_ms, 1_000 + fx.profile.prepare_cycle_ttl_ms);
        let target = goal.kind.target().unwrap();
        assert_ne!(target, Hex::ORIGIN);
        // Recovery radius applies while the failure is on record
        assert!(target.distance_to(Hex::ORIGIN) <= fx.profile.recovery_radius);
        assert!(matches!(plan.action, Action::Move { .. }));
        assert!(memory.failure.as_ref().unwrap().acknowledged);
    }

    #[test]
    fn test_non_growth_failure_clears_goal_once() {
        let fx = Fixture::new();
        let far = Hex::new(3, 0);
        let mut memory = BotMemory {
            goal: Some(goal(GoalKind::Expand { target: far }, 5_000)),
            failure: None,
        };
        memory.record_failure("PATH BLOCKED");
        let plan = fx.run(&mut memory);
        assert!(plan.trace[0].contains("dropping goal"));
        // The failed target is not picked again straight away
        assert_ne!(memory.goal.and_then(|g| g.kind.target()), Some(far));

        let again = fx.run(&mut memory);
        assert!(!again.trace.iter().any(|l| l.contains("dropping goal")));
    }

    #[test]
    fn test_expired_goal_discarded() {
        let fx = Fixture::new();
        let mut memory = BotMemory {
            goal: Some(goal(GoalKind::Expand { target: Hex::new(2, 0) }, 500)),
            failure: None,
        };
        let plan = fx.run(&mut memory);
        assert!(plan.trace.iter().any(|l| l.contains("expired")));
    }

    #[test]
    fn test_occupied_expand_target_discarded() {
        let mut fx = Fixture::new();
        let target = Hex::new(2, 0);
        fx.player.position = target;
        let mut memory = BotMemory {
            goal: Some(goal(GoalKind::Expand { target }, 5_000)),
            failure: None,
        };
        let plan = fx.run(&mut memory);
        assert!(plan.trace.iter().any(|l| l.contains("occupied")));
        assert_ne!(memory.goal.and_then(|g| g.kind.target()), Some(target));
    }

    #[test]
    fn test_reserved_targets_skipped() {
        let mut fx = Fixture::new();
        fx.grid.insert(Tile::with_levels(Hex::ORIGIN, 1, 1));
        let mut memory = BotMemory::default();
        let first = fx.run(&mut memory);
        let Action::Move { path, .. } = first.action else {
            panic!("expected a move");
        };
        let claimed = *path.last().unwrap();

        fx.reserved.insert(claimed);
        let mut memory = BotMemory::default();
        let second = fx.run(&mut memory);
        let Action::Move { path, .. } = second.action else {
            panic!("expected a move");
        };
        assert_ne!(*path.last().unwrap(), claimed);
    }

    #[test]
    fn test_full_cycle_prefers_growth() {
        let mut fx = Fixture::new();
        // A level-1 plateau the bot stands on, with two same-tier supports
        for q in -1..=1 {
            fx.grid.insert(Tile::with_levels(Hex::new(q, 0), 1, 1));
        }
        for q in -1..=1 {
            fx.bot.push_recent_upgrade(Hex::new(q, 0), QUEUE);
        }
        let mut memory = BotMemory::default();
        let plan = fx.run(&mut memory);
        assert_eq!(
            memory.goal.map(|g| g.kind),
            Some(GoalKind::Growth { target: Hex::ORIGIN })
        );
        assert!(matches!(plan.action, Action::Upgrade { at, .. } if at == Hex::ORIGIN));
    }

    #[test]
    fn test_incomplete_cycle_restricts_to_low_tiles() {
        let mut fx = Fixture::new();
        for hex in crate::board::spiral(Hex::ORIGIN, 6) {
            if hex != Hex::ORIGIN {
                fx.grid.insert(Tile::with_levels(hex, 2, 2));
            }
        }
        fx.grid.insert(Tile::with_levels(Hex::ORIGIN, 1, 1));
        let mut memory = BotMemory::default();
        let plan = fx.run(&mut memory);
        // Only the bot's own tile qualifies, it cannot grow yet, and the
        // tall ring around it is beyond rank 1
        assert!(memory.goal.is_none());
        assert!(plan.trace.iter().any(|l| l.contains("no candidate")));
        assert!(matches!(plan.action, Action::Wait { .. }));
    }

    #[test]
    fn test_unaffordable_target_waits() {
        let mut fx = Fixture::new();
        fx.grid.insert(Tile::with_levels(Hex::ORIGIN, 1, 1));
        fx.bot.moves = 0;
        let mut memory = BotMemory::default();
        let plan = fx.run(&mut memory);
        assert!(matches!(plan.action, Action::Wait { .. }));
        assert!(plan.trace.iter().any(|l| l.starts_with("saving up")));
        assert!(memory.goal.is_some());
    }

    #[test]
    fn test_unreachable_target_clears_goal() {
        let mut fx = Fixture::new();
        let target = Hex::new(3, 0);
        // Wall the target off with tall terrain
        for n in target.neighbors() {
            fx.grid.insert(Tile::with_levels(n, 5, 5));
        }
        let mut memory = BotMemory {
            goal: Some(goal(GoalKind::Expand { target }, 5_000)),
            failure: None,
        };
        let plan = fx.run(&mut memory);
        assert!(matches!(plan.action, Action::Wait { .. }));
        assert!(memory.goal.is_none());
    }

    #[test]
    fn test_opportunistic_finish() {
        let mut fx = Fixture::new();
        let mut tile = Tile::new(Hex::ORIGIN);
        tile.progress = 2;
        fx.grid.insert(tile);
        let mut memory = BotMemory {
            goal: Some(goal(GoalKind::Expand { target: Hex::new(4, 0) }, 5_000)),
            failure: None,
        };
        let plan = fx.run(&mut memory);
        assert!(matches!(plan.action, Action::Upgrade { at, .. } if at == Hex::ORIGIN));
        assert!(plan.trace[0].starts_with("finishing"));
    }

    #[test]
    fn test_wander_fallback_and_rest() {
        let mut fx = Fixture::new();
        fx.profile.reject_threshold = f32::MAX;
        let mut memory = BotMemory::default();
        let plan = fx.run(&mut memory);
        match plan.action {
            Action::Move { path, .. } => assert!(path[0].is_adjacent(Hex::ORIGIN)),
            other => panic!("expected a wander move, got {:?}", other),
        }

        fx.bot.moves = 0;
        let plan = fx.run(&mut BotMemory::default());
        assert!(matches!(plan.action, Action::Wait { .. }));
    }

    #[test]
    fn test_catch_up_weights() {
        let mut fx = Fixture::new();
        fx.player.earn(50);
        let index = WorldIndex::build([&fx.player, &fx.bot]);
        let ctx = PlanContext {
            grid: &fx.grid,
            player: &fx.player,
            win_condition: Some(WinCondition::new(WinKind::Wealth, 100, 1)),
            index: &index,
            state_version: 0,
            profile: &fx.profile,
            queue_size: QUEUE,
            reserved: &fx.reserved,
            now_ms: 0,
            limits: &fx.limits,
            coins_per_move: 2,
            income_per_level: 5,
        };
        let weights = tilted_weights(&ctx, &fx.bot);
        assert!(weights.income_weight > fx.profile.income_weight);
        assert_eq!(weights.rank_up_bonus, fx.profile.rank_up_bonus);
    }

    #[test]
    fn test_same_seed_same_plan() {
        let mut fx = Fixture::new();
        fx.profile.jitter = 5.0;
        fx.grid.insert(Tile::with_levels(Hex::ORIGIN, 1, 1));
        let a = fx.run(&mut BotMemory::default());
        let b = fx.run(&mut BotMemory::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_failure_record_shape() {
        let failure = Failure {
            reason: "X".into(),
            during: None,
            target: None,
            acknowledged: false,
        };
        let mut memory = BotMemory {
            goal: None,
            failure: Some(failure),
        };
        let fx = Fixture::new();
        fx.run(&mut memory);
        assert!(memory.failure.unwrap().acknowledged);
    }
}
