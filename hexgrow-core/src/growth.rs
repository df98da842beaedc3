//! Growth rules: may an entity advance a tile's level?
//!
//! The ladder is evaluated top to bottom and the first failure wins:
//! missing tile, tier cap, recovery, acquisition, cycle-lock, rank gate,
//! staircase support. Evaluation is pure and never cached, since occupancy
//! and cycle state change between ticks.

use crate::board::Hex;
use crate::entity::Entity;
use crate::grid::{Grid, Tile, MAX_LEVEL};

/// Same-tier neighbors needed to climb
pub const REQUIRED_SUPPORTS: usize = 2;

/// Supports that may stand under another entity
pub const MAX_OCCUPIED_SUPPORTS: usize = 1;

/// Why growth is allowed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowthPath {
    /// Regrowing toward a previously achieved tier
    Recovery,
    /// Claiming a virgin tile
    Acquisition,
    /// Climbing to a brand new tier
    Upgrade,
}

/// Why growth is denied. The display strings are the user-facing reasons.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GrowthDenial {
    #[error("HEX NOT FOUND")]
    MissingHex,

    #[error("MAX LEVEL")]
    MaxLevel,

    #[error("CYCLE INCOMPLETE ({have}/{need})")]
    CycleIncomplete { have: usize, need: usize },

    #[error("RANK TOO LOW (rank {rank}, needs {needed})")]
    RankTooLow { rank: u8, needed: u8 },

    #[error("NOT ENOUGH SUPPORTS ({found}/2)")]
    NotEnoughSupports { found: usize },

    #[error("SUPPORTS BLOCKED ({occupied} occupied)")]
    SupportsBlocked { occupied: usize },
}

/// Evaluate whether `entity` may advance `tile` by one level.
///
/// `neighbors` are the materialized tiles adjacent to `tile`; `occupied` is
/// every coordinate holding an entity. The climbing entity's own coordinate
/// is never counted as a blocked support.
pub fn evaluate(
    tile: Option<&Tile>,
    entity: &Entity,
    neighbors: &[&Tile],
    occupied: &[Hex],
    required_queue_size: usize,
) -> Result<GrowthPath, GrowthDenial> {
    let tile = tile.ok_or(GrowthDenial::MissingHex)?;

    if tile.max_level >= MAX_LEVEL {
        return Err(GrowthDenial::MaxLevel);
    }

    let next = tile.next_level();

    if next <= tile.max_level {
        return Ok(GrowthPath::Recovery);
    }
    if next == 1 {
        return Ok(GrowthPath::Acquisition);
    }

    let have = entity.recent_upgrades.len();
    if have < required_queue_size {
        return Err(GrowthDenial::CycleIncomplete {
            have,
            need: required_queue_size,
        });
    }

    let needed = next - 1;
    if entity.rank < needed {
        return Err(GrowthDenial::RankTooLow {
            rank: entity.rank,
            needed,
        });
    }

    // Strict equality: taller neighbors are not steps
    let supports: Vec<&&Tile> = neighbors
        .iter()
        .filter(|n| n.coord != tile.coord && n.max_level == tile.max_level)
        .collect();
    if supports.len() < REQUIRED_SUPPORTS {
        return Err(GrowthDenial::NotEnoughSupports {
            found: supports.len(),
        });
    }

    let blocked = supports
        .iter()
        .filter(|n| n.coord != entity.position && occupied.contains(&n.coord))
        .count();
    if blocked > MAX_OCCUPIED_SUPPORTS {
        return Err(GrowthDenial::SupportsBlocked { occupied: blocked });
    }

    Ok(GrowthPath::Upgrade)
}

/// Evaluate growth of the tile at `at`, gathering its neighbors from `grid`
pub fn evaluate_at(
    grid: &Grid,
    occupied: &[Hex],
    entity: &Entity,
    at: Hex,
    required_queue_size: usize,
) -> Result<GrowthPath, GrowthDenial> {
    let neighbors = grid.existing_neighbors(at);
    evaluate(grid.get(at), entity, &neighbors, occupied, required_queue_size)
}

/// Growth ticks needed to complete `level`
pub fn growth_ticks(level: u8, ticks_per_level: u32) -> u32 {
    (level as u32 * ticks_per_level).max(1)
}

/// Coins paid out on reaching `level`
pub fn income(level: u8, income_per_level: u64) -> u64 {
    level as u64 * income_per_level
}
