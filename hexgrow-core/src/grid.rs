//! Tile records and the sparse, lazily revealed world grid

use crate::board::{spiral, Hex};
use crate::entity::EntityId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Highest tier a tile can reach
pub const MAX_LEVEL: u8 = 99;

/// One hex of territory.
///
/// `max_level` is the permanent tier ever achieved; `current_level` is the
/// present height, which may sit below `max_level` after decay and is then
/// grown back through the recovery path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub coord: Hex,
    pub current_level: u8,
    pub max_level: u8,
    /// Elapsed growth ticks toward `current_level + 1`
    pub progress: u32,
    pub owner: Option<EntityId>,
    pub revealed: bool,
}

impl Tile {
    /// Fresh zero-level tile, as materialized by fog-of-war reveal
    pub fn new(coord: Hex) -> Self {
        Self {
            coord,
            current_level: 0,
            max_level: 0,
            progress: 0,
            owner: None,
            revealed: true,
        }
    }

    pub fn with_levels(coord: Hex, current_level: u8, max_level: u8) -> Self {
        Self {
            current_level,
            max_level,
            ..Self::new(coord)
        }
    }

    /// The level the next completed growth would produce
    pub fn next_level(&self) -> u8 {
        self.current_level.saturating_add(1)
    }

    /// Growth is under way but not yet complete
    pub fn in_progress(&self) -> bool {
        self.progress > 0
    }

    pub fn satisfies_invariants(&self) -> bool {
        self.max_level <= MAX_LEVEL && self.current_level as u16 <= self.max_level as u16 + 1
    }
}

/// Terrain traversal cost of stepping onto a tile of the given tier
pub fn step_cost(level: u8) -> u32 {
    if level >= 2 {
        level as u32
    } else {
        1
    }
}

/// Sparse grid keyed by axial coordinate.
///
/// Coordinates beyond `radius` are outside the world: they are never
/// materialized and count as impassable.
#[derive(Clone, Debug, Default)]
pub struct Grid {
    radius: i32,
    tiles: FxHashMap<Hex, Tile>,
}

impl Grid {
    pub fn new(radius: i32) -> Self {
        Self {
            radius,
            tiles: FxHashMap::default(),
        }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn in_bounds(&self, hex: Hex) -> bool {
        hex.within(self.radius)
    }

    pub fn get(&self, hex: Hex) -> Option<&Tile> {
        self.tiles.get(&hex)
    }

    pub fn get_mut(&mut self, hex: Hex) -> Option<&mut Tile> {
        self.tiles.get_mut(&hex)
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.tiles.contains_key(&hex)
    }

    /// Terrain tier of a coordinate; unrevealed in-world hexes are flat ground
    pub fn terrain_level(&self, hex: Hex) -> Option<u8> {
        if !self.in_bounds(hex) {
            return None;
        }
        Some(self.tiles.get(&hex).map_or(0, |t| t.max_level))
    }

    /// Insert or replace a tile. Out-of-world tiles are ignored.
    pub fn insert(&mut self, tile: Tile) {
        if self.in_bounds(tile.coord) {
            self.tiles.insert(tile.coord, tile);
        }
    }

    /// Materialize a zero-level tile if absent; returns true if it was new
    pub fn reveal(&mut self, hex: Hex) -> bool {
        if !self.in_bounds(hex) {
            return false;
        }
        let mut created = false;
        self.tiles
            .entry(hex)
            .or_insert_with(|| {
                created = true;
                Tile::new(hex)
            })
            .revealed = true;
        created
    }

    /// Reveal every in-world hex within `radius` of `center`
    pub fn reveal_around(&mut self, center: Hex, radius: i32) -> usize {
        spiral(center, radius).filter(|&h| self.reveal(h)).count()
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles.values()
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> + '_ {
        self.tiles.values_mut()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Neighbor tiles that have been materialized
    pub fn existing_neighbors(&self, hex: Hex) -> Vec<&Tile> {
        hex.neighbors()
            .iter()
            .filter_map(|n| self.tiles.get(n))
            .collect()
    }

    pub fn owned_by(&self, owner: EntityId) -> usize {
        self.tiles
            .values()
            .filter(|t| t.owner == Some(owner) && t.current_level > 0)
            .count()
    }
}
