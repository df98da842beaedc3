//! Spatial lookups over the live grid and entity positions.
//!
//! Built once per tick, then kept current as entities move so that later
//! entities in the same pass see earlier moves.

use rustc_hash::FxHashMap;

use crate::board::{spiral, Hex};
use crate::entity::{Entity, EntityId};
use crate::grid::{Grid, Tile};

#[derive(Clone, Debug, Default)]
pub struct WorldIndex {
    occupants: FxHashMap<Hex, EntityId>,
    positions: FxHashMap<EntityId, Hex>,
    occupied: Vec<Hex>,
}

impl WorldIndex {
    pub fn build<'a>(entities: impl IntoIterator<Item = &'a Entity>) -> Self {
        let mut index = Self::default();
        for entity in entities {
            index.occupants.insert(entity.position, entity.id);
            index.positions.insert(entity.id, entity.position);
            index.occupied.push(entity.position);
        }
        index
    }

    pub fn is_occupied(&self, hex: Hex) -> bool {
        self.occupants.contains_key(&hex)
    }

    pub fn entity_at(&self, hex: Hex) -> Option<EntityId> {
        self.occupants.get(&hex).copied()
    }

    /// Occupied by someone other than `id`
    pub fn occupied_by_other(&self, hex: Hex, id: EntityId) -> bool {
        matches!(self.entity_at(hex), Some(other) if other != id)
    }

    pub fn position_of(&self, id: EntityId) -> Option<Hex> {
        self.positions.get(&id).copied()
    }

    /// Every occupied coordinate
    pub fn occupied(&self) -> &[Hex] {
        &self.occupied
    }

    /// Occupied coordinates excluding the given entity's own
    pub fn obstacles_for(&self, id: EntityId) -> Vec<Hex> {
        let own = self.position_of(id);
        self.occupied
            .iter()
            .copied()
            .filter(|&h| Some(h) != own)
            .collect()
    }

    /// Record a move made mid-tick
    pub fn move_entity(&mut self, id: EntityId, to: Hex) {
        if let Some(from) = self.positions.insert(id, to) {
            if self.occupants.get(&from) == Some(&id) {
                self.occupants.remove(&from);
            }
            if let Some(slot) = self.occupied.iter_mut().find(|h| **h == from) {
                *slot = to;
            }
        } else {
            self.occupied.push(to);
        }
        self.occupants.insert(to, id);
    }

    /// Materialized neighbors of `hex`
    pub fn neighbors<'g>(&self, grid: &'g Grid, hex: Hex) -> Vec<&'g Tile> {
        grid.existing_neighbors(hex)
    }

    /// Materialized tiles within `radius` of `center`, nearest first
    pub fn within_radius<'g>(&self, grid: &'g Grid, center: Hex, radius: i32) -> Vec<&'g Tile> {
        spiral(center, radius).filter_map(|h| grid.get(h)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities() -> Vec<Entity> {
        vec![
            Entity::new_player(Hex::ORIGIN, 0, 0),
            Entity::new_bot(EntityId::bot(1), Hex::new(2, 0), 0, 0),
        ]
    }

    #[test]
    fn test_lookups() {
        let es = entities();
        let index = WorldIndex::build(&es);
        assert!(index.is_occupied(Hex::ORIGIN));
        assert_eq!(index.entity_at(Hex::new(2, 0)), Some(EntityId::bot(1)));
        assert_eq!(index.entity_at(Hex::new(1, 0)), None);
        assert_eq!(index.occupied().len(), 2);
        assert_eq!(index.obstacles_for(EntityId::PLAYER), vec![Hex::new(2, 0)]);
        assert!(index.occupied_by_other(Hex::new(2, 0), EntityId::PLAYER));
        assert!(!index.occupied_by_other(Hex::new(2, 0), EntityId::bot(1)));
    }

    #[test]
    fn test_move_entity_updates_everything() {
        let es = entities();
        let mut index = WorldIndex::build(&es);
        index.move_entity(EntityId::bot(1), Hex::new(1, 0));
        assert!(!index.is_occupied(Hex::new(2, 0)));
        assert_eq!(index.entity_at(Hex::new(1, 0)), Some(EntityId::bot(1)));
        assert_eq!(index.position_of(EntityId::bot(1)), Some(Hex::new(1, 0)));
        assert!(index.occupied().contains(&Hex::new(1, 0)));
        assert_eq!(index.occupied().len(), 2);
    }

    #[test]
    fn test_within_radius_only_returns_materialized() {
        let mut grid = Grid::new(8);
        grid.reveal_around(Hex::ORIGIN, 1);
        grid.reveal(Hex::new(5, 0));
        let index = WorldIndex::default();
        let near = index.within_radius(&grid, Hex::ORIGIN, 2);
        assert_eq!(near.len(), 7);
        assert_eq!(near[0].coord, Hex::ORIGIN);
        assert_eq!(index.within_radius(&grid, Hex::ORIGIN, 5).len(), 8);
        assert_eq!(index.neighbors(&grid, Hex::ORIGIN).len(), 6);
    }
}
