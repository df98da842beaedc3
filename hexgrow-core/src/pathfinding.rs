//! A* pathfinding over tiered terrain
//!
//! Respects rank limits, single-tier climbs and occupied coordinates.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::board::Hex;
use crate::config::SearchLimits;
use crate::grid::{step_cost, Grid};

/// Node in the A* open set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PathNode {
    coord: Hex,
    f_cost: u32,
    /// Insertion order; earlier wins among equal f-costs
    seq: u64,
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap, FIFO among ties
        Reverse((self.f_cost, self.seq)).cmp(&Reverse((other.f_cost, other.seq)))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Whether a traveler of `rank` may step from `from` onto `to`.
///
/// Returns the step cost when passable.
pub fn step_allowed(grid: &Grid, from: Hex, to: Hex, rank: u8) -> Option<u32> {
    let from_level = grid.terrain_level(from)?;
    let to_level = grid.terrain_level(to)?;
    if to_level > rank {
        return None;
    }
    if from_level.abs_diff(to_level) > 1 {
        return None;
    }
    Some(step_cost(to_level))
}

/// Find path using A*.
///
/// Returns the coordinates to walk, excluding `start`, or None if no path
/// exists within the search limits.
pub fn find_path(
    start: Hex,
    goal: Hex,
    grid: &Grid,
    rank: u8,
    obstacles: &[Hex],
    limits: &SearchLimits,
) -> Option<Vec<Hex>> {
    if start == goal {
        return Some(Vec::new());
    }
    if obstacles.contains(&goal) || !grid.in_bounds(goal) {
        return None;
    }
    if start.distance_to(goal) > limits.max_distance {
        return None;
    }

    let blocked: FxHashSet<Hex> = obstacles.iter().copied().collect();
    let mut open_set = BinaryHeap::new();
    let mut came_from: FxHashMap<Hex, Hex> = FxHashMap::default();
    let mut g_scores: FxHashMap<Hex, u32> = FxHashMap::default();
    let mut seq = 0u64;

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        coord: start,
        f_cost: start.distance_to(goal) as u32,
        seq,
    });

    let mut iterations = 0usize;
    while let Some(current) = open_set.pop() {
        if current.coord == goal {
            return Some(reconstruct_path(&came_from, start, goal));
        }

        iterations += 1;
        if iterations > limits.max_iterations {
            return None;
        }

        let current_g = g_scores.get(&current.coord).copied().unwrap_or(u32::MAX);
        // Stale heap entry
        if current.f_cost > current_g.saturating_add(current.coord.distance_to(goal) as u32) {
            continue;
        }

        for neighbor in current.coord.neighbors() {
            if blocked.contains(&neighbor) {
                continue;
            }
            let Some(move_cost) = step_allowed(grid, current.coord, neighbor, rank) else {
                continue;
            };

            let tentative_g = current_g + move_cost;
            let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);

                seq += 1;
                open_set.push(PathNode {
                    coord: neighbor,
                    f_cost: tentative_g + neighbor.distance_to(goal) as u32,
                    seq,
                });
            }
        }
    }

    None // No path found
}

/// Reconstruct path from came_from map, dropping the start
fn reconstruct_path(came_from: &FxHashMap<Hex, Hex>, start: Hex, goal: Hex) -> Vec<Hex> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        if prev == start {
            break;
        }
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Total terrain cost of walking `path`
pub fn path_cost(grid: &Grid, path: &[Hex]) -> u32 {
    path.iter()
        .map(|&hex| step_cost(grid.terrain_level(hex).unwrap_or(0)))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Tile;

    fn flat(radius: i32) -> Grid {
        let mut grid = Grid::new(radius);
        grid.reveal_around(Hex::ORIGIN, radius);
        grid
    }

    #[test]
    fn test_same_start_and_goal() {
        let grid = flat(3);
        let path = find_path(Hex::ORIGIN, Hex::ORIGIN, &grid, 1, &[], &SearchLimits::default());
        assert_eq!(path, Some(vec![]));
    }

    #[test]
    fn test_goal_in_obstacles() {
        let grid = flat(3);
        let goal = Hex::new(2, 0);
        let path = find_path(Hex::ORIGIN, goal, &grid, 1, &[goal], &SearchLimits::default());
        assert!(path.is_none());
    }

    #[test]
    fn test_straight_line_matches_distance() {
        let grid = flat(6);
        let goal = Hex::new(5, 0);
        let path = find_path(Hex::ORIGIN, goal, &grid, 1, &[], &SearchLimits::default()).unwrap();
        assert_eq!(path.len() as i32, Hex::ORIGIN.distance_to(goal));
        assert_eq!(path_cost(&grid, &path) as i32, Hex::ORIGIN.distance_to(goal));
        assert_eq!(path.last(), Some(&goal));
        assert!(!path.contains(&Hex::ORIGIN));
        // Contiguous
        let mut prev = Hex::ORIGIN;
        for &step in &path {
            assert!(prev.is_adjacent(step));
            prev = step;
        }
    }

    #[test]
    fn test_pathfind_around_obstacle() {
        let grid = flat(6);
        let goal = Hex::new(4, 0);
        let wall = [Hex::new(1, 0), Hex::new(2, 0), Hex::new(3, 0)];
        let path = find_path(Hex::ORIGIN, goal, &grid, 1, &wall, &SearchLimits::default()).unwrap();
        assert!(wall.iter().all(|w| !path.contains(w)));
        assert_eq!(path.last(), Some(&goal));
    }

    #[test]
    fn test_rank_and_tier_jumps_block() {
        let mut grid = flat(4);
        // A level-2 plateau is too high for rank 1 and too steep from flat ground
        grid.insert(Tile::with_levels(Hex::new(1, 0), 2, 2));
        let goal = Hex::new(1, 0);
        assert!(find_path(Hex::ORIGIN, goal, &grid, 1, &[], &SearchLimits::default()).is_none());
        assert!(find_path(Hex::ORIGIN, goal, &grid, 5, &[], &SearchLimits::default()).is_none());

        // With a level-1 step in between it becomes reachable for rank 2
        grid.insert(Tile::with_levels(Hex::ORIGIN, 1, 1));
        let path = find_path(Hex::ORIGIN, goal, &grid, 2, &[], &SearchLimits::default()).unwrap();
        assert_eq!(path, vec![goal]);
        assert_eq!(path_cost(&grid, &path), 2);
    }

    #[test]
    fn test_rough_terrain_is_avoided_when_cheaper() {
        let mut grid = flat(5);
        // Direct line costs 2 + 2 + 1; the detour over flat ground costs 4
        grid.insert(Tile::with_levels(Hex::ORIGIN, 1, 1));
        grid.insert(Tile::with_levels(Hex::new(1, 0), 2, 2));
        grid.insert(Tile::with_levels(Hex::new(2, 0), 2, 2));
        grid.insert(Tile::with_levels(Hex::new(3, 0), 1, 1));
        let path = find_path(Hex::ORIGIN, Hex::new(3, 0), &grid, 3, &[], &SearchLimits::default())
            .unwrap();
        assert!(!path.contains(&Hex::new(1, 0)));
        assert_eq!(path.len(), 4);
        assert_eq!(path_cost(&grid, &path), 4);
    }

    #[test]
    fn test_search_caps() {
        let grid = flat(10);
        let tight = SearchLimits {
            max_distance: 3,
            max_iterations: 4_000,
        };
        assert!(find_path(Hex::ORIGIN, Hex::new(5, 0), &grid, 1, &[], &tight).is_none());

        let starved = SearchLimits {
            max_distance: 40,
            max_iterations: 1,
        };
        assert!(find_path(Hex::ORIGIN, Hex::new(5, 0), &grid, 1, &[], &starved).is_none());
    }

    #[test]
    fn test_deterministic() {
        let grid = flat(6);
        let a = find_path(Hex::ORIGIN, Hex::new(3, -5), &grid, 1, &[], &SearchLimits::default());
        let b = find_path(Hex::ORIGIN, Hex::new(3, -5), &grid, 1, &[], &SearchLimits::default());
        assert_eq!(a, b);
    }
}
