//! Hex board geometry with axial coordinates

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    pub const ORIGIN: Hex = Hex::new(0, 0);

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Implicit third cube coordinate
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Check if this hex lies within a hexagonal world of the given radius
    pub fn within(&self, radius: i32) -> bool {
        self.distance_to_center() <= radius
    }

    /// Distance from center (0,0)
    pub fn distance_to_center(&self) -> i32 {
        (self.q.abs() + self.r.abs() + (self.q + self.r).abs()) / 2
    }

    /// Cube distance between two hexes
    pub fn distance_to(&self, other: Hex) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        (dq + dr + ds) / 2
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: u8) -> Hex {
        let (dq, dr) = DIRECTIONS[direction as usize % 6];
        Hex::new(self.q + dq, self.r + dr)
    }

    /// All six neighbors, in direction order
    pub fn neighbors(&self) -> [Hex; 6] {
        let mut out = [*self; 6];
        for (dir, slot) in out.iter_mut().enumerate() {
            *slot = self.neighbor(dir as u8);
        }
        out
    }

    pub fn is_adjacent(&self, other: Hex) -> bool {
        self.distance_to(other) == 1
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.q, self.r)
    }
}

/// Direction vectors in axial coordinates (dq, dr)
/// Index: 0=N, 1=NE, 2=SE, 3=S, 4=SW, 5=NW
pub const DIRECTIONS: [(i32, i32); 6] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // NW
];

/// All hex positions at exactly `distance` from `center`
pub fn ring(center: Hex, distance: i32) -> impl Iterator<Item = Hex> {
    let ring_len = if distance == 0 { 1 } else { 6 };
    (0..ring_len).flat_map(move |side| {
        let dir = DIRECTIONS[side];
        let steps = distance.max(1);
        (0..steps).filter_map(move |step| {
            if distance == 0 {
                return if step == 0 { Some(center) } else { None };
            }
            // Start position for this side (corner of hexagon)
            let start_q = center.q + distance * DIRECTIONS[(side + 4) % 6].0;
            let start_r = center.r + distance * DIRECTIONS[(side + 4) % 6].1;
            // Walk along the edge
            Some(Hex::new(start_q + step * dir.0, start_r + step * dir.1))
        })
    })
}

/// All hex positions within `radius` of `center`, nearest rings first
pub fn spiral(center: Hex, radius: i32) -> impl Iterator<Item = Hex> {
    (0..=radius.max(0)).flat_map(move |d| ring(center, d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_within() {
        assert!(Hex::new(0, 0).within(4));
        assert!(Hex::new(4, 0).within(4));
        assert!(Hex::new(-4, 0).within(4));
        assert!(!Hex::new(5, 0).within(4));
        assert!(!Hex::new(3, 3).within(4)); // q + r = 6 > 4
    }

    #[test]
    fn test_distance() {
        assert_eq!(Hex::new(0, 0).distance_to_center(), 0);
        assert_eq!(Hex::new(1, 0).distance_to_center(), 1);
        assert_eq!(Hex::new(2, 2).distance_to_center(), 4);
        assert_eq!(Hex::new(-2, 1).distance_to(Hex::new(1, -1)), 3);
    }

    #[test]
    fn test_neighbors_are_adjacent() {
        let center = Hex::new(2, -1);
        let ns = center.neighbors();
        assert_eq!(ns.len(), 6);
        for n in ns {
            assert_eq!(center.distance_to(n), 1);
        }
    }

    #[test]
    fn test_ring_and_spiral_sizes() {
        assert_eq!(ring(Hex::ORIGIN, 0).count(), 1);
        assert_eq!(ring(Hex::ORIGIN, 1).count(), 6);
        assert_eq!(ring(Hex::ORIGIN, 3).count(), 18);
        assert!(ring(Hex::new(1, 1), 2).all(|h| h.distance_to(Hex::new(1, 1)) == 2));
        // 1 + 6 + 12
        assert_eq!(spiral(Hex::ORIGIN, 2).count(), 19);
    }
}
