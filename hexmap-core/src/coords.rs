//! Hex grid geometry with cube coordinates

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cube hex coordinates stored in axial form (x, z); y is derived so that
/// x + y + z = 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexCoordinates {
    pub x: i32,
    pub z: i32,
}

impl HexCoordinates {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Convert row-staggered offset coordinates (column, row) to cube form
    pub const fn from_offset(x: i32, z: i32) -> Self {
        Self::new(x - z / 2, z)
    }

    pub const fn y(&self) -> i32 {
        -self.x - self.z
    }

    /// Offset column of this coordinate (inverse of `from_offset`)
    pub const fn offset_x(&self) -> i32 {
        self.x + self.z / 2
    }

    /// Straight-line hex distance
    pub fn distance_to(&self, other: HexCoordinates) -> i32 {
        ((self.x - other.x).abs() + (self.y() - other.y()).abs() + (self.z - other.z).abs()) / 2
    }

    /// Coordinates of the adjacent hex in `direction`
    pub fn neighbor(&self, direction: HexDirection) -> HexCoordinates {
        let (dx, dz) = direction.offset();
        HexCoordinates::new(self.x + dx, self.z + dz)
    }
}

impl fmt::Display for HexCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y(), self.z)
    }
}

/// The six edges of a hex, clockwise from north-east
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HexDirection {
    NE = 0,
    E = 1,
    SE = 2,
    SW = 3,
    W = 4,
    NW = 5,
}

impl HexDirection {
    /// All directions in search order
    pub const ALL: [HexDirection; 6] = [
        HexDirection::NE,
        HexDirection::E,
        HexDirection::SE,
        HexDirection::SW,
        HexDirection::W,
        HexDirection::NW,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 6]
    }

    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    pub const fn previous(self) -> Self {
        Self::from_index(self.index() + 5)
    }

    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Cube (dx, dz) step for this direction
    const fn offset(self) -> (i32, i32) {
        match self {
            HexDirection::NE => (0, 1),
            HexDirection::E => (1, 0),
            HexDirection::SE => (1, -1),
            HexDirection::SW => (0, -1),
            HexDirection::W => (-1, 0),
            HexDirection::NW => (-1, 1),
        }
    }
}

/// Connection between two adjacent cells, derived from their elevation delta
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HexEdgeType {
    Flat,
    Slope,
    Cliff,
}

impl HexEdgeType {
    pub fn between(elevation1: i32, elevation2: i32) -> Self {
        match (elevation1 - elevation2).abs() {
            0 => HexEdgeType::Flat,
            1 => HexEdgeType::Slope,
            _ => HexEdgeType::Cliff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_conversion() {
        assert_eq!(HexCoordinates::from_offset(0, 0), HexCoordinates::new(0, 0));
        assert_eq!(HexCoordinates::from_offset(3, 1), HexCoordinates::new(3, 1));
        assert_eq!(HexCoordinates::from_offset(3, 2), HexCoordinates::new(2, 2));
        assert_eq!(HexCoordinates::from_offset(4, 5).offset_x(), 4);
    }

    #[test]
    fn test_distance() {
        let origin = HexCoordinates::new(0, 0);
        assert_eq!(origin.distance_to(origin), 0);
        assert_eq!(origin.distance_to(HexCoordinates::new(4, 0)), 4);
        assert_eq!(origin.distance_to(HexCoordinates::new(2, 2)), 4);
        assert_eq!(origin.distance_to(HexCoordinates::new(2, -2)), 2);
    }

    #[test]
    fn test_directions() {
        for d in HexDirection::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_eq!(d.next().previous(), d);
            let c = HexCoordinates::new(3, -1);
            assert_eq!(c.distance_to(c.neighbor(d)), 1);
            assert_eq!(c.neighbor(d).neighbor(d.opposite()), c);
        }
        assert_eq!(HexDirection::NE.previous(), HexDirection::NW);
        assert_eq!(HexDirection::NW.next(), HexDirection::NE);
        assert_eq!(HexDirection::SE.opposite(), HexDirection::NW);
    }

    #[test]
    fn test_edge_type() {
        assert_eq!(HexEdgeType::between(2, 2), HexEdgeType::Flat);
        assert_eq!(HexEdgeType::between(2, 3), HexEdgeType::Slope);
        assert_eq!(HexEdgeType::between(3, 2), HexEdgeType::Slope);
        assert_eq!(HexEdgeType::between(0, 2), HexEdgeType::Cliff);
    }

    #[test]
    fn test_display() {
        assert_eq!(HexCoordinates::new(1, 2).to_string(), "(1, -3, 2)");
    }
}
