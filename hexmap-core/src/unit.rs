//! Units and their movement rules

use serde::{Deserialize, Serialize};

use crate::cell::{CellIndex, HexCell};
use crate::coords::{HexDirection, HexEdgeType};

/// Movement points a standard unit can spend per turn
pub const SPEED_PER_TURN: i32 = 24;

/// Sight radius of a standard unit, in hexes
pub const VISION_RANGE: i32 = 3;

/// Cost of entering a cell over a road
const ROAD_COST: i32 = 1;
const FLAT_COST: i32 = 5;
const SLOPE_COST: i32 = 10;

/// Unit identifier, unique within a grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Unit-specific movement capabilities consulted by the path search
pub trait MovementRules {
    /// Whether the unit may end a step in `cell`
    fn is_valid_destination(&self, cell: &HexCell) -> bool;

    /// Cost of stepping from `from` to its neighbor `to` across `direction`.
    /// `None` means the edge cannot be crossed.
    fn move_cost(&self, from: &HexCell, to: &HexCell, direction: HexDirection) -> Option<i32>;

    /// Movement points per turn
    fn speed(&self) -> i32;

    fn vision_range(&self) -> i32;
}

/// Terrain-aware rules for ordinary land units
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardMovement {
    pub speed: i32,
    pub vision_range: i32,
}

impl Default for StandardMovement {
    fn default() -> Self {
        Self {
            speed: SPEED_PER_TURN,
            vision_range: VISION_RANGE,
        }
    }
}

impl StandardMovement {
    pub fn with_speed(speed: i32) -> Self {
        Self {
            speed,
            ..Default::default()
        }
    }
}

impl MovementRules for StandardMovement {
    fn is_valid_destination(&self, cell: &HexCell) -> bool {
        cell.is_explored() && !cell.is_underwater() && cell.unit().is_none()
    }

    fn move_cost(&self, from: &HexCell, to: &HexCell, direction: HexDirection) -> Option<i32> {
        let edge_type = HexEdgeType::between(from.elevation(), to.elevation());
        if edge_type == HexEdgeType::Cliff {
            return None;
        }

        if from.has_road_through_edge(direction) {
            return Some(ROAD_COST);
        }

        // A wall on one side only, with no road through it
        if from.walled() != to.walled() {
            return None;
        }

        let base = match edge_type {
            HexEdgeType::Flat => FLAT_COST,
            _ => SLOPE_COST,
        };
        Some(base + to.development_level())
    }

    fn speed(&self) -> i32 {
        self.speed
    }

    fn vision_range(&self) -> i32 {
        self.vision_range
    }
}

/// Unit variants known to the grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitKind {
    #[default]
    Standard,
}

/// A unit placed on the grid. The grid keeps `location` and the cell's
/// occupant link in agreement.
#[derive(Clone, Debug)]
pub struct HexUnit {
    pub(crate) id: UnitId,
    pub(crate) location: CellIndex,
    pub(crate) orientation: f32,
    pub(crate) kind: UnitKind,
    pub(crate) movement: StandardMovement,
}

impl HexUnit {
    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn location(&self) -> CellIndex {
        self.location
    }

    /// Facing in degrees around the vertical axis
    pub fn orientation(&self) -> f32 {
        self.orientation
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }
}

impl MovementRules for HexUnit {
    fn is_valid_destination(&self, cell: &HexCell) -> bool {
        match self.kind {
            UnitKind::Standard => self.movement.is_valid_destination(cell),
        }
    }

    fn move_cost(&self, from: &HexCell, to: &HexCell, direction: HexDirection) -> Option<i32> {
        match self.kind {
            UnitKind::Standard => self.movement.move_cost(from, to, direction),
        }
    }

    fn speed(&self) -> i32 {
        self.movement.speed
    }

    fn vision_range(&self) -> i32 {
        self.movement.vision_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::HexCoordinates;

    fn cell(index: usize, elevation: i32) -> HexCell {
        let mut c = HexCell::new(CellIndex(index), HexCoordinates::new(index as i32, 0), true);
        c.elevation = elevation;
        c
    }

    #[test]
    fn test_move_costs() {
        let rules = StandardMovement::default();
        let from = cell(0, 0);

        assert_eq!(rules.move_cost(&from, &cell(1, 0), HexDirection::E), Some(5));
        assert_eq!(rules.move_cost(&from, &cell(1, 1), HexDirection::E), Some(10));
        assert_eq!(rules.move_cost(&from, &cell(1, -1), HexDirection::E), Some(10));
        assert_eq!(rules.move_cost(&from, &cell(1, 2), HexDirection::E), None);
    }

    #[test]
    fn test_development_adds_cost() {
        let rules = StandardMovement::default();
        let from = cell(0, 0);
        let mut to = cell(1, 0);
        to.urban_level = 2;
        to.farm_level = 1;
        to.plant_level = 3;
        assert_eq!(rules.move_cost(&from, &to, HexDirection::E), Some(11));
    }

    #[test]
    fn test_roads_and_walls() {
        let rules = StandardMovement::default();
        let mut from = cell(0, 0);
        let mut to = cell(1, 1);
        to.walled = true;
        assert_eq!(rules.move_cost(&from, &to, HexDirection::E), None);

        from.roads[HexDirection::E.index()] = true;
        assert_eq!(rules.move_cost(&from, &to, HexDirection::E), Some(1));

        // both sides walled is not a separating wall
        from.roads = [false; 6];
        from.walled = true;
        assert_eq!(rules.move_cost(&from, &to, HexDirection::E), Some(10));
    }

    #[test]
    fn test_valid_destination() {
        let rules = StandardMovement::default();
        let mut c = cell(0, 0);
        assert!(rules.is_valid_destination(&c));

        c.water_level = 1;
        assert!(!rules.is_valid_destination(&c));

        c.water_level = 0;
        c.unit = Some(UnitId(7));
        assert!(!rules.is_valid_destination(&c));

        c.unit = None;
        c.explored = false;
        assert!(!rules.is_valid_destination(&c));
    }
}
