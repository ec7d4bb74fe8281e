//! Hex cells: static terrain attributes plus the per-cell overlay state
//! (occupant, fog-of-war counter, path highlight)

use serde::{Deserialize, Serialize};

use crate::coords::{HexCoordinates, HexDirection};
use crate::unit::UnitId;

/// Stable index of a cell inside its grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIndex(pub usize);

/// Path overlay marker shown by the UI
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Highlight {
    Start,
    Path,
    Destination,
}

/// A single hex cell.
///
/// Neighbors are stored as indices into the owning grid; the grid keeps the
/// relation symmetric. Terrain setters that must stay consistent with a
/// neighbor (elevation, roads) live on `HexGrid`.
#[derive(Clone, Debug)]
pub struct HexCell {
    pub coordinates: HexCoordinates,
    pub(crate) index: CellIndex,
    pub(crate) neighbors: [Option<CellIndex>; 6],
    pub(crate) elevation: i32,
    pub(crate) water_level: i32,
    pub(crate) roads: [bool; 6],
    pub(crate) walled: bool,
    pub(crate) urban_level: i32,
    pub(crate) farm_level: i32,
    pub(crate) plant_level: i32,
    pub(crate) explorable: bool,
    pub(crate) explored: bool,
    pub(crate) visibility: u32,
    pub(crate) unit: Option<UnitId>,
    pub(crate) highlight: Option<Highlight>,
    pub(crate) label: Option<i32>,
}

impl HexCell {
    pub(crate) fn new(index: CellIndex, coordinates: HexCoordinates, explored: bool) -> Self {
        Self {
            coordinates,
            index,
            neighbors: [None; 6],
            elevation: 0,
            water_level: 0,
            roads: [false; 6],
            walled: false,
            urban_level: 0,
            farm_level: 0,
            plant_level: 0,
            explorable: true,
            explored,
            visibility: 0,
            unit: None,
            highlight: None,
            label: None,
        }
    }

    pub fn index(&self) -> CellIndex {
        self.index
    }

    pub fn neighbor(&self, direction: HexDirection) -> Option<CellIndex> {
        self.neighbors[direction.index()]
    }

    pub fn elevation(&self) -> i32 {
        self.elevation
    }

    pub fn water_level(&self) -> i32 {
        self.water_level
    }

    pub fn is_underwater(&self) -> bool {
        self.water_level > self.elevation
    }

    /// Height an observer standing here sees from (the water surface counts)
    pub fn view_elevation(&self) -> i32 {
        self.elevation.max(self.water_level)
    }

    pub fn has_road_through_edge(&self, direction: HexDirection) -> bool {
        self.roads[direction.index()]
    }

    pub fn has_roads(&self) -> bool {
        self.roads.iter().any(|&road| road)
    }

    pub fn walled(&self) -> bool {
        self.walled
    }

    pub fn urban_level(&self) -> i32 {
        self.urban_level
    }

    pub fn farm_level(&self) -> i32 {
        self.farm_level
    }

    pub fn plant_level(&self) -> i32 {
        self.plant_level
    }

    /// Obstruction added to the cost of entering this cell off-road
    pub fn development_level(&self) -> i32 {
        self.urban_level + self.farm_level + self.plant_level
    }

    pub fn is_explorable(&self) -> bool {
        self.explorable
    }

    pub fn is_explored(&self) -> bool {
        self.explored && self.explorable
    }

    pub fn visibility(&self) -> u32 {
        self.visibility
    }

    pub fn is_visible(&self) -> bool {
        self.visibility > 0 && self.explorable
    }

    pub fn unit(&self) -> Option<UnitId> {
        self.unit
    }

    pub fn highlight(&self) -> Option<Highlight> {
        self.highlight
    }

    /// Turn label shown on path cells
    pub fn label(&self) -> Option<i32> {
        self.label
    }

    /// Returns true when the counter went from zero to one
    pub(crate) fn increase_visibility(&mut self) -> bool {
        self.visibility += 1;
        if self.visibility == 1 {
            self.explored = true;
            return true;
        }
        false
    }

    /// Returns true when the counter dropped to zero
    pub(crate) fn decrease_visibility(&mut self) -> bool {
        if self.visibility == 0 {
            return false;
        }
        self.visibility -= 1;
        self.visibility == 0
    }

    pub(crate) fn reset_visibility(&mut self) {
        self.visibility = 0;
    }

    pub(crate) fn enable_highlight(&mut self, highlight: Highlight) {
        self.highlight = Some(highlight);
    }

    pub(crate) fn disable_highlight(&mut self) {
        self.highlight = None;
    }

    pub(crate) fn set_label(&mut self, label: Option<i32>) {
        self.label = label;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell() -> HexCell {
        HexCell::new(CellIndex(0), HexCoordinates::new(0, 0), false)
    }

    #[test]
    fn test_water() {
        let mut c = cell();
        assert!(!c.is_underwater());
        c.water_level = 2;
        c.elevation = 1;
        assert!(c.is_underwater());
        assert_eq!(c.view_elevation(), 2);
        c.elevation = 3;
        assert!(!c.is_underwater());
        assert_eq!(c.view_elevation(), 3);
    }

    #[test]
    fn test_visibility_counter() {
        let mut c = cell();
        assert!(!c.is_explored());
        assert!(c.increase_visibility());
        assert!(!c.increase_visibility());
        assert!(c.is_explored());
        assert!(!c.decrease_visibility());
        assert!(c.decrease_visibility());
        assert!(!c.decrease_visibility());
        assert_eq!(c.visibility(), 0);
        // explored sticks after the cell goes dark
        assert!(c.is_explored());
    }

    #[test]
    fn test_unexplorable_cell_is_never_explored() {
        let mut c = cell();
        c.explorable = false;
        c.increase_visibility();
        assert!(!c.is_explored());
        assert!(!c.is_visible());
    }
}
