//! The hex grid: owns every cell and unit, plus the shared search state
//!
//! Cells are laid out in row-staggered offset order (`x + z * cell_count_x`)
//! and refer to each other by `CellIndex`. Path and visibility queries are
//! implemented in `pathfinding` and `visibility`.

use rustc_hash::FxHashMap;

use crate::cell::{CellIndex, HexCell};
use crate::config::GridConfig;
use crate::coords::{HexCoordinates, HexDirection, HexEdgeType};
use crate::error::{GridError, Result};
use crate::pathfinding::CurrentPath;
use crate::search::SearchFrontier;
use crate::unit::{HexUnit, MovementRules, StandardMovement, UnitId, UnitKind};

/// Roads cannot climb more than one elevation step
const MAX_ROAD_ELEVATION_DIFFERENCE: i32 = 1;

/// A complete hex map
#[derive(Clone, Debug)]
pub struct HexGrid {
    config: GridConfig,
    pub(crate) cells: Vec<HexCell>,
    units: FxHashMap<UnitId, HexUnit>,
    next_unit_id: u32,
    pub(crate) search: SearchFrontier,
    pub(crate) current_path: Option<CurrentPath>,
}

impl HexGrid {
    // ========================================================================
    // CONSTRUCTION
    // ========================================================================

    pub fn new(config: GridConfig) -> Result<Self> {
        config.validate()?;
        let mut grid = Self {
            config,
            cells: Vec::new(),
            units: FxHashMap::default(),
            next_unit_id: 0,
            search: SearchFrontier::new(0),
            current_path: None,
        };
        grid.create_cells();
        Ok(grid)
    }

    /// Rebuild the map at a new size. Any path and all units are discarded.
    pub fn create_map(&mut self, x: i32, z: i32) -> Result<()> {
        let config = GridConfig {
            cell_count_x: x,
            cell_count_z: z,
            ..self.config.clone()
        };
        if let Err(err) = config.validate() {
            tracing::warn!("Rejected map size {} x {}", x, z);
            return Err(err);
        }

        self.clear_path();
        self.clear_units();
        self.config = config;
        self.create_cells();
        Ok(())
    }

    fn create_cells(&mut self) {
        let count_x = self.config.cell_count_x;
        let count_z = self.config.cell_count_z;
        let total = (count_x * count_z) as usize;

        self.cells = Vec::with_capacity(total);
        for z in 0..count_z {
            for x in 0..count_x {
                self.create_cell(x, z);
            }
        }
        self.search.resize(total);
    }

    /// Append the cell at offset (x, z) and link it to already-created
    /// neighbors below and to the west.
    fn create_cell(&mut self, x: i32, z: i32) {
        let i = self.cells.len();
        let count_x = self.config.cell_count_x as usize;
        self.cells.push(HexCell::new(
            CellIndex(i),
            HexCoordinates::from_offset(x, z),
            self.config.start_explored,
        ));

        if x > 0 {
            self.link(i, HexDirection::W, i - 1);
        }
        if z > 0 {
            if z % 2 == 0 {
                self.link(i, HexDirection::SE, i - count_x);
                if x > 0 {
                    self.link(i, HexDirection::SW, i - count_x - 1);
                }
            } else {
                self.link(i, HexDirection::SW, i - count_x);
                if x < self.config.cell_count_x - 1 {
                    self.link(i, HexDirection::SE, i - count_x + 1);
                }
            }
        }
    }

    fn link(&mut self, cell: usize, direction: HexDirection, other: usize) {
        self.cells[cell].neighbors[direction.index()] = Some(CellIndex(other));
        self.cells[other].neighbors[direction.opposite().index()] = Some(CellIndex(cell));
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn cell_count_x(&self) -> i32 {
        self.config.cell_count_x
    }

    pub fn cell_count_z(&self) -> i32 {
        self.config.cell_count_z
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[HexCell] {
        &self.cells
    }

    /// # Panics
    ///
    /// If `index` does not belong to this grid.
    pub fn cell(&self, index: CellIndex) -> &HexCell {
        &self.cells[index.0]
    }

    pub fn get_cell(&self, index: CellIndex) -> Result<&HexCell> {
        self.cells.get(index.0).ok_or(GridError::CellOutOfBounds(index))
    }

    /// Cell at cube coordinates, or `None` outside the map
    pub fn cell_at(&self, coordinates: HexCoordinates) -> Option<CellIndex> {
        let z = coordinates.z;
        if z < 0 || z >= self.config.cell_count_z {
            return None;
        }
        let x = coordinates.offset_x();
        if x < 0 || x >= self.config.cell_count_x {
            return None;
        }
        Some(CellIndex((x + z * self.config.cell_count_x) as usize))
    }

    /// Cell at offset (column, row), or `None` outside the map
    pub fn cell_at_offset(&self, x: i32, z: i32) -> Option<CellIndex> {
        self.cell_at(HexCoordinates::from_offset(x, z))
    }

    pub fn neighbor(&self, index: CellIndex, direction: HexDirection) -> Option<CellIndex> {
        self.cells[index.0].neighbor(direction)
    }

    /// Edge classification towards a neighbor; `None` at the map border
    pub fn edge_type(&self, index: CellIndex, direction: HexDirection) -> Option<HexEdgeType> {
        let neighbor = self.neighbor(index, direction)?;
        Some(HexEdgeType::between(
            self.cells[index.0].elevation,
            self.cells[neighbor.0].elevation,
        ))
    }

    pub fn elevation_difference(&self, index: CellIndex, direction: HexDirection) -> Option<i32> {
        let neighbor = self.neighbor(index, direction)?;
        Some((self.cells[index.0].elevation - self.cells[neighbor.0].elevation).abs())
    }

    fn check(&self, index: CellIndex) -> Result<()> {
        if index.0 < self.cells.len() {
            Ok(())
        } else {
            Err(GridError::CellOutOfBounds(index))
        }
    }

    // ========================================================================
    // TERRAIN EDITING
    // ========================================================================

    /// Change elevation, dropping roads that become too steep
    pub fn set_elevation(&mut self, index: CellIndex, elevation: i32) -> Result<()> {
        self.check(index)?;
        if self.cells[index.0].elevation == elevation {
            return Ok(());
        }
        self.cells[index.0].elevation = elevation;

        for direction in HexDirection::ALL {
            if self.cells[index.0].has_road_through_edge(direction)
                && self
                    .elevation_difference(index, direction)
                    .is_some_and(|diff| diff > MAX_ROAD_ELEVATION_DIFFERENCE)
            {
                self.set_road(index, direction, false);
            }
        }
        Ok(())
    }

    /// Add a road across an edge. Returns false when the edge cannot take one.
    pub fn add_road(&mut self, index: CellIndex, direction: HexDirection) -> Result<bool> {
        self.check(index)?;
        let allowed = !self.cells[index.0].has_road_through_edge(direction)
            && self
                .elevation_difference(index, direction)
                .is_some_and(|diff| diff <= MAX_ROAD_ELEVATION_DIFFERENCE);
        if allowed {
            self.set_road(index, direction, true);
        }
        Ok(allowed)
    }

    pub fn remove_roads(&mut self, index: CellIndex) -> Result<()> {
        self.check(index)?;
        for direction in HexDirection::ALL {
            if self.cells[index.0].has_road_through_edge(direction) {
                self.set_road(index, direction, false);
            }
        }
        Ok(())
    }

    fn set_road(&mut self, index: CellIndex, direction: HexDirection, state: bool) {
        self.cells[index.0].roads[direction.index()] = state;
        if let Some(neighbor) = self.neighbor(index, direction) {
            self.cells[neighbor.0].roads[direction.opposite().index()] = state;
        }
    }

    pub fn set_water_level(&mut self, index: CellIndex, level: i32) -> Result<()> {
        self.check(index)?;
        self.cells[index.0].water_level = level;
        Ok(())
    }

    pub fn set_walled(&mut self, index: CellIndex, walled: bool) -> Result<()> {
        self.check(index)?;
        self.cells[index.0].walled = walled;
        Ok(())
    }

    pub fn set_urban_level(&mut self, index: CellIndex, level: i32) -> Result<()> {
        self.check(index)?;
        self.cells[index.0].urban_level = level;
        Ok(())
    }

    pub fn set_farm_level(&mut self, index: CellIndex, level: i32) -> Result<()> {
        self.check(index)?;
        self.cells[index.0].farm_level = level;
        Ok(())
    }

    pub fn set_plant_level(&mut self, index: CellIndex, level: i32) -> Result<()> {
        self.check(index)?;
        self.cells[index.0].plant_level = level;
        Ok(())
    }

    pub fn set_explorable(&mut self, index: CellIndex, explorable: bool) -> Result<()> {
        self.check(index)?;
        self.cells[index.0].explorable = explorable;
        Ok(())
    }

    // ========================================================================
    // UNITS
    // ========================================================================

    /// Place a new standard unit and reveal the area around it
    pub fn add_unit(&mut self, location: CellIndex, orientation: f32) -> Result<UnitId> {
        self.check(location)?;
        let cell = &self.cells[location.0];
        if let Some(occupant) = cell.unit {
            return Err(GridError::CellOccupied { cell: location, occupant });
        }
        if cell.is_underwater() {
            return Err(GridError::InvalidUnitLocation(location));
        }

        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;

        let unit = HexUnit {
            id,
            location,
            orientation,
            kind: UnitKind::Standard,
            movement: StandardMovement {
                speed: self.config.unit_speed,
                vision_range: self.config.unit_vision_range,
            },
        };
        let vision_range = unit.vision_range();
        self.units.insert(id, unit);
        self.cells[location.0].unit = Some(id);
        self.increase_visibility(location, vision_range);

        tracing::debug!("Added unit {:?} at {}", id, self.cells[location.0].coordinates);
        Ok(id)
    }

    /// Remove a unit, hiding what it saw and clearing its cell first
    pub fn remove_unit(&mut self, id: UnitId) -> Result<()> {
        let Some(unit) = self.units.get(&id) else {
            tracing::warn!("Tried to remove unknown unit {:?}", id);
            return Err(GridError::UnitNotFound(id));
        };
        let (location, vision_range) = (unit.location, unit.vision_range());

        self.cells[location.0].unit = None;
        self.decrease_visibility(location, vision_range);
        self.units.remove(&id);
        Ok(())
    }

    /// Remove every unit, hiding what each one saw
    pub fn clear_units(&mut self) {
        let units: Vec<HexUnit> = self.units.drain().map(|(_, unit)| unit).collect();
        for unit in units {
            self.cells[unit.location.0].unit = None;
            self.decrease_visibility(unit.location, unit.vision_range());
        }
    }

    pub fn unit(&self, id: UnitId) -> Option<&HexUnit> {
        self.units.get(&id)
    }

    pub fn units(&self) -> impl Iterator<Item = &HexUnit> {
        self.units.values()
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Move a unit along `path` (as returned by `path()`), updating the
    /// occupant links and sweeping its vision along every step.
    pub fn travel(&mut self, id: UnitId, path: &[CellIndex]) -> Result<()> {
        let unit = self.units.get(&id).ok_or(GridError::UnitNotFound(id))?;
        let (location, vision_range) = (unit.location, unit.vision_range());
        self.validate_travel_path(id, location, path)?;

        let Some(&destination) = path.last() else {
            return Err(GridError::InvalidPath("path is empty".to_string()));
        };

        self.cells[location.0].unit = None;
        self.cells[destination.0].unit = Some(id);
        if let Some(unit) = self.units.get_mut(&id) {
            unit.location = destination;
        }

        self.decrease_visibility(path[0], vision_range);
        for &step in &path[1..] {
            self.increase_visibility(step, vision_range);
            self.decrease_visibility(step, vision_range);
        }
        self.increase_visibility(destination, vision_range);

        tracing::debug!(
            "Unit {:?} travelled {} steps to {}",
            id,
            path.len() - 1,
            self.cells[destination.0].coordinates
        );
        Ok(())
    }

    fn validate_travel_path(&self, id: UnitId, location: CellIndex, path: &[CellIndex]) -> Result<()> {
        let Some((&first, rest)) = path.split_first() else {
            return Err(GridError::InvalidPath("path is empty".to_string()));
        };
        if first != location {
            return Err(GridError::InvalidPath(format!(
                "path starts at {:?} but unit is at {:?}",
                first, location
            )));
        }

        let mut previous = first;
        for &step in rest {
            self.check(step)?;
            let adjacent = HexDirection::ALL
                .iter()
                .any(|&d| self.cells[previous.0].neighbor(d) == Some(step));
            if !adjacent {
                return Err(GridError::InvalidPath(format!(
                    "{:?} is not adjacent to {:?}",
                    step, previous
                )));
            }
            previous = step;
        }

        if let Some(occupant) = self.cells[previous.0].unit {
            if occupant != id {
                return Err(GridError::CellOccupied { cell: previous, occupant });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    fn grid(x: i32, z: i32) -> HexGrid {
        HexGrid::new(GridConfig::sized(x, z).with_start_explored(true)).unwrap()
    }

    #[test]
    fn test_neighbor_symmetry() {
        let grid = grid(7, 6);
        for cell in grid.cells() {
            for d in HexDirection::ALL {
                if let Some(n) = cell.neighbor(d) {
                    assert_eq!(grid.cell(n).neighbor(d.opposite()), Some(cell.index()));
                    assert_eq!(cell.coordinates.neighbor(d), grid.cell(n).coordinates);
                }
            }
        }
    }

    #[test]
    fn test_interior_cells_have_six_neighbors() {
        let grid = grid(5, 5);
        let center = grid.cell_at_offset(2, 2).unwrap();
        let neighbors: FxHashSet<_> = HexDirection::ALL
            .iter()
            .filter_map(|&d| grid.neighbor(center, d))
            .collect();
        assert_eq!(neighbors.len(), 6);

        let corner = grid.cell_at_offset(0, 0).unwrap();
        let count = HexDirection::ALL
            .iter()
            .filter(|&&d| grid.neighbor(corner, d).is_some())
            .count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_cell_lookup() {
        let grid = grid(5, 4);
        for cell in grid.cells() {
            assert_eq!(grid.cell_at(cell.coordinates), Some(cell.index()));
        }
        assert_eq!(grid.cell_at_offset(5, 0), None);
        assert_eq!(grid.cell_at_offset(0, 4), None);
        assert_eq!(grid.cell_at(HexCoordinates::new(-1, 0)), None);
        assert_eq!(grid.cell_at_offset(3, 2), Some(CellIndex(13)));
    }

    #[test]
    fn test_invalid_size() {
        assert!(matches!(
            HexGrid::new(GridConfig::sized(0, 3)),
            Err(GridError::InvalidMapSize { .. })
        ));
        assert!(matches!(
            HexGrid::new(GridConfig::sized(70_000, 70_000)),
            Err(GridError::InvalidMapSize { .. })
        ));
        let mut grid = grid(3, 3);
        assert!(grid.create_map(-2, 2).is_err());
        assert_eq!(grid.len(), 9);
        grid.create_map(4, 2).unwrap();
        assert_eq!(grid.len(), 8);
        assert_eq!(grid.cell_count_x(), 4);
    }

    #[test]
    fn test_roads_are_symmetric_and_respect_slopes() {
        let mut grid = grid(4, 4);
        let a = grid.cell_at_offset(1, 1).unwrap();
        let b = grid.neighbor(a, HexDirection::E).unwrap();

        assert!(grid.add_road(a, HexDirection::E).unwrap());
        assert!(grid.cell(b).has_road_through_edge(HexDirection::W));
        assert!(!grid.add_road(a, HexDirection::E).unwrap());

        // raising the far side to a cliff drops the road
        grid.set_elevation(b, 2).unwrap();
        assert!(!grid.cell(a).has_road_through_edge(HexDirection::E));
        assert!(!grid.cell(b).has_road_through_edge(HexDirection::W));
        assert!(!grid.add_road(a, HexDirection::E).unwrap());

        grid.set_elevation(b, 1).unwrap();
        assert!(grid.add_road(a, HexDirection::E).unwrap());
        grid.remove_roads(b).unwrap();
        assert!(!grid.cell(a).has_roads());
    }

    #[test]
    fn test_road_off_the_map_edge_is_rejected() {
        let mut grid = grid(3, 3);
        let corner = grid.cell_at_offset(0, 0).unwrap();
        assert!(!grid.add_road(corner, HexDirection::W).unwrap());
    }

    #[test]
    fn test_edge_types() {
        let mut grid = grid(3, 3);
        let a = grid.cell_at_offset(1, 1).unwrap();
        let b = grid.neighbor(a, HexDirection::NE).unwrap();
        assert_eq!(grid.edge_type(a, HexDirection::NE), Some(HexEdgeType::Flat));
        grid.set_elevation(b, -1).unwrap();
        assert_eq!(grid.edge_type(a, HexDirection::NE), Some(HexEdgeType::Slope));
        grid.set_elevation(b, 3).unwrap();
        assert_eq!(grid.edge_type(a, HexDirection::NE), Some(HexEdgeType::Cliff));
        assert_eq!(grid.elevation_difference(a, HexDirection::NE), Some(3));
    }

    #[test]
    fn test_unit_lifecycle() {
        let mut grid = grid(6, 6);
        let cell = grid.cell_at_offset(2, 2).unwrap();
        let id = grid.add_unit(cell, 90.0).unwrap();

        assert_eq!(grid.cell(cell).unit(), Some(id));
        assert_eq!(grid.unit(id).unwrap().location(), cell);
        assert!(grid.cell(cell).is_visible());
        assert!(matches!(
            grid.add_unit(cell, 0.0),
            Err(GridError::CellOccupied { .. })
        ));

        grid.remove_unit(id).unwrap();
        assert_eq!(grid.cell(cell).unit(), None);
        assert!(grid.unit(id).is_none());
        assert!(grid.cells().iter().all(|c| c.visibility() == 0));
        assert!(matches!(grid.remove_unit(id), Err(GridError::UnitNotFound(_))));
    }

    #[test]
    fn test_unit_cannot_start_underwater() {
        let mut grid = grid(3, 3);
        let cell = grid.cell_at_offset(1, 1).unwrap();
        grid.set_water_level(cell, 1).unwrap();
        assert!(matches!(
            grid.add_unit(cell, 0.0),
            Err(GridError::InvalidUnitLocation(_))
        ));
    }

    #[test]
    fn test_create_map_clears_units() {
        let mut grid = grid(5, 5);
        grid.add_unit(CellIndex(0), 0.0).unwrap();
        grid.add_unit(CellIndex(6), 0.0).unwrap();
        grid.create_map(5, 5).unwrap();
        assert_eq!(grid.unit_count(), 0);
        assert!(grid.cells().iter().all(|c| c.unit().is_none()));
    }

    #[test]
    fn test_clear_units_frees_cells_and_sight() {
        let mut grid = grid(6, 6);
        let a = grid.cell_at_offset(2, 2).unwrap();
        let b = grid.cell_at_offset(3, 2).unwrap();
        grid.add_unit(a, 0.0).unwrap();
        grid.add_unit(b, 0.0).unwrap();
        assert_eq!(grid.cell(a).visibility(), 2);

        grid.clear_units();
        assert_eq!(grid.unit_count(), 0);
        assert_eq!(grid.cell(a).unit(), None);
        assert_eq!(grid.cell(b).unit(), None);
        assert!(grid.cells().iter().all(|c| c.visibility() == 0));
        assert!(grid.cell(a).is_explored());

        // both cells can be occupied again
        grid.add_unit(a, 0.0).unwrap();
        grid.add_unit(b, 0.0).unwrap();
    }

    #[test]
    fn test_travel_rejects_bad_paths() {
        let mut grid = grid(5, 5);
        let start = grid.cell_at_offset(0, 0).unwrap();
        let id = grid.add_unit(start, 0.0).unwrap();
        let far = grid.cell_at_offset(3, 3).unwrap();

        assert!(matches!(grid.travel(id, &[]), Err(GridError::InvalidPath(_))));
        assert!(matches!(grid.travel(id, &[far]), Err(GridError::InvalidPath(_))));
        assert!(matches!(grid.travel(id, &[start, far]), Err(GridError::InvalidPath(_))));
        assert_eq!(grid.unit(id).unwrap().location(), start);
    }
}
