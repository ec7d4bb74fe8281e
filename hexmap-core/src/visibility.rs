//! Range-limited field of view and fog-of-war bookkeeping
//!
//! Visibility is a uniform-cost flood from the observer using the same queue
//! and phase machinery as path search, with a zero heuristic. Taller
//! observers see farther, taller targets are harder to see, and a cell is
//! only reached if the flood gets there no later than its straight-line hex
//! distance, so sight does not bend around obstacles.

use crate::cell::CellIndex;
use crate::coords::HexDirection;
use crate::grid::HexGrid;
use crate::search::SearchStatus;

impl HexGrid {
    /// Cells visible from `from` with sight `range`, in settle order.
    /// Always contains `from` itself.
    pub fn visible_cells(&mut self, from: CellIndex, range: i32) -> Vec<CellIndex> {
        let mut visible = Vec::new();
        let range = range + self.cells[from.0].view_elevation();
        let from_coordinates = self.cells[from.0].coordinates;

        self.search.begin();
        self.search.start(from);

        while let Some(current) = self.search.settle_next() {
            visible.push(current);
            let Some(current_distance) = self.search.distance(current) else {
                continue;
            };

            for direction in HexDirection::ALL {
                let Some(neighbor) = self.cells[current.0].neighbor(direction) else {
                    continue;
                };
                if self.search.status(neighbor) == SearchStatus::Finalized {
                    continue;
                }

                let neighbor_cell = &self.cells[neighbor.0];
                let distance = current_distance + 1;
                if distance + neighbor_cell.view_elevation() > range
                    || distance > from_coordinates.distance_to(neighbor_cell.coordinates)
                {
                    continue;
                }

                self.search.relax(neighbor, distance, 0, None);
            }
        }

        tracing::trace!(
            "Visibility from {} (range {}): {} cells",
            from_coordinates,
            range,
            visible.len()
        );
        visible
    }

    /// Add one observer's worth of sight around `from`
    pub fn increase_visibility(&mut self, from: CellIndex, range: i32) {
        for cell in self.visible_cells(from, range) {
            if self.cells[cell.0].increase_visibility() {
                tracing::trace!("Cell {} became visible", self.cells[cell.0].coordinates);
            }
        }
    }

    /// Remove one observer's worth of sight around `from`
    pub fn decrease_visibility(&mut self, from: CellIndex, range: i32) {
        for cell in self.visible_cells(from, range) {
            if self.cells[cell.0].decrease_visibility() {
                tracing::trace!("Cell {} went dark", self.cells[cell.0].coordinates);
            }
        }
    }

    /// Zero every counter, then re-apply the sight of all units
    pub fn reset_visibility(&mut self) {
        for cell in &mut self.cells {
            cell.reset_visibility();
        }

        let observers: Vec<(CellIndex, i32)> = self
            .units()
            .map(|unit| (unit.location(), unit.movement.vision_range))
            .collect();
        for (location, range) in observers {
            self.increase_visibility(location, range);
        }
        tracing::debug!("Visibility reset for {} units", self.unit_count());
    }
}
