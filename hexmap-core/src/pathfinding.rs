//! Turn-quantized shortest path search
//!
//! Best-first search over the grid using `distance + hex distance to goal` as
//! the bucket priority. Costs are accumulated in movement points, but a unit
//! cannot carry unspent points into the next turn: when a step would spill
//! over into a new turn, the step is charged from the start of that turn.
//! Edge cost therefore depends on the distance already travelled.

use crate::cell::{CellIndex, Highlight};
use crate::coords::HexDirection;
use crate::error::{GridError, Result};
use crate::grid::HexGrid;
use crate::search::SearchStatus;
use crate::unit::{MovementRules, UnitId};

/// Result of the most recent `find_path`, valid until the next
/// `find_path`/`clear_path`.
#[derive(Clone, Debug)]
pub(crate) struct CurrentPath {
    from: CellIndex,
    to: CellIndex,
    exists: bool,
    speed: i32,
    /// Cells from `from` to `to`, empty when no path exists
    cells: Vec<CellIndex>,
    /// Accumulated cost at each cell in `cells`
    distances: Vec<i32>,
}

/// Turn in which a unit with `speed` reaches a cell at `distance`
pub fn turn_for_distance(distance: i32, speed: i32) -> i32 {
    (distance - 1) / speed
}

impl HexGrid {
    /// Search for a route from `from` to `to` for a unit following `rules`.
    ///
    /// Replaces any previous path. Returns false when no route exists,
    /// including for a non-positive speed.
    ///
    /// # Panics
    ///
    /// If either cell does not belong to this grid.
    pub fn find_path<R>(&mut self, from: CellIndex, to: CellIndex, rules: &R) -> bool
    where
        R: MovementRules + ?Sized,
    {
        self.clear_path();

        let speed = rules.speed();
        let exists = if speed > 0 {
            self.search_path(from, to, rules)
        } else {
            tracing::warn!("Path search with non-positive speed {}", speed);
            false
        };

        let (cells, distances) = if exists {
            self.trace_path(from, to)
        } else {
            (Vec::new(), Vec::new())
        };

        tracing::debug!(
            "Path {} -> {}: {} (cost {:?})",
            self.cells[from.0].coordinates,
            self.cells[to.0].coordinates,
            if exists { "found" } else { "none" },
            distances.last()
        );

        self.current_path = Some(CurrentPath {
            from,
            to,
            exists,
            speed,
            cells,
            distances,
        });
        self.show_path();
        exists
    }

    /// Search from a unit's location using that unit's movement rules
    pub fn find_unit_path(&mut self, id: UnitId, to: CellIndex) -> Result<bool> {
        let unit = self.unit(id).ok_or(GridError::UnitNotFound(id))?.clone();
        self.get_cell(to)?;
        Ok(self.find_path(unit.location(), to, &unit))
    }

    pub fn has_path(&self) -> bool {
        self.current_path.as_ref().is_some_and(|path| path.exists)
    }

    /// Cells of the current path in travel order, including both endpoints
    pub fn path(&self) -> Option<&[CellIndex]> {
        self.current_path
            .as_ref()
            .filter(|path| path.exists)
            .map(|path| path.cells.as_slice())
    }

    /// Total turn-quantized cost of the current path
    pub fn path_cost(&self) -> Option<i32> {
        self.current_path
            .as_ref()
            .filter(|path| path.exists)
            .and_then(|path| path.distances.last().copied())
    }

    /// Turn label for each step of the current path, excluding the start
    pub fn path_turns(&self) -> Option<Vec<(CellIndex, i32)>> {
        let path = self.current_path.as_ref().filter(|path| path.exists)?;
        Some(
            path.cells
                .iter()
                .zip(&path.distances)
                .skip(1)
                .map(|(&cell, &distance)| (cell, turn_for_distance(distance, path.speed)))
                .collect(),
        )
    }

    /// Number of turns the current path takes
    pub fn path_turn_count(&self) -> Option<i32> {
        let cost = self.path_cost()?;
        let speed = self.current_path.as_ref()?.speed;
        Some(if cost == 0 { 0 } else { turn_for_distance(cost, speed) + 1 })
    }

    /// Forget the current path and remove its overlay
    pub fn clear_path(&mut self) {
        let Some(path) = self.current_path.take() else {
            return;
        };

        if path.exists {
            for &cell in &path.cells {
                self.cells[cell.0].set_label(None);
                self.cells[cell.0].disable_highlight();
            }
        } else {
            self.cells[path.from.0].disable_highlight();
            self.cells[path.to.0].disable_highlight();
        }
    }

    /// Phase-checked state of a cell in the most recent search (path or
    /// visibility)
    pub fn search_status(&self, cell: CellIndex) -> SearchStatus {
        self.search.status(cell)
    }

    /// Distance of a cell in the most recent search, `None` if untouched
    pub fn search_distance(&self, cell: CellIndex) -> Option<i32> {
        self.search.distance(cell)
    }

    fn search_path<R>(&mut self, from: CellIndex, to: CellIndex, rules: &R) -> bool
    where
        R: MovementRules + ?Sized,
    {
        let speed = rules.speed();
        let to_coordinates = self.cells[to.0].coordinates;

        self.search.begin();
        self.search.start(from);

        while let Some(current) = self.search.settle_next() {
            if current == to {
                return true;
            }

            let Some(current_distance) = self.search.distance(current) else {
                continue;
            };
            let current_turn = turn_for_distance(current_distance, speed);

            for direction in HexDirection::ALL {
                let Some(neighbor) = self.cells[current.0].neighbor(direction) else {
                    continue;
                };
                if self.search.status(neighbor) == SearchStatus::Finalized {
                    continue;
                }

                let neighbor_cell = &self.cells[neighbor.0];
                if neighbor_cell.is_underwater() || neighbor_cell.unit().is_some() {
                    continue;
                }
                if !rules.is_valid_destination(neighbor_cell) {
                    continue;
                }
                let Some(move_cost) = rules
                    .move_cost(&self.cells[current.0], neighbor_cell, direction)
                    .filter(|&cost| cost >= 0)
                else {
                    continue;
                };

                let mut distance = current_distance + move_cost;
                let turn = turn_for_distance(distance, speed);
                if turn > current_turn {
                    // Points left over in the current turn are lost
                    distance = turn * speed + move_cost;
                }

                let heuristic = neighbor_cell.coordinates.distance_to(to_coordinates);
                self.search.relax(neighbor, distance, heuristic, Some(current));
            }
        }

        false
    }

    /// Follow predecessors back from `to`; `from` never has one
    fn trace_path(&self, from: CellIndex, to: CellIndex) -> (Vec<CellIndex>, Vec<i32>) {
        let mut cells = vec![to];
        let mut current = to;
        while current != from {
            match self.search.path_from(current) {
                Some(previous) => {
                    cells.push(previous);
                    current = previous;
                }
                None => break,
            }
        }
        cells.reverse();

        let distances = cells
            .iter()
            .map(|&cell| self.search.distance(cell).unwrap_or(0))
            .collect();
        (cells, distances)
    }

    fn show_path(&mut self) {
        let Some(path) = self.current_path.as_ref() else {
            return;
        };

        for (&cell, &distance) in path.cells.iter().zip(&path.distances).skip(1) {
            let turn = turn_for_distance(distance, path.speed);
            self.cells[cell.0].set_label(Some(turn));
            self.cells[cell.0].enable_highlight(Highlight::Path);
        }
        self.cells[path.from.0].enable_highlight(Highlight::Start);
        self.cells[path.to.0].enable_highlight(Highlight::Destination);
    }
}
