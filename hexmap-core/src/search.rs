//! Per-cell search state versioned by search phase
//!
//! Instead of resetting distances before every query, each search advances a
//! grid-owned phase counter by two. A cell whose stamp is below the current
//! phase holds leftovers from an earlier search and is treated as unvisited;
//! a stamp equal to the phase marks a queued cell, and phase + 1 marks a cell
//! that has been dequeued and settled.
//!
//! All reads of distance and predecessor go through the phase check here, so
//! stale values are never observed as live data.

use crate::cell::CellIndex;
use crate::queue::CellPriorityQueue;

/// Where a cell stands in the current search
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    Unvisited,
    Frontier,
    Finalized,
}

/// Outcome of relaxing an edge into a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relaxation {
    Discovered,
    Improved,
    Skipped,
}

#[derive(Clone, Copy, Debug, Default)]
struct SearchData {
    distance: i32,
    heuristic: i32,
    phase: u32,
    path_from: Option<CellIndex>,
}

impl SearchData {
    fn priority(&self) -> i32 {
        self.distance + self.heuristic
    }
}

/// Search phase counter, per-cell transient fields and the shared frontier
/// queue for one grid. Only one search may be open at a time.
#[derive(Clone, Debug)]
pub struct SearchFrontier {
    phase: u32,
    cells: Vec<SearchData>,
    queue: CellPriorityQueue,
}

impl SearchFrontier {
    pub fn new(cell_count: usize) -> Self {
        Self {
            phase: 0,
            cells: vec![SearchData::default(); cell_count],
            queue: CellPriorityQueue::new(cell_count),
        }
    }

    /// Drop all state for a rebuilt grid
    pub fn resize(&mut self, cell_count: usize) {
        self.phase = 0;
        self.cells.clear();
        self.cells.resize(cell_count, SearchData::default());
        self.queue.resize(cell_count);
    }

    pub fn phase(&self) -> u32 {
        self.phase
    }

    /// Open a new search, invalidating everything the previous one left
    pub fn begin(&mut self) {
        if self.phase >= u32::MAX - 2 {
            // Stamps would wrap; one full reset every ~2^31 searches.
            for data in &mut self.cells {
                data.phase = 0;
            }
            self.phase = 0;
        }
        self.phase += 2;
        self.queue.clear();
    }

    pub fn status(&self, cell: CellIndex) -> SearchStatus {
        let stamp = self.cells[cell.0].phase;
        if stamp < self.phase {
            SearchStatus::Unvisited
        } else if stamp == self.phase {
            SearchStatus::Frontier
        } else {
            SearchStatus::Finalized
        }
    }

    /// Seed the search with its origin at distance zero
    pub fn start(&mut self, cell: CellIndex) {
        self.cells[cell.0] = SearchData {
            distance: 0,
            heuristic: 0,
            phase: self.phase,
            path_from: None,
        };
        self.queue.enqueue(cell, 0);
    }

    /// Offer `distance` for `cell` via `from`.
    ///
    /// Unvisited cells are initialised and queued; queued cells move to a
    /// lower bucket only on a strict improvement; settled cells are skipped.
    /// The heuristic is fixed on first discovery.
    pub fn relax(
        &mut self,
        cell: CellIndex,
        distance: i32,
        heuristic: i32,
        from: Option<CellIndex>,
    ) -> Relaxation {
        match self.status(cell) {
            SearchStatus::Unvisited => {
                let data = SearchData {
                    distance,
                    heuristic,
                    phase: self.phase,
                    path_from: from,
                };
                self.cells[cell.0] = data;
                self.queue.enqueue(cell, data.priority());
                Relaxation::Discovered
            }
            SearchStatus::Frontier if distance < self.cells[cell.0].distance => {
                let data = &mut self.cells[cell.0];
                let old_priority = data.priority();
                data.distance = distance;
                data.path_from = from;
                let new_priority = data.priority();
                self.queue.change(cell, old_priority, new_priority);
                Relaxation::Improved
            }
            _ => Relaxation::Skipped,
        }
    }

    /// Dequeue the cheapest frontier cell and mark it settled
    pub fn settle_next(&mut self) -> Option<CellIndex> {
        let cell = self.queue.dequeue()?;
        self.cells[cell.0].phase += 1;
        Some(cell)
    }

    /// Number of cells still queued
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Distance from the current search's origin, if the cell was reached
    pub fn distance(&self, cell: CellIndex) -> Option<i32> {
        match self.status(cell) {
            SearchStatus::Unvisited => None,
            _ => Some(self.cells[cell.0].distance),
        }
    }

    /// Predecessor in the current search, if the cell was reached
    pub fn path_from(&self, cell: CellIndex) -> Option<CellIndex> {
        match self.status(cell) {
            SearchStatus::Unvisited => None,
            _ => self.cells[cell.0].path_from,
        }
    }
}
