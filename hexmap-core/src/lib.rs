//! HexMap Core - Pathfinding and visibility on hex grids
//!
//! This crate provides the search engine behind unit movement and fog of war:
//! - Hex geometry (cube coordinates, directions, edge types)
//! - Cells with terrain attributes and a grid that owns them
//! - A bucket priority queue for small integer priorities
//! - Phase-stamped search state that never needs an O(n) reset
//! - Turn-quantized path search driven by per-unit movement rules
//! - Range-limited visibility with reference-counted fog of war
//!
//! The grid is single-threaded: path and visibility queries share one queue
//! and one phase counter, and each runs to completion before returning.

pub mod coords;
pub mod cell;
pub mod queue;
pub mod search;
pub mod unit;
pub mod grid;
pub mod pathfinding;
pub mod visibility;
pub mod config;
pub mod error;

// Re-exports for convenient access
pub use coords::{HexCoordinates, HexDirection, HexEdgeType};
pub use cell::{CellIndex, HexCell, Highlight};
pub use queue::CellPriorityQueue;
pub use search::{Relaxation, SearchFrontier, SearchStatus};
pub use unit::{HexUnit, MovementRules, StandardMovement, UnitId, UnitKind, SPEED_PER_TURN, VISION_RANGE};
pub use grid::HexGrid;
pub use pathfinding::turn_for_distance;
pub use config::GridConfig;
pub use error::{GridError, Result};
