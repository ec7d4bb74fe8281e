//! Error types for grid operations

use crate::cell::CellIndex;
use crate::unit::UnitId;

/// Errors returned by fallible grid operations.
///
/// A search that finds no route is not an error; `find_path` reports it as
/// `false`.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("Unsupported map size: {x} x {z}")]
    InvalidMapSize { x: i32, z: i32 },

    #[error("Cell index {0:?} is outside the grid")]
    CellOutOfBounds(CellIndex),

    #[error("Unknown unit: {0:?}")]
    UnitNotFound(UnitId),

    #[error("Cell {cell:?} is already occupied by unit {occupant:?}")]
    CellOccupied { cell: CellIndex, occupant: UnitId },

    #[error("Cell {0:?} cannot hold a unit")]
    InvalidUnitLocation(CellIndex),

    #[error("Invalid travel path: {0}")]
    InvalidPath(String),
}

pub type Result<T> = std::result::Result<T, GridError>;
