//! Grid configuration

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::unit::{SPEED_PER_TURN, VISION_RANGE};

/// Map dimensions and unit defaults
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cells per row
    pub cell_count_x: i32,
    /// Number of rows
    pub cell_count_z: i32,
    /// Whether fresh cells count as explored (the editor starts fully revealed)
    pub start_explored: bool,
    /// Movement points per turn for new units
    pub unit_speed: i32,
    /// Sight radius for new units
    pub unit_vision_range: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_count_x: 20,
            cell_count_z: 15,
            start_explored: false,
            unit_speed: SPEED_PER_TURN,
            unit_vision_range: VISION_RANGE,
        }
    }
}

impl GridConfig {
    /// Config for a map of the given size
    pub fn sized(cell_count_x: i32, cell_count_z: i32) -> Self {
        Self {
            cell_count_x,
            cell_count_z,
            ..Default::default()
        }
    }

    pub fn with_start_explored(mut self, explored: bool) -> Self {
        self.start_explored = explored;
        self
    }

    pub fn with_unit_speed(mut self, speed: i32) -> Self {
        self.unit_speed = speed;
        self
    }

    pub fn with_unit_vision_range(mut self, range: i32) -> Self {
        self.unit_vision_range = range;
        self
    }

    /// Reject configurations the grid cannot be built from
    pub fn validate(&self) -> Result<()> {
        let cell_count = self.cell_count_x.checked_mul(self.cell_count_z);
        if self.cell_count_x <= 0 || self.cell_count_z <= 0 || cell_count.is_none() {
            return Err(GridError::InvalidMapSize {
                x: self.cell_count_x,
                z: self.cell_count_z,
            });
        }
        Ok(())
    }

    /// Load from JSON file; missing fields fall back to defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read grid config {}", path.display()))?;
        let config: GridConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse grid config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
