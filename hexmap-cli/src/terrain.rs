//! Seeded random terrain for demos and benchmarks
//!
//! Everything is built through the grid's editing operations, so the
//! generated maps obey the same road and neighbor rules as edited ones.

use std::path::Path;

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use hexmap_core::{CellIndex, GridConfig, HexDirection, HexGrid};

/// Chance that a low cell is flooded
const WATER_CHANCE: f64 = 0.12;
/// Chance that a cell is walled
const WALL_CHANCE: f64 = 0.05;
/// Chance that a cell carries some development
const DEVELOPMENT_CHANCE: f64 = 0.15;
/// Road random walks per 100 cells
const ROADS_PER_HUNDRED_CELLS: usize = 2;
const ROAD_LENGTH: usize = 10;

/// Load a grid config, or the default when no file is given
pub fn load_config(path: Option<&Path>) -> Result<GridConfig> {
    match path {
        Some(path) => GridConfig::load(path),
        None => Ok(GridConfig::default()),
    }
}

/// Create RNG from seed or random
pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Build a grid and fill it with random hills, lakes, walls and roads
pub fn generate(config: GridConfig, rng: &mut ChaCha8Rng) -> Result<HexGrid> {
    let mut grid = HexGrid::new(config).context("Failed to create grid")?;

    for i in 0..grid.len() {
        let cell = CellIndex(i);
        let elevation = match rng.gen_range(0..10) {
            0..=4 => 0,
            5..=7 => 1,
            8 => 2,
            _ => 3,
        };
        grid.set_elevation(cell, elevation)?;

        if elevation == 0 && rng.gen_bool(WATER_CHANCE) {
            grid.set_water_level(cell, 1)?;
        }
        if rng.gen_bool(WALL_CHANCE) {
            grid.set_walled(cell, true)?;
        }
        if rng.gen_bool(DEVELOPMENT_CHANCE) {
            grid.set_urban_level(cell, rng.gen_range(0..=2))?;
            grid.set_farm_level(cell, rng.gen_range(0..=1))?;
            grid.set_plant_level(cell, rng.gen_range(0..=1))?;
        }
    }

    let road_count = (grid.len() * ROADS_PER_HUNDRED_CELLS).div_ceil(100);
    for _ in 0..road_count {
        lay_road(&mut grid, rng)?;
    }

    tracing::debug!(
        "Generated {} x {} map with {} roads",
        grid.cell_count_x(),
        grid.cell_count_z(),
        road_count
    );
    Ok(grid)
}

/// Random walk that stops at the first edge a road cannot cross
fn lay_road(grid: &mut HexGrid, rng: &mut ChaCha8Rng) -> Result<()> {
    let mut cell = CellIndex(rng.gen_range(0..grid.len()));
    let mut direction = HexDirection::from_index(rng.gen_range(0..6));

    for _ in 0..ROAD_LENGTH {
        direction = match rng.gen_range(0..4) {
            0 => direction.previous(),
            1 => direction.next(),
            _ => direction,
        };
        let Some(next) = grid.neighbor(cell, direction) else {
            break;
        };
        if grid.cell(next).is_underwater() || !grid.add_road(cell, direction)? {
            break;
        }
        cell = next;
    }
    Ok(())
}

/// Parse offset coordinates given as `X,Z`
pub fn parse_offset(s: &str) -> Result<(i32, i32), String> {
    let (x, z) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Z but got '{}'", s))?;
    let x = x.trim().parse().map_err(|e| format!("bad X in '{}': {}", s, e))?;
    let z = z.trim().parse().map_err(|e| format!("bad Z in '{}': {}", s, e))?;
    Ok((x, z))
}

/// Resolve offset coordinates to a cell, with a readable error
pub fn cell_at(grid: &HexGrid, (x, z): (i32, i32)) -> Result<CellIndex> {
    grid.cell_at_offset(x, z).with_context(|| {
        format!(
            "Cell {},{} is outside the {} x {} map",
            x,
            z,
            grid.cell_count_x(),
            grid.cell_count_z()
        )
    })
}
