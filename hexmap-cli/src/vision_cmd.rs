//! Vision command - list the cells an observer can see
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: collect_view(), report_view()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;

use hexmap_core::{CellIndex, GridConfig, HexGrid};

use crate::terrain;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct VisionArgs {
    /// Observer cell in offset coordinates
    #[arg(long, value_name = "X,Z", value_parser = terrain::parse_offset)]
    pub from: (i32, i32),

    /// Sight range (defaults to the configured unit vision range)
    #[arg(long)]
    pub range: Option<i32>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, serde::Serialize)]
struct VisibleCell {
    coordinates: String,
    distance: i32,
    elevation: i32,
}

#[derive(Clone, Debug, serde::Serialize)]
struct ViewReport {
    from: String,
    range: i32,
    view_elevation: i32,
    cells: Vec<VisibleCell>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run vision command
pub fn run(args: VisionArgs, config: GridConfig, seed: Option<u64>) -> Result<()> {
    let range = args.range.unwrap_or(config.unit_vision_range);
    let mut rng = terrain::create_rng(seed);
    let mut grid = terrain::generate(config, &mut rng)?;

    let from = terrain::cell_at(&grid, args.from)?;
    tracing::info!("Looking from {} with range {}", grid.cell(from).coordinates, range);

    let report = collect_view(&mut grid, from, range);
    report_view(&report, args.json);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn collect_view(grid: &mut HexGrid, from: CellIndex, range: i32) -> ViewReport {
    let origin = grid.cell(from).coordinates;
    let cells = grid
        .visible_cells(from, range)
        .into_iter()
        .map(|cell| {
            let cell = grid.cell(cell);
            VisibleCell {
                coordinates: cell.coordinates.to_string(),
                distance: cell.coordinates.distance_to(origin),
                elevation: cell.view_elevation(),
            }
        })
        .collect();

    ViewReport {
        from: origin.to_string(),
        range,
        view_elevation: grid.cell(from).view_elevation(),
        cells,
    }
}

fn report_view(report: &ViewReport, json: bool) {
    if json {
        if let Ok(json) = serde_json::to_string_pretty(report) {
            println!("{}", json);
        }
    } else {
        print_text_report(report);
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_text_report(report: &ViewReport) {
    println!(
        "\n=== View from {} (range {}, elevation {}) ===",
        report.from, report.range, report.view_elevation
    );
    println!("{:<16} {:>8} {:>9}", "Cell", "Distance", "Elevation");
    println!("{}", "-".repeat(35));
    for cell in &report.cells {
        println!("{:<16} {:>8} {:>9}", cell.coordinates, cell.distance, cell.elevation);
    }
    println!("{}", "-".repeat(35));
    println!("{} cells visible", report.cells.len());
}
