//! Path command - find a route across a generated map
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_grid(), search(), report_path()
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;

use hexmap_core::{CellIndex, GridConfig, HexGrid, StandardMovement};

use crate::terrain;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PathArgs {
    /// Start cell in offset coordinates
    #[arg(long, value_name = "X,Z", value_parser = terrain::parse_offset)]
    pub from: (i32, i32),

    /// Destination cell in offset coordinates
    #[arg(long, value_name = "X,Z", value_parser = terrain::parse_offset)]
    pub to: (i32, i32),

    /// Movement points per turn (defaults to the configured unit speed)
    #[arg(long)]
    pub speed: Option<i32>,

    /// Start with an unexplored map and search as a unit placed at --from
    #[arg(long)]
    pub fog: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// One step of a found path
#[derive(Clone, Debug, serde::Serialize)]
struct PathStep {
    coordinates: String,
    turn: i32,
}

/// Outcome of a single search
#[derive(Clone, Debug, serde::Serialize)]
struct PathReport {
    from: String,
    to: String,
    found: bool,
    cost: Option<i32>,
    turns: Option<i32>,
    steps: Vec<PathStep>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run path command
///
/// 1. Generate seeded terrain
/// 2. Search from --from to --to
/// 3. Report the path with its turn labels
pub fn run(args: PathArgs, config: GridConfig, seed: Option<u64>) -> Result<()> {
    let speed = args.speed.unwrap_or(config.unit_speed);
    let mut grid = build_grid(&args, config.with_unit_speed(speed), seed)?;

    let from = terrain::cell_at(&grid, args.from)?;
    let to = terrain::cell_at(&grid, args.to)?;
    tracing::info!(
        "Searching {} -> {} at speed {}",
        grid.cell(from).coordinates,
        grid.cell(to).coordinates,
        speed
    );

    let report = search(&mut grid, from, to, speed, args.fog)?;
    report_path(&report, args.json);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_grid(args: &PathArgs, config: GridConfig, seed: Option<u64>) -> Result<HexGrid> {
    let mut rng = terrain::create_rng(seed);
    terrain::generate(config.with_start_explored(!args.fog), &mut rng)
}

/// Search either as a unit (so only what it has seen is reachable) or with
/// plain standard movement on a fully explored map
fn search(grid: &mut HexGrid, from: CellIndex, to: CellIndex, speed: i32, fog: bool) -> Result<PathReport> {
    let found = if fog {
        let id = grid
            .add_unit(from, 0.0)
            .with_context(|| format!("Cannot place a unit at {}", grid.cell(from).coordinates))?;
        grid.find_unit_path(id, to)?
    } else {
        grid.find_path(from, to, &StandardMovement::with_speed(speed))
    };

    let steps = grid
        .path_turns()
        .unwrap_or_default()
        .into_iter()
        .map(|(cell, turn)| PathStep {
            coordinates: grid.cell(cell).coordinates.to_string(),
            turn,
        })
        .collect();

    Ok(PathReport {
        from: grid.cell(from).coordinates.to_string(),
        to: grid.cell(to).coordinates.to_string(),
        found,
        cost: grid.path_cost(),
        turns: grid.path_turn_count(),
        steps,
    })
}

fn report_path(report: &PathReport, json: bool) {
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

fn print_text_report(report: &PathReport) {
    println!("\n=== Path {} -> {} ===", report.from, report.to);
    if !report.found {
        println!("No path");
        return;
    }

    println!("{:<16} {:>5}", "Cell", "Turn");
    println!("{}", "-".repeat(22));
    println!("{:<16} {:>5}", report.from, "-");
    for step in &report.steps {
        println!("{:<16} {:>5}", step.coordinates, step.turn);
    }
    println!("{}", "-".repeat(22));
    println!(
        "Cost: {}  Turns: {}",
        report.cost.unwrap_or_default(),
        report.turns.unwrap_or_default()
    );
}
