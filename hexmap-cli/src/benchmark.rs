//! Benchmark command - time path and visibility searches
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_path_benchmarks(), run_visibility_benchmark(), report_results()
//! - Level 3: benchmark_paths(), benchmark_visibility()
//! - Level 4: timing utilities, formatting

use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Args;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use hexmap_core::{CellIndex, GridConfig, HexGrid, StandardMovement};

use crate::terrain;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BenchmarkArgs {
    /// Number of searches per benchmark
    #[arg(long, default_value = "1000")]
    pub searches: usize,

    /// Speeds to benchmark path search at
    #[arg(long, value_delimiter = ',', default_value = "12,24,48")]
    pub speeds: Vec<i32>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Results of a single benchmark run
#[derive(Clone, Debug)]
struct BenchmarkResult {
    name: String,
    searches: usize,
    total_time: Duration,
    avg_time_per_search: Duration,
    searches_per_second: f64,
    notes: String,
}

/// All benchmark results
#[derive(Clone, Debug)]
struct AllResults {
    results: Vec<BenchmarkResult>,
    map_size: String,
    system_info: String,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run benchmark command
///
/// 1. Generate one seeded map, explored so every land cell is reachable
/// 2. Time path searches at each speed
/// 3. Time visibility searches
/// 4. Report all results
pub fn run(args: BenchmarkArgs, config: GridConfig, seed: Option<u64>) -> Result<()> {
    tracing::info!("Starting benchmarks: {} searches per run", args.searches);

    let mut rng = terrain::create_rng(seed);
    let mut grid = terrain::generate(config.with_start_explored(true), &mut rng)?;

    let mut all_results = AllResults {
        results: Vec::new(),
        map_size: format!("{} x {}", grid.cell_count_x(), grid.cell_count_z()),
        system_info: get_system_info(),
    };

    run_path_benchmarks(&args, &mut grid, &mut rng, &mut all_results);
    run_visibility_benchmark(&args, &mut grid, &mut rng, &mut all_results);

    report_results(&all_results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn run_path_benchmarks(args: &BenchmarkArgs, grid: &mut HexGrid, rng: &mut ChaCha8Rng, results: &mut AllResults) {
    for &speed in &args.speeds {
        tracing::info!("Benchmarking path search at speed {}...", speed);
        results.results.push(benchmark_paths(grid, rng, args.searches, speed));
    }
}

fn run_visibility_benchmark(args: &BenchmarkArgs, grid: &mut HexGrid, rng: &mut ChaCha8Rng, results: &mut AllResults) {
    let range = grid.config().unit_vision_range;
    tracing::info!("Benchmarking visibility at range {}...", range);
    results.results.push(benchmark_visibility(grid, rng, args.searches, range));
}

/// Report all benchmark results
fn report_results(results: &AllResults, args: &BenchmarkArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Time `searches` path searches between random cells
fn benchmark_paths(grid: &mut HexGrid, rng: &mut ChaCha8Rng, searches: usize, speed: i32) -> BenchmarkResult {
    let rules = StandardMovement::with_speed(speed);
    let pairs: Vec<(CellIndex, CellIndex)> = (0..searches)
        .map(|_| (random_cell(grid, rng), random_cell(grid, rng)))
        .collect();

    let start = Instant::now();
    let mut found = 0;
    let mut total_turns = 0;

    for (from, to) in pairs {
        if grid.find_path(from, to, &rules) {
            found += 1;
            total_turns += grid.path_turn_count().unwrap_or_default();
        }
    }
    grid.clear_path();

    let total_time = start.elapsed();
    BenchmarkResult {
        name: format!("Path speed {}", speed),
        searches,
        total_time,
        avg_time_per_search: average(total_time, searches),
        searches_per_second: per_second(searches, total_time),
        notes: format!(
            "Found: {:.1}%, avg turns: {:.1}",
            percentage(found, searches),
            if found > 0 { total_turns as f64 / found as f64 } else { 0.0 }
        ),
    }
}

/// Time `searches` visibility searches from random cells
fn benchmark_visibility(grid: &mut HexGrid, rng: &mut ChaCha8Rng, searches: usize, range: i32) -> BenchmarkResult {
    let observers: Vec<CellIndex> = (0..searches).map(|_| random_cell(grid, rng)).collect();

    let start = Instant::now();
    let mut total_visible = 0;

    for from in observers {
        total_visible += grid.visible_cells(from, range).len();
    }

    let total_time = start.elapsed();
    BenchmarkResult {
        name: format!("Visibility range {}", range),
        searches,
        total_time,
        avg_time_per_search: average(total_time, searches),
        searches_per_second: per_second(searches, total_time),
        notes: format!(
            "Avg visible: {:.1}",
            if searches > 0 { total_visible as f64 / searches as f64 } else { 0.0 }
        ),
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn random_cell(grid: &HexGrid, rng: &mut ChaCha8Rng) -> CellIndex {
    CellIndex(rng.gen_range(0..grid.len()))
}

fn average(total: Duration, count: usize) -> Duration {
    if count == 0 {
        Duration::ZERO
    } else {
        total / count as u32
    }
}

fn per_second(count: usize, total: Duration) -> f64 {
    let secs = total.as_secs_f64();
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Get system information string
fn get_system_info() -> String {
    format!(
        "hexmap {}, {} CPUs",
        env!("CARGO_PKG_VERSION"),
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1)
    )
}

/// Format duration for display; single searches usually land in the
/// microsecond or nanosecond range
fn format_duration(d: Duration) -> String {
    match d.as_nanos() {
        n if n >= 1_000_000_000 => format!("{:.2}s", d.as_secs_f64()),
        n if n >= 1_000_000 => format!("{:.2}ms", d.as_secs_f64() * 1e3),
        n if n >= 1_000 => format!("{:.2}us", d.as_secs_f64() * 1e6),
        n => format!("{}ns", n),
    }
}

/// Print results as JSON
fn print_json_results(results: &AllResults) {
    #[derive(serde::Serialize)]
    struct JsonBenchmark {
        name: String,
        searches: usize,
        total_time_ms: u64,
        avg_time_ns: u128,
        searches_per_second: f64,
        notes: String,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        system_info: String,
        map_size: String,
        benchmarks: Vec<JsonBenchmark>,
    }

    let output = JsonOutput {
        system_info: results.system_info.clone(),
        map_size: results.map_size.clone(),
        benchmarks: results
            .results
            .iter()
            .map(|r| JsonBenchmark {
                name: r.name.clone(),
                searches: r.searches,
                total_time_ms: r.total_time.as_millis() as u64,
                avg_time_ns: r.avg_time_per_search.as_nanos(),
                searches_per_second: r.searches_per_second,
                notes: r.notes.clone(),
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text table
fn print_text_results(results: &AllResults) {
    println!("\n=== HexMap Benchmark Results ===");
    println!("System: {}", results.system_info);
    println!("Map: {}\n", results.map_size);

    println!(
        "{:<22} {:>9} {:>12} {:>12} {:>12}  {}",
        "Benchmark", "Searches", "Total Time", "Avg/Search", "Searches/s", "Notes"
    );
    println!("{}", "-".repeat(96));

    for r in &results.results {
        println!(
            "{:<22} {:>9} {:>12} {:>12} {:>12.0}  {}",
            r.name,
            r.searches,
            format_duration(r.total_time),
            format_duration(r.avg_time_per_search),
            r.searches_per_second,
            r.notes
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
