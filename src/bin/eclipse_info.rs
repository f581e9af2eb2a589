//! Eclipse Information Tool
//!
//! Reads a Besselian element table in JSON form and prints the begin/end
//! circumstances of the central eclipse, the size of the computed limit
//! lines and the path bounds. With `--time` it also traces the shadow
//! outlines at that instant.
//!
//! Usage:
//!   cargo run --bin eclipse_info -- [--time 18.5] [--geojson] path/to/table.json

use std::time::Instant;

use clap::{ArgAction, Parser};
use eclipse_path::time::{format_duration, format_hours, tt_hours_to_utc};
use eclipse_path::{
    compute_global_eclipse_features_with_config, compute_local_eclipse_features_with_config,
    geojson, BesselianTable, EclipseCircumstances, PathLimitLine, SolverConfig,
};
use log::LevelFilter;

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Eclipse Information Tool
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Computes shadow outlines and the path of totality from Besselian elements",
    long_about = None
)]
struct Args {
    /// Besselian element table (JSON)
    table: String,

    /// Also trace the shadow outlines at this time (TT hours)
    #[arg(short, long)]
    time: Option<f64>,

    /// Solver configuration file (JSON)
    #[arg(short, long)]
    config: Option<String>,

    /// Print a GeoJSON FeatureCollection instead of a report
    #[arg(short, long, action = ArgAction::SetTrue)]
    geojson: bool,

    /// Log solver diagnostics
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

/// Prints a section header with a title and separator line
fn print_section_header(title: &str) {
    println!("\n{}:", title);
    println!("-------------------------------------------------------");
}

/// Helper to print named values in a formatted way
fn print_named_value(name: &str, value: impl std::fmt::Display) {
    println!("{:>16}: {}", name, value);
}

fn utc_label(table: &BesselianTable, t: f64) -> String {
    match tt_hours_to_utc(&table.date, t, table.delta_t) {
        Ok(utc) => utc.format("%Y-%m-%d %H:%M:%S%.1f UTC").to_string(),
        Err(_) => "-".to_string(),
    }
}

fn display_circumstances(title: &str, table: &BesselianTable, c: &EclipseCircumstances) {
    print_section_header(title);
    print_named_value("Time (TT)", format!("{} ({:.5} h)", format_hours(c.t), c.t));
    print_named_value("Time (UTC)", utc_label(table, c.t));
    print_named_value("Latitude", format!("{:.4}°", c.lat));
    print_named_value("Longitude", format!("{:.4}°", c.lon));
    print_named_value("Duration", format_duration(c.duration));
    print_named_value("Sun altitude", format!("{:.2}°", c.sun_altitude));
    print_named_value("Path width", format!("{:.1} km", c.path_width));
    print_named_value("Diameter ratio", format!("{:.4}", c.diameter_ratio));
}

fn display_limit_line(name: &str, line: &PathLimitLine) {
    let summary = match (line.points.first(), line.points.last()) {
        (Some(first), Some(last)) => format!(
            "{} points, {} unresolved, ({:.2}, {:.2}) to ({:.2}, {:.2})",
            line.len(),
            line.unresolved,
            first.lon,
            first.lat,
            last.lon,
            last.lat
        ),
        _ => format!("no points, {} unresolved", line.unresolved),
    };
    print_named_value(name, summary);
    if !line.polar_branch.is_empty() {
        print_named_value("Polar branch", format!("{} points", line.polar_branch.len()));
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let table = BesselianTable::from_file(&args.table)?;
    let config = match &args.config {
        Some(path) => SolverConfig::from_file(path)?,
        None => SolverConfig::default(),
    };

    let start_time = Instant::now();
    let global = compute_global_eclipse_features_with_config(&table, &config);
    let local = args
        .time
        .map(|t| compute_local_eclipse_features_with_config(&table, t, &config));
    log::debug!("Solved in {:.2?}", start_time.elapsed());

    if args.geojson {
        let collections = [
            Some(geojson::global_features(&global)),
            local.as_ref().map(geojson::local_features),
        ];
        let mut features = Vec::new();
        for collection in collections.iter().flatten() {
            if let Some(items) = collection["features"].as_array() {
                features.extend(items.iter().cloned());
            }
        }
        println!("{}", serde_json::to_string_pretty(&geojson::feature_collection(features))?);
        return Ok(());
    }

    println!("Eclipse of {}", if table.date.is_empty() { "-" } else { table.date.as_str() });
    println!("-------------------------------------------------------");
    print_named_value(
        "Valid range",
        format!("{:.2} h to {:.2} h TT", table.t_range[0], table.t_range[1]),
    );
    print_named_value("ΔT", format!("{:.1} s", table.delta_t));

    display_circumstances("Central eclipse begins", &table, &global.begin);
    display_circumstances("Central eclipse ends", &table, &global.end);

    print_section_header("Limits of the umbral path");
    display_limit_line("Northern limit", &global.umbra_limit_north);
    display_limit_line("Southern limit", &global.umbra_limit_south);
    match &global.bounds {
        Some(bounds) => {
            print_named_value(
                "Bounds",
                format!(
                    "[{:.2}, {:.2}] to [{:.2}, {:.2}]",
                    bounds.limits[0][0], bounds.limits[0][1], bounds.limits[1][0], bounds.limits[1][1]
                ),
            );
            print_named_value(
                "Center",
                format!("[{:.2}, {:.2}]", bounds.center[0], bounds.center[1]),
            );
        }
        None => print_named_value("Bounds", "unavailable"),
    }

    if let (Some(t), Some(local)) = (args.time, &local) {
        print_section_header(&format!("Shadow at {} TT", format_hours(t)));
        print_named_value("Time (UTC)", utc_label(&table, t));
        print_named_value(
            "Shadow axis",
            format!("x = {:.6}, y = {:.6}", local.elements.x, local.elements.y),
        );
        print_named_value("Umbra", format!("{} vertices", local.umbra_outline.len()));
        print_named_value("Penumbra", format!("{} vertices", local.penumbra_outline.len()));
    }

    Ok(())
}
