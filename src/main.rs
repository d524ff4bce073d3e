//! K-means geo point clustering tool
//!
//! Reads geographic points from CSV files, groups them into k clusters and
//! writes every row back with the id of the cluster it landed in.

use clap::Parser;
use csv::{ReaderBuilder, WriterBuilder};
use geo_kmeans::{Cluster, KMeans, KMeansConfig, Point, PointList};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[cfg(test)]
mod main_test;

const CLUSTER_COLUMN: &str = "cluster";

#[derive(Parser)]
#[command(name = "geo_kmeans")]
#[command(about = "K-means geo point clustering tool", long_about = None)]
struct Args {
    /// Input CSV file with latitude,longitude columns
    #[arg(short, long, default_value = "points.csv")]
    input: PathBuf,

    /// Output CSV file with labelled points (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of clusters
    #[arg(short = 'k', long, default_value_t = 8)]
    clusters: usize,

    /// Seed for picking initial centers (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Give up after this many iterations (unbounded if omitted)
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn config(&self) -> KMeansConfig {
        let mut config = KMeansConfig::new(self.clusters);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(max) = self.max_iterations {
            config = config.with_max_iterations(max);
        }
        config
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    // Read points and CSV records from file (read once, reuse for output)
    let (points, csv_records) = match read_points_and_csv(&args.input) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error reading CSV: {}", e);
            std::process::exit(1);
        }
    };

    if points.is_empty() {
        eprintln!("No points found in CSV file");
        std::process::exit(1);
    }

    log::debug!("read {} points from {:?}", points.len(), args.input);

    let coords: PointList = points.iter().map(|(_, p)| *p).collect();
    let result = match KMeans::new(args.config()).run(&coords) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error clustering points: {}", e);
            std::process::exit(1);
        }
    };

    log::info!(
        "found {} clusters in {} iterations (converged: {})",
        result.clusters.len(),
        result.iterations,
        result.converged
    );
    for line in summarize(&result.clusters, &coords) {
        log::debug!("{}", line);
    }

    let labels = build_labels(&result.clusters, &points, csv_records.len());

    if let Err(e) = write_output(args.output.as_ref(), &csv_records, &labels) {
        eprintln!("Error writing CSV: {}", e);
        std::process::exit(1);
    }
    if let Some(output_file) = &args.output {
        log::debug!("labelled points written to {:?}", output_file);
    }
}

/// CSV records type alias for readability
type CsvRecords = Vec<Vec<String>>;

/// Parsed point together with the index of the CSV record it came from
type RowPoint = (usize, Point);

/// Reads points and CSV records from a file in a single pass
///
/// Expected format: `latitude,longitude` (header row is optional, extra columns are kept)
///
/// # Returns
///
/// A tuple `(points, records)` where:
/// - `points` are parsed points for clustering, tagged with their record index
/// - `records` are raw CSV records for output preservation
fn read_points_and_csv(
    filename: &PathBuf,
) -> Result<(Vec<RowPoint>, CsvRecords), Box<dyn std::error::Error>> {
    let file = File::open(filename)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        records.push(record.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    }

    Ok((parse_points(&records), records))
}

/// Determines if the first row is a header
fn has_header(records: &[Vec<String>]) -> bool {
    records
        .first()
        .and_then(|r| r.first())
        .is_some_and(|cell| cell.trim().parse::<f64>().is_err())
}

/// Parses `latitude,longitude` from each data row, skipping rows that do not parse
/// or fall outside the valid coordinate range
fn parse_points(records: &[Vec<String>]) -> Vec<RowPoint> {
    let start_idx = if has_header(records) { 1 } else { 0 };

    records
        .iter()
        .enumerate()
        .skip(start_idx)
        .filter(|(_, record)| record.len() >= 2)
        .filter_map(|(i, record)| {
            let lat = record[0].trim().parse::<f64>().ok()?;
            let lon = record[1].trim().parse::<f64>().ok()?;
            if !valid_coordinates(lat, lon) {
                log::warn!("skipping row {}: coordinates ({}, {}) out of range", i, lat, lon);
                return None;
            }
            Some((i, Point::new(lat, lon)))
        })
        .collect()
}

/// Checks that latitude is within [-90, 90] and longitude within [-180, 180]
///
/// NaN and infinities fail both range checks.
fn valid_coordinates(lat: f64, lon: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

/// Creates a labels array indexed by CSV record
///
/// `labels[i]` = cluster ID for record i, or `None` for the header and unparsed rows
fn build_labels(clusters: &[Cluster], points: &[RowPoint], num_records: usize) -> Vec<Option<usize>> {
    let mut labels = vec![None; num_records];

    for cluster in clusters {
        for &idx in &cluster.points {
            let (record, _) = points[idx];
            labels[record] = Some(cluster.c);
        }
    }

    labels
}

/// One human readable line per cluster: id, size, center and bounds
fn summarize(clusters: &[Cluster], points: &[Point]) -> Vec<String> {
    clusters
        .iter()
        .map(|cluster| match cluster.bounds(points) {
            Some((min, max)) => format!(
                "cluster {}: {} points, center ({:.6}, {:.6}), bounds ({:.6}, {:.6})-({:.6}, {:.6})",
                cluster.c,
                cluster.len(),
                cluster.center.lat,
                cluster.center.lon,
                min.lat,
                min.lon,
                max.lat,
                max.lon
            ),
            None => format!(
                "cluster {}: empty, center ({:.6}, {:.6})",
                cluster.c, cluster.center.lat, cluster.center.lon
            ),
        })
        .collect()
}

/// Writes every CSV record with its cluster label appended
///
/// The header (if any) gets a `cluster` column; rows that were not clustered get an empty label.
fn write_labelled_csv<W: Write>(
    out: W,
    csv_records: &[Vec<String>],
    labels: &[Option<usize>],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(out);
    let header = has_header(csv_records);

    for (i, record) in csv_records.iter().enumerate() {
        let label = if header && i == 0 {
            CLUSTER_COLUMN.to_string()
        } else {
            labels[i].map(|c| c.to_string()).unwrap_or_default()
        };
        let mut row = record.clone();
        row.push(label);
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes labelled records to the output file, or to stdout when none is given
fn write_output(
    output: Option<&PathBuf>,
    csv_records: &[Vec<String>],
    labels: &[Option<usize>],
) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        None => write_labelled_csv(std::io::stdout().lock(), csv_records, labels),
        Some(path) => write_labelled_csv(File::create(path)?, csv_records, labels),
    }
}
