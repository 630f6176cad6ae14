//! Verdant CLI - NDVI analysis from satellite band rasters

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use verdant_core::io::{read_geotiff, write_geotiff};
use verdant_core::Raster;
use verdant_engine::{
    class_histogram, classify, ndvi, sample_valid, to_csv, value_histogram, ClassScheme,
    HistogramParams, NdviParams, SampleParams, Sensor, MAX_SAMPLE_ROWS,
};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "verdant")]
#[command(author, version, about = "NDVI computation and classification", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
    /// Compute NDVI from red and NIR bands
    Compute {
        /// Red band file (Landsat band 4 / Sentinel-2 band 4)
        #[arg(long)]
        red: PathBuf,
        /// NIR band file (Landsat band 5 / Sentinel-2 band 8)
        #[arg(long)]
        nir: PathBuf,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
        /// Satellite platform: landsat, sentinel2
        #[arg(short, long)]
        sensor: Sensor,
        /// Skip DN-to-reflectance calibration (bands already calibrated)
        #[arg(long)]
        raw: bool,
    },
    /// Classify an NDVI raster into vegetation buckets
    Classify {
        /// Input NDVI raster
        input: PathBuf,
        /// Output file (class indices)
        #[arg(short, long)]
        output: PathBuf,
        /// Built-in scheme: five, four
        #[arg(long, default_value = "five", conflicts_with = "rules")]
        scheme: String,
        /// JSON file with a custom ordered rule list
        #[arg(long)]
        rules: Option<PathBuf>,
    },
    /// Print the NDVI value distribution
    Histogram {
        /// Input NDVI raster
        input: PathBuf,
        /// Number of bins over [-1, 1]
        #[arg(short, long, default_value = "50")]
        bins: usize,
        /// Subsample every k-th row/column
        #[arg(long, default_value = "1")]
        stride: usize,
        /// Count classification buckets instead of value bins: five, four
        #[arg(long)]
        classes: Option<String>,
    },
    /// Export a random sample of valid NDVI values as CSV
    Sample {
        /// Input NDVI raster
        input: PathBuf,
        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,
        /// Maximum rows (hard cap 100000)
        #[arg(long, default_value = "100000")]
        max: usize,
        /// RNG seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_band(path: &PathBuf, what: &str) -> Result<Raster<f64>> {
    let pb = spinner(&format!("Reading {}...", what));
    let raster: Raster<f64> =
        read_geotiff(path, None).with_context(|| format!("Failed to read {} band", what))?;
    pb.finish_and_clear();
    info!("{}: {} x {}", what, raster.cols(), raster.rows());
    Ok(raster)
}

fn write_result(raster: &Raster<f64>, path: &PathBuf) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geotiff(raster, path, None).context("Failed to write output")?;
    pb.finish_and_clear();
    Ok(())
}

fn write_result_u8(raster: &Raster<u8>, path: &PathBuf) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geotiff(raster, path, None).context("Failed to write output")?;
    pb.finish_and_clear();
    Ok(())
}

fn done(name: &str, path: &PathBuf, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn parse_scheme(name: &str) -> Result<ClassScheme> {
    match name.to_lowercase().as_str() {
        "five" | "5" => Ok(ClassScheme::five_class()),
        "four" | "4" => Ok(ClassScheme::four_class()),
        _ => anyhow::bail!("Unknown scheme: {}. Use five or four.", name),
    }
}

fn load_scheme(scheme: &str, rules: Option<&PathBuf>) -> Result<ClassScheme> {
    match rules {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read rules file {}", path.display()))?;
            serde_json::from_str(&text).context("Invalid classification rules")
        }
        None => parse_scheme(scheme),
    }
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Info { input } => {
            let raster = read_band(&input, "raster")?;
            let (rows, cols) = raster.shape();
            let bounds = raster.bounds();
            let stats = raster.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
            println!("Cell size: {}", raster.transform().cell_size());
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                bounds.0, bounds.1, bounds.2, bounds.3
            );
            if let Some(nodata) = raster.nodata() {
                println!("NoData: {}", nodata);
            }
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            println!(
                "  Valid cells: {} ({:.1}%)",
                stats.valid_count,
                100.0 * stats.valid_count as f64 / raster.len() as f64
            );
        }

        Commands::Compute {
            red,
            nir,
            output,
            sensor,
            raw,
        } => {
            let red_band = read_band(&red, "red")?;
            let nir_band = read_band(&nir, "NIR")?;

            let params = if raw {
                NdviParams::default()
            } else {
                NdviParams::for_sensor(sensor)
            };
            info!("Sensor: {}, calibration: {:?}", sensor, params.calibration);

            let start = Instant::now();
            let pb = spinner("Computing NDVI...");
            let result = ndvi(&red_band, &nir_band, &params)?;
            pb.finish_and_clear();

            let stats = result.statistics();
            if stats.valid_count == 0 {
                tracing::warn!("No valid data: every pixel is masked");
            }

            write_result(&result, &output)?;
            done("NDVI", &output, start.elapsed());
        }

        Commands::Classify {
            input,
            output,
            scheme,
            rules,
        } => {
            let ndvi_raster = read_band(&input, "NDVI")?;
            let scheme = load_scheme(&scheme, rules.as_ref())?;

            let start = Instant::now();
            let classes = classify(&ndvi_raster, &scheme)?;

            write_result_u8(&classes, &output)?;
            done("Classification", &output, start.elapsed());

            for count in class_histogram(&classes, &scheme)? {
                println!("  {:>10}  {}", count.count, count.label);
            }
        }

        Commands::Histogram {
            input,
            bins,
            stride,
            classes,
        } => {
            let ndvi_raster = read_band(&input, "NDVI")?;

            match classes {
                Some(name) => {
                    let scheme = parse_scheme(&name)?;
                    let grid = classify(&ndvi_raster, &scheme)?;
                    let buckets = class_histogram(&grid, &scheme)?;
                    let total: u64 = buckets.iter().map(|c| c.count).sum();
                    if total == 0 {
                        println!("No valid data.");
                        return Ok(());
                    }
                    println!("{:>12}  {:>6}  Class", "Count", "%");
                    for count in buckets {
                        println!(
                            "{:>12}  {:>5.1}%  {}",
                            count.count,
                            100.0 * count.count as f64 / total as f64,
                            count.label
                        );
                    }
                }
                None => {
                    let hist = value_histogram(&ndvi_raster, &HistogramParams { bins, stride })?;
                    if hist.is_empty() {
                        println!("No valid data.");
                        return Ok(());
                    }
                    println!("{:>8} .. {:>8}  Count", "From", "To");
                    for (i, &count) in hist.counts().iter().enumerate() {
                        let (lo, hi) = hist.bin_edges(i);
                        println!("{:>8.3} .. {:>8.3}  {}", lo, hi, count);
                    }
                    println!("Valid pixels: {}", hist.valid_count());
                }
            }
        }

        Commands::Sample {
            input,
            output,
            max,
            seed,
        } => {
            let ndvi_raster = read_band(&input, "NDVI")?;
            let params = SampleParams {
                max_rows: max.min(MAX_SAMPLE_ROWS),
                seed,
            };

            let start = Instant::now();
            let values = sample_valid(&ndvi_raster, &params)?;
            std::fs::write(&output, to_csv(&values))
                .context("Failed to write CSV")?;

            println!("{} rows sampled", values.len());
            done("Sample", &output, start.elapsed());
        }
    }

    Ok(())
}
