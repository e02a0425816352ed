//! grainseg CLI - segment, measure and export objects in microscopy images

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use grainseg_algorithms::export::export_objects;
use grainseg_algorithms::filter::FilterOptions;
use grainseg_algorithms::pipeline::{segment, SegmentParams, Segmentation};
use grainseg_algorithms::segmentation::SeparationMode;
use grainseg_colormap::{render_overlay, OverlayParams};
use grainseg_core::io::{
    load_source, read_image, write_morphology_csv, ArtifactStore, Artifacts, ReadOptions,
    DEFAULT_MAX_PIXELS,
};
use grainseg_core::{ImageBuffer, ImageRequest};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "grainseg")]
#[command(author, version, about = "Segment and measure grains in microscopy images", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show dimensions and channels of an image file
    Info {
        /// Input image file
        input: PathBuf,
    },
    /// Segment an image region and store the results under an identifier
    Segment(SegmentArgs),
    /// Print the stored morphology table as CSV
    Table {
        /// Result identifier
        id: String,
        /// Artifact store directory
        #[arg(long, default_value = "cache")]
        store: PathBuf,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write one white-background crop per stored object
    Export {
        /// Result identifier
        id: String,
        /// Artifact store directory
        #[arg(long, default_value = "cache")]
        store: PathBuf,
        /// Destination directory
        #[arg(long)]
        out: PathBuf,
        /// File name prefix, files are named <prefix>_<label>.png
        #[arg(long, default_value = "object")]
        prefix: String,
    },
}

#[derive(Args)]
struct SegmentArgs {
    /// Input image file (PNG, TIFF, JPEG)
    input: Option<PathBuf>,
    /// Raw row-major RGBA bytes instead of an image file
    #[arg(long)]
    raw: Option<PathBuf>,
    /// Width of the raw buffer
    #[arg(long)]
    width: Option<usize>,
    /// Height of the raw buffer
    #[arg(long)]
    height: Option<usize>,

    /// Result identifier
    #[arg(long)]
    id: String,
    /// Artifact store directory
    #[arg(long, default_value = "cache")]
    store: PathBuf,
    /// JSON file with segmentation parameters; flags override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Refuse images with more pixels than this
    #[arg(long, default_value_t = DEFAULT_MAX_PIXELS)]
    max_pixels: u64,

    // HSV window
    #[arg(long)]
    h_min: Option<f64>,
    #[arg(long)]
    h_max: Option<f64>,
    #[arg(long)]
    s_min: Option<f64>,
    #[arg(long)]
    s_max: Option<f64>,
    #[arg(long)]
    v_min: Option<f64>,
    #[arg(long)]
    v_max: Option<f64>,

    // Refinement
    /// Gaussian sigma applied before re-binarizing (0 disables)
    #[arg(long)]
    sigma: Option<f64>,
    /// Number of radius-3 disk dilations
    #[arg(long)]
    dilate: Option<i32>,
    /// Smallest object kept, in pixels
    #[arg(long)]
    min_size: Option<usize>,
    /// Disk radius for opening then closing (0 disables)
    #[arg(long)]
    smooth_radius: Option<i32>,

    // Separation
    /// Minimum spacing between watershed markers
    #[arg(long)]
    min_distance: Option<usize>,
    /// Plain connected-component labeling instead of watershed
    #[arg(long)]
    no_watershed: bool,

    // Filtering
    #[arg(long)]
    min_area: Option<f64>,
    #[arg(long)]
    max_area: Option<f64>,
    #[arg(long)]
    min_circularity: Option<f64>,
    #[arg(long)]
    max_circularity: Option<f64>,
    #[arg(long)]
    min_eq_diameter: Option<f64>,
    #[arg(long)]
    max_eq_diameter: Option<f64>,
    /// Keep every object, ignoring filter flags and config
    #[arg(long)]
    no_filter: bool,

    // Overlay
    /// Alpha of colored objects in the overlay
    #[arg(long, default_value = "200")]
    alpha: u8,
    /// Do not draw label numbers on the overlay
    #[arg(long)]
    no_numbers: bool,
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

fn read_input(args: &SegmentArgs) -> Result<ImageBuffer> {
    let pb = spinner("Reading image...");
    let data = match &args.raw {
        Some(path) => Some(
            fs::read(path).with_context(|| format!("Failed to read raw buffer {}", path.display()))?,
        ),
        None => None,
    };
    let request = ImageRequest {
        data,
        width: args.width,
        height: args.height,
        image_path: args.input.clone(),
    };
    let source = request.into_source().context("Invalid image input")?;
    let options = ReadOptions {
        max_pixels: Some(args.max_pixels),
    };
    let image = load_source(source, &options).context("Failed to load image")?;
    pb.finish_and_clear();
    info!("Input: {} x {} ({} channels)", image.cols(), image.rows(), image.channels());
    Ok(image)
}

/// Config file (or defaults) with every given flag applied on top
fn build_params(args: &SegmentArgs) -> Result<SegmentParams> {
    let mut params = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&text).context("Invalid segmentation config")?
        }
        None => SegmentParams::default(),
    };

    let t = &mut params.threshold;
    for (slot, flag) in [
        (&mut t.hue.min, args.h_min),
        (&mut t.hue.max, args.h_max),
        (&mut t.saturation.min, args.s_min),
        (&mut t.saturation.max, args.s_max),
        (&mut t.value.min, args.v_min),
        (&mut t.value.max, args.v_max),
    ] {
        if let Some(v) = flag {
            *slot = v;
        }
    }

    let r = &mut params.refine;
    if let Some(v) = args.sigma {
        r.gaussian_sigma = v;
    }
    if let Some(v) = args.dilate {
        r.dilate_iters = v;
    }
    if let Some(v) = args.min_size {
        r.min_size = v;
    }
    if let Some(v) = args.smooth_radius {
        r.smooth_radius = v;
    }

    if args.no_watershed {
        params.separation = SeparationMode::Label;
    } else if let Some(min_distance) = args.min_distance {
        params.separation = SeparationMode::Watershed { min_distance };
    }

    let options = FilterOptions {
        min_area: args.min_area,
        max_area: args.max_area,
        min_circularity: args.min_circularity,
        max_circularity: args.max_circularity,
        min_eq_diameter: args.min_eq_diameter,
        max_eq_diameter: args.max_eq_diameter,
    };
    if args.no_filter {
        params.filter = None;
    } else if options != FilterOptions::default() {
        params.filter = Some(options.criteria());
    }

    Ok(params)
}

fn report(seg: &Segmentation) {
    for verdict in &seg.verdicts {
        if !verdict.passed {
            info!("label {}: {}", verdict.label, verdict.status);
        }
    }
    println!(
        "Objects: {} found, {} kept",
        seg.labels.labels().len(),
        seg.object_count()
    );
}

fn done(name: &str, path: &std::path::Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let image = read_image(&input, &ReadOptions { max_pixels: None })
                .context("Failed to read image")?;
            let (rows, cols) = image.shape();
            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} pixels)", cols, rows, rows * cols);
            println!("Channels: {}", image.channels());
        }

        // ── Segment ──────────────────────────────────────────────────
        Commands::Segment(args) => {
            let params = build_params(&args)?;
            let image = read_input(&args)?;

            let start = Instant::now();
            let pb = spinner("Segmenting...");
            let seg = segment(&image, &params).context("Segmentation failed")?;
            pb.finish_and_clear();
            report(&seg);

            let overlay_params = OverlayParams {
                alpha: args.alpha,
                draw_numbers: !args.no_numbers,
                ..Default::default()
            };
            let overlay = render_overlay(&seg.filtered_labels, &seg.morphology, &overlay_params, None)
                .context("Failed to render overlay")?;

            let pb = spinner("Saving results...");
            let store = ArtifactStore::new(&args.store);
            let dir = store
                .save(
                    &args.id,
                    &Artifacts {
                        labels: &seg.filtered_labels,
                        morphology: &seg.morphology,
                        overlay_rgba: Some(&overlay.rgba),
                        image: Some(&image),
                    },
                )
                .context("Failed to save results")?;
            pb.finish_and_clear();
            done("Results", &dir, start.elapsed());
        }

        // ── Table ────────────────────────────────────────────────────
        Commands::Table { id, store, output } => {
            let records = ArtifactStore::new(store)
                .load_table(&id)
                .context("Failed to load morphology table")?;
            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    write_morphology_csv(&records, BufWriter::new(file))
                        .context("Failed to write CSV")?;
                    println!("{} rows saved to: {}", records.len(), path.display());
                }
                None => {
                    write_morphology_csv(&records, std::io::stdout().lock())
                        .context("Failed to write CSV")?;
                }
            }
        }

        // ── Export ───────────────────────────────────────────────────
        Commands::Export {
            id,
            store,
            out,
            prefix,
        } => {
            let start = Instant::now();
            let store = ArtifactStore::new(store);
            let labels = store.load_labels(&id).context("Failed to load label map")?;
            let records = store.load_table(&id).context("Failed to load morphology table")?;
            let image = store
                .load_image(&id, &ReadOptions { max_pixels: None })
                .context("Failed to load source image")?;

            let pb = spinner("Exporting objects...");
            let count = export_objects(&image, &labels, &records, &out, &prefix)
                .context("Failed to export objects")?;
            pb.finish_and_clear();
            println!("{} objects exported", count);
            done("Objects", &out, start.elapsed());
        }
    }

    Ok(())
}
