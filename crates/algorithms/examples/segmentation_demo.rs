//! Segmentation demo: synthetic microscopy field
//!
//! Generates a 240x320 RGB "slide" with:
//! - Pale background (value 235)
//! - Seven stained grains (saturated red disks), two pairs of them touching
//! - One small stained speck that refinement should drop
//! - Grey dust pixels that the HSV window ignores
//!
//! Then runs the full pipeline twice (plain labeling and watershed), prints
//! the morphology table and writes everything to `output/segmentation_demo`:
//!   demo/labels.tif, demo/morphology.csv, demo/overlay.png, demo/image.png
//!   objects/grain_<label>.png
//!
//! Run:
//!   cargo run -p grainseg-algorithms --example segmentation_demo

use std::path::Path;

use grainseg_algorithms::export::export_objects;
use grainseg_algorithms::filter::FilterOptions;
use grainseg_algorithms::pipeline::{segment, SegmentParams};
use grainseg_algorithms::refine::RefineParams;
use grainseg_algorithms::segmentation::SeparationMode;
use grainseg_algorithms::threshold::{HsvRange, HsvThresholdParams};
use grainseg_colormap::{render_overlay, OverlayParams};
use grainseg_core::io::{morphology_csv_string, ArtifactStore, Artifacts};
use grainseg_core::ImageBuffer;

const ROWS: usize = 240;
const COLS: usize = 320;

const GRAINS: [(f64, f64, f64); 7] = [
    (60.0, 60.0, 22.0),
    (60.0, 98.0, 22.0),
    (170.0, 70.0, 28.0),
    (70.0, 220.0, 18.0),
    (160.0, 200.0, 20.0),
    (160.0, 234.0, 20.0),
    (200.0, 290.0, 12.0),
];

fn main() {
    let out_dir = Path::new("output/segmentation_demo");

    let image = build_synthetic_slide();
    println!("Synthetic slide: {}x{}, {} grains drawn", COLS, ROWS, GRAINS.len());

    let mut params = SegmentParams {
        threshold: HsvThresholdParams {
            hue: HsvRange::new(0.0, 0.08),
            saturation: HsvRange::new(0.4, 1.0),
            value: HsvRange::new(0.3, 1.0),
        },
        refine: RefineParams {
            min_size: 60,
            ..Default::default()
        },
        separation: SeparationMode::Label,
        filter: None,
    };

    let plain = segment(&image, &params).expect("segment (label) failed");
    println!("\nPlain labeling:  {} objects", plain.object_count());

    params.separation = SeparationMode::Watershed { min_distance: 20 };
    params.filter = Some(
        FilterOptions {
            min_area: Some(200.0),
            min_circularity: Some(0.6),
            ..Default::default()
        }
        .criteria(),
    );
    let split = segment(&image, &params).expect("segment (watershed) failed");
    println!("Watershed:       {} objects kept", split.object_count());
    for verdict in &split.verdicts {
        println!("  label {:>3}: {}", verdict.label, verdict.status);
    }

    println!("\n{}", morphology_csv_string(&split.morphology).expect("csv failed"));

    let overlay = render_overlay(&split.filtered_labels, &split.morphology, &OverlayParams::default(), None)
        .expect("overlay failed");

    let store = ArtifactStore::new(out_dir);
    let dir = store
        .save(
            "demo",
            &Artifacts {
                labels: &split.filtered_labels,
                morphology: &split.morphology,
                overlay_rgba: Some(&overlay.rgba),
                image: Some(&image),
            },
        )
        .expect("cannot save artifacts");
    println!("Artifacts written to {}/", dir.display());

    let n = export_objects(
        &image,
        &split.filtered_labels,
        &split.morphology,
        out_dir.join("objects"),
        "grain",
    )
    .expect("export failed");
    println!("{} object crops written to {}/objects/", n, out_dir.display());
}

/// Pale slide with red grains, one speck and grey dust
fn build_synthetic_slide() -> ImageBuffer {
    let mut img = ImageBuffer::filled(ROWS, COLS, 3, 235);

    for r in 0..ROWS {
        for c in 0..COLS {
            let stained = GRAINS.iter().any(|&(cr, cc, rad)| {
                (r as f64 - cr).powi(2) + (c as f64 - cc).powi(2) <= rad * rad
            });
            if stained {
                img.data_mut()[[r, c, 0]] = 190;
                img.data_mut()[[r, c, 1]] = 50;
                img.data_mut()[[r, c, 2]] = 40;
            }
        }
    }

    // Speck: 3x3 stained block
    for r in 20..23 {
        for c in 290..293 {
            img.data_mut()[[r, c, 0]] = 190;
            img.data_mut()[[r, c, 1]] = 50;
            img.data_mut()[[r, c, 2]] = 40;
        }
    }

    // Dust: deterministic grey pixels via a simple LCG
    let mut seed: u64 = 42;
    for _ in 0..400 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        let r = ((seed >> 33) as usize) % ROWS;
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        let c = ((seed >> 33) as usize) % COLS;
        for ch in 0..3 {
            img.data_mut()[[r, c, ch]] = 90;
        }
    }

    img
}
