//! On-disk artifact store keyed by an output identifier
//!
//! Each identifier owns one directory under the store root:
//!
//! ```text
//! <root>/<id>/labels.tif       filtered label map (i32 TIFF)
//! <root>/<id>/morphology.csv   morphology table
//! <root>/<id>/overlay.png      colorized overlay (optional)
//! <root>/<id>/image.png        source region (optional, needed for export)
//! ```
//!
//! Concurrent writers using the same identifier race on these files; the
//! store does no locking.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::labels::{read_label_map, write_label_map};
use super::native::{read_image, write_image, write_rgba, ReadOptions};
use super::table::{read_morphology_csv, write_morphology_csv};
use crate::error::{Error, Result};
use crate::image::ImageBuffer;
use crate::morphology::MorphologyRecord;
use crate::raster::LabelMap;

pub const LABELS_FILE: &str = "labels.tif";
pub const TABLE_FILE: &str = "morphology.csv";
pub const OVERLAY_FILE: &str = "overlay.png";
pub const IMAGE_FILE: &str = "image.png";

/// Everything one `segment` run hands to persistence
#[derive(Debug, Clone, Copy)]
pub struct Artifacts<'a> {
    pub labels: &'a LabelMap,
    pub morphology: &'a [MorphologyRecord],
    /// Row-major RGBA bytes with the extent of `labels`
    pub overlay_rgba: Option<&'a [u8]>,
    pub image: Option<&'a ImageBuffer>,
}

/// Directory-backed store of segmentation results
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir(&self, id: &str) -> Result<PathBuf> {
        let valid = !id.is_empty()
            && id != "."
            && id != ".."
            && !id.contains(['/', '\\'])
            && !id.contains('\0');
        if !valid {
            return Err(Error::InvalidParameter {
                name: "id",
                value: id.to_string(),
                reason: "identifier must be a single path component".to_string(),
            });
        }
        Ok(self.root.join(id))
    }

    fn existing(&self, id: &str, file: &str) -> Result<PathBuf> {
        let path = self.dir(id)?.join(file);
        if path.is_file() {
            Ok(path)
        } else {
            Err(Error::MissingArtifact(id.to_string()))
        }
    }

    /// Persist one result, replacing any previous result under `id`
    pub fn save(&self, id: &str, artifacts: &Artifacts<'_>) -> Result<PathBuf> {
        let dir = self.dir(id)?;
        fs::create_dir_all(&dir)?;

        write_label_map(artifacts.labels, dir.join(LABELS_FILE))?;
        let table = BufWriter::new(File::create(dir.join(TABLE_FILE))?);
        write_morphology_csv(artifacts.morphology, table)?;

        match artifacts.overlay_rgba {
            Some(rgba) => {
                let (rows, cols) = artifacts.labels.shape();
                write_rgba(rgba, rows, cols, dir.join(OVERLAY_FILE))?;
            }
            None => remove_stale(&dir.join(OVERLAY_FILE))?,
        }
        match artifacts.image {
            Some(image) => write_image(image, dir.join(IMAGE_FILE))?,
            None => remove_stale(&dir.join(IMAGE_FILE))?,
        }

        debug!("saved artifacts for '{}' in {}", id, dir.display());
        Ok(dir)
    }

    /// Whether a complete result (labels and table) exists for `id`
    pub fn has(&self, id: &str) -> bool {
        self.existing(id, LABELS_FILE).is_ok() && self.existing(id, TABLE_FILE).is_ok()
    }

    pub fn load_labels(&self, id: &str) -> Result<LabelMap> {
        read_label_map(self.existing(id, LABELS_FILE)?)
    }

    pub fn load_table(&self, id: &str) -> Result<Vec<MorphologyRecord>> {
        let file = File::open(self.existing(id, TABLE_FILE)?)?;
        read_morphology_csv(BufReader::new(file))
    }

    pub fn load_image(&self, id: &str, options: &ReadOptions) -> Result<ImageBuffer> {
        read_image(self.existing(id, IMAGE_FILE)?, options)
    }

    /// Path of the stored overlay, if one was saved
    pub fn overlay_path(&self, id: &str) -> Result<PathBuf> {
        self.existing(id, OVERLAY_FILE)
    }
}

/// Delete an optional artifact left by an earlier run
fn remove_stale(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("removed stale {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
