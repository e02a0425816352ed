//! I/O for images, label maps and morphology tables

mod labels;
mod native;
mod store;
mod table;

pub use labels::{
    read_label_map, read_label_map_from_buffer, write_label_map, write_label_map_to_buffer,
};
pub use native::{
    load_source, read_image, read_image_from_buffer, write_image, write_object_images, write_rgba,
    ReadOptions, DEFAULT_MAX_PIXELS,
};
pub use store::{ArtifactStore, Artifacts, IMAGE_FILE, LABELS_FILE, OVERLAY_FILE, TABLE_FILE};
pub use table::{morphology_csv_string, read_morphology_csv, write_morphology_csv};
