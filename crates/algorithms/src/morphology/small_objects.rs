//! Removal of small connected components

use grainseg_core::{Connectivity, Mask};
use tracing::debug;

use crate::segmentation::{component_sizes, label_components};

/// Clear every component with fewer than `min_size` pixels.
///
/// A `min_size` of 0 behaves like 1 and leaves the mask unchanged.
pub fn remove_small_objects(mask: &Mask, min_size: usize, connectivity: Connectivity) -> Mask {
    let min_size = min_size.max(1);
    let (labels, count) = label_components(mask, connectivity);
    let sizes = component_sizes(&labels, count);

    let removed = sizes.iter().skip(1).filter(|&&s| s < min_size).count();
    debug!("removing {} of {} components below {} pixels", removed, count, min_size);

    labels.map(|&l| l > 0 && sizes[l as usize] >= min_size)
}
