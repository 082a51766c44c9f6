//! Image library configuration.

use crate::chip::DEFAULT_PADDING;
use serde::{Deserialize, Serialize};

/// Tuning knobs of [`crate::ImageLibrary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Maximum number of derived images kept in memory
    pub derived_cache_capacity: usize,
    /// Also register every derived image in the resource store
    pub publish_derived_images: bool,
    /// Scale of "small" images relative to the library scale
    pub small_scale_ratio: f32,
    /// Chip padding at scale 1
    pub chip_padding: f32,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            derived_cache_capacity: 512,
            publish_derived_images: false,
            small_scale_ratio: 2.0 / 3.0,
            chip_padding: DEFAULT_PADDING,
        }
    }
}
