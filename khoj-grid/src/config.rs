//! Compositor configuration.
//!
//! Every field has a default, so an empty `[grid]` table (or none at all) is
//! a valid configuration:
//!
//! ```toml
//! [grid]
//! padding = 1                 # cells added around the explored area
//! default_half_extent = 2     # viewport is [-2,2]x[-2,2] when nothing is known
//! storage_roots = ["uploads"] # prefixes stripped from image paths
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_HALF_EXTENT, DEFAULT_PADDING, Rectangle};
use crate::image::{DEFAULT_STORAGE_ROOT, ImagePathNormalizer};

/// Compositor settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Cells of margin around the enclosing rectangle
    #[serde(default = "default_padding")]
    pub padding: u32,

    /// Half-extent of the viewport used when no cell is known
    #[serde(default = "default_half_extent")]
    pub default_half_extent: u32,

    /// Storage roots stripped from image paths
    #[serde(default = "default_storage_roots")]
    pub storage_roots: Vec<String>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            padding: default_padding(),
            default_half_extent: default_half_extent(),
            storage_roots: default_storage_roots(),
        }
    }
}

impl GridConfig {
    /// Viewport used when there is nothing to enclose.
    pub fn default_bounds(&self) -> Rectangle {
        Rectangle::centered(self.default_half_extent)
    }

    /// Image path normalizer for the configured roots.
    pub fn normalizer(&self) -> ImagePathNormalizer {
        ImagePathNormalizer::new(&self.storage_roots)
    }
}

fn default_padding() -> u32 {
    DEFAULT_PADDING
}

fn default_half_extent() -> u32 {
    DEFAULT_HALF_EXTENT
}

fn default_storage_roots() -> Vec<String> {
    vec![DEFAULT_STORAGE_ROOT.to_string()]
}
