//! Image atlas metadata
//!
//! Preserved for the renderer; nothing in tile resolution reads it.

use serde::{Deserialize, Serialize};

/// The source image backing a tileset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasImage {
    /// Path to the image file (relative to the descriptor)
    pub source: String,
    /// Image width in pixels
    #[serde(default)]
    pub width: u32,
    /// Image height in pixels
    #[serde(default)]
    pub height: u32,
}

impl AtlasImage {
    pub fn new(source: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            source: source.into(),
            width,
            height,
        }
    }
}

/// Pixel rectangle of a single tile inside the atlas image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Atlas layout: tile size, column count, margin and spacing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<AtlasImage>,
    pub tile_width: u32,
    pub tile_height: u32,
    pub columns: u32,
    /// Declared tile count, if the descriptor carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_count: Option<u32>,
    /// Pixels between the image border and the first tile
    #[serde(default)]
    pub margin: u32,
    /// Pixels between adjacent tiles
    #[serde(default)]
    pub spacing: u32,
}

impl AtlasInfo {
    pub fn new(tile_width: u32, tile_height: u32, columns: u32) -> Self {
        Self {
            image: None,
            tile_width,
            tile_height,
            columns,
            tile_count: None,
            margin: 0,
            spacing: 0,
        }
    }

    pub fn with_image(mut self, image: AtlasImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_margin_and_spacing(mut self, margin: u32, spacing: u32) -> Self {
        self.margin = margin;
        self.spacing = spacing;
        self
    }

    pub fn with_tile_count(mut self, tile_count: u32) -> Self {
        self.tile_count = Some(tile_count);
        self
    }

    /// Number of tile rows, derived from the declared tile count
    pub fn rows(&self) -> Option<u32> {
        let count = self.tile_count?;
        if self.columns == 0 {
            return None;
        }
        Some(count.div_ceil(self.columns))
    }

    /// Convert a tile id to its (row, column) in the atlas
    pub fn grid_position(&self, tile_id: u32) -> Option<(u32, u32)> {
        if self.columns == 0 {
            return None;
        }
        Some((tile_id / self.columns, tile_id % self.columns))
    }

    /// Pixel rectangle of a tile id, accounting for margin and spacing
    pub fn pixel_rect(&self, tile_id: u32) -> Option<AtlasRect> {
        let (row, col) = self.grid_position(tile_id)?;
        let offset = |index: u32, size: u32| {
            size.checked_add(self.spacing)?
                .checked_mul(index)?
                .checked_add(self.margin)
        };
        Some(AtlasRect {
            x: offset(col, self.tile_width)?,
            y: offset(row, self.tile_height)?,
            width: self.tile_width,
            height: self.tile_height,
        })
    }
}

impl Default for AtlasInfo {
    fn default() -> Self {
        Self::new(32, 32, 1)
    }
}
