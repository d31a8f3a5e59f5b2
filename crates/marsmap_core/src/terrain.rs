//! Terrain types and per-tile corner assignments
//!
//! Corner ordering follows Tiled's legacy terrain attribute: top-left,
//! top-right, bottom-left, bottom-right.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a terrain type within its owning tileset
pub type TerrainId = usize;

/// A named terrain category (e.g., "Wall")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainType {
    pub name: String,
    /// Representative tile for this terrain (shown in editor UI)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_tile: Option<u32>,
}

impl TerrainType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon_tile: None,
        }
    }

    pub fn with_icon_tile(mut self, tile: u32) -> Self {
        self.icon_tile = Some(tile);
        self
    }
}

/// One of the four logical corners of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Position of this corner in a [`TerrainCorners`] tuple
    pub fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomLeft => 2,
            Corner::BottomRight => 3,
        }
    }}

/// Terrain membership of a tile's four corners
///
/// `None` at a position means the corner carries no terrain. A `None` corner
/// only ever matches another `None` corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TerrainCorners(pub [Option<TerrainId>; 4]);

impl TerrainCorners {
    pub const EMPTY: Self = TerrainCorners([None; 4]);

    pub const fn new(
        top_left: Option<TerrainId>,
        top_right: Option<TerrainId>,
        bottom_left: Option<TerrainId>,
        bottom_right: Option<TerrainId>,
    ) -> Self {
        TerrainCorners([top_left, top_right, bottom_left, bottom_right])
    }

    /// All four corners set to one terrain
    pub const fn filled(terrain: TerrainId) -> Self {
        TerrainCorners([Some(terrain); 4])
    }

    pub fn get(&self, corner: Corner) -> Option<TerrainId> {
        self.0[corner.index()]
    }

    pub fn set(&mut self, corner: Corner, terrain: Option<TerrainId>) {
        self.0[corner.index()] = terrain;
    }

    /// Check if any corner carries a terrain
    pub fn has_any_terrain(&self) -> bool {
        self.0.iter().any(Option::is_some)
    }

    /// Check if any corner carries this terrain
    pub fn contains(&self, terrain: TerrainId) -> bool {
        self.0.contains(&Some(terrain))
    }

    /// Terrains referenced by this tuple, in corner order, duplicates included
    pub fn terrains(&self) -> impl Iterator<Item = TerrainId> + '_ {
        self.0.iter().flatten().copied()
    }

    /// Number of corners that differ from `other`
    pub fn mismatches(&self, other: &TerrainCorners) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .filter(|(a, b)| a != b)
            .count()
    }
}

impl fmt::Display for TerrainCorners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, corner) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match corner {
                Some(t) => write!(f, "{t}")?,
                None => write!(f, "none")?,
            }
        }
        write!(f, ")")
    }
}
