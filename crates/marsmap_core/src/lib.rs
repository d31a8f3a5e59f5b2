//! Core data structures for marsmap
//!
//! This crate provides the tile metadata consumed by map generation and physics:
//! - `Tileset` - Immutable table of tile definitions plus atlas metadata
//! - `TileDefinition` - Collision class, terrain corners and spawn weight of one tile
//! - `TerrainType` / `TerrainCorners` - Terrain categories used for autotiling
//! - `CollisionClassifier` - Tile id to collision class lookup
//! - Loaders for Tiled TSX and JSON tileset descriptors

mod atlas;
mod collision;
mod format;
mod loader;
mod terrain;
mod tileset;

pub use atlas::{AtlasImage, AtlasInfo, AtlasRect};
pub use collision::{CollisionClass, CollisionClassifier};
pub use format::TilesetFormat;
pub use loader::{
    load_tileset_from_bytes, load_tileset_from_path, load_tileset_from_str, LoadError,
    LIGHT_X_PROPERTY, LIGHT_Y_PROPERTY, WALL_PROPERTY,
};
pub use terrain::{Corner, TerrainCorners, TerrainId, TerrainType};
pub use tileset::{LightAnchor, TileDefinition, Tileset, TilesetBuilder, UnknownTileId};
