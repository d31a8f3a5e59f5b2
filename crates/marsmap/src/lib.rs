//! Tile metadata, collision classes and autotiling for tile-based maps
//!
//! Single import for the whole stack:
//! - [`marsmap_core`] - tileset loading, tile definitions, collision classification
//! - [`marsmap_autotile`] - corner terrain resolution and weighted variant selection
//!
//! Load a tileset once, share it, and hand each collaborator the service it needs:
//!
//! ```rust,ignore
//! use marsmap::prelude::*;
//!
//! let tileset = load_tileset_from_path("assets/tilesets/mars.tsx")?.into_shared();
//!
//! // Map generator
//! let resolver = TerrainResolver::new(tileset.clone());
//! let selector = VariantSelector::new(tileset.clone());
//!
//! // Physics
//! let classifier = CollisionClassifier::new(tileset.clone());
//! ```

pub use marsmap_autotile;
pub use marsmap_core;

pub mod prelude {
    pub use marsmap_autotile::{
        AutotileConfig, CandidateGroup, MatchMode, ResolveError, SelectError, TerrainResolver,
        VariantSelector,
    };
    pub use marsmap_core::{
        load_tileset_from_bytes, load_tileset_from_path, load_tileset_from_str, AtlasInfo,
        CollisionClass, CollisionClassifier, Corner, LoadError, TerrainCorners, TerrainId,
        TileDefinition, Tileset, TilesetBuilder, TilesetFormat, UnknownTileId,
    };
}
