//! Tiled-compatible corner terrain autotiling
//!
//! This crate resolves terrain corners to concrete tiles and picks decorative
//! variants by spawn weight, on top of an immutable `marsmap_core::Tileset`.
//!
//! # Features
//! - Exact corner matching with a lowest-id tie-break
//! - Opt-in nearest matching for brushes that accept approximations
//! - Weighted variant selection driven by a caller-owned random stream
//!
//! # Example
//!
//! ```rust,ignore
//! use marsmap_autotile::{CandidateGroup, TerrainResolver, VariantSelector};
//! use marsmap_core::{load_tileset_from_path, TerrainCorners};
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! let tileset = load_tileset_from_path("assets/tilesets/mars.tsx")?.into_shared();
//! let wall = tileset.terrain_index("Wall").unwrap();
//!
//! // Inner corner: only the bottom-right corner is wall
//! let resolver = TerrainResolver::new(tileset.clone());
//! let tile = resolver.resolve(TerrainCorners::new(None, None, None, Some(wall)))?;
//!
//! // Scatter floor variants from a seed
//! let selector = VariantSelector::new(tileset.clone());
//! let ground = CandidateGroup::plain_ground(&tileset);
//! let mut rng = SmallRng::seed_from_u64(7);
//! let floor = selector.pick_from_group(&ground, &mut rng)?;
//! ```

pub mod config;
pub mod terrain;
pub mod variant;

// Re-export main types at crate root
pub use config::{AutotileConfig, ConfigError, MatchMode};
pub use terrain::{ResolveError, TerrainResolver};
pub use variant::{CandidateGroup, SelectError, VariantSelector};

// Re-export marsmap_core
pub use marsmap_core;
