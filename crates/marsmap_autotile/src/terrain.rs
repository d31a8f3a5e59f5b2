//! Corner terrain resolution
//!
//! Finds the tile whose terrain corners satisfy the four corner memberships a
//! map generator derived for a grid cell.

use crate::config::{AutotileConfig, MatchMode};
use log::{debug, warn};
use marsmap_core::{TerrainCorners, Tileset};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by [`TerrainResolver`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("No tile matches terrain corners {corners}")]
    NoMatchingTerrainTile { corners: TerrainCorners },
}

/// Resolves a requested corner tuple to a concrete tile id
///
/// Exact matching compares all four corners: a requested `None` corner only
/// matches a declared `None`, and a terrain only matches the same terrain.
/// Among several matches the lowest tile id wins.
#[derive(Debug, Clone)]
pub struct TerrainResolver {
    tileset: Arc<Tileset>,
    match_mode: MatchMode,
}

impl TerrainResolver {
    /// Resolver with exact matching
    pub fn new(tileset: Arc<Tileset>) -> Self {
        Self {
            tileset,
            match_mode: MatchMode::Exact,
        }
    }

    pub fn with_config(tileset: Arc<Tileset>, config: &AutotileConfig) -> Self {
        Self {
            tileset,
            match_mode: config.match_mode,
        }
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    pub fn tileset(&self) -> &Arc<Tileset> {
        &self.tileset
    }

    /// Resolve corners using this resolver's match mode
    pub fn resolve(&self, corners: TerrainCorners) -> Result<u32, ResolveError> {
        match self.match_mode {
            MatchMode::Exact => self.resolve_exact(corners),
            MatchMode::Nearest => self.resolve_nearest(corners),
        }
    }

    /// Lowest-id tile whose corners equal `corners` exactly
    ///
    /// Only the tiles tagged with one of the requested terrains are scanned.
    pub fn resolve_exact(&self, corners: TerrainCorners) -> Result<u32, ResolveError> {
        self.matching_tiles(corners)
            .next()
            .ok_or_else(|| {
                debug!("No exact terrain match for {corners}");
                ResolveError::NoMatchingTerrainTile { corners }
            })
    }

    /// Every tile whose corners equal `corners` exactly, in ascending id order
    pub fn matching_tiles(&self, corners: TerrainCorners) -> impl Iterator<Item = u32> + '_ {
        // An all-none request can never match: such tiles carry no terrain tuple
        let candidates = corners
            .terrains()
            .next()
            .map(|terrain| self.tileset.tiles_with_terrain(terrain));

        candidates
            .into_iter()
            .flatten()
            .filter(move |tile| tile.terrain == Some(corners))
            .map(|tile| tile.id)
    }

    /// Degraded resolution: exact match if one exists, else the best near match
    pub fn resolve_nearest(&self, corners: TerrainCorners) -> Result<u32, ResolveError> {
        match self.find_best_tile(corners) {
            Some((tile, 0)) => Ok(tile),
            Some((tile, penalty)) => {
                warn!(
                    "Approximate terrain match for {corners}: tile {tile} ({penalty} corner(s) differ)"
                );
                Ok(tile)
            }
            None => {
                debug!("No terrain tiles to approximate {corners}");
                Err(ResolveError::NoMatchingTerrainTile { corners })
            }
        }
    }

    /// Find the best tile match using penalty scoring
    ///
    /// Returns `(tile_id, penalty)` where the penalty is the number of
    /// mismatched corners; ties go to the lowest id. Returns `None` only if the
    /// tileset has no terrain tiles.
    pub fn find_best_tile(&self, corners: TerrainCorners) -> Option<(u32, usize)> {
        let mut best_tile: Option<(u32, usize)> = None;

        for tile in self.tileset.terrain_tiles() {
            let Some(tile_corners) = tile.terrain else {
                continue;
            };
            let penalty = tile_corners.mismatches(&corners);

            match best_tile {
                None => best_tile = Some((tile.id, penalty)),
                Some((_, best_penalty)) if penalty < best_penalty => {
                    best_tile = Some((tile.id, penalty));
                }
                _ => {}
            }

            if penalty == 0 {
                break;
            }
        }

        best_tile
    }
}
