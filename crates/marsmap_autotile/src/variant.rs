//! Weighted random selection among decorative tile variants
//!
//! Weights come from each tile's spawn weight and are normalized per call over
//! exactly the candidates passed in. Tiles without a spawn weight are never
//! picked by chance.

use log::debug;
use marsmap_core::{CollisionClass, Tileset, UnknownTileId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by [`VariantSelector`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("No selectable variant among {candidates} candidate(s)")]
    NoSelectableVariant { candidates: usize },
    #[error(transparent)]
    UnknownTileId(#[from] UnknownTileId),
}

/// A named list of candidate tile ids for variant selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateGroup {
    pub name: String,
    pub tiles: Vec<u32>,
}

impl CandidateGroup {
    pub fn new(name: impl Into<String>, tiles: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            tiles,
        }
    }

    /// Every tile in the tileset with a spawn weight
    pub fn spawnable(tileset: &Tileset) -> Self {
        Self::new("spawnable", tileset.spawnable_tiles().map(|t| t.id).collect())
    }

    /// Passable, weighted tiles that carry no terrain tags (floor filler)
    pub fn plain_ground(tileset: &Tileset) -> Self {
        let tiles = tileset
            .spawnable_tiles()
            .filter(|t| t.collision == CollisionClass::Passable && t.terrain.is_none())
            .map(|t| t.id)
            .collect();
        Self::new("plain ground", tiles)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Picks one tile id from a candidate list, proportionally to spawn weight
///
/// The selector holds no random state. Given the same candidates and the same
/// stream of draws from `rng`, the output is identical.
#[derive(Debug, Clone)]
pub struct VariantSelector {
    tileset: Arc<Tileset>,
}

impl VariantSelector {
    pub fn new(tileset: Arc<Tileset>) -> Self {
        Self { tileset }
    }

    pub fn tileset(&self) -> &Arc<Tileset> {
        &self.tileset
    }

    /// Weighted pick over `candidates`; repeated ids count once
    ///
    /// Draws exactly one value from `rng` when a pick is possible.
    pub fn pick(&self, candidates: &[u32], rng: &mut impl Rng) -> Result<u32, SelectError> {
        let weighted = self.weighted_candidates(candidates)?;
        if weighted.is_empty() {
            debug!("No spawn weights among {} candidate(s)", candidates.len());
            return Err(SelectError::NoSelectableVariant {
                candidates: candidates.len(),
            });
        }

        let total: f64 = weighted.iter().map(|&(_, w)| w).sum();
        let mut pick = rng.gen_range(0.0..total);
        for &(id, weight) in &weighted {
            if pick < weight {
                return Ok(id);
            }
            pick -= weight;
        }

        // Rounding can leave a sliver past the last bucket
        Ok(weighted[weighted.len() - 1].0)
    }

    /// Weighted pick over a [`CandidateGroup`]
    pub fn pick_from_group(
        &self,
        group: &CandidateGroup,
        rng: &mut impl Rng,
    ) -> Result<u32, SelectError> {
        self.pick(&group.tiles, rng)
    }

    /// Probability of each selectable candidate, in candidate order
    pub fn probabilities(&self, candidates: &[u32]) -> Result<Vec<(u32, f64)>, SelectError> {
        let weighted = self.weighted_candidates(candidates)?;
        if weighted.is_empty() {
            return Err(SelectError::NoSelectableVariant {
                candidates: candidates.len(),
            });
        }
        let total: f64 = weighted.iter().map(|&(_, w)| w).sum();
        Ok(weighted
            .into_iter()
            .map(|(id, weight)| (id, weight / total))
            .collect())
    }

    fn weighted_candidates(&self, candidates: &[u32]) -> Result<Vec<(u32, f64)>, SelectError> {
        let mut seen = HashSet::with_capacity(candidates.len());
        let mut weighted = Vec::with_capacity(candidates.len());
        for &id in candidates {
            let tile = self.tileset.lookup(id)?;
            if !seen.insert(id) {
                continue;
            }
            if let Some(weight) = tile.spawn_weight.filter(|w| *w > 0.0) {
                weighted.push((id, weight));
            }
        }

        // Scale into (0, 1] so the sum stays finite for any positive weights
        let max = weighted.iter().fold(0.0_f64, |max, &(_, w)| max.max(w));
        for (_, weight) in &mut weighted {
            *weight /= max;
        }
        Ok(weighted)
    }
}
