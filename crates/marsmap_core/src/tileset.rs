//! Tileset definition table
//!
//! A [`Tileset`] is built once (by the loader or a [`TilesetBuilder`]) and is
//! immutable afterwards. Share it between readers with [`Tileset::into_shared`].

use crate::atlas::AtlasInfo;
use crate::collision::CollisionClass;
use crate::loader::LoadError;
use crate::terrain::{TerrainCorners, TerrainId, TerrainType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Lookup of a tile id that is not in the tileset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unknown tile id: {0}")]
pub struct UnknownTileId(pub u32);

/// Light emitter offset for light-casting tiles (renderer metadata)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightAnchor {
    pub x: f32,
    pub y: f32,
}

/// Per-tile attributes: collision, terrain corners, spawn weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileDefinition {
    pub id: u32,
    pub collision: CollisionClass,
    /// Terrain at each corner; `None` if the tile does not autotile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terrain: Option<TerrainCorners>,
    /// Relative probability for random selection; `None` = never picked by chance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawn_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<LightAnchor>,
}

impl TileDefinition {
    pub fn new(id: u32, collision: CollisionClass) -> Self {
        Self {
            id,
            collision,
            terrain: None,
            spawn_weight: None,
            light: None,
        }
    }

    pub fn with_terrain(mut self, corners: TerrainCorners) -> Self {
        self.terrain = Some(corners);
        self
    }

    pub fn with_spawn_weight(mut self, weight: f64) -> Self {
        self.spawn_weight = Some(weight);
        self
    }

    pub fn with_light(mut self, x: f32, y: f32) -> Self {
        self.light = Some(LightAnchor { x, y });
        self
    }

    /// Check if any corner of this tile carries `terrain`
    pub fn has_terrain(&self, terrain: TerrainId) -> bool {
        self.terrain.is_some_and(|corners| corners.contains(terrain))
    }

    /// Check if this tile can be chosen by weighted random selection
    pub fn is_spawnable(&self) -> bool {
        self.spawn_weight.is_some()
    }
}

/// Immutable catalog of tile definitions sharing one image atlas
#[derive(Debug, Clone, Serialize)]
pub struct Tileset {
    id: Uuid,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    atlas: AtlasInfo,
    terrains: Vec<TerrainType>,
    /// Sorted by ascending id
    tiles: Vec<TileDefinition>,
    #[serde(skip)]
    index: HashMap<u32, usize>,
    /// terrain -> positions in `tiles` of every tile touching that terrain
    #[serde(skip)]
    terrain_index: HashMap<TerrainId, Vec<usize>>,
}

impl Tileset {
    /// Instance id, assigned when the tileset is built
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn atlas(&self) -> &AtlasInfo {
        &self.atlas
    }

    pub fn terrains(&self) -> &[TerrainType] {
        &self.terrains
    }

    pub fn terrain(&self, terrain: TerrainId) -> Option<&TerrainType> {
        self.terrains.get(terrain)
    }

    /// Get terrain index by name
    pub fn terrain_index(&self, name: &str) -> Option<TerrainId> {
        self.terrains.iter().position(|t| t.name == name)
    }

    /// Number of defined tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, tile_id: u32) -> bool {
        self.index.contains_key(&tile_id)
    }

    /// Get the definition of a tile
    pub fn lookup(&self, tile_id: u32) -> Result<&TileDefinition, UnknownTileId> {
        self.index
            .get(&tile_id)
            .map(|&i| &self.tiles[i])
            .ok_or(UnknownTileId(tile_id))
    }

    /// All tile definitions in ascending id order
    pub fn tiles(&self) -> impl Iterator<Item = &TileDefinition> + '_ {
        self.tiles.iter()
    }

    /// Tiles with `terrain` on at least one corner, in ascending id order
    ///
    /// Each call yields the same sequence.
    pub fn tiles_with_terrain(
        &self,
        terrain: TerrainId,
    ) -> impl Iterator<Item = &TileDefinition> + '_ {
        self.terrain_index
            .get(&terrain)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&i| &self.tiles[i])
    }

    /// Tiles that participate in autotiling, in ascending id order
    pub fn terrain_tiles(&self) -> impl Iterator<Item = &TileDefinition> + '_ {
        self.tiles.iter().filter(|t| t.terrain.is_some())
    }

    /// Tiles with a spawn weight, in ascending id order
    pub fn spawnable_tiles(&self) -> impl Iterator<Item = &TileDefinition> + '_ {
        self.tiles.iter().filter(|t| t.is_spawnable())
    }

    /// Convert a tile id to its (row, column) in the atlas image
    pub fn grid_position(&self, tile_id: u32) -> Result<Option<(u32, u32)>, UnknownTileId> {
        self.lookup(tile_id)?;
        Ok(self.atlas.grid_position(tile_id))
    }

    /// Wrap in an `Arc` for sharing between readers
    pub fn into_shared(self) -> Arc<Tileset> {
        Arc::new(self)
    }
}

/// Builder for [`Tileset`] - validates ids, terrain references and weights
#[derive(Debug, Clone, Default)]
pub struct TilesetBuilder {
    name: String,
    version: Option<String>,
    atlas: AtlasInfo,
    terrains: Vec<TerrainType>,
    tiles: Vec<TileDefinition>,
}

impl TilesetBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn atlas(mut self, atlas: AtlasInfo) -> Self {
        self.atlas = atlas;
        self
    }

    /// Declare a terrain type; its index is the declaration order
    pub fn terrain(mut self, terrain: TerrainType) -> Self {
        self.terrains.push(terrain);
        self
    }

    pub fn tile(mut self, tile: TileDefinition) -> Self {
        self.tiles.push(tile);
        self
    }

    pub fn tiles(mut self, tiles: impl IntoIterator<Item = TileDefinition>) -> Self {
        self.tiles.extend(tiles);
        self
    }

    pub fn build(self) -> Result<Tileset, LoadError> {
        let TilesetBuilder {
            name,
            version,
            atlas,
            terrains,
            mut tiles,
        } = self;

        for tile in &tiles {
            if let Some(corners) = tile.terrain {
                if let Some(terrain) = corners.terrains().find(|&t| t >= terrains.len()) {
                    return Err(LoadError::UndeclaredTerrainReference {
                        tile: tile.id,
                        terrain,
                    });
                }
            }
            if let Some(weight) = tile.spawn_weight {
                if !(weight.is_finite() && weight > 0.0) {
                    return Err(LoadError::MalformedSource(format!(
                        "tile {} has non-positive spawn weight {}",
                        tile.id, weight
                    )));
                }
            }
        }

        tiles.sort_by_key(|t| t.id);
        if let Some(pair) = tiles.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(LoadError::DuplicateTileId(pair[0].id));
        }

        let mut index = HashMap::with_capacity(tiles.len());
        let mut terrain_index: HashMap<TerrainId, Vec<usize>> = HashMap::new();
        for (i, tile) in tiles.iter().enumerate() {
            index.insert(tile.id, i);
            if let Some(corners) = tile.terrain {
                for terrain in 0..terrains.len() {
                    if corners.contains(terrain) {
                        terrain_index.entry(terrain).or_default().push(i);
                    }
                }
            }
        }

        Ok(Tileset {
            id: Uuid::new_v4(),
            name,
            version,
            atlas,
            terrains,
            tiles,
            index,
            terrain_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALL: TerrainId = 0;

    fn wall_tileset() -> Tileset {
        TilesetBuilder::new("Test")
            .atlas(AtlasInfo::new(32, 32, 8))
            .terrain(TerrainType::new("Wall"))
            .tile(TileDefinition::new(6, CollisionClass::Blocking).with_terrain(
                TerrainCorners::new(None, None, None, Some(WALL)),
            ))
            .tile(
                TileDefinition::new(4, CollisionClass::Blocking)
                    .with_terrain(TerrainCorners::filled(WALL)),
            )
            .tile(TileDefinition::new(0, CollisionClass::Passable))
            .tile(TileDefinition::new(9, CollisionClass::Passable).with_spawn_weight(0.1))
            .build()
            .unwrap()
    }

    #[test]
    fn test_lookup() {
        let tileset = wall_tileset();
        assert_eq!(tileset.len(), 4);
        assert_eq!(tileset.lookup(4).unwrap().collision, CollisionClass::Blocking);
        assert_eq!(tileset.lookup(5), Err(UnknownTileId(5)));
        assert!(tileset.contains(9));
    }

    #[test]
    fn test_tiles_are_sorted_by_id() {
        let tileset = wall_tileset();
        let ids: Vec<u32> = tileset.tiles().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 4, 6, 9]);
    }

    #[test]
    fn test_tiles_with_terrain_is_ascending_and_repeatable() {
        let tileset = wall_tileset();
        let first: Vec<u32> = tileset.tiles_with_terrain(WALL).map(|t| t.id).collect();
        let second: Vec<u32> = tileset.tiles_with_terrain(WALL).map(|t| t.id).collect();
        assert_eq!(first, vec![4, 6]);
        assert_eq!(first, second);
        assert_eq!(tileset.tiles_with_terrain(7).count(), 0);
    }

    #[test]
    fn test_terrain_index_by_name() {
        let tileset = wall_tileset();
        assert_eq!(tileset.terrain_index("Wall"), Some(WALL));
        assert_eq!(tileset.terrain_index("Water"), None);
    }

    #[test]
    fn test_duplicate_tile_id() {
        let result = TilesetBuilder::new("Dup")
            .tile(TileDefinition::new(3, CollisionClass::Passable))
            .tile(TileDefinition::new(3, CollisionClass::Blocking))
            .build();
        assert!(matches!(result, Err(LoadError::DuplicateTileId(3))));
    }

    #[test]
    fn test_undeclared_terrain_reference() {
        let result = TilesetBuilder::new("Bad")
            .terrain(TerrainType::new("Wall"))
            .tile(
                TileDefinition::new(1, CollisionClass::Blocking)
                    .with_terrain(TerrainCorners::new(Some(0), None, Some(1), None)),
            )
            .build();
        assert!(matches!(
            result,
            Err(LoadError::UndeclaredTerrainReference { tile: 1, terrain: 1 })
        ));
    }

    #[test]
    fn test_non_positive_weight_rejected() {
        let result = TilesetBuilder::new("Bad")
            .tile(TileDefinition::new(1, CollisionClass::Passable).with_spawn_weight(0.0))
            .build();
        assert!(matches!(result, Err(LoadError::MalformedSource(_))));
    }

    #[test]
    fn test_grid_position_requires_known_tile() {
        let tileset = wall_tileset();
        assert_eq!(tileset.grid_position(9), Ok(Some((1, 1))));
        assert_eq!(tileset.grid_position(10), Err(UnknownTileId(10)));
    }
}
