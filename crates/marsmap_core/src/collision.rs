//! Collision classes for tiles
//!
//! This module provides the collision types consumed by physics and movement:
//! - `CollisionClass` - Passable, Blocking, or Special
//! - `CollisionClassifier` - Read-only `tile id -> CollisionClass` lookup

use crate::tileset::{Tileset, UnknownTileId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How the physics collaborator treats a tile
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CollisionClass {
    /// No collision
    Passable,
    /// Hard collision (walls)
    Blocking,
    /// Engine-significant but non-physical (hazards, triggers)
    Special,
}

impl CollisionClass {
    /// Map the integer `wall` tile property to a class (0, 1, 2)
    pub fn from_wall_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(CollisionClass::Passable),
            1 => Some(CollisionClass::Blocking),
            2 => Some(CollisionClass::Special),
            _ => None,
        }
    }

    /// Check if this class stops movement
    pub fn has_collision(&self) -> bool {
        matches!(self, CollisionClass::Blocking)
    }}

/// Pure collision lookup over a loaded tileset
///
/// Never reads terrain or spawn-weight data; cloning shares the tileset.
#[derive(Debug, Clone)]
pub struct CollisionClassifier {
    tileset: Arc<Tileset>,
}

impl CollisionClassifier {
    pub fn new(tileset: Arc<Tileset>) -> Self {
        Self { tileset }
    }

    /// Get the collision class of a tile
    pub fn classify(&self, tile_id: u32) -> Result<CollisionClass, UnknownTileId> {
        self.tileset.lookup(tile_id).map(|tile| tile.collision)
    }

    /// Check if a tile blocks movement
    pub fn is_blocking(&self, tile_id: u32) -> Result<bool, UnknownTileId> {
        self.classify(tile_id).map(|class| class.has_collision())
    }

    pub fn tileset(&self) -> &Arc<Tileset> {
        &self.tileset
    }
}
