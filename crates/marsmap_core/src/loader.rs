//! Tileset loading and validation
//!
//! Reads a Tiled TSX or JSON tileset descriptor into an immutable [`Tileset`].
//! Free-form tile properties are checked against a fixed schema here, so a
//! tile without a `wall` property fails at load instead of at first use.
//!
//! # Example
//!
//! ```rust,ignore
//! use marsmap_core::{load_tileset_from_path, CollisionClassifier};
//!
//! let tileset = load_tileset_from_path("assets/tilesets/mars.tsx")?.into_shared();
//! let classifier = CollisionClassifier::new(tileset.clone());
//! assert!(classifier.is_blocking(4)?);
//! ```

use crate::collision::CollisionClass;
use crate::format::{self, SourceTile, SourceTileset, TilesetFormat};
use crate::terrain::{TerrainCorners, TerrainId, TerrainType};
use crate::tileset::{TileDefinition, Tileset, TilesetBuilder};
use log::{debug, info};
use std::path::Path;
use thiserror::Error;

/// Tile property that carries the collision class
pub const WALL_PROPERTY: &str = "wall";
/// Tile properties that carry the light anchor offset
pub const LIGHT_X_PROPERTY: &str = "lightx";
pub const LIGHT_Y_PROPERTY: &str = "lighty";

/// Error type for tileset loading failures
///
/// A failed load never yields a partial tileset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read tileset: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed tileset source: {0}")]
    MalformedSource(String),
    #[error("Tile {tile} has no 'wall' property")]
    MissingCollisionClass { tile: u32 },
    #[error("Tile {tile} references undeclared terrain {terrain}")]
    UndeclaredTerrainReference { tile: u32, terrain: TerrainId },
    #[error("Duplicate tile id: {0}")]
    DuplicateTileId(u32),
}

/// Load a tileset from a descriptor string
pub fn load_tileset_from_str(source: &str, format: TilesetFormat) -> Result<Tileset, LoadError> {
    let source = match format {
        TilesetFormat::Tsx => format::parse_tsx(source)?,
        TilesetFormat::Json => format::parse_json(source)?,
    };
    build_tileset(source)
}

/// Load a tileset from descriptor bytes (must be UTF-8)
pub fn load_tileset_from_bytes(bytes: &[u8], format: TilesetFormat) -> Result<Tileset, LoadError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| LoadError::MalformedSource(format!("not UTF-8: {e}")))?;
    load_tileset_from_str(text, format)
}

/// Load a tileset from a file, picking the format from its extension
pub fn load_tileset_from_path(path: impl AsRef<Path>) -> Result<Tileset, LoadError> {
    let path = path.as_ref();
    let format = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(TilesetFormat::from_extension)
        .ok_or_else(|| {
            LoadError::MalformedSource(format!(
                "unrecognized tileset extension: {}",
                path.display()
            ))
        })?;
    let content = std::fs::read_to_string(path)?;
    load_tileset_from_str(&content, format)
}

fn build_tileset(source: SourceTileset) -> Result<Tileset, LoadError> {
    let SourceTileset {
        name,
        version,
        atlas,
        terrains,
        tiles,
    } = source;

    if atlas.columns == 0 {
        return Err(LoadError::MalformedSource(format!(
            "tileset '{name}' has zero columns"
        )));
    }
    if atlas.tile_width == 0 || atlas.tile_height == 0 {
        return Err(LoadError::MalformedSource(format!(
            "tileset '{name}' has zero tile size"
        )));
    }

    let terrain_count = terrains.len();
    let mut icon_tiles = Vec::new();
    let mut builder = TilesetBuilder::new(name).atlas(atlas.clone());
    if let Some(version) = version {
        builder = builder.version(version);
    }
    for terrain in terrains {
        let mut terrain_type = TerrainType::new(terrain.name);
        if terrain.tile >= 0 {
            let icon = u32::try_from(terrain.tile).map_err(|_| {
                LoadError::MalformedSource(format!("terrain icon tile {} out of range", terrain.tile))
            })?;
            icon_tiles.push(icon);
            terrain_type = terrain_type.with_icon_tile(icon);
        }
        builder = builder.terrain(terrain_type);
    }

    for tile in tiles {
        if let Some(count) = atlas.tile_count {
            if tile.id >= count {
                return Err(LoadError::MalformedSource(format!(
                    "tile id {} exceeds tile count {}",
                    tile.id, count
                )));
            }
        }
        builder = builder.tile(build_tile(tile, terrain_count)?);
    }

    let tileset = builder.build()?;

    if let Some(&icon) = icon_tiles.iter().find(|&&icon| !tileset.contains(icon)) {
        return Err(LoadError::MalformedSource(format!(
            "terrain icon tile {icon} is not defined"
        )));
    }

    info!(
        "Loaded tileset '{}' ({} tiles, {} terrains)",
        tileset.name(),
        tileset.len(),
        tileset.terrains().len()
    );
    Ok(tileset)
}

fn build_tile(tile: SourceTile, terrain_count: usize) -> Result<TileDefinition, LoadError> {
    let id = tile.id;
    let mut wall = None;
    let mut light_x = None;
    let mut light_y = None;

    for property in &tile.properties {
        match property.name.as_str() {
            WALL_PROPERTY => wall = Some(property.value.as_str()),
            LIGHT_X_PROPERTY => light_x = Some(parse_float(id, property)?),
            LIGHT_Y_PROPERTY => light_y = Some(parse_float(id, property)?),
            other => debug!("Ignoring property '{other}' on tile {id}"),
        }
    }

    let wall = wall.ok_or(LoadError::MissingCollisionClass { tile: id })?;
    let collision = wall
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(CollisionClass::from_wall_value)
        .ok_or_else(|| {
            LoadError::MalformedSource(format!(
                "tile {id}: '{WALL_PROPERTY}' must be 0, 1 or 2, got '{wall}'"
            ))
        })?;

    let mut definition = TileDefinition::new(id, collision);

    if let Some(fields) = tile.terrain {
        if let Some(corners) = parse_corners(id, &fields, terrain_count)? {
            definition = definition.with_terrain(corners);
        }
    }

    if let Some(probability) = tile.probability {
        if !(probability.is_finite() && probability > 0.0 && probability <= 1.0) {
            return Err(LoadError::MalformedSource(format!(
                "tile {id}: probability {probability} outside (0, 1]"
            )));
        }
        definition = definition.with_spawn_weight(probability);
    }

    match (light_x, light_y) {
        (Some(x), Some(y)) => definition = definition.with_light(x, y),
        (None, None) => {}
        _ => {
            return Err(LoadError::MalformedSource(format!(
                "tile {id}: '{LIGHT_X_PROPERTY}' and '{LIGHT_Y_PROPERTY}' must be set together"
            )))
        }
    }

    Ok(definition)
}

/// Validate raw corner fields. An all-empty tuple means the tile does not autotile.
fn parse_corners(
    tile: u32,
    fields: &[Option<i64>],
    terrain_count: usize,
) -> Result<Option<TerrainCorners>, LoadError> {
    if fields.len() != 4 {
        return Err(LoadError::MalformedSource(format!(
            "tile {tile}: terrain needs 4 corners, got {}",
            fields.len()
        )));
    }

    let mut corners = TerrainCorners::EMPTY;
    for (slot, field) in corners.0.iter_mut().zip(fields) {
        let Some(value) = *field else { continue };
        let terrain = usize::try_from(value).map_err(|_| {
            LoadError::MalformedSource(format!("tile {tile}: negative terrain index {value}"))
        })?;
        if terrain >= terrain_count {
            return Err(LoadError::UndeclaredTerrainReference { tile, terrain });
        }
        *slot = Some(terrain);
    }

    Ok(corners.has_any_terrain().then_some(corners))
}

fn parse_float(tile: u32, property: &format::SourceProperty) -> Result<f32, LoadError> {
    property.value.trim().parse::<f32>().map_err(|_| {
        LoadError::MalformedSource(format!(
            "tile {tile}: property '{}' is not a number: '{}'",
            property.name, property.value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn tsx(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<tileset name="Test" tilewidth="32" tileheight="32" tilecount="64" columns="8">
 <image source="tiles.png" width="256" height="256"/>
 <terraintypes>
  <terrain name="Wall" tile="-1"/>
 </terraintypes>
{body}
</tileset>"#
        )
    }

    fn tile(id: u32, attrs: &str, wall: &str) -> String {
        format!(
            r#" <tile id="{id}" {attrs}>
  <properties>
   <property name="wall" value="{wall}"/>
  </properties>
 </tile>"#
        )
    }

    #[test]
    fn test_load_minimal_tsx() {
        let body = [
            tile(0, "", "0"),
            tile(4, r#"terrain="0,0,0,0""#, "1"),
            tile(6, r#"terrain=",,,0""#, "1"),
            tile(9, r#"probability="0.1""#, "0"),
            tile(33, "", "2"),
        ]
        .join("\n");
        let tileset = load_tileset_from_str(&tsx(&body), TilesetFormat::Tsx).unwrap();

        assert_eq!(tileset.name(), "Test");
        assert_eq!(tileset.len(), 5);
        assert_eq!(tileset.terrain_index("Wall"), Some(0));
        assert_eq!(tileset.lookup(33).unwrap().collision, CollisionClass::Special);
        assert_eq!(
            tileset.lookup(6).unwrap().terrain,
            Some(TerrainCorners::new(None, None, None, Some(0)))
        );
        assert_eq!(tileset.lookup(9).unwrap().spawn_weight, Some(0.1));
        assert_eq!(tileset.lookup(0).unwrap().terrain, None);
    }

    #[test]
    fn test_missing_wall_property() {
        let body = r#" <tile id="3">
  <properties>
   <property name="lightx" value="4"/>
   <property name="lighty" value="4"/>
  </properties>
 </tile>"#;
        let result = load_tileset_from_str(&tsx(body), TilesetFormat::Tsx);
        assert!(matches!(result, Err(LoadError::MissingCollisionClass { tile: 3 })));
    }

    #[test]
    fn test_tile_without_properties_is_missing_collision_class() {
        let result = load_tileset_from_str(&tsx(r#" <tile id="8"/>"#), TilesetFormat::Tsx);
        assert!(matches!(result, Err(LoadError::MissingCollisionClass { tile: 8 })));
    }

    #[test]
    fn test_duplicate_tile_id() {
        let body = [tile(5, "", "0"), tile(5, "", "1")].join("\n");
        let result = load_tileset_from_str(&tsx(&body), TilesetFormat::Tsx);
        assert!(matches!(result, Err(LoadError::DuplicateTileId(5))));
    }

    #[test]
    fn test_undeclared_terrain() {
        let body = tile(4, r#"terrain="0,0,1,0""#, "1");
        let result = load_tileset_from_str(&tsx(&body), TilesetFormat::Tsx);
        assert!(matches!(
            result,
            Err(LoadError::UndeclaredTerrainReference { tile: 4, terrain: 1 })
        ));
    }

    #[test]
    fn test_terrain_with_wrong_arity() {
        let body = tile(4, r#"terrain="0,0,0""#, "1");
        let result = load_tileset_from_str(&tsx(&body), TilesetFormat::Tsx);
        assert!(matches!(result, Err(LoadError::MalformedSource(_))));
    }

    #[test]
    fn test_all_empty_terrain_is_absent() {
        let body = tile(2, r#"terrain=",,,""#, "0");
        let tileset = load_tileset_from_str(&tsx(&body), TilesetFormat::Tsx).unwrap();
        assert_eq!(tileset.lookup(2).unwrap().terrain, None);
        assert_eq!(tileset.terrain_tiles().count(), 0);
    }

    #[test]
    fn test_bad_wall_value() {
        for wall in ["3", "solid", "1.5"] {
            let body = tile(1, "", wall);
            let result = load_tileset_from_str(&tsx(&body), TilesetFormat::Tsx);
            assert!(
                matches!(result, Err(LoadError::MalformedSource(_))),
                "wall={wall}"
            );
        }
    }

    #[test]
    fn test_probability_range() {
        for probability in ["0", "-0.5", "1.5", "NaN"] {
            let body = tile(1, &format!(r#"probability="{probability}""#), "0");
            let result = load_tileset_from_str(&tsx(&body), TilesetFormat::Tsx);
            assert!(
                matches!(result, Err(LoadError::MalformedSource(_))),
                "probability={probability}"
            );
        }

        let body = tile(1, r#"probability="1""#, "0");
        let tileset = load_tileset_from_str(&tsx(&body), TilesetFormat::Tsx).unwrap();
        assert_eq!(tileset.lookup(1).unwrap().spawn_weight, Some(1.0));
    }

    #[test]
    fn test_tile_id_beyond_tile_count() {
        let body = tile(64, "", "0");
        let result = load_tileset_from_str(&tsx(&body), TilesetFormat::Tsx);
        assert!(matches!(result, Err(LoadError::MalformedSource(_))));
    }

    #[test]
    fn test_light_anchor() {
        let body = r#" <tile id="3">
  <properties>
   <property name="wall" value="1"/>
   <property name="lightx" type="float" value="16"/>
   <property name="lighty" type="float" value="8.5"/>
  </properties>
 </tile>"#;
        let tileset = load_tileset_from_str(&tsx(body), TilesetFormat::Tsx).unwrap();
        let light = tileset.lookup(3).unwrap().light.unwrap();
        assert_eq!(light.x, 16.0);
        assert_eq!(light.y, 8.5);
    }

    #[test]
    fn test_undefined_terrain_icon_tile() {
        let xml = r#"<tileset name="T" tilewidth="32" tileheight="32" columns="8">
 <terraintypes>
  <terrain name="Wall" tile="12"/>
 </terraintypes>
</tileset>"#;
        let result = load_tileset_from_str(xml, TilesetFormat::Tsx);
        assert!(matches!(result, Err(LoadError::MalformedSource(_))));
    }

    #[test]
    fn test_zero_columns() {
        let xml = r#"<tileset name="T" tilewidth="32" tileheight="32" columns="0"></tileset>"#;
        let result = load_tileset_from_str(xml, TilesetFormat::Tsx);
        assert!(matches!(result, Err(LoadError::MalformedSource(_))));
    }

    #[test]
    fn test_load_json() {
        let json = r#"{
            "name": "Json",
            "tilewidth": 16,
            "tileheight": 16,
            "columns": 4,
            "terrains": [{ "name": "Wall", "tile": 1 }],
            "tiles": [
                { "id": 1, "terrain": [0, 0, 0, 0],
                  "properties": [{ "name": "wall", "type": "int", "value": 1 }] },
                { "id": 2, "probability": 0.5,
                  "properties": [{ "name": "wall", "type": "string", "value": "0" }] }
            ]
        }"#;
        let tileset = load_tileset_from_str(json, TilesetFormat::Json).unwrap();
        assert_eq!(tileset.terrains()[0].icon_tile, Some(1));
        assert_eq!(tileset.lookup(1).unwrap().terrain, Some(TerrainCorners::filled(0)));
        assert_eq!(tileset.lookup(2).unwrap().spawn_weight, Some(0.5));
        assert_eq!(tileset.atlas().grid_position(2), Some((0, 2)));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::Builder::new().suffix(".tsx").tempfile().unwrap();
        file.write_all(tsx(&tile(0, "", "0")).as_bytes()).unwrap();

        let tileset = load_tileset_from_path(file.path()).unwrap();
        assert_eq!(tileset.len(), 1);
    }

    #[test]
    fn test_load_from_path_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        let result = load_tileset_from_path(file.path());
        assert!(matches!(result, Err(LoadError::MalformedSource(_))));
    }

    #[test]
    fn test_load_from_missing_path() {
        let result = load_tileset_from_path("does/not/exist.tsx");
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn test_load_from_bytes_rejects_invalid_utf8() {
        let result = load_tileset_from_bytes(&[0xff, 0xfe], TilesetFormat::Tsx);
        assert!(matches!(result, Err(LoadError::MalformedSource(_))));
    }
}
