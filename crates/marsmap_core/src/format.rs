//! On-disk tileset descriptor shapes (Tiled TSX and Tiled JSON)
//!
//! Both formats are read into serde structs that mirror the file layout, then
//! normalized into a [`SourceTileset`] for validation by the loader.

use crate::atlas::{AtlasImage, AtlasInfo};
use crate::loader::LoadError;
use serde::Deserialize;

/// Descriptor format of a tileset source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TilesetFormat {
    /// Tiled XML tileset (`.tsx`)
    Tsx,
    /// Tiled JSON tileset (`.json`, `.tsj`)
    Json,
}

impl TilesetFormat {
    /// Guess the format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "tsx" | "xml" => Some(TilesetFormat::Tsx),
            "json" | "tsj" => Some(TilesetFormat::Json),
            _ => None,
        }
    }
}

/// Format-neutral tileset, before validation
#[derive(Debug, Clone)]
pub(crate) struct SourceTileset {
    pub name: String,
    pub version: Option<String>,
    pub atlas: AtlasInfo,
    pub terrains: Vec<SourceTerrain>,
    pub tiles: Vec<SourceTile>,
}

#[derive(Debug, Clone)]
pub(crate) struct SourceTerrain {
    pub name: String,
    /// Icon tile id; negative means none
    pub tile: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct SourceTile {
    pub id: u32,
    /// Raw corner fields; `None` entries are empty corners
    pub terrain: Option<Vec<Option<i64>>>,
    pub probability: Option<f64>,
    pub properties: Vec<SourceProperty>,
}

#[derive(Debug, Clone)]
pub(crate) struct SourceProperty {
    pub name: String,
    pub value: String,
}

// ─── TSX ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TsxTileset {
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@version")]
    version: Option<String>,
    #[serde(rename = "@tilewidth")]
    tile_width: u32,
    #[serde(rename = "@tileheight")]
    tile_height: u32,
    #[serde(rename = "@tilecount")]
    tile_count: Option<u32>,
    #[serde(rename = "@columns")]
    columns: u32,
    #[serde(rename = "@margin", default)]
    margin: u32,
    #[serde(rename = "@spacing", default)]
    spacing: u32,
    image: Option<TsxImage>,
    terraintypes: Option<TsxTerrainTypes>,
    #[serde(rename = "tile", default)]
    tiles: Vec<TsxTile>,
}

#[derive(Debug, Deserialize)]
struct TsxImage {
    #[serde(rename = "@source")]
    source: String,
    #[serde(rename = "@width", default)]
    width: u32,
    #[serde(rename = "@height", default)]
    height: u32,
}

#[derive(Debug, Deserialize)]
struct TsxTerrainTypes {
    #[serde(rename = "terrain", default)]
    terrains: Vec<TsxTerrain>,
}

#[derive(Debug, Deserialize)]
struct TsxTerrain {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@tile", default = "no_tile")]
    tile: i64,
}

#[derive(Debug, Deserialize)]
struct TsxTile {
    #[serde(rename = "@id")]
    id: u32,
    #[serde(rename = "@terrain")]
    terrain: Option<String>,
    #[serde(rename = "@probability")]
    probability: Option<f64>,
    properties: Option<TsxProperties>,
}

#[derive(Debug, Deserialize)]
struct TsxProperties {
    #[serde(rename = "property", default)]
    properties: Vec<TsxProperty>,
}

#[derive(Debug, Deserialize)]
struct TsxProperty {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@value")]
    value: Option<String>,
}

fn no_tile() -> i64 {
    -1
}

/// Parse a `terrain="a,b,c,d"` attribute; empty fields are empty corners
fn parse_terrain_attr(tile: u32, attr: &str) -> Result<Vec<Option<i64>>, LoadError> {
    attr.split(',')
        .map(|field| {
            let field = field.trim();
            if field.is_empty() {
                return Ok(None);
            }
            field.parse::<i64>().map(Some).map_err(|_| {
                LoadError::MalformedSource(format!(
                    "tile {tile}: invalid terrain field '{field}'"
                ))
            })
        })
        .collect()
}

pub(crate) fn parse_tsx(xml: &str) -> Result<SourceTileset, LoadError> {
    let raw: TsxTileset = quick_xml::de::from_str(xml)
        .map_err(|e| LoadError::MalformedSource(format!("invalid TSX: {e}")))?;

    let mut atlas = AtlasInfo::new(raw.tile_width, raw.tile_height, raw.columns)
        .with_margin_and_spacing(raw.margin, raw.spacing);
    atlas.tile_count = raw.tile_count;
    atlas.image = raw
        .image
        .map(|img| AtlasImage::new(img.source, img.width, img.height));

    let terrains = raw
        .terraintypes
        .map(|t| t.terrains)
        .unwrap_or_default()
        .into_iter()
        .map(|t| SourceTerrain {
            name: t.name,
            tile: t.tile,
        })
        .collect();

    let tiles = raw
        .tiles
        .into_iter()
        .map(|tile| {
            let terrain = tile
                .terrain
                .as_deref()
                .map(|attr| parse_terrain_attr(tile.id, attr))
                .transpose()?;
            let properties = tile
                .properties
                .map(|p| p.properties)
                .unwrap_or_default()
                .into_iter()
                .filter_map(|p| {
                    p.value.map(|value| SourceProperty {
                        name: p.name,
                        value,
                    })
                })
                .collect();
            Ok(SourceTile {
                id: tile.id,
                terrain,
                probability: tile.probability,
                properties,
            })
        })
        .collect::<Result<Vec<_>, LoadError>>()?;

    Ok(SourceTileset {
        name: raw.name,
        version: raw.version,
        atlas,
        terrains,
        tiles,
    })
}

// ─── JSON ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct JsonTileset {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: Option<serde_json::Value>,
    tilewidth: u32,
    tileheight: u32,
    #[serde(default)]
    tilecount: Option<u32>,
    columns: u32,
    #[serde(default)]
    margin: u32,
    #[serde(default)]
    spacing: u32,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    imagewidth: u32,
    #[serde(default)]
    imageheight: u32,
    #[serde(default)]
    terrains: Vec<JsonTerrain>,
    #[serde(default)]
    tiles: Vec<JsonTile>,
}

#[derive(Debug, Deserialize)]
struct JsonTerrain {
    name: String,
    #[serde(default = "no_tile")]
    tile: i64,
}

#[derive(Debug, Deserialize)]
struct JsonTile {
    id: u32,
    #[serde(default)]
    terrain: Option<Vec<i64>>,
    #[serde(default)]
    probability: Option<f64>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

#[derive(Debug, Deserialize)]
struct JsonProperty {
    name: String,
    value: serde_json::Value,
}

/// Render a JSON scalar as the string form TSX would carry
fn json_scalar(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn parse_json(json: &str) -> Result<SourceTileset, LoadError> {
    let raw: JsonTileset = serde_json::from_str(json)
        .map_err(|e| LoadError::MalformedSource(format!("invalid tileset JSON: {e}")))?;

    let mut atlas = AtlasInfo::new(raw.tilewidth, raw.tileheight, raw.columns)
        .with_margin_and_spacing(raw.margin, raw.spacing);
    atlas.tile_count = raw.tilecount;
    atlas.image = raw
        .image
        .map(|source| AtlasImage::new(source, raw.imagewidth, raw.imageheight));

    let terrains = raw
        .terrains
        .into_iter()
        .map(|t| SourceTerrain {
            name: t.name,
            tile: t.tile,
        })
        .collect();

    let tiles = raw
        .tiles
        .into_iter()
        .map(|tile| SourceTile {
            id: tile.id,
            // Tiled JSON marks empty corners with -1
            terrain: tile.terrain.map(|fields| {
                fields
                    .into_iter()
                    .map(|t| if t == -1 { None } else { Some(t) })
                    .collect()
            }),
            probability: tile.probability,
            properties: tile
                .properties
                .into_iter()
                .filter_map(|p| {
                    json_scalar(p.value).map(|value| SourceProperty {
                        name: p.name,
                        value,
                    })
                })
                .collect(),
        })
        .collect();

    Ok(SourceTileset {
        name: raw.name,
        version: raw.version.and_then(json_scalar),
        atlas,
        terrains,
        tiles,
    })
}
