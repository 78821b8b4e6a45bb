// src/loader/json_loader.rs
use crate::error::{MapError, Result};
use crate::loader::options::LoadOptions;
use crate::model::group::Group;
use crate::model::layer::Layer;
use crate::model::map::Map;
use crate::model::object::{Point, Text, TiledObject};
use crate::model::property::{Properties, Property};
use crate::model::tileset::{
    parse_terrain, AnimationFrame, Image, Terrain, Tile, Tileset, TilesetRef, NO_TERRAIN,
};
use crate::raw::{RawLayer, RawObject, RawTileData};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Deserialize)]
struct JsonMap {
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    tilewidth: u32,
    tileheight: u32,
    #[serde(default = "default_orientation")]
    orientation: String,
    #[serde(default)]
    infinite: bool,
    #[serde(default)]
    backgroundcolor: Option<String>,
    #[serde(default)]
    layers: Vec<JsonLayer>,
    #[serde(default)]
    tilesets: Vec<JsonTileset>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

/// Layer cells: a plain array, or a string for base64 payloads.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonData {
    Cells(Vec<u32>),
    Encoded(String),
}

#[derive(Deserialize)]
struct JsonChunk {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    data: JsonData,
}

#[derive(Deserialize)]
struct JsonLayer {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default = "default_layer_type")]
    kind: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    locked: bool,
    #[serde(default = "one")]
    opacity: f32,
    #[serde(default)]
    offsetx: f64,
    #[serde(default)]
    offsety: f64,
    #[serde(default)]
    tintcolor: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
    #[serde(default)]
    data: Option<JsonData>,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    compression: Option<String>,
    #[serde(default)]
    chunks: Option<Vec<JsonChunk>>,
    #[serde(default)]
    objects: Option<Vec<JsonObject>>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    imagewidth: u32,
    #[serde(default)]
    imageheight: u32,
    /// Children of a `group` layer.
    #[serde(default)]
    layers: Vec<JsonLayer>,
}

fn default_true() -> bool {
    true
}
fn one() -> f32 {
    1.0
}
fn default_layer_type() -> String {
    "tilelayer".to_owned()
}
fn default_orientation() -> String {
    "orthogonal".to_owned()
}

#[derive(Deserialize)]
struct JsonTileset {
    #[serde(default)]
    firstgid: u32,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    tilewidth: u32,
    #[serde(default)]
    tileheight: u32,
    #[serde(default)]
    tilecount: u32,
    #[serde(default)]
    columns: u32,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    imagewidth: u32,
    #[serde(default)]
    imageheight: u32,
    #[serde(default)]
    spacing: u32,
    #[serde(default)]
    margin: u32,
    #[serde(default)]
    properties: Vec<JsonProperty>,
    #[serde(default)]
    tiles: Vec<JsonTile>,
    #[serde(default)]
    terrains: Vec<JsonTerrain>,
}

#[derive(Deserialize)]
struct JsonProperty {
    name: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    propertytype: Option<String>,
    #[serde(default)]
    value: JsonValue,
}

#[derive(Deserialize)]
struct JsonTerrain {
    name: String,
    tile: u32,
}

#[derive(Deserialize)]
struct JsonFrame {
    tileid: u32,
    duration: u32,
}

/// Older files write the terrain as a 4-int array, the TMX-derived form is a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonTerrainCorners {
    Ints(Vec<i32>),
    Text(String),
}

#[derive(Deserialize)]
struct JsonTile {
    id: u32,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    class: Option<String>,
    #[serde(default)]
    terrain: Option<JsonTerrainCorners>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
    #[serde(default)]
    animation: Vec<JsonFrame>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    imagewidth: u32,
    #[serde(default)]
    imageheight: u32,
}

#[derive(Deserialize)]
struct JsonObject {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    class: String,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
    #[serde(default)]
    rotation: f32,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    point: bool,
    #[serde(default)]
    ellipse: bool,
    #[serde(default)]
    polygon: Option<Vec<JsonObjectPoint>>,
    #[serde(default)]
    polyline: Option<Vec<JsonObjectPoint>>,
    #[serde(default)]
    text: Option<JsonText>,
    #[serde(default)]
    gid: Option<u32>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

#[derive(Deserialize)]
struct JsonObjectPoint {
    x: f32,
    y: f32,
}

#[derive(Deserialize)]
struct JsonText {
    #[serde(default)]
    text: String,
    #[serde(default)]
    fontfamily: Option<String>,
    #[serde(default)]
    pixelsize: Option<u32>,
    #[serde(default)]
    wrap: bool,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    italic: bool,
    #[serde(default)]
    underline: bool,
    #[serde(default)]
    strikeout: bool,
    #[serde(default)]
    kerning: Option<bool>,
    #[serde(default)]
    halign: Option<String>,
    #[serde(default)]
    valign: Option<String>,
}

fn property_value_to_string(value: JsonValue) -> String {
    match value {
        JsonValue::String(s) => s,
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn properties_from_json(props: Vec<JsonProperty>) -> Result<Properties> {
    let mut out = Properties::new();
    for p in props {
        let value = property_value_to_string(p.value);
        out.insert(Property::from_attributes(
            &p.name,
            p.kind.as_deref(),
            p.propertytype.as_deref(),
            &value,
        )?)?;
    }
    Ok(out)
}

fn text_from_json(t: JsonText) -> Result<Text> {
    let mut text = Text {
        text: t.text,
        wrap: t.wrap,
        bold: t.bold,
        italic: t.italic,
        underline: t.underline,
        strikeout: t.strikeout,
        ..Text::default()
    };
    if let Some(f) = t.fontfamily {
        text.font_family = f;
    }
    if let Some(px) = t.pixelsize {
        text.pixel_size = px;
    }
    if let Some(c) = t.color {
        text.color = c;
    }
    if let Some(k) = t.kerning {
        text.kerning = k;
    }
    if let Some(h) = t.halign {
        text.h_align = h.parse()?;
    }
    if let Some(v) = t.valign {
        text.v_align = v.parse()?;
    }
    Ok(text)
}

fn points_from_json(pts: Vec<JsonObjectPoint>) -> Vec<Point> {
    pts.into_iter().map(|p| Point::new(p.x, p.y)).collect()
}

fn object_from_json(obj: JsonObject) -> Result<TiledObject> {
    let object_type = if obj.gid.is_some() {
        "tile"
    } else if obj.point {
        "point"
    } else if obj.ellipse {
        "ellipse"
    } else if obj.polygon.is_some() {
        "polygon"
    } else if obj.polyline.is_some() {
        "polyline"
    } else if obj.text.is_some() {
        "text"
    } else {
        "rectangle"
    };

    let class_name = if !obj.class.is_empty() {
        Some(obj.class)
    } else if !obj.kind.is_empty() {
        Some(obj.kind)
    } else {
        None
    };

    let points = obj.polygon.or(obj.polyline).map(points_from_json);

    TiledObject::try_from(RawObject {
        id: obj.id,
        name: obj.name,
        class_name,
        x: obj.x,
        y: obj.y,
        rotation: obj.rotation,
        width: obj.width,
        height: obj.height,
        visible: obj.visible,
        object_type: Some(object_type.to_owned()),
        gid: obj.gid,
        text: obj.text.map(text_from_json).transpose()?,
        points,
        properties: properties_from_json(obj.properties)?,
    })
}

fn image_from_json(source: String, width: u32, height: u32) -> Image {
    Image {
        width,
        height,
        source,
    }
}

fn tile_from_json(t: JsonTile) -> Result<Tile> {
    let terrain = match t.terrain {
        None => [NO_TERRAIN; 4],
        Some(JsonTerrainCorners::Text(s)) => parse_terrain(&s)?,
        Some(JsonTerrainCorners::Ints(v)) => <[i32; 4]>::try_from(v.as_slice()).map_err(|_| {
            MapError::malformed(format!("tile {}", t.id), "terrain needs 4 corners")
        })?,
    };
    Ok(Tile {
        id: t.id,
        kind: t.class.or(t.kind),
        terrain,
        properties: properties_from_json(t.properties)?,
        animation: t
            .animation
            .into_iter()
            .map(|f| AnimationFrame::new(f.tileid, f.duration))
            .collect::<Result<Vec<_>>>()?,
        image: t
            .image
            .map(|src| image_from_json(src, t.imagewidth, t.imageheight)),
    })
}

fn tileset_from_json(ts: JsonTileset) -> Result<Tileset> {
    Ok(Tileset {
        name: ts.name,
        tile_width: ts.tilewidth,
        tile_height: ts.tileheight,
        spacing: ts.spacing,
        margin: ts.margin,
        tile_count: ts.tilecount,
        columns: ts.columns,
        image: ts
            .image
            .map(|src| image_from_json(src, ts.imagewidth, ts.imageheight)),
        tiles: ts
            .tiles
            .into_iter()
            .map(tile_from_json)
            .collect::<Result<Vec<_>>>()?,
        terrains: ts
            .terrains
            .into_iter()
            .map(|t| Terrain {
                name: t.name,
                tile: t.tile,
            })
            .collect(),
        properties: properties_from_json(ts.properties)?,
    })
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&txt).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn tileset_ref_from_json(ts: JsonTileset, map_dir: &Path, opts: &LoadOptions) -> Result<TilesetRef> {
    let first_gid = ts.firstgid;
    let source = match ts.source.clone() {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(TilesetRef::embedded(first_gid, tileset_from_json(ts)?)),
    };

    if !opts.load_external_tilesets {
        debug!(first_gid, source = %source, "keeping external tileset unread");
        return Ok(TilesetRef::external(first_gid, source));
    }
    if !source.ends_with(".json") {
        warn!(first_gid, source = %source, "external tileset is not JSON, keeping reference only");
        return Ok(TilesetRef::external(first_gid, source));
    }

    let ext: JsonTileset = read_json(&map_dir.join(&source))?;
    Ok(TilesetRef {
        first_gid,
        source,
        tileset: Some(tileset_from_json(ext)?),
    })
}

fn cells(data: JsonData, entity: &str) -> Result<Vec<u32>> {
    match data {
        JsonData::Cells(c) => Ok(c),
        JsonData::Encoded(_) => Err(MapError::malformed(
            entity,
            "encoded layer data must be decoded before ingest",
        )),
    }
}

/// Merges infinite-map chunks into one rectangle spanning their bounding box.
fn merge_chunks(chunks: Vec<JsonChunk>, entity: &str) -> Result<RawTileData> {
    if chunks.is_empty() {
        return Ok(RawTileData::default());
    }
    let mut parts = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        if chunk.width < 0 || chunk.height < 0 {
            return Err(MapError::InvalidDimension {
                width: chunk.width as i64,
                height: chunk.height as i64,
            });
        }
        let data = cells(chunk.data, entity)?;
        let expected = chunk.width as usize * chunk.height as usize;
        if data.len() != expected {
            return Err(MapError::malformed(
                entity,
                format!(
                    "chunk at ({}, {}) has {} cells, expected {}",
                    chunk.x,
                    chunk.y,
                    data.len(),
                    expected
                ),
            ));
        }
        parts.push((chunk.x, chunk.y, chunk.width, chunk.height, data));
    }

    let min_x = parts.iter().map(|p| p.0).min().unwrap_or(0);
    let min_y = parts.iter().map(|p| p.1).min().unwrap_or(0);
    let max_x = parts.iter().map(|p| p.0 as i64 + p.2 as i64).max().unwrap_or(0);
    let max_y = parts.iter().map(|p| p.1 as i64 + p.3 as i64).max().unwrap_or(0);
    let width = i32::try_from(max_x - min_x as i64)
        .map_err(|_| MapError::malformed(entity, "chunks span too wide"))?;
    let height = i32::try_from(max_y - min_y as i64)
        .map_err(|_| MapError::malformed(entity, "chunks span too tall"))?;
    if max_x - 1 > i32::MAX as i64 || max_y - 1 > i32::MAX as i64 {
        return Err(MapError::InvalidDimension {
            width: width as i64,
            height: height as i64,
        });
    }

    let len = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| MapError::malformed(entity, "chunks span too large"))?;
    let mut merged = Vec::new();
    merged
        .try_reserve_exact(len)
        .map_err(|_| MapError::malformed(entity, format!("cannot allocate {width}x{height} cells")))?;
    merged.resize(len, 0u32);

    for (x, y, cw, _, data) in parts {
        let cw = cw as usize;
        let ox = (x as i64 - min_x as i64) as usize;
        let oy = (y as i64 - min_y as i64) as usize;
        for (i, raw) in data.into_iter().enumerate() {
            merged[(oy + i / cw) * width as usize + ox + i % cw] = raw;
        }
    }

    Ok(RawTileData {
        min_x,
        min_y,
        width,
        height,
        cells: merged,
    })
}

fn tile_data_from_json(l: &mut JsonLayer, entity: &str) -> Result<Option<RawTileData>> {
    match l.encoding.as_deref() {
        None | Some("csv") => {}
        Some(other) => {
            return Err(MapError::malformed(
                entity,
                format!("layer data encoding '{other}' must be decoded before ingest"),
            ))
        }
    }
    if let Some(c) = l.compression.as_deref().filter(|c| !c.is_empty()) {
        return Err(MapError::malformed(
            entity,
            format!("compressed layer data ('{c}') must be decompressed before ingest"),
        ));
    }

    if let Some(chunks) = l.chunks.take() {
        return merge_chunks(chunks, entity).map(Some);
    }
    match l.data.take() {
        Some(data) => {
            let w = i32::try_from(l.width).map_err(|_| MapError::malformed(entity, "width out of range"))?;
            let h = i32::try_from(l.height).map_err(|_| MapError::malformed(entity, "height out of range"))?;
            let cells = cells(data, entity)?;
            if cells.len() != l.width as usize * l.height as usize {
                return Err(MapError::malformed(
                    entity,
                    format!(
                        "data length {} does not match {}x{}",
                        cells.len(),
                        l.width,
                        l.height
                    ),
                ));
            }
            Ok(Some(RawTileData::finite(w, h, cells)))
        }
        None => Ok(None),
    }
}

enum Node {
    Layer(Layer),
    Group(Group),
}

fn node_from_json(mut l: JsonLayer) -> Result<Node> {
    let entity = format!("layer {} '{}'", l.id, l.name);
    let properties = properties_from_json(std::mem::take(&mut l.properties))?;

    if l.kind == "group" {
        let mut group = Group::new(l.id, l.name);
        group.visible = l.visible;
        group.locked = l.locked;
        group.properties = properties;
        for child in l.layers {
            match node_from_json(child)? {
                Node::Layer(layer) => group.layers.push(layer),
                Node::Group(g) => group.groups.push(g),
            }
        }
        return Ok(Node::Group(group));
    }

    let data = if l.kind == "tilelayer" {
        tile_data_from_json(&mut l, &entity)?
    } else {
        None
    };
    let objects = match l.objects.take() {
        Some(objs) => Some(
            objs.into_iter()
                .map(object_from_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        None => None,
    };
    let image = l
        .image
        .take()
        .filter(|s| !s.is_empty())
        .map(|src| image_from_json(src, l.imagewidth, l.imageheight));

    let layer = Layer::try_from(RawLayer {
        id: l.id,
        name: l.name,
        kind: l.kind,
        width: l.width,
        height: l.height,
        visible: l.visible,
        locked: l.locked,
        opacity: l.opacity,
        offset_x: l.offsetx,
        offset_y: l.offsety,
        tint_color: l.tintcolor,
        color: l.color,
        properties,
        data,
        objects,
        image,
    })?;
    Ok(Node::Layer(layer))
}

fn map_from_json(j: JsonMap, map_dir: &Path, opts: &LoadOptions) -> Result<Map> {
    let mut tilesets = j
        .tilesets
        .into_iter()
        .map(|ts| tileset_ref_from_json(ts, map_dir, opts))
        .collect::<Result<Vec<_>>>()?;
    // Sort by first_gid so resolution can binary search
    tilesets.sort_by_key(|t| t.first_gid);

    let mut layers = Vec::new();
    let mut groups = Vec::new();
    for l in j.layers {
        match node_from_json(l)? {
            Node::Layer(layer) => layers.push(layer),
            Node::Group(g) => groups.push(g),
        }
    }

    let map = Map {
        width: j.width,
        height: j.height,
        tile_width: j.tilewidth,
        tile_height: j.tileheight,
        orientation: j.orientation,
        infinite: j.infinite,
        background_color: j.backgroundcolor,
        properties: properties_from_json(j.properties)?,
        tilesets,
        layers,
        groups,
    };
    if opts.validate {
        map.validate()?;
    }
    debug!(
        layers = map.layers().count(),
        groups = map.groups().count(),
        tilesets = map.tilesets.len(),
        "map loaded"
    );
    Ok(map)
}

/// Loads a Tiled JSON map. External tilesets resolve relative to the map's directory.
pub fn decode_map_file(path: &Path, opts: &LoadOptions) -> Result<Map> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(MapError::UnsupportedFormat(path.display().to_string()));
    }
    let j: JsonMap = read_json(path)?;
    let map_dir = path
        .parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./"));
    map_from_json(j, &map_dir, opts)
}

/// Loads a Tiled JSON map from memory. External tilesets resolve relative to `base_dir`.
pub fn decode_map_str(json: &str, base_dir: &Path, opts: &LoadOptions) -> Result<Map> {
    let j: JsonMap = serde_json::from_str(json)?;
    map_from_json(j, base_dir, opts)
}
