//! Unvalidated records as a parser extracts them: string tags and optional payloads.
//!
//! Converting them checks that the payload matches the tag and produces the
//! typed entities in [`crate::model`].

use crate::error::{MapError, Result};
use crate::gid::TileId;
use crate::model::layer::{Layer, LayerKind, LayerType, TileLayerData};
use crate::model::object::{ObjectShape, Point, Text, TiledObject};
use crate::model::property::Properties;
use crate::model::tileset::Image;

/// Row-major raw cell values and the rectangle they cover.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTileData {
    /// Column of the first cell.
    pub min_x: i32,
    /// Row of the first cell.
    pub min_y: i32,
    /// Columns, may be invalid until converted.
    pub width: i32,
    /// Rows, may be invalid until converted.
    pub height: i32,
    /// Raw values, flip bits included.
    pub cells: Vec<u32>,
}

impl RawTileData {
    /// Cells of a finite layer, origin `(0, 0)`.
    pub fn finite(width: i32, height: i32, cells: Vec<u32>) -> Self {
        RawTileData {
            min_x: 0,
            min_y: 0,
            width,
            height,
            cells,
        }
    }
}

/// A layer before its payload is checked against its tag.
///
/// Common fields mirror [`Layer`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct RawLayer {
    pub id: u32,
    pub name: String,
    /// `tilelayer`, `objectgroup` or `imagelayer`.
    pub kind: String,
    pub width: u32,
    pub height: u32,
    pub visible: bool,
    pub locked: bool,
    pub opacity: f32,
    pub offset_x: f64,
    pub offset_y: f64,
    pub tint_color: Option<String>,
    pub color: Option<String>,
    pub properties: Properties,
    /// Required for, and only allowed on, tile layers.
    pub data: Option<RawTileData>,
    /// Only allowed on object groups.
    pub objects: Option<Vec<TiledObject>>,
    /// Required for, and only allowed on, image layers.
    pub image: Option<Image>,
}

impl RawLayer {
    /// A visible, opaque record with no payload.
    pub fn new(id: u32, name: impl Into<String>, kind: impl Into<String>) -> Self {
        RawLayer {
            id,
            name: name.into(),
            kind: kind.into(),
            width: 0,
            height: 0,
            visible: true,
            locked: false,
            opacity: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            tint_color: None,
            color: None,
            properties: Properties::new(),
            data: None,
            objects: None,
            image: None,
        }
    }
}

impl TryFrom<RawLayer> for Layer {
    type Error = MapError;

    fn try_from(raw: RawLayer) -> Result<Layer> {
        let entity = format!("layer {} '{}'", raw.id, raw.name);
        let ty: LayerType = raw
            .kind
            .parse()
            .map_err(|_| MapError::malformed(&entity, format!("unknown layer type '{}'", raw.kind)))?;

        let kind = match (ty, raw.data, raw.objects, raw.image) {
            (LayerType::TileLayer, Some(d), None, None) => LayerKind::Tiles(
                TileLayerData::from_raw_at(d.min_x, d.min_y, d.width, d.height, &d.cells)?,
            ),
            (LayerType::TileLayer, None, _, _) => {
                return Err(MapError::malformed(entity, "tilelayer without data"));
            }
            (LayerType::ObjectGroup, None, objects, None) => {
                LayerKind::Objects(objects.unwrap_or_default())
            }
            (LayerType::ImageLayer, None, None, Some(img)) => LayerKind::Image(img),
            (LayerType::ImageLayer, None, None, None) => {
                return Err(MapError::malformed(entity, "imagelayer without image"));
            }
            (LayerType::Group, ..) => {
                return Err(MapError::malformed(entity, "group layers are built as Group, not Layer"));
            }
            (ty, ..) => {
                return Err(MapError::malformed(
                    entity,
                    format!("payload does not match layer type '{}'", ty.as_str()),
                ));
            }
        };

        Ok(Layer {
            id: raw.id,
            name: raw.name,
            width: raw.width,
            height: raw.height,
            visible: raw.visible,
            locked: raw.locked,
            opacity: raw.opacity,
            offset_x: raw.offset_x,
            offset_y: raw.offset_y,
            tint_color: raw.tint_color,
            color: raw.color,
            properties: raw.properties,
            kind,
        })
    }
}

/// An object before its shape fields are checked against its tag.
///
/// Placement fields mirror [`TiledObject`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct RawObject {
    pub id: u32,
    pub name: String,
    pub class_name: Option<String>,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
    pub visible: bool,
    /// `tile`, `rectangle`, `point`, `ellipse`, `polygon`, `polyline` or `text`.
    /// When absent the shape is inferred: `gid` makes a tile, `text` a text object, otherwise a rectangle.
    pub object_type: Option<String>,
    /// Raw value, flip bits allowed.
    pub gid: Option<u32>,
    pub text: Option<Text>,
    pub points: Option<Vec<Point>>,
    pub properties: Properties,
}

impl RawObject {
    /// A visible record with no shape data.
    pub fn new(id: u32) -> Self {
        RawObject {
            id,
            name: String::new(),
            class_name: None,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            width: 0.0,
            height: 0.0,
            visible: true,
            object_type: None,
            gid: None,
            text: None,
            points: None,
            properties: Properties::new(),
        }
    }

    fn inferred_tag(&self) -> &str {
        match (&self.object_type, self.gid, &self.text) {
            (Some(t), ..) => t.as_str(),
            (None, Some(_), _) => "tile",
            (None, None, Some(_)) => "text",
            (None, None, None) => "rectangle",
        }
    }
}

impl TryFrom<RawObject> for TiledObject {
    type Error = MapError;

    fn try_from(raw: RawObject) -> Result<TiledObject> {
        let entity = format!("object {}", raw.id);
        let tag = raw.inferred_tag().to_owned();

        let stray = |field: &str| MapError::malformed(&entity, format!("'{field}' on a {tag} object"));
        let expects_points = tag == "polygon" || tag == "polyline";
        if raw.gid.is_some() && tag != "tile" {
            return Err(stray("gid"));
        }
        if raw.text.is_some() && tag != "text" {
            return Err(stray("text"));
        }
        if raw.points.is_some() && !expects_points {
            return Err(stray("points"));
        }

        let shape = match tag.as_str() {
            "tile" => {
                let id = TileId(raw.gid.ok_or_else(|| MapError::malformed(&entity, "tile object without gid"))?);
                if id.is_empty() {
                    return Err(MapError::malformed(&entity, "tile object with gid 0"));
                }
                ObjectShape::Tile(id)
            }
            "rectangle" => ObjectShape::Rectangle,
            "point" => ObjectShape::Point,
            "ellipse" => ObjectShape::Ellipse,
            "polygon" | "polyline" => {
                let pts = raw
                    .points
                    .ok_or_else(|| MapError::malformed(&entity, format!("{tag} object without points")))?;
                if tag == "polygon" {
                    ObjectShape::Polygon(pts)
                } else {
                    ObjectShape::Polyline(pts)
                }
            }
            "text" => ObjectShape::Text(
                raw.text
                    .ok_or_else(|| MapError::malformed(&entity, "text object without text"))?,
            ),
            other => {
                return Err(MapError::malformed(entity, format!("unknown object type '{other}'")));
            }
        };

        Ok(TiledObject {
            id: raw.id,
            name: raw.name,
            class_name: raw.class_name,
            x: raw.x,
            y: raw.y,
            rotation: raw.rotation,
            width: raw.width,
            height: raw.height,
            visible: raw.visible,
            shape,
            properties: raw.properties,
        })
    }
}
