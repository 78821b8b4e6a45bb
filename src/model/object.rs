use crate::error::{MapError, Result};
use crate::gid::TileId;
use crate::model::property::Properties;
use std::str::FromStr;

/// Font used when a text object names none.
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";
/// Font size in pixels when unspecified.
pub const DEFAULT_PIXEL_SIZE: u32 = 16;
/// Opaque black.
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

/// Offset from the owning object's `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal offset in pixels.
    pub x: f32,
    /// Vertical offset in pixels, growing downwards.
    pub y: f32,
}

impl Point {
    /// A point at `(x, y)`.
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
    /// Stretched to both edges.
    Justify,
}

impl FromStr for HAlign {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(HAlign::Left),
            "center" => Ok(HAlign::Center),
            "right" => Ok(HAlign::Right),
            "justify" => Ok(HAlign::Justify),
            other => Err(MapError::malformed("text", format!("unknown halign '{other}'"))),
        }
    }
}

/// Vertical text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    /// Top edge.
    #[default]
    Top,
    /// Middle.
    Center,
    /// Bottom edge.
    Bottom,
}

impl FromStr for VAlign {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "top" => Ok(VAlign::Top),
            "center" => Ok(VAlign::Center),
            "bottom" => Ok(VAlign::Bottom),
            other => Err(MapError::malformed("text", format!("unknown valign '{other}'"))),
        }
    }
}

/// Payload of a text object. [`Default`] gives Tiled's defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    /// The string to draw.
    pub text: String,
    /// Font name.
    pub font_family: String,
    /// Font size in pixels.
    pub pixel_size: u32,
    /// Word-wrap inside the object's box.
    pub wrap: bool,
    /// `#RRGGBB` or `#AARRGGBB`.
    pub color: String,
    /// Bold face.
    pub bold: bool,
    /// Italic face.
    pub italic: bool,
    /// Underlined.
    pub underline: bool,
    /// Struck through.
    pub strikeout: bool,
    /// Use font kerning; on unless the file says otherwise.
    pub kerning: bool,
    /// Horizontal alignment.
    pub h_align: HAlign,
    /// Vertical alignment.
    pub v_align: VAlign,
}

impl Default for Text {
    fn default() -> Self {
        Text {
            text: String::new(),
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            pixel_size: DEFAULT_PIXEL_SIZE,
            wrap: false,
            color: DEFAULT_TEXT_COLOR.to_owned(),
            bold: false,
            italic: false,
            underline: false,
            strikeout: false,
            kerning: true,
            h_align: HAlign::Left,
            v_align: VAlign::Top,
        }
    }
}

/// What an object is. Each variant carries only the data it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectShape {
    /// Raw gid, flip bits included.
    Tile(TileId),
    /// Axis-aligned box of the object's size.
    Rectangle,
    /// A single position; size is ignored.
    Point,
    /// Ellipse inscribed in the object's box.
    Ellipse,
    /// Closed outline.
    Polygon(Vec<Point>),
    /// Open outline.
    Polyline(Vec<Point>),
    /// Rendered text.
    Text(Text),
}

impl ObjectShape {
    /// The tag used in map files.
    pub fn tag(&self) -> &'static str {
        match self {
            ObjectShape::Tile(_) => "tile",
            ObjectShape::Rectangle => "rectangle",
            ObjectShape::Point => "point",
            ObjectShape::Ellipse => "ellipse",
            ObjectShape::Polygon(_) => "polygon",
            ObjectShape::Polyline(_) => "polyline",
            ObjectShape::Text(_) => "text",
        }
    }

    /// Vertices of a polygon or polyline.
    pub fn points(&self) -> Option<&[Point]> {
        match self {
            ObjectShape::Polygon(pts) | ObjectShape::Polyline(pts) => Some(pts),
            _ => None,
        }
    }
}

/// A placed object: common placement data plus its [`ObjectShape`].
#[derive(Debug, Clone, PartialEq)]
pub struct TiledObject {
    /// Unique within the map.
    pub id: u32,
    /// Display name, often empty.
    pub name: String,
    /// User class, if any.
    pub class_name: Option<String>,
    /// Position in pixels.
    pub x: f32,
    /// Position in pixels.
    pub y: f32,
    /// Degrees, clockwise around `(x, y)`.
    pub rotation: f32,
    /// Box width in pixels.
    pub width: f32,
    /// Box height in pixels.
    pub height: f32,
    /// Shown in the editor.
    pub visible: bool,
    /// Kind and kind-specific data.
    pub shape: ObjectShape,
    /// Custom properties.
    pub properties: Properties,
}

impl TiledObject {
    /// A visible object at the origin with zero size.
    pub fn new(id: u32, shape: ObjectShape) -> Self {
        TiledObject {
            id,
            name: String::new(),
            class_name: None,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            width: 0.0,
            height: 0.0,
            visible: true,
            shape,
            properties: Properties::new(),
        }
    }

    /// Raw gid of a tile object.
    pub fn tile_id(&self) -> Option<TileId> {
        match self.shape {
            ObjectShape::Tile(id) => Some(id),
            _ => None,
        }
    }

    /// Payload of a text object.
    pub fn text(&self) -> Option<&Text> {
        match &self.shape {
            ObjectShape::Text(t) => Some(t),
            _ => None,
        }
    }

    /// See [`ObjectShape::points`].
    pub fn points(&self) -> Option<&[Point]> {
        self.shape.points()
    }
}
