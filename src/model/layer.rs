use crate::error::{MapError, Result};
use crate::gid::{Cell, FlipFlags, TileId};
use crate::grid::{BoundedGrid, Dim};
use crate::model::object::TiledObject;
use crate::model::property::Properties;
use crate::model::tileset::Image;
use std::str::FromStr;

/// Layer tags as they appear in map files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    /// `tilelayer`
    TileLayer,
    /// `objectgroup`
    ObjectGroup,
    /// `imagelayer`
    ImageLayer,
    /// `group`; built as a [`crate::Group`], never as a [`Layer`].
    Group,
}

impl LayerType {
    /// The tag text.
    pub fn as_str(self) -> &'static str {
        match self {
            LayerType::TileLayer => "tilelayer",
            LayerType::ObjectGroup => "objectgroup",
            LayerType::ImageLayer => "imagelayer",
            LayerType::Group => "group",
        }
    }
}

impl FromStr for LayerType {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tilelayer" => Ok(LayerType::TileLayer),
            "objectgroup" => Ok(LayerType::ObjectGroup),
            "imagelayer" => Ok(LayerType::ImageLayer),
            "group" => Ok(LayerType::Group),
            other => Err(MapError::malformed("layer", format!("unknown layer type '{other}'"))),
        }
    }
}

/// Tile ids and their orientation, split into two same-shaped grids.
///
/// `data` holds bare gids so gid-only scans never touch flag bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayerData {
    data: BoundedGrid<u32>,
    flip_flags: BoundedGrid<FlipFlags>,
}

impl TileLayerData {
    /// Empty layer data covering `[min_x, min_x + width) × [min_y, min_y + height)`.
    pub fn new(min_x: i32, min_y: i32, width: i32, height: i32) -> Result<Self> {
        Ok(TileLayerData {
            data: BoundedGrid::new(min_x, min_y, width, height)?,
            flip_flags: BoundedGrid::new(min_x, min_y, width, height)?,
        })
    }

    /// Decodes a row-major run of raw cell values at origin `(0, 0)`.
    pub fn from_raw(width: i32, height: i32, raw: &[u32]) -> Result<Self> {
        Self::from_raw_at(0, 0, width, height, raw)
    }

    /// Like [`TileLayerData::from_raw`] with the first cell at `(min_x, min_y)`.
    pub fn from_raw_at(min_x: i32, min_y: i32, width: i32, height: i32, raw: &[u32]) -> Result<Self> {
        let (gids, flags): (Vec<u32>, Vec<FlipFlags>) = raw
            .iter()
            .map(|&r| {
                let cell = TileId(r).decode();
                (cell.gid, cell.flags)
            })
            .unzip();
        Ok(TileLayerData {
            data: BoundedGrid::from_row_major(min_x, min_y, width, height, gids)?,
            flip_flags: BoundedGrid::from_row_major(min_x, min_y, width, height, flags)?,
        })
    }

    /// Bare gids, `0` for an empty cell.
    pub fn data(&self) -> &BoundedGrid<u32> {
        &self.data
    }

    /// Orientation of each cell, same bounds as [`TileLayerData::data`].
    pub fn flip_flags(&self) -> &BoundedGrid<FlipFlags> {
        &self.flip_flags
    }

    /// Gid and flags at `(x, y)`.
    pub fn cell(&self, x: i32, y: i32) -> Result<Cell> {
        Ok(Cell {
            gid: *self.data.get(x, y)?,
            flags: *self.flip_flags.get(x, y)?,
        })
    }

    /// Writes a raw cell value, splitting it the same way ingest does.
    pub fn set_raw(&mut self, x: i32, y: i32, raw: u32) -> Result<()> {
        self.set_cell(x, y, TileId(raw).decode())
    }

    /// Stores a decoded cell. Flags on an empty cell are dropped.
    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) -> Result<()> {
        let flags = if cell.is_empty() { FlipFlags::empty() } else { cell.flags };
        self.data.set(x, y, cell.gid)?;
        self.flip_flags.set(x, y, flags)
    }

    /// The raw value Tiled would have written for this cell.
    pub fn raw(&self, x: i32, y: i32) -> Result<TileId> {
        Ok(self.cell(x, y)?.encode())
    }

    /// Columns covered.
    pub fn width(&self) -> usize {
        self.data.length(Dim::X)
    }

    /// Rows covered.
    pub fn height(&self) -> usize {
        self.data.length(Dim::Y)
    }

    /// Occupied cells with their coordinates, row-major.
    pub fn non_empty_cells(&self) -> impl Iterator<Item = ((i32, i32), Cell)> + '_ {
        self.data
            .iter()
            .zip(self.flip_flags.as_slice())
            .filter(|((_, gid), _)| **gid != 0)
            .map(|((pos, gid), flags)| (pos, Cell { gid: *gid, flags: *flags }))
    }
}

/// The payload that matches a layer's type.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    /// Cell grid of a tile layer.
    Tiles(TileLayerData),
    /// Objects of an object group, in file order.
    Objects(Vec<TiledObject>),
    /// The picture of an image layer.
    Image(Image),
}

/// A leaf of the layer tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Unique among layers and groups.
    pub id: u32,
    /// Display name; not required to be unique.
    pub name: String,
    /// Tile counts; zero for non-tile layers.
    pub width: u32,
    /// See `width`.
    pub height: u32,
    /// Shown in the editor.
    pub visible: bool,
    /// Locked against editing.
    pub locked: bool,
    /// 0.0 to 1.0.
    pub opacity: f32,
    /// Pixel offset.
    pub offset_x: f64,
    /// Pixel offset.
    pub offset_y: f64,
    /// Multiplied into rendered colors.
    pub tint_color: Option<String>,
    /// Object group display color.
    pub color: Option<String>,
    /// Custom properties.
    pub properties: Properties,
    /// Type-specific payload.
    pub kind: LayerKind,
}

impl Layer {
    /// A visible, opaque layer. Tile layers take their size from the payload.
    pub fn new(id: u32, name: impl Into<String>, kind: LayerKind) -> Self {
        let (width, height) = match &kind {
            LayerKind::Tiles(t) => (t.width() as u32, t.height() as u32),
            _ => (0, 0),
        };
        Layer {
            id,
            name: name.into(),
            width,
            height,
            visible: true,
            locked: false,
            opacity: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            tint_color: None,
            color: None,
            properties: Properties::new(),
            kind,
        }
    }

    /// Tag derived from the payload.
    pub fn layer_type(&self) -> LayerType {
        match self.kind {
            LayerKind::Tiles(_) => LayerType::TileLayer,
            LayerKind::Objects(_) => LayerType::ObjectGroup,
            LayerKind::Image(_) => LayerType::ImageLayer,
        }
    }

    /// Cells of a tile layer.
    pub fn tiles(&self) -> Option<&TileLayerData> {
        match &self.kind {
            LayerKind::Tiles(t) => Some(t),
            _ => None,
        }
    }

    /// Mutable cells of a tile layer.
    pub fn tiles_mut(&mut self) -> Option<&mut TileLayerData> {
        match &mut self.kind {
            LayerKind::Tiles(t) => Some(t),
            _ => None,
        }
    }

    /// Objects of an object group; empty for every other layer type.
    pub fn objects(&self) -> &[TiledObject] {
        match &self.kind {
            LayerKind::Objects(objs) => objs,
            _ => &[],
        }
    }

    /// Picture of an image layer.
    pub fn image(&self) -> Option<&Image> {
        match &self.kind {
            LayerKind::Image(img) => Some(img),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gid::{FLIP_H, FLIP_V};

    #[test]
    fn ingest_splits_gid_and_flags() {
        let raw = [0, FLIP_H | FLIP_V | 5, 3, FLIP_V];
        let tiles = TileLayerData::from_raw(2, 2, &raw).unwrap();

        assert_eq!(tiles.data().as_slice(), &[0, 5, 3, 0]);
        let c = tiles.cell(1, 0).unwrap();
        assert_eq!(c.gid, 5);
        assert_eq!(c.flags, FlipFlags::HORIZONTAL | FlipFlags::VERTICAL);
        assert_eq!(tiles.cell(1, 1).unwrap(), Cell::default());
        assert_eq!(tiles.raw(1, 0).unwrap(), TileId(FLIP_H | FLIP_V | 5));
    }

    #[test]
    fn ingest_rejects_short_buffer() {
        let err = TileLayerData::from_raw(2, 2, &[1, 2, 3]).unwrap_err();
        assert!(matches!(err, MapError::InvalidDimension { .. }));
    }

    #[test]
    fn both_grids_share_bounds() {
        let mut tiles = TileLayerData::new(-4, 2, 3, 3).unwrap();
        tiles.set_raw(-2, 4, FLIP_H | 9).unwrap();
        assert_eq!(tiles.flip_flags().lower_bound(Dim::X), -4);
        assert_eq!(*tiles.flip_flags().get(-2, 4).unwrap(), FlipFlags::HORIZONTAL);
        assert!(tiles.set_raw(-1, 4, 1).is_err());

        let cells: Vec<_> = tiles.non_empty_cells().collect();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].0, (-2, 4));
        assert_eq!(cells[0].1.gid, 9);
    }

    #[test]
    fn layer_type_follows_payload() {
        let layer = Layer::new(1, "ground", LayerKind::Tiles(TileLayerData::from_raw(3, 1, &[1, 2, 3]).unwrap()));
        assert_eq!(layer.layer_type(), LayerType::TileLayer);
        assert_eq!((layer.width, layer.height), (3, 1));
        assert!(layer.objects().is_empty());
        assert!(layer.image().is_none());

        let layer = Layer::new(2, "sky", LayerKind::Image(Image::default()));
        assert_eq!(layer.layer_type().as_str(), "imagelayer");
        assert!(layer.tiles().is_none());
    }
}
