#![warn(missing_docs)]

//! In-memory document model for Tiled maps.
//!
//! Tile layers keep their cells in [`BoundedGrid`]s addressed by arbitrary
//! integer ranges, split into bare gids and per-cell [`FlipFlags`]. A [`Map`]
//! owns its tileset list, layers and group tree and answers gid, id and
//! traversal queries over them.

mod error;
/// Raw cell values and their flip bits.
pub mod gid;
/// Rectangular storage with a movable origin.
pub mod grid;
mod loader;
pub mod model;
pub mod raw;
pub mod resolve;
pub mod traverse;

pub use error::{MapError, Result};
pub use gid::{Cell, FlipFlags, TileId};
pub use grid::{BoundedGrid, Dim};
pub use loader::options::LoadOptions;
pub use model::group::Group;
pub use model::layer::{Layer, LayerKind, LayerType, TileLayerData};
pub use model::map::Map;
pub use model::object::{HAlign, ObjectShape, Point, Text, TiledObject, VAlign};
pub use model::property::{Properties, Property, PropertyType};
pub use model::tileset::{AnimationFrame, Image, Terrain, Tile, Tileset, TilesetMetrics, TilesetRef};
pub use raw::{RawLayer, RawObject, RawTileData};
pub use resolve::SourceRect;
