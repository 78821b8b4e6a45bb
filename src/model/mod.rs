//! Document entities of a parsed map.

/// Group nodes of the layer tree.
pub mod group;
/// Tile, object and image layers.
pub mod layer;
/// The map root and its queries.
pub mod map;
/// Objects and their shapes.
pub mod object;
/// Typed custom properties.
pub mod property;
/// Tilesets, per-tile metadata and tileset references.
pub mod tileset;
