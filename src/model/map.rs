use crate::error::{MapError, Result};
use crate::gid::GID_MASK;
use crate::loader::json_loader::{decode_map_file, decode_map_str};
use crate::loader::options::LoadOptions;
use crate::model::group::Group;
use crate::model::layer::Layer;
use crate::model::object::TiledObject;
use crate::model::property::Properties;
use crate::model::tileset::{Tile, Tileset, TilesetRef};
use crate::resolve::{self, SourceRect};
use crate::traverse::{self, GroupWalk};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Root of a parsed map: owns its tilesets, layers and group tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Map {
    /// Size in tiles.
    pub width: u32,
    /// Size in tiles.
    pub height: u32,
    /// Grid cell width in pixels.
    pub tile_width: u32,
    /// Grid cell height in pixels.
    pub tile_height: u32,
    /// Kept as written (`orthogonal`, `isometric`, ...); not interpreted.
    pub orientation: String,
    /// Tile layers are stored as chunks and may start at negative coordinates.
    pub infinite: bool,
    /// `#RRGGBB` or `#AARRGGBB`.
    pub background_color: Option<String>,
    /// Custom properties.
    pub properties: Properties,
    /// Sorted ascending by `first_gid`.
    pub tilesets: Vec<TilesetRef>,
    /// Top-level layers.
    pub layers: Vec<Layer>,
    /// Top-level groups.
    pub groups: Vec<Group>,
}

impl Map {
    /// Load a Tiled JSON map with default [`LoadOptions`].
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with(path, &LoadOptions::default())
    }

    /// Load a Tiled JSON map from disk.
    pub fn load_with<P: AsRef<Path>>(path: P, opts: &LoadOptions) -> Result<Self> {
        decode_map_file(path.as_ref(), opts)
    }

    /// Parse an in-memory Tiled JSON map. External tilesets are kept unread.
    pub fn load_from_str(json: &str) -> Result<Self> {
        decode_map_str(json, Path::new("./"), &LoadOptions::default())
    }

    /// Every node of the tree, map root first.
    pub fn walk(&self) -> GroupWalk<'_> {
        GroupWalk::new(&self.layers, &[], &self.groups)
    }

    /// All layers, including those nested in groups, depth-first.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> + '_ {
        traverse::layers(self.walk())
    }

    /// All objects from object layers and groups, depth-first.
    pub fn objects(&self) -> impl Iterator<Item = &TiledObject> + '_ {
        traverse::objects(self.walk())
    }

    /// All groups, depth-first.
    pub fn groups(&self) -> impl Iterator<Item = &Group> + '_ {
        traverse::groups(self.walk())
    }

    /// First layer with `id`, searching the whole tree.
    pub fn layer_by_id(&self, id: u32) -> Option<&Layer> {
        self.layers().find(|l| l.id == id)
    }

    /// First layer named `name` in traversal order.
    pub fn layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.layers().find(|l| l.name == name)
    }

    /// Object with `id`, wherever it lives.
    pub fn object_by_id(&self, id: u32) -> Option<&TiledObject> {
        self.objects().find(|o| o.id == id)
    }

    /// Group with `id`, at any depth.
    pub fn group_by_id(&self, id: u32) -> Option<&Group> {
        self.groups().find(|g| g.id == id)
    }

    /// The tileset owning `gid`. Flip bits are ignored.
    pub fn tileset_for_gid(&self, gid: u32) -> Result<&TilesetRef> {
        resolve::resolve_tileset(&self.tilesets, gid & GID_MASK)
    }

    /// Per-tile metadata for `gid`, if the tileset is loaded and defines any.
    pub fn tile_for_gid(&self, gid: u32) -> Result<Option<&Tile>> {
        let gid = gid & GID_MASK;
        let ts = self.tileset_for_gid(gid)?;
        Ok(ts.tileset.as_ref().and_then(|t| t.tile(gid - ts.first_gid)))
    }

    /// Source rectangle of `gid` in its tileset's atlas image.
    ///
    /// The owning tileset must have its data attached (embedded, or via [`Map::attach_tileset`]).
    pub fn source_rect(&self, gid: u32) -> Result<SourceRect> {
        let gid = gid & GID_MASK;
        if gid == 0 {
            return Err(MapError::UnresolvedTileset { gid });
        }
        let ts = self.tileset_for_gid(gid)?;
        let metrics = ts
            .tileset
            .as_ref()
            .and_then(Tileset::metrics)
            .ok_or(MapError::UnresolvedTileset { gid })?;
        resolve::source_rect(gid - ts.first_gid, &metrics)
    }

    /// Attaches loaded data to the external tileset reference starting at `first_gid`.
    pub fn attach_tileset(&mut self, first_gid: u32, tileset: Tileset) -> Result<()> {
        let slot = self
            .tilesets
            .iter_mut()
            .find(|t| t.first_gid == first_gid)
            .ok_or(MapError::UnresolvedTileset { gid: first_gid })?;
        slot.tileset = Some(tileset);
        Ok(())
    }

    /// Checks cross-entity invariants: tileset ordering, id uniqueness and gid resolution.
    pub fn validate(&self) -> Result<()> {
        let mut prev = 0u32;
        for (i, ts) in self.tilesets.iter().enumerate() {
            if ts.first_gid == 0 || (i > 0 && ts.first_gid <= prev) {
                return Err(MapError::malformed(
                    format!("tileset ref {i}"),
                    format!("first_gid {} must be positive and above {}", ts.first_gid, prev),
                ));
            }
            prev = ts.first_gid;
        }

        let mut layer_ids = HashSet::new();
        for layer in self.layers() {
            if !layer_ids.insert(layer.id) {
                return Err(MapError::malformed(format!("layer {}", layer.id), "duplicate layer id"));
            }
            if let Some(tiles) = layer.tiles() {
                for (_, cell) in tiles.non_empty_cells() {
                    self.tileset_for_gid(cell.gid)?;
                }
            }
        }

        let mut group_ids = HashSet::new();
        for group in self.groups() {
            if !group_ids.insert(group.id) {
                return Err(MapError::malformed(format!("group {}", group.id), "duplicate group id"));
            }
        }

        let mut object_ids = HashSet::new();
        for obj in self.objects() {
            if !object_ids.insert(obj.id) {
                return Err(MapError::malformed(format!("object {}", obj.id), "duplicate object id"));
            }
            if let Some(id) = obj.tile_id() {
                self.tileset_for_gid(id.gid())?;
            }
        }

        debug!(
            layers = layer_ids.len(),
            groups = group_ids.len(),
            objects = object_ids.len(),
            tilesets = self.tilesets.len(),
            "map validated"
        );
        Ok(())
    }
}
