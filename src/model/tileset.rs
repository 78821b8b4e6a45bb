use crate::error::{MapError, Result};
use crate::model::property::Properties;

/// Sentinel for a tile corner without terrain.
pub const NO_TERRAIN: i32 = -1;

/// An image file reference with its pixel size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Path relative to the file that references it.
    pub source: String,
}

/// A named terrain; `tile` is the local id shown as its icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terrain {
    /// Display name.
    pub name: String,
    /// Icon tile.
    pub tile: u32,
}

/// One step of a tile animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFrame {
    /// Local id in the same tileset.
    pub tile_id: u32,
    /// Always positive.
    pub duration_ms: u32,
}

impl AnimationFrame {
    /// Rejects a zero duration.
    pub fn new(tile_id: u32, duration_ms: u32) -> Result<Self> {
        if duration_ms == 0 {
            return Err(MapError::malformed(
                format!("animation frame for tile {tile_id}"),
                "duration must be positive",
            ));
        }
        Ok(AnimationFrame {
            tile_id,
            duration_ms,
        })
    }
}

/// Per-tile metadata. Only tiles with properties, terrain, animation or their own image appear.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Zero-based id inside the tileset, not a gid.
    pub id: u32,
    /// User type / class.
    pub kind: Option<String>,
    /// Terrain index per corner: top-left, top-right, bottom-left, bottom-right.
    pub terrain: [i32; 4],
    /// Custom properties.
    pub properties: Properties,
    /// Frames in play order; empty when static.
    pub animation: Vec<AnimationFrame>,
    /// Own image, for image-collection tilesets.
    pub image: Option<Image>,
}

impl Tile {
    /// Bare metadata entry for local id `id`.
    pub fn new(id: u32) -> Self {
        Tile {
            id,
            kind: None,
            terrain: [NO_TERRAIN; 4],
            properties: Properties::new(),
            animation: Vec::new(),
            image: None,
        }
    }

    /// Whether `corner` (0..4) has a terrain.
    pub fn has_terrain(&self, corner: usize) -> bool {
        self.terrain.get(corner).is_some_and(|&t| t != NO_TERRAIN)
    }

    /// Has at least one frame.
    pub fn is_animated(&self) -> bool {
        !self.animation.is_empty()
    }

    /// Length of one animation cycle.
    pub fn animation_duration_ms(&self) -> u64 {
        self.animation.iter().map(|f| f.duration_ms as u64).sum()
    }
}

/// Parses Tiled's comma-separated terrain string, where an empty slot means no terrain.
pub fn parse_terrain(s: &str) -> Result<[i32; 4]> {
    let mut out = [NO_TERRAIN; 4];
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 4 {
        return Err(MapError::malformed(
            "tile terrain",
            format!("expected 4 corners, got {}", parts.len()),
        ));
    }
    for (slot, part) in out.iter_mut().zip(parts) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        *slot = part
            .parse()
            .map_err(|_| MapError::malformed("tile terrain", format!("bad corner '{part}'")))?;
    }
    Ok(out)
}

/// Atlas geometry needed to cut a tile out of a tileset image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilesetMetrics {
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// Gap between neighbouring tiles.
    pub spacing: u32,
    /// Border around the whole atlas.
    pub margin: u32,
    /// Atlas width in pixels.
    pub image_width: u32,
    /// Atlas height in pixels.
    pub image_height: u32,
}

/// Tileset contents, either embedded in the map or loaded from its `source`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tileset {
    /// Display name.
    pub name: String,
    /// Maximum tile width in pixels.
    pub tile_width: u32,
    /// Maximum tile height in pixels.
    pub tile_height: u32,
    /// Gap between atlas tiles.
    pub spacing: u32,
    /// Atlas border.
    pub margin: u32,
    /// Number of tiles, as declared.
    pub tile_count: u32,
    /// Columns as declared; [`crate::resolve::source_rect`] recomputes them from the image.
    pub columns: u32,
    /// Shared atlas; `None` for image collections.
    pub image: Option<Image>,
    /// Tiles that carry metadata.
    pub tiles: Vec<Tile>,
    /// Terrain types.
    pub terrains: Vec<Terrain>,
    /// Custom properties.
    pub properties: Properties,
}

impl Tileset {
    /// Metadata for `local_id`, if any was written.
    pub fn tile(&self, local_id: u32) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == local_id)
    }

    /// `None` for image-collection tilesets, which have no shared atlas.
    pub fn metrics(&self) -> Option<TilesetMetrics> {
        let image = self.image.as_ref()?;
        Some(TilesetMetrics {
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            spacing: self.spacing,
            margin: self.margin,
            image_width: image.width,
            image_height: image.height,
        })
    }
}

/// Entry in a map's ordered tileset list.
#[derive(Debug, Clone, PartialEq)]
pub struct TilesetRef {
    /// Gid of the tileset's tile 0.
    pub first_gid: u32,
    /// Path to an external tileset; empty when embedded.
    pub source: String,
    /// `None` until an external tileset is read or attached.
    pub tileset: Option<Tileset>,
}

impl TilesetRef {
    /// A reference whose data is not loaded yet.
    pub fn external(first_gid: u32, source: impl Into<String>) -> Self {
        TilesetRef {
            first_gid,
            source: source.into(),
            tileset: None,
        }
    }

    /// A reference carrying its data inline.
    pub fn embedded(first_gid: u32, tileset: Tileset) -> Self {
        TilesetRef {
            first_gid,
            source: String::new(),
            tileset: Some(tileset),
        }
    }

    /// Defined inside the map file.
    pub fn is_embedded(&self) -> bool {
        self.source.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terrain_string_uses_sentinel_for_blank_corners() {
        assert_eq!(parse_terrain("0,,1,").unwrap(), [0, NO_TERRAIN, 1, NO_TERRAIN]);
        assert_eq!(parse_terrain(",,,").unwrap(), [NO_TERRAIN; 4]);
        assert!(parse_terrain("0,1").is_err());
        assert!(parse_terrain("a,,,").is_err());
    }

    #[test]
    fn animation_frames_need_positive_duration() {
        assert!(AnimationFrame::new(3, 0).is_err());

        let mut tile = Tile::new(0);
        tile.animation = vec![AnimationFrame::new(0, 100).unwrap(), AnimationFrame::new(1, 150).unwrap()];
        assert!(tile.is_animated());
        assert_eq!(tile.animation_duration_ms(), 250);
    }

    #[test]
    fn terrain_corners_default_to_unassigned() {
        let mut tile = Tile::new(4);
        assert!(!tile.has_terrain(0));
        tile.terrain[2] = 1;
        assert!(tile.has_terrain(2));
        assert!(!tile.has_terrain(7));
    }
}
