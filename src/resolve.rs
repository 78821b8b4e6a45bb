//! Mapping gids to tilesets and to pixel regions inside a tileset image.

use crate::error::{MapError, Result};
use crate::model::tileset::{TilesetMetrics, TilesetRef};
use tracing::trace;

/// Pixel region of one tile inside its tileset image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRect {
    /// Left edge in image pixels.
    pub x: u32,
    /// Top edge in image pixels.
    pub y: u32,
    /// Equals the tileset's tile width.
    pub width: u32,
    /// Equals the tileset's tile height.
    pub height: u32,
}

/// Index of the tileset owning `gid`: the last entry whose `first_gid <= gid`.
///
/// `tilesets` must be sorted ascending by `first_gid`. Flip bits must already be stripped.
pub fn tileset_index_for_gid(tilesets: &[TilesetRef], gid: u32) -> Result<usize> {
    let n = tilesets.partition_point(|t| t.first_gid <= gid);
    if n == 0 {
        return Err(MapError::UnresolvedTileset { gid });
    }
    trace!(gid, first_gid = tilesets[n - 1].first_gid, "resolved tileset");
    Ok(n - 1)
}

/// The tileset owning `gid`, see [`tileset_index_for_gid`].
pub fn resolve_tileset(tilesets: &[TilesetRef], gid: u32) -> Result<&TilesetRef> {
    let idx = tileset_index_for_gid(tilesets, gid)?;
    Ok(&tilesets[idx])
}

/// Number of whole tiles that fit along one axis of the image.
fn fit(image_len: u32, margin: u32, spacing: u32, tile_len: u32) -> i64 {
    let step = tile_len as i64 + spacing as i64;
    if step <= 0 {
        return 0;
    }
    (image_len as i64 - 2 * margin as i64 + spacing as i64).div_euclid(step)
}

/// Source rectangle of a tileset-local tile index.
pub fn source_rect(local_id: u32, metrics: &TilesetMetrics) -> Result<SourceRect> {
    let columns = fit(
        metrics.image_width,
        metrics.margin,
        metrics.spacing,
        metrics.tile_width,
    );
    let rows = fit(
        metrics.image_height,
        metrics.margin,
        metrics.spacing,
        metrics.tile_height,
    );
    let bad_index = || MapError::InvalidTileIndex {
        local_id,
        columns,
        rows,
    };
    if columns <= 0 {
        return Err(bad_index());
    }
    let col = local_id as i64 % columns;
    let row = local_id as i64 / columns;
    if row >= rows {
        return Err(bad_index());
    }

    let x = metrics.margin as i64 + col * (metrics.tile_width as i64 + metrics.spacing as i64);
    let y = metrics.margin as i64 + row * (metrics.tile_height as i64 + metrics.spacing as i64);
    Ok(SourceRect {
        x: u32::try_from(x).map_err(|_| bad_index())?,
        y: u32::try_from(y).map_err(|_| bad_index())?,
        width: metrics.tile_width,
        height: metrics.tile_height,
    })
}

/// Resolves `gid` and cuts its tile from the given atlas geometry.
pub fn source_rect_for_gid(tilesets: &[TilesetRef], gid: u32, metrics: &TilesetMetrics) -> Result<SourceRect> {
    let ts = resolve_tileset(tilesets, gid)?;
    source_rect(gid - ts.first_gid, metrics)
}
