use std::io;
use std::path::PathBuf;

/// Error type for building and querying a map document
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// A grid was constructed with a negative size, or with a backing buffer of the wrong length
    #[error("invalid grid dimension {width}x{height}")]
    InvalidDimension { width: i64, height: i64 },

    /// A coordinate fell outside a grid's declared bounds
    #[error("coordinate ({x}, {y}) outside grid bounds x={min_x}..={max_x}, y={min_y}..={max_y}")]
    OutOfBounds {
        x: i32,
        y: i32,
        min_x: i32,
        min_y: i32,
        max_x: i64,
        max_y: i64,
    },

    /// The gid is smaller than every tileset's first gid, or there are no tilesets
    #[error("gid {gid} does not map to any tileset")]
    UnresolvedTileset { gid: u32 },

    /// The local tile index lies outside the tileset image
    #[error("tile index {local_id} outside tileset image ({columns} columns, {rows} rows)")]
    InvalidTileIndex {
        local_id: u32,
        columns: i64,
        rows: i64,
    },

    /// A required field is missing or inconsistent with the entity's tag
    #[error("malformed {entity}: {reason}")]
    MalformedEntity { entity: String, reason: String },

    /// File I/O error
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON parse error for a file on disk
    #[error("failed to parse {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Map or tileset file in a format other than JSON
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// JSON parse error for an in-memory document
    #[error("failed to parse map JSON")]
    Parse(#[from] serde_json::Error),
}

impl MapError {
    pub(crate) fn malformed(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        MapError::MalformedEntity {
            entity: entity.into(),
            reason: reason.into(),
        }
    }
}

/// Shorthand used throughout the crate.
pub type Result<T, E = MapError> = std::result::Result<T, E>;
