//! Error types for terrain construction and configuration.

/// Errors raised by the terrain core.
///
/// Precondition violations fail fast at the call that detected them. Degenerate
/// results (empty extractions, out-of-domain queries) are not errors.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    /// A size, radius, scale or segment count was zero, negative or not finite.
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    /// Diamond-square grids need `2^n + 1` samples per side.
    #[error("diamond-square grid size must be 2^n + 1 and at least 3, got {0}")]
    InvalidGridSize(usize),

    /// An unsupported geometry type tag.
    #[error("unsupported geometry type: {0:?}")]
    UnknownGeometry(String),

    /// An unsupported basin falloff tag.
    #[error("unsupported basin falloff: {0:?}")]
    UnknownFalloff(String),

    /// A preset name that is not registered.
    #[error("unknown terrain preset: {0:?}")]
    UnknownPreset(String),

    /// A basin index past the end of the basin list.
    #[error("basin index {index} out of range for {len} basins")]
    BasinIndex { index: usize, len: usize },

    /// A topology setter that does not apply to the terrain's shape.
    #[error("{operation} is not supported on a {shape} terrain")]
    ShapeMismatch {
        operation: &'static str,
        shape: &'static str,
    },

    /// A triangle index past the end of the position buffer.
    #[error("triangle index {index} out of range for {len} positions")]
    InvalidIndex { index: u32, len: usize },

    /// An index buffer whose length is not a whole number of triangles.
    #[error("index count {0} is not a multiple of three")]
    IndexCount(usize),

    /// A UV buffer that does not line up with the positions.
    #[error("{uvs} uvs supplied for {positions} positions")]
    UvCount { uvs: usize, positions: usize },

    /// A mutation on a terrain whose buffers were already released.
    #[error("terrain has been disposed")]
    Disposed,

    /// Failed to read a config file from disk.
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to write a config file to disk.
    #[error("failed to write config: {0}")]
    WriteError(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// Failed to serialize a config to RON.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),
}

pub type Result<T> = std::result::Result<T, TerrainError>;

// Shared precondition check for dimensions, radii and scales
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(TerrainError::NonPositive { name, value })
    }
}

pub(crate) fn ensure_nonzero(name: &'static str, value: usize) -> Result<usize> {
    if value > 0 {
        Ok(value)
    } else {
        Err(TerrainError::NonPositive {
            name,
            value: value as f64,
        })
    }
}
