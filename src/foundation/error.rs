/// Convenience result type used across the exporter.
pub type MapExportResult<T> = Result<T, MapExportError>;

/// Top-level error taxonomy used by exporter APIs.
///
/// Per-resource faults (a tile that fails to load, a marker icon that cannot be decoded) are
/// recovered inside the resolvers and never surface through this type. Only structural faults of
/// the export request itself reach the caller.
#[derive(thiserror::Error, Debug)]
pub enum MapExportError {
    /// Invalid caller-provided or host-provided data (crop factor, bounds, sizes).
    #[error("validation error: {0}")]
    Validation(String),

    /// A resource could not be fetched from the host transport.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Resource bytes could not be decoded into an image.
    #[error("decode error: {0}")]
    Decode(String),

    /// The compositor could not produce the output raster.
    #[error("render error: {0}")]
    Render(String),

    /// The composited raster could not be encoded or written.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MapExportError {
    /// Build a [`MapExportError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MapExportError::Fetch`] value.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build a [`MapExportError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`MapExportError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`MapExportError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
