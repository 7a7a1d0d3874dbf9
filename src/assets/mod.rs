//! Image decoding for tiles and marker icons.

/// Raster and SVG decoding to premultiplied RGBA8.
pub mod decode;
