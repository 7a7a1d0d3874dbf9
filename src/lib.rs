//! map-export renders the current viewport of an interactive tiled map into a single PNG.
//!
//! The host mapping widget is consumed through a small capability interface ([`MapHost`]) and
//! image bytes arrive through an [`ImageFetcher`]. Everything the widget displays that the
//! exporter understands (raster tiles, marker icons, polylines/polygons and circles) is resolved
//! into device-pixel drawables and composited in a fixed order.
//!
//! # Pipeline overview
//!
//! 1. **Viewport**: host bounds + crop factor -> [`ExportViewport`] (output size and captured area)
//! 2. **Resolve**: every layer -> [`ExportSession`] (tiles and icons load concurrently, each tile
//!    bounded by a timeout; failed resources are omitted, never fatal)
//! 3. **Composite**: [`ExportSession`] -> [`FrameRGBA`] in the order tiles, paths, markers, circles
//! 4. **Encode**: [`FrameRGBA`] -> PNG bytes ([`ExportedImage`])
//!
//! Only structural faults (degenerate bounds, non-finite crop, oversized raster, encoding
//! failure) surface as [`MapExportError`].
//!
//! # Getting started
//!
//! Build a [`StaticMap`] (or implement [`MapHost`] for a live widget), pick a fetcher and call
//! [`export_viewport`] from async code or [`export_viewport_blocking`] otherwise.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod export;
mod foundation;
mod render;
mod resolve;

/// Capability interface to the host map and built-in host/fetcher implementations.
pub mod host;
/// Optional `tracing` subscriber setup.
pub mod logging;

pub use assets::decode::{DecodedImage, decode_image};
pub use config::{DEFAULT_FILE_NAME, DEFAULT_TILE_TIMEOUT, ExportOpts};
pub use export::{ExportedImage, encode_png, export_viewport, export_viewport_blocking};
pub use foundation::color::CssColor;
pub use foundation::core::{
    Affine, BezPath, Canvas, LatLng, LayerId, PixelBounds, Point, Rect, TileCoord, TileKey, Vec2,
};
pub use foundation::error::{MapExportError, MapExportResult};
pub use host::{
    CircleLayer, FillRule, FsFetcher, ImageFetcher, Layer, LayerKind, LineCap, LineJoin, MapHost,
    MarkerLayer, MemoryFetcher, PathLayer, PathStyle, StaticMap, TileCoordAdjuster, TileHooks,
    TileImageTransform, TileLayer, TileUrlResolver, WrapTileX,
};
pub use render::FrameRGBA;
pub use render::cpu::composite;
pub use resolve::circle::CircleGeometry;
pub use resolve::classify::{LayerClass, classify, resolve_layers};
pub use resolve::marker::resolve_marker;
pub use resolve::path::resolve_path;
pub use resolve::session::{
    ExportSession, ExportStats, OmitReason, Resolved, ResolvedMarker, ResolvedPath,
    ResolvedTileImage, ResolvedTileLayer,
};
pub use resolve::tile::{
    TileLayerOutcome, TileRange, effective_zoom, resolve_tile_layer, scale_factor, scaled_bounds,
    tile_destination, tile_range,
};
pub use resolve::viewport::{ExportViewport, compute_viewport};
