//! Capability interface to the host mapping widget.
//!
//! The exporter never talks to a widget directly. It consumes a [`MapHost`] (bounds, zoom,
//! projection, layer enumeration) and an [`ImageFetcher`] (transport for tile and icon bytes).

/// Image transport seam and built-in fetchers.
pub mod fetch;
/// Optional per-layer hooks for tile layers.
pub mod hooks;
/// Layer snapshots exposed by the host.
pub mod layer;
/// A fixed map snapshot with spherical Mercator projection.
pub mod static_map;
/// Vector styling options.
pub mod style;

use crate::foundation::core::{Canvas, LatLng, PixelBounds, Point};
use crate::foundation::error::MapExportResult;

pub use fetch::{FsFetcher, ImageFetcher, MemoryFetcher};
pub use hooks::{TileCoordAdjuster, TileHooks, TileImageTransform, TileUrlResolver, WrapTileX};
pub use layer::{CircleLayer, Layer, LayerKind, MarkerLayer, PathLayer, TileLayer};
pub use static_map::StaticMap;
pub use style::{FillRule, LineCap, LineJoin, PathStyle};

/// What the exporter needs from a mapping widget.
pub trait MapHost {
    /// Size of the visible map container in CSS pixels.
    fn size(&self) -> Canvas;

    /// Visible rectangle in absolute map pixel space at the current zoom.
    fn pixel_bounds(&self) -> PixelBounds;

    /// Current display zoom level.
    fn zoom(&self) -> f64;

    /// Project a geographic coordinate to absolute map pixel space at the current zoom.
    fn project(&self, at: LatLng) -> Point;

    /// Snapshot of every layer currently registered on the map.
    ///
    /// An `Err` entry stands for a layer whose inspection faulted; the exporter skips it.
    fn layers(&self) -> Vec<MapExportResult<Layer>>;
}
