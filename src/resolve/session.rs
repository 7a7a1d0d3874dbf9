use std::collections::BTreeMap;
use std::fmt;

use crate::assets::decode::DecodedImage;
use crate::foundation::core::{LayerId, Point, TileKey};
use crate::host::layer::CircleLayer;
use crate::host::style::PathStyle;
use crate::resolve::viewport::ExportViewport;

/// Outcome of resolving one resource. Omission is a normal outcome, not an error.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolved<T> {
    /// Ready to draw.
    Ready(T),
    /// Dropped from the composite.
    Omitted(OmitReason),
}

impl<T> Resolved<T> {
    /// The drawable, if any.
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(v) => Some(v),
            Self::Omitted(_) => None,
        }
    }
}

/// Why a resource was left out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OmitReason {
    /// Tile load exceeded the per-tile timeout.
    Timeout,
    /// The transport reported an error.
    LoadFailed,
    /// The bytes did not decode as an image.
    DecodeFailed,
    /// The URL resolver hook failed.
    UrlFailed,
    /// The post-load transform hook failed.
    TransformFailed,
    /// Nothing of the resource lands inside the output raster.
    OutOfBounds,
    /// The tile row lies above the top of the world.
    AboveWorld,
    /// Already resolved within this session.
    Duplicate,
}

impl fmt::Display for OmitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Timeout => "timeout",
            Self::LoadFailed => "load failed",
            Self::DecodeFailed => "decode failed",
            Self::UrlFailed => "url resolution failed",
            Self::TransformFailed => "transform failed",
            Self::OutOfBounds => "out of bounds",
            Self::AboveWorld => "above world",
            Self::Duplicate => "duplicate",
        };
        f.write_str(s)
    }
}

/// One loaded tile with its destination in output-raster space.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedTileImage {
    /// Decoded tile pixels.
    pub image: DecodedImage,
    /// Top-left destination.
    pub position: Point,
    /// Edge length of the drawn square (`tile_size * scale_factor`).
    pub draw_size: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
}

/// All tiles of one tile-raster layer.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedTileLayer {
    /// Source layer.
    pub id: LayerId,
    /// Native tile edge in pixels.
    pub tile_size: u32,
    /// Zoom used for fetching.
    pub effective_zoom: f64,
    /// Display zoom over effective zoom as a power of two.
    pub scale_factor: f64,
    /// Loaded tiles in row-major order, unique per cell.
    pub tiles: BTreeMap<TileKey, ResolvedTileImage>,
}

/// A marker icon placed at its anchor-adjusted position.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedMarker {
    /// Decoded icon.
    pub image: DecodedImage,
    /// Top-left destination (anchor already subtracted).
    pub position: Point,
}

/// A projected polyline or polygon.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedPath {
    /// Vertices in output-raster space, in order.
    pub points: Vec<Point>,
    /// Close the outline (filled shapes).
    pub closed: bool,
    /// Style snapshot.
    pub style: PathStyle,
}

/// Resolution counters reported with every export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Tile cells enumerated across all tile layers.
    pub tiles_requested: usize,
    /// Tiles that loaded and will be drawn.
    pub tiles_drawn: usize,
    /// Tiles dropped for any reason.
    pub tiles_omitted: usize,
    /// Markers registered.
    pub markers: usize,
    /// Paths retained.
    pub paths: usize,
    /// Circles registered.
    pub circles: usize,
    /// Layers skipped as unrecognized or faulty.
    pub layers_skipped: usize,
}

/// Per-export state: viewport plus every resolved drawable, keyed for idempotent registration.
#[derive(Clone, Debug)]
pub struct ExportSession {
    /// Output geometry.
    pub viewport: ExportViewport,
    /// Display zoom being exported.
    pub zoom: f64,
    /// Tile layers in layer-id order.
    pub tile_layers: BTreeMap<LayerId, ResolvedTileLayer>,
    /// Markers in layer-id order.
    pub markers: BTreeMap<LayerId, ResolvedMarker>,
    /// Paths in layer-id order.
    pub paths: BTreeMap<LayerId, ResolvedPath>,
    /// Circles, geometry read at composite time.
    pub circles: BTreeMap<LayerId, CircleLayer>,
    /// Counters.
    pub stats: ExportStats,
}

impl ExportSession {
    /// Empty session for `viewport` at `zoom`.
    pub fn new(viewport: ExportViewport, zoom: f64) -> Self {
        Self {
            viewport,
            zoom,
            tile_layers: BTreeMap::new(),
            markers: BTreeMap::new(),
            paths: BTreeMap::new(),
            circles: BTreeMap::new(),
            stats: ExportStats::default(),
        }
    }

    /// Register a tile layer; a second registration for the same id is ignored.
    pub fn register_tile_layer(&mut self, layer: ResolvedTileLayer, requested: usize) -> bool {
        if self.tile_layers.contains_key(&layer.id) {
            return false;
        }
        self.stats.tiles_requested += requested;
        self.stats.tiles_drawn += layer.tiles.len();
        self.stats.tiles_omitted += requested.saturating_sub(layer.tiles.len());
        self.tile_layers.insert(layer.id, layer);
        true
    }

    /// Register a marker; a second registration for the same id is ignored.
    pub fn register_marker(&mut self, id: LayerId, marker: ResolvedMarker) -> bool {
        if self.markers.contains_key(&id) {
            return false;
        }
        self.markers.insert(id, marker);
        self.stats.markers += 1;
        true
    }

    /// Register a path; a second registration for the same id is ignored.
    pub fn register_path(&mut self, id: LayerId, path: ResolvedPath) -> bool {
        if self.paths.contains_key(&id) {
            return false;
        }
        self.paths.insert(id, path);
        self.stats.paths += 1;
        true
    }

    /// Register a circle; a second registration for the same id is ignored.
    pub fn register_circle(&mut self, id: LayerId, circle: CircleLayer) -> bool {
        if self.circles.contains_key(&id) {
            return false;
        }
        self.circles.insert(id, circle);
        self.stats.circles += 1;
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/session.rs"]
mod tests;
