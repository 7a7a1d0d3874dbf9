use crate::foundation::error::{MapExportError, MapExportResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Stable per-layer identifier assigned by the host widget.
///
/// Resolved collections are keyed by this id so that re-encountering a layer within one export is
/// a no-op. Ordering follows the numeric id, which is also the draw order within a layer class.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct LayerId(pub u64);

/// Geographic coordinate in degrees.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    /// Build a coordinate from latitude/longitude degrees.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Output raster dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Build canvas dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Marker visibility test: `x >= 0, y >= 0, x < width, y <= height`.
    ///
    /// The bottom edge is inclusive while the right edge is exclusive.
    pub fn contains_marker_point(self, p: Point) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x < f64::from(self.width) && p.y <= f64::from(self.height)
    }

    /// Path vertex visibility test: `x < width && y < height`.
    ///
    /// No lower bound is checked; see `DESIGN.md` for why this asymmetry is kept.
    pub fn admits_path_vertex(self, p: Point) -> bool {
        p.x < f64::from(self.width) && p.y < f64::from(self.height)
    }
}

/// Axis-aligned rectangle in the host map's absolute pixel space.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PixelBounds {
    /// Top-left corner.
    pub min: Point,
    /// Bottom-right corner.
    pub max: Point,
}

impl PixelBounds {
    /// Build bounds from corners.
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Validate that both corners are finite and `min < max` on both axes.
    pub fn validated(self) -> MapExportResult<Self> {
        let finite = [self.min.x, self.min.y, self.max.x, self.max.y]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(MapExportError::validation("pixel bounds must be finite"));
        }
        if self.max.x <= self.min.x || self.max.y <= self.min.y {
            return Err(MapExportError::validation(format!(
                "pixel bounds are degenerate: min=({}, {}) max=({}, {})",
                self.min.x, self.min.y, self.max.x, self.max.y
            )));
        }
        Ok(self)
    }

    /// Horizontal extent.
    pub fn width(self) -> f64 {
        self.max.x - self.min.x
    }

    /// Vertical extent.
    pub fn height(self) -> f64 {
        self.max.y - self.min.y
    }

    /// Midpoint of the rectangle.
    pub fn center(self) -> Point {
        self.min.midpoint(self.max)
    }

    /// Translate an absolute map pixel into output-raster space.
    pub fn to_local(self, p: Point) -> Point {
        Point::new(p.x - self.min.x, p.y - self.min.y)
    }
}

/// Tile address `(x, y, z)` as passed to URL templates and host hooks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TileCoord {
    /// Column index.
    pub x: i64,
    /// Row index.
    pub y: i64,
    /// Zoom level used for fetching.
    pub z: i32,
}

/// Row-major key for a tile cell; iteration order matches enumeration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileKey {
    /// Row index (unadjusted).
    pub row: i64,
    /// Column index (unadjusted).
    pub col: i64,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
