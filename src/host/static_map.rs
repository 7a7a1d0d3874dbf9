use std::f64::consts::PI;

use crate::foundation::core::{Canvas, LatLng, PixelBounds, Point};
use crate::foundation::error::{MapExportError, MapExportResult};
use crate::host::MapHost;
use crate::host::layer::Layer;

const EARTH_RADIUS: f64 = 6_378_137.0;
const MAX_LATITUDE: f64 = 85.051_128_779_8;

/// Spherical Mercator (EPSG:3857) projection onto a `256 * 2^zoom` pixel world.
pub fn project_mercator(at: LatLng, zoom: f64) -> Point {
    let d = PI / 180.0;
    let lat = at.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let sin = (lat * d).sin();
    let x = EARTH_RADIUS * at.lng * d;
    let y = EARTH_RADIUS * ((1.0 + sin) / (1.0 - sin)).ln() / 2.0;

    let scale = 256.0 * 2f64.powf(zoom);
    let k = 0.5 / (PI * EARTH_RADIUS);
    Point::new(scale * (k * x + 0.5), scale * (-k * y + 0.5))
}

/// A map frozen at one centre and zoom, holding an explicit layer list.
///
/// Used for headless exports and tests; live widgets implement [`MapHost`] themselves.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct StaticMap {
    /// Geographic centre of the viewport.
    pub center: LatLng,
    /// Display zoom.
    pub zoom: f64,
    /// Viewport size in pixels.
    pub size: Canvas,
    /// Layers in registration order.
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl StaticMap {
    /// Empty map at `center`/`zoom` with the given viewport size.
    pub fn new(center: LatLng, zoom: f64, size: Canvas) -> Self {
        Self {
            center,
            zoom,
            size,
            layers: Vec::new(),
        }
    }

    /// Append a layer.
    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Parse a map snapshot from JSON.
    pub fn from_json(json: &str) -> MapExportResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| MapExportError::validation(format!("invalid map snapshot: {e}")))
    }
}

impl MapHost for StaticMap {
    fn size(&self) -> Canvas {
        self.size
    }

    fn pixel_bounds(&self) -> PixelBounds {
        let c = project_mercator(self.center, self.zoom);
        let half_w = f64::from(self.size.width) / 2.0;
        let half_h = f64::from(self.size.height) / 2.0;
        PixelBounds::new(
            Point::new(c.x - half_w, c.y - half_h),
            Point::new(c.x + half_w, c.y + half_h),
        )
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn project(&self, at: LatLng) -> Point {
        project_mercator(at, self.zoom)
    }

    fn layers(&self) -> Vec<MapExportResult<Layer>> {
        self.layers.iter().cloned().map(Ok).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/static_map.rs"]
mod tests;
