use crate::foundation::core::{LatLng, LayerId, TileCoord};
use crate::host::hooks::TileHooks;
use crate::host::style::PathStyle;

/// One layer currently registered on the host map.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Layer {
    /// Stable identifier within the host map.
    pub id: LayerId,
    /// Capability-specific payload.
    #[serde(flatten)]
    pub kind: LayerKind,
}

impl Layer {
    /// Build a layer snapshot.
    pub fn new(id: u64, kind: LayerKind) -> Self {
        Self {
            id: LayerId(id),
            kind,
        }
    }
}

/// Layer capabilities the exporter understands. Anything else is [`LayerKind::Unknown`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerKind {
    /// Point marker with an icon image.
    Marker(MarkerLayer),
    /// Tiled raster source.
    TileRaster(TileLayer),
    /// Circle or circle marker.
    Circle(CircleLayer),
    /// Polyline or polygon.
    Path(PathLayer),
    /// Custom or plugin layer types; always skipped.
    #[serde(other)]
    Unknown,
}

/// Point marker snapshot.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerLayer {
    /// Geographic position.
    pub lat_lng: LatLng,
    /// Source of the rendered icon element; `None` while the icon is not in the DOM.
    #[serde(default)]
    pub icon_url: Option<String>,
    /// Offset from the icon's top-left corner to the marker position.
    #[serde(default)]
    pub icon_anchor: Option<[f64; 2]>,
}

/// Tiled raster layer snapshot.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    /// URL template with `{s}`, `{z}`, `{x}`, `{y}`, `{-y}` and `{r}` placeholders.
    #[serde(rename = "url")]
    pub url_template: String,
    /// Values rotated through `{s}`.
    #[serde(default = "default_subdomains")]
    pub subdomains: Vec<String>,
    /// Native tile edge length in pixels.
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    /// Lowest zoom the source serves; 0 when unset.
    #[serde(default)]
    pub min_native_zoom: Option<f64>,
    /// Highest zoom the source serves; 20 when unset.
    #[serde(default)]
    pub max_native_zoom: Option<f64>,
    /// Offset added to the zoom number written into URLs.
    #[serde(default)]
    pub zoom_offset: i32,
    /// Flip rows for TMS-style sources.
    #[serde(default)]
    pub tms: bool,
    /// Configured opacity option.
    #[serde(default)]
    pub opacity: Option<f64>,
    /// Runtime opacity reported by older widget versions.
    #[serde(default, rename = "_opacity")]
    pub current_opacity: Option<f64>,
    /// Optional capabilities; never serialized.
    #[serde(skip)]
    pub hooks: TileHooks,
}

fn default_subdomains() -> Vec<String> {
    vec!["a".to_owned(), "b".to_owned(), "c".to_owned()]
}

fn default_tile_size() -> u32 {
    256
}

/// Lowest native zoom when a layer does not declare one.
pub const DEFAULT_MIN_NATIVE_ZOOM: f64 = 0.0;
/// Highest native zoom when a layer does not declare one.
pub const DEFAULT_MAX_NATIVE_ZOOM: f64 = 20.0;

impl TileLayer {
    /// Layer with the given template and default options.
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            subdomains: default_subdomains(),
            tile_size: default_tile_size(),
            min_native_zoom: None,
            max_native_zoom: None,
            zoom_offset: 0,
            tms: false,
            opacity: None,
            current_opacity: None,
            hooks: TileHooks::default(),
        }
    }

    /// Declared native zoom range with defaults applied.
    pub fn native_zoom_range(&self) -> (f64, f64) {
        (
            self.min_native_zoom.unwrap_or(DEFAULT_MIN_NATIVE_ZOOM),
            self.max_native_zoom.unwrap_or(DEFAULT_MAX_NATIVE_ZOOM),
        )
    }

    /// Current opacity in `[0, 1]`: the option, else the runtime field, else opaque.
    pub fn effective_opacity(&self) -> f32 {
        let v = self.opacity.or(self.current_opacity).unwrap_or(1.0);
        if v.is_finite() {
            v.clamp(0.0, 1.0) as f32
        } else {
            1.0
        }
    }

    /// Substitute the template placeholders for `coord` as-is.
    pub fn template_url(&self, coord: TileCoord) -> String {
        let inverted_y = inverted_row(coord);
        let mut url = self.url_template.clone();
        url = url.replace("{s}", self.subdomain_for(coord));
        url = url.replace("{z}", &coord.z.to_string());
        url = url.replace("{x}", &coord.x.to_string());
        url = url.replace("{-y}", &inverted_y.to_string());
        url = url.replace("{y}", &coord.y.to_string());
        url.replace("{r}", "")
    }

    /// The layer's own URL accessor: applies the zoom offset and TMS row flipping.
    pub fn tile_url(&self, coord: TileCoord) -> String {
        let mut c = TileCoord {
            z: coord.z + self.zoom_offset,
            ..coord
        };
        if self.tms {
            c.y = inverted_row(c);
        }
        self.template_url(c)
    }

    fn subdomain_for(&self, coord: TileCoord) -> &str {
        if self.subdomains.is_empty() {
            return "";
        }
        let idx = (coord.x + coord.y).unsigned_abs() % self.subdomains.len() as u64;
        &self.subdomains[idx as usize]
    }
}

fn inverted_row(coord: TileCoord) -> i64 {
    if !(0..=62).contains(&coord.z) {
        return coord.y;
    }
    (1i64 << coord.z) - 1 - coord.y
}

/// Polyline/polygon snapshot.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathLayer {
    /// Vertex rings. Polylines carry a single ring; polygons carry the outer ring first.
    #[serde(rename = "latLngs", default)]
    pub rings: Vec<Vec<LatLng>>,
    /// Styling options.
    #[serde(default, rename = "options")]
    pub style: PathStyle,
}

impl PathLayer {
    /// Vertices to draw: only the outer ring when filled, otherwise every vertex in order.
    pub fn vertices(&self) -> Vec<LatLng> {
        if self.style.fill {
            return self.rings.first().cloned().unwrap_or_default();
        }
        self.rings.iter().flatten().copied().collect()
    }
}

/// Circle snapshot. Geometry is read when compositing, not during resolution.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleLayer {
    /// Geographic centre.
    pub lat_lng: LatLng,
    /// Live pixel radius computed by the widget.
    #[serde(default)]
    pub radius_px: Option<f64>,
    /// Live vertical pixel radius when it differs from the horizontal one.
    #[serde(default)]
    pub radius_y_px: Option<f64>,
    /// Configured radius option, used when no live pixel radius exists.
    #[serde(default = "default_circle_radius")]
    pub radius: f64,
    /// Styling options.
    #[serde(default = "PathStyle::filled", rename = "options")]
    pub style: PathStyle,
}

fn default_circle_radius() -> f64 {
    10.0
}

impl CircleLayer {
    /// Circle marker at `lat_lng` with a fixed pixel radius.
    pub fn new(lat_lng: LatLng, radius: f64) -> Self {
        Self {
            lat_lng,
            radius_px: Some(radius),
            radius_y_px: None,
            radius,
            style: PathStyle::filled(),
        }
    }

    /// `true` when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        match self.radius_px {
            Some(r) => !r.is_finite() || r <= 0.0,
            None => !self.radius.is_finite() || self.radius <= 0.0,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/layer.rs"]
mod tests;
