use std::collections::BTreeMap;
use std::time::Duration;

use crate::assets::decode::{DecodedImage, decode_image};
use crate::foundation::core::{LayerId, PixelBounds, Point, TileCoord, TileKey};
use crate::foundation::error::{MapExportError, MapExportResult};
use crate::host::fetch::ImageFetcher;
use crate::host::layer::TileLayer;
use crate::resolve::session::{OmitReason, Resolved, ResolvedTileImage, ResolvedTileLayer};
use crate::resolve::viewport::ExportViewport;

/// Upper bound on tile cells enumerated for one layer.
pub const MAX_TILES_PER_LAYER: usize = 1 << 16;

/// Clamp the display zoom into the layer's native range.
pub fn effective_zoom(zoom: f64, min_native: f64, max_native: f64) -> f64 {
    min_native.max(zoom.min(max_native))
}

/// `2^(zoom - effective)`: how much effective-zoom tiles are upsampled (or downsampled).
pub fn scale_factor(zoom: f64, effective: f64) -> f64 {
    2f64.powf(zoom - effective)
}

/// Bounds at the effective zoom covering the same area as `bounds` at the display zoom.
///
/// Centre and half-extents are both divided by `scale`.
pub fn scaled_bounds(bounds: PixelBounds, scale: f64) -> PixelBounds {
    if scale == 1.0 {
        return bounds;
    }
    let c = bounds.center();
    let half_w = bounds.width() / 2.0 / scale;
    let half_h = bounds.height() / 2.0 / scale;
    let (cx, cy) = (c.x / scale, c.y / scale);
    PixelBounds::new(
        Point::new(cx - half_w, cy - half_h),
        Point::new(cx + half_w, cy + half_h),
    )
}

/// Inclusive tile index rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRange {
    /// First column.
    pub min_col: i64,
    /// First row.
    pub min_row: i64,
    /// Last column (inclusive).
    pub max_col: i64,
    /// Last row (inclusive).
    pub max_row: i64,
}

impl TileRange {
    /// Number of cells, saturating at `usize::MAX`.
    pub fn len(&self) -> usize {
        let span = |min: i64, max: i64| (i128::from(max) - i128::from(min) + 1).max(0) as u128;
        span(self.min_col, self.max_col)
            .checked_mul(span(self.min_row, self.max_row))
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(usize::MAX)
    }

    /// `true` when the range holds no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cells in row-major order.
    pub fn keys(&self) -> impl Iterator<Item = TileKey> + '_ {
        (self.min_row..=self.max_row)
            .flat_map(move |row| (self.min_col..=self.max_col).map(move |col| TileKey { row, col }))
    }
}

/// Tile indices covering `bounds`: both corners divided by `tile_size` and floored.
///
/// Indices beyond the `i64` range saturate; [`TileRange::len`] then reports a count far above
/// [`MAX_TILES_PER_LAYER`].
pub fn tile_range(bounds: PixelBounds, tile_size: u32) -> TileRange {
    let ts = f64::from(tile_size);
    TileRange {
        min_col: (bounds.min.x / ts).floor() as i64,
        min_row: (bounds.min.y / ts).floor() as i64,
        max_col: (bounds.max.x / ts).floor() as i64,
        max_row: (bounds.max.y / ts).floor() as i64,
    }
}

/// Destination of a tile's top-left corner in raster space.
///
/// Uses the unadjusted index so wrapped tiles still land where they are displayed.
pub fn tile_destination(key: TileKey, tile_size: u32, scale: f64, origin: Point) -> Point {
    let ts = f64::from(tile_size);
    let base = Point::new(key.col as f64 * ts, key.row as f64 * ts);
    if scale != 1.0 {
        Point::new(base.x * scale - origin.x, base.y * scale - origin.y)
    } else {
        Point::new(base.x - origin.x, base.y - origin.y)
    }
}

/// Tile layer resolution result.
#[derive(Clone, Debug)]
pub struct TileLayerOutcome {
    /// Loaded tiles.
    pub layer: ResolvedTileLayer,
    /// Cells enumerated, including omitted ones.
    pub requested: usize,
}

struct TilePlan<'a> {
    layer: &'a TileLayer,
    display_zoom: f64,
    effective_zoom: f64,
    fetcher: &'a dyn ImageFetcher,
    timeout: Duration,
}

/// Fetch and place every tile of `layer` that intersects the export bounds.
///
/// All tiles load concurrently. Per-tile failures omit that tile; only structural problems with
/// the layer itself (zero tile size, absurd tile counts) return `Err`.
#[tracing::instrument(level = "debug", skip(layer, viewport, fetcher), fields(template = %layer.url_template))]
pub async fn resolve_tile_layer(
    id: LayerId,
    layer: &TileLayer,
    zoom: f64,
    viewport: &ExportViewport,
    fetcher: &dyn ImageFetcher,
    timeout: Duration,
) -> MapExportResult<TileLayerOutcome> {
    if layer.tile_size == 0 {
        return Err(MapExportError::validation("tile size must be non-zero"));
    }
    let (min_native, max_native) = layer.native_zoom_range();
    let eff = effective_zoom(zoom, min_native, max_native);
    let scale = scale_factor(zoom, eff);
    if !scale.is_finite() || scale <= 0.0 {
        return Err(MapExportError::validation(format!(
            "invalid tile scale factor {scale} (zoom {zoom}, effective {eff})"
        )));
    }

    let scaled = scaled_bounds(viewport.bounds, scale);
    if ![scaled.min.x, scaled.min.y, scaled.max.x, scaled.max.y]
        .iter()
        .all(|v| v.is_finite())
    {
        return Err(MapExportError::validation(format!(
            "tile bounds are not finite at scale {scale}"
        )));
    }
    let range = tile_range(scaled, layer.tile_size);
    let requested = range.len();
    if requested > MAX_TILES_PER_LAYER {
        return Err(MapExportError::validation(format!(
            "tile layer spans {requested} tiles, limit is {MAX_TILES_PER_LAYER}"
        )));
    }

    let plan = TilePlan {
        layer,
        display_zoom: zoom,
        effective_zoom: eff,
        fetcher,
        timeout,
    };
    let z = eff.round() as i32;
    let origin = viewport.bounds.min;
    let tasks = range.keys().map(|key| {
        let plan = &plan;
        async move {
            let coord = layer.hooks.adjusted(TileCoord {
                x: key.col,
                y: key.row,
                z,
            });
            let position = tile_destination(key, layer.tile_size, scale, origin);
            let out = if coord.y < 0 {
                Resolved::Omitted(OmitReason::AboveWorld)
            } else {
                plan.load(coord).await
            };
            (key, position, out)
        }
    });
    let results = futures::future::join_all(tasks).await;

    let draw_size = f64::from(layer.tile_size) * scale;
    let opacity = layer.effective_opacity();
    let mut tiles = BTreeMap::new();
    for (key, position, out) in results {
        match out {
            Resolved::Ready(image) => {
                tiles.entry(key).or_insert(ResolvedTileImage {
                    image,
                    position,
                    draw_size,
                    opacity,
                });
            }
            Resolved::Omitted(reason) => {
                tracing::debug!(row = key.row, col = key.col, %reason, "tile omitted");
            }
        }
    }

    Ok(TileLayerOutcome {
        layer: ResolvedTileLayer {
            id,
            tile_size: layer.tile_size,
            effective_zoom: eff,
            scale_factor: scale,
            tiles,
        },
        requested,
    })
}

impl TilePlan<'_> {
    async fn url_for(&self, coord: TileCoord) -> MapExportResult<String> {
        if let Some(resolver) = &self.layer.hooks.url_resolver {
            return resolver.resolve_url(coord).await;
        }
        if self.effective_zoom != self.display_zoom {
            return Ok(self.layer.template_url(coord));
        }
        Ok(self.layer.tile_url(coord))
    }

    async fn load(&self, coord: TileCoord) -> Resolved<DecodedImage> {
        let url = match self.url_for(coord).await {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(?coord, error = %e, "tile url resolution failed");
                return Resolved::Omitted(OmitReason::UrlFailed);
            }
        };

        let fetched = tokio::time::timeout(self.timeout, async {
            let bytes = self
                .fetcher
                .fetch(&url)
                .await
                .map_err(|_| OmitReason::LoadFailed)?;
            decode_image(&bytes).map_err(|_| OmitReason::DecodeFailed)
        })
        .await;
        let image = match fetched {
            Ok(Ok(image)) => image,
            Ok(Err(reason)) => return Resolved::Omitted(reason),
            Err(_) => {
                tracing::debug!(url = %url, timeout_ms = self.timeout.as_millis() as u64, "tile timed out");
                return Resolved::Omitted(OmitReason::Timeout);
            }
        };

        match &self.layer.hooks.transform {
            Some(transform) => match transform.transform(image).await {
                Ok(image) => Resolved::Ready(image),
                Err(e) => {
                    tracing::debug!(url = %url, error = %e, "tile transform failed");
                    Resolved::Omitted(OmitReason::TransformFailed)
                }
            },
            None => Resolved::Ready(image),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/tile.rs"]
mod tests;
