use std::fmt;
use std::sync::Arc;

use futures::future::LocalBoxFuture;

use crate::assets::decode::DecodedImage;
use crate::foundation::core::TileCoord;
use crate::foundation::error::MapExportResult;

/// Asynchronous tile URL resolution, preferred over the layer's URL template when present.
pub trait TileUrlResolver {
    /// Resolve the URL of the (already adjusted) tile coordinate.
    fn resolve_url(&self, coord: TileCoord) -> LocalBoxFuture<'_, MapExportResult<String>>;
}

/// In-place tile coordinate adjustment, e.g. wrapping columns around the anti-meridian.
pub trait TileCoordAdjuster {
    /// Rewrite `coord` before its URL is resolved.
    fn adjust(&self, coord: &mut TileCoord);
}

/// Post-load image processing (recoloring, masking, ...). A failure omits the tile.
pub trait TileImageTransform {
    /// Transform a decoded tile.
    fn transform(&self, image: DecodedImage) -> LocalBoxFuture<'_, MapExportResult<DecodedImage>>;
}

/// Wrap tile columns into `[0, 2^z)` so that tiles west of -180° or east of 180° resolve to
/// existing world tiles.
#[derive(Clone, Copy, Debug, Default)]
pub struct WrapTileX;

impl TileCoordAdjuster for WrapTileX {
    fn adjust(&self, coord: &mut TileCoord) {
        if !(0..=62).contains(&coord.z) {
            return;
        }
        let limit = 1i64 << coord.z;
        coord.x = coord.x.rem_euclid(limit);
    }
}

/// Optional capabilities of a tile layer. Absent hooks fall back to the default behaviour.
#[derive(Clone, Default)]
pub struct TileHooks {
    /// Asynchronous URL resolver.
    pub url_resolver: Option<Arc<dyn TileUrlResolver>>,
    /// Coordinate adjustment applied before URL resolution.
    pub adjust: Option<Arc<dyn TileCoordAdjuster>>,
    /// Post-load image transform.
    pub transform: Option<Arc<dyn TileImageTransform>>,
}

impl TileHooks {
    /// Apply the adjustment hook, if any, to a copy of `coord`.
    pub fn adjusted(&self, coord: TileCoord) -> TileCoord {
        let mut out = coord;
        if let Some(adjust) = &self.adjust {
            adjust.adjust(&mut out);
        }
        out
    }
}

impl fmt::Debug for TileHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileHooks")
            .field("url_resolver", &self.url_resolver.is_some())
            .field("adjust", &self.adjust.is_some())
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/hooks.rs"]
mod tests;
