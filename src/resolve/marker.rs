use crate::assets::decode::decode_image;
use crate::foundation::core::Point;
use crate::host::MapHost;
use crate::host::fetch::ImageFetcher;
use crate::host::layer::MarkerLayer;
use crate::resolve::session::{OmitReason, Resolved, ResolvedMarker};
use crate::resolve::viewport::ExportViewport;

/// Top-left destination of a marker icon: projected position, minus the export origin, minus
/// the icon anchor.
pub fn marker_position(marker: &MarkerLayer, host: &dyn MapHost, viewport: &ExportViewport) -> Point {
    let mut p = viewport.to_local(host.project(marker.lat_lng));
    if let Some([ax, ay]) = marker.icon_anchor {
        p.x -= ax;
        p.y -= ay;
    }
    p
}

/// Load a marker icon if its anchor-adjusted position lies on the raster.
///
/// Off-raster markers are skipped without fetching. Icon loads are not time-bounded.
pub async fn resolve_marker(
    marker: &MarkerLayer,
    host: &dyn MapHost,
    viewport: &ExportViewport,
    fetcher: &dyn ImageFetcher,
) -> Resolved<ResolvedMarker> {
    let Some(url) = marker.icon_url.as_deref().filter(|u| !u.is_empty()) else {
        return Resolved::Omitted(OmitReason::LoadFailed);
    };
    let position = marker_position(marker, host, viewport);
    if !viewport.canvas.contains_marker_point(position) {
        return Resolved::Omitted(OmitReason::OutOfBounds);
    }

    let bytes = match fetcher.fetch(url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(url, error = %e, "marker icon failed to load");
            return Resolved::Omitted(OmitReason::LoadFailed);
        }
    };
    match decode_image(&bytes) {
        Ok(image) => Resolved::Ready(ResolvedMarker { image, position }),
        Err(e) => {
            tracing::debug!(url, error = %e, "marker icon failed to decode");
            Resolved::Omitted(OmitReason::DecodeFailed)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/marker.rs"]
mod tests;
