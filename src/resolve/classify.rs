use std::collections::HashSet;

use crate::config::ExportOpts;
use crate::host::MapHost;
use crate::host::fetch::ImageFetcher;
use crate::host::layer::{CircleLayer, Layer, LayerKind, MarkerLayer, PathLayer, TileLayer};
use crate::resolve::marker::resolve_marker;
use crate::resolve::path::resolve_path;
use crate::resolve::session::{ExportSession, OmitReason, Resolved};
use crate::resolve::tile::resolve_tile_layer;
use crate::resolve::viewport::ExportViewport;

/// Which resolver a layer goes to.
#[derive(Clone, Copy, Debug)]
pub enum LayerClass<'a> {
    /// Marker with a rendered icon.
    Marker(&'a MarkerLayer),
    /// Tile raster.
    TileRaster(&'a TileLayer),
    /// Circle, registered for composite-time drawing.
    Circle(&'a CircleLayer),
    /// Generic vector path.
    Path(&'a PathLayer),
    /// Nothing to export.
    Ignored,
}

/// Dispatch a layer by capability. Markers without a rendered icon and paths without vertices
/// are ignored.
pub fn classify(layer: &Layer) -> LayerClass<'_> {
    match &layer.kind {
        LayerKind::Marker(m) if m.icon_url.as_deref().is_some_and(|u| !u.is_empty()) => {
            LayerClass::Marker(m)
        }
        LayerKind::TileRaster(t) => LayerClass::TileRaster(t),
        LayerKind::Circle(c) => LayerClass::Circle(c),
        LayerKind::Path(p) if !p.rings.is_empty() => LayerClass::Path(p),
        _ => LayerClass::Ignored,
    }
}

/// Resolve every layer on `host` into drawables.
///
/// Tile and marker loads run concurrently and all of them settle before this returns. Faulty or
/// unrecognized layers and failed resources are skipped; nothing here fails the export.
#[tracing::instrument(level = "debug", skip_all, fields(zoom = host.zoom()))]
pub async fn resolve_layers(
    host: &dyn MapHost,
    fetcher: &dyn ImageFetcher,
    viewport: ExportViewport,
    opts: &ExportOpts,
) -> ExportSession {
    let zoom = host.zoom();
    let timeout = opts.tile_timeout;
    let mut session = ExportSession::new(viewport, zoom);
    let vp = &viewport;

    let layers = host.layers();
    let mut tile_tasks = Vec::new();
    let mut marker_tasks = Vec::new();
    let mut seen_markers = HashSet::new();

    for entry in &layers {
        let layer = match entry {
            Ok(layer) => layer,
            Err(e) => {
                tracing::debug!(error = %e, "layer inspection failed, skipping");
                session.stats.layers_skipped += 1;
                continue;
            }
        };
        let id = layer.id;
        match classify(layer) {
            LayerClass::Marker(m) => {
                if seen_markers.insert(id) {
                    marker_tasks
                        .push(async move { (id, resolve_marker(m, host, vp, fetcher).await) });
                } else {
                    tracing::debug!(layer = id.0, reason = %OmitReason::Duplicate, "marker omitted");
                }
            }
            LayerClass::TileRaster(t) => {
                tile_tasks.push(async move {
                    (id, resolve_tile_layer(id, t, zoom, vp, fetcher, timeout).await)
                });
            }
            LayerClass::Circle(c) => {
                session.register_circle(id, c.clone());
            }
            LayerClass::Path(p) => match resolve_path(p, host, vp) {
                Resolved::Ready(path) => {
                    session.register_path(id, path);
                }
                Resolved::Omitted(reason) => {
                    tracing::debug!(layer = id.0, %reason, "path omitted");
                }
            },
            LayerClass::Ignored => {
                tracing::debug!(layer = id.0, "layer not exportable, skipping");
                session.stats.layers_skipped += 1;
            }
        }
    }

    let (tiles, markers) = futures::join!(
        futures::future::join_all(tile_tasks),
        futures::future::join_all(marker_tasks)
    );

    for (id, out) in tiles {
        match out {
            Ok(outcome) => {
                session.register_tile_layer(outcome.layer, outcome.requested);
            }
            Err(e) => {
                tracing::debug!(layer = id.0, error = %e, "tile layer skipped");
                session.stats.layers_skipped += 1;
            }
        }
    }
    for (id, out) in markers {
        match out {
            Resolved::Ready(marker) => {
                session.register_marker(id, marker);
            }
            Resolved::Omitted(reason) => {
                tracing::debug!(layer = id.0, %reason, "marker omitted");
            }
        }
    }

    session
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/classify.rs"]
mod tests;
