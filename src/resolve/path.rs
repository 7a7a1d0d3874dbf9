use crate::host::MapHost;
use crate::host::layer::PathLayer;
use crate::resolve::session::{OmitReason, Resolved, ResolvedPath};
use crate::resolve::viewport::ExportViewport;

/// Project a path's vertices into raster space.
///
/// The whole path is kept as soon as one vertex passes [`Canvas::admits_path_vertex`];
/// otherwise it is dropped.
///
/// [`Canvas::admits_path_vertex`]: crate::foundation::core::Canvas::admits_path_vertex
pub fn resolve_path(
    path: &PathLayer,
    host: &dyn MapHost,
    viewport: &ExportViewport,
) -> Resolved<ResolvedPath> {
    let points: Vec<_> = path
        .vertices()
        .into_iter()
        .map(|ll| viewport.to_local(host.project(ll)))
        .collect();
    if !points.iter().any(|&p| viewport.canvas.admits_path_vertex(p)) {
        return Resolved::Omitted(OmitReason::OutOfBounds);
    }
    Resolved::Ready(ResolvedPath {
        points,
        closed: path.style.fill,
        style: path.style.clone(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/path.rs"]
mod tests;
