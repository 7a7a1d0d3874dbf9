use crate::foundation::core::{Canvas, PixelBounds, Point};
use crate::foundation::error::{MapExportError, MapExportResult};

/// Largest raster side the compositor accepts.
pub const MAX_RASTER_SIDE: u32 = u16::MAX as u32;

/// Output raster size plus the map-pixel rectangle it captures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportViewport {
    /// Output raster dimensions.
    pub canvas: Canvas,
    /// Captured rectangle in absolute map pixels; `min` maps to raster `(0, 0)`.
    pub bounds: PixelBounds,
}

impl ExportViewport {
    /// Translate an absolute map pixel into raster space.
    pub fn to_local(&self, p: Point) -> Point {
        self.bounds.to_local(p)
    }
}

/// Apply the crop factor to the visible viewport.
///
/// `None` or `crop <= 1` leaves bounds and size untouched. Larger factors grow the bounds
/// symmetrically around their centre and multiply each raster side by `crop`, truncating.
#[tracing::instrument(level = "debug", skip(bounds))]
pub fn compute_viewport(
    bounds: PixelBounds,
    size: Canvas,
    crop: Option<f64>,
) -> MapExportResult<ExportViewport> {
    let bounds = bounds.validated()?;
    if size.width == 0 || size.height == 0 {
        return Err(MapExportError::validation(format!(
            "viewport size must be non-zero, got {}x{}",
            size.width, size.height
        )));
    }

    let crop = match crop {
        Some(c) if !c.is_finite() => {
            return Err(MapExportError::validation(format!(
                "crop factor must be finite, got {c}"
            )));
        }
        Some(c) if c > 1.0 => c,
        _ => {
            check_raster_size(size)?;
            return Ok(ExportViewport {
                canvas: size,
                bounds,
            });
        }
    };

    let add_x = bounds.width() / 2.0 * (crop - 1.0);
    let add_y = bounds.height() / 2.0 * (crop - 1.0);
    let expanded = PixelBounds::new(
        Point::new(bounds.min.x - add_x, bounds.min.y - add_y),
        Point::new(bounds.max.x + add_x, bounds.max.y + add_y),
    )
    .validated()?;

    let width = (f64::from(size.width) * crop).floor();
    let height = (f64::from(size.height) * crop).floor();
    if width > f64::from(MAX_RASTER_SIDE) || height > f64::from(MAX_RASTER_SIDE) {
        return Err(MapExportError::validation(format!(
            "cropped raster {width}x{height} exceeds {MAX_RASTER_SIDE} pixels per side"
        )));
    }
    let canvas = Canvas::new(width as u32, height as u32);

    Ok(ExportViewport {
        canvas,
        bounds: expanded,
    })
}

fn check_raster_size(size: Canvas) -> MapExportResult<()> {
    if size.width > MAX_RASTER_SIDE || size.height > MAX_RASTER_SIDE {
        return Err(MapExportError::validation(format!(
            "raster {}x{} exceeds {MAX_RASTER_SIDE} pixels per side",
            size.width, size.height
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/viewport.rs"]
mod tests;
