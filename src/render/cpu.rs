use std::sync::Arc;

use crate::assets::decode::DecodedImage;
use crate::config::ExportOpts;
use crate::foundation::core::{Affine, BezPath, Point, Rect};
use crate::foundation::error::{MapExportError, MapExportResult};
use crate::host::MapHost;
use crate::render::FrameRGBA;
use crate::render::style::fill_and_stroke;
use crate::resolve::circle::CircleGeometry;
use crate::resolve::session::{ExportSession, ResolvedPath};

/// Draw every resolved drawable onto a fresh raster.
///
/// Order is fixed: tiles (per layer, row-major), paths, markers, then circles. Circle geometry
/// is read from `host` now, not during resolution. Images the rasterizer cannot take are
/// skipped; only an unusable raster size fails.
#[tracing::instrument(level = "debug", skip_all, fields(
    width = session.viewport.canvas.width,
    height = session.viewport.canvas.height,
))]
pub fn composite(
    session: &ExportSession,
    host: &dyn MapHost,
    opts: &ExportOpts,
) -> MapExportResult<FrameRGBA> {
    let canvas = session.viewport.canvas;
    let width: u16 = canvas
        .width
        .try_into()
        .map_err(|_| MapExportError::render("raster width exceeds u16"))?;
    let height: u16 = canvas
        .height
        .try_into()
        .map_err(|_| MapExportError::render("raster height exceeds u16"))?;
    if width == 0 || height == 0 {
        return Err(MapExportError::render("raster has zero area"));
    }

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_paint_transform(Affine::IDENTITY);

    if let Some([r, g, b, a]) = opts.clear_rgba {
        ctx.set_transform(Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        ctx.fill_rect(&Rect::new(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));
    }

    for layer in session.tile_layers.values() {
        for tile in layer.tiles.values() {
            if let Err(e) = draw_image(
                &mut ctx,
                &tile.image,
                tile.position,
                Some(tile.draw_size),
                tile.opacity,
            ) {
                tracing::debug!(layer = layer.id.0, error = %e, "tile image skipped");
            }
        }
    }

    ctx.set_transform(Affine::IDENTITY);
    for path in session.paths.values() {
        if let Some(outline) = path_outline(path) {
            fill_and_stroke(&mut ctx, &outline, &path.style);
        }
    }

    for (id, marker) in &session.markers {
        if let Err(e) = draw_image(&mut ctx, &marker.image, marker.position, None, 1.0) {
            tracing::debug!(layer = id.0, error = %e, "marker image skipped");
        }
    }

    ctx.set_transform(Affine::IDENTITY);
    for circle in session.circles.values() {
        let center = session.viewport.to_local(host.project(circle.lat_lng));
        let Some(geometry) = CircleGeometry::from_layer(circle, center) else {
            continue;
        };
        fill_and_stroke(&mut ctx, &geometry.to_path(), &circle.style);
    }

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut pixmap);

    Ok(FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data: pixmap.data_as_u8_slice().to_vec(),
        premultiplied: true,
    })
}

/// Polyline through the resolved vertices, closed for filled shapes.
pub fn path_outline(path: &ResolvedPath) -> Option<BezPath> {
    let (first, rest) = path.points.split_first()?;
    let mut out = BezPath::new();
    out.move_to(*first);
    for &p in rest {
        out.line_to(p);
    }
    if path.closed {
        out.close_path();
    }
    Some(out)
}

fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    image: &DecodedImage,
    position: Point,
    draw_size: Option<f64>,
    opacity: f32,
) -> MapExportResult<()> {
    if image.width == 0 || image.height == 0 || opacity <= 0.0 {
        return Ok(());
    }
    let pixmap = image_premul_bytes_to_pixmap(&image.rgba8_premul, image.width, image.height)?;
    let (w, h) = (f64::from(image.width), f64::from(image.height));

    let mut transform = Affine::translate(position.to_vec2());
    if let Some(size) = draw_size {
        transform *= Affine::scale_non_uniform(size / w, size / h);
    }

    ctx.set_transform(transform);
    ctx.set_paint(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    });
    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
    }
    ctx.fill_rect(&Rect::new(0.0, 0.0, w, h));
    if opacity < 1.0 {
        ctx.pop_layer();
    }
    Ok(())
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> MapExportResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| MapExportError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| MapExportError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(MapExportError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels: Vec<_> = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
