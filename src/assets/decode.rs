use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{MapExportError, MapExportResult};

/// A decoded raster ready for compositing.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl DecodedImage {
    /// Wrap premultiplied RGBA8 pixels, checking the buffer length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> MapExportResult<Self> {
        if rgba8_premul.len() != width as usize * height as usize * 4 {
            return Err(MapExportError::decode(format!(
                "rgba buffer length {} does not match {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }
}

/// Largest image side the rasterizer can draw.
pub const MAX_IMAGE_SIDE: u32 = u16::MAX as u32;

/// Decode encoded raster (PNG, JPEG, WebP, ...) or SVG bytes into premultiplied RGBA8.
///
/// SVG documents are rasterized at their intrinsic size, which is how icon images are displayed.
pub fn decode_image(bytes: &[u8]) -> MapExportResult<DecodedImage> {
    if looks_like_svg(bytes) {
        return decode_svg(bytes);
    }

    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let (width, height) = (dyn_img.width(), dyn_img.height());
    if width > MAX_IMAGE_SIDE || height > MAX_IMAGE_SIDE {
        return Err(MapExportError::decode(format!(
            "image size {width}x{height} exceeds {MAX_IMAGE_SIDE} per side"
        )));
    }
    let rgba = dyn_img.to_rgba8();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(DecodedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn decode_svg(bytes: &[u8]) -> MapExportResult<DecodedImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;

    let size = tree.size();
    if !size.width().is_finite() || !size.height().is_finite() {
        return Err(MapExportError::decode("svg has invalid width/height"));
    }
    let width = (size.width().ceil() as u32).max(1);
    let height = (size.height().ceil() as u32).max(1);

    const MAX_DIM: u32 = 4096;
    if width > MAX_DIM || height > MAX_DIM {
        return Err(MapExportError::decode(format!(
            "svg raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| MapExportError::decode("failed to allocate svg pixmap"))?;
    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    // tiny-skia pixmaps are already premultiplied RGBA8.
    DecodedImage::from_premul(width, height, pixmap.take())
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    // The cut may split a multibyte character; sniff the valid prefix.
    let text = match std::str::from_utf8(head) {
        Ok(text) => text,
        Err(e) => std::str::from_utf8(&head[..e.valid_up_to()]).unwrap_or_default(),
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Convert premultiplied RGBA8 back to straight alpha, in place.
pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
