use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::assets::decode::unpremultiply_rgba8_in_place;
use crate::config::ExportOpts;
use crate::foundation::error::{MapExportError, MapExportResult};
use crate::host::MapHost;
use crate::host::fetch::ImageFetcher;
use crate::render::FrameRGBA;
use crate::render::cpu::composite;
use crate::resolve::classify::resolve_layers;
use crate::resolve::session::ExportStats;
use crate::resolve::viewport::compute_viewport;

/// The finished export: PNG bytes plus metadata.
#[derive(Clone, Debug)]
pub struct ExportedImage {
    /// PNG-encoded raster.
    pub png: Vec<u8>,
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Suggested file name for the artifact.
    pub file_name: String,
    /// What was drawn and what was left out.
    pub stats: ExportStats,
}

impl ExportedImage {
    /// Write the PNG into `dir` under [`ExportedImage::file_name`] and return the path.
    pub fn save_to_dir(&self, dir: impl AsRef<Path>) -> MapExportResult<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        self.save_as(&path)?;
        Ok(path)
    }

    /// Write the PNG to `path`, creating parent directories as needed.
    pub fn save_as(&self, path: impl AsRef<Path>) -> MapExportResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output directory '{}'", parent.display()))?;
        }
        std::fs::write(path, &self.png)
            .with_context(|| format!("write exported image '{}'", path.display()))?;
        Ok(())
    }
}

/// Encode a composited frame as PNG (straight alpha).
pub fn encode_png(frame: &FrameRGBA) -> MapExportResult<Vec<u8>> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() != expected {
        return Err(MapExportError::encode(format!(
            "frame data is {} bytes, expected {expected}",
            frame.data.len()
        )));
    }
    let mut rgba = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut rgba);
    }
    let img = image::RgbaImage::from_raw(frame.width, frame.height, rgba)
        .ok_or_else(|| MapExportError::encode("frame buffer does not match its dimensions"))?;

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| MapExportError::encode(format!("png encoding failed: {e}")))?;
    Ok(out)
}

/// Export the host's current viewport to PNG.
///
/// Resolves every layer concurrently, composites once all loads have settled, then encodes.
/// Must run inside a tokio runtime with the time driver enabled (tile timeouts).
#[tracing::instrument(skip_all, fields(crop = ?opts.crop))]
pub async fn export_viewport(
    host: &dyn MapHost,
    fetcher: &dyn ImageFetcher,
    opts: &ExportOpts,
) -> MapExportResult<ExportedImage> {
    let viewport = compute_viewport(host.pixel_bounds(), host.size(), opts.crop)?;
    let session = resolve_layers(host, fetcher, viewport, opts).await;
    let frame = composite(&session, host, opts)?;
    let png = encode_png(&frame)?;

    let stats = session.stats;
    tracing::info!(
        width = frame.width,
        height = frame.height,
        tiles = stats.tiles_drawn,
        tiles_omitted = stats.tiles_omitted,
        markers = stats.markers,
        paths = stats.paths,
        circles = stats.circles,
        bytes = png.len(),
        "map exported"
    );

    Ok(ExportedImage {
        png,
        width: frame.width,
        height: frame.height,
        file_name: opts.file_name.clone(),
        stats,
    })
}

/// [`export_viewport`] driven to completion on a current-thread runtime.
pub fn export_viewport_blocking(
    host: &dyn MapHost,
    fetcher: &dyn ImageFetcher,
    opts: &ExportOpts,
) -> MapExportResult<ExportedImage> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("build export runtime")?;
    rt.block_on(export_viewport(host, fetcher, opts))
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
