//! Compositing resolved drawables onto the output raster.

/// CPU compositor.
pub mod cpu;
/// Fill/stroke styling shared by paths and circles.
pub mod style;

/// A composited raster.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixels, `width * height * 4` bytes.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied by alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA8 value at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}
