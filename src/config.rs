use std::time::Duration;

/// Default name of the downloadable artifact.
pub const DEFAULT_FILE_NAME: &str = "exported.png";

/// Default upper bound for a single tile load.
pub const DEFAULT_TILE_TIMEOUT: Duration = Duration::from_secs(10);

/// Options controlling one export call.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportOpts {
    /// Crop factor. `None` or values `<= 1` export exactly the visible viewport; values `> 1`
    /// expand the captured area symmetrically and scale the output raster by the same factor.
    pub crop: Option<f64>,
    /// Upper bound for fetching and decoding a single tile. Timed-out tiles are omitted.
    pub tile_timeout: Duration,
    /// If set, the output raster is cleared to this straight-alpha RGBA8 color before tiles are
    /// drawn. Transparent otherwise.
    pub clear_rgba: Option<[u8; 4]>,
    /// File name used when the artifact is saved to a directory.
    pub file_name: String,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            crop: None,
            tile_timeout: DEFAULT_TILE_TIMEOUT,
            clear_rgba: None,
            file_name: DEFAULT_FILE_NAME.to_owned(),
        }
    }
}

impl ExportOpts {
    /// Defaults with `MAP_EXPORT_TILE_TIMEOUT_MS` and `MAP_EXPORT_CROP` applied.
    ///
    /// Unparsable or out-of-range values are ignored.
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Some(ms) = std::env::var("MAP_EXPORT_TILE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&n| n > 0)
        {
            opts.tile_timeout = Duration::from_millis(ms);
        }
        if let Some(crop) = std::env::var("MAP_EXPORT_CROP")
            .ok()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|c| c.is_finite())
        {
            opts.crop = Some(crop);
        }
        opts
    }

    /// Return options with the given crop factor.
    pub fn with_crop(mut self, crop: Option<f64>) -> Self {
        self.crop = crop;
        self
    }

    /// Return options with the given per-tile timeout.
    pub fn with_tile_timeout(mut self, timeout: Duration) -> Self {
        self.tile_timeout = timeout;
        self
    }

    /// Return options with a configured clear color for the output raster.
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }

    /// Return options with a different artifact file name.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
