//! Tunable parameters for a single extraction run.
//!
//! Raw field values may come straight from a UI slider or a JSON config file,
//! so every accessor applies the clamping rules instead of trusting them.

use serde::{Deserialize, Serialize};

pub const MAX_IGNORE_BOTTOM_PERCENT: f64 = 12.0;
pub const DEFAULT_MAX_COLORS: usize = 120;
pub const DEFAULT_YIELD_EVERY_PIXELS: u64 = 350_000;
pub const MIN_YIELD_EVERY_PIXELS: u64 = 50_000;
pub const MAX_YIELD_EVERY_PIXELS: u64 = 2_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractOptions {
    /// Share of the image height, from the bottom, left out of the scan.
    /// CAD exports often carry a footer or watermark strip there.
    pub ignore_bottom_percent: f64,
    pub max_colors: usize,
    pub yield_every_pixels: u64,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            ignore_bottom_percent: 0.0,
            max_colors: DEFAULT_MAX_COLORS,
            yield_every_pixels: DEFAULT_YIELD_EVERY_PIXELS,
        }
    }
}

impl ExtractOptions {
    pub fn with_ignore_bottom_percent(mut self, pct: f64) -> Self {
        self.ignore_bottom_percent = pct;
        self
    }

    pub fn with_max_colors(mut self, max_colors: usize) -> Self {
        self.max_colors = max_colors;
        self
    }

    pub fn with_yield_every_pixels(mut self, pixels: u64) -> Self {
        self.yield_every_pixels = pixels;
        self
    }

    /// Bottom-ignore percentage clamped into `[0, 12]`; NaN counts as 0.
    pub fn ignore_bottom(&self) -> f64 {
        if self.ignore_bottom_percent.is_nan() {
            return 0.0;
        }
        self.ignore_bottom_percent.clamp(0.0, MAX_IGNORE_BOTTOM_PERCENT)
    }

    pub fn color_limit(&self) -> usize {
        self.max_colors.max(1)
    }

    pub fn yield_interval(&self) -> u64 {
        self.yield_every_pixels
            .clamp(MIN_YIELD_EVERY_PIXELS, MAX_YIELD_EVERY_PIXELS)
    }

    /// Number of rows, from the top, that take part in the scan.
    pub fn scan_height(&self, height: u32) -> u32 {
        let ignore_rows = (height as f64 * self.ignore_bottom() / 100.0).floor() as u32;
        height.saturating_sub(ignore_rows).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_upload_page() {
        let opts = ExtractOptions::default();
        assert_eq!(opts.ignore_bottom(), 0.0);
        assert_eq!(opts.color_limit(), 120);
        assert_eq!(opts.yield_interval(), 350_000);
    }

    #[test]
    fn values_are_clamped_at_use() {
        let opts = ExtractOptions::default()
            .with_ignore_bottom_percent(20.0)
            .with_max_colors(0)
            .with_yield_every_pixels(10);
        assert_eq!(opts.ignore_bottom(), 12.0);
        assert_eq!(opts.color_limit(), 1);
        assert_eq!(opts.yield_interval(), MIN_YIELD_EVERY_PIXELS);

        let opts = opts
            .with_ignore_bottom_percent(-3.0)
            .with_yield_every_pixels(u64::MAX);
        assert_eq!(opts.ignore_bottom(), 0.0);
        assert_eq!(opts.yield_interval(), MAX_YIELD_EVERY_PIXELS);

        let opts = opts.with_ignore_bottom_percent(f64::NAN);
        assert_eq!(opts.ignore_bottom(), 0.0);
    }

    #[test]
    fn scan_height_drops_bottom_rows() {
        let opts = ExtractOptions::default().with_ignore_bottom_percent(10.0);
        assert_eq!(opts.scan_height(100), 90);
        // floor(9 * 0.1) == 0
        assert_eq!(opts.scan_height(9), 9);
        assert_eq!(opts.scan_height(1), 1);

        let opts = opts.with_ignore_bottom_percent(50.0);
        assert_eq!(opts.scan_height(10), 9);
    }

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let opts: ExtractOptions =
            serde_json::from_str(r#"{"ignoreBottomPercent": 5, "maxColors": 40}"#).unwrap();
        assert_eq!(opts.ignore_bottom_percent, 5.0);
        assert_eq!(opts.max_colors, 40);
        assert_eq!(opts.yield_every_pixels, DEFAULT_YIELD_EVERY_PIXELS);
    }
}
