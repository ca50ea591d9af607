use wasm_bindgen::prelude::*;
use js_sys::{Array, Object, Reflect};

pub mod bitmap;
pub mod color;
pub mod error;
pub mod extract;
pub mod histogram;
pub mod options;
pub mod swatch;

pub use bitmap::{Bitmap, RgbaPixels, decode_rgba};
pub use color::{ExtractedColor, parse_hex, to_hex};
pub use error::{ExtractError, Result};
pub use extract::{
    CancelToken, ExtractColors, Extraction, Progress, extract_colors, extract_colors_async,
};
#[cfg(not(target_arch = "wasm32"))]
pub use extract::spawn_extraction;
pub use options::ExtractOptions;
pub use swatch::{Swatch, label_swatches, swatch_label};

// ------------------------------------------------------------
// JS glue
// ------------------------------------------------------------

fn js_options(
    ignore_bottom_pct: f64,
    max_colors: Option<usize>,
    yield_every_pixels: Option<u32>,
) -> ExtractOptions {
    let mut opts = ExtractOptions::default().with_ignore_bottom_percent(ignore_bottom_pct);
    if let Some(n) = max_colors {
        opts = opts.with_max_colors(n);
    }
    if let Some(n) = yield_every_pixels {
        opts = opts.with_yield_every_pixels(n as u64);
    }
    opts
}

fn js_pixels(pixels: Option<Vec<u8>>, width: u32, height: u32) -> Result<RgbaPixels> {
    let data = pixels.ok_or_else(|| ExtractError::invalid_input("no bitmap supplied"))?;
    RgbaPixels::new(width, height, data)
}

/// `[{ hex, pct }, ...]` in the shape the color grid expects.
fn colors_to_js(colors: &[ExtractedColor]) -> std::result::Result<Array, JsValue> {
    let out = Array::new();
    for c in colors {
        let entry = Object::new();
        Reflect::set(&entry, &JsValue::from_str("hex"), &JsValue::from_str(&c.hex))?;
        Reflect::set(&entry, &JsValue::from_str("pct"), &JsValue::from_f64(c.pct))?;
        out.push(&entry);
    }
    Ok(out)
}

/// Extract the dominant colors of a canvas `ImageData` buffer in one call.
///
/// `pixels` is the raw RGBA data (`width * height * 4` bytes). The bottom
/// `ignore_bottom_pct` percent of rows (clamped to 0–12) is left out.
/// Returns an array of `{ hex: "#rrggbb", pct }`, most frequent first.
#[wasm_bindgen]
pub fn extract_colors_rgba(
    pixels: Option<Vec<u8>>,
    width: u32,
    height: u32,
    ignore_bottom_pct: f64,
    max_colors: Option<usize>,
    yield_every_pixels: Option<u32>,
) -> std::result::Result<Array, JsValue> {
    let bitmap = js_pixels(pixels, width, height)?;
    let opts = js_options(ignore_bottom_pct, max_colors, yield_every_pixels);
    let colors = extract_colors(&bitmap, &opts)?;
    colors_to_js(&colors)
}

/// Decode an uploaded file (PNG, JPEG, WEBP, ...) and extract its colors.
#[wasm_bindgen]
pub fn extract_colors_image(
    input: Vec<u8>,
    ignore_bottom_pct: f64,
    max_colors: Option<usize>,
) -> std::result::Result<Array, JsValue> {
    let img = decode_rgba(&input)?;
    let opts = js_options(ignore_bottom_pct, max_colors, None);
    let colors = extract_colors(&img, &opts)?;
    colors_to_js(&colors)
}

/// Step-by-step extraction for the upload page.
///
/// JS drives the scan and awaits a frame between steps so the page keeps
/// painting while a large CAD file is processed:
///
/// ```js
/// const job = new ColorExtractor(data, w, h, ignorePct, 120, 300000);
/// while (!job.step()) await new Promise(requestAnimationFrame);
/// const colors = job.finish();
/// ```
#[wasm_bindgen]
pub struct ColorExtractor {
    inner: Extraction<RgbaPixels>,
}

#[wasm_bindgen]
impl ColorExtractor {
    #[wasm_bindgen(constructor)]
    pub fn new(
        pixels: Option<Vec<u8>>,
        width: u32,
        height: u32,
        ignore_bottom_pct: f64,
        max_colors: Option<usize>,
        yield_every_pixels: Option<u32>,
    ) -> std::result::Result<ColorExtractor, JsValue> {
        let bitmap = js_pixels(pixels, width, height)?;
        let opts = js_options(ignore_bottom_pct, max_colors, yield_every_pixels);
        Ok(ColorExtractor {
            inner: Extraction::new(bitmap, opts)?,
        })
    }

    /// Scan one chunk. Returns `true` once every pixel has been visited.
    pub fn step(&mut self) -> std::result::Result<bool, JsValue> {
        Ok(self.inner.step()? == Progress::Complete)
    }

    /// Fraction of the scan done, for a progress bar.
    pub fn progress(&self) -> f64 {
        self.inner.progress()
    }

    /// Rank the colors. Any chunks not yet stepped through are scanned first.
    pub fn finish(self) -> std::result::Result<Array, JsValue> {
        let colors = self.inner.finish()?;
        colors_to_js(&colors)
    }
}

/// Label used for the `index`-th swatch of an exported artwork.
#[wasm_bindgen(js_name = swatch_label)]
pub fn swatch_label_js(index: usize) -> String {
    swatch_label(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_pixels_are_invalid_input() {
        let err = js_pixels(None, 2, 2).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidInput { .. }), "{err:?}");
        assert!(js_pixels(Some(vec![0; 16]), 2, 2).is_ok());
        assert!(matches!(
            js_pixels(Some(vec![0; 16]), 3, 2),
            Err(ExtractError::InvalidInput { .. })
        ));
    }

    #[test]
    fn js_arguments_are_clamped_at_use() {
        let opts = js_options(20.0, Some(0), Some(1));
        assert_eq!(opts.ignore_bottom(), 12.0);
        assert_eq!(opts.color_limit(), 1);
        assert_eq!(opts.yield_interval(), 50_000);

        let opts = js_options(3.0, None, None);
        assert_eq!(opts.color_limit(), 120);
        assert_eq!(opts.yield_interval(), 350_000);
    }
}
