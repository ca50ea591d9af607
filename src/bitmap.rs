use image::RgbaImage;

use crate::error::{ExtractError, Result};

/// Read-only view of a decoded RGBA bitmap.
///
/// Rows are handed out as `width * 4` bytes in R, G, B, A order.
pub trait Bitmap {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn row(&self, y: u32) -> &[u8];
}

impl<B: Bitmap + ?Sized> Bitmap for &B {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn row(&self, y: u32) -> &[u8] {
        (**self).row(y)
    }
}

impl Bitmap for RgbaImage {
    fn width(&self) -> u32 {
        image::ImageBuffer::width(self)
    }

    fn height(&self) -> u32 {
        image::ImageBuffer::height(self)
    }

    fn row(&self, y: u32) -> &[u8] {
        let stride = image::ImageBuffer::width(self) as usize * 4;
        let start = y as usize * stride;
        &self.as_raw()[start..start + stride]
    }
}

/// An owned RGBA buffer, e.g. the `ImageData` of a browser canvas.
#[derive(Debug, Clone)]
pub struct RgbaPixels {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbaPixels {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| {
                ExtractError::invalid_input(format!("{width}x{height} bitmap is too large"))
            })?;
        if data.len() != expected {
            return Err(ExtractError::invalid_input(format!(
                "expected {expected} RGBA bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

impl Bitmap for RgbaPixels {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * 4;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }
}

pub(crate) fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(ExtractError::invalid_input(format!(
            "image has invalid dimensions {width}x{height}"
        )));
    }
    Ok(())
}

/// Decode an uploaded image file into an RGBA bitmap.
pub fn decode_rgba(input: &[u8]) -> Result<RgbaImage> {
    if input.is_empty() {
        return Err(ExtractError::invalid_input("image file is empty"));
    }
    let img = image::load_from_memory(input)?;
    let rgba = img.to_rgba8();
    check_dimensions(rgba.width(), rgba.height())?;
    Ok(rgba)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    #[test]
    fn raw_buffer_must_match_dimensions() {
        assert!(RgbaPixels::new(2, 2, vec![0; 16]).is_ok());
        let err = RgbaPixels::new(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidInput { .. }));
        let err = RgbaPixels::new(0, 2, Vec::new()).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidInput { .. }));
    }

    #[test]
    fn oversized_dimensions_are_rejected_not_wrapped() {
        let err = RgbaPixels::new(u32::MAX, u32::MAX, Vec::new()).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidInput { .. }), "{err:?}");
        let err = RgbaPixels::new(32768, 32768, Vec::new()).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidInput { .. }), "{err:?}");
    }

    #[test]
    fn into_raw_hands_back_the_buffer() {
        let data: Vec<u8> = (0..8).collect();
        let pixels = RgbaPixels::new(1, 2, data.clone()).unwrap();
        assert_eq!(pixels.into_raw(), data);
    }

    #[test]
    fn rows_are_width_times_four() {
        let data: Vec<u8> = (0..24).collect();
        let pixels = RgbaPixels::new(3, 2, data).unwrap();
        assert_eq!(pixels.row(1), &[12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23]);

        let img = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 4]));
        assert_eq!(Bitmap::row(&img, 1).len(), 12);
        assert_eq!(Bitmap::height(&&img), 2);
    }

    #[test]
    fn decodes_png_bytes() {
        let img = RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 255]));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();

        let decoded = decode_rgba(&buf).unwrap();
        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.get_pixel(3, 2), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(decode_rgba(b"not an image"), Err(ExtractError::Decode(_))));
        assert!(matches!(decode_rgba(&[]), Err(ExtractError::InvalidInput { .. })));
    }
}
