use crate::error::{CodecError, Result};

/// Largest raster accepted, in pixels (256 MiB of ARGB)
pub const MAX_RASTER_PIXELS: usize = 1 << 26;

/// Opaque black, foreground
pub const ARGB_BLACK: u32 = 0xFF00_0000;
/// Opaque white, background
pub const ARGB_WHITE: u32 = 0xFFFF_FFFF;

/// Rendered symbol: one ARGB8888 value per pixel, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelRaster {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl PixelRaster {
    /// All-background raster, refused above [`MAX_RASTER_PIXELS`] or when
    /// the allocation fails
    pub fn blank(width: usize, height: usize) -> Result<Self> {
        let count = width
            .checked_mul(height)
            .filter(|&n| n <= MAX_RASTER_PIXELS)
            .ok_or_else(|| CodecError::invalid(format!("{width}x{height} raster is too large")))?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(count)
            .map_err(|_| CodecError::invalid(format!("cannot allocate {width}x{height} raster")))?;
        pixels.resize(count, ARGB_WHITE);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Raster width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Raster height
    pub fn height(&self) -> usize {
        self.height
    }

    /// ARGB pixels
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel at (x, y)
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    /// Paint a foreground rectangle (clipped)
    pub(crate) fn fill_dark(&mut self, left: usize, top: usize, width: usize, height: usize) {
        let right = (left + width).min(self.width);
        let bottom = (top + height).min(self.height);
        for y in top..bottom {
            self.pixels[y * self.width + left.min(right)..y * self.width + right].fill(ARGB_BLACK);
        }
    }

    /// Wire layout: big-endian i32 width and height, then A,R,G,B bytes per pixel
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + self.pixels.len() * 4);
        out.extend_from_slice(&(self.width as i32).to_be_bytes());
        out.extend_from_slice(&(self.height as i32).to_be_bytes());
        for &p in &self.pixels {
            out.extend_from_slice(&p.to_be_bytes());
        }
        out
    }

    /// Luminance view of the raster (for re-decoding)
    pub fn to_luma(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .map(|&p| {
                let r = (p >> 16) & 0xFF;
                let g = (p >> 8) & 0xFF;
                let b = p & 0xFF;
                ((r * 77 + g * 150 + b * 29) >> 8) as u8
            })
            .collect()
    }

    /// Convert to an `image` RGBA buffer
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let mut img = image::RgbaImage::new(self.width as u32, self.height as u32);
        for (i, px) in img.pixels_mut().enumerate() {
            let [a, r, g, b] = self.pixels[i].to_be_bytes();
            *px = image::Rgba([r, g, b, a]);
        }
        img
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_layout() {
        let mut raster = PixelRaster::blank(2, 1).unwrap();
        raster.fill_dark(1, 0, 1, 1);
        let bytes = raster.to_bytes();
        assert_eq!(&bytes[..8], &[0, 0, 0, 2, 0, 0, 0, 1]);
        assert_eq!(&bytes[8..12], &[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(&bytes[12..16], &[0xFF, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_oversized_raster_refused() {
        assert!(matches!(
            PixelRaster::blank(usize::MAX, 2),
            Err(CodecError::InvalidRequest(_))
        ));
        assert!(PixelRaster::blank(MAX_RASTER_PIXELS + 1, 1).is_err());
        assert!(PixelRaster::blank(0, 0).unwrap().pixels().is_empty());
    }

    #[test]
    fn test_luma_and_rgba() {
        let mut raster = PixelRaster::blank(3, 2).unwrap();
        raster.fill_dark(0, 1, 10, 10);
        assert_eq!(raster.to_luma(), vec![255, 255, 255, 0, 0, 0]);
        let img = raster.to_rgba_image();
        assert_eq!(img.get_pixel(0, 1).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(2, 0).0, [255, 255, 255, 255]);
    }
}
