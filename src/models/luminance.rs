use std::borrow::Cow;

use crate::error::CodecError;

/// Rectangle in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    /// Left edge
    pub left: usize,
    /// Top edge
    pub top: usize,
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
}

impl CropRect {
    /// Create a crop rectangle
    pub fn new(left: usize, top: usize, width: usize, height: usize) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Centered square whose side is `percent`% of the frame's short side
    pub fn centered_square(frame_width: usize, frame_height: usize, percent: usize) -> Self {
        let side = frame_width.min(frame_height) * percent.min(100) / 100;
        Self {
            left: (frame_width - side) / 2,
            top: (frame_height - side) / 2,
            width: side,
            height: side,
        }
    }
}

/// Immutable 8-bit luminance frame, row-major without padding
#[derive(Debug, Clone)]
pub struct LuminanceImage<'a> {
    data: Cow<'a, [u8]>,
    width: usize,
    height: usize,
}

impl<'a> LuminanceImage<'a> {
    /// Wrap a caller-owned buffer. The buffer must hold exactly
    /// `width * height` samples.
    pub fn new(data: &'a [u8], width: usize, height: usize) -> Result<Self, CodecError> {
        let expected = width
            .checked_mul(height)
            .ok_or_else(|| CodecError::InvalidRequest("image dimensions overflow".into()))?;
        if data.len() != expected {
            return Err(CodecError::InvalidRequest(format!(
                "luminance buffer holds {} samples, expected {expected}",
                data.len()
            )));
        }
        Ok(Self {
            data: Cow::Borrowed(data),
            width,
            height,
        })
    }

    /// Take ownership of a luminance buffer
    pub fn from_vec(data: Vec<u8>, width: usize, height: usize) -> Result<LuminanceImage<'static>, CodecError> {
        if Some(data.len()) != width.checked_mul(height) {
            return Err(CodecError::InvalidRequest(format!(
                "luminance buffer holds {} samples, expected {width}x{height}",
                data.len()
            )));
        }
        Ok(LuminanceImage {
            data: Cow::Owned(data),
            width,
            height,
        })
    }

    /// Convert an `image` grayscale buffer
    pub fn from_gray_image(image: &image::GrayImage) -> LuminanceImage<'static> {
        LuminanceImage {
            data: Cow::Owned(image.as_raw().clone()),
            width: image.width() as usize,
            height: image.height() as usize,
        }
    }

    /// Frame width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Frame height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw samples
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Sample at (x, y)
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    /// Copy out the part of the frame covered by `rect`.
    ///
    /// The rectangle is clipped to the frame; an empty intersection is
    /// rejected.
    pub fn crop(&self, rect: CropRect) -> Result<LuminanceImage<'static>, CodecError> {
        let right = rect.left.saturating_add(rect.width).min(self.width);
        let bottom = rect.top.saturating_add(rect.height).min(self.height);
        if rect.left >= right || rect.top >= bottom {
            return Err(CodecError::InvalidRequest("crop rectangle outside frame".into()));
        }
        let w = right - rect.left;
        let mut out = Vec::with_capacity(w * (bottom - rect.top));
        for y in rect.top..bottom {
            let start = y * self.width + rect.left;
            out.extend_from_slice(&self.data[start..start + w]);
        }
        LuminanceImage::from_vec(out, w, bottom - rect.top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_must_match() {
        let data = [0u8; 12];
        assert!(LuminanceImage::new(&data, 4, 3).is_ok());
        assert!(LuminanceImage::new(&data, 4, 4).is_err());
        assert!(LuminanceImage::new(&data[..11], 4, 3).is_err());
    }

    #[test]
    fn test_crop_clips_to_frame() {
        let data: Vec<u8> = (0..16).collect();
        let image = LuminanceImage::new(&data, 4, 4).unwrap();
        let cropped = image.crop(CropRect::new(2, 1, 10, 2)).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (2, 2));
        assert_eq!(cropped.data(), &[6, 7, 10, 11]);
        assert!(image.crop(CropRect::new(4, 0, 1, 1)).is_err());
    }

    #[test]
    fn test_centered_square() {
        let rect = CropRect::centered_square(640, 480, 60);
        assert_eq!(rect, CropRect::new(176, 96, 288, 288));
    }
}
