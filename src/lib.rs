//! symcodec - barcode and QR code engine
//!
//! Decodes QR codes and nine linear symbologies from 8-bit luminance
//! frames, and renders content into ARGB rasters for re-display. Every
//! call is a pure function of its inputs and safe to run from any thread.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Decode and encode options plus process-wide tunables
pub mod config;
/// QR code decoding modules (error correction, format extraction, data modes)
pub mod decoder;
/// QR code detection modules (finder patterns, alignment, timing)
pub mod detector;
/// QR code encoding modules (segmentation, matrix building, masking)
pub mod encoder;
/// Error taxonomy
pub mod error;
/// Linear symbologies and the scan-line reader
pub mod linear;
/// Core data structures (BitMatrix, Point, Symbology, rasters, etc.)
pub mod models;
/// Symbology dispatch and format literals
pub mod registry;
/// Module grid and bar rasterization
pub mod render;
/// Utility functions (binarization, geometry)
pub mod utils;

pub use config::{DecodeOptions, EncodeOptions};
pub use error::{CodecError, Result};
pub use models::{
    BitMatrix, CropRect, DecodedSymbol, ECLevel, EncodingRequest, LuminanceImage, MaskPattern,
    PixelRaster, Point, Symbology, Version,
};

use log::debug;

use decoder::qr_decoder::QrDecoder;
use encoder::qr_encoder::QrEncoder;
use utils::binarization::adaptive_binarize;

/// Share of the short side covered by the first `decode_frame` attempt
const FRAME_CROP_PERCENT: usize = 60;

/// Decode a camera frame
///
/// # Arguments
/// * `luminance` - Row-major 8-bit samples, exactly `width * height` of them
/// * `width` - Frame width in pixels
/// * `height` - Frame height in pixels
/// * `focus_mode` - Spend more time per frame (see [`DecodeOptions::try_harder`])
///
/// # Returns
/// `(text, format literal)` of the first symbol found, or `None` for any
/// failure
pub fn decode(luminance: &[u8], width: i32, height: i32, focus_mode: bool) -> Option<(String, String)> {
    let width = usize::try_from(width).ok()?;
    let height = usize::try_from(height).ok()?;
    let image = LuminanceImage::new(luminance, width, height).ok()?;
    let symbol = decode_image(&image, &DecodeOptions::with_try_harder(focus_mode)).ok()?;
    Some((symbol.text, registry::literal(symbol.symbology).to_string()))
}

/// Encode content and serialize the raster
///
/// # Arguments
/// * `content` - Text to encode
/// * `format` - Format literal such as `QR_CODE` or `EAN_13`; unknown
///   literals fall back to `QR_CODE`
/// * `width` - Raster width in pixels
/// * `height` - Raster height in pixels
///
/// # Returns
/// Big-endian width and height followed by ARGB bytes per pixel, or `None`
/// when the content or size is unusable
pub fn encode(content: &str, format: &str, width: i32, height: i32) -> Option<Vec<u8>> {
    let request = EncodingRequest::new(content, registry::resolve_format(format), width, height);
    encode_request(&request, &EncodeOptions::default())
        .ok()
        .map(|raster| raster.to_bytes())
}

/// Decode the first symbol in a luminance frame: QR first, then linear
pub fn decode_image(image: &LuminanceImage, options: &DecodeOptions) -> Result<DecodedSymbol> {
    let cropped;
    let image = match options.crop {
        Some(rect) => {
            cropped = image.crop(rect)?;
            &cropped
        }
        None => image,
    };
    let binary = adaptive_binarize(image);
    if binary.is_empty() {
        return Err(CodecError::NotFound);
    }

    let mut qr_error = CodecError::NotFound;
    if options.allows(Symbology::Qr) {
        match QrDecoder::decode(&binary, options.try_harder) {
            Ok(text) => return Ok(DecodedSymbol::new(text, Symbology::Qr)),
            Err(e) => {
                debug!("QR decode: {e}");
                qr_error = e;
            }
        }
    }
    match linear::scanner::scan(&binary, options) {
        Ok(symbol) => Ok(symbol),
        Err(CodecError::NotFound) => Err(qr_error),
        Err(e) => Err(e),
    }
}

/// Try a centered crop of the frame first, then the whole frame
pub fn decode_frame(luminance: &[u8], width: usize, height: usize, try_harder: bool) -> Option<DecodedSymbol> {
    let image = LuminanceImage::new(luminance, width, height).ok()?;
    let centered = DecodeOptions {
        crop: Some(CropRect::centered_square(width, height, FRAME_CROP_PERCENT)),
        ..DecodeOptions::with_try_harder(try_harder)
    };
    decode_image(&image, &centered)
        .or_else(|_| decode_image(&image, &DecodeOptions::with_try_harder(try_harder)))
        .ok()
}

/// Render a symbol at the requested raster size
pub fn encode_request(request: &EncodingRequest, options: &EncodeOptions) -> Result<PixelRaster> {
    let (width, height) = request.dimensions()?;
    let quiet_zone = options.quiet_zone_for(request.symbology);
    if request.symbology.is_matrix() {
        let qr = QrEncoder::encode(&request.content, options.ec_level)?;
        render::render_matrix(&qr.modules, quiet_zone, width, height)
    } else {
        let modules = registry::encode_linear(request.symbology, &request.content)?;
        render::render_linear(&modules, quiet_zone, width, height)
    }
}
