/// Luminance frames and crops
pub mod luminance;
/// Bit matrix
pub mod matrix;
/// Points in pixel and module space
pub mod point;
/// QR parameters: level, mask, version
pub mod qr_code;
/// ARGB output rasters
pub mod raster;
/// Decode results and encode requests
pub mod symbol;
/// Supported symbologies
pub mod symbology;

pub use luminance::{CropRect, LuminanceImage};
pub use matrix::BitMatrix;
pub use point::Point;
pub use qr_code::{ECLevel, MaskPattern, Version};
pub use raster::{ARGB_BLACK, ARGB_WHITE, MAX_RASTER_PIXELS, PixelRaster};
pub use symbol::{DecodedSymbol, EncodingRequest};
pub use symbology::Symbology;
