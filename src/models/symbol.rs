use super::Symbology;
use crate::error::CodecError;

/// Result of a successful decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSymbol {
    /// Payload text
    pub text: String,
    /// Symbology the payload was read from
    pub symbology: Symbology,
}

impl DecodedSymbol {
    /// Create a decode result
    pub fn new(text: impl Into<String>, symbology: Symbology) -> Self {
        Self {
            text: text.into(),
            symbology,
        }
    }
}

/// Everything needed to render one symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingRequest {
    /// Content to encode
    pub content: String,
    /// Target symbology
    pub symbology: Symbology,
    /// Requested raster width in pixels
    pub width: i32,
    /// Requested raster height in pixels
    pub height: i32,
}

impl EncodingRequest {
    /// Create an encoding request
    pub fn new(content: impl Into<String>, symbology: Symbology, width: i32, height: i32) -> Self {
        Self {
            content: content.into(),
            symbology,
            width,
            height,
        }
    }

    /// Raster dimensions as unsigned sizes, rejecting non-positive values
    pub fn dimensions(&self) -> Result<(usize, usize), CodecError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(CodecError::InvalidRequest(format!(
                "raster size {}x{} must be positive",
                self.width, self.height
            )));
        }
        Ok((self.width as usize, self.height as usize))
    }
}
