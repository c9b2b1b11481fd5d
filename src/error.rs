use thiserror::Error;

/// Why a decode or encode produced no result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// No locatable symbol in the frame
    #[error("no symbol found")]
    NotFound,
    /// A symbol was located but error correction or its checksum failed
    #[error("symbol located but uncorrectable")]
    Uncorrectable,
    /// Content or raster dimensions cannot be encoded, or the input buffer is malformed
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl CodecError {
    /// Shorthand for [`CodecError::InvalidRequest`]
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        CodecError::InvalidRequest(reason.into())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, CodecError>;
