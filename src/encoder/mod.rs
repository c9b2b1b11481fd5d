//! QR code encoding modules
//!
//! - Segmentation into numeric, alphanumeric and byte runs
//! - Error correction and block interleaving
//! - Function pattern drawing and mask selection

/// Mask penalty scoring and parallel mask selection
pub mod mask;
/// Function pattern drawing
pub mod matrix_builder;
/// Main QR encoder
pub mod qr_encoder;
/// Minimal-length segmentation
pub mod segment;
