//! Utility functions for image processing
//!
//! - Binarization (block-adaptive thresholds)
//! - Geometry (perspective transforms)

/// Block-adaptive binarization of luminance frames
pub mod binarization;
/// Perspective transforms between module space and image space
pub mod geometry;
