//! QR code detection modules
//!
//! This module contains all the logic for locating QR codes in a binarized frame:
//! - Finder pattern detection (the three square markers)
//! - Alignment pattern detection (for versions 2+)
//! - Triple selection and grid transforms
//! - Grid sampling and timing checks

/// Alignment pattern detection for QR versions 2+
pub mod alignment;
/// Finder pattern detection using 1:1:3:1:1 ratio scanning
pub mod finder;
/// Finder triple selection and grid-to-image mapping
pub mod locator;
/// Timing pattern checks on sampled grids
pub mod timing;
/// Sample grid extraction through a perspective transform
pub mod transform;
