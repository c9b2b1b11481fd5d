//! Decode/encode options and process-wide tunables
//!
//! Options travel with each call. Tunables are read from the environment
//! once and stay fixed for the life of the process.

use std::sync::OnceLock;

use crate::models::{CropRect, ECLevel, Symbology};

/// Per-call decode options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Spend more time per frame: every-row finder scan, diagonal
    /// cross-checks, more linear scan lines and a rotated linear pass
    pub try_harder: bool,
    /// Decode only this part of the frame
    pub crop: Option<CropRect>,
    /// Require the Code 39 and Codabar check characters
    pub require_optional_checksums: bool,
    /// Restrict decoding to these symbologies (`None` = all)
    pub symbologies: Option<Vec<Symbology>>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            try_harder: false,
            crop: None,
            require_optional_checksums: true,
            symbologies: None,
        }
    }
}

impl DecodeOptions {
    /// Options for the external `focusMode` flag
    pub fn with_try_harder(try_harder: bool) -> Self {
        Self {
            try_harder,
            ..Self::default()
        }
    }

    /// Whether `symbology` takes part in this decode
    pub fn allows(&self, symbology: Symbology) -> bool {
        self.symbologies
            .as_ref()
            .is_none_or(|list| list.contains(&symbology))
    }
}

/// Per-call encode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeOptions {
    /// QR error correction level
    pub ec_level: ECLevel,
    /// Quiet zone in modules; raised to the symbology minimum
    pub quiet_zone: Option<usize>,
}

impl EncodeOptions {
    /// Effective quiet zone for `symbology`
    pub fn quiet_zone_for(&self, symbology: Symbology) -> usize {
        let minimum = symbology.quiet_zone_modules();
        self.quiet_zone.map_or(minimum, |q| q.max(minimum))
    }
}

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

static MAX_FINDER_CANDIDATES: OnceLock<usize> = OnceLock::new();

/// Finder candidates kept for triple search
pub(crate) fn max_finder_candidates() -> usize {
    *MAX_FINDER_CANDIDATES
        .get_or_init(|| parse_env_usize("SYMCODEC_MAX_FINDER_CANDIDATES", 12).clamp(3, 64))
}

static MAX_TRIPLES: OnceLock<usize> = OnceLock::new();

/// Scored finder triples attempted per frame
pub(crate) fn max_triples() -> usize {
    *MAX_TRIPLES.get_or_init(|| parse_env_usize("SYMCODEC_MAX_TRIPLES", 8).clamp(1, 64))
}

static LINEAR_ROWS: OnceLock<usize> = OnceLock::new();

/// Scan lines tried per orientation in normal linear mode
pub(crate) fn linear_rows() -> usize {
    *LINEAR_ROWS.get_or_init(|| parse_env_usize("SYMCODEC_LINEAR_ROWS", 15).clamp(1, 512))
}

static LINEAR_CONFIRMATIONS: OnceLock<usize> = OnceLock::new();

/// Separate scan lines that must agree before a linear read is reported
pub(crate) fn linear_confirmations() -> usize {
    *LINEAR_CONFIRMATIONS
        .get_or_init(|| parse_env_usize("SYMCODEC_LINEAR_CONFIRMATIONS", 2).clamp(1, 8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DecodeOptions::default();
        assert!(!options.try_harder);
        assert!(options.require_optional_checksums);
        assert!(options.allows(Symbology::Itf));
        assert_eq!(EncodeOptions::default().ec_level, ECLevel::M);
    }

    #[test]
    fn test_symbology_filter() {
        let options = DecodeOptions {
            symbologies: Some(vec![Symbology::Qr]),
            ..DecodeOptions::default()
        };
        assert!(options.allows(Symbology::Qr));
        assert!(!options.allows(Symbology::Ean8));
    }

    #[test]
    fn test_quiet_zone_floor() {
        let options = EncodeOptions {
            quiet_zone: Some(1),
            ..EncodeOptions::default()
        };
        assert_eq!(options.quiet_zone_for(Symbology::Qr), 4);
        assert_eq!(options.quiet_zone_for(Symbology::Code128), 10);
        let wide = EncodeOptions {
            quiet_zone: Some(20),
            ..EncodeOptions::default()
        };
        assert_eq!(wide.quiet_zone_for(Symbology::Ean13), 20);
    }

    #[test]
    fn test_tunables_within_bounds() {
        assert!((3..=64).contains(&max_finder_candidates()));
        assert!((1..=64).contains(&max_triples()));
        assert!((1..=512).contains(&linear_rows()));
        assert!((1..=8).contains(&linear_confirmations()));
    }
}
