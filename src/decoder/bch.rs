//! BCH codes protecting QR format and version information

use crate::models::{ECLevel, MaskPattern, Version};

const FORMAT_GENERATOR: u32 = 0x537;
const FORMAT_MASK: u16 = 0x5412;
const VERSION_GENERATOR: u32 = 0x1F25;

/// Format words within this many bit errors of a valid code are accepted.
const MAX_FORMAT_ERRORS: u32 = 3;
const MAX_VERSION_ERRORS: u32 = 3;

/// Remainder of `value << (degree of generator)` modulo the generator
fn bch_remainder(value: u32, generator: u32) -> u32 {
    let degree = 31 - generator.leading_zeros();
    let mut rem = value << degree;
    while rem != 0 && 31 - rem.leading_zeros() >= degree {
        let shift = (31 - rem.leading_zeros()) - degree;
        rem ^= generator << shift;
    }
    rem
}

/// 15-bit masked format word for a level and mask
pub fn format_code(ec_level: ECLevel, mask: MaskPattern) -> u16 {
    let data = ((ec_level.format_bits() as u32) << 3) | mask.bits() as u32;
    (((data << 10) | bch_remainder(data, FORMAT_GENERATOR)) as u16) ^ FORMAT_MASK
}

/// 18-bit version word (versions 7 and up carry one)
pub fn version_code(version: Version) -> u32 {
    let v = version.number() as u32;
    (v << 12) | bch_remainder(v, VERSION_GENERATOR)
}

/// Nearest valid format word to any of `candidates`
pub fn decode_format(candidates: &[u16]) -> Option<(ECLevel, MaskPattern)> {
    let mut best: Option<(u32, u8)> = None;
    for data in 0u8..32 {
        let ec = ECLevel::from_format_bits(data >> 3);
        let code = format_code(ec, MaskPattern::from_bits(data));
        for &raw in candidates {
            let distance = (code ^ raw).count_ones();
            if best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, data));
            }
        }
    }
    let (distance, data) = best?;
    (distance <= MAX_FORMAT_ERRORS)
        .then(|| (ECLevel::from_format_bits(data >> 3), MaskPattern::from_bits(data)))
}

/// Nearest valid version word to any of `candidates`
pub fn decode_version(candidates: &[u32]) -> Option<Version> {
    let mut best: Option<(u32, Version)> = None;
    for version in Version::all().filter(|v| v.number() >= 7) {
        let code = version_code(version);
        for &raw in candidates {
            let distance = (code ^ raw).count_ones();
            if best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, version));
            }
        }
    }
    let (distance, version) = best?;
    (distance <= MAX_VERSION_ERRORS).then_some(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_format_words() {
        // Level M, mask 0 and level L, mask 4 from the standard's table
        assert_eq!(format_code(ECLevel::M, MaskPattern::Pattern0), 0x5412);
        assert_eq!(format_code(ECLevel::L, MaskPattern::Pattern4), 0x662F);
        assert_eq!(format_code(ECLevel::H, MaskPattern::Pattern7), 0x083B);
    }

    #[test]
    fn test_known_version_words() {
        assert_eq!(version_code(Version::new(7).unwrap()), 0x07C94);
        assert_eq!(version_code(Version::new(40).unwrap()), 0x28C69);
    }

    #[test]
    fn test_format_correction() {
        let word = format_code(ECLevel::Q, MaskPattern::Pattern3);
        let damaged = word ^ 0b100_0000_0100_0001;
        assert_eq!(
            decode_format(&[damaged]),
            Some((ECLevel::Q, MaskPattern::Pattern3))
        );
        // All ones is at least 5 bits from every format word
        assert_eq!(
            decode_format(&[0x7FFF, word]),
            Some((ECLevel::Q, MaskPattern::Pattern3))
        );
    }

    #[test]
    fn test_version_correction() {
        let word = version_code(Version::new(21).unwrap()) ^ 0b11;
        assert_eq!(decode_version(&[word]), Version::new(21));
    }

    #[test]
    fn test_far_format_word_rejected() {
        assert_eq!(decode_format(&[0x7FFF]), None);
        assert_eq!(decode_format(&[0x0000]), None);
    }
}
