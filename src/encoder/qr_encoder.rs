//! Content to finished QR module matrix
use log::debug;

use super::mask::choose_mask;
use super::matrix_builder::base_matrix;
use super::segment::{Segment, segment};
use crate::decoder::bitstream::place_codewords;
use crate::decoder::function_mask::FunctionMask;
use crate::decoder::modes::byte::ECI_UTF8;
use crate::decoder::modes::{BitBuffer, Mode};
use crate::decoder::reed_solomon::ReedSolomonEncoder;
use crate::decoder::tables::{block_data_lengths, data_codewords, ec_block_info};
use crate::error::{CodecError, Result};
use crate::models::{BitMatrix, ECLevel, MaskPattern, Version};

const PAD_BYTES: [u8; 2] = [0xEC, 0x11];

/// A finished symbol and the parameters chosen for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedQr {
    /// Smallest version that holds the content
    pub version: Version,
    /// Requested error correction level
    pub ec_level: ECLevel,
    /// Lowest-penalty mask
    pub mask_pattern: MaskPattern,
    /// Finished module grid, dark = true
    pub modules: BitMatrix,
}

/// QR encoder entry point
pub struct QrEncoder;

impl QrEncoder {
    /// Encode `content` in the smallest version that holds it at `ec_level`
    pub fn encode(content: &str, ec_level: ECLevel) -> Result<EncodedQr> {
        let eci = !content.is_ascii();
        let (version, segments) = Self::fit(content, ec_level, eci)?;
        let data = Self::data_codewords(&segments, version, ec_level, eci);
        let codewords = Self::add_error_correction(&data, version, ec_level);

        let func = FunctionMask::new(version);
        let mut matrix = base_matrix(version);
        place_codewords(&mut matrix, &func, &codewords);
        let (mask_pattern, modules) = choose_mask(&matrix, &func, ec_level);
        debug!(
            "encoded {} segments as version {} level {:?} mask {}",
            segments.len(),
            version.number(),
            ec_level,
            mask_pattern.bits()
        );

        Ok(EncodedQr {
            version,
            ec_level,
            mask_pattern,
            modules,
        })
    }

    fn fit(content: &str, ec_level: ECLevel, eci: bool) -> Result<(Version, Vec<Segment>)> {
        let header = if eci { 12 } else { 0 };
        let mut cached: Option<(usize, Vec<Segment>)> = None;
        for version in Version::all() {
            // Count field widths change only at versions 10 and 27
            let group = match version.number() {
                1..=9 => 0,
                10..=26 => 1,
                _ => 2,
            };
            if cached.as_ref().is_none_or(|(g, _)| *g != group) {
                cached = Some((group, segment(content, version)));
            }
            let Some((_, segments)) = cached.as_ref() else {
                continue;
            };
            let bits: usize = header + segments.iter().map(|s| s.bit_len(version)).sum::<usize>();
            if bits <= data_codewords(version, ec_level) * 8 {
                return Ok((version, segments.clone()));
            }
        }
        Err(CodecError::invalid(format!(
            "content of {} bytes does not fit a version 40 symbol at level {:?}",
            content.len(),
            ec_level
        )))
    }

    fn data_codewords(
        segments: &[Segment],
        version: Version,
        ec_level: ECLevel,
        eci: bool,
    ) -> Vec<u8> {
        let capacity = data_codewords(version, ec_level) * 8;
        let mut buffer = BitBuffer::new();
        if eci {
            buffer.append(Mode::Eci.indicator(), 4);
            buffer.append(ECI_UTF8, 8);
        }
        for seg in segments {
            seg.write(version, &mut buffer);
        }
        let terminator = (capacity - buffer.len()).min(4);
        buffer.append(0, terminator);
        let align = (8 - buffer.len() % 8) % 8;
        buffer.append(0, align);

        let mut bytes = buffer.into_bytes();
        let target = capacity / 8;
        let mut pad = PAD_BYTES.iter().cycle();
        while bytes.len() < target {
            bytes.extend(pad.next());
        }
        bytes
    }

    /// Split into blocks, append parity to each and interleave
    fn add_error_correction(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<u8> {
        let info = ec_block_info(version, ec_level);
        let lengths = block_data_lengths(version, ec_level);
        let rs = ReedSolomonEncoder::new(info.ecc_per_block);

        let mut blocks = Vec::with_capacity(lengths.len());
        let mut offset = 0;
        for &len in &lengths {
            let block = &data[offset..offset + len];
            blocks.push((block, rs.parity(block)));
            offset += len;
        }

        let longest = lengths.iter().copied().max().unwrap_or(0);
        let mut out = Vec::with_capacity(data.len() + info.num_blocks * info.ecc_per_block);
        for i in 0..longest {
            out.extend(blocks.iter().filter_map(|(d, _)| d.get(i)));
        }
        for i in 0..info.ecc_per_block {
            out.extend(blocks.iter().filter_map(|(_, p)| p.get(i)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::qr_decoder::QrDecoder;
    use crate::decoder::tables::total_codewords;

    #[test]
    fn test_known_data_codewords() {
        // "01234567" at 1-M from the standard's worked example
        let segments = segment("01234567", Version::MIN);
        let data = QrEncoder::data_codewords(&segments, Version::MIN, ECLevel::M, false);
        assert_eq!(
            data,
            vec![
                0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC,
                0x11, 0xEC, 0x11
            ]
        );
        let codewords = QrEncoder::add_error_correction(&data, Version::MIN, ECLevel::M);
        assert_eq!(
            &codewords[16..],
            &[0xA5, 0x24, 0xD4, 0xC1, 0xED, 0x36, 0xC7, 0x87, 0x2C, 0x55]
        );
    }

    #[test]
    fn test_smallest_version_is_chosen() {
        assert_eq!(QrEncoder::encode("HELLO", ECLevel::M).unwrap().version, Version::MIN);
        // 1-L byte capacity is 17
        let qr = QrEncoder::encode(&"a".repeat(17), ECLevel::L).unwrap();
        assert_eq!(qr.version, Version::MIN);
        let qr = QrEncoder::encode(&"a".repeat(18), ECLevel::L).unwrap();
        assert_eq!(qr.version.number(), 2);
    }

    #[test]
    fn test_too_long_content_is_rejected() {
        let content = "a".repeat(3000);
        assert!(matches!(
            QrEncoder::encode(&content, ECLevel::H),
            Err(CodecError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_interleaved_length() {
        let version = Version::new(12).unwrap();
        let data = vec![0u8; data_codewords(version, ECLevel::Q)];
        let out = QrEncoder::add_error_correction(&data, version, ECLevel::Q);
        assert_eq!(out.len(), total_codewords(version));
    }

    #[test]
    fn test_matrix_round_trip() {
        for (content, level) in [
            ("https://example.com/path?q=1", ECLevel::M),
            ("0123456789012345678901234567890123456789", ECLevel::H),
            ("Grüße aus Köln, 日本", ECLevel::Q),
            (&"MIXED 0123456789 content ".repeat(12) as &str, ECLevel::L),
        ] {
            let qr = QrEncoder::encode(content, level).unwrap();
            assert_eq!(QrDecoder::decode_grid(&qr.modules).unwrap(), content);
        }
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let a = QrEncoder::encode("determinism", ECLevel::Q).unwrap();
        let b = QrEncoder::encode("determinism", ECLevel::Q).unwrap();
        assert_eq!(a, b);
    }
}
