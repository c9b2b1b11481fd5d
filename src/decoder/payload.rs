//! Codeword stream to text: block deinterleaving, correction and segment parsing
use log::trace;

use super::modes::alphanumeric::AlphanumericDecoder;
use super::modes::byte::{ByteDecoder, Charset};
use super::modes::kanji::KanjiDecoder;
use super::modes::numeric::NumericDecoder;
use super::modes::{BitReader, Mode};
use super::reed_solomon::ReedSolomonDecoder;
use super::tables::{block_data_lengths, ec_block_info};
use crate::error::{CodecError, Result};
use crate::models::{ECLevel, Version};

/// Group separator emitted for FNC1 in GS1 payloads
const GS: char = '\u{1D}';

/// Split interleaved codewords into blocks, correct each block and
/// concatenate the data parts.
///
/// Returns the corrected data codewords and the number of repaired bytes.
pub fn deinterleave_and_correct(
    codewords: &[u8],
    version: Version,
    ec_level: ECLevel,
) -> Result<(Vec<u8>, usize)> {
    let info = ec_block_info(version, ec_level);
    let lengths = block_data_lengths(version, ec_level);
    let total: usize = lengths.iter().sum::<usize>() + info.num_blocks * info.ecc_per_block;
    if codewords.len() < total {
        return Err(CodecError::Uncorrectable);
    }

    let longest = lengths.iter().copied().max().unwrap_or(0);
    let mut blocks: Vec<Vec<u8>> = lengths
        .iter()
        .map(|len| Vec::with_capacity(len + info.ecc_per_block))
        .collect();

    let mut stream = codewords.iter().copied();
    for i in 0..longest {
        for (block, &len) in blocks.iter_mut().zip(&lengths) {
            if i < len {
                block.extend(stream.next());
            }
        }
    }
    for _ in 0..info.ecc_per_block {
        for block in blocks.iter_mut() {
            block.extend(stream.next());
        }
    }

    let rs = ReedSolomonDecoder::new(info.ecc_per_block);
    let mut data = Vec::with_capacity(lengths.iter().sum());
    let mut repaired = 0;
    for (index, (block, &len)) in blocks.iter_mut().zip(&lengths).enumerate() {
        match rs.decode(block) {
            Ok(fixed) => repaired += fixed,
            Err(reason) => {
                trace!("block {index} uncorrectable: {reason}");
                return Err(CodecError::Uncorrectable);
            }
        }
        data.extend_from_slice(&block[..len]);
    }
    Ok((data, repaired))
}

/// Parse a corrected data codeword stream into text
pub fn decode_payload(data: &[u8], version: Version) -> Result<String> {
    let mut reader = BitReader::new(data);
    let mut text = String::new();
    let mut charset = Charset::Default;
    let mut gs1 = false;

    loop {
        // Fewer than four bits left is an implicit terminator
        let Some(bits) = reader.read(4) else { break };
        let mode = Mode::from_bits(bits).ok_or_else(|| {
            trace!("unknown mode indicator {bits:04b}");
            CodecError::Uncorrectable
        })?;

        match mode {
            Mode::Terminator => break,
            Mode::Fnc1First => gs1 = true,
            Mode::Fnc1Second => {
                // Application indicator
                reader.read(8).ok_or(CodecError::Uncorrectable)?;
                gs1 = true;
            }
            Mode::StructuredAppend => {
                // Sequence number, total and parity are not needed for a single symbol
                reader.read(16).ok_or(CodecError::Uncorrectable)?;
            }
            Mode::Eci => {
                let value = ByteDecoder::read_eci(&mut reader).ok_or(CodecError::Uncorrectable)?;
                charset = Charset::from_eci(value).ok_or_else(|| {
                    trace!("unsupported ECI {value}");
                    CodecError::Uncorrectable
                })?;
            }
            Mode::Numeric | Mode::Alphanumeric | Mode::Byte | Mode::Kanji => {
                let count = reader
                    .read(mode.char_count_bits(version))
                    .ok_or(CodecError::Uncorrectable)? as usize;
                let segment = match mode {
                    Mode::Numeric => NumericDecoder::decode(&mut reader, count),
                    Mode::Alphanumeric => AlphanumericDecoder::decode(&mut reader, count)
                        .map(|s| if gs1 { expand_gs1_percent(&s) } else { s }),
                    Mode::Byte => {
                        ByteDecoder::decode(&mut reader, count).map(|raw| charset.decode(&raw))
                    }
                    _ => KanjiDecoder::decode(&mut reader, count),
                };
                let segment = segment.ok_or(CodecError::Uncorrectable)?;
                trace!("{mode:?} segment of {count} characters");
                text.push_str(&segment);
            }
        }
    }

    Ok(text)
}

/// In GS1 alphanumeric segments `%` stands for FNC1 and `%%` for a literal percent
fn expand_gs1_percent(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '%' {
            if chars.peek() == Some(&'%') {
                chars.next();
                out.push('%');
            } else {
                out.push(GS);
            }
        } else {
            out.push(c);
        }
    }
    out
}
