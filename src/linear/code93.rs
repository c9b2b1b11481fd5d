//! Code 93 with the two mod-47 check characters
use log::trace;

use crate::error::{CodecError, Result};

/// 43 data characters followed by the four shift characters `a`..`d`
const ALPHABET: &[u8; 47] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%abcd";

/// Nine-module bar/space patterns, leftmost module in the high bit
const CHARACTER_ENCODINGS: [u16; 47] = [
    0x114, 0x148, 0x144, 0x142, 0x128, 0x124, 0x122, 0x150, 0x112, 0x10A, // 0-9
    0x1A8, 0x1A4, 0x1A2, 0x194, 0x192, 0x18A, 0x168, 0x164, 0x162, 0x134, // A-J
    0x11A, 0x158, 0x14C, 0x146, 0x12C, 0x116, 0x1B4, 0x1B2, 0x1AC, 0x1A6, // K-T
    0x196, 0x19A, 0x16C, 0x166, 0x136, 0x13A, // U-Z
    0x12E, 0x1D4, 0x1D2, 0x1CA, 0x16E, 0x176, 0x1AE, // - . SP $ / + %
    0x126, 0x1DA, 0x1D6, 0x132, // shifts
];
const ASTERISK_ENCODING: u16 = 0x15E;

/// Longest accepted content
pub const MAX_LENGTH: usize = 80;

fn push_pattern(pattern: u16, modules: &mut Vec<bool>) {
    for i in (0..9).rev() {
        modules.push((pattern >> i) & 1 == 1);
    }
}

/// Weighted mod-47 sum over `values`, weights counting up from the right
fn check_value(values: &[usize], weight_max: usize) -> usize {
    let mut weight = 1;
    let mut total = 0;
    for &v in values.iter().rev() {
        total += weight * v;
        weight += 1;
        if weight > weight_max {
            weight = 1;
        }
    }
    total % 47
}

/// Modules for `content` with both check characters and the termination bar
pub fn encode(content: &str) -> Result<Vec<bool>> {
    let bytes = content.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_LENGTH {
        return Err(CodecError::invalid(format!(
            "Code 93 takes 1 to {MAX_LENGTH} characters, got {}",
            bytes.len()
        )));
    }
    let mut values: Vec<usize> = bytes
        .iter()
        .map(|&c| ALPHABET[..43].iter().position(|&a| a == c))
        .collect::<Option<_>>()
        .ok_or_else(|| CodecError::invalid("character outside the Code 93 alphabet"))?;
    values.push(check_value(&values, 20));
    values.push(check_value(&values, 15));

    let mut modules = Vec::with_capacity((values.len() + 2) * 9 + 1);
    push_pattern(ASTERISK_ENCODING, &mut modules);
    for v in values {
        push_pattern(CHARACTER_ENCODINGS[v], &mut modules);
    }
    push_pattern(ASTERISK_ENCODING, &mut modules);
    modules.push(true);
    Ok(modules)
}

/// Decode one scan line given as runs (light first)
pub fn decode(runs: &[usize]) -> Result<String> {
    let start = find_asterisk(runs).ok_or(CodecError::NotFound)?;
    let mut index = start + 6;
    let mut values = Vec::new();

    loop {
        let counters = runs.get(index..index + 6).ok_or(CodecError::NotFound)?;
        let pattern = to_pattern(counters).ok_or(CodecError::NotFound)?;
        if pattern == ASTERISK_ENCODING {
            index += 6;
            break;
        }
        let value = CHARACTER_ENCODINGS
            .iter()
            .position(|&p| p == pattern)
            .ok_or(CodecError::NotFound)?;
        values.push(value);
        index += 6;
    }
    // Termination bar right after the stop character
    if runs.get(index).is_none_or(|&bar| bar == 0) {
        return Err(CodecError::NotFound);
    }

    if values.len() < 3 {
        return Err(CodecError::NotFound);
    }
    let k = values.len() - 1;
    let c = values.len() - 2;
    if check_value(&values[..c], 20) != values[c] || check_value(&values[..k], 15) != values[k] {
        trace!("Code 93 check characters mismatch");
        return Err(CodecError::Uncorrectable);
    }
    values.truncate(c);
    let raw: Vec<u8> = values.iter().map(|&v| ALPHABET[v]).collect();
    decode_extended(&raw)
}

fn find_asterisk(runs: &[usize]) -> Option<usize> {
    let mut i = 1;
    while i + 6 <= runs.len() {
        let counters = &runs[i..i + 6];
        if to_pattern(counters) == Some(ASTERISK_ENCODING) {
            let width: usize = counters.iter().sum();
            if runs[i - 1] * 2 >= width {
                return Some(i);
            }
        }
        i += 2;
    }
    None
}

/// Scale six element widths to nine modules and pack them as bits
fn to_pattern(counters: &[usize]) -> Option<u16> {
    let sum: usize = counters.iter().sum();
    if sum == 0 {
        return None;
    }
    let mut pattern = 0u16;
    for (i, &c) in counters.iter().enumerate() {
        let scaled = ((c * 9) as f32 / sum as f32).round() as u32;
        if !(1..=4).contains(&scaled) {
            return None;
        }
        pattern <<= scaled;
        if i % 2 == 0 {
            pattern |= (1 << scaled) - 1;
        }
    }
    Some(pattern)
}

/// Resolve the shift pairs of full ASCII Code 93
fn decode_extended(raw: &[u8]) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let c = raw[i];
        if !(b'a'..=b'd').contains(&c) {
            out.push(char::from(c));
            i += 1;
            continue;
        }
        let next = *raw.get(i + 1).ok_or(CodecError::Uncorrectable)?;
        let decoded = match (c, next) {
            (b'd', b'A'..=b'Z') => next + 32,
            (b'a', b'A'..=b'Z') => next - 64,
            (b'b', b'A'..=b'E') => next - 38,
            (b'b', b'F'..=b'J') => next - 11,
            (b'b', b'K'..=b'O') => next + 16,
            (b'b', b'P'..=b'T') => next + 43,
            (b'b', b'U') => 0,
            (b'b', b'V') => b'@',
            (b'b', b'W') => b'`',
            (b'b', b'X'..=b'Z') => 127,
            (b'c', b'A'..=b'O') => next - 32,
            (b'c', b'Z') => b':',
            _ => return Err(CodecError::Uncorrectable),
        };
        out.push(char::from(decoded));
        i += 2;
    }
    Ok(out)
}
