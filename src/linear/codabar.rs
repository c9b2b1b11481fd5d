//! Codabar (NW-7) with a mod-16 check character before the stop
use log::trace;

use crate::error::{CodecError, Result};

const ALPHABET: &[u8; 20] = b"0123456789-$:/.+ABCD";

/// Seven-element narrow/wide patterns, first element in bit 6
const CHARACTER_ENCODINGS: [u8; 20] = [
    0x003, 0x006, 0x009, 0x060, 0x012, 0x042, 0x021, 0x024, 0x030, 0x048, // 0-9
    0x00C, 0x018, 0x045, 0x051, 0x054, 0x015, // - $ : / . +
    0x01A, 0x029, 0x00B, 0x00E, // A B C D
];

const WIDE: usize = 3;
const DEFAULT_GUARD: u8 = b'A';
/// Longest accepted content
pub const MAX_LENGTH: usize = 80;

fn value_of(c: u8) -> Option<usize> {
    ALPHABET.iter().position(|&a| a == c)
}

fn is_guard(c: u8) -> bool {
    matches!(c, b'A'..=b'D')
}

/// Value that brings the sum of all characters to a multiple of 16
fn check_value(values: impl Iterator<Item = usize>) -> usize {
    (16 - values.sum::<usize>() % 16) % 16
}

fn push_character(value: usize, modules: &mut Vec<bool>) {
    let pattern = CHARACTER_ENCODINGS[value];
    for i in 0..7 {
        let width = if (pattern >> (6 - i)) & 1 == 1 { WIDE } else { 1 };
        modules.extend(std::iter::repeat_n(i % 2 == 0, width));
    }
}

/// Modules for `content`, no quiet zone.
///
/// Content may carry its own start and stop letters (`A`..`D`); bare data
/// is framed with `A`. The check character goes in front of the stop.
pub fn encode(content: &str) -> Result<Vec<bool>> {
    let bytes = content.as_bytes();
    let framed = bytes.len() >= 2 && is_guard(bytes[0]) && is_guard(bytes[bytes.len() - 1]);
    let (start, body, stop) = if framed {
        (bytes[0], &bytes[1..bytes.len() - 1], bytes[bytes.len() - 1])
    } else {
        (DEFAULT_GUARD, bytes, DEFAULT_GUARD)
    };
    if body.is_empty() || body.len() > MAX_LENGTH {
        return Err(CodecError::invalid(format!(
            "Codabar takes 1 to {MAX_LENGTH} data characters, got {}",
            body.len()
        )));
    }
    let body_values: Vec<usize> = body
        .iter()
        .map(|&c| value_of(c).filter(|&v| v < 16))
        .collect::<Option<_>>()
        .ok_or_else(|| CodecError::invalid("character outside the Codabar data alphabet"))?;

    let start_value = value_of(start).unwrap_or(16);
    let stop_value = value_of(stop).unwrap_or(16);
    let check = check_value(
        body_values
            .iter()
            .copied()
            .chain([start_value, stop_value]),
    );

    let mut modules = Vec::new();
    let sequence = std::iter::once(start_value)
        .chain(body_values)
        .chain([check, stop_value]);
    for (i, value) in sequence.enumerate() {
        if i > 0 {
            modules.push(false);
        }
        push_character(value, &mut modules);
    }
    Ok(modules)
}

/// Decode one scan line given as runs (light first).
///
/// Start and stop letters are dropped. With `require_check` the check
/// character is verified and dropped too.
pub fn decode(runs: &[usize], require_check: bool) -> Result<String> {
    let start = find_start(runs).ok_or(CodecError::NotFound)?;
    let mut values = vec![classify(&runs[start..start + 7]).ok_or(CodecError::NotFound)?];
    // runs[index] is the gap in front of the next character
    let mut index = start + 7;

    loop {
        let counters = runs.get(index + 1..index + 8).ok_or(CodecError::NotFound)?;
        let value = classify(counters).ok_or(CodecError::NotFound)?;
        values.push(value);
        index += 8;
        if value >= 16 {
            let width: usize = counters.iter().sum();
            if runs.get(index).is_some_and(|&quiet| quiet * 2 < width) {
                return Err(CodecError::NotFound);
            }
            break;
        }
    }

    if values.len() < 3 {
        return Err(CodecError::NotFound);
    }
    if require_check {
        if values.len() < 4 || values.iter().sum::<usize>() % 16 != 0 {
            trace!("Codabar check character mismatch");
            return Err(CodecError::Uncorrectable);
        }
        values.remove(values.len() - 2);
    }
    let body = &values[1..values.len() - 1];
    Ok(body.iter().map(|&v| char::from(ALPHABET[v])).collect())
}

fn find_start(runs: &[usize]) -> Option<usize> {
    let mut i = 1;
    while i + 7 <= runs.len() {
        let counters = &runs[i..i + 7];
        if classify(counters).is_some_and(|v| v >= 16) {
            let width: usize = counters.iter().sum();
            if runs[i - 1] * 2 >= width {
                return Some(i);
            }
        }
        i += 2;
    }
    None
}

/// Match seven element widths against the table.
///
/// Every threshold between distinct widths is tried; a split only counts
/// when the narrowest wide element is at least 1.5 times the widest narrow one.
fn classify(counters: &[usize]) -> Option<usize> {
    let mut widths: Vec<usize> = counters.to_vec();
    widths.sort_unstable();
    widths.dedup();
    for &threshold in &widths[..widths.len().saturating_sub(1)] {
        let mut pattern = 0u8;
        let mut narrow_max = 0;
        let mut wide_min = usize::MAX;
        for (i, &c) in counters.iter().enumerate() {
            if c > threshold {
                pattern |= 1 << (6 - i);
                wide_min = wide_min.min(c);
            } else {
                narrow_max = narrow_max.max(c);
            }
        }
        if wide_min * 2 < narrow_max * 3 {
            continue;
        }
        if let Some(value) = CHARACTER_ENCODINGS.iter().position(|&p| p == pattern) {
            return Some(value);
        }
    }
    None
}
