//! Code 39 with mod-43 check character
//!
//! Each character is nine elements (five bars, four spaces), exactly three
//! of them wide. Characters are separated by a narrow space.
use log::trace;

use crate::error::{CodecError, Result};

pub(crate) const ALPHABET: &[u8; 43] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%";

/// Nine-bit narrow/wide patterns, first element in the high bit
pub(crate) const CHARACTER_ENCODINGS: [u16; 43] = [
    0x034, 0x121, 0x061, 0x160, 0x031, 0x130, 0x070, 0x025, 0x124, 0x064, // 0-9
    0x109, 0x049, 0x148, 0x019, 0x118, 0x058, 0x00D, 0x10C, 0x04C, 0x01C, // A-J
    0x103, 0x043, 0x142, 0x013, 0x112, 0x052, 0x007, 0x106, 0x046, 0x016, // K-T
    0x181, 0x0C1, 0x1C0, 0x091, 0x190, 0x0D0, 0x085, 0x184, 0x0C4, 0x0A8, // U-$
    0x0A2, 0x08A, 0x02A, // /-%
];
const ASTERISK_ENCODING: u16 = 0x094;

const WIDE: u8 = 3;
/// Longest accepted content
pub const MAX_LENGTH: usize = 80;

pub(crate) fn value_of(c: u8) -> Option<usize> {
    ALPHABET.iter().position(|&a| a == c)
}

fn check_value(values: impl Iterator<Item = usize>) -> usize {
    values.sum::<usize>() % 43
}

fn push_character(pattern: u16, modules: &mut Vec<bool>) {
    for i in (0..9).rev() {
        let dark = (8 - i) % 2 == 0;
        let width = if (pattern >> i) & 1 == 1 { WIDE } else { 1 };
        modules.extend(std::iter::repeat_n(dark, width as usize));
    }
}

/// Modules for `content` with its check character, no quiet zone
pub fn encode(content: &str) -> Result<Vec<bool>> {
    let bytes = content.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_LENGTH {
        return Err(CodecError::invalid(format!(
            "Code 39 takes 1 to {MAX_LENGTH} characters, got {}",
            bytes.len()
        )));
    }
    let values: Vec<usize> = bytes
        .iter()
        .map(|&c| value_of(c))
        .collect::<Option<_>>()
        .ok_or_else(|| CodecError::invalid("character outside the Code 39 alphabet"))?;
    let check = check_value(values.iter().copied());

    let mut modules = Vec::new();
    push_character(ASTERISK_ENCODING, &mut modules);
    for &v in values.iter().chain(std::iter::once(&check)) {
        modules.push(false);
        push_character(CHARACTER_ENCODINGS[v], &mut modules);
    }
    modules.push(false);
    push_character(ASTERISK_ENCODING, &mut modules);
    Ok(modules)
}

/// Decode one scan line given as runs (light first)
pub fn decode(runs: &[usize], require_check: bool) -> Result<String> {
    let start = find_asterisk(runs).ok_or(CodecError::NotFound)?;
    // runs[index] is the gap in front of the next character
    let mut index = start + 9;
    let mut text = Vec::new();

    loop {
        let counters = runs.get(index + 1..index + 10).ok_or(CodecError::NotFound)?;
        let pattern = to_narrow_wide_pattern(counters).ok_or(CodecError::NotFound)?;
        if pattern == ASTERISK_ENCODING {
            let width: usize = counters.iter().sum();
            if runs.get(index + 10).is_some_and(|&quiet| quiet * 2 < width) {
                return Err(CodecError::NotFound);
            }
            break;
        }
        let value = CHARACTER_ENCODINGS
            .iter()
            .position(|&p| p == pattern)
            .ok_or(CodecError::NotFound)?;
        text.push(ALPHABET[value]);
        index += 10;
    }

    if require_check {
        let Some(check) = text.pop() else {
            return Err(CodecError::NotFound);
        };
        let expected = ALPHABET[check_value(text.iter().filter_map(|&c| value_of(c)))];
        if text.is_empty() || check != expected {
            trace!("Code 39 check character mismatch");
            return Err(CodecError::Uncorrectable);
        }
    } else if text.is_empty() {
        return Err(CodecError::NotFound);
    }
    Ok(text.into_iter().map(char::from).collect())
}

/// Start of the first `*` with enough light in front of it
fn find_asterisk(runs: &[usize]) -> Option<usize> {
    let mut i = 1;
    while i + 9 <= runs.len() {
        let counters = &runs[i..i + 9];
        if to_narrow_wide_pattern(counters) == Some(ASTERISK_ENCODING) {
            let width: usize = counters.iter().sum();
            if runs[i - 1] * 2 >= width {
                return Some(i);
            }
        }
        i += 2;
    }
    None
}

/// Raise the narrow/wide threshold until exactly three elements are wide
fn to_narrow_wide_pattern(counters: &[usize]) -> Option<u16> {
    let mut max_narrow = 0;
    loop {
        let min = counters.iter().copied().filter(|&c| c > max_narrow).min()?;
        max_narrow = min;
        let mut pattern = 0u16;
        let mut wide = 0;
        let mut wide_total = 0;
        for (i, &c) in counters.iter().enumerate() {
            if c > max_narrow {
                pattern |= 1 << (counters.len() - 1 - i);
                wide += 1;
                wide_total += c;
            }
        }
        if wide == 3 {
            // No single wide element may take half of the wide width
            if counters.iter().any(|&c| c > max_narrow && c * 2 >= wide_total) {
                return None;
            }
            return Some(pattern);
        }
        if wide < 3 {
            return None;
        }
    }
}
