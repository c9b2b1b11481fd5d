//! Interleaved 2 of 5
//!
//! Digits are coded in pairs: the first digit's five elements become the
//! bars and the second digit's become the spaces in between. Symbols are
//! printed with wide elements three narrow widths across; the reader also
//! accepts the 2:1 ratio the symbology allows at the low end.
use log::trace;

use super::runs::{best_match, mod10_check_digit, pattern_match_variance};
use crate::error::{CodecError, Result};

const N: u8 = 1;
const W: u8 = 3;
const W_LOWER: u8 = 2;

const START_PATTERN: [u8; 4] = [N, N, N, N];
const END_PATTERN: [u8; 3] = [W, N, N];

/// Digit patterns at the 3:1 ratio
static PATTERNS: [[u8; 5]; 10] = [
    [N, N, W, W, N], // 0
    [W, N, N, N, W], // 1
    [N, W, N, N, W], // 2
    [W, W, N, N, N], // 3
    [N, N, W, N, W], // 4
    [W, N, W, N, N], // 5
    [N, W, W, N, N], // 6
    [N, N, N, W, W], // 7
    [W, N, N, W, N], // 8
    [N, W, N, W, N], // 9
];

/// `pattern` with its wide elements set to `wide`
fn with_wide<const L: usize>(pattern: [u8; L], wide: u8) -> [u8; L] {
    pattern.map(|e| if e == W { wide } else { N })
}

const MAX_AVG_VARIANCE: f32 = 0.38;
const MAX_INDIVIDUAL_VARIANCE: f32 = 0.5;

/// Shortest symbol, check digit included
pub const MIN_LENGTH: usize = 4;
/// Longest accepted content
pub const MAX_LENGTH: usize = 80;

/// Modules for `content`, no quiet zone.
///
/// An odd number of digits gets a mod-10 check digit appended; an even
/// number must already end in a valid one.
pub fn encode(content: &str) -> Result<Vec<bool>> {
    let bytes = content.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(CodecError::invalid("ITF takes digits only"));
    }
    let mut digits = bytes.to_vec();
    if digits.len() % 2 == 1 {
        digits.push(mod10_check_digit(&digits));
    } else if mod10_check_digit(&digits[..digits.len() - 1]) != digits[digits.len() - 1] {
        return Err(CodecError::invalid("ITF check digit does not match"));
    }
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&digits.len()) {
        return Err(CodecError::invalid(format!(
            "ITF takes {MIN_LENGTH} to {MAX_LENGTH} digits with the check digit, got {}",
            digits.len()
        )));
    }

    let mut modules = Vec::new();
    super::runs::widths_to_modules(&element_widths(&digits, W), &mut modules);
    Ok(modules)
}

/// Element widths from start to end guard with wide elements `wide` across
fn element_widths(digits: &[u8], wide: u8) -> Vec<u8> {
    let mut widths: Vec<u8> = START_PATTERN.to_vec();
    for pair in digits.chunks_exact(2) {
        let bars = with_wide(PATTERNS[(pair[0] - b'0') as usize], wide);
        let spaces = with_wide(PATTERNS[(pair[1] - b'0') as usize], wide);
        for (b, s) in bars.iter().zip(spaces.iter()) {
            widths.push(*b);
            widths.push(*s);
        }
    }
    widths.extend_from_slice(&with_wide(END_PATTERN, wide));
    widths
}

/// Decode one scan line given as runs (light first)
pub fn decode(runs: &[usize]) -> Result<String> {
    let mut i = 1;
    while i + START_PATTERN.len() <= runs.len() {
        if let Some(text) = decode_at(runs, i) {
            return text;
        }
        i += 2;
    }
    Err(CodecError::NotFound)
}

/// `None` when no start pattern begins at `start`
fn decode_at(runs: &[usize], start: usize) -> Option<Result<String>> {
    let guard = &runs[start..start + 4];
    if pattern_match_variance(guard, &START_PATTERN, MAX_INDIVIDUAL_VARIANCE) >= MAX_AVG_VARIANCE {
        return None;
    }
    let narrow = guard.iter().sum::<usize>() as f32 / 4.0;
    // Quiet zone of several narrow widths keeps bar pairs inside data from
    // passing for a start pattern
    if (runs[start - 1] as f32) < narrow * 6.0 {
        return None;
    }

    // Both ratios side by side; a match's index modulo 10 is the digit
    let table: Vec<[u8; 5]> = PATTERNS
        .iter()
        .copied()
        .chain(PATTERNS.iter().map(|&p| with_wide(p, W_LOWER)))
        .collect();
    let mut digits = Vec::new();
    let mut index = start + 4;
    loop {
        if is_end(runs, index, narrow) {
            break;
        }
        let counters = runs.get(index..index + 10)?;
        let bars: Vec<usize> = counters.iter().step_by(2).copied().collect();
        let spaces: Vec<usize> = counters.iter().skip(1).step_by(2).copied().collect();
        let candidates = || table.iter().map(|p| p.as_slice());
        let first = best_match(&bars, candidates(), MAX_AVG_VARIANCE, MAX_INDIVIDUAL_VARIANCE)?;
        let second = best_match(&spaces, candidates(), MAX_AVG_VARIANCE, MAX_INDIVIDUAL_VARIANCE)?;
        digits.push(b'0' + (first % 10) as u8);
        digits.push(b'0' + (second % 10) as u8);
        index += 10;
    }

    if digits.len() < MIN_LENGTH {
        return None;
    }
    let (body, check) = digits.split_at(digits.len() - 1);
    if mod10_check_digit(body) != check[0] {
        trace!("ITF check digit mismatch");
        return Some(Err(CodecError::Uncorrectable));
    }
    Some(Ok(digits.into_iter().map(char::from).collect()))
}

/// End pattern followed by a wide light area or the edge of the row
fn is_end(runs: &[usize], index: usize, narrow: f32) -> bool {
    let Some(counters) = runs.get(index..index + 3) else {
        return false;
    };
    let matches = [END_PATTERN, with_wide(END_PATTERN, W_LOWER)].iter().any(|pattern| {
        pattern_match_variance(counters, pattern, MAX_INDIVIDUAL_VARIANCE) < MAX_AVG_VARIANCE
    });
    if !matches {
        return false;
    }
    runs.get(index + 3)
        .is_none_or(|&quiet| quiet as f32 >= narrow * 6.0)
}
