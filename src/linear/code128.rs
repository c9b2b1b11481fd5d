//! Code 128: sets A, B and C with mod-103 checksum
use log::trace;

use super::runs::{best_match, pattern_match_variance, widths_to_modules};
use crate::error::{CodecError, Result};

/// Bar/space widths of code values 0..=105 plus the stop character (106),
/// whose final 2-module bar is matched separately
pub(crate) const CODE_PATTERNS: [[u8; 6]; 107] = [
    [2, 1, 2, 2, 2, 2], [2, 2, 2, 1, 2, 2], [2, 2, 2, 2, 2, 1], [1, 2, 1, 2, 2, 3], [1, 2, 1, 3, 2, 2],
    [1, 3, 1, 2, 2, 2], [1, 2, 2, 2, 1, 3], [1, 2, 2, 3, 1, 2], [1, 3, 2, 2, 1, 2], [2, 2, 1, 2, 1, 3],
    [2, 2, 1, 3, 1, 2], [2, 3, 1, 2, 1, 2], [1, 1, 2, 2, 3, 2], [1, 2, 2, 1, 3, 2], [1, 2, 2, 2, 3, 1],
    [1, 1, 3, 2, 2, 2], [1, 2, 3, 1, 2, 2], [1, 2, 3, 2, 2, 1], [2, 2, 3, 2, 1, 1], [2, 2, 1, 1, 3, 2],
    [2, 2, 1, 2, 3, 1], [2, 1, 3, 2, 1, 2], [2, 2, 3, 1, 1, 2], [3, 1, 2, 1, 3, 1], [3, 1, 1, 2, 2, 2],
    [3, 2, 1, 1, 2, 2], [3, 2, 1, 2, 2, 1], [3, 1, 2, 2, 1, 2], [3, 2, 2, 1, 1, 2], [3, 2, 2, 2, 1, 1],
    [2, 1, 2, 1, 2, 3], [2, 1, 2, 3, 2, 1], [2, 3, 2, 1, 2, 1], [1, 1, 1, 3, 2, 3], [1, 3, 1, 1, 2, 3],
    [1, 3, 1, 3, 2, 1], [1, 1, 2, 3, 1, 3], [1, 3, 2, 1, 1, 3], [1, 3, 2, 3, 1, 1], [2, 1, 1, 3, 1, 3],
    [2, 3, 1, 1, 1, 3], [2, 3, 1, 3, 1, 1], [1, 1, 2, 1, 3, 3], [1, 1, 2, 3, 3, 1], [1, 3, 2, 1, 3, 1],
    [1, 1, 3, 1, 2, 3], [1, 1, 3, 3, 2, 1], [1, 3, 3, 1, 2, 1], [3, 1, 3, 1, 2, 1], [2, 1, 1, 3, 3, 1],
    [2, 3, 1, 1, 3, 1], [2, 1, 3, 1, 1, 3], [2, 1, 3, 3, 1, 1], [2, 1, 3, 1, 3, 1], [3, 1, 1, 1, 2, 3],
    [3, 1, 1, 3, 2, 1], [3, 3, 1, 1, 2, 1], [3, 1, 2, 1, 1, 3], [3, 1, 2, 3, 1, 1], [3, 3, 2, 1, 1, 1],
    [3, 1, 4, 1, 1, 1], [2, 2, 1, 4, 1, 1], [4, 3, 1, 1, 1, 1], [1, 1, 1, 2, 2, 4], [1, 1, 1, 4, 2, 2],
    [1, 2, 1, 1, 2, 4], [1, 2, 1, 4, 2, 1], [1, 4, 1, 1, 2, 2], [1, 4, 1, 2, 2, 1], [1, 1, 2, 2, 1, 4],
    [1, 1, 2, 4, 1, 2], [1, 2, 2, 1, 1, 4], [1, 2, 2, 4, 1, 1], [1, 4, 2, 1, 1, 2], [1, 4, 2, 2, 1, 1],
    [2, 4, 1, 2, 1, 1], [2, 2, 1, 1, 1, 4], [4, 1, 3, 1, 1, 1], [2, 4, 1, 1, 1, 2], [1, 3, 4, 1, 1, 1],
    [1, 1, 1, 2, 4, 2], [1, 2, 1, 1, 4, 2], [1, 2, 1, 2, 4, 1], [1, 1, 4, 2, 1, 2], [1, 2, 4, 1, 1, 2],
    [1, 2, 4, 2, 1, 1], [4, 1, 1, 2, 1, 2], [4, 2, 1, 1, 1, 2], [4, 2, 1, 2, 1, 1], [2, 1, 2, 1, 4, 1],
    [2, 1, 4, 1, 2, 1], [4, 1, 2, 1, 2, 1], [1, 1, 1, 1, 4, 3], [1, 1, 1, 3, 4, 1], [1, 3, 1, 1, 4, 1],
    [1, 1, 4, 1, 1, 3], [1, 1, 4, 3, 1, 1], [4, 1, 1, 1, 1, 3], [4, 1, 1, 3, 1, 1], [1, 1, 3, 1, 4, 1],
    [1, 1, 4, 1, 3, 1], [3, 1, 1, 1, 4, 1], [4, 1, 1, 1, 3, 1], [2, 1, 1, 4, 1, 2], [2, 1, 1, 2, 1, 4],
    [2, 1, 1, 2, 3, 2], [2, 3, 3, 1, 1, 1],
];

const MAX_AVG_VARIANCE: f32 = 0.25;
const MAX_INDIVIDUAL_VARIANCE: f32 = 0.7;

const CODE_SHIFT: u8 = 98;
const CODE_CODE_C: u8 = 99;
const CODE_CODE_B: u8 = 100;
const CODE_CODE_A: u8 = 101;
const CODE_FNC_1: u8 = 102;
const CODE_START_A: u8 = 103;
const CODE_START_B: u8 = 104;
const CODE_START_C: u8 = 105;
const CODE_STOP: u8 = 106;

/// Longest accepted content
pub const MAX_LENGTH: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodeSet {
    A,
    B,
    C,
}

impl CodeSet {
    fn start_code(self) -> u8 {
        match self {
            CodeSet::A => CODE_START_A,
            CodeSet::B => CODE_START_B,
            CodeSet::C => CODE_START_C,
        }
    }

    /// Latch code that switches into `self`
    fn switch_code(self) -> u8 {
        match self {
            CodeSet::A => CODE_CODE_A,
            CodeSet::B => CODE_CODE_B,
            CodeSet::C => CODE_CODE_C,
        }
    }
}

/// Modules for `content` (ASCII 0..=127, 1..=80 characters), no quiet zone
pub fn encode(content: &str) -> Result<Vec<bool>> {
    let bytes = content.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_LENGTH {
        return Err(CodecError::invalid(format!(
            "Code 128 takes 1 to {MAX_LENGTH} characters, got {}",
            bytes.len()
        )));
    }
    if !content.is_ascii() {
        return Err(CodecError::invalid("Code 128 content must be ASCII"));
    }

    let mut codes: Vec<u8> = Vec::with_capacity(bytes.len() + 4);
    let mut set: Option<CodeSet> = None;

    let mut i = 0;
    while i < bytes.len() {
        let run = bytes[i..].iter().take_while(|b| b.is_ascii_digit()).count();
        if run >= 4 && run % 2 == 0 {
            switch_to(&mut codes, &mut set, CodeSet::C);
            for pair in bytes[i..i + run].chunks(2) {
                codes.push((pair[0] - b'0') * 10 + (pair[1] - b'0'));
            }
            i += run;
            continue;
        }

        // Odd digit runs spend their first digit here so the rest pairs up
        let c = bytes[i];
        let target = if c < 32 {
            CodeSet::A
        } else if c >= 96 || set != Some(CodeSet::A) {
            CodeSet::B
        } else {
            CodeSet::A
        };
        switch_to(&mut codes, &mut set, target);
        codes.push(match target {
            CodeSet::A if c < 32 => c + 64,
            _ => c - 32,
        });
        i += 1;
    }

    codes.push(checksum(&codes));
    codes.push(CODE_STOP);

    let mut modules = Vec::with_capacity(codes.len() * 11 + 2);
    for &code in &codes {
        widths_to_modules(&CODE_PATTERNS[code as usize], &mut modules);
    }
    // Final bar of the stop character
    modules.extend([true, true]);
    Ok(modules)
}

fn switch_to(codes: &mut Vec<u8>, set: &mut Option<CodeSet>, target: CodeSet) {
    match *set {
        None => codes.push(target.start_code()),
        Some(current) if current != target => codes.push(target.switch_code()),
        _ => {}
    }
    *set = Some(target);
}

/// (start + sum of position * value) mod 103 over start and data codes
fn checksum(codes: &[u8]) -> u8 {
    let sum: u32 = codes
        .iter()
        .enumerate()
        .map(|(i, &c)| i.max(1) as u32 * c as u32)
        .sum();
    (sum % 103) as u8
}

/// Decode one scan line given as runs (light first)
pub fn decode(runs: &[usize]) -> Result<String> {
    let (mut index, start) = find_start(runs).ok_or(CodecError::NotFound)?;
    let mut codes = vec![start];

    loop {
        let counters = runs.get(index..index + 6).ok_or(CodecError::NotFound)?;
        let code = best_match(
            counters,
            CODE_PATTERNS.iter().map(|p| &p[..]),
            MAX_AVG_VARIANCE,
            MAX_INDIVIDUAL_VARIANCE,
        )
        .ok_or(CodecError::NotFound)? as u8;
        if (CODE_START_A..=CODE_START_C).contains(&code) {
            return Err(CodecError::NotFound);
        }
        if code == CODE_STOP {
            check_stop_tail(runs, index)?;
            break;
        }
        codes.push(code);
        index += 6;
    }

    // Start, at least one data code and the check code
    if codes.len() < 3 {
        return Err(CodecError::NotFound);
    }
    let check = codes.pop().unwrap_or_default();
    if checksum(&codes) != check {
        trace!("Code 128 checksum mismatch");
        return Err(CodecError::Uncorrectable);
    }
    codes_to_text(&codes)
}

/// Leftmost start character with a quiet zone of half its width before it
fn find_start(runs: &[usize]) -> Option<(usize, u8)> {
    let mut i = 1;
    while i + 6 <= runs.len() {
        let counters = &runs[i..i + 6];
        let mut best: Option<(f32, u8)> = None;
        for code in CODE_START_A..=CODE_START_C {
            let variance =
                pattern_match_variance(counters, &CODE_PATTERNS[code as usize], MAX_INDIVIDUAL_VARIANCE);
            if variance < MAX_AVG_VARIANCE && best.is_none_or(|(v, _)| variance < v) {
                best = Some((variance, code));
            }
        }
        if let Some((_, code)) = best {
            let width: usize = counters.iter().sum();
            if runs[i - 1] * 2 >= width {
                return Some((i + 6, code));
            }
        }
        i += 2;
    }
    None
}

/// The stop character ends with a 2-module bar followed by light
fn check_stop_tail(runs: &[usize], index: usize) -> Result<()> {
    let width: usize = runs[index..index + 6].iter().sum();
    let unit = width as f32 / 11.0;
    let bar = *runs.get(index + 6).ok_or(CodecError::NotFound)? as f32;
    if !(unit..=3.0 * unit).contains(&bar) {
        return Err(CodecError::NotFound);
    }
    match runs.get(index + 7) {
        Some(&quiet) if (quiet as f32) < width as f32 / 2.0 => Err(CodecError::NotFound),
        _ => Ok(()),
    }
}

fn codes_to_text(codes: &[u8]) -> Result<String> {
    let mut set = match codes[0] {
        CODE_START_A => CodeSet::A,
        CODE_START_B => CodeSet::B,
        _ => CodeSet::C,
    };
    let mut text = String::new();
    let mut shift = false;
    let mut fnc4 = false;

    for (position, &code) in codes.iter().enumerate().skip(1) {
        let current = match (shift, set) {
            (true, CodeSet::A) => CodeSet::B,
            (true, CodeSet::B) => CodeSet::A,
            _ => set,
        };
        shift = false;

        if code == CODE_FNC_1 {
            // In first position FNC1 only flags GS1 data
            if position > 1 {
                text.push('\u{1D}');
            }
            continue;
        }
        match current {
            CodeSet::C => match code {
                0..=99 => {
                    text.push((b'0' + code / 10) as char);
                    text.push((b'0' + code % 10) as char);
                }
                CODE_CODE_B => set = CodeSet::B,
                CODE_CODE_A => set = CodeSet::A,
                _ => return Err(CodecError::NotFound),
            },
            CodeSet::A | CodeSet::B => {
                let value = match (current, code) {
                    (CodeSet::A, 0..=63) => Some(code + 32),
                    (CodeSet::A, 64..=95) => Some(code - 64),
                    (CodeSet::B, 0..=95) => Some(code + 32),
                    _ => None,
                };
                if let Some(byte) = value {
                    let byte = if fnc4 { byte | 0x80 } else { byte };
                    fnc4 = false;
                    text.push(byte as char);
                    continue;
                }
                match (current, code) {
                    // FNC3 and FNC2 carry no text
                    (_, 96 | 97) => {}
                    (_, CODE_SHIFT) => shift = true,
                    (_, CODE_CODE_C) => set = CodeSet::C,
                    (CodeSet::A, CODE_CODE_B) | (CodeSet::B, CODE_CODE_A) => {
                        set = if current == CodeSet::A {
                            CodeSet::B
                        } else {
                            CodeSet::A
                        }
                    }
                    (CodeSet::A, CODE_CODE_A) | (CodeSet::B, CODE_CODE_B) => fnc4 = true,
                    _ => return Err(CodecError::NotFound),
                }
            }
        }
    }
    Ok(text)
}
