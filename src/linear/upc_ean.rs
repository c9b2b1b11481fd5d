//! EAN-13, EAN-8, UPC-A and UPC-E
//!
//! All four share guard patterns and the digit width table. UPC-A is an
//! EAN-13 whose first digit is 0; UPC-E carries its number system and check
//! digit in the parity of its six digits.
use log::trace;

use super::runs::{best_match, mod10_check_digit, pattern_match_variance};
use crate::error::{CodecError, Result};
use crate::models::Symbology;

const START_END_PATTERN: [u8; 3] = [1, 1, 1];
const MIDDLE_PATTERN: [u8; 5] = [1, 1, 1, 1, 1];
const UPCE_END_PATTERN: [u8; 6] = [1, 1, 1, 1, 1, 1];

/// Odd-parity widths, starting with a space; the right half of EAN uses the
/// same widths starting with a bar
static L_PATTERNS: [[u8; 4]; 10] = [
    [3, 2, 1, 1],
    [2, 2, 2, 1],
    [2, 1, 2, 2],
    [1, 4, 1, 1],
    [1, 1, 3, 2],
    [1, 2, 3, 1],
    [1, 1, 1, 4],
    [1, 3, 1, 2],
    [1, 2, 1, 3],
    [3, 1, 1, 2],
];

/// Parity of the left six digits in EAN-13, indexed by the implied first digit
const FIRST_DIGIT_ENCODINGS: [u8; 10] = [0x00, 0x0B, 0x0D, 0x0E, 0x13, 0x19, 0x1C, 0x15, 0x16, 0x1A];

/// UPC-E parity for number system 0, indexed by check digit; number system 1
/// is the complement
const UPCE_PARITY: [u8; 10] = [0x38, 0x34, 0x32, 0x31, 0x2C, 0x26, 0x23, 0x2A, 0x29, 0x25];

const MAX_AVG_VARIANCE: f32 = 0.48;
const MAX_INDIVIDUAL_VARIANCE: f32 = 0.7;

/// Even-parity (G) widths are the L widths reversed
fn g_pattern(digit: usize) -> [u8; 4] {
    let mut p = L_PATTERNS[digit];
    p.reverse();
    p
}

fn upce_parity(number_system: u8, check: u8) -> u8 {
    let p = UPCE_PARITY[check as usize];
    if number_system == 0 { p } else { !p & 0x3F }
}

fn push_widths(widths: &[u8], dark_first: bool, modules: &mut Vec<bool>) {
    for (i, &w) in widths.iter().enumerate() {
        let dark = (i % 2 == 0) == dark_first;
        modules.extend(std::iter::repeat_n(dark, w as usize));
    }
}

/// Validate digits, appending a check digit when exactly `data_len` were given
fn with_check_digit(content: &str, data_len: usize, name: &str) -> Result<Vec<u8>> {
    let bytes = content.as_bytes();
    if !bytes.iter().all(u8::is_ascii_digit) || !(data_len..=data_len + 1).contains(&bytes.len()) {
        return Err(CodecError::invalid(format!(
            "{name} takes {data_len} or {} digits",
            data_len + 1
        )));
    }
    let check = mod10_check_digit(&bytes[..data_len]);
    if bytes.len() == data_len + 1 && bytes[data_len] != check {
        return Err(CodecError::invalid(format!("{name} check digit does not match")));
    }
    let mut digits = bytes[..data_len].to_vec();
    digits.push(check);
    Ok(digits)
}

/// UPC-A digits (without check) that a UPC-E body stands for
fn expand_upce(number_system: u8, body: &[u8]) -> Vec<u8> {
    let mut out = vec![number_system];
    let last = body[5];
    match last {
        b'0'..=b'2' => {
            out.extend_from_slice(&body[..2]);
            out.push(last);
            out.extend_from_slice(b"0000");
            out.extend_from_slice(&body[2..5]);
        }
        b'3' => {
            out.extend_from_slice(&body[..3]);
            out.extend_from_slice(b"00000");
            out.extend_from_slice(&body[3..5]);
        }
        b'4' => {
            out.extend_from_slice(&body[..4]);
            out.extend_from_slice(b"00000");
            out.push(body[4]);
        }
        _ => {
            out.extend_from_slice(&body[..5]);
            out.extend_from_slice(b"0000");
            out.push(last);
        }
    }
    out
}

/// Modules for `content` in one of the four symbologies, no quiet zone
pub fn encode(symbology: Symbology, content: &str) -> Result<Vec<bool>> {
    match symbology {
        Symbology::Ean13 => Ok(encode_ean13(&with_check_digit(content, 12, "EAN-13")?)),
        Symbology::UpcA => {
            let digits = with_check_digit(content, 11, "UPC-A")?;
            let mut ean = vec![b'0'];
            ean.extend(digits);
            Ok(encode_ean13(&ean))
        }
        Symbology::Ean8 => Ok(encode_ean8(&with_check_digit(content, 7, "EAN-8")?)),
        Symbology::UpcE => encode_upce(content),
        other => Err(CodecError::invalid(format!("{other} is not an EAN/UPC symbology"))),
    }
}

fn encode_ean13(digits: &[u8]) -> Vec<bool> {
    let mut modules = Vec::with_capacity(95);
    push_widths(&START_END_PATTERN, true, &mut modules);
    let parities = FIRST_DIGIT_ENCODINGS[(digits[0] - b'0') as usize];
    for (i, &d) in digits[1..7].iter().enumerate() {
        let d = (d - b'0') as usize;
        if (parities >> (5 - i)) & 1 == 1 {
            push_widths(&g_pattern(d), false, &mut modules);
        } else {
            push_widths(&L_PATTERNS[d], false, &mut modules);
        }
    }
    push_widths(&MIDDLE_PATTERN, false, &mut modules);
    for &d in &digits[7..13] {
        push_widths(&L_PATTERNS[(d - b'0') as usize], true, &mut modules);
    }
    push_widths(&START_END_PATTERN, true, &mut modules);
    modules
}

fn encode_ean8(digits: &[u8]) -> Vec<bool> {
    let mut modules = Vec::with_capacity(67);
    push_widths(&START_END_PATTERN, true, &mut modules);
    for &d in &digits[..4] {
        push_widths(&L_PATTERNS[(d - b'0') as usize], false, &mut modules);
    }
    push_widths(&MIDDLE_PATTERN, false, &mut modules);
    for &d in &digits[4..8] {
        push_widths(&L_PATTERNS[(d - b'0') as usize], true, &mut modules);
    }
    push_widths(&START_END_PATTERN, true, &mut modules);
    modules
}

fn encode_upce(content: &str) -> Result<Vec<bool>> {
    let bytes = content.as_bytes();
    if !bytes.iter().all(u8::is_ascii_digit) || !(7..=8).contains(&bytes.len()) {
        return Err(CodecError::invalid("UPC-E takes 7 or 8 digits"));
    }
    let number_system = bytes[0] - b'0';
    if number_system > 1 {
        return Err(CodecError::invalid("UPC-E number system must be 0 or 1"));
    }
    let check = mod10_check_digit(&expand_upce(bytes[0], &bytes[1..7]));
    if bytes.len() == 8 && bytes[7] != check {
        return Err(CodecError::invalid("UPC-E check digit does not match"));
    }

    let parities = upce_parity(number_system, check - b'0');
    let mut modules = Vec::with_capacity(51);
    push_widths(&START_END_PATTERN, true, &mut modules);
    for (i, &d) in bytes[1..7].iter().enumerate() {
        let d = (d - b'0') as usize;
        if (parities >> (5 - i)) & 1 == 1 {
            push_widths(&g_pattern(d), false, &mut modules);
        } else {
            push_widths(&L_PATTERNS[d], false, &mut modules);
        }
    }
    push_widths(&UPCE_END_PATTERN, false, &mut modules);
    Ok(modules)
}

/// Decode one scan line given as runs (light first).
///
/// Tries EAN-13 (reported as UPC-A when it starts with 0), UPC-E and EAN-8
/// at each start guard, skipping symbologies `allowed` rejects.
pub fn decode(runs: &[usize], allowed: impl Fn(Symbology) -> bool) -> Result<(Symbology, String)> {
    let mut located = false;
    let mut i = 1;
    while i + 3 <= runs.len() {
        if is_start_guard(runs, i) {
            let attempts = [
                (allowed(Symbology::Ean13) || allowed(Symbology::UpcA))
                    .then(|| decode_ean13(runs, i, &allowed))
                    .flatten(),
                allowed(Symbology::UpcE)
                    .then(|| decode_upce(runs, i))
                    .flatten(),
                allowed(Symbology::Ean8)
                    .then(|| decode_ean8(runs, i))
                    .flatten(),
            ];
            for attempt in attempts.into_iter().flatten() {
                match attempt {
                    Ok(found) => return Ok(found),
                    Err(_) => located = true,
                }
            }
        }
        i += 2;
    }
    Err(if located {
        CodecError::Uncorrectable
    } else {
        CodecError::NotFound
    })
}

fn matches_guard(runs: &[usize], index: usize, pattern: &[u8]) -> bool {
    runs.get(index..index + pattern.len()).is_some_and(|counters| {
        pattern_match_variance(counters, pattern, MAX_INDIVIDUAL_VARIANCE) < MAX_AVG_VARIANCE
    })
}

fn is_start_guard(runs: &[usize], index: usize) -> bool {
    if !matches_guard(runs, index, &START_END_PATTERN) {
        return false;
    }
    let width: usize = runs[index..index + 3].iter().sum();
    runs[index - 1] >= width
}

/// End guard at `index` followed by at least its own width of light
fn is_end_guard(runs: &[usize], index: usize, pattern: &[u8]) -> bool {
    if !matches_guard(runs, index, pattern) {
        return false;
    }
    let width: usize = runs[index..index + pattern.len()].iter().sum();
    runs.get(index + pattern.len())
        .is_none_or(|&quiet| quiet >= width)
}

/// `count` digits from `index`; bit `count - 1 - x` of the parity word is
/// set when digit `x` used the G table
fn read_digits(runs: &[usize], index: usize, count: usize, with_g: bool) -> Option<(Vec<u8>, u8)> {
    let g: Vec<[u8; 4]> = (0..10).map(g_pattern).collect();
    let mut digits = Vec::with_capacity(count);
    let mut parity = 0u8;
    for x in 0..count {
        let counters = runs.get(index + 4 * x..index + 4 * x + 4)?;
        let l = L_PATTERNS.iter().map(|p| p.as_slice());
        let best = if with_g {
            best_match(counters, l.chain(g.iter().map(|p| p.as_slice())), MAX_AVG_VARIANCE, MAX_INDIVIDUAL_VARIANCE)?
        } else {
            best_match(counters, l, MAX_AVG_VARIANCE, MAX_INDIVIDUAL_VARIANCE)?
        };
        digits.push(b'0' + (best % 10) as u8);
        if best >= 10 {
            parity |= 1 << (count - 1 - x);
        }
    }
    Some((digits, parity))
}

fn verify(digits: &[u8], name: &str) -> Result<()> {
    let (body, check) = digits.split_at(digits.len() - 1);
    if mod10_check_digit(body) == check[0] {
        Ok(())
    } else {
        trace!("{name} check digit mismatch");
        Err(CodecError::Uncorrectable)
    }
}

fn decode_ean13(
    runs: &[usize],
    start: usize,
    allowed: &impl Fn(Symbology) -> bool,
) -> Option<Result<(Symbology, String)>> {
    let (left, parity) = read_digits(runs, start + 3, 6, true)?;
    let first = FIRST_DIGIT_ENCODINGS.iter().position(|&p| p == parity)?;
    if !matches_guard(runs, start + 27, &MIDDLE_PATTERN) {
        return None;
    }
    let (right, _) = read_digits(runs, start + 32, 6, false)?;
    if !is_end_guard(runs, start + 56, &START_END_PATTERN) {
        return None;
    }

    let mut digits = vec![b'0' + first as u8];
    digits.extend(left);
    digits.extend(right);
    if let Err(e) = verify(&digits, "EAN-13") {
        return Some(Err(e));
    }
    let text = |d: &[u8]| d.iter().copied().map(char::from).collect::<String>();
    if first == 0 && allowed(Symbology::UpcA) {
        Some(Ok((Symbology::UpcA, text(&digits[1..]))))
    } else if allowed(Symbology::Ean13) {
        Some(Ok((Symbology::Ean13, text(&digits))))
    } else {
        None
    }
}

fn decode_ean8(runs: &[usize], start: usize) -> Option<Result<(Symbology, String)>> {
    let (left, _) = read_digits(runs, start + 3, 4, false)?;
    if !matches_guard(runs, start + 19, &MIDDLE_PATTERN) {
        return None;
    }
    let (right, _) = read_digits(runs, start + 24, 4, false)?;
    if !is_end_guard(runs, start + 40, &START_END_PATTERN) {
        return None;
    }
    let mut digits = left;
    digits.extend(right);
    Some(verify(&digits, "EAN-8").map(|()| {
        (Symbology::Ean8, digits.into_iter().map(char::from).collect())
    }))
}

fn decode_upce(runs: &[usize], start: usize) -> Option<Result<(Symbology, String)>> {
    let (body, parity) = read_digits(runs, start + 3, 6, true)?;
    if !is_end_guard(runs, start + 27, &UPCE_END_PATTERN) {
        return None;
    }
    let (number_system, check) = (0u8..=1).find_map(|ns| {
        (0u8..10)
            .find(|&c| upce_parity(ns, c) == parity)
            .map(|c| (ns, c))
    })?;

    let mut expanded = expand_upce(b'0' + number_system, &body);
    expanded.push(b'0' + check);
    if let Err(e) = verify(&expanded, "UPC-E") {
        return Some(Err(e));
    }
    let mut digits = vec![b'0' + number_system];
    digits.extend(body);
    digits.push(b'0' + check);
    Some(Ok((Symbology::UpcE, digits.into_iter().map(char::from).collect())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::runs::runs_of;

    fn decode_all(modules: &[bool], unit: usize) -> Result<(Symbology, String)> {
        decode(&runs_of(modules, unit), |_| true)
    }

    #[test]
    fn test_module_counts() {
        assert_eq!(encode(Symbology::Ean13, "400638133393").unwrap().len(), 95);
        assert_eq!(encode(Symbology::UpcA, "03600029145").unwrap().len(), 95);
        assert_eq!(encode(Symbology::Ean8, "9638507").unwrap().len(), 67);
        assert_eq!(encode(Symbology::UpcE, "0123456").unwrap().len(), 51);
    }

    #[test]
    fn test_ean13_round_trip() {
        let modules = encode(Symbology::Ean13, "400638133393").unwrap();
        assert_eq!(
            decode_all(&modules, 2).unwrap(),
            (Symbology::Ean13, "4006381333931".to_string())
        );
    }

    #[test]
    fn test_leading_zero_reports_upc_a() {
        let modules = encode(Symbology::UpcA, "036000291452").unwrap();
        assert_eq!(
            decode_all(&modules, 3).unwrap(),
            (Symbology::UpcA, "036000291452".to_string())
        );
        // Without UPC-A in the filter the same bars read as EAN-13
        let only_ean = decode(&runs_of(&modules, 3), |s| s == Symbology::Ean13).unwrap();
        assert_eq!(only_ean, (Symbology::Ean13, "0036000291452".to_string()));
    }

    #[test]
    fn test_ean8_round_trip() {
        let modules = encode(Symbology::Ean8, "96385074").unwrap();
        assert_eq!(
            decode_all(&modules, 2).unwrap(),
            (Symbology::Ean8, "96385074".to_string())
        );
    }

    #[test]
    fn test_upce_round_trip() {
        for (content, expected) in [("0123456", "01234565"), ("1654321", "16543214"), ("0425261", "04252614")] {
            let modules = encode(Symbology::UpcE, content).unwrap();
            assert_eq!(
                decode_all(&modules, 2).unwrap(),
                (Symbology::UpcE, expected.to_string())
            );
        }
    }

    #[test]
    fn test_expansion() {
        assert_eq!(expand_upce(b'0', b"123456"), b"01234500006");
        assert_eq!(expand_upce(b'1', b"654321"), b"16510000432");
        assert_eq!(expand_upce(b'0', b"425261"), b"04210000526");
    }

    #[test]
    fn test_rejects_invalid_content() {
        assert!(encode(Symbology::Ean13, "ABC").is_err());
        assert!(encode(Symbology::Ean13, "4006381333932").is_err());
        assert!(encode(Symbology::UpcA, "12345678901234").is_err());
        assert!(encode(Symbology::UpcE, "2123456").is_err());
        assert!(encode(Symbology::Ean8, "123").is_err());
        assert!(encode(Symbology::Code39, "123").is_err());
    }

    #[test]
    fn test_bad_check_digit_is_uncorrectable() {
        let mut modules = encode(Symbology::Ean8, "96385074").unwrap();
        // Overwrite the check digit 4 with a 3
        let at = 3 + 28 + 5 + 3 * 7;
        let mut replacement = Vec::new();
        push_widths(&L_PATTERNS[3], true, &mut replacement);
        modules[at..at + 7].copy_from_slice(&replacement);
        assert_eq!(decode_all(&modules, 2), Err(CodecError::Uncorrectable));
    }
}
