//! Splitting content into numeric, alphanumeric and byte segments
//!
//! A dynamic program over the characters picks the mode of every character
//! so that the total bit count (segment headers included) is minimal. Costs
//! are counted in sixths of a bit so that the 10/3 and 11/2 bits per
//! character of the packed modes stay integral.

use crate::decoder::modes::alphanumeric::AlphanumericDecoder;
use crate::decoder::modes::byte::ByteDecoder;
use crate::decoder::modes::numeric::NumericDecoder;
use crate::decoder::modes::{BitBuffer, Mode};
use crate::models::Version;

const MODES: [Mode; 3] = [Mode::Numeric, Mode::Alphanumeric, Mode::Byte];

/// One run of characters encoded in a single mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Encoding mode
    pub mode: Mode,
    /// Characters covered by the segment
    pub text: String,
}

impl Segment {
    /// Segment of `text` in `mode`
    pub fn new(mode: Mode, text: impl Into<String>) -> Self {
        Self {
            mode,
            text: text.into(),
        }
    }

    /// Value stored in the character count field
    pub fn char_count(&self) -> usize {
        match self.mode {
            Mode::Byte => self.text.len(),
            _ => self.text.chars().count(),
        }
    }

    /// Header plus payload bits at `version`
    pub fn bit_len(&self, version: Version) -> usize {
        let count = self.char_count();
        let payload = match self.mode {
            Mode::Numeric => NumericDecoder::encoded_bits(count),
            Mode::Alphanumeric => AlphanumericDecoder::encoded_bits(count),
            _ => count * 8,
        };
        4 + self.mode.char_count_bits(version) + payload
    }

    /// Append header and data bits for `version`
    pub fn write(&self, version: Version, buffer: &mut BitBuffer) {
        buffer.append(self.mode.indicator(), 4);
        buffer.append(self.char_count() as u32, self.mode.char_count_bits(version));
        match self.mode {
            Mode::Numeric => NumericDecoder::encode(&self.text, buffer),
            Mode::Alphanumeric => {
                // Only characters from the alphanumeric table are ever put here
                let _ = AlphanumericDecoder::encode(&self.text, buffer);
            }
            _ => ByteDecoder::encode(self.text.as_bytes(), buffer),
        }
    }
}

fn char_cost(mode: Mode, c: char) -> Option<usize> {
    match mode {
        Mode::Numeric => c.is_ascii_digit().then_some(20),
        Mode::Alphanumeric => AlphanumericDecoder::is_encodable(c).then_some(33),
        _ => Some(48 * c.len_utf8()),
    }
}

/// Minimal-length segmentation of `content` for the character count
/// widths of `version`
pub fn segment(content: &str, version: Version) -> Vec<Segment> {
    let chars: Vec<char> = content.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }
    let header = |mode: Mode| (4 + mode.char_count_bits(version)) * 6;

    // cost[i][m]: cheapest encoding of chars[..=i] whose last segment is mode m
    let mut cost = vec![[usize::MAX; 3]; chars.len()];
    let mut from = vec![[0usize; 3]; chars.len()];
    for (i, &c) in chars.iter().enumerate() {
        for (m, &mode) in MODES.iter().enumerate() {
            let Some(step) = char_cost(mode, c) else {
                continue;
            };
            if i == 0 {
                cost[0][m] = header(mode) + step;
                from[0][m] = m;
                continue;
            }
            let mut best = (usize::MAX, m);
            for p in 0..3 {
                if cost[i - 1][p] == usize::MAX {
                    continue;
                }
                let switch = if p == m { 0 } else { header(mode) };
                let total = cost[i - 1][p] + switch + step;
                if total < best.0 {
                    best = (total, p);
                }
            }
            cost[i][m] = best.0;
            from[i][m] = best.1;
        }
    }

    // Walk back to recover per-character modes
    let last = chars.len() - 1;
    let mut m = (0..3).min_by_key(|&m| cost[last][m]).unwrap_or(2);
    let mut modes = vec![Mode::Byte; chars.len()];
    for i in (0..chars.len()).rev() {
        modes[i] = MODES[m];
        m = from[i][m];
    }

    let mut segments: Vec<Segment> = Vec::new();
    for (&c, &mode) in chars.iter().zip(&modes) {
        match segments.last_mut() {
            Some(seg) if seg.mode == mode => seg.text.push(c),
            _ => segments.push(Segment::new(mode, c.to_string())),
        }
    }
    split_oversized(segments, version)
}

/// Break segments whose count would overflow the character count field
fn split_oversized(segments: Vec<Segment>, version: Version) -> Vec<Segment> {
    let mut out = Vec::with_capacity(segments.len());
    for seg in segments {
        let max = (1usize << seg.mode.char_count_bits(version)) - 1;
        if seg.char_count() <= max {
            out.push(seg);
            continue;
        }
        let mut piece = Segment::new(seg.mode, String::new());
        for c in seg.text.chars() {
            let grows = if seg.mode == Mode::Byte { c.len_utf8() } else { 1 };
            if piece.char_count() + grows > max {
                out.push(std::mem::replace(&mut piece, Segment::new(seg.mode, String::new())));
            }
            piece.text.push(c);
        }
        if !piece.text.is_empty() {
            out.push(piece);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v1() -> Version {
        Version::MIN
    }

    #[test]
    fn test_single_mode_content() {
        assert_eq!(segment("0123456789", v1()), vec![Segment::new(Mode::Numeric, "0123456789")]);
        assert_eq!(segment("HELLO WORLD", v1()), vec![Segment::new(Mode::Alphanumeric, "HELLO WORLD")]);
        assert_eq!(segment("hello", v1()), vec![Segment::new(Mode::Byte, "hello")]);
        assert!(segment("", v1()).is_empty());
    }

    #[test]
    fn test_short_digit_run_stays_in_byte_mode() {
        // Switching for two digits costs more than it saves
        let segs = segment("ab12cd", v1());
        assert_eq!(segs, vec![Segment::new(Mode::Byte, "ab12cd")]);
    }

    #[test]
    fn test_long_digit_run_gets_own_segment() {
        let segs = segment("abc0123456789012345", v1());
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0], Segment::new(Mode::Byte, "abc"));
        assert_eq!(segs[1].mode, Mode::Numeric);
    }

    #[test]
    fn test_bit_lengths() {
        let seg = Segment::new(Mode::Numeric, "01234567");
        assert_eq!(seg.bit_len(v1()), 4 + 10 + 27);
        let seg = Segment::new(Mode::Byte, "é");
        assert_eq!(seg.char_count(), 2);
        assert_eq!(seg.bit_len(v1()), 4 + 8 + 16);
    }

    #[test]
    fn test_oversized_byte_segment_is_split() {
        let content = "x".repeat(300);
        let segs = segment(&content, v1());
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].char_count(), 255);
        assert_eq!(segs[1].char_count(), 45);
        let segs = segment(&content, Version::new(10).unwrap());
        assert_eq!(segs.len(), 1);
    }

    #[test]
    fn test_write_matches_bit_len() {
        for seg in segment("ABC-12345678 lower", v1()) {
            let mut buffer = BitBuffer::new();
            seg.write(v1(), &mut buffer);
            assert_eq!(buffer.len(), seg.bit_len(v1()));
        }
    }
}
