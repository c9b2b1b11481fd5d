//! QR data modes
//!
//! Each mode module knows its own packing rule in both directions:
//! - Numeric: 3 digits per 10 bits
//! - Alphanumeric: 2 characters per 11 bits
//! - Byte: 8 bits per byte, charset chosen by ECI
//! - Kanji: 13 bits per Shift_JIS character (decode only)

/// Alphanumeric mode
pub mod alphanumeric;
/// Byte mode with ECI charsets
pub mod byte;
/// Kanji mode
pub mod kanji;
/// Numeric mode
pub mod numeric;

use crate::models::Version;

/// 4-bit mode indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// End of data
    Terminator,
    Numeric,
    Alphanumeric,
    /// Structured append header, skipped
    StructuredAppend,
    Byte,
    /// GS1 FNC1 in first position
    Fnc1First,
    /// Extended channel designator
    Eci,
    Kanji,
    /// AIM FNC1 in second position
    Fnc1Second,
}

impl Mode {
    /// Mode for a 4-bit indicator
    pub fn from_bits(bits: u32) -> Option<Self> {
        Some(match bits {
            0b0000 => Mode::Terminator,
            0b0001 => Mode::Numeric,
            0b0010 => Mode::Alphanumeric,
            0b0011 => Mode::StructuredAppend,
            0b0100 => Mode::Byte,
            0b0101 => Mode::Fnc1First,
            0b0111 => Mode::Eci,
            0b1000 => Mode::Kanji,
            0b1001 => Mode::Fnc1Second,
            _ => return None,
        })
    }

    /// 4-bit indicator written before a segment
    pub fn indicator(&self) -> u32 {
        match self {
            Mode::Terminator => 0b0000,
            Mode::Numeric => 0b0001,
            Mode::Alphanumeric => 0b0010,
            Mode::StructuredAppend => 0b0011,
            Mode::Byte => 0b0100,
            Mode::Fnc1First => 0b0101,
            Mode::Eci => 0b0111,
            Mode::Kanji => 0b1000,
            Mode::Fnc1Second => 0b1001,
        }
    }

    /// Width of the character count field; zero for modes without one
    pub fn char_count_bits(&self, version: Version) -> usize {
        let group = match version.number() {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        match self {
            Mode::Numeric => [10, 12, 14][group],
            Mode::Alphanumeric => [9, 11, 13][group],
            Mode::Byte => [8, 16, 16][group],
            Mode::Kanji => [8, 10, 12][group],
            _ => 0,
        }
    }
}

/// MSB-first reader over codeword bytes
pub struct BitReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    /// Reader positioned at the first bit
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Unread bits
    pub fn available(&self) -> usize {
        self.bytes.len() * 8 - self.position
    }

    /// Read `count` (at most 32) bits as an unsigned value
    pub fn read(&mut self, count: usize) -> Option<u32> {
        if count > 32 || count > self.available() {
            return None;
        }
        let mut value = 0u32;
        for _ in 0..count {
            let byte = self.bytes[self.position / 8];
            let bit = (byte >> (7 - self.position % 8)) & 1;
            value = (value << 1) | bit as u32;
            self.position += 1;
        }
        Some(value)
    }
}

/// MSB-first bit accumulator used by the encoder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitBuffer {
    bytes: Vec<u8>,
    len: usize,
}

impl BitBuffer {
    /// Empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bits written
    pub fn len(&self) -> usize {
        self.len
    }

    /// True before the first bit is appended
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append the low `count` bits of `value`, most significant first
    pub fn append(&mut self, value: u32, count: usize) {
        for i in (0..count).rev() {
            if self.len % 8 == 0 {
                self.bytes.push(0);
            }
            if (value >> i) & 1 == 1 {
                let last = self.bytes.len() - 1;
                self.bytes[last] |= 0x80 >> (self.len % 8);
            }
            self.len += 1;
        }
    }

    /// Bytes written so far; a partial final byte is zero padded
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Packed bytes, the last one zero-padded
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
