//! Numeric mode (0001): groups of 3 digits = 10 bits, 2 digits = 7 bits, 1 digit = 4 bits

use super::{BitBuffer, BitReader};

/// Numeric segment reader and writer
pub struct NumericDecoder;

impl NumericDecoder {
    /// Decode `character_count` digits
    pub fn decode(reader: &mut BitReader, character_count: usize) -> Option<String> {
        let mut result = String::with_capacity(character_count);
        let mut remaining = character_count;

        while remaining > 0 {
            let group = remaining.min(3);
            let (bits, limit) = match group {
                3 => (10, 1000),
                2 => (7, 100),
                _ => (4, 10),
            };
            let value = reader.read(bits)?;
            if value >= limit {
                return None;
            }
            let digits = format!("{value:0group$}");
            result.push_str(&digits);
            remaining -= group;
        }

        Some(result)
    }

    /// Pack ASCII digits; the caller guarantees `digits` is all 0-9
    pub fn encode(digits: &str, buffer: &mut BitBuffer) {
        for chunk in digits.as_bytes().chunks(3) {
            let value = chunk
                .iter()
                .fold(0u32, |acc, &d| acc * 10 + (d - b'0') as u32);
            buffer.append(value, chunk.len() * 3 + 1);
        }
    }

    /// Bits taken by `count` digits (without header)
    pub fn encoded_bits(count: usize) -> usize {
        count / 3 * 10
            + match count % 3 {
                2 => 7,
                1 => 4,
                _ => 0,
            }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_round_trip() {
        let mut buffer = BitBuffer::new();
        NumericDecoder::encode("01234567", &mut buffer);
        assert_eq!(buffer.len(), NumericDecoder::encoded_bits(8));
        // 012 -> 0000001100, 345 -> 0101011001, 67 -> 1000011
        assert_eq!(buffer.as_bytes(), &[0b0000_0011, 0b0001_0101, 0b1001_1000, 0b0110_0000]);

        let bytes = buffer.into_bytes();
        let mut reader = BitReader::new(&bytes);
        assert_eq!(NumericDecoder::decode(&mut reader, 8).as_deref(), Some("01234567"));
    }

    #[test]
    fn test_numeric_rejects_out_of_range_group() {
        // 1111111111 = 1023 is not a 3-digit group
        let bytes = [0xFF, 0xC0];
        let mut reader = BitReader::new(&bytes);
        assert_eq!(NumericDecoder::decode(&mut reader, 3), None);
    }
}
