//! Alphanumeric mode (0010): pairs = 11 bits, single = 6 bits
//! Character set: 0-9, A-Z, space, $%*+-./:

use super::{BitBuffer, BitReader};

const ALPHANUMERIC_TABLE: [char; 45] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I',
    'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', ' ', '$',
    '%', '*', '+', '-', '.', '/', ':',
];

/// Alphanumeric segment reader and writer
pub struct AlphanumericDecoder;

impl AlphanumericDecoder {
    /// Index of `c` in the alphanumeric table
    pub fn value_of(c: char) -> Option<u32> {
        ALPHANUMERIC_TABLE
            .iter()
            .position(|&t| t == c)
            .map(|p| p as u32)
    }

    /// Whether `c` is in the alphanumeric table
    pub fn is_encodable(c: char) -> bool {
        Self::value_of(c).is_some()
    }

    /// Decode `character_count` characters
    pub fn decode(reader: &mut BitReader, character_count: usize) -> Option<String> {
        let mut result = String::with_capacity(character_count);
        let mut remaining = character_count;

        while remaining >= 2 {
            let value = reader.read(11)? as usize;
            let (first, second) = (value / 45, value % 45);
            if first >= 45 {
                return None;
            }
            result.push(ALPHANUMERIC_TABLE[first]);
            result.push(ALPHANUMERIC_TABLE[second]);
            remaining -= 2;
        }
        if remaining == 1 {
            let value = reader.read(6)? as usize;
            result.push(*ALPHANUMERIC_TABLE.get(value)?);
        }

        Some(result)
    }

    /// Pack characters; every character must be encodable
    pub fn encode(text: &str, buffer: &mut BitBuffer) -> Option<()> {
        let values: Vec<u32> = text.chars().map(Self::value_of).collect::<Option<_>>()?;
        for pair in values.chunks(2) {
            match pair {
                [a, b] => buffer.append(a * 45 + b, 11),
                [a] => buffer.append(*a, 6),
                _ => {}
            }
        }
        Some(())
    }

    /// Data bits for `count` characters
    pub fn encoded_bits(count: usize) -> usize {
        count / 2 * 11 + (count % 2) * 6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphanumeric_round_trip() {
        let mut buffer = BitBuffer::new();
        AlphanumericDecoder::encode("AC-42", &mut buffer).unwrap();
        assert_eq!(buffer.len(), AlphanumericDecoder::encoded_bits(5));
        let bytes = buffer.into_bytes();
        let mut reader = BitReader::new(&bytes);
        assert_eq!(AlphanumericDecoder::decode(&mut reader, 5).as_deref(), Some("AC-42"));
    }

    #[test]
    fn test_known_pair() {
        // "AC" = 10 * 45 + 12 = 462 = 00111001110
        let mut buffer = BitBuffer::new();
        AlphanumericDecoder::encode("AC", &mut buffer).unwrap();
        assert_eq!(buffer.as_bytes(), &[0b0011_1001, 0b1100_0000]);
    }

    #[test]
    fn test_lowercase_not_encodable() {
        assert!(!AlphanumericDecoder::is_encodable('a'));
        assert!(AlphanumericDecoder::encode("abc", &mut BitBuffer::new()).is_none());
    }
}
