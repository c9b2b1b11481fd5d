//! Byte mode (0100): 8 bits per byte, text charset selected by ECI

use encoding_rs::Encoding;

use super::{BitBuffer, BitReader};

/// ECI designator for UTF-8
pub const ECI_UTF8: u32 = 26;

/// Character set in effect for byte segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// No ECI seen: strict UTF-8, falling back to ISO-8859-1
    Default,
    /// ISO-8859-1, one char per byte
    Latin1,
    /// Any other supported encoding
    Encoded(&'static Encoding),
}

impl Charset {
    /// Charset named by an ECI assignment number
    pub fn from_eci(value: u32) -> Option<Self> {
        use encoding_rs::*;
        Some(match value {
            0..=3 | 27 | 170 => Charset::Latin1,
            4 => Charset::Encoded(ISO_8859_2),
            5 => Charset::Encoded(ISO_8859_3),
            6 => Charset::Encoded(ISO_8859_4),
            7 => Charset::Encoded(ISO_8859_5),
            8 => Charset::Encoded(ISO_8859_6),
            9 => Charset::Encoded(ISO_8859_7),
            10 => Charset::Encoded(ISO_8859_8),
            11 => Charset::Encoded(WINDOWS_1254),
            13 => Charset::Encoded(WINDOWS_874),
            15 => Charset::Encoded(ISO_8859_13),
            16 => Charset::Encoded(ISO_8859_14),
            17 => Charset::Encoded(ISO_8859_15),
            18 => Charset::Encoded(ISO_8859_16),
            20 => Charset::Encoded(SHIFT_JIS),
            21 => Charset::Encoded(WINDOWS_1250),
            22 => Charset::Encoded(WINDOWS_1251),
            23 => Charset::Encoded(WINDOWS_1252),
            24 => Charset::Encoded(WINDOWS_1256),
            25 => Charset::Encoded(UTF_16BE),
            26 => Charset::Encoded(UTF_8),
            28 => Charset::Encoded(BIG5),
            29 => Charset::Encoded(GB18030),
            30 => Charset::Encoded(EUC_KR),
            _ => return None,
        })
    }

    /// Turn raw segment bytes into text
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Charset::Default => match std::str::from_utf8(bytes) {
                Ok(s) => s.to_owned(),
                Err(_) => latin1(bytes),
            },
            Charset::Latin1 => latin1(bytes),
            Charset::Encoded(encoding) => encoding.decode_without_bom_handling(bytes).0.into_owned(),
        }
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Byte segment reader and writer
pub struct ByteDecoder;

impl ByteDecoder {
    /// Read `character_count` raw bytes
    pub fn decode(reader: &mut BitReader, character_count: usize) -> Option<Vec<u8>> {
        (0..character_count)
            .map(|_| reader.read(8).map(|b| b as u8))
            .collect()
    }

    /// Append raw bytes
    pub fn encode(bytes: &[u8], buffer: &mut BitBuffer) {
        for &b in bytes {
            buffer.append(b as u32, 8);
        }
    }

    /// Read an ECI designator (1, 2 or 3 bytes depending on the leading bits)
    pub fn read_eci(reader: &mut BitReader) -> Option<u32> {
        let first = reader.read(8)?;
        if first & 0x80 == 0 {
            Some(first & 0x7F)
        } else if first & 0xC0 == 0x80 {
            Some(((first & 0x3F) << 8) | reader.read(8)?)
        } else if first & 0xE0 == 0xC0 {
            Some(((first & 0x1F) << 16) | reader.read(16)?)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_decode() {
        // "HI" = 0x48 0x49
        let bytes = [0x48, 0x49];
        let mut reader = BitReader::new(&bytes);
        let raw = ByteDecoder::decode(&mut reader, 2).unwrap();
        assert_eq!(Charset::Default.decode(&raw), "HI");
        assert_eq!(ByteDecoder::decode(&mut reader, 1), None);
    }

    #[test]
    fn test_default_charset_falls_back_to_latin1() {
        assert_eq!(Charset::Default.decode("naïve".as_bytes()), "naïve");
        assert_eq!(Charset::Default.decode(&[0x63, 0x61, 0x66, 0xE9]), "café");
    }

    #[test]
    fn test_eci_charsets() {
        let sjis = Charset::from_eci(20).unwrap();
        assert_eq!(sjis.decode(&[0x93, 0xFA, 0x96, 0x7B]), "日本");
        assert_eq!(Charset::from_eci(3), Some(Charset::Latin1));
        assert_eq!(Charset::from_eci(999), None);
    }

    #[test]
    fn test_read_eci_lengths() {
        let bytes = [0x1A, 0x81, 0x23];
        let mut reader = BitReader::new(&bytes);
        assert_eq!(ByteDecoder::read_eci(&mut reader), Some(26));
        assert_eq!(ByteDecoder::read_eci(&mut reader), Some(0x123));
    }
}
