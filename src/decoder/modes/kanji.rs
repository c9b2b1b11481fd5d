//! Kanji mode (1000): 13 bits per double-byte Shift_JIS character

use encoding_rs::SHIFT_JIS;

use super::BitReader;

/// Kanji segment reader
pub struct KanjiDecoder;

impl KanjiDecoder {
    /// Decode `character_count` characters through Shift_JIS
    pub fn decode(reader: &mut BitReader, character_count: usize) -> Option<String> {
        let mut sjis = Vec::with_capacity(character_count * 2);
        for _ in 0..character_count {
            let value = reader.read(13)?;
            let mut assembled = ((value / 0xC0) << 8) | (value % 0xC0);
            assembled += if assembled < 0x1F00 { 0x8140 } else { 0xC140 };
            sjis.push((assembled >> 8) as u8);
            sjis.push(assembled as u8);
        }
        let (text, _, had_errors) = SHIFT_JIS.decode(&sjis);
        (!had_errors).then(|| text.into_owned())
    }
}
