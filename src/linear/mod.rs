//! Linear (1D) symbologies
//!
//! Every symbology module works on run lengths of one scan line: `encode`
//! produces the bar/space modules without quiet zones and `decode` reads a
//! row of runs that starts with light.

/// Codabar (NW-7)
pub mod codabar;
/// Code 128 with sets A, B and C
pub mod code128;
/// Code 39
pub mod code39;
/// Code 93 with full ASCII shifts
pub mod code93;
/// Interleaved 2 of 5
pub mod itf;
/// Run lengths and width-pattern matching shared by all row decoders
pub mod runs;
/// Row selection over a binarized frame
pub mod scanner;
/// EAN-13, EAN-8, UPC-A and UPC-E
pub mod upc_ean;

use crate::config::DecodeOptions;
use crate::error::Result;
use crate::models::{DecodedSymbol, Symbology};

/// Row decoders in the order they are tried on each scan line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowReader {
    /// EAN/UPC family
    UpcEan,
    /// Code 39
    Code39,
    /// Code 93
    Code93,
    /// Code 128
    Code128,
    /// Interleaved 2 of 5
    Itf,
    /// Codabar
    Codabar,
}

impl RowReader {
    /// Every reader, in trial order
    pub const ALL: [RowReader; 6] = [
        RowReader::UpcEan,
        RowReader::Code39,
        RowReader::Code93,
        RowReader::Code128,
        RowReader::Itf,
        RowReader::Codabar,
    ];

    /// Symbologies this reader can report
    pub fn symbologies(self) -> &'static [Symbology] {
        match self {
            RowReader::UpcEan => &[Symbology::Ean13, Symbology::UpcA, Symbology::UpcE, Symbology::Ean8],
            RowReader::Code39 => &[Symbology::Code39],
            RowReader::Code93 => &[Symbology::Code93],
            RowReader::Code128 => &[Symbology::Code128],
            RowReader::Itf => &[Symbology::Itf],
            RowReader::Codabar => &[Symbology::Codabar],
        }
    }

    /// Whether any of this reader's symbologies takes part in the decode
    pub fn enabled(self, options: &DecodeOptions) -> bool {
        self.symbologies().iter().any(|&s| options.allows(s))
    }

    /// Decode one row of runs
    pub fn decode_row(self, runs: &[usize], options: &DecodeOptions) -> Result<DecodedSymbol> {
        let single = |text: String| DecodedSymbol::new(text, self.symbologies()[0]);
        match self {
            RowReader::UpcEan => upc_ean::decode(runs, |s| options.allows(s))
                .map(|(symbology, text)| DecodedSymbol::new(text, symbology)),
            RowReader::Code39 => code39::decode(runs, options.require_optional_checksums).map(single),
            RowReader::Code93 => code93::decode(runs).map(single),
            RowReader::Code128 => code128::decode(runs).map(single),
            RowReader::Itf => itf::decode(runs).map(single),
            RowReader::Codabar => codabar::decode(runs, options.require_optional_checksums).map(single),
        }
    }
}
