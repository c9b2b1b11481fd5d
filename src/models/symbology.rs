use std::fmt;

/// Supported symbologies
///
/// One matrix code (QR) and nine linear codes. Each variant owns its
/// alphabet, checksum rule and quiet-zone requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbology {
    /// QR Code Model 2
    Qr,
    /// Code 128 (sets A, B, C)
    Code128,
    /// Code 39 with mod-43 check character
    Code39,
    /// Code 93 with C and K check characters
    Code93,
    /// EAN-13 / GTIN-13
    Ean13,
    /// EAN-8
    Ean8,
    /// UPC-A
    UpcA,
    /// UPC-E (zero-suppressed UPC-A)
    UpcE,
    /// Interleaved 2 of 5
    Itf,
    /// Codabar (NW-7)
    Codabar,
}

impl Symbology {
    /// Every symbology, matrix code first
    pub const ALL: [Symbology; 10] = [
        Symbology::Qr,
        Symbology::Code128,
        Symbology::Code39,
        Symbology::Code93,
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::UpcA,
        Symbology::UpcE,
        Symbology::Itf,
        Symbology::Codabar,
    ];

    /// True for 2D matrix codes
    pub fn is_matrix(&self) -> bool {
        matches!(self, Symbology::Qr)
    }

    /// Minimum blank margin in modules on each side of the symbol
    pub fn quiet_zone_modules(&self) -> usize {
        match self {
            Symbology::Qr => 4,
            Symbology::Ean13 => 11,
            Symbology::Ean8 => 7,
            Symbology::UpcA | Symbology::UpcE => 9,
            Symbology::Code128
            | Symbology::Code39
            | Symbology::Code93
            | Symbology::Itf
            | Symbology::Codabar => 10,
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(crate::registry::literal(*self))
    }
}
