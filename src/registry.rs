//! Symbology dispatch and the external format literals
use crate::error::{CodecError, Result};
use crate::linear::{codabar, code128, code39, code93, itf, upc_ean};
use crate::models::Symbology;

const LITERALS: [(Symbology, &str); 10] = [
    (Symbology::Qr, "QR_CODE"),
    (Symbology::Code128, "CODE_128"),
    (Symbology::Code39, "CODE_39"),
    (Symbology::Code93, "CODE_93"),
    (Symbology::Ean13, "EAN_13"),
    (Symbology::Ean8, "EAN_8"),
    (Symbology::UpcA, "UPC_A"),
    (Symbology::UpcE, "UPC_E"),
    (Symbology::Itf, "ITF"),
    (Symbology::Codabar, "CODABAR"),
];

/// Format literal reported for `symbology`
pub fn literal(symbology: Symbology) -> &'static str {
    LITERALS
        .iter()
        .find(|(s, _)| *s == symbology)
        .map_or("QR_CODE", |(_, name)| *name)
}

/// Symbology for an exact format literal
pub fn from_literal(name: &str) -> Option<Symbology> {
    LITERALS
        .iter()
        .find(|(_, literal)| *literal == name)
        .map(|(s, _)| *s)
}

/// Symbology for a format literal, falling back to QR for unknown names
pub fn resolve_format(name: &str) -> Symbology {
    from_literal(name).unwrap_or(Symbology::Qr)
}

/// Bar/space modules of a linear symbol, quiet zone excluded
pub fn encode_linear(symbology: Symbology, content: &str) -> Result<Vec<bool>> {
    match symbology {
        Symbology::Qr => Err(CodecError::invalid("QR is not a linear symbology")),
        Symbology::Code128 => code128::encode(content),
        Symbology::Code39 => code39::encode(content),
        Symbology::Code93 => code93::encode(content),
        Symbology::Ean13 | Symbology::Ean8 | Symbology::UpcA | Symbology::UpcE => {
            upc_ean::encode(symbology, content)
        }
        Symbology::Itf => itf::encode(content),
        Symbology::Codabar => codabar::encode(content),
    }
}
