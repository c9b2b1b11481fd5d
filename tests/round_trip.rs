//! Encode-then-decode through the public boundary functions

mod common;

use common::luma_from_wire;

/// (format, content, expected text, expected format)
const CASES: [(&str, &str, &str, &str); 10] = [
    ("QR_CODE", "https://example.com/?q=round-trip", "https://example.com/?q=round-trip", "QR_CODE"),
    ("CODE_128", "Code-128 / 42", "Code-128 / 42", "CODE_128"),
    ("CODE_39", "CODE 39-OK", "CODE 39-OK", "CODE_39"),
    ("CODE_93", "CODE93 $5", "CODE93 $5", "CODE_93"),
    ("EAN_13", "400638133393", "4006381333931", "EAN_13"),
    ("EAN_8", "96385074", "96385074", "EAN_8"),
    ("UPC_A", "036000291452", "036000291452", "UPC_A"),
    ("UPC_E", "01234565", "01234565", "UPC_E"),
    ("ITF", "12345670", "12345670", "ITF"),
    ("CODABAR", "A40156B", "40156", "CODABAR"),
];

const MATRIX_SIZES: [(i32, i32); 3] = [(200, 200), (330, 260), (512, 512)];
const LINEAR_SIZES: [(i32, i32); 3] = [(480, 120), (720, 200), (1000, 90)];

fn round_trip(format: &str, content: &str, width: i32, height: i32, focus: bool) -> Option<(String, String)> {
    let bytes = symcodec::encode(content, format, width, height)?;
    assert_eq!(bytes.len(), 8 + (width * height * 4) as usize);
    let (luma, w, h) = luma_from_wire(&bytes);
    assert_eq!((w, h), (width, height));
    symcodec::decode(&luma, w, h, focus)
}

#[test]
fn test_every_symbology_at_several_sizes() {
    for (format, content, text, literal) in CASES {
        let sizes = if format == "QR_CODE" { MATRIX_SIZES } else { LINEAR_SIZES };
        for (width, height) in sizes {
            for focus in [false, true] {
                let decoded = round_trip(format, content, width, height, focus);
                assert_eq!(
                    decoded,
                    Some((text.to_string(), literal.to_string())),
                    "{format} {content:?} at {width}x{height}, focus {focus}"
                );
            }
        }
    }
}

#[test]
fn test_qr_levels_and_charsets() {
    let samples = [
        "0123456789012345678901234567890123456789",
        "MIXED CASE 12345 $%*+-./:",
        "Grüße aus Köln",
        "日本語のテキスト",
        "line one\nline two\ttabbed",
    ];
    for content in samples {
        for ec in ["L", "M", "Q", "H"] {
            let ec_level = ec.parse().unwrap();
            let options = symcodec::EncodeOptions {
                ec_level,
                quiet_zone: None,
            };
            let request = symcodec::EncodingRequest::new(content, symcodec::Symbology::Qr, 400, 400);
            let raster = symcodec::encode_request(&request, &options).unwrap();
            let decoded = symcodec::decode(&raster.to_luma(), 400, 400, false);
            assert_eq!(decoded, Some((content.to_string(), "QR_CODE".to_string())), "{content:?} at {ec}");
        }
    }
}

#[test]
fn test_larger_qr_versions() {
    // Byte content long enough for versions with several alignment patterns
    // and version information blocks
    for repeat in [5, 12, 25] {
        let content = "symcodec-".repeat(repeat);
        let decoded = round_trip("QR_CODE", &content, 800, 800, false);
        assert_eq!(decoded, Some((content.clone(), "QR_CODE".to_string())), "{} bytes", content.len());
    }
}

#[test]
fn test_code128_set_switching() {
    for content in ["1234567890", "ABC1234567def", "\u{1}CTRL\u{2}", "x"] {
        let decoded = round_trip("CODE_128", content, 700, 100, false);
        assert_eq!(decoded, Some((content.to_string(), "CODE_128".to_string())), "{content:?}");
    }
}

#[test]
fn test_longer_linear_contents() {
    let cases = [
        ("CODE_39", "ABCDEFGHIJKLMNOP"),
        ("CODE_93", "ABCDEFGHIJKLMNOPQRSTUVWXYZ"),
        ("ITF", "00012345678905"),
        ("CODABAR", "C$1.50+12-34/5:6D"),
    ];
    for (format, content) in cases {
        let decoded = round_trip(format, content, 1200, 120, false).map(|(text, _)| text);
        let expected = match format {
            "CODABAR" => "$1.50+12-34/5:6",
            _ => content,
        };
        assert_eq!(decoded.as_deref(), Some(expected), "{format}");
    }
}

#[test]
fn test_encoding_is_deterministic() {
    for (format, content, _, _) in CASES {
        let size = if format == "QR_CODE" { (300, 300) } else { (600, 150) };
        let first = symcodec::encode(content, format, size.0, size.1);
        let second = symcodec::encode(content, format, size.0, size.1);
        assert!(first.is_some(), "{format}");
        assert_eq!(first, second, "{format}");
    }
}

#[test]
fn test_quiet_zone_is_background() {
    for (format, content, _, _) in CASES {
        let (width, height) = if format == "QR_CODE" { (250, 250) } else { (640, 120) };
        let bytes = symcodec::encode(content, format, width, height).unwrap();
        let (luma, w, h) = luma_from_wire(&bytes);
        let (w, h) = (w as usize, h as usize);
        // Every minimum quiet zone is at least 4 modules of at least 1 px;
        // linear margins are at least 1 px top and bottom
        let side = 4;
        for y in 0..h {
            for x in (0..side).chain(w - side..w) {
                assert_eq!(luma[y * w + x], 255, "{format} at ({x}, {y})");
            }
        }
        for x in 0..w {
            assert_eq!(luma[x], 255, "{format} top row");
            assert_eq!(luma[(h - 1) * w + x], 255, "{format} bottom row");
        }
    }
}

#[test]
fn test_concurrent_callers_agree() {
    let expected: Vec<_> = CASES
        .iter()
        .map(|&(format, content, _, _)| {
            let size = if format == "QR_CODE" { (260, 260) } else { (600, 120) };
            let bytes = symcodec::encode(content, format, size.0, size.1).unwrap();
            let decoded = round_trip(format, content, size.0, size.1, false);
            (bytes, decoded)
        })
        .collect();

    std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let expected = &expected;
                scope.spawn(move || {
                    // Each worker starts at a different case
                    for round in 0..CASES.len() {
                        let index = (worker + round) % CASES.len();
                        let (format, content, _, _) = CASES[index];
                        let size = if format == "QR_CODE" { (260, 260) } else { (600, 120) };
                        let bytes = symcodec::encode(content, format, size.0, size.1);
                        assert_eq!(bytes.as_ref(), Some(&expected[index].0), "{format}");
                        let decoded = round_trip(format, content, size.0, size.1, false);
                        assert_eq!(decoded, expected[index].1, "{format}");
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
    });
    assert!(expected.iter().all(|(_, decoded)| decoded.is_some()));
}

#[test]
fn test_ean13_with_leading_zero_reads_as_upc_a() {
    // A leading 0 makes the EAN-13 a UPC-A; multi-format readers report it so
    let encoded = round_trip("EAN_13", "003600029145", 480, 120, false);
    assert_eq!(encoded, Some(("036000291452".to_string(), "UPC_A".to_string())));
    let upc = round_trip("UPC_A", "03600029145", 480, 120, false);
    assert_eq!(encoded, upc);
    // Any other first digit keeps the EAN-13 format
    assert_eq!(
        round_trip("EAN_13", "400638133393", 480, 120, false),
        Some(("4006381333931".to_string(), "EAN_13".to_string()))
    );
}
