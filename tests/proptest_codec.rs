//! Property-based round trips
//!
//! Random content is rendered to a raster and decoded back through the
//! typed API.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use symcodec::{DecodeOptions, EncodeOptions, EncodingRequest, LuminanceImage, Symbology};

fn round_trip(content: &str, symbology: Symbology, width: i32, height: i32) -> Result<String, TestCaseError> {
    let request = EncodingRequest::new(content, symbology, width, height);
    let raster = symcodec::encode_request(&request, &EncodeOptions::default())
        .map_err(|e| TestCaseError::fail(format!("encode failed: {e}")))?;
    let luma = raster.to_luma();
    let image = LuminanceImage::new(&luma, raster.width(), raster.height())
        .map_err(|e| TestCaseError::fail(e.to_string()))?;
    let symbol = symcodec::decode_image(&image, &DecodeOptions::default())
        .map_err(|e| TestCaseError::fail(format!("decode failed: {e}")))?;
    prop_assert_eq!(symbol.symbology, symbology);
    Ok(symbol.text)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Alphanumeric-mode friendly text
    #[test]
    fn prop_qr_roundtrip_alphanumeric(data in "[A-Z0-9 $%*+./:-]{1,120}") {
        prop_assert_eq!(round_trip(&data, Symbology::Qr, 480, 480)?, data);
    }

    /// Digit strings exercise numeric mode and its group packing
    #[test]
    fn prop_qr_roundtrip_numeric(data in "[0-9]{1,200}") {
        prop_assert_eq!(round_trip(&data, Symbology::Qr, 480, 480)?, data);
    }

    /// Mixed ASCII and non-ASCII text goes through byte mode with ECI
    #[test]
    fn prop_qr_roundtrip_text(data in "[a-zA-Z0-9 ,.!?éüß日本]{1,60}") {
        prop_assert_eq!(round_trip(&data, Symbology::Qr, 480, 480)?, data);
    }

    /// Printable ASCII in Code 128
    #[test]
    fn prop_code128_roundtrip(data in "[ -~]{1,30}") {
        prop_assert_eq!(round_trip(&data, Symbology::Code128, 1200, 100)?, data);
    }

    /// Any 12 digits encode as EAN-13 with the computed check digit
    #[test]
    fn prop_ean13_roundtrip(data in "[1-9][0-9]{11}") {
        let text = round_trip(&data, Symbology::Ean13, 400, 100)?;
        prop_assert_eq!(text.len(), 13);
        prop_assert!(text.starts_with(&data));
    }
}
