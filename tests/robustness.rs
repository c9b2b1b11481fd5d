//! Rotation, skew, corruption, invalid content and boundary behavior

mod common;

use common::{decode_gray, render_gray, rotate, warp};
use image::imageops;
use symcodec::linear::code128;
use symcodec::render::render_linear;
use symcodec::{CodecError, DecodeOptions, LuminanceImage, Point, Symbology};

const QR_TEXT: &str = "https://example.com/skew-test";

fn qr_answer() -> Option<(String, String)> {
    Some((QR_TEXT.to_string(), "QR_CODE".to_string()))
}

#[test]
fn test_qr_quarter_turns() {
    let image = render_gray(QR_TEXT, Symbology::Qr, 300, 300);
    for turned in [imageops::rotate90(&image), imageops::rotate180(&image), imageops::rotate270(&image)] {
        assert_eq!(decode_gray(&turned, false), qr_answer());
    }
}

#[test]
fn test_qr_mirrored() {
    let image = render_gray(QR_TEXT, Symbology::Qr, 300, 300);
    assert_eq!(decode_gray(&imageops::flip_horizontal(&image), false), qr_answer());
}

#[test]
fn test_qr_small_rotations() {
    let image = render_gray(QR_TEXT, Symbology::Qr, 360, 360);
    for degrees in [-10.0, -4.0, 3.0, 7.0, 10.0] {
        let rotated = rotate(&image, degrees);
        assert_eq!(decode_gray(&rotated, false), qr_answer(), "{degrees} degrees");
    }
}

#[test]
fn test_qr_perspective_skew() {
    let image = render_gray(QR_TEXT, Symbology::Qr, 360, 360);
    // Keystone: the top edge of the output covers a wider span of the source
    let keystone = warp(
        &image,
        [
            Point::new(-25.0, 0.0),
            Point::new(385.0, 0.0),
            Point::new(360.0, 360.0),
            Point::new(0.0, 360.0),
        ],
    );
    assert_eq!(decode_gray(&keystone, false), qr_answer());

    let sideways = warp(
        &image,
        [
            Point::new(0.0, -15.0),
            Point::new(360.0, 10.0),
            Point::new(360.0, 350.0),
            Point::new(0.0, 375.0),
        ],
    );
    assert_eq!(decode_gray(&sideways, true), qr_answer());
}

#[test]
fn test_uneven_illumination() {
    let mut image = render_gray(QR_TEXT, Symbology::Qr, 320, 320);
    // Darken the frame towards the right edge
    for (x, _, px) in image.enumerate_pixels_mut() {
        let factor = 1.0 - 0.6 * x as f32 / 320.0;
        px.0[0] = (px.0[0] as f32 * factor) as u8 + 10;
    }
    assert_eq!(decode_gray(&image, false), qr_answer());
}

#[test]
fn test_extreme_warp_never_returns_wrong_text() {
    let image = render_gray(QR_TEXT, Symbology::Qr, 300, 300);
    let crushed = warp(
        &image,
        [
            Point::new(0.0, 0.0),
            Point::new(300.0, 140.0),
            Point::new(300.0, 160.0),
            Point::new(0.0, 300.0),
        ],
    );
    for focus in [false, true] {
        let decoded = decode_gray(&crushed, focus);
        assert!(decoded.is_none() || decoded == qr_answer(), "{decoded:?}");
    }
}

#[test]
fn test_linear_orientations() {
    let image = render_gray("ROTATE-ME", Symbology::Code128, 500, 140);
    let expected = Some(("ROTATE-ME".to_string(), "CODE_128".to_string()));

    assert_eq!(decode_gray(&imageops::rotate180(&image), false), expected);

    let vertical = imageops::rotate90(&image);
    assert_eq!(decode_gray(&vertical, false), None);
    assert_eq!(decode_gray(&vertical, true), expected);

    let tilted = rotate(&image, 4.0);
    assert_eq!(decode_gray(&tilted, false), expected);
}

#[test]
fn test_noise_frames_decode_to_nothing() {
    let mut state = 0x2545_F491u32;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };
    for focus in [false, false, false, true] {
        let frame: Vec<u8> = (0..320 * 240).map(|_| (next() >> 24) as u8).collect();
        assert_eq!(symcodec::decode(&frame, 320, 240, focus), None);
    }

    // Blocky texture: runs come in whole cells, the way bars do
    let (width, height) = (160usize, 120usize);
    for frame_index in 0..200 {
        let cell = 2 + frame_index % 6;
        let columns = width.div_ceil(cell);
        let rows = height.div_ceil(cell);
        let cells: Vec<u8> = (0..columns * rows)
            .map(|_| if next() & 1 == 0 { 20 } else { 235 })
            .collect();
        let frame: Vec<u8> = (0..width * height)
            .map(|i| cells[(i / width / cell) * columns + (i % width) / cell])
            .collect();
        let focus = frame_index % 10 == 9;
        assert_eq!(
            symcodec::decode(&frame, width as i32, height as i32, focus),
            None,
            "frame {frame_index} with {cell} px cells"
        );
    }
}

#[test]
fn test_code128_corrupted_codeword_is_uncorrectable() {
    let good = code128::encode("ABCD").unwrap();
    let other = code128::encode("ABCE").unwrap();
    assert_eq!(good.len(), other.len());

    // Transplant the fourth data codeword (after the start code)
    let mut corrupted = good.clone();
    corrupted[44..55].copy_from_slice(&other[44..55]);
    assert_ne!(corrupted, good);

    let raster = render_linear(&corrupted, 10, 400, 80).unwrap();
    let luma = raster.to_luma();
    assert_eq!(symcodec::decode(&luma, 400, 80, false), None);

    let image = LuminanceImage::new(&luma, 400, 80).unwrap();
    assert_eq!(
        symcodec::decode_image(&image, &DecodeOptions::default()),
        Err(CodecError::Uncorrectable)
    );
}

#[test]
fn test_invalid_content_is_rejected() {
    let cases = [
        ("ABC", "EAN_13"),
        ("12345678901234", "UPC_A"),
        ("1234567890123", "EAN_13"),
        ("lowercase", "CODE_39"),
        ("café", "CODE_93"),
        ("12345", "EAN_8"),
        ("2123456", "UPC_E"),
        ("12345678", "ITF"),
        ("12A34", "CODABAR"),
        ("", "CODE_128"),
        ("\u{e9}", "CODE_128"),
    ];
    for (content, format) in cases {
        assert_eq!(symcodec::encode(content, format, 600, 200), None, "{format} {content:?}");
    }
    let too_long = "9".repeat(7090);
    assert_eq!(symcodec::encode(&too_long, "QR_CODE", 1000, 1000), None);
}

#[test]
fn test_size_boundaries() {
    assert_eq!(symcodec::encode("123", "QR_CODE", 0, 0), None);
    assert_eq!(symcodec::encode("123", "QR_CODE", 100, 0), None);
    assert_eq!(symcodec::encode("123", "CODE_128", -5, 100), None);
    // Version 1 with a 4 module quiet zone needs 29 px
    assert_eq!(symcodec::encode("1", "QR_CODE", 28, 28), None);
    assert!(symcodec::encode("1", "QR_CODE", 29, 29).is_some());
    // Linear symbols need the full height floor
    assert_eq!(symcodec::encode("12345670", "ITF", 400, 3), None);
    assert!(symcodec::encode("12345670", "ITF", 400, 4).is_some());

    let short = vec![255u8; 50 * 50 - 1];
    assert_eq!(symcodec::decode(&short, 50, 50, false), None);
    let long = vec![255u8; 50 * 50 + 1];
    assert_eq!(symcodec::decode(&long, 50, 50, false), None);
    assert_eq!(symcodec::decode(&[], 0, 10, false), None);
}

#[test]
fn test_oversized_rasters_are_refused() {
    assert_eq!(symcodec::encode("1", "QR_CODE", i32::MAX, i32::MAX), None);
    assert_eq!(symcodec::encode("ABC", "CODE_128", i32::MAX, i32::MAX), None);
    assert_eq!(symcodec::encode("1", "QR_CODE", 30_000, 30_000), None);
    assert_eq!(symcodec::encode("12345670", "ITF", i32::MAX, 100), None);
}

#[test]
fn test_symbology_filter_and_crop() {
    let image = render_gray("FILTERED", Symbology::Code39, 500, 120);
    let luma = LuminanceImage::from_gray_image(&image);

    let qr_only = DecodeOptions {
        symbologies: Some(vec![Symbology::Qr]),
        ..DecodeOptions::default()
    };
    assert!(symcodec::decode_image(&luma, &qr_only).is_err());

    let cropped = DecodeOptions {
        crop: Some(symcodec::CropRect::new(0, 30, 500, 60)),
        ..DecodeOptions::default()
    };
    assert_eq!(symcodec::decode_image(&luma, &cropped).unwrap().text, "FILTERED");

    let outside = DecodeOptions {
        crop: Some(symcodec::CropRect::new(600, 0, 10, 10)),
        ..DecodeOptions::default()
    };
    assert!(matches!(
        symcodec::decode_image(&luma, &outside),
        Err(CodecError::InvalidRequest(_))
    ));
}

#[test]
fn test_optional_checksum_can_be_skipped() {
    let image = render_gray("SKIP", Symbology::Code39, 400, 100);
    let luma = LuminanceImage::from_gray_image(&image);
    let lenient = DecodeOptions {
        require_optional_checksums: false,
        ..DecodeOptions::default()
    };
    // The check character stays in the text when it is not verified
    let text = symcodec::decode_image(&luma, &lenient).unwrap().text;
    assert_eq!(text.len(), 5);
    assert!(text.starts_with("SKIP"));
}
