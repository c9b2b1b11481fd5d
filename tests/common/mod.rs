//! Raster helpers shared by the integration tests
#![allow(dead_code)]

use image::GrayImage;
use symcodec::utils::geometry::PerspectiveTransform;
use symcodec::{EncodeOptions, EncodingRequest, Point, Symbology};

/// Luminance of a wire-format raster (8-byte header, then A,R,G,B per pixel)
pub fn luma_from_wire(bytes: &[u8]) -> (Vec<u8>, i32, i32) {
    let width = i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let height = i32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    let luma = bytes[8..].chunks_exact(4).map(|px| px[2]).collect();
    (luma, width, height)
}

/// Render through the typed API and return a grayscale image
pub fn render_gray(content: &str, symbology: Symbology, width: u32, height: u32) -> GrayImage {
    let request = EncodingRequest::new(content, symbology, width as i32, height as i32);
    let raster = symcodec::encode_request(&request, &EncodeOptions::default())
        .unwrap_or_else(|e| panic!("{symbology} {content:?} at {width}x{height}: {e}"));
    GrayImage::from_raw(width, height, raster.to_luma()).expect("raster size")
}

/// Resample `source` so that the image corners land on `corners`
/// (top-left, top-right, bottom-right, bottom-left) of the source frame.
/// Pixels mapping outside the source are white.
pub fn warp(source: &GrayImage, corners: [Point; 4]) -> GrayImage {
    let (w, h) = (source.width() as f32, source.height() as f32);
    let frame = [
        Point::new(0.0, 0.0),
        Point::new(w, 0.0),
        Point::new(w, h),
        Point::new(0.0, h),
    ];
    let transform = PerspectiveTransform::from_points(&frame, &corners).expect("non-degenerate warp");
    GrayImage::from_fn(source.width(), source.height(), |x, y| {
        let p = transform.transform(&Point::new(x as f32 + 0.5, y as f32 + 0.5));
        let (sx, sy) = (p.x.floor(), p.y.floor());
        if sx < 0.0 || sy < 0.0 || sx >= w || sy >= h {
            image::Luma([255])
        } else {
            *source.get_pixel(sx as u32, sy as u32)
        }
    })
}

/// Rotate about the center by `degrees`
pub fn rotate(source: &GrayImage, degrees: f32) -> GrayImage {
    let (w, h) = (source.width() as f32, source.height() as f32);
    let (cx, cy) = (w / 2.0, h / 2.0);
    let (sin, cos) = degrees.to_radians().sin_cos();
    let turn = |x: f32, y: f32| {
        let (dx, dy) = (x - cx, y - cy);
        Point::new(cx + dx * cos - dy * sin, cy + dx * sin + dy * cos)
    };
    warp(source, [turn(0.0, 0.0), turn(w, 0.0), turn(w, h), turn(0.0, h)])
}

/// Decode a grayscale image through the boundary API
pub fn decode_gray(image: &GrayImage, focus: bool) -> Option<(String, String)> {
    symcodec::decode(
        image.as_raw(),
        image.width() as i32,
        image.height() as i32,
        focus,
    )
}
