use criterion::{Criterion, black_box, criterion_group, criterion_main};
use symcodec::encoder::qr_encoder::QrEncoder;
use symcodec::{DecodeOptions, ECLevel, EncodeOptions, EncodingRequest, LuminanceImage, Symbology};

const URL: &str = "https://example.com/products/12345?ref=bench";

fn bench_qr_encode(c: &mut Criterion) {
    c.bench_function("qr_encode_url_m", |b| {
        b.iter(|| QrEncoder::encode(black_box(URL), ECLevel::M))
    });
    let long = "0123456789ABCDEFGHIJ".repeat(40);
    c.bench_function("qr_encode_800_chars_h", |b| {
        b.iter(|| QrEncoder::encode(black_box(&long), ECLevel::H))
    });
}

fn frame_for(content: &str, size: i32) -> Vec<u8> {
    let request = EncodingRequest::new(content, Symbology::Qr, size, size);
    symcodec::encode_request(&request, &EncodeOptions::default())
        .map(|raster| raster.to_luma())
        .unwrap_or_default()
}

fn bench_qr_decode(c: &mut Criterion) {
    let luma = frame_for(URL, 480);
    let image = LuminanceImage::new(&luma, 480, 480).expect("frame size");
    let options = DecodeOptions::default();
    c.bench_function("qr_decode_480x480", |b| {
        b.iter(|| symcodec::decode_image(black_box(&image), &options))
    });

    let focus = DecodeOptions::with_try_harder(true);
    c.bench_function("qr_decode_480x480_try_harder", |b| {
        b.iter(|| symcodec::decode_image(black_box(&image), &focus))
    });
}

fn bench_empty_frame(c: &mut Criterion) {
    let luma = vec![200u8; 640 * 480];
    let image = LuminanceImage::new(&luma, 640, 480).expect("frame size");
    let options = DecodeOptions::default();
    c.bench_function("decode_empty_640x480", |b| {
        b.iter(|| symcodec::decode_image(black_box(&image), &options))
    });
}

criterion_group!(benches, bench_qr_encode, bench_qr_decode, bench_empty_frame);
criterion_main!(benches);
