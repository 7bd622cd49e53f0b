use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let prepared = decode_image(&png_bytes(1, 1, [100, 50, 200, 128])).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_rejects_garbage_and_empty() {
    assert!(matches!(decode_image(b""), Err(PfpError::Decode(_))));
    assert!(matches!(
        decode_image(b"definitely not an image"),
        Err(PfpError::Decode(_))
    ));
}

#[test]
fn decode_svg_rasterizes_at_intrinsic_size() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="2">
        <rect x="0" y="0" width="4" height="2" fill="#00ff00"/>
    </svg>"##;
    let img = decode_image(svg).unwrap();
    assert_eq!((img.width, img.height), (4, 2));
    assert_eq!(&img.rgba8_premul[0..4], &[0, 255, 0, 255]);

    assert!(decode_image(br#"<svg"#).is_err());
}

#[test]
fn recognizes_png_and_svg_but_not_text() {
    assert!(is_recognized_image(&png_bytes(2, 2, [0, 0, 0, 255])));
    assert!(is_recognized_image(
        br#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg"/>"#
    ));
    assert!(!is_recognized_image(b"hello"));
    assert!(!is_recognized_image(b""));
}
