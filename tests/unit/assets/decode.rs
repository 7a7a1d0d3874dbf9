use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let buf = png_bytes(1, 1, vec![100u8, 50u8, 200u8, 128u8]);

    let decoded = decode_image(&buf).unwrap();
    assert_eq!(decoded.width, 1);
    assert_eq!(decoded.height, 1);
    assert_eq!(
        decoded.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_svg_icon_at_intrinsic_size() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="12" height="20">
        <rect width="12" height="20" fill="#ff0000"/>
    </svg>"##;
    let decoded = decode_image(svg).unwrap();
    assert_eq!((decoded.width, decoded.height), (12, 20));
    assert_eq!(&decoded.rgba8_premul[0..4], &[255, 0, 0, 255]);
}

#[test]
fn svg_sniffing_survives_a_multibyte_char_at_the_cut() {
    let mut svg = String::from(r#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"><!-- "#);
    while svg.len() < 511 {
        svg.push('x');
    }
    svg.push('é');
    assert!(!svg.is_char_boundary(512));
    svg.push_str(r##" --><rect width="4" height="4" fill="#00ff00"/></svg>"##);

    let decoded = decode_image(svg.as_bytes()).unwrap();
    assert_eq!((decoded.width, decoded.height), (4, 4));
    assert_eq!(&decoded.rgba8_premul[0..4], &[0, 255, 0, 255]);
}

#[test]
fn oversized_raster_is_a_decode_error() {
    let wide = png_bytes(MAX_IMAGE_SIDE + 1, 1, vec![255; (MAX_IMAGE_SIDE as usize + 1) * 4]);
    let err = decode_image(&wide).unwrap_err();
    assert!(matches!(err, MapExportError::Decode(_)));
}

#[test]
fn decode_rejects_garbage() {
    assert!(decode_image(b"definitely not an image").is_err());
    assert!(decode_image(b"<svg").is_err());
}

#[test]
fn from_premul_checks_length() {
    assert!(DecodedImage::from_premul(2, 2, vec![0; 16]).is_ok());
    assert!(DecodedImage::from_premul(2, 2, vec![0; 15]).is_err());
}

#[test]
fn unpremultiply_restores_straight_channels() {
    let mut px = vec![100, 50, 0, 255, 64, 32, 0, 128, 9, 9, 9, 0];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[0..4], &[100, 50, 0, 255]);
    assert_eq!(&px[4..8], &[128, 64, 0, 128]);
    assert_eq!(&px[8..12], &[9, 9, 9, 0]);
}
