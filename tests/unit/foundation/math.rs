use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn alpha_quantization_clamps() {
    assert_eq!(alpha_to_u8(-1.0), 0);
    assert_eq!(alpha_to_u8(0.5), 128);
    assert_eq!(alpha_to_u8(2.0), 255);
}

#[test]
fn premultiply_matches_rounded_product_and_zeroes_transparent() {
    let mut px = vec![100u8, 50, 200, 128, 9, 9, 9, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(
        &px[..4],
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
    assert_eq!(&px[4..], &[0, 0, 0, 0]);
}

#[test]
fn unpremultiply_leaves_opaque_pixels_alone() {
    let mut px = vec![12u8, 34, 56, 255, 64, 0, 32, 128];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[12, 34, 56, 255]);
    assert_eq!(&px[4..], &[128, 0, 64, 128]);
}
