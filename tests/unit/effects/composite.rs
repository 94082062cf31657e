use super::*;

fn near(a: u8, b: u8) -> bool {
    a.abs_diff(b) <= 1
}

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_dst_transparent_returns_scaled_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn normal_blend_is_source_over() {
    let dst = [40, 80, 120, 255];
    let src = [100, 50, 25, 180];
    for op in [0.0, 0.3, 1.0] {
        assert_eq!(blend(dst, src, op, BlendMode::Normal), over(dst, src, op));
    }
}

#[test]
fn blend_opacity_0_and_clear_src_are_noops() {
    let dst = [40, 80, 120, 255];
    for mode in BlendMode::ALL {
        assert_eq!(blend(dst, [200, 10, 10, 255], 0.0, mode), dst);
        assert_eq!(blend(dst, [0, 0, 0, 0], 1.0, mode), dst);
    }
}

#[test]
fn multiply_on_white_is_identity() {
    let src = [12, 200, 77, 255];
    assert_eq!(blend([255, 255, 255, 255], src, 1.0, BlendMode::Multiply), src);
}

#[test]
fn multiply_half_opacity_mixes_toward_product() {
    let dst = [200, 100, 50, 255];
    let src = [100, 200, 250, 255];
    let out = blend(dst, src, 0.5, BlendMode::Multiply);
    assert!(near(out[0], 139), "{out:?}");
    assert!(near(out[1], 89), "{out:?}");
    assert!(near(out[2], 49) || near(out[2], 50), "{out:?}");
    assert_eq!(out[3], 255);
}

#[test]
fn blend_onto_transparent_shows_source() {
    let src = [90, 30, 200, 255];
    for mode in BlendMode::ALL {
        assert_eq!(blend([0, 0, 0, 0], src, 1.0, mode), src, "{mode}");
    }
}

#[test]
fn separable_modes_on_opaque_pixels() {
    let black = [0, 0, 0, 255];
    let white = [255, 255, 255, 255];
    let c = [90, 30, 200, 255];
    assert_eq!(blend(black, c, 1.0, BlendMode::Screen), c);
    assert_eq!(blend(white, c, 1.0, BlendMode::Screen), white);
    assert_eq!(blend(c, c, 1.0, BlendMode::Difference), black);
    assert_eq!(blend(white, c, 1.0, BlendMode::Darken), c);
    assert_eq!(blend(black, c, 1.0, BlendMode::Lighten), c);
    assert_eq!(blend(black, c, 1.0, BlendMode::ColorDodge), black);
    assert_eq!(blend(white, c, 1.0, BlendMode::ColorBurn), white);
    assert_eq!(blend(black, c, 1.0, BlendMode::Exclusion), c);
}

#[test]
fn luminosity_takes_source_brightness() {
    let out = blend([128, 128, 128, 255], [64, 64, 64, 255], 1.0, BlendMode::Luminosity);
    assert!(near(out[0], 64) && near(out[1], 64) && near(out[2], 64), "{out:?}");
    assert_eq!(out[3], 255);
}

#[test]
fn color_mode_on_gray_backdrop_keeps_backdrop_luma() {
    let out = blend([128, 128, 128, 255], [255, 0, 0, 255], 1.0, BlendMode::Color);
    let l = 0.3 * f32::from(out[0]) + 0.59 * f32::from(out[1]) + 0.11 * f32::from(out[2]);
    assert!((l - 128.0).abs() <= 1.5, "{out:?}");
    assert!(out[0] > out[1]);
}

#[test]
fn blend_in_place_respects_column_clip() {
    let (w, h) = (4u32, 2u32);
    let mut dst = [255u8, 255, 255, 255].repeat((w * h) as usize);
    let src = [0u8, 0, 0, 255].repeat((w * h) as usize);
    blend_in_place(
        &mut dst,
        &src,
        BlendParams {
            width: w,
            height: h,
            opacity: 1.0,
            mode: BlendMode::Multiply,
            clip: Some(ColumnSpan { start: 1, end: 3 }),
        },
    )
    .unwrap();
    for y in 0..h as usize {
        for x in 0..w as usize {
            let i = (y * w as usize + x) * 4;
            let expected = if (1..3).contains(&x) { 0 } else { 255 };
            assert_eq!(dst[i], expected, "x={x} y={y}");
        }
    }
}

#[test]
fn blend_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 16];
    let src = vec![0u8; 12];
    let params = BlendParams {
        width: 2,
        height: 2,
        opacity: 1.0,
        mode: BlendMode::Normal,
        clip: None,
    };
    assert!(blend_in_place(&mut dst, &src, params).is_err());
}

#[test]
fn patch_is_clipped_to_frame() {
    let mut dst = vec![0u8; 3 * 3 * 4];
    let patch = [255u8, 0, 0, 255].repeat(4);
    over_patch_in_place(&mut dst, (3, 3), &patch, (2, 2), (2, 2)).unwrap();
    let lit: Vec<usize> = dst
        .chunks_exact(4)
        .enumerate()
        .filter(|(_, p)| p[3] == 255)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(lit, vec![8]);
}

#[test]
fn patch_right_of_frame_is_a_no_op() {
    let mut dst = vec![0u8; 3 * 3 * 4];
    let patch = [255u8, 0, 0, 255].repeat(4);
    over_patch_in_place(&mut dst, (3, 3), &patch, (2, 2), (5, 2)).unwrap();
    over_patch_in_place(&mut dst, (3, 3), &patch, (2, 2), (1, 7)).unwrap();
    assert!(dst.iter().all(|&b| b == 0));
}

#[test]
fn fill_columns_paints_span_only() {
    let mut dst = vec![0u8; 4 * 2 * 4];
    fill_columns(&mut dst, 4, 2, ColumnSpan { start: 1, end: 3 }, [204, 204, 204, 255]).unwrap();
    for (i, p) in dst.chunks_exact(4).enumerate() {
        let x = i % 4;
        assert_eq!(p[3] == 255, x == 1 || x == 2);
    }
}

#[test]
fn column_span_helpers() {
    let s = ColumnSpan { start: 2, end: 5 };
    assert_eq!(s.len(), 3);
    assert!(s.contains(2) && !s.contains(5));
    assert!(ColumnSpan { start: 4, end: 4 }.is_empty());
    assert_eq!(ColumnSpan::full(7), ColumnSpan { start: 0, end: 7 });
}
