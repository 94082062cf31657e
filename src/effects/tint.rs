use crate::assets::ink::InkId;
use crate::foundation::core::Rgb8;

/// Duotone: each pixel becomes `ink * mean(r, g, b) / 255`, alpha kept.
///
/// Pure; feeding the same source twice yields identical output.
pub fn apply_tint(src: &image::RgbaImage, ink: InkId) -> image::RgbaImage {
    tint_with(src, ink.rgb())
}

pub fn tint_with(src: &image::RgbaImage, ink: Rgb8) -> image::RgbaImage {
    let mut out = src.clone();
    for px in out.pixels_mut() {
        let sum = u32::from(px[0]) + u32::from(px[1]) + u32::from(px[2]);
        px[0] = tint_channel(ink.r, sum);
        px[1] = tint_channel(ink.g, sum);
        px[2] = tint_channel(ink.b, sum);
    }
    out
}

// round(ink * (sum / 3) / 255)
fn tint_channel(ink: u8, sum: u32) -> u8 {
    ((u32::from(ink) * sum + 382) / 765) as u8
}

/// CSS `hue-rotate(deg)` on straight RGBA, alpha kept.
pub fn hue_rotate(src: &image::RgbaImage, degrees: f64) -> image::RgbaImage {
    let m = hue_matrix(degrees);
    let mut out = src.clone();
    for px in out.pixels_mut() {
        let rgb = [f64::from(px[0]), f64::from(px[1]), f64::from(px[2])];
        for (i, row) in m.iter().enumerate() {
            let v = row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2];
            px[i] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

fn hue_matrix(degrees: f64) -> [[f64; 3]; 3] {
    let (s, c) = degrees.to_radians().sin_cos();
    [
        [
            0.213 + c * 0.787 - s * 0.213,
            0.715 - c * 0.715 - s * 0.715,
            0.072 - c * 0.072 + s * 0.928,
        ],
        [
            0.213 - c * 0.213 + s * 0.143,
            0.715 + c * 0.285 + s * 0.140,
            0.072 - c * 0.072 - s * 0.283,
        ],
        [
            0.213 - c * 0.213 - s * 0.787,
            0.715 - c * 0.715 + s * 0.715,
            0.072 + c * 0.928 + s * 0.072,
        ],
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/effects/tint.rs"]
mod tests;
