use std::borrow::Cow;

use image::imageops::{self, FilterType};

use crate::foundation::core::{Rgb8, Rng64};

/// Number of colors sampled per image.
pub const SAMPLE_COUNT: usize = 30;
/// Longest side of the scratch copy the samples are drawn from.
pub const SAMPLE_MAX_SIDE: u32 = 200;

/// Sample [`SAMPLE_COUNT`] random pixel colors (with replacement) from a downscaled copy.
pub fn extract_colors(image: &image::RgbaImage, rng: &mut Rng64) -> Vec<Rgb8> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let (sw, sh) = sample_dims(w, h);
    let small: Cow<'_, image::RgbaImage> = if (sw, sh) == (w, h) {
        Cow::Borrowed(image)
    } else {
        Cow::Owned(imageops::resize(image, sw, sh, FilterType::Triangle))
    };

    (0..SAMPLE_COUNT)
        .map(|_| {
            let x = rng.below(sw as usize) as u32;
            let y = rng.below(sh as usize) as u32;
            let px = small.get_pixel(x, y);
            Rgb8::new(px[0], px[1], px[2])
        })
        .collect()
}

/// Scratch size: never upscaled, truncated to whole pixels, at least 1x1.
pub(crate) fn sample_dims(w: u32, h: u32) -> (u32, u32) {
    let scale = (f64::from(SAMPLE_MAX_SIDE) / f64::from(w.max(h))).min(1.0);
    let sw = ((f64::from(w) * scale) as u32).max(1);
    let sh = ((f64::from(h) * scale) as u32).max(1);
    (sw, sh)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/sample.rs"]
mod tests;
