use crate::foundation::error::{RisoError, RisoResult};
use crate::foundation::math::{alpha_to_u8, mul_div255_u8};
use crate::scene::model::BlendMode;

pub type PremulRgba8 = [u8; 4];

/// Source-over with a global opacity.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = u16::from(alpha_to_u8(opacity));
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Composite `src` onto `dst` with `mode`, W3C compositing semantics.
///
/// Both pixels are premultiplied. `Normal` is exactly [`over`].
pub fn blend(dst: PremulRgba8, src: PremulRgba8, opacity: f32, mode: BlendMode) -> PremulRgba8 {
    if mode == BlendMode::Normal {
        return over(dst, src, opacity);
    }
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = f32::from(alpha_to_u8(opacity)) / 255.0;
    let src_a = f32::from(src[3]) / 255.0;
    let a_s = src_a * op;
    let a_b = f32::from(dst[3]) / 255.0;

    let cs = unpremul(src, src_a);
    let cb = unpremul(dst, a_b);
    let mixed = blend_color(cb, cs, mode);

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c_s = (1.0 - a_b) * cs[i] + a_b * mixed[i];
        let dst_c = f32::from(dst[i]) / 255.0;
        out[i] = to_u8(a_s * c_s + dst_c * (1.0 - a_s));
    }
    out[3] = to_u8(a_s + a_b * (1.0 - a_s));
    out
}

fn unpremul(px: PremulRgba8, a: f32) -> [f32; 3] {
    if a <= 0.0 {
        return [0.0; 3];
    }
    let f = |c: u8| (f32::from(c) / 255.0 / a).min(1.0);
    [f(px[0]), f(px[1]), f(px[2])]
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// `B(cb, cs)` on straight colors in `[0, 1]`.
fn blend_color(cb: [f32; 3], cs: [f32; 3], mode: BlendMode) -> [f32; 3] {
    match mode {
        BlendMode::Hue => set_lum(set_sat(cs, sat(cb)), lum(cb)),
        BlendMode::Saturation => set_lum(set_sat(cb, sat(cs)), lum(cb)),
        BlendMode::Color => set_lum(cs, lum(cb)),
        BlendMode::Luminosity => set_lum(cb, lum(cs)),
        _ => [
            blend_channel(cb[0], cs[0], mode),
            blend_channel(cb[1], cs[1], mode),
            blend_channel(cb[2], cs[2], mode),
        ],
    }
}

fn blend_channel(cb: f32, cs: f32, mode: BlendMode) -> f32 {
    match mode {
        BlendMode::Multiply => cb * cs,
        BlendMode::Screen => screen(cb, cs),
        BlendMode::Overlay => hard_light(cs, cb),
        BlendMode::Darken => cb.min(cs),
        BlendMode::Lighten => cb.max(cs),
        BlendMode::ColorDodge => {
            if cb <= 0.0 {
                0.0
            } else if cs >= 1.0 {
                1.0
            } else {
                (cb / (1.0 - cs)).min(1.0)
            }
        }
        BlendMode::ColorBurn => {
            if cb >= 1.0 {
                1.0
            } else if cs <= 0.0 {
                0.0
            } else {
                1.0 - ((1.0 - cb) / cs).min(1.0)
            }
        }
        BlendMode::HardLight => hard_light(cb, cs),
        BlendMode::SoftLight => {
            if cs <= 0.5 {
                cb - (1.0 - 2.0 * cs) * cb * (1.0 - cb)
            } else {
                let d = if cb <= 0.25 {
                    ((16.0 * cb - 12.0) * cb + 4.0) * cb
                } else {
                    cb.sqrt()
                };
                cb + (2.0 * cs - 1.0) * (d - cb)
            }
        }
        BlendMode::Difference => (cb - cs).abs(),
        BlendMode::Exclusion => cb + cs - 2.0 * cb * cs,
        BlendMode::Normal
        | BlendMode::Hue
        | BlendMode::Saturation
        | BlendMode::Color
        | BlendMode::Luminosity => cs,
    }
}

fn screen(cb: f32, cs: f32) -> f32 {
    cb + cs - cb * cs
}

fn hard_light(cb: f32, cs: f32) -> f32 {
    if cs <= 0.5 {
        cb * 2.0 * cs
    } else {
        screen(cb, 2.0 * cs - 1.0)
    }
}

fn lum(c: [f32; 3]) -> f32 {
    0.3 * c[0] + 0.59 * c[1] + 0.11 * c[2]
}

fn clip_color(c: [f32; 3]) -> [f32; 3] {
    let l = lum(c);
    let n = c[0].min(c[1]).min(c[2]);
    let x = c[0].max(c[1]).max(c[2]);
    let mut out = c;
    if n < 0.0 && l - n > f32::EPSILON {
        out = out.map(|v| l + (v - l) * l / (l - n));
    }
    if x > 1.0 && x - l > f32::EPSILON {
        out = out.map(|v| l + (v - l) * (1.0 - l) / (x - l));
    }
    out
}

fn set_lum(c: [f32; 3], l: f32) -> [f32; 3] {
    let d = l - lum(c);
    clip_color(c.map(|v| v + d))
}

fn sat(c: [f32; 3]) -> f32 {
    c[0].max(c[1]).max(c[2]) - c[0].min(c[1]).min(c[2])
}

fn set_sat(c: [f32; 3], s: f32) -> [f32; 3] {
    let mut idx = [0usize, 1, 2];
    idx.sort_by(|&a, &b| c[a].total_cmp(&c[b]));
    let [min, mid, max] = idx;
    let mut out = [0.0f32; 3];
    if c[max] > c[min] {
        out[mid] = (c[mid] - c[min]) * s / (c[max] - c[min]);
        out[max] = s;
    }
    out
}

/// Half-open column range `start..end`, spanning every row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSpan {
    pub start: u32,
    pub end: u32,
}

impl ColumnSpan {
    pub fn full(width: u32) -> Self {
        Self {
            start: 0,
            end: width,
        }
    }

    pub fn len(self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    pub fn contains(self, x: u32) -> bool {
        x >= self.start && x < self.end
    }
}

#[derive(Clone, Copy, Debug)]
pub struct BlendParams {
    pub width: u32,
    pub height: u32,
    pub opacity: f32,
    pub mode: BlendMode,
    /// Restrict writes to these columns; `None` covers the whole frame.
    pub clip: Option<ColumnSpan>,
}

pub(crate) fn expected_len(width: u32, height: u32) -> RisoResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| RisoError::render("rgba buffer size overflow"))
}

/// Blend a full-frame `src` layer into `dst`.
pub fn blend_in_place(dst: &mut [u8], src: &[u8], params: BlendParams) -> RisoResult<()> {
    let len = expected_len(params.width, params.height)?;
    if dst.len() != len || src.len() != len {
        return Err(RisoError::render(
            "blend_in_place expects buffers matching width*height*4",
        ));
    }
    let span = params
        .clip
        .unwrap_or(ColumnSpan::full(params.width));
    let end = span.end.min(params.width);
    if span.start >= end {
        return Ok(());
    }

    let row = params.width as usize * 4;
    for y in 0..params.height as usize {
        let lo = y * row + span.start as usize * 4;
        let hi = y * row + end as usize * 4;
        for (d, s) in dst[lo..hi]
            .chunks_exact_mut(4)
            .zip(src[lo..hi].chunks_exact(4))
        {
            if s[3] == 0 {
                continue;
            }
            let out = blend(
                [d[0], d[1], d[2], d[3]],
                [s[0], s[1], s[2], s[3]],
                params.opacity,
                params.mode,
            );
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

/// Source-over of a `sw x sh` patch placed at `(x, y)`; out-of-frame parts are dropped.
pub fn over_patch_in_place(
    dst: &mut [u8],
    dst_size: (u32, u32),
    patch: &[u8],
    patch_size: (u32, u32),
    at: (u32, u32),
) -> RisoResult<()> {
    let (dw, dh) = dst_size;
    let (sw, sh) = patch_size;
    if dst.len() != expected_len(dw, dh)? || patch.len() != expected_len(sw, sh)? {
        return Err(RisoError::render(
            "over_patch_in_place expects buffers matching their sizes",
        ));
    }
    let cols = sw.min(dw.saturating_sub(at.0)) as usize;
    let rows = sh.min(dh.saturating_sub(at.1)) as usize;
    if cols == 0 || rows == 0 {
        return Ok(());
    }
    for r in 0..rows {
        let d0 = ((at.1 as usize + r) * dw as usize + at.0 as usize) * 4;
        let s0 = r * sw as usize * 4;
        for (d, s) in dst[d0..d0 + cols * 4]
            .chunks_exact_mut(4)
            .zip(patch[s0..s0 + cols * 4].chunks_exact(4))
        {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], 1.0);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

/// Fill columns `span` with an opaque color.
pub fn fill_columns(
    dst: &mut [u8],
    width: u32,
    height: u32,
    span: ColumnSpan,
    px: PremulRgba8,
) -> RisoResult<()> {
    if dst.len() != expected_len(width, height)? {
        return Err(RisoError::render("fill_columns expects width*height*4 bytes"));
    }
    let end = span.end.min(width) as usize;
    let start = span.start as usize;
    if start >= end {
        return Ok(());
    }
    let row = width as usize * 4;
    for y in 0..height as usize {
        for d in dst[y * row + start * 4..y * row + end * 4].chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    mul_div255_u8(x, y)
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
