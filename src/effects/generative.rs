//! Decorative full-canvas repaints driven by sampled image colors.

use std::fmt;
use std::str::FromStr;

use vello_cpu::kurbo::Shape;

use crate::{
    effects::composite::{BlendParams, blend_in_place},
    foundation::core::{Canvas, Rgb8, Rng64},
    foundation::error::{RisoError, RisoResult},
    render::{backend::FrameRGBA, cpu::rasterize},
    scene::model::BlendMode,
};

pub(crate) const NO_COLORS: &str = "Please select images first to extract colors!";

const DOT_COUNT: usize = 200;
const LINE_COUNT: usize = 100;
const MIX_STRIPES: u32 = 20;
const MIX_CIRCLES: usize = 30;
const MIX_CIRCLE_ALPHA: f32 = 0.4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerativeEffect {
    /// Random translucent circles on white.
    Dots,
    /// Random translucent strokes on white.
    Lines,
    /// Vertical stripes under large translucent circles.
    ColorMix,
}

impl GenerativeEffect {
    pub const ALL: [GenerativeEffect; 3] = [
        GenerativeEffect::Dots,
        GenerativeEffect::Lines,
        GenerativeEffect::ColorMix,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GenerativeEffect::Dots => "dots",
            GenerativeEffect::Lines => "lines",
            GenerativeEffect::ColorMix => "mix",
        }
    }
}

impl fmt::Display for GenerativeEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GenerativeEffect {
    type Err = RisoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dots" => Ok(GenerativeEffect::Dots),
            "lines" => Ok(GenerativeEffect::Lines),
            "mix" | "color-mix" => Ok(GenerativeEffect::ColorMix),
            other => Err(RisoError::validation(format!("unknown effect '{other}'"))),
        }
    }
}

/// Paint `effect` over a fresh canvas. Fails without touching anything if `palette` is empty.
#[tracing::instrument(skip(palette, rng), fields(colors = palette.len()))]
pub fn draw_effect(
    effect: GenerativeEffect,
    canvas: Canvas,
    palette: &[Rgb8],
    rng: &mut Rng64,
) -> RisoResult<FrameRGBA> {
    match effect {
        GenerativeEffect::Dots => random_dots(canvas, palette, rng),
        GenerativeEffect::Lines => random_lines(canvas, palette, rng),
        GenerativeEffect::ColorMix => color_mix(canvas, palette, rng),
    }
}

fn require_palette(palette: &[Rgb8]) -> RisoResult<()> {
    if palette.is_empty() {
        return Err(RisoError::precondition(NO_COLORS));
    }
    Ok(())
}

fn opaque(c: Rgb8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255)
}

fn pick(palette: &[Rgb8], rng: &mut Rng64) -> Rgb8 {
    palette[rng.below(palette.len())]
}

/// Rasterize one opaque shape and source-over it onto `frame` at `alpha`.
///
/// Coverage comes from `vello_cpu`; the alpha is applied by the integer [`over`](crate::over),
/// which keeps an opaque sheet at exactly 255.
fn stamp(
    frame: &mut FrameRGBA,
    canvas: Canvas,
    ink: Rgb8,
    alpha: f32,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) -> RisoResult<()> {
    let shape = rasterize(canvas, |ctx| {
        ctx.set_paint(opaque(ink));
        draw(ctx);
    })?;
    blend_in_place(
        &mut frame.data,
        &shape,
        BlendParams {
            width: canvas.width,
            height: canvas.height,
            opacity: alpha,
            mode: BlendMode::Normal,
            clip: None,
        },
    )
}

/// 200 circles, radius 10..50, alpha 0.3..1.0, on white.
pub fn random_dots(canvas: Canvas, palette: &[Rgb8], rng: &mut Rng64) -> RisoResult<FrameRGBA> {
    require_palette(palette)?;
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    let mut frame = FrameRGBA::filled(canvas, Rgb8::WHITE);
    for _ in 0..DOT_COUNT {
        let c = pick(palette, rng);
        let x = rng.next_f64_01() * w;
        let y = rng.next_f64_01() * h;
        let r = rng.range_f64(10.0, 40.0);
        let a = rng.range_f64(0.3, 0.7) as f32;
        let circle = vello_cpu::kurbo::Circle::new((x, y), r).to_path(0.1);
        stamp(&mut frame, canvas, c, a, |ctx| ctx.fill_path(&circle))?;
    }
    Ok(frame)
}

/// 100 straight strokes, width 2..10, alpha 0.4..1.0, on white.
pub fn random_lines(canvas: Canvas, palette: &[Rgb8], rng: &mut Rng64) -> RisoResult<FrameRGBA> {
    require_palette(palette)?;
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    let mut frame = FrameRGBA::filled(canvas, Rgb8::WHITE);
    for _ in 0..LINE_COUNT {
        let c = pick(palette, rng);
        let x0 = rng.next_f64_01() * w;
        let y0 = rng.next_f64_01() * h;
        let x1 = rng.next_f64_01() * w;
        let y1 = rng.next_f64_01() * h;
        let width = rng.range_f64(2.0, 8.0);
        let a = rng.range_f64(0.4, 0.6) as f32;
        let mut path = vello_cpu::kurbo::BezPath::new();
        path.move_to((x0, y0));
        path.line_to((x1, y1));
        stamp(&mut frame, canvas, c, a, |ctx| {
            ctx.set_stroke(
                vello_cpu::kurbo::Stroke::new(width).with_caps(vello_cpu::kurbo::Cap::Butt),
            );
            ctx.stroke_path(&path);
        })?;
    }
    Ok(frame)
}

/// 20 full-height stripes, then 30 circles of radius 50..150 at alpha 0.4, on a cleared sheet.
pub fn color_mix(canvas: Canvas, palette: &[Rgb8], rng: &mut Rng64) -> RisoResult<FrameRGBA> {
    require_palette(palette)?;
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    let stripe = w / f64::from(MIX_STRIPES);
    let stripes = rasterize(canvas, |ctx| {
        for i in 0..MIX_STRIPES {
            let c = pick(palette, rng);
            let x = f64::from(i) * stripe;
            ctx.set_paint(opaque(c));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(x, 0.0, x + stripe, h));
        }
    })?;
    let mut frame = FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data: stripes,
        premultiplied: true,
    };
    for _ in 0..MIX_CIRCLES {
        let c = pick(palette, rng);
        let x = rng.next_f64_01() * w;
        let y = rng.next_f64_01() * h;
        let r = rng.range_f64(50.0, 100.0);
        let circle = vello_cpu::kurbo::Circle::new((x, y), r).to_path(0.1);
        stamp(&mut frame, canvas, c, MIX_CIRCLE_ALPHA, |ctx| {
            ctx.fill_path(&circle)
        })?;
    }
    Ok(frame)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/generative.rs"]
mod tests;
