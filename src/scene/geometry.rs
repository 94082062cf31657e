//! Fit scale, layer placement and hit testing.
//!
//! A layer of `iw x ih` pixels is fitted into the canvas at 80% of the largest uniform scale,
//! then placed at `canvas center + translate + offset`, rotated, and scaled by the user scale.

use crate::{
    foundation::core::{Affine, Canvas, Point, Rect, Vec2},
    scene::model::{ImageLayer, LayerTransform, Layers, Slot},
};

/// Share of the canvas a fitted image occupies along its limiting axis.
pub const FIT_FRACTION: f64 = 0.8;

/// Uniform scale that fits `iw x ih` into the canvas, times [`FIT_FRACTION`].
pub fn fit_scale(canvas: Canvas, iw: u32, ih: u32) -> f64 {
    let sx = f64::from(canvas.width) / f64::from(iw.max(1));
    let sy = f64::from(canvas.height) / f64::from(ih.max(1));
    sx.min(sy) * FIT_FRACTION
}

/// Fitted size before the user scale.
pub fn fitted_size(canvas: Canvas, iw: u32, ih: u32) -> (f64, f64) {
    let base = fit_scale(canvas, iw, ih);
    (f64::from(iw) * base, f64::from(ih) * base)
}

/// Where the layer's center lands when drawn (includes the misregistration offset).
pub fn draw_center(canvas: Canvas, t: &LayerTransform) -> Point {
    canvas.center() + t.translate + t.offset()
}

/// Maps fitted-image space `(0,0)..(w,h)` to canvas space.
///
/// `T(center) * R(rotation) * S(scale) * T(-w/2, -h/2)`
pub fn placement(canvas: Canvas, fitted: (f64, f64), t: &LayerTransform, shift: Vec2) -> Affine {
    let center = draw_center(canvas, t) + shift;
    Affine::translate(center.to_vec2())
        * Affine::rotate(t.rotation)
        * Affine::scale(t.scale)
        * Affine::translate((-fitted.0 / 2.0, -fitted.1 / 2.0))
}

/// Maps source pixels to canvas space.
pub fn layer_affine(canvas: Canvas, iw: u32, ih: u32, t: &LayerTransform) -> Affine {
    let base = fit_scale(canvas, iw, ih);
    placement(canvas, fitted_size(canvas, iw, ih), t, Vec2::ZERO) * Affine::scale(base)
}

/// Axis-aligned pick box.
///
/// Rotation and the misregistration offset are ignored; the box is centered on
/// `canvas center + translate`.
pub fn hit_box(canvas: Canvas, iw: u32, ih: u32, t: &LayerTransform) -> Rect {
    let (w, h) = fitted_size(canvas, iw, ih);
    let (w, h) = (w * t.scale, h * t.scale);
    let c = canvas.center() + t.translate;
    Rect::new(c.x - w / 2.0, c.y - h / 2.0, c.x + w / 2.0, c.y + h / 2.0)
}

fn contains_inclusive(r: Rect, p: Point) -> bool {
    p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
}

/// Topmost loaded layer under `p`. Slot 2 is drawn last so it is tested first.
pub fn hit_test(canvas: Canvas, layers: &Layers<ImageLayer>, p: Point) -> Option<Slot> {
    [Slot::Second, Slot::First].into_iter().find(|&slot| {
        let layer = &layers[slot];
        layer.image().is_some_and(|img| {
            contains_inclusive(
                hit_box(canvas, img.width(), img.height(), &layer.params.transform),
                p,
            )
        })
    })
}

#[cfg(test)]
#[path = "../../tests/unit/scene/geometry.rs"]
mod tests;
