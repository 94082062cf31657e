//! `vello_cpu` plumbing: pixmaps in, premultiplied RGBA8 out.

use std::sync::Arc;

use crate::foundation::core::{Affine, Canvas};
use crate::foundation::error::{RisoError, RisoResult};
use crate::foundation::math::premultiply_rgba8_in_place;

pub(crate) fn surface_dims(canvas: Canvas) -> RisoResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| RisoError::render("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| RisoError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> RisoResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| RisoError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| RisoError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(RisoError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    let opaque = bytes.chunks_exact(4).all(|px| px[3] == 255);
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, !opaque,
    ))
}

/// Premultiply straight RGBA8 and wrap it as a pixmap.
pub(crate) fn straight_rgba_to_pixmap(
    bytes_rgba: &[u8],
    width: u32,
    height: u32,
) -> RisoResult<vello_cpu::Pixmap> {
    let mut tmp = bytes_rgba.to_vec();
    premultiply_rgba8_in_place(&mut tmp);
    pixmap_from_premul_bytes(&tmp, width, height)
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

/// Run `draw` against a fresh transparent canvas-sized context and read the pixels back.
pub(crate) fn rasterize(
    canvas: Canvas,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) -> RisoResult<Vec<u8>> {
    let (w, h) = surface_dims(canvas)?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    draw(&mut ctx);
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap.data_as_u8_slice().to_vec())
}

/// Draw a `pw x ph` pixmap through `transform` (pixmap space to canvas space).
pub(crate) fn draw_pixmap(
    canvas: Canvas,
    pixmap: Arc<vello_cpu::Pixmap>,
    transform: Affine,
) -> RisoResult<Vec<u8>> {
    let pw = f64::from(pixmap.width());
    let ph = f64::from(pixmap.height());
    rasterize(canvas, |ctx| {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(pixmap),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, pw, ph));
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
