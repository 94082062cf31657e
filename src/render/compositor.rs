use std::sync::Arc;

use crate::{
    assets::decode::LayerImage,
    effects::{
        composite::{BlendParams, ColumnSpan, blend_in_place, fill_columns, over_patch_in_place},
        grain::{GrainTile, grain_alpha},
        tint::{apply_tint, hue_rotate},
    },
    foundation::core::{Affine, Canvas, Rng64, Vec2},
    foundation::error::RisoResult,
    render::{
        backend::{FrameRGBA, RenderSettings},
        cpu::{draw_pixmap, straight_rgba_to_pixmap},
        label::Captions,
    },
    scene::{
        geometry::{fit_scale, fitted_size, placement},
        model::{BlendMode, ImageLayer, LayerParams, SceneState, Slot},
    },
};

/// Renders a [`SceneState`] into a [`FrameRGBA`].
///
/// Holds the per-session grain tile and caption fonts so repeated renders of the same scene are
/// identical.
#[derive(Debug)]
pub struct Compositor {
    settings: RenderSettings,
    grain: GrainTile,
    captions: Option<Captions>,
}

/// Extra placement applied on top of a layer's own transform.
#[derive(Clone, Copy, Debug)]
struct Adjust {
    shift: Vec2,
    scale: f64,
}

impl Adjust {
    const NONE: Self = Self {
        shift: Vec2::ZERO,
        scale: 1.0,
    };
}

impl Compositor {
    pub fn new(settings: RenderSettings, rng: &mut Rng64) -> Self {
        let grain = GrainTile::generate(rng);
        let captions = settings.labels.then(Captions::new);
        Self {
            settings,
            grain,
            captions,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn grain(&self) -> &GrainTile {
        &self.grain
    }

    /// Render the scene, honoring `separation_mode`.
    #[tracing::instrument(
        skip_all,
        fields(w = canvas.width, h = canvas.height, separated = scene.separation_mode)
    )]
    pub fn render(&self, scene: &SceneState, canvas: Canvas) -> RisoResult<FrameRGBA> {
        canvas.validate()?;
        scene.validate()?;
        if scene.separation_mode {
            self.render_separated(scene, canvas)
        } else {
            self.render_combined(scene, canvas)
        }
    }

    /// Both layers overprinted on one sheet. Slot 2 uses the scene's blend mode.
    pub fn render_combined(&self, scene: &SceneState, canvas: Canvas) -> RisoResult<FrameRGBA> {
        let s = &self.settings;
        let size = (canvas.width, canvas.height);
        let mut frame = if scene.paper_texture {
            let mut f = FrameRGBA::filled(canvas, s.paper_rgb);
            self.grain
                .overlay(&mut f.data, size, s.paper_alpha, BlendMode::Normal, None)?;
            f
        } else {
            FrameRGBA::filled(canvas, s.background_rgb)
        };

        for slot in Slot::BOTH {
            let mode = match slot {
                Slot::First => BlendMode::Normal,
                Slot::Second => scene.blend_mode,
            };
            self.print_pass(&mut frame, canvas, scene, slot, mode, Adjust::NONE, None)?;
        }
        tracing::debug!(blend = %scene.blend_mode, "combined frame rendered");
        Ok(frame)
    }

    /// Each layer alone in its own half at half scale, with captions and a divider.
    pub fn render_separated(&self, scene: &SceneState, canvas: Canvas) -> RisoResult<FrameRGBA> {
        let s = &self.settings;
        let mut frame = FrameRGBA::filled(canvas, s.background_rgb);
        let half = canvas.width / 2;
        let quarter = f64::from(canvas.width) / 4.0;

        for slot in Slot::BOTH {
            let layer = scene.layer(slot);
            if !layer.is_loaded() {
                continue;
            }
            let (span, shift) = match slot {
                Slot::First => (ColumnSpan { start: 0, end: half }, -quarter),
                Slot::Second => (
                    ColumnSpan {
                        start: half,
                        end: canvas.width,
                    },
                    quarter,
                ),
            };

            if scene.paper_texture {
                fill_columns(
                    &mut frame.data,
                    canvas.width,
                    canvas.height,
                    span,
                    s.paper_rgb.to_premul_rgba8(),
                )?;
                self.grain.overlay(
                    &mut frame.data,
                    (canvas.width, canvas.height),
                    s.paper_alpha,
                    BlendMode::Normal,
                    Some(span),
                )?;
            }

            let adjust = Adjust {
                shift: Vec2::new(shift, 0.0),
                scale: 0.5,
            };
            self.print_pass(
                &mut frame,
                canvas,
                scene,
                slot,
                BlendMode::Normal,
                adjust,
                Some(span),
            )?;
            self.draw_captions(&mut frame, layer, slot, span)?;
        }

        let w = s.divider_width.min(canvas.width);
        let start = half.saturating_sub(w / 2);
        fill_columns(
            &mut frame.data,
            canvas.width,
            canvas.height,
            ColumnSpan {
                start,
                end: (start + w).min(canvas.width),
            },
            s.divider_rgb.to_premul_rgba8(),
        )?;
        tracing::debug!("separated frame rendered");
        Ok(frame)
    }

    /// Draw one layer and its grain into `frame` with `mode`.
    #[allow(clippy::too_many_arguments)]
    fn print_pass(
        &self,
        frame: &mut FrameRGBA,
        canvas: Canvas,
        scene: &SceneState,
        slot: Slot,
        mode: BlendMode,
        adjust: Adjust,
        clip: Option<ColumnSpan>,
    ) -> RisoResult<()> {
        let layer = scene.layer(slot);
        let Some(image) = layer.image() else {
            return Ok(());
        };
        let opacity = layer.params.opacity;
        let pixels = draw_layer(canvas, image, &layer.params, adjust)?;
        blend_in_place(
            &mut frame.data,
            &pixels,
            BlendParams {
                width: canvas.width,
                height: canvas.height,
                opacity: opacity as f32,
                mode,
                clip,
            },
        )?;
        let alpha = grain_alpha(scene.grain_intensity, opacity);
        if alpha > 0.0 {
            self.grain
                .overlay(&mut frame.data, (canvas.width, canvas.height), alpha, mode, clip)?;
        }
        Ok(())
    }

    fn draw_captions(
        &self,
        frame: &mut FrameRGBA,
        layer: &ImageLayer,
        slot: Slot,
        span: ColumnSpan,
    ) -> RisoResult<()> {
        let Some(captions) = &self.captions else {
            return Ok(());
        };
        if span.is_empty() {
            return Ok(());
        }
        let title = format!("Layer {}", slot.number());
        let mut lines = vec![title.as_str()];
        if let Some(ink) = layer.params.tint {
            lines.push(ink.name());
        }
        let band = captions.band(&lines, span.len(), self.settings.label_rgb)?;
        let size = frame.size();
        over_patch_in_place(
            &mut frame.data,
            size,
            &band,
            (span.len(), crate::render::label::CAPTION_BAND_HEIGHT),
            (span.start, 0),
        )
    }
}

/// Rasterize one layer (tint or hue applied) into a transparent canvas-sized buffer.
fn draw_layer(
    canvas: Canvas,
    image: &LayerImage,
    params: &LayerParams,
    adjust: Adjust,
) -> RisoResult<Vec<u8>> {
    let (iw, ih) = (image.width(), image.height());
    let fitted = fitted_size(canvas, iw, ih);
    let mut t = params.transform;
    t.scale *= adjust.scale;
    let place = placement(canvas, fitted, &t, adjust.shift);

    match params.tint {
        Some(ink) => {
            // Tinting happens at the fitted size, truncated to whole pixels.
            let sw = (fitted.0 as u32).max(1);
            let sh = (fitted.1 as u32).max(1);
            let scratch = image::imageops::resize(
                image.rgba(),
                sw,
                sh,
                image::imageops::FilterType::Triangle,
            );
            let tinted = apply_tint(&scratch, ink);
            let pixmap = straight_rgba_to_pixmap(tinted.as_raw(), sw, sh)?;
            let to_fitted =
                Affine::scale_non_uniform(fitted.0 / f64::from(sw), fitted.1 / f64::from(sh));
            draw_pixmap(canvas, Arc::new(pixmap), place * to_fitted)
        }
        None => {
            let base = Affine::scale(fit_scale(canvas, iw, ih));
            if params.hue != 0.0 {
                let rotated = hue_rotate(image.rgba(), params.hue);
                let pixmap = straight_rgba_to_pixmap(rotated.as_raw(), iw, ih)?;
                draw_pixmap(canvas, Arc::new(pixmap), place * base)
            } else {
                draw_pixmap(canvas, image.pixmap().clone(), place * base)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
