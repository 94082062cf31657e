//! Risomix composites two images the way a two-drum risograph prints them.
//!
//! Each image is a print pass: it can be tinted to a single ink, rotated, scaled, dragged and
//! knocked out of register. Pass two is overprinted with a blend mode on a textured paper sheet,
//! and the result can be exported as PNG.
//!
//! - Build a [`Session`] (or load a [`SceneFile`])
//! - Feed it images and [`Command`]s
//! - Call [`Session::render`] whenever the host wants pixels
#![forbid(unsafe_code)]

mod assets;
mod effects;
mod export;
mod foundation;
mod render;
mod scene;

pub use crate::foundation::core::{Affine, Canvas, Point, Rect, Rgb8, Rng64, Vec2};
pub use crate::foundation::error::{RisoError, RisoResult};

pub use crate::assets::decode::{LayerImage, Upload, decode_image, decode_image_with_hint};
pub use crate::assets::ink::{Ink, InkId, palette};
pub use crate::assets::sample::{SAMPLE_COUNT, SAMPLE_MAX_SIDE, extract_colors};

pub use crate::effects::composite::{
    BlendParams, ColumnSpan, PremulRgba8, blend, blend_in_place, over,
};
pub use crate::effects::generative::{
    GenerativeEffect, color_mix, draw_effect, random_dots, random_lines,
};
pub use crate::effects::grain::{GRAIN_DOT_ALPHA, GRAIN_TILE, GrainTile, grain_alpha};
pub use crate::effects::tint::{apply_tint, hue_rotate, tint_with};

pub use crate::render::backend::{FrameRGBA, RenderSettings};
pub use crate::render::compositor::Compositor;

pub use crate::export::png::{EXPORT_FILE_NAME, encode_png, save_png, to_straight_rgba};

pub use crate::scene::drag::{CursorHint, DragState};
pub use crate::scene::file::{LayerEntry, SceneFile};
pub use crate::scene::geometry::{
    FIT_FRACTION, fit_scale, fitted_size, hit_box, hit_test, layer_affine,
};
pub use crate::scene::model::{
    BlendMode, ImageLayer, LayerParams, LayerTransform, Layers, SceneState, Slot,
};
pub use crate::scene::presets::MisregistrationPreset;
pub use crate::scene::session::{
    Command, LoadOutcome, LoadTicket, Outcome, ROTATION_STEP, RotateDir, SEED_ENV, Session,
    SessionOpts, resolve_seed,
};
