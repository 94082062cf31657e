use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::{
    assets::{decode::LayerImage, ink::InkId},
    foundation::core::{Rgb8, Vec2},
    foundation::error::{RisoError, RisoResult},
};

/// One of the two print passes. Slot 1 is the base, slot 2 overprints it.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    /// Both slots in draw order.
    pub const BOTH: [Slot; 2] = [Slot::First, Slot::Second];

    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }

    /// 1-based number as shown to users ("Layer 1").
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Slot::First),
            2 => Some(Slot::Second),
            _ => None,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer {}", self.number())
    }
}

/// Exactly two values, one per [`Slot`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layers<T>([T; 2]);

impl<T> Layers<T> {
    pub fn new(first: T, second: T) -> Self {
        Self([first, second])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, &T)> {
        Slot::BOTH.into_iter().zip(self.0.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Slot, &mut T)> {
        Slot::BOTH.into_iter().zip(self.0.iter_mut())
    }
}

impl<T> Index<Slot> for Layers<T> {
    type Output = T;

    fn index(&self, slot: Slot) -> &T {
        &self.0[slot.index()]
    }
}

impl<T> IndexMut<Slot> for Layers<T> {
    fn index_mut(&mut self, slot: Slot) -> &mut T {
        &mut self.0[slot.index()]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayerTransform {
    /// Drag displacement from the canvas center.
    pub translate: Vec2,
    pub rotation: f64, // radians
    pub scale: f64,    // > 0
    /// Misregistration displacement in whole pixels.
    pub offset_x: i32,
    pub offset_y: i32,
}

impl Default for LayerTransform {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            rotation: 0.0,
            scale: 1.0,
            offset_x: 0,
            offset_y: 0,
        }
    }
}

impl LayerTransform {
    pub fn offset(&self) -> Vec2 {
        Vec2::new(f64::from(self.offset_x), f64::from(self.offset_y))
    }

    pub fn validate(&self) -> RisoResult<()> {
        if !self.translate.x.is_finite() || !self.translate.y.is_finite() {
            return Err(RisoError::validation("translate must be finite"));
        }
        if !self.rotation.is_finite() {
            return Err(RisoError::validation("rotation must be finite"));
        }
        validate_scale(self.scale)
    }
}

fn validate_scale(scale: f64) -> RisoResult<()> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(RisoError::validation(format!(
            "scale must be finite and > 0 (got {scale})"
        )));
    }
    Ok(())
}

/// Per-layer parameters edited by the user.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayerParams {
    pub transform: LayerTransform,
    /// Ink used for the duotone pass; `None` draws the raw image (with `hue`).
    pub tint: Option<InkId>,
    /// Hue rotation in degrees, only applied when `tint` is `None`.
    pub hue: f64,
    pub opacity: f64, // 0..=1
}

impl Default for LayerParams {
    fn default() -> Self {
        Self {
            transform: LayerTransform::default(),
            tint: None,
            hue: 0.0,
            opacity: 1.0,
        }
    }
}

impl LayerParams {
    pub fn validate(&self) -> RisoResult<()> {
        self.transform.validate()?;
        if !self.hue.is_finite() {
            return Err(RisoError::validation("hue must be finite"));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(RisoError::validation(format!(
                "opacity must be in [0,1] (got {})",
                self.opacity
            )));
        }
        Ok(())
    }
}

/// A slot's content: the decoded bitmap, its sampled colors, and its parameters.
///
/// The bitmap and the sampled colors are only ever replaced together.
#[derive(Clone, Debug, Default)]
pub struct ImageLayer {
    image: Option<LayerImage>,
    sampled_colors: Vec<Rgb8>,
    pub params: LayerParams,
}

impl ImageLayer {
    pub fn image(&self) -> Option<&LayerImage> {
        self.image.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }

    pub fn sampled_colors(&self) -> &[Rgb8] {
        &self.sampled_colors
    }

    /// Replace the bitmap and its colors, resetting geometry and hue.
    ///
    /// Tint and opacity are pass settings and survive a reload.
    pub(crate) fn replace_image(&mut self, image: LayerImage, mut colors: Vec<Rgb8>) {
        colors.truncate(crate::assets::sample::SAMPLE_COUNT);
        self.image = Some(image);
        self.sampled_colors = colors;
        self.params.transform = LayerTransform::default();
        self.params.hue = 0.0;
    }

    /// Drop the bitmap, its colors and every parameter.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Compositing operator used for the second pass.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    /// Plain source-over.
    #[default]
    #[serde(alias = "source-over")]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    pub const ALL: [BlendMode; 16] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Difference,
        BlendMode::Exclusion,
        BlendMode::Hue,
        BlendMode::Saturation,
        BlendMode::Color,
        BlendMode::Luminosity,
    ];

    /// CSS / canvas operator name.
    pub fn css_name(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
            BlendMode::ColorDodge => "color-dodge",
            BlendMode::ColorBurn => "color-burn",
            BlendMode::HardLight => "hard-light",
            BlendMode::SoftLight => "soft-light",
            BlendMode::Difference => "difference",
            BlendMode::Exclusion => "exclusion",
            BlendMode::Hue => "hue",
            BlendMode::Saturation => "saturation",
            BlendMode::Color => "color",
            BlendMode::Luminosity => "luminosity",
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

impl FromStr for BlendMode {
    type Err = RisoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s == "source-over" {
            return Ok(BlendMode::Normal);
        }
        BlendMode::ALL
            .into_iter()
            .find(|m| m.css_name() == s)
            .ok_or_else(|| RisoError::validation(format!("unknown blend mode '{s}'")))
    }
}

/// Everything the compositor reads.
#[derive(Clone, Debug)]
pub struct SceneState {
    pub layers: Layers<ImageLayer>,
    pub blend_mode: BlendMode,
    pub grain_intensity: f64, // >= 0
    pub paper_texture: bool,
    pub separation_mode: bool,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            layers: Layers::default(),
            blend_mode: BlendMode::Multiply,
            grain_intensity: 0.15,
            paper_texture: true,
            separation_mode: false,
        }
    }
}

impl SceneState {
    pub fn validate(&self) -> RisoResult<()> {
        if !self.grain_intensity.is_finite() || self.grain_intensity < 0.0 {
            return Err(RisoError::validation(
                "grain intensity must be finite and >= 0",
            ));
        }
        for (slot, layer) in self.layers.iter() {
            layer
                .params
                .validate()
                .map_err(|e| RisoError::validation(format!("{slot}: {e}")))?;
        }
        Ok(())
    }

    pub fn layer(&self, slot: Slot) -> &ImageLayer {
        &self.layers[slot]
    }

    pub fn layer_mut(&mut self, slot: Slot) -> &mut ImageLayer {
        &mut self.layers[slot]
    }

    pub fn both_loaded(&self) -> bool {
        self.layers.iter().all(|(_, l)| l.is_loaded())
    }

    pub fn any_loaded(&self) -> bool {
        self.layers.iter().any(|(_, l)| l.is_loaded())
    }

    /// Union of both layers' sampled colors (slot 1 first).
    pub fn combined_palette(&self) -> Vec<Rgb8> {
        self.layers
            .iter()
            .flat_map(|(_, l)| l.sampled_colors().iter().copied())
            .collect()
    }

    /// Set opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, slot: Slot, value: f64) -> RisoResult<()> {
        if !value.is_finite() {
            return Err(RisoError::validation("opacity must be finite"));
        }
        self.layers[slot].params.opacity = value.clamp(0.0, 1.0);
        Ok(())
    }

    pub fn set_scale(&mut self, slot: Slot, value: f64) -> RisoResult<()> {
        validate_scale(value)?;
        self.layers[slot].params.transform.scale = value;
        Ok(())
    }

    pub fn set_grain(&mut self, value: f64) -> RisoResult<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(RisoError::validation(format!(
                "grain intensity must be finite and >= 0 (got {value})"
            )));
        }
        self.grain_intensity = value;
        Ok(())
    }

    pub fn set_hue(&mut self, slot: Slot, degrees: f64) -> RisoResult<()> {
        if !degrees.is_finite() {
            return Err(RisoError::validation("hue must be finite"));
        }
        self.layers[slot].params.hue = degrees;
        Ok(())
    }

    /// Replace a layer's parameters wholesale (validated first).
    pub fn set_params(&mut self, slot: Slot, params: LayerParams) -> RisoResult<()> {
        params.validate()?;
        self.layers[slot].params = params;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
