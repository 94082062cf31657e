use std::fmt;
use std::str::FromStr;

use crate::{
    assets::ink::InkId,
    foundation::core::Rng64,
    foundation::error::{RisoError, RisoResult},
    scene::model::{BlendMode, SceneState, Slot},
};

pub(crate) const BOTH_IMAGES_REQUIRED: &str = "Please load both images first!";

/// Canned misregistration amounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MisregistrationPreset {
    Subtle,
    Moderate,
    Extreme,
    Horizontal,
    Vertical,
}

impl MisregistrationPreset {
    pub const ALL: [MisregistrationPreset; 5] = [
        MisregistrationPreset::Subtle,
        MisregistrationPreset::Moderate,
        MisregistrationPreset::Extreme,
        MisregistrationPreset::Horizontal,
        MisregistrationPreset::Vertical,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MisregistrationPreset::Subtle => "subtle",
            MisregistrationPreset::Moderate => "moderate",
            MisregistrationPreset::Extreme => "extreme",
            MisregistrationPreset::Horizontal => "horizontal",
            MisregistrationPreset::Vertical => "vertical",
        }
    }

    /// Jitter range per axis; `None` pins the axis to 0.
    pub fn ranges(self) -> (Option<f64>, Option<f64>) {
        match self {
            MisregistrationPreset::Subtle => (Some(10.0), Some(10.0)),
            MisregistrationPreset::Moderate => (Some(30.0), Some(30.0)),
            MisregistrationPreset::Extreme => (Some(80.0), Some(80.0)),
            MisregistrationPreset::Horizontal => (Some(50.0), None),
            MisregistrationPreset::Vertical => (None, Some(50.0)),
        }
    }

    /// One `(offset_x, offset_y)` draw.
    pub fn sample(self, rng: &mut Rng64) -> (i32, i32) {
        let (rx, ry) = self.ranges();
        let x = rx.map_or(0, |r| jitter(rng, r));
        let y = ry.map_or(0, |r| jitter(rng, r));
        (x, y)
    }
}

impl fmt::Display for MisregistrationPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MisregistrationPreset {
    type Err = RisoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        MisregistrationPreset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| RisoError::validation(format!("unknown misregistration preset '{s}'")))
    }
}

/// `floor((u - 0.5) * range)`, so `range = 80` yields `-40..=39`.
fn jitter(rng: &mut Rng64, range: f64) -> i32 {
    ((rng.next_f64_01() - 0.5) * range).floor() as i32
}

/// Give both layers fresh offsets from `preset`. Nothing changes unless both slots are loaded.
pub(crate) fn apply_misregistration(
    scene: &mut SceneState,
    preset: MisregistrationPreset,
    rng: &mut Rng64,
) -> RisoResult<()> {
    if !scene.both_loaded() {
        return Err(RisoError::precondition(BOTH_IMAGES_REQUIRED));
    }
    for slot in Slot::BOTH {
        let (x, y) = preset.sample(rng);
        let t = &mut scene.layer_mut(slot).params.transform;
        t.offset_x = x;
        t.offset_y = y;
    }
    tracing::debug!(%preset, "misregistration applied");
    Ok(())
}

/// Random ink, small rotation, offset and opacity per layer, multiply blending.
pub(crate) fn surprise(scene: &mut SceneState, rng: &mut Rng64) -> RisoResult<()> {
    if !scene.both_loaded() {
        return Err(RisoError::precondition(BOTH_IMAGES_REQUIRED));
    }
    for slot in Slot::BOTH {
        let ink = InkId::ALL[rng.below(InkId::ALL.len())];
        let params = &mut scene.layer_mut(slot).params;
        params.tint = Some(ink);
        params.transform.rotation = (rng.next_f64_01() - 0.5) * std::f64::consts::PI * 0.2;
        params.transform.offset_x = jitter(rng, 40.0);
        params.transform.offset_y = jitter(rng, 40.0);
        params.opacity = rng.range_f64(0.8, 0.2);
    }
    scene.blend_mode = BlendMode::Multiply;
    tracing::debug!("surprise applied");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/presets.rs"]
mod tests;
