//! JSON scene description used by the CLI and tests.
//!
//! ```json
//! {
//!   "canvas": { "width": 800, "height": 600 },
//!   "seed": 7,
//!   "first":  { "image": "a.png", "params": { "tint": "teal", "opacity": 0.9 } },
//!   "second": { "image": "b.png", "params": { "transform": { "offset_x": 4 } } },
//!   "blend_mode": "multiply",
//!   "grain_intensity": 0.15,
//!   "paper_texture": true
//! }
//! ```
//!
//! Image paths are resolved relative to the scene file's directory.

use std::path::Path;

use anyhow::Context;

use crate::{
    assets::decode::Upload,
    foundation::core::Canvas,
    foundation::error::{RisoError, RisoResult},
    render::backend::RenderSettings,
    scene::{
        model::{BlendMode, LayerParams, Slot},
        session::{LoadOutcome, Session, SessionOpts},
    },
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerEntry {
    pub image: String,
    #[serde(default)]
    pub params: LayerParams,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
    pub canvas: Canvas,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub first: Option<LayerEntry>,
    #[serde(default)]
    pub second: Option<LayerEntry>,
    #[serde(default = "default_blend")]
    pub blend_mode: BlendMode,
    #[serde(default = "default_grain")]
    pub grain_intensity: f64,
    #[serde(default = "default_paper")]
    pub paper_texture: bool,
    #[serde(default)]
    pub render: RenderSettings,
}

fn default_blend() -> BlendMode {
    BlendMode::Multiply
}

fn default_grain() -> f64 {
    0.15
}

fn default_paper() -> bool {
    true
}

impl SceneFile {
    pub fn from_json(json: &str) -> RisoResult<Self> {
        let file: SceneFile =
            serde_json::from_str(json).map_err(|e| RisoError::serde(e.to_string()))?;
        file.validate()?;
        Ok(file)
    }

    pub fn load(path: &Path) -> RisoResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read scene '{}'", path.display()))?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> RisoResult<()> {
        self.canvas.validate()?;
        if !self.grain_intensity.is_finite() || self.grain_intensity < 0.0 {
            return Err(RisoError::validation(
                "grain_intensity must be finite and >= 0",
            ));
        }
        for (slot, entry) in self.entries() {
            if entry.image.trim().is_empty() {
                return Err(RisoError::validation(format!("{slot}: image path is empty")));
            }
            entry
                .params
                .validate()
                .map_err(|e| RisoError::validation(format!("{slot}: {e}")))?;
        }
        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = (Slot, &LayerEntry)> {
        [(Slot::First, &self.first), (Slot::Second, &self.second)]
            .into_iter()
            .filter_map(|(slot, e)| e.as_ref().map(|e| (slot, e)))
    }

    /// Build a session, loading every image relative to `root`.
    ///
    /// `seed` overrides the file's seed.
    #[tracing::instrument(skip(self), fields(root = %root.display()))]
    pub fn into_session(
        self,
        root: &Path,
        seed: Option<u64>,
        render: Option<RenderSettings>,
    ) -> RisoResult<Session> {
        let mut session = Session::new(SessionOpts {
            canvas: self.canvas,
            seed: seed.or(self.seed),
            render: render.unwrap_or_else(|| self.render.clone()),
        })?;

        for (slot, entry) in self.entries() {
            let path = root.join(&entry.image);
            let upload = Upload::from_path(&path)?;
            match session.load_upload(slot, &upload)? {
                LoadOutcome::Committed => {}
                other => {
                    return Err(RisoError::validation(format!(
                        "{slot}: '{}' was not loaded ({other:?})",
                        path.display()
                    )));
                }
            }
            session.set_params(slot, entry.params)?;
        }

        let scene = session.scene_mut();
        scene.blend_mode = self.blend_mode;
        scene.set_grain(self.grain_intensity)?;
        scene.paper_texture = self.paper_texture;
        Ok(session)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/file.rs"]
mod tests;
