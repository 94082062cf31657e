use crate::{
    assets::{
        decode::{LayerImage, Upload},
        ink::InkId,
        sample::extract_colors,
    },
    effects::generative::{GenerativeEffect, draw_effect},
    foundation::core::{Canvas, Point, Rng64},
    foundation::error::{RisoError, RisoResult},
    render::{
        backend::{FrameRGBA, RenderSettings},
        compositor::Compositor,
    },
    scene::{
        drag::{CursorHint, DragState},
        model::{BlendMode, Layers, LayerParams, SceneState, Slot},
        presets::{MisregistrationPreset, apply_misregistration, surprise},
    },
};

/// Rotation applied per rotate command or key press (5 degrees).
pub const ROTATION_STEP: f64 = std::f64::consts::PI / 36.0;

/// Env var consulted for a deterministic seed when none is configured.
pub const SEED_ENV: &str = "RISOMIX_SEED";

#[derive(Clone, Debug)]
pub struct SessionOpts {
    pub canvas: Canvas,
    /// `None` falls back to [`SEED_ENV`], then the clock.
    pub seed: Option<u64>,
    pub render: RenderSettings,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 800,
                height: 600,
            },
            seed: None,
            render: RenderSettings::default(),
        }
    }
}

/// Seed from `explicit`, else [`SEED_ENV`].
pub fn resolve_seed(explicit: Option<u64>) -> Option<u64> {
    explicit.or_else(|| {
        std::env::var(SEED_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotateDir {
    /// Counter-clockwise (negative angle).
    Ccw,
    Cw,
}

impl RotateDir {
    fn sign(self) -> f64 {
        match self {
            RotateDir::Ccw => -1.0,
            RotateDir::Cw => 1.0,
        }
    }
}

/// A user action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    SetOpacity { slot: Slot, value: f64 },
    SetOffset { slot: Slot, x: i32, y: i32 },
    SetTint { slot: Slot, ink: Option<InkId> },
    SetHue { slot: Slot, degrees: f64 },
    SetScale { slot: Slot, value: f64 },
    SetBlendMode(BlendMode),
    SetGrain(f64),
    SetPaperTexture(bool),
    ToggleSeparation,
    Rotate { slot: Slot, dir: RotateDir },
    /// Keyboard shortcut: `q`/`e` rotate layer 1, `a`/`d` rotate layer 2.
    Key(char),
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    PointerLeave,
    Misregistration(MisregistrationPreset),
    SurpriseMe,
    /// Destructive; ignored unless the host confirmed it.
    ClearAll { confirmed: bool },
}

/// Whether a command changed anything that needs a re-render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged,
}

impl Outcome {
    pub fn changed(self) -> bool {
        self == Outcome::Changed
    }

    fn from_bool(changed: bool) -> Self {
        if changed {
            Outcome::Changed
        } else {
            Outcome::Unchanged
        }
    }
}

/// Identity of one load request into a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    slot: Slot,
    generation: u64,
}

impl LoadTicket {
    pub fn slot(&self) -> Slot {
        self.slot
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Committed,
    /// A newer request for the slot (or a clear) superseded this one.
    Stale,
    /// The upload was not an image; nothing happened.
    Ignored,
}

/// One interactive compositing session: scene, drag state, randomness and loads in flight.
#[derive(Debug)]
pub struct Session {
    canvas: Canvas,
    scene: SceneState,
    rng: Rng64,
    compositor: Compositor,
    drag: DragState,
    generations: Layers<u64>,
}

impl Session {
    pub fn new(opts: SessionOpts) -> RisoResult<Self> {
        opts.canvas.validate()?;
        let mut rng = match resolve_seed(opts.seed) {
            Some(seed) => Rng64::new(seed),
            None => Rng64::from_clock(),
        };
        let compositor = Compositor::new(opts.render, &mut rng);
        tracing::debug!(
            w = opts.canvas.width,
            h = opts.canvas.height,
            "session created"
        );
        Ok(Self {
            canvas: opts.canvas,
            scene: SceneState::default(),
            rng,
            compositor,
            drag: DragState::Idle,
            generations: Layers::default(),
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub(crate) fn scene_mut(&mut self) -> &mut SceneState {
        &mut self.scene
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// Start a load into `slot`; any earlier request for the slot becomes stale.
    pub fn begin_load(&mut self, slot: Slot) -> LoadTicket {
        let g = &mut self.generations[slot];
        *g += 1;
        LoadTicket {
            slot,
            generation: *g,
        }
    }

    /// Commit a decoded image if `ticket` is still the slot's latest request.
    #[tracing::instrument(skip(self, image), fields(slot = %ticket.slot))]
    pub fn finish_load(&mut self, ticket: LoadTicket, image: LayerImage) -> LoadOutcome {
        if self.generations[ticket.slot] != ticket.generation {
            tracing::debug!("discarding stale load");
            return LoadOutcome::Stale;
        }
        let colors = extract_colors(image.rgba(), &mut self.rng);
        tracing::debug!(
            w = image.width(),
            h = image.height(),
            colors = colors.len(),
            "layer loaded"
        );
        self.scene
            .layer_mut(ticket.slot)
            .replace_image(image, colors);
        LoadOutcome::Committed
    }

    /// Load an already decoded image into `slot` right away.
    pub fn load_image(&mut self, slot: Slot, image: LayerImage) -> LoadOutcome {
        let ticket = self.begin_load(slot);
        self.finish_load(ticket, image)
    }

    /// Decode and load a user upload. Non-image uploads are ignored.
    pub fn load_upload(&mut self, slot: Slot, upload: &Upload) -> RisoResult<LoadOutcome> {
        match upload.decode()? {
            Some(image) => Ok(self.load_image(slot, image)),
            None => Ok(LoadOutcome::Ignored),
        }
    }

    /// Replace a layer's parameters wholesale.
    pub fn set_params(&mut self, slot: Slot, params: LayerParams) -> RisoResult<()> {
        self.scene.set_params(slot, params)
    }

    /// Apply one command. Precondition failures leave the state untouched.
    pub fn apply(&mut self, cmd: Command) -> RisoResult<Outcome> {
        let outcome = match cmd {
            Command::SetOpacity { slot, value } => {
                self.scene.set_opacity(slot, value)?;
                Outcome::Changed
            }
            Command::SetOffset { slot, x, y } => {
                let t = &mut self.scene.layer_mut(slot).params.transform;
                t.offset_x = x;
                t.offset_y = y;
                Outcome::Changed
            }
            Command::SetTint { slot, ink } => {
                self.scene.layer_mut(slot).params.tint = ink;
                Outcome::Changed
            }
            Command::SetHue { slot, degrees } => {
                self.scene.set_hue(slot, degrees)?;
                Outcome::Changed
            }
            Command::SetScale { slot, value } => {
                self.scene.set_scale(slot, value)?;
                Outcome::Changed
            }
            Command::SetBlendMode(mode) => {
                self.scene.blend_mode = mode;
                Outcome::Changed
            }
            Command::SetGrain(value) => {
                self.scene.set_grain(value)?;
                Outcome::Changed
            }
            Command::SetPaperTexture(on) => {
                self.scene.paper_texture = on;
                Outcome::Changed
            }
            Command::ToggleSeparation => {
                self.scene.separation_mode = !self.scene.separation_mode;
                Outcome::Changed
            }
            Command::Rotate { slot, dir } => self.rotate(slot, dir),
            Command::Key(key) => match key.to_ascii_lowercase() {
                'q' => self.rotate(Slot::First, RotateDir::Ccw),
                'e' => self.rotate(Slot::First, RotateDir::Cw),
                'a' => self.rotate(Slot::Second, RotateDir::Ccw),
                'd' => self.rotate(Slot::Second, RotateDir::Cw),
                other => {
                    tracing::debug!(key = %other, "unbound key ignored");
                    Outcome::Unchanged
                }
            },
            Command::PointerDown(p) => {
                self.drag.pointer_down(self.canvas, &self.scene.layers, p);
                Outcome::Unchanged
            }
            Command::PointerMove(p) => {
                Outcome::from_bool(self.drag.pointer_move(&mut self.scene.layers, p))
            }
            Command::PointerUp | Command::PointerLeave => {
                self.drag.release();
                Outcome::Unchanged
            }
            Command::Misregistration(preset) => {
                apply_misregistration(&mut self.scene, preset, &mut self.rng)?;
                Outcome::Changed
            }
            Command::SurpriseMe => {
                surprise(&mut self.scene, &mut self.rng)?;
                Outcome::Changed
            }
            Command::ClearAll { confirmed } => {
                if !confirmed {
                    tracing::debug!("clear not confirmed, ignored");
                    return Ok(Outcome::Unchanged);
                }
                self.clear_all();
                Outcome::Changed
            }
        };
        Ok(outcome)
    }

    /// Rotate a loaded layer one step; empty slots are left alone.
    fn rotate(&mut self, slot: Slot, dir: RotateDir) -> Outcome {
        let layer = self.scene.layer_mut(slot);
        if !layer.is_loaded() {
            tracing::debug!(%slot, "rotate ignored, slot is empty");
            return Outcome::Unchanged;
        }
        layer.params.transform.rotation += dir.sign() * ROTATION_STEP;
        Outcome::Changed
    }

    /// Drop both images and every layer parameter; grain, paper and separation survive.
    fn clear_all(&mut self) {
        for (slot, layer) in self.scene.layers.iter_mut() {
            layer.reset();
            self.generations[slot] += 1;
        }
        self.scene.blend_mode = BlendMode::Normal;
        self.drag.release();
        tracing::debug!("scene cleared");
    }

    pub fn cursor_hint(&self, p: Point) -> CursorHint {
        self.drag.cursor(self.canvas, &self.scene.layers, p)
    }

    pub fn render(&self) -> RisoResult<FrameRGBA> {
        self.compositor.render(&self.scene, self.canvas)
    }

    /// Combined-mode frame regardless of the separation toggle.
    pub fn render_for_export(&self) -> RisoResult<FrameRGBA> {
        self.compositor.render_combined(&self.scene, self.canvas)
    }

    /// One-shot decorative repaint from the loaded images' sampled colors.
    pub fn draw_effect(&mut self, effect: GenerativeEffect) -> RisoResult<FrameRGBA> {
        let palette = self.scene.combined_palette();
        draw_effect(effect, self.canvas, &palette, &mut self.rng)
    }

    /// Surface a user-facing message for a failed command, if it is one.
    pub fn user_message(err: &RisoError) -> Option<String> {
        match err {
            RisoError::Precondition(msg) => Some(msg.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/session.rs"]
mod tests;
