//! Paper grain: a 4x4 tile of sparse translucent black dots repeated over the frame.

use crate::effects::composite::{ColumnSpan, blend, expected_len};
use crate::foundation::core::Rng64;
use crate::foundation::error::{RisoError, RisoResult};
use crate::foundation::math::alpha_to_u8;
use crate::scene::model::BlendMode;

pub const GRAIN_TILE: u32 = 4;
/// Alpha of a single dot.
pub const GRAIN_DOT_ALPHA: f32 = 0.08;

const CELLS: usize = (GRAIN_TILE * GRAIN_TILE) as usize;

/// Generated once per session and reused for every render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrainTile {
    dots: [bool; CELLS],
}

impl GrainTile {
    /// Each cell gets a dot with probability 1/2.
    pub fn generate(rng: &mut Rng64) -> Self {
        let mut dots = [false; CELLS];
        for d in &mut dots {
            *d = rng.next_f64_01() > 0.5;
        }
        Self { dots }
    }

    /// Row-major mask, `true` = dot.
    pub fn from_mask(dots: [bool; CELLS]) -> Self {
        Self { dots }
    }

    pub fn dot_count(&self) -> usize {
        self.dots.iter().filter(|d| **d).count()
    }

    pub fn has_dot(&self, x: u32, y: u32) -> bool {
        self.dots[((y % GRAIN_TILE) * GRAIN_TILE + (x % GRAIN_TILE)) as usize]
    }

    /// Tile the grain over `frame` at `alpha`, using `mode` as the operator.
    ///
    /// The pattern is anchored at the frame origin; `clip` limits it to a column range.
    pub fn overlay(
        &self,
        frame: &mut [u8],
        size: (u32, u32),
        alpha: f32,
        mode: BlendMode,
        clip: Option<ColumnSpan>,
    ) -> RisoResult<()> {
        let (width, height) = size;
        if frame.len() != expected_len(width, height)? {
            return Err(RisoError::render("grain overlay expects width*height*4 bytes"));
        }
        if alpha <= 0.0 || self.dot_count() == 0 {
            return Ok(());
        }
        let dot = [0u8, 0, 0, alpha_to_u8(GRAIN_DOT_ALPHA)];
        let span = clip.unwrap_or(ColumnSpan::full(width));
        let end = span.end.min(width);
        for y in 0..height {
            let row = (y * width) as usize * 4;
            for x in span.start..end {
                if !self.has_dot(x, y) {
                    continue;
                }
                let i = row + x as usize * 4;
                let px = blend(
                    [frame[i], frame[i + 1], frame[i + 2], frame[i + 3]],
                    dot,
                    alpha,
                    mode,
                );
                frame[i..i + 4].copy_from_slice(&px);
            }
        }
        Ok(())
    }
}

/// Effective grain opacity for a layer: `intensity * opacity`, clamped to `[0, 1]`.
pub fn grain_alpha(intensity: f64, opacity: f64) -> f32 {
    (intensity * opacity).clamp(0.0, 1.0) as f32
}

#[cfg(test)]
#[path = "../../tests/unit/effects/grain.rs"]
mod tests;
