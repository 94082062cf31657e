use crate::{
    foundation::core::{Canvas, Point, Vec2},
    scene::{
        geometry::hit_test,
        model::{ImageLayer, Layers, Slot},
    },
};

/// Pointer drag state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        slot: Slot,
        /// Pointer position minus the layer's translate at grab time.
        grab: Vec2,
    },
}

/// Cursor the host should show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorHint {
    Default,
    Grab,
    Grabbing,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    /// Start dragging the topmost layer under `p`. A miss leaves the state untouched.
    pub fn pointer_down(
        &mut self,
        canvas: Canvas,
        layers: &Layers<ImageLayer>,
        p: Point,
    ) -> Option<Slot> {
        let slot = hit_test(canvas, layers, p)?;
        let grab = p.to_vec2() - layers[slot].params.transform.translate;
        *self = DragState::Dragging { slot, grab };
        Some(slot)
    }

    /// Move the dragged layer so the grab point stays under the pointer.
    pub fn pointer_move(&self, layers: &mut Layers<ImageLayer>, p: Point) -> bool {
        let DragState::Dragging { slot, grab } = *self else {
            return false;
        };
        let next = p.to_vec2() - grab;
        let translate = &mut layers[slot].params.transform.translate;
        if *translate == next {
            return false;
        }
        *translate = next;
        true
    }

    /// Pointer up or pointer leaving the surface.
    pub fn release(&mut self) -> bool {
        let was = self.is_dragging();
        *self = DragState::Idle;
        was
    }

    pub fn cursor(&self, canvas: Canvas, layers: &Layers<ImageLayer>, p: Point) -> CursorHint {
        if self.is_dragging() {
            CursorHint::Grabbing
        } else if hit_test(canvas, layers, p).is_some() {
            CursorHint::Grab
        } else {
            CursorHint::Default
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/drag.rs"]
mod tests;
