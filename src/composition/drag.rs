//! Pointer gestures that move accessory instances around the preview.
//!
//! Each instance carries its own two-state machine:
//!
//! ```text
//!   Idle --pointer_down--> Dragging { anchor }
//!   Dragging --pointer_move--> Dragging (offset = pointer - anchor)
//!   Dragging --pointer_up | pointer_leave--> Idle (offset kept)
//! ```
//!
//! Mouse and touch input are unified through [`PointerInput`].

use crate::composition::model::InstanceId;
use crate::composition::store::{CompositionStore, StoreEvent};
use crate::foundation::core::{Point, Vec2};

/// Gesture state of one accessory instance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A gesture is in progress.
    Dragging {
        /// Pointer position minus the offset at gesture start.
        anchor: Point,
    },
}

impl DragState {
    /// Start a gesture at `pointer` for an instance currently at `offset`.
    pub fn begin(pointer: Point, offset: Vec2) -> Self {
        Self::Dragging {
            anchor: pointer - offset,
        }
    }

    /// Offset implied by the pointer being at `pointer`, or `None` when idle.
    pub fn offset_at(self, pointer: Point) -> Option<Vec2> {
        match self {
            Self::Idle => None,
            Self::Dragging { anchor } => Some(pointer - anchor),
        }
    }

    /// Return `true` while dragging.
    pub fn is_dragging(self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}

/// Device-independent pointer sample.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerInput {
    /// Mouse position in client pixels.
    Mouse {
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// Active touch points in client pixels; only the first one drives the gesture.
    Touch {
        /// Touch positions, primary first.
        touches: Vec<Point>,
    },
}

impl PointerInput {
    /// Mouse sample.
    pub fn mouse(x: f64, y: f64) -> Self {
        Self::Mouse { x, y }
    }

    /// Single-finger touch sample.
    pub fn touch(x: f64, y: f64) -> Self {
        Self::Touch {
            touches: vec![Point::new(x, y)],
        }
    }

    /// Position driving the gesture, if there is one.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::Mouse { x, y } => Some(Point::new(*x, *y)),
            Self::Touch { touches } => touches.first().copied(),
        }
    }
}

impl CompositionStore {
    /// Start dragging `id` from the given pointer sample.
    pub fn pointer_down(&mut self, id: InstanceId, input: &PointerInput) {
        let Some(pointer) = input.position() else {
            return;
        };
        let Some(inst) = self.instance_mut(id) else {
            return;
        };
        inst.drag = DragState::begin(pointer, inst.offset);
        self.notify(StoreEvent::DragStarted(id));
    }

    /// Move `id` with the pointer. Ignored unless a drag on `id` is active.
    pub fn pointer_move(&mut self, id: InstanceId, input: &PointerInput) {
        let Some(pointer) = input.position() else {
            return;
        };
        let Some(inst) = self.instance_mut(id) else {
            return;
        };
        let Some(offset) = inst.drag.offset_at(pointer) else {
            return;
        };
        inst.offset = offset;
        self.notify(StoreEvent::AccessoryMoved(id));
    }

    /// Pointer released over `id`.
    pub fn pointer_up(&mut self, id: InstanceId) {
        self.end_drag(id);
    }

    /// Pointer left `id` while possibly dragging; treated like a release.
    pub fn pointer_leave(&mut self, id: InstanceId) {
        self.end_drag(id);
    }

    fn end_drag(&mut self, id: InstanceId) {
        let Some(inst) = self.instance_mut(id) else {
            return;
        };
        if !inst.drag.is_dragging() {
            return;
        }
        inst.drag = DragState::Idle;
        self.notify(StoreEvent::DragEnded(id));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/drag.rs"]
mod tests;
