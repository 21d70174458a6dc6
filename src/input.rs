//! Input model: modifier keys, mouse buttons, keys, wheel deltas, and the
//! drag state machine.
//!
//! `DragState` is the gesture being tracked between pointer-down and
//! pointer-up. Exactly one thing can be dragged at a time: the background
//! (panning) or a single point marker. Pointer-up and pointer-leave always
//! return it to `Idle`, whether or not a pointer-down was seen.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::registry::VariableId;
use crate::transform::Point;

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Unpack the host's bitmask: shift = 1, ctrl = 2, alt = 4, meta = 8.
    #[must_use]
    pub fn from_mask(mask: u8) -> Self {
        Self { shift: mask & 1 != 0, ctrl: mask & 2 != 0, alt: mask & 4 != 0, meta: mask & 8 != 0 }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

impl Button {
    /// Map a DOM `PointerEvent.button` value.
    #[must_use]
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A keyboard key as reported by the browser (e.g. `"c"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Case-insensitive comparison against a single key name.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down = zoom out).
    pub dy: f64,
}

/// The active drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Dragging the background to pan the view.
    Panning {
        /// Screen position of the previous pointer sample, used for the pan delta.
        last_screen: Point,
    },
    /// Dragging one point marker; the pointer position maps straight to its value.
    DraggingPoint {
        /// Id of the point variable being dragged.
        id: VariableId,
    },
}

impl DragState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The point being dragged, if any.
    #[must_use]
    pub fn dragged_point(&self) -> Option<VariableId> {
        match self {
            Self::DraggingPoint { id } => Some(*id),
            _ => None,
        }
    }
}
