mod cursor;

use serde::{Deserialize, Serialize};
use tracing::trace;

pub use cursor::{CursorInterpolator, CursorPosition, Readout, ReadoutEntry, interpolate_readout};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerDevice {
    Mouse,
    Pen,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
    Leave,
}

/// Device-independent pointer event fed to an [`InputSession`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub pointer_id: u32,
    pub device: PointerDevice,
    pub phase: PointerPhase,
    pub x: f64,
    pub y: f64,
    /// Bitmask of held buttons; zero when none.
    pub buttons: u16,
}

impl PointerEvent {
    #[must_use]
    pub fn new(pointer_id: u32, device: PointerDevice, phase: PointerPhase, x: f64, y: f64) -> Self {
        Self {
            pointer_id,
            device,
            phase,
            x,
            y,
            buttons: 0,
        }
    }

    /// Primary mouse pointer with no buttons held.
    #[must_use]
    pub fn mouse(phase: PointerPhase, x: f64, y: f64) -> Self {
        Self::new(1, PointerDevice::Mouse, phase, x, y)
    }

    #[must_use]
    pub fn touch(pointer_id: u32, phase: PointerPhase, x: f64, y: f64) -> Self {
        Self::new(pointer_id, PointerDevice::Touch, phase, x, y)
    }

    #[must_use]
    pub fn with_buttons(mut self, buttons: u16) -> Self {
        self.buttons = buttons;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionMode {
    #[default]
    Idle,
    /// A pointer is captured: its moves keep driving the readout even outside
    /// panel bounds until release or cancel.
    Dragging { pointer_id: u32, device: PointerDevice },
}

/// What the caller should do with one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputDecision {
    Interpolate { x: f64 },
    Ignore,
}

/// Single state machine for mouse, pen and touch drag gestures on one panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSession {
    mode: InteractionMode,
}

impl InputSession {
    #[must_use]
    pub fn mode(self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn is_dragging(self) -> bool {
        matches!(self.mode, InteractionMode::Dragging { .. })
    }

    pub fn reset(&mut self) {
        self.mode = InteractionMode::Idle;
    }

    pub fn handle(&mut self, event: PointerEvent) -> InputDecision {
        let decision = match (event.phase, self.mode) {
            (PointerPhase::Down, InteractionMode::Idle) => {
                self.mode = InteractionMode::Dragging {
                    pointer_id: event.pointer_id,
                    device: event.device,
                };
                InputDecision::Interpolate { x: event.x }
            }
            (PointerPhase::Down, InteractionMode::Dragging { .. }) => InputDecision::Ignore,
            (PointerPhase::Move, InteractionMode::Dragging { pointer_id, .. }) => {
                if pointer_id == event.pointer_id {
                    InputDecision::Interpolate { x: event.x }
                } else {
                    InputDecision::Ignore
                }
            }
            (PointerPhase::Move, InteractionMode::Idle) => {
                // Touch reports movement only while in contact.
                if event.buttons != 0 || event.device == PointerDevice::Touch {
                    InputDecision::Interpolate { x: event.x }
                } else {
                    InputDecision::Ignore
                }
            }
            (PointerPhase::Up | PointerPhase::Cancel, InteractionMode::Dragging { pointer_id, .. }) => {
                if pointer_id == event.pointer_id {
                    self.mode = InteractionMode::Idle;
                }
                InputDecision::Ignore
            }
            (PointerPhase::Up | PointerPhase::Cancel, InteractionMode::Idle)
            | (PointerPhase::Leave, _) => InputDecision::Ignore,
        };

        trace!(phase = ?event.phase, device = ?event.device, mode = ?self.mode, ?decision, "input session event");
        decision
    }
}
