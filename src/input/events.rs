//! Input event types.
//!
//! - [`RawInput`]: what the engine reports for its native window (device pixels, screen space).
//! - [`HostInputEvent`]: what gets posted on the host toolkit's event queue (logical pixels,
//!   relative to the root window).
//! - [`Modifiers`]: keyboard modifiers and held mouse buttons.

use bitflags::bitflags;
use std::fmt::Display;

bitflags! {
    pub struct Modifiers: u16 {
        const SHIFT        = 0b0000_0001;
        const CONTROL      = 0b0000_0010;
        const ALT          = 0b0000_0100;
        const META         = 0b0000_1000;
        /// Primary (left) button is held.
        const BUTTON1_DOWN = 0b0001_0000;
        const BUTTON2_DOWN = 0b0010_0000;
        const BUTTON3_DOWN = 0b0100_0000;
    }
}

impl Display for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();

        if self.contains(Modifiers::SHIFT) {
            parts.push("Shift");
        }
        if self.contains(Modifiers::CONTROL) {
            parts.push("Control");
        }
        if self.contains(Modifiers::ALT) {
            parts.push("Alt");
        }
        if self.contains(Modifiers::META) {
            parts.push("Meta");
        }
        if self.contains(Modifiers::BUTTON1_DOWN) {
            parts.push("Button1");
        }
        if self.contains(Modifiers::BUTTON2_DOWN) {
            parts.push("Button2");
        }
        if self.contains(Modifiers::BUTTON3_DOWN) {
            parts.push("Button3");
        }

        if parts.is_empty() {
            write!(f, "None")
        } else {
            write!(f, "{}", parts.join("+"))
        }
    }
}

/// Kind of a raw input notification from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInputKind {
    Pressed,
    Released,
    Moved,
    Dragged,
    Wheel,
    Entered,
    Exited,
}

/// A raw input notification from the engine, in device pixels and screen space.
///
/// For wheel notifications `button` carries the scroll direction in its sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInput {
    pub kind: RawInputKind,
    pub screen_x: i32,
    pub screen_y: i32,
    pub modifiers: Modifiers,
    pub button: i32,
}

impl RawInput {
    pub fn new(kind: RawInputKind, screen_x: i32, screen_y: i32, modifiers: Modifiers, button: i32) -> Self {
        Self { kind, screen_x, screen_y, modifiers, button }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Pressed,
    Released,
    /// Always synthesized right after [`MouseEventKind::Released`].
    Clicked,
    Moved,
    Dragged,
    Entered,
    Exited,
}

impl RawInputKind {
    /// The host mouse event kind for this notification; `None` for wheel notifications.
    pub fn mouse_kind(self) -> Option<MouseEventKind> {
        match self {
            RawInputKind::Pressed => Some(MouseEventKind::Pressed),
            RawInputKind::Released => Some(MouseEventKind::Released),
            RawInputKind::Moved => Some(MouseEventKind::Moved),
            RawInputKind::Dragged => Some(MouseEventKind::Dragged),
            RawInputKind::Entered => Some(MouseEventKind::Entered),
            RawInputKind::Exited => Some(MouseEventKind::Exited),
            RawInputKind::Wheel => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollType {
    /// Scroll by a number of units (lines) per notch.
    Unit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseInput {
    pub kind: MouseEventKind,
    /// Position relative to the root window, logical pixels.
    pub x: i32,
    pub y: i32,
    /// Device-pixel screen position as reported by the engine.
    pub screen_x: i32,
    pub screen_y: i32,
    pub modifiers: Modifiers,
    pub button: i32,
    pub click_count: u32,
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelInput {
    pub x: i32,
    pub y: i32,
    pub modifiers: Modifiers,
    pub scroll_type: ScrollType,
    pub scroll_amount: u32,
    /// +1 or -1 notches.
    pub rotation: i32,
    pub timestamp_ms: u64,
}

/// An input event synthesized for the host toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostInputEvent {
    Mouse(MouseInput),
    Wheel(WheelInput),
}
