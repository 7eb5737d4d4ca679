//! Input: raw engine notifications in, host toolkit events out.

mod bridge;
mod click;
mod events;

pub use bridge::{InputBridgeParts, InputEventBridge};
pub use click::ClickCounter;
pub use events::{
    HostInputEvent, Modifiers, MouseEventKind, MouseInput, RawInput, RawInputKind, ScrollType,
    WheelInput,
};
