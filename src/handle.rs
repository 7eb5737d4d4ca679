//! Identifiers: [`BrowserId`], [`VisualId`] and [`NativeWindowHandle`].

use raw_window_handle::RawWindowHandle;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

/// A unique identifier for an embedded browser, one per host instance.
///
/// Treat it as an opaque handle; the uuid inside is an implementation detail.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BrowserId(Uuid);

impl BrowserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BrowserId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for BrowserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a host-toolkit visual (the embedding container or a child surface
/// created to host the browser window).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualId(Uuid);

impl VisualId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VisualId {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque platform window identifier. Zero means "absent".
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct NativeWindowHandle(u64);

impl NativeWindowHandle {
    pub const NONE: NativeWindowHandle = NativeWindowHandle(0);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }

    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// `None` for the absent handle, the handle itself otherwise.
    pub fn present(self) -> Option<NativeWindowHandle> {
        self.is_some().then_some(self)
    }
}

impl Display for NativeWindowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl TryFrom<RawWindowHandle> for NativeWindowHandle {
    type Error = RawWindowHandle;

    /// Converts the handle kinds that can act as a parent for a native child window.
    fn try_from(raw: RawWindowHandle) -> Result<Self, Self::Error> {
        let value = match raw {
            RawWindowHandle::Win32(h) => h.hwnd.get() as u64,
            RawWindowHandle::AppKit(h) => h.ns_view.as_ptr() as usize as u64,
            RawWindowHandle::Xlib(h) => h.window as u64,
            RawWindowHandle::Xcb(h) => h.window.get() as u64,
            other => return Err(other),
        };
        Ok(NativeWindowHandle(value))
    }
}
