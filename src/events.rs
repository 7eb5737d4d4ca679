//! Lifecycle notifications published by browser hosts.

use crate::handle::{BrowserId, NativeWindowHandle};
use crate::lifecycle::LifecycleState;

#[derive(Debug, Clone, PartialEq)]
pub enum EmbedEvent {
    // ****************************************
    // ** Lifecycle
    /// The host moved from one lifecycle state to another
    StateChanged {
        browser_id: BrowserId,
        from: LifecycleState,
        to: LifecycleState,
    },
    /// The engine was asked to create the native browser
    CreateRequested {
        browser_id: BrowserId,
        parent: NativeWindowHandle,
    },
    /// The browser window was parented beneath a new native window (`NONE` when detached)
    Reparented {
        browser_id: BrowserId,
        parent: NativeWindowHandle,
    },
    /// The host was closed
    Closed { browser_id: BrowserId },

    // ****************************************
    // ** Diagnostics
    /// Something went wrong that the host recovered from
    Warning { browser_id: BrowserId, message: String },
}

impl EmbedEvent {
    pub fn browser_id(&self) -> BrowserId {
        match self {
            EmbedEvent::StateChanged { browser_id, .. }
            | EmbedEvent::CreateRequested { browser_id, .. }
            | EmbedEvent::Reparented { browser_id, .. }
            | EmbedEvent::Closed { browser_id }
            | EmbedEvent::Warning { browser_id, .. } => *browser_id,
        }
    }
}
