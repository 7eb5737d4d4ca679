//! Interfaces consumed from the host UI toolkit.
//!
//! The host owns the visual tree. The embedding only observes its container through
//! [`VisualContainer`], asks the toolkit for native handles and child surfaces through
//! [`HostToolkit`], and gets told about changes through [`HostEvent`]s.

use crate::errors::PlatformLookupError;
use crate::geometry::{LogicalPoint, LogicalRect};
use crate::handle::{NativeWindowHandle, VisualId};
use crate::input::HostInputEvent;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// One step up the container's parent chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ancestor {
    /// Location of this ancestor inside its own parent, in logical pixels.
    pub location: LogicalPoint,
    /// This ancestor is a top-level window.
    pub is_top_level: bool,
}

/// Screen placement of the window that roots the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenInfo {
    /// Location of the root window on screen, in logical pixels.
    pub root_origin: LogicalPoint,
    /// Bounds of the display the root window is on. The origin is in device space.
    pub display_bounds: LogicalRect,
}

/// The host visual the embedding occupies.
pub trait VisualContainer: Send + Sync {
    fn visual_id(&self) -> VisualId;

    /// Bounds relative to the parent, in logical pixels.
    fn bounds(&self) -> LogicalRect;

    /// The part of the container that is not clipped away, in the container's own
    /// coordinates.
    fn visible_rect(&self) -> LogicalRect;

    /// Parent chain, starting at the immediate parent.
    fn ancestors(&self) -> Vec<Ancestor>;

    /// The container has a realized native peer.
    fn is_displayable(&self) -> bool;

    /// Per-display device scale, if known.
    fn display_scale(&self) -> Option<f64>;

    /// `None` when the container is not inside a root window.
    fn screen_info(&self) -> Option<ScreenInfo>;
}

/// A toolkit-owned child surface created solely to be the native parent of the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildSurface {
    pub id: VisualId,
}

/// Services of the host toolkit.
pub trait HostToolkit: Send + Sync {
    /// Native window handle of a visual. `NativeWindowHandle::NONE` when the visual is not
    /// realized yet.
    fn native_handle_for_visual(
        &self,
        visual: VisualId,
    ) -> Result<NativeWindowHandle, PlatformLookupError>;

    /// Create a heavyweight child inside `container` that fills it.
    fn create_child_surface(
        &self,
        container: &dyn VisualContainer,
    ) -> Result<ChildSurface, PlatformLookupError>;

    fn destroy_child_surface(&self, surface: ChildSurface);

    /// Post a synthesized input event on the toolkit's event queue.
    fn post_input_event(&self, event: HostInputEvent);

    /// Desktop multi-click interval, if the toolkit has one.
    fn multi_click_interval(&self) -> Option<Duration> {
        None
    }

    /// Wall clock in milliseconds, used for input timestamps and click counting.
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// Close any open popup menus of the host.
    fn dismiss_popup_menus(&self) {}

    /// Ask the toolkit to draw popups and tooltips as native windows so they are not
    /// hidden behind the browser's child window.
    fn prefer_heavyweight_popups(&self) {}
}

/// Notifications from the host toolkit about the container. Delivered on the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// The container was attached to a realized parent (possibly on another display).
    AddedToDisplay,
    /// The container was removed from its display tree.
    RemovedFromDisplay,
    /// The container's own bounds changed.
    BoundsChanged { width: u32, height: u32 },
    AncestorMoved,
    AncestorResized,
    /// Scroll position or clipping changed.
    ScrollChanged,
    /// The container became visible or hidden on screen.
    VisibilityChanged { showing: bool },
    /// The toolkit painted the container; `transform_scale` is the paint transform's scale.
    Paint { transform_scale: Option<f64> },
    FocusGained,
    FocusLost,
}
