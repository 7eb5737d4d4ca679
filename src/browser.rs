//! The browser engine as seen from the embedding.

use crate::geometry::{DeviceRect, LogicalPoint};
use crate::handle::{BrowserId, NativeWindowHandle, VisualId};
use url::Url;

/// What a native browser should show once created.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserTarget {
    /// Navigate to a URL.
    Url(Url),
    /// Attach developer tools to another browser.
    DevTools {
        inspected: BrowserId,
        /// Element to inspect, in the inspected browser's logical coordinates.
        inspect_at: Option<LogicalPoint>,
    },
}

/// Arguments of [`BrowserEngine::create_native_browser`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreateBrowserRequest {
    pub parent_handle: NativeWindowHandle,
    pub parent_visual: VisualId,
    pub target: BrowserTarget,
    /// Always `false`: the browser renders into its own native child window.
    pub windowless: bool,
    pub transparent: bool,
    /// Opaque request context (profile / cache partition) passed through to the engine.
    pub request_context: Option<String>,
}

impl CreateBrowserRequest {
    pub fn windowed(
        parent_handle: NativeWindowHandle,
        parent_visual: VisualId,
        target: BrowserTarget,
        request_context: Option<String>,
    ) -> Self {
        Self {
            parent_handle,
            parent_visual,
            target,
            windowless: false,
            transparent: false,
            request_context,
        }
    }
}

/// Calls the embedding makes into the browser engine. All of them are issued from the UI
/// thread.
pub trait BrowserEngine: Send + Sync {
    /// Create the native browser beneath `request.parent_handle`. The browser's own window
    /// handle is reported back later through
    /// [`EngineCallbacks::on_browser_created`](crate::host::EngineCallbacks::on_browser_created).
    fn create_native_browser(&self, id: BrowserId, request: CreateBrowserRequest) -> anyhow::Result<()>;

    /// Move the browser window beneath another parent. `NativeWindowHandle::NONE`
    /// unparents it.
    fn reparent(
        &self,
        id: BrowserId,
        parent: NativeWindowHandle,
        parent_visual: Option<VisualId>,
    ) -> anyhow::Result<()>;

    fn update_geometry(&self, id: BrowserId, content: DeviceRect, browser: DeviceRect) -> anyhow::Result<()>;

    /// The browser's own window handle, `NativeWindowHandle::NONE` if not created yet.
    fn native_handle_of(&self, id: BrowserId) -> NativeWindowHandle;

    /// The container was resized to `width` x `height` device pixels.
    fn was_resized(&self, id: BrowserId, width: u32, height: u32);

    fn set_focus(&self, id: BrowserId, focused: bool);

    fn set_window_visibility(&self, id: BrowserId, visible: bool);

    /// A top-level window started moving; popups of the browser should close.
    fn notify_move_or_resize_started(&self, id: BrowserId);

    fn close_browser(&self, id: BrowserId) -> anyhow::Result<()>;
}
