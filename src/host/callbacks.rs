use crate::geometry::{DeviceRect, GeometryPair, SharedGeometry};
use crate::handle::{BrowserId, NativeWindowHandle};
use crate::host::{lock_lifecycle, SharedLifecycle};
use crate::input::{InputEventBridge, RawInput};
use crate::lifecycle::WindowLifecycleManager;
use crate::ui::UiQueue;
use std::sync::{Arc, Mutex, Weak};

/// Handle the engine uses to talk back to one host, from any of its threads.
///
/// Nothing here touches the container or the native window directly: lifecycle work is
/// queued on the UI thread, geometry is read from its own lock.
#[derive(Clone)]
pub struct EngineCallbacks {
    id: BrowserId,
    ui: Arc<dyn UiQueue>,
    lifecycle: Weak<Mutex<WindowLifecycleManager>>,
    geometry: Arc<SharedGeometry>,
    bridge: InputEventBridge,
}

impl EngineCallbacks {
    pub(crate) fn new(
        id: BrowserId,
        ui: Arc<dyn UiQueue>,
        lifecycle: &SharedLifecycle,
        geometry: Arc<SharedGeometry>,
        bridge: InputEventBridge,
    ) -> Self {
        Self {
            id,
            ui,
            lifecycle: Arc::downgrade(lifecycle),
            geometry,
            bridge,
        }
    }

    pub fn id(&self) -> BrowserId {
        self.id
    }

    /// The native browser window exists and has this handle.
    pub fn on_browser_created(&self, handle: NativeWindowHandle) {
        let lifecycle = self.lifecycle.clone();
        self.ui.run_on_ui_thread(Box::new(move || {
            if let Some(lifecycle) = lifecycle.upgrade() {
                lock_lifecycle(&lifecycle).on_browser_created(handle);
            }
        }));
    }

    /// Raw pointer input seen by the native browser window. Returns `false` if it was
    /// filtered out.
    pub fn on_raw_input(&self, raw: RawInput) -> bool {
        self.bridge.forward(raw)
    }

    /// Content rectangle for the engine's geometry queries. Never waits for the UI thread.
    pub fn get_rect(&self) -> DeviceRect {
        self.geometry.content_rect()
    }

    pub fn geometry(&self) -> GeometryPair {
        self.geometry.snapshot()
    }
}
