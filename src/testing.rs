//! In-memory fakes of the host toolkit and the browser engine.

use crate::browser::{BrowserEngine, CreateBrowserRequest};
use crate::errors::PlatformLookupError;
use crate::geometry::{DeviceRect, LogicalPoint, LogicalRect};
use crate::handle::{BrowserId, NativeWindowHandle, VisualId};
use crate::input::HostInputEvent;
use crate::toolkit::{Ancestor, ChildSurface, HostToolkit, ScreenInfo, VisualContainer};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

// ****************************************
// ** Container

struct ContainerState {
    bounds: LogicalRect,
    visible: Option<LogicalRect>,
    ancestors: Vec<Ancestor>,
    displayable: bool,
    display_scale: Option<f64>,
    screen: Option<ScreenInfo>,
}

pub struct TestContainer {
    id: VisualId,
    state: Mutex<ContainerState>,
}

impl TestContainer {
    /// A displayable container at the origin of its root window. The visible rect covers
    /// the whole container until set otherwise.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            id: VisualId::new(),
            state: Mutex::new(ContainerState {
                bounds: LogicalRect::new(x, y, width, height),
                visible: None,
                ancestors: Vec::new(),
                displayable: true,
                display_scale: None,
                screen: Some(ScreenInfo {
                    root_origin: LogicalPoint::new(0, 0),
                    display_bounds: LogicalRect::new(0, 0, 1920, 1080),
                }),
            }),
        }
    }

    pub fn set_bounds(&self, bounds: LogicalRect) {
        self.state.lock().unwrap().bounds = bounds;
    }

    pub fn set_visible_rect(&self, rect: LogicalRect) {
        self.state.lock().unwrap().visible = Some(rect);
    }

    pub fn set_ancestors(&self, ancestors: Vec<Ancestor>) {
        self.state.lock().unwrap().ancestors = ancestors;
    }

    pub fn set_displayable(&self, displayable: bool) {
        self.state.lock().unwrap().displayable = displayable;
    }

    pub fn set_display_scale(&self, scale: Option<f64>) {
        self.state.lock().unwrap().display_scale = scale;
    }

    pub fn set_screen_info(&self, screen: Option<ScreenInfo>) {
        self.state.lock().unwrap().screen = screen;
    }
}

impl VisualContainer for TestContainer {
    fn visual_id(&self) -> VisualId {
        self.id
    }

    fn bounds(&self) -> LogicalRect {
        self.state.lock().unwrap().bounds
    }

    fn visible_rect(&self) -> LogicalRect {
        let state = self.state.lock().unwrap();
        state
            .visible
            .unwrap_or(LogicalRect::new(0, 0, state.bounds.width, state.bounds.height))
    }

    fn ancestors(&self) -> Vec<Ancestor> {
        self.state.lock().unwrap().ancestors.clone()
    }

    fn is_displayable(&self) -> bool {
        self.state.lock().unwrap().displayable
    }

    fn display_scale(&self) -> Option<f64> {
        self.state.lock().unwrap().display_scale
    }

    fn screen_info(&self) -> Option<ScreenInfo> {
        self.state.lock().unwrap().screen
    }
}

// ****************************************
// ** Toolkit

pub struct TestToolkit {
    handle: Mutex<NativeWindowHandle>,
    lookup_fails: AtomicBool,
    lookups: AtomicUsize,
    surfaces: Mutex<Vec<ChildSurface>>,
    surfaces_created: AtomicUsize,
    posted: Mutex<Vec<HostInputEvent>>,
    now_ms: AtomicU64,
    interval: Mutex<Option<Duration>>,
    popups_dismissed: AtomicUsize,
    heavyweight_popups: AtomicBool,
}

impl TestToolkit {
    pub fn new() -> Self {
        Self {
            handle: Mutex::new(NativeWindowHandle::NONE),
            lookup_fails: AtomicBool::new(false),
            lookups: AtomicUsize::new(0),
            surfaces: Mutex::new(Vec::new()),
            surfaces_created: AtomicUsize::new(0),
            posted: Mutex::new(Vec::new()),
            now_ms: AtomicU64::new(1_000_000),
            interval: Mutex::new(None),
            popups_dismissed: AtomicUsize::new(0),
            heavyweight_popups: AtomicBool::new(false),
        }
    }

    /// Handle returned for every visual from now on.
    pub fn set_handle(&self, handle: NativeWindowHandle) {
        *self.handle.lock().unwrap() = handle;
    }

    pub fn set_lookup_fails(&self, fails: bool) {
        self.lookup_fails.store(fails, Ordering::SeqCst);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn live_surfaces(&self) -> Vec<ChildSurface> {
        self.surfaces.lock().unwrap().clone()
    }

    pub fn surfaces_created(&self) -> usize {
        self.surfaces_created.load(Ordering::SeqCst)
    }

    pub fn posted(&self) -> Vec<HostInputEvent> {
        self.posted.lock().unwrap().clone()
    }

    pub fn set_now_ms(&self, now: u64) {
        self.now_ms.store(now, Ordering::SeqCst);
    }

    pub fn set_multi_click_interval(&self, interval: Option<Duration>) {
        *self.interval.lock().unwrap() = interval;
    }

    pub fn popups_dismissed(&self) -> usize {
        self.popups_dismissed.load(Ordering::SeqCst)
    }

    pub fn prefers_heavyweight_popups(&self) -> bool {
        self.heavyweight_popups.load(Ordering::SeqCst)
    }
}

impl HostToolkit for TestToolkit {
    fn native_handle_for_visual(&self, _visual: VisualId) -> Result<NativeWindowHandle, PlatformLookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.lookup_fails.load(Ordering::SeqCst) {
            return Err(PlatformLookupError::ApiUnavailable("test".into()));
        }
        Ok(*self.handle.lock().unwrap())
    }

    fn create_child_surface(&self, container: &dyn VisualContainer) -> Result<ChildSurface, PlatformLookupError> {
        if !container.is_displayable() {
            return Err(PlatformLookupError::NoPeer);
        }
        let surface = ChildSurface { id: VisualId::new() };
        self.surfaces.lock().unwrap().push(surface);
        self.surfaces_created.fetch_add(1, Ordering::SeqCst);
        Ok(surface)
    }

    fn destroy_child_surface(&self, surface: ChildSurface) {
        self.surfaces.lock().unwrap().retain(|s| *s != surface);
    }

    fn post_input_event(&self, event: HostInputEvent) {
        self.posted.lock().unwrap().push(event);
    }

    fn multi_click_interval(&self) -> Option<Duration> {
        *self.interval.lock().unwrap()
    }

    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }

    fn dismiss_popup_menus(&self) {
        self.popups_dismissed.fetch_add(1, Ordering::SeqCst);
    }

    fn prefer_heavyweight_popups(&self) {
        self.heavyweight_popups.store(true, Ordering::SeqCst);
    }
}

// ****************************************
// ** Engine

/// One call received by [`RecordingEngine`]. Browser ids are left out, tests drive one
/// browser per engine unless they say otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Create { id: BrowserId, request: CreateBrowserRequest },
    Reparent { parent: NativeWindowHandle, parent_visual: Option<VisualId> },
    UpdateGeometry { content: DeviceRect, browser: DeviceRect },
    WasResized { width: u32, height: u32 },
    SetFocus(bool),
    SetVisibility(bool),
    MoveStarted,
    Close,
}

pub struct RecordingEngine {
    calls: Mutex<Vec<EngineCall>>,
    native_handle: Mutex<NativeWindowHandle>,
    fail_create: AtomicBool,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            native_handle: Mutex::new(NativeWindowHandle::NONE),
            fail_create: AtomicBool::new(false),
        }
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&EngineCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn create_requests(&self) -> Vec<CreateBrowserRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                EngineCall::Create { request, .. } => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    /// Handle answered by `native_handle_of` from now on.
    pub fn set_native_handle(&self, handle: NativeWindowHandle) {
        *self.native_handle.lock().unwrap() = handle;
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl BrowserEngine for RecordingEngine {
    fn create_native_browser(&self, id: BrowserId, request: CreateBrowserRequest) -> anyhow::Result<()> {
        if self.fail_create.load(Ordering::SeqCst) {
            anyhow::bail!("engine not ready");
        }
        self.record(EngineCall::Create { id, request });
        Ok(())
    }

    fn reparent(
        &self,
        _id: BrowserId,
        parent: NativeWindowHandle,
        parent_visual: Option<VisualId>,
    ) -> anyhow::Result<()> {
        self.record(EngineCall::Reparent { parent, parent_visual });
        Ok(())
    }

    fn update_geometry(&self, _id: BrowserId, content: DeviceRect, browser: DeviceRect) -> anyhow::Result<()> {
        self.record(EngineCall::UpdateGeometry { content, browser });
        Ok(())
    }

    fn native_handle_of(&self, _id: BrowserId) -> NativeWindowHandle {
        *self.native_handle.lock().unwrap()
    }

    fn was_resized(&self, _id: BrowserId, width: u32, height: u32) {
        self.record(EngineCall::WasResized { width, height });
    }

    fn set_focus(&self, _id: BrowserId, focused: bool) {
        self.record(EngineCall::SetFocus(focused));
    }

    fn set_window_visibility(&self, _id: BrowserId, visible: bool) {
        self.record(EngineCall::SetVisibility(visible));
    }

    fn notify_move_or_resize_started(&self, _id: BrowserId) {
        self.record(EngineCall::MoveStarted);
    }

    fn close_browser(&self, _id: BrowserId) -> anyhow::Result<()> {
        self.record(EngineCall::Close);
        Ok(())
    }
}
