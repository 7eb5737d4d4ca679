use crate::browser::{BrowserEngine, BrowserTarget, CreateBrowserRequest};
use crate::errors::EmbedError;
use crate::events::EmbedEvent;
use crate::geometry::{GeometryPair, GeometryTracker, LogicalRect, SharedGeometry};
use crate::handle::{BrowserId, NativeWindowHandle, VisualId};
use crate::lifecycle::{DebounceTimer, FireFn, LifecycleState, SharedState};
use crate::platform::PlatformStrategy;
use crate::scale::{ScaleResolver, SharedScale};
use crate::toolkit::{ChildSurface, HostEvent, HostToolkit, VisualContainer};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::broadcast;

/// Everything a lifecycle manager is wired to.
pub struct LifecycleParts {
    pub id: BrowserId,
    pub target: BrowserTarget,
    pub request_context: Option<String>,
    pub strategy: PlatformStrategy,
    pub debounce_delay: Duration,
    pub engine: Arc<dyn BrowserEngine>,
    pub toolkit: Arc<dyn HostToolkit>,
    pub container: Arc<dyn VisualContainer>,
    pub state: Arc<SharedState>,
    pub scale: Arc<SharedScale>,
    pub events: broadcast::Sender<EmbedEvent>,
    pub runtime: Handle,
    /// Called from a runtime worker when the debounce timer fires. Expected to enqueue a
    /// call to [`WindowLifecycleManager::on_debounce_tick`] on the UI queue.
    pub on_tick: FireFn,
}

/// Native window the browser is parented to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Parent {
    handle: NativeWindowHandle,
    visual: VisualId,
}

/// Drives the native browser window through create, parent, reparent and close.
///
/// Lives on the UI thread. Engine calls go out from here and nowhere else, and only while
/// the state allows them: geometry is pushed only while `Attached`, nothing at all after
/// `Closed`.
pub struct WindowLifecycleManager {
    id: BrowserId,
    target: BrowserTarget,
    request_context: Option<String>,
    strategy: PlatformStrategy,
    engine: Arc<dyn BrowserEngine>,
    toolkit: Arc<dyn HostToolkit>,
    container: Arc<dyn VisualContainer>,
    state: Arc<SharedState>,
    scale: Arc<SharedScale>,
    events: broadcast::Sender<EmbedEvent>,
    resolver: ScaleResolver,
    tracker: GeometryTracker,
    timer: DebounceTimer,

    /// Heavyweight child created to parent the browser (Windows / Linux)
    surface: Option<ChildSurface>,
    /// Cached native handle of the container itself (macOS)
    container_handle: NativeWindowHandle,
    parent: Option<Parent>,
    browser_handle: NativeWindowHandle,
    create_requested: bool,
    create_issued: bool,
}

impl WindowLifecycleManager {
    pub fn new(parts: LifecycleParts) -> Self {
        Self {
            id: parts.id,
            target: parts.target,
            request_context: parts.request_context,
            resolver: ScaleResolver::new(&parts.strategy),
            tracker: GeometryTracker::new(parts.strategy.origin),
            timer: DebounceTimer::new(parts.debounce_delay, parts.runtime, parts.on_tick),
            strategy: parts.strategy,
            engine: parts.engine,
            toolkit: parts.toolkit,
            container: parts.container,
            state: parts.state,
            scale: parts.scale,
            events: parts.events,
            surface: None,
            container_handle: NativeWindowHandle::NONE,
            parent: None,
            browser_handle: NativeWindowHandle::NONE,
            create_requested: false,
            create_issued: false,
        }
    }

    pub fn id(&self) -> BrowserId {
        self.id
    }

    pub fn state(&self) -> LifecycleState {
        self.state.get()
    }

    pub fn geometry(&self) -> Arc<SharedGeometry> {
        self.tracker.shared()
    }

    pub fn browser_handle(&self) -> NativeWindowHandle {
        self.browser_handle
    }

    pub fn is_timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    fn is_closed(&self) -> bool {
        self.state.is_closed()
    }

    // ****************************************
    // ** Requests from the host

    /// Ask for the native browser to be created as soon as a parent can be resolved.
    /// Never blocks; without a parent the request stays pending.
    pub fn request_create(&mut self) {
        if self.is_closed() || self.create_requested {
            return;
        }
        self.create_requested = true;

        if self.state() == LifecycleState::Unattached {
            self.transition(LifecycleState::PendingCreate);
        }
        self.advance();
        if self.state() != LifecycleState::Attached && !self.state().is_inert() {
            self.timer.restart();
        }
    }

    /// Dispatch a toolkit notification. Ignored after close.
    pub fn handle_host_event(&mut self, event: HostEvent) {
        if self.is_closed() {
            return;
        }

        match event {
            HostEvent::AddedToDisplay => self.on_added_to_display(),
            HostEvent::RemovedFromDisplay => self.on_removed_from_display(),
            HostEvent::BoundsChanged { width, height } => self.on_bounds_changed(width, height),
            HostEvent::AncestorMoved => {
                self.sync_geometry();
                if self.state() == LifecycleState::Attached {
                    self.engine.notify_move_or_resize_started(self.id);
                }
            }
            HostEvent::AncestorResized | HostEvent::ScrollChanged => {
                self.sync_geometry();
            }
            HostEvent::VisibilityChanged { showing } => {
                self.sync_geometry();
                if self.state() == LifecycleState::Attached {
                    self.engine.set_window_visibility(self.id, showing);
                }
            }
            HostEvent::Paint { transform_scale } => self.on_paint(transform_scale),
            HostEvent::FocusGained => {
                self.toolkit.dismiss_popup_menus();
                if self.state() == LifecycleState::Attached {
                    self.engine.set_focus(self.id, true);
                }
            }
            HostEvent::FocusLost => {
                if self.state() == LifecycleState::Attached {
                    self.engine.set_focus(self.id, false);
                }
            }
        }
    }

    fn on_added_to_display(&mut self) {
        // the container may have moved to a display with another scale
        self.scale.set(self.resolver.resolve(self.container.as_ref()));

        if self.strategy.heavyweight_child {
            self.ensure_surface();
        }

        if self.state() == LifecycleState::Detached {
            let resume = if self.create_issued {
                LifecycleState::Created
            } else if self.create_requested {
                LifecycleState::PendingCreate
            } else {
                LifecycleState::Unattached
            };
            self.transition(resume);
        }

        self.create_on_realize();
        self.advance();
        self.sync_geometry();
        self.timer.restart();
    }

    fn on_removed_from_display(&mut self) {
        self.timer.cancel();

        if self.state() == LifecycleState::Attached {
            match self.engine.reparent(self.id, NativeWindowHandle::NONE, None) {
                Ok(()) => self.emit(EmbedEvent::Reparented {
                    browser_id: self.id,
                    parent: NativeWindowHandle::NONE,
                }),
                Err(e) => self.engine_failed("reparent", e),
            }
        }

        self.release_surface();
        self.container_handle = NativeWindowHandle::NONE;
        self.parent = None;
        self.transition(LifecycleState::Detached);
    }

    fn on_bounds_changed(&mut self, width: u32, height: u32) {
        self.sync_geometry();
        if self.state() == LifecycleState::Attached {
            let size = LogicalRect::new(0, 0, width, height).to_device(self.scale.get().get());
            self.engine.was_resized(self.id, size.width, size.height);
        }
    }

    fn on_paint(&mut self, transform_scale: Option<f64>) {
        if self.state().is_inert() {
            return;
        }

        let current = self.scale.get();
        let scale = self.resolver.resolve_paint(transform_scale, current);
        if scale != current {
            log::debug!("Browser[{}]: scale changed from {} to {}", self.id, current.get(), scale.get());
            self.scale.set(scale);
            self.sync_geometry();
        }
        self.timer.restart();
    }

    // ****************************************
    // ** Notifications from the engine (already moved onto the UI thread)

    /// The engine reports the native window handle of the browser.
    pub fn on_browser_created(&mut self, handle: NativeWindowHandle) {
        if self.is_closed() || handle.is_none() {
            return;
        }
        log::debug!("Browser[{}]: native browser window is {}", self.id, handle);
        self.browser_handle = handle;

        if self.state() == LifecycleState::Created {
            self.try_attach();
        }
    }

    /// The debounce timer fired. Retries whatever is outstanding and re-arms itself until
    /// the browser is attached to a realized container.
    pub fn on_debounce_tick(&mut self) {
        if self.state().is_inert() {
            return;
        }

        self.create_on_realize();
        self.advance();

        match self.state() {
            LifecycleState::Unattached => {}
            LifecycleState::Attached if self.container.is_displayable() => {
                if self.strategy.reassert_after_realize {
                    self.sync_geometry();
                }
            }
            _ => self.timer.restart(),
        }
    }

    /// Terminal. Stops the timer, releases the child surface and closes the native browser.
    pub fn close(&mut self) {
        if self.is_closed() {
            return;
        }

        self.timer.cancel();
        self.release_surface();
        if self.create_issued {
            if let Err(e) = self.engine.close_browser(self.id) {
                self.engine_failed("close_browser", e);
            }
        }

        self.browser_handle = NativeWindowHandle::NONE;
        self.parent = None;
        self.transition(LifecycleState::Closed);
        self.emit(EmbedEvent::Closed { browser_id: self.id });
    }

    // ****************************************
    // ** State machine

    fn advance(&mut self) {
        match self.state() {
            LifecycleState::PendingCreate => self.try_create(),
            LifecycleState::Created => self.try_attach(),
            LifecycleState::Attached => self.reassert_parent(),
            LifecycleState::Unattached | LifecycleState::Detached | LifecycleState::Closed => {}
        }
    }

    /// A browser is wanted as soon as its container is realized, asked for or not.
    fn create_on_realize(&mut self) {
        if self.state() == LifecycleState::Unattached && self.container.is_displayable() {
            self.create_requested = true;
            self.transition(LifecycleState::PendingCreate);
        }
    }

    fn try_create(&mut self) {
        if self.create_issued {
            self.transition(LifecycleState::Created);
            self.try_attach();
            return;
        }

        let Some(parent) = self.resolve_parent() else {
            log::debug!("Browser[{}]: no native parent yet, create deferred", self.id);
            return;
        };

        let request = CreateBrowserRequest::windowed(
            parent.handle,
            parent.visual,
            self.target.clone(),
            self.request_context.clone(),
        );
        if let Err(e) = self.engine.create_native_browser(self.id, request) {
            self.engine_failed("create_native_browser", e);
            return;
        }

        log::info!("Browser[{}]: native browser requested beneath {}", self.id, parent.handle);
        self.create_issued = true;
        self.parent = Some(parent);
        self.emit(EmbedEvent::CreateRequested {
            browser_id: self.id,
            parent: parent.handle,
        });
        self.transition(LifecycleState::Created);
        self.try_attach();
    }

    fn try_attach(&mut self) {
        if self.browser_handle.is_none() {
            self.browser_handle = self.engine.native_handle_of(self.id);
            if self.browser_handle.is_none() {
                return;
            }
        }

        let Some(parent) = self.resolve_parent() else {
            return;
        };
        if self.reparent_to(parent) {
            self.transition(LifecycleState::Attached);
            self.sync_geometry();
        }
    }

    /// The host window may have been destroyed and recreated behind our back.
    fn reassert_parent(&mut self) {
        let Some(parent) = self.resolve_parent() else {
            return;
        };
        if self.parent != Some(parent) {
            log::debug!("Browser[{}]: parent changed to {}, reparenting", self.id, parent.handle);
            if self.reparent_to(parent) {
                self.sync_geometry();
            }
        }
    }

    fn reparent_to(&mut self, parent: Parent) -> bool {
        match self.engine.reparent(self.id, parent.handle, Some(parent.visual)) {
            Ok(()) => {
                self.parent = Some(parent);
                self.emit(EmbedEvent::Reparented {
                    browser_id: self.id,
                    parent: parent.handle,
                });
                true
            }
            Err(e) => {
                self.engine_failed("reparent", e);
                false
            }
        }
    }

    // ****************************************
    // ** Native parent resolution

    fn resolve_parent(&mut self) -> Option<Parent> {
        if self.strategy.heavyweight_child {
            let surface = self.ensure_surface()?;
            let handle = self.lookup_handle(surface.id)?;
            return Some(Parent { handle, visual: surface.id });
        }

        // without heavyweight children the container itself is the parent
        if !self.container.is_displayable() {
            return None;
        }
        let visual = self.container.visual_id();
        if self.strategy.lookup_container_handle && self.container_handle.is_none() {
            if let Some(handle) = self.lookup_handle(visual) {
                self.container_handle = handle;
            }
        }
        Some(Parent {
            handle: self.container_handle,
            visual,
        })
    }

    /// Lookup failures count as "not available yet".
    fn lookup_handle(&self, visual: VisualId) -> Option<NativeWindowHandle> {
        match self.toolkit.native_handle_for_visual(visual) {
            Ok(handle) => handle.present(),
            Err(e) => {
                log::warn!("Browser[{}]: {}", self.id, EmbedError::from(e));
                None
            }
        }
    }

    fn ensure_surface(&mut self) -> Option<ChildSurface> {
        if let Some(surface) = self.surface {
            return Some(surface);
        }
        if !self.container.is_displayable() {
            return None;
        }

        match self.toolkit.create_child_surface(self.container.as_ref()) {
            Ok(surface) => {
                self.surface = Some(surface);
                Some(surface)
            }
            Err(e) => {
                log::warn!("Browser[{}]: cannot create child surface: {}", self.id, e);
                None
            }
        }
    }

    fn release_surface(&mut self) {
        if let Some(surface) = self.surface.take() {
            self.toolkit.destroy_child_surface(surface);
        }
    }

    // ****************************************
    // ** Helpers

    /// Recompute the rectangles and, when attached, push them to the engine.
    fn sync_geometry(&mut self) -> GeometryPair {
        let pair = self.tracker.recompute(self.container.as_ref(), self.scale.get());
        if self.state() == LifecycleState::Attached {
            if let Err(e) = self.engine.update_geometry(self.id, pair.content, pair.browser) {
                self.engine_failed("update_geometry", e);
            }
        }
        pair
    }

    fn transition(&mut self, to: LifecycleState) {
        let from = self.state.get();
        if from == to {
            return;
        }
        self.state.set(to);
        log::debug!("Browser[{}]: {} -> {}", self.id, from, to);
        self.emit(EmbedEvent::StateChanged {
            browser_id: self.id,
            from,
            to,
        });
    }

    fn emit(&self, event: EmbedEvent) {
        // nobody listening is fine
        let _ = self.events.send(event);
    }

    fn engine_failed(&self, call: &str, err: anyhow::Error) {
        let err = EmbedError::EngineCall(err);
        log::warn!("Browser[{}]: {} failed: {}", self.id, call, err);
        self.emit(EmbedEvent::Warning {
            browser_id: self.id,
            message: format!("{call}: {err}"),
        });
    }
}
