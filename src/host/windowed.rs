use crate::browser::{BrowserEngine, BrowserTarget};
use crate::config::EmbedConfig;
use crate::errors::EmbedError;
use crate::events::EmbedEvent;
use crate::geometry::{DeviceRect, GeometryPair, LogicalPoint, SharedGeometry};
use crate::handle::BrowserId;
use crate::host::{lock_lifecycle, EmbeddingMode, EmbeddingStrategy, EngineCallbacks, RgbaImage, SharedLifecycle};
use crate::input::{InputBridgeParts, InputEventBridge};
use crate::lifecycle::{LifecycleParts, LifecycleState, SharedState, WindowLifecycleManager};
use crate::platform::PlatformStrategy;
use crate::scale::SharedScale;
use crate::toolkit::{HostEvent, HostToolkit, VisualContainer};
use crate::ui::UiQueue;
use std::sync::{Arc, Mutex, Weak};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use url::Url;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Collaborators shared by every host of one application.
#[derive(Clone)]
pub struct HostServices {
    pub engine: Arc<dyn BrowserEngine>,
    pub toolkit: Arc<dyn HostToolkit>,
    pub ui: Arc<dyn UiQueue>,
    /// Runtime the debounce timer is scheduled on.
    pub runtime: Handle,
}

/// A browser rendering into a native child window inside a host container.
///
/// All methods are meant to be called on the host's UI thread. The engine gets an
/// [`EngineCallbacks`] handle for the calls it makes from its own threads.
pub struct WindowedBrowserHost {
    id: BrowserId,
    config: EmbedConfig,
    services: HostServices,
    container: Arc<dyn VisualContainer>,
    request_context: Option<String>,
    state: Arc<SharedState>,
    geometry: Arc<SharedGeometry>,
    lifecycle: SharedLifecycle,
    callbacks: EngineCallbacks,
    events: broadcast::Sender<EmbedEvent>,
}

impl WindowedBrowserHost {
    /// Create a host that navigates to `url` once its native browser exists.
    pub fn new(
        config: EmbedConfig,
        services: HostServices,
        container: Arc<dyn VisualContainer>,
        url: &str,
        request_context: Option<String>,
    ) -> Result<Self, EmbedError> {
        let url = Url::parse(url).map_err(|e| EmbedError::InvalidUrl(format!("{url}: {e}")))?;
        Self::with_target(config, services, container, BrowserTarget::Url(url), request_context)
    }

    fn with_target(
        config: EmbedConfig,
        services: HostServices,
        container: Arc<dyn VisualContainer>,
        target: BrowserTarget,
        request_context: Option<String>,
    ) -> Result<Self, EmbedError> {
        config.validate()?;

        let id = BrowserId::new();
        let strategy = PlatformStrategy::from_config(&config);
        let state = Arc::new(SharedState::default());
        let scale = Arc::new(SharedScale::default());
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        log::info!(
            "Browser[{}]: windowed host on {:?}, target {:?}",
            id,
            strategy.family,
            target
        );

        // menus and tooltips would otherwise be drawn behind the native child window
        services.toolkit.prefer_heavyweight_popups();

        let lifecycle: SharedLifecycle = Arc::new_cyclic(|weak: &Weak<Mutex<WindowLifecycleManager>>| {
            let weak = weak.clone();
            let ui = services.ui.clone();
            Mutex::new(WindowLifecycleManager::new(LifecycleParts {
                id,
                target,
                request_context: request_context.clone(),
                strategy,
                debounce_delay: config.debounce_delay,
                engine: services.engine.clone(),
                toolkit: services.toolkit.clone(),
                container: container.clone(),
                state: state.clone(),
                scale: scale.clone(),
                events: events.clone(),
                runtime: services.runtime.clone(),
                on_tick: Arc::new(move || {
                    let weak = weak.clone();
                    ui.run_on_ui_thread(Box::new(move || {
                        if let Some(lifecycle) = weak.upgrade() {
                            lock_lifecycle(&lifecycle).on_debounce_tick();
                        }
                    }));
                }),
            }))
        });
        let geometry = lock_lifecycle(&lifecycle).geometry();

        let bridge = InputEventBridge::new(InputBridgeParts {
            transform: strategy.input,
            wheel_scroll_units: config.wheel_scroll_units,
            click_slots: config.click_slots,
            default_multi_click_interval: config.default_multi_click_interval,
            toolkit: services.toolkit.clone(),
            container: container.clone(),
            ui: services.ui.clone(),
            scale,
            state: state.clone(),
        });
        let callbacks = EngineCallbacks::new(id, services.ui.clone(), &lifecycle, geometry.clone(), bridge);

        Ok(Self {
            id,
            config,
            services,
            container,
            request_context,
            state,
            geometry,
            lifecycle,
            callbacks,
            events,
        })
    }

    pub fn id(&self) -> BrowserId {
        self.id
    }

    pub fn state(&self) -> LifecycleState {
        self.state.get()
    }

    pub fn config(&self) -> &EmbedConfig {
        &self.config
    }

    /// Lifecycle notifications of this host.
    pub fn subscribe_events(&self) -> broadcast::Receiver<EmbedEvent> {
        self.events.subscribe()
    }

    /// Handle to give to the engine for its callbacks.
    pub fn engine_callbacks(&self) -> EngineCallbacks {
        self.callbacks.clone()
    }

    /// The visual to insert into the host's layout.
    pub fn embeddable_surface(&self) -> Arc<dyn VisualContainer> {
        self.container.clone()
    }

    /// Snapshot of the content rectangle. Safe to call from any thread.
    pub fn current_content_rect(&self) -> DeviceRect {
        self.geometry.content_rect()
    }

    /// Snapshot of both rectangles, taken under one lock.
    pub fn current_geometry(&self) -> GeometryPair {
        self.geometry.snapshot()
    }

    /// Open developer tools for this browser in a new host living in `container`.
    /// `inspect_at` selects the element under that point.
    pub fn create_devtools_host(
        &self,
        container: Arc<dyn VisualContainer>,
        inspect_at: Option<LogicalPoint>,
    ) -> Result<WindowedBrowserHost, EmbedError> {
        if self.state.is_closed() {
            return Err(EmbedError::Closed);
        }

        log::debug!("Browser[{}]: opening devtools", self.id);
        Self::with_target(
            self.config.clone(),
            self.services.clone(),
            container,
            BrowserTarget::DevTools {
                inspected: self.id,
                inspect_at,
            },
            self.request_context.clone(),
        )
    }
}

impl EmbeddingStrategy for WindowedBrowserHost {
    fn mode(&self) -> EmbeddingMode {
        EmbeddingMode::Windowed
    }

    fn browser_id(&self) -> BrowserId {
        self.id
    }

    fn create_immediately(&self) {
        let lifecycle = Arc::downgrade(&self.lifecycle);
        self.services.ui.run_on_ui_thread(Box::new(move || {
            if let Some(lifecycle) = lifecycle.upgrade() {
                lock_lifecycle(&lifecycle).request_create();
            }
        }));
    }

    fn current_rect(&self) -> DeviceRect {
        self.current_content_rect()
    }

    fn handle_host_event(&self, event: HostEvent) {
        lock_lifecycle(&self.lifecycle).handle_host_event(event);
    }

    fn create_screenshot(&self, _max_dim: u32) -> Result<RgbaImage, EmbedError> {
        Err(EmbedError::Unsupported(format!(
            "screenshots are not available in {} mode",
            EmbeddingMode::Windowed
        )))
    }

    fn close(&self) {
        log::info!("Browser[{}]: closing", self.id);
        lock_lifecycle(&self.lifecycle).close();
    }
}
