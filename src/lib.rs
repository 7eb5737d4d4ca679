//! Windowed browser embedding.
//!
//! Places a browser engine's native child window inside a host toolkit's visual tree and
//! keeps the two in step: creation and parenting of the native window, device-pixel
//! geometry, DPI scale and re-synthesis of the engine's pointer input as host events.
//!
//! The host application creates a [`WindowedBrowserHost`] per embedded browser, feeds it
//! [`HostEvent`]s from its UI thread and hands [`EngineCallbacks`] to the engine.

pub mod browser;
pub mod config;
pub mod errors;
pub mod events;
pub mod geometry;
pub mod handle;
pub mod host;
pub mod input;
pub mod lifecycle;
pub mod logging;
pub mod platform;
pub mod scale;
pub mod toolkit;
pub mod ui;

#[cfg(test)]
mod testing;

pub use browser::{BrowserEngine, BrowserTarget, CreateBrowserRequest};
pub use config::{EmbedConfig, LogLevel};
pub use errors::{EmbedError, PlatformLookupError};
pub use events::EmbedEvent;
pub use handle::{BrowserId, NativeWindowHandle, VisualId};
pub use host::{EmbeddingMode, EmbeddingStrategy, EngineCallbacks, HostServices, WindowedBrowserHost};
pub use lifecycle::LifecycleState;
pub use platform::PlatformFamily;
pub use toolkit::{HostEvent, HostToolkit, VisualContainer};
