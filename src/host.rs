//! Browser hosts: the pieces a host application creates and talks to.

mod callbacks;
mod strategy;
mod windowed;

pub use callbacks::EngineCallbacks;
pub use strategy::{EmbeddingMode, EmbeddingStrategy, RgbaImage};
pub use windowed::{HostServices, WindowedBrowserHost};

use crate::lifecycle::WindowLifecycleManager;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub(crate) type SharedLifecycle = Arc<Mutex<WindowLifecycleManager>>;

/// Lock the manager, recovering from poisoning.
pub(crate) fn lock_lifecycle(lifecycle: &Mutex<WindowLifecycleManager>) -> MutexGuard<'_, WindowLifecycleManager> {
    lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
}
