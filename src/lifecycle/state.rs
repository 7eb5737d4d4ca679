use std::fmt::Display;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of the native browser window of one host.
///
/// ```text
/// Unattached -> PendingCreate -> Created -> Attached
///      any state -> Detached (container removed from its display)
///      any state -> Closed   (terminal)
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LifecycleState {
    /// Nothing requested yet.
    #[default]
    Unattached = 0,
    /// Creation was requested but no native parent could be resolved yet.
    PendingCreate = 1,
    /// The engine was asked to create the browser; its own handle has not arrived or
    /// could not be parented yet.
    Created = 2,
    /// The browser window is parented beneath the container's native handle.
    Attached = 3,
    /// The container left its display tree; the browser is unparented.
    Detached = 4,
    /// Terminal. Every later operation is a no-op.
    Closed = 5,
}

impl LifecycleState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => LifecycleState::Unattached,
            1 => LifecycleState::PendingCreate,
            2 => LifecycleState::Created,
            3 => LifecycleState::Attached,
            4 => LifecycleState::Detached,
            _ => LifecycleState::Closed,
        }
    }

    /// Callbacks queued before this state must not touch native windows anymore.
    pub fn is_inert(&self) -> bool {
        matches!(self, LifecycleState::Detached | LifecycleState::Closed)
    }
}

impl Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LifecycleState::Unattached => "Unattached",
            LifecycleState::PendingCreate => "PendingCreate",
            LifecycleState::Created => "Created",
            LifecycleState::Attached => "Attached",
            LifecycleState::Detached => "Detached",
            LifecycleState::Closed => "Closed",
        };
        write!(f, "{name}")
    }
}

/// Lock-free mirror of the lifecycle state, readable from engine threads and from queued
/// callbacks that run after a transition.
#[derive(Debug, Default)]
pub struct SharedState(AtomicU8);

impl SharedState {
    pub fn get(&self) -> LifecycleState {
        LifecycleState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: LifecycleState) {
        self.0.store(state as u8, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.get() == LifecycleState::Closed
    }
}
