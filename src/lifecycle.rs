//! Native browser window lifecycle.

mod debounce;
mod manager;
mod state;

pub use debounce::{DebounceTimer, FireFn};
pub use manager::{LifecycleParts, WindowLifecycleManager};
pub use state::{LifecycleState, SharedState};
