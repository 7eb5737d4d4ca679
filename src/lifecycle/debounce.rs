use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

pub type FireFn = Arc<dyn Fn() + Send + Sync>;

/// Single-shot, restartable delay.
///
/// Every [`restart`](Self::restart) cancels the pending shot and schedules a new one on the
/// runtime. `on_fire` runs on a runtime worker, so it should only enqueue work.
pub struct DebounceTimer {
    delay: Duration,
    runtime: Handle,
    on_fire: FireFn,
    pending: Option<CancellationToken>,
}

impl DebounceTimer {
    pub fn new(delay: Duration, runtime: Handle, on_fire: FireFn) -> Self {
        Self {
            delay,
            runtime,
            on_fire,
            pending: None,
        }
    }

    pub fn restart(&mut self) {
        self.cancel();

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let delay = self.delay;
        let on_fire = self.on_fire.clone();
        self.runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => on_fire(),
            }
        });
        self.pending = Some(cancel);
    }

    /// Stop the pending shot, if any. Once this returns `on_fire` will not be called for it.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.pending.take() {
            cancel.cancel();
        }
    }

    /// A shot was scheduled and not cancelled. Stays `true` after it fired.
    pub fn is_armed(&self) -> bool {
        self.pending.as_ref().is_some_and(|c| !c.is_cancelled())
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
