//! The host toolkit's UI-affinity queue.
//!
//! Every mutation of the container, the native window or the lifecycle happens on the UI
//! thread. Engine callbacks arrive on engine threads and only enqueue work here.

use std::sync::Arc;
use tokio::sync::mpsc;

pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

pub trait UiQueue: Send + Sync {
    /// Run `task` on the UI thread, later. Never runs it synchronously.
    fn run_on_ui_thread(&self, task: UiTask);
}

/// Sending side of [`ui_channel`].
#[derive(Clone)]
pub struct UiSender {
    tx: mpsc::UnboundedSender<UiTask>,
}

impl UiQueue for UiSender {
    fn run_on_ui_thread(&self, task: UiTask) {
        if self.tx.send(task).is_err() {
            log::debug!("UI queue is gone, dropping task");
        }
    }
}

/// Receiving side of [`ui_channel`], owned by the UI thread.
pub struct UiReceiver {
    rx: mpsc::UnboundedReceiver<UiTask>,
}

impl UiReceiver {
    /// Run all pending tasks, including tasks enqueued by the tasks being run.
    /// Returns how many ran.
    pub fn drain(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    /// Pump the queue until every sender is dropped.
    pub async fn run(mut self) {
        while let Some(task) = self.rx.recv().await {
            task();
        }
    }
}

/// A UI queue backed by an unbounded tokio channel. Hosts without their own queue drive
/// the receiver from their UI thread with [`UiReceiver::drain`] or [`UiReceiver::run`].
pub fn ui_channel() -> (Arc<UiSender>, UiReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(UiSender { tx }), UiReceiver { rx })
}
