use crate::input::RawInputKind;
use std::time::Duration;

/// Multi-click detector.
///
/// Buttons are mapped onto a small slot array by `button mod slots`. With more buttons
/// than slots two buttons share a slot and their counts mix; the count is approximate and
/// that is accepted.
#[derive(Debug, Clone)]
pub struct ClickCounter {
    interval_ms: u64,
    next_eligible: Vec<u64>,
    counts: Vec<u32>,
}

impl ClickCounter {
    /// `slots` is clamped to at least one.
    pub fn new(slots: usize, interval: Duration) -> Self {
        let slots = slots.max(1);
        Self {
            interval_ms: interval.as_millis() as u64,
            next_eligible: vec![0; slots],
            counts: vec![0; slots],
        }
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval_ms = interval.as_millis() as u64;
    }

    fn slot(&self, button: i32) -> usize {
        button.rem_euclid(self.counts.len() as i32) as usize
    }

    /// Register an event and return the click count to report with it.
    ///
    /// A press at or after the slot's next-eligible time starts a new series at 1, an
    /// earlier press continues the series. Releases report the current count without
    /// changing it. Everything else counts 0.
    pub fn register(&mut self, button: i32, kind: RawInputKind, now_ms: u64) -> u32 {
        let idx = self.slot(button);
        match kind {
            RawInputKind::Pressed => {
                if now_ms >= self.next_eligible[idx] {
                    self.next_eligible[idx] = now_ms.saturating_add(self.interval_ms);
                    self.counts[idx] = 1;
                } else {
                    self.counts[idx] += 1;
                }
                self.counts[idx]
            }
            RawInputKind::Released => self.counts[idx],
            _ => 0,
        }
    }
}
