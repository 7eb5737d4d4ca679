use crate::input::{
    ClickCounter, HostInputEvent, Modifiers, MouseInput, RawInput, RawInputKind, ScrollType,
    WheelInput,
};
use crate::lifecycle::SharedState;
use crate::platform::InputTransform;
use crate::scale::{ScaleFactor, SharedScale};
use crate::toolkit::{HostToolkit, ScreenInfo, VisualContainer};
use crate::ui::UiQueue;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Everything the bridge needs to synthesize host events.
pub struct InputBridgeParts {
    pub transform: InputTransform,
    pub wheel_scroll_units: u32,
    pub click_slots: usize,
    pub default_multi_click_interval: Duration,
    pub toolkit: Arc<dyn HostToolkit>,
    pub container: Arc<dyn VisualContainer>,
    pub ui: Arc<dyn UiQueue>,
    pub scale: Arc<SharedScale>,
    pub state: Arc<SharedState>,
}

/// Re-synthesizes the engine's raw pointer input as host toolkit events.
///
/// [`forward`](Self::forward) may be called from any engine thread. Filtering happens
/// right away, the coordinate transform and posting run on the UI queue.
#[derive(Clone)]
pub struct InputEventBridge {
    inner: Arc<BridgeInner>,
}

struct BridgeInner {
    transform: InputTransform,
    wheel_scroll_units: u32,
    default_interval: Duration,
    toolkit: Arc<dyn HostToolkit>,
    container: Arc<dyn VisualContainer>,
    ui: Arc<dyn UiQueue>,
    scale: Arc<SharedScale>,
    state: Arc<SharedState>,
    last_move: Mutex<Option<(i32, i32)>>,
    clicks: Mutex<ClickCounter>,
}

impl InputEventBridge {
    pub fn new(parts: InputBridgeParts) -> Self {
        let interval = parts
            .toolkit
            .multi_click_interval()
            .unwrap_or(parts.default_multi_click_interval);

        Self {
            inner: Arc::new(BridgeInner {
                transform: parts.transform,
                wheel_scroll_units: parts.wheel_scroll_units,
                default_interval: parts.default_multi_click_interval,
                toolkit: parts.toolkit,
                container: parts.container,
                ui: parts.ui,
                scale: parts.scale,
                state: parts.state,
                last_move: Mutex::new(None),
                clicks: Mutex::new(ClickCounter::new(parts.click_slots, interval)),
            }),
        }
    }

    /// Forward one raw notification from the engine. Returns `false` if it was dropped
    /// as a duplicate move.
    pub fn forward(&self, raw: RawInput) -> bool {
        let Some(raw) = self.classify(raw) else {
            return false;
        };

        let inner = self.inner.clone();
        self.inner.ui.run_on_ui_thread(Box::new(move || inner.dispatch(raw)));
        true
    }

    /// Drop repeated moves to the same spot and turn moves with the primary button held
    /// into drags. Anything but a move passes untouched.
    fn classify(&self, mut raw: RawInput) -> Option<RawInput> {
        if raw.kind != RawInputKind::Moved {
            return Some(raw);
        }

        let pos = (raw.screen_x, raw.screen_y);
        {
            let mut last = self.inner.last_move.lock().unwrap_or_else(PoisonError::into_inner);
            if *last == Some(pos) {
                return None;
            }
            *last = Some(pos);
        }

        if raw.modifiers.contains(Modifiers::BUTTON1_DOWN) {
            raw.kind = RawInputKind::Dragged;
        }
        Some(raw)
    }
}

impl BridgeInner {
    fn dispatch(&self, raw: RawInput) {
        if self.state.get().is_inert() {
            return;
        }
        let Some(screen) = self.container.screen_info() else {
            log::debug!("dropping {:?}: container is not in a root window", raw.kind);
            return;
        };

        let (x, y) = to_root_coordinates(self.transform, self.scale.get(), &screen, &raw);
        let now = self.toolkit.now_ms();

        let Some(kind) = raw.kind.mouse_kind() else {
            self.toolkit.post_input_event(HostInputEvent::Wheel(WheelInput {
                x,
                y,
                modifiers: raw.modifiers,
                scroll_type: ScrollType::Unit,
                scroll_amount: self.wheel_scroll_units,
                rotation: if raw.button > 0 { 1 } else { -1 },
                timestamp_ms: now,
            }));
            return;
        };

        let click_count = {
            let mut clicks = self.clicks.lock().unwrap_or_else(PoisonError::into_inner);
            if raw.kind == RawInputKind::Pressed {
                // the desktop setting can change while the host is running
                clicks.set_interval(
                    self.toolkit.multi_click_interval().unwrap_or(self.default_interval),
                );
            }
            clicks.register(raw.button, raw.kind, now)
        };

        let event = MouseInput {
            kind,
            x,
            y,
            screen_x: raw.screen_x,
            screen_y: raw.screen_y,
            modifiers: raw.modifiers,
            button: raw.button,
            click_count,
            timestamp_ms: now,
        };
        self.toolkit.post_input_event(HostInputEvent::Mouse(event));

        if raw.kind == RawInputKind::Released {
            self.toolkit.post_input_event(HostInputEvent::Mouse(MouseInput {
                kind: crate::input::MouseEventKind::Clicked,
                ..event
            }));
        }
    }
}

/// Map a device-pixel screen position into logical coordinates relative to the root window.
fn to_root_coordinates(
    transform: InputTransform,
    scale: ScaleFactor,
    screen: &ScreenInfo,
    raw: &RawInput,
) -> (i32, i32) {
    let s = scale.get();
    let root = screen.root_origin;
    match transform {
        InputTransform::ScaleFirst => (
            (raw.screen_x as f64 / s).round() as i32 - root.x,
            (raw.screen_y as f64 / s).round() as i32 - root.y,
        ),
        InputTransform::PreserveDeviceOrigin => {
            let dev = screen.display_bounds;
            (
                dev.x + ((raw.screen_x - dev.x) as f64 / s).round() as i32 - root.x,
                dev.y + ((raw.screen_y - dev.y) as f64 / s).round() as i32 - root.y,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{LogicalPoint, LogicalRect};
    use crate::input::MouseEventKind;
    use crate::lifecycle::LifecycleState;
    use crate::testing::{TestContainer, TestToolkit};
    use crate::ui::{ui_channel, UiReceiver};

    struct Fixture {
        bridge: InputEventBridge,
        toolkit: Arc<TestToolkit>,
        container: Arc<TestContainer>,
        scale: Arc<SharedScale>,
        state: Arc<SharedState>,
        ui: UiReceiver,
    }

    fn fixture(transform: InputTransform) -> Fixture {
        let toolkit = Arc::new(TestToolkit::new());
        let container = Arc::new(TestContainer::new(0, 0, 800, 600));
        let scale = Arc::new(SharedScale::default());
        let state = Arc::new(SharedState::default());
        let (tx, ui) = ui_channel();
        let bridge = InputEventBridge::new(InputBridgeParts {
            transform,
            wheel_scroll_units: 3,
            click_slots: 5,
            default_multi_click_interval: Duration::from_millis(500),
            toolkit: toolkit.clone(),
            container: container.clone(),
            ui: tx,
            scale: scale.clone(),
            state: state.clone(),
        });
        Fixture { bridge, toolkit, container, scale, state, ui }
    }

    fn raw(kind: RawInputKind, x: i32, y: i32) -> RawInput {
        RawInput::new(kind, x, y, Modifiers::empty(), 1)
    }

    fn mouse(e: &HostInputEvent) -> MouseInput {
        match e {
            HostInputEvent::Mouse(m) => *m,
            other => panic!("expected mouse event, got {other:?}"),
        }
    }

    #[test]
    fn nothing_is_posted_before_the_ui_queue_runs() {
        let mut f = fixture(InputTransform::ScaleFirst);
        assert!(f.bridge.forward(raw(RawInputKind::Moved, 10, 10)));
        assert!(f.toolkit.posted().is_empty());
        f.ui.drain();
        assert_eq!(f.toolkit.posted().len(), 1);
    }

    #[test]
    fn repeated_moves_are_suppressed() {
        let mut f = fixture(InputTransform::ScaleFirst);
        assert!(f.bridge.forward(raw(RawInputKind::Moved, 10, 10)));
        assert!(!f.bridge.forward(raw(RawInputKind::Moved, 10, 10)));
        assert!(f.bridge.forward(raw(RawInputKind::Moved, 11, 10)));
        f.ui.drain();
        assert_eq!(f.toolkit.posted().len(), 2);
    }

    #[test]
    fn presses_and_drags_are_never_suppressed() {
        let mut f = fixture(InputTransform::ScaleFirst);
        f.bridge.forward(raw(RawInputKind::Moved, 10, 10));
        assert!(f.bridge.forward(raw(RawInputKind::Pressed, 10, 10)));
        assert!(f.bridge.forward(raw(RawInputKind::Pressed, 10, 10)));
        assert!(f.bridge.forward(raw(RawInputKind::Dragged, 10, 10)));
        assert!(f.bridge.forward(raw(RawInputKind::Dragged, 10, 10)));
        assert!(f.bridge.forward(raw(RawInputKind::Released, 10, 10)));
        f.ui.drain();
        // move + 2 presses + 2 drags + release + clicked
        assert_eq!(f.toolkit.posted().len(), 7);
    }

    #[test]
    fn move_with_primary_button_becomes_drag() {
        let mut f = fixture(InputTransform::ScaleFirst);
        f.bridge.forward(RawInput::new(RawInputKind::Moved, 5, 5, Modifiers::BUTTON1_DOWN, 0));
        f.bridge.forward(RawInput::new(RawInputKind::Moved, 6, 5, Modifiers::BUTTON3_DOWN, 0));
        f.ui.drain();
        let posted = f.toolkit.posted();
        assert_eq!(mouse(&posted[0]).kind, MouseEventKind::Dragged);
        assert_eq!(mouse(&posted[1]).kind, MouseEventKind::Moved);
    }

    #[test]
    fn release_is_followed_by_clicked_with_same_count() {
        let mut f = fixture(InputTransform::ScaleFirst);
        f.toolkit.set_now_ms(1_000);
        f.bridge.forward(raw(RawInputKind::Pressed, 10, 10));
        f.bridge.forward(raw(RawInputKind::Released, 10, 10));
        f.ui.drain();
        f.toolkit.set_now_ms(1_100);
        f.bridge.forward(raw(RawInputKind::Pressed, 10, 10));
        f.bridge.forward(raw(RawInputKind::Released, 10, 10));
        f.ui.drain();

        let kinds: Vec<_> = f.toolkit.posted().iter().map(|e| mouse(e)).map(|m| (m.kind, m.click_count)).collect();
        assert_eq!(
            kinds,
            vec![
                (MouseEventKind::Pressed, 1),
                (MouseEventKind::Released, 1),
                (MouseEventKind::Clicked, 1),
                (MouseEventKind::Pressed, 2),
                (MouseEventKind::Released, 2),
                (MouseEventKind::Clicked, 2),
            ]
        );
    }

    #[test]
    fn toolkit_interval_is_used_for_click_counting() {
        let mut f = fixture(InputTransform::ScaleFirst);
        f.toolkit.set_multi_click_interval(Some(Duration::from_millis(50)));
        f.toolkit.set_now_ms(1_000);
        f.bridge.forward(raw(RawInputKind::Pressed, 10, 10));
        f.ui.drain();
        f.toolkit.set_now_ms(1_100);
        f.bridge.forward(raw(RawInputKind::Pressed, 10, 10));
        f.ui.drain();
        assert_eq!(mouse(&f.toolkit.posted()[1]).click_count, 1);
    }

    #[test]
    fn wheel_becomes_unit_scroll() {
        let mut f = fixture(InputTransform::ScaleFirst);
        f.bridge.forward(RawInput::new(RawInputKind::Wheel, 10, 20, Modifiers::empty(), 1));
        f.bridge.forward(RawInput::new(RawInputKind::Wheel, 10, 20, Modifiers::empty(), -4));
        f.ui.drain();
        let posted = f.toolkit.posted();
        assert_eq!(
            posted[0],
            HostInputEvent::Wheel(WheelInput {
                x: 10,
                y: 20,
                modifiers: Modifiers::empty(),
                scroll_type: ScrollType::Unit,
                scroll_amount: 3,
                rotation: 1,
                timestamp_ms: f.toolkit.now_ms(),
            })
        );
        match posted[1] {
            HostInputEvent::Wheel(w) => assert_eq!(w.rotation, -1),
            other => panic!("expected wheel, got {other:?}"),
        }
    }

    #[test]
    fn wheel_coordinates_follow_the_scale() {
        let mut f = fixture(InputTransform::ScaleFirst);
        f.scale.set(ScaleFactor::new(2.0).unwrap());
        f.bridge.forward(RawInput::new(RawInputKind::Wheel, 20, 40, Modifiers::empty(), 1));
        f.ui.drain();
        match f.toolkit.posted()[0] {
            HostInputEvent::Wheel(w) => assert_eq!((w.x, w.y, w.rotation, w.scroll_amount), (10, 20, 1, 3)),
            other => panic!("expected wheel, got {other:?}"),
        }
    }

    #[test]
    fn scale_first_makes_coordinates_root_relative() {
        let mut f = fixture(InputTransform::ScaleFirst);
        f.scale.set(ScaleFactor::new(2.0).unwrap());
        f.container.set_screen_info(Some(ScreenInfo {
            root_origin: LogicalPoint::new(100, 50),
            display_bounds: LogicalRect::new(0, 0, 1920, 1080),
        }));
        f.bridge.forward(raw(RawInputKind::Pressed, 301, 201));
        f.ui.drain();
        let m = mouse(&f.toolkit.posted()[0]);
        // 301 / 2 = 150.5 rounds to 151
        assert_eq!((m.x, m.y), (51, 51));
        assert_eq!((m.screen_x, m.screen_y), (301, 201));
    }

    #[test]
    fn device_origin_is_preserved_on_secondary_display() {
        let mut f = fixture(InputTransform::PreserveDeviceOrigin);
        f.scale.set(ScaleFactor::new(2.0).unwrap());
        f.container.set_screen_info(Some(ScreenInfo {
            root_origin: LogicalPoint::new(1_950, 10),
            display_bounds: LogicalRect::new(1_920, 0, 1280, 720),
        }));
        f.bridge.forward(raw(RawInputKind::Pressed, 2_020, 40));
        f.ui.drain();
        let m = mouse(&f.toolkit.posted()[0]);
        // 1920 + (100 / 2) - 1950, 0 + (40 / 2) - 10
        assert_eq!((m.x, m.y), (20, 10));
    }

    #[test]
    fn input_without_root_window_is_dropped() {
        let mut f = fixture(InputTransform::ScaleFirst);
        f.container.set_screen_info(None);
        f.bridge.forward(raw(RawInputKind::Pressed, 1, 1));
        f.ui.drain();
        assert!(f.toolkit.posted().is_empty());
    }

    #[test]
    fn queued_input_is_dropped_after_detach_or_close() {
        let mut f = fixture(InputTransform::ScaleFirst);
        for state in [LifecycleState::Detached, LifecycleState::Closed] {
            f.bridge.forward(raw(RawInputKind::Pressed, 1, 1));
            f.state.set(state);
            f.ui.drain();
        }
        assert!(f.toolkit.posted().is_empty());
    }
}
