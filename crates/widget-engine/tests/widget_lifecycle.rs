use std::sync::{Arc, Mutex};
use std::time::Duration;

use peeper_input_tracker::backends::SyntheticHost;
use peeper_platform_core::{ElementInfo, ElementKind, FontSpec};
use peeper_render_engine::RecordingSurface;
use peeper_widget_engine::{EyeWidget, WidgetOptions, WidgetState};
use peeper_widget_model::{
    BlinkState, Channel, ElementId, Eye, EyeOffset, HostEvent, Point2D, PupilFrame, Rect,
};

const FIELD: ElementId = ElementId(10);
const LINK: ElementId = ElementId(11);

struct Fixture {
    host: SyntheticHost,
    surface: Arc<RecordingSurface>,
    frames: Arc<Mutex<Vec<PupilFrame>>>,
}

impl Fixture {
    /// Widget container centered on (100, 100).
    fn new(size: f64) -> Self {
        let host = SyntheticHost::new();
        host.document.insert_element(
            ElementInfo::new(
                FIELD,
                ElementKind::TextInput,
                Rect::new(100.0, 400.0, 300.0, 24.0),
            )
            .with_font(FontSpec {
                family: "monospace".to_string(),
                size_px: 12.0,
                weight: 400,
            }),
        );
        host.document.insert_element(ElementInfo::new(
            LINK,
            ElementKind::Other,
            Rect::new(380.0, 80.0, 40.0, 40.0),
        ));
        let surface = Arc::new(RecordingSurface::new(Rect::centered_square(
            100.0, 100.0, size,
        )));
        Self {
            host,
            surface,
            frames: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn mount(&self, size: f64) -> EyeWidget {
        let log = self.frames.clone();
        let options = WidgetOptions::new(size).with_observer(Arc::new(move |frame: &PupilFrame| {
            log.lock().unwrap().push(*frame);
        }));
        EyeWidget::mount(self.host.host(self.surface.clone()), options)
    }

    fn frame_count(&self) -> usize {
        self.frames.lock().unwrap().len()
    }
}

fn assert_offset(actual: EyeOffset, dx: f64, dy: f64) {
    assert!(
        (actual.dx - dx).abs() < 1e-9 && (actual.dy - dy).abs() < 1e-9,
        "expected ({dx}, {dy}), got ({}, {})",
        actual.dx,
        actual.dy
    );
}

#[test]
fn mount_paints_centered_pupils() {
    let fx = Fixture::new(40.0);
    let widget = fx.mount(40.0);

    assert_eq!(widget.state(), WidgetState::Mounted);
    let frame = widget.frame().unwrap();
    assert!(frame.offset.is_centered());
    assert!(!frame.blink.is_blinking);
    assert_eq!(fx.surface.paints(), 2);
    assert_eq!(widget.subscription_count(), 6);
}

#[test]
fn saturated_pointer_target_reaches_max_offset() {
    let fx = Fixture::new(40.0);
    let widget = fx.mount(40.0);

    fx.host.pointer_move(400.0, 100.0);
    assert_offset(widget.frame().unwrap().offset, 7.2, 0.0);
    assert_offset(
        fx.surface.last_style(Eye::Left).unwrap().translate,
        7.2,
        0.0,
    );
    assert_offset(
        fx.surface.last_style(Eye::Right).unwrap().translate,
        7.2,
        0.0,
    );
}

#[test]
fn half_distance_target_is_half_damped() {
    let fx = Fixture::new(40.0);
    let widget = fx.mount(40.0);

    fx.host.click(100.0, 250.0);
    assert_offset(widget.frame().unwrap().offset, 0.0, 3.6);
}

#[test]
fn container_is_measured_on_every_event() {
    let fx = Fixture::new(40.0);
    let widget = fx.mount(40.0);

    fx.host.pointer_move(400.0, 100.0);
    assert_offset(widget.frame().unwrap().offset, 7.2, 0.0);

    // The widget scrolls so that it sits right on the pointer.
    fx.surface
        .set_container_rect(Rect::centered_square(400.0, 100.0, 40.0));
    fx.host.pointer_move(400.0, 100.0);
    assert!(widget.frame().unwrap().offset.is_centered());
}

#[test]
fn focus_and_typing_steer_the_gaze() {
    let fx = Fixture::new(40.0);
    let widget = fx.mount(40.0);

    fx.host.focus(LINK);
    // Link center is 300px right of the widget.
    assert_offset(widget.frame().unwrap().offset, 7.2, 0.0);

    fx.host.focus(FIELD);
    fx.host.type_text(FIELD, "", Some(0));
    let target = widget.last_target().unwrap();
    assert_eq!((target.x, target.y), (100.0, 412.0));
    // Straight down, 312px away: saturated.
    assert_offset(widget.frame().unwrap().offset, 0.0, 7.2);
    assert_eq!(fx.host.document.live_nodes(), 0);
}

#[test]
fn blur_leaves_gaze_in_place() {
    let fx = Fixture::new(40.0);
    let widget = fx.mount(40.0);

    fx.host.focus(LINK);
    let before = widget.frame().unwrap();
    fx.host.blur();
    assert_eq!(widget.frame().unwrap().offset, before.offset);
}

#[test]
fn touch_only_host_recenters_and_ignores_pointer() {
    let fx = Fixture::new(40.0);
    let widget = fx.mount(40.0);

    fx.host.pointer_move(400.0, 100.0);
    assert!(!widget.frame().unwrap().offset.is_centered());

    let painted = fx.frame_count();
    fx.host.set_hover(false);
    assert_eq!(fx.frame_count(), painted + 1);
    assert!(widget.frame().unwrap().offset.is_centered());
    assert!(!widget.capability().unwrap().pointer_capable);
    assert_eq!(fx.host.events.listener_count(Channel::PointerMove), 0);

    fx.host.pointer_move(100.0, 400.0);
    fx.host.click(100.0, 400.0);
    assert!(widget.frame().unwrap().offset.is_centered());

    fx.host.focus(LINK);
    assert_offset(widget.frame().unwrap().offset, 7.2, 0.0);

    fx.host.set_hover(true);
    fx.host.pointer_move(100.0, 250.0);
    assert_offset(widget.frame().unwrap().offset, 0.0, 3.6);
}

#[test]
fn touch_only_at_mount_starts_centered() {
    let fx = Fixture::new(40.0);
    fx.host.document.set_hover_capable(Some(false));
    let widget = fx.mount(40.0);

    assert_eq!(widget.subscription_count(), 4);
    assert_eq!(fx.host.pointer_move(400.0, 100.0), 0);
    assert!(widget.frame().unwrap().offset.is_centered());
}

#[test]
fn unsupported_capability_query_assumes_pointer() {
    let fx = Fixture::new(40.0);
    fx.host.document.set_hover_capable(None);
    let widget = fx.mount(40.0);

    assert!(widget.capability().unwrap().pointer_capable);
    fx.host.pointer_move(400.0, 100.0);
    assert_offset(widget.frame().unwrap().offset, 7.2, 0.0);
}

#[test]
fn events_after_unmount_are_ignored() {
    let fx = Fixture::new(40.0);
    let mut widget = fx.mount(40.0);
    fx.host.pointer_move(100.0, 250.0);

    let teardown = widget.unmount();
    assert_eq!(teardown.subscriptions_released, 6);
    assert_eq!(fx.host.events.total_listeners(), 0);
    let retained = widget.frame().unwrap();
    let painted = fx.frame_count();

    let events = [
        HostEvent::pointer_move(400.0, 100.0),
        HostEvent::click(0.0, 0.0),
        HostEvent::key_up("KeyA"),
        HostEvent::Focus { target: LINK },
        HostEvent::Blur { target: LINK },
        HostEvent::HoverChange { hover: false },
    ];
    for event in &events {
        assert_eq!(fx.host.events.dispatch(event), 0);
    }

    assert_eq!(widget.frame().unwrap(), retained);
    assert_offset(retained.offset, 0.0, 3.6);
    assert_eq!(fx.frame_count(), painted);
    assert_eq!(widget.state(), WidgetState::Unmounted);
}

#[test]
fn unmount_twice_releases_nothing_more() {
    let fx = Fixture::new(40.0);
    let mut widget = fx.mount(40.0);
    assert_eq!(widget.unmount().subscriptions_released, 6);
    assert_eq!(widget.unmount().subscriptions_released, 0);
    assert_eq!(widget.subscription_count(), 0);
}

#[test]
fn drop_releases_subscriptions() {
    let fx = Fixture::new(40.0);
    drop(fx.mount(40.0));
    assert_eq!(fx.host.events.total_listeners(), 0);
}

#[test]
fn gaze_works_without_a_runtime() {
    let fx = Fixture::new(40.0);
    let widget = fx.mount(40.0);
    assert!(!widget.blink_running());
    fx.host.pointer_move(400.0, 100.0);
    assert_offset(widget.frame().unwrap().offset, 7.2, 0.0);
}

#[test]
fn invalid_size_falls_back_to_default() {
    let fx = Fixture::new(35.0);
    let widget = fx.mount(-3.0);
    assert_eq!(widget.size(), 35.0);
    assert_eq!(widget.state(), WidgetState::Mounted);
}

#[tokio::test(start_paused = true)]
async fn reconfigure_swaps_the_whole_subscription_set() {
    let fx = Fixture::new(40.0);
    let mut widget = fx.mount(40.0);
    assert!(widget.blink_running());

    let teardown = widget.reconfigure(50.0);
    assert_eq!(teardown.subscriptions_released, 6);
    assert!(teardown.blink_cancelled);
    assert_eq!(fx.host.events.total_listeners(), 6);
    assert!(widget.blink_running());
    assert_eq!(widget.size(), 50.0);

    fx.host.pointer_move(1000.0, 100.0);
    let frame = widget.frame().unwrap();
    assert!((frame.offset.magnitude() - 9.0).abs() < 1e-9);
    assert!((frame.left.width - 4.0).abs() < 1e-9);

    let teardown = widget.unmount();
    assert_eq!(teardown.subscriptions_released, 6);
    assert!(teardown.blink_cancelled);
    assert_eq!(fx.host.events.total_listeners(), 0);
}

#[test]
fn reconfigure_keeps_the_gaze_target() {
    let fx = Fixture::new(40.0);
    let mut widget = fx.mount(40.0);

    fx.host.pointer_move(400.0, 100.0);
    assert_offset(widget.frame().unwrap().offset, 7.2, 0.0);

    widget.reconfigure(20.0);
    assert_offset(widget.frame().unwrap().offset, 3.6, 0.0);
    assert_eq!(widget.last_target(), Some(Point2D::new(400.0, 100.0)));
}

#[test]
fn reconfigure_on_touch_host_stays_centered() {
    let fx = Fixture::new(40.0);
    let mut widget = fx.mount(40.0);

    fx.host.pointer_move(400.0, 100.0);
    fx.host.set_hover(false);
    widget.reconfigure(20.0);
    assert!(widget.frame().unwrap().offset.is_centered());
}

#[tokio::test(start_paused = true)]
async fn blink_runs_beside_gaze_updates() {
    let fx = Fixture::new(40.0);
    let mut widget = fx.mount(40.0);

    fx.host.pointer_move(400.0, 100.0);
    tokio::time::sleep(Duration::from_secs(20)).await;
    fx.host.pointer_move(100.0, 250.0);

    let frames = fx.frames.lock().unwrap().clone();
    let closed: Vec<&PupilFrame> = frames.iter().filter(|f| f.blink.is_blinking).collect();
    assert!(closed.len() >= 4, "only {} blinks in 20s", closed.len());
    for frame in &closed {
        assert!((frame.left.height - 1.6).abs() < 1e-9);
        assert!((frame.right.height - 1.6).abs() < 1e-9);
        // The blink did not disturb the gaze.
        assert_offset(frame.offset, 7.2, 0.0);
    }
    assert_offset(widget.frame().unwrap().offset, 0.0, 3.6);

    widget.unmount();
    let painted = fx.frame_count();
    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(fx.frame_count(), painted);
}

#[tokio::test(start_paused = true)]
async fn eyes_reopen_after_each_blink() {
    let fx = Fixture::new(40.0);
    let _widget = fx.mount(40.0);

    tokio::time::sleep(Duration::from_secs(30)).await;
    let frames = fx.frames.lock().unwrap().clone();
    let states: Vec<BlinkState> = frames.iter().skip(1).map(|f| f.blink).collect();
    for pair in states.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
    assert_eq!(states.first(), Some(&BlinkState::CLOSED));
}
