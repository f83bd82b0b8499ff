//! Pupil renderer.

use std::sync::Arc;

use peeper_common::clock::FrameClock;
use peeper_platform_core::WidgetSurface;
use peeper_widget_model::{
    BlinkState, Easing, Eye, EyeOffset, PupilFrame, PupilStyle, Transition, WidgetMetrics,
};

/// Called with every painted frame.
pub type FrameObserver = Arc<dyn Fn(&PupilFrame) + Send + Sync>;

/// Translation eases over this long.
pub const TRANSFORM_TRANSITION: Transition = Transition {
    duration_ms: 75,
    easing: Easing::Linear,
};

/// Closing is quick...
pub const CLOSE_TRANSITION: Transition = Transition {
    duration_ms: 100,
    easing: Easing::EaseOut,
};

/// ...reopening is slower.
pub const OPEN_TRANSITION: Transition = Transition {
    duration_ms: 200,
    easing: Easing::EaseIn,
};

/// Holds the current offset and blink state and paints both pupils.
pub struct Renderer {
    surface: Arc<dyn WidgetSurface>,
    clock: Arc<dyn FrameClock>,
    observer: Option<FrameObserver>,
    metrics: WidgetMetrics,
    offset: EyeOffset,
    blink: BlinkState,
    last_frame: Option<PupilFrame>,
    frames_painted: u64,
}

impl Renderer {
    pub fn new(surface: Arc<dyn WidgetSurface>, clock: Arc<dyn FrameClock>, size: f64) -> Self {
        Self {
            surface,
            clock,
            observer: None,
            metrics: WidgetMetrics::new(size),
            offset: EyeOffset::CENTERED,
            blink: BlinkState::OPEN,
            last_frame: None,
            frames_painted: 0,
        }
    }

    pub fn with_observer(mut self, observer: FrameObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Move both pupils.
    pub fn set_offset(&mut self, offset: EyeOffset) -> PupilFrame {
        self.offset = offset;
        self.paint()
    }

    /// Return both pupils to rest.
    pub fn reset_offsets(&mut self) -> PupilFrame {
        self.set_offset(EyeOffset::CENTERED)
    }

    /// Open or close both pupils.
    pub fn set_blink(&mut self, blink: BlinkState) -> PupilFrame {
        self.blink = blink;
        self.paint()
    }

    /// Style for one pupil at the current state.
    pub fn style_for(&self, eye: Eye) -> PupilStyle {
        PupilStyle {
            eye,
            anchor: eye.anchor(),
            translate: self.offset,
            width: self.metrics.pupil_width(),
            height: self.metrics.pupil_height(self.blink),
            transform_transition: TRANSFORM_TRANSITION,
            height_transition: if self.blink.is_blinking {
                CLOSE_TRANSITION
            } else {
                OPEN_TRANSITION
            },
        }
    }

    /// Paint both pupils with the current state.
    pub fn paint(&mut self) -> PupilFrame {
        let left = self.style_for(Eye::Left);
        let right = self.style_for(Eye::Right);
        self.surface.apply_pupil(Eye::Left, &left);
        self.surface.apply_pupil(Eye::Right, &right);

        let frame = PupilFrame {
            t_ms: self.clock.elapsed_ms(),
            size: self.metrics.size,
            offset: self.offset,
            blink: self.blink,
            left,
            right,
        };
        self.frames_painted += 1;
        self.last_frame = Some(frame);
        tracing::trace!(
            dx = frame.offset.dx,
            dy = frame.offset.dy,
            blinking = frame.blink.is_blinking,
            "Painted pupils"
        );
        if let Some(observer) = &self.observer {
            observer(&frame);
        }
        frame
    }

    pub fn offset(&self) -> EyeOffset {
        self.offset
    }

    pub fn blink(&self) -> BlinkState {
        self.blink
    }

    pub fn metrics(&self) -> WidgetMetrics {
        self.metrics
    }

    pub fn last_frame(&self) -> Option<PupilFrame> {
        self.last_frame
    }

    pub fn frames_painted(&self) -> u64 {
        self.frames_painted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use peeper_common::clock::MountClock;
    use peeper_widget_model::Rect;
    use std::sync::Mutex;

    fn renderer(size: f64) -> (Arc<RecordingSurface>, Renderer) {
        let surface = Arc::new(RecordingSurface::new(Rect::centered_square(
            100.0, 100.0, size,
        )));
        let renderer = Renderer::new(surface.clone(), Arc::new(MountClock::start()), size);
        (surface, renderer)
    }

    #[test]
    fn test_offset_applies_to_both_pupils() {
        let (surface, mut renderer) = renderer(40.0);
        renderer.set_offset(EyeOffset::new(7.2, 0.0));

        let left = surface.last_style(Eye::Left).unwrap();
        let right = surface.last_style(Eye::Right).unwrap();
        assert_eq!(left.translate, EyeOffset::new(7.2, 0.0));
        assert_eq!(right.translate, left.translate);
        assert_eq!(left.anchor, (0.35, 0.45));
        assert_eq!(right.anchor, (0.65, 0.45));
        assert_eq!(surface.paints(), 2);
    }

    #[test]
    fn test_blink_shrinks_height() {
        let (surface, mut renderer) = renderer(40.0);
        let open = renderer.paint();
        assert!((open.left.height - 6.0).abs() < 1e-9);
        assert_eq!(open.left.height_transition, OPEN_TRANSITION);

        let closed = renderer.set_blink(BlinkState::CLOSED);
        assert!((closed.left.height - 1.6).abs() < 1e-9);
        assert!((closed.right.height - 1.6).abs() < 1e-9);
        assert_eq!(closed.left.height_transition, CLOSE_TRANSITION);
        assert!((closed.left.width - 3.2).abs() < 1e-9);
        assert_eq!(surface.last_style(Eye::Right).unwrap().height, closed.right.height);
    }

    #[test]
    fn test_blink_and_offset_are_independent() {
        let (_surface, mut renderer) = renderer(40.0);
        renderer.set_offset(EyeOffset::new(1.0, 2.0));
        let frame = renderer.set_blink(BlinkState::CLOSED);
        assert_eq!(frame.offset, EyeOffset::new(1.0, 2.0));

        let frame = renderer.reset_offsets();
        assert!(frame.blink.is_blinking);
        assert!(frame.offset.is_centered());
    }

    #[test]
    fn test_observer_sees_every_frame() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let (_surface, renderer) = renderer(36.0);
        let mut renderer = renderer.with_observer(Arc::new(move |frame: &PupilFrame| {
            log.lock().unwrap().push(*frame);
        }));

        renderer.paint();
        renderer.set_blink(BlinkState::CLOSED);
        renderer.set_blink(BlinkState::OPEN);

        assert_eq!(seen.lock().unwrap().len(), 3);
        assert_eq!(renderer.frames_painted(), 3);
        assert_eq!(renderer.last_frame(), seen.lock().unwrap().last().copied());
    }
}
