//! The mounted eye widget.

use std::sync::{Arc, Mutex};

use peeper_common::clock::{FrameClock, MountClock};
use peeper_common::config::{AppConfig, DEFAULT_WIDGET_SIZE};
use peeper_common::sync::lock;
use peeper_input_tracker::{InputTracker, TargetSink};
use peeper_platform_core::{Host, WidgetSurface};
use peeper_processing_core::blink::{
    BlinkCycle, BlinkHandle, BlinkScheduler, BlinkSink, BlinkTiming,
};
use peeper_processing_core::gaze;
use peeper_render_engine::{FrameObserver, Renderer};
use peeper_widget_model::{CapabilityMode, Point2D, PupilFrame};

/// Everything needed to mount a widget besides the host.
#[derive(Clone)]
pub struct WidgetOptions {
    /// Logical diameter in pixels.
    pub size: f64,
    pub blink: BlinkTiming,
    /// Fixed seed for blink intervals; `None` draws from OS entropy.
    pub blink_seed: Option<u64>,
    pub clock: Arc<dyn FrameClock>,
    pub observer: Option<FrameObserver>,
}

impl WidgetOptions {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            blink: BlinkTiming::default(),
            blink_seed: None,
            clock: Arc::new(MountClock::start()),
            observer: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            blink: BlinkTiming::from(&config.blink),
            ..Self::new(config.widget.size)
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn FrameClock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_observer(mut self, observer: FrameObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_blink(mut self, blink: BlinkTiming) -> Self {
        self.blink = blink;
        self
    }

    pub fn with_blink_seed(mut self, seed: Option<u64>) -> Self {
        self.blink_seed = seed;
        self
    }
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self::new(DEFAULT_WIDGET_SIZE)
    }
}

impl std::fmt::Debug for WidgetOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetOptions")
            .field("size", &self.size)
            .field("blink", &self.blink)
            .field("blink_seed", &self.blink_seed)
            .field("observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

/// Lifecycle state of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Mounted,
    Unmounted,
}

/// What a teardown released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Teardown {
    pub subscriptions_released: usize,
    pub blink_cancelled: bool,
}

/// Converts tracker targets into painted offsets.
struct GazeSink {
    surface: Arc<dyn WidgetSurface>,
    renderer: Arc<Mutex<Renderer>>,
    size: f64,
}

impl TargetSink for GazeSink {
    fn look_at(&self, target: Point2D) {
        // Layout can shift between events, so the container is re-read here.
        let container = self.surface.container_rect();
        let offset = gaze::solve(&container, target, self.size);
        lock(&self.renderer).set_offset(offset);
    }

    fn recenter(&self) {
        lock(&self.renderer).reset_offsets();
    }
}

struct Mounted {
    tracker: InputTracker,
    blink: Option<BlinkHandle>,
    renderer: Arc<Mutex<Renderer>>,
}

impl Mounted {
    /// Mount a fresh subscription set. `carried` is the previous set's
    /// gaze target, re-solved at the new size.
    fn start(host: &Host, options: &WidgetOptions, carried: Option<Point2D>) -> Self {
        let mut renderer =
            Renderer::new(host.surface.clone(), options.clock.clone(), options.size);
        if let Some(observer) = &options.observer {
            renderer = renderer.with_observer(observer.clone());
        }
        renderer.paint();
        let renderer = Arc::new(Mutex::new(renderer));

        let sink = Arc::new(GazeSink {
            surface: host.surface.clone(),
            renderer: renderer.clone(),
            size: options.size,
        });
        let tracker = InputTracker::start(host.events.clone(), host.document.clone(), sink);
        if let Some(target) = carried {
            tracker.restore_target(target);
        }

        let blink_renderer = renderer.clone();
        let blink_sink: BlinkSink = Arc::new(move |state| {
            lock(&blink_renderer).set_blink(state);
        });
        let started = match options.blink_seed {
            Some(seed) => {
                BlinkScheduler::start_with(BlinkCycle::seeded(options.blink, seed), blink_sink)
            }
            None => BlinkScheduler::start(options.blink, blink_sink),
        };
        let blink = match started {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(error = %e, "Blinking disabled");
                None
            }
        };

        Self {
            tracker,
            blink,
            renderer,
        }
    }

    fn stop(mut self) -> (Teardown, Option<PupilFrame>) {
        let blink_cancelled = self.blink.as_mut().is_some_and(BlinkHandle::cancel);
        let subscriptions_released = self.tracker.dispose();
        let frame = lock(&self.renderer).last_frame();
        (
            Teardown {
                subscriptions_released,
                blink_cancelled,
            },
            frame,
        )
    }
}

/// An animated pair of eyes mounted on a host.
///
/// The widget never reports errors to its host: failures are logged and
/// the widget degrades (eyes centered, tracking suspended).
pub struct EyeWidget {
    host: Host,
    options: WidgetOptions,
    mounted: Option<Mounted>,
    /// Last frame painted before the most recent teardown.
    retained: Option<PupilFrame>,
}

impl EyeWidget {
    /// Mount on `host`. Blinking needs an ambient tokio runtime; without
    /// one the widget still tracks gaze.
    pub fn mount(host: Host, options: WidgetOptions) -> Self {
        let options = sanitize(options);
        tracing::info!(size = options.size, "Mounting eye widget");
        let mounted = Mounted::start(&host, &options, None);
        Self {
            host,
            options,
            mounted: Some(mounted),
            retained: None,
        }
    }

    /// Change the size: tear down every subscription and the blink timer,
    /// then subscribe afresh. An unmounted widget only records the size.
    pub fn reconfigure(&mut self, size: f64) -> Teardown {
        let mut options = self.options.clone();
        options.size = size;
        self.options = sanitize(options);

        match self.mounted.take() {
            Some(mounted) => {
                let carried = mounted.tracker.last_target();
                let (teardown, frame) = mounted.stop();
                self.retained = frame;
                tracing::info!(
                    size = self.options.size,
                    released = teardown.subscriptions_released,
                    "Reconfiguring eye widget"
                );
                self.mounted = Some(Mounted::start(&self.host, &self.options, carried));
                teardown
            }
            None => {
                tracing::debug!(size = self.options.size, "Reconfigured unmounted widget");
                Teardown::default()
            }
        }
    }

    /// Release everything. Later calls release nothing.
    pub fn unmount(&mut self) -> Teardown {
        match self.mounted.take() {
            Some(mounted) => {
                let (teardown, frame) = mounted.stop();
                self.retained = frame;
                tracing::info!(
                    released = teardown.subscriptions_released,
                    blink_cancelled = teardown.blink_cancelled,
                    "Unmounted eye widget"
                );
                teardown
            }
            None => Teardown::default(),
        }
    }

    pub fn state(&self) -> WidgetState {
        if self.mounted.is_some() {
            WidgetState::Mounted
        } else {
            WidgetState::Unmounted
        }
    }

    pub fn size(&self) -> f64 {
        self.options.size
    }

    /// Last painted frame (retained across unmount).
    pub fn frame(&self) -> Option<PupilFrame> {
        match &self.mounted {
            Some(mounted) => lock(&mounted.renderer).last_frame(),
            None => self.retained,
        }
    }

    pub fn capability(&self) -> Option<CapabilityMode> {
        self.mounted.as_ref().map(|m| m.tracker.capability())
    }

    pub fn last_target(&self) -> Option<Point2D> {
        self.mounted.as_ref().and_then(|m| m.tracker.last_target())
    }

    /// Live host subscriptions held by this widget.
    pub fn subscription_count(&self) -> usize {
        self.mounted
            .as_ref()
            .map_or(0, |m| m.tracker.subscription_count())
    }

    pub fn blink_running(&self) -> bool {
        self.mounted
            .as_ref()
            .and_then(|m| m.blink.as_ref())
            .is_some_and(BlinkHandle::is_running)
    }
}

impl Drop for EyeWidget {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn sanitize(mut options: WidgetOptions) -> WidgetOptions {
    if !options.size.is_finite() || options.size <= 0.0 {
        tracing::warn!(size = options.size, "Invalid widget size; using default");
        options.size = DEFAULT_WIDGET_SIZE;
    }
    if options.blink.min_interval_ms >= options.blink.max_interval_ms
        || options.blink.duration.is_zero()
    {
        tracing::warn!(blink = ?options.blink, "Invalid blink timing; using default");
        options.blink = BlinkTiming::default();
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_repairs_bad_options() {
        let options = sanitize(WidgetOptions::new(f64::NAN));
        assert_eq!(options.size, DEFAULT_WIDGET_SIZE);

        let mut timing = BlinkTiming::default();
        timing.max_interval_ms = timing.min_interval_ms;
        let options = sanitize(WidgetOptions::new(40.0).with_blink(timing));
        assert_eq!(options.blink, BlinkTiming::default());
        assert_eq!(options.size, 40.0);
    }

    #[test]
    fn test_options_from_config() {
        let mut config = AppConfig::default();
        config.widget.size = 50.0;
        config.blink.duration_ms = 200;
        let options = WidgetOptions::from_config(&config);
        assert_eq!(options.size, 50.0);
        assert_eq!(options.blink.duration.as_millis(), 200);
    }
}
