//! `peeper simulate` - replay a scripted session against a synthetic host.
//!
//! A scenario lists the page elements, where the widget sits, and timed
//! steps. Steps run on a paused tokio clock, so a ten-second scenario
//! with blinking replays instantly and with exact timestamps.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Deserialize;

use peeper_common::clock::{FrameClock, MountClock};
use peeper_common::config::{AppConfig, DEFAULT_WIDGET_SIZE};
use peeper_common::error::{PeeperError, PeeperResult};
use peeper_common::sync::lock;
use peeper_input_tracker::backends::SyntheticHost;
use peeper_platform_core::ElementInfo;
use peeper_processing_core::blink::BlinkTiming;
use peeper_render_engine::writer::{FrameLogHeader, FrameWriter};
use peeper_render_engine::{FrameObserver, RecordingSurface};
use peeper_widget_engine::{EyeWidget, WidgetOptions};
use peeper_widget_model::{ElementId, PupilFrame, Rect};

const FRAME_LOG_SCHEMA: &str = "1.0";

/// A scripted session.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Widget diameter; the configured size when omitted.
    #[serde(default)]
    pub size: Option<f64>,

    /// Widget container rectangle in page pixels.
    pub container: Rect,

    /// Answer to the hover-capability query. `null` means unsupported.
    #[serde(default = "default_hover")]
    pub hover_capable: Option<bool>,

    #[serde(default)]
    pub elements: Vec<ElementInfo>,

    /// Keep running (and blinking) until this time even after the last step.
    #[serde(default)]
    pub duration_ms: Option<u64>,

    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_hover() -> Option<bool> {
    Some(true)
}

/// An action at a point in time, in ms since mount.
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub t: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    PointerMove {
        x: f64,
        y: f64,
    },
    Click {
        x: f64,
        y: f64,
    },
    Focus {
        element: ElementId,
    },
    Blur,
    /// Replace a field's text and release a key in it. The caret defaults
    /// to the end of the new text; the field is focused first if needed.
    Type {
        element: ElementId,
        value: String,
        #[serde(default)]
        caret: Option<usize>,
    },
    KeyUp {
        code: String,
    },
    /// Selection rectangle reported for content-editable regions.
    Select {
        rect: Option<Rect>,
    },
    Hover {
        hover: bool,
    },
    MoveElement {
        element: ElementId,
        rect: Rect,
    },
    MoveContainer {
        rect: Rect,
    },
    Resize {
        size: f64,
    },
}

impl Scenario {
    pub fn load(path: &Path) -> PeeperResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(json: &str) -> PeeperResult<Self> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> PeeperResult<()> {
        if let Some(size) = self.size {
            check_size(size)?;
        }

        let mut last = 0;
        for (i, step) in self.steps.iter().enumerate() {
            if step.t < last {
                return Err(PeeperError::script(format!(
                    "step {i} at t={} comes before the previous step at t={last}",
                    step.t
                )));
            }
            last = step.t;

            let referenced = match &step.action {
                Action::Focus { element }
                | Action::Type { element, .. }
                | Action::MoveElement { element, .. } => Some(*element),
                Action::Resize { size } => {
                    check_size(*size)?;
                    None
                }
                _ => None,
            };
            if let Some(id) = referenced {
                if !self.elements.iter().any(|e| e.id == id) {
                    return Err(PeeperError::script(format!(
                        "step {i} references unknown element {}",
                        id.0
                    )));
                }
            }
        }
        Ok(())
    }

    /// Time at which the replay stops.
    pub fn end_ms(&self) -> u64 {
        let last_step = self.steps.last().map_or(0, |s| s.t);
        last_step.max(self.duration_ms.unwrap_or(0))
    }
}

fn check_size(size: f64) -> PeeperResult<()> {
    if !size.is_finite() || size <= 0.0 {
        return Err(PeeperError::script(format!(
            "size must be a positive number, got {size}"
        )));
    }
    Ok(())
}

/// Frame timestamps from the tokio clock, which is virtual while paused.
struct TokioClock {
    start: tokio::time::Instant,
}

impl TokioClock {
    fn start() -> Self {
        Self {
            start: tokio::time::Instant::now(),
        }
    }
}

impl FrameClock for TokioClock {
    fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Outcome of a replay.
#[derive(Debug)]
pub struct Replay {
    pub frames: Vec<PupilFrame>,
    pub subscriptions_released: usize,
    pub events_dispatched: u64,
}

/// Replay `scenario` on a paused current-thread runtime.
pub fn replay(
    scenario: &Scenario,
    blink: BlinkTiming,
    seed: Option<u64>,
) -> PeeperResult<Replay> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()?;
    Ok(runtime.block_on(replay_steps(scenario, blink, seed)))
}

async fn replay_steps(scenario: &Scenario, blink: BlinkTiming, seed: Option<u64>) -> Replay {
    let host = SyntheticHost::new();
    for element in &scenario.elements {
        host.document.insert_element(element.clone());
    }
    host.document.set_hover_capable(scenario.hover_capable);

    let surface = Arc::new(RecordingSurface::new(scenario.container));
    let frames = Arc::new(Mutex::new(Vec::new()));
    let log = frames.clone();
    let observer: FrameObserver = Arc::new(move |frame: &PupilFrame| {
        lock(&log).push(*frame);
    });

    let clock = Arc::new(TokioClock::start());
    let start = clock.start;
    let options = WidgetOptions::new(scenario.size.unwrap_or(DEFAULT_WIDGET_SIZE))
        .with_blink(blink)
        .with_blink_seed(seed)
        .with_clock(clock)
        .with_observer(observer);
    let mut widget = EyeWidget::mount(host.host(surface.clone()), options);

    for step in &scenario.steps {
        tokio::time::sleep_until(start + Duration::from_millis(step.t)).await;
        tracing::debug!(t = step.t, action = ?step.action, "Replaying step");
        apply(&host, &surface, &mut widget, &step.action);
    }
    tokio::time::sleep_until(start + Duration::from_millis(scenario.end_ms())).await;

    let teardown = widget.unmount();
    let frames = std::mem::take(&mut *lock(&frames));
    Replay {
        frames,
        subscriptions_released: teardown.subscriptions_released,
        events_dispatched: host.events.dispatched(),
    }
}

fn apply(
    host: &SyntheticHost,
    surface: &RecordingSurface,
    widget: &mut EyeWidget,
    action: &Action,
) {
    match action {
        Action::PointerMove { x, y } => {
            host.pointer_move(*x, *y);
        }
        Action::Click { x, y } => {
            host.click(*x, *y);
        }
        Action::Focus { element } => host.focus(*element),
        Action::Blur => host.blur(),
        Action::Type {
            element,
            value,
            caret,
        } => {
            if host.document.focused() != Some(*element) {
                host.focus(*element);
            }
            let caret = caret.unwrap_or_else(|| value.chars().count());
            host.type_text(*element, value, Some(caret));
        }
        Action::KeyUp { code } => {
            host.key_up(code);
        }
        Action::Select { rect } => host.document.set_selection(*rect),
        Action::Hover { hover } => host.set_hover(*hover),
        Action::MoveElement { element, rect } => {
            host.document.set_rect(*element, *rect);
        }
        Action::MoveContainer { rect } => surface.set_container_rect(*rect),
        Action::Resize { size } => {
            widget.reconfigure(*size);
        }
    }
}

pub fn run(
    path: &Path,
    output: Option<&Path>,
    seed: Option<u64>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    config.blink.validate()?;
    let mut scenario = Scenario::load(path)?;
    let size = scenario.size.unwrap_or(config.widget.size);
    scenario.size = Some(size);

    tracing::info!(
        path = %path.display(),
        steps = scenario.steps.len(),
        end_ms = scenario.end_ms(),
        "Replaying scenario"
    );
    let replay = replay(&scenario, BlinkTiming::from(&config.blink), seed)?;

    match output {
        Some(output) => {
            let header = FrameLogHeader {
                schema_version: FRAME_LOG_SCHEMA.to_string(),
                size,
                epoch_wall: MountClock::start().epoch_wall().to_string(),
            };
            let mut writer = FrameWriter::create(output, &header)?;
            for frame in &replay.frames {
                writer.write_frame(frame)?;
            }
            writer.flush()?;
            println!(
                "Wrote {} frames to {}",
                writer.frames_written(),
                writer.path().display()
            );
        }
        None => {
            for frame in &replay.frames {
                println!("{}", serde_json::to_string(frame)?);
            }
        }
    }

    let blinks = replay
        .frames
        .windows(2)
        .filter(|w| !w[0].blink.is_blinking && w[1].blink.is_blinking)
        .count();
    eprintln!(
        "{} frames, {} blinks, {} events dispatched, {} subscriptions released",
        replay.frames.len(),
        blinks,
        replay.events_dispatched,
        replay.subscriptions_released
    );

    Ok(())
}
