//! In-memory paint surface.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use peeper_common::sync::lock;
use peeper_platform_core::WidgetSurface;
use peeper_widget_model::{Eye, PupilStyle, Rect};

/// A surface that remembers what was painted instead of drawing it.
///
/// The container rect can be moved at any time to emulate layout shifts.
#[derive(Debug)]
pub struct RecordingSurface {
    container: Mutex<Rect>,
    styles: Mutex<HashMap<Eye, PupilStyle>>,
    paints: AtomicU64,
}

impl RecordingSurface {
    pub fn new(container: Rect) -> Self {
        Self {
            container: Mutex::new(container),
            styles: Mutex::new(HashMap::new()),
            paints: AtomicU64::new(0),
        }
    }

    pub fn set_container_rect(&self, rect: Rect) {
        *lock(&self.container) = rect;
    }

    /// Last style painted on `eye`.
    pub fn last_style(&self, eye: Eye) -> Option<PupilStyle> {
        lock(&self.styles).get(&eye).copied()
    }

    /// Total pupil paints (two per frame).
    pub fn paints(&self) -> u64 {
        self.paints.load(Ordering::Relaxed)
    }
}

impl WidgetSurface for RecordingSurface {
    fn container_rect(&self) -> Rect {
        *lock(&self.container)
    }

    fn apply_pupil(&self, eye: Eye, style: &PupilStyle) {
        lock(&self.styles).insert(eye, *style);
        self.paints.fetch_add(1, Ordering::Relaxed);
    }
}
