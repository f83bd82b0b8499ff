//! Host backend implementations.
//!
//! The synthetic host drives the widget without a display: tests and the
//! CLI push events through [`SyntheticEvents`] and arrange focus, text and
//! selection state on [`SyntheticDocument`].

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use peeper_common::error::{PeeperError, PeeperResult};
use peeper_common::sync::lock;
use peeper_platform_core::{
    Document, ElementInfo, EventSource, FontSpec, Host, Listener, NodeId, SubscriptionId,
    WidgetSurface,
};
use peeper_widget_model::{Channel, ElementId, HostEvent, Rect};

/// Glyph width of the synthetic font, in ems.
const SYNTHETIC_GLYPH_EM: f64 = 0.5;

/// In-memory event surface.
#[derive(Default)]
pub struct SyntheticEvents {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(SubscriptionId, Channel, Listener)>>,
    dispatched: AtomicU64,
}

impl SyntheticEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `event` to every listener on its channel. Returns the number
    /// of listeners invoked.
    pub fn dispatch(&self, event: &HostEvent) -> usize {
        let channel = event.channel();
        // Snapshot so listeners may (un)subscribe while being called.
        let targets: Vec<Listener> = lock(&self.listeners)
            .iter()
            .filter(|(_, c, _)| *c == channel)
            .map(|(_, _, listener)| listener.clone())
            .collect();

        for listener in &targets {
            listener(event);
        }
        self.dispatched.fetch_add(1, Ordering::Relaxed);
        targets.len()
    }

    pub fn listener_count(&self, channel: Channel) -> usize {
        lock(&self.listeners)
            .iter()
            .filter(|(_, c, _)| *c == channel)
            .count()
    }

    pub fn total_listeners(&self) -> usize {
        lock(&self.listeners).len()
    }

    /// Events dispatched so far, delivered or not.
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }
}

impl EventSource for SyntheticEvents {
    fn subscribe(&self, channel: Channel, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.listeners).push((id, channel, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = lock(&self.listeners);
        let before = listeners.len();
        listeners.retain(|(existing, _, _)| *existing != id);
        listeners.len() != before
    }
}

#[derive(Debug, Default)]
struct DocumentState {
    elements: BTreeMap<ElementId, ElementInfo>,
    focused: Option<ElementId>,
    selection: Option<Rect>,
    hover: Option<bool>,
    nodes: HashMap<NodeId, FontSpec>,
    next_node: u64,
    nodes_created: u64,
    fail_nodes: bool,
    fail_measure: bool,
}

/// In-memory document with a fixed-pitch synthetic font.
#[derive(Debug)]
pub struct SyntheticDocument {
    state: Mutex<DocumentState>,
}

impl Default for SyntheticDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticDocument {
    /// An empty, hover-capable document.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(DocumentState {
                hover: Some(true),
                ..DocumentState::default()
            }),
        }
    }

    pub fn insert_element(&self, element: ElementInfo) {
        lock(&self.state).elements.insert(element.id, element);
    }

    /// Replace a text field's value and caret. Returns `false` for unknown ids.
    pub fn set_text(&self, id: ElementId, value: &str, caret: Option<usize>) -> bool {
        match lock(&self.state).elements.get_mut(&id) {
            Some(element) => {
                element.value = value.to_string();
                element.selection_start = caret;
                true
            }
            None => false,
        }
    }

    /// Move an element (layout shift).
    pub fn set_rect(&self, id: ElementId, rect: Rect) -> bool {
        match lock(&self.state).elements.get_mut(&id) {
            Some(element) => {
                element.rect = rect;
                true
            }
            None => false,
        }
    }

    pub fn set_focus(&self, id: Option<ElementId>) {
        lock(&self.state).focused = id;
    }

    pub fn focused(&self) -> Option<ElementId> {
        lock(&self.state).focused
    }

    pub fn set_selection(&self, rect: Option<Rect>) {
        lock(&self.state).selection = rect;
    }

    pub fn set_hover_capable(&self, hover: Option<bool>) {
        lock(&self.state).hover = hover;
    }

    /// Make `create_measure_node` fail.
    pub fn fail_measure_nodes(&self, fail: bool) {
        lock(&self.state).fail_nodes = fail;
    }

    /// Make `measure_text` fail.
    pub fn fail_measure_text(&self, fail: bool) {
        lock(&self.state).fail_measure = fail;
    }

    /// Measurement nodes currently attached.
    pub fn live_nodes(&self) -> usize {
        lock(&self.state).nodes.len()
    }

    /// Measurement nodes ever created.
    pub fn nodes_created(&self) -> u64 {
        lock(&self.state).nodes_created
    }
}

impl Document for SyntheticDocument {
    fn active_element(&self) -> Option<ElementInfo> {
        let state = lock(&self.state);
        state
            .focused
            .and_then(|id| state.elements.get(&id).cloned())
    }

    fn element(&self, id: ElementId) -> Option<ElementInfo> {
        lock(&self.state).elements.get(&id).cloned()
    }

    fn selection_range_rect(&self) -> Option<Rect> {
        lock(&self.state).selection
    }

    fn hover_capable(&self) -> Option<bool> {
        lock(&self.state).hover
    }

    fn create_measure_node(&self, font: &FontSpec) -> PeeperResult<NodeId> {
        let mut state = lock(&self.state);
        if state.fail_nodes {
            return Err(PeeperError::measurement("synthetic node creation disabled"));
        }
        let id = NodeId(state.next_node);
        state.next_node += 1;
        state.nodes_created += 1;
        state.nodes.insert(id, font.clone());
        tracing::trace!(node = id.0, font = %font.shorthand(), "Measurement node attached");
        Ok(id)
    }

    fn measure_text(&self, node: NodeId, text: &str) -> PeeperResult<f64> {
        let state = lock(&self.state);
        if state.fail_measure {
            return Err(PeeperError::measurement("synthetic text measurement disabled"));
        }
        let font = state
            .nodes
            .get(&node)
            .ok_or_else(|| PeeperError::measurement(format!("unknown node {}", node.0)))?;
        Ok(text.chars().count() as f64 * font.size_px * SYNTHETIC_GLYPH_EM)
    }

    fn remove_node(&self, node: NodeId) {
        lock(&self.state).nodes.remove(&node);
    }
}

/// A synthetic event surface and document, with helpers that keep both
/// consistent the way a real host would.
#[derive(Clone, Default)]
pub struct SyntheticHost {
    pub events: Arc<SyntheticEvents>,
    pub document: Arc<SyntheticDocument>,
}

impl SyntheticHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle with a paint surface into a [`Host`].
    pub fn host(&self, surface: Arc<dyn WidgetSurface>) -> Host {
        Host::new(self.events.clone(), self.document.clone(), surface)
    }

    pub fn pointer_move(&self, x: f64, y: f64) -> usize {
        self.events.dispatch(&HostEvent::pointer_move(x, y))
    }

    pub fn click(&self, x: f64, y: f64) -> usize {
        self.events.dispatch(&HostEvent::click(x, y))
    }

    /// Move focus to `id`, blurring the previous element first.
    pub fn focus(&self, id: ElementId) {
        self.blur();
        self.document.set_focus(Some(id));
        self.events.dispatch(&HostEvent::Focus { target: id });
    }

    /// Blur the focused element, if any.
    pub fn blur(&self) {
        if let Some(previous) = self.document.focused() {
            self.document.set_focus(None);
            self.events.dispatch(&HostEvent::Blur { target: previous });
        }
    }

    /// Edit a field's text and release a key in it.
    pub fn type_text(&self, id: ElementId, value: &str, caret: Option<usize>) {
        self.document.set_text(id, value, caret);
        self.events.dispatch(&HostEvent::key_up("KeyA"));
    }

    pub fn key_up(&self, code: &str) -> usize {
        self.events.dispatch(&HostEvent::key_up(code))
    }

    /// Flip the hover trait and notify listeners.
    pub fn set_hover(&self, hover: bool) {
        self.document.set_hover_capable(Some(hover));
        self.events.dispatch(&HostEvent::HoverChange { hover });
    }
}
