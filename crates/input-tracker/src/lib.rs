//! Peeper Input Tracker
//!
//! Turns host input into gaze targets. The tracker subscribes to the
//! host's event surface and resolves a target point per event:
//!
//! - **Pointer move / click:** the event's screen position (hover-capable hosts only)
//! - **Key-up:** the caret of the focused text element
//! - **Focus:** the center of the newly focused element
//! - **Blur:** forgets the active element, keeps the last target
//!
//! Every subscription is owned by the tracker and released by
//! [`InputTracker::dispose`], which runs at most once per subscription.

pub mod backends;
pub mod capability;
pub mod caret;
pub mod subscription;

use std::sync::{Arc, Mutex, Weak};

use peeper_common::sync::lock;
use peeper_platform_core::{Document, EventSource, Listener};
use peeper_widget_model::{CapabilityMode, Channel, ElementId, HostEvent, Point2D};

use crate::capability::{CapabilityDetector, CapabilityTransition};
use crate::subscription::SubscriptionSet;

/// Receives the targets the tracker resolves.
pub trait TargetSink: Send + Sync {
    /// A new gaze target was resolved.
    fn look_at(&self, target: Point2D);

    /// The host became touch-only: return the pupils to rest.
    fn recenter(&self);
}

#[derive(Debug, Default)]
struct TrackerState {
    capability: CapabilityDetector,
    active_element: Option<ElementId>,
    last_target: Option<Point2D>,
}

struct TrackerShared {
    document: Arc<dyn Document>,
    sink: Arc<dyn TargetSink>,
    state: Mutex<TrackerState>,
    /// Pointer-path subscriptions; empty while the host is touch-only.
    pointer: Mutex<SubscriptionSet>,
}

/// The input tracker that connects a host's events to a target sink.
pub struct InputTracker {
    shared: Arc<TrackerShared>,
    subscriptions: SubscriptionSet,
}

impl InputTracker {
    /// Detect capability and subscribe to the host.
    pub fn start(
        events: Arc<dyn EventSource>,
        document: Arc<dyn Document>,
        sink: Arc<dyn TargetSink>,
    ) -> Self {
        let capability = CapabilityDetector::detect(document.as_ref());
        let shared = Arc::new(TrackerShared {
            document,
            sink,
            state: Mutex::new(TrackerState {
                capability,
                ..TrackerState::default()
            }),
            pointer: Mutex::new(SubscriptionSet::new(events.clone())),
        });

        let mut subscriptions = SubscriptionSet::new(events);
        let weak = Arc::downgrade(&shared);
        for channel in [
            Channel::KeyUp,
            Channel::Focus,
            Channel::Blur,
            Channel::HoverCapability,
        ] {
            subscriptions.subscribe(channel, listener(&weak));
        }

        if capability.pointer_capable() {
            shared.resume_pointer();
        } else {
            shared.sink.recenter();
        }

        tracing::info!(
            pointer_capable = capability.pointer_capable(),
            "Input tracker started"
        );

        Self {
            shared,
            subscriptions,
        }
    }

    /// Resolve the gaze target for `event` without forwarding it.
    ///
    /// Focus and blur update the active-element reference as a side effect.
    pub fn compute_target(&self, event: &HostEvent) -> Option<Point2D> {
        self.shared.compute_target(event)
    }

    /// Aim at a target resolved by an earlier tracker on the same host.
    /// Touch-only hosts stay centred. Returns whether the target was applied.
    pub fn restore_target(&self, target: Point2D) -> bool {
        {
            let mut state = lock(&self.shared.state);
            if !state.capability.pointer_capable() {
                return false;
            }
            state.last_target = Some(target);
        }
        self.shared.sink.look_at(target);
        true
    }

    /// Release every subscription. Returns how many were released; a
    /// second call releases nothing.
    pub fn dispose(&mut self) -> usize {
        let released = self.subscriptions.dispose() + lock(&self.shared.pointer).dispose();
        if released > 0 {
            tracing::info!(released, "Input tracker stopped");
        }
        released
    }

    pub fn capability(&self) -> CapabilityMode {
        lock(&self.shared.state).capability.mode()
    }

    pub fn last_target(&self) -> Option<Point2D> {
        lock(&self.shared.state).last_target
    }

    pub fn active_element(&self) -> Option<ElementId> {
        lock(&self.shared.state).active_element
    }

    /// Whether pointer move/click listeners are currently registered.
    pub fn pointer_subscribed(&self) -> bool {
        !lock(&self.shared.pointer).is_empty()
    }

    /// Number of live subscriptions held.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len() + lock(&self.shared.pointer).len()
    }
}

impl Drop for InputTracker {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn listener(weak: &Weak<TrackerShared>) -> Listener {
    let weak = weak.clone();
    Arc::new(move |event: &HostEvent| {
        if let Some(shared) = weak.upgrade() {
            shared.handle(event);
        }
    })
}

impl TrackerShared {
    fn handle(self: &Arc<Self>, event: &HostEvent) {
        if let HostEvent::HoverChange { hover } = event {
            self.on_capability_change(*hover);
            return;
        }

        if let Some(target) = self.compute_target(event) {
            lock(&self.state).last_target = Some(target);
            tracing::trace!(
                channel = event.channel().as_str(),
                x = target.x,
                y = target.y,
                "Gaze target updated"
            );
            self.sink.look_at(target);
        }
    }

    fn compute_target(&self, event: &HostEvent) -> Option<Point2D> {
        match event {
            HostEvent::PointerMove { .. } | HostEvent::Click { .. } => {
                if lock(&self.state).capability.pointer_capable() {
                    event.pointer_position()
                } else {
                    None
                }
            }
            HostEvent::KeyUp { .. } => {
                let active = self.document.active_element();
                lock(&self.state).active_element = active.as_ref().map(|e| e.id);
                let element = active.filter(|e| e.kind.accepts_text())?;
                Some(caret::compute_caret_point(self.document.as_ref(), &element))
            }
            HostEvent::Focus { target } => {
                lock(&self.state).active_element = Some(*target);
                self.document.element(*target).map(|e| e.rect.center())
            }
            HostEvent::Blur { .. } => {
                // The last target stays put; recentring here makes the eyes
                // jump between two focus changes.
                lock(&self.state).active_element = None;
                None
            }
            HostEvent::HoverChange { .. } => None,
        }
    }

    fn on_capability_change(self: &Arc<Self>, hover: bool) {
        let transition = lock(&self.state).capability.observe(hover);
        match transition {
            CapabilityTransition::Unchanged => {}
            CapabilityTransition::BecameTouch => {
                let released = lock(&self.pointer).dispose();
                tracing::info!(released, "Host is touch-only; pointer tracking suspended");
                self.sink.recenter();
            }
            CapabilityTransition::BecamePointer => {
                tracing::info!("Host can hover; pointer tracking resumed");
                self.resume_pointer();
            }
        }
    }

    fn resume_pointer(self: &Arc<Self>) {
        let mut pointer = lock(&self.pointer);
        if !pointer.is_empty() {
            return;
        }
        let weak = Arc::downgrade(self);
        pointer.subscribe(Channel::PointerMove, listener(&weak));
        pointer.subscribe(Channel::Click, listener(&weak));
    }
}
