//! Gaze solving.
//!
//! Converts a target point into the translation applied to both pupils.
//! The pupils move in lock-step; they do not verge independently.

use peeper_widget_model::{EyeOffset, Point2D, Rect, WidgetMetrics};

/// Distance at which the offset reaches its maximum.
pub const DAMPING_RADIUS_PX: f64 = 300.0;

/// Fraction of the maximum offset to apply at `distance` pixels.
///
/// Linear in distance, saturating at 1 from [`DAMPING_RADIUS_PX`] on.
pub fn damping(distance: f64) -> f64 {
    (distance / DAMPING_RADIUS_PX).min(1.0)
}

/// Offset for pupils in `container` looking at `target`.
///
/// `container` must be read from live layout for every call; the widget may
/// have moved since the previous event. The result's magnitude never
/// exceeds `size * 0.18`.
pub fn solve(container: &Rect, target: Point2D, size: f64) -> EyeOffset {
    let center = container.center();
    let dx = target.x - center.x;
    let dy = target.y - center.y;
    let distance = (dx * dx + dy * dy).sqrt();

    if distance.is_nan() || !size.is_finite() || size <= 0.0 {
        return EyeOffset::CENTERED;
    }

    let offset = WidgetMetrics::new(size).max_offset() * damping(distance);
    let angle = dy.atan2(dx);

    EyeOffset::new(angle.cos() * offset, angle.sin() * offset)
}
