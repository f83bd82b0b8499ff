//! `peeper solve` - compute one pupil offset.

use peeper_processing_core::gaze;
use peeper_widget_model::{Point2D, Rect, WidgetMetrics};

pub fn run(center: Point2D, size: f64, target: Point2D) -> anyhow::Result<()> {
    if !size.is_finite() || size <= 0.0 {
        anyhow::bail!("Size must be a positive number, got {size}");
    }

    let container = Rect::centered_square(center.x, center.y, size);
    let offset = gaze::solve(&container, target, size);
    let distance = center.distance_to(&target);

    println!("Center:     ({:.1}, {:.1})", center.x, center.y);
    println!("Target:     ({:.1}, {:.1})", target.x, target.y);
    println!("Distance:   {distance:.2}px");
    println!("Damping:    {:.3}", gaze::damping(distance));
    println!(
        "Offset:     dx={:.3} dy={:.3} (|d|={:.3}, max {:.3})",
        offset.dx,
        offset.dy,
        offset.magnitude(),
        WidgetMetrics::new(size).max_offset()
    );

    Ok(())
}
