//! `peeper blink` - preview a blink schedule without waiting for it.

use peeper_common::config::AppConfig;
use peeper_processing_core::blink::{BlinkCycle, BlinkTiming};

pub fn run(cycles: usize, seed: Option<u64>, config: &AppConfig) -> anyhow::Result<()> {
    config.blink.validate()?;
    let timing = BlinkTiming::from(&config.blink);

    let plan = match seed {
        Some(seed) => BlinkCycle::seeded(timing, seed).plan(cycles),
        None => BlinkCycle::from_entropy(timing).plan(cycles),
    };

    println!(
        "Blink schedule ({} cycles, interval {}..{}ms, closed {}ms)",
        cycles,
        timing.min_interval_ms,
        timing.max_interval_ms,
        timing.duration.as_millis()
    );
    println!("  {:>3}  {:>8}  {:>10}  {:>10}", "#", "open", "closes_at", "opens_at");
    for (i, blink) in plan.iter().enumerate() {
        println!(
            "  {:>3}  {:>6}ms  {:>8}ms  {:>8}ms",
            i + 1,
            blink.interval.as_millis(),
            blink.closes_at.as_millis(),
            blink.opens_at.as_millis()
        );
    }

    Ok(())
}
