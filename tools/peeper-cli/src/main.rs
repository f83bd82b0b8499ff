//! Peeper CLI: drive the gaze engine from the command line.
//!
//! Usage:
//!   peeper solve --center X,Y --size S --target X,Y   Print a pupil offset
//!   peeper simulate <SCENARIO>                          Replay a scenario
//!   peeper blink --cycles N                             Preview a blink schedule
//!   peeper config                                       Show effective config

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use peeper_common::config::AppConfig;
use peeper_common::logging::{effective_level, init_logging};
use peeper_widget_model::Point2D;

mod commands;

#[derive(Parser)]
#[command(
    name = "peeper",
    about = "A pair of eyes that follow the pointer and the caret",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the pupil offset for a single target
    Solve {
        /// Widget center in page pixels
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        center: Point2D,

        /// Widget diameter in pixels (defaults to the configured size)
        #[arg(long)]
        size: Option<f64>,

        /// Target point in page pixels
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        target: Point2D,
    },

    /// Replay a scenario against a synthetic host
    Simulate {
        /// Path to the scenario JSON file
        scenario: PathBuf,

        /// Write painted frames as JSONL instead of printing them
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seed for blink intervals (deterministic output)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print a simulated blink schedule
    Blink {
        /// Number of blinks to plan
        #[arg(long, default_value = "5")]
        cycles: usize,

        /// Seed for the interval generator
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show the effective configuration
    Config {
        /// Save it to the config file
        #[arg(long)]
        write: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load();
    let mut logging = config.logging.clone();
    logging.level = effective_level(&config.logging, cli.verbose);
    init_logging(&logging)?;

    match cli.command {
        Commands::Solve {
            center,
            size,
            target,
        } => commands::solve::run(center, size.unwrap_or(config.widget.size), target),
        Commands::Simulate {
            scenario,
            output,
            seed,
        } => commands::simulate::run(&scenario, output.as_deref(), seed, &config),
        Commands::Blink { cycles, seed } => commands::blink::run(cycles, seed, &config),
        Commands::Config { write } => commands::config::run(&config, write),
    }
}

/// Parse `"X,Y"` into a point.
fn parse_point(s: &str) -> Result<Point2D, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
    let x: f64 = x
        .trim()
        .parse()
        .map_err(|e| format!("invalid x '{x}': {e}"))?;
    let y: f64 = y
        .trim()
        .parse()
        .map_err(|e| format!("invalid y '{y}': {e}"))?;
    if !x.is_finite() || !y.is_finite() {
        return Err(format!("coordinates must be finite: '{s}'"));
    }
    Ok(Point2D::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("10,20").unwrap(), Point2D::new(10.0, 20.0));
        assert_eq!(parse_point(" -5.5 , 3 ").unwrap(), Point2D::new(-5.5, 3.0));
        assert!(parse_point("10").is_err());
        assert!(parse_point("a,b").is_err());
        assert!(parse_point("inf,0").is_err());
    }

    #[test]
    fn test_solve_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "peeper", "solve", "--center", "0,0", "--target", "-300,-1",
        ])
        .unwrap();
        match cli.command {
            Commands::Solve { target, size, .. } => {
                assert_eq!(target, Point2D::new(-300.0, -1.0));
                assert!(size.is_none());
            }
            _ => panic!("expected solve"),
        }
    }
}
