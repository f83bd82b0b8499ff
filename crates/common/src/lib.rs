//! Peeper Common Utilities
//!
//! Shared infrastructure for all Peeper crates:
//! - Error types and result aliases
//! - Mount clock for frame timestamps
//! - Tracing/logging initialization
//! - Configuration loading
//! - Poison-tolerant locking

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod sync;

pub use clock::*;
pub use config::*;
pub use error::*;
