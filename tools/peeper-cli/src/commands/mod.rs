pub mod blink;
pub mod config;
pub mod simulate;
pub mod solve;
