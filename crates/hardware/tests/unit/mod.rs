//! Unit tests for the hardware blocks.

/// Configuration loading and validation.
pub mod config;
/// FIFO engines and the reference model.
pub mod fifo;
