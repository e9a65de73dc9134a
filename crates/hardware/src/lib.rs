//! Reusable, cycle-accurate hardware building blocks.
//!
//! This crate models a library of synchronous hardware components the way
//! an RTL designer composes them, with the following:
//! 1. **FIFOs:** a plain synchronous FIFO and a speculative FIFO with
//!    commit/discard semantics on both the write and read side, plus the
//!    behavioral reference model the speculative engine is verified
//!    against.
//! 2. **Pipeline control:** a per-stage handshake synchronizer deriving
//!    register enables and the pipeline-level ready/valid ports, with
//!    multi-cycle stage overrides.
//! 3. **Plumbing:** arbiters, ready/valid join/fork/mux/demux, word
//!    mux/demux, and memory primitives behind a substitutable trait.
//! 4. **Simulation:** deterministic payload generation for testbenches.
//!
//! Every component follows the same cycle discipline: combinational
//! outputs are a pure function of registered state (plus, where the
//! hardware is combinational, current-cycle inputs), and a `tick` applies
//! exactly one synchronous state update per clock edge. `reset` is the
//! synchronous reset. There is no implicit event scheduling — callers
//! evaluate and tick components in their design's (acyclic) dependency
//! order.

/// The hardware building blocks (FIFOs, pipeline control, arbiters, ...).
pub mod blocks;
/// Shared utilities (errors, index arithmetic, bit vectors).
pub mod common;
/// Component configuration (defaults, validation, JSON loading).
pub mod config;
/// Simulation support (payload generation).
pub mod sim;

pub use crate::blocks::fifo::{SpecFifoModel, SpeculativeFifo, SyncFifo};
pub use crate::blocks::pipeline::PipelineControl;
pub use crate::common::error::ConfigError;
pub use crate::config::Config;
