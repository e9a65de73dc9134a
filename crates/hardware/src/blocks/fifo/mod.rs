//! FIFO buffers.
//!
//! Two engines share the circular-index and cell-store conventions:
//! 1. [`sync::SyncFifo`] — the plain synchronous FIFO.
//! 2. [`speculative::SpeculativeFifo`] — tentative writes/reads with
//!    commit/discard on both sides.
//!
//! [`model::SpecFifoModel`] is the queue-based reference the speculative
//! engine is tested against, cycle for cycle.

/// Behavioral reference model of the speculative FIFO.
pub mod model;
/// Speculative FIFO engine.
pub mod speculative;
/// Plain synchronous FIFO engine.
pub mod sync;

pub use model::{SideCmd, SpecFifoModel};
pub use speculative::{CommitCtl, SpecFifoInputs, SpecFifoOutputs, SpeculativeFifo};
pub use sync::{SyncFifo, SyncFifoInputs, SyncFifoOutputs};
