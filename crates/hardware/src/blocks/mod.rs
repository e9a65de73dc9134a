//! The hardware building blocks.

/// Request arbiters (priority, round-robin).
pub mod arbiter;
/// FIFOs: plain, speculative, and the behavioral reference model.
pub mod fifo;
/// Ready/valid handshake plumbing.
pub mod handshake;
/// Memory primitives and the cell-store trait seam.
pub mod mem;
/// Word multiplexer/demultiplexer.
pub mod mux;
/// Pipeline control unit.
pub mod pipeline;
