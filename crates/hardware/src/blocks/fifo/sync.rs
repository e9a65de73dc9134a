//! Plain synchronous FIFO.
//!
//! The non-speculative sibling of
//! [`SpeculativeFifo`](super::speculative::SpeculativeFifo): one write
//! pointer, one read pointer, flag registers instead of pointer-comparison
//! tricks, and the same status surface (thresholds, occupancy, sticky
//! overflow/underflow). A write while full or a read while empty is
//! dropped and only latches the corresponding flag.

use crate::blocks::mem::{CellMemory, RamSdpAr};
use crate::common::bits;
use crate::common::index::CircIndex;
use crate::common::error::ConfigError;
use crate::config::FifoConfig;

/// Input ports sampled at one clock edge.
#[derive(Clone, Copy, Debug, Default)]
pub struct SyncFifoInputs {
    /// Write request.
    pub we: bool,
    /// Write data; truncated to the configured width.
    pub din: u64,
    /// Read request.
    pub re: bool,
}

/// Output ports, a pure function of registered state. `dout` is the
/// asynchronous memory read at the read pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncFifoOutputs {
    /// All cells occupied.
    pub full: bool,
    /// No data to read.
    pub empty: bool,
    /// The cell at the read head.
    pub dout: u64,
    /// Free cells at or below the almost-full threshold.
    pub afull: bool,
    /// Occupied cells at or below the almost-empty threshold.
    pub aempty: bool,
    /// Occupied cells.
    pub count: usize,
    /// High-water mark of `count` since the last reset.
    pub count_max: usize,
    /// Sticky overflow latch.
    pub ovf: bool,
    /// Sticky underflow latch.
    pub udf: bool,
}

/// The synchronous FIFO engine.
#[derive(Clone, Debug)]
pub struct SyncFifo<M: CellMemory = RamSdpAr> {
    idx: CircIndex,
    width: usize,
    dmask: u64,
    afull_th: usize,
    aempty_th: usize,

    wr_ptr: usize,
    rd_ptr: usize,
    full: bool,
    empty: bool,
    afull: bool,
    aempty: bool,
    count: usize,
    count_max: usize,
    ovf: bool,
    udf: bool,

    mem: M,
}

impl SyncFifo<RamSdpAr> {
    /// Builds a FIFO backed by a zeroed dual-port RAM.
    ///
    /// # Errors
    ///
    /// Whatever [`FifoConfig::validate`] rejects.
    pub fn new(config: &FifoConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::with_memory(config, RamSdpAr::new(config.depth))
    }
}

impl<M: CellMemory> SyncFifo<M> {
    /// Builds a FIFO around a caller-supplied cell store.
    ///
    /// # Errors
    ///
    /// Whatever [`FifoConfig::validate`] rejects.
    pub fn with_memory(config: &FifoConfig, mem: M) -> Result<Self, ConfigError> {
        config.validate()?;
        debug_assert!(mem.depth() >= config.depth, "cell store narrower than the fifo");
        Ok(Self {
            idx: CircIndex::new(config.depth),
            width: config.width,
            dmask: bits::mask(config.width),
            afull_th: config.afull_threshold(),
            aempty_th: config.aempty_threshold(),
            wr_ptr: 0,
            rd_ptr: 0,
            full: false,
            empty: true,
            afull: false,
            aempty: true,
            count: 0,
            count_max: 0,
            ovf: false,
            udf: false,
            mem,
        })
    }

    /// Number of cells.
    pub const fn depth(&self) -> usize {
        self.idx.depth()
    }

    /// Payload width in bits.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Synchronous reset; cell contents persist until overwritten.
    pub fn reset(&mut self) {
        self.wr_ptr = 0;
        self.rd_ptr = 0;
        self.full = false;
        self.empty = true;
        self.afull = false;
        self.aempty = true;
        self.count = 0;
        self.count_max = 0;
        self.ovf = false;
        self.udf = false;
    }

    /// The output ports as of the current cycle.
    pub fn outputs(&self) -> SyncFifoOutputs {
        SyncFifoOutputs {
            full: self.full,
            empty: self.empty,
            dout: self.mem.read(self.rd_ptr) & self.dmask,
            afull: self.afull,
            aempty: self.aempty,
            count: self.count,
            count_max: self.count_max,
            ovf: self.ovf,
            udf: self.udf,
        }
    }

    /// Applies one clock edge.
    pub fn tick(&mut self, inputs: &SyncFifoInputs) {
        let we_safe = inputs.we && !self.full;
        let re_safe = inputs.re && !self.empty;
        let wr_ptr_new = self.idx.next(self.wr_ptr);
        let rd_ptr_new = self.idx.next(self.rd_ptr);
        let count_new = if we_safe && !re_safe {
            self.count + 1
        } else if !we_safe && re_safe {
            self.count - 1
        } else {
            self.count
        };

        if inputs.we && self.full {
            if !self.ovf {
                tracing::warn!(depth = self.depth(), "write while full, overflow latched");
            }
            self.ovf = true;
        }
        if inputs.re && self.empty {
            if !self.udf {
                tracing::warn!(depth = self.depth(), "read while empty, underflow latched");
            }
            self.udf = true;
        }

        if we_safe {
            self.mem.write(self.wr_ptr, inputs.din & self.dmask);
        }

        // Flag updates compare against the pre-edge opposite pointer.
        if we_safe {
            self.empty = false;
        } else if re_safe && rd_ptr_new == self.wr_ptr {
            self.empty = true;
        }
        if re_safe {
            self.full = false;
        } else if we_safe && wr_ptr_new == self.rd_ptr {
            self.full = true;
        }

        if we_safe {
            self.wr_ptr = wr_ptr_new;
        }
        if re_safe {
            self.rd_ptr = rd_ptr_new;
        }

        self.count = count_new;
        self.count_max = self.count_max.max(count_new);
        self.afull = count_new >= self.depth().saturating_sub(self.afull_th);
        self.aempty = count_new <= self.aempty_th;
    }
}
