//! Speculative FIFO with independent commit/discard on both sides.
//!
//! A circular buffer that separates tentative operations from committed
//! ones:
//! 1. **Write side:** `we` lands data speculatively; `wr_commit` makes all
//!    pending speculative writes readable, `wr_discard` removes them at
//!    once.
//! 2. **Read side:** `re` hands data out speculatively; `rd_commit` frees
//!    the cells for good, `rd_discard` rewinds so the same data is reread.
//! 3. **Status:** exact occupancy (`count`, `count_max`), almost-full and
//!    almost-empty thresholds, sticky overflow/underflow latches.
//!
//! A request in the same cycle as a commit/discard on its own side is
//! covered by that command. When commit and discard are asserted together,
//! discard wins. The FIFO can be full and empty at the same time: every
//! cell held by an in-flight speculative write or read is neither free nor
//! readable.
//!
//! Cell layout, walking forward from the committed read pointer:
//!
//! ```text
//! rd                     srd          wr                     swr          rd
//! ^                      ^            v                      v            ^
//! |######################|%%%%%%%%%%%%|**********************|............|
//! |<----- srd_count ---->|<---------->|<----- swr_count ---->|<---------->|
//! |<------------ wr_count ----------->|<------------ rd_count ----------->|
//! |<--------------------------------- depth ---------------------------->|
//! ```
//!
//! `#` speculatively read, `%` committed unread, `*` speculatively
//! written, `.` free.

use crate::blocks::fifo::model::SideCmd;
use crate::blocks::mem::{CellMemory, RamSdpAr};
use crate::common::bits;
use crate::common::index::CircIndex;
use crate::common::error::ConfigError;
use crate::config::FifoConfig;

/// One side's commit/discard wires for one cycle.
///
/// The two wires form a pair: they are wired together or not at all, which
/// is why FIFO inputs carry an `Option<CommitCtl>` rather than two
/// separately optional bits. An unconnected pair (`None`) behaves as
/// `commit` held high — every operation is committed immediately and the
/// FIFO degenerates to a plain one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitCtl {
    /// Make the side's pending speculative operations permanent.
    pub commit: bool,
    /// Undo the side's pending speculative operations. Wins over `commit`.
    pub discard: bool,
}

impl CommitCtl {
    /// Neither wire asserted: the speculative run stays open.
    pub const IDLE: Self = Self {
        commit: false,
        discard: false,
    };
    /// Commit only.
    pub const COMMIT: Self = Self {
        commit: true,
        discard: false,
    };
    /// Discard only.
    pub const DISCARD: Self = Self {
        commit: false,
        discard: true,
    };
    /// Both asserted: discard wins.
    pub const DISCARD_COMMIT: Self = Self {
        commit: true,
        discard: true,
    };
}

impl From<SideCmd> for CommitCtl {
    fn from(cmd: SideCmd) -> Self {
        match cmd {
            SideCmd::Commit => Self::COMMIT,
            SideCmd::Discard => Self::DISCARD,
            SideCmd::DiscardCommit => Self::DISCARD_COMMIT,
        }
    }
}

/// Input ports sampled at one clock edge.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpecFifoInputs {
    /// Write request.
    pub we: bool,
    /// Write data; truncated to the configured width.
    pub din: u64,
    /// Read request.
    pub re: bool,
    /// Write-side commit/discard pair; `None` = unconnected (always
    /// commit).
    pub wr: Option<CommitCtl>,
    /// Read-side commit/discard pair; `None` = unconnected (always
    /// commit).
    pub rd: Option<CommitCtl>,
}

/// Output ports, a pure function of registered state.
///
/// All flags and counts are registered, so an operation becomes visible
/// here one tick after it is applied. `dout` is the asynchronous memory
/// read at the speculative read pointer: during a read cycle it shows the
/// value being handed out, after the edge it shows the next one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpecFifoOutputs {
    /// No free cell for a new speculative write.
    pub full: bool,
    /// No committed data left to read.
    pub empty: bool,
    /// The cell at the speculative read head.
    pub dout: u64,
    /// Free cells at or below the almost-full threshold.
    pub afull: bool,
    /// Committed cells at or below the almost-empty threshold.
    pub aempty: bool,
    /// Occupied cells, committed and speculative.
    pub count: usize,
    /// High-water mark of `count` since the last reset.
    pub count_max: usize,
    /// Sticky overflow latch: a write arrived while full.
    pub ovf: bool,
    /// Sticky underflow latch: a read arrived while empty.
    pub udf: bool,
}

/// The speculative FIFO engine.
///
/// Generic over its cell store so callers can substitute a memory model;
/// by default it instantiates a [`RamSdpAr`] sized to the configured
/// depth.
#[derive(Clone, Debug)]
pub struct SpeculativeFifo<M: CellMemory = RamSdpAr> {
    idx: CircIndex,
    width: usize,
    dmask: u64,
    afull_th: usize,
    aempty_th: usize,

    // Committed and speculative pointers over [0, depth).
    wr_ptr: usize,
    rd_ptr: usize,
    swr_ptr: usize,
    srd_ptr: usize,

    // Whether the current speculative run on each side is non-empty.
    swr_non0: bool,
    srd_non0: bool,

    full: bool,
    empty: bool,
    afull: bool,
    aempty: bool,

    // Occupancy bookkeeping, all registered:
    //   swr_count - length of the open speculative-write run
    //   srd_count - length of the open speculative-read run
    //   wr_count  - write-committed cells not yet read-committed
    //   rd_count  - cells not write-committed (free or speculative)
    swr_count: usize,
    srd_count: usize,
    wr_count: usize,
    rd_count: usize,
    data_count: usize,
    data_count_max: usize,

    ovf: bool,
    udf: bool,

    mem: M,
}

impl SpeculativeFifo<RamSdpAr> {
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

impl<M: CellMemory> SpeculativeFifo<M> {
    /// Builds a FIFO around a caller-supplied cell store. The store must
    /// have at least `config.depth` cells.
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
            swr_ptr: 0,
            srd_ptr: 0,
            swr_non0: false,
            srd_non0: false,
            full: false,
            empty: true,
            afull: false,
            aempty: true,
            swr_count: 0,
            srd_count: 0,
            wr_count: 0,
            rd_count: config.depth,
            data_count: 0,
            data_count_max: 0,
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

    /// The backing cell store.
    pub const fn memory(&self) -> &M {
        &self.mem
    }

    /// Synchronous reset: pointers, flags, counters, and latches clear;
    /// cell contents persist until overwritten.
    pub fn reset(&mut self) {
        self.wr_ptr = 0;
        self.rd_ptr = 0;
        self.swr_ptr = 0;
        self.srd_ptr = 0;
        self.swr_non0 = false;
        self.srd_non0 = false;
        self.full = false;
        self.empty = true;
        self.afull = false;
        self.aempty = true;
        self.swr_count = 0;
        self.srd_count = 0;
        self.wr_count = 0;
        self.rd_count = self.depth();
        self.data_count = 0;
        self.data_count_max = 0;
        self.ovf = false;
        self.udf = false;
    }

    /// The output ports as of the current cycle.
    pub fn outputs(&self) -> SpecFifoOutputs {
        SpecFifoOutputs {
            full: self.full,
            empty: self.empty,
            dout: self.mem.read(self.srd_ptr) & self.dmask,
            afull: self.afull,
            aempty: self.aempty,
            count: self.data_count,
            count_max: self.data_count_max,
            ovf: self.ovf,
            udf: self.udf,
        }
    }

    /// Applies one clock edge.
    ///
    /// The combinational phase derives everything from registered state
    /// and this cycle's inputs; the commit phase then performs the single
    /// synchronous update. A request while the respective flag forbids it
    /// (`we` while full, `re` while empty) is dropped and only latches the
    /// corresponding sticky status flag.
    pub fn tick(&mut self, inputs: &SpecFifoInputs) {
        let wr = inputs.wr.unwrap_or(CommitCtl::COMMIT);
        let rd = inputs.rd.unwrap_or(CommitCtl::COMMIT);

        // --- combinational phase -----------------------------------------
        let we_safe = inputs.we && !self.full;
        let re_safe = inputs.re && !self.empty;

        // A commit/discard takes effect only if its side has something in
        // flight, counting a same-cycle request; discard beats commit.
        let wr_commit_eff = wr.commit && (self.swr_non0 || we_safe) && !wr.discard;
        let rd_commit_eff = rd.commit && (self.srd_non0 || re_safe) && !rd.discard;
        let wr_discard_eff = wr.discard && (self.swr_non0 || we_safe);
        let rd_discard_eff = rd.discard && (self.srd_non0 || re_safe);

        // Discard rewinds the speculative pointer onto the committed one,
        // covering a same-cycle request.
        let swr_ptr_new = if wr.discard {
            self.wr_ptr
        } else if we_safe {
            self.idx.next(self.swr_ptr)
        } else {
            self.swr_ptr
        };
        let srd_ptr_new = if rd.discard {
            self.rd_ptr
        } else if re_safe {
            self.idx.next(self.srd_ptr)
        } else {
            self.srd_ptr
        };

        // Run lengths restart on any commit/discard; a committing side
        // folds its run (plus a same-cycle request) into the committed
        // counts.
        let swr_count_new = if wr.commit || wr.discard {
            0
        } else {
            self.swr_count + usize::from(we_safe)
        };
        let srd_count_new = if rd.commit || rd.discard {
            0
        } else {
            self.srd_count + usize::from(re_safe)
        };
        let wr_add = if wr.commit && !wr.discard {
            self.swr_count + usize::from(we_safe)
        } else {
            0
        };
        let rd_add = if rd.commit && !rd.discard {
            self.srd_count + usize::from(re_safe)
        } else {
            0
        };
        let wr_count_new = self.wr_count + wr_add - rd_add;
        let rd_count_new = self.rd_count + rd_add - wr_add;
        let data_count_new = wr_count_new + swr_count_new;

        // --- clock edge --------------------------------------------------
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
            self.mem.write(self.swr_ptr, inputs.din & self.dmask);
        }

        // Flag updates compare against the pre-edge committed pointers.
        // Empty clears on anything that adds readable data; it sets when a
        // read catches the speculative read pointer up to the committed
        // write boundary. Full is the mirror image, gated by the committed
        // read pointer because free space is bounded by reads in flight.
        if wr_commit_eff || rd_discard_eff {
            self.empty = false;
        } else if re_safe && srd_ptr_new == self.wr_ptr {
            self.empty = true;
        }
        if rd_commit_eff || wr_discard_eff {
            self.full = false;
        } else if we_safe && swr_ptr_new == self.rd_ptr {
            self.full = true;
        }

        self.swr_ptr = swr_ptr_new;
        self.srd_ptr = srd_ptr_new;
        if wr.commit {
            self.wr_ptr = swr_ptr_new;
        }
        if rd.commit {
            self.rd_ptr = srd_ptr_new;
        }

        if wr.commit || wr.discard {
            self.swr_non0 = false;
        } else if we_safe {
            self.swr_non0 = true;
        }
        if rd.commit || rd.discard {
            self.srd_non0 = false;
        } else if re_safe {
            self.srd_non0 = true;
        }

        if wr_commit_eff {
            tracing::trace!(cells = wr_add, "write-side commit");
        }
        if wr_discard_eff {
            tracing::trace!(cells = self.swr_count + usize::from(we_safe), "write-side discard");
        }
        if rd_commit_eff {
            tracing::trace!(cells = rd_add, "read-side commit");
        }
        if rd_discard_eff {
            tracing::trace!(cells = self.srd_count + usize::from(re_safe), "read-side discard");
        }

        self.swr_count = swr_count_new;
        self.srd_count = srd_count_new;
        self.wr_count = wr_count_new;
        self.rd_count = rd_count_new;

        self.aempty = wr_count_new - srd_count_new <= self.aempty_th;
        self.afull = rd_count_new - swr_count_new <= self.afull_th;

        self.data_count = data_count_new;
        self.data_count_max = self.data_count_max.max(data_count_new);
    }
}
