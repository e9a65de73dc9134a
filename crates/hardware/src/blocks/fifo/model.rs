//! Behavioral reference model of the speculative FIFO.
//!
//! This is the authoritative statement of what the hardware model in
//! [`speculative`](super::speculative) must do. It keeps three ordered
//! sequences instead of pointers:
//! 1. **committed** — readable data, FIFO order;
//! 2. **pending writes** — speculatively written, not yet committed;
//! 3. **pending reads** — speculatively read off the committed front, not
//!    yet committed or discarded.
//!
//! A write-side commit moves all pending writes onto the committed tail; a
//! write-side discard drops them. A read-side commit drops the pending
//! reads (they are gone for good); a read-side discard pushes them back
//! onto the committed front in original order, so they will be reread.
//! Equivalence tests drive this model and the hardware model in lockstep,
//! one operation per clock cycle, and compare the full status surface.

use std::collections::VecDeque;

/// A commit/discard command on one side of the FIFO, for one cycle.
///
/// `None` in the model's operation signatures means "no command this
/// cycle" — the speculative run stays open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SideCmd {
    /// Make the side's pending operations permanent.
    Commit,
    /// Undo the side's pending operations.
    Discard,
    /// Both asserted in the same cycle: discard wins.
    DiscardCommit,
}

impl SideCmd {
    /// Whether this command discards (discard wins over commit).
    const fn discards(self) -> bool {
        matches!(self, Self::Discard | Self::DiscardCommit)
    }
}

/// Queue-based reference model of the speculative FIFO.
#[derive(Clone, Debug)]
pub struct SpecFifoModel {
    depth: usize,
    afull_th: usize,
    aempty_th: usize,
    committed: VecDeque<u64>,
    pending_write: Vec<u64>,
    pending_read: Vec<u64>,
    ovf: bool,
    udf: bool,
    count_max: usize,
}

impl SpecFifoModel {
    /// Creates a model with `depth` cells and `depth / 2` thresholds.
    pub fn new(depth: usize) -> Self {
        Self::with_thresholds(depth, depth / 2, depth / 2)
    }

    /// Creates a model with explicit almost-full/almost-empty thresholds.
    pub fn with_thresholds(depth: usize, afull_th: usize, aempty_th: usize) -> Self {
        Self {
            depth,
            afull_th,
            aempty_th,
            committed: VecDeque::new(),
            pending_write: Vec::new(),
            pending_read: Vec::new(),
            ovf: false,
            udf: false,
            count_max: 0,
        }
    }

    /// Returns the model to its post-reset state. Thresholds survive.
    pub fn reset(&mut self) {
        *self = Self::with_thresholds(self.depth, self.afull_th, self.aempty_th);
    }

    fn apply_wcmd(&mut self, cmd: Option<SideCmd>) {
        match cmd {
            Some(c) if c.discards() => self.pending_write.clear(),
            Some(SideCmd::Commit) => self.committed.extend(self.pending_write.drain(..)),
            _ => {}
        }
    }

    fn apply_rcmd(&mut self, cmd: Option<SideCmd>) {
        match cmd {
            Some(c) if c.discards() => {
                // Restore in original order at the committed front.
                for value in self.pending_read.drain(..).rev() {
                    self.committed.push_front(value);
                }
            }
            Some(SideCmd::Commit) => self.pending_read.clear(),
            _ => {}
        }
    }

    fn track_count_max(&mut self) {
        self.count_max = self.count_max.max(self.count());
    }

    /// A cycle carrying only commands (no write or read request).
    pub fn command(&mut self, wcmd: Option<SideCmd>, rcmd: Option<SideCmd>) {
        self.apply_wcmd(wcmd);
        self.apply_rcmd(rcmd);
    }

    /// A write cycle: `value` lands in the pending-write run unless the
    /// FIFO is full, in which case the overflow latch sets and the value
    /// is dropped. Same-cycle commands apply after the write, so they
    /// cover it.
    pub fn write(&mut self, value: u64, wcmd: Option<SideCmd>, rcmd: Option<SideCmd>) {
        if self.is_full() {
            self.ovf = true;
        } else {
            self.pending_write.push(value);
        }
        self.apply_wcmd(wcmd);
        self.apply_rcmd(rcmd);
        self.track_count_max();
    }

    /// A read cycle: the committed head moves onto the pending-read run
    /// and is returned, unless the FIFO is empty, in which case the
    /// underflow latch sets and `None` is returned.
    pub fn read(&mut self, wcmd: Option<SideCmd>, rcmd: Option<SideCmd>) -> Option<u64> {
        let value = if let Some(head) = self.committed.pop_front() {
            self.pending_read.push(head);
            Some(head)
        } else {
            self.udf = true;
            None
        };
        self.apply_wcmd(wcmd);
        self.apply_rcmd(rcmd);
        value
    }

    /// A simultaneous write-and-read cycle.
    ///
    /// Full/empty are sampled before anything moves, as the hardware
    /// samples its flags: a same-cycle commit cannot make the written
    /// value readable within the cycle.
    pub fn write_read(
        &mut self,
        value: u64,
        wcmd: Option<SideCmd>,
        rcmd: Option<SideCmd>,
    ) -> Option<u64> {
        let full = self.is_full();
        let empty = self.is_empty();

        if full {
            self.ovf = true;
        } else {
            self.pending_write.push(value);
        }
        self.apply_wcmd(wcmd);

        let out = if empty {
            self.udf = true;
            None
        } else {
            let head = self.committed.pop_front();
            if let Some(v) = head {
                self.pending_read.push(v);
            }
            head
        };
        self.apply_rcmd(rcmd);

        self.track_count_max();
        out
    }

    /// Occupied cells: committed plus both speculative runs.
    pub fn count(&self) -> usize {
        self.pending_read.len() + self.committed.len() + self.pending_write.len()
    }

    /// High-water mark of [`count`](Self::count) since the last reset.
    pub const fn count_max(&self) -> usize {
        self.count_max
    }

    /// No free cell for a new speculative write.
    pub fn is_full(&self) -> bool {
        self.count() == self.depth
    }

    /// No committed data left to read.
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    /// Free cells at or below the almost-full threshold.
    pub fn is_afull(&self) -> bool {
        self.depth - self.count() <= self.afull_th
    }

    /// Committed cells at or below the almost-empty threshold.
    pub fn is_aempty(&self) -> bool {
        self.committed.len() <= self.aempty_th
    }

    /// Sticky overflow latch.
    pub const fn is_ovf(&self) -> bool {
        self.ovf
    }

    /// Sticky underflow latch.
    pub const fn is_udf(&self) -> bool {
        self.udf
    }

    /// The committed head — what a read this cycle would return.
    pub fn dout(&self) -> Option<u64> {
        self.committed.front().copied()
    }
}
