//! Ready/valid handshake plumbing.
//!
//! A transfer happens on exactly the cycles where one side's `valid` and
//! the other side's `ready` coincide. This module provides the stateless
//! synchronizers over such interfaces:
//! 1. **Join** (many-to-one): the output is valid when all inputs are.
//! 2. **Fork** (one-to-many): the input is ready when all outputs are.
//! 3. **Mux/Demux:** route exactly one selected interface through.
//! 4. **Arbitrated mux/demux:** an [`Arbiter`] picks the interface; a
//!    round-robin arbiter rotates priority on consumed transfers.
//!
//! All functions are combinational; only the arbitrated variants carry
//! state (the arbiter's), advanced through `tick`.

use crate::blocks::arbiter::{Arbiter, ArbiterKind};
use crate::common::error::ConfigError;

/// One ready/valid wire pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Handshake {
    /// The receiver can accept this cycle.
    pub ready: bool,
    /// The sender presents valid data this cycle.
    pub valid: bool,
}

impl Handshake {
    /// Whether a transfer happens this cycle.
    pub const fn transfers(&self) -> bool {
        self.ready && self.valid
    }
}

/// Combinational view of a [`hs_join`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinView {
    /// Ready presented to each input.
    pub input_ready: Vec<bool>,
    /// Valid presented to the joined output.
    pub output_valid: bool,
}

/// Joins input interfaces: the output is valid when **all** inputs are
/// valid, and every input sees ready only on cycles where the joined
/// transfer can complete.
pub fn hs_join(input_valid: &[bool], output_ready: bool) -> JoinView {
    let all_valid = input_valid.iter().all(|&v| v);
    JoinView {
        input_ready: vec![all_valid && output_ready; input_valid.len()],
        output_valid: all_valid,
    }
}

/// Combinational view of a [`hs_fork`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForkView {
    /// Ready presented to the forked input.
    pub input_ready: bool,
    /// Valid presented to each output.
    pub output_valid: Vec<bool>,
}

/// Forks one input interface: the input is ready when **all** outputs are
/// ready, and every output sees valid only on cycles where the forked
/// transfer can complete.
pub fn hs_fork(input_valid: bool, output_ready: &[bool]) -> ForkView {
    let all_ready = output_ready.iter().all(|&r| r);
    ForkView {
        input_ready: all_ready,
        output_valid: vec![all_ready && input_valid; output_ready.len()],
    }
}

/// Combinational view of a [`hs_mux`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MuxView {
    /// Ready presented to each input; only the selected one follows the
    /// output.
    pub input_ready: Vec<bool>,
    /// Valid presented to the muxed output.
    pub output_valid: bool,
}

/// Connects the selected input interface to the output; unselected inputs
/// (and everything, when `sel` is `None` or out of range) idle.
pub fn hs_mux(sel: Option<usize>, input_valid: &[bool], output_ready: bool) -> MuxView {
    let mut view = MuxView {
        input_ready: vec![false; input_valid.len()],
        output_valid: false,
    };
    if let Some(s) = sel
        && s < input_valid.len()
    {
        view.output_valid = input_valid[s];
        view.input_ready[s] = output_ready;
    }
    view
}

/// Combinational view of a [`hs_demux`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemuxView {
    /// Ready presented to the demuxed input.
    pub input_ready: bool,
    /// Valid presented to each output; only the selected one follows the
    /// input.
    pub output_valid: Vec<bool>,
}

/// Connects the input interface to the selected output; unselected
/// outputs idle.
pub fn hs_demux(sel: Option<usize>, input_valid: bool, output_ready: &[bool]) -> DemuxView {
    let mut view = DemuxView {
        input_ready: false,
        output_valid: vec![false; output_ready.len()],
    };
    if let Some(s) = sel
        && s < output_ready.len()
    {
        view.input_ready = output_ready[s];
        view.output_valid[s] = input_valid;
    }
    view
}

/// Arbitrated many-to-one mux: the arbiter picks among inputs asserting
/// valid; a round-robin arbiter rotates priority exactly on cycles where
/// the muxed output transfers.
#[derive(Clone, Debug)]
pub struct HsArbMux {
    arb: Arbiter,
}

impl HsArbMux {
    /// Builds an arbitrated mux over `inputs` interfaces.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroRequests`] when `inputs == 0`.
    pub fn new(kind: ArbiterKind, inputs: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            arb: Arbiter::new(kind, inputs)?,
        })
    }

    /// Combinational routing and the granted input index for this cycle.
    pub fn eval(&self, input_valid: &[bool], output_ready: bool) -> (MuxView, Option<usize>) {
        let sel = self.arb.grant(input_valid);
        (hs_mux(sel, input_valid, output_ready), sel)
    }

    /// Applies one clock edge.
    pub fn tick(&mut self, input_valid: &[bool], output_ready: bool) {
        let (view, _) = self.eval(input_valid, output_ready);
        self.arb.tick(input_valid, view.output_valid && output_ready);
    }

    /// Synchronous reset.
    pub fn reset(&mut self) {
        self.arb.reset();
    }
}

/// Arbitrated one-to-many demux: the arbiter picks among outputs asserting
/// ready; a round-robin arbiter rotates priority exactly on cycles where
/// the demuxed input transfers.
#[derive(Clone, Debug)]
pub struct HsArbDemux {
    arb: Arbiter,
}

impl HsArbDemux {
    /// Builds an arbitrated demux over `outputs` interfaces.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroRequests`] when `outputs == 0`.
    pub fn new(kind: ArbiterKind, outputs: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            arb: Arbiter::new(kind, outputs)?,
        })
    }

    /// Combinational routing and the granted output index for this cycle.
    pub fn eval(&self, input_valid: bool, output_ready: &[bool]) -> (DemuxView, Option<usize>) {
        let sel = self.arb.grant(output_ready);
        (hs_demux(sel, input_valid, output_ready), sel)
    }

    /// Applies one clock edge.
    pub fn tick(&mut self, input_valid: bool, output_ready: &[bool]) {
        let (view, _) = self.eval(input_valid, output_ready);
        self.arb.tick(output_ready, view.input_ready && input_valid);
    }

    /// Synchronous reset.
    pub fn reset(&mut self) {
        self.arb.reset();
    }
}
