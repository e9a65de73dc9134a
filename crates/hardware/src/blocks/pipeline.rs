//! Pipeline control unit.
//!
//! Derives, for a chain of N stages in one clock domain, the per-stage
//! register enables and the pipeline-level handshake:
//! 1. **Forward chain:** each stage's "upstream offers data" view,
//!    propagated front to back from `rx_valid` and the stage valid
//!    registers.
//! 2. **Backward chain:** each stage's "downstream will accept" view,
//!    propagated back to front from `tx_ready`.
//! 3. **Stage enables:** a stage loads exactly when both views agree.
//!
//! Per-stage overrides support multi-cycle stages: `stop_rx[i]` makes
//! stage `i` run without consuming upstream data (a producer emitting
//! several outputs per input), `stop_tx[i]` hides stage `i`'s data from
//! downstream without blocking the stage itself (a consumer absorbing
//! several inputs per output). Callers driving the overrides from their
//! own stage logic are expected to register them.
//!
//! The two chains are independent — forward depends only on registered
//! valid bits, backward only on this cycle's ready/override inputs — so
//! one front-to-back and one back-to-front pass reach the fixed point
//! with no iteration and no combinational cycle.

use crate::common::error::ConfigError;
use crate::config::PipelineConfig;

/// Per-stage stall override vectors, one bit of each kind per stage.
///
/// Obtained from the pipeline it belongs to ([`PipelineControl::stops`] or
/// [`PipelineControl::bind_stops`]), which fixes the width at wiring time.
/// An unconnected override (passing `None` to `eval`/`tick`) behaves as
/// all-false.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StopOverrides {
    stop_rx: Vec<bool>,
    stop_tx: Vec<bool>,
}

impl StopOverrides {
    /// Number of stages covered.
    pub fn len(&self) -> usize {
        self.stop_rx.len()
    }

    /// Whether the override covers zero stages (never true for vectors
    /// bound to a real pipeline).
    pub fn is_empty(&self) -> bool {
        self.stop_rx.is_empty()
    }

    /// The stop-consumption bit for `stage`.
    pub fn rx(&self, stage: usize) -> bool {
        self.stop_rx[stage]
    }

    /// The stop-production bit for `stage`.
    pub fn tx(&self, stage: usize) -> bool {
        self.stop_tx[stage]
    }

    /// Drives the stop-consumption bit for `stage`.
    pub fn set_rx(&mut self, stage: usize, value: bool) {
        self.stop_rx[stage] = value;
    }

    /// Drives the stop-production bit for `stage`.
    pub fn set_tx(&mut self, stage: usize, value: bool) {
        self.stop_tx[stage] = value;
    }

    /// Deasserts every override bit.
    pub fn clear(&mut self) {
        self.stop_rx.fill(false);
        self.stop_tx.fill(false);
    }
}

/// Combinational view of the pipeline for one cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipeCtrlView {
    /// The pipeline input accepts data this cycle.
    pub rx_ready: bool,
    /// The pipeline output presents valid data this cycle.
    pub tx_valid: bool,
    /// Per-stage register load enables, bit `i` for stage `i`.
    pub stage_enable: Vec<bool>,
}

/// The pipeline control engine: one registered valid bit per stage.
#[derive(Clone, Debug)]
pub struct PipelineControl {
    num_stages: usize,
    valid_reg: Vec<bool>,
}

impl PipelineControl {
    /// Builds a control unit for `num_stages` stages.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroStages`] when `num_stages == 0`.
    pub fn new(num_stages: usize) -> Result<Self, ConfigError> {
        if num_stages == 0 {
            return Err(ConfigError::ZeroStages);
        }
        Ok(Self {
            num_stages,
            valid_reg: vec![false; num_stages],
        })
    }

    /// Builds a control unit from a validated configuration.
    ///
    /// # Errors
    ///
    /// Whatever [`PipelineConfig::validate`] rejects.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::new(config.num_stages)
    }

    /// Number of stages.
    pub const fn num_stages(&self) -> usize {
        self.num_stages
    }

    /// The registered per-stage valid bits.
    pub fn stage_valid(&self) -> &[bool] {
        &self.valid_reg
    }

    /// An all-false override vector of the right width.
    pub fn stops(&self) -> StopOverrides {
        StopOverrides {
            stop_rx: vec![false; self.num_stages],
            stop_tx: vec![false; self.num_stages],
        }
    }

    /// Wires caller-supplied override vectors, rejecting a width mismatch.
    ///
    /// # Errors
    ///
    /// [`ConfigError::StopWidthMismatch`] when either vector does not
    /// carry exactly one bit per stage.
    pub fn bind_stops(
        &self,
        stop_rx: Vec<bool>,
        stop_tx: Vec<bool>,
    ) -> Result<StopOverrides, ConfigError> {
        for v in [&stop_rx, &stop_tx] {
            if v.len() != self.num_stages {
                return Err(ConfigError::StopWidthMismatch {
                    expected: self.num_stages,
                    got: v.len(),
                });
            }
        }
        Ok(StopOverrides { stop_rx, stop_tx })
    }

    /// Synchronous reset: every stage empties.
    pub fn reset(&mut self) {
        self.valid_reg.fill(false);
    }

    /// Evaluates the forward (valid) and backward (ready) chains.
    fn chains(
        &self,
        rx_valid: bool,
        tx_ready: bool,
        stops: Option<&StopOverrides>,
    ) -> (Vec<bool>, Vec<bool>) {
        let n = self.num_stages;
        if let Some(s) = stops {
            debug_assert_eq!(s.len(), n, "override vector bound to another pipeline");
        }
        let srx = |i: usize| stops.is_some_and(|s| s.rx(i));
        let stx = |i: usize| stops.is_some_and(|s| s.tx(i));

        // Forward: stage i sees data offered if the previous stage holds
        // unsuppressed valid data, or the stage manufactures its own.
        let mut valid_sl = vec![false; n];
        valid_sl[0] = rx_valid || srx(0);
        for i in 1..n {
            valid_sl[i] = (self.valid_reg[i - 1] && !stx(i - 1)) || srx(i);
        }

        // Backward: stage i may advance if the next stage accepts, unless
        // the next stage stalls consumption; a stage stalling production
        // may always advance internally.
        let mut rdy_sl = vec![false; n];
        rdy_sl[n - 1] = tx_ready || stx(n - 1) || !self.valid_reg[n - 1];
        for i in (0..n - 1).rev() {
            rdy_sl[i] = (rdy_sl[i + 1] && !srx(i + 1)) || stx(i);
        }

        (valid_sl, rdy_sl)
    }

    /// Combinational outputs for the current cycle.
    pub fn eval(
        &self,
        rx_valid: bool,
        tx_ready: bool,
        stops: Option<&StopOverrides>,
    ) -> PipeCtrlView {
        let n = self.num_stages;
        let (valid_sl, rdy_sl) = self.chains(rx_valid, tx_ready, stops);
        let srx0 = stops.is_some_and(|s| s.rx(0));
        let stx_last = stops.is_some_and(|s| s.tx(n - 1));
        PipeCtrlView {
            rx_ready: rdy_sl[0] && !srx0,
            tx_valid: self.valid_reg[n - 1] && !stx_last,
            stage_enable: valid_sl
                .iter()
                .zip(&rdy_sl)
                .map(|(&v, &r)| v && r)
                .collect(),
        }
    }

    /// Applies one clock edge: a stage's valid bit loads from the forward
    /// chain exactly when its backward-chain ready holds, and is sticky
    /// otherwise.
    pub fn tick(&mut self, rx_valid: bool, tx_ready: bool, stops: Option<&StopOverrides>) {
        let (valid_sl, rdy_sl) = self.chains(rx_valid, tx_ready, stops);
        for i in 0..self.num_stages {
            if rdy_sl[i] {
                self.valid_reg[i] = valid_sl[i];
            }
        }
    }
}
