//! Component configuration.
//!
//! This module defines the construction parameters for every block in the
//! library. It provides:
//! 1. **Defaults:** baseline geometry used when a field is omitted.
//! 2. **Structures:** per-block config structs plus an aggregate [`Config`].
//! 3. **Loading:** JSON deserialization and up-front validation, so a bad
//!    geometry is rejected before any component is built.

use serde::Deserialize;

use crate::blocks::arbiter::ArbiterKind;
use crate::common::error::ConfigError;

/// Default geometry used when a configuration field is omitted.
mod defaults {
    /// Default FIFO depth in cells.
    pub const DEPTH: usize = 2;

    /// Default payload width in bits.
    pub const WIDTH: usize = 8;

    /// Default number of pipeline stages.
    pub const NUM_STAGES: usize = 1;

    /// Default number of arbiter request lines.
    pub const REQUESTS: usize = 2;
}

/// Geometry and thresholds for a FIFO (plain or speculative).
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FifoConfig {
    /// Number of storage cells. Must be at least 1.
    pub depth: usize,
    /// Payload width in bits, up to the 64-bit cell limit. A width of 0 is
    /// legal and makes the FIFO a pure token counter.
    pub width: usize,
    /// Almost-full threshold in cells; defaults to `depth / 2`.
    pub afull_th: Option<usize>,
    /// Almost-empty threshold in cells; defaults to `depth / 2`.
    pub aempty_th: Option<usize>,
}

impl Default for FifoConfig {
    fn default() -> Self {
        Self {
            depth: defaults::DEPTH,
            width: defaults::WIDTH,
            afull_th: None,
            aempty_th: None,
        }
    }
}

impl FifoConfig {
    /// Shorthand for a config with explicit geometry and default thresholds.
    pub const fn new(depth: usize, width: usize) -> Self {
        Self {
            depth,
            width,
            afull_th: None,
            aempty_th: None,
        }
    }

    /// Resolved almost-full threshold.
    pub fn afull_threshold(&self) -> usize {
        self.afull_th.unwrap_or(self.depth / 2)
    }

    /// Resolved almost-empty threshold.
    pub fn aempty_threshold(&self) -> usize {
        self.aempty_th.unwrap_or(self.depth / 2)
    }

    /// Rejects impossible geometry.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroDepth`] for a cell-less FIFO,
    /// [`ConfigError::WidthTooWide`] for payloads beyond 64 bits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.width > 64 {
            return Err(ConfigError::WidthTooWide { width: self.width });
        }
        Ok(())
    }
}

/// Geometry for a [`PipelineControl`](crate::blocks::pipeline::PipelineControl).
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Number of pipeline stages. Must be at least 1.
    pub num_stages: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            num_stages: defaults::NUM_STAGES,
        }
    }
}

impl PipelineConfig {
    /// Rejects a stage-less pipeline.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroStages`] when `num_stages == 0`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_stages == 0 {
            return Err(ConfigError::ZeroStages);
        }
        Ok(())
    }
}

/// Strategy and width for an [`Arbiter`](crate::blocks::arbiter::Arbiter).
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArbiterConfig {
    /// Arbitration strategy.
    pub kind: ArbiterKind,
    /// Number of request lines. Must be at least 1.
    pub requests: usize,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            kind: ArbiterKind::Priority,
            requests: defaults::REQUESTS,
        }
    }
}

impl ArbiterConfig {
    /// Rejects an arbiter with nothing to arbitrate.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroRequests`] when `requests == 0`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.requests == 0 {
            return Err(ConfigError::ZeroRequests);
        }
        Ok(())
    }
}

/// Aggregate configuration for a design composed from this library.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// FIFO geometry.
    pub fifo: FifoConfig,
    /// Pipeline geometry.
    pub pipeline: PipelineConfig,
    /// Arbiter strategy.
    pub arbiter: ArbiterConfig,
}

impl Config {
    /// Loads and validates a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed JSON, otherwise whatever
    /// [`Config::validate`] rejects.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// The first section error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fifo.validate()?;
        self.pipeline.validate()?;
        self.arbiter.validate()?;
        Ok(())
    }
}
