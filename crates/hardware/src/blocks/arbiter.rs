//! Request arbiters.
//!
//! Two strategies behind one dispatch wrapper:
//! 1. **Priority:** combinational; the lowest-index asserted request wins.
//! 2. **Round-robin:** a registered priority pointer; the most recently
//!    granted requester drops to lowest priority once its grant is
//!    consumed.

use std::str::FromStr;

use serde::Deserialize;

use crate::common::error::ConfigError;
use crate::config::ArbiterConfig;

/// Arbitration strategy selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArbiterKind {
    /// Static priority, request 0 highest.
    #[default]
    Priority,
    /// Rotating priority.
    RoundRobin,
}

impl FromStr for ArbiterKind {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "priority" => Ok(Self::Priority),
            "roundrobin" => Ok(Self::RoundRobin),
            _ => Err(ConfigError::UnknownArbiter {
                name: name.to_owned(),
            }),
        }
    }
}

/// Combinational priority select: the lowest asserted index, if any.
pub fn priority_select(req: &[bool]) -> Option<usize> {
    req.iter().position(|&r| r)
}

/// Round-robin arbiter with a registered priority pointer.
///
/// The grant is combinational from the pointer and this cycle's requests;
/// the pointer moves onto the granted index only on cycles where the
/// caller asserts `en` (i.e. the grant was consumed), so an unconsumed
/// grant keeps its priority. Reset parks the pointer at the last index,
/// giving request 0 the highest priority first.
#[derive(Clone, Debug)]
pub struct RoundRobinArbiter {
    requests: usize,
    ptr: usize,
}

impl RoundRobinArbiter {
    /// Builds an arbiter over `requests` lines.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroRequests`] when `requests == 0`.
    pub fn new(requests: usize) -> Result<Self, ConfigError> {
        if requests == 0 {
            return Err(ConfigError::ZeroRequests);
        }
        Ok(Self {
            requests,
            ptr: requests - 1,
        })
    }

    /// Number of request lines.
    pub const fn requests(&self) -> usize {
        self.requests
    }

    /// Combinational grant: the first asserted request after the priority
    /// pointer, wrapping.
    pub fn grant(&self, req: &[bool]) -> Option<usize> {
        debug_assert_eq!(req.len(), self.requests);
        (1..=self.requests)
            .map(|k| (self.ptr + k) % self.requests)
            .find(|&i| req[i])
    }

    /// Applies one clock edge: with `en` asserted, the granted requester
    /// becomes lowest priority.
    pub fn tick(&mut self, req: &[bool], en: bool) {
        if en && let Some(granted) = self.grant(req) {
            self.ptr = granted;
        }
    }

    /// Synchronous reset.
    pub fn reset(&mut self) {
        self.ptr = self.requests - 1;
    }
}

/// Strategy-dispatched arbiter.
#[derive(Clone, Debug)]
pub enum Arbiter {
    /// Static priority over `n` request lines.
    Priority {
        /// Number of request lines.
        requests: usize,
    },
    /// Rotating priority.
    RoundRobin(RoundRobinArbiter),
}

impl Arbiter {
    /// Builds an arbiter of the given kind over `requests` lines.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroRequests`] when `requests == 0`.
    pub fn new(kind: ArbiterKind, requests: usize) -> Result<Self, ConfigError> {
        if requests == 0 {
            return Err(ConfigError::ZeroRequests);
        }
        Ok(match kind {
            ArbiterKind::Priority => Self::Priority { requests },
            ArbiterKind::RoundRobin => Self::RoundRobin(RoundRobinArbiter::new(requests)?),
        })
    }

    /// Builds an arbiter from a validated configuration.
    ///
    /// # Errors
    ///
    /// Whatever [`ArbiterConfig::validate`] rejects.
    pub fn from_config(config: &ArbiterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::new(config.kind, config.requests)
    }

    /// The strategy this arbiter dispatches to.
    pub const fn kind(&self) -> ArbiterKind {
        match self {
            Self::Priority { .. } => ArbiterKind::Priority,
            Self::RoundRobin(_) => ArbiterKind::RoundRobin,
        }
    }

    /// Number of request lines.
    pub const fn requests(&self) -> usize {
        match self {
            Self::Priority { requests } => *requests,
            Self::RoundRobin(rr) => rr.requests(),
        }
    }

    /// Combinational grant for this cycle's requests.
    pub fn grant(&self, req: &[bool]) -> Option<usize> {
        match self {
            Self::Priority { requests } => {
                debug_assert_eq!(req.len(), *requests);
                priority_select(req)
            }
            Self::RoundRobin(rr) => rr.grant(req),
        }
    }

    /// Applies one clock edge; a no-op for the stateless priority arbiter.
    pub fn tick(&mut self, req: &[bool], en: bool) {
        if let Self::RoundRobin(rr) = self {
            rr.tick(req, en);
        }
    }

    /// Synchronous reset; a no-op for the stateless priority arbiter.
    pub fn reset(&mut self) {
        if let Self::RoundRobin(rr) = self {
            rr.reset();
        }
    }
}
