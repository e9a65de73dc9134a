//! Construction-time errors.
//!
//! Everything that can go wrong in this library goes wrong at construction
//! (elaboration) time: impossible geometries, mismatched signal-vector
//! widths, unknown strategy names. There are no runtime errors — conditions
//! like writing a full FIFO are reported through sticky status flags
//! (`ovf`/`udf`) while the component keeps operating.

use thiserror::Error;

/// Rejected component configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A FIFO needs at least one cell.
    #[error("fifo depth must be at least 1")]
    ZeroDepth,

    /// Cells are stored in 64-bit words; wider payloads are not supported.
    #[error("cell width {width} exceeds the 64-bit cell limit")]
    WidthTooWide {
        /// The requested payload width in bits.
        width: usize,
    },

    /// A pipeline needs at least one stage.
    #[error("pipeline must have at least 1 stage")]
    ZeroStages,

    /// A stop-override vector must carry one bit per pipeline stage.
    #[error("stop override width {got} does not match {expected} pipeline stages")]
    StopWidthMismatch {
        /// Number of stages the pipeline was built with.
        expected: usize,
        /// Width of the vector the caller tried to bind.
        got: usize,
    },

    /// An arbiter needs at least one request line.
    #[error("arbiter must have at least 1 request line")]
    ZeroRequests,

    /// The requested arbitration strategy does not exist.
    #[error("unknown arbiter kind {name:?} (expected \"priority\" or \"roundrobin\")")]
    UnknownArbiter {
        /// The name that failed to resolve.
        name: String,
    },

    /// A configuration document failed to deserialize.
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
