//! Error types for translator initialization and operation.
//!
//! Per-cycle safety-rule triggers are not errors: the value is corrected
//! in place, a diagnostic is logged, and the cycle continues. These types
//! cover the failures that abort initialization or reject an operation in
//! the wrong lifecycle state.

use thiserror::Error;

use torc_common::joints::JointKind;

use crate::config::ConfigError;
use crate::state::Lifecycle;

/// Fatal initialization/lifecycle errors.
#[derive(Debug, Error)]
pub enum TranslatorError {
    /// The hardware exposes no interface for a whole capability category;
    /// the control law cannot safely operate without it.
    #[error("hardware exposes no {0:?} interface")]
    MissingCapability(JointKind),

    /// Discovery and claiming produced an empty joint directory.
    #[error("no joints claimed; check the configured joint selection")]
    NoJointsClaimed,

    /// Operation attempted in a lifecycle state that does not allow it.
    #[error("{op} not allowed in state {state:?}: {reason}")]
    InvalidTransition {
        state: Lifecycle,
        op: &'static str,
        reason: &'static str,
    },

    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Real-time setup system call failed.
    #[error("RT setup error: {0}")]
    RtSetup(String),
}

/// Per-joint hardware access errors.
///
/// A claim failure excludes that joint from the directory; the remaining
/// joints proceed normally.
#[derive(Debug, Clone, Error)]
pub enum HardwareError {
    /// Joint handle could not be acquired.
    #[error("joint handle unavailable: {0}")]
    HandleUnavailable(String),
}
