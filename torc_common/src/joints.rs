//! Joint data model: control kind, limits, target command, sensor sample.

use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

use crate::consts::{DEFAULT_MAX_EFFORT, DEFAULT_MAX_POSITION, DEFAULT_MIN_POSITION};

// ─── JointKind ──────────────────────────────────────────────────────

/// How a joint's actuator is commanded.
///
/// Fixed per joint at registration; selects the control-law branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JointKind {
    /// Commanded via a torque/force-like setpoint, regulated by the
    /// feedback control law.
    #[serde(rename = "effort")]
    EffortControlled,
    /// Commanded via a direct position setpoint, passed through with
    /// range clamping only.
    #[serde(rename = "position")]
    PositionControlled,
}

// ─── JointLimits ────────────────────────────────────────────────────

/// Position and effort limits for one joint.
///
/// Immutable after startup. Absence for a joint is a valid state resolved
/// via the documented defaults, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointLimits {
    /// Minimum allowed position [rad].
    #[serde(default = "default_min_position")]
    pub min_position: f64,
    /// Maximum allowed position [rad].
    #[serde(default = "default_max_position")]
    pub max_position: f64,
    /// Maximum commanded effort magnitude.
    #[serde(default = "default_max_effort")]
    pub max_effort: f64,
}

fn default_min_position() -> f64 {
    DEFAULT_MIN_POSITION
}
fn default_max_position() -> f64 {
    DEFAULT_MAX_POSITION
}
fn default_max_effort() -> f64 {
    DEFAULT_MAX_EFFORT
}

impl Default for JointLimits {
    fn default() -> Self {
        Self {
            min_position: DEFAULT_MIN_POSITION,
            max_position: DEFAULT_MAX_POSITION,
            max_effort: DEFAULT_MAX_EFFORT,
        }
    }
}

impl JointLimits {
    /// Check parameter sanity.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.min_position < self.max_position) {
            return Err(format!(
                "min_position {} must be below max_position {}",
                self.min_position, self.max_position
            ));
        }
        if !(self.max_effort > 0.0) {
            return Err(format!("max_effort {} must be positive", self.max_effort));
        }
        Ok(())
    }
}

// ─── JointCommand ───────────────────────────────────────────────────

/// Latest accepted target command for one joint — 11 × f64 = 88 bytes.
///
/// Targets, feedback gains, and feed-forward terms. Owned exclusively by
/// the command table, keyed by joint name; created zeroed when a joint is
/// registered, overwritten whole by command ingest, never removed before
/// shutdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct JointCommand {
    /// Target position [rad].
    pub position: f64,
    /// Target velocity [rad/s].
    pub velocity: f64,
    /// Target effort.
    pub effort: f64,

    /// Position error gain.
    pub k_q_p: f64,
    /// Position error integral gain (applied over one cycle's dt).
    pub k_q_i: f64,
    /// Velocity error gain.
    pub k_qd_p: f64,
    /// Effort error gain.
    pub k_f_p: f64,

    /// Feed-forward gain on measured velocity.
    pub ff_qd: f64,
    /// Feed-forward gain on target velocity.
    pub ff_qd_d: f64,
    /// Feed-forward gain on target effort.
    pub ff_f_d: f64,
    /// Constant feed-forward offset.
    pub ff_const: f64,
}

const_assert_eq!(core::mem::size_of::<JointCommand>(), 88);

// ─── JointSensorSample ──────────────────────────────────────────────

/// One joint's sensor feedback, read fresh from hardware each cycle.
///
/// Not persisted between cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointSensorSample {
    /// Measured position [rad].
    pub position: f64,
    /// Measured velocity [rad/s].
    pub velocity: f64,
    /// Measured effort.
    pub effort: f64,
}
