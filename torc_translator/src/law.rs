//! Per-joint control law and the ordered safety-clamp pipeline.
//!
//! Pure functions over one joint's command, sensor sample, and limits;
//! the cycle driver calls them once per joint per tick and owns the
//! diagnostic logging for fired stages. Stage order is fixed: magnitude
//! clamp → limit-proximity ramp → rate-of-change clamp → sanity bound.

use bitflags::bitflags;

use torc_common::consts::{EFFORT_MAX_CHANGE, EFFORT_SANITY_BOUND, RAMP_BOUND};
use torc_common::joints::{JointCommand, JointLimits, JointSensorSample};

bitflags! {
    /// Safety stages that fired while computing one joint's command.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ClampFlags: u8 {
        /// Raw effort exceeded `±max_effort`.
        const MAGNITUDE = 1 << 0;
        /// Inside the taper zone past a position limit; effort scaled.
        const RAMP_SCALED = 1 << 1;
        /// Past the taper zone; effort forced to zero.
        const RAMP_ZEROED = 1 << 2;
        /// Effort differed from the measured value by more than the
        /// per-cycle change bound.
        const RATE_LIMITED = 1 << 3;
        /// Implausible magnitude; effort replaced with zero.
        const SANITY_ZEROED = 1 << 4;
        /// Position target was outside the joint's range.
        const POSITION_CLAMPED = 1 << 5;
    }
}

/// Clamped effort output plus the stages that fired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffortCommand {
    pub effort: f64,
    pub flags: ClampFlags,
}

/// Clamped position output plus the stages that fired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionCommand {
    pub position: f64,
    pub flags: ClampFlags,
}

/// Unclamped feedback law for an effort-controlled joint.
///
/// Position/velocity/effort error terms under their gains, plus the four
/// feed-forward terms. The integral gain acts on one cycle's `dt` only;
/// no error state persists between cycles.
#[inline]
pub fn raw_effort(command: &JointCommand, sample: &JointSensorSample, dt: f64) -> f64 {
    let position_error = command.position - sample.position;
    command.k_q_p * position_error
        + command.k_q_i * position_error * dt
        + command.k_qd_p * (command.velocity - sample.velocity)
        + command.k_f_p * (command.effort - sample.effort)
        + command.ff_qd * sample.velocity
        + command.ff_qd_d * command.velocity
        + command.ff_f_d * command.effort
        + command.ff_const
}

/// Full effort pipeline for one joint in one cycle.
///
/// Each stage operates on the previous stage's output:
/// 1. Magnitude clamp to `[-max_effort, +max_effort]`.
/// 2. Limit-proximity ramp: linear taper from full authority at the
///    limit edge to zero at `RAMP_BOUND` past it; beyond the zone the
///    output is forced to zero.
/// 3. Rate-of-change clamp to within `EFFORT_MAX_CHANGE` of the
///    measured effort.
/// 4. Sanity bound: magnitudes at or above `EFFORT_SANITY_BOUND` become
///    exactly zero.
pub fn effort_command(
    command: &JointCommand,
    sample: &JointSensorSample,
    limits: &JointLimits,
    dt: f64,
) -> EffortCommand {
    let mut flags = ClampFlags::empty();
    let raw = raw_effort(command, sample, dt);

    // 1. Magnitude clamp.
    let mut effort = raw.clamp(-limits.max_effort, limits.max_effort);
    if effort != raw {
        flags |= ClampFlags::MAGNITUDE;
    }

    // 2. Limit-proximity ramp. err > 0 means the joint is past a limit.
    let err = (sample.position - limits.max_position).max(limits.min_position - sample.position);
    if err >= RAMP_BOUND {
        effort = 0.0;
        flags |= ClampFlags::RAMP_ZEROED;
    } else if err >= 0.0 {
        // Factor is exactly 1 at the limit edge, 0 at RAMP_BOUND past it.
        effort *= (RAMP_BOUND - err) / RAMP_BOUND;
        flags |= ClampFlags::RAMP_SCALED;
    }

    // 3. Rate-of-change clamp against the measured effort.
    let measured = sample.effort;
    if effort > measured + EFFORT_MAX_CHANGE {
        effort = measured + EFFORT_MAX_CHANGE;
        flags |= ClampFlags::RATE_LIMITED;
    } else if effort < measured - EFFORT_MAX_CHANGE {
        effort = measured - EFFORT_MAX_CHANGE;
        flags |= ClampFlags::RATE_LIMITED;
    }

    // 4. Sanity bound.
    if effort.abs() >= EFFORT_SANITY_BOUND {
        effort = 0.0;
        flags |= ClampFlags::SANITY_ZEROED;
    }

    EffortCommand { effort, flags }
}

/// Position pipeline: the target passed through with range clamping only.
pub fn position_command(command: &JointCommand, limits: &JointLimits) -> PositionCommand {
    let target = command.position;
    let position = target.clamp(limits.min_position, limits.max_position);
    let mut flags = ClampFlags::empty();
    if position != target {
        flags |= ClampFlags::POSITION_CLAMPED;
    }
    PositionCommand { position, flags }
}
