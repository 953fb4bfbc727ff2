//! System-wide constants for the TORC workspace.
//!
//! Single source of truth for safety bounds and default values.
//! Imported by all crates — no duplication permitted.

/// Default minimum joint position when no limits are configured [rad].
pub const DEFAULT_MIN_POSITION: f64 = -10.0;

/// Default maximum joint position when no limits are configured [rad].
pub const DEFAULT_MAX_POSITION: f64 = 10.0;

/// Default maximum joint effort magnitude when no limits are configured.
pub const DEFAULT_MAX_EFFORT: f64 = 100.0;

/// Width of the taper zone past a position limit [rad].
///
/// Commanded effort scales linearly from full authority at the limit edge
/// down to zero this far beyond it; past the zone the effort is nulled.
pub const RAMP_BOUND: f64 = 0.1;

/// Maximum allowed difference between the commanded effort and the
/// currently measured effort within a single cycle.
pub const EFFORT_MAX_CHANGE: f64 = 20.0;

/// Commanded efforts at or above this magnitude are implausible and are
/// replaced with zero before being reported or applied.
pub const EFFORT_SANITY_BOUND: f64 = 1000.0;

/// Default cycle time in microseconds (500 Hz = 2000 µs).
pub const DEFAULT_CYCLE_TIME_US: u32 = 2000;

/// Minimum accepted cycle time [µs].
pub const CYCLE_TIME_US_MIN: u32 = 100;

/// Maximum accepted cycle time [µs].
pub const CYCLE_TIME_US_MAX: u32 = 100_000;

/// Default robot identifier tag carried in the torque feedback snapshot.
pub const DEFAULT_ROBOT_NAME: &str = "torc";
