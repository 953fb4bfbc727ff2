//! Configuration structures for the translator.
//!
//! All types use `serde::Deserialize` for TOML loading. Optional fields
//! use `#[serde(default)]` so old config files keep parsing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::{
    CYCLE_TIME_US_MAX, CYCLE_TIME_US_MIN, DEFAULT_CYCLE_TIME_US, DEFAULT_ROBOT_NAME,
};
use crate::joints::{JointKind, JointLimits};

// ─── Translator Config ──────────────────────────────────────────────

/// Resolved translator configuration.
///
/// Produced by the loader in `torc_translator::config`, which warns and
/// substitutes defaults for absent values. Immutable after startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Publish the measured joint-state snapshot (default: true).
    pub publish_core_robot_state: bool,

    /// Publish the full robot-state snapshot (default: false).
    pub publish_est_robot_state: bool,

    /// Actually write computed commands to hardware (default: false —
    /// dry-run unless explicitly enabled).
    pub apply_commands: bool,

    /// Target cycle time in microseconds (default: 2000 = 500 Hz).
    pub cycle_time_us: u32,

    /// Explicit subset of joints to manage. Empty ⇒ claim every joint
    /// the hardware advertises.
    #[serde(default)]
    pub joints: Vec<String>,

    /// Robot identifier tag carried in the torque feedback snapshot.
    pub robot_name: String,

    /// Per-joint limits, keyed by joint name. Joints without an entry
    /// fall back to the documented defaults.
    #[serde(default)]
    pub limits: HashMap<String, JointLimits>,

    /// Joint declarations for the bundled simulation bank (demo binary
    /// and tests only; ignored when a real bank is supplied).
    #[serde(default)]
    pub sim_joints: Vec<SimJointConfig>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            publish_core_robot_state: true,
            publish_est_robot_state: false,
            apply_commands: false,
            cycle_time_us: DEFAULT_CYCLE_TIME_US,
            joints: Vec::new(),
            robot_name: DEFAULT_ROBOT_NAME.to_string(),
            limits: HashMap::new(),
            sim_joints: Vec::new(),
        }
    }
}

impl TranslatorConfig {
    /// Validate parameter bounds and per-joint limit sanity.
    pub fn validate(&self) -> Result<(), String> {
        if self.cycle_time_us < CYCLE_TIME_US_MIN || self.cycle_time_us > CYCLE_TIME_US_MAX {
            return Err(format!(
                "cycle_time_us {} out of range [{}, {}]",
                self.cycle_time_us, CYCLE_TIME_US_MIN, CYCLE_TIME_US_MAX
            ));
        }
        if self.robot_name.is_empty() {
            return Err("robot_name must not be empty".to_string());
        }
        for (name, limits) in &self.limits {
            limits
                .validate()
                .map_err(|e| format!("limits for joint {name}: {e}"))?;
        }
        for joint in &self.joints {
            if joint.is_empty() {
                return Err("joint selection contains an empty name".to_string());
            }
        }
        let mut seen = std::collections::HashSet::new();
        for sim in &self.sim_joints {
            if !seen.insert(sim.name.as_str()) {
                return Err(format!("duplicate sim joint {}", sim.name));
            }
        }
        Ok(())
    }
}

// ─── Simulation Bank Declaration ────────────────────────────────────

/// One joint of the bundled simulation bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimJointConfig {
    /// Joint name (e.g., "leftElbowPitch").
    pub name: String,
    /// Control kind: "effort" or "position".
    pub kind: JointKind,
}
