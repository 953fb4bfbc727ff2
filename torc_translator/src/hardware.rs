//! Hardware boundary: joint bank trait and the bundled simulation bank.
//!
//! The translator consumes hardware through this trait; it never owns a
//! driver. Per cycle it reads one sensor sample per joint and, when
//! command application is enabled, writes one effort or position command
//! per joint depending on its kind.

use std::collections::HashMap;

use tracing::debug;

use torc_common::config::SimJointConfig;
use torc_common::joints::{JointKind, JointSensorSample};

use crate::error::HardwareError;

// ─── JointBank Trait ────────────────────────────────────────────────

/// Interface to a bank of actuated joints.
///
/// # Lifecycle
///
/// 1. `supports()` / `joint_names()` — discovery, before the RT loop
/// 2. `claim()` — once per managed joint during initialization
/// 3. `sample()` / `apply_*()` — every cycle, must not block
pub trait JointBank: Send {
    /// Bank identifier for logs (e.g., "sim", "ethercat").
    fn name(&self) -> &'static str;

    /// Whether the bank exposes an interface for this control kind at
    /// all. A missing category is fatal to initialization.
    fn supports(&self, kind: JointKind) -> bool;

    /// Names of the joints advertised under this control kind, in the
    /// bank's discovery order.
    fn joint_names(&self, kind: JointKind) -> Vec<String>;

    /// Acquire the handle for one joint. Failure excludes the joint from
    /// the directory; the remaining joints proceed normally.
    fn claim(&mut self, name: &str, kind: JointKind) -> Result<(), HardwareError>;

    /// Read the joint's sensor feedback. Total: unknown names yield a
    /// zeroed sample (the directory never asks for unclaimed joints).
    fn sample(&self, name: &str) -> JointSensorSample;

    /// Write an effort command to an effort-controlled joint.
    fn apply_effort(&mut self, name: &str, effort: f64);

    /// Write a position command to a position-controlled joint.
    fn apply_position(&mut self, name: &str, position: f64);
}

// ─── Simulation Bank ────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct SimJoint {
    kind: Option<JointKind>,
    sample: JointSensorSample,
    applied_effort: Option<f64>,
    applied_position: Option<f64>,
    fail_claim: bool,
}

/// In-memory joint bank for tests and the demo binary.
///
/// Commanded values are recorded but do not feed back into the sensor
/// sample; the measurement only changes via [`SimJointBank::set_sample`].
#[derive(Debug, Default)]
pub struct SimJointBank {
    order: Vec<String>,
    joints: HashMap<String, SimJoint>,
    effort_interface: bool,
    position_interface: bool,
}

impl SimJointBank {
    /// Empty bank advertising both interface categories.
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            joints: HashMap::new(),
            effort_interface: true,
            position_interface: true,
        }
    }

    /// Bank built from the `sim_joints` config section.
    pub fn from_config(sim_joints: &[SimJointConfig]) -> Self {
        let mut bank = Self::new();
        for joint in sim_joints {
            bank.add_joint(&joint.name, joint.kind);
        }
        bank
    }

    /// Add a joint in discovery order with a zeroed sample.
    pub fn add_joint(&mut self, name: &str, kind: JointKind) -> &mut Self {
        self.order.push(name.to_string());
        self.joints.insert(
            name.to_string(),
            SimJoint {
                kind: Some(kind),
                ..Default::default()
            },
        );
        self
    }

    /// Remove a whole interface category (test hook for the fatal
    /// missing-capability path).
    pub fn without_capability(mut self, kind: JointKind) -> Self {
        match kind {
            JointKind::EffortControlled => self.effort_interface = false,
            JointKind::PositionControlled => self.position_interface = false,
        }
        self
    }

    /// Make `claim()` fail for one joint (test hook).
    pub fn fail_claim_on(&mut self, name: &str) {
        if let Some(joint) = self.joints.get_mut(name) {
            joint.fail_claim = true;
        }
    }

    /// Overwrite a joint's sensor sample.
    pub fn set_sample(&mut self, name: &str, sample: JointSensorSample) {
        if let Some(joint) = self.joints.get_mut(name) {
            joint.sample = sample;
        }
    }

    /// Last effort written to this joint, if any.
    pub fn applied_effort(&self, name: &str) -> Option<f64> {
        self.joints.get(name).and_then(|j| j.applied_effort)
    }

    /// Last position written to this joint, if any.
    pub fn applied_position(&self, name: &str) -> Option<f64> {
        self.joints.get(name).and_then(|j| j.applied_position)
    }
}

impl JointBank for SimJointBank {
    fn name(&self) -> &'static str {
        "sim"
    }

    fn supports(&self, kind: JointKind) -> bool {
        match kind {
            JointKind::EffortControlled => self.effort_interface,
            JointKind::PositionControlled => self.position_interface,
        }
    }

    fn joint_names(&self, kind: JointKind) -> Vec<String> {
        self.order
            .iter()
            .filter(|name| self.joints[name.as_str()].kind == Some(kind))
            .cloned()
            .collect()
    }

    fn claim(&mut self, name: &str, kind: JointKind) -> Result<(), HardwareError> {
        match self.joints.get(name) {
            Some(joint) if joint.fail_claim => {
                Err(HardwareError::HandleUnavailable(name.to_string()))
            }
            Some(joint) if joint.kind == Some(kind) => {
                debug!("sim bank: claimed {kind:?} joint {name}");
                Ok(())
            }
            _ => Err(HardwareError::HandleUnavailable(name.to_string())),
        }
    }

    fn sample(&self, name: &str) -> JointSensorSample {
        self.joints
            .get(name)
            .map(|j| j.sample)
            .unwrap_or_default()
    }

    fn apply_effort(&mut self, name: &str, effort: f64) {
        if let Some(joint) = self.joints.get_mut(name) {
            joint.applied_effort = Some(effort);
        }
    }

    fn apply_position(&mut self, name: &str, position: f64) {
        if let Some(joint) = self.joints.get_mut(name) {
            joint.applied_position = Some(position);
        }
    }
}
