//! Wire messages exchanged with the command stream.
//!
//! The inbound command batch keeps the original parallel-array layout:
//! one name array plus eleven index-aligned value arrays. Outbound
//! snapshots carry a microsecond timestamp and per-joint name/value
//! arrays. Serialization is the transport's concern; these types only
//! derive serde.

use serde::{Deserialize, Serialize};

use crate::joints::JointCommand;

// ─── Logical Channels ───────────────────────────────────────────────

/// Inbound joint command batches.
pub const CHANNEL_COMMAND: &str = "ROBOT_COMMAND";
/// Measured joint state, gated by `publish_core_robot_state`.
pub const CHANNEL_CORE_STATE: &str = "CORE_ROBOT_STATE";
/// Echo of the currently held targets (unconditional).
pub const CHANNEL_COMMAND_ECHO: &str = "COMMAND_FEEDBACK";
/// Clamped output effort for effort-controlled joints (unconditional).
pub const CHANNEL_COMMAND_TORQUE: &str = "COMMAND_FEEDBACK_TORQUE";
/// Full robot-state snapshot, gated by `publish_est_robot_state`.
pub const CHANNEL_EST_STATE: &str = "EST_ROBOT_STATE";

// ─── Inbound Command Batch ──────────────────────────────────────────

/// One inbound command update for a set of joints.
///
/// `joint_name[i]` keys the i-th entry of every value array. A batch may
/// reference joints the receiver does not manage; such entries are
/// skipped. Arrays shorter than `num_joints` yield skipped entries, not
/// errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandBatch {
    /// Sender timestamp [µs].
    pub utime: i64,
    /// Declared number of per-joint entries.
    pub num_joints: u32,

    pub joint_name: Vec<String>,
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,
    pub effort: Vec<f64>,
    pub k_q_p: Vec<f64>,
    pub k_q_i: Vec<f64>,
    pub k_qd_p: Vec<f64>,
    pub k_f_p: Vec<f64>,
    pub ff_qd: Vec<f64>,
    pub ff_qd_d: Vec<f64>,
    pub ff_f_d: Vec<f64>,
    pub ff_const: Vec<f64>,
}

impl CommandBatch {
    /// Empty batch with the given timestamp.
    pub fn new(utime: i64) -> Self {
        Self {
            utime,
            ..Default::default()
        }
    }

    /// Append one joint entry, keeping all arrays index-aligned.
    pub fn push(&mut self, name: &str, command: JointCommand) {
        self.joint_name.push(name.to_string());
        self.position.push(command.position);
        self.velocity.push(command.velocity);
        self.effort.push(command.effort);
        self.k_q_p.push(command.k_q_p);
        self.k_q_i.push(command.k_q_i);
        self.k_qd_p.push(command.k_qd_p);
        self.k_f_p.push(command.k_f_p);
        self.ff_qd.push(command.ff_qd);
        self.ff_qd_d.push(command.ff_qd_d);
        self.ff_f_d.push(command.ff_f_d);
        self.ff_const.push(command.ff_const);
        self.num_joints += 1;
    }

    /// Assemble the i-th entry, or `None` when any array lacks index `i`.
    pub fn entry(&self, i: usize) -> Option<(&str, JointCommand)> {
        let name = self.joint_name.get(i)?;
        let command = JointCommand {
            position: *self.position.get(i)?,
            velocity: *self.velocity.get(i)?,
            effort: *self.effort.get(i)?,
            k_q_p: *self.k_q_p.get(i)?,
            k_q_i: *self.k_q_i.get(i)?,
            k_qd_p: *self.k_qd_p.get(i)?,
            k_f_p: *self.k_f_p.get(i)?,
            ff_qd: *self.ff_qd.get(i)?,
            ff_qd_d: *self.ff_qd_d.get(i)?,
            ff_f_d: *self.ff_f_d.get(i)?,
            ff_const: *self.ff_const.get(i)?,
        };
        Some((name.as_str(), command))
    }
}

// ─── Outbound Snapshots ─────────────────────────────────────────────

/// Per-joint name/position/velocity/effort arrays with a timestamp.
///
/// Used for both the measured-state snapshot and the command echo (where
/// the arrays carry targets instead of measurements).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointStateSnapshot {
    /// Capture timestamp [µs].
    pub utime: i64,
    pub num_joints: u32,
    pub joint_name: Vec<String>,
    pub joint_position: Vec<f64>,
    pub joint_velocity: Vec<f64>,
    pub joint_effort: Vec<f64>,
}

impl JointStateSnapshot {
    /// Empty snapshot with arrays reserved for `capacity` joints.
    pub fn with_capacity(utime: i64, capacity: usize) -> Self {
        Self {
            utime,
            num_joints: 0,
            joint_name: Vec::with_capacity(capacity),
            joint_position: Vec::with_capacity(capacity),
            joint_velocity: Vec::with_capacity(capacity),
            joint_effort: Vec::with_capacity(capacity),
        }
    }

    /// Append one joint row.
    pub fn push(&mut self, name: &str, position: f64, velocity: f64, effort: f64) {
        self.joint_name.push(name.to_string());
        self.joint_position.push(position);
        self.joint_velocity.push(velocity);
        self.joint_effort.push(effort);
        self.num_joints += 1;
    }
}

/// Clamped output effort per effort-controlled joint, tagged with the
/// robot identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TorqueSnapshot {
    pub robot_name: String,
    /// Capture timestamp [µs].
    pub utime: i64,
    pub num_joints: u32,
    pub joint_name: Vec<String>,
    /// Clamped output effort, identical to the value applied to hardware
    /// when command application is enabled.
    pub joint_effort: Vec<f64>,
}

impl TorqueSnapshot {
    /// Empty snapshot with arrays reserved for `capacity` joints.
    pub fn with_capacity(robot_name: &str, utime: i64, capacity: usize) -> Self {
        Self {
            robot_name: robot_name.to_string(),
            utime,
            num_joints: 0,
            joint_name: Vec::with_capacity(capacity),
            joint_effort: Vec::with_capacity(capacity),
        }
    }

    /// Append one joint row.
    pub fn push(&mut self, name: &str, effort: f64) {
        self.joint_name.push(name.to_string());
        self.joint_effort.push(effort);
        self.num_joints += 1;
    }
}

/// Placeholder base pose: zero translation, identity rotation.
///
/// No estimator runs in this layer; the fields are carried for message
/// compatibility only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub translation: [f64; 3],
    /// Quaternion in (w, x, y, z) order.
    pub rotation_wxyz: [f64; 4],
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation_wxyz: [1.0, 0.0, 0.0, 0.0],
        }
    }
}

/// Placeholder base twist: zero linear and angular velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Twist {
    pub linear: [f64; 3],
    pub angular: [f64; 3],
}

/// Full robot-state snapshot: measured joint arrays plus the placeholder
/// pose/twist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotStateSnapshot {
    /// Capture timestamp [µs].
    pub utime: i64,
    pub num_joints: u32,
    pub joint_name: Vec<String>,
    pub joint_position: Vec<f64>,
    pub joint_velocity: Vec<f64>,
    pub joint_effort: Vec<f64>,
    pub pose: Pose,
    pub twist: Twist,
}

impl RobotStateSnapshot {
    /// Empty snapshot with arrays reserved for `capacity` joints.
    pub fn with_capacity(utime: i64, capacity: usize) -> Self {
        Self {
            utime,
            num_joints: 0,
            joint_name: Vec::with_capacity(capacity),
            joint_position: Vec::with_capacity(capacity),
            joint_velocity: Vec::with_capacity(capacity),
            joint_effort: Vec::with_capacity(capacity),
            pose: Pose::default(),
            twist: Twist::default(),
        }
    }

    /// Append one joint row.
    pub fn push(&mut self, name: &str, position: f64, velocity: f64, effort: f64) {
        self.joint_name.push(name.to_string());
        self.joint_position.push(position);
        self.joint_velocity.push(velocity);
        self.joint_effort.push(effort);
        self.num_joints += 1;
    }
}
