//! Per-cycle snapshot assembly.
//!
//! One `SnapshotSet` per tick, filled in the directory's frozen joint
//! order and published as four messages. The measured and full-state
//! snapshots carry the same joint arrays; the full-state message adds
//! the placeholder pose/twist.

use torc_common::joints::{JointCommand, JointSensorSample};
use torc_common::msg::{JointStateSnapshot, RobotStateSnapshot, TorqueSnapshot};

/// The four outbound messages under construction for one cycle.
#[derive(Debug)]
pub struct SnapshotSet {
    /// Measured joint state (effort joints: post-command-write reading).
    pub measured: JointStateSnapshot,
    /// Echo of the targets held in the command table.
    pub echo: JointStateSnapshot,
    /// Clamped output effort, effort-controlled joints only.
    pub torque: TorqueSnapshot,
    /// Measured state plus placeholder pose/twist.
    pub robot_state: RobotStateSnapshot,
}

impl SnapshotSet {
    /// Empty set with arrays reserved for the directory's joint counts.
    pub fn new(robot_name: &str, utime: i64, joint_count: usize, effort_count: usize) -> Self {
        Self {
            measured: JointStateSnapshot::with_capacity(utime, joint_count),
            echo: JointStateSnapshot::with_capacity(utime, joint_count),
            torque: TorqueSnapshot::with_capacity(robot_name, utime, effort_count),
            robot_state: RobotStateSnapshot::with_capacity(utime, joint_count),
        }
    }

    /// Record one effort-controlled joint, in directory order.
    ///
    /// `post_write_effort` is the effort reading taken after the
    /// (optional) hardware write; `clamped_effort` is the pipeline
    /// output, reported identically in dry-run and apply modes.
    pub fn push_effort_joint(
        &mut self,
        name: &str,
        sample: &JointSensorSample,
        target: &JointCommand,
        clamped_effort: f64,
        post_write_effort: f64,
    ) {
        self.measured
            .push(name, sample.position, sample.velocity, post_write_effort);
        self.echo
            .push(name, target.position, target.velocity, target.effort);
        self.torque.push(name, clamped_effort);
        self.robot_state
            .push(name, sample.position, sample.velocity, post_write_effort);
    }

    /// Record one position-controlled joint, in directory order.
    pub fn push_position_joint(
        &mut self,
        name: &str,
        sample: &JointSensorSample,
        target: &JointCommand,
    ) {
        self.measured
            .push(name, sample.position, sample.velocity, sample.effort);
        self.echo
            .push(name, target.position, target.velocity, target.effort);
        self.robot_state
            .push(name, sample.position, sample.velocity, sample.effort);
    }
}
