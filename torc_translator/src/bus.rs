//! Message-bus boundary: command source and snapshot sink traits, plus
//! an in-process channel implementation.
//!
//! Transport-level connection management is outside this layer; the
//! cycle only requires a non-blocking drain of whatever command batches
//! arrived since the previous tick, and four one-way snapshot outlets.

use crossbeam_channel::{Receiver, Sender, unbounded};

use torc_common::msg::{CommandBatch, JointStateSnapshot, RobotStateSnapshot, TorqueSnapshot};

// ─── Traits ─────────────────────────────────────────────────────────

/// Inbound side: non-blocking poll of pending command batches.
pub trait CommandSource: Send {
    /// Drain everything that arrived since the previous call, in arrival
    /// order. Applying the result in order gives last-write-wins per
    /// joint. Must not block.
    fn poll(&mut self) -> Vec<CommandBatch>;
}

/// Outbound side: one publish call per snapshot per cycle.
///
/// Publication is fire-and-forget; a sink must never block the cycle.
pub trait SnapshotSink: Send {
    /// Measured joint state (gated by `publish_core_robot_state`).
    fn publish_measured(&mut self, snapshot: &JointStateSnapshot);
    /// Echo of the held targets (unconditional).
    fn publish_command_echo(&mut self, snapshot: &JointStateSnapshot);
    /// Clamped output efforts (unconditional).
    fn publish_torque(&mut self, snapshot: &TorqueSnapshot);
    /// Full robot state (gated by `publish_est_robot_state`).
    fn publish_robot_state(&mut self, snapshot: &RobotStateSnapshot);
}

// ─── In-Process Channel Bus ─────────────────────────────────────────

/// Command source backed by a crossbeam channel receiver.
pub struct ChannelCommandSource {
    commands: Receiver<CommandBatch>,
}

impl CommandSource for ChannelCommandSource {
    fn poll(&mut self) -> Vec<CommandBatch> {
        self.commands.try_iter().collect()
    }
}

/// Snapshot sink backed by crossbeam channel senders, one per logical
/// channel.
pub struct ChannelSnapshotSink {
    measured: Sender<JointStateSnapshot>,
    echo: Sender<JointStateSnapshot>,
    torque: Sender<TorqueSnapshot>,
    robot_state: Sender<RobotStateSnapshot>,
}

impl SnapshotSink for ChannelSnapshotSink {
    fn publish_measured(&mut self, snapshot: &JointStateSnapshot) {
        // Send failures mean the consumer side is gone (teardown); the
        // cycle keeps running either way.
        let _ = self.measured.send(snapshot.clone());
    }

    fn publish_command_echo(&mut self, snapshot: &JointStateSnapshot) {
        let _ = self.echo.send(snapshot.clone());
    }

    fn publish_torque(&mut self, snapshot: &TorqueSnapshot) {
        let _ = self.torque.send(snapshot.clone());
    }

    fn publish_robot_state(&mut self, snapshot: &RobotStateSnapshot) {
        let _ = self.robot_state.send(snapshot.clone());
    }
}

/// Far side of a [`channel_bus`]: producer handle for commands and
/// consumer handles for the four snapshot channels.
pub struct BusEndpoints {
    pub command_tx: Sender<CommandBatch>,
    pub measured_rx: Receiver<JointStateSnapshot>,
    pub echo_rx: Receiver<JointStateSnapshot>,
    pub torque_rx: Receiver<TorqueSnapshot>,
    pub robot_state_rx: Receiver<RobotStateSnapshot>,
}

/// Build a connected in-process bus.
pub fn channel_bus() -> (ChannelCommandSource, ChannelSnapshotSink, BusEndpoints) {
    let (command_tx, command_rx) = unbounded();
    let (measured_tx, measured_rx) = unbounded();
    let (echo_tx, echo_rx) = unbounded();
    let (torque_tx, torque_rx) = unbounded();
    let (robot_state_tx, robot_state_rx) = unbounded();

    (
        ChannelCommandSource {
            commands: command_rx,
        },
        ChannelSnapshotSink {
            measured: measured_tx,
            echo: echo_tx,
            torque: torque_tx,
            robot_state: robot_state_tx,
        },
        BusEndpoints {
            command_tx,
            measured_rx,
            echo_rx,
            torque_rx,
            robot_state_rx,
        },
    )
}
