//! Shared fixtures: a three-joint simulation bank wired to a channel
//! bus, with tight configured limits on `e1`.

use torc_common::config::TranslatorConfig;
use torc_common::joints::{JointCommand, JointKind, JointLimits, JointSensorSample};
use torc_common::msg::CommandBatch;

use torc_translator::bus::{BusEndpoints, channel_bus};
use torc_translator::cycle::Translator;
use torc_translator::hardware::SimJointBank;

/// Limits used for `e1` throughout the suite.
pub fn e1_limits() -> JointLimits {
    JointLimits {
        min_position: -0.2,
        max_position: 1.0,
        max_effort: 50.0,
    }
}

/// Default config with configured limits for `e1`; `e2` and `p1` fall
/// back to the documented defaults.
pub fn default_config() -> TranslatorConfig {
    let mut config = TranslatorConfig::default();
    config.limits.insert("e1".to_string(), e1_limits());
    config
}

/// Bank advertising `e1`, `p1`, `e2` in that discovery order.
pub fn three_joint_bank() -> SimJointBank {
    let mut bank = SimJointBank::new();
    bank.add_joint("e1", JointKind::EffortControlled);
    bank.add_joint("p1", JointKind::PositionControlled);
    bank.add_joint("e2", JointKind::EffortControlled);
    bank
}

/// Initialized and started translator over [`three_joint_bank`].
pub fn started_translator(
    config: TranslatorConfig,
) -> (Translator<SimJointBank>, BusEndpoints) {
    let (source, sink, endpoints) = channel_bus();
    let mut translator = Translator::new(
        config,
        three_joint_bank(),
        Box::new(source),
        Box::new(sink),
    );
    translator.initialize().unwrap();
    translator.start().unwrap();
    (translator, endpoints)
}

pub fn sample(position: f64, velocity: f64, effort: f64) -> JointSensorSample {
    JointSensorSample {
        position,
        velocity,
        effort,
    }
}

/// One-joint batch.
pub fn batch_for(name: &str, command: JointCommand) -> CommandBatch {
    let mut batch = CommandBatch::new(0);
    batch.push(name, command);
    batch
}

/// Pure proportional position command.
pub fn p_command(position: f64, k_q_p: f64) -> JointCommand {
    JointCommand {
        position,
        k_q_p,
        ..Default::default()
    }
}
