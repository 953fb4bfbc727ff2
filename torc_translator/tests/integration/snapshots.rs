//! Outbound snapshot shapes, gating flags, and ordering stability.

use super::harness::*;

use torc_common::config::TranslatorConfig;

#[test]
fn ordering_is_effort_first_and_stable() {
    let (mut translator, endpoints) = started_translator(default_config());

    // Discovery order is e1, p1, e2; snapshots must order effort
    // joints first and hold that order on every cycle.
    let expected = vec!["e1", "e2", "p1"];
    for cycle in 0..5 {
        translator.tick(cycle * 2000).unwrap();
        let measured = endpoints.measured_rx.try_recv().unwrap();
        assert_eq!(measured.joint_name, expected);
        let echo = endpoints.echo_rx.try_recv().unwrap();
        assert_eq!(echo.joint_name, expected);
        let torque = endpoints.torque_rx.try_recv().unwrap();
        assert_eq!(torque.joint_name, vec!["e1", "e2"]);
    }
}

#[test]
fn measured_gate_suppresses_only_measured() {
    let mut config = default_config();
    config.publish_core_robot_state = false;
    let (mut translator, endpoints) = started_translator(config);
    translator.tick(2000).unwrap();

    assert!(endpoints.measured_rx.try_recv().is_err());
    // Echo and torque are unconditional.
    assert!(endpoints.echo_rx.try_recv().is_ok());
    assert!(endpoints.torque_rx.try_recv().is_ok());
}

#[test]
fn full_state_gate_defaults_off() {
    let (mut translator, endpoints) = started_translator(default_config());
    translator.tick(2000).unwrap();
    assert!(endpoints.robot_state_rx.try_recv().is_err());
}

#[test]
fn full_state_carries_placeholder_pose_twist() {
    let mut config = default_config();
    config.publish_est_robot_state = true;
    let (mut translator, endpoints) = started_translator(config);
    translator.bank_mut().set_sample("e1", sample(0.4, -0.1, 1.5));
    translator.tick(2000).unwrap();

    let state = endpoints.robot_state_rx.try_recv().unwrap();
    assert_eq!(state.joint_name, vec!["e1", "e2", "p1"]);
    assert_eq!(state.joint_position[0], 0.4);
    // Pose and twist are unfilled placeholders, not estimates.
    assert_eq!(state.pose.translation, [0.0; 3]);
    assert_eq!(state.pose.rotation_wxyz, [1.0, 0.0, 0.0, 0.0]);
    assert_eq!(state.twist.linear, [0.0; 3]);
    assert_eq!(state.twist.angular, [0.0; 3]);
}

#[test]
fn echo_reports_targets_not_clamped_output() {
    let (mut translator, endpoints) = started_translator(default_config());
    translator.bank_mut().set_sample("e1", sample(0.0, 0.0, 0.0));
    // Target far away: the clamped output saturates but the echo keeps
    // the requested values.
    endpoints
        .command_tx
        .send(batch_for("e1", p_command(5.0, 100.0)))
        .unwrap();
    translator.tick(2000).unwrap();

    let echo = endpoints.echo_rx.try_recv().unwrap();
    assert_eq!(echo.joint_position[0], 5.0);
    let torque = endpoints.torque_rx.try_recv().unwrap();
    assert!(torque.joint_effort[0] < 100.0);
}

#[test]
fn snapshots_carry_timestamp_and_robot_name() {
    let mut config = default_config();
    config.robot_name = "unit7".to_string();
    let (mut translator, endpoints) = started_translator(config);
    translator.tick(123_456).unwrap();

    let measured = endpoints.measured_rx.try_recv().unwrap();
    assert_eq!(measured.utime, 123_456);
    let torque = endpoints.torque_rx.try_recv().unwrap();
    assert_eq!(torque.utime, 123_456);
    assert_eq!(torque.robot_name, "unit7");
}

#[test]
fn measured_effort_reads_after_command_write() {
    // The sim bank does not feed commands back into its sensor value,
    // so the post-write reading equals the sample; a live bank would
    // show the refreshed measurement here.
    let mut config = TranslatorConfig::default();
    config.apply_commands = true;
    let (mut translator, endpoints) = started_translator(config);
    translator.bank_mut().set_sample("e1", sample(0.5, 0.1, 2.0));
    endpoints
        .command_tx
        .send(batch_for("e1", p_command(0.6, 100.0)))
        .unwrap();
    translator.tick(2000).unwrap();

    let measured = endpoints.measured_rx.try_recv().unwrap();
    assert_eq!(measured.joint_effort[0], 2.0);
}
