//! Inbound command path: unknown-joint isolation, last-write-wins
//! draining, and target persistence across cycles.

use super::harness::*;

use torc_common::joints::JointCommand;
use torc_common::msg::CommandBatch;

#[test]
fn unknown_joint_isolation() {
    let (mut translator, endpoints) = started_translator(default_config());

    // One batch mixing an unknown name with a managed joint.
    let mut batch = CommandBatch::new(0);
    batch.push("ghostJoint", p_command(9.9, 500.0));
    batch.push("e1", p_command(0.25, 0.0));
    endpoints.command_tx.send(batch).unwrap();

    translator.tick(2000).unwrap();

    // The managed joint in the same batch was applied, nothing else
    // moved, and no entry appeared for the unknown name.
    let echo = endpoints.echo_rx.try_recv().unwrap();
    assert_eq!(echo.joint_name, vec!["e1", "e2", "p1"]);
    assert_eq!(echo.joint_position, vec![0.25, 0.0, 0.0]);
    assert_eq!(translator.table().len(), 3);
}

#[test]
fn last_write_wins_within_one_poll() {
    let (mut translator, endpoints) = started_translator(default_config());

    // Three updates for the same joint arrive between ticks; only the
    // most recent survives.
    for position in [0.1, 0.2, 0.3] {
        endpoints
            .command_tx
            .send(batch_for("e1", p_command(position, 10.0)))
            .unwrap();
    }
    translator.tick(2000).unwrap();

    let echo = endpoints.echo_rx.try_recv().unwrap();
    assert_eq!(echo.joint_position[0], 0.3);
}

#[test]
fn targets_persist_across_cycles() {
    let (mut translator, endpoints) = started_translator(default_config());
    translator.bank_mut().set_sample("e1", sample(0.5, 0.1, 2.0));
    endpoints
        .command_tx
        .send(batch_for("e1", p_command(0.6, 100.0)))
        .unwrap();

    // The held target keeps driving the law with no new input.
    for now_us in [2000, 4000, 6000] {
        translator.tick(now_us).unwrap();
        let torque = endpoints.torque_rx.try_recv().unwrap();
        assert_eq!(torque.joint_effort[0], 10.0);
    }
}

#[test]
fn cycle_runs_with_no_commands_at_all() {
    let (mut translator, endpoints) = started_translator(default_config());
    translator.tick(2000).unwrap();

    // Zeroed targets and zeroed samples: zero output, all messages out.
    let torque = endpoints.torque_rx.try_recv().unwrap();
    assert_eq!(torque.joint_effort, vec![0.0, 0.0]);
    assert!(endpoints.echo_rx.try_recv().is_ok());
    assert!(endpoints.measured_rx.try_recv().is_ok());
}

#[test]
fn batch_updates_all_eleven_fields_at_once() {
    let (mut translator, endpoints) = started_translator(default_config());
    let full = JointCommand {
        position: 0.1,
        velocity: 0.2,
        effort: 0.3,
        k_q_p: 1.0,
        k_q_i: 2.0,
        k_qd_p: 3.0,
        k_f_p: 4.0,
        ff_qd: 5.0,
        ff_qd_d: 6.0,
        ff_f_d: 7.0,
        ff_const: 8.0,
    };
    endpoints.command_tx.send(batch_for("e2", full)).unwrap();
    translator.tick(2000).unwrap();

    assert_eq!(translator.table().command_of("e2"), full);

    // The next batch replaces the whole entry, not just the named
    // fields it happens to set.
    endpoints
        .command_tx
        .send(batch_for("e2", JointCommand::default()))
        .unwrap();
    translator.tick(4000).unwrap();
    assert_eq!(translator.table().command_of("e2"), JointCommand::default());
}
