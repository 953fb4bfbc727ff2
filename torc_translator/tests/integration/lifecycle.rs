//! Lifecycle guards and initialization failure modes through the full
//! translator.

use super::harness::*;

use torc_common::config::TranslatorConfig;
use torc_common::joints::JointKind;

use torc_translator::bus::channel_bus;
use torc_translator::cycle::Translator;
use torc_translator::error::TranslatorError;
use torc_translator::hardware::SimJointBank;
use torc_translator::state::Lifecycle;

#[test]
fn missing_capability_aborts_initialization() {
    let bank = three_joint_bank().without_capability(JointKind::EffortControlled);
    let (source, sink, _endpoints) = channel_bus();
    let mut translator = Translator::new(
        TranslatorConfig::default(),
        bank,
        Box::new(source),
        Box::new(sink),
    );
    let err = translator.initialize().unwrap_err();
    assert!(matches!(
        err,
        TranslatorError::MissingCapability(JointKind::EffortControlled)
    ));
    // Initialization failed: still Constructed, nothing claimed.
    assert_eq!(translator.state(), Lifecycle::Constructed);
    assert!(translator.directory().is_empty());
}

#[test]
fn claim_failure_excludes_joint_and_continues() {
    let mut bank = three_joint_bank();
    bank.fail_claim_on("e1");
    let (source, sink, endpoints) = channel_bus();
    let mut translator = Translator::new(
        default_config(),
        bank,
        Box::new(source),
        Box::new(sink),
    );
    translator.initialize().unwrap();
    translator.start().unwrap();
    translator.tick(2000).unwrap();

    // The failed joint never appears; the others run normally.
    let measured = endpoints.measured_rx.try_recv().unwrap();
    assert_eq!(measured.joint_name, vec!["e2", "p1"]);
}

#[test]
fn empty_selection_match_is_fatal() {
    let config = TranslatorConfig {
        joints: vec!["doesNotExist".to_string()],
        ..Default::default()
    };
    let (source, sink, _endpoints) = channel_bus();
    let mut translator = Translator::new(
        config,
        three_joint_bank(),
        Box::new(source),
        Box::new(sink),
    );
    assert!(matches!(
        translator.initialize().unwrap_err(),
        TranslatorError::NoJointsClaimed
    ));
}

#[test]
fn configured_subset_limits_managed_joints() {
    let config = TranslatorConfig {
        joints: vec!["e2".to_string(), "p1".to_string()],
        ..Default::default()
    };
    let (mut translator, endpoints) = {
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
    };

    // Commands for the unselected joint are ignored like unknown names.
    endpoints
        .command_tx
        .send(batch_for("e1", p_command(0.5, 100.0)))
        .unwrap();
    translator.tick(2000).unwrap();

    let measured = endpoints.measured_rx.try_recv().unwrap();
    assert_eq!(measured.joint_name, vec!["e2", "p1"]);
    assert_eq!(translator.table().len(), 2);
}

#[test]
fn operations_rejected_outside_their_states() {
    let (source, sink, _endpoints) = channel_bus();
    let mut translator = Translator::new(
        TranslatorConfig::default(),
        three_joint_bank(),
        Box::new(source),
        Box::new(sink),
    );

    // Constructed: only initialize is valid.
    assert!(translator.start().is_err());
    assert!(translator.stop().is_err());
    assert!(translator.tick(0).is_err());

    translator.initialize().unwrap();
    assert!(translator.initialize().is_err());
    assert!(translator.stop().is_err());

    translator.start().unwrap();
    translator.tick(0).unwrap();

    translator.stop().unwrap();
    assert_eq!(translator.state(), Lifecycle::Stopped);
    // Stopped is terminal.
    assert!(translator.initialize().is_err());
    assert!(translator.start().is_err());
    assert!(translator.tick(0).is_err());
}
