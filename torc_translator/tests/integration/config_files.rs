//! Configuration loading from real files.

use std::io::Write;

use tempfile::NamedTempFile;

use torc_translator::config::{ConfigError, load_config};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_complete_file() {
    let file = write_config(
        r#"
        publish_core_robot_state = true
        publish_est_robot_state = false
        apply_commands = false
        cycle_time_us = 2000
        robot_name = "torc"
        joints = []

        [limits.leftElbowPitch]
        min_position = -0.2
        max_position = 2.3
        max_effort = 90.0

        [[sim_joints]]
        name = "leftElbowPitch"
        kind = "effort"

        [[sim_joints]]
        name = "neckYaw"
        kind = "position"
        "#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.cycle_time_us, 2000);
    assert_eq!(config.sim_joints.len(), 2);
    assert_eq!(config.limits["leftElbowPitch"].max_position, 2.3);
}

#[test]
fn absent_scalars_resolve_to_defaults() {
    let file = write_config(
        r#"
        [[sim_joints]]
        name = "j1"
        kind = "effort"
        "#,
    );

    let config = load_config(file.path()).unwrap();
    assert!(config.publish_core_robot_state);
    assert!(!config.publish_est_robot_state);
    assert!(!config.apply_commands);
    assert_eq!(config.cycle_time_us, 2000);
    assert_eq!(config.robot_name, "torc");
}

#[test]
fn missing_file_is_fatal() {
    let err = load_config(std::path::Path::new("/nonexistent/translator.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn invalid_limits_rejected() {
    let file = write_config(
        r#"
        [limits.j1]
        min_position = 1.0
        max_position = -1.0
        "#,
    );
    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
    assert!(err.to_string().contains("j1"));
}

#[test]
fn duplicate_sim_joint_rejected() {
    let file = write_config(
        r#"
        [[sim_joints]]
        name = "j1"
        kind = "effort"

        [[sim_joints]]
        name = "j1"
        kind = "position"
        "#,
    );
    assert!(matches!(
        load_config(file.path()).unwrap_err(),
        ConfigError::Validation(_)
    ));
}
