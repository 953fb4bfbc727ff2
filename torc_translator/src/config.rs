//! TOML configuration loader.
//!
//! Recognized options absent from the file resolve to their documented
//! defaults with a warning; a missing or unparsable file is fatal at
//! startup. The raw file shape keeps every scalar optional so an old or
//! minimal config keeps loading.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use torc_common::config::{SimJointConfig, TranslatorConfig};
use torc_common::joints::JointLimits;

// ─── Error Type ─────────────────────────────────────────────────────

/// Configuration loading/validation error. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("config I/O error: {0}")]
    Io(String),
    /// TOML parse error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Parameter validation error.
    #[error("config validation: {0}")]
    Validation(String),
}

// ─── Raw File Shape ─────────────────────────────────────────────────

/// On-disk layout: scalar options are `Option` so absent values resolve
/// to defaults with a warning instead of failing the parse.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    publish_core_robot_state: Option<bool>,
    publish_est_robot_state: Option<bool>,
    apply_commands: Option<bool>,
    cycle_time_us: Option<u32>,
    robot_name: Option<String>,
    #[serde(default)]
    joints: Vec<String>,
    #[serde(default)]
    limits: HashMap<String, JointLimits>,
    #[serde(default)]
    sim_joints: Vec<SimJointConfig>,
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate the translator configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<TranslatorConfig, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("failed to read {}: {e}", path.display())))?;
    load_config_from_str(&text)
}

/// Load the configuration from a TOML string (testing).
pub fn load_config_from_str(text: &str) -> Result<TranslatorConfig, ConfigError> {
    let raw: RawConfig = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
    let config = resolve(raw);
    config.validate().map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Fill absent scalars from the documented defaults, warning for each.
fn resolve(raw: RawConfig) -> TranslatorConfig {
    let defaults = TranslatorConfig::default();

    let publish_core_robot_state = raw.publish_core_robot_state.unwrap_or_else(|| {
        warn!(
            "publish_core_robot_state not set, defaulting to {}",
            defaults.publish_core_robot_state
        );
        defaults.publish_core_robot_state
    });
    let publish_est_robot_state = raw.publish_est_robot_state.unwrap_or_else(|| {
        warn!(
            "publish_est_robot_state not set, defaulting to {}",
            defaults.publish_est_robot_state
        );
        defaults.publish_est_robot_state
    });
    let apply_commands = raw.apply_commands.unwrap_or_else(|| {
        warn!(
            "apply_commands not set, defaulting to {} (dry-run)",
            defaults.apply_commands
        );
        defaults.apply_commands
    });
    let cycle_time_us = raw.cycle_time_us.unwrap_or_else(|| {
        warn!(
            "cycle_time_us not set, defaulting to {}µs",
            defaults.cycle_time_us
        );
        defaults.cycle_time_us
    });
    let robot_name = raw.robot_name.unwrap_or_else(|| {
        warn!("robot_name not set, defaulting to {:?}", defaults.robot_name);
        defaults.robot_name.clone()
    });

    TranslatorConfig {
        publish_core_robot_state,
        publish_est_robot_state,
        apply_commands,
        cycle_time_us,
        joints: raw.joints,
        robot_name,
        limits: raw.limits,
        sim_joints: raw.sim_joints,
    }
}
