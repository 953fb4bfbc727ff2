//! Joint directory: the static table mapping each managed joint to its
//! control kind, limits, and stable ordinal.
//!
//! Built once during initialization from hardware discovery plus the
//! configured selection and limit tables. No mutation afterwards; the
//! ordered joint list it freezes is the order every outbound snapshot
//! uses on every cycle.

use std::collections::{HashMap, HashSet};

use tracing::{error, info};

use torc_common::config::TranslatorConfig;
use torc_common::joints::{JointKind, JointLimits};

use crate::error::TranslatorError;
use crate::hardware::JointBank;

/// One registered joint.
#[derive(Debug, Clone)]
pub struct JointRecord {
    /// Joint name, unique within the directory.
    pub name: String,
    /// Control kind, fixed at registration.
    pub kind: JointKind,
    /// Resolved limits (configured or defaults).
    pub limits: JointLimits,
    /// Stable ordinal: position in the frozen snapshot order.
    pub ordinal: usize,
}

/// Static joint table, frozen after construction.
///
/// Ordering invariant: all effort-controlled joints first, in claim
/// order, followed by all position-controlled joints, in claim order.
#[derive(Debug, Default)]
pub struct JointDirectory {
    joints: Vec<JointRecord>,
    index: HashMap<String, usize>,
    effort_count: usize,
}

impl JointDirectory {
    /// Discover, select, and claim joints from the bank.
    ///
    /// A missing interface category is fatal. A per-joint claim failure
    /// excludes that joint and continues. Limits resolve through the
    /// configured table with documented defaults as fallback.
    pub fn build(
        bank: &mut dyn JointBank,
        config: &TranslatorConfig,
    ) -> Result<Self, TranslatorError> {
        for kind in [JointKind::EffortControlled, JointKind::PositionControlled] {
            if !bank.supports(kind) {
                return Err(TranslatorError::MissingCapability(kind));
            }
        }

        let selection: Option<HashSet<&str>> = if config.joints.is_empty() {
            info!("no joint selection configured, claiming all advertised joints");
            None
        } else {
            Some(config.joints.iter().map(String::as_str).collect())
        };

        let mut directory = Self::default();
        for kind in [JointKind::EffortControlled, JointKind::PositionControlled] {
            for name in bank.joint_names(kind) {
                if let Some(selected) = &selection {
                    if !selected.contains(name.as_str()) {
                        continue;
                    }
                }
                match bank.claim(&name, kind) {
                    Ok(()) => directory.register(&name, kind, config),
                    Err(e) => {
                        error!("could not claim {kind:?} joint {name}: {e}");
                    }
                }
            }
        }

        if directory.joints.is_empty() {
            return Err(TranslatorError::NoJointsClaimed);
        }

        info!(
            "joint directory frozen: {} effort-controlled, {} position-controlled ({} bank)",
            directory.effort_count,
            directory.joints.len() - directory.effort_count,
            bank.name(),
        );
        Ok(directory)
    }

    fn register(&mut self, name: &str, kind: JointKind, config: &TranslatorConfig) {
        let limits = match config.limits.get(name) {
            Some(limits) => *limits,
            None => {
                info!("no limits configured for joint {name}, using defaults");
                JointLimits::default()
            }
        };
        info!(
            "joint {name}: position [{}, {}], effort [{}, {}]",
            limits.min_position, limits.max_position, -limits.max_effort, limits.max_effort
        );

        let ordinal = self.joints.len();
        self.index.insert(name.to_string(), ordinal);
        self.joints.push(JointRecord {
            name: name.to_string(),
            kind,
            limits,
            ordinal,
        });
        if kind == JointKind::EffortControlled {
            self.effort_count += 1;
        }
    }

    /// Control kind of a registered joint.
    pub fn kind_of(&self, name: &str) -> Option<JointKind> {
        self.index.get(name).map(|&i| self.joints[i].kind)
    }

    /// Limits lookup as a total function: unregistered names resolve to
    /// the documented defaults.
    pub fn limits_of(&self, name: &str) -> JointLimits {
        self.index
            .get(name)
            .map(|&i| self.joints[i].limits)
            .unwrap_or_default()
    }

    /// The frozen per-joint order used by every snapshot.
    #[inline]
    pub fn ordered_joints(&self) -> &[JointRecord] {
        &self.joints
    }

    /// Whether a joint is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Total registered joints.
    #[inline]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Whether the directory is empty (only before initialization).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Number of effort-controlled joints (they occupy ordinals
    /// `0..effort_count`).
    #[inline]
    pub fn effort_count(&self) -> usize {
        self.effort_count
    }
}
