//! Command table and batch ingest.
//!
//! The table holds the latest accepted target command per managed joint.
//! It is owned exclusively by the cycle; inbound batches reach it only
//! through the driver's drain at the top of each tick, so a whole-entry
//! overwrite is atomic with respect to the control-law read.

use std::collections::HashMap;

use tracing::{debug, warn};

use torc_common::joints::JointCommand;
use torc_common::msg::CommandBatch;

use crate::directory::JointDirectory;

/// Latest accepted target command per joint.
///
/// One zeroed entry per directory joint, created at initialization.
/// Entries are never added or removed afterwards.
#[derive(Debug, Default)]
pub struct CommandTable {
    commands: HashMap<String, JointCommand>,
}

impl CommandTable {
    /// One zeroed entry for every joint in the directory.
    pub fn for_directory(directory: &JointDirectory) -> Self {
        let commands = directory
            .ordered_joints()
            .iter()
            .map(|joint| (joint.name.clone(), JointCommand::default()))
            .collect();
        Self { commands }
    }

    /// Apply an inbound batch: per entry, overwrite the whole command if
    /// the joint is managed, otherwise skip with a diagnostic. Unknown
    /// names never create entries; malformed batches (value arrays
    /// shorter than the declared count) skip the broken entries. Never
    /// errors, never blocks.
    pub fn apply_batch(&mut self, batch: &CommandBatch) {
        for i in 0..batch.num_joints as usize {
            match batch.entry(i) {
                Some((name, command)) => match self.commands.get_mut(name) {
                    Some(slot) => *slot = command,
                    None => debug!("ignoring command for unmanaged joint {name}"),
                },
                None => {
                    warn!(
                        "command batch declares {} joints but entry {i} is incomplete",
                        batch.num_joints
                    );
                }
            }
        }
    }

    /// The held target for a joint, zeroed for names the table does not
    /// hold (the cycle only asks for directory joints, which always have
    /// an entry).
    pub fn command_of(&self, name: &str) -> JointCommand {
        self.commands.get(name).copied().unwrap_or_default()
    }

    /// Number of entries (equals the directory size after init).
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
