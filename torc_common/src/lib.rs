//! TORC Common Library
//!
//! Shared data model for the TORC workspace: the per-joint command and
//! sensor types, the wire messages exchanged with the command stream,
//! configuration structures, and system-wide constants.
//!
//! # Module Structure
//!
//! - [`consts`] - Safety bounds, limit defaults, and cycle timing constants
//! - [`joints`] - Joint data model (kind, limits, command, sensor sample)
//! - [`msg`] - Inbound command batch and outbound snapshot messages
//! - [`config`] - Translator configuration structures

pub mod config;
pub mod consts;
pub mod joints;
pub mod msg;
