//! Command implementations for the MiSTer Wizard CLI

pub mod completions;
pub mod devices;
pub mod provision;
pub mod resolve;
pub mod version;
