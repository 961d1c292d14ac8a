//! Command feature handlers.
//!
//! Each module owns one command feature.

pub mod backup_command;
pub mod config_command;
pub mod organize_command;
pub mod preview_command;
