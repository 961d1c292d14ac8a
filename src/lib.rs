//! typefold library crate
//!
//! This crate provides both a CLI binary and a library API for programmatic use

pub mod backup;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod mover;
pub mod output;
pub mod planner;
pub mod progress;
pub mod scanner;
pub mod theme;
pub mod worker;
