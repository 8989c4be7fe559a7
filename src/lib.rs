//! # Suhoor Library
//!
//! Internal library for the suhoor binary: sleep-cycle wake-up times aligned
//! with the Fajr prayer.
//!
//! The library exists to keep the calculator testable and separate from CLI
//! dispatch in main.rs.
//!
//! ## Architecture
//!
//! - **Core**: `sleep` generates 90-minute cycle candidates and classifies
//!   them against Fajr; it never reads a clock or a file
//! - **Prayer data**: `prayer` loads prayer times from a JSON payload or the
//!   config and anchors Fajr to the following day
//! - **Configuration**: `config` for TOML settings with hot reload
//! - **Commands**: `commands` for `plan`, `watch`, `simulate` and `help`
//! - **Infrastructure**: signal handling, the time source, logging and utilities

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod commands;
pub mod common;
pub mod config;
pub mod io;
pub mod prayer;
pub mod sleep;
pub mod time_source;

pub use sleep::{Band, BedTime, SleepPlan, plan};
