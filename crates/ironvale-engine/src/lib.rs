//! Ironvale Engine - headless driver for the Ironvale combat core.
//!
//! Loads a TOML configuration, builds the built-in arena, and runs a scripted
//! player against one of each foe at a fixed step, logging what happened.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod arena;
pub mod config;
pub mod runner;

pub use arena::{Arena, ScriptedPlayer, ARENA_LAYOUT};
pub use config::{EngineConfig, CONFIG_FILE};
pub use runner::{RunSummary, Runner};
