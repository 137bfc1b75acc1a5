//! # Ironvale Gameplay
//!
//! Combat core for Ironvale.
//!
//! This crate runs the enemies of a side-view action game one fixed tick at a
//! time:
//! - Tile world queries and body movement
//! - Actor state machines (Duelist, Lobber, Pikeman)
//! - Player pose, sword and shield
//! - Hit resolution between actors, shots and the player
//! - Particle bursts and currency pickups
//! - Death timers and removal
//! - Event bus and binary snapshots

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod actor;
pub mod combat;
pub mod duelist;
pub mod effects;
pub mod events;
pub mod geometry;
pub mod lifecycle;
pub mod lobber;
pub mod pikeman;
pub mod player;
pub mod projectile;
pub mod rng;
pub mod simulation;
pub mod snapshot;
pub mod swing;
pub mod tuning;
pub mod world;

mod scenario_tests;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::actor::*;
    pub use crate::combat::*;
    pub use crate::duelist::*;
    pub use crate::effects::*;
    pub use crate::events::*;
    pub use crate::geometry::*;
    pub use crate::lifecycle::*;
    pub use crate::lobber::*;
    pub use crate::pikeman::*;
    pub use crate::player::*;
    pub use crate::projectile::*;
    pub use crate::rng::*;
    pub use crate::simulation::*;
    pub use crate::swing::*;
    pub use crate::tuning::*;
    pub use crate::world::*;
}

pub use prelude::*;
