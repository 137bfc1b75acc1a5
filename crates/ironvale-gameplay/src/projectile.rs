//! Lobbed shots.
//!
//! Shots are owned by the simulation, not by whoever fired them, so they keep
//! flying after their shooter is gone.

use ironvale_common::ActorId;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::geometry::{Hitbox, HitboxRole, Vec2, AABB};
use crate::world::WorldCollision;

/// Request to spawn a shot, returned by an actor's `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileLaunch {
    /// Who fired it.
    pub owner: ActorId,
    /// Top-left corner at launch.
    pub position: Vec2,
    /// Initial velocity.
    pub velocity: Vec2,
    /// Downward acceleration per tick.
    pub gravity: f32,
    /// Edge length of the square shot.
    pub size: f32,
    /// Frames before it expires.
    pub life: u32,
}

/// A shot in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Who fired it.
    pub owner: ActorId,
    /// Top-left corner.
    pub position: Vec2,
    /// Velocity.
    pub velocity: Vec2,
    /// Downward acceleration per tick.
    pub gravity: f32,
    /// Edge length.
    pub size: f32,
    /// Frames left.
    pub life: u32,
    live: bool,
}

impl Projectile {
    /// Whether the shot is still in play.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Current box.
    #[must_use]
    pub fn aabb(&self) -> AABB {
        AABB::from_rect(self.position.x, self.position.y, self.size, self.size)
    }

    /// Offensive hitbox, tagged with the shooter.
    #[must_use]
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.owner, HitboxRole::Offensive, self.aabb())
    }

    pub(crate) fn consume(&mut self) {
        self.live = false;
    }
}

impl From<ProjectileLaunch> for Projectile {
    fn from(launch: ProjectileLaunch) -> Self {
        Self {
            owner: launch.owner,
            position: launch.position,
            velocity: launch.velocity,
            gravity: launch.gravity,
            size: launch.size,
            life: launch.life,
            live: launch.life > 0,
        }
    }
}

/// All shots in flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSet {
    shots: Vec<Projectile>,
}

impl ProjectileSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a shot.
    pub fn launch(&mut self, launch: ProjectileLaunch) {
        self.shots.push(Projectile::from(launch));
    }

    /// Moves every live shot one tick. Shots die on terrain or when their life
    /// runs out. Returns how many died this tick.
    pub fn advance(&mut self, world: &WorldCollision<'_>) -> usize {
        let mut expired = 0;
        for shot in self.shots.iter_mut().filter(|s| s.live) {
            shot.velocity.y += shot.gravity;
            shot.position.x += shot.velocity.x;
            shot.position.y += shot.velocity.y;
            shot.life = shot.life.saturating_sub(1);
            let aabb = shot.aabb();
            if shot.life == 0 || world.is_blocked_aabb(&aabb) {
                shot.live = false;
                expired += 1;
                trace!(owner = %shot.owner, "shot expired");
            }
        }
        expired
    }

    /// Drops dead shots.
    pub fn retain_live(&mut self) {
        self.shots.retain(|s| s.live);
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Projectile> {
        self.shots.iter_mut()
    }

    /// Number of live shots.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.shots.iter().filter(|s| s.live).count()
    }

    /// Check if no shots are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_count() == 0
    }
}
