//! Pikeman: unshielded one-hit patroller.
//!
//! Marches at a constant speed. When the way forward is blocked by terrain or
//! the edge of its area it slides vertically along the obstruction; each time
//! the slide is blocked too, it alternates between trying the other vertical
//! direction and turning around. Any clean hit launches it on a ballistic arc
//! that ends when it comes back down to its ground line.
//!
//! Position is split into `x`, the ground line `z` it walks along, and the
//! drawn height `y`, which only leaves `z` during the defeat arc.

use ironvale_common::ActorId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::actor::{Actor, ActorContext, ActorKind, DamageOutcome, Facing, Life, LifeState};
use crate::geometry::{Hitbox, HitboxRole, AABB};
use crate::projectile::ProjectileLaunch;
use crate::rng::RandomSource;
use crate::tuning::PikemanTuning;
use crate::world::WorldCollision;

/// Horizontal limits of the area a Pikeman patrols.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PikemanBounds {
    /// Leftmost x the body may occupy.
    pub min_x: f32,
    /// Rightmost x the body may reach with its right edge.
    pub max_x: f32,
}

impl PikemanBounds {
    /// Creates bounds.
    #[must_use]
    pub const fn new(min_x: f32, max_x: f32) -> Self {
        Self { min_x, max_x }
    }

    /// Bounds that never constrain.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            min_x: f32::MIN,
            max_x: f32::MAX,
        }
    }

    /// Whether a body of `width` at `x` fits.
    #[must_use]
    pub fn contains(&self, x: f32, width: f32) -> bool {
        x >= self.min_x && x + width <= self.max_x
    }
}

impl Default for PikemanBounds {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Patrol mode while alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatrolMode {
    /// Walking forward.
    Marching,
    /// Sliding along an obstruction.
    Sliding,
}

/// One-hit patroller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pikeman {
    id: ActorId,
    tuning: PikemanTuning,
    bounds: PikemanBounds,
    x: f32,
    z: f32,
    y: f32,
    vx: f32,
    vy: f32,
    facing: Facing,
    vertical_dir: f32,
    swap_vertical_next: bool,
    mode: PatrolMode,
    landed: bool,
    life: Life,
}

impl Pikeman {
    /// Creates a Pikeman at `x` on ground line `z`, marching toward `facing`.
    ///
    /// The first slide direction and the alternation parity are rolled here.
    pub fn new(
        id: ActorId,
        x: f32,
        z: f32,
        facing: Facing,
        tuning: PikemanTuning,
        bounds: PikemanBounds,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let vertical_dir = if rng.chance(0.5) { -1.0 } else { 1.0 };
        let swap_vertical_next = rng.chance(0.5);
        Self {
            id,
            tuning,
            bounds,
            x,
            z,
            y: z,
            vx: tuning.march_speed * facing.sign(),
            vy: 0.0,
            facing,
            vertical_dir,
            swap_vertical_next,
            mode: PatrolMode::Marching,
            landed: false,
            life: Life::default(),
        }
    }

    /// Tuning in use.
    #[must_use]
    pub fn tuning(&self) -> &PikemanTuning {
        &self.tuning
    }

    /// Horizontal position (left edge).
    #[must_use]
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Ground line.
    #[must_use]
    pub fn z(&self) -> f32 {
        self.z
    }

    /// Drawn height.
    #[must_use]
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Facing.
    #[must_use]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Horizontal velocity.
    #[must_use]
    pub fn velocity_x(&self) -> f32 {
        self.vx
    }

    /// Current slide direction, `-1.0` (up) or `1.0` (down).
    #[must_use]
    pub fn vertical_dir(&self) -> f32 {
        self.vertical_dir
    }

    /// Patrol mode.
    #[must_use]
    pub fn mode(&self) -> PatrolMode {
        self.mode
    }

    /// Whether the defeat arc has come back down.
    #[must_use]
    pub fn has_landed(&self) -> bool {
        self.landed
    }

    pub(crate) fn life_mut(&mut self) -> &mut Life {
        &mut self.life
    }

    fn path_blocked(&self, world: &WorldCollision<'_>, x: f32, z: f32) -> bool {
        !self.bounds.contains(x, self.tuning.width)
            || world.is_blocked(x, z, self.tuning.width, self.tuning.height)
    }

    fn patrol(&mut self, world: &WorldCollision<'_>) {
        let proposed_x = self.x + self.vx;
        if self.path_blocked(world, proposed_x, self.z) {
            if self.mode == PatrolMode::Marching {
                debug!(actor = %self.id, x = self.x, "pikeman blocked, sliding");
            }
            self.mode = PatrolMode::Sliding;
        } else {
            self.x = proposed_x;
        }

        if self.mode == PatrolMode::Marching {
            self.y = self.z;
            return;
        }

        let proposed_z = self.z + self.tuning.slide_speed * self.vertical_dir;
        if world.is_blocked(self.x, proposed_z, self.tuning.width, self.tuning.height) {
            if self.swap_vertical_next {
                self.vertical_dir = -self.vertical_dir;
                debug!(actor = %self.id, dir = self.vertical_dir, "pikeman slide reversed");
            } else {
                self.facing = self.facing.flipped();
                self.vx = -self.vx;
                self.mode = PatrolMode::Marching;
                debug!(actor = %self.id, facing = ?self.facing, "pikeman turned around");
            }
            self.swap_vertical_next = !self.swap_vertical_next;
        } else {
            self.z = proposed_z;
            self.y = self.z;
        }

        if !self.path_blocked(world, self.x + self.vx, self.z) {
            self.mode = PatrolMode::Marching;
        }
    }

    pub(crate) fn fly(&mut self) {
        if self.landed {
            return;
        }
        self.x += self.vx;
        self.y += self.vy;
        self.vy += self.tuning.gravity;
        if self.y >= self.z {
            self.y = self.z;
            self.landed = true;
            debug!(actor = %self.id, "pikeman landed");
        }
    }
}

impl Actor for Pikeman {
    fn id(&self) -> ActorId {
        self.id
    }

    fn kind(&self) -> ActorKind {
        ActorKind::Pikeman
    }

    fn advance(&mut self, ctx: &mut ActorContext<'_>) -> Option<ProjectileLaunch> {
        match self.life.state() {
            LifeState::Alive => self.patrol(&ctx.world),
            LifeState::Dying => self.fly(),
            LifeState::Removed => {}
        }
        None
    }

    fn current_offensive_hitbox(&self) -> Option<Hitbox> {
        None
    }

    fn current_defensive_hitbox(&self) -> Option<Hitbox> {
        None
    }

    fn body_hitbox(&self) -> Hitbox {
        Hitbox::new(
            self.id,
            HitboxRole::Body,
            AABB::from_rect(self.x, self.y, self.tuning.width, self.tuning.height),
        )
    }

    /// Any non-zero hit defeats a live Pikeman outright.
    fn apply_damage(&mut self, amount: u32, direction: f32) -> DamageOutcome {
        if amount == 0 || !self.life.begin_dying() {
            return DamageOutcome::Ignored;
        }
        let away = if direction == 0.0 { 1.0 } else { direction };
        self.vx = away * self.tuning.defeat_launch_x;
        self.vy = self.tuning.defeat_launch_y;
        info!(actor = %self.id, "pikeman defeated");
        DamageOutcome::Defeated
    }

    fn life_state(&self) -> LifeState {
        self.life.state()
    }

    fn hit_timer(&self) -> u32 {
        0
    }
}
