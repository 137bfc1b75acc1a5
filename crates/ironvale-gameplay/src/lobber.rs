//! Lobber: hopping ranged foe.
//!
//! Cycle: wait after a shot, jump, shoot at the apex, land, wait, shoot again.
//! Hitstun freezes the cycle timers (gravity and collision keep running) and
//! restarts the cycle from the post-shot wait when it ends.

use ironvale_common::ActorId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::actor::{Actor, ActorContext, ActorKind, DamageOutcome, Facing, Life, LifeState};
use crate::geometry::{Hitbox, HitboxRole, Vec2};
use crate::projectile::ProjectileLaunch;
use crate::tuning::LobberTuning;
use crate::world::Body;

/// Patrol cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LobberPhase {
    /// Grounded pause after firing.
    WaitAfterShot {
        /// Frames left.
        timer: u32,
    },
    /// In the air.
    Jumping {
        /// The apex shot for this jump has gone out.
        fired: bool,
    },
    /// Grounded pause after landing; fires when it ends.
    WaitAfterJump {
        /// Frames left.
        timer: u32,
    },
}

/// Hopping ranged foe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lobber {
    id: ActorId,
    tuning: LobberTuning,
    body: Body,
    facing: Facing,
    life: Life,
    health: u32,
    hit_timer: u32,
    knockback_timer: u32,
    phase: LobberPhase,
}

impl Lobber {
    /// Creates a Lobber with its top-left corner at `(x, y)`.
    #[must_use]
    pub fn new(id: ActorId, x: f32, y: f32, tuning: LobberTuning) -> Self {
        Self {
            id,
            tuning,
            body: Body::new(x, y, tuning.width, tuning.height),
            facing: Facing::Left,
            life: Life::default(),
            health: tuning.health,
            hit_timer: 0,
            knockback_timer: 0,
            phase: LobberPhase::WaitAfterShot {
                timer: tuning.wait_after_shot,
            },
        }
    }

    /// Tuning in use.
    #[must_use]
    pub fn tuning(&self) -> &LobberTuning {
        &self.tuning
    }

    /// Physical body.
    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Facing.
    #[must_use]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Remaining health.
    #[must_use]
    pub fn health(&self) -> u32 {
        self.health
    }

    /// Cycle phase.
    #[must_use]
    pub fn phase(&self) -> LobberPhase {
        self.phase
    }

    pub(crate) fn life_mut(&mut self) -> &mut Life {
        &mut self.life
    }

    fn shot(&self) -> ProjectileLaunch {
        let size = self.tuning.shot_size;
        let center = self.body.center();
        ProjectileLaunch {
            owner: self.id,
            position: Vec2::new(center.x - size / 2.0, center.y - size / 2.0),
            velocity: Vec2::new(
                self.facing.sign() * self.tuning.shot_speed_x,
                self.tuning.shot_speed_y,
            ),
            gravity: self.tuning.shot_gravity,
            size,
            life: self.tuning.shot_life,
        }
    }

    fn start_death(&mut self, direction: f32) {
        if !self.life.begin_dying() {
            return;
        }
        self.hit_timer = 0;
        self.knockback_timer = 0;
        let launch = if direction == 0.0 {
            self.facing.sign()
        } else {
            direction
        };
        self.body.velocity.x = launch * self.tuning.death_launch_x;
        self.body.velocity.y = self.tuning.death_launch_y;
        self.body.on_ground = false;
        info!(actor = %self.id, "lobber defeated");
    }

    fn advance_cycle(&mut self, prev_vy: f32, landed: bool) -> Option<ProjectileLaunch> {
        match self.phase {
            LobberPhase::WaitAfterShot { timer } => {
                let timer = timer.saturating_sub(1);
                if timer == 0 && self.body.on_ground {
                    self.body.velocity.y = self.tuning.jump_speed;
                    self.body.on_ground = false;
                    self.phase = LobberPhase::Jumping { fired: false };
                    debug!(actor = %self.id, "lobber jump");
                } else {
                    self.phase = LobberPhase::WaitAfterShot { timer };
                }
                None
            }
            LobberPhase::Jumping { fired } => {
                let apex = prev_vy <= 0.0 && self.body.velocity.y > 0.0;
                let launch = (!fired && apex).then(|| self.shot());
                if landed {
                    self.phase = LobberPhase::WaitAfterJump {
                        timer: self.tuning.wait_after_jump,
                    };
                } else {
                    self.phase = LobberPhase::Jumping {
                        fired: fired || launch.is_some(),
                    };
                }
                if launch.is_some() {
                    debug!(actor = %self.id, "lobber apex shot");
                }
                launch
            }
            LobberPhase::WaitAfterJump { timer } => {
                let timer = timer.saturating_sub(1);
                if timer == 0 {
                    self.phase = LobberPhase::WaitAfterShot {
                        timer: self.tuning.wait_after_shot,
                    };
                    debug!(actor = %self.id, "lobber grounded shot");
                    Some(self.shot())
                } else {
                    self.phase = LobberPhase::WaitAfterJump { timer };
                    None
                }
            }
        }
    }
}

impl Actor for Lobber {
    fn id(&self) -> ActorId {
        self.id
    }

    fn kind(&self) -> ActorKind {
        ActorKind::Lobber
    }

    fn advance(&mut self, ctx: &mut ActorContext<'_>) -> Option<ProjectileLaunch> {
        match self.life.state() {
            LifeState::Removed => return None,
            LifeState::Dying => {
                let dx = self.body.velocity.x;
                self.body
                    .integrate(&ctx.world, dx, self.tuning.gravity, self.tuning.max_fall);
                self.body.velocity.x *= self.tuning.death_drag;
                return None;
            }
            LifeState::Alive => {}
        }

        self.facing = Facing::toward(self.body.center().x, ctx.player.center().x);

        let mut dx = 0.0;
        if self.knockback_timer > 0 {
            dx = self.body.velocity.x;
            self.body.velocity.x *= self.tuning.knockback_decay;
            self.knockback_timer -= 1;
        } else {
            self.body.velocity.x = 0.0;
        }

        let prev_vy = self.body.velocity.y;
        let moved = self
            .body
            .integrate(&ctx.world, dx, self.tuning.gravity, self.tuning.max_fall);

        if self.hit_timer > 0 {
            self.hit_timer -= 1;
            if self.hit_timer == 0 {
                self.phase = LobberPhase::WaitAfterShot {
                    timer: self.tuning.wait_after_shot,
                };
            }
            return None;
        }

        self.advance_cycle(prev_vy, moved.hit_ground)
    }

    fn current_offensive_hitbox(&self) -> Option<Hitbox> {
        None
    }

    fn current_defensive_hitbox(&self) -> Option<Hitbox> {
        None
    }

    fn body_hitbox(&self) -> Hitbox {
        Hitbox::new(self.id, HitboxRole::Body, self.body.aabb())
    }

    fn apply_damage(&mut self, amount: u32, direction: f32) -> DamageOutcome {
        if !self.life.is_alive() || self.hit_timer > 0 || amount == 0 {
            return DamageOutcome::Ignored;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.start_death(direction);
            return DamageOutcome::Defeated;
        }
        self.hit_timer = self.tuning.hitstun;
        self.body.velocity.x = direction * self.tuning.knockback_speed;
        self.knockback_timer = self.tuning.knockback_frames;
        debug!(actor = %self.id, health = self.health, "lobber hit");
        DamageOutcome::Damaged
    }

    fn life_state(&self) -> LifeState {
        self.life.state()
    }

    fn hit_timer(&self) -> u32 {
        self.hit_timer
    }
}
