//! Duelist: shielded melee foe.
//!
//! Three loosely coupled sub-machines run side by side while the Duelist is
//! alive:
//! - an attack cycle (idle cooldown, then a windup/stab/recover swing aimed high
//!   or low),
//! - footwork that shuffles in and out around a preferred distance from the
//!   player,
//! - a shield stance that may flip between high and low on a fixed cadence, but
//!   only while the player is not swinging.
//!
//! Once defeated it is launched up and away and falls until the lifecycle
//! controller removes it.

use ironvale_common::ActorId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::actor::{Actor, ActorContext, ActorKind, DamageOutcome, Facing, Life, LifeState};
use crate::geometry::{Hitbox, HitboxRole, AABB};
use crate::projectile::ProjectileLaunch;
use crate::rng::RandomSource;
use crate::swing::{SwingPhase, SwingTiming};
use crate::tuning::DuelistTuning;
use crate::world::Body;

/// High or low, for both stabs and shield stance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Guard {
    /// Head height.
    High,
    /// Leg height.
    Low,
}

impl Guard {
    /// The other height.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::High => Self::Low,
            Self::Low => Self::High,
        }
    }
}

/// Attack cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttackState {
    /// Waiting for the next swing.
    Idle {
        /// Frames until the swing starts.
        cooldown: u32,
    },
    /// Swinging.
    Swing {
        /// Frames since the swing started.
        elapsed: u32,
        /// Aim of this swing.
        height: Guard,
        /// This swing already bounced off the player's shield.
        blocked: bool,
    },
}

/// Sword rectangle and the phase it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwordPose {
    /// Swing phase.
    pub phase: SwingPhase,
    /// Blade rectangle.
    pub rect: AABB,
}

/// Footwork bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footwork {
    /// Frames spent engaged; drives the shuffle sine.
    pub walk_timer: u32,
    /// Smoothed x the Duelist is walking toward.
    pub target_x: f32,
    /// Step taken last tick.
    pub last_step: f32,
}

/// Closest the Duelist will choose to stand, center to center.
#[must_use]
pub fn min_body_distance(tuning: &DuelistTuning, player_width: f32) -> f32 {
    (player_width + tuning.width) / 2.0 + tuning.body_margin
}

/// Preferred center-to-center distance after `walk_timer` engaged frames.
///
/// A sine shuffle around the preferred range, never closer than
/// [`min_body_distance`].
#[must_use]
pub fn desired_distance(tuning: &DuelistTuning, walk_timer: f32, player_width: f32) -> f32 {
    let phase = walk_timer / tuning.shuffle_period.max(1.0) * std::f32::consts::TAU;
    let shuffle = phase.sin() * tuning.shuffle_amplitude;
    min_body_distance(tuning, player_width).max(tuning.desired_range + shuffle)
}

/// Shielded melee foe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Duelist {
    id: ActorId,
    tuning: DuelistTuning,
    body: Body,
    facing: Facing,
    life: Life,
    health: u32,
    hit_timer: u32,
    knockback_timer: u32,
    attack: AttackState,
    shield: Guard,
    shield_timer: u32,
    footwork: Footwork,
}

impl Duelist {
    /// Creates a Duelist with its top-left corner at `(x, y)`.
    pub fn new(
        id: ActorId,
        x: f32,
        y: f32,
        tuning: DuelistTuning,
        rng: &mut dyn RandomSource,
    ) -> Self {
        Self {
            id,
            tuning,
            body: Body::new(x, y, tuning.width, tuning.height),
            facing: Facing::Left,
            life: Life::default(),
            health: tuning.health,
            hit_timer: 0,
            knockback_timer: 0,
            attack: AttackState::Idle {
                cooldown: Self::roll_cooldown(&tuning, rng),
            },
            shield: Guard::High,
            shield_timer: 0,
            footwork: Footwork {
                walk_timer: 0,
                target_x: x,
                last_step: 0.0,
            },
        }
    }

    fn roll_cooldown(tuning: &DuelistTuning, rng: &mut dyn RandomSource) -> u32 {
        tuning.cooldown_base + (rng.next_f32() * tuning.cooldown_jitter as f32).floor() as u32
    }

    /// Tuning in use.
    #[must_use]
    pub fn tuning(&self) -> &DuelistTuning {
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

    /// Remaining knockback frames.
    #[must_use]
    pub fn knockback_timer(&self) -> u32 {
        self.knockback_timer
    }

    /// Attack cycle state.
    #[must_use]
    pub fn attack(&self) -> AttackState {
        self.attack
    }

    /// Shield stance.
    #[must_use]
    pub fn shield(&self) -> Guard {
        self.shield
    }

    /// Footwork state.
    #[must_use]
    pub fn footwork(&self) -> &Footwork {
        &self.footwork
    }

    /// Swing frame counts.
    #[must_use]
    pub fn swing_timing(&self) -> SwingTiming {
        SwingTiming::new(
            self.tuning.swing_windup,
            self.tuning.swing_stab,
            self.tuning.swing_recover,
        )
    }

    /// Whether the current swing already bounced off a shield.
    #[must_use]
    pub fn swing_blocked(&self) -> bool {
        matches!(self.attack, AttackState::Swing { blocked: true, .. })
    }

    pub(crate) fn life_mut(&mut self) -> &mut Life {
        &mut self.life
    }

    pub(crate) fn mark_swing_blocked(&mut self) -> bool {
        match &mut self.attack {
            AttackState::Swing { blocked, .. } if !*blocked => {
                *blocked = true;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn take_recoil(&mut self, velocity_x: f32, knockback_frames: u32) {
        self.body.velocity.x = velocity_x;
        self.knockback_timer = self.knockback_timer.max(knockback_frames);
    }

    #[cfg(test)]
    pub(crate) fn set_shield(&mut self, guard: Guard) {
        self.shield = guard;
    }

    #[cfg(test)]
    pub(crate) fn force_swing(&mut self, height: Guard, elapsed: u32) {
        self.attack = AttackState::Swing {
            elapsed,
            height,
            blocked: false,
        };
    }

    /// Sword rectangle for the current swing, or `None` when idle or not alive.
    ///
    /// The blade is drawn back during the windup, fully extended in the stab and
    /// eased back toward the body while recovering.
    #[must_use]
    pub fn sword_pose(&self) -> Option<SwordPose> {
        if !self.life.is_alive() {
            return None;
        }
        let AttackState::Swing {
            elapsed, height, ..
        } = self.attack
        else {
            return None;
        };
        let timing = self.swing_timing();
        let phase = timing.phase_at(elapsed)?;
        let progress = timing.phase_progress(elapsed);

        let (length, forward) = match phase {
            SwingPhase::Windup => {
                let len = self.tuning.held_length;
                (len, -len * (1.0 - progress))
            }
            SwingPhase::Stab => (self.tuning.stab_length, 0.0),
            SwingPhase::Recover => {
                let len = self.tuning.held_length;
                (len, -len * progress * 0.8)
            }
        };

        let pos = self.body.position;
        let x = match self.facing {
            Facing::Right => pos.x + self.body.width + forward,
            Facing::Left => pos.x - length - forward,
        };
        let offset = match height {
            Guard::High => 4.0,
            Guard::Low => self.body.height - self.tuning.low_stab_lift,
        };
        let lift = if phase == SwingPhase::Windup { 2.0 } else { 0.0 };
        Some(SwordPose {
            phase,
            rect: AABB::from_rect(x, pos.y + offset - lift, length, self.tuning.sword_thickness),
        })
    }

    /// Shield rectangle at the facing edge.
    #[must_use]
    pub fn shield_rect(&self) -> AABB {
        let width = self.tuning.shield_width;
        let height = self.tuning.shield_height;
        let pos = self.body.position;
        let x = match self.facing {
            Facing::Right => pos.x + self.body.width - width + 1.0,
            Facing::Left => pos.x - 1.0,
        };
        let y = match self.shield {
            Guard::High => pos.y + 2.0,
            Guard::Low => pos.y + self.body.height - height,
        };
        AABB::from_rect(x, y, width, height)
    }

    fn start_death(&mut self, direction: f32) {
        if !self.life.begin_dying() {
            return;
        }
        self.hit_timer = 0;
        self.knockback_timer = 0;
        self.attack = AttackState::Idle { cooldown: 0 };
        self.footwork.last_step = 0.0;
        let launch = if direction == 0.0 {
            self.facing.sign()
        } else {
            direction
        };
        self.body.velocity.x = launch * self.tuning.death_launch_x;
        self.body.velocity.y = self.tuning.death_launch_y;
        self.body.on_ground = false;
        info!(actor = %self.id, "duelist defeated");
    }

    fn advance_dying(&mut self, ctx: &ActorContext<'_>) {
        let dx = self.body.velocity.x;
        self.body
            .integrate(&ctx.world, dx, self.tuning.gravity, self.tuning.max_fall);
        self.body.velocity.x *= self.tuning.death_drag;
    }

    fn footwork_step(&mut self, player_center: f32, player_width: f32) -> f32 {
        let center = self.body.center().x;
        let engaging = (player_center - center).abs() <= self.tuning.engage_range;
        let mut step = 0.0;
        if engaging && self.knockback_timer == 0 {
            self.footwork.walk_timer += 1;
            let distance =
                desired_distance(&self.tuning, self.footwork.walk_timer as f32, player_width);
            let desired_center = player_center - self.facing.sign() * distance;
            let desired_x = desired_center - self.body.width / 2.0;
            self.footwork.target_x +=
                (desired_x - self.footwork.target_x) * self.tuning.walk_responsiveness;
            let delta = self.footwork.target_x - self.body.position.x;
            step = delta.clamp(-self.tuning.walk_speed, self.tuning.walk_speed);
        } else if !engaging {
            self.footwork.walk_timer = 0;
            self.footwork.target_x = self.body.position.x;
        }
        self.footwork.last_step = step;
        step
    }

    fn advance_attack(&mut self, rng: &mut dyn RandomSource) {
        let total = self.swing_timing().total();
        self.attack = match self.attack {
            AttackState::Swing {
                elapsed,
                height,
                blocked,
            } => {
                let elapsed = elapsed + 1;
                if elapsed >= total {
                    AttackState::Idle {
                        cooldown: Self::roll_cooldown(&self.tuning, rng),
                    }
                } else {
                    AttackState::Swing {
                        elapsed,
                        height,
                        blocked,
                    }
                }
            }
            AttackState::Idle { cooldown } => {
                let cooldown = cooldown.saturating_sub(1);
                if cooldown == 0 {
                    let height = if rng.chance(0.5) {
                        Guard::High
                    } else {
                        Guard::Low
                    };
                    debug!(actor = %self.id, ?height, "duelist swing");
                    AttackState::Swing {
                        elapsed: 0,
                        height,
                        blocked: false,
                    }
                } else {
                    AttackState::Idle { cooldown }
                }
            }
        };
    }

    fn advance_shield(&mut self, player_attacking: bool, rng: &mut dyn RandomSource) {
        if player_attacking {
            self.shield_timer = 0;
            return;
        }
        self.shield_timer += 1;
        if self.shield_timer >= self.tuning.shield_period {
            self.shield_timer = 0;
            if rng.chance(self.tuning.shield_flip_chance) {
                self.shield = self.shield.flipped();
                debug!(actor = %self.id, shield = ?self.shield, "duelist shield flip");
            }
        }
    }
}

impl Actor for Duelist {
    fn id(&self) -> ActorId {
        self.id
    }

    fn kind(&self) -> ActorKind {
        ActorKind::Duelist
    }

    fn advance(&mut self, ctx: &mut ActorContext<'_>) -> Option<ProjectileLaunch> {
        match self.life.state() {
            LifeState::Removed => return None,
            LifeState::Dying => {
                self.advance_dying(ctx);
                return None;
            }
            LifeState::Alive => {}
        }

        let player_center = ctx.player.center().x;
        let player_width = ctx.player.width();
        self.facing = Facing::toward(self.body.center().x, player_center);
        self.hit_timer = self.hit_timer.saturating_sub(1);

        let mut dx = 0.0;
        if self.knockback_timer > 0 {
            dx = self.body.velocity.x;
            self.body.velocity.x *= self.tuning.knockback_decay;
            self.knockback_timer -= 1;
        } else {
            self.body.velocity.x = 0.0;
        }
        dx += self.footwork_step(player_center, player_width);

        self.body
            .integrate(&ctx.world, dx, self.tuning.gravity, self.tuning.max_fall);

        self.advance_attack(ctx.rng);
        self.advance_shield(ctx.player.is_attacking(), ctx.rng);
        None
    }

    fn current_offensive_hitbox(&self) -> Option<Hitbox> {
        if self.hit_timer > 0 {
            return None;
        }
        let pose = self.sword_pose()?;
        pose.phase
            .can_damage()
            .then(|| Hitbox::new(self.id, HitboxRole::Offensive, pose.rect))
    }

    fn current_defensive_hitbox(&self) -> Option<Hitbox> {
        self.life
            .is_alive()
            .then(|| Hitbox::new(self.id, HitboxRole::Shield, self.shield_rect()))
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
        debug!(actor = %self.id, health = self.health, "duelist hit");
        DamageOutcome::Damaged
    }

    fn life_state(&self) -> LifeState {
        self.life.state()
    }

    fn hit_timer(&self) -> u32 {
        self.hit_timer
    }
}
