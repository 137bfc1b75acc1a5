//! Player pose surface.
//!
//! The player is driven from outside (input, health, animation), but its pose,
//! swing, and invulnerability are read by AI every tick and written by combat
//! resolution. [`PlayerPose`] is that shared surface.

use ironvale_common::ActorId;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::actor::Facing;
use crate::geometry::{Hitbox, HitboxRole, Vec2, AABB};
use crate::swing::{SwingPhase, SwingTiming};
use crate::tuning::PlayerTuning;
use crate::world::{Body, WorldCollision};

/// One tick of player intent, supplied by the input layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerControl {
    /// Horizontal intent in `[-1, 1]`.
    pub move_x: f32,
    /// Hold crouch.
    pub crouch: bool,
    /// Start a swing this tick.
    pub swing: bool,
    /// Jump this tick (only from the ground).
    pub jump: bool,
}

/// Player state read and written by the combat core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPose {
    /// Physical body; `position` is the top-left corner.
    pub body: Body,
    /// Horizontal facing.
    pub facing: Facing,
    /// Crouching lowers the body and the shield.
    pub crouching: bool,
    /// Swing in progress.
    pub attacking: bool,
    /// Frames since the swing started.
    pub attack_timer: u32,
    /// Remaining invulnerability frames; `0` means vulnerable.
    pub hit_timer: u32,
    /// Remaining frames of shield recoil; walking is locked out meanwhile.
    pub recoil_timer: u32,
    /// The current swing already bounced off a shield.
    pub blocked_this_swing: bool,
    tuning: PlayerTuning,
}

impl PlayerPose {
    /// Creates a standing player with its top-left corner at `(x, y)`.
    #[must_use]
    pub fn new(x: f32, y: f32, tuning: PlayerTuning) -> Self {
        Self {
            body: Body::new(x, y, tuning.width, tuning.stand_height),
            facing: Facing::Right,
            crouching: false,
            attacking: false,
            attack_timer: 0,
            hit_timer: 0,
            recoil_timer: 0,
            blocked_this_swing: false,
            tuning,
        }
    }

    /// Tuning in use.
    #[must_use]
    pub fn tuning(&self) -> &PlayerTuning {
        &self.tuning
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

    /// Top-left corner.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    /// Body width.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.body.width
    }

    /// Body height (changes with crouching).
    #[must_use]
    pub fn height(&self) -> f32 {
        self.body.height
    }

    /// Body center.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    /// Whether a swing is in progress.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    /// Current swing phase, if swinging.
    #[must_use]
    pub fn swing_phase(&self) -> Option<SwingPhase> {
        if !self.attacking {
            return None;
        }
        self.swing_timing().phase_at(self.attack_timer)
    }

    /// Full body box.
    #[must_use]
    pub fn body_hitbox(&self) -> Hitbox {
        Hitbox::new(ActorId::PLAYER, HitboxRole::Body, self.body.aabb())
    }

    /// Sword box; present only during the stab.
    ///
    /// Standing stabs land at chest height, crouching stabs near the feet.
    #[must_use]
    pub fn sword_hitbox(&self) -> Option<Hitbox> {
        if !self.swing_phase().is_some_and(SwingPhase::can_damage) {
            return None;
        }
        let length = self.tuning.sword_length;
        let thickness = self.tuning.sword_thickness;
        let Vec2 { x, y } = self.body.position;
        let sword_x = match self.facing {
            Facing::Right => x + self.body.width,
            Facing::Left => x - length,
        };
        let sword_y = if self.crouching {
            y + self.body.height - 8.0
        } else {
            y + 8.0
        };
        Some(Hitbox::new(
            ActorId::PLAYER,
            HitboxRole::Offensive,
            AABB::from_rect(sword_x, sword_y, length, thickness),
        ))
    }

    /// Shield box at the front edge; high when standing, low when crouching.
    #[must_use]
    pub fn shield_hitbox(&self) -> Hitbox {
        let width = self.tuning.shield_width;
        let height = self.tuning.shield_height;
        let Vec2 { x, y } = self.body.position;
        let shield_x = match self.facing {
            Facing::Right => x + self.body.width - width + 1.0,
            Facing::Left => x - 1.0,
        };
        let shield_y = if self.crouching {
            y + self.body.height - height
        } else {
            y + 2.0
        };
        Hitbox::new(
            ActorId::PLAYER,
            HitboxRole::Shield,
            AABB::from_rect(shield_x, shield_y, width, height),
        )
    }

    /// Starts a swing unless one is already running.
    ///
    /// A fresh swing always clears the blocked flag.
    pub fn start_swing(&mut self) -> bool {
        if self.attacking {
            return false;
        }
        self.attacking = true;
        self.attack_timer = 0;
        self.blocked_this_swing = false;
        true
    }

    /// Interrupts the current swing.
    pub fn cancel_attack(&mut self) {
        self.attacking = false;
        self.attack_timer = 0;
        self.blocked_this_swing = false;
    }

    /// Pushes the player back along `velocity_x` after a blow meets a shield.
    pub fn recoil(&mut self, velocity_x: f32) {
        self.body.velocity.x = velocity_x;
        self.body.velocity.y = self.body.velocity.y.min(-1.0);
        self.recoil_timer = self.tuning.recoil_frames;
    }

    /// Counts down invulnerability and recoil, and advances the swing.
    pub fn tick_timers(&mut self) {
        self.hit_timer = self.hit_timer.saturating_sub(1);
        self.recoil_timer = self.recoil_timer.saturating_sub(1);
        if self.attacking {
            self.attack_timer += 1;
            if self.attack_timer >= self.swing_timing().total() {
                self.cancel_attack();
            }
        }
    }

    /// Switches stance, keeping the feet planted.
    pub fn set_crouching(&mut self, crouching: bool) {
        if self.crouching == crouching {
            return;
        }
        let new_height = if crouching {
            self.tuning.crouch_height
        } else {
            self.tuning.stand_height
        };
        self.body.position.y += self.body.height - new_height;
        self.body.height = new_height;
        self.crouching = crouching;
    }

    /// Runs one tick of player movement from `control`.
    ///
    /// While invulnerable after a hit, or recoiling off a shield, the player
    /// drifts on its knockback velocity instead of walking.
    pub fn update(&mut self, world: &WorldCollision<'_>, control: PlayerControl) {
        self.tick_timers();
        self.set_crouching(control.crouch && self.body.on_ground);

        if self.hit_timer > 0 || self.recoil_timer > 0 {
            self.body.velocity.x *= self.tuning.knockback_decay;
        } else {
            let walk = if self.crouching {
                0.0
            } else {
                control.move_x.clamp(-1.0, 1.0)
            };
            self.body.velocity.x = walk * self.tuning.walk_speed;
            if walk != 0.0 {
                self.facing = Facing::from_sign(walk);
            }
            if control.jump && self.body.on_ground && !self.crouching {
                self.body.velocity.y = self.tuning.jump_speed;
                self.body.on_ground = false;
            }
        }

        if control.swing && self.start_swing() {
            trace!("player swing started");
        }

        let dx = self.body.velocity.x;
        self.body
            .integrate(world, dx, self.tuning.gravity, self.tuning.max_fall);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::TileGrid;

    fn pose() -> PlayerPose {
        PlayerPose::new(32.0, 32.0, PlayerTuning::default())
    }

    #[test]
    fn test_sword_only_during_stab() {
        let mut player = pose();
        assert!(player.sword_hitbox().is_none());
        assert!(player.start_swing());
        // Windup 2 frames.
        assert!(player.sword_hitbox().is_none());
        player.tick_timers();
        player.tick_timers();
        assert_eq!(player.swing_phase(), Some(SwingPhase::Stab));
        let sword = player.sword_hitbox().expect("stab");
        assert_eq!(sword.aabb.min_x, 48.0);
        assert_eq!(sword.aabb.width(), 16.0);
        for _ in 0..6 {
            player.tick_timers();
        }
        assert_eq!(player.swing_phase(), Some(SwingPhase::Recover));
        assert!(player.sword_hitbox().is_none());
        for _ in 0..3 {
            player.tick_timers();
        }
        assert!(!player.is_attacking());
    }

    #[test]
    fn test_swing_resets_blocked_flag() {
        let mut player = pose();
        player.start_swing();
        player.blocked_this_swing = true;
        assert!(!player.start_swing());
        assert!(player.blocked_this_swing);
        player.cancel_attack();
        assert!(player.start_swing());
        assert!(!player.blocked_this_swing);
    }

    #[test]
    fn test_crouch_lowers_shield_and_keeps_feet() {
        let mut player = pose();
        let feet = player.body.aabb().max_y;
        let high = player.shield_hitbox();
        player.set_crouching(true);
        assert_eq!(player.body.aabb().max_y, feet);
        assert_eq!(player.height(), 28.0);
        let low = player.shield_hitbox();
        assert!(low.aabb.min_y > high.aabb.min_y);
        assert_eq!(low.aabb.max_y, feet);
    }

    #[test]
    fn test_shield_follows_facing() {
        let mut player = pose();
        assert!(player.shield_hitbox().aabb.min_x > player.center().x);
        player.facing = Facing::Left;
        assert!(player.shield_hitbox().aabb.max_x < player.center().x);
    }

    #[test]
    fn test_knockback_drift_overrides_walking() {
        let grid = TileGrid::from_rows(&["........", "........", "........", "########"])
            .expect("layout");
        let world = WorldCollision::with_default_tiles(&grid);
        let mut player = PlayerPose::new(40.0, 16.0, PlayerTuning::default());
        player.hit_timer = 10;
        player.body.velocity.x = -3.2;
        player.update(
            &world,
            PlayerControl {
                move_x: 1.0,
                ..PlayerControl::default()
            },
        );
        assert!(player.body.velocity.x < 0.0);
        assert_eq!(player.facing, Facing::Right);
    }

    #[test]
    fn test_shield_recoil_carries_player_back() {
        let grid = TileGrid::from_rows(&["........", "........", "........", "########"])
            .expect("layout");
        let world = WorldCollision::with_default_tiles(&grid);
        let mut player = PlayerPose::new(40.0, 16.0, PlayerTuning::default());
        player.body.on_ground = true;
        player.recoil(-2.0);
        assert_eq!(player.recoil_timer, 8);

        let start = player.position().x;
        player.update(&world, PlayerControl::default());
        assert!(player.position().x < start);
        assert!(player.body.velocity.x < 0.0);

        for _ in 0..7 {
            player.update(&world, PlayerControl::default());
        }
        assert_eq!(player.recoil_timer, 0);
        let settled = player.position().x;
        player.update(&world, PlayerControl::default());
        assert_eq!(player.body.velocity.x, 0.0);
        assert_eq!(player.position().x, settled);
    }
}
