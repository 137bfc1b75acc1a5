//! Per-type balance constants.
//!
//! Each foe keeps its own invulnerability, knockback, and recoil numbers; they
//! differ between types on purpose and are never folded into shared values.
//! Everything here deserializes with defaults, so a config file only has to name
//! the values it overrides.

use ironvale_common::TILE_SIZE;
use serde::{Deserialize, Serialize};

/// Player pose dimensions and timings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Body width.
    pub width: f32,
    /// Standing body height.
    pub stand_height: f32,
    /// Crouching body height.
    pub crouch_height: f32,
    /// Swing windup frames.
    pub swing_windup: u32,
    /// Swing stab frames (sword hitbox live).
    pub swing_stab: u32,
    /// Swing recover frames.
    pub swing_recover: u32,
    /// Sword length during the stab.
    pub sword_length: f32,
    /// Sword thickness.
    pub sword_thickness: f32,
    /// Shield width.
    pub shield_width: f32,
    /// Shield height.
    pub shield_height: f32,
    /// Walk speed.
    pub walk_speed: f32,
    /// Jump launch speed (negative is up).
    pub jump_speed: f32,
    /// Gravity per tick.
    pub gravity: f32,
    /// Terminal fall speed.
    pub max_fall: f32,
    /// Per-tick decay of knockback velocity while invulnerable or recoiling.
    pub knockback_decay: f32,
    /// Frames of recoil after a blow meets a shield.
    pub recoil_frames: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: TILE_SIZE,
            stand_height: TILE_SIZE * 2.0,
            crouch_height: (TILE_SIZE * 1.75).floor(),
            swing_windup: 2,
            swing_stab: 6,
            swing_recover: 3,
            sword_length: TILE_SIZE,
            sword_thickness: 4.0,
            shield_width: 4.0,
            shield_height: TILE_SIZE - 2.0,
            walk_speed: 2.2,
            jump_speed: -7.0,
            gravity: 0.35,
            max_fall: 10.0,
            knockback_decay: 0.9,
            recoil_frames: 8,
        }
    }
}

/// How hard a foe shoves the player on contact or a clean hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactKnockback {
    /// Invulnerability frames granted to the player.
    pub invulnerability: u32,
    /// Horizontal speed away from the foe.
    pub horizontal: f32,
    /// Vertical speed (negative is up).
    pub vertical: f32,
    /// Immediate horizontal nudge in pixels.
    pub nudge: f32,
    /// On body contact, place the player just outside the foe's body.
    pub separate: bool,
}

impl Default for ContactKnockback {
    fn default() -> Self {
        Self {
            invulnerability: 24,
            horizontal: 3.2,
            vertical: -4.0,
            nudge: 1.5,
            separate: true,
        }
    }
}

/// Recoil applied when a blow lands on a shield.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockRecoil {
    /// Speed given to the swinging side.
    pub attacker_speed: f32,
    /// Immediate push applied to the swinging side, in pixels.
    pub attacker_nudge: f32,
    /// Speed given to the blocking side.
    pub defender_speed: f32,
    /// Immediate push applied to the blocking side, in pixels.
    pub defender_nudge: f32,
    /// Minimum knockback frames imposed on the foe.
    pub knockback_frames: u32,
}

impl Default for BlockRecoil {
    fn default() -> Self {
        Self::player_sword_on_duelist_shield()
    }
}

impl BlockRecoil {
    /// Player's stab glancing off a Duelist's shield.
    #[must_use]
    pub const fn player_sword_on_duelist_shield() -> Self {
        Self {
            attacker_speed: 2.0,
            attacker_nudge: 1.5,
            defender_speed: 1.6,
            defender_nudge: 0.0,
            knockback_frames: 8,
        }
    }

    /// Duelist's stab glancing off the player's shield.
    #[must_use]
    pub const fn duelist_sword_on_player_shield() -> Self {
        Self {
            attacker_speed: 2.2,
            attacker_nudge: 0.0,
            defender_speed: 1.6,
            defender_nudge: 0.5,
            knockback_frames: 10,
        }
    }
}

/// Duelist (shielded melee foe) constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelistTuning {
    /// Body width.
    pub width: f32,
    /// Body height.
    pub height: f32,
    /// Starting health.
    pub health: u32,
    /// Gravity per tick.
    pub gravity: f32,
    /// Terminal fall speed.
    pub max_fall: f32,
    /// Swing windup frames.
    pub swing_windup: u32,
    /// Swing stab frames.
    pub swing_stab: u32,
    /// Swing recover frames.
    pub swing_recover: u32,
    /// Fixed part of the idle cooldown between swings.
    pub cooldown_base: u32,
    /// Random extra cooldown frames, `floor(rand * jitter)`.
    pub cooldown_jitter: u32,
    /// Hitstun frames after taking damage.
    pub hitstun: u32,
    /// Knockback speed when struck.
    pub knockback_speed: f32,
    /// Knockback frames when struck.
    pub knockback_frames: u32,
    /// Per-tick knockback velocity decay.
    pub knockback_decay: f32,
    /// Frames between shield-stance rolls.
    pub shield_period: u32,
    /// Probability that a roll flips the stance.
    pub shield_flip_chance: f32,
    /// Preferred distance to the player, center to center.
    pub desired_range: f32,
    /// Amplitude of the sine shuffle around the preferred distance.
    pub shuffle_amplitude: f32,
    /// Period of the shuffle in frames.
    pub shuffle_period: f32,
    /// Distance within which footwork engages.
    pub engage_range: f32,
    /// Maximum walk step per tick.
    pub walk_speed: f32,
    /// Fraction of the gap to the desired spot closed per tick.
    pub walk_responsiveness: f32,
    /// Extra spacing kept beyond touching bodies.
    pub body_margin: f32,
    /// Horizontal launch speed on defeat.
    pub death_launch_x: f32,
    /// Vertical launch speed on defeat.
    pub death_launch_y: f32,
    /// Per-tick horizontal drag while dying.
    pub death_drag: f32,
    /// Frames between defeat and removal.
    pub death_frames: u32,
    /// Shield width.
    pub shield_width: f32,
    /// Shield height.
    pub shield_height: f32,
    /// Sword thickness.
    pub sword_thickness: f32,
    /// Sword length during the stab.
    pub stab_length: f32,
    /// Sword length during windup and recover.
    pub held_length: f32,
    /// Height of a low stab's blade above the feet.
    pub low_stab_lift: f32,
    /// Contact and sword knockback on the player.
    pub contact: ContactKnockback,
    /// Player sword on this shield.
    pub shield_recoil: BlockRecoil,
    /// This sword on the player's shield.
    pub sword_recoil: BlockRecoil,
}

impl Default for DuelistTuning {
    fn default() -> Self {
        Self {
            width: TILE_SIZE,
            height: TILE_SIZE * 2.0,
            health: 6,
            gravity: 0.35,
            max_fall: 10.0,
            swing_windup: 30,
            swing_stab: 12,
            swing_recover: 18,
            cooldown_base: 180,
            cooldown_jitter: 60,
            hitstun: 14,
            knockback_speed: 2.5,
            knockback_frames: 12,
            knockback_decay: 0.85,
            shield_period: 120,
            shield_flip_chance: 0.5,
            desired_range: TILE_SIZE * 1.6,
            shuffle_amplitude: TILE_SIZE * 0.4,
            shuffle_period: 150.0,
            engage_range: TILE_SIZE * 6.0,
            walk_speed: 0.9,
            walk_responsiveness: 0.05,
            body_margin: 2.0,
            death_launch_x: 2.4,
            death_launch_y: -5.5,
            death_drag: 0.92,
            death_frames: 36,
            shield_width: TILE_SIZE * 0.6,
            shield_height: TILE_SIZE - 2.0,
            sword_thickness: 4.0,
            stab_length: TILE_SIZE,
            held_length: TILE_SIZE * 0.8,
            low_stab_lift: TILE_SIZE / 2.0,
            contact: ContactKnockback::default(),
            shield_recoil: BlockRecoil::player_sword_on_duelist_shield(),
            sword_recoil: BlockRecoil::duelist_sword_on_player_shield(),
        }
    }
}

/// Lobber (hopping ranged foe) constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LobberTuning {
    /// Body width.
    pub width: f32,
    /// Body height.
    pub height: f32,
    /// Starting health.
    pub health: u32,
    /// Gravity per tick.
    pub gravity: f32,
    /// Terminal fall speed.
    pub max_fall: f32,
    /// Jump launch speed (negative is up).
    pub jump_speed: f32,
    /// Frames spent grounded after a shot.
    pub wait_after_shot: u32,
    /// Frames spent grounded after landing a jump.
    pub wait_after_jump: u32,
    /// Hitstun frames after taking damage.
    pub hitstun: u32,
    /// Knockback speed when struck.
    pub knockback_speed: f32,
    /// Knockback frames when struck.
    pub knockback_frames: u32,
    /// Per-tick knockback velocity decay.
    pub knockback_decay: f32,
    /// Horizontal launch speed on defeat.
    pub death_launch_x: f32,
    /// Vertical launch speed on defeat.
    pub death_launch_y: f32,
    /// Per-tick horizontal drag while dying.
    pub death_drag: f32,
    /// Frames between defeat and removal.
    pub death_frames: u32,
    /// Shot horizontal speed.
    pub shot_speed_x: f32,
    /// Shot vertical launch speed.
    pub shot_speed_y: f32,
    /// Shot gravity.
    pub shot_gravity: f32,
    /// Shot edge length.
    pub shot_size: f32,
    /// Shot lifetime in frames.
    pub shot_life: u32,
    /// Contact and shot knockback on the player.
    pub contact: ContactKnockback,
}

impl Default for LobberTuning {
    fn default() -> Self {
        Self {
            width: TILE_SIZE,
            height: TILE_SIZE,
            health: 2,
            gravity: 0.30,
            max_fall: 8.0,
            jump_speed: -3.4,
            wait_after_shot: 120,
            wait_after_jump: 30,
            hitstun: 10,
            knockback_speed: 1.8,
            knockback_frames: 10,
            knockback_decay: 0.85,
            death_launch_x: 1.6,
            death_launch_y: -4.0,
            death_drag: 0.92,
            death_frames: 30,
            shot_speed_x: 2.2,
            shot_speed_y: -1.2,
            shot_gravity: 0.08,
            shot_size: 6.0,
            shot_life: 180,
            contact: ContactKnockback {
                invulnerability: 24,
                horizontal: 2.6,
                vertical: -3.0,
                nudge: 0.0,
                separate: false,
            },
        }
    }
}

/// Pikeman (one-hit patroller) constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PikemanTuning {
    /// Body width.
    pub width: f32,
    /// Body height.
    pub height: f32,
    /// Horizontal march speed.
    pub march_speed: f32,
    /// Vertical slide speed along obstructions.
    pub slide_speed: f32,
    /// Horizontal launch speed on defeat.
    pub defeat_launch_x: f32,
    /// Vertical launch speed on defeat.
    pub defeat_launch_y: f32,
    /// Gravity during the defeat arc.
    pub gravity: f32,
    /// Contact knockback on the player.
    pub contact: ContactKnockback,
}

impl Default for PikemanTuning {
    fn default() -> Self {
        Self {
            width: TILE_SIZE,
            height: (TILE_SIZE * 1.5).floor(),
            march_speed: 1.2,
            slide_speed: 0.8,
            defeat_launch_x: 3.2,
            defeat_launch_y: -5.0,
            gravity: 0.35,
            contact: ContactKnockback {
                invulnerability: 24,
                horizontal: 3.0,
                vertical: -4.0,
                nudge: 0.0,
                separate: false,
            },
        }
    }
}

/// Particle and pickup constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsTuning {
    /// Particles in a defeat burst.
    pub burst_count: u32,
    /// Random speed added on top of the base burst speed.
    pub burst_spread: f32,
    /// Base burst speed.
    pub burst_speed: f32,
    /// Vertical squash of burst velocity.
    pub burst_squash: f32,
    /// Upward bias added to burst velocity.
    pub burst_lift: f32,
    /// Particle lifetime in frames.
    pub particle_life: u32,
    /// Particle gravity.
    pub particle_gravity: f32,
    /// Maximum live particles.
    pub max_particles: usize,
    /// Maximum live pickups.
    pub max_pickups: usize,
    /// Pickup launch speed (negative is up).
    pub pickup_pop: f32,
    /// Pickup gravity.
    pub pickup_gravity: f32,
    /// Pickup lifetime in frames.
    pub pickup_life: u32,
    /// Pickup edge length.
    pub pickup_size: f32,
    /// Currency value of one pickup.
    pub pickup_value: u32,
}

impl Default for EffectsTuning {
    fn default() -> Self {
        Self {
            burst_count: 6,
            burst_spread: 0.8,
            burst_speed: 1.0,
            burst_squash: 0.6,
            burst_lift: -0.4,
            particle_life: 18,
            particle_gravity: 0.05,
            max_particles: 256,
            max_pickups: 64,
            pickup_pop: -2.5,
            pickup_gravity: 0.2,
            pickup_life: 600,
            pickup_size: 8.0,
            pickup_value: 1,
        }
    }
}

/// All balance tables in one place.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Player pose.
    pub player: PlayerTuning,
    /// Duelist.
    pub duelist: DuelistTuning,
    /// Lobber.
    pub lobber: LobberTuning,
    /// Pikeman.
    pub pikeman: PikemanTuning,
    /// Effects.
    pub effects: EffectsTuning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invulnerability_differs_per_type() {
        let tuning = CombatTuning::default();
        assert_eq!(tuning.duelist.contact.invulnerability, 24);
        assert_eq!(tuning.duelist.hitstun, 14);
        assert_eq!(tuning.lobber.hitstun, 10);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let json = r#"{ "duelist": { "health": 9 } }"#;
        let tuning: CombatTuning = serde_json::from_str(json).expect("parse");
        assert_eq!(tuning.duelist.health, 9);
        assert_eq!(tuning.duelist.swing_windup, 30);
        assert_eq!(tuning.lobber, LobberTuning::default());
    }

    #[test]
    fn test_recoil_tables_are_distinct() {
        let d = DuelistTuning::default();
        assert_ne!(d.shield_recoil, d.sword_recoil);
        assert_eq!(d.shield_recoil.knockback_frames, 8);
        assert_eq!(d.sword_recoil.knockback_frames, 10);
    }
}
