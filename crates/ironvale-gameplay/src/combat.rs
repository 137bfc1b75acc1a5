//! Combat resolution between hostile actors and the player.
//!
//! Runs once per tick after every actor has advanced. For each live actor it
//! checks, in order:
//! - the player's sword against the actor's shield and body,
//! - body-to-body contact,
//! - the actor's weapon against the player's shield and body.
//!
//! Then every live shot is checked against the player. The player's
//! invulnerability is written as soon as a hit lands, so nothing processed
//! later in the same tick can land a second one.
//!
//! This is the only place allowed to mutate an actor and the player together.

use ironvale_common::ActorId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actor::{knockback_direction, Actor, ActorKind, DamageOutcome, Enemy};
use crate::geometry::Hitbox;
use crate::player::PlayerPose;
use crate::projectile::ProjectileSet;
use crate::tuning::{CombatTuning, ContactKnockback};

// ============================================================================
// Combat Events
// ============================================================================

/// What hurt the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitSource {
    /// Walked into a hostile body.
    Contact,
    /// A hostile blade.
    Sword,
    /// A shot.
    Projectile,
}

/// One outcome of combat resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// The player's sword damaged an actor.
    ActorHit {
        /// Actor struck.
        actor: ActorId,
        /// Its kind.
        kind: ActorKind,
        /// `Damaged` or `Defeated`.
        outcome: DamageOutcome,
    },
    /// The player's sword glanced off an actor's shield.
    SwordBlocked {
        /// Shield owner.
        actor: ActorId,
    },
    /// The player took a hit.
    PlayerHit {
        /// Who dealt it.
        attacker: ActorId,
        /// How.
        source: HitSource,
        /// Knockback direction applied to the player.
        direction: f32,
    },
    /// The player's shield stopped an actor's blade.
    PlayerBlocked {
        /// Blade owner.
        attacker: ActorId,
    },
    /// The player's shield stopped a shot.
    ProjectileDeflected {
        /// Shooter.
        owner: ActorId,
    },
}

// ============================================================================
// Resolution
// ============================================================================

fn contact_knockback(kind: ActorKind, tuning: &CombatTuning) -> ContactKnockback {
    match kind {
        ActorKind::Duelist => tuning.duelist.contact,
        ActorKind::Lobber => tuning.lobber.contact,
        ActorKind::Pikeman => tuning.pikeman.contact,
    }
}

fn hurt_player(player: &mut PlayerPose, knock: &ContactKnockback, direction: f32) {
    player.hit_timer = knock.invulnerability;
    player.body.velocity.x = direction * knock.horizontal;
    player.body.velocity.y = knock.vertical;
    player.cancel_attack();
}

/// Resolves one actor against the player in both directions.
///
/// `player_sword` is computed once per tick by the caller and shared across all
/// actors. Actors that are not alive are skipped entirely.
pub fn resolve_actor_vs_player(
    actor: &mut Enemy,
    player: &mut PlayerPose,
    player_sword: Option<&Hitbox>,
    tuning: &CombatTuning,
    events: &mut Vec<CombatEvent>,
) {
    if !actor.life_state().is_alive() {
        return;
    }
    let id = actor.id();
    let kind = actor.kind();

    // Player's sword against the actor.
    if let Some(sword) = player_sword {
        if actor.hit_timer() == 0 {
            let blocked = sword.overlaps_opt(actor.current_defensive_hitbox().as_ref());
            if !blocked && sword.overlaps(&actor.body_hitbox()) {
                let direction = knockback_direction(actor.center().x, player.center().x);
                let outcome = actor.apply_damage(1, direction);
                if outcome != DamageOutcome::Ignored {
                    events.push(CombatEvent::ActorHit {
                        actor: id,
                        kind,
                        outcome,
                    });
                }
                if outcome == DamageOutcome::Defeated {
                    return;
                }
            } else if blocked && !player.blocked_this_swing {
                // Only the Duelist carries a shield.
                let recoil = tuning.duelist.shield_recoil;
                let dir = player.facing.sign();
                player.body.position.x -= dir * recoil.attacker_nudge;
                player.recoil(-dir * recoil.attacker_speed);
                player.blocked_this_swing = true;
                actor.take_recoil(dir * recoil.defender_speed, recoil.knockback_frames);
                debug!(actor = %id, "player sword blocked");
                events.push(CombatEvent::SwordBlocked { actor: id });
            }
        }
    }

    // Body contact.
    let body = actor.body_hitbox();
    if player.hit_timer == 0 && body.overlaps(&player.body_hitbox()) {
        let knock = contact_knockback(kind, tuning);
        let direction = knockback_direction(player.center().x, body.aabb.center().x);
        if knock.separate {
            player.body.position.x = if direction < 0.0 {
                body.aabb.min_x - player.width() - 1.0
            } else {
                body.aabb.max_x + 1.0
            };
        }
        hurt_player(player, &knock, direction);
        debug!(actor = %id, "player touched hostile body");
        events.push(CombatEvent::PlayerHit {
            attacker: id,
            source: HitSource::Contact,
            direction,
        });
    }

    // Actor's blade against the player.
    if player.hit_timer != 0 {
        return;
    }
    let Some(blade) = actor.current_offensive_hitbox() else {
        return;
    };
    let hits_body = blade.overlaps(&player.body_hitbox());
    let shield_blocks = blade.overlaps(&player.shield_hitbox());
    if hits_body && !shield_blocks {
        let knock = contact_knockback(kind, tuning);
        let direction = knockback_direction(player.center().x, body.aabb.center().x);
        hurt_player(player, &knock, direction);
        player.body.position.x += direction * knock.nudge;
        debug!(actor = %id, "player cut");
        events.push(CombatEvent::PlayerHit {
            attacker: id,
            source: HitSource::Sword,
            direction,
        });
    } else if shield_blocks && !actor.swing_blocked() {
        let recoil = tuning.duelist.sword_recoil;
        let dir = actor.facing().sign();
        player.recoil(dir * recoil.defender_speed);
        player.body.position.x += dir * recoil.defender_nudge;
        actor.take_recoil(-dir * recoil.attacker_speed, recoil.knockback_frames);
        actor.mark_swing_blocked();
        debug!(actor = %id, "player blocked blade");
        events.push(CombatEvent::PlayerBlocked { attacker: id });
    }
}

/// Resolves every live shot against the player.
///
/// A shot touching the shield is deflected. A shot touching the body of a
/// vulnerable player hits with the Lobber's knockback. Either way it is spent.
/// Shots overlapping an invulnerable player fly on.
pub fn resolve_projectiles_vs_player(
    projectiles: &mut ProjectileSet,
    player: &mut PlayerPose,
    tuning: &CombatTuning,
    events: &mut Vec<CombatEvent>,
) {
    for shot in projectiles.iter_mut().filter(|s| s.is_live()) {
        let hitbox = shot.hitbox();
        if hitbox.overlaps(&player.shield_hitbox()) {
            shot.consume();
            events.push(CombatEvent::ProjectileDeflected { owner: shot.owner });
        } else if player.hit_timer == 0 && hitbox.overlaps(&player.body_hitbox()) {
            let knock = tuning.lobber.contact;
            let direction = knockback_direction(player.center().x, hitbox.aabb.center().x);
            hurt_player(player, &knock, direction);
            shot.consume();
            events.push(CombatEvent::PlayerHit {
                attacker: shot.owner,
                source: HitSource::Projectile,
                direction,
            });
        }
    }
}
