//! Death timers and removal.
//!
//! Watches actors enter `Dying`, runs their death out by frame count, and on
//! expiry spawns the defeat effects exactly once before marking the actor
//! `Removed`.

use ironvale_common::ActorId;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::actor::{Actor, ActorKind, Enemy, LifeState};
use crate::effects::EffectsManager;
use crate::rng::RandomSource;

/// How an actor's death plays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathPolicy {
    /// Fixed number of frames, then burst (plus currency if set).
    Countdown {
        /// Frames between defeat and removal.
        frames: u32,
        /// Drop a currency pickup on removal.
        drops_currency: bool,
    },
    /// Burst as soon as the actor reports it has landed.
    UntilLanded,
}

/// Per-actor death timer, kept next to the actor by its owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathTimer {
    /// Actor has not started dying.
    #[default]
    Idle,
    /// Counting down.
    Counting {
        /// Frames left.
        remaining: u32,
    },
    /// Waiting for the actor to land.
    Falling,
    /// Effects spawned and actor removed.
    Done,
}

/// Record of one removal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Despawn {
    /// Removed actor.
    pub actor: ActorId,
    /// Its kind.
    pub kind: ActorKind,
    /// Currency dropped (0 if none).
    pub currency: u32,
}

/// Drives death timers. Stateless; the timers live with the actors.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleController;

impl LifecycleController {
    /// Observes one actor after combat resolution.
    ///
    /// The tick an actor is first seen dying arms its timer without counting
    /// it, so a `Countdown { frames }` death lasts exactly `frames` further
    /// ticks.
    pub fn observe(
        actor: &mut Enemy,
        timer: &mut DeathTimer,
        effects: &mut EffectsManager,
        rng: &mut dyn RandomSource,
    ) -> Option<Despawn> {
        if actor.life_state() != LifeState::Dying {
            return None;
        }

        let policy = actor.death_policy();
        let expired = match (*timer, policy) {
            (DeathTimer::Idle, DeathPolicy::Countdown { frames, .. }) => {
                *timer = DeathTimer::Counting { remaining: frames };
                frames == 0
            }
            (DeathTimer::Idle, DeathPolicy::UntilLanded) => {
                *timer = DeathTimer::Falling;
                actor.has_landed()
            }
            (DeathTimer::Counting { remaining }, _) => {
                let remaining = remaining.saturating_sub(1);
                *timer = DeathTimer::Counting { remaining };
                remaining == 0
            }
            (DeathTimer::Falling, _) => actor.has_landed(),
            (DeathTimer::Done, _) => false,
        };
        if !expired {
            return None;
        }

        *timer = DeathTimer::Done;
        if !actor.life_mut().mark_removed() {
            return None;
        }

        let bounds = actor.body_hitbox().aabb;
        effects.spawn_defeat_burst(bounds.center(), rng);
        let currency = match policy {
            DeathPolicy::Countdown {
                drops_currency: true,
                ..
            } => effects.spawn_currency_pickup(&bounds),
            _ => 0,
        };
        let despawn = Despawn {
            actor: actor.id(),
            kind: actor.kind(),
            currency,
        };
        info!(actor = %despawn.actor, kind = %despawn.kind, currency, "actor removed");
        Some(despawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Facing;
    use crate::lobber::Lobber;
    use crate::pikeman::{Pikeman, PikemanBounds};
    use crate::rng::SequenceRandom;
    use crate::tuning::{LobberTuning, PikemanTuning};

    #[test]
    fn test_countdown_spawns_once() {
        let mut actor = Enemy::Lobber(Lobber::new(
            ActorId::from_raw(1),
            0.0,
            0.0,
            LobberTuning::default(),
        ));
        let mut timer = DeathTimer::default();
        let mut fx = EffectsManager::default();
        let mut rng = SequenceRandom::constant(0.3);

        assert!(LifecycleController::observe(&mut actor, &mut timer, &mut fx, &mut rng).is_none());
        assert_eq!(timer, DeathTimer::Idle);

        actor.apply_damage(2, 1.0);
        let mut removed_at = None;
        for tick in 0..100 {
            if let Some(d) = LifecycleController::observe(&mut actor, &mut timer, &mut fx, &mut rng)
            {
                assert!(removed_at.is_none());
                assert_eq!(d.currency, 1);
                removed_at = Some(tick);
            }
        }
        // Armed on tick 0, then 30 countdown ticks.
        assert_eq!(removed_at, Some(30));
        assert_eq!(actor.life_state(), LifeState::Removed);
        assert_eq!(fx.particle_count(), 6);
        assert_eq!(fx.pickup_count(), 1);
    }

    #[test]
    fn test_until_landed_has_no_currency() {
        let mut rng = SequenceRandom::constant(0.9);
        let mut pikeman = Pikeman::new(
            ActorId::from_raw(2),
            0.0,
            50.0,
            Facing::Right,
            PikemanTuning::default(),
            PikemanBounds::unbounded(),
            &mut rng,
        );
        pikeman.apply_damage(1, 1.0);
        let mut actor = Enemy::Pikeman(pikeman);
        let mut timer = DeathTimer::default();
        let mut fx = EffectsManager::default();

        assert!(LifecycleController::observe(&mut actor, &mut timer, &mut fx, &mut rng).is_none());
        assert_eq!(timer, DeathTimer::Falling);

        if let Enemy::Pikeman(p) = &mut actor {
            while !p.has_landed() {
                p.fly();
            }
        }
        let despawn = LifecycleController::observe(&mut actor, &mut timer, &mut fx, &mut rng)
            .expect("landed");
        assert_eq!(despawn.currency, 0);
        assert_eq!(fx.pickup_count(), 0);
        assert_eq!(fx.particle_count(), 6);
        assert!(LifecycleController::observe(&mut actor, &mut timer, &mut fx, &mut rng).is_none());
    }
}
