//! Shared actor contract.
//!
//! Every hostile type is its own state machine; this module holds what they
//! have in common: the one-way life cycle, facing, the [`Actor`] trait the
//! simulation drives them through, and the [`Enemy`] roster entry that
//! dispatches to the concrete type.

use ironvale_common::ActorId;
use serde::{Deserialize, Serialize};

use crate::duelist::Duelist;
use crate::geometry::{Hitbox, Vec2};
use crate::lifecycle::DeathPolicy;
use crate::lobber::Lobber;
use crate::pikeman::Pikeman;
use crate::player::PlayerPose;
use crate::projectile::ProjectileLaunch;
use crate::rng::RandomSource;
use crate::world::WorldCollision;

// ============================================================================
// Life State
// ============================================================================

/// Where an actor is in its life cycle.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum LifeState {
    /// Fighting. The only state that takes part in combat.
    #[default]
    Alive,
    /// Defeated and playing out its death motion.
    Dying,
    /// Gone. Inert for the rest of the run.
    Removed,
}

impl LifeState {
    /// Check if the actor is alive.
    #[must_use]
    pub fn is_alive(self) -> bool {
        self == Self::Alive
    }
}

/// Life state with forward-only transitions.
///
/// Only this crate can move an actor along; outside code reads the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Life {
    state: LifeState,
}

impl Life {
    /// Current state.
    #[must_use]
    pub fn state(self) -> LifeState {
        self.state
    }

    /// Check if the actor is alive.
    #[must_use]
    pub fn is_alive(self) -> bool {
        self.state.is_alive()
    }

    /// Alive -> Dying. Returns `false` if the actor was not alive.
    pub(crate) fn begin_dying(&mut self) -> bool {
        if self.state != LifeState::Alive {
            return false;
        }
        self.state = LifeState::Dying;
        true
    }

    /// Dying -> Removed. Returns `false` if the actor was not dying.
    pub(crate) fn mark_removed(&mut self) -> bool {
        if self.state != LifeState::Dying {
            return false;
        }
        self.state = LifeState::Removed;
        true
    }
}

// ============================================================================
// Facing and Direction
// ============================================================================

/// Horizontal facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Toward negative x.
    Left,
    /// Toward positive x.
    Right,
}

impl Facing {
    /// `-1.0` or `1.0`.
    #[must_use]
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Facing for a direction sign; zero and positive map to `Right`.
    #[must_use]
    pub fn from_sign(sign: f32) -> Self {
        if sign < 0.0 {
            Self::Left
        } else {
            Self::Right
        }
    }

    /// The opposite facing.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Facing from `from_x` toward `to_x`. Ties face right.
    #[must_use]
    pub fn toward(from_x: f32, to_x: f32) -> Self {
        if to_x < from_x {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// Direction to push a defender away from an attacker.
///
/// Sign of `defender_x - attacker_x`; a dead tie pushes toward `+1` so knockback
/// never degenerates to zero.
#[must_use]
pub fn knockback_direction(defender_x: f32, attacker_x: f32) -> f32 {
    if defender_x < attacker_x {
        -1.0
    } else {
        1.0
    }
}

// ============================================================================
// Actor Trait
// ============================================================================

/// What happened when damage was offered to an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// Not alive or still in hitstun; nothing changed.
    Ignored,
    /// Took the hit and is still standing.
    Damaged,
    /// Took the hit and entered `Dying`.
    Defeated,
}

/// Kind of hostile actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    /// Shielded melee foe.
    Duelist,
    /// Hopping ranged foe.
    Lobber,
    /// One-hit patroller.
    Pikeman,
}

impl std::fmt::Display for ActorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Duelist => "duelist",
            Self::Lobber => "lobber",
            Self::Pikeman => "pikeman",
        };
        f.write_str(name)
    }
}

/// Everything an actor may read while advancing one tick.
pub struct ActorContext<'a> {
    /// Terrain queries.
    pub world: WorldCollision<'a>,
    /// Player pose as of the start of the tick.
    pub player: &'a PlayerPose,
    /// Shared random source.
    pub rng: &'a mut dyn RandomSource,
    /// Tick number being simulated.
    pub tick: u64,
}

impl std::fmt::Debug for ActorContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorContext")
            .field("world", &self.world)
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}

/// Per-instance surface of a hostile actor.
///
/// Hitboxes are derived from current state on every call and never stored.
pub trait Actor {
    /// Identifier.
    fn id(&self) -> ActorId;

    /// Kind of actor.
    fn kind(&self) -> ActorKind;

    /// Advances one tick. Returns a shot to launch, if any.
    fn advance(&mut self, ctx: &mut ActorContext<'_>) -> Option<ProjectileLaunch>;

    /// Weapon box, or `None` when nothing can hurt right now.
    fn current_offensive_hitbox(&self) -> Option<Hitbox>;

    /// Guard box, or `None` for unshielded actors.
    fn current_defensive_hitbox(&self) -> Option<Hitbox>;

    /// Full body box.
    fn body_hitbox(&self) -> Hitbox;

    /// Offers damage pushing along `direction` (`-1.0` or `1.0`).
    fn apply_damage(&mut self, amount: u32, direction: f32) -> DamageOutcome;

    /// Life state.
    fn life_state(&self) -> LifeState;

    /// Remaining post-hit frames; `0` means vulnerable.
    fn hit_timer(&self) -> u32;

    /// Body center.
    fn center(&self) -> Vec2 {
        self.body_hitbox().aabb.center()
    }
}

// ============================================================================
// Enemy Roster Entry
// ============================================================================

/// A hostile actor of any kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Enemy {
    /// Shielded melee foe.
    Duelist(Duelist),
    /// Hopping ranged foe.
    Lobber(Lobber),
    /// One-hit patroller.
    Pikeman(Pikeman),
}

macro_rules! dispatch {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            Enemy::Duelist($inner) => $body,
            Enemy::Lobber($inner) => $body,
            Enemy::Pikeman($inner) => $body,
        }
    };
}

impl Enemy {
    /// How this enemy's death plays out.
    #[must_use]
    pub fn death_policy(&self) -> DeathPolicy {
        match self {
            Self::Duelist(d) => DeathPolicy::Countdown {
                frames: d.tuning().death_frames,
                drops_currency: true,
            },
            Self::Lobber(l) => DeathPolicy::Countdown {
                frames: l.tuning().death_frames,
                drops_currency: true,
            },
            Self::Pikeman(_) => DeathPolicy::UntilLanded,
        }
    }

    /// Whether a dying actor has finished its fall.
    #[must_use]
    pub fn has_landed(&self) -> bool {
        match self {
            Self::Pikeman(p) => p.has_landed(),
            Self::Duelist(_) | Self::Lobber(_) => false,
        }
    }

    /// Current facing.
    #[must_use]
    pub fn facing(&self) -> Facing {
        dispatch!(self, a => a.facing())
    }

    /// Whether the current swing already bounced off a shield.
    #[must_use]
    pub fn swing_blocked(&self) -> bool {
        match self {
            Self::Duelist(d) => d.swing_blocked(),
            Self::Lobber(_) | Self::Pikeman(_) => false,
        }
    }

    pub(crate) fn life_mut(&mut self) -> &mut Life {
        dispatch!(self, a => a.life_mut())
    }

    /// Shoved back by a blocked blow: horizontal speed plus at least
    /// `knockback_frames` of knockback.
    pub(crate) fn take_recoil(&mut self, velocity_x: f32, knockback_frames: u32) {
        match self {
            Self::Duelist(d) => d.take_recoil(velocity_x, knockback_frames),
            Self::Lobber(_) | Self::Pikeman(_) => {}
        }
    }

    /// Flags the current swing as blocked. Returns `false` if it already was.
    pub(crate) fn mark_swing_blocked(&mut self) -> bool {
        match self {
            Self::Duelist(d) => d.mark_swing_blocked(),
            Self::Lobber(_) | Self::Pikeman(_) => false,
        }
    }
}

impl Actor for Enemy {
    fn id(&self) -> ActorId {
        dispatch!(self, a => a.id())
    }

    fn kind(&self) -> ActorKind {
        dispatch!(self, a => a.kind())
    }

    fn advance(&mut self, ctx: &mut ActorContext<'_>) -> Option<ProjectileLaunch> {
        dispatch!(self, a => a.advance(ctx))
    }

    fn current_offensive_hitbox(&self) -> Option<Hitbox> {
        dispatch!(self, a => a.current_offensive_hitbox())
    }

    fn current_defensive_hitbox(&self) -> Option<Hitbox> {
        dispatch!(self, a => a.current_defensive_hitbox())
    }

    fn body_hitbox(&self) -> Hitbox {
        dispatch!(self, a => a.body_hitbox())
    }

    fn apply_damage(&mut self, amount: u32, direction: f32) -> DamageOutcome {
        dispatch!(self, a => a.apply_damage(amount, direction))
    }

    fn life_state(&self) -> LifeState {
        dispatch!(self, a => a.life_state())
    }

    fn hit_timer(&self) -> u32 {
        dispatch!(self, a => a.hit_timer())
    }
}
