//! Fixed-step orchestration.
//!
//! One call to [`Simulation::tick`] runs, in this order:
//! 1. every actor's `advance` (shots they fire join the projectile set),
//! 2. projectile flight,
//! 3. combat resolution against the player, actor by actor, then shots,
//! 4. the lifecycle controller over every actor,
//! 5. effect aging.
//!
//! Actors removed during a tick stay readable until the start of the next one
//! and are skipped by every stage meanwhile.

use ironvale_common::{ActorId, ActorIdAllocator, WorldError, TILE_SIZE};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::actor::{Actor, ActorContext, ActorKind, DamageOutcome, Enemy, Facing, LifeState};
use crate::combat::{resolve_actor_vs_player, resolve_projectiles_vs_player, CombatEvent};
use crate::duelist::Duelist;
use crate::effects::EffectsManager;
use crate::events::{EventBus, GameEvent};
use crate::lifecycle::{DeathTimer, LifecycleController};
use crate::lobber::Lobber;
use crate::pikeman::{Pikeman, PikemanBounds};
use crate::player::PlayerPose;
use crate::projectile::ProjectileSet;
use crate::rng::{RandomSource, SeededRandom};
use crate::tuning::CombatTuning;
use crate::world::{TileQuery, WorldCollision};

/// An actor plus the death timer the lifecycle controller keeps for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSlot {
    actor: Enemy,
    death: DeathTimer,
}

impl ActorSlot {
    /// The actor.
    #[must_use]
    pub fn actor(&self) -> &Enemy {
        &self.actor
    }

    /// Its death timer.
    #[must_use]
    pub fn death_timer(&self) -> DeathTimer {
        self.death
    }
}

/// Counts of what happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick number.
    pub tick: u64,
    /// Hits landed on the player.
    pub player_hits: u32,
    /// Blows the player blocked with the shield (blades and shots).
    pub player_blocks: u32,
    /// Damaging sword hits on actors.
    pub actor_hits: u32,
    /// Player swings that bounced off a shield.
    pub sword_blocks: u32,
    /// Actors defeated.
    pub defeats: u32,
    /// Shots fired.
    pub shots_fired: u32,
    /// Actors removed.
    pub removals: u32,
    /// Currency dropped by removals.
    pub currency_dropped: u32,
}

impl TickReport {
    fn record(&mut self, event: &CombatEvent) {
        match event {
            CombatEvent::ActorHit { outcome, .. } => {
                self.actor_hits += 1;
                if *outcome == DamageOutcome::Defeated {
                    self.defeats += 1;
                }
            }
            CombatEvent::SwordBlocked { .. } => self.sword_blocks += 1,
            CombatEvent::PlayerHit { .. } => self.player_hits += 1,
            CombatEvent::PlayerBlocked { .. } | CombatEvent::ProjectileDeflected { .. } => {
                self.player_blocks += 1;
            }
        }
    }
}

/// The combat core: roster, shots, effects, and the shared random source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation<R = SeededRandom> {
    tick: u64,
    tile_size: f32,
    ids: ActorIdAllocator,
    roster: Vec<ActorSlot>,
    projectiles: ProjectileSet,
    effects: EffectsManager,
    tuning: CombatTuning,
    rng: R,
    #[serde(skip)]
    events: EventBus,
}

impl Simulation<SeededRandom> {
    /// Creates an empty simulation seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64, tuning: CombatTuning) -> Self {
        Self::with_rng(SeededRandom::new(seed), tuning)
    }
}

impl<R: RandomSource> Simulation<R> {
    /// Creates an empty simulation drawing from `rng`.
    #[must_use]
    pub fn with_rng(rng: R, tuning: CombatTuning) -> Self {
        Self {
            tick: 0,
            tile_size: TILE_SIZE,
            ids: ActorIdAllocator::default(),
            roster: Vec::new(),
            projectiles: ProjectileSet::new(),
            effects: EffectsManager::new(tuning.effects),
            tuning,
            rng,
            events: EventBus::default(),
        }
    }

    /// Uses a non-default tile size for world queries.
    pub fn with_tile_size(mut self, tile_size: f32) -> Result<Self, WorldError> {
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(WorldError::InvalidTileSize(tile_size.to_string()));
        }
        self.tile_size = tile_size;
        Ok(self)
    }

    fn add(&mut self, actor: Enemy) -> ActorId {
        let id = actor.id();
        let kind = actor.kind();
        self.roster.push(ActorSlot {
            actor,
            death: DeathTimer::default(),
        });
        self.events.publish(GameEvent::ActorSpawned {
            tick: self.tick,
            actor: id,
            kind,
        });
        debug!(actor = %id, %kind, "actor spawned");
        id
    }

    /// Adds a Duelist with its top-left corner at `(x, y)`.
    pub fn spawn_duelist(&mut self, x: f32, y: f32) -> ActorId {
        let id = self.ids.allocate();
        let duelist = Duelist::new(id, x, y, self.tuning.duelist, &mut self.rng);
        self.add(Enemy::Duelist(duelist))
    }

    /// Adds a Lobber with its top-left corner at `(x, y)`.
    pub fn spawn_lobber(&mut self, x: f32, y: f32) -> ActorId {
        let id = self.ids.allocate();
        self.add(Enemy::Lobber(Lobber::new(id, x, y, self.tuning.lobber)))
    }

    /// Adds a Pikeman at `x` on ground line `z`.
    pub fn spawn_pikeman(
        &mut self,
        x: f32,
        z: f32,
        facing: Facing,
        bounds: PikemanBounds,
    ) -> ActorId {
        let id = self.ids.allocate();
        let pikeman = Pikeman::new(id, x, z, facing, self.tuning.pikeman, bounds, &mut self.rng);
        self.add(Enemy::Pikeman(pikeman))
    }

    /// Advances everything one tick against `tiles` and the player.
    ///
    /// The player is read by AI and written by combat; moving it according to
    /// input is the caller's job and should happen before this call.
    pub fn tick(&mut self, tiles: &dyn TileQuery, player: &mut PlayerPose) -> TickReport {
        self.roster
            .retain(|slot| slot.actor.life_state() != LifeState::Removed);
        self.tick += 1;
        let tick = self.tick;
        let world = WorldCollision::new(tiles, self.tile_size);
        let mut report = TickReport {
            tick,
            ..TickReport::default()
        };

        for slot in &mut self.roster {
            let mut ctx = ActorContext {
                world,
                player: &*player,
                rng: &mut self.rng,
                tick,
            };
            if let Some(launch) = slot.actor.advance(&mut ctx) {
                self.projectiles.launch(launch);
                report.shots_fired += 1;
                self.events.publish(GameEvent::ProjectileLaunched {
                    tick,
                    owner: launch.owner,
                });
            }
        }

        self.projectiles.advance(&world);

        let sword = player.sword_hitbox();
        let mut combat = Vec::new();
        for slot in &mut self.roster {
            resolve_actor_vs_player(
                &mut slot.actor,
                player,
                sword.as_ref(),
                &self.tuning,
                &mut combat,
            );
        }
        resolve_projectiles_vs_player(&mut self.projectiles, player, &self.tuning, &mut combat);
        self.projectiles.retain_live();
        for event in combat {
            report.record(&event);
            self.events.publish(GameEvent::Combat { tick, event });
        }

        for slot in &mut self.roster {
            if let Some(despawn) = LifecycleController::observe(
                &mut slot.actor,
                &mut slot.death,
                &mut self.effects,
                &mut self.rng,
            ) {
                report.removals += 1;
                report.currency_dropped += despawn.currency;
                self.events
                    .publish(GameEvent::ActorRemoved { tick, despawn });
            }
        }

        self.effects.age();

        trace!(
            tick,
            actors = self.roster.len(),
            shots = self.projectiles.live_count(),
            particles = self.effects.particle_count(),
            "tick complete"
        );
        report
    }

    /// Hands every pickup touching the player to the caller. Returns the value.
    pub fn collect_currency(&mut self, player: &PlayerPose) -> u32 {
        self.effects.collect_pickups(&player.body.aabb())
    }

    /// Drains pending events.
    pub fn drain_events(&self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /// Last completed tick.
    #[must_use]
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Tile size used for world queries.
    #[must_use]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Every actor on the roster, including ones removed this tick.
    pub fn actors(&self) -> impl Iterator<Item = &Enemy> {
        self.roster.iter().map(|slot| &slot.actor)
    }

    /// Roster slots with their death timers.
    #[must_use]
    pub fn slots(&self) -> &[ActorSlot] {
        &self.roster
    }

    /// Looks up an actor.
    #[must_use]
    pub fn actor(&self, id: ActorId) -> Option<&Enemy> {
        self.actors().find(|a| a.id() == id)
    }

    /// Looks up an actor to apply outside damage, such as a hazard or a
    /// scripted blow. State changes still go through [`Actor::apply_damage`].
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Enemy> {
        self.roster
            .iter_mut()
            .map(|slot| &mut slot.actor)
            .find(|a| a.id() == id)
    }

    /// Number of actors still alive.
    #[must_use]
    pub fn live_actor_count(&self) -> usize {
        self.actors()
            .filter(|a| a.life_state().is_alive())
            .count()
    }

    /// Number of live actors of `kind`.
    #[must_use]
    pub fn live_count_of(&self, kind: ActorKind) -> usize {
        self.actors()
            .filter(|a| a.kind() == kind && a.life_state().is_alive())
            .count()
    }

    /// Shots in flight.
    #[must_use]
    pub fn projectiles(&self) -> &ProjectileSet {
        &self.projectiles
    }

    /// Particles and pickups.
    #[must_use]
    pub fn effects(&self) -> &EffectsManager {
        &self.effects
    }

    /// Balance tables.
    #[must_use]
    pub fn tuning(&self) -> &CombatTuning {
        &self.tuning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::PlayerTuning;
    use crate::world::TileGrid;

    fn arena() -> TileGrid {
        let mut grid = TileGrid::empty(40, 10);
        grid.fill_floor(8);
        grid
    }

    #[test]
    fn test_spawn_assigns_ids_and_events() {
        let mut sim = Simulation::new(1, CombatTuning::default());
        let a = sim.spawn_duelist(100.0, 96.0);
        let b = sim.spawn_lobber(200.0, 112.0);
        assert_ne!(a, b);
        assert_eq!(sim.live_actor_count(), 2);
        assert_eq!(sim.drain_events().len(), 2);
        assert_eq!(sim.actor(b).map(Actor::kind), Some(ActorKind::Lobber));
    }

    #[test]
    fn test_lobber_shots_join_projectiles() {
        let grid = arena();
        let mut sim = Simulation::new(1, CombatTuning::default());
        sim.spawn_lobber(100.0, 112.0);
        let mut player = PlayerPose::new(500.0, 96.0, PlayerTuning::default());
        let mut fired = 0;
        for _ in 0..200 {
            fired += sim.tick(&grid, &mut player).shots_fired;
        }
        assert_eq!(fired, 2);
        let launched = sim
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ProjectileLaunched { .. }))
            .count();
        assert_eq!(launched, 2);
    }

    #[test]
    fn test_removed_actors_are_pruned_next_tick() {
        let grid = arena();
        let mut sim = Simulation::new(1, CombatTuning::default());
        let id = sim.spawn_lobber(100.0, 112.0);
        if let Some(actor) = sim.actor_mut(id) {
            actor.apply_damage(2, 1.0);
        }
        let mut player = PlayerPose::new(500.0, 96.0, PlayerTuning::default());
        let mut removed_on = None;
        for _ in 0..40 {
            let report = sim.tick(&grid, &mut player);
            if report.removals > 0 {
                removed_on = Some(report.tick);
                assert_eq!(report.currency_dropped, 1);
                assert_eq!(sim.actor(id).map(Actor::life_state), Some(LifeState::Removed));
            }
        }
        assert_eq!(removed_on, Some(31));
        assert!(sim.actor(id).is_none());
        assert_eq!(sim.effects().pickup_count(), 1);
    }

    #[test]
    fn test_rejects_bad_tile_size() {
        let sim = Simulation::new(1, CombatTuning::default());
        assert!(sim.clone().with_tile_size(0.0).is_err());
        assert!(sim.with_tile_size(f32::NAN).is_err());
    }

    #[test]
    fn test_collect_currency() {
        let grid = arena();
        let mut sim = Simulation::new(1, CombatTuning::default());
        let id = sim.spawn_lobber(100.0, 112.0);
        if let Some(actor) = sim.actor_mut(id) {
            actor.apply_damage(2, 1.0);
        }
        let mut player = PlayerPose::new(500.0, 96.0, PlayerTuning::default());
        for _ in 0..100 {
            sim.tick(&grid, &mut player);
        }
        let pickup = *sim.effects().pickups().next().expect("pickup");
        player.body.position.x = pickup.position.x;
        player.body.position.y = pickup.position.y - 16.0;
        assert_eq!(sim.collect_currency(&player), 1);
        assert_eq!(sim.effects().pickup_count(), 0);
    }
}
