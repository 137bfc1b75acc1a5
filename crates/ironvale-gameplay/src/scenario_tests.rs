//! End-to-end combat scenarios and property tests over the whole core.

#![cfg(test)]

use ironvale_common::ActorId;
use proptest::prelude::*;

use crate::actor::{Actor, ActorContext, ActorKind, DamageOutcome, Enemy, Facing, LifeState};
use crate::combat::{resolve_actor_vs_player, CombatEvent, HitSource};
use crate::duelist::{desired_distance, min_body_distance, Duelist, Guard};
use crate::events::GameEvent;
use crate::lobber::Lobber;
use crate::pikeman::{PatrolMode, Pikeman, PikemanBounds};
use crate::player::{PlayerControl, PlayerPose};
use crate::rng::{SeededRandom, SequenceRandom};
use crate::simulation::Simulation;
use crate::tuning::{CombatTuning, DuelistTuning, LobberTuning, PikemanTuning, PlayerTuning};
use crate::world::{TileGrid, WorldCollision};

// Open arena with its floor surface at y = 128.
fn arena() -> TileGrid {
    let mut grid = TileGrid::empty(40, 12);
    grid.fill_floor(8);
    grid
}

fn crouch_stab(x: f32) -> PlayerPose {
    let mut player = PlayerPose::new(x, 96.0, PlayerTuning::default());
    player.set_crouching(true);
    player.start_swing();
    player.tick_timers();
    player.tick_timers();
    player
}

fn advance(actor: &mut Enemy, grid: &TileGrid, player: &PlayerPose, ticks: u32) {
    let mut rng = SequenceRandom::constant(0.5);
    let mut ctx = ActorContext {
        world: WorldCollision::with_default_tiles(grid),
        player,
        rng: &mut rng,
        tick: 0,
    };
    for _ in 0..ticks {
        actor.advance(&mut ctx);
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn scenario_lobber_dies_on_second_clean_hit() {
    let grid = arena();
    let tuning = CombatTuning::default();
    let mut lobber = Enemy::Lobber(Lobber::new(
        ActorId::from_raw(1),
        200.0,
        112.0,
        LobberTuning::default(),
    ));
    let mut events = Vec::new();

    let mut player = crouch_stab(180.0);
    let sword = player.sword_hitbox();
    resolve_actor_vs_player(&mut lobber, &mut player, sword.as_ref(), &tuning, &mut events);
    assert_eq!(lobber.hit_timer(), 10);
    assert_eq!(lobber.life_state(), LifeState::Alive);

    // Still in hitstun: the same blade does nothing.
    resolve_actor_vs_player(&mut lobber, &mut player, sword.as_ref(), &tuning, &mut events);
    assert_eq!(events.len(), 1);

    advance(&mut lobber, &grid, &player, 10);
    assert_eq!(lobber.hit_timer(), 0);

    let mut player = crouch_stab(lobber.body_hitbox().aabb.min_x - 20.0);
    let sword = player.sword_hitbox();
    resolve_actor_vs_player(&mut lobber, &mut player, sword.as_ref(), &tuning, &mut events);
    assert_eq!(lobber.life_state(), LifeState::Dying);

    // A third hit is never processed.
    resolve_actor_vs_player(&mut lobber, &mut player, sword.as_ref(), &tuning, &mut events);
    assert_eq!(lobber.apply_damage(1, 1.0), DamageOutcome::Ignored);
    let outcomes: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            CombatEvent::ActorHit { outcome, .. } => Some(*outcome),
            _ => None,
        })
        .collect();
    assert_eq!(outcomes, vec![DamageOutcome::Damaged, DamageOutcome::Defeated]);
}

#[test]
fn scenario_high_shield_stops_high_stab_only() {
    let tuning = CombatTuning::default();
    let spawn = || {
        let mut rng = SequenceRandom::constant(0.5);
        let mut d = Duelist::new(ActorId::from_raw(1), 100.0, 64.0, DuelistTuning::default(), &mut rng);
        d.set_shield(Guard::High);
        Enemy::Duelist(d)
    };
    let stab = |crouch: bool| {
        let mut p = PlayerPose::new(76.0, 64.0, PlayerTuning::default());
        p.set_crouching(crouch);
        p.start_swing();
        p.tick_timers();
        p.tick_timers();
        p
    };

    // Low stab under the shield.
    let mut low_target = spawn();
    let mut player = stab(true);
    let sword = player.sword_hitbox().expect("stab");
    let Enemy::Duelist(d) = &low_target else { unreachable!() };
    assert!(!sword.aabb.overlaps(&d.shield_rect()));
    let mut events = Vec::new();
    resolve_actor_vs_player(&mut low_target, &mut player, Some(&sword), &tuning, &mut events);
    let Enemy::Duelist(d) = &low_target else { unreachable!() };
    assert_eq!(d.health(), 5);
    assert!(!player.blocked_this_swing);

    // High stab into the shield.
    let mut high_target = spawn();
    let mut player = stab(false);
    let sword = player.sword_hitbox().expect("stab");
    let mut events = Vec::new();
    resolve_actor_vs_player(&mut high_target, &mut player, Some(&sword), &tuning, &mut events);
    let Enemy::Duelist(d) = &high_target else { unreachable!() };
    assert_eq!(d.health(), 6);
    assert_eq!(d.knockback_timer(), 8);
    assert!(player.blocked_this_swing);
    assert!(player.body.velocity.x < 0.0);
    assert_eq!(events, vec![CombatEvent::SwordBlocked { actor: ActorId::from_raw(1) }]);
}

#[test]
fn scenario_pikeman_slides_past_wall_and_keeps_heading() {
    // A two-tile pillar the Pikeman can slip under.
    let grid = TileGrid::from_rows(&[
        "..........",
        "..........",
        "......#...",
        "......#...",
        "..........",
        "..........",
        "..........",
        "..........",
    ])
    .expect("layout");
    // First roll 0.9: slide down. Second roll 0.9: a blocked slide turns around.
    let mut sim = Simulation::with_rng(SequenceRandom::new(vec![0.9, 0.9]), CombatTuning::default());
    let id = sim.spawn_pikeman(72.0, 40.0, Facing::Right, PikemanBounds::unbounded());
    let mut player = PlayerPose::new(-200.0, 0.0, PlayerTuning::default());

    let pike = |sim: &Simulation<SequenceRandom>| -> Pikeman {
        match sim.actor(id) {
            Some(Enemy::Pikeman(p)) => p.clone(),
            _ => unreachable!(),
        }
    };

    let mut blocked_at = None;
    for _ in 0..40 {
        let before = pike(&sim).x();
        sim.tick(&grid, &mut player);
        let now = pike(&sim);
        if now.mode() == PatrolMode::Sliding {
            assert_eq!(now.x(), before);
            blocked_at = Some(now.x());
            break;
        }
    }
    let blocked_at = blocked_at.expect("pikeman reached the pillar");
    assert!(blocked_at + 15.0 < 96.0);

    let mut resumed = false;
    for _ in 0..60 {
        sim.tick(&grid, &mut player);
        if pike(&sim).mode() == PatrolMode::Marching {
            resumed = true;
            break;
        }
    }
    assert!(resumed);
    let p = pike(&sim);
    assert_eq!(p.facing(), Facing::Right);
    assert!(p.velocity_x() > 0.0);
    assert!(p.z() >= 64.0);

    for _ in 0..30 {
        sim.tick(&grid, &mut player);
    }
    assert!(pike(&sim).x() > 112.0);
}

#[test]
fn scenario_death_timer_spawns_effects_once() {
    let grid = arena();
    let mut sim = Simulation::new(11, CombatTuning::default());
    let id = sim.spawn_duelist(200.0, 96.0);
    let mut player = PlayerPose::new(560.0, 96.0, PlayerTuning::default());

    let outcome = sim.actor_mut(id).map(|a| a.apply_damage(6, 1.0));
    assert_eq!(outcome, Some(DamageOutcome::Defeated));
    sim.drain_events();

    let mut removals = Vec::new();
    let mut currency = 0;
    for _ in 0..200 {
        let report = sim.tick(&grid, &mut player);
        currency += report.currency_dropped;
        if report.removals > 0 {
            removals.push(report.tick);
            assert_eq!(sim.effects().particle_count(), 6);
            assert_eq!(sim.effects().pickup_count(), 1);
        }
    }
    // Armed on tick 1, expires 36 ticks later.
    assert_eq!(removals, vec![37]);
    assert_eq!(currency, 1);
    assert_eq!(sim.effects().pickup_count(), 1);

    let removed: Vec<_> = sim
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::ActorRemoved { despawn, .. } => Some(despawn),
            _ => None,
        })
        .collect();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].kind, ActorKind::Duelist);
    assert_eq!(removed[0].currency, 1);
}

// ============================================================================
// Determinism
// ============================================================================

fn script(tick: u64) -> PlayerControl {
    PlayerControl {
        move_x: if tick % 200 < 120 { 1.0 } else { -0.5 },
        crouch: tick % 90 > 60,
        swing: tick % 23 == 0,
        jump: tick % 150 == 75,
    }
}

fn populated() -> (Simulation, PlayerPose) {
    let mut sim = Simulation::new(2024, CombatTuning::default());
    sim.spawn_duelist(160.0, 96.0);
    sim.spawn_lobber(260.0, 112.0);
    sim.spawn_pikeman(360.0, 104.0, Facing::Left, PikemanBounds::new(300.0, 500.0));
    (sim, PlayerPose::new(96.0, 96.0, PlayerTuning::default()))
}

fn run(
    sim: &mut Simulation,
    player: &mut PlayerPose,
    grid: &TileGrid,
    ticks: u64,
) -> Vec<Vec<u8>> {
    let world = WorldCollision::with_default_tiles(grid);
    let mut frames = Vec::new();
    for _ in 0..ticks {
        player.update(&world, script(sim.current_tick()));
        sim.tick(grid, player);
        frames.push(sim.snapshot(player).expect("encode"));
    }
    frames
}

#[test]
fn restored_run_matches_uninterrupted_run() {
    let grid = arena();

    let (mut straight, mut straight_player) = populated();
    let mut reference = run(&mut straight, &mut straight_player, &grid, 400);

    let (mut first, mut first_player) = populated();
    run(&mut first, &mut first_player, &grid, 150);
    let bytes = first.snapshot(&first_player).expect("encode");
    let (mut resumed, mut resumed_player) = Simulation::<SeededRandom>::restore(&bytes).expect("decode");
    let tail = run(&mut resumed, &mut resumed_player, &grid, 250);

    let expected = reference.split_off(150);
    assert_eq!(tail.len(), expected.len());
    assert!(tail == expected, "trajectories diverged after restore");
}

#[test]
fn same_seed_same_outcome() {
    let grid = arena();
    let (mut a, mut pa) = populated();
    let (mut b, mut pb) = populated();
    assert_eq!(run(&mut a, &mut pa, &grid, 300), run(&mut b, &mut pb, &grid, 300));
}

// ============================================================================
// Properties
// ============================================================================

fn any_enemy(kind: u8, rng: &mut SeededRandom) -> Enemy {
    let id = ActorId::from_raw(1);
    match kind % 3 {
        0 => Enemy::Duelist(Duelist::new(id, 200.0, 96.0, DuelistTuning::default(), rng)),
        1 => Enemy::Lobber(Lobber::new(id, 200.0, 112.0, LobberTuning::default())),
        _ => Enemy::Pikeman(Pikeman::new(
            id,
            200.0,
            104.0,
            Facing::Right,
            PikemanTuning::default(),
            PikemanBounds::unbounded(),
            rng,
        )),
    }
}

proptest! {
    #[test]
    fn footwork_never_crowds_player(walk_timer in 0.0f32..100_000.0, player_width in 4.0f32..48.0) {
        let tuning = DuelistTuning::default();
        prop_assert!(
            desired_distance(&tuning, walk_timer, player_width) >= min_body_distance(&tuning, player_width)
        );
    }

    #[test]
    fn life_state_only_moves_forward(
        kind in 0u8..3,
        seed in any::<u64>(),
        blows in prop::collection::vec((0u32..4, prop::bool::ANY, 0u32..20), 1..30),
    ) {
        let grid = arena();
        let player = PlayerPose::new(-400.0, 96.0, PlayerTuning::default());
        let mut rng = SeededRandom::new(seed);
        let mut enemy = any_enemy(kind, &mut rng);
        let mut previous = enemy.life_state();

        for (amount, from_left, gap) in blows {
            let was_alive = enemy.life_state().is_alive();
            let hit_timer = enemy.hit_timer();
            let outcome = enemy.apply_damage(amount, if from_left { 1.0 } else { -1.0 });
            if !was_alive {
                prop_assert_eq!(outcome, DamageOutcome::Ignored);
                prop_assert_eq!(enemy.hit_timer(), hit_timer);
            }
            prop_assert!(enemy.life_state() >= previous);
            previous = enemy.life_state();

            advance(&mut enemy, &grid, &player, gap);
            prop_assert!(enemy.life_state() >= previous);
            previous = enemy.life_state();
        }
    }

    #[test]
    fn at_most_one_hit_per_window(
        foes in prop::collection::vec((94.0f32..104.0, prop::bool::ANY, 30u32..42), 1..6),
    ) {
        let tuning = CombatTuning::default();
        let mut player = PlayerPose::new(76.0, 64.0, PlayerTuning::default());
        let mut events = Vec::new();
        for (raw, (x, high, elapsed)) in (1u32..).zip(foes) {
            let mut rng = SequenceRandom::constant(0.5);
            let id = ActorId::from_raw(raw);
            let mut d = Duelist::new(id, x, 64.0, DuelistTuning::default(), &mut rng);
            d.force_swing(if high { Guard::High } else { Guard::Low }, elapsed);
            let mut enemy = Enemy::Duelist(d);
            resolve_actor_vs_player(&mut enemy, &mut player, None, &tuning, &mut events);
        }
        let hits = events
            .iter()
            .filter(|e| matches!(e, CombatEvent::PlayerHit { source: HitSource::Sword | HitSource::Contact, .. }))
            .count();
        prop_assert!(hits <= 1);
    }

    #[test]
    fn blocked_flag_set_once_per_swing(overlaps in 1usize..12, swings in 1usize..4) {
        let tuning = CombatTuning::default();
        let mut rng = SequenceRandom::constant(0.5);
        let mut d = Duelist::new(ActorId::from_raw(1), 100.0, 64.0, DuelistTuning::default(), &mut rng);
        d.set_shield(Guard::High);
        let mut enemy = Enemy::Duelist(d);
        let mut player = PlayerPose::new(76.0, 64.0, PlayerTuning::default());

        for _ in 0..swings {
            player.cancel_attack();
            prop_assert!(player.start_swing());
            prop_assert!(!player.blocked_this_swing);
            player.tick_timers();
            player.tick_timers();
            let sword = player.sword_hitbox();
            let mut events = Vec::new();
            for _ in 0..overlaps {
                resolve_actor_vs_player(&mut enemy, &mut player, sword.as_ref(), &tuning, &mut events);
            }
            let blocks = events
                .iter()
                .filter(|e| matches!(e, CombatEvent::SwordBlocked { .. }))
                .count();
            prop_assert_eq!(blocks, 1);
            prop_assert!(player.blocked_this_swing);
        }
    }
}
