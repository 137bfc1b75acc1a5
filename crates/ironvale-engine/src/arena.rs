//! Built-in test arena and the scripted player that fights in it.

use ironvale_common::WorldError;
use ironvale_gameplay::{
    Actor, Facing, PikemanBounds, PlayerControl, PlayerPose, RandomSource, Simulation, TileGrid,
};

/// Walled hall with a low pillar in the Pikeman's lane. Floor surface at row 10.
pub const ARENA_LAYOUT: [&str; 12] = [
    "################################################",
    "#..............................................#",
    "#..............................................#",
    "#..............................................#",
    "#..............................................#",
    "#..............................................#",
    "#..............................................#",
    "#.......................................#......#",
    "#.......................................#......#",
    "#..............................................#",
    "################################################",
    "################################################",
];

const FLOOR_ROW: f32 = 10.0;

/// Tile map plus the spawn points laid out on it.
#[derive(Debug, Clone)]
pub struct Arena {
    tiles: TileGrid,
    tile_size: f32,
}

impl Arena {
    /// Builds the built-in arena.
    pub fn new(tile_size: f32) -> Result<Self, WorldError> {
        Ok(Self {
            tiles: TileGrid::from_rows(&ARENA_LAYOUT)?,
            tile_size,
        })
    }

    /// Tile map.
    #[must_use]
    pub fn tiles(&self) -> &TileGrid {
        &self.tiles
    }

    /// Y of the floor surface in pixels.
    #[must_use]
    pub fn floor_y(&self) -> f32 {
        FLOOR_ROW * self.tile_size
    }

    /// A standing player near the left wall.
    #[must_use]
    pub fn spawn_player(&self, sim: &Simulation<impl RandomSource>) -> PlayerPose {
        let tuning = sim.tuning().player;
        PlayerPose::new(
            3.0 * self.tile_size,
            self.floor_y() - tuning.stand_height,
            tuning,
        )
    }

    /// Places one of each foe.
    pub fn populate<R: RandomSource>(&self, sim: &mut Simulation<R>) {
        let t = self.tile_size;
        let floor = self.floor_y();
        let tuning = *sim.tuning();
        sim.spawn_duelist(15.0 * t, floor - tuning.duelist.height);
        sim.spawn_lobber(26.0 * t, floor - tuning.lobber.height);
        sim.spawn_pikeman(
            32.0 * t,
            floor - tuning.pikeman.height,
            Facing::Right,
            PikemanBounds::new(30.0 * t, 46.0 * t),
        );
    }
}

/// Drives the player at the nearest live foe.
///
/// Walks in until inside striking range, then holds ground, swings on a fixed
/// cadence and alternates between standing and crouching guard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedPlayer {
    /// Center distance at which the player stops walking.
    pub strike_range: f32,
    /// Ticks between swing attempts.
    pub swing_every: u64,
    /// Ticks spent in each guard before switching.
    pub guard_every: u64,
}

impl Default for ScriptedPlayer {
    fn default() -> Self {
        Self {
            strike_range: 26.0,
            swing_every: 20,
            guard_every: 45,
        }
    }
}

impl ScriptedPlayer {
    /// Picks this tick's control and turns the player toward its target.
    pub fn control<R: RandomSource>(
        &self,
        tick: u64,
        player: &mut PlayerPose,
        sim: &Simulation<R>,
    ) -> PlayerControl {
        let here = player.center().x;
        let target = sim
            .actors()
            .filter(|a| a.life_state().is_alive())
            .map(|a| a.center().x)
            .min_by(|a, b| (a - here).abs().total_cmp(&(b - here).abs()));

        let Some(target) = target else {
            return PlayerControl::default();
        };

        let gap = target - here;
        if gap.abs() > self.strike_range {
            return PlayerControl {
                move_x: gap.signum(),
                ..PlayerControl::default()
            };
        }

        if player.hit_timer == 0 {
            player.facing = Facing::toward(here, target);
        }
        let cadence = self.swing_every.max(1);
        let guard = self.guard_every.max(1);
        PlayerControl {
            move_x: 0.0,
            crouch: (tick / guard) % 2 == 1,
            swing: tick % cadence == 0,
            jump: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironvale_gameplay::{ActorKind, CombatTuning, SequenceRandom};

    #[test]
    fn test_arena_builds() {
        let arena = Arena::new(16.0).expect("layout");
        assert_eq!(arena.tiles().width(), 48);
        assert_eq!(arena.tiles().height(), 12);
        assert_eq!(arena.floor_y(), 160.0);
    }

    #[test]
    fn test_populate_spawns_one_of_each() {
        let arena = Arena::new(16.0).expect("layout");
        let mut sim = Simulation::new(5, CombatTuning::default());
        arena.populate(&mut sim);
        for kind in [ActorKind::Duelist, ActorKind::Lobber, ActorKind::Pikeman] {
            assert_eq!(sim.live_count_of(kind), 1);
        }
    }

    #[test]
    fn test_script_walks_then_swings() {
        let arena = Arena::new(16.0).expect("layout");
        let mut sim = Simulation::with_rng(SequenceRandom::constant(0.5), CombatTuning::default());
        sim.spawn_duelist(200.0, 128.0);
        let mut player = arena.spawn_player(&sim);
        let script = ScriptedPlayer::default();

        let far = script.control(0, &mut player, &sim);
        assert_eq!(far.move_x, 1.0);
        assert!(!far.swing);

        player.body.position.x = 180.0;
        player.facing = Facing::Left;
        let near = script.control(40, &mut player, &sim);
        assert_eq!(near.move_x, 0.0);
        assert!(near.swing);
        assert_eq!(player.facing, Facing::Right);
    }

    #[test]
    fn test_script_idles_with_no_targets() {
        let arena = Arena::new(16.0).expect("layout");
        let sim = Simulation::new(5, CombatTuning::default());
        let mut player = arena.spawn_player(&sim);
        assert_eq!(
            ScriptedPlayer::default().control(0, &mut player, &sim),
            PlayerControl::default()
        );
    }
}
