//! Fixed-step headless run.
//!
//! Each tick moves the scripted player, advances the combat core, and hands
//! any pickups the player is touching to the purse.

use std::fs;
use std::path::Path;

use ironvale_common::IronvaleResult;
use ironvale_gameplay::{PlayerPose, SeededRandom, Simulation, TickReport, WorldCollision};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::arena::{Arena, ScriptedPlayer};
use crate::config::EngineConfig;

/// Totals over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Ticks simulated
    pub ticks: u64,
    /// Hits taken by the player
    pub player_hits: u32,
    /// Blows the player's shield stopped
    pub player_blocks: u32,
    /// Damaging hits on foes
    pub actor_hits: u32,
    /// Player swings stopped by a shield
    pub sword_blocks: u32,
    /// Foes defeated
    pub defeats: u32,
    /// Shots fired
    pub shots_fired: u32,
    /// Foes removed
    pub removals: u32,
    /// Currency dropped
    pub currency_dropped: u32,
    /// Currency picked up by the player
    pub currency_collected: u32,
    /// Foes still alive at the end
    pub survivors: u32,
}

impl RunSummary {
    fn absorb(&mut self, report: &TickReport) {
        self.ticks = report.tick;
        self.player_hits += report.player_hits;
        self.player_blocks += report.player_blocks;
        self.actor_hits += report.actor_hits;
        self.sword_blocks += report.sword_blocks;
        self.defeats += report.defeats;
        self.shots_fired += report.shots_fired;
        self.removals += report.removals;
        self.currency_dropped += report.currency_dropped;
    }

    fn log(&self) {
        info!(
            ticks = self.ticks,
            player_hits = self.player_hits,
            player_blocks = self.player_blocks,
            actor_hits = self.actor_hits,
            sword_blocks = self.sword_blocks,
            defeats = self.defeats,
            shots = self.shots_fired,
            removals = self.removals,
            currency = self.currency_collected,
            survivors = self.survivors,
            "run summary"
        );
    }
}

/// Owns the arena, the simulation and the player for one run.
#[derive(Debug)]
pub struct Runner {
    config: EngineConfig,
    arena: Arena,
    sim: Simulation<SeededRandom>,
    player: PlayerPose,
    script: ScriptedPlayer,
    summary: RunSummary,
}

impl Runner {
    /// Sets up the arena and spawns its foes.
    pub fn new(config: EngineConfig) -> IronvaleResult<Self> {
        let rng = match config.seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_entropy(),
        };
        let mut sim = Simulation::with_rng(rng, config.tuning).with_tile_size(config.tile_size)?;
        let arena = Arena::new(config.tile_size)?;
        arena.populate(&mut sim);
        let player = arena.spawn_player(&sim);
        info!(
            seed = ?config.seed,
            ticks = config.ticks,
            foes = sim.live_actor_count(),
            "arena ready"
        );
        Ok(Self {
            config,
            arena,
            sim,
            player,
            script: ScriptedPlayer::default(),
            summary: RunSummary::default(),
        })
    }

    /// Loads `path` strictly and sets up the run it describes.
    ///
    /// Unlike [`EngineConfig::load_from`], a missing or broken file is an error.
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> IronvaleResult<Self> {
        let mut config = EngineConfig::try_load_from(path)?;
        config.validate();
        match config.resume_from.clone() {
            Some(snapshot) => Self::resume(config, snapshot),
            None => Self::new(config),
        }
    }

    /// Continues a run from a snapshot written by [`Runner::save_checkpoint`].
    ///
    /// The snapshot carries its own tuning, tile size and random state, so only
    /// the run parameters of `config` apply.
    pub fn resume<P: AsRef<Path>>(config: EngineConfig, path: P) -> IronvaleResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let (sim, player) = Simulation::<SeededRandom>::restore(&bytes)?;
        let arena = Arena::new(sim.tile_size())?;
        info!(
            path = %path.display(),
            tick = sim.current_tick(),
            foes = sim.live_actor_count(),
            "run resumed"
        );
        Ok(Self {
            config,
            arena,
            summary: RunSummary {
                ticks: sim.current_tick(),
                ..RunSummary::default()
            },
            sim,
            player,
            script: ScriptedPlayer::default(),
        })
    }

    /// Writes the simulation and player to `path`.
    pub fn save_checkpoint<P: AsRef<Path>>(&self, path: P) -> IronvaleResult<()> {
        let path = path.as_ref();
        let bytes = self.sim.snapshot(&self.player)?;
        fs::write(path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "checkpoint written");
        Ok(())
    }

    /// Replaces the player script.
    pub fn with_script(mut self, script: ScriptedPlayer) -> Self {
        self.script = script;
        self
    }

    /// Runs one tick.
    pub fn step(&mut self) -> TickReport {
        let tick = self.sim.current_tick();
        let control = self.script.control(tick, &mut self.player, &self.sim);
        let world = WorldCollision::new(self.arena.tiles(), self.sim.tile_size());
        self.player.update(&world, control);

        let report = self.sim.tick(self.arena.tiles(), &mut self.player);
        self.summary.absorb(&report);
        self.summary.currency_collected += self.sim.collect_currency(&self.player);

        for event in self.sim.drain_events() {
            debug!(?event, "game event");
        }
        report
    }

    /// Runs the configured number of ticks and returns the totals.
    pub fn run(&mut self) -> RunSummary {
        let every = self.config.log_summary_every;
        for _ in 0..self.config.ticks {
            let report = self.step();
            if every > 0 && report.tick % every == 0 && report.tick < self.config.ticks {
                self.refresh_survivors();
                self.summary.log();
            }
        }
        self.refresh_survivors();
        self.summary.log();
        self.summary
    }

    fn refresh_survivors(&mut self) {
        self.summary.survivors = u32::try_from(self.sim.live_actor_count()).unwrap_or(u32::MAX);
    }

    /// Totals so far.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// The simulation.
    #[must_use]
    pub fn simulation(&self) -> &Simulation<SeededRandom> {
        &self.sim
    }

    /// The player.
    #[must_use]
    pub fn player(&self) -> &PlayerPose {
        &self.player
    }

    /// Run parameters.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
