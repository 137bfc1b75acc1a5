//! Transient effects: particle bursts and currency pickups.
//!
//! The manager owns both collections outright. Nothing else holds references
//! into them; outer layers read them for drawing and drain pickups through
//! [`EffectsManager::collect_pickups`]. Both collections have a fixed ceiling
//! and evict their oldest entry when full, so per-tick cost stays bounded.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::geometry::{Vec2, AABB};
use crate::rng::RandomSource;
use crate::tuning::EffectsTuning;

/// A short-lived spark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Position.
    pub position: Vec2,
    /// Velocity.
    pub velocity: Vec2,
    /// Frames left.
    pub life: u32,
}

/// A currency drop that pops up, falls back to its rest line and waits to be
/// collected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    /// Top-left corner.
    pub position: Vec2,
    /// Vertical velocity.
    pub velocity_y: f32,
    /// Y at which it comes to rest.
    pub rest_y: f32,
    /// Edge length.
    pub size: f32,
    /// Frames left before it vanishes uncollected.
    pub life: u32,
    /// Currency value.
    pub value: u32,
}

impl Pickup {
    /// Current box.
    #[must_use]
    pub fn aabb(&self) -> AABB {
        AABB::from_rect(self.position.x, self.position.y, self.size, self.size)
    }
}

/// Owner of every particle and pickup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectsManager {
    tuning: EffectsTuning,
    particles: VecDeque<Particle>,
    pickups: VecDeque<Pickup>,
}

impl Default for EffectsManager {
    fn default() -> Self {
        Self::new(EffectsTuning::default())
    }
}

impl EffectsManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new(tuning: EffectsTuning) -> Self {
        Self {
            tuning,
            particles: VecDeque::new(),
            pickups: VecDeque::new(),
        }
    }

    /// Live particles, oldest first.
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Live pickups, oldest first.
    pub fn pickups(&self) -> impl Iterator<Item = &Pickup> {
        self.pickups.iter()
    }

    /// Number of live particles.
    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Number of live pickups.
    #[must_use]
    pub fn pickup_count(&self) -> usize {
        self.pickups.len()
    }

    /// Fans `count` particles out evenly around `(x, y)`.
    ///
    /// Each particle's speed is the base burst speed plus `rand * spread`.
    pub fn spawn_burst(
        &mut self,
        x: f32,
        y: f32,
        count: u32,
        spread: f32,
        rng: &mut dyn RandomSource,
    ) {
        if count == 0 {
            return;
        }
        let mut evicted = 0;
        for i in 0..count {
            let angle = std::f32::consts::TAU * i as f32 / count as f32;
            let base = self.tuning.burst_speed;
            let speed = rng.next_range(base, base + spread);
            let particle = Particle {
                position: Vec2::new(x, y),
                velocity: Vec2::new(
                    angle.cos() * speed,
                    angle.sin() * speed * self.tuning.burst_squash + self.tuning.burst_lift,
                ),
                life: self.tuning.particle_life,
            };
            if self.particles.len() >= self.tuning.max_particles {
                self.particles.pop_front();
                evicted += 1;
            }
            if self.tuning.max_particles > 0 {
                self.particles.push_back(particle);
            }
        }
        if evicted > 0 {
            warn!(evicted, ceiling = self.tuning.max_particles, "particle ceiling reached");
        }
    }

    /// Standard defeat burst at `center`.
    pub fn spawn_defeat_burst(&mut self, center: Vec2, rng: &mut dyn RandomSource) {
        self.spawn_burst(
            center.x,
            center.y,
            self.tuning.burst_count,
            self.tuning.burst_spread,
            rng,
        );
    }

    /// Drops one currency pickup from a defeated actor's box.
    ///
    /// It pops up from the box's horizontal center and settles with its bottom
    /// on the box's bottom edge. Returns the pickup's value.
    pub fn spawn_currency_pickup(&mut self, bounds: &AABB) -> u32 {
        let size = self.tuning.pickup_size;
        let rest_y = bounds.max_y - size;
        let pickup = Pickup {
            position: Vec2::new(bounds.center().x - size / 2.0, rest_y),
            velocity_y: self.tuning.pickup_pop,
            rest_y,
            size,
            life: self.tuning.pickup_life,
            value: self.tuning.pickup_value,
        };
        if self.pickups.len() >= self.tuning.max_pickups {
            self.pickups.pop_front();
            warn!(ceiling = self.tuning.max_pickups, "pickup ceiling reached");
        }
        if self.tuning.max_pickups > 0 {
            self.pickups.push_back(pickup);
        }
        pickup.value
    }

    /// Ages everything one tick and culls what has run out.
    pub fn age(&mut self) {
        let gravity = self.tuning.particle_gravity;
        for p in &mut self.particles {
            p.position.x += p.velocity.x;
            p.position.y += p.velocity.y;
            p.velocity.y += gravity;
            p.life = p.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);

        let gravity = self.tuning.pickup_gravity;
        for c in &mut self.pickups {
            if c.position.y < c.rest_y || c.velocity_y < 0.0 {
                c.velocity_y += gravity;
                c.position.y += c.velocity_y;
                if c.position.y >= c.rest_y {
                    c.position.y = c.rest_y;
                    c.velocity_y = 0.0;
                }
            }
            c.life = c.life.saturating_sub(1);
        }
        self.pickups.retain(|c| c.life > 0);
    }

    /// Removes every pickup overlapping `collector` and returns their total
    /// value.
    pub fn collect_pickups(&mut self, collector: &AABB) -> u32 {
        let mut total = 0;
        self.pickups.retain(|c| {
            if c.aabb().overlaps(collector) {
                total += c.value;
                false
            } else {
                true
            }
        });
        total
    }
}
