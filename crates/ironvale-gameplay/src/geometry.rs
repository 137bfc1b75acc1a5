//! Axis-aligned boxes and tagged hitboxes.
//!
//! World space is in pixels with y growing downward. Boxes are built from a
//! top-left corner plus size, matching how actors store their bodies.

use ironvale_common::ActorId;
use serde::{Deserialize, Serialize};

/// 2D vector in world pixels (or pixels per tick for velocities).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// Zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a new Vec2.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box for collision detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AABB {
    /// Minimum X coordinate
    pub min_x: f32,
    /// Minimum Y coordinate
    pub min_y: f32,
    /// Maximum X coordinate
    pub max_x: f32,
    /// Maximum Y coordinate
    pub max_y: f32,
}

impl AABB {
    /// Creates a new AABB.
    #[must_use]
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates an AABB from a top-left corner and a size.
    #[must_use]
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + width,
            max_y: y + height,
        }
    }

    /// Returns the center of the AABB.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the AABB.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the AABB.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Checks if this AABB overlaps with another.
    ///
    /// Touching edges do not count as overlap.
    #[must_use]
    pub fn overlaps(&self, other: &AABB) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Returns the AABB translated by a vector.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }
}

/// What a hitbox does when it touches another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitboxRole {
    /// Deals damage (sword stab, projectile).
    Offensive,
    /// Blocks offensive boxes.
    Shield,
    /// Receives damage and contact.
    Body,
}

/// A box tagged with its owner and role. Lives for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    /// Owning actor (or [`ActorId::PLAYER`]).
    pub owner: ActorId,
    /// Role of the box.
    pub role: HitboxRole,
    /// Geometry.
    pub aabb: AABB,
}

impl Hitbox {
    /// Creates a tagged hitbox.
    #[must_use]
    pub const fn new(owner: ActorId, role: HitboxRole, aabb: AABB) -> Self {
        Self { owner, role, aabb }
    }

    /// Checks whether two hitboxes overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.aabb.overlaps(&other.aabb)
    }

    /// Overlap test against an optional box; `None` never overlaps.
    #[must_use]
    pub fn overlaps_opt(&self, other: Option<&Hitbox>) -> bool {
        other.is_some_and(|o| self.overlaps(o))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_rect() {
        let aabb = AABB::from_rect(5.0, 0.0, 10.0, 20.0);
        assert_eq!(aabb.min_x, 5.0);
        assert_eq!(aabb.max_x, 15.0);
        assert_eq!(aabb.width(), 10.0);
        assert_eq!(aabb.height(), 20.0);
        assert_eq!(aabb.center(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_aabb_overlaps() {
        let a = AABB::new(0.0, 0.0, 10.0, 10.0);
        let b = AABB::new(5.0, 5.0, 15.0, 15.0);
        let c = AABB::new(20.0, 20.0, 30.0, 30.0);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = AABB::from_rect(0.0, 0.0, 16.0, 16.0);
        let b = AABB::from_rect(16.0, 0.0, 16.0, 16.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_aabb_translated() {
        let aabb = AABB::new(0.0, 0.0, 10.0, 10.0);
        let translated = aabb.translated(Vec2::new(5.0, -5.0));
        assert_eq!(translated, AABB::new(5.0, -5.0, 15.0, 5.0));
    }

    #[test]
    fn test_missing_hitbox_never_overlaps() {
        let body = Hitbox::new(
            ActorId::PLAYER,
            HitboxRole::Body,
            AABB::from_rect(0.0, 0.0, 16.0, 32.0),
        );
        assert!(!body.overlaps_opt(None));
        assert!(body.overlaps_opt(Some(&body)));
    }
}
