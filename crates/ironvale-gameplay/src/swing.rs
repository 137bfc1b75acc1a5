//! Sword swing timeline.
//!
//! Both the player and the Duelist swing the same way: a windup that telegraphs
//! the blow, a stab during which the blade can hit, and a recover. Phase
//! lengths are whole frames and a swing is addressed by frames elapsed since it
//! started.

use serde::{Deserialize, Serialize};

// ============================================================================
// Swing Phases
// ============================================================================

/// Segment of a swing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwingPhase {
    /// Blade drawn back.
    Windup,
    /// Blade extended; the only phase with an offensive hitbox.
    Stab,
    /// Blade easing back to the body.
    Recover,
}

impl SwingPhase {
    /// Check if the blade can deal damage in this phase.
    #[must_use]
    pub fn can_damage(self) -> bool {
        self == Self::Stab
    }
}

// ============================================================================
// Swing Timing
// ============================================================================

/// Frame counts for each phase of a swing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwingTiming {
    /// Windup frames.
    pub windup: u32,
    /// Stab frames.
    pub stab: u32,
    /// Recover frames.
    pub recover: u32,
}

impl SwingTiming {
    /// Create new swing timing.
    #[must_use]
    pub const fn new(windup: u32, stab: u32, recover: u32) -> Self {
        Self {
            windup,
            stab,
            recover,
        }
    }

    /// Total swing length in frames.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.windup + self.stab + self.recover
    }

    /// Phase at `elapsed` frames into the swing, or `None` once it is over.
    #[must_use]
    pub fn phase_at(&self, elapsed: u32) -> Option<SwingPhase> {
        if elapsed < self.windup {
            Some(SwingPhase::Windup)
        } else if elapsed < self.windup + self.stab {
            Some(SwingPhase::Stab)
        } else if elapsed < self.total() {
            Some(SwingPhase::Recover)
        } else {
            None
        }
    }

    /// Fraction of the current phase completed, in `[0, 1]`.
    ///
    /// Zero-length phases report `1.0`.
    #[must_use]
    pub fn phase_progress(&self, elapsed: u32) -> f32 {
        let (start, len) = match self.phase_at(elapsed) {
            Some(SwingPhase::Windup) => (0, self.windup),
            Some(SwingPhase::Stab) => (self.windup, self.stab),
            Some(SwingPhase::Recover) => (self.windup + self.stab, self.recover),
            None => return 1.0,
        };
        if len == 0 {
            return 1.0;
        }
        ((elapsed - start) as f32 / len as f32).min(1.0)
    }
}
