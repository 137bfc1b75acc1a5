//! ID types for simulated actors.

use serde::{Deserialize, Serialize};

/// Unique identifier for an actor inside one simulation.
///
/// Ids are handed out by the owning simulation's [`ActorIdAllocator`] rather than a
/// process-wide counter, so two runs from the same seed assign the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates an actor ID from a raw value (for deserialization and tests).
    #[must_use]
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Reserved ID for the player pose.
    pub const PLAYER: Self = Self(u32::MAX);
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if *self == Self::PLAYER {
            write!(f, "player")
        } else {
            write!(f, "actor#{}", self.0)
        }
    }
}

/// Sequential allocator for [`ActorId`]s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorIdAllocator {
    next: u32,
}

impl Default for ActorIdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl ActorIdAllocator {
    /// Returns the next unused id.
    pub fn allocate(&mut self) -> ActorId {
        let id = ActorId(self.next);
        self.next = self.next.wrapping_add(1).max(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_display() {
        assert_eq!(ActorId::PLAYER.to_string(), "player");
        assert_eq!(ActorId::from_raw(7).to_string(), "actor#7");
    }

    #[test]
    fn test_allocator_is_sequential() {
        let mut ids = ActorIdAllocator::default();
        assert_eq!(ids.allocate().raw(), 1);
        assert_eq!(ids.allocate().raw(), 2);
        assert_eq!(ids.allocate().raw(), 3);
    }
}
