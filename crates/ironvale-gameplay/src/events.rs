//! Event bus for outbound notifications.
//!
//! The simulation publishes what happened each tick; rendering, audio, and the
//! economy drain it. The bus is bounded and never blocks: when it is full new
//! events are dropped.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use tracing::trace;

use ironvale_common::ActorId;

use crate::actor::ActorKind;
use crate::combat::CombatEvent;
use crate::lifecycle::Despawn;

/// Event types that can be sent through the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Actor added to the roster
    ActorSpawned {
        /// Tick it was added before
        tick: u64,
        /// New actor
        actor: ActorId,
        /// Its kind
        kind: ActorKind,
    },
    /// Combat resolution outcome
    Combat {
        /// Tick it happened on
        tick: u64,
        /// What happened
        event: CombatEvent,
    },
    /// A shot was fired
    ProjectileLaunched {
        /// Tick it happened on
        tick: u64,
        /// Shooter
        owner: ActorId,
    },
    /// An actor finished dying and was removed
    ActorRemoved {
        /// Tick it happened on
        tick: u64,
        /// Removal record, including any currency dropped
        despawn: Despawn,
    },
}

/// Event bus for broadcasting events to subscribers.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<GameEvent>,
    /// Receiver for collecting events
    receiver: Receiver<GameEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl Clone for EventBus {
    /// A clone is a fresh, empty bus of the same capacity.
    fn clone(&self) -> Self {
        Self::new(self.capacity)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));
        Self {
            sender,
            receiver,
            capacity: capacity.max(1),
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: GameEvent) {
        if let Err(err) = self.sender.try_send(event) {
            trace!(event = ?err.into_inner(), "event bus full, dropping");
        }
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<GameEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
