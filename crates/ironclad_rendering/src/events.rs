//! # Visual Event Queue
//!
//! Lock-free hand-off of [`VisualEvent`]s from the simulation to the
//! renderer.
//!
//! ```text
//! ┌─────────────┐   try_send    ┌──────────────┐   drain (step 6)   ┌───────────────┐
//! │ Simulation  │ ────────────> │   bounded    │ ─────────────────> │    Scene      │
//! │ (any thread)│               │   channel    │                    │  Compositor   │
//! └─────────────┘               └──────────────┘                    └───────────────┘
//! ```
//!
//! The channel is bounded: when the renderer falls behind, new events are
//! dropped instead of growing memory. Visual events carry no game state,
//! so dropping them only costs eye candy.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::warn;

use ironclad_shared::VisualEvent;

/// Default queue capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Bounded event channel.
pub struct VisualEventQueue {
    sender: Sender<VisualEvent>,
    receiver: Receiver<VisualEvent>,
}

impl VisualEventQueue {
    /// Creates a queue holding at most `capacity` undrained events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));
        Self { sender, receiver }
    }

    /// Creates a sender handle (clone for multiple producers).
    #[must_use]
    pub fn sender(&self) -> VisualEventSender {
        VisualEventSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle.
    #[must_use]
    pub fn receiver(&self) -> VisualEventReceiver {
        VisualEventReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Creates a paired sender and receiver.
    #[must_use]
    pub fn create_pair(capacity: usize) -> (VisualEventSender, VisualEventReceiver) {
        let queue = Self::new(capacity);
        (queue.sender(), queue.receiver())
    }
}

impl Default for VisualEventQueue {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

/// Handle for sending events.
#[derive(Clone)]
pub struct VisualEventSender {
    sender: Sender<VisualEvent>,
}

impl VisualEventSender {
    /// Sends an event (non-blocking).
    ///
    /// Returns `false` if the queue is full or the renderer is gone; the
    /// event is dropped.
    #[inline]
    pub fn send(&self, event: VisualEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("visual event queue full, dropping event");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for receiving events.
#[derive(Clone)]
pub struct VisualEventReceiver {
    receiver: Receiver<VisualEvent>,
}

impl VisualEventReceiver {
    /// Moves all pending events into `out` (non-blocking).
    ///
    /// Reuses the caller's buffer so the frame loop does not allocate.
    #[inline]
    pub fn drain_into(&self, out: &mut Vec<VisualEvent>) {
        out.extend(self.receiver.try_iter());
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Checks if there are pending events.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}
