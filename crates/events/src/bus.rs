//! Notification channel for committed ledger events.
//!
//! Delivery is best-effort. A failed publish never fails the ledger operation
//! that produced the event, nothing is persisted, and consumers must tolerate
//! missed notices. The ledger store stays the source of truth.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};

use tokenledger_core::PrincipalId;

use crate::event::Event;

/// Receiving end handed out by [`EventBus::subscribe`].
///
/// Sees every message published after it was created.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    pub fn try_recv(&self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Everything queued so far, oldest first.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

impl<M: Event> Subscription<M> {
    /// Queued events that concern `principal`; the rest are discarded.
    pub fn drain_for(&self, principal: PrincipalId) -> Vec<M> {
        self.receiver
            .try_iter()
            .filter(|event| event.concerns(principal))
            .collect()
    }
}

/// Where the ledger sends committed events.
///
/// `Error` only needs `Debug`: the ledger logs a failed publish and moves on.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
