//! Event publishing/subscription abstraction (mechanics only).
//!
//! This module provides the **observer pattern** used between the game core
//! and its collaborators: a component publishes, any number of subscribers
//! receive.
//!
//! ## Delivery Guarantees
//!
//! - **Synchronous**: `publish` returns only after every subscriber has been
//!   handed the message (callbacks have run, queues have been fed).
//! - **Ordered**: subscribers are served in subscription order, and each
//!   subscriber sees messages in publish order.
//! - **Same thread**: there is no background dispatch.
//!
//! ## Callback vs Queue
//!
//! A callback subscriber runs inside `publish`, so it only gets the event
//! value and must not reach back into the publishing component. A queue
//! subscriber gets a [`Subscription`] and drains it later, when it is free to
//! query the component.
//!
//! Several buses can feed one channel through [`EventBus::forward`]. The
//! receiver then sees every message in the order it was published, across
//! all of them (the HUD relies on this to show the latest notification).

use std::sync::mpsc::{Receiver, Sender, TryRecvError};

/// Handle identifying one subscriber of a bus.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

/// A queued subscription to an event stream.
///
/// ## Usage Pattern
///
/// ```ignore
/// let changes = inventory.events_mut().subscribe_queue();
///
/// // once per frame:
/// for event in changes.drain() {
///     render(&event);
/// }
/// ```
///
/// Dropping the subscription unsubscribes: the bus prunes dead queues on its
/// next publish.
#[derive(Debug)]
pub struct Subscription<M> {
    id: SubscriptionId,
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(id: SubscriptionId, receiver: Receiver<M>) -> Self {
        Self { id, receiver }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Take the next pending message, if any.
    pub fn try_recv(&self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Take every pending message, oldest first, without blocking.
    pub fn drain(&self) -> impl Iterator<Item = M> + '_ {
        self.receiver.try_iter()
    }
}

/// Publish/subscribe contract implemented by component event buses.
///
/// The game runs on one thread, so the bus is owned (`&mut self`) by the
/// component that publishes into it; there is no locking and no `Send` bound.
pub trait EventBus<M> {
    /// Deliver `message` to every live subscriber, in subscription order.
    fn publish(&mut self, message: M);

    /// Register a callback invoked synchronously on each publish.
    fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&M) + 'static;

    /// Register a queue subscriber.
    fn subscribe_queue(&mut self) -> Subscription<M>;

    /// Feed `map(message)` into an existing channel on each publish. The
    /// subscriber is pruned once every receiver of `sender` is gone.
    fn forward<N, F>(&mut self, sender: Sender<N>, map: F) -> SubscriptionId
    where
        N: 'static,
        F: Fn(&M) -> N + 'static;

    /// Remove a subscriber. Returns `false` if the id is unknown (already
    /// removed, or a queue that was pruned after its receiver was dropped).
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;

    /// Number of registered subscribers (dead queues included until pruned).
    fn subscriber_count(&self) -> usize;
}
