//! In-process event bus.

use std::sync::mpsc;

use tracing::trace;

use crate::bus::{EventBus, Subscription, SubscriptionId};

enum Sink<M> {
    Callback(Box<dyn FnMut(&M)>),
    /// Returns `false` once the receiving end is gone.
    Queue(Box<dyn FnMut(&M) -> bool>),
}

/// In-memory pub/sub bus.
///
/// - No IO / no async
/// - Fan-out in subscription order
/// - Dead queue subscribers are dropped while publishing
pub struct InMemoryEventBus<M> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Sink<M>)>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> SubscriptionId {
        self.next_id += 1;
        SubscriptionId(self.next_id)
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }
}

impl<M> core::fmt::Debug for InMemoryEventBus<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryEventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + 'static,
{
    fn publish(&mut self, message: M) {
        // Drop any dead subscribers while publishing.
        self.subscribers.retain_mut(|(id, sink)| match sink {
            Sink::Callback(handler) => {
                handler(&message);
                true
            }
            Sink::Queue(send) => {
                let alive = send(&message);
                if !alive {
                    trace!(subscription = id.0, "pruning dropped queue subscriber");
                }
                alive
            }
        });
    }

    fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&M) + 'static,
    {
        let id = self.allocate_id();
        self.subscribers.push((id, Sink::Callback(Box::new(handler))));
        id
    }

    fn subscribe_queue(&mut self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();
        let id = self.forward(tx, M::clone);
        Subscription::new(id, rx)
    }

    fn forward<N, F>(&mut self, sender: mpsc::Sender<N>, map: F) -> SubscriptionId
    where
        N: 'static,
        F: Fn(&M) -> N + 'static,
    {
        let id = self.allocate_id();
        let send = move |message: &M| sender.send(map(message)).is_ok();
        self.subscribers.push((id, Sink::Queue(Box::new(send))));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
