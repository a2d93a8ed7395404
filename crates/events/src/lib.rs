//! Notification plumbing shared by the inventory and crafting components.
//!
//! Components own an [`InMemoryEventBus`] and publish their events into it;
//! collaborators (HUD, loggers, tests) subscribe either with a callback or
//! with a queue they drain at their own pace.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription, SubscriptionId};
pub use event::Event;
pub use in_memory_bus::InMemoryEventBus;
