//! Headless HUD model.
//!
//! The HUD forwards both components' notifications into one queue and turns
//! what it hears into text blocks. It reads the inventory when re-rendering
//! but never mutates it.

use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use scrapyard_crafting::{CraftEvent, Crafter};
use scrapyard_events::{EventBus, SubscriptionId};
use scrapyard_inventory::{Inventory, InventoryEvent};

pub const CONTROLS_TEXT: &str = "--- Controls ---\n\
WASD : move\n\
Mouse : aim\n\
Left click : fire\n\
C : craft";

const RECIPES_HEADER: &str = "--- Recipes ---";
const INVENTORY_HEADER: &str = "--- Inventory ---";

/// One queued notification, from either component.
#[derive(Debug, Clone)]
enum HudEvent {
    Inventory(InventoryEvent),
    Craft(CraftEvent),
}

#[derive(Debug)]
pub struct Hud {
    events: Receiver<HudEvent>,
    inventory_subscription: SubscriptionId,
    craft_subscription: SubscriptionId,
    recipe_text: String,
    inventory_text: String,
    message: Option<String>,
    message_remaining: Duration,
    message_duration: Duration,
    messages_shown: u64,
}

impl Hud {
    /// Subscribe to both components and render the initial state.
    pub fn attach(inventory: &mut Inventory, crafter: &mut Crafter, message_duration: Duration) -> Self {
        let recipe_text = std::iter::once(RECIPES_HEADER.to_string())
            .chain(crafter.list_available_recipes())
            .collect::<Vec<_>>()
            .join("\n");

        let (tx, events) = mpsc::channel();
        let inventory_subscription = inventory
            .events_mut()
            .forward(tx.clone(), |event: &InventoryEvent| HudEvent::Inventory(event.clone()));
        let craft_subscription = crafter
            .events_mut()
            .forward(tx, |event: &CraftEvent| HudEvent::Craft(event.clone()));

        Self {
            events,
            inventory_subscription,
            craft_subscription,
            recipe_text,
            inventory_text: render_inventory(inventory),
            message: None,
            message_remaining: Duration::ZERO,
            message_duration,
            messages_shown: 0,
        }
    }

    /// Unsubscribe from both components.
    pub fn detach(self, inventory: &mut Inventory, crafter: &mut Crafter) {
        inventory.events_mut().unsubscribe(self.inventory_subscription);
        crafter.events_mut().unsubscribe(self.craft_subscription);
    }

    /// Advance the message timer by `dt`, then apply queued notifications in
    /// the order they were published; the last message raised wins.
    pub fn update(&mut self, inventory: &Inventory, dt: Duration) {
        if self.message.is_some() {
            self.message_remaining = self.message_remaining.saturating_sub(dt);
            if self.message_remaining.is_zero() {
                self.message = None;
            }
        }

        let pending: Vec<_> = self.events.try_iter().collect();

        let mut changed = false;
        for event in pending {
            match event {
                HudEvent::Inventory(InventoryEvent::ItemPickedUp { item, .. }) => {
                    self.show_message(format!("Picked up \"{item}\"!"));
                }
                HudEvent::Inventory(InventoryEvent::Changed) => changed = true,
                HudEvent::Craft(event) => self.show_message(event.message().to_string()),
            }
        }
        if changed {
            self.inventory_text = render_inventory(inventory);
        }
    }

    fn show_message(&mut self, message: String) {
        self.message = Some(message);
        self.message_remaining = self.message_duration;
        self.messages_shown += 1;
    }

    pub fn controls_text(&self) -> &'static str {
        CONTROLS_TEXT
    }

    pub fn recipe_text(&self) -> &str {
        &self.recipe_text
    }

    pub fn inventory_text(&self) -> &str {
        &self.inventory_text
    }

    /// How many messages have been raised so far; lets a caller tell a
    /// repeated message from one that is still showing.
    pub fn messages_shown(&self) -> u64 {
        self.messages_shown
    }

    /// Current transient message, if one is still showing.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

fn render_inventory(inventory: &Inventory) -> String {
    let mut text = String::from(INVENTORY_HEADER);
    if inventory.is_empty() {
        text.push_str("\n(empty)");
    } else {
        for (item, count) in inventory.iter() {
            text.push_str(&format!("\n{item} x{count}"));
        }
    }
    text
}
