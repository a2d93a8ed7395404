//! One game session: the single place where components are constructed and
//! handed to each other.

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use scrapyard_core::{ItemId, SessionId};
use scrapyard_crafting::{CraftError, Crafted, Crafter, ItemCatalog};
use scrapyard_events::{Event, EventBus};
use scrapyard_inventory::{Inventory, InventoryError};

use crate::config::SessionConfig;
use crate::data::GameData;
use crate::hud::Hud;
use crate::pickup::{PickupError, PickupField};
use crate::weapon::{Shot, WeaponController, WeaponSettings};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Pickup(#[from] PickupError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

/// Owns the inventory (shared with the resolver through a weak reference),
/// the resolver, and the collaborators that call into them.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    catalog: ItemCatalog,
    inventory: Rc<RefCell<Inventory>>,
    crafter: Crafter,
    field: PickupField,
    weapon: WeaponController,
    hud: Hud,
    clock: Duration,
}

impl GameSession {
    pub fn new(config: &SessionConfig, data: GameData) -> Self {
        Self::with_id(SessionId::new(), config, data)
    }

    pub fn with_id(id: SessionId, config: &SessionConfig, data: GameData) -> Self {
        let GameData {
            catalog,
            recipes,
            pickups,
        } = data;

        let inventory = Rc::new(RefCell::new(Inventory::new()));
        let mut crafter = Crafter::new(recipes, &inventory);

        // Structured trace of every notification, tagged with the session.
        inventory.borrow_mut().events_mut().subscribe(move |event| {
            debug!(session = %id, event = event.event_type(), ?event, "inventory notification");
        });
        crafter.events_mut().subscribe(move |event| {
            debug!(session = %id, event = event.event_type(), message = event.message(), "crafting notification");
        });

        let hud = Hud::attach(&mut inventory.borrow_mut(), &mut crafter, config.message_duration);
        let weapon = WeaponController::new(WeaponSettings {
            fire_rate: config.fire_rate,
            ..WeaponSettings::default()
        });

        info!(
            session = %id,
            recipes = crafter.recipes().len(),
            pickups = pickups.len(),
            "session started"
        );

        Self {
            id,
            catalog,
            inventory,
            crafter,
            field: PickupField::new(pickups),
            weapon,
            hud,
            clock: Duration::ZERO,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Player touched the field pickup `name`.
    pub fn collect_pickup(&mut self, name: &str) -> Result<ItemId, SessionError> {
        let item = self
            .field
            .collect(name, &mut self.inventory.borrow_mut())?;
        Ok(item)
    }

    /// An item picked up from anywhere other than the placed field.
    pub fn receive_item(&mut self, item: impl Into<ItemId>, amount: u32) -> Result<u32, SessionError> {
        Ok(self.inventory.borrow_mut().add(item, amount)?)
    }

    /// Craft request (one per key press).
    pub fn craft(&mut self) -> Result<Crafted, CraftError> {
        self.crafter.try_craft()
    }

    /// Fire request at the current session time.
    pub fn fire(&mut self) -> Option<Shot> {
        self.weapon
            .try_fire(&self.inventory.borrow(), &self.catalog, self.clock)
    }

    /// End of a frame: advance time and let the HUD catch up.
    pub fn tick(&mut self, dt: Duration) {
        self.clock += dt;
        self.hud.update(&self.inventory.borrow(), dt);
    }

    pub fn inventory(&self) -> Ref<'_, Inventory> {
        self.inventory.borrow()
    }

    pub fn crafter(&self) -> &Crafter {
        &self.crafter
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn field(&self) -> &PickupField {
        &self.field
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Tear down: the HUD unsubscribes before the components go away.
    pub fn end(mut self) {
        let hud = self.hud;
        hud.detach(&mut self.inventory.borrow_mut(), &mut self.crafter);
        info!(session = %self.id, elapsed = ?self.clock, "session ended");
    }
}
