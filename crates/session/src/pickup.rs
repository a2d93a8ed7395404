//! Field pickups: placed items that go into the inventory on contact.

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use scrapyard_core::ItemId;
use scrapyard_inventory::{Inventory, InventoryError};

/// Where a pickup sits and what it gives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickupSpec {
    pub name: String,
    pub item: ItemId,
    /// World position `[x, y, z]`; carried for the presentation layer.
    pub position: [f32; 3],
}

impl PickupSpec {
    pub fn new(name: impl Into<String>, item: impl Into<ItemId>, position: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            item: item.into(),
            position,
        }
    }

    /// The prototype scene's scattered materials.
    pub fn builtin_field() -> Vec<Self> {
        vec![
            Self::new("Pickup_ScrapMetal_1", "Scrap Metal", [5.0, 0.5, 5.0]),
            Self::new("Pickup_ScrapMetal_2", "Scrap Metal", [-8.0, 0.5, 3.0]),
            Self::new("Pickup_Gunpowder_1", "Gunpowder", [-5.0, 0.5, 8.0]),
            Self::new("Pickup_Gunpowder_2", "Gunpowder", [7.0, 0.5, -6.0]),
            Self::new("Pickup_Wood_1", "Wood", [-3.0, 0.5, -7.0]),
            Self::new("Pickup_Nail_1", "Nail", [10.0, 0.5, -2.0]),
        ]
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PickupError {
    #[error("no pickup named `{0}` is left in the field")]
    NotInField(String),

    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

/// Pickups still lying in the world.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickupField {
    remaining: Vec<PickupSpec>,
}

impl PickupField {
    pub fn new(pickups: Vec<PickupSpec>) -> Self {
        Self { remaining: pickups }
    }

    /// Player touched the pickup `name`: one unit of its item goes into the
    /// inventory and the pickup leaves the field.
    pub fn collect(&mut self, name: &str, inventory: &mut Inventory) -> Result<ItemId, PickupError> {
        let index = self
            .remaining
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| PickupError::NotInField(name.to_string()))?;

        inventory.add(self.remaining[index].item.clone(), 1)?;
        let pickup = self.remaining.remove(index);
        info!(pickup = %pickup.name, item = %pickup.item, "pickup collected");
        Ok(pickup.item)
    }

    pub fn get(&self, name: &str) -> Option<&PickupSpec> {
        self.remaining.iter().find(|p| p.name == name)
    }

    pub fn remaining(&self) -> impl Iterator<Item = &PickupSpec> {
        self.remaining.iter()
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}
