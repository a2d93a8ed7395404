//! Weapon gate: decides whether a shot happens, not how it flies.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use scrapyard_core::ItemId;
use scrapyard_crafting::ItemCatalog;
use scrapyard_inventory::Inventory;

#[derive(Debug, Clone, PartialEq)]
pub struct WeaponSettings {
    pub bullet_speed: f32,
    pub fire_rate: Duration,
    pub bullet_lifetime: Duration,
    pub bullet_scale: f32,
}

impl Default for WeaponSettings {
    fn default() -> Self {
        Self {
            bullet_speed: 25.0,
            fire_rate: Duration::from_millis(300),
            bullet_lifetime: Duration::from_secs(3),
            bullet_scale: 0.2,
        }
    }
}

/// Everything the presentation layer needs to spawn a projectile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shot {
    pub weapon: ItemId,
    pub speed: f32,
    pub lifetime: Duration,
    pub scale: f32,
}

#[derive(Debug, Clone)]
pub struct WeaponController {
    settings: WeaponSettings,
    next_fire_at: Duration,
}

impl WeaponController {
    pub fn new(settings: WeaponSettings) -> Self {
        Self {
            settings,
            next_fire_at: Duration::ZERO,
        }
    }

    /// First weapon (catalog order) the inventory holds.
    pub fn equipped<'c>(&self, inventory: &Inventory, catalog: &'c ItemCatalog) -> Option<&'c ItemId> {
        catalog
            .weapons()
            .map(|def| &def.name)
            .find(|name| inventory.has(name.as_str(), 1))
    }

    /// Fire at game time `now` if armed and the cooldown has elapsed.
    pub fn try_fire(
        &mut self,
        inventory: &Inventory,
        catalog: &ItemCatalog,
        now: Duration,
    ) -> Option<Shot> {
        if now < self.next_fire_at {
            return None;
        }
        let weapon = self.equipped(inventory, catalog)?.clone();

        self.next_fire_at = now + self.settings.fire_rate;
        debug!(%weapon, ?now, "shot fired");
        Some(Shot {
            weapon,
            speed: self.settings.bullet_speed,
            lifetime: self.settings.bullet_lifetime,
            scale: self.settings.bullet_scale,
        })
    }
}
