//! Static item definitions (what each item is, how it is shown).

use serde::{Deserialize, Serialize};

use scrapyard_core::{ItemId, ValueObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Gathered from the field, consumed by recipes.
    Material,
    /// Crafted; holding one arms the player.
    Weapon,
}

impl Default for ItemKind {
    fn default() -> Self {
        ItemKind::Material
    }
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Material => "material",
            ItemKind::Weapon => "weapon",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDef {
    pub name: ItemId,
    pub kind: ItemKind,
    pub description: String,
    /// RGB, each channel in `0.0..=1.0`.
    pub color: [f32; 3],
    /// Glyph shown on the field pickup; the name when not set.
    pub display_char: String,
}

impl ValueObject for ItemDef {}

impl ItemDef {
    pub fn new(
        name: impl Into<ItemId>,
        kind: ItemKind,
        description: impl Into<String>,
        color: [f32; 3],
    ) -> Self {
        let name = name.into();
        Self {
            display_char: name.to_string(),
            name,
            kind,
            description: description.into(),
            color,
        }
    }

    pub fn with_display_char(mut self, display_char: impl Into<String>) -> Self {
        let display_char = display_char.into();
        if !display_char.is_empty() {
            self.display_char = display_char;
        }
        self
    }
}

/// Lookup table of every known item, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemCatalog {
    items: Vec<ItemDef>,
}

impl ItemCatalog {
    pub fn new(items: Vec<ItemDef>) -> Self {
        Self { items }
    }

    pub fn builtin() -> Self {
        Self::new(vec![
            ItemDef::new(
                "Scrap Metal",
                ItemKind::Material,
                "A rusty piece of metal. Might come in handy.",
                [0.6, 0.6, 0.6],
            ),
            ItemDef::new(
                "Gunpowder",
                ItemKind::Material,
                "Black powder. Handle with care.",
                [0.3, 0.3, 0.3],
            ),
            ItemDef::new(
                "Handgun",
                ItemKind::Weapon,
                "A basic pistol. Works on zombies.",
                [0.8, 0.5, 0.1],
            ),
            ItemDef::new("Wood", ItemKind::Material, "A sturdy plank.", [0.6, 0.4, 0.2]),
            ItemDef::new("Nail", ItemKind::Material, "A sharp iron nail.", [0.7, 0.7, 0.7]),
            ItemDef::new(
                "Nail Bat",
                ItemKind::Weapon,
                "A bat with nails driven through it. Melee weapon.",
                [0.5, 0.3, 0.1],
            ),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&ItemDef> {
        self.items.iter().find(|item| item.name.as_str() == name)
    }

    pub fn is_weapon(&self, name: &str) -> bool {
        self.get(name)
            .is_some_and(|item| item.kind == ItemKind::Weapon)
    }

    pub fn weapons(&self) -> impl Iterator<Item = &ItemDef> {
        self.items
            .iter()
            .filter(|item| item.kind == ItemKind::Weapon)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemDef> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
