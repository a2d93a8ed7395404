//! Game data: item catalog, recipe book and pickup placements.
//!
//! Defines the TOML deserialization structures (Raw*) and resolves them into
//! validated domain values. Any section missing from the file keeps its
//! built-in default.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use scrapyard_core::{DomainError, ItemId};
use scrapyard_crafting::{ItemCatalog, ItemDef, ItemKind, Recipe, RecipeBook};

use crate::pickup::PickupSpec;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse game data: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid {section} entry #{index}: {source}")]
    Invalid {
        section: &'static str,
        index: usize,
        #[source]
        source: DomainError,
    },
}

// ============================================================================
// Raw TOML Structures
// ============================================================================

fn default_quantity() -> u32 {
    1
}

fn default_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

#[derive(Debug, Clone, Deserialize)]
struct RawItem {
    name: String,
    #[serde(default)]
    kind: ItemKind,
    #[serde(default)]
    description: String,
    #[serde(default = "default_color")]
    color: [f32; 3],
    display_char: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawIngredient {
    item: String,
    #[serde(default = "default_quantity")]
    quantity: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct RawRecipe {
    first: RawIngredient,
    second: RawIngredient,
    result: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RawPickup {
    name: String,
    item: String,
    #[serde(default)]
    position: [f32; 3],
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGameData {
    items: Option<Vec<RawItem>>,
    recipes: Option<Vec<RawRecipe>>,
    pickups: Option<Vec<RawPickup>>,
}

// ============================================================================
// Resolved Data
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct GameData {
    pub catalog: ItemCatalog,
    pub recipes: RecipeBook,
    pub pickups: Vec<PickupSpec>,
}

impl Default for GameData {
    fn default() -> Self {
        Self::builtin()
    }
}

impl GameData {
    pub fn builtin() -> Self {
        Self {
            catalog: ItemCatalog::builtin(),
            recipes: RecipeBook::builtin(),
            pickups: PickupSpec::builtin_field(),
        }
    }

    /// Load a data file.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let data = Self::from_toml_str(&content)?;
        info!(
            path = %path.display(),
            items = data.catalog.len(),
            recipes = data.recipes.len(),
            pickups = data.pickups.len(),
            "loaded game data"
        );
        Ok(data)
    }

    /// Parse and validate; the first invalid entry rejects the whole file.
    pub fn from_toml_str(content: &str) -> Result<Self, DataError> {
        let raw: RawGameData = toml::from_str(content)?;
        let mut data = Self::builtin();

        if let Some(items) = raw.items {
            data.catalog = resolve_items(items)?;
        }
        if let Some(recipes) = raw.recipes {
            data.recipes = resolve_recipes(recipes)?;
        }
        if let Some(pickups) = raw.pickups {
            data.pickups = resolve_pickups(pickups)?;
        }

        data.warn_unknown_items();
        Ok(data)
    }

    fn warn_unknown_items(&self) {
        for recipe in self.recipes.iter() {
            for item in [&recipe.first().item, &recipe.second().item, recipe.result()] {
                if self.catalog.get(item.as_str()).is_none() {
                    warn!(%item, recipe = %recipe, "recipe references an item missing from the catalog");
                }
            }
        }
        for pickup in &self.pickups {
            if self.catalog.get(pickup.item.as_str()).is_none() {
                warn!(item = %pickup.item, pickup = %pickup.name, "pickup holds an item missing from the catalog");
            }
        }
    }
}

fn invalid(section: &'static str, index: usize) -> impl FnOnce(DomainError) -> DataError {
    move |source| DataError::Invalid {
        section,
        index,
        source,
    }
}

fn resolve_items(raw: Vec<RawItem>) -> Result<ItemCatalog, DataError> {
    let mut items = Vec::with_capacity(raw.len());
    for (index, item) in raw.into_iter().enumerate() {
        let name = ItemId::parse(&item.name).map_err(invalid("items", index))?;
        if item.color.iter().any(|c| !(0.0f32..=1.0).contains(c)) {
            return Err(invalid("items", index)(DomainError::validation(format!(
                "{name}: colour channels must be within 0.0..=1.0"
            ))));
        }
        let def = ItemDef::new(name, item.kind, item.description, item.color)
            .with_display_char(item.display_char.unwrap_or_default());
        items.push(def);
    }
    Ok(ItemCatalog::new(items))
}

fn resolve_recipes(raw: Vec<RawRecipe>) -> Result<RecipeBook, DataError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, r)| {
            Recipe::new(
                r.first.item,
                r.first.quantity,
                r.second.item,
                r.second.quantity,
                r.result,
            )
            .map_err(invalid("recipes", index))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(RecipeBook::new)
}

fn resolve_pickups(raw: Vec<RawPickup>) -> Result<Vec<PickupSpec>, DataError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, p)| -> Result<PickupSpec, DataError> {
            let item = ItemId::parse(&p.item).map_err(invalid("pickups", index))?;
            if p.name.trim().is_empty() {
                return Err(invalid("pickups", index)(DomainError::validation(
                    "pickup name cannot be empty",
                )));
            }
            Ok(PickupSpec {
                name: p.name.trim().to_string(),
                item,
                position: p.position,
            })
        })
        .collect()
}
