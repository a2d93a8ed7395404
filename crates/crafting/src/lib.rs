//! Crafting: item catalog, ordered recipe book, and the resolver that applies
//! the first satisfiable recipe against a session's inventory.

pub mod catalog;
pub mod recipe;
pub mod resolver;

pub use catalog::{ItemCatalog, ItemDef, ItemKind};
pub use recipe::{Ingredient, Recipe, RecipeBook};
pub use resolver::{CraftError, CraftEvent, Crafted, Crafter};
