use serde::Serialize;

use scrapyard_core::{DomainError, DomainResult, ItemId, ValueObject};
use scrapyard_inventory::Inventory;

/// One side of a recipe: an item and how many units it consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub item: ItemId,
    pub quantity: u32,
}

impl ValueObject for Ingredient {}

impl Ingredient {
    fn is_held_by(&self, inventory: &Inventory) -> bool {
        inventory.has(self.item.as_str(), self.quantity)
    }
}

/// Two ingredients in, one unit of `result` out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipe {
    first: Ingredient,
    second: Ingredient,
    result: ItemId,
}

impl ValueObject for Recipe {}

impl Recipe {
    /// Build a validated recipe.
    ///
    /// Quantities must be at least 1, names non-blank, and the two
    /// ingredients distinct (a matched recipe must always be consumable).
    pub fn new(
        first: impl Into<ItemId>,
        first_quantity: u32,
        second: impl Into<ItemId>,
        second_quantity: u32,
        result: impl Into<ItemId>,
    ) -> DomainResult<Self> {
        let first = ItemId::parse(first.into().as_str())?;
        let second = ItemId::parse(second.into().as_str())?;
        let result = ItemId::parse(result.into().as_str())?;

        if first_quantity == 0 || second_quantity == 0 {
            return Err(DomainError::validation(format!(
                "recipe for {result}: ingredient quantities must be at least 1"
            )));
        }
        if first == second {
            return Err(DomainError::validation(format!(
                "recipe for {result}: ingredients must be two different items, got {first} twice"
            )));
        }

        Ok(Self {
            first: Ingredient {
                item: first,
                quantity: first_quantity,
            },
            second: Ingredient {
                item: second,
                quantity: second_quantity,
            },
            result,
        })
    }

    pub fn first(&self) -> &Ingredient {
        &self.first
    }

    pub fn second(&self) -> &Ingredient {
        &self.second
    }

    pub fn result(&self) -> &ItemId {
        &self.result
    }

    /// Both ingredients are held in the required quantities.
    pub fn is_satisfied_by(&self, inventory: &Inventory) -> bool {
        self.first.is_held_by(inventory) && self.second.is_held_by(inventory)
    }

    /// Human-readable line, e.g. `Wood x1 + Nail x1 → Nail Bat`.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl core::fmt::Display for Recipe {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} x{} + {} x{} → {}",
            self.first.item, self.first.quantity, self.second.item, self.second.quantity, self.result
        )
    }
}

/// Fixed, ordered recipe list. Order is significant: the first satisfiable
/// recipe wins, so lookups are a linear scan in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

impl RecipeBook {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// The prototype's recipes: a handgun from scrap and gunpowder, a nail
    /// bat from wood and a nail.
    pub fn builtin() -> Self {
        let table = [
            ("Scrap Metal", 1, "Gunpowder", 1, "Handgun"),
            ("Wood", 1, "Nail", 1, "Nail Bat"),
        ];
        Self {
            recipes: table
                .into_iter()
                .filter_map(|(a, qa, b, qb, out)| Recipe::new(a, qa, b, qb, out).ok())
                .collect(),
        }
    }

    /// First recipe (in declaration order) that `inventory` can pay for.
    pub fn first_satisfied(&self, inventory: &Inventory) -> Option<(usize, &Recipe)> {
        self.recipes
            .iter()
            .enumerate()
            .find(|(_, recipe)| recipe.is_satisfied_by(inventory))
    }

    pub fn get(&self, index: usize) -> Option<&Recipe> {
        self.recipes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl FromIterator<Recipe> for RecipeBook {
    fn from_iter<I: IntoIterator<Item = Recipe>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
