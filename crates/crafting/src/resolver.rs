//! Recipe resolver.
//!
//! On each craft request the resolver walks the recipe book in declaration
//! order, applies the first recipe the inventory can pay for (consume first
//! ingredient, consume second, add one result) and reports the outcome on its
//! event bus. The whole check-then-apply runs inside one call on the game
//! thread, so nothing else can touch the inventory in between.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use scrapyard_core::ItemId;
use scrapyard_events::{Event, EventBus, InMemoryEventBus};
use scrapyard_inventory::{Inventory, InventoryError};

use crate::recipe::RecipeBook;

/// Notification published after every craft attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CraftEvent {
    Succeeded(String),
    Failed(String),
}

impl CraftEvent {
    pub fn message(&self) -> &str {
        match self {
            CraftEvent::Succeeded(msg) | CraftEvent::Failed(msg) => msg,
        }
    }
}

impl Event for CraftEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CraftEvent::Succeeded(_) => "crafting.succeeded",
            CraftEvent::Failed(_) => "crafting.failed",
        }
    }
}

/// A completed craft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crafted {
    /// Position of the applied recipe in the book.
    pub recipe_index: usize,
    pub result: ItemId,
    /// Same text as the recipe listing line.
    pub description: String,
}

/// Why a craft attempt changed nothing. The display text is what players see.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CraftError {
    #[error("No recipe can be crafted. Gather more materials.")]
    NothingCraftable,

    #[error("Inventory not found.")]
    InventoryMissing,

    /// The inventory is already mutably borrowed, i.e. a caller tried to craft
    /// from inside an inventory notification.
    #[error("Inventory is busy.")]
    InventoryBusy,

    #[error("Inventory rejected the craft: {0}")]
    Ledger(#[from] InventoryError),
}

/// Applies recipes against one session's inventory.
///
/// Holds a weak reference: the session owns the inventory, and a resolver
/// that outlives it reports [`CraftError::InventoryMissing`].
#[derive(Debug)]
pub struct Crafter {
    book: RecipeBook,
    inventory: Weak<RefCell<Inventory>>,
    events: InMemoryEventBus<CraftEvent>,
}

impl Crafter {
    pub fn new(book: RecipeBook, inventory: &Rc<RefCell<Inventory>>) -> Self {
        Self {
            book,
            inventory: Rc::downgrade(inventory),
            events: InMemoryEventBus::new(),
        }
    }

    /// A resolver with no inventory attached; every attempt fails.
    pub fn detached(book: RecipeBook) -> Self {
        Self {
            book,
            inventory: Weak::new(),
            events: InMemoryEventBus::new(),
        }
    }

    /// Craft with the first satisfiable recipe, if any.
    ///
    /// Publishes `Succeeded` (after the inventory's own events) or `Failed`;
    /// the returned value carries the same outcome.
    pub fn try_craft(&mut self) -> Result<Crafted, CraftError> {
        let outcome = self.apply_first_match();

        match &outcome {
            Ok(crafted) => {
                info!(
                    recipe = crafted.recipe_index,
                    result = %crafted.result,
                    "crafted {}",
                    crafted.description
                );
                self.events
                    .publish(CraftEvent::Succeeded(format!("Crafted {}!", crafted.description)));
            }
            Err(err) => {
                info!(reason = %err, "craft attempt failed");
                self.events.publish(CraftEvent::Failed(err.to_string()));
            }
        }

        outcome
    }

    fn apply_first_match(&self) -> Result<Crafted, CraftError> {
        let inventory = self.inventory.upgrade().ok_or(CraftError::InventoryMissing)?;
        let mut inventory = inventory
            .try_borrow_mut()
            .map_err(|_| CraftError::InventoryBusy)?;

        let (recipe_index, recipe) = self
            .book
            .first_satisfied(&inventory)
            .ok_or(CraftError::NothingCraftable)?;

        // Refuse before consuming anything if the result cannot be stored,
        // counting what this recipe takes of the result item itself.
        let (first, second) = (recipe.first(), recipe.second());
        let taken: u32 = [first, second]
            .into_iter()
            .filter(|ingredient| ingredient.item == *recipe.result())
            .map(|ingredient| ingredient.quantity)
            .sum();
        if inventory.count(recipe.result().as_str()) - taken == u32::MAX {
            return Err(InventoryError::Overflow {
                item: recipe.result().clone(),
            }
            .into());
        }

        inventory.remove(first.item.as_str(), first.quantity)?;
        inventory.remove(second.item.as_str(), second.quantity)?;
        inventory.add(recipe.result().clone(), 1)?;

        Ok(Crafted {
            recipe_index,
            result: recipe.result().clone(),
            description: recipe.describe(),
        })
    }

    /// Every recipe line in declaration order.
    ///
    /// Lists all recipes regardless of what is currently held; use
    /// [`Crafter::craftable`] for the filtered view.
    pub fn list_available_recipes(&self) -> Vec<String> {
        self.book.iter().map(|recipe| recipe.describe()).collect()
    }

    /// Indices of recipes the inventory can pay for right now.
    pub fn craftable(&self) -> Vec<usize> {
        let Some(inventory) = self.inventory.upgrade() else {
            return Vec::new();
        };
        let Ok(inventory) = inventory.try_borrow() else {
            return Vec::new();
        };
        self.book
            .iter()
            .enumerate()
            .filter(|(_, recipe)| recipe.is_satisfied_by(&inventory))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn recipes(&self) -> &RecipeBook {
        &self.book
    }

    /// Subscription point for collaborators.
    pub fn events_mut(&mut self) -> &mut InMemoryEventBus<CraftEvent> {
        &mut self.events
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::recipe::Recipe;

    fn book(recipes: &[(&str, u32, &str, u32, &str)]) -> RecipeBook {
        recipes
            .iter()
            .map(|&(a, qa, b, qb, out)| Recipe::new(a, qa, b, qb, out).unwrap())
            .collect()
    }

    fn stocked(items: &[(&str, u32)]) -> Rc<RefCell<Inventory>> {
        let mut inventory = Inventory::new();
        for &(item, n) in items {
            inventory.add(item, n).unwrap();
        }
        Rc::new(RefCell::new(inventory))
    }

    fn recorded(crafter: &mut Crafter) -> Rc<RefCell<Vec<CraftEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        crafter
            .events_mut()
            .subscribe(move |event: &CraftEvent| sink.borrow_mut().push(event.clone()));
        log
    }

    #[test]
    fn matching_recipe_consumes_inputs_and_produces_result() {
        let inventory = stocked(&[("A", 1), ("B", 1)]);
        let mut crafter = Crafter::new(book(&[("A", 1, "B", 1, "C")]), &inventory);
        let log = recorded(&mut crafter);

        let crafted = crafter.try_craft().unwrap();
        assert_eq!(crafted.recipe_index, 0);
        assert_eq!(crafted.result, ItemId::from("C"));

        let snapshot = inventory.borrow().snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("C"), Some(&1));

        let log = log.borrow();
        assert_eq!(log.len(), 1);
        match &log[0] {
            CraftEvent::Succeeded(msg) => {
                assert!(msg.contains('A') && msg.contains('B') && msg.contains('C'));
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn insufficient_quantity_fails_without_change() {
        let inventory = stocked(&[("A", 1), ("B", 1)]);
        let mut crafter = Crafter::new(book(&[("A", 2, "B", 1, "C")]), &inventory);
        let log = recorded(&mut crafter);
        let before = inventory.borrow().snapshot();

        assert_eq!(crafter.try_craft(), Err(CraftError::NothingCraftable));
        assert_eq!(inventory.borrow().snapshot(), before);
        assert_eq!(
            *log.borrow(),
            vec![CraftEvent::Failed(
                "No recipe can be crafted. Gather more materials.".to_string()
            )]
        );
    }

    #[test]
    fn exactly_enough_for_one_craft_succeeds_once() {
        let inventory = stocked(&[("Wood", 1), ("Nail", 1)]);
        let mut crafter = Crafter::new(RecipeBook::builtin(), &inventory);

        assert!(crafter.try_craft().is_ok());
        assert_eq!(crafter.try_craft(), Err(CraftError::NothingCraftable));
        assert_eq!(inventory.borrow().count("Nail Bat"), 1);
    }

    #[test]
    fn scan_follows_declaration_order() {
        // Only the second recipe is payable: it is the one applied.
        let inventory = stocked(&[("A", 1), ("D", 1)]);
        let mut crafter = Crafter::new(
            book(&[("A", 1, "B", 1, "First"), ("A", 1, "D", 1, "Second")]),
            &inventory,
        );
        let crafted = crafter.try_craft().unwrap();
        assert_eq!(crafted.recipe_index, 1);
        assert_eq!(inventory.borrow().count("Second"), 1);
        assert_eq!(inventory.borrow().count("First"), 0);

        // Both payable: the earlier one wins even though it shares input A.
        let inventory = stocked(&[("A", 1), ("B", 1), ("D", 1)]);
        let mut crafter = Crafter::new(
            book(&[("A", 1, "D", 1, "Second"), ("A", 1, "B", 1, "First")]),
            &inventory,
        );
        crafter.try_craft().unwrap();
        let snapshot = inventory.borrow().snapshot();
        assert_eq!(snapshot.get("Second"), Some(&1));
        assert_eq!(snapshot.get("B"), Some(&1));
        assert!(!snapshot.contains_key("First"));
    }

    #[test]
    fn dropped_inventory_reports_missing() {
        let inventory = stocked(&[("A", 1), ("B", 1)]);
        let mut crafter = Crafter::new(book(&[("A", 1, "B", 1, "C")]), &inventory);
        let log = recorded(&mut crafter);
        drop(inventory);

        assert_eq!(crafter.try_craft(), Err(CraftError::InventoryMissing));
        assert_eq!(
            *log.borrow(),
            vec![CraftEvent::Failed("Inventory not found.".to_string())]
        );
        assert!(crafter.craftable().is_empty());
    }

    #[test]
    fn detached_crafter_never_crafts() {
        let mut crafter = Crafter::detached(RecipeBook::builtin());
        assert_eq!(crafter.try_craft(), Err(CraftError::InventoryMissing));
    }

    #[test]
    fn borrowed_inventory_reports_busy() {
        let inventory = stocked(&[("A", 1), ("B", 1)]);
        let mut crafter = Crafter::new(book(&[("A", 1, "B", 1, "C")]), &inventory);

        let guard = inventory.borrow_mut();
        assert_eq!(crafter.try_craft(), Err(CraftError::InventoryBusy));
        drop(guard);

        assert_eq!(inventory.borrow().count("A"), 1);
    }

    #[test]
    fn inventory_events_fire_before_craft_success() {
        let inventory = stocked(&[("A", 1), ("B", 1)]);
        let mut crafter = Crafter::new(book(&[("A", 1, "B", 1, "C")]), &inventory);

        let order = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&order);
        inventory
            .borrow_mut()
            .events_mut()
            .subscribe(move |event| sink.borrow_mut().push(event.event_type()));
        let sink = Rc::clone(&order);
        crafter
            .events_mut()
            .subscribe(move |event| sink.borrow_mut().push(event.event_type()));

        crafter.try_craft().unwrap();
        assert_eq!(
            *order.borrow(),
            vec![
                "inventory.changed",
                "inventory.changed",
                "inventory.item.picked_up",
                "inventory.changed",
                "crafting.succeeded",
            ]
        );
    }

    #[test]
    fn listing_ignores_inventory_state() {
        let crafter = Crafter::detached(RecipeBook::builtin());
        assert_eq!(
            crafter.list_available_recipes(),
            vec![
                "Scrap Metal x1 + Gunpowder x1 → Handgun".to_string(),
                "Wood x1 + Nail x1 → Nail Bat".to_string(),
            ]
        );
    }

    #[test]
    fn craftable_filters_by_current_inventory() {
        let inventory = stocked(&[("Wood", 1), ("Nail", 3)]);
        let crafter = Crafter::new(RecipeBook::builtin(), &inventory);
        assert_eq!(crafter.craftable(), vec![1]);
    }

    #[test]
    fn full_result_stack_blocks_craft_before_consuming() {
        let inventory = stocked(&[("A", 1), ("B", 1), ("C", u32::MAX)]);
        let mut crafter = Crafter::new(book(&[("A", 1, "B", 1, "C")]), &inventory);

        assert!(matches!(crafter.try_craft(), Err(CraftError::Ledger(_))));
        assert_eq!(inventory.borrow().count("A"), 1);
        assert_eq!(inventory.borrow().count("B"), 1);
    }

    #[test]
    fn result_consumed_as_ingredient_frees_its_own_room() {
        let inventory = stocked(&[("Coal", 1), ("Ore", u32::MAX)]);
        let mut crafter = Crafter::new(book(&[("Ore", 1, "Coal", 1, "Ore")]), &inventory);

        assert!(crafter.try_craft().is_ok());
        let inventory = inventory.borrow();
        assert_eq!(inventory.count("Ore"), u32::MAX);
        assert_eq!(inventory.count("Coal"), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: repeated crafting of the handgun recipe produces exactly
        /// min(scrap, gunpowder) handguns, then fails without changes.
        #[test]
        fn crafts_until_materials_run_out(scrap in 0u32..8, powder in 0u32..8) {
            let mut items = Vec::new();
            if scrap > 0 { items.push(("Scrap Metal", scrap)); }
            if powder > 0 { items.push(("Gunpowder", powder)); }
            let inventory = stocked(&items);
            let mut crafter = Crafter::new(RecipeBook::builtin(), &inventory);

            let expected = scrap.min(powder);
            for _ in 0..expected {
                prop_assert!(crafter.try_craft().is_ok());
            }
            let before = inventory.borrow().snapshot();
            prop_assert_eq!(crafter.try_craft(), Err(CraftError::NothingCraftable));
            prop_assert_eq!(inventory.borrow().snapshot(), before);

            let inventory = inventory.borrow();
            prop_assert_eq!(inventory.count("Handgun"), expected);
            prop_assert_eq!(inventory.count("Scrap Metal"), scrap - expected);
            prop_assert_eq!(inventory.count("Gunpowder"), powder - expected);
        }
    }
}
