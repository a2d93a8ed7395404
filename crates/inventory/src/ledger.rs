use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use scrapyard_core::ItemId;
use scrapyard_events::{Event, EventBus, InMemoryEventBus};

/// Notification published by the [`Inventory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum InventoryEvent {
    /// Units of `item` were added (pickup or crafted result).
    ItemPickedUp { item: ItemId, amount: u32 },
    /// Contents changed in any way; listeners re-read the ledger.
    Changed,
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::ItemPickedUp { .. } => "inventory.item.picked_up",
            InventoryEvent::Changed => "inventory.changed",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("amount must be at least 1")]
    ZeroAmount,

    #[error("not enough {item}: holding {held}, requested {requested}")]
    Insufficient {
        item: ItemId,
        held: u32,
        requested: u32,
    },

    #[error("count of {item} would overflow")]
    Overflow { item: ItemId },
}

/// The item → count ledger of one game session.
///
/// Invariant: an item is either absent or held with a count of at least 1.
/// Amounts are unsigned, so a "negative add" cannot be expressed; zero amounts
/// are rejected.
#[derive(Debug, Default)]
pub struct Inventory {
    items: BTreeMap<ItemId, u32>,
    events: InMemoryEventBus<InventoryEvent>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` units of `item`, returning the new total.
    ///
    /// Publishes `ItemPickedUp` and then `Changed`.
    pub fn add(&mut self, item: impl Into<ItemId>, amount: u32) -> Result<u32, InventoryError> {
        let item = item.into();
        if amount == 0 {
            warn!(%item, "rejected zero-amount add");
            return Err(InventoryError::ZeroAmount);
        }

        let held = self.count(item.as_str());
        let total = held
            .checked_add(amount)
            .ok_or_else(|| InventoryError::Overflow { item: item.clone() })?;
        self.items.insert(item.clone(), total);
        debug!(%item, amount, total, "item added");

        self.events.publish(InventoryEvent::ItemPickedUp { item, amount });
        self.events.publish(InventoryEvent::Changed);
        Ok(total)
    }

    /// Remove `amount` units of `item`, returning what is left.
    ///
    /// Fails closed: when fewer than `amount` are held nothing changes and no
    /// event is published. An entry that reaches zero is deleted.
    pub fn remove(&mut self, item: &str, amount: u32) -> Result<u32, InventoryError> {
        if amount == 0 {
            warn!(item, "rejected zero-amount remove");
            return Err(InventoryError::ZeroAmount);
        }

        let held = self.count(item);
        if held < amount {
            return Err(InventoryError::Insufficient {
                item: ItemId::from(item),
                held,
                requested: amount,
            });
        }

        let remaining = held - amount;
        if remaining == 0 {
            self.items.remove(item);
        } else if let Some(count) = self.items.get_mut(item) {
            *count = remaining;
        }
        debug!(item, amount, remaining, "item removed");

        self.events.publish(InventoryEvent::Changed);
        Ok(remaining)
    }

    /// True iff at least `amount` units of `item` are held.
    pub fn has(&self, item: &str, amount: u32) -> bool {
        self.count(item) >= amount
    }

    pub fn count(&self, item: &str) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    /// Independent copy of the whole ledger, sorted by item name.
    pub fn snapshot(&self) -> BTreeMap<ItemId, u32> {
        self.items.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, u32)> {
        self.items.iter().map(|(item, count)| (item, *count))
    }

    /// Number of distinct items held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Subscription point for collaborators.
    pub fn events_mut(&mut self) -> &mut InMemoryEventBus<InventoryEvent> {
        &mut self.events
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use proptest::prelude::*;

    use super::*;

    fn recorded(inventory: &mut Inventory) -> Rc<RefCell<Vec<InventoryEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        inventory
            .events_mut()
            .subscribe(move |event: &InventoryEvent| sink.borrow_mut().push(event.clone()));
        log
    }

    #[test]
    fn add_creates_entry_and_fires_picked_up_then_changed() {
        let mut inventory = Inventory::new();
        let log = recorded(&mut inventory);

        assert_eq!(inventory.add("Wood", 1).unwrap(), 1);
        assert_eq!(inventory.add("Wood", 2).unwrap(), 3);

        assert_eq!(inventory.count("Wood"), 3);
        assert_eq!(
            *log.borrow(),
            vec![
                InventoryEvent::ItemPickedUp {
                    item: ItemId::from("Wood"),
                    amount: 1
                },
                InventoryEvent::Changed,
                InventoryEvent::ItemPickedUp {
                    item: ItemId::from("Wood"),
                    amount: 2
                },
                InventoryEvent::Changed,
            ]
        );
    }

    #[test]
    fn remove_to_zero_deletes_entry() {
        let mut inventory = Inventory::new();
        inventory.add("Nail", 2).unwrap();

        assert_eq!(inventory.remove("Nail", 1).unwrap(), 1);
        assert_eq!(inventory.remove("Nail", 1).unwrap(), 0);

        assert!(inventory.is_empty());
        assert!(!inventory.snapshot().contains_key("Nail"));
        assert_eq!(inventory.count("Nail"), 0);
    }

    #[test]
    fn insufficient_remove_changes_nothing_and_stays_silent() {
        let mut inventory = Inventory::new();
        inventory.add("Gunpowder", 1).unwrap();
        let log = recorded(&mut inventory);
        let before = inventory.snapshot();

        let err = inventory.remove("Gunpowder", 2).unwrap_err();
        assert_eq!(
            err,
            InventoryError::Insufficient {
                item: ItemId::from("Gunpowder"),
                held: 1,
                requested: 2,
            }
        );
        assert!(inventory.remove("Handgun", 1).is_err());

        assert_eq!(inventory.snapshot(), before);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn zero_amounts_are_rejected() {
        let mut inventory = Inventory::new();
        let log = recorded(&mut inventory);

        assert_eq!(inventory.add("Wood", 0), Err(InventoryError::ZeroAmount));
        assert_eq!(inventory.remove("Wood", 0), Err(InventoryError::ZeroAmount));

        assert!(inventory.is_empty());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn add_overflow_is_rejected() {
        let mut inventory = Inventory::new();
        inventory.add("Scrap Metal", u32::MAX).unwrap();

        assert!(matches!(
            inventory.add("Scrap Metal", 1),
            Err(InventoryError::Overflow { .. })
        ));
        assert_eq!(inventory.count("Scrap Metal"), u32::MAX);
    }

    #[test]
    fn has_treats_absent_items_as_zero() {
        let mut inventory = Inventory::new();
        inventory.add("Wood", 2).unwrap();

        assert!(inventory.has("Wood", 2));
        assert!(!inventory.has("Wood", 3));
        assert!(!inventory.has("Nail", 1));
        assert!(inventory.has("Nail", 0));
    }

    #[test]
    fn snapshot_is_detached_from_ledger() {
        let mut inventory = Inventory::new();
        inventory.add("Wood", 1).unwrap();

        let mut copy = inventory.snapshot();
        copy.insert(ItemId::from("Wood"), 99);
        copy.insert(ItemId::from("Handgun"), 1);

        assert_eq!(inventory.count("Wood"), 1);
        assert!(!inventory.has("Handgun", 1));
        assert_eq!(inventory.len(), 1);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize, u32),
        Remove(usize, u32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..3, 1u32..5).prop_map(|(i, n)| Op::Add(i, n)),
            (0usize..3, 1u32..5).prop_map(|(i, n)| Op::Remove(i, n)),
        ]
    }

    const NAMES: [&str; 3] = ["Wood", "Nail", "Gunpowder"];

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: counts equal additions minus successful removals, and no
        /// entry is ever held at zero.
        #[test]
        fn counts_track_net_of_successful_operations(ops in prop::collection::vec(op(), 0..40)) {
            let mut inventory = Inventory::new();
            let mut model: HashMap<&str, u32> = HashMap::new();

            for op in ops {
                match op {
                    Op::Add(i, n) => {
                        inventory.add(NAMES[i], n).unwrap();
                        *model.entry(NAMES[i]).or_insert(0) += n;
                    }
                    Op::Remove(i, n) => {
                        let held = model.get(NAMES[i]).copied().unwrap_or(0);
                        let result = inventory.remove(NAMES[i], n);
                        if held >= n {
                            prop_assert!(result.is_ok());
                            model.insert(NAMES[i], held - n);
                        } else {
                            prop_assert!(result.is_err());
                        }
                    }
                }

                for name in NAMES {
                    let expected = model.get(name).copied().unwrap_or(0);
                    prop_assert_eq!(inventory.count(name), expected);
                }
                prop_assert!(inventory.iter().all(|(_, count)| count > 0));
            }
        }
    }
}
