//! Inventory ledger.
//!
//! This crate owns the per-session item → count store and its change
//! notifications. Deterministic domain logic only (no IO, no engine).

pub mod ledger;

pub use ledger::{Inventory, InventoryError, InventoryEvent};
