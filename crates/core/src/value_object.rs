//! Value object trait: equality by value, not identity.
//!
//! Item identifiers, recipes and catalog entries have no identity of their
//! own: two recipes with the same ingredients and result are the same recipe.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Ingredient {
///     item: ItemId,
///     quantity: u32,
/// }
///
/// impl ValueObject for Ingredient {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
