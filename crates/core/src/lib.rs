//! `scrapyard-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the inventory,
//! crafting and session crates (no IO, no engine concerns).

pub mod error;
pub mod id;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::{ItemId, SessionId};
pub use value_object::ValueObject;
