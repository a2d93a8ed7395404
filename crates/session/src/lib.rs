//! Game session wiring for the scrapyard survival prototype.
//!
//! A [`GameSession`] constructs one inventory and one crafting resolver and
//! hands them to the collaborators that drive or observe them: the pickup
//! field, the weapon gate and the HUD. The `scrapyard` binary runs a session
//! from line commands.

pub mod config;
pub mod console;
pub mod data;
pub mod hud;
pub mod pickup;
pub mod session;
pub mod weapon;

pub use config::{ConfigError, SessionConfig};
pub use console::{Command, Output};
pub use data::{DataError, GameData};
pub use hud::Hud;
pub use pickup::{PickupError, PickupField, PickupSpec};
pub use session::{GameSession, SessionError};
pub use weapon::{Shot, WeaponController, WeaponSettings};
