//! # Mod Core
//!
//! Shared plumbing for game mods: typed config values and textual item
//! references.
//!
//! ## Features
//!
//! - **Config Handling**: typed values in named sections, with defaults,
//!   comments, bounds and restart requirements, persisted as TOML or RON
//! - **Config Lifecycle**: per-mod init and reload callbacks driven by
//!   config change events
//! - **Item References**: parse and print `name[;damage][#size]` strings and
//!   alias names
//!
//! ## Quick Start
//!
//! ```rust
//! use mod_core::prelude::*;
//!
//! let mut config = ConfigHandler::new("examplemod");
//! config.add_section("general").unwrap();
//! let max_mobs: i32 = config.value("maxMobs", 20).unwrap();
//! assert_eq!(max_mobs, 20);
//!
//! let mut registry = ItemRegistry::new();
//! registry.register_item("minecraft:stick", 64).unwrap();
//! let aliases = AliasTable::new();
//! let codec = ItemCodec::new(&registry, &aliases);
//! let stack = codec.parse_item_stack("minecraft:stick;2#3").unwrap().unwrap();
//! assert_eq!(stack.size, 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod config;
pub mod core;
pub mod events;
pub mod foundation;
pub mod items;

#[cfg(test)]
mod tests;

/// Common imports for mod authors
pub mod prelude {
    pub use crate::{
        config::{
            Bound, ConfigError, ConfigHandler, ConfigRegistry, ConfigSource, ConfigType, ConfigValue,
            ManagedConfig, ModConfig, RestartRequirement, Section, ValueOptions,
        },
        core::{CoreSettings, SettingsFile},
        events::{Event, EventHandler, EventSystem, EventType},
        items::{AliasTable, ItemCodec, ItemParseError, ItemRegistry, ItemStack, RecipeItem, WILDCARD_DAMAGE},
    };
}
