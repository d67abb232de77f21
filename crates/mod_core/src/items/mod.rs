//! Item references for recipes and config files
//!
//! Items are referred to in text as `name[;damage][#size]`, or by an alias
//! name that stands for a group of interchangeable stacks. [`ItemCodec`]
//! converts between that grammar and [`ItemStack`]s, using an
//! [`ItemRegistry`] for names and an [`AliasTable`] for aliases.

pub mod alias;
pub mod codec;
pub mod registry;
pub mod stack;

pub use alias::AliasTable;
pub use codec::{ItemCodec, ItemParseError, RecipeItem};
pub use registry::{ItemRegistry, RegistryEntry, RegistryError, RegistryObject, DEFAULT_NAMESPACE};
pub use stack::{ItemStack, DEFAULT_MAX_STACK_SIZE, WILDCARD_DAMAGE};
