//! Name to object registry for items, blocks and pre-built stacks

use std::collections::HashMap;

use super::stack::{ItemStack, DEFAULT_MAX_STACK_SIZE};
use crate::foundation::collections::{HandleMap, ItemHandle};

/// Namespace assumed for names registered or looked up without one
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Registry errors
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// Name already taken
    #[error("An object named {0} is already registered")]
    Duplicate(String),
}

/// What a registry name refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryObject {
    /// A plain item
    Item {
        /// Largest stack of this item
        max_stack_size: u32,
    },
    /// A placeable block, usable as an item
    Block,
    /// A pre-built stack registered under its own name
    Stack(ItemStack),
    /// Something that is not usable as an item
    Other(String),
}

/// A registered object and its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    name: String,
    object: RegistryObject,
}

impl RegistryEntry {
    /// Namespaced registry name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered object
    pub const fn object(&self) -> &RegistryObject {
        &self.object
    }
}

/// Item registry with stable handles
#[derive(Debug, Default)]
pub struct ItemRegistry {
    entries: HandleMap<ItemHandle, RegistryEntry>,
    by_name: HashMap<String, ItemHandle>,
}

impl ItemRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the default namespace to a name that has none
    pub fn namespaced(name: &str) -> String {
        if name.contains(':') {
            name.to_string()
        } else {
            format!("{DEFAULT_NAMESPACE}:{name}")
        }
    }

    /// Register an object under a name
    pub fn register(&mut self, name: &str, object: RegistryObject) -> Result<ItemHandle, RegistryError> {
        let name = Self::namespaced(name);
        if self.by_name.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }

        let handle = self.entries.insert(RegistryEntry {
            name: name.clone(),
            object,
        });
        self.by_name.insert(name, handle);
        Ok(handle)
    }

    /// Register a plain item
    pub fn register_item(&mut self, name: &str, max_stack_size: u32) -> Result<ItemHandle, RegistryError> {
        self.register(name, RegistryObject::Item { max_stack_size })
    }

    /// Register a block
    pub fn register_block(&mut self, name: &str) -> Result<ItemHandle, RegistryError> {
        self.register(name, RegistryObject::Block)
    }

    /// Register a pre-built stack under its own name
    pub fn register_stack(&mut self, name: &str, stack: ItemStack) -> Result<ItemHandle, RegistryError> {
        self.register(name, RegistryObject::Stack(stack))
    }

    /// Register an object that is not usable as an item
    pub fn register_other(&mut self, name: &str, description: impl Into<String>) -> Result<ItemHandle, RegistryError> {
        self.register(name, RegistryObject::Other(description.into()))
    }

    /// Look up an object by name; a name without namespace uses the default one
    pub fn get(&self, name: &str) -> Option<(ItemHandle, &RegistryObject)> {
        let handle = *self.by_name.get(&Self::namespaced(name))?;
        self.entries.get(handle).map(|entry| (handle, &entry.object))
    }

    /// Entry for a handle
    pub fn entry(&self, handle: ItemHandle) -> Option<&RegistryEntry> {
        self.entries.get(handle)
    }

    /// Registry name of a handle
    pub fn name_of(&self, handle: ItemHandle) -> Option<&str> {
        self.entries.get(handle).map(RegistryEntry::name)
    }

    /// Largest stack of the item behind a handle
    ///
    /// A pre-built stack uses the limit of the item it holds. Blocks, other
    /// objects and unknown handles use [`DEFAULT_MAX_STACK_SIZE`].
    pub fn max_stack_size(&self, handle: ItemHandle) -> u32 {
        let object = self.entries.get(handle).map(RegistryEntry::object);
        let object = match object {
            Some(RegistryObject::Stack(stack)) => self.entries.get(stack.item).map(RegistryEntry::object),
            other => other,
        };

        match object {
            Some(RegistryObject::Item { max_stack_size }) => *max_stack_size,
            _ => DEFAULT_MAX_STACK_SIZE,
        }
    }

    /// Number of registered objects
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
