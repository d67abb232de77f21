//! Alias table: one name standing for several interchangeable stacks

use std::collections::HashMap;

use super::stack::ItemStack;

/// Many-valued name to stack mapping
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<String, Vec<ItemStack>>,
}

impl AliasTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stack under an alias name
    pub fn register(&mut self, name: impl Into<String>, stack: ItemStack) {
        self.entries.entry(name.into()).or_default().push(stack);
    }

    /// Stacks registered under a name, in registration order
    pub fn get(&self, name: &str) -> &[ItemStack] {
        self.entries.get(name).map_or(&[][..], Vec::as_slice)
    }

    /// Whether at least one stack is registered under a name
    pub fn contains(&self, name: &str) -> bool {
        !self.get(name).is_empty()
    }

    /// All alias names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
