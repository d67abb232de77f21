//! Item stacks

use crate::foundation::collections::ItemHandle;

/// Damage value matching any damage ("wildcard")
pub const WILDCARD_DAMAGE: i32 = 32767;

/// Max stack size for items that do not set one
pub const DEFAULT_MAX_STACK_SIZE: u32 = 64;

/// A quantity of one item with a damage/metadata value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemStack {
    /// Registry handle of the item
    pub item: ItemHandle,
    /// Number of items in the stack
    pub size: u32,
    /// Damage or metadata value
    pub damage: i32,
}

impl ItemStack {
    /// Create a stack
    pub const fn new(item: ItemHandle, size: u32, damage: i32) -> Self {
        Self { item, size, damage }
    }

    /// A single undamaged item
    pub const fn of(item: ItemHandle) -> Self {
        Self::new(item, 1, 0)
    }

    /// Same stack with another damage value
    #[must_use]
    pub const fn with_damage(mut self, damage: i32) -> Self {
        self.damage = damage;
        self
    }

    /// Same stack with another size
    #[must_use]
    pub const fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Whether the damage matches any damage
    pub const fn is_wildcard(&self) -> bool {
        self.damage == WILDCARD_DAMAGE
    }
}
