//! String codec for item references
//!
//! Grammar: `<name>[;<damage>][#<size>]`, where `<name>` is an alias or a
//! registry name, `<damage>` defaults to [`WILDCARD_DAMAGE`] and `<size>`
//! defaults to 1. The literal `null` stands for no item.

use super::alias::AliasTable;
use super::registry::{ItemRegistry, RegistryObject};
use super::stack::{ItemStack, WILDCARD_DAMAGE};

const NULL_REFERENCE: &str = "null";

/// Item reference parse errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemParseError {
    /// The name is neither an alias nor a registered item, block or stack
    #[error(
        "{input} is not a valid string. Strings should be either an alias name, or in the format objectname;damage (damage is optional)"
    )]
    InvalidReference {
        /// Offending string
        input: String,
    },

    /// The damage segment is not a non-negative integer
    #[error("{fragment} is not a valid damage value in '{input}'")]
    InvalidDamage {
        /// Damage segment
        fragment: String,
        /// Whole reference
        input: String,
    },

    /// The `#` suffix is not an integer
    #[error("{fragment} is not a valid stack size")]
    InvalidStackSize {
        /// Size suffix
        fragment: String,
    },
}

/// A parsed recipe ingredient
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeItem {
    /// Any stack registered under this alias
    Alias(String),
    /// One specific stack
    Stack(ItemStack),
}

impl RecipeItem {
    /// The stack, if this is not an alias
    pub const fn as_stack(&self) -> Option<&ItemStack> {
        match self {
            Self::Stack(stack) => Some(stack),
            Self::Alias(_) => None,
        }
    }

    /// The alias name, if this is an alias
    pub fn as_alias(&self) -> Option<&str> {
        match self {
            Self::Alias(name) => Some(name),
            Self::Stack(_) => None,
        }
    }
}

/// Converts between item references and strings
#[derive(Debug, Clone, Copy)]
pub struct ItemCodec<'a> {
    registry: &'a ItemRegistry,
    aliases: &'a AliasTable,
}

impl<'a> ItemCodec<'a> {
    /// Create a codec over a registry and alias table
    pub const fn new(registry: &'a ItemRegistry, aliases: &'a AliasTable) -> Self {
        Self { registry, aliases }
    }

    /// Parse a recipe ingredient, keeping aliases as names
    pub fn parse_recipe_item(&self, input: &str) -> Result<Option<RecipeItem>, ItemParseError> {
        self.parse_recipe_item_with(input, false)
    }

    /// Parse a recipe ingredient
    ///
    /// With `force_stack`, an alias resolves to a single copy of the first
    /// stack registered under it. Which stack comes first is simply
    /// registration order.
    pub fn parse_recipe_item_with(&self, input: &str, force_stack: bool) -> Result<Option<RecipeItem>, ItemParseError> {
        if input == NULL_REFERENCE {
            return Ok(None);
        }

        if let Some(first) = self.aliases.get(input).first() {
            return Ok(Some(if force_stack {
                RecipeItem::Stack(first.with_size(1))
            } else {
                RecipeItem::Alias(input.to_string())
            }));
        }

        self.parse_registry_reference(input).map(|stack| Some(RecipeItem::Stack(stack)))
    }

    /// Parse a stack, including an optional `#size` suffix
    ///
    /// Aliases resolve to their first stack. The size is clamped into
    /// `[1, max stack size]`.
    pub fn parse_item_stack(&self, input: &str) -> Result<Option<ItemStack>, ItemParseError> {
        let (reference, size) = match input.split_once('#') {
            Some((reference, fragment)) => {
                let size = fragment.parse::<i32>().map_err(|_| ItemParseError::InvalidStackSize {
                    fragment: fragment.to_string(),
                })?;
                (reference, size)
            }
            None => (input, 1),
        };

        let Some(item) = self.parse_recipe_item_with(reference, true)? else {
            return Ok(None);
        };
        let RecipeItem::Stack(stack) = item else {
            return Err(ItemParseError::InvalidReference {
                input: input.to_string(),
            });
        };

        let max = i32::try_from(self.registry.max_stack_size(stack.item))
            .unwrap_or(i32::MAX)
            .max(1);
        let size = u32::try_from(size.clamp(1, max)).unwrap_or(1);
        Ok(Some(stack.with_size(size)))
    }

    /// Parse a list of stacks, skipping `null` entries
    pub fn parse_item_list<S: AsRef<str>>(&self, inputs: &[S]) -> Result<Vec<ItemStack>, ItemParseError> {
        let mut stacks = Vec::with_capacity(inputs.len());
        for input in inputs {
            if let Some(stack) = self.parse_item_stack(input.as_ref())? {
                stacks.push(stack);
            }
        }
        Ok(stacks)
    }

    /// Config string for a stack
    ///
    /// Aliases are not taken into account. Returns `None` for no stack, or
    /// for a stack whose item is not registered.
    pub fn to_config_string(&self, stack: Option<&ItemStack>, damage: bool, size: bool) -> Option<String> {
        let stack = stack?;
        let mut out = self.registry.name_of(stack.item)?.to_string();

        if damage {
            out.push(';');
            out.push_str(&stack.damage.to_string());
        }

        if size {
            out.push('#');
            out.push_str(&stack.size.to_string());
        }

        Some(out)
    }

    fn parse_registry_reference(&self, input: &str) -> Result<ItemStack, ItemParseError> {
        // Trailing empty segments are dropped; an empty segment followed by more is malformed.
        let mut segments: Vec<&str> = input.split(';').collect();
        while segments.len() > 1 && segments.last().is_some_and(|s| s.is_empty()) {
            segments.pop();
        }
        let name = segments.first().copied().unwrap_or_default();

        let damage = match segments.get(1) {
            Some(fragment) => fragment
                .parse::<i32>()
                .ok()
                .filter(|d| *d >= 0)
                .ok_or_else(|| ItemParseError::InvalidDamage {
                    fragment: fragment.to_string(),
                    input: input.to_string(),
                })?,
            None => WILDCARD_DAMAGE,
        };

        match self.registry.get(name) {
            Some((handle, RegistryObject::Item { .. } | RegistryObject::Block)) => Ok(ItemStack::new(handle, 1, damage)),
            Some((_, RegistryObject::Stack(stack))) => Ok(stack.with_damage(damage)),
            Some((_, RegistryObject::Other(_))) | None => Err(ItemParseError::InvalidReference {
                input: input.to_string(),
            }),
        }
    }
}
