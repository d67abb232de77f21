//! Config properties, restart requirements and bounds

use bitflags::bitflags;
use std::fmt;

use super::value::{ConfigValue, PropertyValue, ValueKind};
use super::ConfigError;

bitflags! {
    /// Restart hints consumed by the settings UI
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PropertyFlags: u8 {
        /// Changing the property needs the world to be restarted
        const REQUIRES_WORLD_RESTART = 1 << 0;
        /// Changing the property needs the game to be restarted
        const REQUIRES_GAME_RESTART = 1 << 1;
    }
}

/// Restart requirement of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RestartRequirement {
    /// No restart needed for this config to be applied
    #[default]
    None,
    /// This config requires the world to be restarted to take effect
    RequiresWorldRestart,
    /// This config requires the game to be restarted to take effect.
    /// Implies [`RestartRequirement::RequiresWorldRestart`].
    RequiresGameRestart,
}

impl RestartRequirement {
    /// Apply this requirement to a property
    ///
    /// Only ever sets flags; a requirement applied earlier is never cleared.
    pub fn apply(self, property: &mut Property) -> &mut Property {
        match self {
            Self::None => {}
            Self::RequiresWorldRestart => property.set_requires_world_restart(true),
            Self::RequiresGameRestart => property.set_requires_game_restart(true),
        }
        property
    }
}

/// Inclusive `[min, max]` limit on a numeric property
///
/// Float bounds are widened to doubles, matching how float properties are
/// stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// Integer bound
    Int {
        /// Lowest allowed value
        min: i32,
        /// Highest allowed value
        max: i32,
    },
    /// Floating point bound
    Double {
        /// Lowest allowed value
        min: f64,
        /// Highest allowed value
        max: f64,
    },
}

/// Numeric types a [`Bound`] can be built from
pub trait BoundValue: Copy {
    /// Build a bound over this type
    fn bound(min: Self, max: Self) -> Bound;
}

impl BoundValue for i32 {
    fn bound(min: Self, max: Self) -> Bound {
        Bound::Int { min, max }
    }
}

impl BoundValue for f32 {
    fn bound(min: Self, max: Self) -> Bound {
        Bound::Double { min: f64::from(min), max: f64::from(max) }
    }
}

impl BoundValue for f64 {
    fn bound(min: Self, max: Self) -> Bound {
        Bound::Double { min, max }
    }
}

impl Bound {
    /// Build a bound of the type of the arguments
    pub fn of<T: BoundValue>(min: T, max: T) -> Self {
        T::bound(min, max)
    }

    /// Whether this bound can be applied to a property of `kind`
    pub const fn accepts(&self, kind: ValueKind) -> bool {
        matches!(
            (self, kind),
            (Self::Int { .. }, ValueKind::Int) | (Self::Double { .. }, ValueKind::Float | ValueKind::Double)
        )
    }

    /// Whether a stored value lies inside the bound
    ///
    /// Values of a kind the bound does not apply to are always inside.
    pub fn contains(&self, value: &PropertyValue) -> bool {
        match (self, value) {
            (Self::Int { min, max }, PropertyValue::Int(v)) => (*min..=*max).contains(v),
            (Self::Double { min, max }, PropertyValue::Double(v)) => (*min..=*max).contains(v),
            _ => true,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int { min, max } => write!(f, "integer [{min}, {max}]"),
            Self::Double { min, max } => write!(f, "double [{min}, {max}]"),
        }
    }
}

/// A named, typed, persisted value inside a config category
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    name: String,
    value: PropertyValue,
    default: PropertyValue,
    comment: Option<String>,
    bounds: Option<Bound>,
    flags: PropertyFlags,
    changed: bool,
}

impl Property {
    /// Create a property holding its default value
    pub fn new(name: impl Into<String>, default: PropertyValue) -> Self {
        Self {
            name: name.into(),
            value: default.clone(),
            default,
            comment: None,
            bounds: None,
            flags: PropertyFlags::empty(),
            changed: false,
        }
    }

    /// Property key
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current stored value
    pub const fn value(&self) -> &PropertyValue {
        &self.value
    }

    /// Value the property was created with
    pub const fn default_value(&self) -> &PropertyValue {
        &self.default
    }

    /// Stored kind of the property
    pub const fn kind(&self) -> ValueKind {
        self.value.kind()
    }

    /// Set a new value, as the settings UI would
    ///
    /// The value must have the property's stored kind; a float value sets a
    /// double property.
    pub fn set(&mut self, value: ConfigValue) -> Result<(), ConfigError> {
        let requested = value.kind();
        let value = value.into_property_value();
        if value.kind() != self.kind() {
            return Err(ConfigError::TypeMismatch {
                key: self.name.clone(),
                expected: self.kind(),
                found: requested,
            });
        }
        if value != self.value {
            self.value = value;
            self.changed = true;
        }
        Ok(())
    }

    /// Restore the default value
    pub fn reset_to_default(&mut self) {
        if self.value != self.default {
            self.value = self.default.clone();
            self.changed = true;
        }
    }

    /// Whether the current value equals the default
    pub fn is_default(&self) -> bool {
        self.value == self.default
    }

    /// Comment shown alongside the property
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Replace the comment; `None` clears it
    pub fn set_comment(&mut self, comment: Option<String>) {
        if self.comment != comment {
            self.comment = comment;
            self.changed = true;
        }
    }

    /// Bounds set on the property, if any
    pub const fn bounds(&self) -> Option<Bound> {
        self.bounds
    }

    /// Set bounds on the property
    ///
    /// Bounds are metadata for the settings UI; the stored value is never
    /// clamped.
    pub fn set_bounds(&mut self, bound: Bound) {
        if self.bounds != Some(bound) {
            self.bounds = Some(bound);
            self.changed = true;
        }
    }

    /// Whether the current value lies inside the bounds (always true without bounds)
    pub fn is_within_bounds(&self) -> bool {
        self.bounds.map_or(true, |bound| bound.contains(&self.value))
    }

    /// Restart flags
    pub const fn flags(&self) -> PropertyFlags {
        self.flags
    }

    /// Whether a change needs a world restart (implied by a game restart)
    pub fn requires_world_restart(&self) -> bool {
        self.flags
            .intersects(PropertyFlags::REQUIRES_WORLD_RESTART | PropertyFlags::REQUIRES_GAME_RESTART)
    }

    /// Whether a change needs a game restart
    pub fn requires_game_restart(&self) -> bool {
        self.flags.contains(PropertyFlags::REQUIRES_GAME_RESTART)
    }

    /// Set or clear the world restart flag
    pub fn set_requires_world_restart(&mut self, required: bool) {
        self.set_flag(PropertyFlags::REQUIRES_WORLD_RESTART, required);
    }

    /// Set or clear the game restart flag
    pub fn set_requires_game_restart(&mut self, required: bool) {
        self.set_flag(PropertyFlags::REQUIRES_GAME_RESTART, required);
    }

    fn set_flag(&mut self, flag: PropertyFlags, value: bool) {
        let before = self.flags;
        self.flags.set(flag, value);
        self.changed |= before != self.flags;
    }

    /// Get the value as an integer
    pub const fn get_int(&self) -> Option<i32> {
        match self.value {
            PropertyValue::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Get the value as a boolean
    pub const fn get_bool(&self) -> Option<bool> {
        match self.value {
            PropertyValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Get the value as a double
    pub const fn get_double(&self) -> Option<f64> {
        match self.value {
            PropertyValue::Double(v) => Some(v),
            _ => None,
        }
    }

    /// Get the value as a string
    pub fn get_string(&self) -> Option<&str> {
        match &self.value {
            PropertyValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Get the value as an integer list
    pub fn get_int_list(&self) -> Option<&[i32]> {
        match &self.value {
            PropertyValue::IntList(v) => Some(v),
            _ => None,
        }
    }

    /// Get the value as a string list
    pub fn get_string_list(&self) -> Option<&[String]> {
        match &self.value {
            PropertyValue::StringList(v) => Some(v),
            _ => None,
        }
    }

    /// Whether the property changed since the last load or save
    pub const fn has_changed(&self) -> bool {
        self.changed
    }

    pub(crate) fn reset_changed(&mut self) {
        self.changed = false;
    }

    /// Replace the value with one read from disk, without marking a change
    pub(crate) fn load_value(&mut self, value: PropertyValue) {
        debug_assert_eq!(value.kind(), self.kind());
        self.value = value;
    }
}
