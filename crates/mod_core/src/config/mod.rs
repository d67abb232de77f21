//! Configuration system
//!
//! A [`ConfigHandler`] hands out strongly-typed values organised into
//! [`Section`]s, backed by a file-based [`Configuration`]. Mods describe their
//! values by implementing [`ConfigSource`], wrap it in a [`ManagedConfig`] and
//! register it with a [`ConfigRegistry`], which routes config change events
//! to it.

pub mod configuration;
pub mod handler;
pub mod managed;
pub mod property;
pub mod registry;
pub mod section;
pub mod value;

pub use configuration::{Category, Configuration};
pub use handler::{ConfigHandler, ValueOptions};
pub use managed::{ConfigSource, ManagedConfig, ModConfig};
pub use property::{Bound, BoundValue, Property, PropertyFlags, RestartRequirement};
pub use registry::ConfigRegistry;
pub use section::Section;
pub use value::{ConfigType, ConfigValue, FileValue, PropertyValue, ValueKind};

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A value was requested while no section was active
    #[error("No section is active (while resolving '{key}')")]
    NoActiveSection {
        /// Key that was being resolved
        key: String,
    },

    /// A section name that was never registered
    #[error("Section {0} does not exist")]
    SectionNotFound(String),

    /// A section name that is already registered
    #[error("Section {0} is already registered")]
    DuplicateSection(String),

    /// Stored and requested value types differ
    #[error("Property '{key}' is a {expected} property, but a {found} value was used")]
    TypeMismatch {
        /// Property key
        key: String,
        /// Kind of the stored property
        expected: ValueKind,
        /// Kind that was supplied or requested
        found: ValueKind,
    },

    /// A default value that is not a config value type
    #[error("Default value for '{key}' is not a config value type: {reason}")]
    UnsupportedValue {
        /// Property key
        key: String,
        /// What was wrong with the value
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
