//! Typed value resolution over a [`Configuration`]
//!
//! A [`ConfigHandler`] groups properties into [`Section`]s and resolves
//! values against the active one:
//!
//! ```rust
//! use mod_core::config::{Bound, ConfigHandler, RestartRequirement, ValueOptions};
//!
//! let mut config = ConfigHandler::new("examplemod");
//! config.add_section("general").unwrap();
//!
//! let spawn_rate: i32 = config
//!     .value_with(
//!         "spawnRate",
//!         10,
//!         ValueOptions::new()
//!             .with_comment("Spawns per minute")
//!             .with_bound(Bound::of(1, 100))
//!             .with_restart(RestartRequirement::RequiresWorldRestart),
//!     )
//!     .unwrap();
//! assert_eq!(spawn_rate, 10);
//! ```

use std::backtrace::Backtrace;

use super::configuration::{Category, Configuration};
use super::property::{Bound, Property, RestartRequirement};
use super::section::Section;
use super::value::{ConfigType, ConfigValue, FileValue, ValueKind};
use super::ConfigError;

/// Optional settings for a value request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueOptions {
    comment: Option<String>,
    restart: RestartRequirement,
    bound: Option<Bound>,
}

impl ValueOptions {
    /// No comment, no restart requirement, no bound
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the property comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set the restart requirement
    pub fn with_restart(mut self, restart: RestartRequirement) -> Self {
        self.restart = restart;
        self
    }

    /// Set bounds on the property
    pub fn with_bound(mut self, bound: Bound) -> Self {
        self.bound = Some(bound);
        self
    }

    /// Comment, if any
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Restart requirement
    pub const fn restart(&self) -> RestartRequirement {
        self.restart
    }

    /// Bound, if any
    pub const fn bound(&self) -> Option<Bound> {
        self.bound
    }
}

/// Sectioned, typed access to one mod's configuration
#[derive(Debug)]
pub struct ConfigHandler {
    mod_id: String,
    config: Configuration,
    sections: Vec<Section>,
    active: Option<usize>,
}

impl ConfigHandler {
    /// Create a handler over an in-memory configuration
    pub fn new(mod_id: impl Into<String>) -> Self {
        Self::with_configuration(mod_id, Configuration::new())
    }

    /// Create a handler over an existing configuration
    pub fn with_configuration(mod_id: impl Into<String>, config: Configuration) -> Self {
        Self {
            mod_id: mod_id.into(),
            config,
            sections: Vec::new(),
            active: None,
        }
    }

    /// Id of the mod owning this config
    pub fn mod_id(&self) -> &str {
        &self.mod_id
    }

    /// Backing configuration
    pub const fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Mutable backing configuration
    pub fn configuration_mut(&mut self) -> &mut Configuration {
        &mut self.config
    }

    /// Re-read the backing file
    pub fn load(&mut self) -> Result<(), ConfigError> {
        self.config.load()
    }

    /// Save the backing file if anything changed; returns whether it saved
    pub fn save_if_changed(&mut self) -> Result<bool, ConfigError> {
        if self.config.has_changed() {
            self.config.save()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Add a section using its name as language key
    pub fn add_section(&mut self, name: &str) -> Result<Section, ConfigError> {
        self.add_section_with(name, name, None)
    }

    /// Add a section with a language key and optional comment
    ///
    /// The first section ever added becomes the active section. Names are
    /// unique regardless of case.
    pub fn add_section_with(&mut self, name: &str, lang_key: &str, comment: Option<&str>) -> Result<Section, ConfigError> {
        if self.section_index(name).is_some() {
            return Err(ConfigError::DuplicateSection(name.to_string()));
        }

        let section = Section::new(name, lang_key, comment.map(str::to_string));

        if let Some(comment) = comment {
            self.config.add_category_comment(&section.lc(), comment);
        }

        if self.active.is_none() && self.sections.is_empty() {
            self.active = Some(0);
        }

        self.sections.push(section.clone());
        Ok(section)
    }

    /// Activate a section by name (case-insensitive)
    pub fn activate_section(&mut self, name: &str) -> Result<(), ConfigError> {
        let index = self
            .section_index(name)
            .ok_or_else(|| ConfigError::SectionNotFound(name.to_string()))?;
        self.active = Some(index);
        Ok(())
    }

    /// Activate a section
    pub fn activate(&mut self, section: &Section) -> Result<(), ConfigError> {
        self.activate_section(section.name())
    }

    /// Currently active section
    pub fn active_section(&self) -> Option<&Section> {
        self.active.and_then(|index| self.sections.get(index))
    }

    /// Get a section by name (case-insensitive)
    pub fn section_by_name(&self, name: &str) -> Option<&Section> {
        self.section_index(name).map(|index| &self.sections[index])
    }

    /// All sections, in insertion order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Backing category for a section name
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.config.category(name)
    }

    /// Get a value from the active section
    pub fn value<T: ConfigType>(&mut self, key: &str, default: T) -> Result<T, ConfigError> {
        self.value_with(key, default, ValueOptions::default())
    }

    /// Get a value from the active section with a comment, restart requirement or bound
    pub fn value_with<T: ConfigType>(&mut self, key: &str, default: T, options: ValueOptions) -> Result<T, ConfigError> {
        let section = self.active_category(key)?;
        let value = self.resolve(&section, key, default.into_value(), options)?;
        unwrap_typed(key, value)
    }

    /// Get a value from an explicit section, leaving the active section untouched
    pub fn value_in<T: ConfigType>(
        &mut self,
        section: &Section,
        key: &str,
        default: T,
        options: ValueOptions,
    ) -> Result<T, ConfigError> {
        let category = self
            .section_by_name(section.name())
            .map(Section::lc)
            .ok_or_else(|| ConfigError::SectionNotFound(section.name().to_string()))?;
        let value = self.resolve(&category, key, default.into_value(), options)?;
        unwrap_typed(key, value)
    }

    /// Get a value from the active section using an untyped default
    ///
    /// Fails with [`ConfigError::UnsupportedValue`] if the default is not a
    /// config value type.
    pub fn value_raw(&mut self, key: &str, default: FileValue, options: ValueOptions) -> Result<ConfigValue, ConfigError> {
        let section = self.active_category(key)?;
        let default = ConfigValue::from_file_value(default).map_err(|reason| ConfigError::UnsupportedValue {
            key: key.to_string(),
            reason,
        })?;
        self.resolve(&section, key, default, options)
    }

    /// Get or create the property for `key` in the active section
    pub fn property(
        &mut self,
        key: &str,
        default: ConfigValue,
        restart: RestartRequirement,
    ) -> Result<&mut Property, ConfigError> {
        let section = self.active_category(key)?;
        let property = self.config.get_or_create(&section, key, default)?;
        Ok(restart.apply(property))
    }

    /// Read a property's value as the kind of `like`
    pub fn read_property(property: &Property, like: &ConfigValue) -> Result<ConfigValue, ConfigError> {
        read_as(property, like.kind())
    }

    fn resolve(
        &mut self,
        category: &str,
        key: &str,
        default: ConfigValue,
        options: ValueOptions,
    ) -> Result<ConfigValue, ConfigError> {
        let kind = default.kind();
        let property = self.config.get_or_create(category, key, default)?;
        options.restart.apply(property);
        property.set_comment(options.comment);

        if let Some(bound) = options.bound {
            apply_bound(property, bound, kind);
        }

        read_as(property, kind)
    }

    fn active_category(&self, key: &str) -> Result<String, ConfigError> {
        self.active_section()
            .map(Section::lc)
            .ok_or_else(|| ConfigError::NoActiveSection { key: key.to_string() })
    }

    fn section_index(&self, name: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.is_named(name))
    }
}

fn apply_bound(property: &mut Property, bound: Bound, kind: ValueKind) {
    if bound.accepts(kind) {
        property.set_bounds(bound);
    } else {
        log::warn!(
            "Tried to set {} bounds on '{}', a {} property. Only integer and floating point properties can be bounded.",
            bound,
            property.name(),
            kind
        );
        log::warn!("Trace: {}", Backtrace::force_capture());
    }
}

fn read_as(property: &Property, kind: ValueKind) -> Result<ConfigValue, ConfigError> {
    ConfigValue::read(kind, property.value()).ok_or_else(|| ConfigError::TypeMismatch {
        key: property.name().to_string(),
        expected: property.kind(),
        found: kind,
    })
}

fn unwrap_typed<T: ConfigType>(key: &str, value: ConfigValue) -> Result<T, ConfigError> {
    let found = value.kind();
    T::from_value(value).ok_or_else(|| ConfigError::TypeMismatch {
        key: key.to_string(),
        expected: T::KIND,
        found,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PropertyValue;

    fn handler() -> ConfigHandler {
        let mut handler = ConfigHandler::new("testmod");
        handler.add_section("general").unwrap();
        handler
    }

    #[test]
    fn test_first_section_is_active() {
        let mut handler = ConfigHandler::new("testmod");
        assert!(handler.active_section().is_none());
        handler.add_section("General").unwrap();
        handler.add_section("World").unwrap();
        assert_eq!(handler.active_section().unwrap().name(), "General");
    }

    #[test]
    fn test_activate_section_by_name() {
        let mut handler = handler();
        let world = handler.add_section("World").unwrap();
        handler.activate_section("WORLD").unwrap();
        assert_eq!(handler.active_section(), Some(&world));

        handler.activate_section("general").unwrap();
        assert_eq!(handler.active_section().unwrap().name(), "general");
        handler.activate(&world).unwrap();
        assert_eq!(handler.active_section(), Some(&world));
    }

    #[test]
    fn test_duplicate_section_is_rejected() {
        let mut handler = handler();
        let err = handler.add_section_with("GENERAL", "other", Some("Shadow")).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateSection(ref name) if name == "GENERAL"));
        assert_eq!(handler.sections().len(), 1);
        assert!(handler.category("general").map_or(true, |c| c.comment().is_none()));
    }

    #[test]
    fn test_activate_unknown_section_fails() {
        let mut handler = handler();
        let err = handler.activate_section("missing").unwrap_err();
        assert!(matches!(err, ConfigError::SectionNotFound(name) if name == "missing"));
        assert_eq!(handler.active_section().unwrap().name(), "general");
    }

    #[test]
    fn test_value_without_active_section_fails() {
        let mut handler = ConfigHandler::new("testmod");
        assert!(matches!(handler.value("count", 3), Err(ConfigError::NoActiveSection { key }) if key == "count"));
        assert!(matches!(handler.value("flag", true), Err(ConfigError::NoActiveSection { .. })));
        assert!(matches!(
            handler.value_raw("list", FileValue::List(Vec::new()), ValueOptions::new()),
            Err(ConfigError::NoActiveSection { .. })
        ));
        assert!(handler.configuration().categories().next().is_none());
    }

    #[test]
    fn test_first_default_wins_for_every_type() {
        let mut handler = handler();
        assert_eq!(handler.value("int", 3).unwrap(), 3);
        assert_eq!(handler.value("int", 4).unwrap(), 3);

        assert!(handler.value("bool", true).unwrap());
        assert!(handler.value("bool", false).unwrap());

        assert_eq!(handler.value("string", "a".to_string()).unwrap(), "a");
        assert_eq!(handler.value("string", "b".to_string()).unwrap(), "a");

        assert_eq!(handler.value("ints", vec![1, 2]).unwrap(), vec![1, 2]);
        assert_eq!(handler.value("ints", vec![3]).unwrap(), vec![1, 2]);

        let names = vec!["x".to_string()];
        assert_eq!(handler.value("strings", names.clone()).unwrap(), names);
        assert_eq!(handler.value("strings", Vec::<String>::new()).unwrap(), names);

        assert_eq!(handler.value("float", 0.5_f32).unwrap(), 0.5);
        assert_eq!(handler.value("float", 2.0_f32).unwrap(), 0.5);

        assert_eq!(handler.value("double", 0.25_f64).unwrap(), 0.25);
        assert_eq!(handler.value("double", 8.0_f64).unwrap(), 0.25);
    }

    #[test]
    fn test_type_mismatch_fails() {
        let mut handler = handler();
        handler.value("count", 3).unwrap();
        let err = handler.value("count", "three".to_string()).unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { key, .. } if key == "count"));
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn test_float_is_narrowed_from_stored_double() {
        let mut handler = handler();
        handler
            .configuration_mut()
            .get_or_create("general", "precise", ConfigValue::Double(0.1))
            .unwrap();

        let narrowed: f32 = handler.value("precise", 1.0_f32).unwrap();
        assert_eq!(narrowed, 0.1_f64 as f32);
        let stored = handler.category("general").unwrap().get("precise").unwrap();
        assert_eq!(stored.get_double(), Some(0.1));
    }

    #[test]
    fn test_int_bound_applies_to_int_value() {
        let mut handler = handler();
        let value = handler
            .value_with("count", 5, ValueOptions::new().with_bound(Bound::of(1, 10)))
            .unwrap();
        assert_eq!(value, 5);
        let prop = handler.category("general").unwrap().get("count").unwrap();
        assert_eq!(prop.bounds(), Some(Bound::Int { min: 1, max: 10 }));
    }

    #[test]
    fn test_float_bound_applies_to_float_and_double_values() {
        let mut handler = handler();
        handler
            .value_with("speed", 1.0_f32, ValueOptions::new().with_bound(Bound::of(0.0_f32, 2.0)))
            .unwrap();
        handler
            .value_with("scale", 1.0_f64, ValueOptions::new().with_bound(Bound::of(0.5_f64, 4.0)))
            .unwrap();

        let category = handler.category("general").unwrap();
        assert_eq!(category.get("speed").unwrap().bounds(), Some(Bound::Double { min: 0.0, max: 2.0 }));
        assert_eq!(category.get("scale").unwrap().bounds(), Some(Bound::Double { min: 0.5, max: 4.0 }));
    }

    #[test]
    fn test_mismatched_bound_is_tolerated() {
        let mut handler = handler();
        let value = handler
            .value_with("name", "steve".to_string(), ValueOptions::new().with_bound(Bound::of(1, 10)))
            .unwrap();
        assert_eq!(value, "steve");

        let count = handler
            .value_with("count", 3, ValueOptions::new().with_bound(Bound::of(0.0_f64, 1.0)))
            .unwrap();
        assert_eq!(count, 3);

        let category = handler.category("general").unwrap();
        assert_eq!(category.get("name").unwrap().bounds(), None);
        assert_eq!(category.get("count").unwrap().bounds(), None);
    }

    #[test]
    fn test_restart_requirement_and_comment_are_applied() {
        let mut handler = handler();
        handler
            .value_with(
                "seed",
                42,
                ValueOptions::new()
                    .with_comment("World seed")
                    .with_restart(RestartRequirement::RequiresGameRestart),
            )
            .unwrap();

        let prop = handler.category("general").unwrap().get("seed").unwrap();
        assert_eq!(prop.comment(), Some("World seed"));
        assert!(prop.requires_game_restart());
        assert!(prop.requires_world_restart());

        handler.value("seed", 42).unwrap();
        let prop = handler.category("general").unwrap().get("seed").unwrap();
        assert_eq!(prop.comment(), None);
        assert!(prop.requires_game_restart());
    }

    #[test]
    fn test_value_in_uses_explicit_section() {
        let mut handler = handler();
        let world = handler.add_section("World").unwrap();

        let height = handler.value_in(&world, "height", 256, ValueOptions::new()).unwrap();
        assert_eq!(height, 256);
        assert_eq!(handler.active_section().unwrap().name(), "general");
        assert!(handler.category("world").unwrap().get("height").is_some());
        assert!(handler.category("general").map_or(true, |c| c.get("height").is_none()));
    }

    #[test]
    fn test_value_in_unregistered_section_fails() {
        let mut handler = handler();
        let mut other = ConfigHandler::new("othermod");
        let foreign = other.add_section("elsewhere").unwrap();
        assert!(matches!(
            handler.value_in(&foreign, "key", 1, ValueOptions::new()),
            Err(ConfigError::SectionNotFound(_))
        ));
    }

    #[test]
    fn test_raw_value_unsupported_default_fails() {
        let mut handler = handler();
        let bools = FileValue::List(vec![FileValue::Bool(true)]);
        let err = handler.value_raw("flags", bools, ValueOptions::new()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedValue { key, .. } if key == "flags"));
        assert!(handler.category("general").map_or(true, |c| c.get("flags").is_none()));
    }

    #[test]
    fn test_raw_value_supported_default() {
        let mut handler = handler();
        let value = handler
            .value_raw("limit", FileValue::Int(8), ValueOptions::new())
            .unwrap();
        assert_eq!(value, ConfigValue::Int(8));
        assert_eq!(handler.value("limit", 0).unwrap(), 8);
    }

    #[test]
    fn test_property_and_read_property() {
        let mut handler = handler();
        let prop = handler
            .property("title", ConfigValue::String("Hi".into()), RestartRequirement::RequiresWorldRestart)
            .unwrap();
        assert!(prop.requires_world_restart());
        prop.set(ConfigValue::String("Hello".into())).unwrap();

        let prop = handler.category("general").unwrap().get("title").unwrap();
        let value = ConfigHandler::read_property(prop, &ConfigValue::String(String::new())).unwrap();
        assert_eq!(value, ConfigValue::String("Hello".into()));
        assert!(ConfigHandler::read_property(prop, &ConfigValue::Int(0)).is_err());
    }

    #[test]
    fn test_section_comment_reaches_category() {
        let mut handler = ConfigHandler::new("testmod");
        let section = handler.add_section_with("Mobs", "mobs.title", Some("Mob settings")).unwrap();
        assert_eq!(section.lang_key(), "section.mobs.title");
        assert_eq!(handler.category("mobs").unwrap().comment(), Some("Mob settings"));
    }

    #[test]
    fn test_save_if_changed() {
        let mut handler = handler();
        handler.value("count", 1).unwrap();
        assert!(handler.save_if_changed().unwrap());
        assert!(!handler.save_if_changed().unwrap());

        handler.value("count", 1).unwrap();
        assert!(!handler.save_if_changed().unwrap());

        let prop = handler.configuration_mut().category_mut("general").unwrap().get_mut("count").unwrap();
        prop.set(ConfigValue::Int(2)).unwrap();
        assert_eq!(prop.value(), &PropertyValue::Int(2));
        assert!(handler.save_if_changed().unwrap());
    }
}
