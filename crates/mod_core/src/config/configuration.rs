//! File-backed property storage
//!
//! [`Configuration`] owns the categories and properties of one config file.
//! Category names are case-insensitive and stored lowercased. Entries read
//! from disk that no caller has asked for yet are kept raw ("pending") until
//! the first request gives them a type, and are written back unchanged on
//! save. Entries with no [`FileValue`] shape, such as TOML datetimes or
//! values outside any section, are dropped with a warning.

use serde::de::IgnoredAny;
use serde::ser::{Serialize, Serializer};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::property::Property;
use super::value::{ConfigValue, FileValue, PropertyValue};
use super::ConfigError;
use crate::core::settings::{extension_of, SUPPORTED_EXTENSIONS};

type RawFile = BTreeMap<String, BTreeMap<String, FileValue>>;

/// A named group of properties
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    name: String,
    comment: Option<String>,
    properties: Vec<Property>,
    pending: BTreeMap<String, FileValue>,
}

impl Category {
    fn new(name: String) -> Self {
        Self {
            name,
            comment: None,
            properties: Vec::new(),
            pending: BTreeMap::new(),
        }
    }

    /// Lowercased category name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category comment
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Typed properties, in creation order
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    /// Get a typed property by key
    pub fn get(&self, key: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == key)
    }

    /// Get a mutable typed property by key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.name() == key)
    }

    /// Raw file entries not yet claimed by any request
    pub fn pending(&self) -> impl Iterator<Item = (&str, &FileValue)> {
        self.pending.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of typed properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the category has no typed properties
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name() == key)
    }
}

/// Property storage for one config file
#[derive(Debug, Default)]
pub struct Configuration {
    path: Option<PathBuf>,
    categories: Vec<Category>,
    changed: bool,
}

impl Configuration {
    /// Create an in-memory configuration; load and save do nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the configuration stored at `path`
    ///
    /// A missing file is not an error; it is created on the first save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        check_format(&path)?;

        let mut config = Self {
            path: Some(path),
            ..Self::default()
        };
        config.load()?;
        Ok(config)
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Re-read the backing file
    ///
    /// Existing properties take the file's value when it can be read as the
    /// property's type, and keep their current value otherwise. Unknown keys
    /// become pending entries.
    pub fn load(&mut self) -> Result<(), ConfigError> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };

        if !path.exists() {
            log::debug!("Config file {} does not exist yet", path.display());
            return Ok(());
        }

        let contents = std::fs::read_to_string(&path)?;
        let raw = parse(&path, &contents)?;

        for (category_name, entries) in raw {
            let index = self.category_index_or_insert(&category_name);
            let category = &mut self.categories[index];

            for (key, value) in entries {
                if let Some(property) = category.get_mut(&key) {
                    match PropertyValue::coerce(&value, property.kind()) {
                        Some(coerced) => property.load_value(coerced),
                        None => log::warn!(
                            "Ignoring value {:?} for {}.{}: expected a {} value",
                            value,
                            category_name,
                            key,
                            property.kind()
                        ),
                    }
                } else {
                    category.pending.insert(key, value);
                }
            }
        }

        self.reset_changed();
        log::debug!("Loaded config file {}", path.display());
        Ok(())
    }

    /// Write all categories to the backing file
    pub fn save(&mut self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let snapshot = Snapshot(&self.categories);
            let contents = match extension_of(path) {
                Some("toml") => toml::to_string_pretty(&snapshot).map_err(|e| ConfigError::Serialize(e.to_string()))?,
                Some("ron") => ron::ser::to_string_pretty(&snapshot, ron::ser::PrettyConfig::default())
                    .map_err(|e| ConfigError::Serialize(e.to_string()))?,
                _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
            };

            std::fs::write(path, contents)?;
            log::debug!("Saved config file {}", path.display());
        }

        self.reset_changed();
        Ok(())
    }

    /// Whether anything changed since the last load or save
    pub fn has_changed(&self) -> bool {
        self.changed
            || self
                .categories
                .iter()
                .any(|c| c.properties.iter().any(Property::has_changed))
    }

    /// Get the property at (`category`, `key`), creating it from `default` if absent
    ///
    /// A pending file entry is coerced to the default's type; if that fails
    /// the property starts at the default. An existing property of another
    /// type is an error.
    pub fn get_or_create(
        &mut self,
        category: &str,
        key: &str,
        default: ConfigValue,
    ) -> Result<&mut Property, ConfigError> {
        let requested = default.kind();
        let index = self.category_index_or_insert(category);
        let category = &mut self.categories[index];

        if let Some(position) = category.position(key) {
            let found = category.properties[position].kind();
            if found != requested.storage() {
                return Err(ConfigError::TypeMismatch {
                    key: key.to_string(),
                    expected: found,
                    found: requested,
                });
            }
            return Ok(&mut category.properties[position]);
        }

        let mut property = Property::new(key, default.into_property_value());
        match category.pending.remove(key) {
            Some(raw) => match PropertyValue::coerce(&raw, requested) {
                Some(value) => property.load_value(value),
                None => {
                    log::warn!(
                        "Value {:?} for {}.{} is not a valid {}, using the default",
                        raw,
                        category.name,
                        key,
                        requested
                    );
                    self.changed = true;
                }
            },
            None => self.changed = true,
        }

        category.properties.push(property);
        let last = category.properties.len() - 1;
        Ok(&mut category.properties[last])
    }

    /// Set the comment of a category, creating the category if needed
    pub fn add_category_comment(&mut self, category: &str, comment: impl Into<String>) {
        let comment = Some(comment.into());
        let index = self.category_index_or_insert(category);
        if self.categories[index].comment != comment {
            self.categories[index].comment = comment;
            self.changed = true;
        }
    }

    /// Get a category by name (case-insensitive)
    pub fn category(&self, name: &str) -> Option<&Category> {
        let name = name.to_lowercase();
        self.categories.iter().find(|c| c.name == name)
    }

    /// Get a mutable category by name (case-insensitive)
    pub fn category_mut(&mut self, name: &str) -> Option<&mut Category> {
        let name = name.to_lowercase();
        self.categories.iter_mut().find(|c| c.name == name)
    }

    /// All categories, in creation order
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    fn category_index_or_insert(&mut self, name: &str) -> usize {
        let name = name.to_lowercase();
        if let Some(index) = self.categories.iter().position(|c| c.name == name) {
            return index;
        }
        self.categories.push(Category::new(name));
        self.changed = true;
        self.categories.len() - 1
    }

    fn reset_changed(&mut self) {
        self.changed = false;
        for property in self.categories.iter_mut().flat_map(|c| c.properties.iter_mut()) {
            property.reset_changed();
        }
    }
}

fn check_format(path: &Path) -> Result<(), ConfigError> {
    match extension_of(path) {
        Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext) => Ok(()),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

/// A RON entry that may not fit [`FileValue`]
#[derive(Deserialize)]
#[serde(untagged)]
enum RonEntry {
    Value(FileValue),
    Unsupported(IgnoredAny),
}

/// Parse a config file, dropping entries that cannot be represented
///
/// Dropped entries are logged and are not written back on save.
fn parse(path: &Path, contents: &str) -> Result<RawFile, ConfigError> {
    match extension_of(path) {
        Some("toml") => {
            let table: toml::Table = toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
            Ok(raw_from_toml(table))
        }
        Some("ron") => {
            let raw: BTreeMap<String, BTreeMap<String, RonEntry>> =
                ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
            Ok(raw
                .into_iter()
                .map(|(category, entries)| {
                    let entries = entries
                        .into_iter()
                        .filter_map(|(key, entry)| match entry {
                            RonEntry::Value(value) => Some((key, value)),
                            RonEntry::Unsupported(_) => {
                                log::warn!("Dropping {category}.{key}: unsupported value");
                                None
                            }
                        })
                        .collect();
                    (category, entries)
                })
                .collect())
        }
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

fn raw_from_toml(table: toml::Table) -> RawFile {
    let mut raw = RawFile::new();
    for (category, value) in table {
        let toml::Value::Table(entries) = value else {
            log::warn!("Dropping top-level entry {category}: values belong in a [section]");
            continue;
        };

        let entries = entries
            .into_iter()
            .filter_map(|(key, value)| {
                let converted = file_value_from_toml(value);
                if converted.is_none() {
                    log::warn!("Dropping {category}.{key}: unsupported value");
                }
                converted.map(|value| (key, value))
            })
            .collect();
        raw.insert(category, entries);
    }
    raw
}

fn file_value_from_toml(value: toml::Value) -> Option<FileValue> {
    match value {
        toml::Value::Boolean(v) => Some(FileValue::Bool(v)),
        toml::Value::Integer(v) => Some(FileValue::Int(v)),
        toml::Value::Float(v) => Some(FileValue::Float(v)),
        toml::Value::String(v) => Some(FileValue::String(v)),
        toml::Value::Array(items) => items
            .into_iter()
            .map(file_value_from_toml)
            .collect::<Option<Vec<_>>>()
            .map(FileValue::List),
        toml::Value::Table(entries) => entries
            .into_iter()
            .map(|(key, value)| file_value_from_toml(value).map(|value| (key, value)))
            .collect::<Option<BTreeMap<_, _>>>()
            .map(FileValue::Table),
        toml::Value::Datetime(_) => None,
    }
}

/// Serializes categories in creation order without copying them into a map
struct Snapshot<'a>(&'a [Category]);

struct CategoryEntries<'a>(&'a Category);

impl Serialize for Snapshot<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|c| (c.name.as_str(), CategoryEntries(c))))
    }
}

impl Serialize for CategoryEntries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let typed = self.0.properties.iter().map(|p| (p.name().to_string(), p.value().to_file_value()));
        let pending = self.0.pending.iter().map(|(k, v)| (k.clone(), v.clone()));
        serializer.collect_map(typed.chain(pending))
    }
}
