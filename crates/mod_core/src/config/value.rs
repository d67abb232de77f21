//! Config value model
//!
//! Three closely related enums describe a value at different stages:
//!
//! - [`ConfigValue`] is what callers ask for and get back. It has one variant
//!   per supported value kind, including single-precision floats.
//! - [`PropertyValue`] is what a [`Property`](super::Property) stores. The
//!   backend has no single-precision type, so `f32` values are widened to
//!   `f64` on the way in and narrowed again on the way out.
//! - [`FileValue`] is the untyped shape read from and written to disk.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of a config value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// 32-bit signed integer
    Int,
    /// Boolean
    Bool,
    /// String
    String,
    /// List of 32-bit signed integers
    IntList,
    /// List of strings
    StringList,
    /// Single-precision float, stored as a double
    Float,
    /// Double-precision float
    Double,
}

impl ValueKind {
    /// The kind a property of this kind is stored as
    pub const fn storage(self) -> Self {
        match self {
            Self::Float => Self::Double,
            other => other,
        }
    }

    /// Human readable name of the kind
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "integer",
            Self::Bool => "boolean",
            Self::String => "string",
            Self::IntList => "integer list",
            Self::StringList => "string list",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed config value as requested by and returned to callers
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// 32-bit signed integer
    Int(i32),
    /// Boolean
    Bool(bool),
    /// String
    String(String),
    /// List of integers
    IntList(Vec<i32>),
    /// List of strings
    StringList(Vec<String>),
    /// Single-precision float
    Float(f32),
    /// Double-precision float
    Double(f64),
}

impl ConfigValue {
    /// Kind of this value
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Int,
            Self::Bool(_) => ValueKind::Bool,
            Self::String(_) => ValueKind::String,
            Self::IntList(_) => ValueKind::IntList,
            Self::StringList(_) => ValueKind::StringList,
            Self::Float(_) => ValueKind::Float,
            Self::Double(_) => ValueKind::Double,
        }
    }

    /// Convert into the stored representation, widening floats to doubles
    pub fn into_property_value(self) -> PropertyValue {
        match self {
            Self::Int(v) => PropertyValue::Int(v),
            Self::Bool(v) => PropertyValue::Bool(v),
            Self::String(v) => PropertyValue::String(v),
            Self::IntList(v) => PropertyValue::IntList(v),
            Self::StringList(v) => PropertyValue::StringList(v),
            Self::Float(v) => PropertyValue::Double(f64::from(v)),
            Self::Double(v) => PropertyValue::Double(v),
        }
    }

    /// Read a stored value back as `kind`
    ///
    /// Returns `None` when the stored value is not of `kind`'s storage kind.
    /// Float reads narrow the stored double with `as`, which is lossy for
    /// values outside single precision.
    #[allow(clippy::cast_possible_truncation)]
    pub fn read(kind: ValueKind, stored: &PropertyValue) -> Option<Self> {
        match (kind, stored) {
            (ValueKind::Int, PropertyValue::Int(v)) => Some(Self::Int(*v)),
            (ValueKind::Bool, PropertyValue::Bool(v)) => Some(Self::Bool(*v)),
            (ValueKind::String, PropertyValue::String(v)) => Some(Self::String(v.clone())),
            (ValueKind::IntList, PropertyValue::IntList(v)) => Some(Self::IntList(v.clone())),
            (ValueKind::StringList, PropertyValue::StringList(v)) => Some(Self::StringList(v.clone())),
            (ValueKind::Float, PropertyValue::Double(v)) => Some(Self::Float(*v as f32)),
            (ValueKind::Double, PropertyValue::Double(v)) => Some(Self::Double(*v)),
            _ => None,
        }
    }

    /// Build a value from an untyped default, e.g. one taken from a data file
    ///
    /// Integers that fit in 32 bits become [`ConfigValue::Int`], larger ones
    /// are rejected. Lists must be homogeneous lists of integers or strings;
    /// an empty list is treated as a string list.
    pub fn from_file_value(value: FileValue) -> Result<Self, String> {
        match value {
            FileValue::Bool(v) => Ok(Self::Bool(v)),
            FileValue::Int(v) => i32::try_from(v)
                .map(Self::Int)
                .map_err(|_| format!("integer {v} does not fit in 32 bits")),
            FileValue::Float(v) => Ok(Self::Double(v)),
            FileValue::String(v) => Ok(Self::String(v)),
            FileValue::List(items) => Self::from_file_list(items),
            FileValue::Table(_) => Err("tables are not a config value type".to_string()),
        }
    }

    fn from_file_list(items: Vec<FileValue>) -> Result<Self, String> {
        match items.first() {
            None | Some(FileValue::String(_)) => items
                .into_iter()
                .map(|item| match item {
                    FileValue::String(s) => Ok(s),
                    other => Err(format!("string list contains a {}", other.describe())),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::StringList),
            Some(FileValue::Int(_)) => items
                .into_iter()
                .map(|item| match item {
                    FileValue::Int(v) => i32::try_from(v).map_err(|_| format!("integer {v} does not fit in 32 bits")),
                    other => Err(format!("integer list contains a {}", other.describe())),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::IntList),
            Some(other) => Err(format!("lists of {} values are not a config value type", other.describe())),
        }
    }
}

/// A value as stored on a property
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// 32-bit signed integer
    Int(i32),
    /// Boolean
    Bool(bool),
    /// String
    String(String),
    /// List of integers
    IntList(Vec<i32>),
    /// List of strings
    StringList(Vec<String>),
    /// Double; also holds float values
    Double(f64),
}

impl PropertyValue {
    /// Stored kind of this value (never [`ValueKind::Float`])
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Int,
            Self::Bool(_) => ValueKind::Bool,
            Self::String(_) => ValueKind::String,
            Self::IntList(_) => ValueKind::IntList,
            Self::StringList(_) => ValueKind::StringList,
            Self::Double(_) => ValueKind::Double,
        }
    }

    /// Convert to the on-disk shape
    pub fn to_file_value(&self) -> FileValue {
        match self {
            Self::Int(v) => FileValue::Int(i64::from(*v)),
            Self::Bool(v) => FileValue::Bool(*v),
            Self::String(v) => FileValue::String(v.clone()),
            Self::IntList(v) => FileValue::List(v.iter().map(|i| FileValue::Int(i64::from(*i))).collect()),
            Self::StringList(v) => FileValue::List(v.iter().cloned().map(FileValue::String).collect()),
            Self::Double(v) => FileValue::Float(*v),
        }
    }

    /// Coerce a raw file value into a stored value of `kind`
    ///
    /// Integers are accepted where a double is expected (`speed = 2`).
    #[allow(clippy::cast_precision_loss)]
    pub fn coerce(raw: &FileValue, kind: ValueKind) -> Option<Self> {
        match (kind.storage(), raw) {
            (ValueKind::Int, FileValue::Int(v)) => i32::try_from(*v).ok().map(Self::Int),
            (ValueKind::Bool, FileValue::Bool(v)) => Some(Self::Bool(*v)),
            (ValueKind::String, FileValue::String(v)) => Some(Self::String(v.clone())),
            (ValueKind::Double, FileValue::Float(v)) => Some(Self::Double(*v)),
            (ValueKind::Double, FileValue::Int(v)) => Some(Self::Double(*v as f64)),
            (ValueKind::IntList, FileValue::List(items)) => items
                .iter()
                .map(|item| match item {
                    FileValue::Int(v) => i32::try_from(*v).ok(),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(Self::IntList),
            (ValueKind::StringList, FileValue::List(items)) => items
                .iter()
                .map(|item| match item {
                    FileValue::String(v) => Some(v.clone()),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(Self::StringList),
            _ => None,
        }
    }
}

/// Untyped value as read from or written to a config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileValue {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// String
    String(String),
    /// List of values
    List(Vec<FileValue>),
    /// Nested table, kept only so it can be written back
    Table(BTreeMap<String, FileValue>),
}

impl FileValue {
    const fn describe(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Table(_) => "table",
        }
    }
}

/// Rust types that can be used as config values
///
/// Implemented for `i32`, `bool`, `String`, `Vec<i32>`, `Vec<String>`, `f32`
/// and `f64`. Any other type is rejected at compile time.
pub trait ConfigType: Sized {
    /// Kind requested by this type
    const KIND: ValueKind;

    /// Wrap into a [`ConfigValue`]
    fn into_value(self) -> ConfigValue;

    /// Unwrap from a [`ConfigValue`] of the same kind
    fn from_value(value: ConfigValue) -> Option<Self>;
}

macro_rules! impl_config_type {
    ($ty:ty, $variant:ident) => {
        impl ConfigType for $ty {
            const KIND: ValueKind = ValueKind::$variant;

            fn into_value(self) -> ConfigValue {
                ConfigValue::$variant(self)
            }

            fn from_value(value: ConfigValue) -> Option<Self> {
                match value {
                    ConfigValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_config_type!(i32, Int);
impl_config_type!(bool, Bool);
impl_config_type!(String, String);
impl_config_type!(Vec<i32>, IntList);
impl_config_type!(Vec<String>, StringList);
impl_config_type!(f32, Float);
impl_config_type!(f64, Double);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_is_stored_as_double() {
        assert_eq!(ValueKind::Float.storage(), ValueKind::Double);
        let stored = ConfigValue::Float(0.5).into_property_value();
        assert_eq!(stored, PropertyValue::Double(0.5));
        assert_eq!(ConfigValue::read(ValueKind::Float, &stored), Some(ConfigValue::Float(0.5)));
        assert_eq!(ConfigValue::read(ValueKind::Double, &stored), Some(ConfigValue::Double(0.5)));
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn test_float_read_narrows_stored_double() {
        let stored = PropertyValue::Double(0.1);
        let ConfigValue::Float(narrowed) = ConfigValue::read(ValueKind::Float, &stored).unwrap() else {
            panic!("expected a float");
        };
        assert_eq!(narrowed, 0.1_f64 as f32);
        assert_ne!(f64::from(narrowed), 0.1);
    }

    #[test]
    fn test_read_rejects_wrong_kind() {
        let stored = PropertyValue::String("hello".to_string());
        assert_eq!(ConfigValue::read(ValueKind::Int, &stored), None);
    }

    #[test]
    fn test_coerce_accepts_integer_for_double() {
        assert_eq!(PropertyValue::coerce(&FileValue::Int(3), ValueKind::Float), Some(PropertyValue::Double(3.0)));
        assert_eq!(PropertyValue::coerce(&FileValue::Float(3.5), ValueKind::Int), None);
    }

    #[test]
    fn test_coerce_rejects_out_of_range_integers() {
        assert_eq!(PropertyValue::coerce(&FileValue::Int(i64::from(i32::MAX) + 1), ValueKind::Int), None);
        let list = FileValue::List(vec![FileValue::Int(1), FileValue::Int(i64::MAX)]);
        assert_eq!(PropertyValue::coerce(&list, ValueKind::IntList), None);
    }

    #[test]
    fn test_coerce_lists() {
        let list = FileValue::List(vec![FileValue::String("a".into()), FileValue::String("b".into())]);
        assert_eq!(
            PropertyValue::coerce(&list, ValueKind::StringList),
            Some(PropertyValue::StringList(vec!["a".into(), "b".into()]))
        );
        assert_eq!(PropertyValue::coerce(&list, ValueKind::IntList), None);
        assert_eq!(
            PropertyValue::coerce(&FileValue::List(Vec::new()), ValueKind::IntList),
            Some(PropertyValue::IntList(Vec::new()))
        );
    }

    #[test]
    fn test_from_file_value_rejects_unsupported_lists() {
        let bools = FileValue::List(vec![FileValue::Bool(true), FileValue::Bool(false)]);
        assert!(ConfigValue::from_file_value(bools).is_err());

        let nested = FileValue::List(vec![FileValue::List(vec![FileValue::Int(1)])]);
        assert!(ConfigValue::from_file_value(nested).is_err());

        let mixed = FileValue::List(vec![FileValue::Int(1), FileValue::String("x".into())]);
        assert!(ConfigValue::from_file_value(mixed).is_err());

        let table = FileValue::Table(BTreeMap::from([("a".to_string(), FileValue::Int(1))]));
        assert!(ConfigValue::from_file_value(table).is_err());
        let tables = FileValue::List(vec![FileValue::Table(BTreeMap::new())]);
        assert!(ConfigValue::from_file_value(tables).is_err());
    }

    #[test]
    fn test_from_file_value_supported() {
        assert_eq!(ConfigValue::from_file_value(FileValue::Int(7)), Ok(ConfigValue::Int(7)));
        assert_eq!(ConfigValue::from_file_value(FileValue::Float(1.5)), Ok(ConfigValue::Double(1.5)));
        assert_eq!(
            ConfigValue::from_file_value(FileValue::List(vec![FileValue::Int(1), FileValue::Int(2)])),
            Ok(ConfigValue::IntList(vec![1, 2]))
        );
        assert_eq!(
            ConfigValue::from_file_value(FileValue::List(Vec::new())),
            Ok(ConfigValue::StringList(Vec::new()))
        );
    }

    #[test]
    fn test_config_type_kinds() {
        assert_eq!(<f32 as ConfigType>::KIND, ValueKind::Float);
        assert_eq!(42_i32.into_value().kind(), ValueKind::Int);
        assert_eq!(i32::from_value(ConfigValue::Bool(true)), None);
        assert_eq!(Vec::<String>::from_value(ConfigValue::StringList(vec!["x".into()])), Some(vec!["x".to_string()]));
    }
}
