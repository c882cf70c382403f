//! Value type providers.
//!
//! A provider maps the type names used inside templates (`<string-name>`,
//! `<int-count>`, ...) to a [`TypeId`] and default value, and converts raw
//! argument text into [`Value`]s of that type.
//!
//! [`DefaultValueTypes`] handles the built-in types and hands everything else
//! to an optional delegate, so applications can add their own types without
//! re-implementing the built-ins.
//!
//! # Examples
//!
//! ```
//! use command_template_core::{BuiltinType, DefaultValueTypes, TypeId, Value, ValueTypes};
//!
//! let types = DefaultValueTypes::new();
//! let attrs = types.attributes("int").unwrap();
//! assert_eq!(attrs.id, TypeId::Builtin(BuiltinType::Int));
//! assert_eq!(attrs.default, Value::Int(0));
//!
//! assert_eq!(types.make_value(attrs.id, "42").unwrap(), Value::Int(42));
//! assert!(types.make_value(attrs.id, "forty-two").is_err());
//! assert!(types.attributes("strings").is_none());
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ConversionError;
use crate::value::Value;

/// Identifies a value type: one of the built-ins or a provider-defined type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeId {
    Builtin(BuiltinType),
    /// Index assigned by a custom provider.
    Custom(usize),
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(builtin) => f.write_str(builtin.name()),
            Self::Custom(index) => write!(f, "#{index}"),
        }
    }
}

/// Types understood without any custom provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Bool,
    Int,
    Float,
    String,
    /// Filesystem path, made absolute on conversion.
    Path,
}

impl BuiltinType {
    pub const ALL: [BuiltinType; 5] = [
        BuiltinType::Bool,
        BuiltinType::Int,
        BuiltinType::Float,
        BuiltinType::String,
        BuiltinType::Path,
    ];

    /// Looks up a built-in by its template name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(Self::Bool),
            "int" => Some(Self::Int),
            "float64" | "float" => Some(Self::Float),
            "string" => Some(Self::String),
            "path" => Some(Self::Path),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float64",
            Self::String => "string",
            Self::Path => "path",
        }
    }

    pub fn default_value(&self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::Int => Value::Int(0),
            Self::Float => Value::Float(0.0),
            Self::String => Value::Str(String::new()),
            Self::Path => Value::Path(PathBuf::new()),
        }
    }

    pub fn convert(&self, input: &str) -> Result<Value, ConversionError> {
        match self {
            Self::Bool => parse_bool(input).map(Value::Bool),
            Self::Int => input
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| ConversionError::InvalidInt {
                    input: input.to_string(),
                    reason: e.to_string(),
                }),
            Self::Float => input
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| ConversionError::InvalidFloat {
                    input: input.to_string(),
                    reason: e.to_string(),
                }),
            Self::String => Ok(Value::Str(input.to_string())),
            Self::Path => absolute_path(input).map(Value::Path),
        }
    }
}

fn parse_bool(input: &str) -> Result<bool, ConversionError> {
    match input {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ConversionError::InvalidBool(input.to_string())),
    }
}

fn absolute_path(input: &str) -> Result<PathBuf, ConversionError> {
    std::path::absolute(Path::new(input)).map_err(|e| ConversionError::InvalidPath {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// The result of resolving a template type name.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAttributes {
    pub id: TypeId,
    /// Value used when an optional value is not supplied.
    pub default: Value,
}

/// Converts type names and raw argument text into typed values.
///
/// Only [`attributes`](ValueTypes::attributes) and
/// [`make_value`](ValueTypes::make_value) are required; the list operations
/// default to collecting converted values into a [`Value::List`].
pub trait ValueTypes: Send + Sync {
    /// Resolves a template type name, or `None` if the name is unknown.
    fn attributes(&self, type_name: &str) -> Option<TypeAttributes>;

    /// Converts one raw argument.
    fn make_value(&self, id: TypeId, input: &str) -> Result<Value, ConversionError>;

    /// Creates an empty list for a multi value.
    fn new_list(&self, _id: TypeId) -> Value {
        Value::List(Vec::new())
    }

    /// Converts `input` and appends it to `list`.
    fn append_list(&self, id: TypeId, list: Value, input: &str) -> Result<Value, ConversionError> {
        Ok(push_item(list, self.make_value(id, input)?))
    }
}

fn push_item(list: Value, item: Value) -> Value {
    let mut items = match list {
        Value::List(items) => items,
        other => vec![other],
    };
    items.push(item);
    Value::List(items)
}

/// Provider for `bool`, `int`, `float64`, `string` and `path`.
///
/// Unknown type names and [`TypeId::Custom`] ids are forwarded to the
/// delegate, when one is configured.
#[derive(Default)]
pub struct DefaultValueTypes {
    delegate: Option<Box<dyn ValueTypes>>,
}

impl DefaultValueTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider that forwards non-built-in types to `delegate`.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_template_core::{
    ///     ConversionError, DefaultValueTypes, TypeAttributes, TypeId, Value, ValueTypes,
    /// };
    ///
    /// struct Colors;
    ///
    /// impl ValueTypes for Colors {
    ///     fn attributes(&self, type_name: &str) -> Option<TypeAttributes> {
    ///         (type_name == "color").then(|| TypeAttributes {
    ///             id: TypeId::Custom(0),
    ///             default: Value::from("black"),
    ///         })
    ///     }
    ///
    ///     fn make_value(&self, _id: TypeId, input: &str) -> Result<Value, ConversionError> {
    ///         match input {
    ///             "red" | "green" | "blue" | "black" => Ok(Value::from(input)),
    ///             _ => Err(ConversionError::Rejected(format!("unknown color \"{input}\""))),
    ///         }
    ///     }
    /// }
    ///
    /// let types = DefaultValueTypes::with_delegate(Box::new(Colors));
    /// let color = types.attributes("color").unwrap();
    /// assert_eq!(types.make_value(color.id, "red").unwrap(), Value::from("red"));
    /// assert!(types.attributes("bool").is_some());
    /// ```
    pub fn with_delegate(delegate: Box<dyn ValueTypes>) -> Self {
        Self {
            delegate: Some(delegate),
        }
    }
}

impl fmt::Debug for DefaultValueTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultValueTypes")
            .field("delegate", &self.delegate.is_some())
            .finish()
    }
}

impl ValueTypes for DefaultValueTypes {
    fn attributes(&self, type_name: &str) -> Option<TypeAttributes> {
        match BuiltinType::from_name(type_name) {
            Some(builtin) => Some(TypeAttributes {
                id: TypeId::Builtin(builtin),
                default: builtin.default_value(),
            }),
            None => self.delegate.as_ref()?.attributes(type_name),
        }
    }

    fn make_value(&self, id: TypeId, input: &str) -> Result<Value, ConversionError> {
        match (id, &self.delegate) {
            (TypeId::Builtin(builtin), _) => builtin.convert(input),
            (TypeId::Custom(_), Some(delegate)) => delegate.make_value(id, input),
            (TypeId::Custom(_), None) => Err(ConversionError::UnknownType(id.to_string())),
        }
    }

    fn new_list(&self, id: TypeId) -> Value {
        match (id, &self.delegate) {
            (TypeId::Custom(_), Some(delegate)) => delegate.new_list(id),
            _ => Value::List(Vec::new()),
        }
    }

    fn append_list(&self, id: TypeId, list: Value, input: &str) -> Result<Value, ConversionError> {
        match (id, &self.delegate) {
            (TypeId::Custom(_), Some(delegate)) => delegate.append_list(id, list, input),
            _ => Ok(push_item(list, self.make_value(id, input)?)),
        }
    }
}
