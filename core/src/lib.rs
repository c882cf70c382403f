//! Command-line templates: compile, type and bind.
//!
//! A template is a compact string describing one command-line argument,
//! for example `"*[-t:<string-tag>]?Adds a tag"`:
//!
//! - [`compile`] turns a template into an [`ArgSpec`], resolving value type
//!   names through a [`ValueTypes`] provider such as [`DefaultValueTypes`].
//! - [`ArgSpec::bind`] matches raw arguments against a spec and stores typed
//!   [`Value`]s into a [`Values`] map.
//! - `Display` on [`ArgSpec`] renders the help form; [`ArgSpec::template`]
//!   renders the source form.
//!
//! Registering templates as commands and dispatching a whole argument list
//! lives in the `command-template-dispatch` crate.
//!
//! # Example
//!
//! ```
//! use command_template_core::*;
//!
//! let types = DefaultValueTypes::new();
//! let spec = compile("-n:<int-count>,<string-label>?Sets a count", ArgRole::Option, &types).unwrap();
//! assert_eq!(spec.to_string(), "-n:<count>,<label>");
//!
//! let mut values = Values::new();
//! let (key, inline) = split_switch("-n:3,apples");
//! assert_eq!(key, spec.key());
//! spec.bind(&types, &mut values, inline, &[]).unwrap();
//!
//! assert!(values.flag("-n"));
//! assert_eq!(values.int("count"), Some(3));
//! assert_eq!(values.str("label"), Some("apples"));
//! ```

mod bind;
mod error;
mod template;
mod types;
mod value;

pub use bind::{is_bare, split_switch};
pub use error::{BindError, CommandLineError, ConversionError, Expected, TemplateError};
pub use template::{
    compile, ArgRole, ArgSpec, ValueDelimiter, ValueSpec, ValuesDelimiter, UNNAMED_KEY,
};
pub use types::{BuiltinType, DefaultValueTypes, TypeAttributes, TypeId, ValueTypes};
pub use value::{Value, Values};
