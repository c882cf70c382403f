//! Command registration, dispatch and help for template-described command lines.
//!
//! A [`Registry`] holds commands and global options, each described by
//! templates from [`command_template_core`]. Processing a command line binds
//! its arguments to typed [`Values`] and runs the matching handlers; when
//! that fails, [`Registry::help_to`] renders help suited to what went wrong.
//!
//! # Example
//!
//! ```
//! use command_template_dispatch::Registry;
//!
//! let mut registry = Registry::new();
//! registry
//!     .register_command(
//!         |values, out| {
//!             let name = values.str("createUser").unwrap_or_default();
//!             writeln!(out, "created {name}")?;
//!             Ok(())
//!         },
//!         &[
//!             "users?Performs operations on a user",
//!             "[--create <string-createUser>]?Creates a user",
//!             "[--list]?List users",
//!         ],
//!     )
//!     .unwrap();
//!
//! let args: Vec<String> = vec!["users".into(), "--create".into(), "ada".into()];
//! let mut out = Vec::new();
//! registry.process_with_output(&args, &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "created ada\n");
//! ```

mod config;
mod error;
mod help;
mod process;
mod registry;

pub use config::{CommandTemplates, HelpLayout, TemplateSet};
pub use error::{ConfigError, DefinitionError, DefinitionReport, HandlerError, HelpError, ProcessError};
pub use registry::{into_handler, CommandSummary, Handler, Registry, RegistryBuilder, Summary};

pub use command_template_core::{Value, ValueTypes, Values};
