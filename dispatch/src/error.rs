//! Error types for registration, dispatch, help and configuration.

use std::fmt;
use std::io;

use command_template_core::{BindError, CommandLineError, ConversionError, TemplateError};
use thiserror::Error;

/// Error returned by a command or global option handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// A registration was rejected. The registry is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// One of the templates failed to compile.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A key or value name collides with one already in use.
    #[error("command line template syntax error! expected unique argument \"{0}\"")]
    DuplicateName(String),

    /// A command was registered without any template.
    #[error("argument error: a primary template is required")]
    MissingPrimary,
}

/// Every definition error collected by a [`RegistryBuilder`](crate::RegistryBuilder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionReport {
    pub errors: Vec<DefinitionError>,
}

impl fmt::Display for DefinitionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.len() {
            1 => write!(f, "1 definition error")?,
            n => write!(f, "{n} definition errors")?,
        }
        for err in &self.errors {
            write!(f, "\n  {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for DefinitionReport {}

/// Failure while processing a command line.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The arguments do not match the registered templates.
    #[error(transparent)]
    Usage(#[from] CommandLineError),

    /// An argument value could not be converted to its declared type.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// A handler returned an error; its message is passed through unchanged.
    #[error("{0}")]
    Handler(HandlerError),

    /// The registry has no commands to dispatch to.
    #[error("no commands are registered")]
    NoCommands,

    /// Writing handler output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ProcessError {
    /// Returns `true` for errors that warrant showing usage help.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}

impl From<BindError> for ProcessError {
    fn from(err: BindError) -> Self {
        match err {
            BindError::Usage(e) => Self::Usage(e),
            BindError::Conversion(e) => Self::Conversion(e),
        }
    }
}

/// Help could not be produced for a single command.
#[derive(Debug, Error)]
pub enum HelpError {
    #[error("unnamed command not found")]
    UnnamedNotFound,

    #[error("command \"{0}\" not found")]
    NotFound(String),

    #[error("help not available for the unnamed command")]
    UnnamedNoHelp,

    #[error("help not available for the \"{0}\" command")]
    NoHelp(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors loading or saving template sets and help layouts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension is neither YAML nor JSON.
    #[error("unsupported definition file format: {0}")]
    UnsupportedFormat(String),
}
