//! Error types for template compilation, value conversion and binding.
//!
//! Template errors are definition-time defects in the calling program. The
//! remaining types describe problems with the arguments a user typed and are
//! returned from binding so the dispatcher can decide how to report them.

use std::fmt;

use thiserror::Error;

/// The construct the template compiler was looking for when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    ValueSpec,
    CommaSeparatedList,
    UniformDelimiter,
    /// A `,` or space between two value specs.
    Separator,
    OpenAngle,
    TypeSeparator,
    CloseAngle,
    CloseBracket,
    ValueName,
    ArgumentName,
    ArgumentToken,
    RequiredPrimary,
    SingleValuePrimary,
    UnnamedWithoutColon,
    NamedOption,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ValueSpec => "value spec",
            Self::CommaSeparatedList => "comma-separated value spec list",
            Self::UniformDelimiter => "uniform value delimiter",
            Self::Separator => "value delimiter",
            Self::OpenAngle => "'<'",
            Self::TypeSeparator => "'-'",
            Self::CloseAngle => "'>'",
            Self::CloseBracket => "']'",
            Self::ValueName => "valid option name",
            Self::ArgumentName => "argument name",
            Self::ArgumentToken => "a valid argument token",
            Self::RequiredPrimary => "non-optional primary argument",
            Self::SingleValuePrimary => "single-value primary argument",
            Self::UnnamedWithoutColon => "unnamed argument without a value spec",
            Self::NamedOption => "named secondary argument",
        };
        f.write_str(text)
    }
}

/// A malformed command-line template.
///
/// These indicate a bug in the program registering the template, never a
/// problem with user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The template does not follow the grammar.
    #[error("command line template syntax error! expected {expected} {}", location(.template, .remainder))]
    Syntax {
        expected: Expected,
        template: String,
        /// Byte offset into `template` where parsing stopped.
        offset: usize,
        /// Unparsed text at `offset`, when it is not the whole template.
        remainder: Option<String>,
    },
    /// The value type name is not known to the value type provider.
    #[error("command line template syntax error! expected valid value type \"{type_name}\" in \"{template}\"")]
    UnknownType {
        type_name: String,
        template: String,
        offset: usize,
    },
    /// Two value specs in one template share a name.
    #[error("duplicate value spec \"{name}\" in \"{template}\"")]
    DuplicateValue { name: String, template: String },
}

impl TemplateError {
    /// Returns the full template text the error refers to.
    pub fn template(&self) -> &str {
        match self {
            Self::Syntax { template, .. }
            | Self::UnknownType { template, .. }
            | Self::DuplicateValue { template, .. } => template,
        }
    }
}

fn location(template: &str, remainder: &Option<String>) -> String {
    match remainder {
        Some(rest) if !rest.is_empty() && rest != template => {
            format!("at \"{rest}\" of \"{template}\"")
        }
        _ => format!("in \"{template}\""),
    }
}

/// A raw argument string could not be converted to a typed value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("invalid boolean value \"{0}\"")]
    InvalidBool(String),
    #[error("invalid integer value \"{input}\": {reason}")]
    InvalidInt { input: String, reason: String },
    #[error("invalid number value \"{input}\": {reason}")]
    InvalidFloat { input: String, reason: String },
    #[error("invalid path \"{input}\": {reason}")]
    InvalidPath { input: String, reason: String },
    /// The type identifier is not handled by any provider.
    #[error("unsupported value type {0}")]
    UnknownType(String),
    /// A custom provider rejected the input.
    #[error("{0}")]
    Rejected(String),
}

/// A command-line usage problem: the arguments do not fit the templates.
///
/// Callers typically pair this error with rendered help text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandLineError {
    #[error("a command is required")]
    CommandRequired,
    #[error("unrecognized command: {0}")]
    UnrecognizedCommand(String),
    #[error("unrecognized command argument: {0}")]
    UnrecognizedArgument(String),
    #[error("unexpected command argument: {0}")]
    UnexpectedArgument(String),
    #[error("required value {0} is missing")]
    MissingValue(String),
    #[error("arguments required: {}", .0.join(", "))]
    MissingOptions(Vec<String>),
}

/// Failure while binding arguments to one [`ArgSpec`](crate::ArgSpec).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error(transparent)]
    Usage(#[from] CommandLineError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_without_remainder_names_template() {
        let err = TemplateError::Syntax {
            expected: Expected::ValueSpec,
            template: "test:".to_string(),
            offset: 5,
            remainder: None,
        };
        assert_eq!(
            err.to_string(),
            "command line template syntax error! expected value spec in \"test:\""
        );
    }

    #[test]
    fn test_syntax_error_with_remainder_points_at_it() {
        let err = TemplateError::Syntax {
            expected: Expected::CloseAngle,
            template: "test:<string-value".to_string(),
            offset: 13,
            remainder: Some("value".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "command line template syntax error! expected '>' at \"value\" of \"test:<string-value\""
        );
    }

    #[test]
    fn test_missing_options_lists_keys_in_order() {
        let err = CommandLineError::MissingOptions(vec!["--b".into(), "--a".into()]);
        assert_eq!(err.to_string(), "arguments required: --b, --a");
    }
}
