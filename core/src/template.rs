//! Template compiler.
//!
//! Turns one template string such as `"*[-t:<string-tflag>]?Adds a tag"` into
//! an [`ArgSpec`]. The grammar, left to right:
//!
//! ```text
//! template  := ["*"] ( "[" body "]" | body ) ["?" helptext]
//! body      := key [ (":" | " ") valuelist ]
//! valuelist := valuespec (sep valuespec)*
//! valuespec := "[" "*"? "<" type "-" name ">" "]" | "*"? "<" type "-" name ">"
//! sep       := "," | " "
//! ```
//!
//! Help text starts after the last `?`. A key written as `-x[:...]` makes the
//! first value optional. The separator between values must be the same
//! throughout one template, and a colon-introduced list must use commas.

use std::collections::HashSet;
use std::fmt;

use tracing::trace;

use crate::error::{Expected, TemplateError};
use crate::types::{TypeId, ValueTypes};
use crate::value::Value;

/// Key of the unnamed primary argument.
pub const UNNAMED_KEY: &str = "~";

/// Whether a template describes a command's primary argument or an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgRole {
    Primary,
    Option,
}

/// How the key is separated from its first value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuesDelimiter {
    /// `-x:<value>`: the values arrive in the same argument.
    Colon,
    /// `-x <value>`: the values arrive in the following arguments.
    Space,
}

impl ValuesDelimiter {
    pub fn as_char(&self) -> char {
        match self {
            Self::Colon => ':',
            Self::Space => ' ',
        }
    }
}

/// How consecutive values are separated from each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueDelimiter {
    Comma,
    Space,
}

impl ValueDelimiter {
    pub fn as_char(&self) -> char {
        match self {
            Self::Comma => ',',
            Self::Space => ' ',
        }
    }
}

/// One named, typed value inside an [`ArgSpec`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    pub(crate) name: String,
    pub(crate) type_name: String,
    pub(crate) type_id: TypeId,
    pub(crate) optional: bool,
    pub(crate) multi: bool,
    pub(crate) default: Value,
}

impl ValueSpec {
    /// Key under which the bound value is stored.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether the value absorbs every remaining argument into a list.
    pub fn is_multi(&self) -> bool {
        self.multi
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }
}

/// A compiled primary argument or option template.
///
/// `Display` renders the help form (types elided); [`ArgSpec::template`]
/// renders a source form that compiles back to an equal `ArgSpec`.
///
/// # Examples
///
/// ```
/// use command_template_core::{compile, ArgRole, DefaultValueTypes};
///
/// let types = DefaultValueTypes::new();
/// let spec = compile("-x[:<bool-v1>][,<bool-v2>]?Sets flags", ArgRole::Option, &types).unwrap();
///
/// assert_eq!(spec.key(), "-x");
/// assert_eq!(spec.help(), "Sets flags");
/// assert_eq!(spec.to_string(), "-x[:<v1>[,<v2>]]");
/// assert_eq!(spec.template(), "-x[:<bool-v1>][,<bool-v2>]?Sets flags");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ArgSpec {
    pub(crate) key: String,
    pub(crate) unnamed: bool,
    pub(crate) optional: bool,
    pub(crate) repeatable: bool,
    pub(crate) values_delimiter: Option<ValuesDelimiter>,
    pub(crate) value_delimiter: Option<ValueDelimiter>,
    pub(crate) values: Vec<ValueSpec>,
    pub(crate) help: String,
}

impl ArgSpec {
    /// The literal token, or `~` for the unnamed primary argument.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_unnamed(&self) -> bool {
        self.unnamed
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether the whole argument may be given more than once.
    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    pub fn values_delimiter(&self) -> Option<ValuesDelimiter> {
        self.values_delimiter
    }

    pub fn value_delimiter(&self) -> Option<ValueDelimiter> {
        self.value_delimiter
    }

    pub fn values(&self) -> &[ValueSpec] {
        &self.values
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Renders the template source, including type names and help text.
    ///
    /// Compiling the result gives back an equal spec unless the help text
    /// contains `?`; the compiler splits help off at the last `?`.
    pub fn template(&self) -> String {
        let mut out = String::new();
        if self.repeatable {
            out.push('*');
        }
        if self.optional {
            out.push('[');
        }
        out.push_str(&self.key);

        for (i, value) in self.values.iter().enumerate() {
            let delimiter = self.delimiter_before(i);
            match (value.optional, delimiter) {
                (true, ' ') => out.push_str(" ["),
                (true, c) => {
                    out.push('[');
                    out.push(c);
                }
                (false, c) => out.push(c),
            }
            if value.multi {
                out.push('*');
            }
            out.push('<');
            out.push_str(&value.type_name);
            out.push('-');
            out.push_str(&value.name);
            out.push('>');
            if value.optional {
                out.push(']');
            }
        }

        if self.optional {
            out.push(']');
        }
        if !self.help.is_empty() {
            out.push('?');
            out.push_str(&self.help);
        }
        out
    }

    fn delimiter_before(&self, index: usize) -> char {
        if index == 0 {
            self.values_delimiter.map_or(' ', |d| d.as_char())
        } else {
            self.value_delimiter.map_or(' ', |d| d.as_char())
        }
    }
}

impl fmt::Display for ArgSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.repeatable {
            f.write_str("*")?;
        }
        if self.optional {
            f.write_str("[")?;
        }
        if !self.unnamed {
            f.write_str(&self.key)?;
        }

        let mut open_values = 0;
        for (i, value) in self.values.iter().enumerate() {
            let mut prefix = String::new();
            if value.optional {
                prefix.push('[');
                open_values += 1;
            }
            if i > 0 || !self.unnamed {
                prefix.push(self.delimiter_before(i));
            }
            if prefix == "[ " {
                prefix = " [".to_string();
            }
            f.write_str(&prefix)?;
            if value.multi {
                f.write_str("*")?;
            }
            write!(f, "<{}>", value.name)?;
        }

        for _ in 0..open_values {
            f.write_str("]")?;
        }
        if self.optional {
            f.write_str("]")?;
        }
        Ok(())
    }
}

/// Compiles one template.
///
/// Type names are resolved through `types`; an unknown name is an error.
///
/// # Errors
///
/// Returns a [`TemplateError`] describing the construct that was expected and
/// where parsing stopped.
///
/// # Examples
///
/// ```
/// use command_template_core::{compile, ArgRole, DefaultValueTypes, TemplateError};
///
/// let types = DefaultValueTypes::new();
/// let spec = compile("test:<string-flag1>,<string-flag2>", ArgRole::Primary, &types).unwrap();
/// assert_eq!(spec.values().len(), 2);
///
/// let err = compile("test:<string-value", ArgRole::Primary, &types).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "command line template syntax error! expected '>' at \"value\" of \"test:<string-value\""
/// );
/// ```
pub fn compile(
    template: &str,
    role: ArgRole,
    types: &dyn ValueTypes,
) -> Result<ArgSpec, TemplateError> {
    let spec = Compiler { template, types }.compile(role)?;
    trace!(template, key = %spec.key, values = spec.values.len(), "Compiled template");
    Ok(spec)
}

/// Explicit read position over a slice of the template text.
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
    end: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<char> {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.text[self.pos..self.end].chars().nth(n)
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Absolute offset of the next `c` at or after the cursor.
    fn find(&self, c: char) -> Option<usize> {
        self.text[self.pos..self.end].find(c).map(|i| self.pos + i)
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..self.end]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.end
    }
}

struct Compiler<'a> {
    template: &'a str,
    types: &'a dyn ValueTypes,
}

impl<'a> Compiler<'a> {
    fn compile(&self, role: ArgRole) -> Result<ArgSpec, TemplateError> {
        let template = self.template;
        let (body, help) = match template.rfind('?') {
            Some(cut) => (&template[..cut], &template[cut + 1..]),
            None => (template, ""),
        };

        let mut start = 0;
        let mut end = body.len();

        let repeatable = body.starts_with('*');
        if repeatable {
            start += 1;
        }

        let inner = &body[start..end];
        let optional = inner.len() >= 2 && inner.starts_with('[') && inner.ends_with(']');
        if optional {
            start += 1;
            end -= 1;
        }

        let section = &body[start..end];
        let (key, values_delimiter, first_optional, values_start) =
            match section.find([':', ' ']) {
                None => (section, None, false, end),
                Some(d) => {
                    let delimiter = if section.as_bytes()[d] == b':' {
                        ValuesDelimiter::Colon
                    } else {
                        ValuesDelimiter::Space
                    };
                    let key = &section[..d];
                    match key.strip_suffix('[') {
                        Some(trimmed) => (trimmed, Some(delimiter), true, start + d + 1),
                        None => (key, Some(delimiter), false, start + d + 1),
                    }
                }
            };

        if key.is_empty() {
            return Err(self.error_in(Expected::ArgumentName));
        }

        let unnamed = key == UNNAMED_KEY;
        let bare_key = key.strip_prefix('-').unwrap_or(key);
        let bare_key = bare_key.strip_prefix('-').unwrap_or(bare_key);
        if !unnamed && !is_key_token(bare_key) {
            return Err(self.error_in(Expected::ArgumentToken));
        }

        match role {
            ArgRole::Primary => {
                if optional {
                    return Err(self.error_in(Expected::RequiredPrimary));
                }
                if repeatable {
                    return Err(self.error_in(Expected::SingleValuePrimary));
                }
                if unnamed && values_delimiter == Some(ValuesDelimiter::Colon) {
                    return Err(self.error_in(Expected::UnnamedWithoutColon));
                }
            }
            ArgRole::Option => {
                if unnamed {
                    return Err(self.error_in(Expected::NamedOption));
                }
            }
        }

        let mut spec = ArgSpec {
            key: key.to_string(),
            unnamed,
            optional,
            repeatable,
            values_delimiter,
            value_delimiter: None,
            values: Vec::new(),
            help: help.to_string(),
        };

        if values_delimiter.is_some() {
            let mut cursor = Cursor {
                text: body,
                pos: values_start,
                end,
            };
            if cursor.at_end() {
                return Err(self.error_at(Expected::ValueSpec, &cursor));
            }
            self.parse_values(&mut spec, &mut cursor, first_optional)?;
        }

        Ok(spec)
    }

    fn parse_values(
        &self,
        spec: &mut ArgSpec,
        cursor: &mut Cursor<'_>,
        first_optional: bool,
    ) -> Result<(), TemplateError> {
        let mut names = HashSet::new();
        let mut optional_pending = first_optional;

        while !cursor.at_end() {
            let mut optional = std::mem::take(&mut optional_pending);
            let has_values = !spec.values.is_empty();

            if cursor.eat('[') {
                optional = true;
                if has_values {
                    self.separator(spec, cursor)?;
                }
            } else if has_values {
                if cursor.peek() == Some(' ') && cursor.peek_nth(1) == Some('[') {
                    optional = true;
                    self.separator(spec, cursor)?;
                    cursor.bump();
                } else {
                    self.separator(spec, cursor)?;
                }
            }

            let multi = cursor.eat('*');
            if !cursor.eat('<') {
                return Err(self.error_at(Expected::OpenAngle, cursor));
            }

            let type_start = cursor.pos;
            let close = cursor.find('>');
            let Some(dash) = cursor
                .find('-')
                .filter(|&dash| close.is_none_or(|close| dash < close))
            else {
                return Err(self.error_at(Expected::TypeSeparator, cursor));
            };
            let type_name = &cursor.text[type_start..dash];
            let Some(attributes) = self.types.attributes(type_name) else {
                return Err(TemplateError::UnknownType {
                    type_name: type_name.to_string(),
                    template: self.template.to_string(),
                    offset: type_start,
                });
            };
            cursor.pos = dash + 1;

            let Some(close) = cursor.find('>') else {
                return Err(self.error_at(Expected::CloseAngle, cursor));
            };
            let name = &cursor.text[cursor.pos..close];
            if !is_value_name(name) {
                return Err(self.error_at(Expected::ValueName, cursor));
            }
            cursor.pos = close + 1;

            if optional && !cursor.eat(']') {
                return Err(self.error_at(Expected::CloseBracket, cursor));
            }

            if !names.insert(name) {
                return Err(TemplateError::DuplicateValue {
                    name: name.to_string(),
                    template: self.template.to_string(),
                });
            }

            let default = if multi || spec.repeatable {
                self.types.new_list(attributes.id)
            } else {
                attributes.default
            };

            spec.values.push(ValueSpec {
                name: name.to_string(),
                type_name: type_name.to_string(),
                type_id: attributes.id,
                optional,
                multi,
                default,
            });
        }

        Ok(())
    }

    /// Consumes the separator in front of a second or later value.
    fn separator(&self, spec: &mut ArgSpec, cursor: &mut Cursor<'_>) -> Result<(), TemplateError> {
        let delimiter = match cursor.peek() {
            Some(',') => ValueDelimiter::Comma,
            Some(' ') => ValueDelimiter::Space,
            _ => return Err(self.error_at(Expected::Separator, cursor)),
        };

        match spec.value_delimiter {
            None => {
                if delimiter == ValueDelimiter::Space
                    && spec.values_delimiter == Some(ValuesDelimiter::Colon)
                {
                    return Err(self.error_at(Expected::CommaSeparatedList, cursor));
                }
                spec.value_delimiter = Some(delimiter);
            }
            Some(existing) if existing != delimiter => {
                return Err(self.error_at(Expected::UniformDelimiter, cursor));
            }
            Some(_) => {}
        }

        cursor.bump();
        Ok(())
    }

    fn error_in(&self, expected: Expected) -> TemplateError {
        TemplateError::Syntax {
            expected,
            template: self.template.to_string(),
            offset: 0,
            remainder: None,
        }
    }

    fn error_at(&self, expected: Expected, cursor: &Cursor<'_>) -> TemplateError {
        let rest = cursor.rest();
        TemplateError::Syntax {
            expected,
            template: self.template.to_string(),
            offset: cursor.pos,
            remainder: (!rest.is_empty()).then(|| rest.to_string()),
        }
    }
}

/// Identifier: a letter or `_`, then letters, digits or `_`.
fn is_value_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Like [`is_value_name`], but also allows inner dashes (`my-option`).
fn is_key_token(s: &str) -> bool {
    if s.ends_with('-') {
        return false;
    }
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BuiltinType, DefaultValueTypes};

    fn primary(template: &str) -> Result<ArgSpec, TemplateError> {
        compile(template, ArgRole::Primary, &DefaultValueTypes::new())
    }

    fn option(template: &str) -> Result<ArgSpec, TemplateError> {
        compile(template, ArgRole::Option, &DefaultValueTypes::new())
    }

    fn message(result: Result<ArgSpec, TemplateError>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn test_compile_plain_key() {
        let spec = primary("test?Runs the test").unwrap();
        assert_eq!(spec.key(), "test");
        assert_eq!(spec.help(), "Runs the test");
        assert!(spec.values().is_empty());
        assert_eq!(spec.values_delimiter(), None);
        assert!(!spec.is_unnamed());
    }

    #[test]
    fn test_compile_colon_comma_values() {
        let spec = primary("test:<string-flag1>,<int-flag2>").unwrap();
        assert_eq!(spec.values_delimiter(), Some(ValuesDelimiter::Colon));
        assert_eq!(spec.value_delimiter(), Some(ValueDelimiter::Comma));
        let names: Vec<_> = spec.values().iter().map(ValueSpec::name).collect();
        assert_eq!(names, ["flag1", "flag2"]);
        assert_eq!(
            spec.values()[1].type_id(),
            TypeId::Builtin(BuiltinType::Int)
        );
        assert_eq!(spec.values()[1].default_value(), &Value::Int(0));
    }

    #[test]
    fn test_compile_optional_repeatable_option() {
        let spec = option("*[-t:<string-tflag>]?Adds a tag").unwrap();
        assert!(spec.is_repeatable());
        assert!(spec.is_optional());
        assert_eq!(spec.key(), "-t");
        assert_eq!(spec.values()[0].default_value(), &Value::List(vec![]));
        assert_eq!(spec.to_string(), "*[-t:<tflag>]");
    }

    #[test]
    fn test_key_bracket_makes_first_value_optional() {
        let spec = option("-x[:<bool-v1>][,<bool-v2>]").unwrap();
        assert_eq!(spec.key(), "-x");
        assert!(spec.values().iter().all(ValueSpec::is_optional));
        assert_eq!(spec.to_string(), "-x[:<v1>[,<v2>]]");
    }

    #[test]
    fn test_space_separated_values_with_optional_tail() {
        let spec = option("-t <string-a> [<string-b>] [*<string-rest>]").unwrap();
        assert_eq!(spec.values_delimiter(), Some(ValuesDelimiter::Space));
        assert_eq!(spec.value_delimiter(), Some(ValueDelimiter::Space));
        let flags: Vec<_> = spec
            .values()
            .iter()
            .map(|v| (v.is_optional(), v.is_multi()))
            .collect();
        assert_eq!(flags, [(false, false), (true, false), (true, true)]);
        assert_eq!(spec.to_string(), "-t <a> [<b> [*<rest>]]");
    }

    #[test]
    fn test_unnamed_primary_with_space_values() {
        let spec = primary("~ <string-val> <string-val2>?Test").unwrap();
        assert!(spec.is_unnamed());
        assert_eq!(spec.to_string(), "<val> <val2>");

        let spec = primary("~ <string-val>,<string-val2>").unwrap();
        assert_eq!(spec.to_string(), "<val>,<val2>");

        let spec = primary("~").unwrap();
        assert_eq!(spec.to_string(), "");
    }

    #[test]
    fn test_help_cut_at_last_question_mark() {
        let spec = primary("test?").unwrap();
        assert_eq!(spec.help(), "");
        assert_eq!(spec.key(), "test");

        let mut spec = primary("test?Why").unwrap();
        spec.help = "Why? Because".into();
        assert_eq!(spec.template(), "test?Why? Because");
        assert_ne!(primary(&spec.template()).ok(), Some(spec));
    }

    #[test]
    fn test_option_key_with_inner_dash() {
        let spec = option("--my-option <string-opt>").unwrap();
        assert_eq!(spec.key(), "--my-option");
        assert!(option("--trailing- <string-opt>").is_err());
    }

    #[test]
    fn test_template_round_trip() {
        let templates = [
            "test",
            "~",
            "~ <string-val> [<int-count>]",
            "test:<string-flag1>,<string-flag2>?Two flags",
            "-x[:<bool-v1>][,<bool-v2>]",
            "*[-t:<string-tflag>]?Repeatable tag",
            "[-t [<string-val>]]",
            "-f <path-input> *<path-more>",
            "[--list]?List users",
        ];
        for template in templates {
            let role = if template.starts_with('-')
                || template.starts_with('[')
                || template.starts_with('*')
            {
                ArgRole::Option
            } else {
                ArgRole::Primary
            };
            let types = DefaultValueTypes::new();
            let spec = compile(template, role, &types).unwrap();
            let again = compile(&spec.template(), role, &types).unwrap();
            assert_eq!(spec, again, "round trip of {template:?} via {:?}", spec.template());
        }
    }

    #[test]
    fn test_missing_value_spec() {
        assert_eq!(
            message(primary("test:")),
            "command line template syntax error! expected value spec in \"test:\""
        );
        assert_eq!(
            message(primary("test ")),
            "command line template syntax error! expected value spec in \"test \""
        );
    }

    #[test]
    fn test_invalid_argument_token() {
        assert_eq!(
            message(primary("test$")),
            "command line template syntax error! expected a valid argument token in \"test$\""
        );
        assert_eq!(
            message(primary("test<string-value>")),
            "command line template syntax error! expected a valid argument token in \"test<string-value>\""
        );
    }

    #[test]
    fn test_unknown_type_name() {
        let err = primary("test:<strings-value>").unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnknownType {
                type_name: "strings".to_string(),
                template: "test:<strings-value>".to_string(),
                offset: 6,
            }
        );
    }

    #[test]
    fn test_value_spec_syntax_errors() {
        assert_eq!(
            message(primary("test:<string-value$>")),
            "command line template syntax error! expected valid option name at \"value$>\" of \"test:<string-value$>\""
        );
        assert_eq!(
            message(primary("test:string-value")),
            "command line template syntax error! expected '<' at \"string-value\" of \"test:string-value\""
        );
        assert_eq!(
            message(primary("test:<string=value>")),
            "command line template syntax error! expected '-' at \"string=value>\" of \"test:<string=value>\""
        );
        assert_eq!(
            message(primary("test:<string>,<int-x>")),
            "command line template syntax error! expected '-' at \"string>,<int-x>\" of \"test:<string>,<int-x>\""
        );
        assert_eq!(
            message(primary("test:<string-value")),
            "command line template syntax error! expected '>' at \"value\" of \"test:<string-value\""
        );
        assert_eq!(
            message(primary("test:[<string-value>")),
            "command line template syntax error! expected ']' in \"test:[<string-value>\""
        );
    }

    #[test]
    fn test_duplicate_value_names() {
        assert_eq!(
            message(primary("test:<string-dup>,<string-dup>")),
            "duplicate value spec \"dup\" in \"test:<string-dup>,<string-dup>\""
        );
    }

    #[test]
    fn test_mixed_delimiters_rejected() {
        let err = option("-t <string-a>,<string-b> <string-c>").unwrap_err();
        assert!(matches!(
            err,
            TemplateError::Syntax {
                expected: Expected::UniformDelimiter,
                ..
            }
        ));

        let err = option("-t:<string-a> <string-b>").unwrap_err();
        assert!(matches!(
            err,
            TemplateError::Syntax {
                expected: Expected::CommaSeparatedList,
                ..
            }
        ));

        let err = option("-t:<string-a><string-b>").unwrap_err();
        assert!(matches!(
            err,
            TemplateError::Syntax {
                expected: Expected::Separator,
                ..
            }
        ));
    }

    #[test]
    fn test_primary_restrictions() {
        for (template, expected) in [
            ("[test]", Expected::RequiredPrimary),
            ("*test", Expected::SingleValuePrimary),
            ("~:<string-test>", Expected::UnnamedWithoutColon),
            ("~:*<string-test>", Expected::UnnamedWithoutColon),
            ("~:[<string-test>]", Expected::UnnamedWithoutColon),
        ] {
            match primary(template) {
                Err(TemplateError::Syntax { expected: got, .. }) => {
                    assert_eq!(got, expected, "{template}")
                }
                other => panic!("unexpected result for {template}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_option_may_not_be_unnamed() {
        assert_eq!(
            message(option("~")),
            "command line template syntax error! expected named secondary argument in \"~\""
        );
    }

    #[test]
    fn test_empty_key() {
        assert_eq!(
            message(option(":<string-a>")),
            "command line template syntax error! expected argument name in \":<string-a>\""
        );
    }
}
