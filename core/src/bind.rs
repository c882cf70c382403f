//! Binding raw arguments to one compiled [`ArgSpec`].

use tracing::trace;

use crate::error::{BindError, CommandLineError};
use crate::template::{ArgSpec, ValueDelimiter, ValueSpec, ValuesDelimiter};
use crate::types::ValueTypes;
use crate::value::{Value, Values};

/// Splits `-x:value` into its key and inline value.
///
/// ```
/// use command_template_core::split_switch;
///
/// assert_eq!(split_switch("-x:a,b"), ("-x", Some("a,b")));
/// assert_eq!(split_switch("-x"), ("-x", None));
/// assert_eq!(split_switch("-x:"), ("-x", Some("")));
/// ```
pub fn split_switch(arg: &str) -> (&str, Option<&str>) {
    match arg.split_once(':') {
        Some((key, value)) => (key, Some(value)),
        None => (arg, None),
    }
}

/// A token that does not start with `-` and so can serve as a value.
pub fn is_bare(token: &str) -> bool {
    !token.starts_with('-')
}

impl ArgSpec {
    /// Binds this spec's values into `values`.
    ///
    /// `inline` is the text after the key's colon, if the argument had one;
    /// `following` are the arguments after the key. Returns how many of the
    /// `following` arguments were consumed.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_template_core::{compile, ArgRole, DefaultValueTypes, Values};
    ///
    /// let types = DefaultValueTypes::new();
    /// let spec = compile("-t <string-a> *<string-rest>", ArgRole::Option, &types).unwrap();
    ///
    /// let following: Vec<String> = ["x", "y", "z", "-q"].map(String::from).into();
    /// let mut values = Values::new();
    /// let used = spec.bind(&types, &mut values, None, &following).unwrap();
    ///
    /// assert_eq!(used, 3);
    /// assert!(values.flag("-t"));
    /// assert_eq!(values.str("a"), Some("x"));
    /// assert_eq!(values.list("rest").map(|l| l.len()), Some(2));
    /// ```
    pub fn bind(
        &self,
        types: &dyn ValueTypes,
        values: &mut Values,
        inline: Option<&str>,
        following: &[String],
    ) -> Result<usize, BindError> {
        let space_values = self.values_delimiter == Some(ValuesDelimiter::Space);

        let mut used = 0;
        let mut source = inline;
        if source.is_none() && space_values {
            if let Some(next) = following.first().filter(|t| is_bare(t)) {
                source = Some(next.as_str());
                used = 1;
            }
        }

        let Some(source) = source else {
            if let Some(first) = self.values.first() {
                if !first.optional {
                    return Err(CommandLineError::MissingValue(first.name.clone()).into());
                }
            }
            for spec in &self.values {
                if !values.contains(&spec.name) {
                    values.insert(spec.name.clone(), spec.default.clone());
                }
            }
            values.insert(self.key.clone(), true);
            trace!(key = %self.key, "Bound argument without values");
            return Ok(0);
        };

        match self.values.as_slice() {
            [] => {
                return Err(CommandLineError::UnexpectedArgument(source.to_string()).into());
            }
            [single] => {
                self.store(types, values, single, source)?;
                if single.multi && space_values {
                    while let Some(next) = following.get(used).filter(|t| is_bare(t)) {
                        self.store(types, values, single, next)?;
                        used += 1;
                    }
                }
            }
            _ if self.value_delimiter == Some(ValueDelimiter::Space) => {
                used = self.bind_each_token(types, values, inline, following)?;
            }
            _ => self.bind_comma_pieces(types, values, source)?,
        }

        values.insert(self.key.clone(), true);
        trace!(key = %self.key, consumed = used, "Bound argument");
        Ok(used)
    }

    /// Fills in `false` for an absent key and defaults for absent values.
    pub fn fill_defaults(&self, values: &mut Values) {
        if !values.contains(&self.key) {
            values.insert(self.key.clone(), false);
        }
        for spec in &self.values {
            if !values.contains(&spec.name) {
                values.insert(spec.name.clone(), spec.default.clone());
            }
        }
    }

    /// Space-separated values: one argument per spec, a multi spec takes the rest.
    fn bind_each_token<'a>(
        &self,
        types: &dyn ValueTypes,
        values: &mut Values,
        inline: Option<&'a str>,
        following: &'a [String],
    ) -> Result<usize, BindError> {
        let mut used = 0;
        let mut pending = inline;
        let mut groups: Vec<Vec<&'a str>> = Vec::new();

        for spec in &self.values {
            let first = match pending.take() {
                Some(value) => value,
                None => match following.get(used).filter(|t| is_bare(t)) {
                    Some(token) => {
                        used += 1;
                        token.as_str()
                    }
                    None => break,
                },
            };
            let mut group = vec![first];
            if spec.multi {
                while let Some(token) = following.get(used).filter(|t| is_bare(t)) {
                    group.push(token.as_str());
                    used += 1;
                }
            }
            groups.push(group);
        }

        for (i, spec) in self.values.iter().enumerate() {
            match groups.get(i) {
                Some(group) => {
                    for input in group {
                        self.store(types, values, spec, input)?;
                    }
                }
                None if spec.optional => break,
                None => return Err(CommandLineError::MissingValue(spec.name.clone()).into()),
            }
        }

        Ok(used)
    }

    /// Comma-separated values; missing trailing values reuse the last piece.
    fn bind_comma_pieces(
        &self,
        types: &dyn ValueTypes,
        values: &mut Values,
        source: &str,
    ) -> Result<(), BindError> {
        let pieces: Vec<&str> = source.split(',').collect();
        let last = pieces.last().copied().unwrap_or(source);

        let mut next = 0;
        for spec in &self.values {
            if next >= pieces.len() {
                self.store(types, values, spec, last)?;
            } else if spec.multi {
                for piece in &pieces[next..] {
                    self.store(types, values, spec, piece)?;
                }
                next = pieces.len();
            } else {
                self.store(types, values, spec, pieces[next])?;
                next += 1;
            }
        }
        Ok(())
    }

    fn store(
        &self,
        types: &dyn ValueTypes,
        values: &mut Values,
        spec: &ValueSpec,
        input: &str,
    ) -> Result<(), BindError> {
        let value = if self.repeatable || spec.multi {
            let list = match values.take(&spec.name) {
                Some(list @ Value::List(_)) => list,
                _ => types.new_list(spec.type_id),
            };
            types.append_list(spec.type_id, list, input)?
        } else {
            types.make_value(spec.type_id, input)?
        };
        values.insert(spec.name.clone(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionError;
    use crate::template::{compile, ArgRole};
    use crate::types::DefaultValueTypes;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn bind(
        template: &str,
        inline: Option<&str>,
        following: &[&str],
    ) -> (Result<usize, BindError>, Values) {
        let types = DefaultValueTypes::new();
        let spec = compile(template, ArgRole::Option, &types).unwrap();
        let mut values = Values::new();
        let result = spec.bind(&types, &mut values, inline, &args(following));
        (result, values)
    }

    #[test]
    fn test_inline_value_takes_priority() {
        let (result, values) = bind("-t <string-val>", Some("inline"), &["next"]);
        assert_eq!(result, Ok(0));
        assert_eq!(values.str("val"), Some("inline"));
        assert!(values.flag("-t"));
    }

    #[test]
    fn test_space_delimiter_takes_next_bare_token() {
        let (result, values) = bind("-t <string-val>", None, &["next", "more"]);
        assert_eq!(result, Ok(1));
        assert_eq!(values.str("val"), Some("next"));

        let (result, _) = bind("-t <string-val>", None, &["-u"]);
        assert_eq!(
            result,
            Err(BindError::Usage(CommandLineError::MissingValue("val".into())))
        );
    }

    #[test]
    fn test_optional_first_value_gets_defaults() {
        let (result, values) = bind("-x[:<bool-v1>][,<int-v2>]", None, &[]);
        assert_eq!(result, Ok(0));
        assert!(values.flag("-x"));
        assert_eq!(values.get("v1"), Some(&Value::Bool(false)));
        assert_eq!(values.get("v2"), Some(&Value::Int(0)));
    }

    #[test]
    fn test_value_for_valueless_spec_is_unexpected() {
        let (result, _) = bind("--list", Some("oops"), &[]);
        assert_eq!(
            result,
            Err(BindError::Usage(CommandLineError::UnexpectedArgument(
                "oops".into()
            )))
        );
    }

    #[test]
    fn test_comma_values_reuse_last_piece() {
        let (result, values) = bind("-x:<bool-v1>,<bool-v2>,<bool-v3>", Some("true"), &[]);
        assert_eq!(result, Ok(0));
        assert!(values.flag("v1"));
        assert!(values.flag("v2"));
        assert!(values.flag("v3"));

        let (_, values) = bind("-x:<int-a>,<int-b>,<int-c>", Some("1,2"), &[]);
        assert_eq!(values.int("a"), Some(1));
        assert_eq!(values.int("b"), Some(2));
        assert_eq!(values.int("c"), Some(2));
    }

    #[test]
    fn test_comma_multi_absorbs_remaining_pieces() {
        let (_, values) = bind("-x:<string-first>,*<string-rest>", Some("a,b,c"), &[]);
        assert_eq!(values.str("first"), Some("a"));
        assert_eq!(values.get("rest"), Some(&Value::from(vec!["b", "c"])));
    }

    #[test]
    fn test_space_values_one_token_each() {
        let (result, values) = bind(
            "-t <string-a> [<string-b>] [*<string-rest>]",
            None,
            &["x", "y", "z1", "z2", "-q"],
        );
        assert_eq!(result, Ok(4));
        assert_eq!(values.str("a"), Some("x"));
        assert_eq!(values.str("b"), Some("y"));
        assert_eq!(values.get("rest"), Some(&Value::from(vec!["z1", "z2"])));
    }

    #[test]
    fn test_space_values_missing_optional_stops_quietly() {
        let (result, values) = bind("-t <string-a> [<string-b>]", None, &["x", "-q"]);
        assert_eq!(result, Ok(1));
        assert_eq!(values.str("a"), Some("x"));
        assert!(!values.contains("b"));
    }

    #[test]
    fn test_space_values_missing_required_fails() {
        let (result, _) = bind("-t <string-a> <string-b>", None, &["x"]);
        assert_eq!(
            result,
            Err(BindError::Usage(CommandLineError::MissingValue("b".into())))
        );
    }

    #[test]
    fn test_repeatable_spec_appends() {
        let types = DefaultValueTypes::new();
        let spec = compile("*[-t:<string-tag>]", ArgRole::Option, &types).unwrap();
        let mut values = Values::new();
        spec.bind(&types, &mut values, Some("a"), &[]).unwrap();
        spec.bind(&types, &mut values, Some("b"), &[]).unwrap();
        assert_eq!(values.get("tag"), Some(&Value::from(vec!["a", "b"])));
    }

    #[test]
    fn test_conversion_failure_is_reported() {
        let (result, _) = bind("-n:<int-count>", Some("false"), &[]);
        assert!(matches!(
            result,
            Err(BindError::Conversion(ConversionError::InvalidInt { .. }))
        ));
    }

    #[test]
    fn test_fill_defaults_marks_absent_key_false() {
        let types = DefaultValueTypes::new();
        let spec = compile("[-v:*<string-items>]", ArgRole::Option, &types).unwrap();
        let mut values = Values::new();
        spec.fill_defaults(&mut values);
        assert_eq!(values.get("-v"), Some(&Value::Bool(false)));
        assert_eq!(values.get("items"), Some(&Value::List(vec![])));
    }
}
