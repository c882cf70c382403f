//! Command and global option registry.
//!
//! Every registration compiles its templates, then re-checks that keys and
//! value names stay unambiguous across the whole registry. A rejected
//! registration leaves the registry exactly as it was.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::io::Write;
use std::sync::Arc;

use command_template_core::{
    compile, split_switch, ArgRole, ArgSpec, DefaultValueTypes, ValueTypes, Values,
};
use serde::Serialize;
use tracing::debug;

use crate::config::HelpLayout;
use crate::error::{DefinitionError, DefinitionReport, HandlerError};

/// A boxed command or global option handler.
///
/// Handlers receive the bound values and the output sink of the current
/// invocation.
pub type Handler =
    Box<dyn Fn(Values, &mut dyn Write) -> Result<(), HandlerError> + Send + Sync + 'static>;

/// Boxes a closure as a [`Handler`].
///
/// Useful where a handler has to be produced as a value, for example from
/// the factory passed to [`TemplateSet::compile_into`](crate::TemplateSet::compile_into).
pub fn into_handler<F>(f: F) -> Handler
where
    F: Fn(Values, &mut dyn Write) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    Box::new(f)
}

pub(crate) struct Command {
    pub(crate) handler: Handler,
    pub(crate) primary: ArgSpec,
    /// In registration order.
    pub(crate) options: Vec<ArgSpec>,
}

impl Command {
    pub(crate) fn option(&self, key: &str) -> Option<&ArgSpec> {
        self.options.iter().find(|o| o.key() == key)
    }
}

pub(crate) struct GlobalOption {
    pub(crate) handler: Handler,
    pub(crate) spec: ArgSpec,
}

/// The set of commands and global options a program understands.
///
/// # Examples
///
/// ```
/// use command_template_dispatch::Registry;
///
/// let mut registry = Registry::new();
/// registry
///     .register_command(
///         |values, out| {
///             writeln!(out, "listing: {}", values.flag("--list"))?;
///             Ok(())
///         },
///         &["users?Performs operations on a user", "[--list]?List users"],
///     )
///     .unwrap();
///
/// let args: Vec<String> = vec!["users".into(), "--list".into()];
/// let mut out = Vec::new();
/// registry.process_with_output(&args, &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "listing: true\n");
///
/// // Duplicate keys are rejected without touching the registry.
/// assert!(registry.register_command(|_, _| Ok(()), &["users"]).is_err());
/// assert_eq!(registry.command_keys(), ["users"]);
/// ```
pub struct Registry {
    pub(crate) commands: Vec<Command>,
    pub(crate) globals: Vec<GlobalOption>,
    /// Index of the only command when that command is unnamed.
    pub(crate) unnamed: Option<usize>,
    pub(crate) types: Arc<dyn ValueTypes>,
    pub(crate) layout: HelpLayout,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("commands", &self.command_keys())
            .field(
                "globals",
                &self.globals.iter().map(|g| g.spec.key()).collect::<Vec<_>>(),
            )
            .field("unnamed", &self.unnamed.is_some())
            .field("layout", &self.layout)
            .finish()
    }
}

impl Registry {
    /// Creates a registry using the built-in value types.
    pub fn new() -> Self {
        Self::with_value_types(Arc::new(DefaultValueTypes::new()))
    }

    /// Creates a registry resolving template types through `types`.
    pub fn with_value_types(types: Arc<dyn ValueTypes>) -> Self {
        Self {
            commands: Vec::new(),
            globals: Vec::new(),
            unnamed: None,
            types,
            layout: HelpLayout::default(),
        }
    }

    pub fn set_help_layout(&mut self, layout: HelpLayout) {
        self.layout = layout;
    }

    pub fn help_layout(&self) -> &HelpLayout {
        &self.layout
    }

    /// Registers a command: the first template is the primary argument, the
    /// rest are its options.
    ///
    /// # Errors
    ///
    /// Fails if a template does not compile, if no template is given, or if a
    /// key or value name would become ambiguous.
    pub fn register_command<F, S>(&mut self, handler: F, templates: &[S]) -> Result<(), DefinitionError>
    where
        F: Fn(Values, &mut dyn Write) -> Result<(), HandlerError> + Send + Sync + 'static,
        S: AsRef<str>,
    {
        let (primary, options) = templates
            .split_first()
            .ok_or(DefinitionError::MissingPrimary)?;

        let types = self.types.as_ref();
        let primary = compile(primary.as_ref(), ArgRole::Primary, types)?;
        let options = options
            .iter()
            .map(|t| compile(t.as_ref(), ArgRole::Option, types))
            .collect::<Result<Vec<_>, _>>()?;

        let command = Command {
            handler: Box::new(handler),
            primary,
            options,
        };
        self.check_unique(Some(&command), None)?;

        debug!(
            command = %command.primary.key(),
            options = command.options.len(),
            "Registered command"
        );

        let unnamed = command.primary.is_unnamed();
        self.commands.push(command);
        // Unnamed mode requires exactly one command, and it must be unnamed.
        self.unnamed = (self.commands.len() == 1 && unnamed).then_some(0);
        Ok(())
    }

    /// Registers an option accepted before or between command arguments.
    ///
    /// Global option handlers run before the command handler, in the order the
    /// options appear on the command line.
    pub fn register_global_option<F>(&mut self, handler: F, template: &str) -> Result<(), DefinitionError>
    where
        F: Fn(Values, &mut dyn Write) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        let spec = compile(template, ArgRole::Option, self.types.as_ref())?;
        let global = GlobalOption {
            handler: Box::new(handler),
            spec,
        };
        self.check_unique(None, Some(&global))?;

        debug!(option = %global.spec.key(), "Registered global option");
        self.globals.push(global);
        Ok(())
    }

    /// Keys of the registered commands, in registration order.
    pub fn command_keys(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.primary.key()).collect()
    }

    /// Returns `true` when the only command is the unnamed one.
    pub fn is_unnamed_mode(&self) -> bool {
        self.unnamed.is_some()
    }

    pub fn value_types(&self) -> &dyn ValueTypes {
        self.types.as_ref()
    }

    /// Finds the first argument naming a command, skipping global options.
    ///
    /// ```
    /// use command_template_dispatch::Registry;
    ///
    /// let mut registry = Registry::new();
    /// registry.register_command(|_, _| Ok(()), &["test:<string-v>"]).unwrap();
    /// registry.register_global_option(|_, _| Ok(()), "--env:<string-env>").unwrap();
    ///
    /// let args: Vec<String> = vec!["--env:prod".into(), "test:x".into()];
    /// assert_eq!(registry.primary_command(&args), Some("test"));
    /// assert_eq!(registry.primary_command(&["text".to_string()]), None);
    /// ```
    pub fn primary_command(&self, args: &[String]) -> Option<&str> {
        args.iter()
            .map(|arg| split_switch(arg).0)
            .filter(|token| self.global(token).is_none())
            .find_map(|token| self.command(token).map(|c| c.primary.key()))
    }

    /// Describes every registered spec by its help form and help text.
    pub fn summary(&self) -> Summary {
        let describe = |command: &Command| CommandSummary {
            options: command
                .options
                .iter()
                .map(|o| (o.to_string(), o.help().to_string()))
                .collect(),
            primary: BTreeMap::from([(
                command.primary.to_string(),
                command.primary.help().to_string(),
            )]),
        };

        match self.unnamed_command() {
            Some(command) => Summary::Unnamed(describe(command)),
            None => Summary::Named(self.commands.iter().map(describe).collect()),
        }
    }

    pub(crate) fn command(&self, key: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.primary.key() == key)
    }

    pub(crate) fn global(&self, key: &str) -> Option<&GlobalOption> {
        self.globals.iter().find(|g| g.spec.key() == key)
    }

    pub(crate) fn unnamed_command(&self) -> Option<&Command> {
        self.unnamed.and_then(|index| self.commands.get(index))
    }

    /// Checks the registry plus one pending command or global option.
    ///
    /// Global keys and value names, and every command key, share one
    /// namespace; each command adds its own value names and options on top.
    fn check_unique(
        &self,
        command: Option<&Command>,
        global: Option<&GlobalOption>,
    ) -> Result<(), DefinitionError> {
        let mut names = HashSet::new();

        for global in self.globals.iter().chain(global) {
            claim(&mut names, global.spec.key())?;
            for value in global.spec.values() {
                claim(&mut names, value.name())?;
            }
        }

        let commands: Vec<&Command> = self.commands.iter().chain(command).collect();
        for command in &commands {
            claim(&mut names, command.primary.key())?;
        }

        for command in &commands {
            let mut scoped = names.clone();
            for value in command.primary.values() {
                claim(&mut scoped, value.name())?;
            }
            for option in &command.options {
                claim(&mut scoped, option.key())?;
                for value in option.values() {
                    claim(&mut scoped, value.name())?;
                }
            }
        }

        Ok(())
    }
}

fn claim<'a>(names: &mut HashSet<&'a str>, name: &'a str) -> Result<(), DefinitionError> {
    if names.insert(name) {
        Ok(())
    } else {
        Err(DefinitionError::DuplicateName(name.to_string()))
    }
}

/// Serializable overview of a registry, as returned by [`Registry::summary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Summary {
    Unnamed(CommandSummary),
    Named(Vec<CommandSummary>),
}

/// Help form → help text for one command's primary argument and options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandSummary {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
    pub primary: BTreeMap<String, String>,
}

/// Collects registrations and reports every definition error at once.
///
/// # Examples
///
/// ```
/// use command_template_dispatch::RegistryBuilder;
///
/// let report = RegistryBuilder::new()
///     .command(|_, _| Ok(()), &["test:<string-dup>,<string-dup>"])
///     .command(|_, _| Ok(()), &["run"])
///     .command(|_, _| Ok(()), &["run"])
///     .build()
///     .unwrap_err();
///
/// assert_eq!(report.errors.len(), 2);
/// ```
pub struct RegistryBuilder {
    registry: Registry,
    errors: Vec<DefinitionError>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::from_registry(Registry::new())
    }

    pub fn with_value_types(types: Arc<dyn ValueTypes>) -> Self {
        Self::from_registry(Registry::with_value_types(types))
    }

    fn from_registry(registry: Registry) -> Self {
        Self {
            registry,
            errors: Vec::new(),
        }
    }

    pub fn help_layout(mut self, layout: HelpLayout) -> Self {
        self.registry.set_help_layout(layout);
        self
    }

    pub fn command<F, S>(mut self, handler: F, templates: &[S]) -> Self
    where
        F: Fn(Values, &mut dyn Write) -> Result<(), HandlerError> + Send + Sync + 'static,
        S: AsRef<str>,
    {
        if let Err(err) = self.registry.register_command(handler, templates) {
            self.errors.push(err);
        }
        self
    }

    pub fn global_option<F>(mut self, handler: F, template: &str) -> Self
    where
        F: Fn(Values, &mut dyn Write) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        if let Err(err) = self.registry.register_global_option(handler, template) {
            self.errors.push(err);
        }
        self
    }

    /// Returns the registry, or every error collected along the way.
    pub fn build(self) -> Result<Registry, DefinitionReport> {
        if self.errors.is_empty() {
            Ok(self.registry)
        } else {
            Err(DefinitionReport {
                errors: self.errors,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use command_template_core::TemplateError;

    fn noop(_: Values, _: &mut dyn Write) -> Result<(), HandlerError> {
        Ok(())
    }

    #[test]
    fn test_duplicate_commands_rejected() {
        let mut registry = Registry::new();
        registry.register_command(noop, &["test"]).unwrap();
        assert_eq!(
            registry.register_command(noop, &["test"]),
            Err(DefinitionError::DuplicateName("test".into()))
        );

        let mut registry = Registry::new();
        registry.register_command(noop, &["~"]).unwrap();
        assert!(registry.register_command(noop, &["~"]).is_err());
        assert!(registry.is_unnamed_mode());
    }

    #[test]
    fn test_value_names_may_repeat_across_commands() {
        let mut registry = Registry::new();
        registry.register_command(noop, &["test:<string-arg>"]).unwrap();
        registry.register_command(noop, &["test2:<string-arg>"]).unwrap();
        registry
            .register_command(noop, &["test3", "-x:<string-arg>"])
            .unwrap();
        assert_eq!(registry.command_keys(), ["test", "test2", "test3"]);
    }

    #[test]
    fn test_value_name_clashing_with_option_key_rejected() {
        let mut registry = Registry::new();
        let err = registry
            .register_command(noop, &["test:<string-x>", "x"])
            .unwrap_err();
        assert_eq!(err, DefinitionError::DuplicateName("x".into()));
        assert!(registry.command_keys().is_empty());
    }

    #[test]
    fn test_global_option_clashing_with_command_rejected() {
        let mut registry = Registry::new();
        registry.register_command(noop, &["test"]).unwrap();
        assert!(registry.register_global_option(noop, "test").is_err());
        assert!(registry.global("test").is_none());

        registry
            .register_global_option(noop, "--env:<string-env>")
            .unwrap();
        assert!(
            registry
                .register_command(noop, &["run", "[--env]"])
                .is_err()
        );
    }

    #[test]
    fn test_compile_errors_surface_as_definition_errors() {
        let mut registry = Registry::new();
        let err = registry
            .register_command(noop, &["test:<string-dup>,<string-dup>"])
            .unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::Template(TemplateError::DuplicateValue { .. })
        ));
        assert_eq!(
            registry.register_command(noop, &[] as &[&str]),
            Err(DefinitionError::MissingPrimary)
        );
    }

    #[test]
    fn test_second_command_clears_unnamed_mode() {
        let mut registry = Registry::new();
        registry.register_command(noop, &["~"]).unwrap();
        assert!(registry.is_unnamed_mode());
        registry.register_command(noop, &["named"]).unwrap();
        assert!(!registry.is_unnamed_mode());
    }

    #[test]
    fn test_summary_named_and_unnamed() {
        let mut registry = Registry::new();
        registry
            .register_command(noop, &["test?Test", "--option:<bool-opt>?This option has help"])
            .unwrap();
        let json = serde_json::to_value(registry.summary()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"named": [{
                "options": {"--option:<opt>": "This option has help"},
                "primary": {"test": "Test"}
            }]})
        );

        let mut registry = Registry::new();
        registry
            .register_command(noop, &["~ <string-val> <string-val2>?Test"])
            .unwrap();
        let text = serde_json::to_string(&registry.summary()).unwrap();
        assert_eq!(text, r#"{"unnamed":{"primary":{"<val> <val2>":"Test"}}}"#);
    }

    #[test]
    fn test_builder_collects_all_errors() {
        let report = RegistryBuilder::new()
            .command(noop, &["test"])
            .command(noop, &["test"])
            .global_option(noop, "~")
            .build()
            .unwrap_err();
        assert_eq!(report.errors.len(), 2);
        assert_eq!(
            report.errors[0],
            DefinitionError::DuplicateName("test".into())
        );

        let registry = RegistryBuilder::new()
            .command(noop, &["test"])
            .global_option(noop, "--verbose")
            .build()
            .unwrap();
        assert_eq!(registry.command_keys(), ["test"]);
    }
}
