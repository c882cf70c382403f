//! Help rendering.
//!
//! Help output is built in two steps. The `queue_*` methods decide *what* to
//! show as a list of lines; rendering decides *where*:
//! it finds the description column (the "river") over every two-column line,
//! then pads and word-wraps each description against it.
//!
//! Every public entry point has a `*_to` form taking an explicit writer. The
//! plain forms write to stdout in a single write.

use std::cmp::Ordering;
use std::io::{self, Write};

use command_template_core::{ArgSpec, UNNAMED_KEY};
use tracing::debug;

use crate::config::HelpLayout;
use crate::error::{HelpError, ProcessError};
use crate::registry::Registry;

/// Width charged per listed spec when deciding whether help is long.
const HINT_LINE_COST: usize = 60;
/// Number of [`HINT_LINE_COST`] units after which the search hint is shown.
const HINT_THRESHOLD: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HelpLine {
    Text(String),
    Columns {
        indent: usize,
        arg: String,
        description: String,
    },
}

#[derive(Debug, Default)]
pub(crate) struct HelpQueue {
    lines: Vec<HelpLine>,
}

impl HelpQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn text(&mut self, text: impl Into<String>) {
        self.lines.push(HelpLine::Text(text.into()));
    }

    /// Queues an argument and its description. An empty argument puts the
    /// description where the argument would have been.
    pub(crate) fn columns(&mut self, indent: usize, arg: &str, description: &str) {
        if arg.is_empty() {
            if !description.is_empty() {
                self.lines.push(HelpLine::Columns {
                    indent: 0,
                    arg: format!("{}{}", "  ".repeat(indent), description),
                    description: String::new(),
                });
            }
        } else {
            self.lines.push(HelpLine::Columns {
                indent,
                arg: arg.to_string(),
                description: description.to_string(),
            });
        }
    }

    /// Adds a blank line, but only at the very start of the output.
    pub(crate) fn leading_blank(&mut self) {
        if self.lines.is_empty() {
            self.text("");
        }
    }

    /// Adds a blank line unless the output is empty or already ends in one.
    pub(crate) fn blank_line(&mut self) {
        let ends_with_text = match self.lines.last() {
            Some(HelpLine::Text(text)) => !text.is_empty(),
            Some(HelpLine::Columns { .. }) => true,
            None => false,
        };
        if ends_with_text {
            self.text("");
        }
    }

    /// Column where descriptions start.
    fn river(&self, layout: &HelpLayout) -> usize {
        let mut river = 0;
        for line in &self.lines {
            if let HelpLine::Columns { indent, arg, .. } = line {
                let width = indent * 2 + arg.chars().count();
                if width == 0 {
                    continue;
                }
                let width = width + layout.river_spaces;
                if width > layout.max_river {
                    return layout.max_river;
                }
                river = river.max(width);
            }
        }
        river
    }

    pub(crate) fn render(&self, layout: &HelpLayout) -> String {
        let river = self.river(layout);
        let mut out = String::new();
        for line in &self.lines {
            match line {
                HelpLine::Text(text) => {
                    out.push_str(text);
                    out.push('\n');
                }
                HelpLine::Columns {
                    indent,
                    arg,
                    description,
                } => {
                    let arg = format!("{}{}", "  ".repeat(*indent), arg);
                    indented_print(&mut out, &arg, river, layout.max_line_width, description);
                }
            }
        }
        out
    }

    pub(crate) fn write_to(&self, out: &mut dyn Write, layout: &HelpLayout) -> io::Result<()> {
        out.write_all(self.render(layout).as_bytes())?;
        out.flush()
    }
}

/// Prints `arg`, then `text` starting at column `river`, wrapped at `wrap`.
fn indented_print(out: &mut String, arg: &str, river: usize, wrap: usize, text: &str) {
    let mut column = 0;
    if !arg.is_empty() {
        out.push_str(arg);
        column = arg.chars().count();
        if text.is_empty() || column >= river {
            out.push('\n');
            column = 0;
        }
        if text.is_empty() {
            return;
        }
    }

    let mut previous_blank = false;
    for line in text.split('\n') {
        if line.trim().is_empty() {
            if column > 0 {
                out.push('\n');
                column = 0;
            } else if !previous_blank {
                out.push('\n');
                previous_blank = true;
            }
            continue;
        }
        previous_blank = false;

        let mut rest = line;
        while !rest.is_empty() {
            let pad = river.saturating_sub(column);
            column = column.max(river);

            let mut piece = rest;
            if column + piece.chars().count() > wrap {
                if let Some(cut) = last_break(piece, wrap - column.min(wrap)) {
                    piece = &piece[..cut];
                }
            }

            out.push_str(&" ".repeat(pad));
            out.push_str(piece.trim());
            out.push('\n');
            column = 0;

            rest = rest[piece.len()..].trim();
        }
    }
}

/// Byte index of the last space among the first `limit + 1` characters of
/// `text`, if past 0.
fn last_break(text: &str, limit: usize) -> Option<usize> {
    text.char_indices()
        .take(limit + 1)
        .filter(|&(_, c)| c == ' ')
        .map(|(i, _)| i)
        .last()
        .filter(|&i| i > 0)
}

/// Case-insensitive order with a case-sensitive tie break.
fn help_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn matches_filter(primary: &ArgSpec, options: &[ArgSpec], filter: &str) -> bool {
    filter.is_empty()
        || std::iter::once(primary).chain(options).any(|spec| {
            spec.key().to_lowercase().contains(filter)
                || spec.help().to_lowercase().contains(filter)
        })
}

impl Registry {
    /// Prints help for one command; `""` or `"~"` names the unnamed command.
    pub fn print_command(&self, name: &str) -> Result<(), HelpError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.print_command_to(&mut out, name)
    }

    /// Writes help for one command to `out`.
    ///
    /// ```
    /// use command_template_dispatch::Registry;
    ///
    /// let mut registry = Registry::new();
    /// registry
    ///     .register_command(|_, _| Ok(()), &["test?Test", "--option:<bool-opt>?This option has help"])
    ///     .unwrap();
    ///
    /// let mut out = Vec::new();
    /// registry.print_command_to(&mut out, "test").unwrap();
    /// assert_eq!(
    ///     String::from_utf8(out).unwrap(),
    ///     "test              Test\n  --option:<opt>  This option has help\n"
    /// );
    ///
    /// let err = registry.print_command_to(&mut Vec::new(), "other").unwrap_err();
    /// assert_eq!(err.to_string(), "command \"other\" not found");
    /// ```
    pub fn print_command_to(&self, out: &mut dyn Write, name: &str) -> Result<(), HelpError> {
        let mut queue = HelpQueue::new();
        self.queue_command(&mut queue, name)?;
        queue.write_to(out, &self.layout)?;
        Ok(())
    }

    /// Prints the command listing, optionally filtered and with global options.
    pub fn print_commands(&self, filter: &str, include_global: bool) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.print_commands_to(&mut out, filter, include_global)
    }

    /// Writes the command listing to `out`.
    ///
    /// `filter` is matched case-insensitively against the keys and help text
    /// of every primary argument and option; a command is listed whole when
    /// any of its specs match.
    pub fn print_commands_to(
        &self,
        out: &mut dyn Write,
        filter: &str,
        include_global: bool,
    ) -> io::Result<()> {
        let mut queue = HelpQueue::new();
        self.queue_commands(&mut queue, filter, include_global);
        queue.write_to(out, &self.layout)
    }

    /// Prints help appropriate for the outcome of [`Registry::process`].
    pub fn help(&self, err: Option<&ProcessError>, app_name: &str, args: &[String]) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.help_to(&mut out, err, app_name, args)
    }

    /// Writes help appropriate for the outcome of processing `args`.
    ///
    /// - A non-usage error is printed on its own.
    /// - `help [filter]`, `--help [filter]` or an argument ending in `?`
    ///   prints the (filtered) listing.
    /// - Arguments naming a command print that command's help.
    /// - Anything else prints a usage line followed by the full listing.
    ///
    /// ```
    /// use command_template_dispatch::Registry;
    ///
    /// let mut registry = Registry::new();
    /// registry.register_command(|_, _| Ok(()), &["test?Give me help"]).unwrap();
    /// registry.register_command(|_, _| Ok(()), &["dog?Fido is his name"]).unwrap();
    ///
    /// let args: Vec<String> = vec!["invalid".into()];
    /// let err = registry.process_with_output(&args, &mut Vec::new()).unwrap_err();
    ///
    /// let mut out = Vec::new();
    /// registry.help_to(&mut out, Some(&err), "unit-test", &args).unwrap();
    /// assert_eq!(
    ///     String::from_utf8(out).unwrap(),
    ///     "Usage: unit-test <command>\n\nAll Commands:\n\n  dog   Fido is his name\n  test  Give me help\n\n"
    /// );
    /// ```
    pub fn help_to(
        &self,
        out: &mut dyn Write,
        err: Option<&ProcessError>,
        app_name: &str,
        args: &[String],
    ) -> io::Result<()> {
        let mut queue = HelpQueue::new();

        match err {
            Some(err) if !err.is_usage() => {
                queue.text("");
                queue.text(err.to_string());
                queue.text("");
            }
            _ => self.queue_help(&mut queue, app_name, args),
        }

        queue.write_to(out, &self.layout)
    }

    fn queue_help(&self, queue: &mut HelpQueue, app_name: &str, args: &[String]) {
        let first = args.first().map(String::as_str);

        if let Some(first) = first.filter(|a| *a == "help" || *a == "--help" || a.ends_with('?')) {
            let mut filter = "";
            if first == "help" || first == "--help" {
                if let [_, requested] = args {
                    filter = requested.as_str();
                }
            } else if args.len() == 1 {
                filter = first;
            }
            if let Some(stripped) = filter.strip_suffix('?') {
                filter = if stripped == "-" || stripped == "--" {
                    ""
                } else {
                    stripped
                };
            }
            self.queue_commands(queue, filter, true);
            return;
        }

        if let Some(command) = self.primary_command(args) {
            queue.leading_blank();
            queue.text("Syntax error.");
            queue.blank_line();
            queue.text("Command Help:");
            queue.blank_line();
            if let Err(err) = self.queue_command(queue, command) {
                debug!(command, %err, "No command help to show");
            }
            queue.blank_line();
            return;
        }

        self.queue_usage(queue, app_name);
    }

    fn queue_usage(&self, queue: &mut HelpQueue, app_name: &str) {
        let options = if self.globals.is_empty() {
            ""
        } else if self.commands.len() == 1 {
            " <options>"
        } else {
            " <global options>"
        };

        let has_command_options = self
            .commands
            .iter()
            .any(|c| !c.options.is_empty() || !c.primary.values().is_empty());
        let command_options = if has_command_options && options != " <options>" {
            " <options>"
        } else {
            ""
        };

        let command_token = if self.is_unnamed_mode() { "" } else { " <command>" };

        queue.text(format!("Usage: {app_name}{options}{command_token}{command_options}"));
        queue.blank_line();
        self.queue_commands(queue, "", true);

        let help_len: usize = self
            .commands
            .iter()
            .flat_map(|c| std::iter::once(&c.primary).chain(&c.options))
            .map(|spec| HINT_LINE_COST + spec.help().len() + spec.to_string().len())
            .sum();
        if help_len / HINT_LINE_COST < HINT_THRESHOLD {
            return;
        }

        let sample = self.commands.first().map_or("", |c| c.primary.key());
        queue.blank_line();
        if sample.is_empty() || sample == UNNAMED_KEY {
            queue.text(format!("Search help with: {app_name} --help <filter text>"));
        } else {
            queue.text(format!(
                "Search help with {app_name} --help <filter text>. Example: {app_name} --help {sample}"
            ));
            queue.text(format!(
                "Or, put a question mark on the end. Example: {app_name} {sample}?"
            ));
        }
        queue.blank_line();
    }

    fn queue_command(&self, queue: &mut HelpQueue, name: &str) -> Result<(), HelpError> {
        let want_unnamed = name.is_empty() || name == UNNAMED_KEY;
        let key = if want_unnamed { UNNAMED_KEY } else { name };

        let command = self.command(key).ok_or_else(|| {
            if want_unnamed {
                HelpError::UnnamedNotFound
            } else {
                HelpError::NotFound(name.to_string())
            }
        })?;

        let primary = &command.primary;
        if primary.help().is_empty() && command.options.is_empty() {
            return Err(if want_unnamed {
                HelpError::UnnamedNoHelp
            } else {
                HelpError::NoHelp(primary.key().to_string())
            });
        }

        let mut option_indent = 1;
        let form = primary.to_string();
        if !form.is_empty() {
            queue.columns(0, &form, primary.help());
        } else if !primary.help().is_empty() {
            queue.text(primary.help());
        } else {
            option_indent = 0;
        }

        for option in &command.options {
            queue.columns(option_indent, &option.to_string(), option.help());
        }
        Ok(())
    }

    fn queue_commands(&self, queue: &mut HelpQueue, filter: &str, include_global: bool) {
        let filter = filter.trim().to_lowercase();

        let mut globals: Vec<&ArgSpec> = Vec::new();
        let mut globals_filtered = false;
        if include_global {
            for global in &self.globals {
                if matches_filter(&global.spec, &[], &filter) {
                    globals.push(&global.spec);
                } else {
                    globals_filtered = true;
                }
            }
        }

        let mut commands = Vec::new();
        let mut commands_filtered = false;
        for command in &self.commands {
            let primary = &command.primary;
            if !matches_filter(primary, &command.options, &filter) {
                commands_filtered = true;
            } else if !primary.is_unnamed()
                || !primary.help().is_empty()
                || !primary.values().is_empty()
                || !command.options.is_empty()
            {
                commands.push(command);
            }
        }

        let single = match self.commands.as_slice() {
            [only] => Some(only),
            _ => None,
        };
        let simple_description = single.is_some_and(|c| {
            c.primary.is_unnamed()
                && !c.primary.help().is_empty()
                && c.options.is_empty()
                && c.primary.values().is_empty()
        });

        if !globals.is_empty() {
            queue.text(if globals_filtered {
                "Matching Global Options:"
            } else {
                "Global Options:"
            });
            queue.blank_line();

            globals.sort_by(|a, b| help_order(&a.to_string(), &b.to_string()));
            for spec in &globals {
                queue.columns(1, &spec.to_string(), spec.help());
            }
            queue.blank_line();
        }

        if !commands.is_empty() {
            let mut option_indent = 2;
            if commands_filtered {
                queue.text("Matching Commands:");
            } else if self.commands.len() > 1 {
                queue.text("All Commands:");
            } else if let Some(only) = single.filter(|_| simple_description) {
                queue.text(format!("Description: {}", only.primary.help()));
                option_indent = 1;
            } else {
                queue.text("Command Options:");
                if single.is_some_and(|c| c.primary.is_unnamed()) {
                    option_indent = 1;
                }
            }
            queue.blank_line();

            commands.sort_by(|a, b| help_order(&a.primary.to_string(), &b.primary.to_string()));
            for command in commands {
                let primary = &command.primary;
                if !simple_description {
                    let form = primary.to_string();
                    if !form.is_empty() {
                        queue.columns(option_indent - 1, &form, primary.help());
                    } else if !primary.help().is_empty() {
                        queue.text(primary.help());
                        queue.blank_line();
                    }
                }
                for option in &command.options {
                    queue.columns(option_indent, &option.to_string(), option.help());
                }
            }
            queue.blank_line();
        } else if globals.is_empty() {
            let has_options = self
                .commands
                .iter()
                .any(|c| !c.options.is_empty() || !c.primary.values().is_empty());

            queue.leading_blank();
            if !filter.is_empty() {
                queue.text(format!("No commands match help filter '{filter}'."));
            } else if !has_options {
                queue.text("This command has no options.");
            } else {
                queue.text("No help is available.");
            }
            queue.blank_line();
        }
    }
}
