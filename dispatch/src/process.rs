//! Dispatching a command line to the registered handlers.

use std::collections::HashSet;
use std::io::{self, Write};

use command_template_core::{split_switch, CommandLineError, Values};
use tracing::{debug, trace};

use crate::error::ProcessError;
use crate::registry::Registry;

impl Registry {
    /// Processes `args` (without the program name), writing handler output
    /// to stdout.
    pub fn process(&self, args: &[String]) -> Result<(), ProcessError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let result = self.process_with_output(args, &mut out);
        out.flush()?;
        result
    }

    /// Processes `args`, handing `out` to every handler that runs.
    ///
    /// Global options are pulled out first, wherever they appear, and their
    /// handlers run in the order they were given. The command is then matched,
    /// its options bound, missing required options reported, and defaults
    /// filled in for everything not supplied.
    pub fn process_with_output(
        &self,
        args: &[String],
        out: &mut dyn Write,
    ) -> Result<(), ProcessError> {
        if self.commands.is_empty() {
            return Err(ProcessError::NoCommands);
        }

        let types = self.types.as_ref();

        let mut queued = Vec::new();
        let mut command_args: Vec<String> = Vec::new();
        let mut i = 0;
        while i < args.len() {
            let (switch, inline) = split_switch(&args[i]);
            match self.global(switch) {
                Some(global) => {
                    let mut values = Values::new();
                    let used = global.spec.bind(types, &mut values, inline, &args[i + 1..])?;
                    queued.push((global, values));
                    i += used;
                }
                None => command_args.push(args[i].clone()),
            }
            i += 1;
        }

        for (global, values) in queued {
            debug!(option = %global.spec.key(), "Running global option handler");
            (global.handler)(values, &mut *out).map_err(ProcessError::Handler)?;
        }

        let args = command_args;
        let (command, inline, base) = match self.unnamed_command() {
            Some(command) => (command, None, 0),
            None => {
                let first = args.first().ok_or(CommandLineError::CommandRequired)?;
                let (switch, inline) = split_switch(first);
                let command = self
                    .command(switch)
                    .ok_or_else(|| CommandLineError::UnrecognizedCommand(switch.to_string()))?;
                (command, inline, 1)
            }
        };
        debug!(command = %command.primary.key(), "Resolved command");

        let mut values = Values::new();
        let used = command.primary.bind(types, &mut values, inline, &args[base..])?;

        let mut seen = HashSet::new();
        let mut i = base + used;
        while i < args.len() {
            let (switch, inline) = split_switch(&args[i]);
            let option = command
                .option(switch)
                .ok_or_else(|| CommandLineError::UnrecognizedArgument(switch.to_string()))?;
            let used = option.bind(types, &mut values, inline, &args[i + 1..])?;
            trace!(option = %switch, consumed = used, "Bound option");
            seen.insert(option.key());
            i += used + 1;
        }

        let missing: Vec<String> = command
            .options
            .iter()
            .filter(|o| !o.is_optional() && !seen.contains(o.key()))
            .map(|o| o.key().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(CommandLineError::MissingOptions(missing).into());
        }

        for option in &command.options {
            option.fill_defaults(&mut values);
        }
        command.primary.fill_defaults(&mut values);

        debug!(command = %command.primary.key(), values = values.len(), "Running command handler");
        (command.handler)(values, &mut *out).map_err(ProcessError::Handler)
    }
}
