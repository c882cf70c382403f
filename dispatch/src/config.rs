//! Help layout settings and template-set definition files.
//!
//! A template set describes a whole command-line surface in YAML or JSON, so
//! templates can be checked and previewed without writing any handler code:
//!
//! ```yaml
//! name: usertool
//! global_options:
//!   - "--env:<string-env>?Target environment"
//! commands:
//!   - primary: "users?Performs operations on a user"
//!     options:
//!       - "[--create <string-createUser>]?Creates a user"
//!       - "[--list]?List users"
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, DefinitionReport};
use crate::registry::{Handler, Registry, RegistryBuilder};

/// Column settings for rendered help.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelpLayout {
    /// Descriptions are word-wrapped at this column.
    pub max_line_width: usize,
    /// Descriptions never start further right than this column.
    pub max_river: usize,
    /// Gap between the widest argument and its description.
    pub river_spaces: usize,
}

impl Default for HelpLayout {
    fn default() -> Self {
        Self {
            max_line_width: 120,
            max_river: 30,
            river_spaces: 2,
        }
    }
}

impl HelpLayout {
    /// Loads a layout from a YAML file; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if it is not valid YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let layout = serde_yaml::from_reader(reader)?;
        Ok(layout)
    }
}

/// Templates for one command: its primary argument and options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandTemplates {
    pub primary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl CommandTemplates {
    /// The primary template followed by the option templates.
    pub fn templates(&self) -> Vec<&str> {
        std::iter::once(self.primary.as_str())
            .chain(self.options.iter().map(String::as_str))
            .collect()
    }
}

/// A complete command-line surface loaded from a definition file.
///
/// # Examples
///
/// ```
/// use command_template_dispatch::{into_handler, TemplateSet};
///
/// let set: TemplateSet = serde_yaml::from_str(r#"
/// name: usertool
/// commands:
///   - primary: "users?Performs operations on a user"
///     options: ["[--list]?List users"]
/// "#).unwrap();
///
/// let registry = set.compile_into(|_| into_handler(|_, _| Ok(()))).unwrap();
/// assert_eq!(registry.command_keys(), ["users"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSet {
    /// Application name used in usage lines.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<HelpLayout>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_options: Vec<String>,
    #[serde(default)]
    pub commands: Vec<CommandTemplates>,
}

impl TemplateSet {
    /// Loads a definition file, choosing YAML or JSON by extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedFormat`] for other extensions, and
    /// I/O or parse errors otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::of(path)?;
        let reader = BufReader::new(File::open(path)?);
        let set = match format {
            Format::Yaml => serde_yaml::from_reader(reader)?,
            Format::Json => serde_json::from_reader(reader)?,
        };
        debug!(path = %path.display(), "Loaded template set");
        Ok(set)
    }

    /// Saves the definition file, choosing YAML or JSON by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let format = Format::of(path)?;
        let writer = BufWriter::new(File::create(path)?);
        match format {
            Format::Yaml => serde_yaml::to_writer(writer, self)?,
            Format::Json => serde_json::to_writer_pretty(writer, self)?,
        }
        Ok(())
    }

    /// Registers every command and global option, asking `handler_for` for
    /// each one's handler. It receives the primary template of a command, or
    /// the template of a global option.
    ///
    /// # Errors
    ///
    /// Returns every definition error in the set, not just the first.
    pub fn compile_into<F>(&self, mut handler_for: F) -> Result<Registry, DefinitionReport>
    where
        F: FnMut(&str) -> Handler,
    {
        let mut builder = RegistryBuilder::new();
        if let Some(layout) = self.help {
            builder = builder.help_layout(layout);
        }
        for command in &self.commands {
            builder = builder.command(handler_for(&command.primary), &command.templates());
        }
        for template in &self.global_options {
            builder = builder.global_option(handler_for(template), template);
        }
        builder.build()
    }
}

enum Format {
    Yaml,
    Json,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}
