//! Registration results
//!
//! A plain registration hands back the command itself; a patch registration
//! hands back a [`PatchedCommand`]. [`CommandHandle`] covers both so callers
//! can keep configuring whatever they got.

use cmdtree_core::{CommandConfig, Result};
use serde_json::Value;

use crate::command::{Command, ShortcutOptions};
use crate::patch::PatchedCommand;

/// Options for [`Scope::command_with`](crate::Scope::command_with)
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Description, stored through the locale collaborator
    pub description: Option<String>,
    /// Config merged into the leaf (or into the patch overlay)
    pub config: CommandConfig,
}

impl CommandOptions {
    /// Empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: set the config
    pub fn config(mut self, config: CommandConfig) -> Self {
        self.config = config;
        self
    }
}

/// What a registration call returned
#[derive(Debug, Clone)]
pub enum CommandHandle {
    /// The command itself
    Command(Command),
    /// A scope-bound shadow of the command
    Patch(PatchedCommand),
}

impl CommandHandle {
    /// Name of the underlying command
    pub fn name(&self) -> &str {
        match self {
            CommandHandle::Command(command) => command.name(),
            CommandHandle::Patch(patch) => patch.name(),
        }
    }

    /// Whether this is a patch
    pub fn is_patch(&self) -> bool {
        matches!(self, CommandHandle::Patch(_))
    }

    /// The underlying command (the patch target for patches)
    pub fn command(&self) -> &Command {
        match self {
            CommandHandle::Command(command) => command,
            CommandHandle::Patch(patch) => patch.target(),
        }
    }

    /// Consume into the underlying command
    pub fn into_command(self) -> Command {
        match self {
            CommandHandle::Command(command) => command,
            CommandHandle::Patch(patch) => patch.target().clone(),
        }
    }

    /// The patch, if this is one
    pub fn as_patch(&self) -> Option<&PatchedCommand> {
        match self {
            CommandHandle::Patch(patch) => Some(patch),
            CommandHandle::Command(_) => None,
        }
    }

    /// Read a config key as seen through this handle
    pub fn config_value(&self, key: &str) -> Option<Value> {
        match self {
            CommandHandle::Command(command) => command.config_value(key),
            CommandHandle::Patch(patch) => patch.config_value(key),
        }
    }

    /// Effective authority as seen through this handle
    pub fn authority(&self) -> u32 {
        match self {
            CommandHandle::Command(command) => command.authority(),
            CommandHandle::Patch(patch) => patch.authority(),
        }
    }

    /// Set a config key through this handle
    pub fn set_config(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        match self {
            CommandHandle::Command(command) => command.set_config(key, value),
            CommandHandle::Patch(patch) => patch.set_config(key, value),
        }
    }

    /// Add an alias through this handle
    ///
    /// # Errors
    ///
    /// Same as [`Command::alias`].
    pub fn alias(&self, name: &str) -> Result<&Self> {
        match self {
            CommandHandle::Command(command) => {
                command.alias(name)?;
            }
            CommandHandle::Patch(patch) => {
                patch.alias(name)?;
            }
        }
        Ok(self)
    }

    /// Add a shortcut through this handle
    ///
    /// # Errors
    ///
    /// Same as [`Command::shortcut`].
    pub fn shortcut(&self, name: &str, options: ShortcutOptions) -> Result<&Self> {
        match self {
            CommandHandle::Command(command) => {
                command.shortcut(name, options)?;
            }
            CommandHandle::Patch(patch) => {
                patch.shortcut(name, options)?;
            }
        }
        Ok(self)
    }
}

impl From<Command> for CommandHandle {
    fn from(command: Command) -> Self {
        CommandHandle::Command(command)
    }
}

impl From<PatchedCommand> for CommandHandle {
    fn from(patch: PatchedCommand) -> Self {
        CommandHandle::Patch(patch)
    }
}
