//! Commander configuration via `commander.toml`
//!
//! Settings that apply to every registration made through one
//! [`Commander`](crate::Commander). Loaded from TOML or built in code.

use cmdtree_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Authority given to root commands when the config does not say otherwise
pub const DEFAULT_AUTHORITY: u32 = 1;

/// Conventional config file name
pub const CONFIG_FILE_NAME: &str = "commander.toml";

/// Commander configuration loaded from `commander.toml`.
///
/// # Example
///
/// ```toml
/// default_authority = 1
/// lowercase_paths = true
/// locale = ""
/// description_prefix = "commands"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommanderConfig {
    /// Authority assigned to newly created root commands.
    /// Subcommands inherit their parent's authority instead.
    #[serde(default = "default_authority")]
    pub default_authority: u32,
    /// Lowercase the path part of every definition before compiling it.
    #[serde(default = "default_lowercase_paths")]
    pub lowercase_paths: bool,
    /// Locale that command descriptions are defined under.
    #[serde(default)]
    pub locale: String,
    /// Prefix of description keys: `<prefix>.<command>.description`.
    #[serde(default = "default_description_prefix")]
    pub description_prefix: String,
}

fn default_authority() -> u32 {
    DEFAULT_AUTHORITY
}

fn default_lowercase_paths() -> bool {
    true
}

fn default_description_prefix() -> String {
    "commands".to_string()
}

impl Default for CommanderConfig {
    fn default() -> Self {
        Self {
            default_authority: default_authority(),
            lowercase_paths: default_lowercase_paths(),
            locale: String::new(),
            description_prefix: default_description_prefix(),
        }
    }
}

impl CommanderConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Command tree configuration
#
# Authority given to root commands (subcommands inherit their parent's)
default_authority = 1

# Lowercase command paths before registering them
lowercase_paths = true

# Locale that descriptions are stored under ("" = fallback locale)
locale = ""

# Descriptions are stored under "<description_prefix>.<command>.description"
description_prefix = "commands"
"#
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the TOML is malformed or a value is invalid.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CommanderConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse commander config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{} ({})", msg, path.display())),
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Check values that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `description_prefix` is empty.
    pub fn validate(&self) -> Result<()> {
        if self.description_prefix.is_empty() {
            return Err(Error::Config(
                "description_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Locale key under which a command's description is stored
    pub fn description_key(&self, command: &str) -> String {
        format!("{}.{}.description", self.description_prefix, command)
    }
}
