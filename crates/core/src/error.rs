//! Error types for command tree operations
//!
//! This module defines all error types raised while building, aliasing and
//! configuring the command tree.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::fmt;
use std::io;
use thiserror::Error;

/// Result type alias for command tree operations
pub type Result<T> = std::result::Result<T, Error>;

/// The kind of string a [`Error::NameConflict`] is about.
///
/// Command names and aliases share one namespace; shortcuts have their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    /// A canonical command name
    Command,
    /// An alternate name
    Alias,
    /// A shortcut trigger
    Shortcut,
}

impl NameKind {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            NameKind::Command => "command",
            NameKind::Alias => "alias",
            NameKind::Shortcut => "shortcut",
        }
    }
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error types for the command tree
///
/// All variants abort the registration call that raised them. None of them
/// are retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The definition string contains no path
    #[error("command definition is empty")]
    EmptyDefinition,

    /// A path segment has nothing left after its `.` or `/` prefix
    #[error("invalid segment '{segment}' in command path '{path}'")]
    InvalidSegment {
        /// The full path being compiled
        path: String,
        /// The offending segment, prefix included
        segment: String,
    },

    /// A node would become its own subcommand, directly or through its descendants
    #[error("cannot set a command ({name}) as its own subcommand")]
    SelfParent {
        /// Name of the node that would form a cycle
        name: String,
    },

    /// A node is already attached under a different parent
    #[error("cannot create subcommand {path}: {parent}/{name} already exists")]
    ConflictingParent {
        /// The path being registered
        path: String,
        /// Name of the existing parent
        parent: String,
        /// Name of the node the path tried to re-parent
        name: String,
    },

    /// A name, alias or shortcut is already owned by another node
    #[error("{kind} '{name}' is already registered by command {owner}")]
    NameConflict {
        /// What kind of string collided
        kind: NameKind,
        /// The contested string
        name: String,
        /// Canonical name of the node that owns it
        owner: String,
    },

    /// Operation on a command that has already been disposed
    #[error("command {name} has been disposed")]
    Disposed {
        /// Name of the disposed command
        name: String,
    },

    /// Configuration could not be parsed or was invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error while reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Build a [`Error::NameConflict`]
    pub fn name_conflict(kind: NameKind, name: impl Into<String>, owner: impl Into<String>) -> Self {
        Error::NameConflict {
            kind,
            name: name.into(),
            owner: owner.into(),
        }
    }

    /// Build a [`Error::Disposed`]
    pub fn disposed(name: impl Into<String>) -> Self {
        Error::Disposed { name: name.into() }
    }

    /// Whether this error comes from tree structure (as opposed to naming or I/O)
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::SelfParent { .. } | Error::ConflictingParent { .. }
        )
    }
}
