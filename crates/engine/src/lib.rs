//! Command tree engine for cmdtree
//!
//! This crate turns definition strings into a live command tree:
//! - Commander: Owns one registry, its config and the locale store
//! - Scope: Registration context of one extension, with its teardown list
//! - Registry: Name, alias and shortcut tables, plus notifications
//! - Command: A node of the tree
//! - PatchedCommand: Scope-bound shadow returned by patch registrations
//!
//! The engine only owns node identity, hierarchy, aliasing and lifecycle.
//! Argument parsing, permissions and execution live elsewhere.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod builder;
pub mod command;
pub mod commander;
pub mod config;
pub mod events;
pub mod handle;
pub mod locales;
pub mod patch;
pub mod registry;
pub mod scope;

pub use command::{Command, Disposable, Shortcut, ShortcutOptions};
pub use commander::Commander;
pub use config::{CommanderConfig, CONFIG_FILE_NAME, DEFAULT_AUTHORITY};
pub use events::{CommandListener, Listeners};
pub use handle::{CommandHandle, CommandOptions};
pub use locales::{Locales, MemoryLocales};
pub use patch::PatchedCommand;
pub use registry::{Registry, ShortcutMatch};
pub use scope::Scope;

// Re-export core types so users don't need cmdtree-core directly
pub use cmdtree_core::{
    CommandConfig, Definition, Error, NameKind, Result, ScopeId, Segment, AUTHORITY, PATCH,
};
