//! Node registry
//!
//! Maps canonical names and aliases to live commands, keeps the
//! instance-wide shortcut list, and fans out structural-change
//! notifications.
//!
//! Names and aliases share one namespace: `get("x")` finds a command named
//! `x` or, failing that, the command aliased `x`. A string can be owned by
//! one command at a time.
//!
//! One registry belongs to one [`Commander`](crate::Commander); independent
//! commanders never share entries.

use cmdtree_core::{Error, NameKind, Result};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::warn;

use crate::command::{Command, Shortcut};
use crate::events::{CommandListener, Listeners};

#[derive(Default)]
struct RegistryState {
    commands: FxHashMap<String, Command>,
    order: Vec<Command>,
    aliases: FxHashMap<String, Command>,
    shortcuts: Vec<Shortcut>,
}

/// A shortcut that matched some message content
#[derive(Debug, Clone)]
pub struct ShortcutMatch {
    /// The shortcut that fired
    pub shortcut: Shortcut,
    /// Text following the trigger, leading whitespace removed
    pub rest: String,
}

/// Name, alias and shortcut tables for one command tree
#[derive(Default)]
pub struct Registry {
    state: RwLock<RegistryState>,
    listeners: Listeners,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a command by name, falling back to aliases
    pub fn get(&self, name: &str) -> Option<Command> {
        let state = self.state.read();
        state
            .commands
            .get(name)
            .or_else(|| state.aliases.get(name))
            .cloned()
    }

    /// Whether a command is registered under exactly this canonical name
    pub fn contains_name(&self, name: &str) -> bool {
        self.state.read().commands.contains_key(name)
    }

    /// Insert a command under its name
    ///
    /// Registering a command that already owns its name is a no-op.
    ///
    /// # Errors
    ///
    /// [`Error::NameConflict`] if the name belongs to a different command,
    /// as a name or as an alias.
    pub fn register(&self, command: &Command) -> Result<()> {
        let mut state = self.state.write();
        let name = command.name();
        if let Some(owner) = state.commands.get(name) {
            if owner == command {
                return Ok(());
            }
            return Err(conflict(NameKind::Command, name, owner));
        }
        if let Some(owner) = state.aliases.get(name) {
            if owner != command {
                return Err(conflict(NameKind::Alias, name, owner));
            }
        }
        state.commands.insert(name.to_string(), command.clone());
        state.order.push(command.clone());
        Ok(())
    }

    /// Remove a command's entry if it is the current owner; no-op otherwise
    pub fn unregister(&self, command: &Command) {
        let mut state = self.state.write();
        if state.commands.get(command.name()) == Some(command) {
            state.commands.remove(command.name());
        }
        state.order.retain(|c| c != command);
    }

    /// Claim an alias for `command`
    ///
    /// Returns `Ok(false)` when `command` already answers to `alias`.
    ///
    /// # Errors
    ///
    /// [`Error::NameConflict`] if another command owns the string.
    pub fn register_alias(&self, alias: &str, command: &Command) -> Result<bool> {
        let mut state = self.state.write();
        if let Some(owner) = state.aliases.get(alias) {
            if owner == command {
                return Ok(false);
            }
            return Err(conflict(NameKind::Alias, alias, owner));
        }
        if let Some(owner) = state.commands.get(alias) {
            if owner == command {
                return Ok(false);
            }
            return Err(conflict(NameKind::Command, alias, owner));
        }
        state.aliases.insert(alias.to_string(), command.clone());
        Ok(true)
    }

    /// Release an alias if `command` owns it; no-op otherwise
    pub fn unregister_alias(&self, alias: &str, command: &Command) -> bool {
        let mut state = self.state.write();
        if state.aliases.get(alias) == Some(command) {
            state.aliases.remove(alias);
            true
        } else {
            false
        }
    }

    /// Add a shortcut to the instance-wide list
    ///
    /// Returns `Ok(false)` when the same command already owns the trigger;
    /// the existing options are kept.
    ///
    /// # Errors
    ///
    /// [`Error::NameConflict`] if another command owns the trigger.
    pub fn register_shortcut(&self, shortcut: Shortcut) -> Result<bool> {
        let mut state = self.state.write();
        if let Some(existing) = state.shortcuts.iter().find(|s| s.name == shortcut.name) {
            if existing.command == shortcut.command {
                return Ok(false);
            }
            return Err(conflict(NameKind::Shortcut, &shortcut.name, &existing.command));
        }
        state.shortcuts.push(shortcut);
        Ok(true)
    }

    /// Remove a shortcut trigger if `command` owns it
    pub fn unregister_shortcut(&self, name: &str, command: &Command) -> bool {
        let mut state = self.state.write();
        let before = state.shortcuts.len();
        state
            .shortcuts
            .retain(|s| !(s.name == name && s.command == *command));
        before != state.shortcuts.len()
    }

    /// Remove every shortcut owned by `command`
    pub fn unregister_shortcuts(&self, command: &Command) {
        self.state.write().shortcuts.retain(|s| s.command != *command);
    }

    /// All live commands in registration order
    pub fn commands(&self) -> Vec<Command> {
        self.state.read().order.clone()
    }

    /// Number of live commands
    pub fn len(&self) -> usize {
        self.state.read().commands.len()
    }

    /// Whether no commands are registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of registered aliases
    pub fn alias_count(&self) -> usize {
        self.state.read().aliases.len()
    }

    /// Snapshot of the shortcut list
    pub fn shortcuts(&self) -> Vec<Shortcut> {
        self.state.read().shortcuts.clone()
    }

    /// Best-effort dotted lookup
    ///
    /// Looks up the first segment of `key`, then keeps appending
    /// `"." + segment` to the name of the command found so far. Returns the
    /// deepest command reached, even when the whole key was not consumed.
    pub fn resolve(&self, key: &str) -> Option<Command> {
        let mut segments = key.split('.');
        let first = segments.next().filter(|s| !s.is_empty())?;
        let mut found = self.get(first)?;
        for segment in segments {
            match self.get(&format!("{}.{}", found.name(), segment)) {
                Some(next) => found = next,
                None => break,
            }
        }
        Some(found)
    }

    /// Names and aliases of every command accepted by `predicate`
    ///
    /// Each matching command contributes its name followed by its aliases,
    /// in registration order.
    pub fn available_aliases<F>(&self, mut predicate: F) -> Vec<String>
    where
        F: FnMut(&Command) -> bool,
    {
        let commands = self.commands();
        let mut names = Vec::new();
        for command in commands.iter().filter(|c| predicate(*c)) {
            names.push(command.name().to_string());
            names.extend(command.aliases());
        }
        names
    }

    /// Find the first shortcut triggered by `content`
    ///
    /// A shortcut matches when `content` equals its trigger, or, for fuzzy
    /// shortcuts, when `content` starts with the trigger.
    pub fn find_shortcut(&self, content: &str) -> Option<ShortcutMatch> {
        let state = self.state.read();
        state.shortcuts.iter().find_map(|shortcut| {
            if content == shortcut.name {
                return Some(ShortcutMatch {
                    shortcut: shortcut.clone(),
                    rest: String::new(),
                });
            }
            if !shortcut.options.fuzzy {
                return None;
            }
            content
                .strip_prefix(shortcut.name.as_str())
                .map(|rest| ShortcutMatch {
                    shortcut: shortcut.clone(),
                    rest: rest.trim_start().to_string(),
                })
        })
    }

    /// Subscribe to structural changes
    pub fn subscribe(&self, listener: Arc<dyn CommandListener>) {
        self.listeners.subscribe(listener);
    }

    /// The notification fan-out
    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }
}

fn conflict(kind: NameKind, name: &str, owner: &Command) -> Error {
    warn!(
        target: "cmdtree::registry",
        kind = %kind,
        name = %name,
        owner = %owner.name(),
        "Name conflict"
    );
    Error::name_conflict(kind, name, owner.name())
}
