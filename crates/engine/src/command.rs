//! Command nodes
//!
//! A [`Command`] is a cheap handle (`Arc`) around one node of the command
//! tree. Two handles are equal when they point at the same node.
//!
//! ## Ownership
//!
//! - The [`Registry`] and a node's parent hold strong handles.
//! - A node points back at its parent and its registry weakly.
//! - Disposal breaks every strong link, so a disposed subtree is freed
//!   once callers drop their handles.
//!
//! ## Locking
//!
//! Each node guards its mutable state with its own `RwLock`. No method holds
//! a node lock while taking the registry lock or another node's lock, and
//! no lock is held while user callbacks run.

use cmdtree_core::{CommandConfig, Error, Result, ScopeId};
use parking_lot::RwLock;
use serde_json::Value;
use smallvec::SmallVec;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};
use tracing::debug;

use crate::config::DEFAULT_AUTHORITY;
use crate::registry::Registry;

/// Zero-argument teardown callback
pub type Disposable = Box<dyn FnOnce() + Send + Sync + 'static>;

/// Options attached to a shortcut trigger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutOptions {
    /// Only fire when the message carried the bot's command prefix
    pub prefix: bool,
    /// Also match when the trigger is followed by more text
    pub fuzzy: bool,
    /// Arguments injected when the shortcut fires
    pub args: Vec<String>,
}

/// A trigger string that invokes a command without its primary name
#[derive(Clone)]
pub struct Shortcut {
    /// The trigger text
    pub name: String,
    /// The command it invokes
    pub command: Command,
    /// Matching options
    pub options: ShortcutOptions,
}

impl fmt::Debug for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shortcut")
            .field("name", &self.name)
            .field("command", &self.command.name())
            .field("options", &self.options)
            .finish()
    }
}

struct CommandInner {
    name: String,
    declaration: String,
    scope: ScopeId,
    registry: Weak<Registry>,
    state: RwLock<CommandState>,
}

struct CommandState {
    parent: Option<Weak<CommandInner>>,
    children: Vec<Command>,
    aliases: SmallVec<[String; 2]>,
    shortcuts: SmallVec<[String; 2]>,
    config: CommandConfig,
    disposables: Vec<Disposable>,
    disposed: bool,
}

/// One addressable command or subcommand
#[derive(Clone)]
pub struct Command {
    inner: Arc<CommandInner>,
}

impl Command {
    pub(crate) fn new(
        registry: &Arc<Registry>,
        name: String,
        declaration: &str,
        scope: ScopeId,
        config: CommandConfig,
    ) -> Self {
        Self {
            inner: Arc::new(CommandInner {
                name,
                declaration: declaration.to_string(),
                scope,
                registry: Arc::downgrade(registry),
                state: RwLock::new(CommandState {
                    parent: None,
                    children: Vec::new(),
                    aliases: SmallVec::new(),
                    shortcuts: SmallVec::new(),
                    config,
                    disposables: Vec::new(),
                    disposed: false,
                }),
            }),
        }
    }

    fn from_inner(inner: Arc<CommandInner>) -> Self {
        Self { inner }
    }

    /// Canonical name, unique within the registry
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Raw argument declaration, handed to the argument parser later
    pub fn declaration(&self) -> &str {
        &self.inner.declaration
    }

    /// Scope that created this command
    pub fn scope_id(&self) -> ScopeId {
        self.inner.scope
    }

    /// The owning command, if any
    pub fn parent(&self) -> Option<Command> {
        self.inner
            .state
            .read()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(Command::from_inner)
    }

    /// Subcommands, in attachment order
    pub fn children(&self) -> Vec<Command> {
        self.inner.state.read().children.clone()
    }

    /// Alternate names, in registration order
    pub fn aliases(&self) -> Vec<String> {
        self.inner.state.read().aliases.to_vec()
    }

    /// Shortcut triggers owned by this command
    pub fn shortcuts(&self) -> Vec<String> {
        self.inner.state.read().shortcuts.to_vec()
    }

    /// Snapshot of the config
    pub fn config(&self) -> CommandConfig {
        self.inner.state.read().config.clone()
    }

    /// Read one config key
    pub fn config_value(&self, key: &str) -> Option<Value> {
        self.inner.state.read().config.get(key).cloned()
    }

    /// Access level; falls back to [`DEFAULT_AUTHORITY`] when unset
    pub fn authority(&self) -> u32 {
        self.inner
            .state
            .read()
            .config
            .authority()
            .unwrap_or(DEFAULT_AUTHORITY)
    }

    /// Set one config key, returning the previous value
    pub fn set_config(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.inner.state.write().config.set(key, value)
    }

    /// Shallow-merge a config into this command's config
    pub fn merge_config(&self, config: &CommandConfig) {
        self.inner.state.write().config.merge(config);
    }

    /// Whether [`Command::dispose`] has run
    pub fn is_disposed(&self) -> bool {
        self.inner.state.read().disposed
    }

    /// Whether this command appears in `other`'s parent chain
    pub fn is_ancestor_of(&self, other: &Command) -> bool {
        let mut current = other.parent();
        while let Some(node) = current {
            if node == *self {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Number of ancestors
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(node) = current {
            depth += 1;
            current = node.parent();
        }
        depth
    }

    /// Register an alternate name
    ///
    /// Aliasing the same string twice is a no-op.
    ///
    /// # Errors
    ///
    /// - [`Error::NameConflict`] if another command owns the string as a name or alias
    /// - [`Error::Disposed`] if this command has been disposed
    pub fn alias(&self, name: &str) -> Result<&Self> {
        self.add_alias(name)?;
        Ok(self)
    }

    /// Register an alias, returning whether it was newly added
    pub(crate) fn add_alias(&self, name: &str) -> Result<bool> {
        let registry = self.live_registry()?;
        if !registry.register_alias(name, self)? {
            return Ok(false);
        }
        let mut state = self.inner.state.write();
        if !state.aliases.iter().any(|a| a == name) {
            state.aliases.push(name.to_string());
        }
        Ok(true)
    }

    /// Remove an alias owned by this command; returns whether it was present
    pub fn unalias(&self, name: &str) -> bool {
        let removed = {
            let mut state = self.inner.state.write();
            let before = state.aliases.len();
            state.aliases.retain(|a| a != name);
            before != state.aliases.len()
        };
        if let Some(registry) = self.inner.registry.upgrade() {
            registry.unregister_alias(name, self);
        }
        removed
    }

    /// Register a shortcut trigger
    ///
    /// # Errors
    ///
    /// - [`Error::NameConflict`] if another command owns the trigger
    /// - [`Error::Disposed`] if this command has been disposed
    pub fn shortcut(&self, name: &str, options: ShortcutOptions) -> Result<&Self> {
        self.add_shortcut(name, options)?;
        Ok(self)
    }

    pub(crate) fn add_shortcut(&self, name: &str, options: ShortcutOptions) -> Result<bool> {
        let registry = self.live_registry()?;
        let shortcut = Shortcut {
            name: name.to_string(),
            command: self.clone(),
            options,
        };
        if !registry.register_shortcut(shortcut)? {
            return Ok(false);
        }
        let mut state = self.inner.state.write();
        if !state.shortcuts.iter().any(|s| s == name) {
            state.shortcuts.push(name.to_string());
        }
        Ok(true)
    }

    /// Remove a shortcut owned by this command; returns whether it was present
    pub fn remove_shortcut(&self, name: &str) -> bool {
        let removed = {
            let mut state = self.inner.state.write();
            let before = state.shortcuts.len();
            state.shortcuts.retain(|s| s != name);
            before != state.shortcuts.len()
        };
        if let Some(registry) = self.inner.registry.upgrade() {
            registry.unregister_shortcut(name, self);
        }
        removed
    }

    /// Add a teardown callback, run when this command is disposed
    ///
    /// Callbacks run most recently added first. On a disposed command the
    /// callback runs immediately.
    pub fn on_dispose<F>(&self, callback: F)
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        {
            let mut state = self.inner.state.write();
            if !state.disposed {
                state.disposables.push(Box::new(callback));
                return;
            }
        }
        callback();
    }

    /// Dispose this command and its whole subtree
    ///
    /// Post-order: children go first, then this command's own callbacks
    /// (newest first), its aliases, shortcuts and registry entry; finally
    /// it is unlinked from its parent. Disposing twice is a no-op.
    pub fn dispose(&self) {
        self.dispose_with(true);
    }

    pub(crate) fn dispose_with(&self, notify: bool) {
        let disposables = {
            let mut state = self.inner.state.write();
            if state.disposed {
                return;
            }
            state.disposed = true;
            std::mem::take(&mut state.disposables)
        };

        for child in self.children() {
            child.dispose_with(notify);
        }
        for dispose in disposables.into_iter().rev() {
            dispose();
        }

        let (aliases, shortcuts) = {
            let mut state = self.inner.state.write();
            state.children.clear();
            (
                std::mem::take(&mut state.aliases),
                std::mem::take(&mut state.shortcuts),
            )
        };

        let registry = self.inner.registry.upgrade();
        if let Some(registry) = &registry {
            for alias in &aliases {
                registry.unregister_alias(alias, self);
            }
            for shortcut in &shortcuts {
                registry.unregister_shortcut(shortcut, self);
            }
            registry.unregister(self);
        }
        self.detach();

        debug!(target: "cmdtree::command", command = %self.name(), "Command disposed");
        if notify {
            if let Some(registry) = &registry {
                registry.listeners().emit_removed(self);
            }
        }
    }

    /// Link this command under `parent`
    pub(crate) fn attach(&self, parent: &Command) {
        self.inner.state.write().parent = Some(Arc::downgrade(&parent.inner));
        parent.inner.state.write().children.push(self.clone());
    }

    /// Unlink this command from its parent, returning the former parent
    pub(crate) fn detach(&self) -> Option<Command> {
        let parent = self
            .inner
            .state
            .write()
            .parent
            .take()
            .and_then(|weak| weak.upgrade())
            .map(Command::from_inner)?;
        parent
            .inner
            .state
            .write()
            .children
            .retain(|child| child != self);
        Some(parent)
    }

    fn live_registry(&self) -> Result<Arc<Registry>> {
        if self.is_disposed() {
            return Err(Error::disposed(self.name()));
        }
        self.inner
            .registry
            .upgrade()
            .ok_or_else(|| Error::disposed(self.name()))
    }
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Command {}

impl Hash for Command {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.inner) as usize).hash(state);
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Command <{}>", self.name())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
