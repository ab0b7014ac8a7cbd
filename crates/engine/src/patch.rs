//! Patch controller
//!
//! A patch registration temporarily augments an existing command for the
//! lifetime of the calling scope. Instead of the command itself, the caller
//! gets a [`PatchedCommand`]: a shadow that
//!
//! - reads through to the target for anything it does not set itself,
//! - keeps its own config overlay, invisible through the target,
//! - owns a disposal list that is tied to the caller's scope.
//!
//! Aliases and shortcuts added through the shadow are registered on the
//! target (so lookups find them) and removed again when the shadow is
//! disposed. Once disposed, the target is exactly as it was before the
//! patch.

use cmdtree_core::{CommandConfig, Result, PATCH};
use parking_lot::RwLock;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::builder::BuildOutcome;
use crate::command::{Command, Disposable, ShortcutOptions};
use crate::scope::Scope;

struct PatchState {
    overlay: CommandConfig,
    disposables: Vec<Disposable>,
    disposed: bool,
}

/// Scope-bound shadow of a command
#[derive(Clone)]
pub struct PatchedCommand {
    target: Command,
    state: Arc<RwLock<PatchState>>,
}

impl PatchedCommand {
    pub(crate) fn new(target: Command, overlay: CommandConfig) -> Self {
        Self {
            target,
            state: Arc::new(RwLock::new(PatchState {
                overlay,
                disposables: Vec::new(),
                disposed: false,
            })),
        }
    }

    /// The command being patched
    pub fn target(&self) -> &Command {
        &self.target
    }

    /// Name of the target
    pub fn name(&self) -> &str {
        self.target.name()
    }

    /// Read a config key, overlay first
    pub fn config_value(&self, key: &str) -> Option<Value> {
        let overlay = self.state.read().overlay.get(key).cloned();
        overlay.or_else(|| self.target.config_value(key))
    }

    /// The effective config: the target's with the overlay merged on top
    pub fn config(&self) -> CommandConfig {
        let mut config = self.target.config();
        config.merge(&self.state.read().overlay);
        config
    }

    /// Only the keys set through this shadow
    pub fn overlay(&self) -> CommandConfig {
        self.state.read().overlay.clone()
    }

    /// Effective access level
    pub fn authority(&self) -> u32 {
        let overlay = self.state.read().overlay.authority();
        overlay.unwrap_or_else(|| self.target.authority())
    }

    /// Set a config key on the overlay, returning the previous overlay value
    pub fn set_config(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.state.write().overlay.set(key, value)
    }

    /// Shallow-merge into the overlay
    pub fn merge_config(&self, config: &CommandConfig) {
        self.state.write().overlay.merge(config);
    }

    /// Alias the target for the lifetime of this patch
    ///
    /// # Errors
    ///
    /// Same as [`Command::alias`].
    pub fn alias(&self, name: &str) -> Result<&Self> {
        if self.target.add_alias(name)? {
            let target = self.target.clone();
            let name = name.to_string();
            self.on_dispose(move || {
                target.unalias(&name);
            });
        }
        Ok(self)
    }

    /// Add a shortcut to the target for the lifetime of this patch
    ///
    /// # Errors
    ///
    /// Same as [`Command::shortcut`].
    pub fn shortcut(&self, name: &str, options: ShortcutOptions) -> Result<&Self> {
        if self.target.add_shortcut(name, options)? {
            let target = self.target.clone();
            let name = name.to_string();
            self.on_dispose(move || {
                target.remove_shortcut(&name);
            });
        }
        Ok(self)
    }

    /// Add a teardown callback; runs immediately if already disposed
    pub fn on_dispose<F>(&self, callback: F)
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        {
            let mut state = self.state.write();
            if !state.disposed {
                state.disposables.push(Box::new(callback));
                return;
            }
        }
        callback();
    }

    /// Whether this patch has been torn down
    pub fn is_disposed(&self) -> bool {
        self.state.read().disposed
    }

    /// Revert everything done through this shadow
    ///
    /// Runs the shadow's callbacks newest first and clears the overlay.
    /// Disposing twice is a no-op.
    pub fn dispose(&self) {
        let disposables = {
            let mut state = self.state.write();
            if state.disposed {
                return;
            }
            state.disposed = true;
            state.overlay = CommandConfig::new();
            std::mem::take(&mut state.disposables)
        };
        let count = disposables.len();
        for dispose in disposables.into_iter().rev() {
            dispose();
        }
        debug!(
            target: "cmdtree::patch",
            command = %self.name(),
            callbacks = count,
            "Patch disposed"
        );
    }
}

impl fmt::Debug for PatchedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Patch <{}>", self.name())
    }
}

/// Turn a finished build into a patch registration
///
/// Whatever the build changed is undone right away: created commands are
/// disposed and grafts detached again. The supplied config (minus the
/// `patch` flag) seeds the overlay, and the description overrides the
/// target's only for as long as the patch lives.
pub(crate) fn apply(
    scope: &Scope,
    outcome: BuildOutcome,
    description: Option<&str>,
    mut config: CommandConfig,
) -> PatchedCommand {
    let commander = scope.commander();
    let registry = commander.registry();

    for command in outcome.created() {
        registry.listeners().emit_added(command);
    }
    if !outcome.changes.is_empty() {
        warn!(
            target: "cmdtree::patch",
            command = %outcome.leaf.name(),
            scope = %scope.name(),
            created = outcome.created().len(),
            grafted = outcome.changes.grafted.len(),
            "Patch path changed the tree; undoing"
        );
        outcome.changes.undo(true);
    }

    config.remove(PATCH);
    let shadow = PatchedCommand::new(outcome.leaf, config);

    if let Some(description) = description.filter(|d| !d.is_empty()) {
        if !shadow.target().is_disposed() {
            let layer = commander.override_description(shadow.name(), description);
            let commander = commander.clone();
            let name = shadow.name().to_string();
            shadow.on_dispose(move || commander.restore_description(&name, layer));
        }
    }

    let handle = shadow.clone();
    scope.prepend_disposable(move || handle.dispose());
    debug!(
        target: "cmdtree::patch",
        command = %shadow.name(),
        scope = %scope.name(),
        "Patch registered"
    );
    shadow
}
