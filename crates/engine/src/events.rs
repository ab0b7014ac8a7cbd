//! Structural-change notifications
//!
//! Listeners (help index, i18n, suggestion caches) learn about commands
//! entering and leaving the tree. Notifications are delivered synchronously,
//! on the thread doing the registration or disposal, with no registry lock
//! held.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::command::Command;

/// Receives `command-added` / `command-removed` events
///
/// Both methods default to no-ops so listeners only implement what they
/// need.
pub trait CommandListener: Send + Sync {
    /// A command was created by a registration call
    fn on_command_added(&self, _command: &Command) {}

    /// A command was disposed
    fn on_command_removed(&self, _command: &Command) {}
}

/// Subscriber list owned by a registry
#[derive(Default)]
pub struct Listeners {
    inner: RwLock<Vec<Arc<dyn CommandListener>>>,
}

impl Listeners {
    /// Add a listener
    pub fn subscribe(&self, listener: Arc<dyn CommandListener>) {
        self.inner.write().push(listener);
    }

    /// Number of listeners
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether nobody is listening
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub(crate) fn emit_added(&self, command: &Command) {
        for listener in self.snapshot() {
            listener.on_command_added(command);
        }
    }

    pub(crate) fn emit_removed(&self, command: &Command) {
        for listener in self.snapshot() {
            listener.on_command_removed(command);
        }
    }

    // Listeners may subscribe others while being notified.
    fn snapshot(&self) -> Vec<Arc<dyn CommandListener>> {
        self.inner.read().clone()
    }
}
