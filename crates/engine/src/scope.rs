//! Deactivation scopes
//!
//! A [`Scope`] stands for one loaded extension module. It is the caller of
//! every registration and owns an ordered teardown list: when the extension
//! deactivates, [`Scope::dispose`] runs the list front to back.
//!
//! Registration prepends its cleanup (undoing what the call changed in the
//! tree, or tearing down a patch), so the most recent registration is
//! undone first.
//!
//! ```ignore
//! use cmdtree_engine::Commander;
//!
//! let app = Commander::new();
//! let plugin = app.scope("dice");
//! plugin.command("roll <expr>")?.alias("r")?;
//! plugin.command("roll.stats")?;
//!
//! plugin.dispose(); // roll, roll.stats and the alias are gone
//! ```

use cmdtree_core::{CommandConfig, Definition, Error, Result, ScopeId};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::builder;
use crate::command::{Command, Disposable};
use crate::commander::Commander;
use crate::handle::{CommandHandle, CommandOptions};
use crate::patch;

struct ScopeInner {
    id: ScopeId,
    name: String,
    commander: Commander,
    disposables: Mutex<Vec<Disposable>>,
}

/// Registration context of one extension module
#[derive(Clone)]
pub struct Scope {
    inner: Arc<ScopeInner>,
}

impl Scope {
    pub(crate) fn new(commander: Commander, name: String) -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                id: ScopeId::new(),
                name,
                commander,
                disposables: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Unique id, recorded on every command this scope creates
    pub fn id(&self) -> ScopeId {
        self.inner.id
    }

    /// Human-readable name, used in logs
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The commander this scope registers into
    pub fn commander(&self) -> &Commander {
        &self.inner.commander
    }

    /// Register a command from a definition string
    ///
    /// Convenience for [`Scope::register`] without description or config.
    pub fn command(&self, def: &str) -> Result<Command> {
        self.register(def, None, None).map(CommandHandle::into_command)
    }

    /// Register a command with a description and config
    pub fn command_with(&self, def: &str, options: CommandOptions) -> Result<CommandHandle> {
        self.register(def, options.description.as_deref(), Some(options.config))
    }

    /// Register `def` under `parent`
    ///
    /// A `def` starting with `.` is relative to the parent's name
    /// (`parent.def`); anything else becomes `parent/def`.
    ///
    /// # Errors
    ///
    /// [`Error::Disposed`] if `parent` has been disposed, plus everything
    /// [`Scope::register`] returns.
    pub fn subcommand(&self, parent: &Command, def: &str) -> Result<Command> {
        if parent.is_disposed() {
            return Err(Error::disposed(parent.name()));
        }
        let def = if def.starts_with('.') {
            format!("{}{}", parent.name(), def)
        } else {
            format!("{}/{}", parent.name(), def)
        };
        self.command(&def)
    }

    /// Register a command tree path
    ///
    /// Compiles `def`, builds or grafts the nodes it names, merges `config`
    /// into the leaf and defines `description` for it. When the scope is
    /// disposed, the commands this call created are disposed (with whatever
    /// was registered under them since) and its grafts are undone.
    ///
    /// When `config` requests `patch`, the leaf is left untouched and a
    /// [`CommandHandle::Patch`] is returned instead.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyDefinition`], [`Error::InvalidSegment`],
    /// [`Error::SelfParent`], [`Error::ConflictingParent`],
    /// [`Error::NameConflict`].
    pub fn register(
        &self,
        def: &str,
        description: Option<&str>,
        config: Option<CommandConfig>,
    ) -> Result<CommandHandle> {
        let commander = self.commander();
        let settings = commander.config();
        let registry = commander.registry();

        let definition = Definition::parse_with(def, settings.lowercase_paths)?;
        let outcome = builder::build(registry, self.id(), &definition, settings.default_authority)?;
        let config = config.unwrap_or_default();

        if config.patch() {
            return Ok(CommandHandle::Patch(patch::apply(
                self,
                outcome,
                description,
                config,
            )));
        }

        outcome.leaf.merge_config(&config);
        if let Some(description) = description.filter(|d| !d.is_empty()) {
            commander.define_description(outcome.leaf.name(), description);
        }
        for command in outcome.created() {
            registry.listeners().emit_added(command);
        }

        if !outcome.changes.is_empty() {
            let changes = outcome.changes.clone();
            self.prepend_disposable(move || changes.undo(true));
        }
        debug!(
            target: "cmdtree::scope",
            scope = %self.name(),
            command = %outcome.leaf.name(),
            created = outcome.created().len(),
            "Registered command"
        );
        Ok(CommandHandle::Command(outcome.leaf))
    }

    /// Append a teardown callback
    pub fn on_dispose<F>(&self, callback: F)
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        self.inner.disposables.lock().push(Box::new(callback));
    }

    /// Insert a teardown callback at the front of the list
    pub fn prepend_disposable<F>(&self, callback: F)
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        self.inner.disposables.lock().insert(0, Box::new(callback));
    }

    /// Number of pending teardown callbacks
    pub fn pending(&self) -> usize {
        self.inner.disposables.lock().len()
    }

    /// Run and clear the teardown list, front to back
    ///
    /// The scope stays usable; later registrations start a new list.
    pub fn dispose(&self) {
        let disposables = std::mem::take(&mut *self.inner.disposables.lock());
        let count = disposables.len();
        for dispose in disposables {
            dispose();
        }
        info!(
            target: "cmdtree::scope",
            scope = %self.name(),
            callbacks = count,
            "Scope disposed"
        );
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .finish()
    }
}
