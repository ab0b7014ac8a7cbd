//! Top-level command context
//!
//! A [`Commander`] owns one [`Registry`], the locale collaborator and the
//! [`CommanderConfig`]. It hands out [`Scope`]s for extensions to register
//! through and answers read-only lookups.
//!
//! Commanders are independent: two of them (for instance in two tests)
//! never see each other's commands.

use std::fmt;
use std::sync::Arc;

use crate::command::Command;
use crate::config::CommanderConfig;
use crate::events::CommandListener;
use crate::locales::{DescriptionLayers, LayerId, Locales, MemoryLocales};
use crate::registry::{Registry, ShortcutMatch};
use crate::scope::Scope;

struct CommanderInner {
    registry: Arc<Registry>,
    locales: Arc<dyn Locales>,
    descriptions: DescriptionLayers,
    config: CommanderConfig,
}

/// Owner of one command tree
#[derive(Clone)]
pub struct Commander {
    inner: Arc<CommanderInner>,
}

impl Commander {
    /// Create a commander with default config and in-memory locales
    pub fn new() -> Self {
        Self::with_config(CommanderConfig::default())
    }

    /// Create a commander with the given config and in-memory locales
    pub fn with_config(config: CommanderConfig) -> Self {
        Self::with_locales(config, Arc::new(MemoryLocales::new()))
    }

    /// Create a commander with a custom locale store
    pub fn with_locales(config: CommanderConfig, locales: Arc<dyn Locales>) -> Self {
        Self {
            inner: Arc::new(CommanderInner {
                registry: Arc::new(Registry::new()),
                locales,
                descriptions: DescriptionLayers::default(),
                config,
            }),
        }
    }

    /// Open a new registration scope
    pub fn scope(&self, name: impl Into<String>) -> Scope {
        Scope::new(self.clone(), name.into())
    }

    /// The config all scopes register with
    pub fn config(&self) -> &CommanderConfig {
        &self.inner.config
    }

    /// The underlying registry
    pub fn registry(&self) -> &Arc<Registry> {
        &self.inner.registry
    }

    /// The locale collaborator
    pub fn locales(&self) -> &Arc<dyn Locales> {
        &self.inner.locales
    }

    /// Exact lookup by name or alias
    pub fn get(&self, name: &str) -> Option<Command> {
        self.inner.registry.get(name)
    }

    /// Best-effort dotted lookup; see [`Registry::resolve`]
    pub fn resolve(&self, key: &str) -> Option<Command> {
        self.inner.registry.resolve(key)
    }

    /// All live commands in registration order
    pub fn commands(&self) -> Vec<Command> {
        self.inner.registry.commands()
    }

    /// Names and aliases of every command accepted by `predicate`
    pub fn available_aliases<F>(&self, predicate: F) -> Vec<String>
    where
        F: FnMut(&Command) -> bool,
    {
        self.inner.registry.available_aliases(predicate)
    }

    /// Find the shortcut triggered by `content`
    pub fn find_shortcut(&self, content: &str) -> Option<ShortcutMatch> {
        self.inner.registry.find_shortcut(content)
    }

    /// Subscribe to command-added / command-removed notifications
    pub fn subscribe(&self, listener: Arc<dyn CommandListener>) {
        self.inner.registry.subscribe(listener);
    }

    /// Set a command's description; patch overrides stay on top of it
    pub(crate) fn define_description(&self, command: &str, text: &str) {
        let config = &self.inner.config;
        self.inner.descriptions.define_base(
            self.inner.locales.as_ref(),
            &config.locale,
            &config.description_key(command),
            text,
        );
    }

    /// Override a command's description until [`Commander::restore_description`]
    pub(crate) fn override_description(&self, command: &str, text: &str) -> LayerId {
        let config = &self.inner.config;
        self.inner.descriptions.push(
            self.inner.locales.as_ref(),
            &config.locale,
            &config.description_key(command),
            text,
        )
    }

    /// Drop one description override
    pub(crate) fn restore_description(&self, command: &str, layer: LayerId) {
        let config = &self.inner.config;
        self.inner.descriptions.pop(
            self.inner.locales.as_ref(),
            &config.locale,
            &config.description_key(command),
            layer,
        );
    }

    /// The description defined for a command, in the configured locale
    pub fn description(&self, command: &str) -> Option<String> {
        let config = &self.inner.config;
        self.inner
            .locales
            .get(&config.locale, &config.description_key(command))
    }
}

impl Default for Commander {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Commander {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commander")
            .field("commands", &self.inner.registry.len())
            .field("config", &self.inner.config)
            .finish()
    }
}
