//! Tree builder
//!
//! Walks the segments of a compiled [`Definition`] against the registry,
//! creating missing commands and grafting existing parentless ones under
//! the running parent.
//!
//! ## Algorithm
//!
//! For each segment, with a running `parent` (initially none):
//!
//! 1. Resolve the segment's name against `parent`'s canonical name and look
//!    it up (names, then aliases).
//! 2. If found and a parent is set:
//!    - found == parent → [`Error::SelfParent`]
//!    - found has another parent → [`Error::ConflictingParent`]
//!    - found has no parent → graft, unless found is an ancestor of
//!      `parent` ([`Error::SelfParent`])
//! 3. If not found, create it, inheriting `parent`'s authority.
//! 4. The node becomes the running parent.
//!
//! The last parent is the leaf. The first created node is the creation
//! root.
//!
//! ## Undo
//!
//! [`Changes::undo`] reverts one call: every graft it made is detached
//! again (while still in place), then every node it created is disposed,
//! cascading over whatever was registered beneath it since. Nodes the call
//! created below a grafted node are disposed on their own, so nothing the
//! call created survives.
//!
//! On error the partial outcome is undone without notifications.

use cmdtree_core::{CommandConfig, Definition, Error, Result, ScopeId};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::command::Command;
use crate::registry::Registry;

/// An existing command attached under a new parent by one call
#[derive(Debug, Clone)]
pub(crate) struct Graft {
    pub(crate) node: Command,
    pub(crate) parent: Command,
}

/// What one registration call changed in the tree
#[derive(Debug, Clone, Default)]
pub(crate) struct Changes {
    /// Nodes created by this call, in creation order
    pub(crate) created: Vec<Command>,
    /// Existing nodes this call re-parented
    pub(crate) grafted: Vec<Graft>,
}

impl Changes {
    /// Whether the call changed the tree at all
    pub(crate) fn is_empty(&self) -> bool {
        self.created.is_empty() && self.grafted.is_empty()
    }

    /// Revert the call's grafts and dispose what it created
    pub(crate) fn undo(&self, notify: bool) {
        for graft in self.grafted.iter().rev() {
            if graft.node.parent().as_ref() == Some(&graft.parent) {
                graft.node.detach();
                debug!(
                    target: "cmdtree::builder",
                    command = %graft.node.name(),
                    parent = %graft.parent.name(),
                    "Undid graft"
                );
            }
        }
        for command in &self.created {
            command.dispose_with(notify);
        }
    }
}

/// Result of walking one definition
#[derive(Debug, Clone)]
pub(crate) struct BuildOutcome {
    /// The node the definition describes
    pub(crate) leaf: Command,
    /// What this call changed
    pub(crate) changes: Changes,
}

impl BuildOutcome {
    /// Nodes created by this call, in creation order
    pub(crate) fn created(&self) -> &[Command] {
        &self.changes.created
    }
}

pub(crate) fn build(
    registry: &Arc<Registry>,
    scope: ScopeId,
    definition: &Definition,
    default_authority: u32,
) -> Result<BuildOutcome> {
    let mut changes = Changes::default();
    match build_steps(registry, scope, definition, default_authority, &mut changes) {
        Ok(leaf) => Ok(BuildOutcome { leaf, changes }),
        Err(e) => {
            if !changes.is_empty() {
                warn!(
                    target: "cmdtree::builder",
                    path = %definition.path(),
                    error = %e,
                    created = changes.created.len(),
                    grafted = changes.grafted.len(),
                    "Rolling back failed registration"
                );
                changes.undo(false);
            }
            Err(e)
        }
    }
}

fn build_steps(
    registry: &Arc<Registry>,
    scope: ScopeId,
    definition: &Definition,
    default_authority: u32,
    changes: &mut Changes,
) -> Result<Command> {
    let last = definition.len().saturating_sub(1);
    let mut parent: Option<Command> = None;

    for (index, segment) in definition.segments().iter().enumerate() {
        let name = segment.resolve(parent.as_ref().map(Command::name));
        let node = match registry.get(&name) {
            Some(found) => {
                if let Some(parent) = &parent {
                    if adopt(&found, parent, definition.path())? {
                        changes.grafted.push(Graft {
                            node: found.clone(),
                            parent: parent.clone(),
                        });
                    }
                }
                found
            }
            None => {
                let declaration = if index == last {
                    definition.declaration()
                } else {
                    ""
                };
                let authority = parent
                    .as_ref()
                    .map(Command::authority)
                    .unwrap_or(default_authority);
                let node = Command::new(
                    registry,
                    name,
                    declaration,
                    scope,
                    CommandConfig::new().with_authority(authority),
                );
                registry.register(&node)?;
                if let Some(parent) = &parent {
                    node.attach(parent);
                }
                debug!(
                    target: "cmdtree::builder",
                    command = %node.name(),
                    parent = ?parent.as_ref().map(Command::name),
                    "Created command"
                );
                changes.created.push(node.clone());
                node
            }
        };
        parent = Some(node);
    }

    parent.ok_or(Error::EmptyDefinition)
}

/// Place an existing command under `parent`; returns whether it was grafted
fn adopt(found: &Command, parent: &Command, path: &str) -> Result<bool> {
    if found == parent {
        return Err(Error::SelfParent {
            name: found.name().to_string(),
        });
    }
    match found.parent() {
        Some(existing) if existing != *parent => Err(Error::ConflictingParent {
            path: path.to_string(),
            parent: existing.name().to_string(),
            name: found.name().to_string(),
        }),
        Some(_) => Ok(false),
        None => {
            if found.is_ancestor_of(parent) {
                return Err(Error::SelfParent {
                    name: found.name().to_string(),
                });
            }
            found.attach(parent);
            debug!(
                target: "cmdtree::builder",
                command = %found.name(),
                parent = %parent.name(),
                "Grafted command"
            );
            Ok(true)
        }
    }
}
