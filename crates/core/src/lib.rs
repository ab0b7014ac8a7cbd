//! Core types for cmdtree
//!
//! This crate defines the foundational pieces shared by the engine:
//! - Definition: Compiles `"a.b/c <arg>"` strings into path segments
//! - CommandConfig: The per-command attribute bag
//! - ScopeId: Identifies the extension scope that owns a command
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod definition;
pub mod error;
pub mod types;

pub use config::{CommandConfig, AUTHORITY, PATCH};
pub use definition::{Definition, Segment};
pub use error::{Error, NameKind, Result};
pub use types::ScopeId;
