//! cmdtree - Command tree construction and resolution for chat bots
//!
//! cmdtree turns declarative path strings such as `"a.b/c <arg>"` into a
//! live hierarchy of commands, keeps a consistent name/alias registry, and
//! lets independently loaded extensions register and later withdraw their
//! commands without disturbing anyone else's.
//!
//! # Quick Start
//!
//! ```ignore
//! use cmdtree::{Commander, CommandOptions};
//!
//! let app = Commander::new();
//! let plugin = app.scope("weather");
//!
//! // "weather" and "weather.forecast"; the leaf keeps "<city>"
//! let forecast = plugin.command("weather.forecast <city>")?;
//! forecast.alias("wf")?;
//!
//! assert_eq!(app.resolve("weather.forecast.week"), Some(forecast));
//!
//! // Unloading the extension removes everything it created
//! plugin.dispose();
//! assert!(app.get("weather").is_none());
//! ```
//!
//! # Architecture
//!
//! Path compiling, config and errors live in `cmdtree-core`; the registry,
//! tree builder, patch controller and scopes live in `cmdtree-engine`.
//! Everything public is re-exported here.

pub use cmdtree_engine::*;
