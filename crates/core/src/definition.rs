//! Command definition compiler
//!
//! A definition string looks like `"a.b/c <arg> [opt]"`. The first
//! whitespace-delimited token is the *path*; the remainder is the argument
//! declaration, passed through untouched for the argument parser.
//!
//! ## Path syntax
//!
//! The path is split before every `.` and `/`:
//!
//! | Segment | Kind | Resolved name |
//! |---------|------|---------------|
//! | `a` (first) | bare | `a` |
//! | `.b` | relative | `<parent>.b` |
//! | `/c` | absolute | `c` |
//!
//! So `"a.b/c"` compiles to the names `a`, `a.b`, `c`, each the parent of
//! the next.
//!
//! The first segment is always bare. A leading `.` or `/` on it is dropped
//! since there is no parent to be relative to.

use crate::error::{Error, Result};

/// One step of a compiled path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain name, always the first segment
    Bare(String),
    /// `.name`: appended to the parent's name with a dot
    Relative(String),
    /// `/name`: a plain name independent of the parent's name
    Absolute(String),
}

impl Segment {
    /// Resolve this segment against the canonical name of its parent
    pub fn resolve(&self, parent: Option<&str>) -> String {
        match (self, parent) {
            (Segment::Relative(text), Some(parent)) => format!("{}.{}", parent, text),
            (Segment::Relative(text), None)
            | (Segment::Bare(text), _)
            | (Segment::Absolute(text), _) => text.clone(),
        }
    }

    /// Segment text without its prefix
    pub fn text(&self) -> &str {
        match self {
            Segment::Bare(text) | Segment::Relative(text) | Segment::Absolute(text) => text,
        }
    }

    /// Whether the resolved name depends on the parent's name
    pub fn is_relative(&self) -> bool {
        matches!(self, Segment::Relative(_))
    }
}

/// A compiled command definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    path: String,
    segments: Vec<Segment>,
    declaration: String,
}

impl Definition {
    /// Compile a definition string, preserving case
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyDefinition`] if there is no path
    /// - [`Error::InvalidSegment`] if a segment is empty after its prefix
    pub fn parse(def: &str) -> Result<Self> {
        Self::parse_with(def, false)
    }

    /// Compile a definition string, optionally lowercasing the path
    ///
    /// The declaration is never case-folded.
    pub fn parse_with(def: &str, lowercase: bool) -> Result<Self> {
        let def = def.trim_start();
        let end = def.find(char::is_whitespace).unwrap_or(def.len());
        let (path, declaration) = def.split_at(end);
        if path.is_empty() {
            return Err(Error::EmptyDefinition);
        }

        let path = if lowercase {
            path.to_lowercase()
        } else {
            path.to_string()
        };

        let segments = split_path(&path)
            .into_iter()
            .enumerate()
            .map(|(index, raw)| compile_segment(&path, index, raw))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            path,
            segments,
            declaration: declaration.to_string(),
        })
    }

    /// The path token as compiled
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Compiled segments, root first
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The argument declaration, belonging to the last segment only
    pub fn declaration(&self) -> &str {
        &self.declaration
    }

    /// Number of segments (never zero)
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; a compiled definition has at least one segment
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Names of every segment, assuming each one's parent is the previous segment
    pub fn resolve_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            let name = segment.resolve(names.last().map(String::as_str));
            names.push(name);
        }
        names
    }

    /// The name the last segment resolves to
    pub fn leaf_name(&self) -> String {
        self.resolve_names().pop().unwrap_or_default()
    }
}

/// Split before every `.` or `/` except at position 0
fn split_path(path: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (index, ch) in path.char_indices().skip(1) {
        if ch == '.' || ch == '/' {
            parts.push(&path[start..index]);
            start = index;
        }
    }
    parts.push(&path[start..]);
    parts
}

fn compile_segment(path: &str, index: usize, raw: &str) -> Result<Segment> {
    let (prefix, text) = match raw.chars().next() {
        Some(c @ ('.' | '/')) => (Some(c), &raw[1..]),
        _ => (None, raw),
    };
    if text.is_empty() {
        return Err(Error::InvalidSegment {
            path: path.to_string(),
            segment: raw.to_string(),
        });
    }

    let text = text.to_string();
    Ok(match (index, prefix) {
        (0, _) | (_, None) => Segment::Bare(text),
        (_, Some('.')) => Segment::Relative(text),
        _ => Segment::Absolute(text),
    })
}
