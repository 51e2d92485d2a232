//! Desktop file error types
//!
//! Load errors carry the source text so miette can point at the offending line.

// False positives from miette's derive macros - fields are used but rustc doesn't see it
#![allow(unused_assignments)]

use super::value::ValueError;
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::ops::Range;
use thiserror::Error;

/// Errors raised while loading a desktop file
#[derive(Debug, Error, Diagnostic)]
pub enum KeyFileError {
    #[error("failed to read desktop file: {path}")]
    #[diagnostic(code(desktop_shortcuts::keyfile::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse desktop file: {msg} (line {line})")]
    #[diagnostic(code(desktop_shortcuts::keyfile::parse))]
    #[allow(unused_assignments)] // Fields used by miette's derive macros
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("{label}")]
        span: SourceSpan,
        label: String,
        msg: String,
        line: usize,
        #[help]
        help: Option<String>,
    },
}

impl KeyFileError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    #[allow(unused_assignments)] // Field assignments used by miette's derive macros
    pub fn parse(
        source_name: impl Into<String>,
        source_content: String,
        span: Range<usize>,
        line: usize,
        issue: ParseIssue,
    ) -> Self {
        let name: String = source_name.into();
        Self::Parse {
            src: NamedSource::new(name, source_content),
            span: (span.start, span.len()).into(),
            label: issue.label.to_string(),
            msg: issue.message,
            line,
            help: issue.help.map(str::to_string),
        }
    }

    /// 1-based line number of a parse error
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Parse { line, .. } => Some(*line),
            Self::Io { .. } => None,
        }
    }
}

/// What went wrong on a single line
#[derive(Debug, Clone)]
pub struct ParseIssue {
    pub message: String,
    pub label: &'static str,
    pub help: Option<&'static str>,
}

impl ParseIssue {
    pub fn unterminated_group() -> Self {
        Self {
            message: "group header is missing its closing ']'".to_string(),
            label: "unterminated group",
            help: Some("group headers look like: [Desktop Entry]"),
        }
    }

    pub fn invalid_group_name(name: &str) -> Self {
        Self {
            message: format!("invalid group name '{name}'"),
            label: "invalid group name",
            help: Some("group names may not be empty or contain '[', ']' or control characters"),
        }
    }

    pub fn key_outside_group(key: &str) -> Self {
        Self {
            message: format!("key '{key}' appears before the first group"),
            label: "no group",
            help: Some("add a group header such as [Desktop Entry] above this line"),
        }
    }

    pub fn invalid_key(key: &str) -> Self {
        Self {
            message: format!("invalid key name '{key}'"),
            label: "invalid key",
            help: Some("keys look like: Name or Name[de_DE]"),
        }
    }

    pub fn not_a_key_value() -> Self {
        Self {
            message: "line is not a group header, key-value pair, or comment".to_string(),
            label: "unrecognized line",
            help: None,
        }
    }
}

/// Errors raised when reading a value out of a loaded desktop file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("group '{0}' not found")]
    GroupNotFound(String),

    #[error("key '{key}' not found in group '{group}'")]
    KeyNotFound { group: String, key: String },

    #[error("invalid value for key '{key}' in group '{group}': {source}")]
    InvalidValue {
        group: String,
        key: String,
        #[source]
        source: ValueError,
    },
}

impl LookupError {
    pub(crate) fn invalid_value(group: &str, key: &str, source: ValueError) -> Self {
        Self::InvalidValue {
            group: group.to_string(),
            key: key.to_string(),
            source,
        }
    }
}
