//! Configuration error types with source location tracking

// False positives from miette's derive macros - fields are used but rustc doesn't see it
#![allow(unused_assignments)]

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Top-level configuration errors
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file: {path}")]
    #[diagnostic(code(desktop_shortcuts::config::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {msg}")]
    #[diagnostic(
        code(desktop_shortcuts::config::parse),
        help("known keys: identity = \"GNOME\", languages = [\"de_DE\"]")
    )]
    #[allow(unused_assignments)] // Fields used by miette's derive macros
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error")]
        span: Option<SourceSpan>,
        msg: String,
    },
}

impl ConfigError {
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
        err: toml::de::Error,
    ) -> Self {
        let name: String = source_name.into();
        Self::Parse {
            src: NamedSource::new(name, source_content),
            span: err.span().map(|r| (r.start, r.len()).into()),
            msg: err.message().to_string(),
        }
    }
}
