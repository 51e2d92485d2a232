//! Minimal application descriptors
//!
//! A descriptor is built from a `[Desktop Entry]` group holding a name and an
//! exec line. The exec line is tokenized once here so launchers only deal
//! with an argument vector.

use crate::keyfile::{KeyFile, KeyFileError, LookupError, value};
use thiserror::Error;

/// Group holding the launchable entry
pub const DESKTOP_GROUP: &str = "Desktop Entry";
pub const KEY_NAME: &str = "Name";
pub const KEY_EXEC: &str = "Exec";
pub const KEY_TYPE: &str = "Type";

const TYPE_APPLICATION: &str = "Application";

/// Errors raised while turning desktop data into a launchable descriptor
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("descriptor does not parse: {0}")]
    Parse(#[from] KeyFileError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("unsupported entry type '{0}'")]
    UnsupportedType(String),

    #[error("unbalanced quoting in exec line '{0}'")]
    Tokenize(String),

    #[error("exec line '{0}' has no command")]
    EmptyCommand(String),

    #[error("exec line '{0}' ends with a lone '%'")]
    DanglingPercent(String),

    #[error("invalid field code '%{code}' in exec line '{exec}'")]
    InvalidFieldCode { code: char, exec: String },
}

/// A parsed single-entry application, ready to launch
///
/// `argv` always holds at least the program; `expand_exec` rejects exec
/// lines that expand to nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDescriptor {
    name: String,
    exec: String,
    argv: Vec<String>,
}

impl AppDescriptor {
    /// Build a descriptor from the `[Desktop Entry]` group of a key file
    ///
    /// `Type` defaults to `Application` when absent.
    pub fn from_keyfile(keyfile: &KeyFile) -> Result<Self, DescriptorError> {
        if keyfile.has_key(DESKTOP_GROUP, KEY_TYPE) {
            let entry_type = keyfile.string(DESKTOP_GROUP, KEY_TYPE)?;
            if entry_type != TYPE_APPLICATION {
                return Err(DescriptorError::UnsupportedType(entry_type));
            }
        }

        let name = keyfile.locale_string(DESKTOP_GROUP, KEY_NAME)?;
        let exec = keyfile.locale_string(DESKTOP_GROUP, KEY_EXEC)?;
        let argv = expand_exec(&exec, &name)?;

        Ok(Self { name, exec, argv })
    }

    /// Parse desktop data text and build a descriptor from it
    pub fn from_data(source_name: &str, data: String) -> Result<Self, DescriptorError> {
        let keyfile = KeyFile::parse(source_name, data)?.with_languages(Vec::<String>::new());
        Self::from_keyfile(&keyfile)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The exec line as written, before tokenizing
    pub fn exec(&self) -> &str {
        &self.exec
    }

    /// Program followed by its arguments, field codes expanded
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }
}

/// Render a single-group desktop entry holding only a name and an exec line
///
/// Values are escaped so the text always parses back to the same strings.
pub fn synthesize(name: &str, exec: &str) -> String {
    format!(
        "[{DESKTOP_GROUP}]\n{KEY_NAME}={}\n{KEY_EXEC}={}\n",
        value::escape(name),
        value::escape(exec)
    )
}

/// Tokenize an exec line and expand its field codes
///
/// No files or URLs are ever passed, so `%f %F %u %U` vanish. `%c` becomes
/// the entry name; `%i` and `%k` have nothing to refer to and are dropped,
/// as are the deprecated codes.
fn expand_exec(exec: &str, name: &str) -> Result<Vec<String>, DescriptorError> {
    let tokens = shlex::split(exec).ok_or_else(|| DescriptorError::Tokenize(exec.to_string()))?;

    let mut argv = Vec::with_capacity(tokens.len());
    for token in tokens {
        if let Some(arg) = expand_token(&token, exec, name)? {
            argv.push(arg);
        }
    }

    if argv.first().is_none_or(|program| program.is_empty()) {
        return Err(DescriptorError::EmptyCommand(exec.to_string()));
    }

    Ok(argv)
}

/// Expand one argument; `None` when it was a lone code expanding to nothing
fn expand_token(token: &str, exec: &str, name: &str) -> Result<Option<String>, DescriptorError> {
    if !token.contains('%') {
        return Ok(Some(token.to_string()));
    }

    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some('c') => out.push_str(name),
            Some('f' | 'F' | 'u' | 'U' | 'i' | 'k' | 'd' | 'D' | 'n' | 'N' | 'v' | 'm') => {}
            Some(code) => {
                return Err(DescriptorError::InvalidFieldCode {
                    code,
                    exec: exec.to_string(),
                });
            }
            None => return Err(DescriptorError::DanglingPercent(exec.to_string())),
        }
    }

    if out.is_empty() {
        return Ok(None);
    }
    Ok(Some(out))
}
