//! Desktop file shortcut groups
//!
//! A desktop file may carry extra groups named `"<nick> Shortcut Group"`,
//! each describing one quick action with a `Name`, an `Exec` line and
//! optional `OnlyShowIn` / `NotShowIn` rules. `ShortcutSet` loads such a
//! file once, keeps the nicks visible to one desktop environment, and lets
//! callers look up names or launch actions by nick.
//!
//! ## Public API
//!
//! `nick_get_name` and `nick_exec` log failures and return `None` / `false`.
//! `name` and `exec` return the underlying `ShortcutError` instead.

use crate::keyfile::{KeyFile, KeyFileError, LookupError};
use crate::launch::{
    AppDescriptor, DescriptorError, KEY_EXEC, KEY_NAME, LaunchError, Launcher, SystemLauncher,
    synthesize,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Suffix that marks a group as a shortcut group
pub const GROUP_SUFFIX: &str = " Shortcut Group";

/// Errors raised when loading a shortcut set
pub type LoadError = KeyFileError;

/// Why a shortcut lookup or launch failed
#[derive(Debug, Error)]
pub enum ShortcutError {
    #[error("'{0}' is not a shortcut of this desktop file")]
    InvalidNick(String),

    #[error("the group for nick '{0}' doesn't exist anymore")]
    MissingGroup(String),

    #[error("no {key} available for nick '{nick}'")]
    MissingKey { nick: String, key: &'static str },

    #[error("unreadable {key} for nick '{nick}': {source}")]
    InvalidValue {
        nick: String,
        key: &'static str,
        #[source]
        source: LookupError,
    },

    #[error("unable to build desktop entry for executing shortcut '{nick}': {source}")]
    Synthesis {
        nick: String,
        #[source]
        source: DescriptorError,
    },

    #[error("unable to launch shortcut '{nick}': {source}")]
    Launch {
        nick: String,
        #[source]
        source: LaunchError,
    },
}

/// The shortcuts of one desktop file, as seen from one desktop environment
///
/// Immutable once built: the identity is fixed at construction and the nick
/// list never changes afterwards.
#[derive(Debug)]
pub struct ShortcutSet {
    source: KeyFile,
    path: Option<PathBuf>,
    identity: String,
    /// Visible nicks in file order
    nicks: Vec<String>,
    /// Same nicks, for membership checks
    index: HashSet<String>,
}

impl ShortcutSet {
    /// Load the desktop file at `path` and keep the shortcuts shown in `identity`
    ///
    /// Blocks on file I/O.
    pub fn new(path: impl AsRef<Path>, identity: impl Into<String>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let source = KeyFile::load(path)?;
        let mut set = Self::from_keyfile(source, identity);
        set.path = Some(path.to_path_buf());
        Ok(set)
    }

    /// Build from desktop file text already in memory
    pub fn parse(
        source_name: &str,
        content: String,
        identity: impl Into<String>,
    ) -> Result<Self, LoadError> {
        let source = KeyFile::parse(source_name, content)?;
        Ok(Self::from_keyfile(source, identity))
    }

    /// Build from an already parsed desktop file
    pub fn from_keyfile(source: KeyFile, identity: impl Into<String>) -> Self {
        let identity = identity.into();
        let (nicks, index) = discover(&source, &identity);

        info!(
            identity = %identity,
            shortcuts = nicks.len(),
            "loaded desktop shortcuts"
        );

        Self {
            source,
            path: None,
            identity,
            nicks,
            index,
        }
    }

    /// Visible nicks in file order; empty when the file has none
    pub fn nicks(&self) -> &[String] {
        &self.nicks
    }

    /// Desktop environment the set was filtered for
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// File the set was loaded from, if it came from disk
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether `nick` is one of the visible nicks (exact, case-sensitive)
    pub fn is_valid_nick(&self, nick: &str) -> bool {
        self.index.contains(nick)
    }

    /// Each visible nick with its display name
    pub fn shortcuts(&self) -> impl Iterator<Item = (&str, Option<String>)> {
        self.nicks
            .iter()
            .map(|nick| (nick.as_str(), self.nick_get_name(nick)))
    }

    /// Localized display name for `nick`, or `None` (logged) on any failure
    pub fn nick_get_name(&self, nick: &str) -> Option<String> {
        self.name(nick)
            .inspect_err(|err| warn!(nick, "{err}"))
            .ok()
    }

    /// Launch the action for `nick` as a detached process
    ///
    /// Returns whether the process was started. Failures are logged.
    pub fn nick_exec(&self, nick: &str) -> bool {
        self.nick_exec_with(nick, &SystemLauncher)
    }

    /// Like `nick_exec`, through a caller-supplied launcher
    pub fn nick_exec_with(&self, nick: &str, launcher: &impl Launcher) -> bool {
        match self.exec(nick, launcher) {
            Ok(()) => true,
            Err(err) => {
                warn!(nick, "{err}");
                false
            }
        }
    }

    /// Localized display name for `nick`
    pub fn name(&self, nick: &str) -> Result<String, ShortcutError> {
        let group = self.group_for(nick)?;
        self.require_key(nick, &group, KEY_NAME)?;
        self.localized(nick, &group, KEY_NAME)
    }

    /// Build a one-entry descriptor from the shortcut and hand it to `launcher`
    pub fn exec(&self, nick: &str, launcher: &impl Launcher) -> Result<(), ShortcutError> {
        let group = self.group_for(nick)?;
        self.require_key(nick, &group, KEY_NAME)?;
        self.require_key(nick, &group, KEY_EXEC)?;

        let name = self.localized(nick, &group, KEY_NAME)?;
        let exec = self.localized(nick, &group, KEY_EXEC)?;

        let data = synthesize(&name, &exec);
        let app = AppDescriptor::from_data(&group, data).map_err(|source| {
            ShortcutError::Synthesis {
                nick: nick.to_string(),
                source,
            }
        })?;

        debug!(nick, argv = ?app.argv(), "launching shortcut");

        launcher.launch(&app).map_err(|source| ShortcutError::Launch {
            nick: nick.to_string(),
            source,
        })
    }

    /// Group name for a valid nick that still exists in the source
    fn group_for(&self, nick: &str) -> Result<String, ShortcutError> {
        if !self.is_valid_nick(nick) {
            return Err(ShortcutError::InvalidNick(nick.to_string()));
        }

        let group = format!("{nick}{GROUP_SUFFIX}");
        if !self.source.has_group(&group) {
            return Err(ShortcutError::MissingGroup(nick.to_string()));
        }
        Ok(group)
    }

    fn require_key(&self, nick: &str, group: &str, key: &'static str) -> Result<(), ShortcutError> {
        if self.source.has_key(group, key) {
            Ok(())
        } else {
            Err(ShortcutError::MissingKey {
                nick: nick.to_string(),
                key,
            })
        }
    }

    fn localized(&self, nick: &str, group: &str, key: &'static str) -> Result<String, ShortcutError> {
        self.source
            .locale_string(group, key)
            .map_err(|source| ShortcutError::InvalidValue {
                nick: nick.to_string(),
                key,
                source,
            })
    }
}

/// Collect visible nicks in file order
///
/// The first group wins when two groups yield the same nick.
fn discover(source: &KeyFile, identity: &str) -> (Vec<String>, HashSet<String>) {
    let mut nicks = Vec::new();
    let mut index = HashSet::new();

    for group in source.groups() {
        let Some(nick) = group.strip_suffix(GROUP_SUFFIX) else {
            continue;
        };

        if nick.is_empty() {
            warn!(group, "shortcut group has an empty nick, skipping");
            continue;
        }

        match source.should_show(group, identity) {
            Ok(true) => {}
            Ok(false) => {
                debug!(nick, identity, "shortcut not shown for this identity");
                continue;
            }
            Err(err) => {
                warn!(nick, "unreadable visibility rules, skipping shortcut: {err}");
                continue;
            }
        }

        if !index.insert(nick.to_string()) {
            warn!(nick, "duplicate shortcut nick, keeping the first one");
            continue;
        }
        nicks.push(nick.to_string());
    }

    (nicks, index)
}
