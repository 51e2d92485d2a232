//! Shortcut actions from desktop entry files
//!
//! Desktop files can describe quick actions in extra groups named
//! `"<nick> Shortcut Group"`. This crate finds the ones meant for the
//! current desktop environment, resolves their display names, and launches
//! them as standalone commands.
//!
//! ```no_run
//! use desktop_shortcuts::ShortcutSet;
//!
//! let set = ShortcutSet::new("/usr/share/applications/firefox.desktop", "GNOME")?;
//! for nick in set.nicks() {
//!     println!("{nick}: {:?}", set.nick_get_name(nick));
//! }
//! # Ok::<(), desktop_shortcuts::LoadError>(())
//! ```

pub mod config;
pub mod keyfile;
pub mod launch;
mod shortcuts;

pub use shortcuts::{GROUP_SUFFIX, LoadError, ShortcutError, ShortcutSet};
