//! Application launch layer
//!
//! Provides:
//! - `AppDescriptor`, a parsed single-entry application
//! - The `Launcher` trait that turns a descriptor into a running process
//! - `SystemLauncher`, which spawns detached processes
//!
//! Launching is fire-and-forget: a successful launch only means the process
//! was started.

mod descriptor;
#[cfg(test)]
pub(crate) mod mock;
mod system;

pub use descriptor::{
    AppDescriptor, DESKTOP_GROUP, DescriptorError, KEY_EXEC, KEY_NAME, KEY_TYPE, synthesize,
};
pub use system::SystemLauncher;

use thiserror::Error;

/// Errors reported by a launcher
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Interface contract for launch facilities.
///
/// Implementations start the descriptor's command with no files, no launch
/// context and the default environment, and return once the process exists.
pub trait Launcher {
    fn launch(&self, app: &AppDescriptor) -> Result<(), LaunchError>;
}
