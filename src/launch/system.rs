//! Process launcher backed by `std::process`
//!
//! The child is started in its own session so it outlives us and is not tied
//! to our terminal. A background thread reaps it; nothing else watches it.

use super::{AppDescriptor, LaunchError, Launcher};
use std::process::{Child, Command, Stdio};
use tracing::{debug, info, warn};

/// Launcher that spawns real, detached processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&self, app: &AppDescriptor) -> Result<(), LaunchError> {
        let mut cmd = Command::new(app.program());
        cmd.args(app.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        detach(&mut cmd);

        let child = cmd.spawn().map_err(|source| LaunchError::Spawn {
            program: app.program().to_string(),
            source,
        })?;

        info!(
            name = app.name(),
            program = app.program(),
            pid = child.id(),
            "launched application"
        );

        reap(child);
        Ok(())
    }
}

/// Start the child as a session leader
#[cfg(unix)]
fn detach(cmd: &mut Command) {
    use std::os::unix::process::CommandExt;

    // SAFETY: setsid() is async-signal-safe and touches no memory of the
    // parent, so it is sound to call between fork and exec.
    unsafe {
        cmd.pre_exec(|| {
            nix::unistd::setsid()?;
            Ok(())
        });
    }
}

/// Wait for the child on a throwaway thread so it never lingers as a zombie
fn reap(mut child: Child) {
    let pid = child.id();
    let spawned = std::thread::Builder::new()
        .name(format!("reap-{pid}"))
        .spawn(move || match child.wait() {
            Ok(status) => debug!(pid, %status, "launched application exited"),
            Err(err) => debug!(pid, error = %err, "failed to wait on launched application"),
        });

    if let Err(err) = spawned {
        warn!(pid, error = %err, "failed to start reaper thread");
    }
}
