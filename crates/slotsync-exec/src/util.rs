use std::time::Duration;

use tokio::process::Child;
#[cfg(target_family = "unix")]
use tracing::debug;

/// How long a child gets to exit after SIGTERM before it is killed outright.
pub const KILL_GRACE: Duration = Duration::from_millis(500);

/// Terminate the child and everything in its process group.
///
/// The resolver is spawned as a group leader, so background jobs it started go down with it.
#[cfg(target_family = "unix")]
pub async fn kill_graceful(child: &mut Child) -> std::io::Result<()> {
    if let Some(id) = child.id() {
        signal_group(id, libc::SIGTERM)?;
        if let Ok(status) = tokio::time::timeout(KILL_GRACE, child.wait()).await {
            // Leader is gone; stragglers in the group do not get a grace period.
            sweep_group(id);
            return status.map(|_| ());
        }
        sweep_group(id);
    }
    child.kill().await
}

#[cfg(not(target_family = "unix"))]
pub async fn kill_graceful(child: &mut Child) -> std::io::Result<()> {
    child.kill().await
}

/// SIGKILL whatever is left of a process group whose leader already exited.
#[cfg(target_family = "unix")]
pub fn kill_group(pgid: u32) -> std::io::Result<()> {
    signal_group(pgid, libc::SIGKILL)
}

#[cfg(not(target_family = "unix"))]
pub fn kill_group(_pgid: u32) -> std::io::Result<()> {
    Ok(())
}

/// SIGKILL the group; an already empty group is not an error.
#[cfg(target_family = "unix")]
fn sweep_group(pgid: u32) {
    match signal_group(pgid, libc::SIGKILL) {
        Err(e) if e.raw_os_error() != Some(libc::ESRCH) => {
            debug!(target: "slotsync.exec.proc", pgid, error = %e, "group kill failed");
        }
        _ => {}
    }
}

#[cfg(target_family = "unix")]
fn signal_group(pgid: u32, signal: libc::c_int) -> std::io::Result<()> {
    // SAFETY: plain syscall; a negative pid addresses the process group.
    let rc = unsafe { libc::kill(-(pgid as libc::pid_t), signal) };
    if rc != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}
