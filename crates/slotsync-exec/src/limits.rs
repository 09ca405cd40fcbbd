//! POSIX resource limits applied to the resolver child process.
//!
//! On Unix the limits are installed with a `pre_exec` hook, so they are in place before the resolver
//! starts. Elsewhere a non-empty configuration is logged and ignored.
use tokio::process::Command;
#[cfg(not(unix))]
use tracing::warn;

/// Optional `setrlimit` values for the resolver. `None` keeps the inherited limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RlimitConfig {
    /// `RLIMIT_NOFILE`.
    pub max_open_files: Option<u64>,
    /// `RLIMIT_FSIZE`, in bytes.
    pub max_file_size_bytes: Option<u64>,
    /// `RLIMIT_CPU`, in seconds. The kernel sends `SIGXCPU` once it is exceeded.
    pub max_cpu_seconds: Option<u64>,
    /// Sets `RLIMIT_CORE` to zero.
    pub disable_core_dumps: bool,
}

impl RlimitConfig {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max_open_files.is_none()
            && self.max_file_size_bytes.is_none()
            && self.max_cpu_seconds.is_none()
            && !self.disable_core_dumps
    }
}

pub fn attach_rlimits(cmd: &mut Command, config: &RlimitConfig) {
    if config.is_empty() {
        return;
    }

    #[cfg(unix)]
    {
        unix_impl::attach_rlimits(cmd, config);
    }

    #[cfg(not(unix))]
    {
        let _ = cmd;
        warn!(
            target: "slotsync.exec.limits",
            ?config,
            "resource limits are not supported on this OS; ignoring"
        );
    }
}

#[cfg(unix)]
mod unix_impl {
    use std::io;

    use tokio::process::Command;

    use super::RlimitConfig;

    pub fn attach_rlimits(cmd: &mut Command, config: &RlimitConfig) {
        let limits: Vec<(libc::c_int, u64)> = [
            (libc::RLIMIT_NOFILE as libc::c_int, config.max_open_files),
            (libc::RLIMIT_FSIZE as libc::c_int, config.max_file_size_bytes),
            (libc::RLIMIT_CPU as libc::c_int, config.max_cpu_seconds),
            (
                libc::RLIMIT_CORE as libc::c_int,
                config.disable_core_dumps.then_some(0),
            ),
        ]
        .into_iter()
        .filter_map(|(resource, value)| value.map(|v| (resource, v)))
        .collect();

        // SAFETY: the hook only calls async-signal-safe `setrlimit` on pre-built data.
        unsafe {
            cmd.pre_exec(move || {
                for &(resource, value) in &limits {
                    apply_rlimit(resource, value)?;
                }
                Ok(())
            });
        }
    }

    fn apply_rlimit(resource: libc::c_int, value: u64) -> io::Result<()> {
        let rlim = libc::rlimit {
            rlim_cur: value as libc::rlim_t,
            rlim_max: value as libc::rlim_t,
        };

        // `resource` type differs between glibc (u32 enum) and other libcs (c_int).
        let rc = unsafe { libc::setrlimit(resource as _, &rlim) };
        if rc != 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_empty() {
        let config = RlimitConfig::default();
        assert!(config.is_empty());

        let mut cmd = Command::new("sh");
        attach_rlimits(&mut cmd, &config);
    }

    #[test]
    fn any_field_makes_config_non_empty() {
        assert!(!RlimitConfig { max_cpu_seconds: Some(5), ..Default::default() }.is_empty());
        assert!(!RlimitConfig { disable_core_dumps: true, ..Default::default() }.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn limited_child_still_runs() {
        let config = RlimitConfig {
            max_open_files: Some(256),
            max_file_size_bytes: Some(1024 * 1024),
            max_cpu_seconds: Some(30),
            disable_core_dumps: true,
        };

        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("exit 0");
        attach_rlimits(&mut cmd, &config);

        let status = cmd.status().await.expect("spawn sh");
        assert!(status.success());
    }
}
