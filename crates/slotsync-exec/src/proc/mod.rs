use std::{future, path::PathBuf, process::Stdio, time::Duration};

use async_trait::async_trait;
use tokio::{
    io::AsyncReadExt,
    process::{Child, Command},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use slotsync_model::{BlockRecord, SlotId};

use crate::{
    error::{ExecError, ExecResult},
    limits::{RlimitConfig, attach_rlimits},
    resolver::{RejectReason, ResolveOutcome, Resolver},
    util::{kill_graceful, kill_group},
};

/// Default resolver program, looked up relative to the working directory.
pub const DEFAULT_PROGRAM: &str = "./block.sh";

/// How the resolver process is launched. The slot id is always appended as the last argument.
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    pub cwd: Option<PathBuf>,
    /// `None` waits for the resolver indefinitely.
    pub timeout: Option<Duration>,
    pub rlimits: RlimitConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
            timeout: None,
            rlimits: RlimitConfig::default(),
        }
    }
}

/// Resolver backed by an external program (`block.sh <slot>`).
///
/// Stdout is captured as the block; stderr is inherited so the program's own diagnostics stay
/// visible.
pub struct ProcResolver {
    name: &'static str,
    cfg: ResolverConfig,
}

impl ProcResolver {
    pub fn new(cfg: ResolverConfig) -> Self {
        Self { name: "proc", cfg }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    fn command(&self, slot: &SlotId) -> Command {
        let cfg = &self.cfg;
        let mut cmd = Command::new(&cfg.program);
        cmd.args(&cfg.args).arg(slot.as_str());

        if let Some(cwd) = &cfg.cwd {
            cmd.current_dir(cwd);
        }
        for (k, v) in &cfg.env {
            cmd.env(k, v);
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);
        attach_rlimits(&mut cmd, &cfg.rlimits);
        cmd
    }
}

async fn stop_child(child: &mut Child, slot: &SlotId, why: &str) {
    debug!(target: "slotsync.exec.proc", %slot, "{why}; killing child");
    if let Err(e) = kill_graceful(child).await {
        debug!(target: "slotsync.exec.proc", %slot, error = %e, "kill failed");
    }
}

fn stop_group(pgid: Option<u32>, slot: &SlotId, why: &str) {
    debug!(target: "slotsync.exec.proc", %slot, "{why} while draining stdout; killing process group");
    let Some(pgid) = pgid else {
        return;
    };
    if let Err(e) = kill_group(pgid) {
        debug!(target: "slotsync.exec.proc", %slot, error = %e, "kill failed");
    }
}

#[async_trait]
impl Resolver for ProcResolver {
    fn name(&self) -> &str {
        self.name
    }

    async fn resolve(&self, slot: &SlotId, cancel: &CancellationToken) -> ExecResult<ResolveOutcome> {
        if self.cfg.program.trim().is_empty() {
            return Err(ExecError::MissingProgram);
        }
        if cancel.is_cancelled() {
            return Err(ExecError::Cancelled);
        }

        trace!(target: "slotsync.exec.proc", program = %self.cfg.program, args = ?self.cfg.args, %slot, "spawn");
        let mut child = self
            .command(slot)
            .spawn()
            .map_err(|e| ExecError::Spawn(format!("{}: {e}", self.cfg.program)))?;
        let pgid = child.id();

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| ExecError::Io("stdout was not captured".into()))?;
        let mut read_stdout = tokio::spawn(async move {
            let mut buf = Vec::new();
            stdout.read_to_end(&mut buf).await.map(|_| buf)
        });

        // One deadline covers both the process lifetime and the stdout drain; background jobs of
        // the resolver may keep the pipe open after it exits.
        let deadline = async {
            match self.cfg.timeout {
                Some(limit) => tokio::time::sleep(limit).await,
                None => future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline);

        let status = tokio::select! {
            status = child.wait() => status?,
            _ = &mut deadline => {
                stop_child(&mut child, slot, "timeout").await;
                read_stdout.abort();
                return Ok(ResolveOutcome::Rejected(RejectReason::TimedOut));
            }
            _ = cancel.cancelled() => {
                stop_child(&mut child, slot, "cancelled").await;
                read_stdout.abort();
                return Err(ExecError::Cancelled);
            }
        };

        let out = tokio::select! {
            joined = &mut read_stdout => {
                joined.map_err(|e| ExecError::Io(format!("stdout reader: {e}")))??
            }
            _ = &mut deadline => {
                stop_group(pgid, slot, "timeout");
                read_stdout.abort();
                return Ok(ResolveOutcome::Rejected(RejectReason::TimedOut));
            }
            _ = cancel.cancelled() => {
                stop_group(pgid, slot, "cancelled");
                read_stdout.abort();
                return Err(ExecError::Cancelled);
            }
        };

        if status.success() {
            debug!(target: "slotsync.exec.proc", %slot, bytes = out.len(), "exit success");
            return Ok(ResolveOutcome::Resolved(BlockRecord::from_stdout(out)));
        }
        let reason = match status.code() {
            Some(code) => RejectReason::ExitCode(code),
            None => RejectReason::Signal,
        };
        debug!(target: "slotsync.exec.proc", %slot, %reason, "exit failure");
        Ok(ResolveOutcome::Rejected(reason))
    }
}
