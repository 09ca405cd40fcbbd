use std::fmt;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use slotsync_model::{BlockRecord, SlotId};

use crate::error::ExecResult;

/// Why the resolver produced no block for a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Process exited with a non-zero code.
    ExitCode(i32),
    /// Process was terminated by a signal.
    Signal,
    /// Process exceeded the configured timeout and was killed.
    TimedOut,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::ExitCode(code) => write!(f, "exit code: {code}"),
            RejectReason::Signal => f.write_str("terminated by signal"),
            RejectReason::TimedOut => f.write_str("timed out"),
        }
    }
}

/// Result of a single resolver invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    Resolved(BlockRecord),
    Rejected(RejectReason),
}

/// Turns a slot id into block data.
///
/// A per-slot failure is a [`ResolveOutcome::Rejected`]; `Err` is reserved for failures that would
/// affect every slot (the program cannot be spawned) and for cancellation.
#[async_trait]
pub trait Resolver: Send + Sync {
    fn name(&self) -> &str;

    async fn resolve(&self, slot: &SlotId, cancel: &CancellationToken) -> ExecResult<ResolveOutcome>;
}
