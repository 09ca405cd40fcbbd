use slotsync_exec::RejectReason;
use slotsync_model::SlotId;

/// What happened to a single slot during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    /// Block file written from resolver output.
    Written,
    /// Block file already present; resolver not invoked.
    Skipped,
    /// Resolver produced no block; nothing written.
    Failed(RejectReason),
}

/// Per-run counters. Failed slots are kept so a caller can report or retry them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub written: usize,
    pub skipped: usize,
    pub failed: Vec<SlotId>,
}

impl SyncReport {
    pub fn record(&mut self, slot: &SlotId, status: SlotStatus) {
        match status {
            SlotStatus::Written => self.written += 1,
            SlotStatus::Skipped => self.skipped += 1,
            SlotStatus::Failed(_) => self.failed.push(slot.clone()),
        }
    }

    /// Number of slots considered.
    pub fn total(&self) -> usize {
        self.written + self.skipped + self.failed.len()
    }

    /// Returns `true` if no slot was left for a future run.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
