mod report;
pub use report::{SlotStatus, SyncReport};

use std::fs;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use slotsync_exec::{ExecError, ResolveOutcome, Resolver};
use slotsync_model::SlotId;

use crate::{config::SyncConfig, error::SyncError, stats::scan_stat_dir};

/// Resolves every slot found in the stat directory and stores the blocks in the output directory.
///
/// Slots are processed one at a time in slot order. A slot the resolver rejects is logged and left
/// for a future run; any other error stops the run.
pub struct SyncRunner<R> {
    cfg: SyncConfig,
    resolver: R,
}

impl<R: Resolver> SyncRunner<R> {
    pub fn new(cfg: SyncConfig, resolver: R) -> Self {
        Self { cfg, resolver }
    }

    pub async fn run(&self, cancel: &CancellationToken) -> Result<SyncReport, SyncError> {
        let slots = scan_stat_dir(&self.cfg.stat_dir).map_err(|e| SyncError::io(&self.cfg.stat_dir, e))?;
        fs::create_dir_all(&self.cfg.out_dir).map_err(|e| SyncError::io(&self.cfg.out_dir, e))?;

        info!(
            target: "slotsync.sync",
            stat_dir = %self.cfg.stat_dir.display(),
            out_dir = %self.cfg.out_dir.display(),
            mode = %self.cfg.mode,
            resolver = self.resolver.name(),
            slots = slots.len(),
            "sync started"
        );

        let mut report = SyncReport::default();
        for slot in &slots {
            if cancel.is_cancelled() {
                warn!(target: "slotsync.sync", next = %slot, "sync cancelled");
                return Err(SyncError::Cancelled);
            }
            let status = self.sync_slot(slot, cancel).await?;
            report.record(slot, status);
        }

        info!(
            target: "slotsync.sync",
            written = report.written,
            skipped = report.skipped,
            failed = report.failed.len(),
            "sync finished"
        );
        Ok(report)
    }

    #[instrument(level = "debug", target = "slotsync.sync", skip_all, fields(%slot))]
    async fn sync_slot(&self, slot: &SlotId, cancel: &CancellationToken) -> Result<SlotStatus, SyncError> {
        let file_name = slot.file_name();
        let out_path = self.cfg.out_dir.join(&file_name);

        if self.cfg.mode.skips_existing() && out_path.exists() {
            info!(target: "slotsync.sync", "slot {slot} already known");
            return Ok(SlotStatus::Skipped);
        }

        let outcome = match self.resolver.resolve(slot, cancel).await {
            Ok(outcome) => outcome,
            Err(ExecError::Cancelled) => {
                warn!(target: "slotsync.sync", %slot, "sync cancelled while resolving");
                return Err(SyncError::Cancelled);
            }
            Err(e) => return Err(SyncError::Resolver(e)),
        };

        match outcome {
            ResolveOutcome::Resolved(record) => {
                fs::write(&out_path, record.to_file_contents()).map_err(|e| SyncError::io(&out_path, e))?;
                debug!(target: "slotsync.sync", bytes = record.len(), "block written");
                Ok(SlotStatus::Written)
            }
            ResolveOutcome::Rejected(reason) => {
                warn!(target: "slotsync.sync", %reason, "{file_name} is bad");
                Ok(SlotStatus::Failed(reason))
            }
        }
    }
}
