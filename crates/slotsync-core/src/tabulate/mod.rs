//! Per-slot summary of block rewards, joined from the stat files and the synced block files.
//!
//! An attestation counts as *salvaged* when it still earned rewards although it belongs to a slot
//! older than the parent block, i.e. earlier proposers missed it.
mod input;
pub use input::{BlockResponse, BlockStats};
pub(crate) use input::quoted_u64;

use std::{fs, path::Path};

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info};

use slotsync_model::SlotId;

use crate::{config::TabulateConfig, error::TabulateError, stats::scan_stat_dir};

/// Column order of the summary CSV.
pub const SUMMARY_HEADER: [&str; 10] = [
    "slot",
    "graffiti",
    "num_attestations",
    "useless_attestations",
    "validators_covered",
    "block_reward",
    "parent_slot",
    "num_salvaged",
    "salvaged_votes",
    "salvaged_rewards",
];

/// One CSV row. Field order must match [`SUMMARY_HEADER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub slot: u64,
    pub graffiti: String,
    pub num_attestations: usize,
    pub useless_attestations: usize,
    pub validators_covered: usize,
    pub block_reward: u64,
    /// `-1` when the first row is slot 0.
    pub parent_slot: i64,
    pub num_salvaged: usize,
    pub salvaged_votes: usize,
    pub salvaged_rewards: u64,
}

impl SummaryRow {
    pub fn build(slot: u64, parent_slot: i64, stats: &BlockStats, block: &BlockResponse) -> Self {
        let rewards = &stats.per_attestation_rewards;

        let mut num_salvaged = 0;
        let mut salvaged_votes = 0;
        let mut salvaged_rewards = 0;
        for (att, reward_map) in block.attestations().iter().zip(rewards) {
            if !reward_map.is_empty() && i64::try_from(att.data.slot).is_ok_and(|s| s < parent_slot) {
                num_salvaged += 1;
                salvaged_votes += reward_map.len();
                salvaged_rewards += reward_map.values().sum::<u64>();
            }
        }

        Self {
            slot,
            graffiti: stats.graffiti.clone(),
            num_attestations: rewards.len(),
            useless_attestations: rewards.iter().filter(|m| m.is_empty()).count(),
            validators_covered: stats.validators_covered(),
            block_reward: stats.total,
            parent_slot,
            num_salvaged,
            salvaged_votes,
            salvaged_rewards,
        }
    }
}

/// Write the summary CSV for every stat file, in slot order. Returns the number of rows.
///
/// The parent of each row is the previous row's slot; the first row assumes `slot - 1`.
pub fn tabulate(cfg: &TabulateConfig) -> Result<usize, TabulateError> {
    let slots = scan_stat_dir(&cfg.stat_dir).map_err(|e| TabulateError::io(&cfg.stat_dir, e))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&cfg.output)?;
    writer.write_record(SUMMARY_HEADER)?;

    let mut parent_slot: Option<i64> = None;
    for slot in &slots {
        let number = slot
            .as_number()
            .filter(|n| i64::try_from(*n).is_ok())
            .ok_or_else(|| TabulateError::NonNumericSlot(slot.to_string()))?;
        let parent = parent_slot.unwrap_or(number as i64 - 1);

        let row = load_row(cfg, slot, number, parent)?;
        debug!(target: "slotsync.tabulate", %slot, salvaged = row.num_salvaged, "row built");
        writer.serialize(&row)?;

        parent_slot = Some(number as i64);
    }

    writer
        .flush()
        .map_err(|e| TabulateError::io(&cfg.output, e))?;
    info!(
        target: "slotsync.tabulate",
        rows = slots.len(),
        output = %cfg.output.display(),
        "summary written"
    );
    Ok(slots.len())
}

fn load_row(cfg: &TabulateConfig, slot: &SlotId, number: u64, parent: i64) -> Result<SummaryRow, TabulateError> {
    let file_name = slot.file_name();
    let stats: BlockStats = read_json(&cfg.stat_dir.join(&file_name))?;
    let block: BlockResponse = read_json(&cfg.block_dir.join(&file_name))?;
    Ok(SummaryRow::build(number, parent, &stats, &block))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, TabulateError> {
    let raw = fs::read(path).map_err(|e| TabulateError::io(path, e))?;
    serde_json::from_slice(&raw).map_err(|source| TabulateError::Json {
        path: path.to_path_buf(),
        source,
    })
}
