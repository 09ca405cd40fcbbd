use std::path::PathBuf;

use slotsync_model::SyncMode;

pub const DEFAULT_STAT_DIR: &str = "block_stats";
pub const DEFAULT_BLOCK_DIR: &str = "blocks";
pub const DEFAULT_SUMMARY_FILE: &str = "summary.csv";
pub const DEFAULT_MISSED_DIR: &str = "missed_atts";

#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Directory scanned for `block_<slot>.json` stat files. Only names are used.
    pub stat_dir: PathBuf,
    /// Directory receiving `block_<slot>.json` block files; created if absent.
    pub out_dir: PathBuf,
    pub mode: SyncMode,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            stat_dir: PathBuf::from(DEFAULT_STAT_DIR),
            out_dir: PathBuf::from(DEFAULT_BLOCK_DIR),
            mode: SyncMode::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TabulateConfig {
    pub stat_dir: PathBuf,
    pub block_dir: PathBuf,
    pub output: PathBuf,
}

impl Default for TabulateConfig {
    fn default() -> Self {
        Self {
            stat_dir: PathBuf::from(DEFAULT_STAT_DIR),
            block_dir: PathBuf::from(DEFAULT_BLOCK_DIR),
            output: PathBuf::from(DEFAULT_SUMMARY_FILE),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MissedConfig {
    /// Directory of per-slot missed-attestation files (`<name>_<slot>.json`).
    pub data_dir: PathBuf,
    /// Directory receiving the three CSV reports.
    pub output_dir: PathBuf,
}

impl Default for MissedConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_MISSED_DIR),
            output_dir: PathBuf::from("."),
        }
    }
}
