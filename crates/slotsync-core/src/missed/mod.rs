//! Missed-attestation statistics: how often each validator, subnet and slot-in-epoch position
//! shows up across the per-slot files in the data directory.
mod input;
pub use input::{MissedAttestation, MissedReport, ValidatorIndex};

use std::{collections::BTreeMap, fs, path::Path};

use tracing::{debug, info};

use crate::{config::MissedConfig, error::MissedError};

pub const SLOTS_PER_EPOCH: u64 = 32;

pub const MISSED_ATTS_FILE: &str = "missed_atts.csv";
pub const MISSED_SUBNETS_FILE: &str = "missed_subnets.csv";
pub const MISSED_BY_SLOT_FILE: &str = "missed_by_slot.csv";

/// Counts accumulated over every file in the data directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissedTotals {
    pub files: usize,
    /// Validator index → number of entries in `all` lists.
    pub by_validator: BTreeMap<u64, u64>,
    /// Subnet → number of missed attestations on it.
    pub by_subnet: BTreeMap<u64, u64>,
    /// `slot % 32` → number of validators that missed at that position.
    pub by_slot_mod: [u64; SLOTS_PER_EPOCH as usize],
}

impl MissedTotals {
    pub fn add(&mut self, slot: u64, report: &MissedReport) {
        self.files += 1;
        self.by_slot_mod[(slot % SLOTS_PER_EPOCH) as usize] += report.all.len() as u64;
        for validator in &report.all {
            *self.by_validator.entry(validator.0).or_default() += 1;
        }
        for att in &report.per_attestation {
            *self.by_subnet.entry(att.subnet).or_default() += 1;
        }
    }
}

/// Slot number from a file name: the part between the first `_` and the next `_` of the stem.
///
/// `block_123.json` and `missed_123_v2.json` both give `123`.
pub fn slot_from_file_name(name: &str) -> Option<u64> {
    let stem = name.split('.').next()?;
    stem.split('_').nth(1)?.parse().ok()
}

/// Read every file in `cfg.data_dir` and write the three CSV reports into `cfg.output_dir`.
pub fn analyse_missed(cfg: &MissedConfig) -> Result<MissedTotals, MissedError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(&cfg.data_dir).map_err(|e| MissedError::io(&cfg.data_dir, e))? {
        let entry = entry.map_err(|e| MissedError::io(&cfg.data_dir, e))?;
        if entry.path().is_dir() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    let mut totals = MissedTotals::default();
    for name in &names {
        let slot = slot_from_file_name(name).ok_or_else(|| MissedError::BadFileName(name.clone()))?;
        let path = cfg.data_dir.join(name);
        let raw = fs::read(&path).map_err(|e| MissedError::io(&path, e))?;
        let report: MissedReport =
            serde_json::from_slice(&raw).map_err(|source| MissedError::Json { path: path.clone(), source })?;

        debug!(target: "slotsync.missed", file = %name, slot, missed = report.all.len(), "file read");
        totals.add(slot, &report);
    }

    write_counts(
        &cfg.output_dir.join(MISSED_ATTS_FILE),
        ["validator_index", "missed_attestations"],
        totals.by_validator.iter().map(|(k, v)| (*k, *v)),
    )?;
    write_counts(
        &cfg.output_dir.join(MISSED_SUBNETS_FILE),
        ["subnet", "missed_attestations"],
        totals.by_subnet.iter().map(|(k, v)| (*k, *v)),
    )?;
    write_counts(
        &cfg.output_dir.join(MISSED_BY_SLOT_FILE),
        ["slot_mod", "missed_attestations"],
        (0..SLOTS_PER_EPOCH).zip(totals.by_slot_mod),
    )?;

    info!(
        target: "slotsync.missed",
        files = totals.files,
        validators = totals.by_validator.len(),
        subnets = totals.by_subnet.len(),
        output_dir = %cfg.output_dir.display(),
        "missed attestation reports written"
    );
    Ok(totals)
}

fn write_counts(
    path: &Path,
    header: [&str; 2],
    rows: impl IntoIterator<Item = (u64, u64)>,
) -> Result<(), MissedError> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|e| MissedError::io(path, e))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn config(root: &Path) -> MissedConfig {
        let cfg = MissedConfig {
            data_dir: root.join("missed_atts"),
            output_dir: root.join("out"),
        };
        fs::create_dir_all(&cfg.data_dir).unwrap();
        fs::create_dir_all(&cfg.output_dir).unwrap();
        cfg
    }

    fn write(cfg: &MissedConfig, name: &str, body: serde_json::Value) {
        fs::write(cfg.data_dir.join(name), body.to_string()).unwrap();
    }

    fn lines(cfg: &MissedConfig, file: &str) -> Vec<String> {
        fs::read_to_string(cfg.output_dir.join(file))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn slot_comes_from_second_underscore_segment() {
        assert_eq!(slot_from_file_name("block_123.json"), Some(123));
        assert_eq!(slot_from_file_name("missed_64_extra.json"), Some(64));
        assert_eq!(slot_from_file_name("missed_7"), Some(7));
        assert_eq!(slot_from_file_name("notes.txt"), None);
        assert_eq!(slot_from_file_name("missed_head.json"), None);
    }

    #[test]
    fn counts_validators_subnets_and_slot_positions() {
        let root = TempDir::new().unwrap();
        let cfg = config(root.path());
        write(
            &cfg,
            "block_33.json",
            json!({ "all": [5, 9], "per_attestation": [{ "subnet": 2 }, { "subnet": 4 }] }),
        );
        write(
            &cfg,
            "block_65.json",
            json!({ "all": [9], "per_attestation": [{ "subnet": 2 }] }),
        );
        write(&cfg, "block_40.json", json!({ "all": [], "per_attestation": [] }));

        let totals = analyse_missed(&cfg).unwrap();
        assert_eq!(totals.files, 3);

        assert_eq!(
            lines(&cfg, MISSED_ATTS_FILE),
            vec!["validator_index,missed_attestations", "5,1", "9,2"]
        );
        assert_eq!(
            lines(&cfg, MISSED_SUBNETS_FILE),
            vec!["subnet,missed_attestations", "2,2", "4,1"]
        );

        let by_slot = lines(&cfg, MISSED_BY_SLOT_FILE);
        assert_eq!(by_slot.len(), 1 + SLOTS_PER_EPOCH as usize);
        assert_eq!(by_slot[0], "slot_mod,missed_attestations");
        assert_eq!(by_slot[1], "0,0");
        // 33 % 32 and 65 % 32 both land on position 1.
        assert_eq!(by_slot[2], "1,3");
        assert_eq!(by_slot[9], "8,0");
        assert_eq!(by_slot[32], "31,0");
    }

    #[test]
    fn empty_data_dir_writes_headers_and_zero_positions() {
        let root = TempDir::new().unwrap();
        let cfg = config(root.path());

        let totals = analyse_missed(&cfg).unwrap();

        assert_eq!(totals, MissedTotals::default());
        assert_eq!(lines(&cfg, MISSED_ATTS_FILE), vec!["validator_index,missed_attestations"]);
        assert_eq!(lines(&cfg, MISSED_SUBNETS_FILE), vec!["subnet,missed_attestations"]);
        assert!(lines(&cfg, MISSED_BY_SLOT_FILE)[1..].iter().all(|l| l.ends_with(",0")));
    }

    #[test]
    fn file_without_slot_is_error() {
        let root = TempDir::new().unwrap();
        let cfg = config(root.path());
        write(&cfg, "README.json", json!({ "all": [], "per_attestation": [] }));

        let err = analyse_missed(&cfg).unwrap_err();
        assert!(matches!(err, MissedError::BadFileName(ref n) if n == "README.json"));
    }

    #[test]
    fn malformed_file_is_json_error() {
        let root = TempDir::new().unwrap();
        let cfg = config(root.path());
        write(&cfg, "block_1.json", json!({ "all": [1] }));

        let err = analyse_missed(&cfg).unwrap_err();
        assert!(matches!(err, MissedError::Json { .. }));
    }

    #[test]
    fn missing_data_dir_is_io_error() {
        let root = TempDir::new().unwrap();
        let cfg = MissedConfig {
            data_dir: root.path().join("nope"),
            output_dir: root.path().to_path_buf(),
        };

        let err = analyse_missed(&cfg).unwrap_err();
        assert!(matches!(err, MissedError::Io { .. }));
    }
}
