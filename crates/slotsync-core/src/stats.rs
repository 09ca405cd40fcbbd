use std::{fs, io, path::Path};

use tracing::debug;

use slotsync_model::SlotId;

/// List the slots named by `block_<slot>.json` files directly under `dir`, in slot order.
///
/// Directories and files with any other name are skipped.
pub fn scan_stat_dir(dir: &Path) -> io::Result<Vec<SlotId>> {
    let entries = fs::read_dir(dir)?;

    let mut slots = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }

        let name = entry.file_name();
        match name.to_str().and_then(SlotId::from_file_name) {
            Some(slot) => slots.push(slot),
            None => debug!(target: "slotsync.stats", file = ?name, "ignoring non-stat file"),
        }
    }

    slots.sort();
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn lists_matching_files_in_slot_order() {
        let dir = TempDir::new().unwrap();
        for name in ["block_10.json", "block_9.json", "block_100.json", "notes.txt", "block_.json"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        fs::create_dir(dir.path().join("block_5.json")).unwrap();

        let slots = scan_stat_dir(dir.path()).unwrap();
        let got: Vec<&str> = slots.iter().map(SlotId::as_str).collect();
        assert_eq!(got, vec!["9", "10", "100"]);
    }

    #[test]
    fn empty_dir_yields_no_slots() {
        let dir = TempDir::new().unwrap();
        assert!(scan_stat_dir(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_dir_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = scan_stat_dir(&dir.path().join("block_stats")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
