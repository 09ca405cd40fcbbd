use std::{cmp::Ordering, fmt};

use crate::{BLOCK_FILE_PREFIX, BLOCK_FILE_SUFFIX};

/// Identifier of a unit of work, taken from a `block_<slot>.json` file name.
///
/// The token is kept as written in the file name. Ordering is numeric for tokens that parse as `u64`;
/// all other tokens sort lexicographically after them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotId(String);

impl SlotId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Extract the slot from a base file name by stripping `block_` and `.json`.
    ///
    /// Returns `None` when the name does not match or the remaining stem is empty.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let stem = name
            .strip_prefix(BLOCK_FILE_PREFIX)?
            .strip_suffix(BLOCK_FILE_SUFFIX)?;
        if stem.is_empty() {
            return None;
        }
        Some(Self(stem.to_string()))
    }

    /// Base file name for this slot, identical for stat files and block files.
    pub fn file_name(&self) -> String {
        format!("{BLOCK_FILE_PREFIX}{}{BLOCK_FILE_SUFFIX}", self.0)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the slot, if the token is a plain unsigned integer.
    pub fn as_number(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl Ord for SlotId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for SlotId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SlotId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for SlotId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_block_file_name() {
        let slot = SlotId::from_file_name("block_7.json").expect("valid name");
        assert_eq!(slot.as_str(), "7");
        assert_eq!(slot.as_number(), Some(7));
    }

    #[test]
    fn keeps_non_numeric_tokens() {
        let slot = SlotId::from_file_name("block_genesis.json").expect("valid name");
        assert_eq!(slot.as_str(), "genesis");
        assert_eq!(slot.as_number(), None);
    }

    #[test]
    fn rejects_foreign_names() {
        assert!(SlotId::from_file_name("blocks_7.json").is_none());
        assert!(SlotId::from_file_name("block_7.json.tmp").is_none());
        assert!(SlotId::from_file_name("block_7.txt").is_none());
        assert!(SlotId::from_file_name("block_.json").is_none());
        assert!(SlotId::from_file_name("README.md").is_none());
    }

    #[test]
    fn file_name_is_inverse_of_parse() {
        let slot = SlotId::from(3u64);
        assert_eq!(slot.file_name(), "block_3.json");
        assert_eq!(SlotId::from_file_name(&slot.file_name()), Some(slot));
    }

    #[test]
    fn numeric_slots_sort_numerically() {
        let mut slots: Vec<SlotId> = ["10", "9", "x", "100", "a"]
            .into_iter()
            .map(SlotId::from)
            .collect();
        slots.sort();

        let got: Vec<&str> = slots.iter().map(SlotId::as_str).collect();
        assert_eq!(got, vec!["9", "10", "100", "a", "x"]);
    }

    #[test]
    fn leading_zeros_stay_distinct() {
        let a = SlotId::from("7");
        let b = SlotId::from("007");
        assert_ne!(a, b);
        assert_ne!(a.cmp(&b), Ordering::Equal);
    }
}
