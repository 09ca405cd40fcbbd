use std::{fmt, str::FromStr};

use crate::ModelError;

/// How a sync run treats block files that already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Skip slots whose block file exists; never overwrite.
    #[default]
    Incremental,
    /// Resolve every slot and overwrite existing block files.
    Bootstrap,
}

impl SyncMode {
    /// Returns `true` if an existing block file ends the slot's lifecycle early.
    #[inline]
    pub fn skips_existing(&self) -> bool {
        matches!(self, SyncMode::Incremental)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMode::Incremental => "incremental",
            SyncMode::Bootstrap => "bootstrap",
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "incremental" | "skip" => Ok(SyncMode::Incremental),
            "bootstrap" | "overwrite" => Ok(SyncMode::Bootstrap),
            _ => Err(ModelError::InvalidSyncMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_incremental() {
        assert_eq!(SyncMode::default(), SyncMode::Incremental);
        assert!(SyncMode::Incremental.skips_existing());
        assert!(!SyncMode::Bootstrap.skips_existing());
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!("Bootstrap".parse::<SyncMode>(), Ok(SyncMode::Bootstrap));
        assert_eq!(" overwrite ".parse::<SyncMode>(), Ok(SyncMode::Bootstrap));
        assert_eq!("skip".parse::<SyncMode>(), Ok(SyncMode::Incremental));
        assert_eq!(
            "sometimes".parse::<SyncMode>(),
            Err(ModelError::InvalidSyncMode("sometimes".into()))
        );
    }
}
