/// Prefix shared by stat files and block files (`block_<slot>.json`).
pub const BLOCK_FILE_PREFIX: &str = "block_";

/// Suffix shared by stat files and block files.
pub const BLOCK_FILE_SUFFIX: &str = ".json";
