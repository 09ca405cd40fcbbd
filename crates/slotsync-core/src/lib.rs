pub mod error;
pub use error::{MissedError, SyncError, TabulateError};

pub mod config;
pub use config::{MissedConfig, SyncConfig, TabulateConfig};

pub mod stats;
pub use stats::scan_stat_dir;

pub mod sync;
pub use sync::{SyncReport, SyncRunner};

pub mod tabulate;
pub use tabulate::{SummaryRow, tabulate};

pub mod missed;
pub use missed::{MissedTotals, analyse_missed};
