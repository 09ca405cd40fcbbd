use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};

use slotsync_core::{
    MissedConfig, SyncConfig, TabulateConfig,
    config::{DEFAULT_BLOCK_DIR, DEFAULT_MISSED_DIR, DEFAULT_STAT_DIR, DEFAULT_SUMMARY_FILE},
};
use slotsync_exec::{ResolverConfig, RlimitConfig, proc::DEFAULT_PROGRAM};
use slotsync_model::SyncMode;
use slotsync_observe::{LoggerConfig, LoggerFormat};

#[derive(Parser, Debug)]
#[command(name = "slotsync", version, about = "Fetch block data for every slot listed in a stat directory")]
pub struct Cli {
    #[command(flatten)]
    pub log: LogArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a block for every stat file and store it in the block directory
    Sync(SyncArgs),
    /// Summarize block rewards into a CSV file
    Tabulate(TabulateArgs),
    /// Count missed attestations per validator, subnet and slot position
    AnalyseMissed(AnalyseMissedArgs),
}

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Log filter directive (e.g. info, slotsync=debug)
    #[arg(long, global = true, env = "SLOTSYNC_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format (text, json, journald)
    #[arg(long, global = true, env = "SLOTSYNC_LOG_FORMAT", default_value = "text")]
    pub log_format: LoggerFormat,

    /// Disable ANSI colors in text logs
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl LogArgs {
    pub fn logger_config(&self) -> LoggerConfig {
        let defaults = LoggerConfig::default();
        LoggerConfig {
            format: self.log_format,
            level: self.log_level.clone(),
            use_color: defaults.use_color && !self.no_color,
            ..defaults
        }
    }
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Directory holding block_<slot>.json stat files
    #[arg(long, env = "SLOTSYNC_STAT_DIR", default_value = DEFAULT_STAT_DIR)]
    pub stat_dir: PathBuf,

    /// Directory receiving block_<slot>.json block files
    #[arg(long, env = "SLOTSYNC_OUT_DIR", default_value = DEFAULT_BLOCK_DIR)]
    pub out_dir: PathBuf,

    /// Resolver program, invoked as `<resolver> [resolver-arg...] <slot>`
    #[arg(long, env = "SLOTSYNC_RESOLVER", default_value = DEFAULT_PROGRAM)]
    pub resolver: String,

    /// Extra argument passed to the resolver before the slot (repeatable)
    #[arg(long = "resolver-arg", allow_hyphen_values = true)]
    pub resolver_args: Vec<String>,

    /// What to do with slots whose block file already exists (incremental, bootstrap)
    #[arg(long, env = "SLOTSYNC_MODE", default_value = "incremental")]
    pub mode: SyncMode,

    /// Shorthand for `--mode bootstrap`
    #[arg(long, env = "SLOTSYNC_OVERWRITE")]
    pub overwrite: bool,

    /// Kill the resolver after this many milliseconds and treat the slot as bad
    #[arg(long, env = "SLOTSYNC_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// RLIMIT_NOFILE for the resolver
    #[arg(long)]
    pub max_open_files: Option<u64>,

    /// RLIMIT_CPU (seconds) for the resolver
    #[arg(long)]
    pub max_cpu_seconds: Option<u64>,

    /// Disable core dumps of the resolver
    #[arg(long)]
    pub no_core_dumps: bool,
}

impl SyncArgs {
    pub fn mode(&self) -> SyncMode {
        if self.overwrite {
            SyncMode::Bootstrap
        } else {
            self.mode
        }
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            stat_dir: self.stat_dir.clone(),
            out_dir: self.out_dir.clone(),
            mode: self.mode(),
        }
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            program: self.resolver.clone(),
            args: self.resolver_args.clone(),
            timeout: self.timeout_ms.map(Duration::from_millis),
            rlimits: RlimitConfig {
                max_open_files: self.max_open_files,
                max_cpu_seconds: self.max_cpu_seconds,
                disable_core_dumps: self.no_core_dumps,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[derive(Args, Debug)]
pub struct TabulateArgs {
    #[arg(long, env = "SLOTSYNC_STAT_DIR", default_value = DEFAULT_STAT_DIR)]
    pub stat_dir: PathBuf,

    #[arg(long, env = "SLOTSYNC_BLOCK_DIR", default_value = DEFAULT_BLOCK_DIR)]
    pub block_dir: PathBuf,

    /// Summary CSV path
    #[arg(short, long, default_value = DEFAULT_SUMMARY_FILE)]
    pub output: PathBuf,
}

impl TabulateArgs {
    pub fn tabulate_config(&self) -> TabulateConfig {
        TabulateConfig {
            stat_dir: self.stat_dir.clone(),
            block_dir: self.block_dir.clone(),
            output: self.output.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct AnalyseMissedArgs {
    /// Directory holding per-slot missed-attestation files
    #[arg(long, env = "SLOTSYNC_MISSED_DIR", default_value = DEFAULT_MISSED_DIR)]
    pub data_dir: PathBuf,

    /// Directory receiving missed_atts.csv, missed_subnets.csv and missed_by_slot.csv
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

impl AnalyseMissedArgs {
    pub fn missed_config(&self) -> MissedConfig {
        MissedConfig {
            data_dir: self.data_dir.clone(),
            output_dir: self.output_dir.clone(),
        }
    }
}
