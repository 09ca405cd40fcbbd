mod cli;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use slotsync_core::{SyncRunner, analyse_missed, tabulate};
use slotsync_exec::ProcResolver;
use slotsync_observe::logger_init;

use crate::cli::{AnalyseMissedArgs, Cli, Command, SyncArgs, TabulateArgs};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logger_init(&cli.log.logger_config())?;

    match cli.command {
        Command::Sync(args) => run_sync(args).await,
        Command::Tabulate(args) => run_tabulate(args),
        Command::AnalyseMissed(args) => run_analyse_missed(args),
    }
}

async fn run_sync(args: SyncArgs) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; stopping");
            on_signal.cancel();
        }
    });

    let runner = SyncRunner::new(
        args.sync_config(),
        ProcResolver::new(args.resolver_config()).with_name("block.sh"),
    );
    let report = runner.run(&cancel).await.context("sync failed")?;

    if !report.is_complete() {
        let failed: Vec<&str> = report.failed.iter().map(|s| s.as_str()).collect();
        info!(slots = ?failed, "some slots are left for a future run");
    }
    Ok(())
}

fn run_tabulate(args: TabulateArgs) -> anyhow::Result<()> {
    let cfg = args.tabulate_config();
    tabulate(&cfg).with_context(|| format!("failed to write {}", cfg.output.display()))?;
    Ok(())
}

fn run_analyse_missed(args: AnalyseMissedArgs) -> anyhow::Result<()> {
    let cfg = args.missed_config();
    analyse_missed(&cfg).with_context(|| format!("failed to analyse {}", cfg.data_dir.display()))?;
    Ok(())
}
