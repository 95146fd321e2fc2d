use clap::Args;
use std::path::PathBuf;
use teewatch_core::{build_watcher, run_to_completion, Scheduler, WatchInput};
use tracing::info;

use super::{runtime, ConfigArgs};

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
    /// Watchlist file (spots_required + [[watch_list]] entries)
    #[arg(long, short = 'i')]
    pub input: PathBuf,
}

pub fn run(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.config.load()?;
    let input = WatchInput::load(&args.input)?;
    let watchlist = input.watchlist();

    info!(
        dates = watchlist.date_count(),
        slots = watchlist.pair_count(),
        spots_required = input.spots_required,
        interval_secs = config.poll_interval_secs,
        "starting"
    );

    runtime()?.block_on(async {
        let mut watcher = build_watcher(&config, &input)?;
        let mut scheduler = Scheduler::new(config.poll_interval());
        let reason = run_to_completion(&mut scheduler, &mut watcher).await?;
        info!(?reason, "watchlist is empty, exiting");
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
