use clap::Args;
use serde_json::json;
use std::path::PathBuf;
use teewatch_core::WatchInput;

use super::ConfigArgs;

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
    #[arg(long, short = 'i')]
    pub input: PathBuf,
}

pub fn run(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.config.load()?;
    let input = WatchInput::load(&args.input)?;
    let watchlist = input.watchlist();

    let summary = json!({
        "base_url": config.base_url,
        "resource_id": config.resource_id,
        "poll_interval_secs": config.poll_interval_secs,
        "login_interval_secs": config.login_interval_secs,
        "spots_required": input.spots_required,
        "slots": watchlist.pair_count(),
        "watch_list": watchlist.entries(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
