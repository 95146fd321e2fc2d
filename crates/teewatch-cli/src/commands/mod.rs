pub mod check;
pub mod login;
pub mod watch;

use clap::Args;
use std::path::PathBuf;
use teewatch_core::Config;

/// Where to find the site configuration.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Site configuration file [default: ~/.config/teewatch/config.toml]
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<Config, Box<dyn std::error::Error>> {
        let path = self.config.clone().unwrap_or_else(Config::default_path);
        Ok(Config::load(&path)?)
    }
}

/// Single-threaded runtime: ticks run one after another on this thread.
pub fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
