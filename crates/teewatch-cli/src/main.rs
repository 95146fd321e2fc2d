use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "teewatch", version, about = "Watch a tee sheet for slots that open up")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll until every watched slot has been found
    Watch(commands::watch::WatchArgs),
    /// Validate configuration and print the normalised watchlist
    Check(commands::check::CheckArgs),
    /// Log in once and report whether it worked
    Login(commands::login::LoginArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Watch(args) => commands::watch::run(args),
        Commands::Check(args) => commands::check::run(args),
        Commands::Login(args) => commands::login::run(args),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "teewatch failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
