use clap::Args;
use teewatch_core::{LoginClient, SessionManager};

use super::{runtime, ConfigArgs};

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run(args: LoginArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.config.load()?;
    let login = LoginClient::new(&config.base_url()?, config.credentials.clone())?;
    let mut session = SessionManager::new(login, config.login_validity());

    runtime()?.block_on(session.authenticate())?;

    let cookies = session
        .current_token()
        .map(|t| t.split("; ").count())
        .unwrap_or(0);
    println!(
        "Logged in as {} ({cookies} session cookies, valid for {}s)",
        config.credentials.username, config.login_interval_secs
    );
    Ok(())
}
