mod admin_session;
mod cli;
mod commands;
mod logging;

use std::error::Error;

use clap::Parser;
use tokio::io::BufReader;

use eizou_core::config::AppConfig;
use eizou_runtime::App;

use admin_session::AdminSession;
use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let log_dir = match (&cli.log_dir, &cli.command) {
        (Some(dir), _) => Some(dir.clone()),
        (None, Command::Admin) => Some(AppConfig::log_dir()),
        (None, _) => None,
    };
    let _log_guard = logging::init(log_dir.as_deref());

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    if let Some(source) = cli.catalog {
        config.catalog.source = source;
    }
    tracing::debug!(source = %config.catalog.source, "loading catalog");

    let mut app = App::load(config).await;
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::Render(args) => commands::render(&app, args, &mut stdout)?,
        Command::Hero { slides } => commands::hero(&app, slides, &mut stdout).await?,
        Command::Download(args) => commands::download(&app, args, &mut stdout).await?,
        Command::Admin => {
            let stdin = BufReader::new(tokio::io::stdin());
            AdminSession::new(&mut app, stdin, stdout)
                .config_path(config_path)
                .run()
                .await?;
        }
    }
    Ok(())
}
