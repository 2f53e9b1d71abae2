use std::path::PathBuf;

use clap::Parser;
use log::{error, info};

use tidynotes::{App, Cli, Result, TidyError, Workspace};

pub fn initialize_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();
}

/// Resolves the data directory: the --data-dir flag wins, otherwise the
/// platform data directory for this application.
fn data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }

    directories::ProjectDirs::from("", "", "tidynotes")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| TidyError::ApplicationError {
            message: "Could not determine a data directory; pass --data-dir".to_string(),
        })
}

fn run(cli: Cli) -> Result<()> {
    let dir = data_dir(&cli)?;
    let workspace = Workspace::open(&dir)?;

    let mut app = App::new(workspace, cli.verbose);
    app.run(cli.command)?;

    // A content edit may still be sitting in the debounce window; it must
    // not be lost on exit.
    let mut workspace = app.into_workspace();
    workspace.flush_pending_saves();

    info!("Application shutting down");
    Ok(())
}

#[tokio::main]
async fn main() {
    initialize_logger();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
