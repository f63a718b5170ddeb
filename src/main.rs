//! Binary entry point: read the configuration, start logging, open the store
//! and drive the Ratatui event loop until the user exits.
use anyhow::Context;
use student_roster::logging::init_logging;
use student_roster::{run_app, App, AppConfig, StudentRepository};
use tracing::info;

/// Fatal start-up problems (bad configuration, unwritable data directory)
/// bubble up to the terminal instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    init_logging(&config.log_dir)?;
    info!(
        db = %config.db_path.display(),
        bootstrap = ?config.bootstrap,
        "starting student roster"
    );

    let repo = StudentRepository::open(&config.db_path, config.bootstrap)
        .context("failed to open the student database")?;
    let mut app = App::new(repo)?;
    run_app(&mut app)
}
