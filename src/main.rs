use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gradebook_core::constants::{DATA_DIR_ENV, REPORTS_DIR_ENV, STORE_TIMEOUT_ENV};
use gradebook_core::{CoreConfig, StudentService};

mod menu;

use menu::Menu;

/// Main entry point for the interactive gradebook
///
/// Resolves configuration once, then runs the numbered menu on stdin/stdout until
/// the user exits or input ends.
///
/// # Environment Variables
/// - `GRADEBOOK_DATA_DIR`: Directory holding the student collection (default: "gradebook_data")
/// - `GRADEBOOK_REPORTS_DIR`: Directory for saved reports (default: "<data dir>/reports")
/// - `GRADEBOOK_STORE_TIMEOUT_SECS`: Per-operation store timeout, 1 to 300 (default: 10)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gradebook=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cfg = CoreConfig::from_env_values(
        std::env::var(DATA_DIR_ENV).ok(),
        std::env::var(REPORTS_DIR_ENV).ok(),
        std::env::var(STORE_TIMEOUT_ENV).ok(),
    )?;

    tracing::info!("++ Starting gradebook with data in {}", cfg.data_dir().display());

    let service = StudentService::new(Arc::new(cfg));
    let stdin = io::stdin();
    let mut menu = Menu::new(service, stdin.lock(), io::stdout());
    menu.run().await?;

    tracing::info!("++ Gradebook closed");
    Ok(())
}
