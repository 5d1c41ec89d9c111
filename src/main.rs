//! Corner POS terminal entry point.
//!
//! Initializes structured logging (console + rolling file), builds the HTTP
//! backend from the environment, and runs the startup refresh sequence. The
//! default presenter logs rendered views; a real front end replaces it
//! through the [`corner_pos::Presenter`] contract.

use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use corner_pos::{ApiClient, HttpBackend, LogPresenter, Terminal};

fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,corner_pos=debug"));

    // Rolling file appender: daily log files in the configured directory.
    let log_dir = corner_pos::config::log_dir();
    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&log_dir, "pos");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);
    let console_layer = fmt::layer().with_target(true);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    // Keep the guard alive for the lifetime of the process — dropping it
    // flushes logs. Leaked intentionally since we run until process exit.
    std::mem::forget(guard);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let base_url = corner_pos::config::backend_base_url();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = %base_url,
        "Starting Corner POS terminal"
    );

    let client = ApiClient::new(&base_url)?;
    let backend = HttpBackend::new(client);
    let mut terminal = Terminal::new(backend, Box::new(LogPresenter));

    let report = terminal.refresh_all().await;
    if report.all_ok() {
        info!("terminal ready");
    } else {
        warn!(failed = ?report.failed_labels(), "terminal started with degraded views");
    }

    Ok(())
}
