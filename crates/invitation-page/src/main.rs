//! Invitation page headless driver entry point.
//!
//! Reads page events as JSON lines on standard input and runs the page
//! against them until input ends or the process is interrupted.

use std::sync::Arc;
use std::time::Duration;

use invitation_core::clock::SystemClock;
use invitation_core::rng::StdRngSource;
use invitation_page::config::PageConfig;
use invitation_page::error::AppError;
use invitation_page::events::LineEventSource;
use invitation_page::manifest::PageManifest;
use invitation_page::runtime::{self, PageRuntime, RuntimeSettings};
use invitation_preference_store::file_preference_store::FilePreferenceStore;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting invitation page driver");

    let config = PageConfig::from_env()?;
    tracing::info!(target_at = %config.target, prefs = %config.prefs_path.display(), "configuration loaded");

    let document = PageManifest::load(config.manifest_path.as_deref())
        .await?
        .into_document()?;
    let settings = RuntimeSettings::from(&config);
    let tick = settings
        .tick_period
        .to_std()
        .map_err(|e| AppError::Config(format!("invalid tick period: {e}")))?;

    let mut page = PageRuntime::new(
        document,
        settings,
        Arc::new(SystemClock),
        Box::new(StdRngSource::from_os()),
        Box::new(FilePreferenceStore::open(&config.prefs_path)),
    );
    let mut source = LineEventSource::stdin();

    tokio::select! {
        result = runtime::drive(&mut page, &mut source, tick.max(Duration::from_millis(1))) => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("interrupted"),
    }

    Ok(())
}
