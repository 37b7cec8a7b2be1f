pub mod config;
pub mod disease;
pub mod engine;
pub mod models;

use tracing_subscriber::EnvFilter;

pub use engine::{ModelRegistry, PredictionError, TrainingError};
pub use models::{DiseaseId, PredictionResult};

/// Install the global `tracing` subscriber. Honors `RUST_LOG`, otherwise
/// falls back to [`config::default_log_filter`]. Logs go to stderr so
/// command output on stdout stays machine-readable.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
