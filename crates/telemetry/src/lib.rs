//! Tracing subscriber bootstrap.

use anyhow::Context;
use tracing_subscriber::{fmt, EnvFilter};

use catalog_kernel::settings::{LogFormat, TelemetrySettings};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter directive.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => EnvFilter::try_new(directives),
        Err(_) => EnvFilter::try_new(&settings.filter),
    }
    .with_context(|| format!("invalid log filter '{}'", settings.filter))?;

    let builder = fmt().with_env_filter(filter).with_target(true);

    let result = match settings.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    tracing::info!(
        target: "catalog-telemetry",
        format = ?settings.log_format,
        "telemetry initialized"
    );

    Ok(())
}
