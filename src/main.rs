use anyhow::Context;
use catalog_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load catalog settings")?;
    catalog_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        backend = ?settings.store.backend,
        "catalog-app starting"
    );

    catalog_app::run(settings).await?;

    tracing::info!("catalog-app stopped");
    Ok(())
}
