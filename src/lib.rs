//! Comic catalog application library
//!
//! Wires the document store, the comics module, and the HTTP server
//! together. The binaries in this workspace are thin wrappers over [`run`].

use std::sync::Arc;

use anyhow::Context;

use catalog_db::{read_seed_file, DocumentStore, MemoryStore};
use catalog_kernel::{
    settings::{Settings, StoreBackend},
    InitCtx, ModuleRegistry,
};

pub mod modules;

/// Collection backing the comics module.
pub const COMICS_COLLECTION: &str = "comics";

/// Build the document store selected by the settings, seeding it when a
/// seed file is configured.
pub async fn build_store(settings: &Settings) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match settings.store.backend {
        StoreBackend::Memory => {
            let store = MemoryStore::new(COMICS_COLLECTION);
            if let Some(path) = &settings.store.seed_path {
                let documents = read_seed_file(path)
                    .await
                    .with_context(|| format!("failed to read seed file {}", path.display()))?;
                let documents = modules::comics::seed::prepare_seed(documents)
                    .with_context(|| format!("failed to seed store from {}", path.display()))?;
                store.seed(documents).await?;
            }
            Ok(Arc::new(store))
        }
    }
}

/// Registry holding every application module, backed by `store`.
pub fn build_registry(
    store: Arc<dyn DocumentStore>,
    settings: &Settings,
) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store, settings)?;
    anyhow::ensure!(!registry.is_empty(), "no modules registered");

    tracing::info!(modules = registry.len(), "module registry built");
    Ok(registry)
}

/// Run the catalog service until a shutdown signal arrives.
///
/// Telemetry must already be installed by the caller.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let store = build_store(&settings).await?;
    let registry = build_registry(store, &settings)?;

    let ctx = InitCtx {
        settings: &settings,
    };
    registry
        .init_modules(&ctx)
        .await
        .context("module initialization failed")?;
    registry
        .start_modules(&ctx)
        .await
        .context("module startup failed")?;

    let served = catalog_http::start_server(&registry, &settings).await;

    registry.stop_modules().await?;
    served
}
