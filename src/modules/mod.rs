pub mod comics;

use std::sync::Arc;

use catalog_db::DocumentStore;
use catalog_kernel::{settings::Settings, ModuleRegistry};

/// Register all project-specific modules with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    store: Arc<dyn DocumentStore>,
    settings: &Settings,
) -> anyhow::Result<()> {
    let service = comics::service::ComicService::new(store);
    registry.register(comics::create_module(service, settings.catalog.clone()))?;
    Ok(())
}
