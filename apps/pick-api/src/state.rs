use std::{path::Path, sync::Arc};

use pick_catalog::CatalogIndex;
use pick_service::PickService;
use pick_storage::MemoryStore;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<PickService>,
}
impl AppState {
	pub fn new(config: pick_config::Config) -> color_eyre::Result<Self> {
		let catalog = CatalogIndex::load(
			Path::new(&config.catalog.snapshot_path),
			config.catalog.vector_dim as usize,
		)?;

		tracing::info!(items = catalog.len(), "Catalog snapshot loaded.");

		let store = Arc::new(MemoryStore::new());
		let service = PickService::new(config, Arc::new(catalog), store.clone(), store);

		Ok(Self { service: Arc::new(service) })
	}
}
