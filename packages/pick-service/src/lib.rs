mod error;
mod quota;
mod recommend;
mod render;

pub mod history;
pub mod status;
pub mod submit;
pub mod time_serde;

pub use error::{Error, Result, Stage};
pub use history::{HistoryItem, HistoryResponse};
pub use quota::QuotaDecision;
pub use status::QuotaStatusResponse;
pub use submit::{CourseResult, SubmitRequest, SubmitResponse};

use std::{future::Future, pin::Pin, sync::Arc};

use pick_catalog::CatalogIndex;
use pick_config::{Config, EmbeddingProviderConfig, LlmProviderConfig};
use pick_domain::{CatalogItem, Interpretation};
use pick_providers::{embedding, explainer, interpreter};
use pick_storage::{HistoryStore, QuotaStore};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait InterpreterProvider
where
	Self: Send + Sync,
{
	fn interpret<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		raw_query: &'a str,
	) -> BoxFuture<'a, pick_providers::Result<Interpretation>>;
}

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, pick_providers::Result<Vec<Vec<f64>>>>;
}

pub trait ExplainerProvider
where
	Self: Send + Sync,
{
	fn explain<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		query: &'a str,
		item: &'a CatalogItem,
	) -> BoxFuture<'a, pick_providers::Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub interpreter: Arc<dyn InterpreterProvider>,
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub explainer: Arc<dyn ExplainerProvider>,
}
impl Providers {
	pub fn new(
		interpreter: Arc<dyn InterpreterProvider>,
		embedding: Arc<dyn EmbeddingProvider>,
		explainer: Arc<dyn ExplainerProvider>,
	) -> Self {
		Self { interpreter, embedding, explainer }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { interpreter: provider.clone(), embedding: provider.clone(), explainer: provider }
	}
}

struct DefaultProviders;
impl InterpreterProvider for DefaultProviders {
	fn interpret<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		raw_query: &'a str,
	) -> BoxFuture<'a, pick_providers::Result<Interpretation>> {
		Box::pin(interpreter::interpret(cfg, raw_query))
	}
}
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, pick_providers::Result<Vec<Vec<f64>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}
impl ExplainerProvider for DefaultProviders {
	fn explain<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		query: &'a str,
		item: &'a CatalogItem,
	) -> BoxFuture<'a, pick_providers::Result<String>> {
		Box::pin(explainer::explain(cfg, query, &item.id, &item.title, &item.description))
	}
}

pub struct PickService {
	pub cfg: Config,
	pub catalog: Arc<CatalogIndex>,
	pub quota_store: Arc<dyn QuotaStore>,
	pub history_store: Arc<dyn HistoryStore>,
	pub providers: Providers,
	quota_locks: quota::QuotaLocks,
}
impl PickService {
	pub fn new(
		cfg: Config,
		catalog: Arc<CatalogIndex>,
		quota_store: Arc<dyn QuotaStore>,
		history_store: Arc<dyn HistoryStore>,
	) -> Self {
		Self::with_providers(cfg, catalog, quota_store, history_store, Providers::default())
	}

	pub fn with_providers(
		cfg: Config,
		catalog: Arc<CatalogIndex>,
		quota_store: Arc<dyn QuotaStore>,
		history_store: Arc<dyn HistoryStore>,
		providers: Providers,
	) -> Self {
		Self {
			cfg,
			catalog,
			quota_store,
			history_store,
			providers,
			quota_locks: quota::QuotaLocks::default(),
		}
	}
}
