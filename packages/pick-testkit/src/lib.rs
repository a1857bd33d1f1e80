//! Shared fixtures for service and HTTP tests: a small deterministic
//! catalog, a config builder, and scripted provider implementations.

use std::{collections::HashSet, sync::Arc, time::Duration};

use pick_catalog::CatalogIndex;
use pick_config::{
	Catalog, Config, EmbeddingProviderConfig, LlmProviderConfig, Providers as ProviderConfigs,
	Quota, Search, Service,
};
use pick_domain::{CatalogItem, Interpretation};
use pick_service::{
	BoxFuture, EmbeddingProvider, ExplainerProvider, InterpreterProvider, PickService, Providers,
};
use pick_storage::MemoryStore;

pub const FIXTURE_VECTOR_DIM: usize = 4;

/// Query vector pointing at the "accessible social/humanities" axis of the
/// fixture embeddings.
pub fn breadth_query_vector() -> Vec<f64> {
	vec![1.0, 0.0, 0.2, 0.0]
}

pub fn test_config() -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
			bind_localhost_only: true,
		},
		catalog: Catalog {
			snapshot_path: "unused-in-tests.json".to_string(),
			vector_dim: FIXTURE_VECTOR_DIM as u32,
		},
		providers: ProviderConfigs {
			interpreter: llm_provider(),
			embedding: EmbeddingProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/embeddings".to_string(),
				model: "test-embedding".to_string(),
				dimensions: FIXTURE_VECTOR_DIM as u32,
				timeout_ms: 1_000,
				default_headers: serde_json::Map::new(),
			},
			explainer: llm_provider(),
		},
		quota: Quota { max_queries_per_window: 5, window_hours: 6, lock_timeout_ms: 500 },
		search: Search {
			default_top_k: 5,
			max_top_k: 10,
			default_min_relevance: 0.30,
			overfetch_factor: 2,
			deadline_ms: 2_000,
		},
	}
}

fn llm_provider() -> LlmProviderConfig {
	LlmProviderConfig {
		provider_id: "test".to_string(),
		api_base: "http://127.0.0.1:1".to_string(),
		api_key: "test-key".to_string(),
		path: "/v1/chat/completions".to_string(),
		model: "test-llm".to_string(),
		temperature: 0.2,
		max_output_tokens: 200,
		timeout_ms: 1_000,
		default_headers: serde_json::Map::new(),
	}
}

/// Ten courses on four embedding axes. Exactly three satisfy
/// `{maxLevel: 200, noPrerequisites: true}`, and no course is offered in
/// Surrey.
pub fn fixture_items() -> Vec<CatalogItem> {
	struct Spec {
		id: &'static str,
		title: &'static str,
		level: u32,
		has_prerequisites: bool,
		campuses: &'static [&'static str],
		tags: &'static [&'static str],
		delivery_methods: &'static [&'static str],
		quality: f64,
		embedding: [f64; FIXTURE_VECTOR_DIM],
	}

	let specs = [
		Spec {
			id: "PSYC 100",
			title: "Introduction to Psychology",
			level: 100,
			has_prerequisites: false,
			campuses: &["Burnaby", "Vancouver"],
			tags: &["B-Soc"],
			delivery_methods: &["In Person"],
			quality: 22.0,
			embedding: [0.95, 0.05, 0.10, 0.0],
		},
		Spec {
			id: "PHIL 120",
			title: "Moral Problems",
			level: 100,
			has_prerequisites: false,
			campuses: &["Burnaby"],
			tags: &["W", "B-Hum"],
			delivery_methods: &["In Person", "Online"],
			quality: 21.0,
			embedding: [0.85, 0.0, 0.50, 0.0],
		},
		Spec {
			id: "CA 135",
			title: "Introduction to Cinema",
			level: 100,
			has_prerequisites: false,
			campuses: &["Vancouver"],
			tags: &["B-Hum"],
			delivery_methods: &["In Person"],
			quality: 20.0,
			embedding: [0.80, 0.0, 0.55, 0.0],
		},
		Spec {
			id: "CMPT 120",
			title: "Introduction to Computing Science",
			level: 100,
			has_prerequisites: true,
			campuses: &["Burnaby"],
			tags: &["Q"],
			delivery_methods: &["In Person"],
			quality: 18.0,
			embedding: [0.10, 0.95, 0.0, 0.0],
		},
		Spec {
			id: "BISC 100",
			title: "Introduction to Biology",
			level: 100,
			has_prerequisites: true,
			campuses: &["Burnaby"],
			tags: &["B-Sci"],
			delivery_methods: &["In Person"],
			quality: 15.0,
			embedding: [0.10, 0.0, 0.0, 0.95],
		},
		Spec {
			id: "HIST 336",
			title: "The Modern Middle East",
			level: 300,
			has_prerequisites: false,
			campuses: &["Vancouver"],
			tags: &["B-Hum"],
			delivery_methods: &["In Person"],
			quality: 12.0,
			embedding: [0.20, 0.0, 0.90, 0.0],
		},
		Spec {
			id: "MATH 308",
			title: "Linear Optimization",
			level: 300,
			has_prerequisites: true,
			campuses: &["Burnaby"],
			tags: &["Q"],
			delivery_methods: &["In Person"],
			quality: 8.0,
			embedding: [0.0, 0.90, 0.0, 0.20],
		},
		Spec {
			id: "PSYC 308",
			title: "Sleep and Behaviour",
			level: 300,
			has_prerequisites: false,
			campuses: &["Burnaby"],
			tags: &["B-Soc"],
			delivery_methods: &["Online"],
			quality: 14.0,
			embedding: [0.70, 0.0, 0.10, 0.30],
		},
		Spec {
			id: "ENGL 205",
			title: "Period Studies in English",
			level: 200,
			has_prerequisites: true,
			campuses: &["Burnaby"],
			tags: &["W", "B-Hum"],
			delivery_methods: &["In Person"],
			quality: 13.0,
			embedding: [0.30, 0.0, 0.85, 0.0],
		},
		Spec {
			id: "GEOG 100",
			title: "Our World: Introducing Human Geography",
			level: 100,
			has_prerequisites: true,
			campuses: &["Burnaby", "Vancouver"],
			tags: &["B-Soc"],
			delivery_methods: &["In Person"],
			quality: 16.0,
			embedding: [0.40, 0.0, 0.30, 0.60],
		},
	];

	specs
		.into_iter()
		.map(|spec| CatalogItem {
			id: spec.id.to_string(),
			embedding: spec.embedding.to_vec(),
			title: spec.title.to_string(),
			description: format!("{}.", spec.title),
			group: spec.id.split_whitespace().next().unwrap_or_default().to_string(),
			level: spec.level,
			units: 3,
			has_prerequisites: spec.has_prerequisites,
			prerequisite_text: if spec.has_prerequisites {
				"See calendar for prerequisites.".to_string()
			} else {
				String::new()
			},
			tags: spec.tags.iter().map(|tag| tag.to_string()).collect(),
			campuses: spec.campuses.iter().map(|campus| campus.to_string()).collect(),
			delivery_methods: spec
				.delivery_methods
				.iter()
				.map(|method| method.to_string())
				.collect(),
			instructor: "Staff".to_string(),
			static_quality_score: spec.quality,
		})
		.collect()
}

pub fn fixture_catalog() -> Arc<CatalogIndex> {
	Arc::new(
		CatalogIndex::from_items(fixture_items(), FIXTURE_VECTOR_DIM)
			.expect("Fixture catalog must build."),
	)
}

/// Service wired with the in-memory store and the given providers. The
/// store is returned too so tests can pre-seed quota state.
pub fn service_with(providers: Providers) -> (PickService, Arc<MemoryStore>) {
	let store = Arc::new(MemoryStore::new());
	let service = PickService::with_providers(
		test_config(),
		fixture_catalog(),
		store.clone(),
		store.clone(),
		providers,
	);

	(service, store)
}

pub fn scripted_providers() -> Providers {
	Providers::new(
		Arc::new(ScriptedInterpreter::breadth()),
		Arc::new(ScriptedEmbedding::new(breadth_query_vector())),
		Arc::new(EchoExplainer),
	)
}

pub struct ScriptedInterpreter {
	pub topics: Vec<String>,
	pub text: String,
}
impl ScriptedInterpreter {
	pub fn breadth() -> Self {
		Self {
			topics: vec![
				"introductory".to_string(),
				"accessible".to_string(),
				"breadth requirement".to_string(),
			],
			text: "Looking for an easy, manageable breadth course.".to_string(),
		}
	}
}
impl InterpreterProvider for ScriptedInterpreter {
	fn interpret<'a>(
		&'a self,
		_cfg: &'a pick_config::LlmProviderConfig,
		_raw_query: &'a str,
	) -> BoxFuture<'a, pick_providers::Result<Interpretation>> {
		let interpretation =
			Interpretation { topics: self.topics.clone(), text: self.text.clone() };

		Box::pin(async move { Ok(interpretation) })
	}
}

/// Interpreter whose payload carried no topics; exercises the degraded
/// raw-query search path.
pub struct EmptyInterpreter;
impl InterpreterProvider for EmptyInterpreter {
	fn interpret<'a>(
		&'a self,
		_cfg: &'a pick_config::LlmProviderConfig,
		_raw_query: &'a str,
	) -> BoxFuture<'a, pick_providers::Result<Interpretation>> {
		Box::pin(async move { Ok(Interpretation::default()) })
	}
}

pub struct FailingInterpreter;
impl InterpreterProvider for FailingInterpreter {
	fn interpret<'a>(
		&'a self,
		_cfg: &'a pick_config::LlmProviderConfig,
		_raw_query: &'a str,
	) -> BoxFuture<'a, pick_providers::Result<Interpretation>> {
		Box::pin(async move {
			Err(pick_providers::Error::Unavailable {
				message: "interpreter offline".to_string(),
			})
		})
	}
}

pub struct ScriptedEmbedding {
	vector: Vec<f64>,
	delay: Option<Duration>,
}
impl ScriptedEmbedding {
	pub fn new(vector: Vec<f64>) -> Self {
		Self { vector, delay: None }
	}

	/// Sleeps before answering; used to drive the orchestrator deadline.
	pub fn slow(vector: Vec<f64>, delay: Duration) -> Self {
		Self { vector, delay: Some(delay) }
	}
}
impl EmbeddingProvider for ScriptedEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a pick_config::EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, pick_providers::Result<Vec<Vec<f64>>>> {
		let vector = self.vector.clone();
		let delay = self.delay;
		let count = texts.len();

		Box::pin(async move {
			if let Some(delay) = delay {
				tokio::time::sleep(delay).await;
			}

			Ok(vec![vector; count])
		})
	}
}

pub struct FailingEmbedding;
impl EmbeddingProvider for FailingEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a pick_config::EmbeddingProviderConfig,
		_texts: &'a [String],
	) -> BoxFuture<'a, pick_providers::Result<Vec<Vec<f64>>>> {
		Box::pin(async move {
			Err(pick_providers::Error::Unavailable { message: "embedder offline".to_string() })
		})
	}
}

pub struct EchoExplainer;
impl ExplainerProvider for EchoExplainer {
	fn explain<'a>(
		&'a self,
		_cfg: &'a pick_config::LlmProviderConfig,
		query: &'a str,
		item: &'a CatalogItem,
	) -> BoxFuture<'a, pick_providers::Result<String>> {
		let explanation = format!("{} relates to your search for \"{query}\".", item.id);

		Box::pin(async move { Ok(explanation) })
	}
}

/// Fails for the configured item ids and echoes for the rest; exercises
/// per-result explanation degradation.
pub struct FlakyExplainer {
	fail_ids: HashSet<String>,
}
impl FlakyExplainer {
	pub fn failing_for(ids: &[&str]) -> Self {
		Self { fail_ids: ids.iter().map(|id| id.to_string()).collect() }
	}
}
impl ExplainerProvider for FlakyExplainer {
	fn explain<'a>(
		&'a self,
		_cfg: &'a pick_config::LlmProviderConfig,
		query: &'a str,
		item: &'a CatalogItem,
	) -> BoxFuture<'a, pick_providers::Result<String>> {
		let result = if self.fail_ids.contains(&item.id) {
			Err(pick_providers::Error::Unavailable { message: "explainer offline".to_string() })
		} else {
			Ok(format!("{} relates to your search for \"{query}\".", item.id))
		};

		Box::pin(async move { result })
	}
}
