use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub catalog: Catalog,
	pub providers: Providers,
	#[serde(default)]
	pub quota: Quota,
	#[serde(default)]
	pub search: Search,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	#[serde(default)]
	pub bind_localhost_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct Catalog {
	/// JSON snapshot produced by the offline indexing pipeline.
	pub snapshot_path: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub interpreter: LlmProviderConfig,
	pub embedding: EmbeddingProviderConfig,
	pub explainer: LlmProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub max_output_tokens: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Quota {
	pub max_queries_per_window: u32,
	pub window_hours: i64,
	pub lock_timeout_ms: u64,
}
impl Default for Quota {
	fn default() -> Self {
		Self { max_queries_per_window: 5, window_hours: 6, lock_timeout_ms: 2_000 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub default_top_k: u32,
	pub max_top_k: u32,
	pub default_min_relevance: f64,
	/// Candidate multiplier applied before relevance pruning.
	pub overfetch_factor: u32,
	pub deadline_ms: u64,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			default_top_k: 5,
			max_top_k: 10,
			default_min_relevance: 0.30,
			overfetch_factor: 2,
			deadline_ms: 30_000,
		}
	}
}
