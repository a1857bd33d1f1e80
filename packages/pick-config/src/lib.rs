mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Catalog, Config, EmbeddingProviderConfig, LlmProviderConfig, Providers, Quota, Search, Service,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.catalog.snapshot_path.trim().is_empty() {
		return Err(Error::Validation {
			message: "catalog.snapshot_path must be non-empty.".to_string(),
		});
	}
	if cfg.catalog.vector_dim == 0 {
		return Err(Error::Validation {
			message: "catalog.vector_dim must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.catalog.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match catalog.vector_dim.".to_string(),
		});
	}
	if cfg.quota.max_queries_per_window == 0 {
		return Err(Error::Validation {
			message: "quota.max_queries_per_window must be greater than zero.".to_string(),
		});
	}
	if cfg.quota.window_hours <= 0 {
		return Err(Error::Validation {
			message: "quota.window_hours must be greater than zero.".to_string(),
		});
	}
	if cfg.quota.lock_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "quota.lock_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.search.default_top_k == 0 {
		return Err(Error::Validation {
			message: "search.default_top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_top_k < cfg.search.default_top_k {
		return Err(Error::Validation {
			message: "search.max_top_k must be at least search.default_top_k.".to_string(),
		});
	}
	if !cfg.search.default_min_relevance.is_finite() {
		return Err(Error::Validation {
			message: "search.default_min_relevance must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&cfg.search.default_min_relevance) {
		return Err(Error::Validation {
			message: "search.default_min_relevance must be in the range 0.0-1.0.".to_string(),
		});
	}
	if cfg.search.overfetch_factor == 0 {
		return Err(Error::Validation {
			message: "search.overfetch_factor must be greater than zero.".to_string(),
		});
	}
	if cfg.search.deadline_ms == 0 {
		return Err(Error::Validation {
			message: "search.deadline_ms must be greater than zero.".to_string(),
		});
	}

	for (label, key) in [
		("interpreter", &cfg.providers.interpreter.api_key),
		("embedding", &cfg.providers.embedding.api_key),
		("explainer", &cfg.providers.explainer.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.http_bind = cfg.service.http_bind.trim().to_string();
	cfg.catalog.snapshot_path = cfg.catalog.snapshot_path.trim().to_string();
}
