mod error;

pub use error::{Error, Result};

use std::{cmp::Ordering, collections::HashSet, fs, path::Path};

use serde::Deserialize;

use pick_domain::{CatalogItem, FilterSpec, ScoredItem};

/// Read-only similarity index over the course catalog. Built offline,
/// loaded once at startup, safe to share across request tasks without
/// locking.
#[derive(Debug)]
pub struct CatalogIndex {
	items: Vec<CatalogItem>,
	vector_dim: usize,
}

#[derive(Debug, Deserialize)]
struct Snapshot {
	items: Vec<CatalogItem>,
}

impl CatalogIndex {
	pub fn load(path: &Path, vector_dim: usize) -> Result<Self> {
		let raw = fs::read_to_string(path)
			.map_err(|err| Error::ReadSnapshot { path: path.to_path_buf(), source: err })?;
		let snapshot: Snapshot = serde_json::from_str(&raw)
			.map_err(|err| Error::ParseSnapshot { path: path.to_path_buf(), source: err })?;

		Self::from_items(snapshot.items, vector_dim)
	}

	pub fn from_items(items: Vec<CatalogItem>, vector_dim: usize) -> Result<Self> {
		let mut seen = HashSet::new();

		for item in &items {
			if item.embedding.len() != vector_dim {
				return Err(Error::ItemDimensionMismatch {
					id: item.id.clone(),
					expected: vector_dim,
					actual: item.embedding.len(),
				});
			}
			if !seen.insert(item.id.clone()) {
				return Err(Error::DuplicateItem { id: item.id.clone() });
			}
		}

		Ok(Self { items, vector_dim })
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn vector_dim(&self) -> usize {
		self.vector_dim
	}

	/// Similarity search under a metadata predicate. Equivalent to scoring
	/// the full catalog, discarding non-matching items, and keeping the top
	/// `candidate_count` by similarity. An empty result is not an error.
	pub fn search(
		&self,
		query_vector: &[f64],
		filter: &FilterSpec,
		candidate_count: usize,
	) -> Result<Vec<ScoredItem>> {
		if query_vector.len() != self.vector_dim {
			return Err(Error::QueryDimensionMismatch {
				expected: self.vector_dim,
				actual: query_vector.len(),
			});
		}

		let mut scored: Vec<ScoredItem> = self
			.items
			.iter()
			.filter(|item| filter.matches(item))
			.map(|item| ScoredItem {
				item: item.clone(),
				similarity: cosine_similarity(query_vector, &item.embedding),
			})
			.collect();

		scored.sort_by(|a, b| {
			b.similarity
				.partial_cmp(&a.similarity)
				.unwrap_or(Ordering::Equal)
				.then_with(|| a.item.id.cmp(&b.item.id))
		});
		scored.truncate(candidate_count);

		Ok(scored)
	}
}

/// Cosine similarity clamped to [0, 1], matching the original index's
/// `1 - cosine_distance` mapping. Zero vectors score zero.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
	let mut dot = 0.0;
	let mut norm_a = 0.0;
	let mut norm_b = 0.0;

	for (x, y) in a.iter().zip(b) {
		dot += x * y;
		norm_a += x * x;
		norm_b += y * y;
	}

	if norm_a == 0.0 || norm_b == 0.0 {
		return 0.0;
	}

	(dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}
