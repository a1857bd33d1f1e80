use std::cmp::Ordering;

use crate::item::CatalogItem;

/// Blend weights fixed by the original ranking evaluation; historical results
/// depend on these exact values.
pub const SIMILARITY_WEIGHT: f64 = 0.80;
pub const QUALITY_WEIGHT: f64 = 0.20;
/// Upper bound of the static quality score, guaranteed by the offline
/// indexing pipeline. Used as the normalization divisor.
pub const MAX_QUALITY_SCORE: f64 = 25.0;

/// A catalog item paired with its similarity to the query vector.
#[derive(Debug, Clone)]
pub struct ScoredItem {
	pub item: CatalogItem,
	pub similarity: f64,
}

/// A candidate that survived relevance pruning. The explanation is attached
/// later, only for results that will actually be returned.
#[derive(Debug, Clone)]
pub struct RankedCandidate {
	pub item: CatalogItem,
	pub similarity: f64,
	pub relevance: f64,
}

pub fn relevance(similarity: f64, static_quality_score: f64) -> f64 {
	SIMILARITY_WEIGHT * similarity + QUALITY_WEIGHT * (static_quality_score / MAX_QUALITY_SCORE)
}

/// Scores, prunes, and orders candidates. Ordering is fully deterministic:
/// relevance descending, then similarity descending, then id ascending.
pub fn rank(candidates: Vec<ScoredItem>, min_relevance: f64, top_k: usize) -> Vec<RankedCandidate> {
	let mut ranked: Vec<RankedCandidate> = candidates
		.into_iter()
		.map(|candidate| {
			let relevance = relevance(candidate.similarity, candidate.item.static_quality_score);

			RankedCandidate { item: candidate.item, similarity: candidate.similarity, relevance }
		})
		.filter(|candidate| candidate.relevance >= min_relevance)
		.collect();

	ranked.sort_by(|a, b| {
		b.relevance
			.partial_cmp(&a.relevance)
			.unwrap_or(Ordering::Equal)
			.then_with(|| b.similarity.partial_cmp(&a.similarity).unwrap_or(Ordering::Equal))
			.then_with(|| a.item.id.cmp(&b.item.id))
	});
	ranked.truncate(top_k);

	ranked
}
