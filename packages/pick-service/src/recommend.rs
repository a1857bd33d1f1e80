use pick_domain::{CatalogItem, FilterSpec, rank};

use crate::{
	Error, PickService, Result,
	error::Stage,
	render,
};

/// Internal pipeline request, already validated by the orchestrator.
#[derive(Debug)]
pub(crate) struct EngineRequest<'a> {
	pub(crate) query: &'a str,
	pub(crate) filter: &'a FilterSpec,
	pub(crate) top_k: usize,
	pub(crate) min_relevance: f64,
}

#[derive(Debug)]
pub(crate) struct EngineOutcome {
	pub(crate) interpretation: String,
	pub(crate) results: Vec<ExplainedResult>,
	pub(crate) degraded_explanations: u32,
}

#[derive(Debug)]
pub(crate) struct ExplainedResult {
	pub(crate) item: CatalogItem,
	pub(crate) relevance: f64,
	pub(crate) explanation: String,
}

impl PickService {
	/// The retrieval pipeline: interpret -> embed -> search -> rank ->
	/// explain. Interpret degradation and per-item explain failures are
	/// absorbed; interpret/embed/search errors abort the request.
	pub(crate) async fn recommend(&self, req: EngineRequest<'_>) -> Result<EngineOutcome> {
		let interpretation = self
			.providers
			.interpreter
			.interpret(&self.cfg.providers.interpreter, req.query)
			.await
			.map_err(|err| Error::provider(Stage::Interpret, err))?;
		let degraded_interpretation = interpretation.topics.is_empty();
		let search_text = if degraded_interpretation {
			req.query.to_string()
		} else {
			interpretation.topics.join(" ")
		};
		let interpretation_text = if degraded_interpretation || interpretation.text.trim().is_empty()
		{
			format!("Looking for courses related to: {}", req.query)
		} else {
			interpretation.text
		};

		if degraded_interpretation {
			tracing::warn!(
				query = req.query,
				"Interpretation returned no topics; searching with the raw query text.",
			);
		}

		let texts = [search_text];
		let vectors = self
			.providers
			.embedding
			.embed(&self.cfg.providers.embedding, &texts)
			.await
			.map_err(|err| Error::provider(Stage::Embed, err))?;
		let Some(vector) = vectors.into_iter().next() else {
			return Err(Error::MalformedUpstreamResponse {
				stage: Stage::Embed,
				message: "Embedding provider returned no vectors.".to_string(),
			});
		};

		if vector.len() != self.catalog.vector_dim() {
			return Err(Error::MalformedUpstreamResponse {
				stage: Stage::Embed,
				message: format!(
					"Embedding vector has length {}, expected {}.",
					vector.len(),
					self.catalog.vector_dim(),
				),
			});
		}

		// Over-fetch so relevance pruning is less likely to starve the
		// result set below top_k.
		let candidate_count = req.top_k * self.cfg.search.overfetch_factor as usize;
		let candidates = self.catalog.search(&vector, req.filter, candidate_count)?;
		let ranked = rank::rank(candidates, req.min_relevance, req.top_k);
		let mut results = Vec::with_capacity(ranked.len());
		let mut degraded_explanations = 0;

		for candidate in ranked {
			let explanation = match self
				.providers
				.explainer
				.explain(&self.cfg.providers.explainer, req.query, &candidate.item)
				.await
			{
				Ok(explanation) => explanation,
				Err(err) => {
					// One flaky explanation call must not void the rest of
					// the result set.
					degraded_explanations += 1;

					tracing::warn!(
						item = %candidate.item.id,
						error = %err,
						"Explanation degraded; substituting a templated reason.",
					);

					render::fallback_explanation(&candidate.item)
				},
			};

			results.push(ExplainedResult {
				item: candidate.item,
				relevance: candidate.relevance,
				explanation,
			});
		}

		Ok(EngineOutcome { interpretation: interpretation_text, results, degraded_explanations })
	}
}
