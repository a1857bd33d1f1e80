use std::time::Duration as StdDuration;

use time::OffsetDateTime;

use pick_domain::{FilterSpec, query};
use pick_storage::models::HistoryRecord;

use crate::{
	Error, PickService, Result,
	quota::QuotaDecision,
	recommend::{EngineOutcome, EngineRequest, ExplainedResult},
	render,
};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SubmitRequest {
	pub query: String,
	#[serde(default)]
	pub filters: FilterSpec,
	#[serde(default)]
	pub top_k: Option<u32>,
	#[serde(default)]
	pub min_relevance: Option<f64>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CourseResult {
	pub id: String,
	pub title: String,
	pub description: String,
	pub campus: Vec<String>,
	pub tags: Vec<String>,
	pub units: u32,
	pub prerequisites: String,
	pub has_prerequisites: bool,
	pub instructor: String,
	pub delivery_methods: Vec<String>,
	pub relevance_score: f64,
	pub match_reason: String,
}
impl From<ExplainedResult> for CourseResult {
	fn from(result: ExplainedResult) -> Self {
		let item = result.item;

		Self {
			id: item.id,
			title: item.title,
			description: item.description,
			campus: item.campuses,
			tags: item.tags,
			units: item.units,
			prerequisites: item.prerequisite_text,
			has_prerequisites: item.has_prerequisites,
			instructor: item.instructor,
			delivery_methods: item.delivery_methods,
			relevance_score: round3(result.relevance),
			match_reason: result.explanation,
		}
	}
}

/// Every response carries current quota status, success or not; a failed
/// recommendation is never rendered as an empty success.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SubmitResponse {
	pub success: bool,
	pub query: String,
	pub query_interpretation: String,
	pub courses: Vec<CourseResult>,
	#[serde(rename = "remainingQueries")]
	pub remaining_queries: u32,
	#[serde(rename = "resetTime", with = "crate::time_serde")]
	pub reset_time: OffsetDateTime,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl PickService {
	/// The orchestrator. Order is load-bearing: validation precedes the
	/// quota debit, the debit precedes the pipeline, and history is
	/// persisted on every post-admission path. The quota slot is not
	/// refunded when the pipeline fails or times out; admission and
	/// pipeline outcome are separate concerns.
	pub async fn submit(&self, owner: &str, req: SubmitRequest) -> Result<SubmitResponse> {
		query::validate_query(&req.query)
			.map_err(|message| Error::InvalidInput { message })?;

		let top_k = req.top_k.unwrap_or(self.cfg.search.default_top_k);

		if top_k == 0 || top_k > self.cfg.search.max_top_k {
			return Err(Error::InvalidInput {
				message: format!("top_k must be between 1 and {}.", self.cfg.search.max_top_k),
			});
		}

		let min_relevance = req.min_relevance.unwrap_or(self.cfg.search.default_min_relevance);

		if !min_relevance.is_finite() || !(0.0..=1.0).contains(&min_relevance) {
			return Err(Error::InvalidInput {
				message: "min_relevance must be between 0.0 and 1.0.".to_string(),
			});
		}

		let decision = self.check_and_increment(owner).await?;

		if !decision.allowed {
			return Ok(rate_limited_response(&self.cfg.quota, &req.query, decision));
		}

		let deadline = StdDuration::from_millis(self.cfg.search.deadline_ms);
		let engine = EngineRequest {
			query: &req.query,
			filter: &req.filters,
			top_k: top_k as usize,
			min_relevance,
		};
		let outcome = match tokio::time::timeout(deadline, self.recommend(engine)).await {
			Ok(result) => result,
			Err(_) => Err(Error::Timeout),
		};

		match outcome {
			Ok(outcome) => self.respond_success(owner, &req.query, outcome, decision).await,
			Err(err) => self.respond_failure(owner, &req.query, err, decision).await,
		}
	}

	async fn respond_success(
		&self,
		owner: &str,
		query: &str,
		outcome: EngineOutcome,
		decision: QuotaDecision,
	) -> Result<SubmitResponse> {
		let courses: Vec<CourseResult> =
			outcome.results.into_iter().map(CourseResult::from).collect();
		let rendered = render::render_success(&outcome.interpretation, &courses);
		let now = OffsetDateTime::now_utc();

		self.history_store.append(HistoryRecord::new(owner, query, rendered, now)).await?;

		tracing::info!(
			owner,
			results = courses.len(),
			degraded_explanations = outcome.degraded_explanations,
			remaining = decision.remaining,
			"Query served.",
		);

		Ok(SubmitResponse {
			success: true,
			query: query.to_string(),
			query_interpretation: outcome.interpretation,
			courses,
			remaining_queries: decision.remaining,
			reset_time: decision.window_reset_at,
			error: None,
		})
	}

	async fn respond_failure(
		&self,
		owner: &str,
		query: &str,
		err: Error,
		decision: QuotaDecision,
	) -> Result<SubmitResponse> {
		let message = err.user_message();
		let now = OffsetDateTime::now_utc();

		tracing::warn!(owner, error = %err, "Recommendation failed after admission.");

		self.history_store
			.append(HistoryRecord::new(owner, query, render::render_failure(&message), now))
			.await?;

		Ok(SubmitResponse {
			success: false,
			query: query.to_string(),
			query_interpretation: String::new(),
			courses: Vec::new(),
			remaining_queries: decision.remaining,
			reset_time: decision.window_reset_at,
			error: Some(message),
		})
	}
}

fn rate_limited_response(
	quota: &pick_config::Quota,
	query: &str,
	decision: QuotaDecision,
) -> SubmitResponse {
	SubmitResponse {
		success: false,
		query: query.to_string(),
		query_interpretation: String::new(),
		courses: Vec::new(),
		remaining_queries: 0,
		reset_time: decision.window_reset_at,
		error: Some(format!(
			"Query limit exceeded. Maximum {} queries per {} hours.",
			quota.max_queries_per_window, quota.window_hours,
		)),
	}
}

fn round3(value: f64) -> f64 {
	(value * 1_000.0).round() / 1_000.0
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rounds_relevance_to_three_decimals() {
		assert_eq!(round3(0.123_456), 0.123);
		assert_eq!(round3(0.999_9), 1.0);
	}
}
