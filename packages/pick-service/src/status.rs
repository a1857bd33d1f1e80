use time::OffsetDateTime;

use crate::{PickService, Result};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct QuotaStatusResponse {
	#[serde(rename = "remainingQueries")]
	pub remaining_queries: u32,
	#[serde(rename = "maxQueries")]
	pub max_queries: u32,
	#[serde(rename = "resetTime", with = "crate::time_serde")]
	pub reset_time: OffsetDateTime,
}

impl PickService {
	pub async fn quota_status(&self, owner: &str) -> Result<QuotaStatusResponse> {
		let peek = self.quota_peek(owner).await?;

		Ok(QuotaStatusResponse {
			remaining_queries: peek.remaining,
			max_queries: self.cfg.quota.max_queries_per_window,
			reset_time: peek.window_reset_at,
		})
	}
}
