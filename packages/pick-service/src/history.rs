use time::OffsetDateTime;
use uuid::Uuid;

use crate::{PickService, Result};

pub const RECENT_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HistoryItem {
	pub id: Uuid,
	#[serde(rename = "queryText")]
	pub query_text: String,
	#[serde(rename = "responseText")]
	pub response_text: String,
	#[serde(rename = "createdAt", with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HistoryResponse {
	pub items: Vec<HistoryItem>,
}

impl PickService {
	pub async fn recent_history(&self, owner: &str) -> Result<HistoryResponse> {
		let records = self.history_store.list_recent(owner, RECENT_HISTORY_LIMIT).await?;
		let items = records
			.into_iter()
			.map(|record| HistoryItem {
				id: record.record_id,
				query_text: record.query_text,
				response_text: record.rendered_response,
				created_at: record.created_at,
			})
			.collect();

		Ok(HistoryResponse { items })
	}
}
