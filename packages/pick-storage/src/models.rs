use time::OffsetDateTime;
use uuid::Uuid;

/// Rolling-window admission counter for one owner. Exactly one state per
/// owner; mutated only through the quota manager's atomic section.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotaState {
	pub owner: String,
	pub count: u32,
	pub window_start: OffsetDateTime,
}
impl QuotaState {
	pub fn fresh(owner: &str, now: OffsetDateTime) -> Self {
		Self { owner: owner.to_string(), count: 0, window_start: now }
	}
}

/// Append-only record of one submitted query and its rendered outcome.
#[derive(Debug, Clone)]
pub struct HistoryRecord {
	pub record_id: Uuid,
	pub owner: String,
	pub query_text: String,
	pub rendered_response: String,
	pub created_at: OffsetDateTime,
}
impl HistoryRecord {
	pub fn new(
		owner: &str,
		query_text: &str,
		rendered_response: String,
		created_at: OffsetDateTime,
	) -> Self {
		Self {
			record_id: Uuid::new_v4(),
			owner: owner.to_string(),
			query_text: query_text.to_string(),
			rendered_response,
			created_at,
		}
	}
}
