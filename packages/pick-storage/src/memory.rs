use std::sync::Mutex;

use ahash::AHashMap;
use time::OffsetDateTime;

use crate::{
	BoxFuture, HistoryStore, QuotaStore, Result,
	models::{HistoryRecord, QuotaState},
};

/// In-process persistence collaborator. Quota rows live in a map guarded by
/// a plain mutex (held only for map access, never across awaits); history is
/// an append-only vector. Callers serialize quota mutations per owner above
/// this layer.
#[derive(Debug, Default)]
pub struct MemoryStore {
	quotas: Mutex<AHashMap<String, QuotaState>>,
	history: Mutex<Vec<HistoryRecord>>,
}
impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

impl QuotaStore for MemoryStore {
	fn load_or_create<'a>(
		&'a self,
		owner: &'a str,
		now: OffsetDateTime,
	) -> BoxFuture<'a, Result<QuotaState>> {
		// entry() makes first-access creation a single insert-if-absent, so
		// two racing first requests cannot produce two rows.
		let state = self
			.quotas
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.entry(owner.to_string())
			.or_insert_with(|| QuotaState::fresh(owner, now))
			.clone();

		Box::pin(async move { Ok(state) })
	}

	fn save<'a>(&'a self, state: &'a QuotaState) -> BoxFuture<'a, Result<()>> {
		self.quotas
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.insert(state.owner.clone(), state.clone());

		Box::pin(async move { Ok(()) })
	}
}

impl HistoryStore for MemoryStore {
	fn append<'a>(&'a self, record: HistoryRecord) -> BoxFuture<'a, Result<()>> {
		self.history.lock().unwrap_or_else(|err| err.into_inner()).push(record);

		Box::pin(async move { Ok(()) })
	}

	fn list_recent<'a>(
		&'a self,
		owner: &'a str,
		limit: usize,
	) -> BoxFuture<'a, Result<Vec<HistoryRecord>>> {
		let mut records: Vec<HistoryRecord> = self
			.history
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.iter()
			.filter(|record| record.owner == owner)
			.cloned()
			.collect();

		// Appends may land out of submission order; newest-first by created_at.
		records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
		records.truncate(limit);

		Box::pin(async move { Ok(records) })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use time::Duration;

	#[tokio::test]
	async fn load_or_create_is_lazy_and_stable() {
		let store = MemoryStore::new();
		let now = OffsetDateTime::now_utc();
		let first = store.load_or_create("alice", now).await.expect("load failed");

		assert_eq!(first.count, 0);
		assert_eq!(first.window_start, now);

		let later = now + Duration::hours(1);
		let second = store.load_or_create("alice", later).await.expect("load failed");

		// The row already exists; the later timestamp must not reset it.
		assert_eq!(second.window_start, now);
	}

	#[tokio::test]
	async fn save_overwrites_the_owner_row() {
		let store = MemoryStore::new();
		let now = OffsetDateTime::now_utc();
		let mut state = store.load_or_create("alice", now).await.expect("load failed");

		state.count = 3;
		store.save(&state).await.expect("save failed");

		let reloaded = store.load_or_create("alice", now).await.expect("load failed");

		assert_eq!(reloaded.count, 3);
	}

	#[tokio::test]
	async fn history_lists_newest_first_per_owner() {
		let store = MemoryStore::new();
		let now = OffsetDateTime::now_utc();

		store
			.append(HistoryRecord::new("alice", "old", "r1".to_string(), now))
			.await
			.expect("append failed");
		store
			.append(HistoryRecord::new("bob", "other", "r2".to_string(), now))
			.await
			.expect("append failed");
		store
			.append(HistoryRecord::new(
				"alice",
				"new",
				"r3".to_string(),
				now + Duration::minutes(5),
			))
			.await
			.expect("append failed");

		let records = store.list_recent("alice", 10).await.expect("list failed");

		assert_eq!(records.len(), 2);
		assert_eq!(records[0].query_text, "new");
		assert_eq!(records[1].query_text, "old");
	}
}
