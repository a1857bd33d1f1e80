mod error;
mod memory;

pub mod models;

pub use error::{Error, Result};
pub use memory::MemoryStore;

use std::{future::Future, pin::Pin};

use time::OffsetDateTime;

use crate::models::{HistoryRecord, QuotaState};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Persistence collaborator for per-owner quota rows. Implementations only
/// guarantee row-level read/write integrity; the quota manager provides the
/// per-owner critical section on top.
pub trait QuotaStore
where
	Self: Send + Sync,
{
	fn load_or_create<'a>(
		&'a self,
		owner: &'a str,
		now: OffsetDateTime,
	) -> BoxFuture<'a, Result<QuotaState>>;

	fn save<'a>(&'a self, state: &'a QuotaState) -> BoxFuture<'a, Result<()>>;
}

/// Append-only query history. Records may be persisted out of submission
/// order; readers sort by created_at.
pub trait HistoryStore
where
	Self: Send + Sync,
{
	fn append<'a>(&'a self, record: HistoryRecord) -> BoxFuture<'a, Result<()>>;

	fn list_recent<'a>(
		&'a self,
		owner: &'a str,
		limit: usize,
	) -> BoxFuture<'a, Result<Vec<HistoryRecord>>>;
}
