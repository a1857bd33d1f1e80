use std::{
	sync::{Arc, Mutex},
	time::Duration as StdDuration,
};

use ahash::AHashMap;
use time::{Duration, OffsetDateTime};
use tokio::sync::OwnedMutexGuard;

use pick_storage::models::QuotaState;

use crate::{Error, PickService, Result};

/// Outcome of one atomic quota check. `window_reset_at` is populated on
/// every path, including denial, for display purposes.
#[derive(Debug, Clone, Copy)]
pub struct QuotaDecision {
	pub allowed: bool,
	pub remaining: u32,
	pub window_reset_at: OffsetDateTime,
}

/// Process-wide registry of per-owner locks. Entries are created on first
/// access and live until shutdown; the registry mutex only guards the map,
/// so two owners never contend on each other's critical section.
#[derive(Debug, Default)]
pub(crate) struct QuotaLocks {
	inner: Mutex<AHashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}
impl QuotaLocks {
	fn handle(&self, owner: &str) -> Arc<tokio::sync::Mutex<()>> {
		self.inner
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.entry(owner.to_string())
			.or_default()
			.clone()
	}
}

impl PickService {
	/// Atomic admission gate: window normalization, capacity check, and
	/// increment all happen under the owner's exclusive lock, so concurrent
	/// requests can never both observe capacity and both succeed.
	pub async fn check_and_increment(&self, owner: &str) -> Result<QuotaDecision> {
		let _guard = self.acquire_quota_lock(owner).await?;
		let now = OffsetDateTime::now_utc();
		let window = self.quota_window();
		let max = self.cfg.quota.max_queries_per_window;
		let mut state = self.quota_store.load_or_create(owner, now).await?;

		normalize_window(&mut state, now, window);

		let window_reset_at = state.window_start + window;

		if state.count < max {
			state.count += 1;

			// Persisting here also commits any lazy window reset above.
			self.quota_store.save(&state).await?;

			let remaining = max - state.count;

			tracing::info!(owner, remaining, "Query admitted.");

			Ok(QuotaDecision { allowed: true, remaining, window_reset_at })
		} else {
			tracing::warn!(owner, "Query limit exceeded.");

			Ok(QuotaDecision { allowed: false, remaining: 0, window_reset_at })
		}
	}

	/// Read-only quota view for status display. It applies the same lazy
	/// window reset as the admission path, and since that reset writes, it
	/// takes the same exclusive lock rather than racing the increment path.
	pub async fn quota_peek(&self, owner: &str) -> Result<QuotaDecision> {
		let _guard = self.acquire_quota_lock(owner).await?;
		let now = OffsetDateTime::now_utc();
		let window = self.quota_window();
		let max = self.cfg.quota.max_queries_per_window;
		let mut state = self.quota_store.load_or_create(owner, now).await?;

		if normalize_window(&mut state, now, window) {
			self.quota_store.save(&state).await?;
		}

		Ok(QuotaDecision {
			allowed: state.count < max,
			remaining: max.saturating_sub(state.count),
			window_reset_at: state.window_start + window,
		})
	}

	async fn acquire_quota_lock(&self, owner: &str) -> Result<OwnedMutexGuard<()>> {
		let handle = self.quota_locks.handle(owner);
		let timeout = StdDuration::from_millis(self.cfg.quota.lock_timeout_ms);

		tokio::time::timeout(timeout, handle.lock_owned())
			.await
			.map_err(|_| Error::ResourceContention { owner: owner.to_string() })
	}

	fn quota_window(&self) -> Duration {
		Duration::hours(self.cfg.quota.window_hours)
	}
}

/// Resets an expired window before any capacity decision is made. Returns
/// whether the state changed.
fn normalize_window(state: &mut QuotaState, now: OffsetDateTime, window: Duration) -> bool {
	if now > state.window_start + window {
		state.count = 0;
		state.window_start = now;

		true
	} else {
		false
	}
}
