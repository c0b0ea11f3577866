//! Per-category snapshots of a backing store, bounded by a time-to-live.
//!
//! The background loader is the only writer. Readers clone the current `Arc` and never
//! observe a half-written snapshot because replacement is a single reference swap.

use std::{
	sync::{Arc, RwLock},
	time::Duration,
};

use time::OffsetDateTime;
use tokio::time::Instant;

pub struct CacheEntry<R> {
	pub snapshot: Arc<Vec<Arc<R>>>,
	pub last_updated_at: Instant,
	/// Wall-clock time of the refresh, reported by the loader.
	pub refreshed_at: OffsetDateTime,
}
impl<R> CacheEntry<R> {
	pub fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
		now.saturating_duration_since(self.last_updated_at) < ttl
	}
}

pub struct CacheLayer<R> {
	ttl: Duration,
	entry: RwLock<Option<Arc<CacheEntry<R>>>>,
}
impl<R> CacheLayer<R> {
	pub fn new(ttl: Duration) -> Self {
		Self { ttl, entry: RwLock::new(None) }
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	/// Swaps in a new snapshot stamped with the current time.
	pub fn replace(&self, records: Vec<Arc<R>>) {
		let entry = Arc::new(CacheEntry {
			snapshot: Arc::new(records),
			last_updated_at: Instant::now(),
			refreshed_at: OffsetDateTime::now_utc(),
		});
		let mut slot = self.entry.write().unwrap_or_else(|err| err.into_inner());

		*slot = Some(entry);
	}

	pub fn invalidate(&self) {
		let mut slot = self.entry.write().unwrap_or_else(|err| err.into_inner());

		*slot = None;
	}

	/// The current entry regardless of age.
	pub fn entry(&self) -> Option<Arc<CacheEntry<R>>> {
		self.entry.read().unwrap_or_else(|err| err.into_inner()).clone()
	}

	/// The current entry if it is younger than the TTL; a stale entry is treated as absent.
	pub fn fresh(&self) -> Option<Arc<CacheEntry<R>>> {
		self.entry().filter(|entry| entry.is_fresh(self.ttl, Instant::now()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test(start_paused = true)]
	async fn snapshot_expires_after_ttl() {
		let cache = CacheLayer::new(Duration::from_secs(300));

		assert!(cache.fresh().is_none());

		cache.replace(vec![Arc::new("acme")]);

		assert_eq!(cache.fresh().map(|entry| entry.snapshot.len()), Some(1));

		tokio::time::advance(Duration::from_secs(299)).await;

		assert!(cache.fresh().is_some());

		tokio::time::advance(Duration::from_secs(1)).await;

		assert!(cache.fresh().is_none());
		assert!(cache.entry().is_some());
	}

	#[tokio::test(start_paused = true)]
	async fn readers_keep_their_snapshot_across_replace() {
		let cache = CacheLayer::new(Duration::from_secs(60));

		cache.replace(vec![Arc::new(1_u32), Arc::new(2)]);

		let held = cache.fresh().expect("Snapshot must be fresh.");

		cache.replace(vec![Arc::new(3_u32)]);

		assert_eq!(held.snapshot.len(), 2);
		assert_eq!(cache.fresh().map(|entry| entry.snapshot.len()), Some(1));
	}

	#[tokio::test(start_paused = true)]
	async fn invalidate_clears_entry() {
		let cache = CacheLayer::new(Duration::from_secs(60));

		cache.replace(vec![Arc::new(())]);
		cache.invalidate();

		assert!(cache.entry().is_none());
	}
}
