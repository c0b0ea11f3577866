use std::{sync::Arc, time::Duration};

use time::OffsetDateTime;
use tokio::time as tokio_time;
use tokio_util::sync::CancellationToken;

use crate::{BoxFuture, Result, providers::snapshot::SnapshotProvider};
use sift_domain::Searchable;

/// A cache that can be rebuilt from its backing store.
pub trait Refresh
where
	Self: Send + Sync,
{
	fn category(&self) -> &str;

	/// Reloads the snapshot and returns the number of records now cached.
	fn refresh(&self) -> BoxFuture<'_, Result<usize>>;

	/// Wall-clock time of the snapshot currently held, if any.
	fn last_refreshed_at(&self) -> Option<OffsetDateTime>;
}

impl<R> Refresh for SnapshotProvider<R>
where
	R: Searchable,
{
	fn category(&self) -> &str {
		R::CATEGORY
	}

	fn refresh(&self) -> BoxFuture<'_, Result<usize>> {
		Box::pin(async move {
			let records = self.store().fetch(None).await?;
			let count = records.len();

			self.cache().replace(records);

			Ok(count)
		})
	}

	fn last_refreshed_at(&self) -> Option<OffsetDateTime> {
		self.cache().entry().map(|entry| entry.refreshed_at)
	}
}

/// Periodically rebuilds every registered snapshot. A failed refresh keeps the previous
/// snapshot, which then ages out on its own TTL.
pub struct CacheLoader {
	targets: Vec<Arc<dyn Refresh>>,
	interval: Duration,
}
impl CacheLoader {
	pub fn new(targets: Vec<Arc<dyn Refresh>>, interval: Duration) -> Self {
		Self { targets, interval }
	}

	/// Refreshes each target once and returns how many succeeded.
	pub async fn refresh_all(&self) -> usize {
		let mut refreshed = 0;

		for target in &self.targets {
			match target.refresh().await {
				Ok(count) => {
					refreshed += 1;

					tracing::info!(
						category = target.category(),
						records = count,
						refreshed_at = ?target.last_refreshed_at(),
						"Snapshot refreshed."
					);
				},
				Err(err) => {
					tracing::error!(
						category = target.category(),
						error = %err,
						retained_from = ?target.last_refreshed_at(),
						"Snapshot refresh failed."
					);
				},
			}
		}

		refreshed
	}

	pub async fn run(self, shutdown: CancellationToken) {
		loop {
			self.refresh_all().await;

			tokio::select! {
				_ = shutdown.cancelled() => break,
				_ = tokio_time::sleep(self.interval) => {},
			}
		}

		tracing::info!("Cache loader stopped.");
	}
}
