use std::{
	marker::PhantomData,
	sync::{Arc, RwLock},
};

use tokio_util::sync::CancellationToken;

use crate::{BoxFuture, CategoryProvider, ProviderError, Result, cache::CacheLayer};
use sift_domain::{Query, ResultItem, Searchable, matching};

/// Read access to the store that owns one record type.
pub trait RecordStore<R>
where
	Self: Send + Sync,
{
	/// Returns up to `limit` records, or every record when `limit` is `None`.
	fn fetch(&self, limit: Option<usize>) -> BoxFuture<'_, Result<Vec<Arc<R>>>>;
}

/// Store backed by an in-process record list, replaced wholesale.
pub struct InMemoryStore<R> {
	records: RwLock<Arc<Vec<Arc<R>>>>,
}
impl<R> InMemoryStore<R> {
	pub fn new(records: Vec<R>) -> Self {
		Self { records: RwLock::new(Arc::new(records.into_iter().map(Arc::new).collect())) }
	}

	pub fn replace(&self, records: Vec<R>) {
		let next = Arc::new(records.into_iter().map(Arc::new).collect());
		let mut slot = self.records.write().unwrap_or_else(|err| err.into_inner());

		*slot = next;
	}

	pub fn len(&self) -> usize {
		self.snapshot().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn snapshot(&self) -> Arc<Vec<Arc<R>>> {
		Arc::clone(&self.records.read().unwrap_or_else(|err| err.into_inner()))
	}
}
impl<R> RecordStore<R> for InMemoryStore<R>
where
	R: Send + Sync,
{
	fn fetch(&self, limit: Option<usize>) -> BoxFuture<'_, Result<Vec<Arc<R>>>> {
		let snapshot = self.snapshot();
		let take = limit.unwrap_or(snapshot.len());

		Box::pin(async move { Ok(snapshot.iter().take(take).cloned().collect()) })
	}
}

/// Category provider that scans a cached snapshot, or a bounded live fetch when the
/// snapshot is missing or older than its TTL.
pub struct SnapshotProvider<R> {
	cache: Arc<CacheLayer<R>>,
	store: Arc<dyn RecordStore<R>>,
	limit: usize,
	live_fetch_limit: usize,
	_record: PhantomData<fn() -> R>,
}
impl<R> SnapshotProvider<R>
where
	R: Searchable,
{
	pub fn new(
		cache: Arc<CacheLayer<R>>,
		store: Arc<dyn RecordStore<R>>,
		limit: usize,
		live_fetch_limit: usize,
	) -> Self {
		Self { cache, store, limit, live_fetch_limit, _record: PhantomData }
	}

	pub fn cache(&self) -> &Arc<CacheLayer<R>> {
		&self.cache
	}

	pub fn store(&self) -> &Arc<dyn RecordStore<R>> {
		&self.store
	}

	async fn lookup(&self, query: &Query, cancel: &CancellationToken) -> Result<Vec<ResultItem>> {
		if let Some(entry) = self.cache.fresh() {
			return Ok(matching::scan(&entry.snapshot, query, self.limit));
		}

		tracing::debug!(
			category = R::CATEGORY,
			limit = self.live_fetch_limit,
			"Snapshot unavailable; scanning a bounded live fetch."
		);

		let records = tokio::select! {
			_ = cancel.cancelled() => return Err(ProviderError::Cancelled),
			records = self.store.fetch(Some(self.live_fetch_limit)) => records?,
		};

		Ok(matching::scan(&records, query, self.limit))
	}
}
impl<R> CategoryProvider for SnapshotProvider<R>
where
	R: Searchable,
{
	fn name(&self) -> &str {
		R::CATEGORY
	}

	fn limit(&self) -> usize {
		self.limit
	}

	fn search<'a>(
		&'a self,
		query: &'a Query,
		cancel: &'a CancellationToken,
	) -> BoxFuture<'a, Result<Vec<ResultItem>>> {
		Box::pin(self.lookup(query, cancel))
	}
}
