pub mod aggregate;
pub mod cache;
pub mod engine;
pub mod fanout;
pub mod generation;
pub mod loader;
pub mod presenter;
pub mod providers;
pub mod registry;

mod error;

pub use aggregate::{Aggregation, AggregatedResultSet, CategoryResults};
pub use cache::{CacheEntry, CacheLayer};
pub use engine::{QueryState, SearchEngine, SearchEngineBuilder};
pub use error::{ProviderError, Result};
pub use generation::GenerationAllocator;
pub use loader::{CacheLoader, Refresh};
pub use presenter::{Callbacks, ChannelPresenter, Presenter, SearchEvent};
pub use providers::{
	prospecting::ProspectingProvider,
	snapshot::{InMemoryStore, RecordStore, SnapshotProvider},
};
pub use registry::{Catalog, SourceRegistry, Stores};

use std::{future::Future, pin::Pin, time::Duration};

use tokio_util::sync::CancellationToken;

use sift_domain::{Query, ResultItem};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One searchable category behind a uniform lookup contract.
///
/// Implementations report failures through `ProviderError`; the fan-out boundary turns every
/// error into an empty category, so a failing source only hides its own results.
/// `cancel` fires once the query has been superseded; honoring it is optional.
pub trait CategoryProvider
where
	Self: Send + Sync,
{
	fn name(&self) -> &str;

	/// Maximum number of items this category may contribute.
	fn limit(&self) -> usize;

	fn search<'a>(
		&'a self,
		query: &'a Query,
		cancel: &'a CancellationToken,
	) -> BoxFuture<'a, Result<Vec<ResultItem>>>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineSettings {
	/// Quiet period before a keystroke is dispatched.
	pub search_delay: Duration,
	/// Minimum time between dispatch and publication.
	pub min_loading: Duration,
	/// Upper bound on waiting for providers before publishing what has arrived.
	pub max_loading: Duration,
}
impl Default for EngineSettings {
	fn default() -> Self {
		Self {
			search_delay: Duration::from_millis(sift_config::DEFAULT_SEARCH_DELAY_MS),
			min_loading: Duration::from_millis(sift_config::DEFAULT_MIN_LOADING_MS),
			max_loading: Duration::from_millis(sift_config::DEFAULT_MAX_LOADING_MS),
		}
	}
}
impl From<&sift_config::Search> for EngineSettings {
	fn from(cfg: &sift_config::Search) -> Self {
		Self {
			search_delay: Duration::from_millis(cfg.delay_ms),
			min_loading: Duration::from_millis(cfg.min_loading_ms),
			max_loading: Duration::from_millis(cfg.max_loading_ms),
		}
	}
}
