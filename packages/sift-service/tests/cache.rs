use std::{
	sync::{
		Arc, Mutex,
		atomic::{AtomicBool, Ordering},
	},
	time::Duration,
};

use tokio::time;
use tokio_util::sync::CancellationToken;

use sift_domain::{Account, Contact, Generation, Query, item};
use sift_service::{
	BoxFuture, CacheLayer, CacheLoader, Catalog, CategoryProvider, ProviderError, RecordStore,
	Refresh, Result, SearchEngine, SnapshotProvider, Stores,
};
use sift_testkit::RecordingPresenter;

const TTL: Duration = Duration::from_secs(300);

/// Store that records every fetch and can be switched into failure.
struct CountingStore<R> {
	records: Vec<Arc<R>>,
	fetches: Mutex<Vec<Option<usize>>>,
	failing: AtomicBool,
}
impl<R> CountingStore<R> {
	fn new(records: Vec<R>) -> Self {
		Self {
			records: records.into_iter().map(Arc::new).collect(),
			fetches: Mutex::new(Vec::new()),
			failing: AtomicBool::new(false),
		}
	}

	fn fetches(&self) -> Vec<Option<usize>> {
		self.fetches.lock().expect("Fetch log lock poisoned.").clone()
	}
}
impl<R> RecordStore<R> for CountingStore<R>
where
	R: Send + Sync,
{
	fn fetch(&self, limit: Option<usize>) -> BoxFuture<'_, Result<Vec<Arc<R>>>> {
		self.fetches.lock().expect("Fetch log lock poisoned.").push(limit);

		Box::pin(async move {
			if self.failing.load(Ordering::SeqCst) {
				return Err(ProviderError::Store { message: "Store offline.".to_string() });
			}

			Ok(self.records.iter().take(limit.unwrap_or(self.records.len())).cloned().collect())
		})
	}
}

fn accounts_provider(
	store: Arc<CountingStore<Account>>,
	live_fetch_limit: usize,
) -> SnapshotProvider<Account> {
	SnapshotProvider::new(Arc::new(CacheLayer::new(TTL)), store, 5, live_fetch_limit)
}

fn query(raw: &str) -> Query {
	Query::new(raw, Generation::new(1)).expect("Expected a non-empty query.")
}

async fn titles<P>(provider: &P, raw: &str) -> Vec<String>
where
	P: CategoryProvider,
{
	provider
		.search(&query(raw), &CancellationToken::new())
		.await
		.expect("Expected the lookup to succeed.")
		.into_iter()
		.map(|item| item.title)
		.collect()
}

#[tokio::test(start_paused = true)]
async fn fresh_snapshot_is_served_without_touching_the_store() {
	let store = Arc::new(CountingStore::new(sift_testkit::sample_fixtures().accounts));
	let provider = accounts_provider(store.clone(), 500);

	provider.cache().replace(store.records.clone());

	assert_eq!(titles(&provider, "acme").await, vec!["Acme Corp".to_string()]);
	assert!(store.fetches().is_empty());
}

#[tokio::test(start_paused = true)]
async fn expired_snapshot_falls_back_to_a_bounded_live_fetch() {
	let store = Arc::new(CountingStore::new(sift_testkit::sample_fixtures().accounts));
	let provider = accounts_provider(store.clone(), 500);

	provider.cache().replace(store.records.clone());
	time::advance(TTL).await;

	assert!(provider.cache().fresh().is_none());
	assert_eq!(titles(&provider, "initech").await, vec!["Initech".to_string()]);
	assert_eq!(store.fetches(), vec![Some(500)]);
}

#[tokio::test(start_paused = true)]
async fn live_fetch_scans_only_the_bounded_window() {
	let store = Arc::new(CountingStore::new(sift_testkit::sample_fixtures().accounts));
	let provider = accounts_provider(store.clone(), 2);

	// Globex is third in the store, beyond the live window.
	assert!(titles(&provider, "globex").await.is_empty());
	assert_eq!(titles(&provider, "initech").await, vec!["Initech".to_string()]);
	assert_eq!(store.fetches(), vec![Some(2), Some(2)]);
}

#[tokio::test(start_paused = true)]
async fn failing_live_fetch_surfaces_as_a_provider_error() {
	let store = Arc::new(CountingStore::new(sift_testkit::sample_fixtures().accounts));
	let provider = accounts_provider(store.clone(), 500);

	store.failing.store(true, Ordering::SeqCst);

	let result = provider.search(&query("acme"), &CancellationToken::new()).await;

	assert!(matches!(result, Err(ProviderError::Store { .. })));
}

#[tokio::test(start_paused = true)]
async fn structured_year_matches_come_first() {
	let store = Arc::new(CountingStore::new(sift_testkit::sample_fixtures().accounts));
	let provider = accounts_provider(store.clone(), 500);

	assert_eq!(
		titles(&provider, "2024").await,
		vec!["Acme Corp".to_string(), "Globex".to_string()]
	);
}

#[tokio::test(start_paused = true)]
async fn loader_refreshes_every_catalog_snapshot() {
	let catalog =
		Catalog::new(Stores::in_memory(sift_testkit::sample_fixtures()), &Default::default(), 5);
	let loader = CacheLoader::new(catalog.refresh_targets(), Duration::from_secs(120));

	assert!(catalog.contacts().cache().fresh().is_none());
	assert_eq!(loader.refresh_all().await, 4);

	let contacts = catalog.contacts().cache().fresh().expect("Expected a fresh contacts snapshot.");

	assert_eq!(contacts.snapshot.len(), 3);
	assert_eq!(catalog.deals().cache().fresh().map(|entry| entry.snapshot.len()), Some(1));
}

#[tokio::test(start_paused = true)]
async fn failed_refresh_keeps_the_previous_snapshot() {
	let store = Arc::new(CountingStore::new(sift_testkit::sample_fixtures().accounts));
	let provider = Arc::new(accounts_provider(store.clone(), 500));
	let loader =
		CacheLoader::new(vec![provider.clone() as Arc<dyn Refresh>], Duration::from_secs(120));

	assert_eq!(provider.last_refreshed_at(), None);
	assert_eq!(loader.refresh_all().await, 1);

	let before = provider.cache().entry().expect("Expected a snapshot.");

	assert_eq!(provider.last_refreshed_at(), Some(before.refreshed_at));

	store.failing.store(true, Ordering::SeqCst);

	assert_eq!(loader.refresh_all().await, 0);

	let after = provider.cache().entry().expect("Expected the snapshot to survive.");

	assert!(Arc::ptr_eq(&before, &after));
	assert_eq!(provider.last_refreshed_at(), Some(before.refreshed_at));
	assert_eq!(store.fetches(), vec![None, None]);
}

#[tokio::test(start_paused = true)]
async fn loader_runs_on_its_interval_until_shutdown() {
	let store = Arc::new(CountingStore::new(Vec::<Contact>::new()));
	let provider = Arc::new(SnapshotProvider::<Contact>::new(
		Arc::new(CacheLayer::new(TTL)),
		store.clone(),
		5,
		500,
	));
	let shutdown = CancellationToken::new();
	let loader = CacheLoader::new(vec![provider as Arc<dyn Refresh>], Duration::from_secs(120));
	let handle = tokio::spawn(loader.run(shutdown.clone()));

	time::sleep(Duration::from_secs(250)).await;

	assert_eq!(store.fetches().len(), 3);

	shutdown.cancel();
	handle.await.expect("Expected the loader to stop cleanly.");
}

#[test]
fn catalog_registry_follows_the_configured_order() {
	let catalog =
		Catalog::new(Stores::in_memory(sift_testkit::sample_fixtures()), &Default::default(), 5);
	let sources = ["deals", "contacts", "calendar"].map(str::to_string);

	assert_eq!(catalog.registry(&sources).names(), vec![item::DEALS, item::CONTACTS]);
	assert_eq!(catalog.default_registry().names(), sift_config::KNOWN_SOURCES.to_vec());
}

#[tokio::test(start_paused = true)]
async fn year_query_finds_accounts_by_contract_expiration() {
	let catalog =
		Catalog::new(Stores::in_memory(sift_testkit::sample_fixtures()), &Default::default(), 5);

	CacheLoader::new(catalog.refresh_targets(), Duration::from_secs(120)).refresh_all().await;

	let presenter = Arc::new(RecordingPresenter::new());
	let engine = SearchEngine::builder(catalog.default_registry(), presenter.clone()).build();

	engine.trigger_search("2024");
	time::sleep(Duration::from_secs(3)).await;

	let results = presenter.results();
	let accounts: Vec<&str> = results[0]
		.get(item::ACCOUNTS)
		.expect("Expected account matches.")
		.iter()
		.map(|item| item.title.as_str())
		.collect();

	assert_eq!(accounts, vec!["Acme Corp", "Globex"]);
	assert_eq!(results[0].category_names(), vec![item::ACCOUNTS]);
}

#[tokio::test(start_paused = true)]
async fn phone_fragment_finds_contacts_by_digits() {
	let catalog =
		Catalog::new(Stores::in_memory(sift_testkit::sample_fixtures()), &Default::default(), 5);
	let presenter = Arc::new(RecordingPresenter::new());
	let engine = SearchEngine::builder(catalog.default_registry(), presenter.clone()).build();

	// No snapshot loaded yet, so every provider scans a live fetch.
	engine.trigger_search("415 555 0100");
	time::sleep(Duration::from_secs(3)).await;

	let results = presenter.results();
	let contacts = results[0].get(item::CONTACTS).expect("Expected contact matches.");

	assert_eq!(contacts.len(), 1);
	assert_eq!(contacts[0].title, "Ada Lovelace");
}
