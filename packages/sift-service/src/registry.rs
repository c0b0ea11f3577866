use std::{fmt, sync::Arc, time::Duration};

use crate::{
	CategoryProvider,
	cache::CacheLayer,
	loader::Refresh,
	providers::snapshot::{InMemoryStore, RecordStore, SnapshotProvider},
};
use sift_domain::{Account, Contact, Deal, RecordFixtures, Sequence, item};

/// Ordered set of providers consulted for one search context.
#[derive(Clone, Default)]
pub struct SourceRegistry {
	providers: Vec<Arc<dyn CategoryProvider>>,
}
impl SourceRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, provider: Arc<dyn CategoryProvider>) -> Self {
		self.register(provider);

		self
	}

	/// Appends `provider`, replacing an earlier provider with the same name in place.
	pub fn register(&mut self, provider: Arc<dyn CategoryProvider>) {
		if let Some(slot) = self.providers.iter_mut().find(|slot| slot.name() == provider.name()) {
			*slot = provider;
		} else {
			self.providers.push(provider);
		}
	}

	pub fn providers(&self) -> &[Arc<dyn CategoryProvider>] {
		&self.providers
	}

	pub fn names(&self) -> Vec<&str> {
		self.providers.iter().map(|provider| provider.name()).collect()
	}

	pub fn len(&self) -> usize {
		self.providers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.providers.is_empty()
	}
}
impl fmt::Debug for SourceRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SourceRegistry").field("providers", &self.names()).finish()
	}
}

/// Backing stores for the built-in categories.
pub struct Stores {
	pub contacts: Arc<dyn RecordStore<Contact>>,
	pub accounts: Arc<dyn RecordStore<Account>>,
	pub sequences: Arc<dyn RecordStore<Sequence>>,
	pub deals: Arc<dyn RecordStore<Deal>>,
}
impl Stores {
	pub fn in_memory(fixtures: RecordFixtures) -> Self {
		Self {
			contacts: Arc::new(InMemoryStore::new(fixtures.contacts)),
			accounts: Arc::new(InMemoryStore::new(fixtures.accounts)),
			sequences: Arc::new(InMemoryStore::new(fixtures.sequences)),
			deals: Arc::new(InMemoryStore::new(fixtures.deals)),
		}
	}
}

/// The built-in snapshot providers, one cache each.
pub struct Catalog {
	contacts: Arc<SnapshotProvider<Contact>>,
	accounts: Arc<SnapshotProvider<Account>>,
	sequences: Arc<SnapshotProvider<Sequence>>,
	deals: Arc<SnapshotProvider<Deal>>,
}
impl Catalog {
	pub fn new(stores: Stores, cache: &sift_config::Cache, per_category_limit: usize) -> Self {
		let ttl = Duration::from_secs(cache.ttl_seconds);
		let live_fetch_limit = cache.live_fetch_limit as usize;

		Self {
			contacts: snapshot_provider(stores.contacts, ttl, per_category_limit, live_fetch_limit),
			accounts: snapshot_provider(stores.accounts, ttl, per_category_limit, live_fetch_limit),
			sequences: snapshot_provider(
				stores.sequences,
				ttl,
				per_category_limit,
				live_fetch_limit,
			),
			deals: snapshot_provider(stores.deals, ttl, per_category_limit, live_fetch_limit),
		}
	}

	pub fn provider(&self, name: &str) -> Option<Arc<dyn CategoryProvider>> {
		match name {
			item::CONTACTS => Some(self.contacts.clone() as Arc<dyn CategoryProvider>),
			item::ACCOUNTS => Some(self.accounts.clone() as Arc<dyn CategoryProvider>),
			item::SEQUENCES => Some(self.sequences.clone() as Arc<dyn CategoryProvider>),
			item::DEALS => Some(self.deals.clone() as Arc<dyn CategoryProvider>),
			_ => None,
		}
	}

	/// Registry in the order given by `sources`. Unknown names are skipped.
	pub fn registry(&self, sources: &[String]) -> SourceRegistry {
		let mut registry = SourceRegistry::new();

		for source in sources {
			match self.provider(source) {
				Some(provider) => registry.register(provider),
				None => tracing::warn!(source = %source, "Unknown search source skipped."),
			}
		}

		registry
	}

	/// Default keystroke registry: contacts, accounts, sequences, deals.
	pub fn default_registry(&self) -> SourceRegistry {
		let sources: Vec<String> =
			sift_config::KNOWN_SOURCES.iter().map(|source| source.to_string()).collect();

		self.registry(&sources)
	}

	pub fn refresh_targets(&self) -> Vec<Arc<dyn Refresh>> {
		vec![
			self.contacts.clone() as Arc<dyn Refresh>,
			self.accounts.clone() as Arc<dyn Refresh>,
			self.sequences.clone() as Arc<dyn Refresh>,
			self.deals.clone() as Arc<dyn Refresh>,
		]
	}

	pub fn contacts(&self) -> &Arc<SnapshotProvider<Contact>> {
		&self.contacts
	}

	pub fn accounts(&self) -> &Arc<SnapshotProvider<Account>> {
		&self.accounts
	}

	pub fn sequences(&self) -> &Arc<SnapshotProvider<Sequence>> {
		&self.sequences
	}

	pub fn deals(&self) -> &Arc<SnapshotProvider<Deal>> {
		&self.deals
	}
}

fn snapshot_provider<R>(
	store: Arc<dyn RecordStore<R>>,
	ttl: Duration,
	limit: usize,
	live_fetch_limit: usize,
) -> Arc<SnapshotProvider<R>>
where
	R: sift_domain::Searchable,
{
	Arc::new(SnapshotProvider::new(Arc::new(CacheLayer::new(ttl)), store, limit, live_fetch_limit))
}
