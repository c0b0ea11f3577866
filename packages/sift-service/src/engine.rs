//! Per-session search engine.
//!
//! Keystrokes pass through a debounce window; each dispatch mints a generation, fans out to
//! the registry under a deadline, waits out the minimum loading time, then publishes only if
//! its generation is still the latest. Every check-and-publish runs under the session lock,
//! so a reset and a late publication can never interleave.

use std::{
	collections::VecDeque,
	sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio::{task::JoinHandle, time::Instant};
use tokio_util::sync::CancellationToken;

use crate::{
	EngineSettings,
	aggregate::{self, Aggregation},
	fanout::PendingFanOut,
	generation::GenerationAllocator,
	presenter::Presenter,
	providers::prospecting::ProspectingProvider,
	registry::SourceRegistry,
};
use sift_domain::{Generation, Query};
use sift_providers::{ProspectKind, ProspectingClient};

const HISTORY_LEN: usize = 32;

/// Lifecycle of a query, and of the session as a whole.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryState {
	/// Nothing typed, or the input was cleared.
	Idle,
	/// Waiting for the input to go quiet.
	Debouncing,
	/// Generation minted; providers about to be issued.
	Dispatched,
	/// Providers issued and being awaited.
	Awaiting,
	/// The deadline passed before every provider settled.
	DeadlineHit,
	/// Results or the empty state were published.
	Applied,
	/// A newer generation or a reset overtook this one before it was applied.
	Superseded,
}
impl QueryState {
	/// States during which the presentation layer shows a loading indicator.
	pub fn is_loading(self) -> bool {
		matches!(self, Self::Debouncing | Self::Dispatched | Self::Awaiting | Self::DeadlineHit)
	}
}

#[derive(Clone)]
pub struct SearchEngine {
	inner: Arc<EngineInner>,
}
impl SearchEngine {
	pub fn builder(registry: SourceRegistry, presenter: Arc<dyn Presenter>) -> SearchEngineBuilder {
		SearchEngineBuilder::new(registry, presenter)
	}

	/// Feeds the debounce gate. Input that normalizes to empty resets immediately.
	///
	/// Must be called from within a Tokio runtime.
	pub fn trigger_search(&self, raw: &str) {
		if sift_domain::query::normalize(raw).is_empty() {
			self.reset();

			return;
		}

		let mut session = self.inner.lock_session();

		session.cancel_debounce();

		let ticket = session.debounce_ticket;

		self.inner.enter_loading(&mut session);

		session.phase = QueryState::Debouncing;

		let engine = self.clone();
		let raw = raw.to_string();
		let delay = self.inner.settings.search_delay;

		session.debounce = Some(tokio::spawn(async move {
			tokio::time::sleep(delay).await;

			engine.fire_debounce(ticket, &raw).await;
		}));
	}

	/// Forces `Idle` immediately. Any pending debounce is dropped and any in-flight
	/// generation is cancelled and will never be published.
	pub fn reset(&self) {
		let mut session = self.inner.lock_session();

		session.cancel_debounce();

		let generation = self.inner.generations.allocate();

		session.supersede_in_flight();
		session.phase = QueryState::Idle;

		tracing::debug!(generation = %generation, "Search session reset.");

		self.inner.presenter.reset();
	}

	/// Dispatches `raw` against `registry` without debouncing. Returns the generation issued,
	/// or `None` when the input was empty and the session was reset instead.
	///
	/// Must be called from within a Tokio runtime.
	pub fn search_now(&self, raw: &str, registry: SourceRegistry) -> Option<Generation> {
		let dispatch = {
			let mut session = self.inner.lock_session();

			session.cancel_debounce();
			self.inner.begin_generation(&mut session, raw, registry)
		};
		let Some(dispatch) = dispatch else {
			self.reset();

			return None;
		};
		let generation = dispatch.query.generation();
		let engine = self.clone();

		tokio::spawn(async move { engine.inner.run(dispatch).await });

		Some(generation)
	}

	/// Explicit remote people or organization search. Returns `false` when prospecting is
	/// not configured or the input is empty.
	pub fn search_prospects(&self, raw: &str, kind: ProspectKind) -> bool {
		let registry = match (&self.inner.prospects, kind) {
			(Some(prospects), ProspectKind::People) => prospects.people.clone(),
			(Some(prospects), ProspectKind::Organizations) => prospects.organizations.clone(),
			(None, _) => {
				tracing::warn!(?kind, "Prospecting search requested but not configured.");

				return false;
			},
		};

		self.search_now(raw, registry).is_some()
	}

	pub fn state(&self) -> QueryState {
		self.inner.lock_session().phase
	}

	/// Latest token minted. Resets mint a token too, so this may belong to no query.
	pub fn current_generation(&self) -> Generation {
		self.inner.generations.current()
	}

	/// State of a recent generation. Old entries are forgotten.
	pub fn generation_state(&self, generation: Generation) -> Option<QueryState> {
		self.inner
			.lock_session()
			.history
			.iter()
			.find(|(recorded, _)| *recorded == generation)
			.map(|(_, state)| *state)
	}

	pub fn settings(&self) -> &EngineSettings {
		&self.inner.settings
	}

	pub fn registry(&self) -> &SourceRegistry {
		&self.inner.registry
	}

	async fn fire_debounce(&self, ticket: u64, raw: &str) {
		// The session guard must not live across the fan-out await.
		let dispatch = {
			let mut session = self.inner.lock_session();

			// A newer keystroke or reset got the lock first.
			if session.debounce_ticket != ticket {
				return;
			}

			session.debounce = None;

			let registry = self.inner.registry.clone();

			match self.inner.begin_generation(&mut session, raw, registry) {
				Some(dispatch) => dispatch,
				None => return,
			}
		};

		self.inner.run(dispatch).await;
	}
}

pub struct SearchEngineBuilder {
	registry: SourceRegistry,
	presenter: Arc<dyn Presenter>,
	settings: EngineSettings,
	prospects: Option<ProspectRegistries>,
}
impl SearchEngineBuilder {
	pub fn new(registry: SourceRegistry, presenter: Arc<dyn Presenter>) -> Self {
		Self { registry, presenter, settings: EngineSettings::default(), prospects: None }
	}

	pub fn settings(mut self, settings: EngineSettings) -> Self {
		self.settings = settings;

		self
	}

	/// Enables `search_prospects` with both remote providers capped at `limit`.
	pub fn prospecting(self, client: ProspectingClient, limit: usize) -> Self {
		let people = ProspectingProvider::new(client.clone(), ProspectKind::People, limit);
		let organizations = ProspectingProvider::new(client, ProspectKind::Organizations, limit);

		self.prospect_registries(
			SourceRegistry::new().with(Arc::new(people)),
			SourceRegistry::new().with(Arc::new(organizations)),
		)
	}

	/// Registries dispatched by `search_prospects`, one per kind.
	pub fn prospect_registries(
		mut self,
		people: SourceRegistry,
		organizations: SourceRegistry,
	) -> Self {
		self.prospects = Some(ProspectRegistries { people, organizations });

		self
	}

	pub fn build(self) -> SearchEngine {
		SearchEngine {
			inner: Arc::new(EngineInner {
				registry: self.registry,
				prospects: self.prospects,
				presenter: self.presenter,
				settings: self.settings,
				generations: GenerationAllocator::new(),
				session: Mutex::new(Session::default()),
			}),
		}
	}
}

struct ProspectRegistries {
	people: SourceRegistry,
	organizations: SourceRegistry,
}

struct EngineInner {
	registry: SourceRegistry,
	prospects: Option<ProspectRegistries>,
	presenter: Arc<dyn Presenter>,
	settings: EngineSettings,
	generations: GenerationAllocator,
	session: Mutex<Session>,
}
impl EngineInner {
	fn lock_session(&self) -> MutexGuard<'_, Session> {
		self.session.lock().unwrap_or_else(PoisonError::into_inner)
	}

	fn enter_loading(&self, session: &mut Session) {
		if !session.phase.is_loading() {
			self.presenter.loading();
		}
	}

	/// Mints a generation for `raw`, superseding whatever was in flight.
	fn begin_generation(
		&self,
		session: &mut Session,
		raw: &str,
		registry: SourceRegistry,
	) -> Option<Dispatch> {
		if sift_domain::query::normalize(raw).is_empty() {
			return None;
		}

		let generation = self.generations.allocate();
		let query = Query::new(raw, generation)?;
		let cancel = CancellationToken::new();
		let started_at = Instant::now();

		session.supersede_in_flight();
		self.enter_loading(session);

		session.phase = QueryState::Dispatched;
		session.in_flight = Some(generation);
		session.cancel = Some(cancel.clone());
		session.record(generation, QueryState::Dispatched);

		tracing::debug!(
			generation = %generation,
			query = query.normalized(),
			providers = registry.len(),
			"Search dispatched."
		);

		Some(Dispatch { query: Arc::new(query), registry, cancel, started_at })
	}

	async fn run(&self, dispatch: Dispatch) {
		let Dispatch { query, registry, cancel, started_at } = dispatch;
		let generation = query.generation();
		let pending = PendingFanOut::spawn(&registry, query, &cancel);

		self.advance(generation, QueryState::Awaiting);

		let fan_out = pending.collect(started_at, self.settings.max_loading).await;

		if fan_out.deadline_hit {
			self.advance(generation, QueryState::DeadlineHit);
		}

		let aggregation = aggregate::assemble(generation, fan_out.per_category, fan_out.deadline_hit);

		if !self.generations.is_current(generation) {
			tracing::debug!(generation = %generation, "Stale generation discarded before display wait.");

			return;
		}

		let elapsed = started_at.elapsed();

		if elapsed < self.settings.min_loading {
			tokio::time::sleep(self.settings.min_loading - elapsed).await;
		}

		self.apply(aggregation);
	}

	/// Moves `generation` forward unless it has already been overtaken.
	fn advance(&self, generation: Generation, state: QueryState) {
		let mut session = self.lock_session();

		if !session.record(generation, state) {
			return;
		}
		if session.in_flight == Some(generation) && session.debounce.is_none() {
			session.phase = state;
		}
	}

	/// The apply gate.
	fn apply(&self, aggregation: Aggregation) {
		let generation = aggregation.generation();
		let mut session = self.lock_session();

		if !self.generations.is_current(generation) {
			tracing::debug!(generation = %generation, "Stale generation discarded.");

			return;
		}

		match &aggregation {
			Aggregation::Results(results) => {
				tracing::debug!(
					generation = %generation,
					categories = results.categories().len(),
					items = results.total_items(),
					partial = results.is_partial(),
					"Search results published."
				);

				self.presenter.results(results);
			},
			Aggregation::Empty { partial, .. } => {
				tracing::debug!(generation = %generation, partial, "Search matched nothing.");

				self.presenter.empty(generation);
			},
		}

		session.record(generation, QueryState::Applied);
		session.in_flight = None;

		// A newer keystroke is still debouncing; the published results hid its indicator.
		if session.debounce.is_some() {
			self.presenter.loading();
		} else {
			session.phase = QueryState::Applied;
		}
	}
}

struct Dispatch {
	query: Arc<Query>,
	registry: SourceRegistry,
	cancel: CancellationToken,
	started_at: Instant,
}

struct Session {
	phase: QueryState,
	debounce: Option<JoinHandle<()>>,
	debounce_ticket: u64,
	in_flight: Option<Generation>,
	/// Token of the latest dispatched generation. Kept after apply so that providers still
	/// running past the deadline are cancelled once the generation is overtaken.
	cancel: Option<CancellationToken>,
	history: VecDeque<(Generation, QueryState)>,
}
impl Session {
	fn cancel_debounce(&mut self) {
		self.debounce_ticket += 1;

		if let Some(handle) = self.debounce.take() {
			handle.abort();
		}
	}

	fn supersede_in_flight(&mut self) {
		if let Some(token) = self.cancel.take() {
			token.cancel();
		}
		if let Some(generation) = self.in_flight.take() {
			self.record(generation, QueryState::Superseded);

			tracing::debug!(generation = %generation, "Generation superseded.");
		}
	}

	/// Returns `false` when `generation` had already reached a terminal state.
	fn record(&mut self, generation: Generation, state: QueryState) -> bool {
		if let Some((_, recorded)) =
			self.history.iter_mut().find(|(recorded, _)| *recorded == generation)
		{
			if matches!(recorded, QueryState::Applied | QueryState::Superseded) {
				return false;
			}

			*recorded = state;

			return true;
		}

		if self.history.len() == HISTORY_LEN {
			self.history.pop_front();
		}

		self.history.push_back((generation, state));

		true
	}
}
impl Default for Session {
	fn default() -> Self {
		Self {
			phase: QueryState::Idle,
			debounce: None,
			debounce_ticket: 0,
			in_flight: None,
			cancel: None,
			history: VecDeque::with_capacity(HISTORY_LEN),
		}
	}
}
