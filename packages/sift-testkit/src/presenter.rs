use std::sync::Mutex;

use tokio::time::Instant;

use sift_domain::Generation;
use sift_service::{AggregatedResultSet, Presenter, SearchEvent};

#[derive(Clone, Debug)]
pub struct Recorded {
	/// Tokio clock reading, so paused-clock tests see virtual time.
	pub at: Instant,
	pub event: SearchEvent,
}

/// Presenter that keeps every event it receives.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
	events: Mutex<Vec<Recorded>>,
}
impl RecordingPresenter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn recorded(&self) -> Vec<Recorded> {
		self.events.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn events(&self) -> Vec<SearchEvent> {
		self.recorded().into_iter().map(|recorded| recorded.event).collect()
	}

	/// Every published result set, oldest first.
	pub fn results(&self) -> Vec<AggregatedResultSet> {
		self.events()
			.into_iter()
			.filter_map(|event| match event {
				SearchEvent::Results(results) => Some(results),
				_ => None,
			})
			.collect()
	}

	pub fn empties(&self) -> Vec<Generation> {
		self.events()
			.into_iter()
			.filter_map(|event| match event {
				SearchEvent::Empty { generation } => Some(generation),
				_ => None,
			})
			.collect()
	}

	/// Number of published results plus empty states.
	pub fn publications(&self) -> usize {
		self.events()
			.iter()
			.filter(|event| matches!(event, SearchEvent::Results(_) | SearchEvent::Empty { .. }))
			.count()
	}

	pub fn loading_count(&self) -> usize {
		self.events().iter().filter(|event| matches!(event, SearchEvent::Loading)).count()
	}

	pub fn reset_count(&self) -> usize {
		self.events().iter().filter(|event| matches!(event, SearchEvent::Reset)).count()
	}

	/// Time of the first event matching `predicate`.
	pub fn first_at<F>(&self, predicate: F) -> Option<Instant>
	where
		F: Fn(&SearchEvent) -> bool,
	{
		self.recorded()
			.into_iter()
			.find(|recorded| predicate(&recorded.event))
			.map(|recorded| recorded.at)
	}

	fn push(&self, event: SearchEvent) {
		self.events
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.push(Recorded { at: Instant::now(), event });
	}
}
impl Presenter for RecordingPresenter {
	fn loading(&self) {
		self.push(SearchEvent::Loading);
	}

	fn results(&self, results: &AggregatedResultSet) {
		self.push(SearchEvent::Results(results.clone()));
	}

	fn empty(&self, generation: Generation) {
		self.push(SearchEvent::Empty { generation });
	}

	fn reset(&self) {
		self.push(SearchEvent::Reset);
	}
}
