use std::fmt;

use tokio::sync::mpsc;

use crate::aggregate::AggregatedResultSet;
use sift_domain::Generation;

type ResultsHook = Box<dyn Fn(&AggregatedResultSet) + Send + Sync>;
type EmptyHook = Box<dyn Fn(Generation) + Send + Sync>;
type SignalHook = Box<dyn Fn() + Send + Sync>;

/// Receives everything the engine publishes.
///
/// Calls are made while the engine holds its session lock, which is what keeps a late
/// publication from landing after a reset. Implementations must return quickly and must not
/// call back into the engine from inside a method.
pub trait Presenter
where
	Self: Send + Sync,
{
	/// A non-empty query entered the debounce window.
	fn loading(&self);

	/// Invoked once per applied generation that matched something.
	fn results(&self, results: &AggregatedResultSet);

	/// Invoked when an applied generation matched nothing in any category.
	fn empty(&self, generation: Generation);

	/// The input was cleared; drop any displayed results and the loading indicator.
	fn reset(&self);
}

/// Closure-backed presenter. Unset hooks are ignored.
#[derive(Default)]
pub struct Callbacks {
	on_results: Option<ResultsHook>,
	on_empty: Option<EmptyHook>,
	on_loading: Option<SignalHook>,
	on_reset: Option<SignalHook>,
}
impl Callbacks {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn on_results<F>(mut self, hook: F) -> Self
	where
		F: Fn(&AggregatedResultSet) + Send + Sync + 'static,
	{
		self.on_results = Some(Box::new(hook));

		self
	}

	pub fn on_empty<F>(mut self, hook: F) -> Self
	where
		F: Fn(Generation) + Send + Sync + 'static,
	{
		self.on_empty = Some(Box::new(hook));

		self
	}

	pub fn on_loading<F>(mut self, hook: F) -> Self
	where
		F: Fn() + Send + Sync + 'static,
	{
		self.on_loading = Some(Box::new(hook));

		self
	}

	pub fn on_reset<F>(mut self, hook: F) -> Self
	where
		F: Fn() + Send + Sync + 'static,
	{
		self.on_reset = Some(Box::new(hook));

		self
	}
}
impl Presenter for Callbacks {
	fn loading(&self) {
		if let Some(hook) = &self.on_loading {
			hook();
		}
	}

	fn results(&self, results: &AggregatedResultSet) {
		if let Some(hook) = &self.on_results {
			hook(results);
		}
	}

	fn empty(&self, generation: Generation) {
		if let Some(hook) = &self.on_empty {
			hook(generation);
		}
	}

	fn reset(&self) {
		if let Some(hook) = &self.on_reset {
			hook();
		}
	}
}
impl fmt::Debug for Callbacks {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Callbacks")
			.field("on_results", &self.on_results.is_some())
			.field("on_empty", &self.on_empty.is_some())
			.field("on_loading", &self.on_loading.is_some())
			.field("on_reset", &self.on_reset.is_some())
			.finish()
	}
}

#[derive(Clone, Debug)]
pub enum SearchEvent {
	Loading,
	Results(AggregatedResultSet),
	Empty { generation: Generation },
	Reset,
}

/// Forwards every publication as a `SearchEvent` over an unbounded channel.
#[derive(Clone, Debug)]
pub struct ChannelPresenter {
	tx: mpsc::UnboundedSender<SearchEvent>,
}
impl ChannelPresenter {
	pub fn new() -> (Self, mpsc::UnboundedReceiver<SearchEvent>) {
		let (tx, rx) = mpsc::unbounded_channel();

		(Self { tx }, rx)
	}

	fn send(&self, event: SearchEvent) {
		if self.tx.send(event).is_err() {
			tracing::debug!("Search event receiver dropped; event discarded.");
		}
	}
}
impl Presenter for ChannelPresenter {
	fn loading(&self) {
		self.send(SearchEvent::Loading);
	}

	fn results(&self, results: &AggregatedResultSet) {
		self.send(SearchEvent::Results(results.clone()));
	}

	fn empty(&self, generation: Generation) {
		self.send(SearchEvent::Empty { generation });
	}

	fn reset(&self) {
		self.send(SearchEvent::Reset);
	}
}

#[cfg(test)]
mod tests {
	use std::sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	};

	use super::*;

	#[test]
	fn callbacks_invoke_only_set_hooks() {
		let resets = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&resets);
		let callbacks = Callbacks::new().on_reset(move || {
			counter.fetch_add(1, Ordering::SeqCst);
		});

		callbacks.loading();
		callbacks.empty(Generation::new(1));
		callbacks.reset();
		callbacks.reset();

		assert_eq!(resets.load(Ordering::SeqCst), 2);
	}

	#[test]
	fn channel_presenter_forwards_events_in_order() {
		let (presenter, mut rx) = ChannelPresenter::new();

		presenter.loading();
		presenter.empty(Generation::new(3));
		presenter.reset();

		assert!(matches!(rx.try_recv(), Ok(SearchEvent::Loading)));
		assert!(matches!(
			rx.try_recv(),
			Ok(SearchEvent::Empty { generation }) if generation == Generation::new(3)
		));
		assert!(matches!(rx.try_recv(), Ok(SearchEvent::Reset)));
	}

	#[test]
	fn channel_presenter_tolerates_dropped_receiver() {
		let (presenter, rx) = ChannelPresenter::new();

		drop(rx);
		presenter.loading();
	}
}
