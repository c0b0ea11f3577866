//! Concurrent provider dispatch bounded by a deadline.
//!
//! Every provider runs in its own task. Results are collected as they settle until either
//! all providers are done or the deadline passes; whatever has not settled by then counts
//! as an empty category for this generation. Unsettled tasks are detached, not aborted.

use std::{collections::HashSet, sync::Arc, time::Duration};

use tokio::{task::JoinSet, time::Instant};
use tokio_util::sync::CancellationToken;

use crate::{CategoryProvider, ProviderError, registry::SourceRegistry};
use sift_domain::{Query, ResultItem};

/// Collected provider output, in registry order.
#[derive(Debug)]
pub struct FanOut {
	pub per_category: Vec<(String, Vec<ResultItem>)>,
	pub deadline_hit: bool,
	/// Providers that settled before the deadline.
	pub settled: usize,
}

/// Providers that have been issued and are being awaited.
pub struct PendingFanOut {
	names: Vec<String>,
	tasks: JoinSet<(usize, Vec<ResultItem>)>,
}
impl PendingFanOut {
	/// Spawns one task per provider. Must be called inside a Tokio runtime.
	pub fn spawn(registry: &SourceRegistry, query: Arc<Query>, cancel: &CancellationToken) -> Self {
		let mut tasks = JoinSet::new();
		let mut names = Vec::with_capacity(registry.len());

		for (slot, provider) in registry.providers().iter().enumerate() {
			let provider = Arc::clone(provider);
			let query = Arc::clone(&query);
			let cancel = cancel.clone();

			names.push(provider.name().to_string());
			tasks.spawn(async move {
				let items = search_guarded(provider.as_ref(), &query, &cancel).await;

				(slot, items)
			});
		}

		Self { names, tasks }
	}

	/// Waits for every provider or until `deadline` has elapsed since `started_at`.
	pub async fn collect(mut self, started_at: Instant, deadline: Duration) -> FanOut {
		let deadline_at = started_at + deadline;
		let mut slots: Vec<Option<Vec<ResultItem>>> = vec![None; self.names.len()];
		let mut deadline_hit = false;
		let mut settled = 0;

		loop {
			match tokio::time::timeout_at(deadline_at, self.tasks.join_next()).await {
				Ok(Some(Ok((slot, items)))) => {
					settled += 1;
					slots[slot] = Some(items);
				},
				Ok(Some(Err(err))) => {
					settled += 1;

					tracing::warn!(
						error = %err,
						panicked = err.is_panic(),
						"Category provider task failed; treating its category as empty."
					);
				},
				Ok(None) => break,
				Err(_) => {
					deadline_hit = true;

					let pending: Vec<&str> = self
						.names
						.iter()
						.zip(&slots)
						.filter(|(_, slot)| slot.is_none())
						.map(|(name, _)| name.as_str())
						.collect();

					tracing::debug!(
						?pending,
						deadline_ms = deadline.as_millis() as u64,
						"Deadline reached; assembling partial results."
					);

					self.tasks.detach_all();

					break;
				},
			}
		}

		let per_category = self
			.names
			.into_iter()
			.zip(slots)
			.map(|(name, items)| (name, items.unwrap_or_default()))
			.collect();

		FanOut { per_category, deadline_hit, settled }
	}
}

/// Spawns every provider in `registry` and collects within `deadline`.
pub async fn fan_out(
	registry: &SourceRegistry,
	query: Arc<Query>,
	deadline: Duration,
	cancel: &CancellationToken,
) -> FanOut {
	let started_at = Instant::now();

	PendingFanOut::spawn(registry, query, cancel).collect(started_at, deadline).await
}

/// Runs one provider and converts any failure into an empty list, capped at the provider's
/// limit with duplicate ids removed.
pub async fn search_guarded(
	provider: &dyn CategoryProvider,
	query: &Query,
	cancel: &CancellationToken,
) -> Vec<ResultItem> {
	let items = match provider.search(query, cancel).await {
		Ok(items) => items,
		Err(ProviderError::Cancelled) => {
			tracing::debug!(
				category = provider.name(),
				generation = %query.generation(),
				"Category lookup cancelled."
			);

			return Vec::new();
		},
		Err(err) => {
			tracing::warn!(
				category = provider.name(),
				generation = %query.generation(),
				error = %err,
				"Category provider failed; treating its category as empty."
			);

			return Vec::new();
		},
	};
	let mut seen = HashSet::new();

	items
		.into_iter()
		.filter(|item| seen.insert(item.id.clone()))
		.take(provider.limit())
		.collect()
}
