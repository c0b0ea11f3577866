use std::{
	sync::{
		Mutex,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};

use tokio_util::sync::CancellationToken;

use sift_domain::{Query, ResultItem};
use sift_service::{BoxFuture, CategoryProvider, ProviderError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Behavior {
	Respond,
	Hang,
	Fail,
	Panic,
}

/// Category provider with a fixed script. Records every query it sees and every time a
/// wait was cut short by cancellation.
#[derive(Debug)]
pub struct ScriptedProvider {
	name: String,
	limit: usize,
	items: Vec<ResultItem>,
	delay: Duration,
	behavior: Behavior,
	honors_cancel: bool,
	queries: Mutex<Vec<String>>,
	cancellations: AtomicUsize,
}
impl ScriptedProvider {
	/// Responds immediately with `items`, untruncated.
	pub fn new(name: &str, items: Vec<ResultItem>) -> Self {
		Self {
			name: name.to_string(),
			limit: 5,
			items,
			delay: Duration::ZERO,
			behavior: Behavior::Respond,
			honors_cancel: true,
			queries: Mutex::new(Vec::new()),
			cancellations: AtomicUsize::new(0),
		}
	}

	/// Never settles unless cancelled.
	pub fn hung(name: &str) -> Self {
		Self { behavior: Behavior::Hang, ..Self::new(name, Vec::new()) }
	}

	/// Resolves to a store error.
	pub fn failing(name: &str) -> Self {
		Self { behavior: Behavior::Fail, ..Self::new(name, Vec::new()) }
	}

	/// Panics as soon as it is invoked.
	pub fn panicking(name: &str) -> Self {
		Self { behavior: Behavior::Panic, ..Self::new(name, Vec::new()) }
	}

	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = delay;

		self
	}

	pub fn with_limit(mut self, limit: usize) -> Self {
		self.limit = limit;

		self
	}

	/// Keeps waiting after cancellation, so only the apply gate can stop its results.
	pub fn ignoring_cancellation(mut self) -> Self {
		self.honors_cancel = false;

		self
	}

	/// Normalized text of every query received, in call order.
	pub fn queries(&self) -> Vec<String> {
		self.queries.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn calls(&self) -> usize {
		self.queries.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn cancellations(&self) -> usize {
		self.cancellations.load(Ordering::SeqCst)
	}

	async fn wait(&self, cancel: &CancellationToken) -> Result<()> {
		if self.behavior != Behavior::Hang && self.delay.is_zero() {
			return Ok(());
		}

		let settle = async {
			match self.behavior {
				Behavior::Hang => std::future::pending::<()>().await,
				_ => tokio::time::sleep(self.delay).await,
			}
		};

		if !self.honors_cancel {
			settle.await;

			return Ok(());
		}

		tokio::select! {
			_ = cancel.cancelled() => {
				self.cancellations.fetch_add(1, Ordering::SeqCst);

				Err(ProviderError::Cancelled)
			},
			_ = settle => Ok(()),
		}
	}
}
impl CategoryProvider for ScriptedProvider {
	fn name(&self) -> &str {
		&self.name
	}

	fn limit(&self) -> usize {
		self.limit
	}

	fn search<'a>(
		&'a self,
		query: &'a Query,
		cancel: &'a CancellationToken,
	) -> BoxFuture<'a, Result<Vec<ResultItem>>> {
		self.queries
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.push(query.normalized().to_string());

		if self.behavior == Behavior::Panic {
			panic!("Scripted provider {} panicked.", self.name);
		}

		Box::pin(async move {
			self.wait(cancel).await?;

			match self.behavior {
				Behavior::Fail => Err(ProviderError::Store {
					message: format!("Scripted provider {} failed.", self.name),
				}),
				_ => Ok(self.items.clone()),
			}
		})
	}
}
