use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{BoxFuture, CategoryProvider, ProviderError, Result};
use sift_domain::{Describe, ProspectOrganization, ProspectPerson, Query, ResultItem};
use sift_providers::{ProspectKind, ProspectingClient};

/// Remote people or organization lookup. Only dispatched on an explicit request.
pub struct ProspectingProvider {
	client: ProspectingClient,
	kind: ProspectKind,
	limit: usize,
}
impl ProspectingProvider {
	pub fn new(client: ProspectingClient, kind: ProspectKind, limit: usize) -> Self {
		Self { client, kind, limit }
	}

	async fn lookup(&self, query: &Query, cancel: &CancellationToken) -> Result<Vec<ResultItem>> {
		let keywords = query.normalized();
		let items = match self.kind {
			ProspectKind::People => {
				let people = tokio::select! {
					_ = cancel.cancelled() => return Err(ProviderError::Cancelled),
					people = self.client.search_people(keywords) => people?,
				};

				people
					.into_iter()
					.take(self.limit)
					.map(|person| ProspectPerson::to_item(&Arc::new(person)))
					.collect()
			},
			ProspectKind::Organizations => {
				let organizations = tokio::select! {
					_ = cancel.cancelled() => return Err(ProviderError::Cancelled),
					organizations = self.client.search_organizations(keywords) => organizations?,
				};

				organizations
					.into_iter()
					.take(self.limit)
					.map(|organization| ProspectOrganization::to_item(&Arc::new(organization)))
					.collect()
			},
		};

		Ok(items)
	}
}
impl CategoryProvider for ProspectingProvider {
	fn name(&self) -> &str {
		match self.kind {
			ProspectKind::People => sift_domain::item::PROSPECT_PEOPLE,
			ProspectKind::Organizations => sift_domain::item::PROSPECT_ORGANIZATIONS,
		}
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
