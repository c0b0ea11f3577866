mod fixtures;
mod presenter;
mod provider;

pub use fixtures::{items, sample_fixtures};
pub use presenter::{Recorded, RecordingPresenter};
pub use provider::ScriptedProvider;

use std::sync::Arc;

use sift_service::{CategoryProvider, EngineSettings, SourceRegistry};

/// Registry over `providers`, in the given order.
pub fn registry<I>(providers: I) -> SourceRegistry
where
	I: IntoIterator<Item = Arc<ScriptedProvider>>,
{
	providers
		.into_iter()
		.fold(SourceRegistry::new(), |registry, provider| {
			registry.with(provider as Arc<dyn CategoryProvider>)
		})
}

/// Production defaults: 300 ms debounce, 200 ms minimum loading, 2000 ms deadline.
pub fn default_settings() -> EngineSettings {
	EngineSettings::default()
}
