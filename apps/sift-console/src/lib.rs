pub mod command;
pub mod render;

use std::{
	fs,
	path::{Path, PathBuf},
	sync::Arc,
	time::Duration,
};

use clap::Parser;
use color_eyre::eyre;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::command::Command;
use sift_domain::RecordFixtures;
use sift_providers::ProspectingClient;
use sift_service::{CacheLoader, Catalog, ChannelPresenter, EngineSettings, SearchEngine, Stores};

#[derive(Debug, Parser)]
#[command(
	version = sift_cli::VERSION,
	rename_all = "kebab",
	styles = sift_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = sift_config::load(&args.config)?;

	init_tracing(&config);

	let fixtures = load_fixtures(&args.config, &config)?;
	let limit = config.search.per_category_limit as usize;
	let catalog = Catalog::new(Stores::in_memory(fixtures), &config.cache, limit);
	let registry = catalog.registry(&config.search.sources);
	let settings = EngineSettings::from(&config.search);
	let shutdown = CancellationToken::new();
	let loader = CacheLoader::new(
		catalog.refresh_targets(),
		Duration::from_secs(config.cache.refresh_interval_seconds),
	);
	let loader_task = tokio::spawn(loader.run(shutdown.clone()));
	let (presenter, events) = ChannelPresenter::new();
	let mut builder =
		SearchEngine::builder(registry, Arc::new(presenter)).settings(settings.clone());

	if let Some(prospecting) = &config.prospecting {
		builder = builder.prospecting(ProspectingClient::new(prospecting)?, limit);
	}

	let engine = builder.build();
	let printer = tokio::spawn(render::print_events(events));

	tracing::info!(
		sources = ?engine.registry().names(),
		prospecting = config.prospecting.is_some(),
		"Search console ready."
	);

	let mut lines = BufReader::new(tokio::io::stdin()).lines();

	while let Some(line) = lines.next_line().await? {
		match command::parse(&line) {
			Command::Search(raw) => engine.trigger_search(raw),
			Command::Prospect(kind, raw) =>
				if !engine.search_prospects(raw, kind) {
					eprintln!("Prospecting is not configured or the query is empty.");
				},
			Command::Reset => engine.reset(),
			Command::Quit => break,
		}
	}

	// Let the last dispatch publish before the channel is torn down.
	drop(engine);

	let grace = settings.search_delay + settings.max_loading + settings.min_loading;

	if tokio::time::timeout(grace, printer).await.is_err() {
		tracing::debug!("Event printer still busy at exit.");
	}

	shutdown.cancel();
	loader_task.await?;

	Ok(())
}

fn init_tracing(config: &sift_config::Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_fixtures(
	config_path: &Path,
	config: &sift_config::Config,
) -> color_eyre::Result<RecordFixtures> {
	let Some(path) = config.store.as_ref().and_then(|store| store.fixtures_path.as_ref()) else {
		tracing::warn!("No store.fixtures_path configured; starting with empty stores.");

		return Ok(RecordFixtures::default());
	};
	let path = resolve_relative(config_path, path);
	let raw = fs::read_to_string(&path)
		.map_err(|err| eyre::eyre!("Failed to read fixtures at {}: {err}.", path.display()))?;
	let fixtures: RecordFixtures = serde_json::from_str(&raw)
		.map_err(|err| eyre::eyre!("Failed to parse fixtures at {}: {err}.", path.display()))?;

	tracing::info!(
		path = %path.display(),
		contacts = fixtures.contacts.len(),
		accounts = fixtures.accounts.len(),
		sequences = fixtures.sequences.len(),
		deals = fixtures.deals.len(),
		"Record fixtures loaded."
	);

	Ok(fixtures)
}

/// Relative fixture paths are resolved against the config file's directory.
fn resolve_relative(config_path: &Path, path: &Path) -> PathBuf {
	if path.is_absolute() {
		return path.to_path_buf();
	}

	config_path.parent().map(|dir| dir.join(path)).unwrap_or_else(|| path.to_path_buf())
}
