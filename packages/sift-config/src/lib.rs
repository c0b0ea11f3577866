mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Cache, Config, DEFAULT_CACHE_TTL_SECONDS, DEFAULT_LIVE_FETCH_LIMIT, DEFAULT_MAX_LOADING_MS,
	DEFAULT_MIN_LOADING_MS, DEFAULT_PER_CATEGORY_LIMIT, DEFAULT_REFRESH_INTERVAL_SECONDS,
	DEFAULT_SEARCH_DELAY_MS, KNOWN_SOURCES, Prospecting, Search, Service, Store,
};

use std::{collections::HashSet, fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.search.delay_ms == 0 {
		return Err(Error::Validation {
			message: "search.delay_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_loading_ms == 0 {
		return Err(Error::Validation {
			message: "search.max_loading_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.search.min_loading_ms >= cfg.search.max_loading_ms {
		return Err(Error::Validation {
			message: "search.min_loading_ms must be less than search.max_loading_ms.".to_string(),
		});
	}
	if cfg.search.per_category_limit == 0 {
		return Err(Error::Validation {
			message: "search.per_category_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.search.sources.is_empty() {
		return Err(Error::Validation {
			message: "search.sources must be non-empty.".to_string(),
		});
	}

	let mut seen = HashSet::new();

	for source in &cfg.search.sources {
		if !KNOWN_SOURCES.contains(&source.as_str()) {
			return Err(Error::Validation {
				message: format!(
					"search.sources entry {source:?} must be one of contacts, accounts, sequences, or deals."
				),
			});
		}
		if !seen.insert(source.as_str()) {
			return Err(Error::Validation {
				message: format!("search.sources entry {source:?} is listed more than once."),
			});
		}
	}

	if cfg.cache.ttl_seconds == 0 {
		return Err(Error::Validation {
			message: "cache.ttl_seconds must be greater than zero.".to_string(),
		});
	}
	if cfg.cache.live_fetch_limit == 0 {
		return Err(Error::Validation {
			message: "cache.live_fetch_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.cache.refresh_interval_seconds == 0 {
		return Err(Error::Validation {
			message: "cache.refresh_interval_seconds must be greater than zero.".to_string(),
		});
	}

	if let Some(prospecting) = cfg.prospecting.as_ref() {
		for (label, value) in [
			("prospecting.api_base", &prospecting.api_base),
			("prospecting.api_key", &prospecting.api_key),
		] {
			if value.trim().is_empty() {
				return Err(Error::Validation { message: format!("{label} must be non-empty.") });
			}
		}
		for (label, value) in [
			("prospecting.people_path", &prospecting.people_path),
			("prospecting.organizations_path", &prospecting.organizations_path),
		] {
			if !value.starts_with('/') {
				return Err(Error::Validation { message: format!("{label} must start with '/'.") });
			}
		}

		if !(1..=100).contains(&prospecting.per_page) {
			return Err(Error::Validation {
				message: "prospecting.per_page must be in the range 1-100.".to_string(),
			});
		}
		if prospecting.timeout_ms == 0 {
			return Err(Error::Validation {
				message: "prospecting.timeout_ms must be greater than zero.".to_string(),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if let Some(store) = cfg.store.as_mut()
		&& store
			.fixtures_path
			.as_deref()
			.map(|path| path.as_os_str().to_string_lossy().trim().is_empty())
			.unwrap_or(false)
	{
		store.fixtures_path = None;
	}

	for source in &mut cfg.search.sources {
		*source = source.trim().to_lowercase();
	}

	if let Some(prospecting) = cfg.prospecting.as_mut() {
		prospecting.api_base = prospecting.api_base.trim_end_matches('/').to_string();
	}
}
