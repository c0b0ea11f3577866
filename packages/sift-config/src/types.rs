use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

pub const DEFAULT_SEARCH_DELAY_MS: u64 = 300;
pub const DEFAULT_MIN_LOADING_MS: u64 = 200;
pub const DEFAULT_MAX_LOADING_MS: u64 = 2_000;
pub const DEFAULT_PER_CATEGORY_LIMIT: u32 = 5;
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;
pub const DEFAULT_LIVE_FETCH_LIMIT: u32 = 500;
pub const DEFAULT_REFRESH_INTERVAL_SECONDS: u64 = 120;

/// Category names accepted in `search.sources`, in their default registry order.
pub const KNOWN_SOURCES: [&str; 4] = ["contacts", "accounts", "sequences", "deals"];

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub cache: Cache,
	pub store: Option<Store>,
	pub prospecting: Option<Prospecting>,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Search {
	pub delay_ms: u64,
	pub min_loading_ms: u64,
	pub max_loading_ms: u64,
	pub per_category_limit: u32,
	/// Registry order for keystroke searches.
	pub sources: Vec<String>,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			delay_ms: DEFAULT_SEARCH_DELAY_MS,
			min_loading_ms: DEFAULT_MIN_LOADING_MS,
			max_loading_ms: DEFAULT_MAX_LOADING_MS,
			per_category_limit: DEFAULT_PER_CATEGORY_LIMIT,
			sources: KNOWN_SOURCES.iter().map(|source| source.to_string()).collect(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Cache {
	pub ttl_seconds: u64,
	pub live_fetch_limit: u32,
	pub refresh_interval_seconds: u64,
}
impl Default for Cache {
	fn default() -> Self {
		Self {
			ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
			live_fetch_limit: DEFAULT_LIVE_FETCH_LIMIT,
			refresh_interval_seconds: DEFAULT_REFRESH_INTERVAL_SECONDS,
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct Store {
	/// JSON document with `contacts`, `accounts`, `sequences` and `deals` arrays.
	pub fixtures_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Prospecting {
	pub api_base: String,
	pub api_key: String,
	#[serde(default = "default_people_path")]
	pub people_path: String,
	#[serde(default = "default_organizations_path")]
	pub organizations_path: String,
	#[serde(default = "default_per_page")]
	pub per_page: u32,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

fn default_people_path() -> String {
	"/v1/mixed_people/search".to_string()
}

fn default_organizations_path() -> String {
	"/v1/mixed_companies/search".to_string()
}

fn default_per_page() -> u32 {
	DEFAULT_PER_CATEGORY_LIMIT
}

fn default_timeout_ms() -> u64 {
	5_000
}
