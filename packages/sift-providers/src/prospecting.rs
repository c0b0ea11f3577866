//! Client for the remote people/organization prospecting service.
//!
//! Requests carry `{ keywords, per_page }`; responses hold either a `people` or an
//! `organizations` array. Records without an id or a name are skipped.

use std::time::Duration;

use reqwest::{Client, header::HeaderMap};
use serde_json::Value;

use crate::{Error, Result};
use sift_config::Prospecting;
use sift_domain::{ProspectOrganization, ProspectPerson};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProspectKind {
	People,
	Organizations,
}
impl ProspectKind {
	fn response_key(self) -> &'static str {
		match self {
			Self::People => "people",
			Self::Organizations => "organizations",
		}
	}
}

#[derive(Clone)]
pub struct ProspectingClient {
	client: Client,
	headers: HeaderMap,
	api_base: String,
	people_path: String,
	organizations_path: String,
	per_page: u32,
}
impl ProspectingClient {
	pub fn new(cfg: &Prospecting) -> Result<Self> {
		let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
		let headers = crate::auth_headers(&cfg.api_key, &cfg.default_headers)?;

		Ok(Self {
			client,
			headers,
			api_base: cfg.api_base.clone(),
			people_path: cfg.people_path.clone(),
			organizations_path: cfg.organizations_path.clone(),
			per_page: cfg.per_page,
		})
	}

	pub async fn search_people(&self, keywords: &str) -> Result<Vec<ProspectPerson>> {
		let json = self.post(ProspectKind::People, keywords).await?;

		parse_people_response(&json)
	}

	pub async fn search_organizations(&self, keywords: &str) -> Result<Vec<ProspectOrganization>> {
		let json = self.post(ProspectKind::Organizations, keywords).await?;

		parse_organizations_response(&json)
	}

	async fn post(&self, kind: ProspectKind, keywords: &str) -> Result<Value> {
		let path = match kind {
			ProspectKind::People => &self.people_path,
			ProspectKind::Organizations => &self.organizations_path,
		};
		let url = format!("{}{}", self.api_base, path);
		let body = request_body(keywords, self.per_page);
		let res = self.client.post(url).headers(self.headers.clone()).json(&body).send().await?;
		let json: Value = res.error_for_status()?.json().await?;

		Ok(json)
	}
}

pub fn request_body(keywords: &str, per_page: u32) -> Value {
	serde_json::json!({ "keywords": keywords, "per_page": per_page })
}

pub fn parse_people_response(json: &Value) -> Result<Vec<ProspectPerson>> {
	let records = records_array(json, ProspectKind::People)?;
	let mut out = Vec::with_capacity(records.len());

	for record in records {
		let (Some(id), Some(name)) = (record_id(record), person_name(record)) else {
			tracing::warn!("Prospect person record is missing id or name.");

			continue;
		};

		out.push(ProspectPerson {
			id,
			name,
			title: string_field(record, "title"),
			organization_name: record
				.get("organization")
				.and_then(|org| string_field(org, "name"))
				.or_else(|| string_field(record, "organization_name")),
			email: string_field(record, "email"),
			linkedin_url: string_field(record, "linkedin_url"),
		});
	}

	Ok(out)
}

pub fn parse_organizations_response(json: &Value) -> Result<Vec<ProspectOrganization>> {
	let records = records_array(json, ProspectKind::Organizations)?;
	let mut out = Vec::with_capacity(records.len());

	for record in records {
		let (Some(id), Some(name)) = (record_id(record), string_field(record, "name")) else {
			tracing::warn!("Prospect organization record is missing id or name.");

			continue;
		};

		out.push(ProspectOrganization {
			id,
			name,
			primary_domain: string_field(record, "primary_domain")
				.or_else(|| string_field(record, "website_url")),
			industry: string_field(record, "industry"),
			estimated_num_employees: record
				.get("estimated_num_employees")
				.and_then(Value::as_u64),
		});
	}

	Ok(out)
}

fn records_array(json: &Value, kind: ProspectKind) -> Result<&Vec<Value>> {
	let key = kind.response_key();

	json.get(key).and_then(Value::as_array).ok_or_else(|| Error::InvalidResponse {
		message: format!("Prospecting response is missing {key} array."),
	})
}

fn record_id(record: &Value) -> Option<String> {
	match record.get("id")? {
		Value::String(id) if !id.trim().is_empty() => Some(id.trim().to_string()),
		Value::Number(id) => Some(id.to_string()),
		_ => None,
	}
}

fn person_name(record: &Value) -> Option<String> {
	if let Some(name) = string_field(record, "name") {
		return Some(name);
	}

	let first = string_field(record, "first_name");
	let last = string_field(record, "last_name");

	match (first, last) {
		(Some(first), Some(last)) => Some(format!("{first} {last}")),
		(Some(only), None) | (None, Some(only)) => Some(only),
		(None, None) => None,
	}
}

fn string_field(record: &Value, key: &str) -> Option<String> {
	record
		.get(key)
		.and_then(Value::as_str)
		.map(str::trim)
		.filter(|value| !value.is_empty())
		.map(str::to_string)
}
