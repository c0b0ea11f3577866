use std::{collections::HashSet, sync::Arc};

use crate::{
	item::{Describe, ResultItem},
	query::{self, Query, StructuredQuery},
	records::{Account, Contact, Deal, Sequence},
};

/// Records that can be scanned locally against a normalized query.
pub trait Searchable
where
	Self: Describe,
{
	/// Fields compared by case-insensitive substring containment.
	fn text_fields(&self) -> Vec<&str>;

	fn matches_structured(&self, _query: &StructuredQuery) -> bool {
		false
	}
}

impl Searchable for Contact {
	fn text_fields(&self) -> Vec<&str> {
		present(&[
			Some(self.name.as_str()),
			self.title.as_deref(),
			self.email.as_deref(),
			self.company.as_deref(),
		])
	}

	fn matches_structured(&self, query: &StructuredQuery) -> bool {
		match query {
			StructuredQuery::PhoneFragment(digits) => phone_contains(self.phone.as_deref(), digits),
			StructuredQuery::Year(_) => false,
		}
	}
}

impl Searchable for Account {
	fn text_fields(&self) -> Vec<&str> {
		present(&[Some(self.name.as_str()), self.industry.as_deref(), self.domain.as_deref()])
	}

	fn matches_structured(&self, query: &StructuredQuery) -> bool {
		match query {
			StructuredQuery::Year(year) =>
				self.contract_expires_at.map(|expires| expires.year() == *year).unwrap_or(false),
			StructuredQuery::PhoneFragment(digits) => phone_contains(self.phone.as_deref(), digits),
		}
	}
}

impl Searchable for Sequence {
	fn text_fields(&self) -> Vec<&str> {
		present(&[Some(self.name.as_str()), self.owner.as_deref()])
	}
}

impl Searchable for Deal {
	fn text_fields(&self) -> Vec<&str> {
		present(&[Some(self.name.as_str()), self.account_name.as_deref(), self.stage.as_deref()])
	}
}

pub fn matches_text<R>(record: &R, needle: &str) -> bool
where
	R: Searchable,
{
	record.text_fields().into_iter().any(|field| query::normalize(field).contains(needle))
}

/// First-match scan capped at `limit`. Structured matches are taken before substring matches.
pub fn scan<R>(records: &[Arc<R>], query: &Query, limit: usize) -> Vec<ResultItem>
where
	R: Searchable,
{
	let mut out = Vec::with_capacity(limit.min(records.len()));
	let mut taken = HashSet::new();

	if limit == 0 {
		return out;
	}

	if let Some(structured) = query.structured() {
		for record in records {
			if out.len() >= limit {
				return out;
			}
			if record.matches_structured(structured) && taken.insert(record.record_id()) {
				out.push(R::to_item(record));
			}
		}
	}

	for record in records {
		if out.len() >= limit {
			break;
		}
		if matches_text(record.as_ref(), query.normalized()) && taken.insert(record.record_id()) {
			out.push(R::to_item(record));
		}
	}

	out
}

fn phone_contains(phone: Option<&str>, digits: &str) -> bool {
	phone.map(|phone| query::digits_only(phone).contains(digits)).unwrap_or(false)
}

fn present<'a>(fields: &[Option<&'a str>]) -> Vec<&'a str> {
	fields.iter().flatten().copied().filter(|field| !field.trim().is_empty()).collect()
}
