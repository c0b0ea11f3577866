use std::sync::Arc;

use crate::records::{Account, Contact, Deal, ProspectOrganization, ProspectPerson, Sequence};

pub const CONTACTS: &str = "contacts";
pub const ACCOUNTS: &str = "accounts";
pub const SEQUENCES: &str = "sequences";
pub const DEALS: &str = "deals";
pub const PROSPECT_PEOPLE: &str = "prospect_people";
pub const PROSPECT_ORGANIZATIONS: &str = "prospect_organizations";

/// Shared handle to the record a result was built from. The backing store owns the record.
#[derive(Clone, Debug)]
pub enum SourceRef {
	Contact(Arc<Contact>),
	Account(Arc<Account>),
	Sequence(Arc<Sequence>),
	Deal(Arc<Deal>),
	ProspectPerson(Arc<ProspectPerson>),
	ProspectOrganization(Arc<ProspectOrganization>),
}
impl SourceRef {
	/// True when both handles point at the same stored record.
	pub fn same_record(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Contact(a), Self::Contact(b)) => Arc::ptr_eq(a, b),
			(Self::Account(a), Self::Account(b)) => Arc::ptr_eq(a, b),
			(Self::Sequence(a), Self::Sequence(b)) => Arc::ptr_eq(a, b),
			(Self::Deal(a), Self::Deal(b)) => Arc::ptr_eq(a, b),
			(Self::ProspectPerson(a), Self::ProspectPerson(b)) => Arc::ptr_eq(a, b),
			(Self::ProspectOrganization(a), Self::ProspectOrganization(b)) => Arc::ptr_eq(a, b),
			_ => false,
		}
	}
}

#[derive(Clone, Debug)]
pub struct ResultItem {
	/// Unique within `category` for one query.
	pub id: String,
	pub category: String,
	pub title: String,
	pub subtitle: String,
	pub source_ref: SourceRef,
}

/// How a stored record is presented as a result row.
pub trait Describe
where
	Self: Sized + Send + Sync + 'static,
{
	const CATEGORY: &'static str;

	fn record_id(&self) -> String;

	fn title(&self) -> String;

	fn subtitle(&self) -> String;

	fn source_ref(record: &Arc<Self>) -> SourceRef;

	fn to_item(record: &Arc<Self>) -> ResultItem {
		ResultItem {
			id: record.record_id(),
			category: Self::CATEGORY.to_string(),
			title: record.title(),
			subtitle: record.subtitle(),
			source_ref: Self::source_ref(record),
		}
	}
}

impl Describe for Contact {
	const CATEGORY: &'static str = CONTACTS;

	fn record_id(&self) -> String {
		self.id.to_string()
	}

	fn title(&self) -> String {
		self.name.clone()
	}

	fn subtitle(&self) -> String {
		let role = join_present(&[self.title.as_deref(), self.company.as_deref()], " at ");

		if role.is_empty() { self.email.clone().unwrap_or_default() } else { role }
	}

	fn source_ref(record: &Arc<Self>) -> SourceRef {
		SourceRef::Contact(Arc::clone(record))
	}
}

impl Describe for Account {
	const CATEGORY: &'static str = ACCOUNTS;

	fn record_id(&self) -> String {
		self.id.to_string()
	}

	fn title(&self) -> String {
		self.name.clone()
	}

	fn subtitle(&self) -> String {
		join_present(&[self.domain.as_deref(), self.industry.as_deref()], " | ")
	}

	fn source_ref(record: &Arc<Self>) -> SourceRef {
		SourceRef::Account(Arc::clone(record))
	}
}

impl Describe for Sequence {
	const CATEGORY: &'static str = SEQUENCES;

	fn record_id(&self) -> String {
		self.id.to_string()
	}

	fn title(&self) -> String {
		self.name.clone()
	}

	fn subtitle(&self) -> String {
		let steps = format!("{} steps", self.step_count);

		join_present(&[self.owner.as_deref(), Some(steps.as_str())], " | ")
	}

	fn source_ref(record: &Arc<Self>) -> SourceRef {
		SourceRef::Sequence(Arc::clone(record))
	}
}

impl Describe for Deal {
	const CATEGORY: &'static str = DEALS;

	fn record_id(&self) -> String {
		self.id.to_string()
	}

	fn title(&self) -> String {
		self.name.clone()
	}

	fn subtitle(&self) -> String {
		join_present(&[self.account_name.as_deref(), self.stage.as_deref()], " | ")
	}

	fn source_ref(record: &Arc<Self>) -> SourceRef {
		SourceRef::Deal(Arc::clone(record))
	}
}

impl Describe for ProspectPerson {
	const CATEGORY: &'static str = PROSPECT_PEOPLE;

	fn record_id(&self) -> String {
		self.id.clone()
	}

	fn title(&self) -> String {
		self.name.clone()
	}

	fn subtitle(&self) -> String {
		join_present(&[self.title.as_deref(), self.organization_name.as_deref()], " at ")
	}

	fn source_ref(record: &Arc<Self>) -> SourceRef {
		SourceRef::ProspectPerson(Arc::clone(record))
	}
}

impl Describe for ProspectOrganization {
	const CATEGORY: &'static str = PROSPECT_ORGANIZATIONS;

	fn record_id(&self) -> String {
		self.id.clone()
	}

	fn title(&self) -> String {
		self.name.clone()
	}

	fn subtitle(&self) -> String {
		join_present(&[self.primary_domain.as_deref(), self.industry.as_deref()], " | ")
	}

	fn source_ref(record: &Arc<Self>) -> SourceRef {
		SourceRef::ProspectOrganization(Arc::clone(record))
	}
}

fn join_present(parts: &[Option<&str>], separator: &str) -> String {
	parts
		.iter()
		.filter_map(|part| part.map(str::trim))
		.filter(|part| !part.is_empty())
		.collect::<Vec<_>>()
		.join(separator)
}
