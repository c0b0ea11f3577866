use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contact {
	pub id: Uuid,
	pub name: String,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub phone: Option<String>,
	#[serde(default)]
	pub company: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
	pub id: Uuid,
	pub name: String,
	#[serde(default)]
	pub industry: Option<String>,
	#[serde(default)]
	pub domain: Option<String>,
	#[serde(default)]
	pub phone: Option<String>,
	#[serde(default, with = "crate::time_serde")]
	pub contract_expires_at: Option<OffsetDateTime>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
	pub id: Uuid,
	pub name: String,
	#[serde(default)]
	pub owner: Option<String>,
	#[serde(default)]
	pub step_count: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deal {
	pub id: Uuid,
	pub name: String,
	#[serde(default)]
	pub account_name: Option<String>,
	#[serde(default)]
	pub stage: Option<String>,
	#[serde(default)]
	pub amount: Option<f64>,
}

/// A person record returned by the remote prospecting service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProspectPerson {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub organization_name: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub linkedin_url: Option<String>,
}

/// An organization record returned by the remote prospecting service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProspectOrganization {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub primary_domain: Option<String>,
	#[serde(default)]
	pub industry: Option<String>,
	#[serde(default)]
	pub estimated_num_employees: Option<u64>,
}

/// Record sets as they are exported by the backing stores.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordFixtures {
	pub contacts: Vec<Contact>,
	pub accounts: Vec<Account>,
	pub sequences: Vec<Sequence>,
	pub deals: Vec<Deal>,
}
