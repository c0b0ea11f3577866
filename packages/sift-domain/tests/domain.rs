use std::sync::Arc;

use time::macros::datetime;
use uuid::Uuid;

use sift_domain::{
	Account, Contact, Deal, Describe, Generation, Query, RecordFixtures, Sequence, SourceRef,
	StructuredQuery, item, matching,
};

fn query(raw: &str) -> Query {
	Query::new(raw, Generation::new(1)).expect("Query must be non-empty.")
}

fn account(name: &str, industry: &str, expires_year: Option<i32>) -> Arc<Account> {
	Arc::new(Account {
		id: Uuid::new_v4(),
		name: name.to_string(),
		industry: Some(industry.to_string()),
		domain: Some(format!("{}.com", name.to_lowercase().replace(' ', ""))),
		phone: None,
		contract_expires_at: expires_year.map(|year| match year {
			2024 => datetime!(2024-06-30 00:00 UTC),
			2025 => datetime!(2025-01-15 00:00 UTC),
			_ => datetime!(2030-12-31 00:00 UTC),
		}),
	})
}

fn contact(name: &str, phone: Option<&str>) -> Arc<Contact> {
	Arc::new(Contact {
		id: Uuid::new_v4(),
		name: name.to_string(),
		title: Some("VP Sales".to_string()),
		email: Some(format!("{}@example.com", name.to_lowercase().replace(' ', "."))),
		phone: phone.map(str::to_string),
		company: Some("Acme".to_string()),
	})
}

#[test]
fn empty_input_has_no_query() {
	assert!(Query::new("   ", Generation::new(3)).is_none());
	assert!(Query::new("", Generation::new(3)).is_none());
}

#[test]
fn query_keeps_raw_and_generation() {
	let query = Query::new("  Acme Corp ", Generation::new(7)).expect("Query must be non-empty.");

	assert_eq!(query.raw(), "  Acme Corp ");
	assert_eq!(query.normalized(), "acme corp");
	assert_eq!(query.generation(), Generation::new(7));
	assert!(query.structured().is_none());
}

#[test]
fn year_query_matches_contract_expiration() {
	let records = vec![
		account("Globex", "Energy", Some(2025)),
		account("Initech", "Software", Some(2024)),
		account("Umbrella 2024 Labs", "Biotech", None),
	];
	let items = matching::scan(&records, &query("2024"), 5);

	assert_eq!(items.len(), 2);
	// Structured matches come before plain substring matches.
	assert_eq!(items[0].title, "Initech");
	assert_eq!(items[1].title, "Umbrella 2024 Labs");
}

#[test]
fn scan_stops_at_limit_in_first_match_order() {
	let records: Vec<_> =
		(0..12).map(|idx| account(&format!("Acme {idx}"), "Retail", None)).collect();
	let items = matching::scan(&records, &query("acme"), 5);
	let titles: Vec<_> = items.iter().map(|item| item.title.as_str()).collect();

	assert_eq!(titles, vec!["Acme 0", "Acme 1", "Acme 2", "Acme 3", "Acme 4"]);
}

#[test]
fn scan_with_zero_limit_is_empty() {
	let records = vec![account("Acme", "Retail", None)];

	assert!(matching::scan(&records, &query("acme"), 0).is_empty());
}

#[test]
fn substring_match_covers_secondary_fields() {
	let records = vec![account("Globex", "Energy", None), account("Initech", "Software", None)];

	assert_eq!(matching::scan(&records, &query("SOFT"), 5)[0].title, "Initech");
	assert_eq!(matching::scan(&records, &query("globex.com"), 5)[0].title, "Globex");
}

#[test]
fn phone_fragment_matches_formatted_numbers() {
	let records = vec![
		contact("Ada Lovelace", Some("+1 (555) 010-9999")),
		contact("Grace Hopper", Some("555.123.4567")),
		contact("Alan Turing", None),
	];
	let items = matching::scan(&records, &query("555-123-4567"), 5);

	assert_eq!(items.len(), 1);
	assert_eq!(items[0].title, "Grace Hopper");
	assert_eq!(items[0].subtitle, "VP Sales at Acme");
}

#[test]
fn parenthesized_area_code_finds_dashed_phone() {
	let records = vec![contact("Grace Hopper", Some("555-123-4567")), contact("Alan Turing", None)];
	let query = query("(555) 123-4567");

	assert_eq!(query.structured(), Some(&StructuredQuery::PhoneFragment("5551234567".to_string())));

	let items = matching::scan(&records, &query, 5);

	assert_eq!(items.len(), 1);
	assert_eq!(items[0].title, "Grace Hopper");
}

#[test]
fn item_ids_are_unique_within_a_scan() {
	let shared = account("Acme 2024", "Retail", Some(2024));
	let records = vec![Arc::clone(&shared)];
	let items = matching::scan(&records, &query("2024"), 5);

	assert_eq!(items.len(), 1);
	assert!(items[0].source_ref.same_record(&SourceRef::Account(shared)));
}

#[test]
fn result_items_reference_the_stored_record() {
	let record = Arc::new(Deal {
		id: Uuid::new_v4(),
		name: "Acme renewal".to_string(),
		account_name: Some("Acme".to_string()),
		stage: Some("Negotiation".to_string()),
		amount: Some(12_000.0),
	});
	let item = Deal::to_item(&record);

	assert_eq!(item.category, item::DEALS);
	assert_eq!(item.subtitle, "Acme | Negotiation");
	assert_eq!(Arc::strong_count(&record), 2);
}

#[test]
fn sequence_subtitle_includes_step_count() {
	let record = Arc::new(Sequence {
		id: Uuid::new_v4(),
		name: "Q3 outbound".to_string(),
		owner: Some("Dana".to_string()),
		step_count: 4,
	});

	assert_eq!(record.subtitle(), "Dana | 4 steps");
}

#[test]
fn fixtures_parse_with_optional_fields() {
	let json = serde_json::json!({
		"accounts": [{
			"id": "6f1c1e9e-4a57-4b89-9d7e-2b8f8a0f3f10",
			"name": "Initech",
			"contract_expires_at": "2024-06-30T00:00:00Z"
		}],
		"contacts": [{ "id": "0b9d8a4e-7f7c-4c39-8d0c-1a2b3c4d5e6f", "name": "Ada" }]
	});
	let fixtures: RecordFixtures = serde_json::from_value(json).expect("Failed to parse fixtures.");

	assert_eq!(fixtures.accounts.len(), 1);
	assert_eq!(fixtures.accounts[0].contract_expires_at.map(|ts| ts.year()), Some(2024));
	assert_eq!(fixtures.contacts[0].email, None);
	assert!(fixtures.deals.is_empty());
}

#[test]
fn blank_contract_dates_read_as_absent() {
	let json = serde_json::json!({
		"id": "6f1c1e9e-4a57-4b89-9d7e-2b8f8a0f3f10",
		"name": "Initech",
		"contract_expires_at": "  "
	});
	let account: Account = serde_json::from_value(json).expect("Failed to parse account.");

	assert_eq!(account.contract_expires_at, None);
}

#[test]
fn contract_dates_serialize_as_rfc3339() {
	let mut account = Arc::unwrap_or_clone(account("Initech", "Software", None));

	let value = serde_json::to_value(&account).expect("Failed to serialize.");

	assert_eq!(value["contract_expires_at"], serde_json::Value::Null);

	account.contract_expires_at = Some(datetime!(2025-03-31 00:00 UTC));

	let value = serde_json::to_value(&account).expect("Failed to serialize.");

	assert_eq!(value["contract_expires_at"], "2025-03-31T00:00:00Z");
}
