use std::sync::Arc;

use time::macros::datetime;
use uuid::Uuid;

use sift_domain::{Account, Contact, Deal, Describe, RecordFixtures, ResultItem, Sequence};

/// `count` distinct items labelled for `category`.
pub fn items(category: &str, count: usize) -> Vec<ResultItem> {
	(0..count)
		.map(|index| {
			let record = Arc::new(Deal {
				id: Uuid::new_v4(),
				name: format!("{category} {index}"),
				account_name: None,
				stage: None,
				amount: None,
			});
			let mut item = Deal::to_item(&record);

			item.category = category.to_string();

			item
		})
		.collect()
}

/// A small record set covering every built-in category.
pub fn sample_fixtures() -> RecordFixtures {
	RecordFixtures {
		contacts: vec![
			contact(
				"Ada Lovelace",
				Some("CTO"),
				Some("ada@acme.io"),
				Some("+1 (415) 555-0100"),
				"Acme",
			),
			contact("Grace Hopper", Some("Engineer"), Some("grace@initech.com"), None, "Initech"),
			contact("Alan Turing", None, Some("alan@acme.io"), Some("020 7946 0958"), "Acme Corp"),
		],
		accounts: vec![
			Account {
				id: Uuid::new_v4(),
				name: "Acme Corp".to_string(),
				industry: Some("Manufacturing".to_string()),
				domain: Some("acme.io".to_string()),
				phone: Some("+1 415 555 0199".to_string()),
				contract_expires_at: Some(datetime!(2024-06-30 00:00 UTC)),
			},
			Account {
				id: Uuid::new_v4(),
				name: "Initech".to_string(),
				industry: Some("Software".to_string()),
				domain: Some("initech.com".to_string()),
				phone: None,
				contract_expires_at: Some(datetime!(2025-01-15 00:00 UTC)),
			},
			Account {
				id: Uuid::new_v4(),
				name: "Globex".to_string(),
				industry: Some("Energy".to_string()),
				domain: Some("globex.example".to_string()),
				phone: None,
				contract_expires_at: Some(datetime!(2024-12-01 00:00 UTC)),
			},
		],
		sequences: vec![Sequence {
			id: Uuid::new_v4(),
			name: "Acme onboarding".to_string(),
			owner: Some("Ada Lovelace".to_string()),
			step_count: 4,
		}],
		deals: vec![Deal {
			id: Uuid::new_v4(),
			name: "Acme renewal".to_string(),
			account_name: Some("Acme Corp".to_string()),
			stage: Some("Negotiation".to_string()),
			amount: Some(48_000.0),
		}],
	}
}

fn contact(
	name: &str,
	title: Option<&str>,
	email: Option<&str>,
	phone: Option<&str>,
	company: &str,
) -> Contact {
	Contact {
		id: Uuid::new_v4(),
		name: name.to_string(),
		title: title.map(str::to_string),
		email: email.map(str::to_string),
		phone: phone.map(str::to_string),
		company: Some(company.to_string()),
	}
}
