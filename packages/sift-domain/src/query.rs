use std::{fmt, sync::LazyLock};

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

const PHONE_INPUT_PATTERN: &str = r"^\+?\(?[0-9][0-9 ().\-]*$";
const MIN_PHONE_DIGITS: usize = 7;
const YEAR_DIGITS: usize = 4;

static PHONE_INPUT: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(PHONE_INPUT_PATTERN).ok());

/// Monotonically increasing id minted once per dispatched query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);
impl Generation {
	pub const fn new(value: u64) -> Self {
		Self(value)
	}

	pub const fn get(self) -> u64 {
		self.0
	}
}
impl fmt::Display for Generation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Input shapes that carry more meaning than plain text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StructuredQuery {
	/// Four digits, read as a calendar year.
	Year(i32),
	/// Seven or more digits, compared against the digits of stored phone numbers.
	PhoneFragment(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
	raw: String,
	normalized: String,
	generation: Generation,
	structured: Option<StructuredQuery>,
}
impl Query {
	/// Returns `None` when `raw` normalizes to an empty string.
	pub fn new(raw: &str, generation: Generation) -> Option<Self> {
		let normalized = normalize(raw);

		if normalized.is_empty() {
			return None;
		}

		let structured = interpret(&normalized);

		Some(Self { raw: raw.to_string(), normalized, generation, structured })
	}

	pub fn raw(&self) -> &str {
		&self.raw
	}

	pub fn normalized(&self) -> &str {
		&self.normalized
	}

	pub fn generation(&self) -> Generation {
		self.generation
	}

	pub fn structured(&self) -> Option<&StructuredQuery> {
		self.structured.as_ref()
	}
}

/// NFKC, lower-cased, trimmed, with inner whitespace runs collapsed to one space.
pub fn normalize(raw: &str) -> String {
	let folded: String = raw.nfkc().collect::<String>().to_lowercase();
	let mut out = String::with_capacity(folded.len());

	for word in folded.split_whitespace() {
		if !out.is_empty() {
			out.push(' ');
		}

		out.push_str(word);
	}

	out
}

pub fn interpret(normalized: &str) -> Option<StructuredQuery> {
	if normalized.len() == YEAR_DIGITS && normalized.chars().all(|ch| ch.is_ascii_digit()) {
		return normalized.parse().ok().map(StructuredQuery::Year);
	}

	let looks_like_phone = PHONE_INPUT.as_ref().is_some_and(|re| re.is_match(normalized));

	if !looks_like_phone {
		return None;
	}

	let digits = digits_only(normalized);

	if digits.len() >= MIN_PHONE_DIGITS { Some(StructuredQuery::PhoneFragment(digits)) } else { None }
}

pub fn digits_only(raw: &str) -> String {
	raw.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn normalize_folds_case_and_whitespace() {
		assert_eq!(normalize("  Acme   CORP \t"), "acme corp");
		assert_eq!(normalize("\u{FF21}cme"), "acme");
		assert_eq!(normalize(" \n "), "");
	}

	#[test]
	fn four_digits_read_as_year() {
		assert_eq!(interpret("2024"), Some(StructuredQuery::Year(2024)));
		assert_eq!(interpret("202"), None);
		assert_eq!(interpret("20245"), None);
	}

	#[test]
	fn seven_digits_read_as_phone_fragment() {
		assert_eq!(
			interpret("(555) 123-4567"),
			Some(StructuredQuery::PhoneFragment("5551234567".to_string()))
		);
		assert_eq!(
			interpret("+1 (415) 555-0100"),
			Some(StructuredQuery::PhoneFragment("14155550100".to_string()))
		);
		assert_eq!(interpret("555-12"), None);
		assert_eq!(interpret("(acme) 5551234"), None);
		assert_eq!(interpret("call 5551234"), None);
	}
}
