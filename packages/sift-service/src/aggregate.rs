use sift_domain::{Generation, ResultItem};

#[derive(Clone, Debug)]
pub struct CategoryResults {
	pub category: String,
	/// Never empty.
	pub items: Vec<ResultItem>,
}

/// Non-empty per-category lists for one generation, in registry order.
#[derive(Clone, Debug)]
pub struct AggregatedResultSet {
	generation: Generation,
	partial: bool,
	categories: Vec<CategoryResults>,
}
impl AggregatedResultSet {
	pub fn generation(&self) -> Generation {
		self.generation
	}

	/// True when the deadline elapsed before every provider settled.
	pub fn is_partial(&self) -> bool {
		self.partial
	}

	pub fn categories(&self) -> &[CategoryResults] {
		&self.categories
	}

	pub fn category_names(&self) -> Vec<&str> {
		self.categories.iter().map(|category| category.category.as_str()).collect()
	}

	pub fn get(&self, category: &str) -> Option<&[ResultItem]> {
		self.categories
			.iter()
			.find(|results| results.category == category)
			.map(|results| results.items.as_slice())
	}

	pub fn total_items(&self) -> usize {
		self.categories.iter().map(|category| category.items.len()).sum()
	}
}

#[derive(Clone, Debug)]
pub enum Aggregation {
	Results(AggregatedResultSet),
	/// Searched and found nothing in any category.
	Empty { generation: Generation, partial: bool },
}
impl Aggregation {
	pub fn generation(&self) -> Generation {
		match self {
			Self::Results(results) => results.generation(),
			Self::Empty { generation, .. } => *generation,
		}
	}
}

/// Drops empty categories; an all-empty input yields `Aggregation::Empty`.
pub fn assemble(
	generation: Generation,
	per_category: Vec<(String, Vec<ResultItem>)>,
	partial: bool,
) -> Aggregation {
	let categories: Vec<CategoryResults> = per_category
		.into_iter()
		.filter(|(_, items)| !items.is_empty())
		.map(|(category, items)| CategoryResults { category, items })
		.collect();

	if categories.is_empty() {
		return Aggregation::Empty { generation, partial };
	}

	Aggregation::Results(AggregatedResultSet { generation, partial, categories })
}
