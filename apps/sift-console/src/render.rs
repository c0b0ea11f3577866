use std::fmt::Write;

use tokio::sync::mpsc::UnboundedReceiver;

use sift_service::{AggregatedResultSet, SearchEvent};

pub async fn print_events(mut events: UnboundedReceiver<SearchEvent>) {
	while let Some(event) = events.recv().await {
		println!("{}", render(&event));
	}
}

pub fn render(event: &SearchEvent) -> String {
	match event {
		SearchEvent::Loading => "searching...".to_string(),
		SearchEvent::Results(results) => render_results(results),
		SearchEvent::Empty { generation } => format!("#{generation} no matches"),
		SearchEvent::Reset => "cleared".to_string(),
	}
}

fn render_results(results: &AggregatedResultSet) -> String {
	let mut out = format!("#{} {} result(s)", results.generation(), results.total_items());

	if results.is_partial() {
		out.push_str(", partial");
	}

	for category in results.categories() {
		let _ = write!(out, "\n[{}]", category.category);

		for item in &category.items {
			if item.subtitle.is_empty() {
				let _ = write!(out, "\n  {}", item.title);
			} else {
				let _ = write!(out, "\n  {} ({})", item.title, item.subtitle);
			}
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use sift_domain::Generation;

	#[test]
	fn empty_and_reset_render_as_single_lines() {
		assert_eq!(render(&SearchEvent::Empty { generation: Generation::new(7) }), "#7 no matches");
		assert_eq!(render(&SearchEvent::Reset), "cleared");
	}
}
