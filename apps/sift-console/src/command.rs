use sift_providers::ProspectKind;

const PEOPLE_PREFIX: &str = "/people ";
const ORGANIZATIONS_PREFIX: &str = "/orgs ";
const QUIT: &str = "/quit";

/// One line of console input.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
	/// A keystroke-style search through the debounce gate.
	Search(&'a str),
	/// An explicit remote lookup.
	Prospect(ProspectKind, &'a str),
	/// Blank line: the input was cleared.
	Reset,
	Quit,
}

pub fn parse(line: &str) -> Command<'_> {
	let trimmed = line.trim();

	if trimmed.is_empty() {
		return Command::Reset;
	}
	if trimmed == QUIT {
		return Command::Quit;
	}
	if let Some(rest) = trimmed.strip_prefix(PEOPLE_PREFIX) {
		return Command::Prospect(ProspectKind::People, rest);
	}
	if let Some(rest) = trimmed.strip_prefix(ORGANIZATIONS_PREFIX) {
		return Command::Prospect(ProspectKind::Organizations, rest);
	}

	Command::Search(line)
}
