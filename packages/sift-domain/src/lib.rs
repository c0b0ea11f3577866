pub mod item;
pub mod matching;
pub mod query;
pub mod records;
pub mod time_serde;

pub use item::{Describe, ResultItem, SourceRef};
pub use matching::Searchable;
pub use query::{Generation, Query, StructuredQuery};
pub use records::{
	Account, Contact, Deal, ProspectOrganization, ProspectPerson, RecordFixtures, Sequence,
};
