pub type Result<T, E = ProviderError> = std::result::Result<T, E>;

/// Failure inside a single category lookup. Never escapes the fan-out boundary.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
	#[error("Backing store error: {message}")]
	Store { message: String },
	#[error("Remote provider error: {0}")]
	Remote(#[from] sift_providers::Error),
	#[error("Malformed record: {message}")]
	Malformed { message: String },
	#[error("Lookup cancelled.")]
	Cancelled,
}
