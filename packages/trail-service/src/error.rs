pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Unauthorized: {message}")]
	Unauthorized { message: String },
	#[error("Access denied: {message}")]
	AccessDenied { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Search error: {message}")]
	Search { message: String },
	#[error(
		"Indexing failed after {total_indexed} indexed and {total_failed} failed records: {message}"
	)]
	SyncFailed { message: String, total_indexed: usize, total_failed: usize },
	#[error(
		"Failed to write failure manifest ({total_indexed} indexed, {total_failed} failed): {message}"
	)]
	Manifest { message: String, total_indexed: usize, total_failed: usize },
	#[error("Session error: {message}")]
	Session { message: String },
}
impl Error {
	pub(crate) fn invalid(message: impl Into<String>) -> Self {
		Self::InvalidRequest { message: message.into() }
	}
}
impl From<trail_storage::Error> for Error {
	fn from(err: trail_storage::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
impl From<trail_search::Error> for Error {
	fn from(err: trail_search::Error) -> Self {
		Self::Search { message: err.to_string() }
	}
}
impl From<trail_domain::Error> for Error {
	fn from(err: trail_domain::Error) -> Self {
		match err {
			trail_domain::Error::Timestamp(inner) => Self::Storage { message: inner.to_string() },
			other => Self::InvalidRequest { message: other.to_string() },
		}
	}
}
