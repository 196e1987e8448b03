pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Cursor is not valid base64url.")]
	CursorEncoding,
	#[error("Cursor is malformed: {message}")]
	CursorMalformed { message: String },
	#[error("{present} requires {missing} to resume from a cursor.")]
	CursorIncomplete { present: &'static str, missing: &'static str },
	#[error("Failed to format timestamp.")]
	Timestamp(#[from] time::error::Format),
}
