#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
	#[error("Invalid search response: {0}")]
	InvalidResponse(String),
}
