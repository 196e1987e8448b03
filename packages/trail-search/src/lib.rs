pub mod import;
pub mod typesense;

mod error;

pub use error::Error;
pub use typesense::TypesenseClient;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use trail_domain::{BoxFuture, Item, document::IndexedDocument, filter::Filter};

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub const WILDCARD_QUERY: &str = "*";
pub const QUERY_BY: &str = "recordId";
pub const SORT_NEWEST_FIRST: &str = "timestamp:desc";

#[derive(Clone, Debug)]
pub struct SearchQuery {
	pub filter: Filter,
	pub page: u32,
	pub per_page: u32,
}

/// A search result page. Fields this crate does not model are kept verbatim in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
	#[serde(default)]
	pub found: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub out_of: Option<u64>,
	#[serde(default)]
	pub page: u32,
	#[serde(default)]
	pub hits: Vec<SearchHit>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
	pub document: Item,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// One line of an import response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
	pub success: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub document: Option<String>,
}
impl ImportOutcome {
	pub fn ok() -> Self {
		Self { success: true, error: None, document: None }
	}

	pub fn failed(error: impl Into<String>) -> Self {
		Self { success: false, error: Some(error.into()), document: None }
	}
}

pub trait SearchIndex
where
	Self: Send + Sync,
{
	fn search<'a>(&'a self, query: &'a SearchQuery) -> BoxFuture<'a, Result<SearchResponse>>;

	/// Upserts `documents`. The returned outcomes are positional: entry `i` describes
	/// `documents[i]`.
	fn import<'a>(
		&'a self,
		documents: &'a [IndexedDocument],
	) -> BoxFuture<'a, Result<Vec<ImportOutcome>>>;
}
