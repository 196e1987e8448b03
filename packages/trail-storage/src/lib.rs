pub mod convert;
pub mod dynamo;

mod error;

pub use dynamo::DynamoStore;
pub use error::Error;

use trail_domain::{BoxFuture, Item, cursor::ContinuationKey, filter::Filter, user::UserPatch};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
	Ascending,
	Descending,
}

/// A query against the time index for one partition.
#[derive(Clone, Debug)]
pub struct IndexQuery {
	pub partition: String,
	pub order: Order,
	/// Items evaluated per call, before the filter is applied.
	pub limit: Option<u32>,
	pub filter: Filter,
	pub start_key: Option<ContinuationKey>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
	pub items: Vec<Item>,
	pub last_key: Option<ContinuationKey>,
}

pub trait RecordStore
where
	Self: Send + Sync,
{
	fn query_index<'a>(&'a self, query: &'a IndexQuery) -> BoxFuture<'a, Result<Page>>;

	fn scan_page<'a>(
		&'a self,
		limit: u32,
		start_key: Option<&'a ContinuationKey>,
	) -> BoxFuture<'a, Result<Page>>;

	fn put_record<'a>(&'a self, item: &'a Item) -> BoxFuture<'a, Result<()>>;
}

pub trait UserStore
where
	Self: Send + Sync,
{
	fn scan_users(&self) -> BoxFuture<'_, Result<Vec<Item>>>;

	fn get_user<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<Option<Item>>>;

	fn put_user<'a>(&'a self, item: &'a Item) -> BoxFuture<'a, Result<()>>;

	/// Applies `patch` and returns every attribute of the updated item.
	fn update_user<'a>(
		&'a self,
		user_id: &'a str,
		patch: &'a UserPatch,
	) -> BoxFuture<'a, Result<Item>>;
}
