pub mod activity;
pub mod bulk;
pub mod search;
pub mod session;
pub mod sync;
pub mod users;

mod error;

pub use activity::{
	FilterResponse, PagedListRequest, PagedListResponse, TimeListRequest, TimeListResponse,
};
pub use bulk::{BulkInsertRequest, BulkInsertResponse};
pub use error::{Error, Result};
pub use search::{SearchRecordsRequest, SearchRecordsResponse};
pub use session::{SessionClaims, SessionTokens};
pub use sync::{SyncProgress, SyncReport};
pub use users::{CreateUserRequest, PatchedUser, ReplacedUser, UpdateUserRequest};

use std::sync::Arc;

use trail_config::Config;
use trail_search::{SearchIndex, TypesenseClient};
use trail_storage::{DynamoStore, RecordStore, UserStore};

#[derive(Clone)]
pub struct Backends {
	pub records: Arc<dyn RecordStore>,
	pub users: Arc<dyn UserStore>,
	pub index: Arc<dyn SearchIndex>,
}
impl Backends {
	pub fn new(
		records: Arc<dyn RecordStore>,
		users: Arc<dyn UserStore>,
		index: Arc<dyn SearchIndex>,
	) -> Self {
		Self { records, users, index }
	}
}

pub struct TrailService {
	pub cfg: Config,
	pub backends: Backends,
}
impl TrailService {
	/// Connects to DynamoDB and Typesense as configured.
	pub async fn connect(cfg: Config) -> Result<Self> {
		let store = Arc::new(DynamoStore::connect(&cfg.storage.dynamodb).await);
		let index = Arc::new(TypesenseClient::new(&cfg.search.typesense)?);
		let backends = Backends::new(store.clone(), store, index);

		Ok(Self { cfg, backends })
	}

	pub fn with_backends(cfg: Config, backends: Backends) -> Self {
		Self { cfg, backends }
	}
}

/// Parses an optional positive integer parameter. Absent or empty input yields `default`.
pub(crate) fn parse_positive(name: &str, raw: Option<&str>, default: u32) -> Result<u32> {
	let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
		return Ok(default);
	};

	match raw.parse::<u32>() {
		Ok(value) if value > 0 => Ok(value),
		_ => Err(Error::invalid(format!("{name} must be a positive integer."))),
	}
}
