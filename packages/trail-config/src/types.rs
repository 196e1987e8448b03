use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub search: Search,
	#[serde(default)]
	pub query: Query,
	#[serde(default)]
	pub sync: SyncJob,
	pub auth: Auth,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	/// Optional. Browser origin allowed to call the API with credentials.
	pub cors_origin: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub dynamodb: DynamoDb,
}

#[derive(Debug, Deserialize)]
pub struct DynamoDb {
	/// Optional. Falls back to the region resolved by the AWS default provider chain.
	pub region: Option<String>,
	/// Optional. Endpoint override, e.g. DynamoDB Local.
	pub endpoint: Option<String>,
	pub timeout_ms: u64,
	pub activity_table: String,
	pub users_table: String,
	#[serde(default = "default_time_index")]
	pub time_index: String,
	#[serde(default = "default_partition_value")]
	pub partition_value: String,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	pub typesense: Typesense,
}

#[derive(Debug, Deserialize)]
pub struct Typesense {
	pub url: String,
	pub api_key: String,
	#[serde(default = "default_collection")]
	pub collection: String,
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Query {
	pub default_time_limit: u32,
	pub default_paged_limit: u32,
	pub default_per_page: u32,
	/// Upper bound on records generated by one bulk insert.
	pub max_bulk_count: u32,
}
impl Default for Query {
	fn default() -> Self {
		Self {
			default_time_limit: 50,
			default_paged_limit: 10,
			default_per_page: 10,
			max_bulk_count: 10_000,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncJob {
	pub batch_size: u32,
	pub manifest_path: String,
}
impl Default for SyncJob {
	fn default() -> Self {
		Self { batch_size: 500, manifest_path: "failed-records.json".to_string() }
	}
}

#[derive(Debug, Deserialize)]
pub struct Auth {
	pub access_token_secret: String,
	pub refresh_token_secret: String,
	#[serde(default = "default_access_ttl_seconds")]
	pub access_ttl_seconds: i64,
	#[serde(default = "default_refresh_ttl_seconds")]
	pub refresh_ttl_seconds: i64,
	#[serde(default = "default_secure_cookies")]
	pub secure_cookies: bool,
	#[serde(default)]
	pub accounts: Vec<Account>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Account {
	pub id: u64,
	pub username: String,
	pub password: String,
}

fn default_time_index() -> String {
	"staticKey-timestamp-index".to_string()
}

fn default_partition_value() -> String {
	"all".to_string()
}

fn default_collection() -> String {
	"activity_records".to_string()
}

fn default_access_ttl_seconds() -> i64 {
	15 * 60
}

fn default_refresh_ttl_seconds() -> i64 {
	7 * 24 * 60 * 60
}

fn default_secure_cookies() -> bool {
	true
}
