mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Account, Auth, Config, DynamoDb, Query, Search, Service, Storage, SyncJob, Typesense,
};

use std::{fs, net::SocketAddr, path::Path};

pub const MAX_SYNC_BATCH_SIZE: u32 = 1_000;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.parse::<SocketAddr>().is_err() {
		return Err(Error::Validation {
			message: "service.http_bind must be a socket address such as 127.0.0.1:5000."
				.to_string(),
		});
	}

	let dynamodb = &cfg.storage.dynamodb;

	for (label, value) in [
		("storage.dynamodb.activity_table", &dynamodb.activity_table),
		("storage.dynamodb.users_table", &dynamodb.users_table),
		("storage.dynamodb.time_index", &dynamodb.time_index),
		("storage.dynamodb.partition_value", &dynamodb.partition_value),
		("search.typesense.url", &cfg.search.typesense.url),
		("search.typesense.api_key", &cfg.search.typesense.api_key),
		("search.typesense.collection", &cfg.search.typesense.collection),
		("auth.access_token_secret", &cfg.auth.access_token_secret),
		("auth.refresh_token_secret", &cfg.auth.refresh_token_secret),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if dynamodb.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "storage.dynamodb.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.search.typesense.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "search.typesense.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if !cfg.search.typesense.url.starts_with("http://")
		&& !cfg.search.typesense.url.starts_with("https://")
	{
		return Err(Error::Validation {
			message: "search.typesense.url must start with http:// or https://.".to_string(),
		});
	}

	for (label, value) in [
		("query.default_time_limit", cfg.query.default_time_limit),
		("query.default_paged_limit", cfg.query.default_paged_limit),
		("query.default_per_page", cfg.query.default_per_page),
		("query.max_bulk_count", cfg.query.max_bulk_count),
	] {
		if value == 0 {
			return Err(Error::Validation { message: format!("{label} must be greater than zero.") });
		}
	}

	if !(1..=MAX_SYNC_BATCH_SIZE).contains(&cfg.sync.batch_size) {
		return Err(Error::Validation {
			message: format!("sync.batch_size must be in the range 1-{MAX_SYNC_BATCH_SIZE}."),
		});
	}
	if cfg.sync.manifest_path.trim().is_empty() {
		return Err(Error::Validation {
			message: "sync.manifest_path must be non-empty.".to_string(),
		});
	}
	if cfg.auth.access_token_secret == cfg.auth.refresh_token_secret {
		return Err(Error::Validation {
			message: "auth.access_token_secret and auth.refresh_token_secret must differ."
				.to_string(),
		});
	}
	if cfg.auth.access_ttl_seconds <= 0 {
		return Err(Error::Validation {
			message: "auth.access_ttl_seconds must be greater than zero.".to_string(),
		});
	}
	if cfg.auth.refresh_ttl_seconds <= cfg.auth.access_ttl_seconds {
		return Err(Error::Validation {
			message: "auth.refresh_ttl_seconds must be greater than auth.access_ttl_seconds."
				.to_string(),
		});
	}

	for (idx, account) in cfg.auth.accounts.iter().enumerate() {
		if account.username.trim().is_empty() || account.password.is_empty() {
			return Err(Error::Validation {
				message: format!("auth.accounts[{idx}] must have a username and a password."),
			});
		}
		if cfg.auth.accounts[..idx].iter().any(|other| other.username == account.username) {
			return Err(Error::Validation {
				message: format!("auth.accounts[{idx}].username must be unique."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.service.cors_origin.as_deref().map(|origin| origin.trim().is_empty()).unwrap_or(false) {
		cfg.service.cors_origin = None;
	}
	if cfg.storage.dynamodb.region.as_deref().map(|region| region.trim().is_empty()).unwrap_or(false)
	{
		cfg.storage.dynamodb.region = None;
	}
	if cfg
		.storage
		.dynamodb
		.endpoint
		.as_deref()
		.map(|endpoint| endpoint.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.storage.dynamodb.endpoint = None;
	}

	let url = cfg.search.typesense.url.trim().trim_end_matches('/').to_string();

	cfg.search.typesense.url = url;
}
