//! In-memory backends and fixtures for exercising the service without AWS or Typesense.

pub mod index;
pub mod records;
pub mod users;

pub use index::MemoryIndex;
pub use records::MemoryRecordStore;
pub use users::MemoryUserStore;

use std::path::Path;

use serde_json::json;
use uuid::Uuid;

use trail_config::{
	Account, Auth, Config, DynamoDb, Query, Search, Service, Storage, SyncJob, Typesense,
};
use trail_domain::Item;

pub const TEST_USERNAME: &str = "admin";
pub const TEST_PASSWORD: &str = "password";

/// A valid configuration pointing at nothing. `manifest_path` decides where sync manifests land.
pub fn test_config(manifest_path: &Path) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
			cors_origin: None,
		},
		storage: Storage {
			dynamodb: DynamoDb {
				region: None,
				endpoint: None,
				timeout_ms: 1_000,
				activity_table: "ActivityRecords".to_string(),
				users_table: "Users".to_string(),
				time_index: "staticKey-timestamp-index".to_string(),
				partition_value: "all".to_string(),
			},
		},
		search: Search {
			typesense: Typesense {
				url: "http://127.0.0.1:8108".to_string(),
				api_key: "test-key".to_string(),
				collection: "activity_records".to_string(),
				timeout_ms: 1_000,
			},
		},
		query: Query::default(),
		sync: SyncJob { batch_size: 500, manifest_path: manifest_path.display().to_string() },
		auth: Auth {
			access_token_secret: "test-access-secret".to_string(),
			refresh_token_secret: "test-refresh-secret".to_string(),
			access_ttl_seconds: 900,
			refresh_ttl_seconds: 604_800,
			secure_cookies: false,
			accounts: vec![Account {
				id: 1,
				username: TEST_USERNAME.to_string(),
				password: TEST_PASSWORD.to_string(),
			}],
		},
	}
}

/// A fresh manifest location under the system temp directory.
pub fn temp_manifest_path() -> std::path::PathBuf {
	std::env::temp_dir().join(format!("trail-manifest-{}.json", Uuid::new_v4().simple()))
}

/// A well-formed activity record on partition `all`.
pub fn activity_item(record_id: &str, user_id: &str, action: &str, device: &str, ts: &str) -> Item {
	let value = json!({
		"recordId": record_id,
		"userId": user_id,
		"action": action,
		"timestamp": ts,
		"staticKey": "all",
		"metadata": {
			"sessionId": Uuid::new_v4().to_string(),
			"location": "Paris",
			"device": device,
		}
	});

	match value {
		serde_json::Value::Object(map) => map,
		_ => Item::new(),
	}
}

/// `count` records with ascending millisecond timestamps, cycling users, actions, and devices.
pub fn sample_records(count: usize) -> Vec<Item> {
	const USERS: [&str; 3] = ["user-1", "user-2", "user-3"];
	const ACTIONS: [&str; 2] = ["view", "edit"];
	const DEVICES: [&str; 2] = ["Chrome", "Mobile App"];

	(0..count)
		.map(|i| {
			let seconds = i / 1_000;
			let millis = i % 1_000;

			activity_item(
				&format!("rec-{:07}", i + 1),
				USERS[i % USERS.len()],
				ACTIONS[i % ACTIONS.len()],
				DEVICES[i % DEVICES.len()],
				&format!("2025-04-13T10:{:02}:{:02}.{millis:03}Z", seconds / 60, seconds % 60),
			)
		})
		.collect()
}
