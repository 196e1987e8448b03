use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
	Item,
	activity::{
		ACTION, DEVICE, LOCATION, METADATA, RECORD_ID, SESSION_ID, STATIC_KEY, TIMESTAMP, USER_ID,
		parse_timestamp_millis,
	},
};

/// Manifest entry used when a failed item has no usable `recordId`.
pub const UNKNOWN_RECORD_ID: &str = "[undefined]";

/// Flattened projection of an activity record as pushed to the search index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedDocument {
	pub record_id: String,
	/// Epoch milliseconds.
	pub timestamp: i64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub action: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub static_key: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub device: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
}
impl IndexedDocument {
	/// Projects a raw store item. Items without a `recordId` or a usable `timestamp` are rejected.
	pub fn project(item: &Item) -> Result<Self, RejectedItem> {
		let record_id = string_field(item.get(RECORD_ID)).filter(|id| !id.is_empty());
		let timestamp = item.get(TIMESTAMP).and_then(timestamp_millis);
		let (Some(record_id), Some(timestamp)) = (record_id.clone(), timestamp) else {
			return Err(RejectedItem { record_id });
		};
		let metadata = item.get(METADATA).and_then(Value::as_object);
		let metadata_field =
			|key: &str| metadata.and_then(|metadata| string_field(metadata.get(key)));

		Ok(Self {
			record_id,
			timestamp,
			action: string_field(item.get(ACTION)),
			user_id: string_field(item.get(USER_ID)),
			static_key: string_field(item.get(STATIC_KEY)),
			device: metadata_field(DEVICE),
			location: metadata_field(LOCATION),
			session_id: metadata_field(SESSION_ID),
		})
	}

	pub fn to_item(&self) -> Item {
		let mut item = Item::new();

		item.insert(RECORD_ID.to_string(), Value::from(self.record_id.clone()));
		item.insert(TIMESTAMP.to_string(), Value::from(self.timestamp));

		for (key, value) in [
			(ACTION, &self.action),
			(USER_ID, &self.user_id),
			(STATIC_KEY, &self.static_key),
			(DEVICE, &self.device),
			(LOCATION, &self.location),
			(SESSION_ID, &self.session_id),
		] {
			if let Some(value) = value {
				item.insert(key.to_string(), Value::from(value.clone()));
			}
		}

		item
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedItem {
	pub record_id: Option<String>,
}
impl RejectedItem {
	pub fn manifest_id(&self) -> String {
		self.record_id.clone().unwrap_or_else(|| UNKNOWN_RECORD_ID.to_string())
	}
}

fn string_field(value: Option<&Value>) -> Option<String> {
	value.and_then(Value::as_str).map(str::to_string)
}

fn timestamp_millis(value: &Value) -> Option<i64> {
	match value {
		Value::String(raw) => parse_timestamp_millis(raw),
		Value::Number(number) => number
			.as_i64()
			.or_else(|| {
				number
					.as_f64()
					.filter(|millis| millis.is_finite() && millis.abs() < i64::MAX as f64)
					.map(|millis| millis.trunc() as i64)
			})
			.filter(|millis| *millis > 0),
		_ => None,
	}
}
