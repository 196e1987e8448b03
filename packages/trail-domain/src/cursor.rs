//! Pagination cursors.
//!
//! A [`ContinuationKey`] is the store's native "last evaluated key": a flat map of key
//! attributes. It travels to clients as base64url-encoded JSON so it survives query strings
//! unchanged. A [`TimeCursor`] is the narrower `{recordId, timestamp}` pair used by the
//! time-ordered listing, where the partition value is supplied by the server.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
	Error, Result,
	activity::{RECORD_ID, STATIC_KEY, TIMESTAMP},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContinuationKey(Map<String, Value>);
impl ContinuationKey {
	pub fn new(attributes: Map<String, Value>) -> Self {
		Self(attributes)
	}

	pub fn attributes(&self) -> &Map<String, Value> {
		&self.0
	}

	pub fn into_attributes(self) -> Map<String, Value> {
		self.0
	}

	pub fn get_str(&self, key: &str) -> Option<&str> {
		self.0.get(key).and_then(Value::as_str)
	}

	pub fn encode(&self) -> String {
		URL_SAFE_NO_PAD.encode(Value::Object(self.0.clone()).to_string())
	}

	pub fn decode(token: &str) -> Result<Self> {
		let bytes = URL_SAFE_NO_PAD.decode(token.trim()).map_err(|_| Error::CursorEncoding)?;
		let value: Value = serde_json::from_slice(&bytes)
			.map_err(|err| Error::CursorMalformed { message: err.to_string() })?;
		let Value::Object(attributes) = value else {
			return Err(Error::CursorMalformed { message: "expected a JSON object".to_string() });
		};

		if attributes.is_empty() {
			return Err(Error::CursorMalformed { message: "key has no attributes".to_string() });
		}

		for (name, value) in &attributes {
			if !(value.is_string() || value.is_number()) {
				return Err(Error::CursorMalformed {
					message: format!("attribute {name} must be a string or a number"),
				});
			}
		}

		Ok(Self(attributes))
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeCursor {
	pub record_id: String,
	pub timestamp: String,
}
impl TimeCursor {
	/// Builds a cursor from the `lastTimestamp` and `recordId` request parameters. Both absent
	/// means "start from the beginning"; only one present is an error.
	pub fn from_params(last_timestamp: Option<&str>, record_id: Option<&str>) -> Result<Option<Self>> {
		let last_timestamp = last_timestamp.filter(|value| !value.is_empty());
		let record_id = record_id.filter(|value| !value.is_empty());

		match (last_timestamp, record_id) {
			(Some(timestamp), Some(record_id)) => Ok(Some(Self {
				record_id: record_id.to_string(),
				timestamp: timestamp.to_string(),
			})),
			(None, None) => Ok(None),
			(Some(_), None) =>
				Err(Error::CursorIncomplete { present: "lastTimestamp", missing: "recordId" }),
			(None, Some(_)) =>
				Err(Error::CursorIncomplete { present: "recordId", missing: "lastTimestamp" }),
		}
	}

	/// The exclusive start key for the time index: partition, range key, and table key.
	pub fn to_start_key(&self, partition_value: &str) -> ContinuationKey {
		let mut attributes = Map::new();

		attributes.insert(STATIC_KEY.to_string(), Value::from(partition_value));
		attributes.insert(TIMESTAMP.to_string(), Value::from(self.timestamp.clone()));
		attributes.insert(RECORD_ID.to_string(), Value::from(self.record_id.clone()));

		ContinuationKey(attributes)
	}

	pub fn from_key(key: &ContinuationKey) -> Option<Self> {
		Some(Self {
			record_id: key.get_str(RECORD_ID)?.to_string(),
			timestamp: key.get_str(TIMESTAMP)?.to_string(),
		})
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn key(value: Value) -> ContinuationKey {
		ContinuationKey::new(value.as_object().cloned().expect("fixture must be an object"))
	}

	#[test]
	fn encoded_key_is_url_safe_and_round_trips() {
		let original = key(json!({
			"recordId": "rec-0000042",
			"staticKey": "all",
			"timestamp": "2025-04-13T14:32:38.609Z"
		}));
		let token = original.encode();

		assert!(token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
		assert_eq!(ContinuationKey::decode(&token).expect("decode failed"), original);
		assert_eq!(ContinuationKey::decode(&token).expect("decode failed").encode(), token);
	}

	#[test]
	fn rejects_garbage_tokens() {
		assert!(matches!(ContinuationKey::decode("%%%"), Err(Error::CursorEncoding)));

		let not_object = URL_SAFE_NO_PAD.encode("[1,2]");

		assert!(matches!(
			ContinuationKey::decode(&not_object),
			Err(Error::CursorMalformed { .. })
		));

		let nested = URL_SAFE_NO_PAD.encode(r#"{"recordId":{"S":"x"}}"#);

		assert!(matches!(ContinuationKey::decode(&nested), Err(Error::CursorMalformed { .. })));

		let empty = URL_SAFE_NO_PAD.encode("{}");

		assert!(matches!(ContinuationKey::decode(&empty), Err(Error::CursorMalformed { .. })));
	}

	#[test]
	fn time_cursor_requires_both_parameters() {
		assert_eq!(TimeCursor::from_params(None, None).expect("no cursor"), None);
		assert_eq!(TimeCursor::from_params(Some(""), Some("")).expect("no cursor"), None);
		assert!(matches!(
			TimeCursor::from_params(Some("2025-04-13T14:32:38.609Z"), None),
			Err(Error::CursorIncomplete { missing: "recordId", .. })
		));
		assert!(matches!(
			TimeCursor::from_params(None, Some("rec-1")),
			Err(Error::CursorIncomplete { missing: "lastTimestamp", .. })
		));
	}

	#[test]
	fn time_cursor_maps_to_full_index_key() {
		let cursor = TimeCursor::from_params(Some("2025-04-13T14:32:38.609Z"), Some("rec-7"))
			.expect("valid cursor")
			.expect("cursor present");
		let start = cursor.to_start_key("all");

		assert_eq!(start.get_str("staticKey"), Some("all"));
		assert_eq!(start.get_str("timestamp"), Some("2025-04-13T14:32:38.609Z"));
		assert_eq!(start.get_str("recordId"), Some("rec-7"));
		assert_eq!(TimeCursor::from_key(&start), Some(cursor));
	}
}
