//! Activity records as written to the key-value store.
//!
//! Every record carries the same `staticKey` so that a single partition of the time index holds
//! all records, ordered by `timestamp`.

use serde::{Deserialize, Serialize};
use time::{
	Date, OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
	macros::format_description,
};
use uuid::Uuid;

use crate::{Item, Result};

pub const RECORD_ID: &str = "recordId";
pub const USER_ID: &str = "userId";
pub const ACTION: &str = "action";
pub const TIMESTAMP: &str = "timestamp";
pub const STATIC_KEY: &str = "staticKey";
pub const METADATA: &str = "metadata";
pub const SESSION_ID: &str = "sessionId";
pub const LOCATION: &str = "location";
pub const DEVICE: &str = "device";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
	Login,
	Logout,
	View,
	Edit,
	Delete,
	Create,
}
impl Action {
	pub const ALL: [Self; 6] =
		[Self::Login, Self::Logout, Self::View, Self::Edit, Self::Delete, Self::Create];

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Login => "login",
			Self::Logout => "logout",
			Self::View => "view",
			Self::Edit => "edit",
			Self::Delete => "delete",
			Self::Create => "create",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
	pub session_id: Uuid,
	pub location: String,
	pub device: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
	pub record_id: String,
	pub user_id: String,
	pub action: Action,
	pub timestamp: String,
	pub static_key: String,
	pub metadata: Metadata,
}
impl ActivityRecord {
	pub fn to_item(&self) -> Item {
		let value = serde_json::json!({
			RECORD_ID: self.record_id,
			USER_ID: self.user_id,
			ACTION: self.action.as_str(),
			TIMESTAMP: self.timestamp,
			STATIC_KEY: self.static_key,
			METADATA: {
				SESSION_ID: self.metadata.session_id.to_string(),
				LOCATION: self.metadata.location,
				DEVICE: self.metadata.device,
			},
		});

		match value {
			serde_json::Value::Object(map) => map,
			_ => Item::new(),
		}
	}
}

/// Renders `ts` as an ISO-8601 UTC string with millisecond precision, e.g.
/// `2025-04-13T14:32:38.609Z`. The fixed width keeps lexicographic and chronological order equal.
pub fn format_timestamp(ts: OffsetDateTime) -> Result<String> {
	let utc = ts.to_offset(time::UtcOffset::UTC);

	Ok(utc.format(format_description!(
		"[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
	))?)
}

/// Parses an ISO-8601 timestamp into epoch milliseconds.
///
/// Accepts RFC 3339 date-times, date-times without an offset, and bare dates. The last two are
/// read as UTC.
pub fn parse_timestamp_millis(raw: &str) -> Option<i64> {
	let raw = raw.trim();
	let ts = OffsetDateTime::parse(raw, &Rfc3339).ok().or_else(|| parse_without_offset(raw))?;

	i64::try_from(ts.unix_timestamp_nanos() / 1_000_000).ok()
}

fn parse_without_offset(raw: &str) -> Option<OffsetDateTime> {
	let date_times = [
		format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
		format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
		format_description!("[year]-[month]-[day]T[hour]:[minute]"),
	];

	date_times
		.into_iter()
		.find_map(|format| PrimitiveDateTime::parse(raw, format).ok())
		.or_else(|| {
			Date::parse(raw, format_description!("[year]-[month]-[day]")).ok().map(Date::midnight)
		})
		.map(PrimitiveDateTime::assume_utc)
}
